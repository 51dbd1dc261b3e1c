// crates/palkey-cli/src/io/mod.rs

pub mod animation;
pub mod batch;
pub mod config;
pub mod image_file;
