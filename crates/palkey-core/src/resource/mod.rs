// crates/palkey-core/src/resource/mod.rs

pub mod checksum;
pub mod layout;
