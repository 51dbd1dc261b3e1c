// crates/palkey-cli/src/cmd/mod.rs

pub mod generate;
pub mod gif;
pub mod inspect;
pub mod reverse;
