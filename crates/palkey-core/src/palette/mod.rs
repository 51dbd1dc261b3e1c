// crates/palkey-core/src/palette/mod.rs

pub mod color;
pub mod stream;
