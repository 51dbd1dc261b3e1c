// crates/palkey-core/src/codec/mod.rs

pub mod lut;
pub mod palette;
