// crates/palkey-core/src/mapping/mod.rs

pub mod fuzzy;
pub mod inverse;
