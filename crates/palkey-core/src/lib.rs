pub mod error;
pub mod validate;

pub mod codec;
pub mod defaults;
pub mod mapping;
pub mod palette;
pub mod resource;

pub use crate::codec::lut::LookupTable;
pub use crate::codec::palette::{generate_roster, Fill, GenerationContext, Generated};
pub use crate::defaults::GenerateOptions;
pub use crate::error::{PalError, Result};
pub use crate::palette::color::{Color, ColorKey};
pub use crate::resource::layout::RosterLayout;
