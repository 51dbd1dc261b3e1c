// crates/palkey-core/src/error.rs

use std::path::PathBuf;

use thiserror::Error;

use crate::palette::color::{Color, ColorKey};

pub type Result<T> = std::result::Result<T, PalError>;

#[derive(Debug, Error)]
pub enum PalError {
    #[error("color generator exhausted the 15-bit color space (cursor=0x{cursor:04X})")]
    GenerationExhausted { cursor: u16 },

    #[error(
        "color {key} has already been generated earlier (while mapping original color {original}); \
         lower the tolerance"
    )]
    ColorCollision { key: ColorKey, original: Color },

    #[error("mapping line {line}: {reason}")]
    MappingFormat { line: usize, reason: String },

    #[error("palette segment at 0x{offset:06X} ({entries} entries) exceeds resource of {len} bytes")]
    SegmentOutOfBounds {
        offset: usize,
        entries: usize,
        len: usize,
    },

    #[error("palette segment at 0x{offset:06X} holds {expected} colors, got {actual}")]
    SegmentLength {
        offset: usize,
        expected: usize,
        actual: usize,
    },

    #[error("no palette named {0:?} in layout")]
    UnknownPalette(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("cannot open {}: {source}", .path.display())]
    MissingResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PalError {
    /// Wraps an open/read failure with the path that the run needed.
    pub fn missing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PalError::MissingResource {
            path: path.into(),
            source,
        }
    }
}
