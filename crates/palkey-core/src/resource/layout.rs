// crates/palkey-core/src/resource/layout.rs
//
// Structural model of the palette resource (pal_a.bin).
//
// The resource is a flat run of little-endian 15-bit color words. A layout file
// (TOML) names where each character's palettes live:
//
//   [[character]]
//   name = "Kyo Kusanagi"
//   button_a = [{ offset = 0x000200 }, { offset = 0x000220, entries = 8 }]
//   button_b = [{ offset = 0x000400 }]
//   portraits = [[{ offset = 0x001000 }]]
//   extras = [{ offset = 0x002000 }, { offset = 0x002020, entries = 0 }]
//
//   [[effect]]
//   name = "MAX Flash"
//   offset = 0x030000
//
// `entries` defaults to 16 colors.

use std::path::Path;

use serde::Deserialize;

use crate::error::{PalError, Result};
use crate::palette::color::{Color, BYTES_PER_COLOR};

pub const DEFAULT_PALETTE_LENGTH: usize = 16;
pub const PALETTE_FILE_NAME: &str = "pal_a.bin";

fn default_entries() -> usize {
    DEFAULT_PALETTE_LENGTH
}

/// A fixed-offset, fixed-length run of color entries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Segment {
    pub offset: usize,
    #[serde(default = "default_entries")]
    pub entries: usize,
}

impl Segment {
    pub fn new(offset: usize, entries: usize) -> Self {
        Self { offset, entries }
    }

    pub fn byte_len(&self) -> Result<usize> {
        self.entries
            .checked_mul(BYTES_PER_COLOR)
            .ok_or_else(|| self.overflow())
    }

    /// Offset one past the last byte.
    pub fn end(&self) -> Result<usize> {
        self.offset
            .checked_add(self.byte_len()?)
            .ok_or_else(|| self.overflow())
    }

    fn overflow(&self) -> PalError {
        PalError::Layout(format!(
            "segment at offset {} with {} entries overflows the address range",
            self.offset, self.entries
        ))
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    fn bounds(&self, len: usize) -> Result<std::ops::Range<usize>> {
        let end = self.end()?;
        if end > len {
            return Err(PalError::SegmentOutOfBounds {
                offset: self.offset,
                entries: self.entries,
                len,
            });
        }
        Ok(self.offset..end)
    }

    pub fn read(&self, bytes: &[u8]) -> Result<Vec<Color>> {
        let range = self.bounds(bytes.len())?;
        Ok(bytes[range]
            .chunks_exact(BYTES_PER_COLOR)
            .map(|w| Color::from_packed15(u16::from_le_bytes([w[0], w[1]])))
            .collect())
    }

    pub fn write(&self, colors: &[Color], bytes: &mut [u8]) -> Result<()> {
        if colors.len() != self.entries {
            return Err(PalError::SegmentLength {
                offset: self.offset,
                expected: self.entries,
                actual: colors.len(),
            });
        }
        let range = self.bounds(bytes.len())?;
        for (w, c) in bytes[range].chunks_exact_mut(BYTES_PER_COLOR).zip(colors) {
            w.copy_from_slice(&c.to_packed15().to_le_bytes());
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CharacterLayout {
    pub name: String,
    #[serde(default)]
    pub button_a: Vec<Segment>,
    #[serde(default)]
    pub button_b: Vec<Segment>,
    /// One entry per portrait palette, each made of one or more segments.
    #[serde(default)]
    pub portraits: Vec<Vec<Segment>>,
    /// Extra palettes in slot order; empty slots have `entries = 0`.
    #[serde(default)]
    pub extras: Vec<Segment>,
}

impl CharacterLayout {
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.button_a
            .iter()
            .chain(self.button_b.iter())
            .chain(self.portraits.iter().flatten())
            .chain(self.extras.iter())
    }
}

/// A shared (not per-character) palette, e.g. a hit-effect flash.
#[derive(Clone, Debug, Deserialize)]
pub struct NamedSegment {
    pub name: String,
    pub offset: usize,
    #[serde(default = "default_entries")]
    pub entries: usize,
}

impl NamedSegment {
    pub fn segment(&self) -> Segment {
        Segment::new(self.offset, self.entries)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RosterLayout {
    #[serde(rename = "character", default)]
    pub characters: Vec<CharacterLayout>,
    #[serde(rename = "effect", default)]
    pub effects: Vec<NamedSegment>,
}

impl RosterLayout {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PalError::Layout(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PalError::missing(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn character(&self, name: &str) -> Option<&CharacterLayout> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn effect(&self, name: &str) -> Result<Segment> {
        self.effects
            .iter()
            .find(|e| e.name == name)
            .map(NamedSegment::segment)
            .ok_or_else(|| PalError::UnknownPalette(name.to_string()))
    }

    pub fn segment_count(&self) -> usize {
        self.characters.iter().map(|c| c.segments().count()).sum::<usize>() + self.effects.len()
    }
}
