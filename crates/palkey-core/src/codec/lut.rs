// crates/palkey-core/src/codec/lut.rs
//
// Reverse direction: dense 2^24 lookup from displayed RGB to original RGBA.

use std::path::Path;

use tracing::debug;

use crate::error::{PalError, Result};
use crate::mapping::inverse::{parse_entries, MappingEntry};
use crate::palette::color::{Color, ColorKey, KEY_SPACE};

/// One RGBA word per 24-bit RGB key. Index and word share the in-memory byte
/// order of an RGBA8 pixel, so a pixel with alpha zeroed is its own index.
pub struct LookupTable {
    table: Box<[u32]>,
    patched: usize,
    /// Pixels whose key still maps to itself are left untouched, alpha included.
    keep_unmapped: bool,
}

impl LookupTable {
    /// Every key maps to itself, fully opaque.
    pub fn identity() -> Self {
        let table: Box<[u32]> = (0..KEY_SPACE as u32).map(|i| i | 0xFF00_0000).collect();
        Self {
            table,
            patched: 0,
            keep_unmapped: false,
        }
    }

    /// True black becomes fully transparent; every other pixel keeps its own
    /// alpha, so existing translucency survives.
    pub fn transparent_black() -> Self {
        let mut lut = Self::from_entries([MappingEntry::new(Color::BLACK.key(), Color::TRANSPARENT)]);
        lut.keep_unmapped = true;
        lut
    }

    /// Later entries for the same key overwrite earlier ones.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = MappingEntry>,
    {
        let mut lut = Self::identity();
        for e in entries {
            lut.table[e.key.index()] = e.target.to_rgba_word();
            lut.patched += 1;
        }
        lut
    }

    pub fn from_mapping_text(text: &str) -> Result<Self> {
        let entries = parse_entries(text)?;
        Ok(Self::from_entries(entries))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| PalError::missing(path, e))?;
        let lut = Self::from_mapping_text(&text)?;
        debug!(path = %path.display(), entries = lut.patched, "loaded inverse color mapping");
        Ok(lut)
    }

    /// Number of mapping entries applied on top of the identity.
    pub fn patched(&self) -> usize {
        self.patched
    }

    #[inline]
    pub fn get(&self, key: ColorKey) -> Color {
        Color::from_rgba_word(self.table[key.index()])
    }

    /// Recolor an RGBA8 buffer in place. Incoming alpha is ignored; every pixel
    /// takes the table's RGBA word for its RGB. Tables built by
    /// [`LookupTable::transparent_black`] only rewrite the pixels they map.
    pub fn apply(&self, rgba: &mut [u8]) {
        debug_assert!(rgba.len() % 4 == 0, "rgba buffer length must be a multiple of 4");
        for px in rgba.chunks_exact_mut(4) {
            let key = u32::from_le_bytes([px[0], px[1], px[2], 0]);
            let word = self.table[key as usize];
            if self.keep_unmapped && word == key | 0xFF00_0000 {
                continue;
            }
            px.copy_from_slice(&word.to_le_bytes());
        }
    }
}
