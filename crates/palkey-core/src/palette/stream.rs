// crates/palkey-core/src/palette/stream.rs
//
// Endless color sources. Callers pull exactly as many colors as a segment needs.

use std::collections::HashSet;

use crate::error::{PalError, Result};
use crate::palette::color::{Color, ColorKey};

/// Rainbow cursor starts here and walks downward.
pub const RAINBOW_START: u16 = 0xFFFF;
/// Reaching this cursor value means every 15-bit color has been handed out once.
pub const RAINBOW_FLOOR: u16 = 0x8000;

pub trait ColorStream {
    fn next_color(&mut self) -> Result<Color>;

    fn take_colors(&mut self, n: usize) -> Result<Vec<Color>> {
        (0..n).map(|_| self.next_color()).collect()
    }
}

/// Descending walk over the packed 15-bit palette space.
///
/// - never yields the same color twice in a row
/// - never yields a color in the avoid-set (exact RGB match)
/// - fails instead of wrapping once the space is used up, so one run never reuses a base color
#[derive(Clone, Debug)]
pub struct Rainbow {
    cursor: u16,
    last: Option<u16>,
    avoid: HashSet<ColorKey>,
    emitted: u64,
}

impl Rainbow {
    pub fn new<I>(avoid: I) -> Self
    where
        I: IntoIterator<Item = ColorKey>,
    {
        Self {
            cursor: RAINBOW_START,
            last: None,
            avoid: avoid.into_iter().collect(),
            emitted: 0,
        }
    }

    /// Colors handed out so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn avoids(&self, key: ColorKey) -> bool {
        self.avoid.contains(&key)
    }
}

impl ColorStream for Rainbow {
    fn next_color(&mut self) -> Result<Color> {
        loop {
            if self.cursor <= RAINBOW_FLOOR {
                return Err(PalError::GenerationExhausted {
                    cursor: self.cursor,
                });
            }
            let packed = self.cursor & 0x7FFF;
            self.cursor -= 1;

            if self.last == Some(packed) {
                continue;
            }
            let color = Color::from_packed15(packed);
            if self.avoid.contains(&color.key()) {
                continue;
            }

            self.last = Some(packed);
            self.emitted += 1;
            return Ok(color);
        }
    }
}

/// One color forever (used to blank palettes to solid black).
#[derive(Copy, Clone, Debug)]
pub struct Constant(pub Color);

impl ColorStream for Constant {
    #[inline]
    fn next_color(&mut self) -> Result<Color> {
        Ok(self.0)
    }
}
