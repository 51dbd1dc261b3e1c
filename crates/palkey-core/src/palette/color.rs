// crates/palkey-core/src/palette/color.rs

use std::fmt;

/// Bytes per packed palette entry in the resource.
pub const BYTES_PER_COLOR: usize = 2;

/// Number of addressable keys in a 24-bit RGB space.
pub const KEY_SPACE: usize = 1 << 24;

/// One palette color: 8 bits per channel plus alpha.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Identity of a color for claiming and table lookup. Alpha is not part of it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack a hardware palette word: 0RRRRRGGGGGBBBBB. Bit 15 is ignored.
    #[inline]
    pub fn from_packed15(x: u16) -> Self {
        let r = expand5(((x >> 10) & 0x1F) as u8);
        let g = expand5(((x >> 5) & 0x1F) as u8);
        let b = expand5((x & 0x1F) as u8);
        Self::rgb(r, g, b)
    }

    /// Quantize to 5 bits per channel. Alpha is dropped, bit 15 is always zero.
    #[inline]
    pub fn to_packed15(self) -> u16 {
        let r = quantize5(self.r) as u16;
        let g = quantize5(self.g) as u16;
        let b = quantize5(self.b) as u16;
        (r << 10) | (g << 5) | b
    }

    #[inline]
    pub fn key(self) -> ColorKey {
        ColorKey {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// Same color with alpha forced to 255.
    #[inline]
    pub fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }

    /// RGBA word as laid out in memory by an RGBA8 pixel buffer (little-endian).
    #[inline]
    pub fn to_rgba_word(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    #[inline]
    pub fn from_rgba_word(w: u32) -> Self {
        let [r, g, b, a] = w.to_le_bytes();
        Self { r, g, b, a }
    }
}

impl ColorKey {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// 24-bit table index: r | g<<8 | b<<16.
    #[inline]
    pub fn index(self) -> usize {
        (self.r as usize) | ((self.g as usize) << 8) | ((self.b as usize) << 16)
    }

    #[inline]
    pub fn from_index(i: usize) -> Self {
        Self {
            r: (i & 0xFF) as u8,
            g: ((i >> 8) & 0xFF) as u8,
            b: ((i >> 16) & 0xFF) as u8,
        }
    }

    #[inline]
    pub fn color(self) -> Color {
        Color::rgb(self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for ColorKey {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({:>3}, {:>3}, {:>3})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "rgb({:>3}, {:>3}, {:>3})", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({:>3}, {:>3}, {:>3}, {:>3})",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

/// round(raw5 * 255 / 31)
#[inline]
fn expand5(raw5: u8) -> u8 {
    ((raw5 as u16 * 255 + 15) / 31) as u8
}

/// round(c * 31 / 255)
#[inline]
fn quantize5(c: u8) -> u8 {
    ((c as u16 * 31 + 127) / 255) as u8
}
