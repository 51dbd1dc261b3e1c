// crates/palkey-core/src/mapping/fuzzy.rs
//
// Tolerance expansion: one generated color claims a cube of nearby keys so that
// lossy capture (video encode, scaling) still maps back to the right original.

use std::collections::HashSet;

use crate::error::{PalError, Result};
use crate::mapping::inverse::{InverseMappingBuilder, MappingEntry};
use crate::palette::color::{Color, ColorKey};

/// Highest tolerance that keeps neighbouring 5-bit levels (8 apart) from overlapping.
pub const MAX_TOLERANCE: u8 = 3;
pub const DEFAULT_TOLERANCE: u8 = 2;

/// Every key handed out during one generation run. Seeded with true black.
#[derive(Clone, Debug)]
pub struct ClaimedColorSet {
    keys: HashSet<ColorKey>,
}

impl Default for ClaimedColorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimedColorSet {
    pub fn new() -> Self {
        let mut keys = HashSet::new();
        keys.insert(Color::BLACK.key());
        Self { keys }
    }

    /// Check-and-insert. Returns false if the key was already claimed.
    #[inline]
    pub fn claim(&mut self, key: ColorKey) -> bool {
        self.keys.insert(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Offsets visited: always (2t+1)^3.
    pub examined: usize,
    /// Distinct keys claimed (fewer than examined when clamped at 0 or 255).
    pub claimed: usize,
}

/// Candidate keys around `center`, R outer, G middle, B inner, ascending offsets.
/// Channels are clamped, so the sequence may repeat a key near 0/255.
pub fn perturbations(center: ColorKey, tolerance: u8) -> impl Iterator<Item = ColorKey> {
    let t = tolerance as i16;
    (-t..=t).flat_map(move |dr| {
        (-t..=t).flat_map(move |dg| {
            (-t..=t).map(move |db| {
                ColorKey::new(
                    offset(center.r, dr),
                    offset(center.g, dg),
                    offset(center.b, db),
                )
            })
        })
    })
}

#[inline]
fn offset(c: u8, d: i16) -> u8 {
    (c as i16 + d).clamp(0, 255) as u8
}

/// Record `generated -> original` for every key within `tolerance` of `generated`.
///
/// Any candidate already claimed by an earlier expansion aborts with `ColorCollision`.
pub fn expand(
    claimed: &mut ClaimedColorSet,
    mapping: &mut InverseMappingBuilder,
    original: Color,
    generated: Color,
    tolerance: u8,
) -> Result<Expansion> {
    let target = original.opaque();
    let mut seen: Vec<ColorKey> = Vec::new();
    let mut out = Expansion::default();

    for key in perturbations(generated.key(), tolerance) {
        out.examined += 1;
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);

        if !claimed.claim(key) {
            return Err(PalError::ColorCollision {
                key,
                original: target,
            });
        }
        mapping.push_entry(MappingEntry::new(key, target));
        out.claimed += 1;
    }

    Ok(out)
}
