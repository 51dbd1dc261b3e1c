// crates/palkey-core/src/defaults.rs

use crate::mapping::fuzzy::DEFAULT_TOLERANCE;
use crate::palette::color::ColorKey;

/// Colors a generated palette must never contain, so sprites don't blend into the
/// background, in-game effects, or the hitbox overlay.
pub const COLORS_TO_AVOID: [(u8, u8, u8); 11] = [
    (0, 0, 0),       // black; background, gauge overlay borders
    (255, 255, 255), // white; pivot axes, throwable box
    (0, 0, 255),     // blue; vulnerable box
    (127, 127, 255), // light blue; counter/anywhere vulnerable box
    (160, 160, 255), // lighter blue; OTG vulnerable box
    (255, 0, 0),     // red; attack box, close normal range marker
    (0, 255, 255),   // cyan; guard box
    (255, 128, 0),   // orange; projectile vulnerable box
    (255, 0, 255),   // magenta; throw box
    (0, 255, 0),     // lime green; collision box, close normal range marker
    (255, 176, 144), // peach; stun gauge overlay
];

/// Shared effect palettes forced to solid black and left out of the inverse mapping.
pub const EFFECTS_TO_BLANK: [&str; 8] = [
    "Lin Poison Effect",
    "Main Fire Effect",
    "Main Orochi Fire Effect",
    "Orochi Burn Effect",
    "Frozen Effect",
    "MAX Mode and SDM Flash",
    "MAX Flash",
    "MAX2 Flash",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    pub tolerance: u8,
    pub avoid: Vec<ColorKey>,
    pub blank_effects: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            avoid: default_avoid(),
            blank_effects: EFFECTS_TO_BLANK.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn default_avoid() -> Vec<ColorKey> {
    COLORS_TO_AVOID.iter().copied().map(ColorKey::from).collect()
}
