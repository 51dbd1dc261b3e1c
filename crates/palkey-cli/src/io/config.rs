// crates/palkey-cli/src/io/config.rs
//
// Saved defaults (palkey.toml). A missing file means built-in defaults;
// `--save-defaults` on a command writes the effective values back.

use std::path::{Path, PathBuf};

use anyhow::Context;
use palkey_core::defaults::{default_avoid, EFFECTS_TO_BLANK};
use palkey_core::mapping::fuzzy::DEFAULT_TOLERANCE;
use palkey_core::mapping::inverse::MAPPING_FILE_NAME;
use palkey_core::{ColorKey, GenerateOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_CONFIG_FILE: &str = "palkey.toml";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generate: GenerateConfig,
    pub reverse: ReverseConfig,
    pub gif: GifConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Directory holding the source pal_a.bin
    pub input: PathBuf,
    /// Directory receiving the new pal_a.bin and the inverse mapping
    pub output: PathBuf,
    /// Palette layout description (TOML)
    pub layout: PathBuf,
    pub tolerance: u8,
    /// Replaces the built-in avoid-set when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid: Option<Vec<[u8; 3]>>,
    /// Replaces the built-in list of effect palettes to blank when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blank_effects: Option<Vec<String>>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: PathBuf::from("new_palette"),
            layout: PathBuf::from("layout.toml"),
            tolerance: DEFAULT_TOLERANCE,
            avoid: None,
            blank_effects: None,
        }
    }
}

impl GenerateConfig {
    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            tolerance: self.tolerance,
            avoid: match &self.avoid {
                Some(list) => list.iter().map(|&[r, g, b]| ColorKey::new(r, g, b)).collect(),
                None => default_avoid(),
            },
            blank_effects: match &self.blank_effects {
                Some(list) => list.clone(),
                None => EFFECTS_TO_BLANK.iter().map(|s| s.to_string()).collect(),
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseConfig {
    /// Inverse mapping file written by `generate`
    pub mapping: PathBuf,
    /// Directory receiving recolored frames
    pub output: PathBuf,
    /// Prefix attached to every output file name
    pub name: String,
}

impl Default for ReverseConfig {
    fn default() -> Self {
        Self {
            mapping: Path::new("new_palette").join(MAPPING_FILE_NAME),
            output: PathBuf::from("output"),
            name: String::new(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GifConfig {
    /// Folder holding the numbered PNG frames
    pub input: PathBuf,
    pub output: PathBuf,
    /// Output file stem; `.gif` is appended
    pub name: String,
    pub start: usize,
    pub pause: usize,
    pub restart: usize,
    /// 0 (or anything below `start`) means the last frame
    pub end: usize,
    /// Time between frames: `20`, `1000/50` or `50fps`
    pub gap: String,
    pub crop: bool,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("output"),
            output: PathBuf::from("output"),
            name: "GIF".to_string(),
            start: 1,
            pause: 1,
            restart: 1,
            end: 0,
            gap: "60 fps".to_string(),
            crop: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file; using built-in defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg = toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self).context("serialize config")?;
        std::fs::write(path, text).with_context(|| format!("write config {}", path.display()))?;
        info!(path = %path.display(), "saved current values as new defaults");
        Ok(())
    }
}
