// crates/palkey-cli/src/cmd/generate.rs

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use palkey_core::mapping::inverse::MAPPING_FILE_NAME;
use palkey_core::resource::checksum::short_id;
use palkey_core::resource::layout::PALETTE_FILE_NAME;
use palkey_core::{generate_roster, PalError, RosterLayout};
use tracing::{debug, info, warn};

use crate::io::config::Config;

#[derive(Args)]
pub struct GenerateArgs {
    /// Directory holding the source pal_a.bin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Directory for the new pal_a.bin and inverse mapping (must differ from --input)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Palette layout file (TOML)
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Per-channel color variation to tolerate when matching captured colors.
    /// Lower is faster with a slight chance of mismatches; above 3 clusters collide.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub tolerance: Option<u8>,

    /// Save the effective values as the new defaults
    #[arg(short = 'd', long)]
    pub save_defaults: bool,
}

fn absolute(p: &Path) -> anyhow::Result<PathBuf> {
    if p.is_absolute() {
        Ok(p.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(p))
    }
}

pub fn run(args: GenerateArgs, config_path: &Path, mut config: Config) -> anyhow::Result<()> {
    // Precedence: flag > config file > built-in default
    let g = &mut config.generate;
    if let Some(p) = args.input {
        g.input = p;
    }
    if let Some(p) = args.out {
        g.output = p;
    }
    if let Some(p) = args.layout {
        g.layout = p;
    }
    if let Some(t) = args.tolerance {
        g.tolerance = t;
    }
    if args.save_defaults {
        config.save(config_path)?;
    }
    let g = &config.generate;

    let input_dir = absolute(&g.input)?;
    let output_dir = absolute(&g.output)?;
    if input_dir == output_dir {
        warn!("input and output paths are the same; refusing to overwrite the source palette");
        anyhow::bail!("input and output directories must differ: {}", input_dir.display());
    }

    let t0 = Instant::now();
    let in_path = input_dir.join(PALETTE_FILE_NAME);
    let out_path = output_dir.join(PALETTE_FILE_NAME);
    let mapping_path = output_dir.join(MAPPING_FILE_NAME);

    info!(path = %in_path.display(), "reading input palette file");
    let original = std::fs::read(&in_path).map_err(|e| PalError::missing(&in_path, e))?;
    let layout = RosterLayout::load(&g.layout)?;
    debug!(
        characters = layout.characters.len(),
        segments = layout.segment_count(),
        "loaded palette layout"
    );

    let generated = generate_roster(&original, &layout, &g.options())?;

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    std::fs::write(&out_path, &generated.bytes)
        .with_context(|| format!("write palette {}", out_path.display()))?;
    info!(path = %out_path.display(), id = %short_id(&generated.bytes), "wrote output palette file");

    let header = generated.header(&original, chrono::Utc::now());
    generated
        .mapping
        .write(&mapping_path, &header)
        .with_context(|| format!("write mapping {}", mapping_path.display()))?;
    info!(path = %mapping_path.display(), "wrote inverse palette mapping");

    info!(
        "generate ok: characters={} segments={} mappings={} tolerance={} in {:.3}s",
        generated.report.characters,
        generated.report.segments_recolored,
        generated.mapping.entry_count(),
        generated.tolerance,
        t0.elapsed().as_secs_f64()
    );
    Ok(())
}
