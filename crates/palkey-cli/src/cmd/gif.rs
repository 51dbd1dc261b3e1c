// crates/palkey-cli/src/cmd/gif.rs

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::io::animation::{self, FrameRange};
use crate::io::config::Config;

#[derive(Args)]
pub struct GifArgs {
    /// Folder holding the numbered PNG frames
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Frame number to start at
    #[arg(short, long)]
    pub start: Option<usize>,

    /// Frame number to pause at (equal to --restart for no gap)
    #[arg(short, long)]
    pub pause: Option<usize>,

    /// Frame number to resume from (equal to --pause for no gap)
    #[arg(short, long)]
    pub restart: Option<usize>,

    /// Last frame number; 0 for all frames
    #[arg(short, long)]
    pub end: Option<usize>,

    /// Time between frames in ms; "1000/50", "20" and "50fps" are equivalent
    #[arg(short, long)]
    pub gap: Option<String>,

    /// Crop transparent borders shared by all frames
    #[arg(short, long)]
    pub crop: bool,

    /// Directory for the GIF
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// GIF file name without extension
    #[arg(short, long)]
    pub name: Option<String>,

    /// Save the effective values as the new defaults
    #[arg(short = 'd', long)]
    pub save_defaults: bool,
}

pub fn run(args: GifArgs, config_path: &Path, mut config: Config) -> anyhow::Result<()> {
    let g = &mut config.gif;
    if let Some(p) = args.input {
        g.input = p;
    }
    if let Some(v) = args.start {
        g.start = v;
    }
    if let Some(v) = args.pause {
        g.pause = v;
    }
    if let Some(v) = args.restart {
        g.restart = v;
    }
    if let Some(v) = args.end {
        g.end = v;
    }
    if let Some(v) = args.gap {
        g.gap = v;
    }
    if args.crop {
        g.crop = true;
    }
    if let Some(p) = args.out {
        g.output = p;
    }
    if let Some(n) = args.name {
        g.name = n;
    }
    // fail on a bad gap before anything is saved
    let gap_ms = animation::parse_gap(&g.gap)?;
    if args.save_defaults {
        config.save(config_path)?;
    }
    let g = &config.gif;

    let files = animation::collect_frames(&g.input)?;
    if files.is_empty() {
        anyhow::bail!("no numbered png files found in {}", g.input.display());
    }

    let t0 = Instant::now();
    let range = FrameRange {
        start: g.start,
        pause: g.pause,
        restart: g.restart,
        end: g.end,
    };
    let selected = range.select(&files);
    if selected.is_empty() {
        anyhow::bail!("frame range {range:?} selects none of {} frame(s)", files.len());
    }

    let mut frames = Vec::with_capacity(selected.len());
    for p in &selected {
        let img = image::open(p)
            .with_context(|| format!("decode {}", p.display()))?
            .to_rgba8();
        frames.push(img);
    }
    if g.crop {
        frames = animation::crop_to_union(frames);
    }

    std::fs::create_dir_all(&g.output)
        .with_context(|| format!("create {}", g.output.display()))?;
    let out_path = animation::free_output_path(&g.output, &g.name);
    let count = frames.len();
    animation::write_gif(frames, gap_ms, &out_path)?;

    info!(
        "gathered {} image file(s) into {} in {:.3}s",
        count,
        out_path.display(),
        t0.elapsed().as_secs_f64()
    );
    Ok(())
}
