// crates/palkey-cli/src/cmd/reverse.rs

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use palkey_core::LookupTable;
use tracing::info;

use crate::io::batch::{self, BatchSummary};
use crate::io::config::Config;

#[derive(Args)]
pub struct InputArgs {
    /// PNG image file(s) to process
    #[arg(long = "files", num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Folder(s) whose *.png files are processed; each gets its own output subfolder
    #[arg(long = "folders", num_args = 1..)]
    pub folders: Vec<PathBuf>,

    /// Directory for output images
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Prefix attached to each output file name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Save the effective values as the new defaults
    #[arg(short = 'd', long)]
    pub save_defaults: bool,
}

#[derive(Args)]
pub struct ReverseArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Inverse palette mapping file
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,
}

#[derive(Args)]
pub struct TransparentArgs {
    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Fold output flags into the config and persist it when asked.
fn apply_output_flags(
    inputs: &InputArgs,
    mapping: Option<&PathBuf>,
    config_path: &Path,
    config: &mut Config,
) -> anyhow::Result<()> {
    let r = &mut config.reverse;
    if let Some(p) = &inputs.out {
        r.output = p.clone();
    }
    if let Some(n) = &inputs.name {
        r.name = n.clone();
    }
    if let Some(m) = mapping {
        r.mapping = m.clone();
    }
    if inputs.save_defaults {
        config.save(config_path)?;
    }
    Ok(())
}

fn finish(summary: BatchSummary) -> anyhow::Result<()> {
    if summary.processed == 0 && summary.errors > 0 {
        anyhow::bail!("every image failed ({} error(s))", summary.errors);
    }
    Ok(())
}

pub fn run(args: ReverseArgs, config_path: &Path, mut config: Config) -> anyhow::Result<()> {
    apply_output_flags(&args.inputs, args.mapping.as_ref(), config_path, &mut config)?;
    let r = &config.reverse;

    let jobs = batch::plan(&args.inputs.files, &args.inputs.folders, &r.output, &r.name)?;

    let t0 = Instant::now();
    let lut = LookupTable::load(&r.mapping)?;
    info!(
        "loaded inverse color mapping with {} entries in {:.3}s",
        lut.patched(),
        t0.elapsed().as_secs_f64()
    );

    finish(batch::run(&jobs, &lut))
}

pub fn run_transparent(args: TransparentArgs, config_path: &Path, mut config: Config) -> anyhow::Result<()> {
    apply_output_flags(&args.inputs, None, config_path, &mut config)?;
    let r = &config.reverse;

    let jobs = batch::plan(&args.inputs.files, &args.inputs.folders, &r.output, &r.name)?;
    let lut = LookupTable::transparent_black();
    finish(batch::run(&jobs, &lut))
}
