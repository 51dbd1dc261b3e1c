// crates/palkey-cli/src/cmd/inspect.rs

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;
use palkey_core::mapping::inverse::{parse_entries, parse_header};
use palkey_core::PalError;

use crate::io::config::Config;

#[derive(Args)]
pub struct InspectArgs {
    /// Inverse mapping file (defaults to the configured one)
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,
}

pub fn run(args: InspectArgs, config: Config) -> anyhow::Result<()> {
    let path = args.mapping.unwrap_or(config.reverse.mapping);
    let text = std::fs::read_to_string(&path).map_err(|e| PalError::missing(&path, e))?;

    let header = parse_header(&text);
    let entries = parse_entries(&text)?;

    let distinct: HashSet<_> = entries.iter().map(|e| e.key).collect();
    let targets: HashSet<_> = entries.iter().map(|e| e.target).collect();
    let translucent = entries.iter().filter(|e| e.target.a != 255).count();

    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    println!("mapping_path    = {}", path.display());
    println!("input_digest    = {}", show(&header.input_digest));
    println!("output_digest   = {}", show(&header.output_digest));
    println!(
        "tolerance       = {}",
        header.tolerance.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
    );
    println!("generated_on    = {}", show(&header.generated_on));
    println!("entries         = {}", entries.len());
    println!("distinct_keys   = {}", distinct.len());
    // later duplicates overwrite earlier ones when the table is built
    println!("overridden_keys = {}", entries.len() - distinct.len());
    println!("original_colors = {}", targets.len());
    println!("translucent     = {}", translucent);

    Ok(())
}
