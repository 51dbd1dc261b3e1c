// crates/palkey-cli/src/main.rs

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod io;

#[derive(Parser)]
#[command(name = "palkey")]
#[command(about = "Recolor sprite palettes into a keyed gradient and restore captured frames", long_about = None)]
pub struct Cli {
    /// Config file holding saved defaults
    #[arg(long, global = true, default_value = io::config::DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite pal_a.bin with gradient A / black B palettes and write the inverse mapping
    Generate(cmd::generate::GenerateArgs),

    /// Restore original colors in PNG frames using an inverse mapping
    Reverse(cmd::reverse::ReverseArgs),

    /// Turn true black into full transparency in PNG frames
    Transparent(cmd::reverse::TransparentArgs),

    /// Print header and entry statistics of an inverse mapping file
    Inspect(cmd::inspect::InspectArgs),

    /// Gather numbered PNG frames into a looping GIF
    Gif(cmd::gif::GifArgs),
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = io::config::Config::load(&cli.config)?;

    match cli.cmd {
        Commands::Generate(args) => cmd::generate::run(args, &cli.config, config),
        Commands::Reverse(args) => cmd::reverse::run(args, &cli.config, config),
        Commands::Transparent(args) => cmd::reverse::run_transparent(args, &cli.config, config),
        Commands::Inspect(args) => cmd::inspect::run(args, config),
        Commands::Gif(args) => cmd::gif::run(args, &cli.config, config),
    }
}
