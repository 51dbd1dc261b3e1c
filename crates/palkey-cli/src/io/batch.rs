// crates/palkey-cli/src/io/batch.rs
//
// Input expansion and the per-image loop. One bad image is logged and counted;
// it never stops the rest of the batch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use palkey_core::LookupTable;
use rayon::prelude::*;
use tracing::{error, info};

use crate::io::image_file;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub errors: usize,
}

fn is_png(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false)
}

fn output_name(prefix: &str, input: &Path) -> anyhow::Result<String> {
    let base = input
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("input has no usable file name: {}", input.display()))?;
    Ok(format!("{prefix}{base}"))
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        info!(dir = %dir.display(), "created output directory");
    }
    Ok(())
}

/// Expand loose files and folders into input/output pairs.
///
/// - files land directly in `out_dir`
/// - every `*.png` of a folder lands in `out_dir/<folder name>/`
/// - output file name = `prefix` + input file name
///
/// Two inputs that would land on the same output path are rejected; jobs run in
/// parallel and would race on the file.
pub fn plan(
    files: &[PathBuf],
    folders: &[PathBuf],
    out_dir: &Path,
    prefix: &str,
) -> anyhow::Result<Vec<Job>> {
    if files.is_empty() && folders.is_empty() {
        anyhow::bail!("no input images given (use --files and/or --folders)");
    }
    ensure_dir(out_dir)?;

    let mut jobs = Vec::new();
    for f in files {
        jobs.push(Job {
            input: f.clone(),
            output: out_dir.join(output_name(prefix, f)?),
        });
    }

    for folder in folders {
        let entries = std::fs::read_dir(folder)
            .with_context(|| format!("read folder {}", folder.display()))?;
        let mut pngs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && is_png(p))
            .collect();
        pngs.sort();

        let sub = match folder.file_name() {
            Some(n) => out_dir.join(n),
            None => out_dir.to_path_buf(),
        };
        ensure_dir(&sub)?;
        for p in pngs {
            let output = sub.join(output_name(prefix, &p)?);
            jobs.push(Job { input: p, output });
        }
    }

    let mut seen: HashMap<&Path, &Path> = HashMap::new();
    for job in &jobs {
        if let Some(first) = seen.insert(&job.output, &job.input) {
            anyhow::bail!(
                "{} and {} would both be written to {}",
                first.display(),
                job.input.display(),
                job.output.display()
            );
        }
    }

    Ok(jobs)
}

/// Run every job against `lut`. Images are independent, so they go in parallel.
pub fn run(jobs: &[Job], lut: &LookupTable) -> BatchSummary {
    let t0 = Instant::now();

    let results: Vec<bool> = jobs
        .par_iter()
        .map(|job| {
            let t = Instant::now();
            match image_file::recolor_file(&job.input, &job.output, lut) {
                Ok(()) => {
                    info!(
                        output = %job.output.display(),
                        secs = t.elapsed().as_secs_f64(),
                        "wrote output image file"
                    );
                    true
                }
                Err(e) => {
                    error!(input = %job.input.display(), "error while processing image file: {e:#}");
                    false
                }
            }
        })
        .collect();

    let processed = results.iter().filter(|ok| **ok).count();
    let summary = BatchSummary {
        processed,
        errors: results.len() - processed,
    };
    info!(
        "processed {} image file(s) with {} error(s) in {:.3}s",
        summary.processed,
        summary.errors,
        t0.elapsed().as_secs_f64()
    );
    summary
}
