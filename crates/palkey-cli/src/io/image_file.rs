// crates/palkey-cli/src/io/image_file.rs

use std::path::Path;

use anyhow::Context;
use palkey_core::LookupTable;
use tracing::debug;

/// Decode `input` to RGBA8, run it through `lut`, save to `output` (format from extension).
pub fn recolor_file(input: &Path, output: &Path, lut: &LookupTable) -> anyhow::Result<()> {
    let mut img = image::open(input)
        .with_context(|| format!("decode {}", input.display()))?
        .to_rgba8();
    debug!(input = %input.display(), width = img.width(), height = img.height(), "decoded");

    lut.apply(&mut img);

    img.save(output)
        .with_context(|| format!("write {}", output.display()))?;
    Ok(())
}
