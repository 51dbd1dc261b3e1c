// crates/palkey-cli/src/io/animation.rs
//
// Numbered PNG frames -> looping GIF.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use tracing::{debug, warn};

/// NeuQuant speed for the per-frame palette; 1 is slowest, 30 fastest.
const GIF_SPEED: i32 = 10;

/// Last run of ASCII digits in the file name.
pub fn frame_number(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    let end = name.rfind(|c: char| c.is_ascii_digit())? + 1;
    let start = name[..end]
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|i| i + 1)
        .unwrap_or(0);
    name[start..end].parse().ok()
}

/// The numbered `*.png` files of `folder`, in frame order.
pub fn collect_frames(folder: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(folder)
        .with_context(|| format!("read folder {}", folder.display()))?;

    let mut numbered = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let p = entry.path();
        let is_png = p
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !p.is_file() || !is_png {
            continue;
        }
        match frame_number(&p) {
            Some(n) => numbered.push((n, p)),
            None => warn!(path = %p.display(), "skipping png without a frame number"),
        }
    }
    numbered.sort();
    Ok(numbered.into_iter().map(|(_, p)| p).collect())
}

/// 1-based inclusive frame selection: `start..=pause`, then `restart..=end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRange {
    pub start: usize,
    pub pause: usize,
    pub restart: usize,
    pub end: usize,
}

impl FrameRange {
    /// Resolve the shorthand forms against `count` frames:
    /// `end < start` means "to the last frame", `pause == restart` means no gap.
    pub fn resolve(self, count: usize) -> Self {
        let start = self.start.max(1);
        let end = if self.end < start { count } else { self.end };
        let (pause, restart) = if self.pause == self.restart {
            (start, start + 1)
        } else {
            (self.pause, self.restart)
        };
        Self {
            start,
            pause,
            restart,
            end,
        }
    }

    pub fn select<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let r = self.resolve(items.len());
        let span = |from: usize, to: usize| {
            let lo = from.saturating_sub(1).min(items.len());
            let hi = to.min(items.len()).max(lo);
            &items[lo..hi]
        };
        let mut out = span(r.start, r.pause).to_vec();
        out.extend_from_slice(span(r.restart, r.end));
        out
    }
}

/// Milliseconds between frames from `20`, `1000/50`, `50fps` or `60 fps`.
pub fn parse_gap(text: &str) -> anyhow::Result<f64> {
    let t = text.trim();
    let num = |s: &str| -> anyhow::Result<f64> {
        s.trim()
            .parse::<f64>()
            .with_context(|| format!("bad frame gap {text:?}"))
    };
    let ms = if let Some((a, b)) = t.split_once('/') {
        num(a)? / num(b)?
    } else if let Some(fps) = t.strip_suffix("fps") {
        1000.0 / num(fps)?
    } else {
        num(t)?
    };
    if !ms.is_finite() || ms <= 0.0 {
        anyhow::bail!("frame gap must be a positive duration, got {text:?}");
    }
    Ok(ms)
}

/// Bounds of the non-transparent pixels as `(x0, y0, x1, y1)`, end-exclusive.
pub fn opaque_bounds(img: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut b: Option<(u32, u32, u32, u32)> = None;
    for (x, y, px) in img.enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        b = Some(match b {
            None => (x, y, x + 1, y + 1),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
        });
    }
    b
}

/// Crop every frame to the union of their opaque bounds. Frames with nothing
/// visible do not widen the box; if none has anything, frames stay as they are.
pub fn crop_to_union(frames: Vec<RgbaImage>) -> Vec<RgbaImage> {
    let union = frames
        .iter()
        .filter_map(opaque_bounds)
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)));
    let Some((x0, y0, x1, y1)) = union else {
        return frames;
    };
    debug!(x0, y0, x1, y1, "cropping frames to union bounds");
    frames
        .iter()
        .map(|f| image::imageops::crop_imm(f, x0, y0, x1 - x0, y1 - y0).to_image())
        .collect()
}

/// `<dir>/<name>.gif`, or `<name>#2.gif`, `<name>#3.gif`... if taken.
pub fn free_output_path(dir: &Path, name: &str) -> PathBuf {
    let mut path = dir.join(format!("{name}.gif"));
    let mut j = 2;
    while path.exists() {
        path = dir.join(format!("{name}#{j}.gif"));
        j += 1;
    }
    path
}

/// Encode `frames` as an endlessly looping GIF with `gap_ms` between frames.
pub fn write_gif(frames: Vec<RgbaImage>, gap_ms: f64, path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_saturating_duration(Duration::from_secs_f64(gap_ms / 1000.0));
    for img in frames {
        encoder
            .encode_frame(Frame::from_parts(img, 0, 0, delay))
            .with_context(|| format!("encode frame into {}", path.display()))?;
    }
    Ok(())
}
