// crates/palkey-core/src/mapping/inverse.rs
//
// Inverse mapping text format.
//
// One entry per line:
//   rgb(RRR, GGG, BBB) : rgb(RRR, GGG, BBB)
//   rgb(RRR, GGG, BBB) : rgba(RRR, GGG, BBB, AAA)   (only when target alpha != 255)
// Left side is the color seen in a rendered frame, right side the original color.
// Everything after '#' is a comment. A line that does not split on ':' into exactly
// two pieces is not an entry.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{PalError, Result};
use crate::palette::color::{Color, ColorKey};

pub const MAPPING_FILE_NAME: &str = "inversePaletteMapping.txt";
const SECTION_BREAK: &str = "# =====";
const TIMESTAMP_FORMAT: &str = "%B %d, %Y, %I:%M %p UTC";

const INPUT_DIGEST_LABEL: &str = "# Input palette file BLAKE3 hash:  ";
const OUTPUT_DIGEST_LABEL: &str = "# Output palette file BLAKE3 hash: ";
const TOLERANCE_LABEL: &str = "# Tolerance value used when generating this file: ";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MappingEntry {
    /// Color as it appears in a recolored frame.
    pub key: ColorKey,
    /// Color it stands for.
    pub target: Color,
}

impl MappingEntry {
    pub fn new(key: ColorKey, target: Color) -> Self {
        Self { key, target }
    }
}

impl fmt::Display for MappingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.key, self.target)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Line {
    Entry(MappingEntry),
    /// Comment or blank line; carried verbatim, ignored by the parser.
    Note(String),
}

#[derive(Clone, Debug)]
pub struct MappingHeader {
    pub input_digest: String,
    pub output_digest: String,
    pub total_mappings: usize,
    pub tolerance: u8,
    pub generated_at: DateTime<Utc>,
}

impl MappingHeader {
    fn lines(&self) -> Vec<String> {
        vec![
            "# Inverse palette mapping for custom pal_a.bin".to_string(),
            "# Pass this file as the \"--mapping\" parameter when running \"palkey reverse\".".to_string(),
            String::new(),
            format!("{INPUT_DIGEST_LABEL}{}", self.input_digest),
            format!("{OUTPUT_DIGEST_LABEL}{}", self.output_digest),
            format!("# This file contains {} total color mappings.", self.total_mappings),
            format!("{TOLERANCE_LABEL}{}", self.tolerance),
            format!(
                "# Inverse palette mapping file generated on {}.",
                self.generated_at.format(TIMESTAMP_FORMAT)
            ),
            String::new(),
            SECTION_BREAK.to_string(),
            String::new(),
        ]
    }
}

/// Accumulates entries and annotations in the order the generator produces them.
#[derive(Clone, Debug, Default)]
pub struct InverseMappingBuilder {
    lines: Vec<Line>,
    entry_count: usize,
}

impl InverseMappingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_entry(&mut self, entry: MappingEntry) {
        self.entry_count += 1;
        self.lines.push(Line::Entry(entry));
    }

    /// Adds a `# text` comment line.
    pub fn note(&mut self, text: impl AsRef<str>) {
        self.lines.push(Line::Note(format!("# {}", text.as_ref())));
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::Note(String::new()));
    }

    pub fn section_break(&mut self) {
        self.blank();
        self.lines.push(Line::Note(SECTION_BREAK.to_string()));
        self.blank();
    }

    /// True black becomes fully transparent. Must be the last entry.
    pub fn push_transparency(&mut self) {
        self.note("Transparency");
        self.push_entry(MappingEntry::new(Color::BLACK.key(), Color::TRANSPARENT));
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.lines.iter().filter_map(|l| match l {
            Line::Entry(e) => Some(e),
            Line::Note(_) => None,
        })
    }

    pub fn render(&self, header: &MappingHeader) -> String {
        let mut out = String::with_capacity(32 * (self.lines.len() + 16));
        for l in header.lines() {
            out.push_str(&l);
            out.push('\n');
        }
        for l in &self.lines {
            match l {
                Line::Entry(e) => out.push_str(&e.to_string()),
                Line::Note(s) => out.push_str(s),
            }
            out.push('\n');
        }
        out
    }

    pub fn write(&self, path: &Path, header: &MappingHeader) -> Result<()> {
        std::fs::write(path, self.render(header))?;
        Ok(())
    }
}

/// Entry payload of a line: text before '#', split on ':'.
/// Returns None unless there are exactly two pieces.
fn entry_tokens(line: &str) -> Option<(&str, &str)> {
    let payload = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    let mut it = payload.split(':');
    let a = it.next()?;
    let b = it.next()?;
    if it.next().is_some() {
        return None;
    }
    Some((a.trim(), b.trim()))
}

/// Parse every entry line of a mapping file, in file order.
pub fn parse_entries(text: &str) -> Result<Vec<MappingEntry>> {
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let Some((from, to)) = entry_tokens(line) else {
            continue;
        };
        let from = parse_color(from).ok_or_else(|| PalError::MappingFormat {
            line: i + 1,
            reason: format!("bad color literal {from:?}"),
        })?;
        let to = parse_color(to).ok_or_else(|| PalError::MappingFormat {
            line: i + 1,
            reason: format!("bad color literal {to:?}"),
        })?;
        out.push(MappingEntry::new(from.key(), to));
    }
    Ok(out)
}

pub fn read_entries(path: &Path) -> Result<Vec<MappingEntry>> {
    let text = std::fs::read_to_string(path).map_err(|e| PalError::missing(path, e))?;
    parse_entries(&text)
}

/// CSS-style `rgb(r, g, b)` or `rgba(r, g, b, a)` with integer channels.
pub fn parse_color(token: &str) -> Option<Color> {
    let t = token.trim();
    let open = t.find('(')?;
    let func = t[..open].trim().to_ascii_lowercase();
    let body = t[open + 1..].strip_suffix(')')?;

    let mut ch = [0u8; 4];
    let mut n = 0usize;
    for part in body.split(',') {
        if n == 4 {
            return None;
        }
        ch[n] = part.trim().parse::<u8>().ok()?;
        n += 1;
    }

    match (func.as_str(), n) {
        ("rgb", 3) => Some(Color::rgb(ch[0], ch[1], ch[2])),
        ("rgba", 4) => Some(Color::rgba(ch[0], ch[1], ch[2], ch[3])),
        _ => None,
    }
}

/// Header fields recovered from a mapping file's preamble.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderInfo {
    pub input_digest: Option<String>,
    pub output_digest: Option<String>,
    pub tolerance: Option<u8>,
    pub generated_on: Option<String>,
}

pub fn parse_header(text: &str) -> HeaderInfo {
    let mut h = HeaderInfo::default();
    for line in text.lines() {
        if let Some(v) = line.strip_prefix(INPUT_DIGEST_LABEL) {
            h.input_digest = Some(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix(OUTPUT_DIGEST_LABEL) {
            h.output_digest = Some(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix(TOLERANCE_LABEL) {
            h.tolerance = v.trim().parse().ok();
        } else if let Some(v) = line.strip_prefix("# Inverse palette mapping file generated on ") {
            h.generated_on = Some(v.trim_end_matches('.').to_string());
        } else if line == SECTION_BREAK {
            break;
        }
    }
    h
}
