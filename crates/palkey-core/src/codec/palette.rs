// crates/palkey-core/src/codec/palette.rs
//
// Forward direction: rewrite palette segments and record the inverse mapping.
//
// Class policy per character (in this order):
// - button A segments: rainbow, recorded
// - portraits:         black, not recorded
// - extras (non-empty): rainbow, recorded
// - button B segments: black, not recorded
// Then every blank-listed effect palette goes black (not recorded), and the
// true black -> transparent entry closes the mapping.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::defaults::GenerateOptions;
use crate::error::Result;
use crate::mapping::fuzzy::{self, ClaimedColorSet, Expansion};
use crate::mapping::inverse::{InverseMappingBuilder, MappingHeader};
use crate::palette::color::{Color, ColorKey};
use crate::palette::stream::{ColorStream, Constant, Rainbow};
use crate::resource::checksum::digest_hex;
use crate::resource::layout::{CharacterLayout, RosterLayout, Segment};
use crate::validate::{validate_layout, validate_tolerance};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fill {
    /// Next colors from the run's shared rainbow.
    Rainbow,
    /// Solid black.
    Black,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub characters: usize,
    pub segments_recolored: usize,
    pub segments_recorded: usize,
    pub extra_palettes: usize,
    pub effects_blanked: usize,
    pub candidates_examined: usize,
}

/// All mutable state of one generation run. Owned by a single caller and passed
/// `&mut` so every claim sees every earlier claim.
pub struct GenerationContext {
    claimed: ClaimedColorSet,
    rainbow: Rainbow,
    black: Constant,
    mapping: InverseMappingBuilder,
    tolerance: u8,
    report: GenerationReport,
}

impl GenerationContext {
    pub fn new<I>(tolerance: u8, avoid: I) -> Result<Self>
    where
        I: IntoIterator<Item = ColorKey>,
    {
        validate_tolerance(tolerance)?;
        Ok(Self {
            claimed: ClaimedColorSet::new(),
            rainbow: Rainbow::new(avoid),
            black: Constant(Color::BLACK),
            mapping: InverseMappingBuilder::new(),
            tolerance,
            report: GenerationReport::default(),
        })
    }

    pub fn claimed(&self) -> &ClaimedColorSet {
        &self.claimed
    }

    pub fn mapping(&self) -> &InverseMappingBuilder {
        &self.mapping
    }

    /// Record one original/generated pair at the run's tolerance.
    pub fn record(&mut self, original: Color, generated: Color) -> Result<Expansion> {
        let e = fuzzy::expand(
            &mut self.claimed,
            &mut self.mapping,
            original,
            generated,
            self.tolerance,
        )?;
        self.report.candidates_examined += e.examined;
        if self.tolerance > 0 {
            self.mapping.blank();
        }
        Ok(e)
    }

    /// Fill `segment` of `target` from `fill`.
    ///
    /// With `original = Some(bytes)`, each new color is recorded against the color
    /// at the same position of the untouched resource. Returns the colors written.
    pub fn recolor_segment(
        &mut self,
        segment: &Segment,
        fill: Fill,
        original: Option<&[u8]>,
        target: &mut [u8],
    ) -> Result<Vec<Color>> {
        let fresh = match fill {
            Fill::Rainbow => self.rainbow.take_colors(segment.entries)?,
            Fill::Black => self.black.take_colors(segment.entries)?,
        };

        if let Some(src) = original {
            let old = segment.read(src)?;
            for (o, n) in old.iter().zip(&fresh) {
                self.record(*o, *n)?;
            }
            self.report.segments_recorded += 1;
        }

        segment.write(&fresh, target)?;
        self.report.segments_recolored += 1;
        debug!(
            offset = segment.offset,
            entries = segment.entries,
            ?fill,
            recorded = original.is_some(),
            "recolored segment"
        );
        Ok(fresh)
    }

    fn character(&mut self, ch: &CharacterLayout, original: &[u8], target: &mut [u8]) -> Result<()> {
        self.mapping.note(&ch.name);

        // gradient A button palette
        self.mapping.blank();
        self.mapping.note("A button palette segments");
        for (i, s) in ch.button_a.iter().enumerate() {
            self.mapping.blank();
            self.mapping.note(format!(
                "A button palette segment {} (0x{:06X} to 0x{:06X}; {} color entries in original palette)",
                i + 1,
                s.offset,
                s.end()?.saturating_sub(1),
                s.entries
            ));
            self.recolor_segment(s, Fill::Rainbow, Some(original), target)?;
        }
        self.mapping.note("End A button palette segments");
        info!(character = %ch.name, "generated base A button palette");

        for portrait in &ch.portraits {
            for s in portrait {
                self.recolor_segment(s, Fill::Black, None, target)?;
            }
        }

        // extras continue the same gradient; empty slots are skipped
        let mut extras = 0usize;
        for (i, s) in ch.extras.iter().enumerate() {
            if s.is_empty() {
                continue;
            }
            self.mapping.blank();
            self.mapping.note(format!(
                "Extra palette segment {} (0x{:06X} to 0x{:06X}; {} color entries)",
                i + 1,
                s.offset,
                s.end()? - 1,
                s.entries
            ));
            self.recolor_segment(s, Fill::Rainbow, Some(original), target)?;
            extras += 1;
        }
        if extras > 0 {
            info!(character = %ch.name, extras, "generated extra palette(s)");
        } else {
            info!(character = %ch.name, "no extra palettes to generate");
        }
        self.report.extra_palettes += extras;

        for s in &ch.button_b {
            self.recolor_segment(s, Fill::Black, None, target)?;
        }
        info!(character = %ch.name, "generated base B button palette");

        self.mapping.note(format!("End {}", ch.name));
        self.mapping.section_break();
        self.report.characters += 1;
        Ok(())
    }
}

/// Output of a full generation run.
pub struct Generated {
    pub bytes: Vec<u8>,
    pub mapping: InverseMappingBuilder,
    pub report: GenerationReport,
    pub tolerance: u8,
    pub claimed: usize,
}

impl Generated {
    pub fn header(&self, original: &[u8], generated_at: DateTime<Utc>) -> MappingHeader {
        MappingHeader {
            input_digest: digest_hex(original),
            output_digest: digest_hex(&self.bytes),
            total_mappings: self.mapping.entry_count(),
            tolerance: self.tolerance,
            generated_at,
        }
    }

    pub fn render_mapping(&self, original: &[u8], generated_at: DateTime<Utc>) -> String {
        self.mapping.render(&self.header(original, generated_at))
    }
}

/// Recolor every palette in `layout` and build the inverse mapping.
///
/// Any collision or exhaustion aborts the whole run; nothing partial is returned.
pub fn generate_roster(
    original: &[u8],
    layout: &RosterLayout,
    options: &GenerateOptions,
) -> Result<Generated> {
    validate_layout(layout, original.len())?;

    let mut ctx = GenerationContext::new(options.tolerance, options.avoid.iter().copied())?;
    let mut bytes = original.to_vec();

    for ch in &layout.characters {
        ctx.character(ch, original, &mut bytes)?;
    }

    for name in &options.blank_effects {
        let s = layout.effect(name)?;
        ctx.recolor_segment(&s, Fill::Black, None, &mut bytes)?;
        ctx.report.effects_blanked += 1;
        info!(effect = %name, "blanked effect palette (not in inverse mapping)");
    }

    ctx.mapping.push_transparency();

    info!(
        characters = ctx.report.characters,
        segments = ctx.report.segments_recolored,
        recorded = ctx.report.segments_recorded,
        mappings = ctx.mapping.entry_count(),
        tolerance = ctx.tolerance,
        "palette generation finished"
    );

    Ok(Generated {
        bytes,
        claimed: ctx.claimed.len(),
        tolerance: ctx.tolerance,
        report: ctx.report,
        mapping: ctx.mapping,
    })
}
