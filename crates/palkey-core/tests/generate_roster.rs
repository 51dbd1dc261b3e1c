// crates/palkey-core/tests/generate_roster.rs

use chrono::{TimeZone, Utc};
use palkey_core::defaults::default_avoid;
use palkey_core::mapping::inverse::parse_entries;
use palkey_core::resource::layout::Segment;
use palkey_core::{
    generate_roster, Color, Fill, GenerateOptions, GenerationContext, LookupTable, PalError,
    RosterLayout,
};

const LAYOUT: &str = r#"
[[character]]
name = "Kyo"
button_a = [{ offset = 0x000, entries = 4 }, { offset = 0x008, entries = 2 }]
button_b = [{ offset = 0x010, entries = 4 }]
portraits = [[{ offset = 0x020, entries = 4 }]]
extras = [{ offset = 0x030, entries = 3 }, { offset = 0x040, entries = 0 }]

[[character]]
name = "Iori"
button_a = [{ offset = 0x080 }]
button_b = [{ offset = 0x0A0, entries = 4 }]

[[effect]]
name = "MAX Flash"
offset = 0x100
entries = 4

[[effect]]
name = "Untouched"
offset = 0x110
entries = 4
"#;

// 4 + 2 + 3 (Kyo) + 16 (Iori, default length)
const RECORDED_COLORS: usize = 25;

fn resource() -> Vec<u8> {
    let mut b = Vec::with_capacity(0x200);
    for i in 0..0x100u32 {
        let packed = ((i * 37 + 5) & 0x7FFF) as u16;
        b.extend_from_slice(&packed.to_le_bytes());
    }
    b
}

fn layout() -> RosterLayout {
    RosterLayout::from_toml_str(LAYOUT).expect("layout parses")
}

fn options(tolerance: u8) -> GenerateOptions {
    GenerateOptions {
        tolerance,
        blank_effects: vec!["MAX Flash".to_string()],
        ..GenerateOptions::default()
    }
}

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap()
}

#[test]
fn tolerance_zero_counts_and_blackouts() {
    let original = resource();
    let layout = layout();
    let g = generate_roster(&original, &layout, &options(0)).unwrap();

    assert_eq!(g.mapping.entry_count(), RECORDED_COLORS + 1);
    assert_eq!(g.claimed, g.mapping.entry_count());
    assert_eq!(g.report.characters, 2);
    assert_eq!(g.report.extra_palettes, 1);
    assert_eq!(g.report.effects_blanked, 1);

    let kyo = layout.character("Kyo").unwrap();
    for s in kyo.button_b.iter().chain(kyo.portraits.iter().flatten()) {
        assert!(s.read(&g.bytes).unwrap().iter().all(|c| *c == Color::BLACK));
    }
    let flash = layout.effect("MAX Flash").unwrap();
    assert!(flash.read(&g.bytes).unwrap().iter().all(|c| *c == Color::BLACK));

    let untouched = layout.effect("Untouched").unwrap();
    assert_eq!(untouched.read(&g.bytes).unwrap(), untouched.read(&original).unwrap());

    // transparency is the final entry
    let last = g.mapping.entries().last().copied().unwrap();
    assert_eq!(last.key, Color::BLACK.key());
    assert_eq!(last.target, Color::TRANSPARENT);
    assert_eq!(g.mapping.entries().filter(|e| e.target.a != 255).count(), 1);
}

#[test]
fn rainbow_cursor_runs_across_segments() {
    let original = resource();
    let layout = layout();
    let g = generate_roster(&original, &layout, &options(0)).unwrap();

    let kyo = layout.character("Kyo").unwrap();
    let iori = layout.character("Iori").unwrap();
    let mut bases = Vec::new();
    for s in kyo.button_a.iter().chain(kyo.extras.iter()).chain(iori.button_a.iter()) {
        bases.extend(s.read(&g.bytes).unwrap());
    }
    assert_eq!(bases.len(), RECORDED_COLORS);

    let mut keys: Vec<_> = bases.iter().map(|c| c.key()).collect();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), RECORDED_COLORS, "a base color was reused");
}

#[test]
fn tolerance_two_expands_every_recorded_color() {
    let original = resource();
    let g = generate_roster(&original, &layout(), &options(2)).unwrap();
    // early rainbow colors sit at R=G=255, so their cubes are clamped
    assert_eq!(g.report.candidates_examined, RECORDED_COLORS * 125);
    assert!(g.mapping.entry_count() > RECORDED_COLORS * 27);
    assert!(g.mapping.entry_count() <= RECORDED_COLORS * 125 + 1);
    assert_eq!(g.claimed, g.mapping.entry_count());
}

#[test]
fn generated_frames_restore_to_original_colors() {
    let original = resource();
    let layout = layout();
    let g = generate_roster(&original, &layout, &options(0)).unwrap();
    let text = g.render_mapping(&original, fixed_time());
    let lut = LookupTable::from_mapping_text(&text).unwrap();

    let kyo = layout.character("Kyo").unwrap();
    let iori = layout.character("Iori").unwrap();
    let mut shown = Vec::new();
    let mut expected = Vec::new();
    for s in kyo.button_a.iter().chain(kyo.extras.iter()).chain(iori.button_a.iter()) {
        shown.extend(s.read(&g.bytes).unwrap());
        expected.extend(s.read(&original).unwrap());
    }
    shown.push(Color::BLACK);
    expected.push(Color::TRANSPARENT);

    let mut pixels: Vec<u8> = shown.iter().flat_map(|c| c.to_rgba_word().to_le_bytes()).collect();
    lut.apply(&mut pixels);

    let restored: Vec<Color> = pixels
        .chunks_exact(4)
        .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
        .collect();
    assert_eq!(restored, expected);
}

#[test]
fn rendered_mapping_is_deterministic_and_reparses() {
    let original = resource();
    let layout = layout();
    let a = generate_roster(&original, &layout, &options(1)).unwrap();
    let b = generate_roster(&original, &layout, &options(1)).unwrap();
    assert_eq!(a.bytes, b.bytes);

    let ta = a.render_mapping(&original, fixed_time());
    let tb = b.render_mapping(&original, fixed_time());
    assert_eq!(ta, tb);

    assert!(ta.contains(&format!(
        "# This file contains {} total color mappings.",
        a.claimed
    )));
    assert!(ta.contains("# Tolerance value used when generating this file: 1"));
    assert!(ta.contains("generated on March 09, 2024, 02:05 PM UTC."));
    assert!(ta.contains("# Kyo"));
    assert!(ta.contains("# End Iori"));

    // entry lines survive parse + re-render byte for byte
    let entry_lines: Vec<&str> = ta.lines().filter(|l| l.starts_with("rgb(")).collect();
    let parsed = parse_entries(&ta).unwrap();
    let rerendered: Vec<String> = parsed.iter().map(|e| e.to_string()).collect();
    assert_eq!(entry_lines, rerendered);
}

#[test]
fn header_digests_track_input_and_output() {
    let original = resource();
    let g = generate_roster(&original, &layout(), &options(0)).unwrap();
    let h = g.header(&original, fixed_time());
    assert_eq!(h.input_digest.len(), 64);
    assert_ne!(h.input_digest, h.output_digest);
    assert_eq!(h.input_digest, h.input_digest.to_ascii_uppercase());
}

#[test]
fn constant_black_segment_records_nothing() {
    let mut ctx = GenerationContext::new(2, default_avoid()).unwrap();
    let mut bytes = resource();
    let seg = Segment::new(0x40, 4);

    let written = ctx.recolor_segment(&seg, Fill::Black, None, &mut bytes).unwrap();
    assert_eq!(written, vec![Color::BLACK; 4]);
    assert_eq!(seg.read(&bytes).unwrap(), vec![Color::rgba(0, 0, 0, 255); 4]);
    assert_eq!(ctx.mapping().entry_count(), 0);
    assert_eq!(ctx.claimed().len(), 1);
}

#[test]
fn unknown_blank_effect_is_an_error() {
    let mut opts = options(0);
    opts.blank_effects.push("Nope".to_string());
    let err = generate_roster(&resource(), &layout(), &opts).err().unwrap();
    assert!(matches!(err, PalError::UnknownPalette(ref n) if n == "Nope"));
}

#[test]
fn tolerance_above_bound_is_rejected() {
    let err = generate_roster(&resource(), &layout(), &options(4)).err().unwrap();
    assert!(matches!(err, PalError::Validation(_)));
}

#[test]
fn layout_outside_resource_is_rejected() {
    let short = vec![0u8; 0x40];
    let err = generate_roster(&short, &layout(), &options(0)).err().unwrap();
    assert!(matches!(err, PalError::SegmentOutOfBounds { .. }));
}

#[test]
fn overflowing_segment_is_a_layout_error() {
    let err = Segment::new(usize::MAX, 1).read(&resource()).err().unwrap();
    assert!(matches!(err, PalError::Layout(_)), "{err}");
    let err = Segment::new(0, usize::MAX).end().err().unwrap();
    assert!(matches!(err, PalError::Layout(_)), "{err}");

    let huge = RosterLayout::from_toml_str(
        r#"
[[character]]
name = "Big"
button_a = [{ offset = 9223372036854775807, entries = 9223372036854775807 }]
button_b = []
"#,
    )
    .unwrap();
    let err = generate_roster(&resource(), &huge, &options(0)).err().unwrap();
    assert!(matches!(err, PalError::Layout(_)), "{err}");
}
