// crates/palkey-cli/tests/generate_reverse_roundtrip.rs

use std::fs;
use std::io::BufReader;
use std::path::Path;
use std::process::{Command, Output};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder, Rgba, RgbaImage};
use palkey_core::resource::layout::Segment;
use palkey_core::Color;

const LAYOUT: &str = r#"
[[character]]
name = "Terry"
button_a = [{ offset = 0x00, entries = 4 }]
button_b = [{ offset = 0x08, entries = 4 }]
portraits = [[{ offset = 0x10, entries = 2 }]]
"#;

const CONFIG: &str = "[generate]\nblank_effects = []\n";

fn palkey() -> Command {
    Command::new(env!("CARGO_BIN_EXE_palkey"))
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("spawn command")
}

fn run_ok(cmd: &mut Command) -> Output {
    let out = run(cmd);
    assert!(
        out.status.success(),
        "command failed: status={:?}\nstdout:\n{}\nstderr:\n{}",
        out.status.code(),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    out
}

fn write_fixture(root: &Path) {
    let src = root.join("src");
    fs::create_dir_all(&src).unwrap();
    let mut pal = Vec::new();
    for i in 0..16u16 {
        pal.extend_from_slice(&(0x0421 * (i % 8) + 3).to_le_bytes());
    }
    fs::write(src.join("pal_a.bin"), pal).unwrap();
    fs::write(root.join("layout.toml"), LAYOUT).unwrap();
    fs::write(root.join("palkey.toml"), CONFIG).unwrap();
}

fn generate(root: &Path, tolerance: &str) {
    run_ok(palkey().current_dir(root).args([
        "--config",
        "palkey.toml",
        "generate",
        "--input",
        "src",
        "--out",
        "out",
        "--layout",
        "layout.toml",
        "--tolerance",
        tolerance,
    ]));
}

fn frame_of(colors: &[Color]) -> RgbaImage {
    let mut img = RgbaImage::new(colors.len() as u32, 1);
    for (x, c) in colors.iter().enumerate() {
        img.put_pixel(x as u32, 0, Rgba([c.r, c.g, c.b, c.a]));
    }
    img
}

#[test]
fn generate_then_reverse_restores_original_colors() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_fixture(root);
    generate(root, "1");

    let original = fs::read(root.join("src/pal_a.bin")).unwrap();
    let recolored = fs::read(root.join("out/pal_a.bin")).unwrap();
    let mapping = fs::read_to_string(root.join("out/inversePaletteMapping.txt")).unwrap();
    assert!(mapping.contains("# Tolerance value used when generating this file: 1"));
    assert!(mapping.contains("# Terry"));

    let a = Segment::new(0x00, 4);
    let b = Segment::new(0x08, 4);
    assert!(b.read(&recolored).unwrap().iter().all(|c| *c == Color::BLACK));

    // shown colors, nudged by one step the way lossy capture would
    let mut shown: Vec<Color> = a.read(&recolored).unwrap();
    shown[1].b = shown[1].b.saturating_sub(1);
    shown.push(Color::BLACK);
    let mut expected = a.read(&original).unwrap();
    expected.push(Color::TRANSPARENT);

    let frames = root.join("frames");
    fs::create_dir_all(&frames).unwrap();
    frame_of(&shown).save(frames.join("good.png")).unwrap();
    fs::write(frames.join("broken.png"), b"not a png").unwrap();

    let out = run_ok(palkey().current_dir(root).args([
        "--config",
        "palkey.toml",
        "reverse",
        "--folders",
        "frames",
        "--mapping",
        "out/inversePaletteMapping.txt",
        "--out",
        "restored",
        "--name",
        "r_",
    ]));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("processed 1 image file(s) with 1 error(s)"), "{stderr}");

    let restored = image::open(root.join("restored/frames/r_good.png")).unwrap().to_rgba8();
    let got: Vec<Color> = restored
        .pixels()
        .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn transparent_only_clears_true_black() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("palkey.toml"), CONFIG).unwrap();
    frame_of(&[
        Color::BLACK,
        Color::rgb(0, 0, 1),
        Color::rgb(9, 9, 9),
        Color::rgba(40, 50, 60, 128),
    ])
    .save(root.join("shot.png"))
    .unwrap();

    run_ok(palkey().current_dir(root).args([
        "--config",
        "palkey.toml",
        "transparent",
        "--files",
        "shot.png",
        "--out",
        "clear",
    ]));

    let img = image::open(root.join("clear/shot.png")).unwrap().to_rgba8();
    let alphas: Vec<u8> = img.pixels().map(|p| p[3]).collect();
    assert_eq!(alphas, vec![0, 255, 255, 128]);
}

#[test]
fn generate_refuses_same_input_and_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_fixture(root);

    let out = run(palkey().current_dir(root).args([
        "--config",
        "palkey.toml",
        "generate",
        "--input",
        "src",
        "--out",
        "src",
        "--layout",
        "layout.toml",
    ]));
    assert!(!out.status.success());
    assert!(!root.join("src/inversePaletteMapping.txt").exists());
}

#[test]
fn tolerance_above_three_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let out = run(palkey().current_dir(dir.path()).args(["generate", "--tolerance", "4"]));
    assert!(!out.status.success());
}

#[test]
fn save_defaults_persists_tolerance() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_fixture(root);

    run_ok(palkey().current_dir(root).args([
        "--config",
        "palkey.toml",
        "generate",
        "--input",
        "src",
        "--out",
        "out",
        "--layout",
        "layout.toml",
        "--tolerance",
        "0",
        "--save-defaults",
    ]));

    let saved = fs::read_to_string(root.join("palkey.toml")).unwrap();
    assert!(saved.contains("tolerance = 0"), "{saved}");
    assert!(saved.contains("blank_effects = []"), "{saved}");

    // second run relies on the saved values only
    run_ok(palkey().current_dir(root).args(["--config", "palkey.toml", "generate"]));
    let mapping = fs::read_to_string(root.join("out/inversePaletteMapping.txt")).unwrap();
    assert!(mapping.contains("# Tolerance value used when generating this file: 0"));
}

#[test]
fn inspect_reports_entry_counts() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_fixture(root);
    generate(root, "0");

    let out = run_ok(palkey().current_dir(root).args([
        "inspect",
        "--mapping",
        "out/inversePaletteMapping.txt",
    ]));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("entries         = 5"), "{stdout}");
    assert!(stdout.contains("translucent     = 1"), "{stdout}");
    assert!(stdout.contains("tolerance       = 0"), "{stdout}");
}

fn sprite_frame(x: u32, y: u32) -> RgbaImage {
    let mut img = RgbaImage::new(8, 8);
    img.put_pixel(x, y, Rgba([200, 40, 40, 255]));
    img
}

fn decode_gif(path: &Path) -> ((u32, u32), usize) {
    let decoder = GifDecoder::new(BufReader::new(fs::File::open(path).unwrap())).unwrap();
    let dims = decoder.dimensions();
    let frames = decoder.into_frames().collect_frames().unwrap();
    (dims, frames.len())
}

#[test]
fn gif_gathers_numbered_frames_and_crops() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let frames = root.join("restored");
    fs::create_dir_all(&frames).unwrap();
    sprite_frame(2, 3).save(frames.join("r_1.png")).unwrap();
    sprite_frame(5, 4).save(frames.join("r_2.png")).unwrap();
    sprite_frame(3, 6).save(frames.join("r_10.png")).unwrap();

    let args = ["gif", "--input", "restored", "--out", "anim", "--gap", "50fps"];
    run_ok(palkey().current_dir(root).args(args).arg("--crop"));
    assert_eq!(decode_gif(&root.join("anim/GIF.gif")), ((4, 4), 3));

    // second run keeps the first file and skips frame 1, uncropped
    run_ok(palkey().current_dir(root).args(args).args(["--start", "2"]));
    assert_eq!(decode_gif(&root.join("anim/GIF#2.gif")), ((8, 8), 2));
}

#[test]
fn gif_without_frames_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("empty")).unwrap();
    let out = run(palkey().current_dir(dir.path()).args(["gif", "--input", "empty"]));
    assert!(!out.status.success());
}
