//! Integration tests for the Affiche rendering pipeline.
//!
//! These tests exercise the full path from markup to a written image. They
//! run against an empty font library, so every line uses the built-in block
//! face and the numbers are exact:
//! - Free height is shared by weight
//! - Style groups share one font size
//! - `Npx` and `biggest` lines size themselves
//! - The stack is centered, overflow included
//! - Images keep their aspect ratio
//! - Output files are valid PNG/JPEG

use std::path::Path;

use affiche::font::FontLibrary;
use affiche::layout::{Layout, LayoutEngine, PlacedKind};
use affiche::markup::MarkupParser;
use affiche::resources::Resources;
use affiche::AfficheError;

// ─── Helpers ────────────────────────────────────────────────────

fn layout_markup(source: &str) -> Layout {
    layout_markup_in(source, Path::new("."))
}

fn layout_markup_in(source: &str, base_dir: &Path) -> Layout {
    let fonts = FontLibrary::empty();
    let document = MarkupParser::new(&fonts)
        .base_dir(base_dir)
        .parse(source)
        .unwrap();
    let resources = Resources::load(&document, &fonts).unwrap();
    LayoutEngine::new().layout(&document, &resources).unwrap()
}

fn font_size(layout: &Layout, index: usize) -> f64 {
    match layout.elements[index].kind {
        PlacedKind::Text { font_size } => font_size,
        other => panic!("element {index} is not text: {other:?}"),
    }
}

fn write_png(path: &Path, width: u32, height: u32) {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([30, 144, 255, 255]));
    img.save(path).unwrap();
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ─── Height Sharing ─────────────────────────────────────────────

#[test]
fn test_two_lines_share_height_and_center() {
    let layout = layout_markup("!size 1000x1000\n!margin 10%\nA\nB");
    assert_eq!(font_size(&layout, 0), 320.0);
    assert_eq!(font_size(&layout, 0), font_size(&layout, 1));

    let measured_total = layout.elements[0].height + layout.elements[1].height;
    assert!(approx(layout.elements[0].y, 100.0 + (800.0 - measured_total) / 2.0));
    assert!(approx(layout.elements[0].y, 180.0));
}

#[test]
fn test_blank_spacer_gets_quarter_share() {
    let layout = layout_markup("!size 500x625\n!margin 0\n\nHello");
    assert!(matches!(layout.elements[0].kind, PlacedKind::Blank));
    assert!(approx(layout.elements[0].height, 625.0 * 0.25 / 1.25));
}

#[test]
fn test_bigger_lines_get_larger_sizes() {
    let layout = layout_markup("!size 1000x1000\n!margin 0\nA size=bigger\nB\nC size=smaller");
    assert!(font_size(&layout, 0) > font_size(&layout, 1));
    assert!(font_size(&layout, 1) > font_size(&layout, 2));
}

// ─── Font Sizing ────────────────────────────────────────────────

#[test]
fn test_style_group_shares_size_and_fits_width() {
    let layout = layout_markup(
        "!size 600x900\n!margin 5%\nShort\nA considerably longer line of poster text\nMid length",
    );
    let size = font_size(&layout, 0);
    assert_eq!(font_size(&layout, 1), size);
    assert_eq!(font_size(&layout, 2), size);
    for element in &layout.elements {
        assert!(element.width <= layout.area.width + 1e-9);
    }
}

#[test]
fn test_pixel_size_is_exact_on_any_canvas() {
    for canvas in ["!size 300x300", "!size 2000x1200", "!size 800x3000\n!margin 25%"] {
        let layout = layout_markup(&format!("{canvas}\nFixed size=37px\nOther text"));
        assert_eq!(font_size(&layout, 0), 37.0, "{canvas}");
    }
}

#[test]
fn test_biggest_fills_usable_width() {
    let layout = layout_markup("!size 1000x1000\n!margin 0\nHELLO size=biggest");
    let line = &layout.elements[0];
    assert!((line.width - 1000.0).abs() < 0.5, "width {}", line.width);
    assert!(approx(line.x, 0.0));
}

#[test]
fn test_fonts_switch_groups() {
    let layout = layout_markup("!size 1000x1000\nAAAAAAAAAA\n!font Other\nA");
    // Different font identities are fitted independently.
    assert!(font_size(&layout, 1) > font_size(&layout, 0));
}

// ─── Composition ────────────────────────────────────────────────

#[test]
fn test_exact_fill_has_zero_slack() {
    let layout = layout_markup("!size 400x200\n!margin 20\nx size=160px");
    assert_eq!(layout.slack, 0.0);
    assert_eq!(layout.elements[0].y, 20.0);
}

#[test]
fn test_overflow_is_centered_not_fatal() {
    let layout = layout_markup("!size 400x400\n!margin 0\na size=300px\nb size=300px");
    assert!(approx(layout.slack, -200.0));
    assert!(approx(layout.elements[0].y, -100.0));
    assert!(approx(layout.elements[1].y + layout.elements[1].height, 500.0));
}

#[test]
fn test_alignment_in_markup() {
    let layout = layout_markup(
        "!size 1000x1000\n!margin 50\nab size=10px alignment=left\nab size=10px alignment=right",
    );
    assert!(approx(layout.elements[0].x, 50.0));
    assert!(approx(layout.elements[1].x, 1000.0 - 50.0 - 12.0));
}

// ─── Images ─────────────────────────────────────────────────────

#[test]
fn test_width_only_image_keeps_aspect_ratio() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("logo.png"), 40, 20);

    let layout = layout_markup_in("!size 1000x1000\n!margin 0\nlogo.png width=50%\nCaption", dir.path());
    let image = &layout.elements[0];
    assert_eq!(image.kind, PlacedKind::Image);
    assert_eq!(image.width, 500.0);
    assert_eq!(image.height, 250.0);
    assert!(approx(image.x, 250.0));
}

#[test]
fn test_implicit_image_is_contained() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("square.png"), 1000, 1000);

    let layout = layout_markup_in("!size 800x400\n!margin 0\nsquare.png", dir.path());
    let image = &layout.elements[0];
    assert_eq!((image.width, image.height), (400.0, 400.0));
    assert!(approx(image.x, 200.0));
}

#[test]
fn test_implicit_image_is_never_enlarged() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("square.png"), 10, 10);

    let layout = layout_markup_in("!size 800x400\n!margin 0\nsquare.png", dir.path());
    let image = &layout.elements[0];
    assert_eq!((image.width, image.height), (10.0, 10.0));
    assert!(approx(image.x, 395.0));

    // Asking for a height scales it up.
    let layout = layout_markup_in("!size 800x400\n!margin 0\nsquare.png height=100", dir.path());
    assert_eq!((layout.elements[0].width, layout.elements[0].height), (100.0, 100.0));
}

#[test]
fn test_missing_image_aborts_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("poster.png");
    let result = affiche::render_markup("Hello\nnot-there.png", dir.path(), &FontLibrary::empty());
    assert!(matches!(result, Err(AfficheError::Image { .. })));
    assert!(!out.exists());
}

// ─── Output ─────────────────────────────────────────────────────

#[test]
fn test_render_markup_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("logo.png"), 16, 8);
    let source = "!size 320x480\n!background_color #222222\nTITLE size=biggest color=white\n\nlogo.png\nsmall print size=smaller";

    let poster = affiche::render_markup(source, dir.path(), &FontLibrary::empty()).unwrap();
    let out = dir.path().join("poster.png");
    poster.save(&out).unwrap();

    let written = image::open(&out).unwrap().to_rgba8();
    assert_eq!(written.dimensions(), (320, 480));
    // Corners are background.
    assert_eq!(written.get_pixel(0, 0).0, [0x22, 0x22, 0x22, 255]);
    assert_eq!(written.get_pixel(319, 479).0, [0x22, 0x22, 0x22, 255]);
}

#[test]
fn test_render_markup_writes_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let poster = affiche::render_markup("Hello", dir.path(), &FontLibrary::empty()).unwrap();
    let out = dir.path().join("poster.jpeg");
    poster.save(&out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(image::open(&out).unwrap().to_rgb8().dimensions(), (1024, 1536));
}

#[test]
fn test_background_image_is_stretched() {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("bg.png"), 3, 3);
    let poster = affiche::render_markup(
        "!size 90x60\n!background_image bg.png",
        dir.path(),
        &FontLibrary::empty(),
    )
    .unwrap();
    assert_eq!(poster.image.get_pixel(0, 0).0, [30, 144, 255, 255]);
    assert_eq!(poster.image.get_pixel(89, 59).0, [30, 144, 255, 255]);
}

#[test]
fn test_render_json_document() {
    let json = r#"{
        "canvas": { "width": 400, "height": 300, "margin": { "Pixels": 10 } },
        "elements": [
            { "type": "Text", "text": "From JSON", "size": { "FontPx": 24 } },
            { "type": "Blank" }
        ]
    }"#;
    let poster = affiche::render_json(json, &FontLibrary::empty()).unwrap();
    assert_eq!(poster.image.dimensions(), (400, 300));
    assert_eq!(poster.layout.elements[0].height, 24.0);
}

#[test]
fn test_bad_json_has_hint() {
    let err = affiche::render_json("{ \"elements\": [ }", &FontLibrary::empty()).unwrap_err();
    assert!(matches!(err, AfficheError::Json { .. }));
    assert!(err.to_string().contains("Hint"));
}

#[test]
fn test_markup_error_reports_line() {
    let err = affiche::render_markup("ok\nfine\nbad size=enormous", Path::new("."), &FontLibrary::empty())
        .unwrap_err();
    assert_eq!(err.to_string(), "line 3: invalid size 'enormous'");
}

#[test]
fn test_non_finite_sizes_are_rejected() {
    for (source, expected) in [("A size=NaN\nB", 1), ("A size=inf\nB", 1), ("A\nlogo.png height=NaN", 2)] {
        match affiche::render_markup(source, Path::new("."), &FontLibrary::empty()) {
            Err(AfficheError::Markup { line, .. }) => assert_eq!(line, expected, "{source}"),
            other => panic!("expected a markup error for {source:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_json_with_negative_font_size_is_rejected() {
    let json = r#"{ "elements": [ { "type": "Text", "text": "x", "size": { "FontPx": -5 } } ] }"#;
    let err = affiche::render_json(json, &FontLibrary::empty()).unwrap_err();
    assert!(matches!(err, AfficheError::InvalidElement { index: 0, .. }));
}

#[test]
fn test_degenerate_margin_is_geometry_error() {
    let err = affiche::render_markup("!size 100x100\n!margin 50%\nHi", Path::new("."), &FontLibrary::empty())
        .unwrap_err();
    assert!(matches!(err, AfficheError::Geometry(_)));
}

#[test]
fn test_layout_dump_is_json() {
    let layout = layout_markup("!size 200x100\nHi\n");
    let json: serde_json::Value = serde_json::to_value(&layout).unwrap();
    assert_eq!(json["canvasWidth"], 200);
    assert_eq!(json["elements"][0]["kind"]["type"], "text");
    assert!(json["slack"].is_number());
}
