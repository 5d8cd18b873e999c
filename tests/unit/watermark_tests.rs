// Watermark compositor tests through the public API

use image::{Rgba, RgbaImage};
use rstest::rstest;
use std::sync::Arc;

use dwg2img::watermark::{WatermarkCompositor, WatermarkError, WatermarkSpec, WatermarkStyle};

use super::common::{BoxFace, WHITE};

fn compositor() -> WatermarkCompositor {
    WatermarkCompositor::new(Arc::new(BoxFace { advance: 0.5 }), WatermarkStyle::default())
}

fn spec(lines: &[&str]) -> WatermarkSpec {
    WatermarkSpec::new(lines.iter().map(|s| s.to_string()).collect()).unwrap()
}

#[test]
fn test_empty_line_list_rejected() {
    let err = WatermarkSpec::new(Vec::new()).unwrap_err();
    assert!(matches!(err, WatermarkError::NoLines));
}

#[rstest]
// Width bound: 10 chars * 0.5 * s <= 1100 - 100 -> s <= 200
#[case::width_bound(1100, 4000, "0123456789", 200)]
// Height bound: s * 0.8 * 3 <= 600 -> s <= 250
#[case::height_bound(4000, 600, "ab", 250)]
// Roomy image caps at the largest size
#[case::capped(4000, 4000, "ab", 300)]
// Nothing fits: smallest size is used anyway
#[case::floor(50, 50, "a long watermark line", 100)]
fn test_font_size_selection(
    #[case] width: u32,
    #[case] height: u32,
    #[case] line: &str,
    #[case] expected: u32,
) {
    assert_eq!(compositor().choose_font_size(width, height, &spec(&[line])), expected);
}

#[test]
fn test_layout_repeats_lines_and_centers_them() {
    // 2 lines -> 5 rendered rows, slot = 1200 / 6 = 200
    let layout = compositor().layout(2000, 1200, &spec(&["abcd", "ab"]));

    let texts: Vec<&str> = layout.lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["abcd", "ab", "abcd", "ab", "abcd"]);

    // Height bound: s * 0.8 * 5 <= 1200 -> s <= 300
    assert_eq!(layout.font_size, 300);
    assert_eq!(layout.lines[0].x, (2000.0 - 600.0) / 2.0);
    assert_eq!(layout.lines[1].x, (2000.0 - 300.0) / 2.0);
    for (k, line) in layout.lines.iter().enumerate() {
        assert_eq!(line.y, 200.0 * (k as f32 + 1.0) - 150.0);
    }
}

#[test]
fn test_apply_blends_translucently_and_keeps_size() {
    let image = RgbaImage::from_pixel(1000, 1000, WHITE);
    let stamped = compositor().apply(&image, &spec(&["x"]));

    assert_eq!(stamped.dimensions(), (1000, 1000));
    // Centre of the first line: 25 * 215 + 230 * 255 over 255, rounded
    let center = *stamped.get_pixel(500, 250);
    assert_eq!(center, Rgba([251, 251, 251, 255]));
    // Outside every line box
    assert_eq!(*stamped.get_pixel(5, 5), WHITE);
}

#[test]
fn test_apply_does_not_touch_input() {
    let image = RgbaImage::from_pixel(400, 400, WHITE);
    let before = image.clone();
    let _ = compositor().apply(&image, &spec(&["x"]));
    assert_eq!(image, before);
}
