//! Integration tests for replaying annotation state onto rasters.
//!
//! Covers determinism, layer order, brush independence, reset, base image
//! fitting and PNG export.

use std::io::Cursor;

use base64::Engine;
use booth_core::{Compositor, ImageSource, Point};
use booth_renderer::{
    encode_png, BaseImage, FitPolicy, FontSpec, Frame, Raster, RenderPipeline, RendererConfig,
    Viewport,
};
use proptest::prelude::*;

fn pipeline() -> RenderPipeline {
    pipeline_with(FitPolicy::ScaleDown)
}

fn pipeline_with(fit: FitPolicy) -> RenderPipeline {
    RenderPipeline::new(RendererConfig {
        fit,
        load_system_fonts: false,
        ..RendererConfig::default()
    })
}

/// A solid-colour PNG wrapped in a data URI.
fn solid_png_uri(width: u32, height: u32, rgba: [u8; 4]) -> ImageSource {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).expect("encode");
    let encoded = base64::engine::general_purpose::STANDARD.encode(buf.into_inner());
    ImageSource::new(format!("data:image/png;base64,{encoded}"))
}

fn line(compositor: &mut Compositor, color: &str, size: f32, from: Point, to: Point) {
    let _ = compositor.set_brush(color, size);
    let _ = compositor.begin_draw();
    let _ = compositor.pointer_down(from);
    let _ = compositor.pointer_move(to);
    let _ = compositor.pointer_up();
}

fn render(pipeline: &RenderPipeline, compositor: &Compositor, image: Option<&BaseImage>) -> Raster {
    match pipeline
        .render(compositor.state(), image, Viewport::default())
        .expect("render")
    {
        Frame::Ready(raster) => raster,
        Frame::Deferred => panic!("render unexpectedly deferred"),
    }
}

// ==========================================================================
// Determinism
// ==========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn replay_is_deterministic(
        segments in prop::collection::vec(
            ((0.0f32..300.0, 0.0f32..150.0), (0.0f32..300.0, 0.0f32..150.0), 1.0f32..20.0, any::<u8>()),
            1..12,
        )
    ) {
        let mut compositor = Compositor::new();
        for ((x1, y1), (x2, y2), size, shade) in segments {
            line(
                &mut compositor,
                &format!("#{shade:02x}40{shade:02x}"),
                size,
                Point::new(x1, y1),
                Point::new(x2, y2),
            );
        }

        let pipeline = pipeline();
        let first = render(&pipeline, &compositor, None);
        let second = render(&pipeline, &compositor, None);
        prop_assert_eq!(first.data(), second.data());
        prop_assert_eq!(
            encode_png(&first).expect("png"),
            encode_png(&second).expect("png")
        );
    }
}

// ==========================================================================
// Layer order
// ==========================================================================

#[test]
fn later_stroke_is_drawn_on_top() {
    let pipeline = pipeline();
    let mut compositor = Compositor::new();
    line(&mut compositor, "#ff0000", 10.0, Point::new(50.0, 75.0), Point::new(250.0, 75.0));
    line(&mut compositor, "#0000ff", 10.0, Point::new(150.0, 10.0), Point::new(150.0, 140.0));
    let raster = render(&pipeline, &compositor, None);
    assert_eq!(raster.pixel(150, 75), Some([0, 0, 255, 255]));

    let mut reversed = Compositor::new();
    line(&mut reversed, "#0000ff", 10.0, Point::new(150.0, 10.0), Point::new(150.0, 140.0));
    line(&mut reversed, "#ff0000", 10.0, Point::new(50.0, 75.0), Point::new(250.0, 75.0));
    let raster = render(&pipeline, &reversed, None);
    assert_eq!(raster.pixel(150, 75), Some([255, 0, 0, 255]));
}

#[test]
fn annotations_sit_above_the_base_image() {
    let pipeline = pipeline();
    let source = solid_png_uri(200, 100, [0, 255, 0, 255]);
    let image = BaseImage::load(&source).expect("image");

    let mut compositor = Compositor::new();
    let _ = compositor.set_base_image(source);
    line(&mut compositor, "#ff00ff", 6.0, Point::new(20.0, 50.0), Point::new(180.0, 50.0));

    let raster = render(&pipeline, &compositor, Some(&image));
    assert_eq!((raster.width(), raster.height()), (200, 100));
    assert_eq!(raster.pixel(100, 50), Some([255, 0, 255, 255]));
    assert_eq!(raster.pixel(100, 10), Some([0, 255, 0, 255]));
}

// ==========================================================================
// Brush independence
// ==========================================================================

#[test]
fn brush_change_does_not_alter_earlier_strokes() {
    let pipeline = pipeline();
    let mut compositor = Compositor::new();
    line(&mut compositor, "#ff0000", 4.0, Point::new(20.0, 30.0), Point::new(280.0, 30.0));
    let before = render(&pipeline, &compositor, None);

    line(&mut compositor, "#0000ff", 20.0, Point::new(20.0, 110.0), Point::new(280.0, 110.0));
    let after = render(&pipeline, &compositor, None);

    // First stroke keeps its colour and its 4px width.
    assert_eq!(after.pixel(150, 30), Some([255, 0, 0, 255]));
    assert_eq!(after.pixel(150, 36), Some([0, 0, 0, 0]));
    assert_eq!(after.pixel(150, 30), before.pixel(150, 30));
    assert_eq!(after.pixel(150, 36), before.pixel(150, 36));

    // Second stroke uses the new brush.
    assert_eq!(after.pixel(150, 102), Some([0, 0, 255, 255]));
}

// ==========================================================================
// Reset
// ==========================================================================

#[test]
fn reset_matches_initial_render() {
    let pipeline = pipeline();
    let initial = render(&pipeline, &Compositor::new(), None);

    let source = solid_png_uri(64, 64, [10, 20, 30, 255]);
    let image = BaseImage::load(&source).expect("image");
    let mut compositor = Compositor::new();
    let _ = compositor.set_base_image(source);
    line(&mut compositor, "#ffffff", 5.0, Point::new(0.0, 0.0), Point::new(60.0, 60.0));
    let _ = compositor.arm_text("bye");
    let _ = compositor.pointer_down(Point::new(5.0, 30.0));
    assert!(!render(&pipeline, &compositor, Some(&image)).is_blank());

    let _ = compositor.reset();
    let after_reset = render(&pipeline, &compositor, Some(&image));
    assert_eq!(after_reset, initial);
    assert!(after_reset.is_blank());
}

// ==========================================================================
// Base image fitting
// ==========================================================================

#[test]
fn large_image_is_scaled_down_to_bounds() {
    let pipeline = pipeline();
    let source = solid_png_uri(1600, 400, [0, 0, 255, 255]);
    let image = BaseImage::load(&source).expect("image");
    let mut compositor = Compositor::new();
    let _ = compositor.set_base_image(source);

    let raster = render(&pipeline, &compositor, Some(&image));
    assert_eq!((raster.width(), raster.height()), (800, 200));
    assert_eq!(raster.pixel(400, 100), Some([0, 0, 255, 255]));
}

#[test]
fn contain_leaves_transparent_bars() {
    let pipeline = pipeline_with(FitPolicy::Contain);
    let source = solid_png_uri(100, 100, [255, 255, 0, 255]);
    let image = BaseImage::load(&source).expect("image");
    let mut compositor = Compositor::new();
    let _ = compositor.set_base_image(source);

    let raster = render(&pipeline, &compositor, Some(&image));
    assert_eq!((raster.width(), raster.height()), (800, 600));
    assert_eq!(raster.pixel(10, 300), Some([0, 0, 0, 0]));
    assert_eq!(raster.pixel(400, 300), Some([255, 255, 0, 255]));
}

#[test]
fn cover_fills_the_whole_canvas() {
    let pipeline = pipeline_with(FitPolicy::Cover);
    let source = solid_png_uri(100, 100, [255, 255, 0, 255]);
    let image = BaseImage::load(&source).expect("image");
    let mut compositor = Compositor::new();
    let _ = compositor.set_base_image(source);

    let raster = render(&pipeline, &compositor, Some(&image));
    assert_eq!(raster.pixel(5, 5), Some([255, 255, 0, 255]));
    assert_eq!(raster.pixel(795, 595), Some([255, 255, 0, 255]));
}

#[test]
fn stale_image_defers_render() {
    let pipeline = pipeline();
    let old = BaseImage::load(&solid_png_uri(8, 8, [1, 2, 3, 255])).expect("image");
    let mut compositor = Compositor::new();
    let _ = compositor.set_base_image(ImageSource::new("file:///new/upload.png"));

    let frame = pipeline
        .render(compositor.state(), Some(&old), Viewport::default())
        .expect("render");
    assert_eq!(frame, Frame::Deferred);
}

// ==========================================================================
// Export
// ==========================================================================

#[test]
fn export_without_image_is_blank_png() {
    let pipeline = pipeline();
    let raster = render(&pipeline, &Compositor::new(), None);
    let png = encode_png(&raster).expect("png");
    assert_eq!(&png[0..4], &[137, 80, 78, 71]);

    let decoded = image::load_from_memory(&png).expect("decode").to_rgba8();
    assert_eq!(decoded.dimensions(), (300, 150));
    assert!(decoded.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn stamps_are_recorded_over_an_image() {
    let pipeline = pipeline();
    let source = solid_png_uri(120, 80, [0, 128, 255, 255]);
    let image = BaseImage::load(&source).expect("image");

    let mut compositor = Compositor::new();
    let _ = compositor.set_base_image(source);
    let _ = compositor.arm_stamp("\u{2b50}");
    let _ = compositor.pointer_down(Point::new(10.0, 10.0));
    let _ = compositor.pointer_down(Point::new(20.0, 20.0));

    let stamps = compositor.state().stamps();
    assert_eq!(stamps.len(), 2);
    assert_eq!(stamps[0].position, Point::new(10.0, 10.0));
    assert_eq!(stamps[1].position, Point::new(20.0, 20.0));

    let svg = pipeline
        .render_to_svg(compositor.state(), Some(&image), Viewport::default())
        .expect("svg");
    assert_eq!(svg.matches('\u{2b50}').count(), 2);
    let raster = render(&pipeline, &compositor, Some(&image));
    assert_eq!(raster.pixel(110, 70), Some([0, 128, 255, 255]));
}

#[test]
fn two_stars_are_drawn_over_an_image() {
    let pipeline = pipeline();
    let source = solid_png_uri(120, 80, [0, 128, 255, 255]);
    let image = BaseImage::load(&source).expect("image");

    let mut compositor = Compositor::new();
    let _ = compositor.set_base_image(source);
    place_stamp(&mut compositor, "\u{2605}", Point::new(10.0, 50.0));
    let _ = compositor.pointer_down(Point::new(60.0, 50.0));
    assert_eq!(compositor.state().stamps().len(), 2);

    let raster = render(&pipeline, &compositor, Some(&image));
    // Star centres, about 18px right of and 14px above each baseline origin.
    assert_eq!(raster.pixel(28, 36), Some([0, 0, 0, 255]));
    assert_eq!(raster.pixel(78, 36), Some([0, 0, 0, 255]));
    assert_eq!(raster.pixel(110, 70), Some([0, 128, 255, 255]));
}

// ==========================================================================
// Glyph pixels
// ==========================================================================

fn place_text(compositor: &mut Compositor, text: &str, at: Point) {
    let _ = compositor.arm_text(text);
    let _ = compositor.pointer_down(at);
}

fn place_stamp(compositor: &mut Compositor, glyph: &str, at: Point) {
    let _ = compositor.arm_stamp(glyph);
    let _ = compositor.pointer_down(at);
}

#[test]
fn text_is_white_with_black_outline() {
    let pipeline = RenderPipeline::new(RendererConfig {
        load_system_fonts: false,
        text_font: FontSpec {
            family: "sans-serif".to_string(),
            size: 64.0,
        },
        text_outline_width: 4.0,
        ..RendererConfig::default()
    });
    let mut compositor = Compositor::new();
    place_text(&mut compositor, "I", Point::new(50.0, 100.0));
    let raster = render(&pipeline, &compositor, None);

    // The stem of the "I" crosses row 75 a little right of x = 50.
    let row: Vec<[u8; 4]> = (45..75).filter_map(|x| raster.pixel(x, 75)).collect();
    let white = row
        .iter()
        .any(|&[r, g, b, a]| a == 255 && r >= 245 && g >= 245 && b >= 245);
    let black = row
        .iter()
        .any(|&[r, g, b, a]| a == 255 && r <= 10 && g <= 10 && b <= 10);
    assert!(white, "no white fill in {row:?}");
    assert!(black, "no black outline in {row:?}");

    // Left of the outline stays transparent.
    assert_eq!(raster.pixel(45, 75), Some([0, 0, 0, 0]));
}

#[test]
fn stamp_placed_after_a_stroke_covers_it() {
    let pipeline = pipeline();
    let mut compositor = Compositor::new();
    line(&mut compositor, "#ff0000", 20.0, Point::new(20.0, 66.0), Point::new(280.0, 66.0));
    // A full block spans roughly x 100..131, y 42..90 at 40px.
    place_stamp(&mut compositor, "\u{2588}", Point::new(100.0, 80.0));

    let raster = render(&pipeline, &compositor, None);
    assert_eq!(raster.pixel(115, 66), Some([0, 0, 0, 255]));
    assert_eq!(raster.pixel(200, 66), Some([255, 0, 0, 255]));
}

#[test]
fn text_placed_after_a_stamp_covers_it() {
    let pipeline = pipeline();
    let mut compositor = Compositor::new();
    place_stamp(&mut compositor, "\u{2588}", Point::new(100.0, 80.0));
    let before = render(&pipeline, &compositor, None);
    assert_eq!(before.pixel(114, 66), Some([0, 0, 0, 255]));

    // At 24px the block spans roughly x 105..124, y 52..81.
    place_text(&mut compositor, "\u{2588}", Point::new(105.0, 75.0));
    let after = render(&pipeline, &compositor, None);
    assert_eq!(after.pixel(114, 66), Some([255, 255, 255, 255]));
    // Stamp still shows where the text does not reach.
    assert_eq!(after.pixel(102, 45), Some([0, 0, 0, 255]));
}
