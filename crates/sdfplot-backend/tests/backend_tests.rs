//! Integration tests for the translation layer (no GPU required).
//!
//! Most tests drive a `PlotBackend` over a `RecordingRenderer` and check the primitive
//! batches it submits. A `NullRenderer` is used where the built instances matter.

use glam::{Mat4, Vec2, Vec3};
use sdfplot_backend::{BackendConfig, LegacyColor, PlotBackend};
use sdfplot_render::{Color, MarkerType, NullRenderer, PlotRenderer, ScreenRect};
use sdfplot_test_utils::{RecordingRenderer, RenderCall};

const BLUE: LegacyColor = [0.0, 0.0, 0.0, 1.0];
const RED: LegacyColor = [0.0, 1.0, 0.0, 0.0];

fn backend() -> PlotBackend<RecordingRenderer> {
    PlotBackend::new(RecordingRenderer::new())
}

fn rect_outline(b: &mut PlotBackend<RecordingRenderer>, x0: f64, y0: f64, x1: f64, y1: f64) {
    b.draw_path(&[x0, x1], &[y0, y0], BLUE, "-");
    b.draw_path(&[x1, x1], &[y0, y1], BLUE, "-");
    b.draw_path(&[x1, x0], &[y1, y1], BLUE, "-");
    b.draw_path(&[x0, x0], &[y1, y0], BLUE, "-");
}

#[test]
fn test_open_polyline_has_lines_and_joins() {
    let mut b = backend();
    b.new_frame();
    b.draw_path(
        &[0.0, 100.0, 200.0, 300.0, 400.0],
        &[0.0, 100.0, 0.0, 100.0, 0.0],
        BLUE,
        "-",
    );
    b.render_data();

    let r = b.renderer();
    assert_eq!(r.lines().len(), 4);
    assert_eq!(r.circles().len(), 4);
    assert!(r.rects().is_empty());
}

#[test]
fn test_four_segments_become_one_rect() {
    let mut b = backend();
    b.new_frame();
    rect_outline(&mut b, 100.0, 50.0, 300.0, 250.0);
    b.render_data();

    let r = b.renderer();
    let rects = r.rects();
    assert_eq!(rects.len(), 1);
    assert!(r.lines().is_empty());

    // y is flipped into the 600 pixel tall framebuffer.
    let rect = rects[0];
    assert_eq!((rect.x, rect.y, rect.width, rect.height), (100.0, 350.0, 200.0, 200.0));
    assert_eq!(rect.color, Color::BLUE);
}

#[test]
fn test_incomplete_outline_stays_lines() {
    let mut b = backend();
    b.new_frame();
    b.set_line_width(2.5);
    b.draw_path(&[100.0, 300.0], &[50.0, 50.0], BLUE, "-");
    b.draw_path(&[300.0, 300.0], &[50.0, 250.0], BLUE, "-");
    b.draw_path(&[300.0, 100.0], &[250.0, 250.0], BLUE, "-");
    b.render_data();

    let r = b.renderer();
    assert!(r.rects().is_empty());
    let lines = r.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.width == 2.5));
}

#[test]
fn test_closed_path_is_filled() {
    let mut b = backend();
    b.new_frame();
    b.draw_path(
        &[10.0, 60.0, 60.0, 10.0, 10.0],
        &[10.0, 10.0, 40.0, 40.0, 10.0],
        RED,
        "-",
    );
    b.render_data();

    let rects = b.renderer().rects();
    assert_eq!(rects.len(), 1);
    assert_eq!(rects[0].color, Color::RED);
    assert!(b.renderer().lines().is_empty());
}

#[test]
fn test_submission_order() {
    let mut b = backend();
    b.new_frame();
    b.draw_markers(&[10.0], &[10.0], None);
    b.draw_path(&[0.0, 10.0, 20.0], &[0.0, 10.0, 0.0], BLUE, "--");
    b.draw_triangle(&[0.0, 10.0, 0.0], &[0.0, 0.0, 10.0], RED);
    b.draw_background([0.0, 1.0, 1.0, 1.0]);
    b.render_data();

    let kinds: Vec<&str> = b
        .renderer()
        .calls()
        .iter()
        .map(|call| match call {
            RenderCall::Clear(_) => "clear",
            RenderCall::DrawRects { .. } => "rects",
            RenderCall::DrawTriangles { .. } => "triangles",
            RenderCall::DrawLines { .. } => "lines",
            RenderCall::DrawCircles { .. } => "circles",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, ["clear", "rects", "triangles", "lines", "circles"]);
}

#[test]
fn test_empty_groups_are_skipped() {
    let mut b = backend();
    b.new_frame();
    b.draw_path(&[1.0], &[1.0], BLUE, "-");
    b.render_data();

    assert_eq!(b.renderer().call_count(), 1);
    assert_eq!(b.renderer().count_clears(), 1);
}

#[test]
fn test_dashed_path_has_no_joins() {
    let mut b = backend();
    b.new_frame();
    b.draw_path(&[0.0, 30.0, 30.0], &[0.0, 0.0, 40.0], BLUE, ":");
    b.render_data();

    let r = b.renderer();
    assert!(r.circles().is_empty());
    let lines = r.lines();
    assert_eq!((lines[0].dash_len, lines[0].gap_len), (2.0, 2.0));
    assert_eq!(lines[1].dash_offset, 30.0);
}

#[test]
fn test_two_point_dashed_path_keeps_style() {
    let mut b = backend();
    b.new_frame();
    b.draw_path(&[0.0, 800.0], &[300.0, 300.0], BLUE, ":");
    b.render_data();

    let lines = b.renderer().lines();
    assert_eq!(lines.len(), 1);
    assert_eq!((lines[0].dash_len, lines[0].gap_len), (2.0, 2.0));
}

#[test]
fn test_closed_triangle_is_not_filled() {
    let mut b = backend();
    b.new_frame();
    b.draw_path(&[0.0, 10.0, 10.0, 0.0], &[0.0, 0.0, 10.0, 0.0], BLUE, "-");
    b.render_data();

    let r = b.renderer();
    assert!(r.rects().is_empty());
    assert_eq!(r.lines().len(), 3);
}

#[test]
fn test_markers_follow_style() {
    let mut b = backend();
    b.new_frame();
    b.set_marker_style("^");
    b.set_marker_radius(4.0);
    b.draw_markers(&[0.0, 400.0], &[0.0, 300.0], Some(RED));
    b.set_marker_style("unknown");
    b.draw_markers(&[10.0], &[10.0], None);
    b.render_data();

    let circles = b.renderer().circles();
    assert_eq!(circles.len(), 3);
    assert_eq!(circles[0].marker, MarkerType::TriangleUp);
    assert_eq!(circles[0].radius, 4.0);
    assert_eq!(circles[0].color, Color::RED);
    assert_eq!(circles[1].center, Vec3::new(400.0, 300.0, 0.0));
    assert_eq!(circles[2].marker, MarkerType::Circle);
    assert_eq!(circles[2].color, b.config().marker_color);
}

#[test]
fn test_logical_size_scales_into_render_size() {
    let config = BackendConfig::new().with_render_size(1600, 1200);
    let mut b = PlotBackend::with_config(RecordingRenderer::new(), config);
    b.set_width(800);
    b.set_height(600);
    b.new_frame();
    b.draw_markers(&[800.0], &[600.0], None);
    b.render_data();

    let r = b.renderer();
    assert_eq!(r.circles()[0].center, Vec3::new(1600.0, 0.0, 0.0));
    assert_eq!(r.last_screen(), Some(Vec2::new(1600.0, 1200.0)));
}

#[test]
fn test_3d_geometry_is_not_transformed() {
    let mut b = backend();
    b.new_frame();
    b.draw_path_3d(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0], BLUE, "-");
    b.draw_markers_3d(&[0.5], &[0.5], &[0.5], None);
    b.render_data();

    let r = b.renderer();
    let lines = r.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].end, Vec3::ONE);
    // One join plus the marker.
    let circles = r.circles();
    assert_eq!(circles.len(), 2);
    assert_eq!(circles[1].center, Vec3::splat(0.5));
}

#[test]
fn test_constant_image_normalizes_to_zero() {
    let mut b = backend();
    b.new_frame();
    b.draw_image(&[], &[], &[vec![7.0; 3], vec![7.0; 3]]);

    let images = b.renderer().images();
    assert_eq!(images.len(), 1);
    let (image, dest) = &images[0];
    assert_eq!((image.width, image.height), (3, 2));
    assert!(image.values.iter().all(|&v| v == 0.0));
    assert_eq!(*dest, ScreenRect::new(0.0, 0.0, 800.0, 600.0));
}

#[test]
fn test_empty_image_is_ignored() {
    let mut b = backend();
    b.draw_image(&[], &[], &[]);
    assert!(b.renderer().images().is_empty());
}

#[test]
fn test_text_3d_projects_through_view_projection() {
    let mut b = backend();
    b.draw_text_3d("ignored", 0.0, 0.0, 0.0, 12.0, Color::BLACK);
    assert!(b.renderer().texts().is_empty());

    b.set_view_projection(Some(Mat4::IDENTITY));
    b.draw_text_3d("origin", 0.0, 0.0, 0.0, 12.0, Color::BLACK);
    b.draw_text_3d("", 0.0, 0.0, 0.0, 12.0, Color::BLACK);

    let texts = b.renderer().texts();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].position, Vec2::new(400.0, 300.0));
    assert_eq!(texts[0].rotation, 0.0);
    assert!(
        b.renderer()
            .calls()
            .contains(&RenderCall::SetViewProjection(Some(Mat4::IDENTITY)))
    );
}

#[test]
fn test_labels_and_text_width() {
    let config = BackendConfig::new().with_render_size(1600, 1200);
    let mut b = PlotBackend::with_config(RecordingRenderer::new(), config);
    b.set_width(800);
    b.set_height(600);
    b.draw_label("tick", 100.0, 100.0, 14.0, Color::BLACK, 0.5);
    b.draw_text("title", 400.0, 0.0, 20.0, Color::BLACK);

    let texts = b.renderer().texts();
    assert_eq!(texts[0].position, Vec2::new(200.0, 1000.0));
    assert_eq!(texts[0].rotation, 0.5);
    assert_eq!(texts[1].position, Vec2::new(800.0, 1200.0));
    assert_eq!(texts[1].rotation, 0.0);

    // Four characters at half an em are 20 pixels, 10 logical units at scale 2.
    assert_eq!(b.text_width("abcd", 10.0), 10.0);
}

#[test]
fn test_scissor_and_camera_forward() {
    let mut b = backend();
    let clip = ScreenRect::new(10.0, 10.0, 100.0, 50.0);
    b.set_scissor_rect(clip);
    b.set_camera_position(Vec3::new(1.0, 2.0, 3.0));
    b.disable_scissor();

    assert_eq!(
        b.renderer().calls(),
        vec![
            RenderCall::SetScissorRect(clip),
            RenderCall::SetCameraPosition(Vec3::new(1.0, 2.0, 3.0)),
            RenderCall::DisableScissor,
        ]
    );
}

#[test]
fn test_window_state() {
    let mut b = backend();
    assert!(b.is_interactive());
    assert!(!b.supports_fonts());
    assert!(!b.should_close());
    b.set_should_close(true);
    assert!(b.should_close());

    b.set_position_x(20);
    b.set_position_y(30);
    assert_eq!((b.position_x(), b.position_y()), (20, 30));

    b.set_render_size(320, 240);
    assert_eq!((b.render_width(), b.render_height()), (320, 240));
    assert_eq!((b.width(), b.height()), (800, 600));
}

#[test]
fn test_new_frame_clears_with_configured_color() {
    let config = BackendConfig::new().with_clear_color(Color::BLACK);
    let mut b = PlotBackend::with_config(RecordingRenderer::new(), config);
    b.draw_markers(&[1.0], &[1.0], None);
    b.new_frame();
    b.render_data();

    let mut renderer = b.into_renderer();
    assert_eq!(renderer.calls(), vec![RenderCall::Clear(Color::BLACK)]);
    renderer.clear(Color::WHITE);
    assert_eq!(renderer.count_clears(), 2);
}

#[test]
fn test_nan_colors_become_transparent() {
    let nan = Color::rgb(f32::NAN, 0.0, 0.0);
    let (x, y) = ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);

    let mut b = backend();
    b.set_view_projection(Some(Mat4::IDENTITY));
    b.draw_triangle_3d(&x, &y, &[], nan, &[]);
    b.draw_label("label", 10.0, 10.0, 12.0, nan, 0.0);
    b.draw_text("text", 10.0, 10.0, 12.0, nan);
    b.draw_text_3d("world", 0.0, 0.0, 0.0, 12.0, nan);
    b.render_data();

    let r = b.renderer();
    assert_eq!(r.triangles()[0].color, Color::TRANSPARENT);
    let texts = r.texts();
    assert_eq!(texts.len(), 3);
    assert!(texts.iter().all(|t| t.color == Color::TRANSPARENT));
}

#[test]
fn test_nan_triangle_never_reaches_instances() {
    let mut b = PlotBackend::new(NullRenderer::new());
    b.new_frame();
    b.draw_triangle_3d(
        &[0.0, 1.0, 0.0],
        &[0.0, 0.0, 1.0],
        &[],
        Color::rgb(f32::NAN, 0.0, 0.0),
        &[],
    );
    b.render_data();

    let instances = b.renderer().batch().instances();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].color, Color::TRANSPARENT.to_array());
}
