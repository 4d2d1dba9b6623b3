//! The translation layer between a host plotting library and a [`PlotRenderer`].

use glam::{Mat4, Vec2, Vec3};
use sdfplot_core::profiling::{self, profile_function};
use sdfplot_render::{Circle, Color, Line, MarkerType, PlotRenderer, Rect, ScreenRect, Triangle};

use crate::color::{LegacyColor, fix_color, fix_fill_color};
use crate::config::BackendConfig;
use crate::image::{destination, normalize_grid};
use crate::markers::{marker_from_style, style_token};
use crate::path::{RawSegment, closed_rectangle, dash_pattern, polyline};
use crate::reconstruct::reconstruct_rectangles;
use crate::text::project_to_screen;
use crate::transform::ViewTransform;

/// Depth given to 2D triangles.
const FLAT_TRIANGLE_Z: f32 = 0.5;

/// Collects one frame of host draw calls and submits them to a renderer.
///
/// Coordinates arrive in logical units with `y` up and are mapped into the render size
/// with [`ViewTransform`]. Shapes are queued per kind and flushed by
/// [`render_data`](Self::render_data) in the order rects, triangles, lines, circles, after
/// two-point paths have been merged back into rects where possible.
///
/// # Example
///
/// ```
/// use sdfplot_backend::PlotBackend;
/// use sdfplot_render::NullRenderer;
///
/// let mut backend = PlotBackend::new(NullRenderer::new());
/// backend.new_frame();
/// backend.draw_path(&[0.0, 100.0, 200.0], &[0.0, 50.0, 0.0], [0.0, 0.0, 0.0, 1.0], "-");
/// backend.render_data();
/// assert_eq!(backend.renderer().batch().len(), 4);
/// ```
pub struct PlotBackend<R: PlotRenderer> {
    renderer: R,
    config: BackendConfig,

    width: u32,
    height: u32,
    render_width: u32,
    render_height: u32,
    position_x: u32,
    position_y: u32,
    should_close: bool,

    line_width: f32,
    marker_radius: f32,
    marker_color: Color,
    marker_style: MarkerType,
    marker_face: bool,

    rects: Vec<Rect>,
    lines: Vec<Line>,
    circles: Vec<Circle>,
    triangles: Vec<Triangle>,
    pending_segments: Vec<RawSegment>,

    view_proj: Option<Mat4>,
}

impl<R: PlotRenderer> PlotBackend<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, BackendConfig::default())
    }

    /// Create a backend whose logical size starts equal to the configured render size.
    pub fn with_config(renderer: R, config: BackendConfig) -> Self {
        tracing::debug!(
            "PlotBackend created ({}x{})",
            config.render_width,
            config.render_height
        );
        Self {
            renderer,
            width: config.render_width,
            height: config.render_height,
            render_width: config.render_width,
            render_height: config.render_height,
            position_x: 0,
            position_y: 0,
            should_close: false,
            line_width: config.line_width,
            marker_radius: config.marker_radius,
            marker_color: config.marker_color,
            marker_style: config.marker_style,
            marker_face: config.marker_face,
            rects: Vec::new(),
            lines: Vec::new(),
            circles: Vec::new(),
            triangles: Vec::new(),
            pending_segments: Vec::new(),
            view_proj: None,
            config,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn transform(&self) -> ViewTransform {
        ViewTransform::new(
            (self.render_width, self.render_height),
            (self.width, self.height),
        )
    }

    fn screen(&self) -> Vec2 {
        Vec2::new(self.render_width as f32, self.render_height as f32)
    }

    // --- Frame ----------------------------------------------------------------

    /// Drop everything queued and start a new frame on the renderer.
    pub fn new_frame(&mut self) -> bool {
        profiling::new_frame();
        self.rects.clear();
        self.lines.clear();
        self.circles.clear();
        self.triangles.clear();
        self.pending_segments.clear();
        self.renderer.clear(self.config.clear_color);
        true
    }

    /// Reconstruct rects from pending segments and submit the frame's shapes.
    pub fn render_data(&mut self) -> bool {
        profile_function!();

        let segments = std::mem::take(&mut self.pending_segments);
        let merged =
            reconstruct_rectangles(&segments, self.config.segment_tolerance, self.line_width);
        self.rects.extend(merged.rects);
        self.lines.extend(merged.lines);

        let screen = self.screen();
        if !self.rects.is_empty() {
            self.renderer.draw_rects(&self.rects, screen);
        }
        if !self.triangles.is_empty() {
            self.renderer.draw_triangles(&self.triangles, screen);
        }
        if !self.lines.is_empty() {
            self.renderer.draw_lines(&self.lines, screen);
        }
        if !self.circles.is_empty() {
            self.renderer.draw_circles(&self.circles, screen);
        }
        true
    }

    pub fn show(&mut self) {
        self.render_data();
    }

    // --- Window state ---------------------------------------------------------

    pub fn is_interactive(&self) -> bool {
        true
    }

    pub fn should_close(&self) -> bool {
        self.should_close
    }

    pub fn set_should_close(&mut self, should_close: bool) {
        self.should_close = should_close;
    }

    /// The host measures and lays out text itself.
    pub fn supports_fonts(&self) -> bool {
        false
    }

    /// Logical width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    pub fn render_width(&self) -> u32 {
        self.render_width
    }

    pub fn render_height(&self) -> u32 {
        self.render_height
    }

    /// Framebuffer size in pixels.
    pub fn set_render_size(&mut self, width: u32, height: u32) {
        self.render_width = width;
        self.render_height = height;
    }

    pub fn position_x(&self) -> u32 {
        self.position_x
    }

    pub fn position_y(&self) -> u32 {
        self.position_y
    }

    pub fn set_position_x(&mut self, x: u32) {
        self.position_x = x;
    }

    pub fn set_position_y(&mut self, y: u32) {
        self.position_y = y;
    }

    // --- Style ----------------------------------------------------------------

    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Line thickness in pixels for subsequent paths.
    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = width;
    }

    pub fn marker_radius(&self) -> f32 {
        self.marker_radius
    }

    pub fn set_marker_radius(&mut self, radius: f32) {
        self.marker_radius = radius;
    }

    pub fn marker_color(&self) -> Color {
        self.marker_color
    }

    pub fn set_marker_color(&mut self, color: LegacyColor) {
        self.marker_color = fix_color(color);
    }

    pub fn marker_style(&self) -> &'static str {
        style_token(self.marker_style)
    }

    pub fn marker_type(&self) -> MarkerType {
        self.marker_style
    }

    /// Select the marker shape by host style token; unknown tokens draw circles.
    pub fn set_marker_style(&mut self, style: &str) {
        self.marker_style = marker_from_style(style);
    }

    pub fn marker_face(&self) -> bool {
        self.marker_face
    }

    /// Filled markers when true, rings of the current line width otherwise.
    pub fn set_marker_face(&mut self, face: bool) {
        self.marker_face = face;
    }

    // --- Camera and clipping --------------------------------------------------

    /// Switch the renderer into 3D mode with `view_proj`, or back to 2D with `None`.
    pub fn set_view_projection(&mut self, view_proj: Option<Mat4>) {
        self.view_proj = view_proj;
        self.renderer.set_view_projection(view_proj);
    }

    pub fn view_projection(&self) -> Option<Mat4> {
        self.view_proj
    }

    pub fn set_camera_position(&mut self, position: Vec3) {
        self.renderer.set_camera_position(position);
    }

    /// Clip subsequent rendering to `rect`, given in framebuffer pixels.
    pub fn set_scissor_rect(&mut self, rect: ScreenRect) {
        self.renderer.set_scissor_rect(rect);
    }

    pub fn disable_scissor(&mut self) {
        self.renderer.disable_scissor();
    }

    // --- Shapes ---------------------------------------------------------------

    /// Fill the whole framebuffer. Black means no fill.
    pub fn draw_background(&mut self, color: LegacyColor) {
        let screen = self.screen();
        self.rects
            .push(Rect::new(0.0, 0.0, screen.x, screen.y, fix_fill_color(color)));
    }

    /// Fill the logical box spanning `x1..x2` by `y1..y2`. Black means no fill.
    pub fn draw_rectangle(&mut self, x1: f64, x2: f64, y1: f64, y2: f64, color: LegacyColor) {
        let r = self.transform().apply_box(x1, y1, x2, y2);
        self.rects
            .push(Rect::new(r.x, r.y, r.width, r.height, fix_fill_color(color)));
    }

    /// Draw a 2D polyline through the logical points `(x[i], y[i])`.
    ///
    /// `style` selects a dash pattern. Paths tracing the four corners of a box become filled
    /// rects, two-point paths are held back for rectangle reconstruction, and longer paths
    /// become capsules with round joins. Fewer than two points draw nothing.
    pub fn draw_path(&mut self, x: &[f64], y: &[f64], color: LegacyColor, style: &str) {
        let count = x.len().min(y.len());
        if count < 2 {
            return;
        }
        let transform = self.transform();

        if self.config.fill_closed_rectangles
            && let Some([x0, y0, x1, y1]) = closed_rectangle(&x[..count], &y[..count])
        {
            let r = transform.apply_box(x0, y0, x1, y1);
            self.rects
                .push(Rect::new(r.x, r.y, r.width, r.height, fix_fill_color(color)));
            return;
        }

        if count == 2 {
            let segment = RawSegment::new(
                transform.apply(x[0], y[0]),
                transform.apply(x[1], y[1]),
                fix_color(color),
            );
            self.pending_segments.push(segment.with_dash(dash_pattern(style)));
            return;
        }

        let points: Vec<Vec3> = (0..count).map(|i| transform.apply3(x[i], y[i])).collect();
        self.push_polyline(&points, fix_color(color), style);
    }

    /// Draw a polyline through world-space points; they pass to the renderer unchanged.
    pub fn draw_path_3d(
        &mut self,
        x: &[f64],
        y: &[f64],
        z: &[f64],
        color: LegacyColor,
        style: &str,
    ) {
        let count = x.len().min(y.len()).min(z.len());
        if count < 2 {
            return;
        }
        let points: Vec<Vec3> = (0..count)
            .map(|i| Vec3::new(x[i] as f32, y[i] as f32, z[i] as f32))
            .collect();
        self.push_polyline(&points, fix_color(color), style);
    }

    fn push_polyline(&mut self, points: &[Vec3], color: Color, style: &str) {
        let out = polyline(points, self.line_width, color, dash_pattern(style));
        self.lines.extend(out.lines);
        self.circles.extend(out.joins);
    }

    fn marker(&self, center: Vec3, color: Option<LegacyColor>) -> Circle {
        let color = color.map_or(self.marker_color, fix_color);
        let marker = Circle::new(center, self.marker_radius, color).with_marker(self.marker_style);
        if self.marker_face {
            marker
        } else {
            marker.with_stroke(self.line_width)
        }
    }

    /// Place one marker of the current style at each logical point.
    ///
    /// `None` uses the configured marker color.
    pub fn draw_markers(&mut self, x: &[f64], y: &[f64], color: Option<LegacyColor>) {
        let transform = self.transform();
        let count = x.len().min(y.len());
        for i in 0..count {
            let circle = self.marker(transform.apply3(x[i], y[i]), color);
            self.circles.push(circle);
        }
    }

    /// Place markers at world-space points without transforming them.
    pub fn draw_markers_3d(&mut self, x: &[f64], y: &[f64], z: &[f64], color: Option<LegacyColor>) {
        let count = x.len().min(y.len()).min(z.len());
        for i in 0..count {
            let center = Vec3::new(x[i] as f32, y[i] as f32, z[i] as f32);
            let circle = self.marker(center, color);
            self.circles.push(circle);
        }
    }

    /// Fill the triangle through the first three logical points. Black means no fill.
    pub fn draw_triangle(&mut self, x: &[f64], y: &[f64], color: LegacyColor) {
        if x.len() < 3 || y.len() < 3 {
            return;
        }
        let transform = self.transform();
        let vertices = [0, 1, 2].map(|i| transform.apply(x[i], y[i]).extend(FLAT_TRIANGLE_Z));
        self.triangles
            .push(Triangle::new(vertices, fix_fill_color(color), false));
    }

    /// Add a lit world-space triangle.
    ///
    /// `normals` holds nine values (one normal per vertex) or three (shared by all
    /// vertices); anything else keeps the default `+Z`. Missing `z` values default to 0.5.
    pub fn draw_triangle_3d(
        &mut self,
        x: &[f64],
        y: &[f64],
        z: &[f64],
        color: Color,
        normals: &[f64],
    ) {
        if x.len() < 3 || y.len() < 3 {
            return;
        }
        let vertices = [0, 1, 2].map(|i| {
            let vz = z.get(i).map_or(FLAT_TRIANGLE_Z, |&v| v as f32);
            Vec3::new(x[i] as f32, y[i] as f32, vz)
        });
        let normal = |i: usize| {
            Vec3::new(normals[i] as f32, normals[i + 1] as f32, normals[i + 2] as f32)
        };
        let normals = match normals.len() {
            n if n >= 9 => [normal(0), normal(3), normal(6)],
            n if n >= 3 => [normal(0); 3],
            _ => [Vec3::Z; 3],
        };
        self.triangles
            .push(Triangle::new(vertices, color.sanitized(), true).with_normals(normals));
    }

    // --- Text -----------------------------------------------------------------

    /// Draw `text` with its baseline starting at logical `(x, y)`.
    ///
    /// `font_size` is in pixels and `rotation` in radians, counter-clockwise.
    pub fn draw_label(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font_size: f32,
        color: Color,
        rotation: f32,
    ) {
        if text.is_empty() {
            return;
        }
        let anchor = self.transform().apply(x, y);
        self.renderer
            .draw_text(text, anchor, font_size, color.sanitized(), rotation);
    }

    /// Unrotated [`draw_label`](Self::draw_label).
    pub fn draw_text(&mut self, text: &str, x: f64, y: f64, font_size: f32, color: Color) {
        self.draw_label(text, x, y, font_size, color, 0.0);
    }

    /// Width of `text` at `font_size` pixels, in logical units.
    pub fn text_width(&self, text: &str, font_size: f32) -> f64 {
        let px = self.renderer.measure_text(text, font_size);
        f64::from(self.transform().inverse_len(px))
    }

    /// Draw `text` anchored at a world-space point, using the current view-projection.
    ///
    /// Does nothing in 2D mode, for empty text, or when the point is behind the camera.
    pub fn draw_text_3d(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        z: f32,
        font_size: f32,
        color: Color,
    ) {
        let Some(view_proj) = self.view_proj else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let screen = self.screen();
        if let Some(anchor) = project_to_screen(view_proj, Vec3::new(x, y, z), screen.x, screen.y) {
            let color = color.sanitized();
            self.renderer.draw_text(text, anchor, font_size, color, 0.0);
        }
    }

    // --- Images ---------------------------------------------------------------

    /// Draw the scalar field `z` colormapped over the logical area spanned by `x` and `y`.
    ///
    /// The field is normalized by its own min and max. Empty fields draw nothing.
    pub fn draw_image(&mut self, x: &[Vec<f64>], y: &[Vec<f64>], z: &[Vec<f64>]) {
        let Some(image) = normalize_grid(z) else {
            return;
        };
        let dest = destination(x, y, (self.width, self.height), &self.transform());
        self.renderer.draw_image(&image, dest);
    }
}

impl<R: PlotRenderer + Default> Default for PlotBackend<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdfplot_render::NullRenderer;

    const BLACK: LegacyColor = [0.0, 0.0, 0.0, 0.0];
    const BLUE: LegacyColor = [0.0, 0.0, 0.0, 1.0];

    fn backend() -> PlotBackend<NullRenderer> {
        PlotBackend::new(NullRenderer::new())
    }

    #[test]
    fn logical_size_starts_at_render_size() {
        let config = BackendConfig::new().with_render_size(640, 480);
        let b = PlotBackend::with_config(NullRenderer::new(), config);
        assert_eq!((b.width(), b.height()), (640, 480));
        assert_eq!((b.render_width(), b.render_height()), (640, 480));
    }

    #[test]
    fn new_frame_drops_queued_shapes() {
        let mut b = backend();
        b.draw_path(&[0.0, 10.0], &[0.0, 10.0], BLUE, "-");
        b.draw_markers(&[1.0], &[1.0], None);
        b.new_frame();
        assert!(b.pending_segments.is_empty());
        assert!(b.circles.is_empty());
    }

    #[test]
    fn closed_path_becomes_fill() {
        let mut b = backend();
        b.draw_path(&[10.0, 50.0, 50.0, 10.0, 10.0], &[5.0, 5.0, 30.0, 30.0, 5.0], BLUE, "-");
        assert_eq!(b.rects.len(), 1);
        assert!(b.lines.is_empty());
        assert_eq!(b.rects[0].color, Color::BLUE);
    }

    #[test]
    fn closed_path_stays_outline_when_disabled() {
        let config = BackendConfig::new().with_fill_closed_rectangles(false);
        let mut b = PlotBackend::with_config(NullRenderer::new(), config);
        b.draw_path(&[10.0, 50.0, 50.0, 10.0, 10.0], &[5.0, 5.0, 30.0, 30.0, 5.0], BLUE, "-");
        assert!(b.rects.is_empty());
        assert_eq!(b.lines.len(), 4);
    }

    #[test]
    fn short_paths_are_ignored() {
        let mut b = backend();
        b.draw_path(&[], &[], BLUE, "-");
        b.draw_path(&[1.0], &[1.0], BLUE, "-");
        b.draw_path(&[1.0, 2.0], &[1.0], BLUE, "-");
        assert!(b.lines.is_empty() && b.pending_segments.is_empty());
    }

    #[test]
    fn hollow_markers_use_line_width() {
        let mut b = backend();
        b.set_line_width(3.0);
        b.set_marker_face(false);
        b.set_marker_style("d");
        b.draw_markers(&[1.0], &[2.0], Some(BLACK));
        let m = b.circles[0];
        assert_eq!(m.stroke_width, 3.0);
        assert_eq!(m.marker, MarkerType::Diamond);
        assert_eq!(m.color, Color::BLACK);
    }

    #[test]
    fn triangle_normals_broadcast() {
        let mut b = backend();
        let (x, y) = ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]);
        b.draw_triangle_3d(&x, &y, &[], Color::RED, &[1.0, 0.0, 0.0]);
        b.draw_triangle_3d(&x, &y, &[1.0, 2.0, 3.0], Color::RED, &[]);
        assert_eq!(b.triangles[0].normals, [Vec3::X; 3]);
        assert_eq!(b.triangles[0].vertices[0].z, FLAT_TRIANGLE_Z);
        assert_eq!(b.triangles[1].normals, [Vec3::Z; 3]);
        assert_eq!(b.triangles[1].vertices[2].z, 3.0);
        assert!(b.triangles.iter().all(|t| t.lit));
    }

    #[test]
    fn flat_triangle_is_transformed_and_unlit() {
        let mut b = backend();
        b.draw_triangle(&[0.0, 100.0, 0.0], &[0.0, 0.0, 100.0], BLUE);
        let t = b.triangles[0];
        assert!(!t.lit);
        assert_eq!(t.vertices[0], Vec3::new(0.0, 600.0, FLAT_TRIANGLE_Z));
        assert_eq!(t.vertices[2], Vec3::new(0.0, 500.0, FLAT_TRIANGLE_Z));
    }

    #[test]
    fn marker_color_setter_uses_legacy_layout() {
        let mut b = backend();
        b.set_marker_color([0.0, 0.0, 1.0, 0.0]);
        assert_eq!(b.marker_color(), Color::GREEN);
        b.set_marker_style("p");
        assert_eq!(b.marker_style(), "*");
    }
}
