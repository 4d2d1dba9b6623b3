//! CPU-only [`PlotRenderer`] that builds the same instance batch and draw plan as the GPU
//! renderer without touching a device.

use glam::{Mat4, Vec2, Vec3};

use crate::Color;
use crate::batch::{DrawCommand, InstanceBatch};
use crate::font_atlas::{FontAtlas, fallback_measure};
use crate::instance::{Instance, Uniforms};
use crate::renderer::{Circle, ImageData, Line, PlotRenderer, Rect, ScreenRect, Triangle};

#[derive(Debug, Default)]
pub struct NullRenderer {
    batch: InstanceBatch,
    font: Option<FontAtlas>,
    screen: Vec2,
    view_proj: Option<Mat4>,
    camera_pos: Vec3,
    scissor: Option<ScreenRect>,
    clear_color: Color,
    images: Vec<ImageData>,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out text with `font` instead of skipping it.
    pub fn with_font(font: FontAtlas) -> Self {
        Self {
            font: Some(font),
            ..Self::default()
        }
    }

    pub fn batch(&self) -> &InstanceBatch {
        &self.batch
    }

    /// Sort the batch and return the draws the GPU renderer would issue.
    pub fn plan(&mut self) -> Vec<DrawCommand> {
        self.batch.plan()
    }

    /// Uniforms the GPU renderer would upload for the last seen screen size.
    pub fn uniforms(&self) -> Uniforms {
        Uniforms::new(
            self.screen.x as u32,
            self.screen.y as u32,
            self.view_proj,
            self.camera_pos,
        )
    }

    pub fn images(&self) -> &[ImageData] {
        &self.images
    }

    pub fn scissor(&self) -> Option<ScreenRect> {
        self.scissor
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }
}

impl PlotRenderer for NullRenderer {
    fn set_view_projection(&mut self, view_proj: Option<Mat4>) {
        self.view_proj = view_proj;
    }

    fn set_camera_position(&mut self, position: Vec3) {
        self.camera_pos = position;
    }

    fn set_scissor_rect(&mut self, rect: ScreenRect) {
        self.scissor = Some(rect);
    }

    fn disable_scissor(&mut self) {
        self.scissor = None;
    }

    fn draw_rects(&mut self, rects: &[Rect], screen: Vec2) {
        self.screen = screen;
        self.batch.extend(rects.iter().map(Rect::to_instance));
    }

    fn draw_lines(&mut self, lines: &[Line], screen: Vec2) {
        self.screen = screen;
        self.batch.extend(lines.iter().map(Line::to_instance));
    }

    fn draw_circles(&mut self, circles: &[Circle], screen: Vec2) {
        self.screen = screen;
        self.batch.extend(circles.iter().map(Circle::to_instance));
    }

    fn draw_triangles(&mut self, triangles: &[Triangle], screen: Vec2) {
        self.screen = screen;
        self.batch.extend(triangles.iter().map(Triangle::to_instance));
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color, rotation: f32) {
        if let Some(font) = &self.font {
            self.batch
                .extend(font.layout(text, position, size, color, rotation));
        }
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        match &self.font {
            Some(font) => font.measure(text, size),
            None => fallback_measure(text, size),
        }
    }

    fn clear(&mut self, color: Color) {
        self.batch.clear();
        self.images.clear();
        self.scissor = None;
        self.clear_color = color.sanitized();
    }

    fn draw_image(&mut self, image: &ImageData, dest: ScreenRect) {
        if !image.is_valid() {
            return;
        }
        let dest = dest.normalized();
        self.batch
            .push_image(Instance::image(dest.x, dest.y, dest.width, dest.height));
        self.images.push(image.clone());
    }
}
