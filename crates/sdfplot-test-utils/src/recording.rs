//! Recording implementation of `PlotRenderer` for testing.

use glam::{Mat4, Vec2, Vec3};
use parking_lot::Mutex;
use sdfplot_render::{
    Circle, Color, ImageData, Line, PlotRenderer, Rect, ScreenRect, TextCommand, Triangle,
};

/// Records a renderer call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    SetViewProjection(Option<Mat4>),
    SetCameraPosition(Vec3),
    SetScissorRect(ScreenRect),
    DisableScissor,
    DrawRects { rects: Vec<Rect>, screen: Vec2 },
    DrawLines { lines: Vec<Line>, screen: Vec2 },
    DrawCircles { circles: Vec<Circle>, screen: Vec2 },
    DrawTriangles { triangles: Vec<Triangle>, screen: Vec2 },
    DrawText(TextCommand),
    MeasureText { text: String, size: f32 },
    Clear(Color),
    DrawImage { image: ImageData, dest: ScreenRect },
}

/// Renderer double that keeps every call.
///
/// Calls are stored behind a `Mutex` so `measure_text`, which only gets `&self`, is
/// recorded too.
pub struct RecordingRenderer {
    calls: Mutex<Vec<RenderCall>>,
    /// Advance per character as a fraction of the font size.
    char_advance: f32,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            char_advance: 0.5,
        }
    }

    /// Measure text as `chars * size * advance`.
    pub fn with_char_advance(mut self, advance: f32) -> Self {
        self.char_advance = advance;
        self
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }

    /// Clear recorded calls (useful between test steps).
    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Every rect drawn, in submission order.
    pub fn rects(&self) -> Vec<Rect> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawRects { rects, .. } => Some(rects.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn lines(&self) -> Vec<Line> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawLines { lines, .. } => Some(lines.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn circles(&self) -> Vec<Circle> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawCircles { circles, .. } => Some(circles.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn triangles(&self) -> Vec<Triangle> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawTriangles { triangles, .. } => Some(triangles.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn texts(&self) -> Vec<TextCommand> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawText(cmd) => Some(cmd.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<(ImageData, ScreenRect)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RenderCall::DrawImage { image, dest } => Some((image.clone(), *dest)),
                _ => None,
            })
            .collect()
    }

    /// Count clear calls (frame starts).
    pub fn count_clears(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| matches!(call, RenderCall::Clear(_)))
            .count()
    }

    /// Screen size passed with the most recent shape batch.
    pub fn last_screen(&self) -> Option<Vec2> {
        self.calls.lock().iter().rev().find_map(|call| match call {
            RenderCall::DrawRects { screen, .. }
            | RenderCall::DrawLines { screen, .. }
            | RenderCall::DrawCircles { screen, .. }
            | RenderCall::DrawTriangles { screen, .. } => Some(*screen),
            _ => None,
        })
    }

    fn record(&self, call: RenderCall) {
        self.calls.lock().push(call);
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotRenderer for RecordingRenderer {
    fn set_view_projection(&mut self, view_proj: Option<Mat4>) {
        self.record(RenderCall::SetViewProjection(view_proj));
    }

    fn set_camera_position(&mut self, position: Vec3) {
        self.record(RenderCall::SetCameraPosition(position));
    }

    fn set_scissor_rect(&mut self, rect: ScreenRect) {
        self.record(RenderCall::SetScissorRect(rect));
    }

    fn disable_scissor(&mut self) {
        self.record(RenderCall::DisableScissor);
    }

    fn draw_rects(&mut self, rects: &[Rect], screen: Vec2) {
        self.record(RenderCall::DrawRects {
            rects: rects.to_vec(),
            screen,
        });
    }

    fn draw_lines(&mut self, lines: &[Line], screen: Vec2) {
        self.record(RenderCall::DrawLines {
            lines: lines.to_vec(),
            screen,
        });
    }

    fn draw_circles(&mut self, circles: &[Circle], screen: Vec2) {
        self.record(RenderCall::DrawCircles {
            circles: circles.to_vec(),
            screen,
        });
    }

    fn draw_triangles(&mut self, triangles: &[Triangle], screen: Vec2) {
        self.record(RenderCall::DrawTriangles {
            triangles: triangles.to_vec(),
            screen,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color, rotation: f32) {
        self.record(RenderCall::DrawText(TextCommand {
            text: text.to_string(),
            position,
            size,
            color,
            rotation,
        }));
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        self.record(RenderCall::MeasureText {
            text: text.to_string(),
            size,
        });
        text.chars().count() as f32 * size * self.char_advance
    }

    fn clear(&mut self, color: Color) {
        self.record(RenderCall::Clear(color));
    }

    fn draw_image(&mut self, image: &ImageData, dest: ScreenRect) {
        self.record(RenderCall::DrawImage {
            image: image.clone(),
            dest,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut r = RecordingRenderer::new();
        r.clear(Color::WHITE);
        r.draw_lines(&[], Vec2::ONE);
        r.disable_scissor();
        let calls = r.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], RenderCall::Clear(Color::WHITE));
        assert_eq!(calls[2], RenderCall::DisableScissor);
    }

    #[test]
    fn measure_is_recorded_through_shared_ref() {
        let r = RecordingRenderer::new().with_char_advance(1.0);
        assert_eq!(r.measure_text("abc", 10.0), 30.0);
        assert_eq!(r.call_count(), 1);
    }

    #[test]
    fn flattens_batches() {
        let mut r = RecordingRenderer::new();
        let c = Circle::new(Vec3::ZERO, 1.0, Color::RED);
        r.draw_circles(&[c, c], Vec2::new(10.0, 20.0));
        r.draw_circles(&[c], Vec2::new(30.0, 40.0));
        assert_eq!(r.circles().len(), 3);
        assert_eq!(r.last_screen(), Some(Vec2::new(30.0, 40.0)));
        r.clear_calls();
        assert_eq!(r.call_count(), 0);
    }
}
