use sdfplot_render::{Color, MarkerType};

/// Initial state of a [`PlotBackend`](crate::PlotBackend).
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Framebuffer width in pixels.
    pub render_width: u32,
    /// Framebuffer height in pixels.
    pub render_height: u32,
    /// Line thickness in pixels.
    pub line_width: f32,
    /// Marker radius in pixels.
    pub marker_radius: f32,
    /// Used by `draw_markers` when no color is given.
    pub marker_color: Color,
    pub marker_style: MarkerType,
    /// Filled markers when true, rings of `line_width` otherwise.
    pub marker_face: bool,
    /// Pixel tolerance for matching rectangle edges.
    pub segment_tolerance: f32,
    /// Turn closed four-corner paths into filled rects.
    pub fill_closed_rectangles: bool,
    /// Color passed to the renderer at `new_frame`.
    pub clear_color: Color,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            render_width: 800,
            render_height: 600,
            line_width: 1.0,
            marker_radius: 6.0,
            marker_color: Color::RED,
            marker_style: MarkerType::Circle,
            marker_face: true,
            segment_tolerance: 2.0,
            fill_closed_rectangles: true,
            clear_color: Color::WHITE,
        }
    }
}

impl BackendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_render_size(mut self, width: u32, height: u32) -> Self {
        self.render_width = width;
        self.render_height = height;
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    pub fn with_marker_radius(mut self, radius: f32) -> Self {
        self.marker_radius = radius;
        self
    }

    pub fn with_marker_color(mut self, color: Color) -> Self {
        self.marker_color = color;
        self
    }

    pub fn with_marker_style(mut self, style: MarkerType) -> Self {
        self.marker_style = style;
        self
    }

    pub fn with_marker_face(mut self, face: bool) -> Self {
        self.marker_face = face;
        self
    }

    pub fn with_segment_tolerance(mut self, tolerance: f32) -> Self {
        self.segment_tolerance = tolerance;
        self
    }

    pub fn with_fill_closed_rectangles(mut self, enabled: bool) -> Self {
        self.fill_closed_rectangles = enabled;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }
}
