//! The renderer abstraction the translation layer draws through, and the typed primitive
//! records it passes across.
//!
//! All coordinates are screen pixels with `(0, 0)` at the top-left, except 3D geometry
//! drawn while a view-projection is set.

use glam::{Mat4, Vec2, Vec3};

use crate::Color;
use crate::instance::{Instance, MarkerType};

/// Filled, outlined or rounded axis-aligned rectangle. `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    /// Zero fills the rect; positive values draw an inner outline of this width.
    pub stroke_width: f32,
    pub corner_radius: f32,
    pub z: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32, color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            color,
            ..Default::default()
        }
    }

    /// Smallest rect containing both corners.
    pub fn from_corners(a: Vec2, b: Vec2, color: Color) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y, color)
    }

    pub fn with_stroke(mut self, stroke_width: f32) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    pub fn with_corner_radius(mut self, corner_radius: f32) -> Self {
        self.corner_radius = corner_radius;
        self
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    pub fn to_instance(&self) -> Instance {
        Instance::rounded_rect(
            self.x,
            self.y,
            self.width,
            self.height,
            self.color,
            self.corner_radius,
            self.stroke_width,
        )
    }
}

/// Straight segment drawn as a capsule, optionally dashed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
    /// Full thickness in pixels.
    pub width: f32,
    pub dash_len: f32,
    pub gap_len: f32,
    /// Arc length already covered by earlier segments of the same path.
    pub dash_offset: f32,
}

impl Line {
    pub fn new(start: Vec3, end: Vec3, width: f32, color: Color) -> Self {
        Self {
            start,
            end,
            color,
            width,
            dash_len: 0.0,
            gap_len: 0.0,
            dash_offset: 0.0,
        }
    }

    pub fn with_dash(mut self, dash_len: f32, gap_len: f32, dash_offset: f32) -> Self {
        self.dash_len = dash_len;
        self.gap_len = gap_len;
        self.dash_offset = dash_offset;
        self
    }

    pub fn is_dashed(&self) -> bool {
        self.dash_len > 0.0
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    pub fn to_instance(&self) -> Instance {
        let inst = Instance::line(self.start, self.end, self.width, self.color);
        if self.is_dashed() {
            inst.with_dash(self.dash_len, self.gap_len, self.dash_offset)
        } else {
            inst
        }
    }
}

/// Point marker. The name is kept from the common case; any [`MarkerType`] is allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec3,
    pub radius: f32,
    pub color: Color,
    pub marker: MarkerType,
    /// Zero fills; positive values draw a ring.
    pub stroke_width: f32,
}

impl Circle {
    pub fn new(center: Vec3, radius: f32, color: Color) -> Self {
        Self {
            center,
            radius,
            color,
            marker: MarkerType::Circle,
            stroke_width: 0.0,
        }
    }

    pub fn with_marker(mut self, marker: MarkerType) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_stroke(mut self, stroke_width: f32) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    pub fn to_instance(&self) -> Instance {
        Instance::marker(
            self.center,
            self.radius,
            self.marker,
            self.color,
            self.stroke_width,
        )
    }
}

/// Flat triangle. Lit triangles get Lambert shading from their screen-space face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    /// Per-vertex normals as supplied by the host; shading derives the face normal itself.
    pub normals: [Vec3; 3],
    pub color: Color,
    pub lit: bool,
}

impl Triangle {
    pub fn new(vertices: [Vec3; 3], color: Color, lit: bool) -> Self {
        Self {
            vertices,
            normals: [Vec3::Z; 3],
            color,
            lit,
        }
    }

    pub fn with_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.normals = normals;
        self
    }

    pub fn to_instance(&self) -> Instance {
        Instance::triangle(self.vertices, self.color, self.lit)
    }
}

/// A queued text draw; `position` is the left end of the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCommand {
    pub text: String,
    pub position: Vec2,
    pub size: f32,
    pub color: Color,
    /// Counter-clockwise, radians, around `position`.
    pub rotation: f32,
}

/// Scalar field normalized to `0..=1`, row-major, first row drawn at the top.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f32>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Self {
        Self {
            width,
            height,
            values,
        }
    }

    /// Width and height are non-zero and `values` covers every pixel.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.values.len() >= self.width as usize * self.height as usize
    }
}

/// Pixel rectangle used for scissoring and image placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same rectangle with non-negative width and height.
    pub fn normalized(self) -> Self {
        let x0 = self.x.min(self.x + self.width);
        let y0 = self.y.min(self.y + self.height);
        Self::new(x0, y0, self.width.abs(), self.height.abs())
    }
}

/// Drawing surface for plot primitives.
///
/// Implementations queue shapes during a frame. Nothing here reports errors: failures
/// are logged and the affected draw is skipped. `screen` is the target size in pixels.
pub trait PlotRenderer {
    /// Switch lines, markers and triangles to 3D world space, or back to screen space with `None`.
    fn set_view_projection(&mut self, _view_proj: Option<Mat4>) {}

    /// Camera position used to billboard 3D lines and markers.
    fn set_camera_position(&mut self, _position: Vec3) {}

    fn set_scissor_rect(&mut self, _rect: ScreenRect) {}

    fn disable_scissor(&mut self) {}

    fn draw_rects(&mut self, rects: &[Rect], screen: Vec2);

    fn draw_lines(&mut self, lines: &[Line], screen: Vec2);

    fn draw_circles(&mut self, circles: &[Circle], screen: Vec2);

    fn draw_triangles(&mut self, triangles: &[Triangle], screen: Vec2);

    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Color, rotation: f32);

    /// Advance width of `text` at `size` pixels.
    fn measure_text(&self, text: &str, size: f32) -> f32;

    /// Start a new frame cleared to `color`.
    fn clear(&mut self, color: Color);

    fn draw_image(&mut self, image: &ImageData, dest: ScreenRect);
}
