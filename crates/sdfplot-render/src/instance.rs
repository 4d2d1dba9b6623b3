//! GPU instance record and shape tags.
//!
//! Every shape the renderer draws is one [`Instance`]: five `vec4<f32>` slots read by the
//! vertex stage at locations 0..=4 with per-instance stepping.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use static_assertions::const_assert_eq;

use crate::Color;

/// Marker glyphs evaluated by the fragment stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MarkerType {
    #[default]
    Circle,
    Square,
    Diamond,
    Plus,
    Cross,
    TriangleUp,
    TriangleDown,
    Star,
    Point,
}

impl MarkerType {
    pub const ALL: [MarkerType; 9] = [
        MarkerType::Circle,
        MarkerType::Square,
        MarkerType::Diamond,
        MarkerType::Plus,
        MarkerType::Cross,
        MarkerType::TriangleUp,
        MarkerType::TriangleDown,
        MarkerType::Star,
        MarkerType::Point,
    ];
}

/// Closed set of shape tags stored in `params[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Rect,
    Circle,
    Line,
    Marker(MarkerType),
    TriangleLit,
    TriangleUnlit,
    Text,
    Image,
}

impl PrimitiveKind {
    pub const RECT_TAG: u32 = 0;
    pub const CIRCLE_TAG: u32 = 1;
    pub const LINE_TAG: u32 = 2;
    pub const MARKER_BASE_TAG: u32 = 10;
    pub const TRIANGLE_LIT_TAG: u32 = 30;
    pub const TRIANGLE_UNLIT_TAG: u32 = 31;
    pub const TEXT_TAG: u32 = 40;
    pub const IMAGE_TAG: u32 = 41;

    /// Numeric tag written into the instance record.
    pub const fn tag(self) -> u32 {
        match self {
            Self::Rect => Self::RECT_TAG,
            Self::Circle | Self::Marker(MarkerType::Circle) => Self::CIRCLE_TAG,
            Self::Line => Self::LINE_TAG,
            Self::Marker(m) => Self::MARKER_BASE_TAG + marker_index(m),
            Self::TriangleLit => Self::TRIANGLE_LIT_TAG,
            Self::TriangleUnlit => Self::TRIANGLE_UNLIT_TAG,
            Self::Text => Self::TEXT_TAG,
            Self::Image => Self::IMAGE_TAG,
        }
    }

    /// Inverse of [`PrimitiveKind::tag`]. Circle markers come back as `Circle`.
    pub fn from_tag(tag: u32) -> Option<Self> {
        Some(match tag {
            Self::RECT_TAG => Self::Rect,
            Self::CIRCLE_TAG => Self::Circle,
            Self::LINE_TAG => Self::Line,
            Self::TRIANGLE_LIT_TAG => Self::TriangleLit,
            Self::TRIANGLE_UNLIT_TAG => Self::TriangleUnlit,
            Self::TEXT_TAG => Self::Text,
            Self::IMAGE_TAG => Self::Image,
            t if t > Self::MARKER_BASE_TAG && t < Self::MARKER_BASE_TAG + 9 => {
                Self::Marker(MarkerType::ALL[(t - Self::MARKER_BASE_TAG) as usize])
            }
            _ => return None,
        })
    }

    /// Faces are drawn first by the faces pipeline; everything else is overlay.
    pub const fn is_face(self) -> bool {
        matches!(
            self,
            Self::Rect | Self::Circle | Self::Marker(_) | Self::TriangleLit | Self::TriangleUnlit
        )
    }
}

const fn marker_index(marker: MarkerType) -> u32 {
    match marker {
        MarkerType::Circle => 0,
        MarkerType::Square => 1,
        MarkerType::Diamond => 2,
        MarkerType::Plus => 3,
        MarkerType::Cross => 4,
        MarkerType::TriangleUp => 5,
        MarkerType::TriangleDown => 6,
        MarkerType::Star => 7,
        MarkerType::Point => 8,
    }
}

/// One shape as uploaded to the instance buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Instance {
    /// Primary anchor (x, y, z) + radius / half thickness.
    pub pos_a_radius: [f32; 4],
    /// Line end / rect size / second triangle vertex + stroke width.
    pub pos_b_width: [f32; 4],
    pub color: [f32; 4],
    /// `[tag, dash_len, gap_len, dash_offset]`.
    ///
    /// Glyphs reuse it as `[tag, rotation, origin.x, origin.y]`.
    pub params: [f32; 4],
    /// Third triangle vertex, or the UV rectangle of a glyph/image quad.
    pub pos_c_pad: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<Instance>(), 80);

impl Instance {
    pub const SIZE: u64 = std::mem::size_of::<Instance>() as u64;

    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x4,
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4
    ];

    /// Vertex buffer layout, one record per instance.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: Self::SIZE,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn tagged(kind: PrimitiveKind, color: Color) -> Self {
        let mut inst = Self::zeroed();
        inst.color = color.sanitized().to_array();
        inst.params[0] = kind.tag() as f32;
        inst
    }

    /// Axis-aligned box with its top-left corner at `(x, y)`.
    pub fn rect(x: f32, y: f32, width: f32, height: f32, color: Color) -> Self {
        let mut inst = Self::tagged(PrimitiveKind::Rect, color);
        inst.pos_a_radius = [x, y, 0.0, 0.0];
        inst.pos_b_width = [width, height, 0.0, 0.0];
        inst
    }

    /// Rounded or stroked variant of [`Instance::rect`].
    pub fn rounded_rect(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        corner_radius: f32,
        stroke_width: f32,
    ) -> Self {
        let mut inst = Self::rect(x, y, width, height, color);
        inst.pos_a_radius[3] = corner_radius;
        inst.pos_b_width[3] = stroke_width;
        inst
    }

    /// Capsule from `a` to `b`; `thickness` is the full width.
    pub fn line(a: Vec3, b: Vec3, thickness: f32, color: Color) -> Self {
        let mut inst = Self::tagged(PrimitiveKind::Line, color);
        inst.pos_a_radius = [a.x, a.y, a.z, thickness * 0.5];
        inst.pos_b_width = [b.x, b.y, b.z, 0.0];
        inst
    }

    /// Set the dash pattern. A zero `dash_len` is solid.
    pub fn with_dash(mut self, dash_len: f32, gap_len: f32, dash_offset: f32) -> Self {
        self.params[1] = dash_len;
        self.params[2] = gap_len;
        self.params[3] = dash_offset;
        self
    }

    /// Marker centered at `center`. A positive `stroke_width` draws a ring.
    pub fn marker(
        center: Vec3,
        radius: f32,
        marker: MarkerType,
        color: Color,
        stroke_width: f32,
    ) -> Self {
        let mut inst = Self::tagged(PrimitiveKind::Marker(marker), color);
        inst.pos_a_radius = [center.x, center.y, center.z, radius];
        inst.pos_b_width[3] = stroke_width;
        inst
    }

    pub fn circle(center: Vec3, radius: f32, color: Color) -> Self {
        Self::marker(center, radius, MarkerType::Circle, color, 0.0)
    }

    pub fn triangle(vertices: [Vec3; 3], color: Color, lit: bool) -> Self {
        let kind = if lit {
            PrimitiveKind::TriangleLit
        } else {
            PrimitiveKind::TriangleUnlit
        };
        let mut inst = Self::tagged(kind, color);
        let [a, b, c] = vertices;
        inst.pos_a_radius = [a.x, a.y, a.z, 0.0];
        inst.pos_b_width = [b.x, b.y, b.z, 0.0];
        inst.pos_c_pad = [c.x, c.y, c.z, 0.0];
        inst
    }

    /// Glyph quad with top-left `pos` and `size`, sampling `uv = [u0, v0, u1, v1]` of the atlas.
    /// The quad is rotated by `rotation` radians around `origin`.
    pub fn glyph(
        pos: Vec2,
        size: Vec2,
        uv: [f32; 4],
        color: Color,
        rotation: f32,
        origin: Vec2,
    ) -> Self {
        let mut inst = Self::tagged(PrimitiveKind::Text, color);
        inst.pos_a_radius = [pos.x, pos.y, 0.0, 0.0];
        inst.pos_b_width = [size.x, size.y, 0.0, 0.0];
        inst.params[1] = rotation;
        inst.params[2] = origin.x;
        inst.params[3] = origin.y;
        inst.pos_c_pad = uv;
        inst
    }

    /// Screen-space image quad covering the whole texture.
    pub fn image(x: f32, y: f32, width: f32, height: f32) -> Self {
        let mut inst = Self::tagged(PrimitiveKind::Image, Color::WHITE);
        inst.pos_a_radius = [x, y, 0.0, 0.0];
        inst.pos_b_width = [width, height, 0.0, 0.0];
        inst.pos_c_pad = [0.0, 0.0, 1.0, 1.0];
        inst
    }

    pub fn tag(&self) -> u32 {
        self.params[0] as u32
    }

    pub fn kind(&self) -> Option<PrimitiveKind> {
        PrimitiveKind::from_tag(self.tag())
    }

    pub fn is_face(&self) -> bool {
        self.kind().is_some_and(PrimitiveKind::is_face)
    }
}

/// Uniform block shared by every draw.
///
/// Matches the WGSL `Uniforms` struct: a mat4, `vec2` screen size, a mode flag, padding, then
/// the camera position padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub screen_size: [f32; 2],
    /// 0.0 for screen-space 2D, 1.0 when `view_proj` is a 3D camera.
    pub mode: f32,
    pub _pad0: f32,
    pub camera_pos: [f32; 3],
    pub _pad1: f32,
}

const_assert_eq!(std::mem::size_of::<Uniforms>(), 96);

impl Uniforms {
    pub const SIZE: u64 = std::mem::size_of::<Uniforms>() as u64;
    pub const MODE_2D: f32 = 0.0;
    pub const MODE_3D: f32 = 1.0;

    /// Pixel-space orthographic projection: `(0,0)` top-left, `(w,h)` bottom-right.
    pub fn screen_projection(width: f32, height: f32) -> Mat4 {
        Mat4::orthographic_lh(0.0, width, height, 0.0, 0.0, 1000.0)
    }

    /// Screen-space uniforms for a target of `width` x `height` pixels.
    pub fn screen(width: u32, height: u32) -> Self {
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        Self {
            view_proj: Self::screen_projection(w, h).to_cols_array_2d(),
            screen_size: [w, h],
            mode: Self::MODE_2D,
            _pad0: 0.0,
            camera_pos: [0.0; 3],
            _pad1: 0.0,
        }
    }

    /// Uniforms for the given target, optionally replacing the projection with a 3D camera.
    pub fn new(width: u32, height: u32, view_proj: Option<Mat4>, camera_pos: Vec3) -> Self {
        let mut uniforms = Self::screen(width, height);
        if let Some(m) = view_proj {
            uniforms.view_proj = m.to_cols_array_2d();
            uniforms.mode = Self::MODE_3D;
        }
        uniforms.camera_pos = camera_pos.to_array();
        uniforms
    }

    pub fn is_3d(&self) -> bool {
        self.mode == Self::MODE_3D
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_is_80_bytes() {
        assert_eq!(std::mem::size_of::<Instance>(), 80);
        let offsets: Vec<u64> = Instance::ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 16, 32, 48, 64]);
        assert!(
            Instance::ATTRIBUTES
                .iter()
                .all(|a| a.format == wgpu::VertexFormat::Float32x4)
        );
    }

    #[test]
    fn uniforms_are_96_bytes() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 96);
    }

    #[test]
    fn tags_round_trip_except_circle_marker() {
        for m in MarkerType::ALL {
            let kind = PrimitiveKind::Marker(m);
            let back = PrimitiveKind::from_tag(kind.tag());
            if m == MarkerType::Circle {
                assert_eq!(back, Some(PrimitiveKind::Circle));
            } else {
                assert_eq!(back, Some(kind));
            }
        }
        assert_eq!(PrimitiveKind::from_tag(99), None);
    }

    #[test]
    fn face_classification() {
        assert!(PrimitiveKind::Rect.is_face());
        assert!(PrimitiveKind::Marker(MarkerType::Star).is_face());
        assert!(PrimitiveKind::TriangleUnlit.is_face());
        assert!(!PrimitiveKind::Line.is_face());
        assert!(!PrimitiveKind::Text.is_face());
        assert!(!PrimitiveKind::Image.is_face());
    }

    #[test]
    fn nan_colors_never_reach_instances() {
        let nan = Color::rgb(f32::NAN, 0.0, 0.0);
        let instances = [
            Instance::rect(0.0, 0.0, 1.0, 1.0, nan),
            Instance::line(Vec3::ZERO, Vec3::X, 1.0, nan),
            Instance::circle(Vec3::ZERO, 1.0, nan),
            Instance::triangle([Vec3::ZERO, Vec3::X, Vec3::Y], nan, true),
            Instance::glyph(Vec2::ZERO, Vec2::ONE, [0.0, 0.0, 1.0, 1.0], nan, 0.0, Vec2::ZERO),
        ];
        for inst in instances {
            assert_eq!(inst.color, Color::TRANSPARENT.to_array());
        }
    }

    #[test]
    fn line_stores_half_thickness() {
        let inst = Instance::line(Vec3::ZERO, Vec3::X, 3.0, Color::RED).with_dash(8.0, 4.0, 2.0);
        assert_eq!(inst.pos_a_radius[3], 1.5);
        assert_eq!(inst.params, [2.0, 8.0, 4.0, 2.0]);
    }

    #[test]
    fn screen_projection_maps_corners() {
        let m = Uniforms::screen_projection(800.0, 600.0);
        let tl = m.project_point3(Vec3::new(0.0, 0.0, 0.5));
        let br = m.project_point3(Vec3::new(800.0, 600.0, 0.5));
        assert!((tl.x + 1.0).abs() < 1e-5 && (tl.y - 1.0).abs() < 1e-5);
        assert!((br.x - 1.0).abs() < 1e-5 && (br.y + 1.0).abs() < 1e-5);
        assert!((0.0..=1.0).contains(&tl.z));
    }

    #[test]
    fn camera_sets_3d_mode() {
        let u = Uniforms::new(100, 100, Some(Mat4::IDENTITY), Vec3::new(1.0, 2.0, 3.0));
        assert!(u.is_3d());
        assert_eq!(u.camera_pos, [1.0, 2.0, 3.0]);
        assert!(!Uniforms::screen(100, 100).is_3d());
    }
}
