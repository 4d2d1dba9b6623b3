//! Signed distance functions, mirrored from `shaders/primitives.wgsl`.
//!
//! Distances are negative inside, zero on the boundary and positive outside. Local
//! coordinates are y-down pixels, matching the screen-space quad the vertex stage emits.
//! The WGSL versions must stay in lock-step with these.

use glam::Vec2;

use crate::instance::MarkerType;

/// Constant part of the quad expansion, in pixels.
pub const AA_PAD: f32 = 2.0;
/// Smallest quad half-extent for markers and lines, in pixels.
pub const MIN_HALF_EXTENT: f32 = 4.0;
/// Bounds for the smoothstep half-width derived from `fwidth(d)`.
pub const AA_BLUR_MIN: f32 = 0.001;
pub const AA_BLUR_MAX: f32 = 2.0;
/// Fragments with less coverage than this are discarded.
pub const ALPHA_DISCARD: f32 = 0.01;

/// Half-extent of the quad covering a marker of `radius` or a line of half thickness `radius`.
pub fn quad_half_extent(radius: f32) -> f32 {
    (radius * 4.0 + AA_PAD).max(MIN_HALF_EXTENT)
}

pub fn sd_circle(p: Vec2, r: f32) -> f32 {
    p.length() - r
}

/// Annulus of outer radius `r` and thickness `stroke`, drawn inside the circle.
pub fn sd_ring(p: Vec2, r: f32, stroke: f32) -> f32 {
    let half = stroke * 0.5;
    (sd_circle(p, r) + half).abs() - half
}

pub fn sd_box(p: Vec2, half_size: Vec2) -> f32 {
    let q = p.abs() - half_size;
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0)
}

/// Rounded box; the corner radius is clamped to the smaller half size.
pub fn sd_rounded_box(p: Vec2, half_size: Vec2, radius: f32) -> f32 {
    let r = radius.clamp(0.0, half_size.x.min(half_size.y));
    let q = p.abs() - half_size + Vec2::splat(r);
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0) - r
}

/// Turn a filled distance into an inner outline of width `stroke`. Non-positive strokes fill.
pub fn outline(d: f32, stroke: f32) -> f32 {
    if stroke > 0.0 {
        let half = stroke * 0.5;
        (d + half).abs() - half
    } else {
        d
    }
}

/// Distance to the segment `a..b` minus `r`.
pub fn sd_capsule(p: Vec2, a: Vec2, b: Vec2, r: f32) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let len_sq = ba.length_squared();
    let h = if len_sq > 0.0 {
        (pa.dot(ba) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (pa - ba * h).length() - r
}

/// Whether arc position `t` falls inside a dash. A zero `dash_len` is solid.
pub fn dash_visible(t: f32, dash_len: f32, gap_len: f32) -> bool {
    if dash_len <= 0.0 {
        return true;
    }
    let period = dash_len + gap_len.max(0.0);
    t.rem_euclid(period) <= dash_len
}

pub fn sd_square(p: Vec2, r: f32) -> f32 {
    sd_box(p, Vec2::splat(r))
}

pub fn sd_diamond(p: Vec2, r: f32) -> f32 {
    let q = p.abs();
    (q.x + q.y - r) * std::f32::consts::FRAC_1_SQRT_2
}

/// Arm thickness of plus/cross markers relative to the radius.
const ARM_RATIO: f32 = 0.3;

pub fn sd_plus(p: Vec2, r: f32) -> f32 {
    let t = r * ARM_RATIO;
    sd_box(p, Vec2::new(r, t)).min(sd_box(p, Vec2::new(t, r)))
}

pub fn sd_cross(p: Vec2, r: f32) -> f32 {
    let s = std::f32::consts::FRAC_1_SQRT_2;
    let rotated = Vec2::new((p.x - p.y) * s, (p.x + p.y) * s);
    sd_plus(rotated, r)
}

/// Equilateral triangle with circumradius-ish size `r`, apex towards -y (screen up).
pub fn sd_triangle_up(p: Vec2, r: f32) -> f32 {
    sd_equilateral(Vec2::new(p.x, -p.y), r)
}

pub fn sd_triangle_down(p: Vec2, r: f32) -> f32 {
    sd_equilateral(p, r)
}

// y-up equilateral triangle, apex at +y.
fn sd_equilateral(p: Vec2, r: f32) -> f32 {
    let k = 3.0_f32.sqrt();
    let mut q = Vec2::new(p.x.abs() - r, p.y + r / k);
    if q.x + k * q.y > 0.0 {
        q = Vec2::new(q.x - k * q.y, -k * q.x - q.y) * 0.5;
    }
    q.x -= q.x.clamp(-2.0 * r, 0.0);
    -q.length() * q.y.signum()
}

/// Five-pointed star with outer radius `r`, one point towards screen up.
pub fn sd_star(p: Vec2, r: f32) -> f32 {
    const INNER: f32 = 0.4;
    let k1 = Vec2::new(0.809_017, -0.587_785);
    let k2 = Vec2::new(-k1.x, k1.y);
    let mut q = Vec2::new(p.x.abs(), -p.y);
    q -= 2.0 * k1.dot(q).max(0.0) * k1;
    q -= 2.0 * k2.dot(q).max(0.0) * k2;
    q.x = q.x.abs();
    q.y -= r;
    let ba = INNER * Vec2::new(-k1.y, k1.x) - Vec2::new(0.0, 1.0);
    let h = (q.dot(ba) / ba.dot(ba)).clamp(0.0, r);
    (q - ba * h).length() * (q.y * ba.x - q.x * ba.y).signum()
}

/// Small dot, half the nominal radius.
pub fn sd_point(p: Vec2, r: f32) -> f32 {
    sd_circle(p, r * 0.5)
}

/// Distance for a marker shape of `radius`; a positive `stroke` outlines it.
pub fn sd_marker(marker: MarkerType, p: Vec2, radius: f32, stroke: f32) -> f32 {
    let d = match marker {
        MarkerType::Circle => sd_circle(p, radius),
        MarkerType::Square => sd_square(p, radius),
        MarkerType::Diamond => sd_diamond(p, radius),
        MarkerType::Plus => sd_plus(p, radius),
        MarkerType::Cross => sd_cross(p, radius),
        MarkerType::TriangleUp => sd_triangle_up(p, radius),
        MarkerType::TriangleDown => sd_triangle_down(p, radius),
        MarkerType::Star => sd_star(p, radius),
        MarkerType::Point => sd_point(p, radius),
    };
    outline(d, stroke)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Coverage for distance `d` given the screen-space derivative `fwidth`.
pub fn coverage(d: f32, fwidth: f32) -> f32 {
    let blur = fwidth.clamp(AA_BLUR_MIN, AA_BLUR_MAX);
    1.0 - smoothstep(-blur, blur, d)
}

/// Lambert factor used for lit triangles: 30% ambient, 70% two-sided diffuse.
pub fn lambert(normal: glam::Vec3) -> f32 {
    let light = glam::Vec3::new(0.3, 0.5, 1.0).normalize();
    0.3 + 0.7 * normal.normalize_or_zero().dot(light).abs()
}
