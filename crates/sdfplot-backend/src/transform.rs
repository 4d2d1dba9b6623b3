//! Logical-to-screen coordinate mapping.
//!
//! The host lays out a figure in logical units with `y` pointing up. The framebuffer may
//! have a different size and aspect ratio, so the figure is scaled uniformly to fit and
//! centered, then flipped so `y` points down.

use glam::{Vec2, Vec3};
use sdfplot_render::ScreenRect;

/// Uniform scale plus centering offset from logical units to framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    render_size: Vec2,
    scale: f32,
    offset: Vec2,
}

impl ViewTransform {
    /// Fit a `logical` sized figure into a `render` sized framebuffer.
    ///
    /// A zero logical dimension falls back to a scale of 1.
    pub fn new(render: (u32, u32), logical: (u32, u32)) -> Self {
        let render_size = Vec2::new(render.0 as f32, render.1 as f32);
        let logical_size = Vec2::new(logical.0 as f32, logical.1 as f32);

        let scale = if logical.0 == 0 || logical.1 == 0 {
            1.0
        } else {
            (render_size.x / logical_size.x).min(render_size.y / logical_size.y)
        };
        let offset = (render_size - logical_size * scale) * 0.5;

        Self {
            render_size,
            scale,
            offset,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn render_size(&self) -> Vec2 {
        self.render_size
    }

    /// Screen position of logical point `(x, y)`.
    pub fn apply(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(
            self.offset.x + x as f32 * self.scale,
            self.render_size.y - self.offset.y - y as f32 * self.scale,
        )
    }

    /// [`ViewTransform::apply`] lifted to 3D with `z = 0`.
    pub fn apply3(&self, x: f64, y: f64) -> Vec3 {
        self.apply(x, y).extend(0.0)
    }

    /// Pixel length to logical units.
    pub fn inverse_len(&self, px: f32) -> f32 {
        if self.scale == 0.0 { 0.0 } else { px / self.scale }
    }

    /// Screen rectangle covering the logical box with corners `(x1, y1)` and `(x2, y2)`.
    pub fn apply_box(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> ScreenRect {
        let a = self.apply(x1.min(x2), y1.max(y2));
        let b = self.apply(x1.max(x2), y1.min(y2));
        ScreenRect::new(a.x, a.y, b.x - a.x, b.y - a.y).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_sizes_only_flip_y() {
        let t = ViewTransform::new((800, 600), (800, 600));
        assert_eq!(t.scale(), 1.0);
        assert_eq!(t.apply(0.0, 0.0), Vec2::new(0.0, 600.0));
        assert_eq!(t.apply(800.0, 600.0), Vec2::new(800.0, 0.0));
    }

    #[test]
    fn aspect_is_preserved_and_centered() {
        let t = ViewTransform::new((800, 600), (400, 400));
        assert_eq!(t.scale(), 1.5);
        assert_eq!(t.offset(), Vec2::new(100.0, 0.0));
        assert_eq!(t.apply(0.0, 0.0), Vec2::new(100.0, 600.0));
        assert_eq!(t.apply(400.0, 400.0), Vec2::new(700.0, 0.0));
    }

    #[test]
    fn logical_bounds_stay_on_screen() {
        for &(rw, rh, lw, lh) in &[(800, 600, 1000, 300), (320, 240, 50, 900), (1, 1, 640, 480)] {
            let t = ViewTransform::new((rw, rh), (lw, lh));
            let (lw, lh) = (f64::from(lw), f64::from(lh));
            for &(x, y) in &[(0.0, 0.0), (lw, 0.0), (0.0, lh), (lw, lh)] {
                let p = t.apply(x, y);
                assert!(p.x >= -1e-3 && p.x <= rw as f32 + 1e-3, "{p:?}");
                assert!(p.y >= -1e-3 && p.y <= rh as f32 + 1e-3, "{p:?}");
            }
        }
    }

    #[test]
    fn zero_logical_size_uses_unit_scale() {
        let t = ViewTransform::new((800, 600), (0, 600));
        assert_eq!(t.scale(), 1.0);
    }

    #[test]
    fn pixel_lengths_map_back_to_logical() {
        let t = ViewTransform::new((800, 600), (400, 300));
        assert_eq!(t.inverse_len(20.0), 10.0);
    }

    #[test]
    fn box_is_top_left_anchored() {
        let t = ViewTransform::new((800, 600), (800, 600));
        let r = t.apply_box(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r, ScreenRect::new(10.0, 530.0, 100.0, 50.0));
    }
}
