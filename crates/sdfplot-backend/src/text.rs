//! World-to-screen projection for 3D text anchors.

use glam::{Mat4, Vec2, Vec3};

/// Clip-space `w` at or below this is behind the camera or too close to project.
pub const MIN_CLIP_W: f32 = 0.001;

/// Project `world` through `view_proj` into a `width` x `height` framebuffer.
///
/// Returns the pixel position with `y` pointing down, or `None` when the point lies
/// behind the camera.
pub fn project_to_screen(view_proj: Mat4, world: Vec3, width: f32, height: f32) -> Option<Vec2> {
    let clip = view_proj * world.extend(1.0);
    if clip.w <= MIN_CLIP_W {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * width,
        (1.0 - ndc.y) * 0.5 * height,
    ))
}
