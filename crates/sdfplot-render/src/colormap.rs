//! Scalar-to-color mapping applied to images before upload.

use glam::Vec3;

use crate::Color;
use crate::renderer::ImageData;

const VIRIDIS: [Vec3; 4] = [
    Vec3::new(0.267, 0.004, 0.329),
    Vec3::new(0.190, 0.407, 0.556),
    Vec3::new(0.208, 0.718, 0.472),
    Vec3::new(0.993, 0.906, 0.143),
];

/// Four-stop approximation of the viridis ramp. `t` is clamped to `0..=1`; NaN is transparent.
pub fn viridis(t: f32) -> Color {
    if t.is_nan() {
        return Color::TRANSPARENT;
    }
    let t = t.clamp(0.0, 1.0);
    let rgb = if t < 0.33 {
        VIRIDIS[0].lerp(VIRIDIS[1], t / 0.33)
    } else if t < 0.66 {
        VIRIDIS[1].lerp(VIRIDIS[2], (t - 0.33) / 0.33)
    } else {
        VIRIDIS[2].lerp(VIRIDIS[3], (t - 0.66) / 0.34)
    };
    Color::rgb(rgb.x, rgb.y, rgb.z)
}

/// Tightly packed RGBA8 pixels for `image`, one viridis color per value.
///
/// Missing values (a short `values` vector) are left transparent.
pub fn colorize(image: &ImageData) -> Vec<u8> {
    let count = image.width as usize * image.height as usize;
    let mut pixels = vec![0u8; count * 4];
    for (px, &value) in pixels.chunks_exact_mut(4).zip(image.values.iter()) {
        px.copy_from_slice(&viridis(value).to_rgba_u8());
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_stops() {
        assert!(viridis(0.0).rgb_matches(&Color::rgb(0.267, 0.004, 0.329), 1e-6));
        assert!(viridis(1.0).rgb_matches(&Color::rgb(0.993, 0.906, 0.143), 1e-6));
        assert!(viridis(0.33).rgb_matches(&Color::rgb(0.190, 0.407, 0.556), 1e-6));
    }

    #[test]
    fn out_of_range_is_clamped_and_nan_transparent() {
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
        assert_eq!(viridis(f32::NAN), Color::TRANSPARENT);
    }

    #[test]
    fn colorize_packs_rgba() {
        let image = ImageData::new(2, 1, vec![0.0, 1.0]);
        let pixels = colorize(&image);
        assert_eq!(pixels.len(), 8);
        assert_eq!(&pixels[0..4], &viridis(0.0).to_rgba_u8());
        assert_eq!(pixels[7], 255);
    }
}
