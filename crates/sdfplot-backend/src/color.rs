//! Input adapter for the host library's color arrays.
//!
//! Colors arrive as `[flag, r, g, b]`: the first slot is not a channel and alpha is implied
//! opaque. Any NaN channel means "no color".

use sdfplot_render::Color;

/// Four-slot color as passed by the host plotting library.
pub type LegacyColor = [f32; 4];

/// Stroke colors: `[_, r, g, b]` becomes opaque `(r, g, b)`; NaN becomes transparent.
pub fn fix_color(c: LegacyColor) -> Color {
    if c[1].is_nan() || c[2].is_nan() || c[3].is_nan() {
        return Color::TRANSPARENT;
    }
    Color::rgb(c[1], c[2], c[3])
}

/// Fill colors: as [`fix_color`], and pure black also means "no fill".
pub fn fix_fill_color(c: LegacyColor) -> Color {
    let color = fix_color(c);
    if color.r == 0.0 && color.g == 0.0 && color.b == 0.0 {
        return Color::TRANSPARENT;
    }
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_slot_is_ignored() {
        assert_eq!(fix_color([0.7, 0.1, 0.2, 0.3]), Color::rgb(0.1, 0.2, 0.3));
        assert_eq!(fix_color([0.0, 0.0, 0.0, 0.0]), Color::BLACK);
    }

    #[test]
    fn nan_is_transparent() {
        assert_eq!(fix_color([0.0, f32::NAN, 0.0, 0.0]), Color::TRANSPARENT);
        assert_eq!(fix_fill_color([0.0, 1.0, 1.0, f32::NAN]), Color::TRANSPARENT);
    }

    #[test]
    fn black_fill_is_no_fill() {
        assert_eq!(fix_fill_color([1.0, 0.0, 0.0, 0.0]), Color::TRANSPARENT);
        assert_eq!(fix_fill_color([0.0, 0.0, 0.0, 0.5]), Color::rgb(0.0, 0.0, 0.5));
    }
}
