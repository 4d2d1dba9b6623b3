//! Scalar grid preparation for image draws.

use sdfplot_render::{ImageData, ScreenRect};

use crate::transform::ViewTransform;

/// Ranges below this are treated as constant fields.
const MIN_RANGE: f64 = 1e-9;

/// Normalize `grid` to `0..=1` by its own min and max and flatten it row by row.
///
/// The first grid row is the lowest in logical space, so rows are emitted bottom-up to
/// match the top-down row order of [`ImageData`]. Returns `None` for an empty grid.
/// Short rows are padded with zeros to the width of the first row.
pub fn normalize_grid(grid: &[Vec<f64>]) -> Option<ImageData> {
    let width = grid.first().map_or(0, Vec::len);
    if width == 0 {
        return None;
    }
    let height = grid.len();

    let (min, max) = grid
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (min, range) = if min.is_finite() && max - min >= MIN_RANGE {
        (min, max - min)
    } else if min.is_finite() {
        (min, 1.0)
    } else {
        (0.0, 1.0)
    };

    let mut values = Vec::with_capacity(width * height);
    for row in grid.iter().rev() {
        values.extend(
            (0..width).map(|i| row.get(i).map_or(0.0, |&v| ((v - min) / range) as f32)),
        );
    }

    Some(ImageData::new(width as u32, height as u32, values))
}

/// Screen destination of an image spanning the logical coordinate grids `x` and `y`.
///
/// The logical rect runs from `x[0][0]` to the last entry of the first row horizontally
/// and from `y[0][0]` to the first entry of the last row vertically. Grids with fewer than
/// two rows fall back to the whole logical area.
pub fn destination(
    x: &[Vec<f64>],
    y: &[Vec<f64>],
    logical: (u32, u32),
    transform: &ViewTransform,
) -> ScreenRect {
    let (mut sx, mut sw) = (0.0, f64::from(logical.0));
    let (mut sy, mut sh) = (0.0, f64::from(logical.1));

    if x.len() >= 2
        && let (Some(&first), Some(&last)) = (x[0].first(), x[0].last())
    {
        sx = first;
        sw = last - first;
    }
    if y.len() >= 2
        && let (Some(&first), Some(&last)) = (y[0].first(), y.last().and_then(|row| row.first()))
    {
        sy = first;
        sh = last - first;
    }

    transform.apply_box(sx, sy, sx + sw, sy + sh)
}
