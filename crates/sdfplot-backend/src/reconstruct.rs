//! Rectangle reconstruction.
//!
//! Host libraries often draw filled boxes (bars, legend swatches, axes frames) as four
//! independent two-point paths. Pairs of horizontal segments with the same x extent and
//! color, joined by a vertical segment on each side, are merged back into one rect.
//! Everything unmatched is drawn as a plain line.

use sdfplot_core::profiling::profile_function;
use sdfplot_render::{Color, Line, Rect};

use crate::path::RawSegment;

/// Maximum per-channel difference for two segments to count as the same color.
pub const COLOR_TOLERANCE: f32 = 0.01;

/// Output of [`reconstruct_rectangles`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction {
    pub rects: Vec<Rect>,
    pub lines: Vec<Line>,
}

fn promoted_color(color: Color) -> Color {
    if color.r == 0.0 && color.g == 0.0 && color.b == 0.0 {
        Color::TRANSPARENT
    } else {
        color
    }
}

/// Index of the first unused vertical segment at `x` spanning `y_min..y_max`.
fn find_vertical(
    segments: &[RawSegment],
    used: &[bool],
    skip: [usize; 2],
    reference: &RawSegment,
    x: f32,
    (y_min, y_max): (f32, f32),
    tolerance: f32,
) -> Option<usize> {
    segments.iter().enumerate().position(|(k, sv)| {
        !used[k]
            && !skip.contains(&k)
            && sv.is_solid()
            && sv.is_vertical(tolerance)
            && sv.color.rgb_matches(&reference.color, COLOR_TOLERANCE)
            && (sv.min_y() - y_min).abs() <= tolerance
            && (sv.max_y() - y_max).abs() <= tolerance
            && (sv.start.x - x).abs() < tolerance
    })
}

/// Merge segment quadruples into rects; return the rest as lines of `line_width`.
///
/// Horizontal segments are scanned in order and the first partner that completes a box
/// wins. Dashed segments are never merged. A promoted rect takes the first horizontal
/// segment's color, with black treated as "no fill".
pub fn reconstruct_rectangles(
    segments: &[RawSegment],
    tolerance: f32,
    line_width: f32,
) -> Reconstruction {
    profile_function!();

    let mut out = Reconstruction::default();
    if segments.is_empty() {
        return out;
    }

    let mut used = vec![false; segments.len()];

    for i in 0..segments.len() {
        let s1 = &segments[i];
        if used[i] || !s1.is_solid() || !s1.is_horizontal(tolerance) {
            continue;
        }
        let (x_left, x_right) = (s1.min_x(), s1.max_x());
        let y1 = s1.start.y;

        for j in (i + 1)..segments.len() {
            let s2 = &segments[j];
            if used[j]
                || !s2.is_solid()
                || !s2.is_horizontal(tolerance)
                || !s2.color.rgb_matches(&s1.color, COLOR_TOLERANCE)
                || (s2.start.y - y1).abs() < tolerance
                || (s2.min_x() - x_left).abs() > tolerance
                || (s2.max_x() - x_right).abs() > tolerance
            {
                continue;
            }

            let y2 = s2.start.y;
            let span = (y1.min(y2), y1.max(y2));
            let left = find_vertical(segments, &used, [i, j], s1, x_left, span, tolerance);
            let right = find_vertical(segments, &used, [i, j], s1, x_right, span, tolerance);

            if let (Some(left), Some(right)) = (left, right) {
                if left == right {
                    continue;
                }
                out.rects.push(Rect::new(
                    x_left,
                    span.0,
                    x_right - x_left,
                    span.1 - span.0,
                    promoted_color(s1.color),
                ));
                for k in [i, j, left, right] {
                    used[k] = true;
                }
                break;
            }
        }
    }

    out.lines = segments
        .iter()
        .zip(&used)
        .filter(|&(_, &u)| !u)
        .map(|(s, _)| s.to_line(line_width))
        .collect();

    tracing::trace!(
        "Reconstructed {} rects from {} segments, {} left as lines",
        out.rects.len(),
        segments.len(),
        out.lines.len()
    );
    out
}
