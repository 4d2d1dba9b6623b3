//! Path translation: dash styles, closed-rectangle detection, segment candidates and
//! polyline expansion into capsules plus join circles.

use glam::{Vec2, Vec3};
use sdfplot_render::{Circle, Color, Line};

/// Distance under which two logical coordinates count as equal.
const CORNER_EPSILON: f64 = 0.1;

/// Minimum logical extent of a detected rectangle on both axes.
const MIN_RECT_EXTENT: f64 = 1.0;

/// `(dash_len, gap_len)` in pixels for a host line style; `(0, 0)` is solid.
pub fn dash_pattern(style: &str) -> (f32, f32) {
    match style {
        "--" => (8.0, 4.0),
        ":" => (2.0, 2.0),
        "-." => (8.0, 4.0),
        _ => (0.0, 0.0),
    }
}

/// Logical bounds `[min_x, min_y, max_x, max_y]` when a 4 or 5 point path traces the corners
/// of an axis-aligned box.
///
/// Five point paths must return to their start; four point paths may be open.
pub fn closed_rectangle(xs: &[f64], ys: &[f64]) -> Option<[f64; 4]> {
    let count = xs.len().min(ys.len());
    if !(4..=5).contains(&count) {
        return None;
    }
    let last = count - 1;
    let closed =
        (xs[0] - xs[last]).abs() < CORNER_EPSILON && (ys[0] - ys[last]).abs() < CORNER_EPSILON;
    if count == 5 && !closed {
        return None;
    }

    let min_x = xs[..4].iter().copied().fold(f64::INFINITY, f64::min);
    let max_x = xs[..4].iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_y = ys[..4].iter().copied().fold(f64::INFINITY, f64::min);
    let max_y = ys[..4].iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max_x - min_x <= MIN_RECT_EXTENT || max_y - min_y <= MIN_RECT_EXTENT {
        return None;
    }

    // One bit per corner; every point must sit on a corner and all four must be visited.
    let near = |a: f64, b: f64| (a - b).abs() < CORNER_EPSILON;
    let mut corners = 0u8;
    for i in 0..4 {
        let right = near(xs[i], max_x);
        let top = near(ys[i], max_y);
        if !(right || near(xs[i], min_x)) || !(top || near(ys[i], min_y)) {
            return None;
        }
        corners |= 1 << (usize::from(right) | usize::from(top) << 1);
    }

    (corners == 0b1111).then_some([min_x, min_y, max_x, max_y])
}

/// A two-point path in screen pixels, held back for rectangle reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSegment {
    pub start: Vec2,
    pub end: Vec2,
    pub color: Color,
    /// `(dash_len, gap_len)` as returned by [`dash_pattern`].
    pub dash: (f32, f32),
}

impl RawSegment {
    pub fn new(start: Vec2, end: Vec2, color: Color) -> Self {
        Self {
            start,
            end,
            color,
            dash: (0.0, 0.0),
        }
    }

    pub fn with_dash(mut self, dash: (f32, f32)) -> Self {
        self.dash = dash;
        self
    }

    pub fn is_solid(&self) -> bool {
        self.dash.0 == 0.0
    }

    pub fn is_horizontal(&self, tolerance: f32) -> bool {
        (self.start.y - self.end.y).abs() < tolerance
    }

    pub fn is_vertical(&self, tolerance: f32) -> bool {
        (self.start.x - self.end.x).abs() < tolerance
    }

    pub fn min_x(&self) -> f32 {
        self.start.x.min(self.end.x)
    }

    pub fn max_x(&self) -> f32 {
        self.start.x.max(self.end.x)
    }

    pub fn min_y(&self) -> f32 {
        self.start.y.min(self.end.y)
    }

    pub fn max_y(&self) -> f32 {
        self.start.y.max(self.end.y)
    }

    /// Demote to a line of `width` pixels, keeping the dash pattern.
    pub fn to_line(&self, width: f32) -> Line {
        let line = Line::new(self.start.extend(0.0), self.end.extend(0.0), width, self.color);
        if self.is_solid() {
            line
        } else {
            line.with_dash(self.dash.0, self.dash.1, 0.0)
        }
    }
}

/// Capsules and join circles for one polyline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub lines: Vec<Line>,
    pub joins: Vec<Circle>,
}

/// Expand `points` into one line per consecutive pair.
///
/// Each line carries the arc length before it as its dash offset so dashes continue across
/// vertices. Solid polylines get a circle of radius `width / 2` at every segment start to
/// round off the joins.
pub fn polyline(points: &[Vec3], width: f32, color: Color, dash: (f32, f32)) -> Polyline {
    let mut out = Polyline::default();
    if points.len() < 2 {
        return out;
    }

    let (dash_len, gap_len) = dash;
    let solid = dash_len == 0.0;
    let join_radius = width * 0.5;
    let mut arc_length = 0.0;

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        out.lines
            .push(Line::new(a, b, width, color).with_dash(dash_len, gap_len, arc_length));
        arc_length += a.distance(b);
        if solid {
            out.joins.push(Circle::new(a, join_radius, color));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_styles() {
        assert_eq!(dash_pattern("--"), (8.0, 4.0));
        assert_eq!(dash_pattern(":"), (2.0, 2.0));
        assert_eq!(dash_pattern("-."), (8.0, 4.0));
        assert_eq!(dash_pattern("-"), (0.0, 0.0));
        assert_eq!(dash_pattern(""), (0.0, 0.0));
    }

    #[test]
    fn closed_box_is_detected() {
        let xs = [10.0, 50.0, 50.0, 10.0, 10.0];
        let ys = [5.0, 5.0, 30.0, 30.0, 5.0];
        assert_eq!(closed_rectangle(&xs, &ys), Some([10.0, 5.0, 50.0, 30.0]));
        assert_eq!(closed_rectangle(&xs[..4], &ys[..4]), Some([10.0, 5.0, 50.0, 30.0]));
    }

    #[test]
    fn open_or_skewed_paths_are_not_boxes() {
        let xs = [10.0, 50.0, 50.0, 10.0, 12.0];
        let ys = [5.0, 5.0, 30.0, 30.0, 9.0];
        assert_eq!(closed_rectangle(&xs, &ys), None);

        let xs = [0.0, 40.0, 60.0, 0.0];
        let ys = [0.0, 0.0, 30.0, 30.0];
        assert_eq!(closed_rectangle(&xs, &ys), None);

        assert_eq!(closed_rectangle(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]), None);

        // Closed triangle: three distinct corners plus the repeated start.
        let xs = [0.0, 10.0, 10.0, 0.0];
        let ys = [0.0, 0.0, 10.0, 0.0];
        assert_eq!(closed_rectangle(&xs, &ys), None);
        let xs = [0.0, 10.0, 10.0, 0.0, 0.0];
        let ys = [0.0, 0.0, 10.0, 0.0, 0.0];
        assert_eq!(closed_rectangle(&xs, &ys), None);
    }

    #[test]
    fn thin_boxes_are_not_filled() {
        let xs = [0.0, 0.5, 0.5, 0.0, 0.0];
        let ys = [0.0, 0.0, 30.0, 30.0, 0.0];
        assert_eq!(closed_rectangle(&xs, &ys), None);
    }

    #[test]
    fn five_point_polyline_has_four_lines_and_joins() {
        let points: Vec<Vec3> = (0..5)
            .map(|i| Vec3::new(i as f32 * 10.0, (i % 2) as f32 * 5.0, 0.0))
            .collect();
        let out = polyline(&points, 2.0, Color::BLACK, (0.0, 0.0));
        assert_eq!(out.lines.len(), 4);
        assert_eq!(out.joins.len(), 4);
        assert_eq!(out.joins[0].radius, 1.0);
        assert_eq!(out.joins[3].center, points[3]);
    }

    #[test]
    fn dashed_polyline_carries_arc_length() {
        let points = [Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0), Vec3::new(3.0, 14.0, 0.0)];
        let out = polyline(&points, 1.0, Color::BLACK, (8.0, 4.0));
        assert!(out.joins.is_empty());
        assert_eq!(out.lines[0].dash_offset, 0.0);
        assert_eq!(out.lines[1].dash_offset, 5.0);
        assert!(out.lines.iter().all(Line::is_dashed));
    }

    #[test]
    fn segment_line_keeps_dash() {
        let seg = RawSegment::new(Vec2::ZERO, Vec2::new(100.0, 0.0), Color::BLACK)
            .with_dash(dash_pattern(":"));
        let line = seg.to_line(1.5);
        assert!(line.is_dashed());
        assert_eq!((line.dash_len, line.gap_len, line.dash_offset), (2.0, 2.0, 0.0));
        assert_eq!(line.width, 1.5);

        let solid = RawSegment::new(Vec2::ZERO, Vec2::X, Color::BLACK).to_line(1.0);
        assert!(!solid.is_dashed());
    }

    #[test]
    fn segment_orientation() {
        let h = RawSegment::new(Vec2::new(0.0, 10.0), Vec2::new(50.0, 11.0), Color::BLACK);
        assert!(h.is_horizontal(2.0));
        assert!(!h.is_vertical(2.0));
        assert_eq!((h.min_x(), h.max_x()), (0.0, 50.0));
        assert_eq!(h.to_line(3.0).width, 3.0);
    }
}
