//! Host marker style tokens.

use sdfplot_render::MarkerType;

/// Marker shape for a style token. Unknown tokens draw circles.
pub fn marker_from_style(style: &str) -> MarkerType {
    match style {
        "s" => MarkerType::Square,
        "d" => MarkerType::Diamond,
        "+" => MarkerType::Plus,
        "x" => MarkerType::Cross,
        "^" => MarkerType::TriangleUp,
        "v" => MarkerType::TriangleDown,
        "*" | "p" => MarkerType::Star,
        "." => MarkerType::Point,
        _ => MarkerType::Circle,
    }
}

/// Canonical token for `marker`, the inverse of [`marker_from_style`].
pub fn style_token(marker: MarkerType) -> &'static str {
    match marker {
        MarkerType::Circle => "o",
        MarkerType::Square => "s",
        MarkerType::Diamond => "d",
        MarkerType::Plus => "+",
        MarkerType::Cross => "x",
        MarkerType::TriangleUp => "^",
        MarkerType::TriangleDown => "v",
        MarkerType::Star => "*",
        MarkerType::Point => ".",
    }
}
