//! Path and color helpers shared by the renderers.

use kurbo::BezPath;

/// Saturating clamp of `value` into `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    min.max(max.min(value))
}

/// Effective corner radius for a `w`×`h` rounded rectangle.
///
/// Capped at `min(r, w/2, h/2)` so the path never self-intersects on small
/// or thin rectangles.
pub(crate) fn effective_corner_radius(radius: f64, width: f64, height: f64) -> f64 {
    radius.min(width / 2.0).min(height / 2.0).max(0.0)
}

/// Build a closed rounded-rectangle path with quadratic corner arcs.
///
/// Usable both as a fill shape and as a clip region. Non-positive extents
/// produce an empty path: a zero-area draw, not an error.
pub fn rounded_rect_path(x: f64, y: f64, width: f64, height: f64, radius: f64) -> BezPath {
    let mut path = BezPath::new();
    if width <= 0.0 || height <= 0.0 {
        return path;
    }

    let r = effective_corner_radius(radius, width, height);
    path.move_to((x + r, y));
    path.line_to((x + width - r, y));
    path.quad_to((x + width, y), (x + width, y + r));
    path.line_to((x + width, y + height - r));
    path.quad_to((x + width, y + height), (x + width - r, y + height));
    path.line_to((x + r, y + height));
    path.quad_to((x, y + height), (x, y + height - r));
    path.line_to((x, y + r));
    path.quad_to((x, y), (x + r, y));
    path.close_path();
    path
}

/// Add `amount` to each RGB channel of a 6-digit hex color, clamping to
/// `[0, 255]`, and re-encode as 6-digit hex.
///
/// Malformed or short input is returned unchanged (`#000000` if empty);
/// color fields are free-form user text, so this never errors.
pub fn adjust_color(hex: &str, amount: i32) -> String {
    if hex.is_empty() {
        return "#000000".to_string();
    }
    if hex.len() < 7 || !hex.starts_with('#') {
        return hex.to_string();
    }

    let channel = |range: std::ops::Range<usize>| -> Option<i32> {
        i32::from_str_radix(hex.get(range)?, 16).ok()
    };
    let (Some(r), Some(g), Some(b)) = (channel(1..3), channel(3..5), channel(5..7)) else {
        return hex.to_string();
    };

    let adjusted = |c: i32| (c + amount).clamp(0, 255);
    format!(
        "#{:02x}{:02x}{:02x}",
        adjusted(r),
        adjusted(g),
        adjusted(b)
    )
}

/// Append a 2-digit hex alpha suffix for `opacity_percent` (clamped to
/// `[0, 100]`) to a 6-digit hex color, producing an 8-digit RGBA hex.
pub fn color_with_alpha(hex: &str, opacity_percent: f64) -> String {
    let clamped = clamp(opacity_percent, 0.0, 100.0);
    let alpha = ((clamped / 100.0) * 255.0).round() as u8;
    format!("{hex}{alpha:02x}")
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
