//! Geometry for thick 2D strokes

use glam::Vec2;

/// Quad covering a line segment of the given width (butt caps).
///
/// Returns `None` for zero-length or non-finite segments.
pub fn line_quad(from: Vec2, to: Vec2, width: f32) -> Option<[Vec2; 4]> {
    let dir = (to - from).try_normalize()?;
    if width <= 0.0 || !width.is_finite() {
        return None;
    }
    let offset = dir.perp() * (width / 2.0);
    Some([from + offset, to + offset, to - offset, from - offset])
}

/// Quads for every edge of a closed polygon
pub fn outline_quads(points: &[Vec2], width: f32) -> impl Iterator<Item = [Vec2; 4]> + '_ {
    let n = points.len();
    (0..n).filter_map(move |i| line_quad(points[i], points[(i + 1) % n], width))
}

/// Axis-aligned bounds of a point set, or `None` if empty or non-finite
pub fn bounds(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    let (min, max) = points
        .iter()
        .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
    (min.is_finite() && max.is_finite()).then_some((min, max))
}
