//! Shape helpers that turn simulation state into point lists for a `Canvas`.

use glam::Vec2;
use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent};

/// Default flattening tolerance in pixels.
pub const CURVE_TOLERANCE: f32 = 0.25;

/// Catmull-Rom spline through `points`, built as cubic Béziers and flattened
/// to a polyline. End segments reuse the end points as their outer
/// neighbours, so the curve starts and ends exactly on the first and last point.
pub fn smooth_curve(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    match points.len() {
        0 => return Vec::new(),
        1 | 2 => return points.to_vec(),
        _ => {}
    }

    let mut builder = Path::builder();
    builder.begin(point(points[0].x, points[0].y));
    let last = points.len() - 1;
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        let c1 = p1 + (p2 - p0) / 6.0;
        let c2 = p2 - (p3 - p1) / 6.0;
        builder.cubic_bezier_to(point(c1.x, c1.y), point(c2.x, c2.y), point(p2.x, p2.y));
    }
    builder.end(false);
    let path = builder.build();

    let mut out = Vec::with_capacity(points.len() * 8);
    for event in path.iter().flattened(tolerance) {
        match event {
            PathEvent::Begin { at } => out.push(Vec2::new(at.x, at.y)),
            PathEvent::Line { to, .. } => out.push(Vec2::new(to.x, to.y)),
            _ => {}
        }
    }
    out
}

/// Outline of a `tips`-pointed star centred on the origin, first tip pointing up.
pub fn star_polygon(outer: f32, inner: f32, tips: usize) -> Vec<Vec2> {
    let tips = tips.max(2);
    let step = std::f32::consts::PI / tips as f32;
    (0..tips * 2)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = i as f32 * step - std::f32::consts::FRAC_PI_2;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}
