//! Geometric primitives.
//!
//! Each shape lives in its own file and provides:
//! - `bounds()`: exact axis-aligned bounds
//! - `transformed(&Affine)`: exact under similarity maps, flattened otherwise
//! - `outline(tolerance)`: polygon approximation used by booleans and exporters
//! - `start()` / `end()`: endpoints used to chain parts together

pub(crate) mod annulus;
pub(crate) mod arc;
pub(crate) mod arrow;
pub(crate) mod circle;
pub(crate) mod path;
pub(crate) mod rounded_rect;
pub(crate) mod text;

use core::f32::consts::TAU;

use kurbo::Shape as _;
use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Rect, Vec2};

pub use annulus::AnnulusShape;
pub use arc::ArcShape;
pub use arrow::ArrowShape;
pub use circle::CircleShape;
pub use path::PathShape;
pub use rounded_rect::RoundedRectShape;
pub use text::TextShape;

/// Default chord tolerance (scene units) for curve flattening.
pub const DEFAULT_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Path(PathShape),
    Arc(ArcShape),
    Circle(CircleShape),
    Annulus(AnnulusShape),
    RoundedRect(RoundedRectShape),
    Arrow(ArrowShape),
    Text(TextShape),
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Path(s) => s.bounds(),
            Shape::Arc(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Annulus(s) => s.bounds(),
            Shape::RoundedRect(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    pub fn transformed(&self, t: &Affine) -> Shape {
        match self {
            Shape::Path(s) => Shape::Path(s.transformed(t)),
            Shape::Arc(s) => s.transformed(t),
            Shape::Circle(s) => s.transformed(t),
            Shape::Annulus(s) => s.transformed(t),
            Shape::RoundedRect(s) => s.transformed(t),
            Shape::Arrow(s) => Shape::Arrow(s.transformed(t)),
            Shape::Text(s) => Shape::Text(s.transformed(t)),
        }
    }

    #[inline]
    pub fn transform(&mut self, t: &Affine) {
        *self = self.transformed(t);
    }

    /// Polygon approximation of the shape boundary.
    ///
    /// Open shapes (lines, arcs) return their polyline; text returns its box.
    pub fn outline(&self, tolerance: f32) -> Vec<Vec2> {
        match self {
            Shape::Path(s) => s.points.clone(),
            Shape::Arc(s) => s.outline(tolerance),
            Shape::Circle(s) => s.outline(tolerance),
            Shape::Annulus(s) => s.outline(tolerance),
            Shape::RoundedRect(s) => s.outline(tolerance),
            Shape::Arrow(s) => s.outline(),
            Shape::Text(s) => s.outline(),
        }
    }

    /// Whether the outline encloses an area.
    pub fn is_closed(&self) -> bool {
        match self {
            Shape::Path(s) => s.closed,
            Shape::Arc(_) | Shape::Arrow(_) => false,
            _ => true,
        }
    }

    pub fn start(&self) -> Vec2 {
        match self {
            Shape::Path(s) => s.start(),
            Shape::Arc(s) => s.start(),
            Shape::Circle(s) => s.center + Vec2::RIGHT * s.radius,
            Shape::Annulus(s) => s.center + Vec2::from_angle(s.start_angle) * s.outer,
            Shape::RoundedRect(s) => s.outline(DEFAULT_TOLERANCE).first().copied().unwrap_or(s.center),
            Shape::Arrow(s) => s.start,
            Shape::Text(s) => s.center,
        }
    }

    pub fn end(&self) -> Vec2 {
        match self {
            Shape::Path(s) => s.end(),
            Shape::Arc(s) => s.end(),
            Shape::Arrow(s) => s.end,
            _ => self.start(),
        }
    }
}

/// Flattens an arc into a polyline whose chords stay within `tolerance`.
///
/// The first and last points land on the arc's exact endpoints.
pub(crate) fn flatten_arc(center: Vec2, radius: f32, start: f32, sweep: f32, tolerance: f32) -> Vec<Vec2> {
    let arc = kurbo::Arc {
        center: center.into(),
        radii: kurbo::Vec2::new(radius.into(), radius.into()),
        start_angle: start.into(),
        sweep_angle: sweep.into(),
        x_rotation: 0.0,
    };
    let tolerance = f64::from(tolerance.max(1e-6));
    let mut pts = Vec::new();
    kurbo::flatten(arc.path_elements(tolerance), tolerance, |el| match el {
        kurbo::PathEl::MoveTo(p) | kurbo::PathEl::LineTo(p) => pts.push(Vec2::from(p)),
        _ => {}
    });
    pts
}

/// Exact bounds of an arc: both endpoints plus every axis extreme inside the sweep.
pub(crate) fn arc_bounds(center: Vec2, radius: f32, start: f32, sweep: f32) -> Rect {
    if sweep.abs() >= TAU {
        return Rect::from_center_size(center, 2.0 * radius, 2.0 * radius);
    }
    let mut pts = vec![
        center + Vec2::from_angle(start) * radius,
        center + Vec2::from_angle(start + sweep) * radius,
    ];
    let (lo, hi) = if sweep >= 0.0 { (start, start + sweep) } else { (start + sweep, start) };
    // First multiple of pi/2 at or after `lo`.
    let quarter = core::f32::consts::FRAC_PI_2;
    let mut k = (lo / quarter).ceil();
    while k * quarter <= hi {
        pts.push(center + Vec2::from_angle(k * quarter) * radius);
        k += 1.0;
    }
    Rect::from_points(pts).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn quarter_arc_bounds_are_tight() {
        let b = arc_bounds(Vec2::ORIGIN, 1.0, 0.0, FRAC_PI_2);
        assert!(approx(b.min().x, 0.0) && approx(b.min().y, 0.0));
        assert!(approx(b.max().x, 1.0) && approx(b.max().y, 1.0));
    }

    #[test]
    fn half_arc_bounds_include_the_top_extreme() {
        let b = arc_bounds(Vec2::ORIGIN, 2.0, 0.0, PI);
        assert!(approx(b.max().y, 2.0));
        assert!(approx(b.min().y, 0.0));
        assert!(approx(b.width(), 4.0));
    }

    #[test]
    fn negative_sweep_bounds_match_positive_equivalent() {
        let a = arc_bounds(Vec2::ORIGIN, 1.0, PI, -FRAC_PI_2);
        let b = arc_bounds(Vec2::ORIGIN, 1.0, FRAC_PI_2, FRAC_PI_2);
        assert!(approx(a.min().x, b.min().x) && approx(a.max().y, b.max().y));
    }

    #[test]
    fn flattened_arc_ends_on_exact_endpoints() {
        let pts = flatten_arc(Vec2::new(1.0, 1.0), 1.0, 0.0, PI, 1e-3);
        assert!((pts[0] - Vec2::new(2.0, 1.0)).length() < 1e-5);
        assert!((pts[pts.len() - 1] - Vec2::new(0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn flattened_arc_stays_within_tolerance() {
        let center = Vec2::new(-2.0, 0.5);
        let pts = flatten_arc(center, 3.0, 0.2, -2.5, 1e-3);
        assert!(pts.len() > 8);
        for pair in pts.windows(2) {
            let mid = (pair[0] + pair[1]) * 0.5;
            assert!((mid - center).length() > 3.0 - 2e-3);
        }
    }
}
