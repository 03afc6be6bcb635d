//! Planar polygon utilities.
//!
//! Polygons are vertex lists without a repeated closing vertex. Orientation
//! is free on input; results are counter-clockwise.

mod boolean;

use serde::{Deserialize, Serialize};

use crate::coords::Vec2;
use crate::paint::Style;
use crate::scene::Node;

pub use boolean::polygon_boolean;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOperation {
    Union,
    Intersection,
}

/// Shoelace area; positive for counter-clockwise polygons.
pub fn signed_area(poly: &[Vec2]) -> f32 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        acc += poly[i].cross(poly[(i + 1) % n]);
    }
    acc * 0.5
}

/// Convex in the weak sense: collinear runs are allowed.
pub fn is_convex(poly: &[Vec2]) -> bool {
    let n = poly.len();
    if n < 4 {
        return n == 3;
    }
    let mut sign = 0.0f32;
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        let c = poly[(i + 2) % n];
        let z = (b - a).cross(c - b);
        if z.abs() <= 1e-7 * (b - a).length().max(1.0) * (c - b).length().max(1.0) {
            continue;
        }
        if sign == 0.0 {
            sign = z.signum();
        } else if z.signum() != sign {
            return false;
        }
    }
    true
}

/// Even-odd containment test. Points on the boundary may land either way.
pub fn contains_point(poly: &[Vec2], p: Vec2) -> bool {
    let n = poly.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (poly[i], poly[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Drops repeated consecutive vertices (including a closing duplicate).
pub(crate) fn sanitized(poly: &[Vec2]) -> Vec<Vec2> {
    let mut out: Vec<Vec2> = Vec::with_capacity(poly.len());
    for &p in poly {
        if out.last().is_none_or(|q| q.distance(p) > 1e-7) {
            out.push(p);
        }
    }
    while out.len() > 1 && out[0].distance(out[out.len() - 1]) <= 1e-7 {
        out.pop();
    }
    out
}

/// Boolean of two leaf nodes' outlines.
///
/// The result keeps the style of `a`: a single polygon for one region, a
/// group for several, an empty group when nothing remains.
pub fn boolean(a: &Node, b: &Node, op: BooleanOperation) -> Node {
    let style = a.style().copied().unwrap_or_default();
    let regions = polygon_boolean(&a.outline(), &b.outline(), op);
    from_regions(regions, style)
}

pub(crate) fn from_regions(mut regions: Vec<Vec<Vec2>>, style: Style) -> Node {
    let with_style = |pts| {
        let mut n = Node::polygon(pts);
        if let Node::Shape(it) = &mut n {
            it.style = style;
        }
        n
    };
    match regions.len() {
        0 => Node::empty(),
        1 => with_style(regions.remove(0)),
        _ => Node::group(regions.into_iter().map(with_style).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f32, y: f32, s: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(x, y),
            Vec2::new(x + s, y),
            Vec2::new(x + s, y + s),
            Vec2::new(x, y + s),
        ]
    }

    #[test]
    fn area_sign_follows_orientation() {
        let mut sq = square(0.0, 0.0, 2.0);
        assert!((signed_area(&sq) - 4.0).abs() < 1e-6);
        sq.reverse();
        assert!((signed_area(&sq) + 4.0).abs() < 1e-6);
    }

    #[test]
    fn convexity_allows_collinear_points() {
        let mut sq = square(0.0, 0.0, 2.0);
        sq.insert(1, Vec2::new(1.0, 0.0));
        assert!(is_convex(&sq));
        let l = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!(!is_convex(&l));
    }

    #[test]
    fn containment() {
        let sq = square(0.0, 0.0, 2.0);
        assert!(contains_point(&sq, Vec2::new(1.0, 1.0)));
        assert!(!contains_point(&sq, Vec2::new(3.0, 1.0)));
    }

    #[test]
    fn sanitize_removes_closing_duplicate() {
        let mut sq = square(0.0, 0.0, 1.0);
        sq.push(Vec2::ORIGIN);
        sq.insert(1, Vec2::ORIGIN);
        assert_eq!(sanitized(&sq).len(), 4);
    }

    #[test]
    fn node_boolean_keeps_first_style() {
        let a = Node::square(Vec2::ORIGIN, 2.0).fill(crate::paint::palette::BLUE_E, 1.0);
        let b = Node::square(Vec2::new(1.0, 1.0), 2.0);
        let out = boolean(&a, &b, BooleanOperation::Intersection);
        assert_eq!(out.style().map(|s| s.fill.color), Some(crate::paint::palette::BLUE_E));
        assert!((out.width() - 1.0).abs() < 1e-4);
    }
}
