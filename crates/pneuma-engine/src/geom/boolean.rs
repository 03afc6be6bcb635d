use core::fmt::Write as _;

use path_bool::{path_boolean, path_from_path_data, path_to_path_data, FillRule, PathBooleanOperation};

use crate::coords::Vec2;

use super::{sanitized, signed_area, BooleanOperation};

/// Regions smaller than this (relative to the inputs) are dropped.
const AREA_EPS: f32 = 1e-6;
/// Chord tolerance when the boolean hands back curved segments.
const FLATTEN_TOLERANCE: f64 = 1e-4;

/// Boolean of two simple polygons.
///
/// Both operands are filled non-zero. Shared edges and touching vertices
/// are handled by the path boolean itself; results are counter-clockwise
/// with collinear runs merged.
pub fn polygon_boolean(a: &[Vec2], b: &[Vec2], op: BooleanOperation) -> Vec<Vec<Vec2>> {
    let a = ccw(sanitized(a));
    let b = ccw(sanitized(b));
    if a.len() < 3 || b.len() < 3 {
        return match op {
            BooleanOperation::Intersection => Vec::new(),
            BooleanOperation::Union => [a, b].into_iter().filter(|p| p.len() >= 3).collect(),
        };
    }

    let operation = match op {
        BooleanOperation::Union => PathBooleanOperation::Union,
        BooleanOperation::Intersection => PathBooleanOperation::Intersection,
    };
    let lhs = path_from_path_data(&path_data(&a));
    let rhs = path_from_path_data(&path_data(&b));
    let Ok(paths) = path_boolean(&lhs, FillRule::NonZero, &rhs, FillRule::NonZero, operation) else {
        log::warn!("polygon {op:?} failed; keeping the operands");
        return match op {
            BooleanOperation::Intersection => Vec::new(),
            BooleanOperation::Union => vec![a, b],
        };
    };

    let scale = (signed_area(&a).abs() + signed_area(&b).abs()).max(f32::MIN_POSITIVE);
    let regions: Vec<Vec<Vec2>> = paths
        .iter()
        .flat_map(|p| contours(&path_to_path_data(p, 1e-6)))
        .map(|r| ccw(merge_collinear(sanitized(&r))))
        .filter(|r| r.len() >= 3 && signed_area(r).abs() > AREA_EPS * scale)
        .collect();
    log::trace!("polygon {op:?}: {} + {} vertices -> {} regions", a.len(), b.len(), regions.len());
    regions
}

fn ccw(mut poly: Vec<Vec2>) -> Vec<Vec2> {
    if signed_area(&poly) < 0.0 {
        poly.reverse();
    }
    poly
}

/// `M x y L x y ... Z`
fn path_data(poly: &[Vec2]) -> String {
    let mut d = String::with_capacity(poly.len() * 24);
    for (i, p) in poly.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(d, "{cmd} {} {} ", p.x, p.y);
    }
    d.push('Z');
    d
}

/// Splits path data into closed polylines, flattening any curves.
fn contours(data: &str) -> Vec<Vec<Vec2>> {
    let path = match kurbo::BezPath::from_svg(data) {
        Ok(path) => path,
        Err(err) => {
            log::warn!("unreadable boolean result: {err}");
            return Vec::new();
        }
    };
    let mut out: Vec<Vec<Vec2>> = Vec::new();
    let mut current = Vec::new();
    path.flatten(FLATTEN_TOLERANCE, |el| match el {
        kurbo::PathEl::MoveTo(p) => {
            if current.len() >= 3 {
                out.push(core::mem::take(&mut current));
            }
            current.clear();
            current.push(Vec2::from(p));
        }
        kurbo::PathEl::LineTo(p) => current.push(Vec2::from(p)),
        kurbo::PathEl::ClosePath => {
            if current.len() >= 3 {
                out.push(core::mem::take(&mut current));
            }
            current.clear();
        }
        _ => {}
    });
    if current.len() >= 3 {
        out.push(current);
    }
    out
}

/// Drops vertices lying on the line through their neighbours.
fn merge_collinear(poly: Vec<Vec2>) -> Vec<Vec2> {
    let mut poly = poly;
    let mut i = 0;
    while poly.len() > 3 && i < poly.len() {
        let n = poly.len();
        let (prev, cur, next) = (poly[(i + n - 1) % n], poly[i], poly[(i + 1) % n]);
        let (u, v) = (cur - prev, next - cur);
        if u.cross(v).abs() <= 1e-5 * u.length().max(1e-3) * v.length().max(1e-3) && u.dot(v) >= 0.0 {
            poly.remove(i);
        } else {
            i += 1;
        }
    }
    poly
}
