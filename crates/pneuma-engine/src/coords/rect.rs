use serde::{Deserialize, Serialize};

use super::Vec2;

/// Axis-aligned bounding box in scene units.
///
/// `origin` is the minimum corner (bottom-left, since +Y points up).
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    #[inline]
    pub fn from_center_size(center: Vec2, w: f32, h: f32) -> Self {
        Rect::new(center.x - w * 0.5, center.y - h * 0.5, w, h)
    }

    /// Smallest box containing every point. `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let (mut lo, mut hi) = (first, first);
        for p in it {
            lo = Vec2::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Vec2::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        Some(Rect::from_origin_size(lo, hi - lo))
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn top(self) -> Vec2 {
        self.critical_point(Vec2::UP)
    }

    #[inline]
    pub fn bottom(self) -> Vec2 {
        self.critical_point(Vec2::DOWN)
    }

    #[inline]
    pub fn left(self) -> Vec2 {
        self.critical_point(Vec2::LEFT)
    }

    #[inline]
    pub fn right(self) -> Vec2 {
        self.critical_point(Vec2::RIGHT)
    }

    /// Anchor point selected per axis by the sign of `dir`:
    /// negative picks the minimum edge, positive the maximum, zero the centre.
    pub fn critical_point(self, dir: Vec2) -> Vec2 {
        let r = self.normalized();
        let pick = |d: f32, lo: f32, len: f32| {
            if d > 0.0 {
                lo + len
            } else if d < 0.0 {
                lo
            } else {
                lo + len * 0.5
            }
        };
        Vec2::new(pick(dir.x, r.origin.x, r.size.x), pick(dir.y, r.origin.y, r.size.y))
    }

    #[inline]
    pub fn translated(self, by: Vec2) -> Self {
        Rect::from_origin_size(self.origin + by, self.size)
    }

    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        let a = self.normalized();
        let b = other.normalized();
        let lo = Vec2::new(a.origin.x.min(b.origin.x), a.origin.y.min(b.origin.y));
        let hi = Vec2::new(a.max().x.max(b.max().x), a.max().y.max(b.max().y));
        Rect::from_origin_size(lo, hi - lo)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Closed containment: [min, max].
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.origin.x
            && p.y >= r.origin.y
            && p.x <= (r.origin.x + r.size.x)
            && p.y <= (r.origin.y + r.size.y)
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.origin.x.max(b.origin.x);
        let y0 = a.origin.y.max(b.origin.y);
        let x1 = (a.origin.x + a.size.x).min(b.origin.x + b.size.x);
        let y1 = (a.origin.y + a.size.y).min(b.origin.y + b.size.y);

        let w = x1 - x0;
        let h = y1 - y0;

        if w <= 0.0 || h <= 0.0 {
            None
        } else {
            Some(Rect::new(x0, y0, w, h))
        }
    }

    /// Grows the box by `margin` on every side.
    #[inline]
    pub fn inflated(self, margin: f32) -> Rect {
        let r = self.normalized();
        Rect::new(
            r.origin.x - margin,
            r.origin.y - margin,
            r.size.x + 2.0 * margin,
            r.size.y + 2.0 * margin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_positive_is_identity() {
        let rect = r(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.normalized(), rect);
    }

    #[test]
    fn normalized_negative_width() {
        let rect = r(10.0, 0.0, -4.0, 5.0);
        let n = rect.normalized();
        assert_eq!(n.origin.x, 6.0);
        assert_eq!(n.size.x, 4.0);
    }

    #[test]
    fn normalized_negative_height() {
        let rect = r(0.0, 10.0, 5.0, -3.0);
        let n = rect.normalized();
        assert_eq!(n.origin.y, 7.0);
        assert_eq!(n.size.y, 3.0);
    }

    // ── anchors ───────────────────────────────────────────────────────────

    #[test]
    fn critical_points_follow_direction_signs() {
        let rect = r(-1.0, -2.0, 2.0, 4.0);
        assert_eq!(rect.top(), Vec2::new(0.0, 2.0));
        assert_eq!(rect.bottom(), Vec2::new(0.0, -2.0));
        assert_eq!(rect.left(), Vec2::new(-1.0, 0.0));
        assert_eq!(rect.critical_point(Vec2::UR), Vec2::new(1.0, 2.0));
        assert_eq!(rect.critical_point(Vec2::DL), Vec2::new(-1.0, -2.0));
        assert_eq!(rect.critical_point(Vec2::ORIGIN), rect.center());
    }

    #[test]
    fn from_points_spans_all_inputs() {
        let b = Rect::from_points([Vec2::new(1.0, 5.0), Vec2::new(-2.0, 0.0), Vec2::new(3.0, 1.0)]).unwrap();
        assert_eq!(b, r(-2.0, 0.0, 5.0, 5.0));
        assert!(Rect::from_points(core::iter::empty()).is_none());
    }

    #[test]
    fn union_covers_both() {
        let u = r(0.0, 0.0, 1.0, 1.0).union(r(2.0, -1.0, 1.0, 1.0));
        assert_eq!(u, r(0.0, -1.0, 3.0, 2.0));
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_interior_point() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn contains_edges_inclusive() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(0.0, 0.0)));
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn contains_outside() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(-1.0, 5.0)));
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(5.0, -1.0)));
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(5.0, 5.0, 10.0, 10.0);
        let i = a.intersect(b).unwrap();
        assert_eq!(i, r(5.0, 5.0, 5.0, 5.0));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        // Rects share an edge; a zero-width overlap is not a valid intersection.
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersect(b).is_none());
    }

    #[test]
    fn intersect_disjoint_returns_none() {
        let a = r(0.0, 0.0, 5.0, 5.0);
        let b = r(20.0, 20.0, 5.0, 5.0);
        assert!(a.intersect(b).is_none());
    }

    // ── is_empty ──────────────────────────────────────────────────────────

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(r(0.0, 0.0, 5.0, 0.0).is_empty());
    }
}
