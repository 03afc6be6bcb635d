use super::Vec2;

/// 2D affine transformation: `p' = M·p + t`.
///
/// Thin wrapper over [`kurbo::Affine`] that speaks scene [`Vec2`]s and the
/// "about a centre" constructors components are built from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine(kurbo::Affine);

/// Decomposition of an affine map that preserves circles.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Similarity {
    pub scale: f32,
    /// Rotation applied after the optional mirror across the X axis.
    pub rotation: f32,
    pub mirrored: bool,
}

impl Affine {
    pub const IDENTITY: Affine = Affine(kurbo::Affine::IDENTITY);

    #[inline]
    pub fn translate(by: Vec2) -> Self {
        Affine(kurbo::Affine::translate((f64::from(by.x), f64::from(by.y))))
    }

    /// Counter-clockwise rotation by `angle` radians about `center`.
    pub fn rotate_about(center: Vec2, angle: f32) -> Self {
        Self::about(center, kurbo::Affine::rotate(angle.into()))
    }

    /// Uniform scaling by `factor` about `center`.
    pub fn scale_about(center: Vec2, factor: f32) -> Self {
        Self::about(center, kurbo::Affine::scale(factor.into()))
    }

    /// Scales along a single axis direction by `factor` about `center`.
    ///
    /// `axis` need not be normalized; a zero axis yields the identity.
    pub fn stretch_about(center: Vec2, axis: Vec2, factor: f32) -> Self {
        let Some((x, y)) = unit(axis) else {
            return Self::IDENTITY;
        };
        // I + (k - 1)·u·uᵀ
        let k = f64::from(factor) - 1.0;
        let lin = kurbo::Affine::new([1.0 + k * x * x, k * x * y, k * x * y, 1.0 + k * y * y, 0.0, 0.0]);
        Self::about(center, lin)
    }

    /// Half-turn about the in-plane `axis` through `center`, seen from the
    /// front: a reflection across that line. Flipping about `UP` mirrors X.
    pub fn flip_about(center: Vec2, axis: Vec2) -> Self {
        let Some((x, y)) = unit(axis) else {
            return Self::IDENTITY;
        };
        // 2·u·uᵀ - I
        let lin = kurbo::Affine::new([2.0 * x * x - 1.0, 2.0 * x * y, 2.0 * x * y, 2.0 * y * y - 1.0, 0.0, 0.0]);
        Self::about(center, lin)
    }

    fn about(center: Vec2, lin: kurbo::Affine) -> Self {
        let c = kurbo::Vec2::new(center.x.into(), center.y.into());
        Affine(kurbo::Affine::translate(c) * lin * kurbo::Affine::translate(-c))
    }

    /// `self ∘ inner`: applies `inner` first, then `self`.
    #[inline]
    pub fn then_after(self, inner: Affine) -> Affine {
        Affine(self.0 * inner.0)
    }

    /// Applies `self` first, then `outer`.
    #[inline]
    pub fn then(self, outer: Affine) -> Affine {
        outer.then_after(self)
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        (self.0 * kurbo::Point::from(p)).into()
    }

    /// Applies the linear part only.
    #[inline]
    pub fn apply_vector(&self, v: Vec2) -> Vec2 {
        let [a, b, c, d, _, _] = self.0.as_coeffs();
        let (x, y) = (f64::from(v.x), f64::from(v.y));
        Vec2::new((a * x + c * y) as f32, (b * x + d * y) as f32)
    }

    #[inline]
    pub fn determinant(&self) -> f32 {
        self.0.determinant() as f32
    }

    /// Returns the similarity decomposition when the map keeps circles round.
    pub fn as_similarity(&self) -> Option<Similarity> {
        let [a, b, c, d, _, _] = self.0.as_coeffs();
        let col0 = a * a + b * b;
        let col1 = c * c + d * d;
        let dot = a * c + b * d;
        let tol = 1e-5 * col0.max(col1).max(1.0);
        if (col0 - col1).abs() > tol || dot.abs() > tol || col0 <= 0.0 {
            return None;
        }
        Some(Similarity {
            scale: col0.sqrt() as f32,
            rotation: b.atan2(a) as f32,
            mirrored: self.0.determinant() < 0.0,
        })
    }
}

fn unit(axis: Vec2) -> Option<(f64, f64)> {
    let (x, y) = (f64::from(axis.x), f64::from(axis.y));
    let len = x.hypot(y);
    (len > 0.0).then(|| (x / len, y / len))
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::{FRAC_PI_2, PI};

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn rotation_about_point_keeps_center_fixed() {
        let c = Vec2::new(1.0, 1.0);
        let t = Affine::rotate_about(c, FRAC_PI_2);
        assert!(close(t.apply(c), c));
        assert!(close(t.apply(Vec2::new(2.0, 1.0)), Vec2::new(1.0, 2.0)));
    }

    #[test]
    fn stretch_along_x_only_moves_x() {
        let t = Affine::stretch_about(Vec2::new(1.0, 0.0), Vec2::RIGHT, 2.0);
        assert!(close(t.apply(Vec2::new(2.0, 5.0)), Vec2::new(3.0, 5.0)));
        assert!(t.as_similarity().is_none());
    }

    #[test]
    fn flip_about_up_mirrors_x() {
        let t = Affine::flip_about(Vec2::ORIGIN, Vec2::UP);
        assert!(close(t.apply(Vec2::new(2.0, 3.0)), Vec2::new(-2.0, 3.0)));
        let s = t.as_similarity().unwrap();
        assert!(s.mirrored);
        assert!((s.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_axis_is_identity() {
        assert_eq!(Affine::flip_about(Vec2::UP, Vec2::ORIGIN), Affine::IDENTITY);
        assert_eq!(Affine::stretch_about(Vec2::UP, Vec2::ORIGIN, 3.0), Affine::IDENTITY);
    }

    #[test]
    fn composition_applies_inner_first() {
        let shift = Affine::translate(Vec2::RIGHT);
        let rot = Affine::rotate_about(Vec2::ORIGIN, PI);
        // shift then rotate: (0,0) -> (1,0) -> (-1,0)
        assert!(close(shift.then(rot).apply(Vec2::ORIGIN), Vec2::LEFT));
    }

    #[test]
    fn vectors_ignore_the_translation() {
        let t = Affine::translate(Vec2::new(5.0, 5.0)).then(Affine::rotate_about(Vec2::UP, FRAC_PI_2));
        assert!(close(t.apply_vector(Vec2::RIGHT), Vec2::UP));
    }

    #[test]
    fn similarity_reports_scale_and_rotation() {
        let t = Affine::rotate_about(Vec2::ORIGIN, 0.3).then(Affine::scale_about(Vec2::ORIGIN, 2.0));
        let s = t.as_similarity().unwrap();
        assert!((s.scale - 2.0).abs() < 1e-5);
        assert!((s.rotation - 0.3).abs() < 1e-5);
        assert!(!s.mirrored);
    }
}
