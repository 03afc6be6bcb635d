use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// 2D vector in scene units (+X right, +Y up).
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ORIGIN: Vec2 = Vec2::new(0.0, 0.0);
    pub const LEFT: Vec2 = Vec2::new(-1.0, 0.0);
    pub const RIGHT: Vec2 = Vec2::new(1.0, 0.0);
    pub const UP: Vec2 = Vec2::new(0.0, 1.0);
    pub const DOWN: Vec2 = Vec2::new(0.0, -1.0);
    pub const UL: Vec2 = Vec2::new(-1.0, 1.0);
    pub const UR: Vec2 = Vec2::new(1.0, 1.0);
    pub const DL: Vec2 = Vec2::new(-1.0, -1.0);
    pub const DR: Vec2 = Vec2::new(1.0, -1.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector at `angle` radians from +X, counter-clockwise.
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, s)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn dot(self, rhs: Vec2) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Z component of the 3D cross product.
    #[inline]
    pub fn cross(self, rhs: Vec2) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Returns the unit vector, or zero for a zero-length input.
    #[inline]
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 { self / len } else { Vec2::zero() }
    }

    /// Counter-clockwise perpendicular.
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    #[inline]
    pub fn rotated(self, angle: f32) -> Vec2 {
        let (s, c) = angle.sin_cos();
        Vec2::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Angle of the vector from +X in `(-pi, pi]`.
    #[inline]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        self + (to - self) * t
    }

    /// Component-wise sign (`-1`, `0` or `1`).
    #[inline]
    pub fn signum(self) -> Vec2 {
        Vec2::new(sign(self.x), sign(self.y))
    }
}

#[inline]
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self * rhs.x, self * rhs.y)
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl From<kurbo::Point> for Vec2 {
    #[inline]
    fn from(p: kurbo::Point) -> Self {
        Vec2::new(p.x as f32, p.y as f32)
    }
}

impl From<Vec2> for kurbo::Point {
    #[inline]
    fn from(v: Vec2) -> Self {
        kurbo::Point::new(v.x.into(), v.y.into())
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn rotated_quarter_turn_maps_right_to_up() {
        assert!(close(Vec2::RIGHT.rotated(FRAC_PI_2), Vec2::UP));
        assert!(close(Vec2::UP.rotated(-FRAC_PI_2), Vec2::RIGHT));
    }

    #[test]
    fn perp_is_counter_clockwise() {
        assert_eq!(Vec2::RIGHT.perp(), Vec2::UP);
        assert_eq!(Vec2::new(2.0, 3.0).perp().dot(Vec2::new(2.0, 3.0)), 0.0);
    }

    #[test]
    fn normalized_zero_stays_zero() {
        assert_eq!(Vec2::zero().normalized(), Vec2::zero());
        assert!((Vec2::new(3.0, 4.0).normalized().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn scalar_multiplication_commutes() {
        let v = Vec2::new(1.5, -2.0);
        assert_eq!(2.0 * v, v * 2.0);
    }
}
