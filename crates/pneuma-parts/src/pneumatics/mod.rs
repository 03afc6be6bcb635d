//! Pneumatic symbols: directional valves and their actuators, functional
//! valves and cylinders.
//!
//! All parts follow ISO 1219 drawing conventions: chambers are squares of the
//! valve height, stroke widths scale with the size (`2·h` stroke units).

pub mod actuators;
pub mod cylinder;
pub mod directional;
pub mod functional;

use serde::{Deserialize, Serialize};

use pneuma_engine::coords::Vec2;

pub use actuators::{Actuator, ActuatorKind, ActuatorStyle};
pub use cylinder::{CylinderConfig, CylinderStyle, DoubleActingCylinder};
pub use directional::{CenterMode, DirectionalValve, ValveConfig, ValveFamily, ValveStyle};
pub use functional::{
    AndValve, BallState, FunctionalConfig, FunctionalStyle, OneWayFlowControlValve, OrValve,
    PilotedCheckValve,
};

/// Fill opacity of shaded symbol bodies.
pub(crate) const SHADE_OPACITY: f32 = 0.3;

/// Horizontal side of a symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Unit vector pointing to this side.
    #[inline]
    pub fn dir(self) -> Vec2 {
        Vec2::RIGHT * self.sign()
    }

    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// `-1`, `0` or `1`; unlike [`f32::signum`], zero maps to zero.
#[inline]
pub(crate) fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Turning angle of an arc of signed `radius` spanning a chord of half
/// length `half`. Positive radii turn counter-clockwise; radii shorter than
/// `half` give a half turn.
pub(crate) fn arc_angle(half: f32, radius: f32) -> f32 {
    let r = radius.abs();
    if r <= half {
        return core::f32::consts::PI.copysign(radius);
    }
    let angle = 2.0 * ((r * r - half * half).sqrt() / r).acos();
    angle.copysign(radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::PI;

    #[test]
    fn sign_keeps_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-3.0), -1.0);
        assert_eq!(sign(0.2), 1.0);
    }

    #[test]
    fn chord_radius_gives_half_turn() {
        assert!((arc_angle(0.5, 0.5) - PI).abs() < 1e-5);
        assert!((arc_angle(0.5, -0.5) + PI).abs() < 1e-5);
        let a = arc_angle(0.5, 1.0);
        assert!(a > 0.0 && a < PI);
    }

    #[test]
    fn sides_are_opposite() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.dir(), Vec2::RIGHT);
    }
}
