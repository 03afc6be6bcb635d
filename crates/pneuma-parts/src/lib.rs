//! Pneuma parts: parametric schematic components on top of `pneuma-engine`.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use pneuma_parts::prelude::*;
//!
//! let mut valve = ValveConfig::new(ValveFamily::FiveTwo)
//!     .height(1.0)
//!     .actuators(ActuatorKind::PushButton, ActuatorKind::CompressionSpring)
//!     .build();
//! let mut cylinder = CylinderConfig::new(2.0, 3.0).build();
//!
//! // Each call commits the new state and returns what to animate.
//! let mut step = valve.slide(Vec2::LEFT, 1.0);
//! step.extend(cylinder.open_close(0.75, 1.0));
//! ```
//!
//! Animation targets are [`NodePath`](pneuma_engine::scene::NodePath)s
//! relative to the component that produced them; prefix them with the
//! component's index when it is embedded in a larger tree.
//!
//! # Extending with custom components
//!
//! Implement [`Component`] for any type that owns a node tree. Bounds,
//! placement and the draw stream come for free.

pub mod component;
pub mod electronics;
pub mod error;
pub mod instruments;
pub mod mechanics;
pub mod pneumatics;

pub use component::Component;
pub use error::ParseError;

/// Everything needed to assemble a diagram.
pub mod prelude {
    pub use crate::component::Component;
    pub use crate::error::ParseError;

    pub use crate::electronics::{Glyph, LampStyle, PushButtonLamp, SegmentStyle, SevenSegmentDisplay};
    pub use crate::instruments::{FlowSensor, Gauge, GaugeStyle, SensorStyle};
    pub use crate::mechanics::{
        CompressionSpring, ConveyorBelt, ConveyorConfig, PipeConfig, PipeConnection, Spin,
        SpringConfig, SpringSizing, SpringStyle,
    };
    pub use crate::pneumatics::{
        ActuatorKind, AndValve, BallState, CenterMode, CylinderConfig, DirectionalValve,
        DoubleActingCylinder, FunctionalConfig, OneWayFlowControlValve, OrValve,
        PilotedCheckValve, Side, ValveConfig, ValveFamily,
    };

    // Engine primitives every diagram touches.
    pub use pneuma_engine::anim::{Animation, Mutation, Timeline};
    pub use pneuma_engine::coords::{Rect, Vec2};
    pub use pneuma_engine::paint::{palette, Color};
    pub use pneuma_engine::scene::{Node, NodePath};
}
