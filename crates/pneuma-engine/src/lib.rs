//! Pneuma engine crate.
//!
//! Engine-agnostic building blocks for schematic components: coordinates and
//! transforms, paint, the scene tree with its draw stream, polygon booleans,
//! animation descriptors and snapshot export.

pub mod anim;
pub mod coords;
pub mod export;
pub mod geom;
pub mod logging;
pub mod paint;
pub mod scene;
