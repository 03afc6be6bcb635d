//! Mechanical parts: springs, pipes and belt conveyors.

pub mod conveyor;
pub mod pipe;
pub mod spring;

pub use conveyor::{ConveyorBelt, ConveyorConfig, Spin};
pub use pipe::{PipeConfig, PipeConnection};
pub use spring::{CompressionSpring, SpringConfig, SpringSizing, SpringStyle};
