//! Panel electronics: illuminated buttons and seven-segment displays.

pub mod buttons;
pub mod display;

pub use buttons::{LampStyle, PushButtonLamp};
pub use display::{Glyph, SegmentStyle, SevenSegmentDisplay};
