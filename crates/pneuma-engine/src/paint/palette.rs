//! Named colors used by the component catalogue.

use super::Color;

pub const BLACK: Color = Color::opaque_u8(0x00, 0x00, 0x00);
pub const WHITE: Color = Color::opaque_u8(0xff, 0xff, 0xff);

pub const GREY_A: Color = Color::opaque_u8(0xdd, 0xdd, 0xdd);
pub const GREY_B: Color = Color::opaque_u8(0xbb, 0xbb, 0xbb);
pub const GREY_C: Color = Color::opaque_u8(0x88, 0x88, 0x88);
pub const GREY_D: Color = Color::opaque_u8(0x44, 0x44, 0x44);
pub const GREY_E: Color = Color::opaque_u8(0x22, 0x22, 0x22);
pub const GREY: Color = GREY_C;

pub const BLUE_A: Color = Color::opaque_u8(0xc7, 0xe9, 0xf1);
pub const BLUE_E: Color = Color::opaque_u8(0x1c, 0x75, 0x8a);

pub const RED_C: Color = Color::opaque_u8(0xfc, 0x62, 0x55);
pub const RED_E: Color = Color::opaque_u8(0xcf, 0x50, 0x44);
pub const PURE_RED: Color = Color::opaque_u8(0xff, 0x00, 0x00);

pub const GREEN_E: Color = Color::opaque_u8(0x69, 0x9c, 0x52);

/// Actuated / closing state highlight.
pub const ALERT_RED: Color = Color::opaque_u8(0xdf, 0x00, 0x00);
/// Scale, notches and screen accents.
pub const SIGNAL_BLUE: Color = Color::opaque_u8(0x33, 0x49, 0xff);
pub const SIGNAL_GREEN: Color = Color::opaque_u8(0x76, 0xf9, 0x39);
pub const SIGNAL_YELLOW: Color = Color::opaque_u8(0xf3, 0xfd, 0x17);
