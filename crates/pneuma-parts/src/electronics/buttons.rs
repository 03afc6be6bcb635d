use pneuma_engine::anim::{Animation, Mutation};
use pneuma_engine::coords::Vec2;
use pneuma_engine::paint::{palette, Color};
use pneuma_engine::scene::Node;

use crate::component::Component;

/// Colours of an illuminated push button.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LampStyle {
    pub frame_color: Color,
    pub on_color: Color,
    pub off_color: Color,
    pub caption_color: Color,
}

impl LampStyle {
    /// Green lamp.
    pub fn start() -> Self {
        Self { on_color: palette::SIGNAL_GREEN, off_color: palette::GREEN_E, ..Self::default() }
    }

    /// Red lamp.
    pub fn stop() -> Self {
        Self::default()
    }
}

impl Default for LampStyle {
    fn default() -> Self {
        Self {
            frame_color: palette::GREY_B,
            on_color: palette::PURE_RED,
            off_color: palette::RED_E,
            caption_color: palette::GREY_D,
        }
    }
}

/// Round illuminated push button with a caption underneath.
///
/// Node layout: `0` frame ring, `1` lamp, `2` caption.
#[derive(Debug, Clone)]
pub struct PushButtonLamp {
    node: Node,
    style: LampStyle,
    active: bool,
}

impl PushButtonLamp {
    const LAMP: usize = 1;

    pub fn new(radius: f32, caption: &str, style: LampStyle, active: bool) -> Self {
        let frame = Node::annulus(Vec2::ORIGIN, radius, 1.2 * radius)
            .color(style.frame_color)
            .fill_opacity(1.0);
        let color = if active { style.on_color } else { style.off_color };
        let lamp = Node::circle(Vec2::ORIGIN, radius).color(color).fill_opacity(0.9);
        let label = Node::text(caption, Vec2::ORIGIN, 0.5 * radius)
            .color(style.caption_color)
            .placed_next_to(frame.bounds(), Vec2::DOWN, radius / 3.0);

        log::debug!("push button lamp `{caption}`, active {active}");
        Self { node: Node::group(vec![frame, lamp, label]), style, active }
    }

    /// Green "start" button.
    pub fn start(radius: f32, active: bool) -> Self {
        Self::new(radius, "start", LampStyle::start(), active)
    }

    /// Red "stop" button.
    pub fn stop(radius: f32, active: bool) -> Self {
        Self::new(radius, "stop", LampStyle::stop(), active)
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Lights the lamp up or turns it off.
    pub fn set_active(&mut self, active: bool) -> Vec<Animation> {
        self.active = active;
        let color = if active { self.style.on_color } else { self.style.off_color };
        self.commit(vec![Animation::mutate([Self::LAMP]).with(Mutation::SetColor(color))])
    }
}

impl Component for PushButtonLamp {
    fn node(&self) -> &Node {
        &self.node
    }

    fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(b: &PushButtonLamp) -> Option<Color> {
        b.node().child(1).and_then(Node::style).map(|s| s.fill.color)
    }

    #[test]
    fn presets_pick_their_colours() {
        let start = PushButtonLamp::start(1.0, false);
        assert_eq!(lamp(&start), Some(palette::GREEN_E));
        let stop = PushButtonLamp::stop(1.0, true);
        assert_eq!(lamp(&stop), Some(palette::PURE_RED));
    }

    #[test]
    fn toggling_switches_the_lamp() {
        let mut b = PushButtonLamp::start(0.5, false);
        let anims = b.set_active(true);
        assert_eq!(anims.len(), 1);
        assert!(b.is_active());
        assert_eq!(lamp(&b), Some(palette::SIGNAL_GREEN));
        b.set_active(false);
        assert_eq!(lamp(&b), Some(palette::GREEN_E));
    }

    #[test]
    fn caption_sits_below_the_frame() {
        let b = PushButtonLamp::stop(1.0, false);
        let caption = &b.node().children()[2];
        assert!(caption.top().y < -1.2);
    }
}
