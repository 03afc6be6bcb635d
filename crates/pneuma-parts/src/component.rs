use pneuma_engine::anim::Animation;
use pneuma_engine::coords::{Rect, Vec2};
use pneuma_engine::scene::{DrawList, Node};

// ── Component trait ───────────────────────────────────────────────────────

/// The core trait every schematic component implements.
///
/// A component owns one node tree. Geometry queries (ports, anchors) are
/// derived from that tree, so moving the tree moves everything with it.
///
/// # Implementing a custom component
///
/// ```rust,ignore
/// use pneuma_parts::prelude::*;
///
/// pub struct Marker { node: Node }
///
/// impl Component for Marker {
///     fn node(&self) -> &Node { &self.node }
///     fn node_mut(&mut self) -> &mut Node { &mut self.node }
/// }
/// ```
pub trait Component {
    fn node(&self) -> &Node;

    fn node_mut(&mut self) -> &mut Node;

    #[inline]
    fn bounds(&self) -> Rect {
        self.node().bounds()
    }

    #[inline]
    fn center(&self) -> Vec2 {
        self.node().center()
    }

    fn shift(&mut self, by: Vec2) {
        self.node_mut().shift(by);
    }

    fn move_to(&mut self, point: Vec2) {
        self.node_mut().move_to(point);
    }

    /// Draw stream of the current state.
    fn draw_list(&self) -> DrawList {
        DrawList::from_node(self.node())
    }

    /// Commits `animations` to the component's own tree and hands them back.
    ///
    /// Paths are produced by the component itself, so a miss is a bug; it is
    /// logged and the remaining animations still apply.
    fn commit(&mut self, animations: Vec<Animation>) -> Vec<Animation> {
        commit_to(self.node_mut(), animations)
    }
}

/// Applies `animations` to `node` in order and hands them back.
///
/// Used by parts that animate a subtree they do not own (valve actuators).
pub(crate) fn commit_to(node: &mut Node, animations: Vec<Animation>) -> Vec<Animation> {
    for a in &animations {
        if let Err(e) = a.apply(node) {
            log::error!("component animation skipped: {e}");
        }
    }
    animations
}
