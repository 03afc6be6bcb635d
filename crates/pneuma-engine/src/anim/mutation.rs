use serde::{Deserialize, Serialize};

use crate::coords::{Rect, Vec2};
use crate::paint::Color;
use crate::scene::{Node, NodePath, PathError};

/// One end-state change applied to every target of an animation.
///
/// `about: None` pivots around the centre of the whole selection, measured
/// right before the mutation runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    Shift(Vec2),
    MoveTo(Vec2),
    Rotate { angle: f32, about: Option<Vec2> },
    Scale { factor: f32, about: Option<Vec2> },
    Stretch { factor: f32, axis: Vec2, about: Option<Vec2> },
    Flip { axis: Vec2, about: Option<Vec2> },
    SetColor(Color),
    SetFillColor(Color),
    SetFillOpacity(f32),
    SetStrokeColor(Color),
    SetStrokeWidth(f32),
    /// Replaces each target subtree.
    Become(Node),
}

impl Mutation {
    #[inline]
    pub fn rotate(angle: f32) -> Self {
        Mutation::Rotate { angle, about: None }
    }

    #[inline]
    pub fn rotate_about(angle: f32, about: Vec2) -> Self {
        Mutation::Rotate { angle, about: Some(about) }
    }

    #[inline]
    pub fn scale(factor: f32) -> Self {
        Mutation::Scale { factor, about: None }
    }

    #[inline]
    pub fn stretch(factor: f32, axis: Vec2) -> Self {
        Mutation::Stretch { factor, axis, about: None }
    }

    #[inline]
    pub fn stretch_about(factor: f32, axis: Vec2, about: Vec2) -> Self {
        Mutation::Stretch { factor, axis, about: Some(about) }
    }

    #[inline]
    pub fn flip(axis: Vec2) -> Self {
        Mutation::Flip { axis, about: None }
    }

    /// Applies to every target of `root`. Fails before touching anything if a
    /// target does not resolve.
    pub fn apply(&self, root: &mut Node, targets: &[NodePath]) -> Result<(), PathError> {
        for t in targets {
            root.get(t)?;
        }
        let pivot = |about: Option<Vec2>, root: &Node| about.unwrap_or_else(|| selection_center(root, targets));
        match self {
            Mutation::Shift(by) => each(root, targets, |n| n.shift(*by)),
            Mutation::MoveTo(p) => {
                let by = *p - selection_center(root, targets);
                each(root, targets, |n| n.shift(by))
            }
            Mutation::Rotate { angle, about } => {
                let c = pivot(*about, root);
                each(root, targets, |n| n.rotate_about(*angle, c))
            }
            Mutation::Scale { factor, about } => {
                let c = pivot(*about, root);
                each(root, targets, |n| n.scale_about(*factor, c))
            }
            Mutation::Stretch { factor, axis, about } => {
                let c = pivot(*about, root);
                each(root, targets, |n| n.stretch_about(*factor, *axis, c))
            }
            Mutation::Flip { axis, about } => {
                let c = pivot(*about, root);
                each(root, targets, |n| n.flip_about(*axis, c))
            }
            Mutation::SetColor(c) => each(root, targets, |n| n.set_color(*c)),
            Mutation::SetFillColor(c) => each(root, targets, |n| n.set_fill_color(*c)),
            Mutation::SetFillOpacity(o) => each(root, targets, |n| n.set_fill_opacity(*o)),
            Mutation::SetStrokeColor(c) => each(root, targets, |n| n.set_stroke_color(*c)),
            Mutation::SetStrokeWidth(w) => each(root, targets, |n| n.set_stroke_width(*w)),
            Mutation::Become(node) => each(root, targets, |n| *n = node.clone()),
        }
    }
}

fn each(root: &mut Node, targets: &[NodePath], mut f: impl FnMut(&mut Node)) -> Result<(), PathError> {
    for t in targets {
        f(root.get_mut(t)?);
    }
    Ok(())
}

/// Centre of the union of the targets' bounds.
pub(crate) fn selection_center(root: &Node, targets: &[NodePath]) -> Vec2 {
    let mut acc: Option<Rect> = None;
    for t in targets {
        if let Some(b) = root.get(t).ok().and_then(Node::try_bounds) {
            acc = Some(acc.map_or(b, |r| r.union(b)));
        }
    }
    acc.map(Rect::center).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::palette;
    use core::f32::consts::PI;

    fn scene() -> Node {
        Node::group(vec![
            Node::square(Vec2::new(-2.0, 0.0), 1.0),
            Node::square(Vec2::new(2.0, 0.0), 1.0),
        ])
    }

    #[test]
    fn rotation_pivots_on_the_whole_selection() {
        let mut root = scene();
        let targets = [NodePath::from([0]), NodePath::from([1])];
        Mutation::rotate(PI).apply(&mut root, &targets).unwrap();
        // Each square swaps side instead of spinning in place.
        assert!((root.children()[0].center() - Vec2::new(2.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn explicit_pivot_is_used() {
        let mut root = scene();
        Mutation::rotate_about(PI, Vec2::new(-2.0, 0.0))
            .apply(&mut root, &[NodePath::from([0])])
            .unwrap();
        assert!((root.children()[0].center() - Vec2::new(-2.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn unresolved_target_changes_nothing() {
        let mut root = scene();
        let before = root.clone();
        let err = Mutation::Shift(Vec2::UP)
            .apply(&mut root, &[NodePath::from([0]), NodePath::from([7])])
            .unwrap_err();
        assert_eq!(err.path, NodePath::from([7]));
        assert_eq!(root, before);
    }

    #[test]
    fn become_replaces_the_subtree() {
        let mut root = scene();
        let dot = Node::dot(Vec2::ORIGIN, 0.1).color(palette::RED_C);
        Mutation::Become(dot.clone()).apply(&mut root, &[NodePath::from([1])]).unwrap();
        assert_eq!(root.children()[1], dot);
    }

    #[test]
    fn move_to_centres_the_selection() {
        let mut root = scene();
        Mutation::MoveTo(Vec2::new(0.0, 3.0)).apply(&mut root, &[NodePath::root()]).unwrap();
        assert!((root.center() - Vec2::new(0.0, 3.0)).length() < 1e-5);
    }
}
