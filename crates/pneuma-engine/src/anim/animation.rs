use serde::{Deserialize, Serialize};

use crate::coords::Vec2;
use crate::paint::{palette, Color};
use crate::scene::{Node, NodePath, PathError};

use super::mutation::selection_center;
use super::Mutation;

/// Seconds used when a component does not pick a duration.
pub const DEFAULT_RUN_TIME: f32 = 1.0;

/// Transition descriptor consumed by the host engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Animation {
    /// Interpolates the targets from their current state to the state after
    /// `mutations` run in order.
    Mutate {
        targets: Vec<NodePath>,
        mutations: Vec<Mutation>,
        run_time: f32,
    },
    /// Rotation along a circular path about `about` (selection centre when `None`).
    Rotate {
        targets: Vec<NodePath>,
        angle: f32,
        about: Option<Vec2>,
        run_time: f32,
    },
    /// Brief emphasis; leaves the end state unchanged.
    Indicate {
        targets: Vec<NodePath>,
        scale_factor: f32,
        color: Color,
        run_time: f32,
    },
}

impl Animation {
    pub fn mutate(target: impl Into<NodePath>) -> Self {
        Self::mutate_all(vec![target.into()])
    }

    pub fn mutate_all(targets: Vec<NodePath>) -> Self {
        Animation::Mutate { targets, mutations: Vec::new(), run_time: DEFAULT_RUN_TIME }
    }

    pub fn rotate(targets: Vec<NodePath>, angle: f32, about: Option<Vec2>) -> Self {
        Animation::Rotate { targets, angle, about, run_time: DEFAULT_RUN_TIME }
    }

    pub fn indicate(targets: Vec<NodePath>) -> Self {
        Animation::Indicate {
            targets,
            scale_factor: 1.2,
            color: palette::SIGNAL_YELLOW,
            run_time: DEFAULT_RUN_TIME,
        }
    }

    /// Appends a mutation. Only meaningful for [`Animation::Mutate`]; other
    /// variants are returned unchanged.
    pub fn with(mut self, m: Mutation) -> Self {
        if let Animation::Mutate { mutations, .. } = &mut self {
            mutations.push(m);
        }
        self
    }

    pub fn run_time(mut self, seconds: f32) -> Self {
        let seconds = seconds.max(0.0);
        match &mut self {
            Animation::Mutate { run_time, .. }
            | Animation::Rotate { run_time, .. }
            | Animation::Indicate { run_time, .. } => *run_time = seconds,
        }
        self
    }

    pub fn duration(&self) -> f32 {
        match self {
            Animation::Mutate { run_time, .. }
            | Animation::Rotate { run_time, .. }
            | Animation::Indicate { run_time, .. } => *run_time,
        }
    }

    pub fn targets(&self) -> &[NodePath] {
        match self {
            Animation::Mutate { targets, .. }
            | Animation::Rotate { targets, .. }
            | Animation::Indicate { targets, .. } => targets,
        }
    }

    fn targets_mut(&mut self) -> &mut Vec<NodePath> {
        match self {
            Animation::Mutate { targets, .. }
            | Animation::Rotate { targets, .. }
            | Animation::Indicate { targets, .. } => targets,
        }
    }

    /// Same animation with every target re-rooted under `prefix`.
    pub fn prefixed(&self, prefix: &NodePath) -> Self {
        let mut out = self.clone();
        for t in out.targets_mut() {
            *t = t.prefixed(prefix);
        }
        out
    }

    /// Commits the end state to `root`.
    ///
    /// A rotation with an implicit pivot is measured once, before it starts.
    pub fn apply(&self, root: &mut Node) -> Result<(), PathError> {
        match self {
            Animation::Mutate { targets, mutations, .. } => {
                for m in mutations {
                    m.apply(root, targets)?;
                }
                Ok(())
            }
            Animation::Rotate { targets, angle, about, .. } => {
                let about = about.unwrap_or_else(|| selection_center(root, targets));
                Mutation::rotate_about(*angle, about).apply(root, targets)
            }
            Animation::Indicate { targets, .. } => {
                for t in targets {
                    root.get(t)?;
                }
                Ok(())
            }
        }
    }
}

/// Applies a batch in order, stopping at the first unresolved target.
pub fn apply_all(root: &mut Node, animations: &[Animation]) -> Result<(), PathError> {
    animations.iter().try_for_each(|a| a.apply(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::FRAC_PI_2;

    fn scene() -> Node {
        Node::group(vec![Node::group(vec![
            Node::square(Vec2::ORIGIN, 1.0),
            Node::circle(Vec2::new(3.0, 0.0), 0.5),
        ])])
    }

    #[test]
    fn mutations_run_in_order() {
        let mut root = scene();
        let anim = Animation::mutate([0, 0])
            .with(Mutation::Shift(Vec2::RIGHT))
            .with(Mutation::SetFillOpacity(0.5))
            .run_time(0.3);
        anim.apply(&mut root).unwrap();
        let sq = root.get(&NodePath::from([0, 0])).unwrap();
        assert!((sq.center() - Vec2::RIGHT).length() < 1e-5);
        assert_eq!(sq.style().map(|s| s.fill.opacity), Some(0.5));
        assert_eq!(anim.duration(), 0.3);
    }

    #[test]
    fn prefixed_reroots_targets() {
        let anim = Animation::indicate(vec![NodePath::from([1])]).prefixed(&NodePath::from([0]));
        assert_eq!(anim.targets(), &[NodePath::from([0, 1])]);
        let mut root = Node::group(vec![scene().children()[0].clone()]);
        assert!(anim.apply(&mut root).is_ok());
    }

    #[test]
    fn indicate_leaves_the_scene_alone() {
        let mut root = scene();
        let before = root.clone();
        Animation::indicate(vec![NodePath::from([0])]).apply(&mut root).unwrap();
        assert_eq!(root, before);
    }

    #[test]
    fn rotate_about_explicit_pivot() {
        let mut root = scene();
        Animation::rotate(vec![NodePath::from([0, 1])], FRAC_PI_2, Some(Vec2::ORIGIN))
            .apply(&mut root)
            .unwrap();
        let c = root.get(&NodePath::from([0, 1])).unwrap().center();
        assert!((c - Vec2::new(0.0, 3.0)).length() < 1e-4);
    }

    #[test]
    fn with_is_ignored_on_non_mutations() {
        let a = Animation::indicate(vec![NodePath::root()]);
        assert_eq!(a.clone().with(Mutation::Shift(Vec2::UP)), a);
    }

    #[test]
    fn apply_all_stops_at_first_error() {
        let mut root = scene();
        let batch = [
            Animation::mutate([0, 0]).with(Mutation::Shift(Vec2::UP)),
            Animation::mutate([9]).with(Mutation::Shift(Vec2::UP)),
        ];
        assert!(apply_all(&mut root, &batch).is_err());
    }
}
