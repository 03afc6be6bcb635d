use serde::{Deserialize, Serialize};

use super::Animation;

/// Animations played together, followed by an optional pause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub label: String,
    pub animations: Vec<Animation>,
    pub wait: f32,
}

impl Step {
    /// Longest animation plus the trailing pause.
    pub fn duration(&self) -> f32 {
        let play = self.animations.iter().map(Animation::duration).fold(0.0, f32::max);
        play + self.wait
    }
}

/// Ordered script of steps, serializable for external players.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    steps: Vec<Step>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a step. Empty batches are kept so labels line up with snapshots.
    pub fn play(&mut self, label: impl Into<String>, animations: Vec<Animation>) -> &mut Step {
        self.steps.push(Step { label: label.into(), animations, wait: 0.0 });
        let last = self.steps.len() - 1;
        &mut self.steps[last]
    }

    /// Adds a pause after the last step, or a silent step if there is none.
    pub fn wait(&mut self, seconds: f32) {
        match self.steps.last_mut() {
            Some(step) => step.wait += seconds.max(0.0),
            None => {
                self.play("wait", Vec::new()).wait = seconds.max(0.0);
            }
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn duration(&self) -> f32 {
        self.steps.iter().map(Step::duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodePath;

    #[test]
    fn step_duration_is_longest_animation_plus_wait() {
        let mut tl = Timeline::new();
        tl.play(
            "slide",
            vec![
                Animation::indicate(vec![NodePath::root()]).run_time(0.5),
                Animation::indicate(vec![NodePath::root()]).run_time(2.0),
            ],
        );
        tl.wait(1.0);
        assert_eq!(tl.len(), 1);
        assert!((tl.duration() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn leading_wait_creates_a_step() {
        let mut tl = Timeline::new();
        tl.wait(0.5);
        assert_eq!(tl.steps()[0].label, "wait");
        assert_eq!(tl.duration(), 0.5);
    }
}
