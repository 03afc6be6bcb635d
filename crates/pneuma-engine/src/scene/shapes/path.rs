use serde::{Deserialize, Serialize};

use crate::coords::{Affine, Rect, Vec2};

/// Polyline, or polygon when `closed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathShape {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl PathShape {
    #[inline]
    pub fn open(points: Vec<Vec2>) -> Self {
        Self { points, closed: false }
    }

    #[inline]
    pub fn closed(points: Vec<Vec2>) -> Self {
        Self { points, closed: true }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.points.iter().copied()).unwrap_or_default()
    }

    pub fn transformed(&self, t: &Affine) -> PathShape {
        PathShape {
            points: self.points.iter().map(|&p| t.apply(p)).collect(),
            closed: self.closed,
        }
    }

    pub fn start(&self) -> Vec2 {
        self.points.first().copied().unwrap_or_default()
    }

    /// Last vertex; a closed path ends where it starts.
    pub fn end(&self) -> Vec2 {
        if self.closed {
            self.start()
        } else {
            self.points.last().copied().unwrap_or_default()
        }
    }

    /// Total length of the drawn segments.
    pub fn length(&self) -> f32 {
        let open: f32 = self.points.windows(2).map(|w| w[0].distance(w[1])).sum();
        if self.closed && self.points.len() > 2 {
            open + self.end_gap()
        } else {
            open
        }
    }

    fn end_gap(&self) -> f32 {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => a.distance(*b),
            _ => 0.0,
        }
    }
}
