use serde::{Deserialize, Serialize};

/// Drawing layer of a schematic item.
///
/// Items on a higher layer cover lower ones; within a layer, later items
/// win (see [`SortKey`](super::SortKey)).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Serialize, Deserialize)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Fills seen through an outline, like the air inside a cylinder barrel.
    pub const BEHIND: ZIndex = ZIndex(-1);
    pub const BASE: ZIndex = ZIndex(0);
    /// Parts crossing in front of their neighbours.
    pub const FRONT: ZIndex = ZIndex(1);

    #[inline]
    pub const fn new(v: i32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn above(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[inline]
    pub const fn below(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Layer of turn `i` of a winding seen from the side: even turns stay on
    /// `self`, odd turns pass in front of them.
    #[inline]
    pub const fn winding(self, i: usize) -> Self {
        if i % 2 == 1 { self.above() } else { self }
    }
}
