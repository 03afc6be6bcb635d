//! Scene tree and draw stream.
//!
//! Responsibilities:
//! - describe components as trees of styled shapes (`Node`)
//! - address subtrees by index paths (`NodePath`)
//! - flatten trees into a deterministic draw order (z-index + insertion order)
//! - keep shape-specific geometry isolated per shape file under `scene::shapes`

mod cmd;
mod key;
mod list;
mod node;
mod path;
mod z_index;

pub mod shapes;

pub use cmd::DrawCmd;
pub use key::SortKey;
pub use list::{DrawItem, DrawList};
pub use node::{Item, Node, DOT_RADIUS};
pub use path::{NodePath, PathError};
pub use shapes::Shape;
pub use z_index::ZIndex;
