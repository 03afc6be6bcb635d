//! Animation descriptors.
//!
//! Components never interpolate anything themselves. They describe the end
//! state of a transition as a list of [`Mutation`]s on addressed subtrees and
//! leave tweening to the host engine. [`Animation::apply`] commits the end
//! state so later geometric queries see it.

mod animation;
mod mutation;
mod timeline;

pub use animation::{apply_all, Animation, DEFAULT_RUN_TIME};
pub use mutation::Mutation;
pub use timeline::{Step, Timeline};
