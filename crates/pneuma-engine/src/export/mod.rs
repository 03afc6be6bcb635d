//! Snapshot exporters.
//!
//! Exporters consume the flattened draw stream, never the component tree, so
//! anything a host engine would paint is exactly what ends up in the file.

pub mod svg;
