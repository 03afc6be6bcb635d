use core::fmt;

use serde::{Deserialize, Serialize};

/// Address of a node inside a tree: child indices from the root.
///
/// Component methods return paths relative to their own root; callers embed
/// them with [`NodePath::prefixed`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    #[inline]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Path to the `index`-th child of this node.
    pub fn child(&self, index: usize) -> NodePath {
        let mut v = self.0.clone();
        v.push(index);
        NodePath(v)
    }

    /// Path re-rooted under `prefix`.
    pub fn prefixed(&self, prefix: &NodePath) -> NodePath {
        let mut v = prefix.0.clone();
        v.extend_from_slice(&self.0);
        NodePath(v)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(v: Vec<usize>) -> Self {
        Self(v)
    }
}

impl<const N: usize> From<[usize; N]> for NodePath {
    fn from(v: [usize; N]) -> Self {
        Self(v.to_vec())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for i in &self.0 {
            write!(f, "/{i}")?;
        }
        Ok(())
    }
}

/// A [`NodePath`] that does not resolve inside a node tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub path: NodePath,
    /// Number of indices that resolved before the failure.
    pub depth: usize,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node path {} does not resolve (failed after {} step(s))", self.path, self.depth)
    }
}

impl std::error::Error for PathError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_prepends() {
        let p = NodePath::from([2, 3]).prefixed(&NodePath::from([0]));
        assert_eq!(p.indices(), &[0, 2, 3]);
        assert_eq!(p.to_string(), "/0/2/3");
    }

    #[test]
    fn root_displays_as_slash() {
        assert_eq!(NodePath::root().to_string(), "/");
        assert_eq!(NodePath::root().child(4), NodePath::from([4]));
    }

    #[test]
    fn error_message_names_the_path() {
        let e = PathError { path: NodePath::from([1, 9]), depth: 1 };
        assert!(e.to_string().contains("/1/9"));
    }
}
