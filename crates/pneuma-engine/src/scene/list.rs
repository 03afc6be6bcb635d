use super::{DrawCmd, Node, SortKey, ZIndex};

/// A single draw item: sort key + command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub key: SortKey,
    pub cmd: DrawCmd,
}

/// Recorded draw stream for one snapshot.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - paint-order iteration reuses an internal index buffer; no allocation once warmed
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    next_order: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every visible shape of `node` in tree order.
    pub fn from_node(node: &Node) -> Self {
        let mut list = Self::new();
        node.draw_into(&mut list);
        list
    }

    /// Clears recorded items. Keeps allocated capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.next_order = 0;
        self.sorted_dirty = true;
        self.sorted_indices.clear();
    }

    /// Returns items in insertion order.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pushes a draw command with the given z-index.
    #[inline]
    pub fn push(&mut self, z: ZIndex, cmd: DrawCmd) {
        let order = self.next_order;
        self.next_order = self.next_order.wrapping_add(1);

        self.items.push(DrawItem {
            key: SortKey::new(z, order),
            cmd,
        });

        self.sorted_dirty = true;
    }

    /// Returns indices into `items` in paint order (back-to-front).
    ///
    /// This buffer is owned by `DrawList` and reused across snapshots.
    pub fn indices_in_paint_order(&mut self) -> &[usize] {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        &self.sorted_indices
    }

    /// Iterates items in paint order without cloning draw commands.
    pub fn iter_in_paint_order(&mut self) -> impl Iterator<Item = &DrawItem> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }

        self.sorted_indices.iter().map(|&i| &self.items[i])
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.items.len());

        // Stable ordering is ensured by SortKey including insertion order.
        self.sorted_indices
            .sort_by(|&a, &b| self.items[a].key.cmp(&self.items[b].key));

        self.sorted_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn higher_z_is_painted_last() {
        let node = Node::group(vec![
            Node::circle(Vec2::ORIGIN, 1.0).z(ZIndex::new(2)),
            Node::circle(Vec2::ORIGIN, 2.0),
            Node::circle(Vec2::ORIGIN, 3.0),
        ]);
        let mut list = DrawList::from_node(&node);
        let order: Vec<u32> = list.iter_in_paint_order().map(|it| it.key.order).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn invisible_shapes_are_skipped() {
        let node = Node::group(vec![
            Node::circle(Vec2::ORIGIN, 1.0).stroke_width(0.0),
            Node::line(Vec2::ORIGIN, Vec2::RIGHT),
        ]);
        assert_eq!(DrawList::from_node(&node).len(), 1);
    }

    #[test]
    fn clear_resets_order() {
        let mut list = DrawList::from_node(&Node::line(Vec2::ORIGIN, Vec2::UP));
        list.clear();
        assert!(list.is_empty());
        assert!(list.indices_in_paint_order().is_empty());
    }
}
