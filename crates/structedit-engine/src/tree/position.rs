use super::{NodeId, Tree};

/// A place between two flat offsets of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub parent: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(parent: NodeId, offset: usize) -> Self {
        Self { parent, offset }
    }

    pub fn at_start(element: NodeId) -> Self {
        Self::new(element, 0)
    }

    pub fn at_end(tree: &Tree, element: NodeId) -> Self {
        Self::new(element, tree.max_offset(element))
    }

    /// Position directly before `node`, `None` for a node without a parent.
    pub fn before(tree: &Tree, node: NodeId) -> Option<Self> {
        let parent = tree.parent(node)?;
        Some(Self::new(parent, tree.start_offset(node)?))
    }

    /// Position directly after `node`, `None` for a node without a parent.
    pub fn after(tree: &Tree, node: NodeId) -> Option<Self> {
        let before = Self::before(tree, node)?;
        Some(Self::new(before.parent, before.offset + tree.offset_size(node)))
    }

    pub fn is_at_start(&self) -> bool {
        self.offset == 0
    }

    pub fn is_at_end(&self, tree: &Tree) -> bool {
        self.offset == tree.max_offset(self.parent)
    }
}
