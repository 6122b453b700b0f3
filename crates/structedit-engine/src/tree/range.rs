use std::cmp::Ordering;

use super::{NodeId, Position, Tree};

/// Span between two positions. `start` never comes after `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// Part of a range that lies directly inside one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRange {
    pub parent: NodeId,
    pub start: usize,
    pub end: usize,
}

impl Range {
    /// Build a range, swapping the ends if given in reverse document order.
    pub fn new(tree: &Tree, a: Position, b: Position) -> Self {
        match tree.compare(a, b) {
            Some(Ordering::Greater) => Self { start: b, end: a },
            _ => Self { start: a, end: b },
        }
    }

    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Range enclosing exactly `node`.
    pub fn on(tree: &Tree, node: NodeId) -> Option<Self> {
        Some(Self {
            start: Position::before(tree, node)?,
            end: Position::after(tree, node)?,
        })
    }

    /// Range over the whole content of `element`.
    pub fn inside(tree: &Tree, element: NodeId) -> Self {
        Self {
            start: Position::at_start(element),
            end: Position::at_end(tree, element),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// The single node this range encloses, if any.
    pub fn enclosed_node(&self, tree: &Tree) -> Option<NodeId> {
        let after = tree.node_after(self.start)?;
        (tree.node_before(self.end) == Some(after)).then_some(after)
    }

    pub fn contains_position(&self, tree: &Tree, position: Position) -> bool {
        matches!(
            tree.compare(self.start, position),
            Some(Ordering::Less | Ordering::Equal)
        ) && matches!(
            tree.compare(position, self.end),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    /// Nearest element containing both ends, inclusive.
    pub fn common_ancestor(&self, tree: &Tree) -> Option<NodeId> {
        tree.common_ancestor(self.start.parent, self.end.parent)
    }

    /// Split the range into pieces that each lie inside a single parent.
    ///
    /// # Panics
    ///
    /// If the two ends are not in the same tree.
    pub fn flat_ranges(&self, tree: &Tree) -> Vec<FlatRange> {
        let common = self
            .common_ancestor(tree)
            .unwrap_or_else(|| panic!("range {self:?} spans two different trees"));

        let mut result = Vec::new();
        let mut start = self.start;
        while start.parent != common {
            result.push(FlatRange {
                parent: start.parent,
                start: start.offset,
                end: tree.max_offset(start.parent),
            });
            start = Position::after(tree, start.parent)
                .unwrap_or_else(|| panic!("{:?} is not inside {common:?}", start.parent));
        }

        let mut end_side = Vec::new();
        let mut end = self.end;
        while end.parent != common {
            end_side.push(FlatRange {
                parent: end.parent,
                start: 0,
                end: end.offset,
            });
            end = Position::before(tree, end.parent)
                .unwrap_or_else(|| panic!("{:?} is not inside {common:?}", end.parent));
        }

        result.push(FlatRange {
            parent: common,
            start: start.offset,
            end: end.offset,
        });
        result.extend(end_side.into_iter().rev());
        result.retain(|flat| flat.start < flat.end);
        result
    }
}
