use super::{NodeId, Position, Range, Tree};

/// How a selection relates to the nodes it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Exactly one range enclosing exactly one element.
    On,
    /// Anything else: a caret or a span of content.
    In,
}

/// Ordered, non-overlapping ranges plus a direction flag.
///
/// The anchor and focus come from the last range: the anchor is where the
/// user started selecting, the focus where they stopped. A backward
/// selection has its focus before its anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<Range>,
    backward: bool,
}

impl Selection {
    pub fn from_range(range: Range, backward: bool) -> Self {
        Self {
            ranges: vec![range],
            backward,
        }
    }

    pub fn from_ranges(ranges: Vec<Range>, backward: bool) -> Self {
        Self { ranges, backward }
    }

    pub fn collapsed_at(position: Position) -> Self {
        Self::from_range(Range::collapsed(position), false)
    }

    /// Selection enclosing exactly `node`.
    pub fn on(tree: &Tree, node: NodeId) -> Option<Self> {
        Some(Self::from_range(Range::on(tree, node)?, false))
    }

    /// Selection over the content of `element`.
    pub fn inside(tree: &Tree, element: NodeId) -> Self {
        Self::from_range(Range::inside(tree, element), false)
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn first_range(&self) -> Option<Range> {
        self.ranges.first().copied()
    }

    pub fn last_range(&self) -> Option<Range> {
        self.ranges.last().copied()
    }

    pub fn first_position(&self) -> Option<Position> {
        self.first_range().map(|r| r.start)
    }

    pub fn is_backward(&self) -> bool {
        self.backward && !self.is_collapsed()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn anchor(&self) -> Option<Position> {
        let range = self.last_range()?;
        Some(if self.backward { range.end } else { range.start })
    }

    pub fn focus(&self) -> Option<Position> {
        let range = self.last_range()?;
        Some(if self.backward { range.start } else { range.end })
    }

    pub fn is_collapsed(&self) -> bool {
        self.ranges.len() == 1 && self.ranges[0].is_collapsed()
    }

    /// The single element enclosed by this selection.
    pub fn selected_element(&self, tree: &Tree) -> Option<NodeId> {
        match self.ranges.as_slice() {
            [range] => range
                .enclosed_node(tree)
                .filter(|&node| tree.is_element(node)),
            _ => None,
        }
    }

    pub fn mode(&self, tree: &Tree) -> SelectionMode {
        match self.selected_element(tree) {
            Some(_) => SelectionMode::On,
            None => SelectionMode::In,
        }
    }

    /// Replace all ranges with a caret at `position`.
    pub fn collapse(&mut self, position: Position) {
        self.ranges = vec![Range::collapsed(position)];
        self.backward = false;
    }

    /// Keep the anchor and move the focus to `position`.
    ///
    /// Without an anchor this behaves like [`Selection::collapse`].
    pub fn extend(&mut self, tree: &Tree, position: Position) {
        let Some(anchor) = self.anchor() else {
            self.collapse(position);
            return;
        };
        let range = Range::new(tree, anchor, position);
        self.backward = range.start == position && position != anchor;
        self.ranges = vec![range];
    }
}
