//! The platform side of the view: DOM nodes, points and the live DOM
//! selection.
//!
//! There is no browser here. The "DOM" is the view tree itself, seen through
//! DOM coordinates: a point in an element counts child nodes, a point in a
//! text node counts characters. Anything that turns DOM coordinates into
//! view positions goes through a [`DomConverter`].

use crate::tree::{NodeId, Position, Range, Tree};

/// Opaque handle to the DOM element an event was targeted at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DomTarget(pub u64);

/// A DOM node. In the mirrored DOM this is a view node of one particular
/// render; the view tree is rebuilt on every render and node ids are reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomNode {
    pub id: NodeId,
    pub generation: u64,
}

impl DomNode {
    pub fn new(tree: &Tree, id: NodeId) -> Self {
        Self {
            id,
            generation: tree.generation(),
        }
    }
}

/// A point in the DOM: a child index in an element, a character offset in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomPoint {
    pub node: DomNode,
    pub offset: usize,
}

impl DomPoint {
    pub fn new(tree: &Tree, node: NodeId, offset: usize) -> Self {
        Self {
            node: DomNode::new(tree, node),
            offset,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomRange {
    pub start: DomPoint,
    pub end: DomPoint,
}

/// The live DOM selection, as a platform would expose it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomSelection {
    anchor: Option<DomPoint>,
    focus: Option<DomPoint>,
}

impl DomSelection {
    pub fn anchor(&self) -> Option<DomPoint> {
        self.anchor
    }

    pub fn focus(&self) -> Option<DomPoint> {
        self.focus
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn collapse(&mut self, point: DomPoint) {
        self.anchor = Some(point);
        self.focus = Some(point);
    }

    /// Move the focus, keeping the anchor. Collapses when there is no anchor yet.
    pub fn extend(&mut self, point: DomPoint) {
        if self.anchor.is_none() {
            self.anchor = Some(point);
        }
        self.focus = Some(point);
    }

    pub fn remove_all_ranges(&mut self) {
        self.anchor = None;
        self.focus = None;
    }
}

/// Translates between DOM coordinates and view positions.
pub trait DomConverter {
    /// `None` when the point is not inside the view tree, including points
    /// taken from an earlier rendering of it.
    fn dom_point_to_view(&self, tree: &Tree, point: DomPoint) -> Option<Position>;

    /// `None` when the position is not inside the view tree.
    fn view_position_to_dom(&self, tree: &Tree, position: Position) -> Option<DomPoint>;

    fn dom_range_to_view(&self, tree: &Tree, range: &DomRange) -> Option<Range> {
        let start = self.dom_point_to_view(tree, range.start)?;
        let end = self.dom_point_to_view(tree, range.end)?;
        tree.compare(start, end)?;
        Some(Range::new(tree, start, end))
    }
}

/// Converter for a DOM that mirrors the view tree node for node.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorDomConverter;

impl DomConverter for MirrorDomConverter {
    fn dom_point_to_view(&self, tree: &Tree, point: DomPoint) -> Option<Position> {
        let DomNode { id: node, generation } = point.node;
        if generation != tree.generation()
            || !tree.exists(node)
            || !tree.contains(tree.root(), node)
        {
            return None;
        }

        if tree.is_text(node) {
            if point.offset > tree.offset_size(node) {
                return None;
            }
            let parent = tree.parent(node)?;
            let start = tree.start_offset(node)?;
            return Some(Position::new(parent, start + point.offset));
        }

        if point.offset > tree.children(node).len() {
            return None;
        }
        Some(Position::new(node, tree.index_to_offset(node, point.offset)))
    }

    /// Positions next to text land inside the text node, the way browsers
    /// report carets.
    fn view_position_to_dom(&self, tree: &Tree, position: Position) -> Option<DomPoint> {
        if !tree.exists(position.parent)
            || !tree.is_element(position.parent)
            || position.offset > tree.max_offset(position.parent)
        {
            return None;
        }
        if let Some((text, inner)) = tree.text_at(position) {
            return Some(DomPoint::new(tree, text, inner));
        }
        if let Some(before) = tree.node_before(position).filter(|&n| tree.is_text(n)) {
            return Some(DomPoint::new(tree, before, tree.offset_size(before)));
        }
        if let Some(after) = tree.node_after(position).filter(|&n| tree.is_text(n)) {
            return Some(DomPoint::new(tree, after, 0));
        }
        let (index, _) = tree.locate(position.parent, position.offset);
        Some(DomPoint::new(tree, position.parent, index))
    }
}
