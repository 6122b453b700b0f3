//! Arena-backed document trees.
//!
//! The model and the view are both a [`Tree`]: elements with a name and an
//! attribute map, and text nodes. Nodes are addressed by a copyable
//! [`NodeId`] and never freed; a removed node is simply detached from its
//! parent. Positions inside a tree use *flat offsets* where an element child
//! counts as one and a text child counts one per character, so `(parent, 2)`
//! in `<paragraph>foo</paragraph>` sits between `o` and `o`.
//!
//! All mutation goes through a [`Writer`].

pub mod position;
pub mod range;
pub mod selection;
pub mod writer;

use std::cmp::Ordering;
use std::collections::BTreeMap;

pub use position::Position;
pub use range::Range;
pub use selection::{Selection, SelectionMode};
pub use writer::Writer;

/// Name of the root element of every tree.
pub const ROOT_NAME: &str = "$root";

/// Name used for text nodes wherever a node name is expected (schema contexts).
pub const TEXT_NAME: &str = "$text";

/// Handle to a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        name: String,
        attributes: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<NodeData>,
    root: NodeId,
    generation: u64,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree holding only an empty `$root` element.
    pub fn new() -> Self {
        Self::with_generation(0)
    }

    /// An empty tree that replaces a tree of an earlier generation. Node ids
    /// restart from zero, so ids from the old tree must not be trusted here.
    pub fn with_generation(generation: u64) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            generation,
        };
        tree.root = tree.alloc(NodeKind::Element {
            name: ROOT_NAME.to_string(),
            attributes: BTreeMap::new(),
        });
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `node` was allocated in this tree. Every other read method panics on
    /// ids that fail this check.
    pub fn exists(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn data(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.0]
    }

    pub(crate) fn kind_mut(&mut self, node: NodeId) -> &mut NodeKind {
        &mut self.nodes[node.0].kind
    }

    pub(crate) fn children_mut(&mut self, node: NodeId) -> &mut Vec<NodeId> {
        &mut self.nodes[node.0].children
    }

    pub(crate) fn set_parent(&mut self, node: NodeId, parent: Option<NodeId>) {
        self.nodes[node.0].parent = parent;
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.data(node).kind
    }

    /// Element name, `None` for text nodes.
    pub fn name(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    /// Element name, or `$text` for text nodes.
    pub fn schema_name(&self, node: NodeId) -> &str {
        self.name(node).unwrap_or(TEXT_NAME)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(self.data(node).kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.data(node).kind, NodeKind::Text(_))
    }

    pub fn is_named(&self, node: NodeId, expected: &str) -> bool {
        self.name(node) == Some(expected)
    }

    /// Text content of a text node.
    pub fn data_of(&self, node: NodeId) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Text(data) => Some(data),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attribute(&self, node: NodeId, key: &str) -> Option<&str> {
        match &self.data(node).kind {
            NodeKind::Element { attributes, .. } => attributes.get(key).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    /// Attributes in key order.
    pub fn attributes(&self, node: NodeId) -> impl Iterator<Item = (&str, &str)> {
        let attributes = match &self.data(node).kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text(_) => None,
        };
        attributes
            .into_iter()
            .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.data(node).children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.data(node).parent
    }

    /// Parent, grandparent and so on up to the topmost ancestor.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// The node itself followed by its ancestors.
    pub fn ancestors_inclusive(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&n| self.parent(n))
    }

    /// Topmost ancestor. For attached nodes this is the tree root.
    pub fn top(&self, node: NodeId) -> NodeId {
        self.ancestors_inclusive(node).last().unwrap_or(node)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.top(node) == self.root
    }

    /// `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors_inclusive(node).any(|n| n == ancestor)
    }

    /// All descendants in document order, not including `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            result.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        result
    }

    /// 1 for elements, the character count for text.
    pub fn offset_size(&self, node: NodeId) -> usize {
        match &self.data(node).kind {
            NodeKind::Element { .. } => 1,
            NodeKind::Text(data) => data.chars().count(),
        }
    }

    /// Sum of the offset sizes of all children.
    pub fn max_offset(&self, element: NodeId) -> usize {
        self.children(element)
            .iter()
            .map(|&child| self.offset_size(child))
            .sum()
    }

    pub fn is_empty(&self, element: NodeId) -> bool {
        self.children(element).is_empty()
    }

    pub fn index(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    /// Flat offset at which `node` starts inside its parent.
    pub fn start_offset(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        let mut offset = 0;
        for &child in self.children(parent) {
            if child == node {
                return Some(offset);
            }
            offset += self.offset_size(child);
        }
        None
    }

    /// Child index containing `offset` and the offset inside that child.
    ///
    /// An offset on a boundary between children resolves to the later child
    /// with an inner offset of zero; an offset at the end returns
    /// `children.len()`.
    pub fn locate(&self, parent: NodeId, offset: usize) -> (usize, usize) {
        let mut acc = 0;
        for (index, &child) in self.children(parent).iter().enumerate() {
            let size = self.offset_size(child);
            if offset < acc + size {
                return (index, offset - acc);
            }
            acc += size;
        }
        (self.children(parent).len(), offset.saturating_sub(acc))
    }

    /// Flat offset of the boundary before child `index`.
    pub fn index_to_offset(&self, parent: NodeId, index: usize) -> usize {
        self.children(parent)
            .iter()
            .take(index)
            .map(|&child| self.offset_size(child))
            .sum()
    }

    /// Node starting exactly at `position`.
    pub fn node_after(&self, position: Position) -> Option<NodeId> {
        match self.locate(position.parent, position.offset) {
            (index, 0) => self.children(position.parent).get(index).copied(),
            _ => None,
        }
    }

    /// Node ending exactly at `position`.
    pub fn node_before(&self, position: Position) -> Option<NodeId> {
        if position.offset == 0 {
            return None;
        }
        match self.locate(position.parent, position.offset) {
            (index, 0) => self.children(position.parent).get(index - 1).copied(),
            _ => None,
        }
    }

    /// Text node that `position` splits, with the character offset inside it.
    pub fn text_at(&self, position: Position) -> Option<(NodeId, usize)> {
        let (index, inner) = self.locate(position.parent, position.offset);
        if inner == 0 {
            return None;
        }
        let child = *self.children(position.parent).get(index)?;
        self.is_text(child).then_some((child, inner))
    }

    /// Nearest element containing both nodes, inclusive.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let chain: Vec<NodeId> = self.ancestors_inclusive(a).collect();
        self.ancestors_inclusive(b).find(|n| chain.contains(n))
    }

    /// Offsets from the topmost ancestor down to `position`.
    pub fn path(&self, position: Position) -> Vec<usize> {
        let mut path: Vec<usize> = self
            .ancestors_inclusive(position.parent)
            .filter_map(|n| self.start_offset(n))
            .collect();
        path.reverse();
        path.push(position.offset);
        path
    }

    /// Document order of two positions. Positions in different trees
    /// (different topmost ancestors) are incomparable.
    pub fn compare(&self, a: Position, b: Position) -> Option<Ordering> {
        if self.top(a.parent) != self.top(b.parent) {
            return None;
        }
        Some(self.path(a).cmp(&self.path(b)))
    }

    /// Two positions touch when only element boundaries lie between them.
    pub fn is_touching(&self, a: Position, b: Position) -> bool {
        let (left, right) = match self.compare(a, b) {
            Some(Ordering::Greater) => (b, a),
            Some(_) => (a, b),
            None => return false,
        };

        let mut left_chain = vec![left];
        let mut current = left;
        while current.offset == self.max_offset(current.parent) {
            match Position::after(self, current.parent) {
                Some(up) => {
                    left_chain.push(up);
                    current = up;
                }
                None => break,
            }
        }

        let mut current = right;
        loop {
            if left_chain.contains(&current) {
                return true;
            }
            if current.offset != 0 {
                return false;
            }
            match Position::before(self, current.parent) {
                Some(up) => current = up,
                None => return false,
            }
        }
    }
}
