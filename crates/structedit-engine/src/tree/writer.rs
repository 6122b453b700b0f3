use std::collections::BTreeMap;

use super::{NodeId, NodeKind, Position, Range, Selection, Tree};

/// Scoped mutation handle over a tree and its selection.
///
/// Only one writer can exist per tree at a time since it holds both by
/// `&mut`. Every mutating call marks the writer as changed.
///
/// Text nodes are kept normalized: inserting text next to text merges the
/// two, and empty text nodes are dropped.
pub struct Writer<'a> {
    tree: &'a mut Tree,
    selection: &'a mut Selection,
    changed: bool,
}

impl<'a> Writer<'a> {
    pub fn new(tree: &'a mut Tree, selection: &'a mut Selection) -> Self {
        Self {
            tree,
            selection,
            changed: false,
        }
    }

    pub fn tree(&self) -> &Tree {
        self.tree
    }

    pub fn selection(&self) -> &Selection {
        self.selection
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    pub fn create_element(&mut self, name: &str, attributes: &[(&str, &str)]) -> NodeId {
        let attributes: BTreeMap<String, String> = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.tree.alloc(NodeKind::Element {
            name: name.to_string(),
            attributes,
        })
    }

    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.tree.alloc(NodeKind::Text(data.to_string()))
    }

    /// Insert a detached node at `position`, splitting text if needed.
    ///
    /// # Panics
    ///
    /// If `node` already has a parent or `position` is out of bounds.
    pub fn insert(&mut self, node: NodeId, position: Position) {
        assert!(
            self.tree.parent(node).is_none(),
            "cannot insert {node:?}: it is already attached"
        );
        self.check_position(position);

        let index = self.split_text_at(position);
        self.tree.children_mut(position.parent).insert(index, node);
        self.tree.set_parent(node, Some(position.parent));
        self.normalize_text(position.parent);
        self.changed = true;
    }

    pub fn append(&mut self, node: NodeId, parent: NodeId) {
        let end = Position::at_end(self.tree, parent);
        self.insert(node, end);
    }

    /// Detach `node` from its parent. Detached nodes are left alone.
    pub fn remove_node(&mut self, node: NodeId) {
        let Some(parent) = self.tree.parent(node) else {
            return;
        };
        self.tree.children_mut(parent).retain(|&c| c != node);
        self.tree.set_parent(node, None);
        self.normalize_text(parent);
        self.changed = true;
    }

    /// Remove everything between the ends of `range`, across parents.
    ///
    /// Elements only partially covered by the range are kept; their covered
    /// content is removed.
    pub fn remove(&mut self, range: Range) {
        for flat in range.flat_ranges(self.tree) {
            self.remove_flat(flat.parent, flat.start, flat.end);
        }
    }

    fn remove_flat(&mut self, parent: NodeId, start: usize, end: usize) {
        let first = self.split_text_at(Position::new(parent, start));
        let last = self.split_text_at(Position::new(parent, end));
        self.detach_children(parent, first, last);
    }

    /// Move `node` (attached or not) to `position`.
    pub fn move_node(&mut self, node: NodeId, position: Position) {
        let mut target = position;
        if self.tree.parent(node) == Some(position.parent)
            && let Some(start) = self.tree.start_offset(node)
            && start < position.offset
        {
            target.offset -= self.tree.offset_size(node);
        }
        self.remove_node(node);
        self.insert(node, target);
    }

    /// Move the content between `range.start` and `range.end` (same parent) to `target`.
    pub fn move_range(&mut self, range: Range, target: Position) {
        assert_eq!(
            range.start.parent, range.end.parent,
            "move_range needs a flat range"
        );
        let parent = range.start.parent;
        let first = self.split_text_at(range.start);
        let last = self.split_text_at(range.end);
        let moved = self.detach_children(parent, first, last);

        let mut target = target;
        if target.parent == parent && target.offset >= range.end.offset {
            target.offset -= range.end.offset - range.start.offset;
        }
        for node in moved {
            let size = self.tree.offset_size(node);
            self.insert(node, target);
            target.offset += size;
        }
    }

    /// Merge the element after `position` into the element before it.
    ///
    /// # Panics
    ///
    /// If there is not an element on both sides of `position`.
    pub fn merge(&mut self, position: Position) {
        let before = self
            .tree
            .node_before(position)
            .filter(|&n| self.tree.is_element(n));
        let after = self
            .tree
            .node_after(position)
            .filter(|&n| self.tree.is_element(n));
        let (Some(before), Some(after)) = (before, after) else {
            panic!("merge at {position:?} needs an element on both sides");
        };

        let count = self.tree.children(after).len();
        for child in self.detach_children(after, 0, count) {
            self.append(child, before);
        }
        self.remove_node(after);
    }

    fn detach_children(&mut self, parent: NodeId, first: usize, last: usize) -> Vec<NodeId> {
        let detached: Vec<NodeId> = self.tree.children_mut(parent).drain(first..last).collect();
        for &node in &detached {
            self.tree.set_parent(node, None);
        }
        self.normalize_text(parent);
        self.changed = true;
        detached
    }

    /// Split the parent of `position` in two and return the position between the halves.
    ///
    /// The new second half copies the name and attributes of the original.
    pub fn split(&mut self, position: Position) -> Position {
        let element = position.parent;
        let after_element = Position::after(self.tree, element)
            .unwrap_or_else(|| panic!("cannot split {element:?}: it has no parent"));

        let index = self.split_text_at(position);
        let clone_kind = self.tree.kind(element).clone();
        let clone = self.tree.alloc(clone_kind);
        let moved: Vec<NodeId> = self.tree.children_mut(element).drain(index..).collect();
        for node in &moved {
            self.tree.set_parent(*node, Some(clone));
        }
        *self.tree.children_mut(clone) = moved;

        self.insert(clone, after_element);
        after_element
    }

    pub fn set_attribute(&mut self, key: &str, value: &str, element: NodeId) {
        if let NodeKind::Element { attributes, .. } = self.tree.kind_mut(element) {
            attributes.insert(key.to_string(), value.to_string());
            self.changed = true;
        }
    }

    pub fn remove_attribute(&mut self, key: &str, element: NodeId) {
        if let NodeKind::Element { attributes, .. } = self.tree.kind_mut(element)
            && attributes.remove(key).is_some()
        {
            self.changed = true;
        }
    }

    pub fn set_selection(&mut self, selection: Selection) {
        *self.selection = selection;
        self.changed = true;
    }

    fn check_position(&self, position: Position) {
        assert!(
            self.tree.is_element(position.parent),
            "position {position:?} must be inside an element"
        );
        let max = self.tree.max_offset(position.parent);
        assert!(
            position.offset <= max,
            "offset {} is out of bounds for {:?} (max {max})",
            position.offset,
            position.parent
        );
    }

    /// Split the text node containing `position` and return the child index at it.
    fn split_text_at(&mut self, position: Position) -> usize {
        self.check_position(position);
        let (index, inner) = self.tree.locate(position.parent, position.offset);
        if inner == 0 {
            return index;
        }

        let text_node = self.tree.children(position.parent)[index];
        let tail = match self.tree.kind_mut(text_node) {
            NodeKind::Text(data) => {
                let byte = data
                    .char_indices()
                    .nth(inner)
                    .map(|(b, _)| b)
                    .unwrap_or(data.len());
                data.split_off(byte)
            }
            NodeKind::Element { .. } => unreachable!("only text nodes have inner offsets"),
        };
        let tail_node = self.tree.alloc(NodeKind::Text(tail));
        self.tree
            .children_mut(position.parent)
            .insert(index + 1, tail_node);
        self.tree.set_parent(tail_node, Some(position.parent));
        index + 1
    }

    /// Merge adjacent text children and drop empty ones.
    fn normalize_text(&mut self, parent: NodeId) {
        let children: Vec<NodeId> = self.tree.children(parent).to_vec();
        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());

        for child in children {
            let Some(data) = self.tree.data_of(child).map(str::to_string) else {
                kept.push(child);
                continue;
            };
            if data.is_empty() {
                self.tree.set_parent(child, None);
                continue;
            }
            match kept.last() {
                Some(&previous) if self.tree.is_text(previous) => {
                    if let NodeKind::Text(existing) = self.tree.kind_mut(previous) {
                        existing.push_str(&data);
                    }
                    self.tree.set_parent(child, None);
                }
                _ => kept.push(child),
            }
        }

        *self.tree.children_mut(parent) = kept;
    }
}
