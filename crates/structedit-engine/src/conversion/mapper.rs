//! Position mapping between the model tree and the view tree.
//!
//! Every model element has a view element. The reverse is not true: some
//! view elements (the `img` inside an image figure) exist only for display
//! and take no room in model offsets.

use std::collections::HashMap;

use crate::tree::{NodeId, Position, Range, Selection, Tree};

#[derive(Debug, Clone, Default)]
pub struct Mapper {
    model_to_view: HashMap<NodeId, NodeId>,
    view_to_model: HashMap<NodeId, NodeId>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, model: NodeId, view: NodeId) {
        self.model_to_view.insert(model, view);
        self.view_to_model.insert(view, model);
    }

    pub fn clear(&mut self) {
        self.model_to_view.clear();
        self.view_to_model.clear();
    }

    pub fn to_view_element(&self, model: NodeId) -> Option<NodeId> {
        self.model_to_view.get(&model).copied()
    }

    pub fn to_model_element(&self, view: NodeId) -> Option<NodeId> {
        self.view_to_model.get(&view).copied()
    }

    /// Room a view node takes in model offsets.
    fn model_size(&self, view: &Tree, node: NodeId) -> usize {
        if view.is_text(node) {
            view.offset_size(node)
        } else if self.view_to_model.contains_key(&node) {
            1
        } else {
            0
        }
    }

    /// The view position for a model position. View-only nodes at the
    /// mapped spot are skipped, so the result is after them.
    pub fn to_view_position(&self, view: &Tree, position: Position) -> Option<Position> {
        let parent = self.to_view_element(position.parent)?;
        let mut remaining = position.offset;
        let mut view_offset = 0;

        for &child in view.children(parent) {
            let size = self.model_size(view, child);
            if remaining == 0 && size > 0 {
                break;
            }
            if view.is_text(child) && remaining < size {
                return Some(Position::new(parent, view_offset + remaining));
            }
            remaining = remaining.checked_sub(size)?;
            view_offset += view.offset_size(child);
        }

        (remaining == 0).then_some(Position::new(parent, view_offset))
    }

    /// The model position for a view position. Positions inside view-only
    /// elements map to the spot before them.
    pub fn to_model_position(&self, view: &Tree, position: Position) -> Option<Position> {
        let mut position = position;
        while !self.view_to_model.contains_key(&position.parent) {
            position = Position::before(view, position.parent)?;
        }
        let model_parent = self.to_model_element(position.parent)?;

        let (index, inner) = view.locate(position.parent, position.offset);
        let before: usize = view.children(position.parent)[..index]
            .iter()
            .map(|&child| self.model_size(view, child))
            .sum();
        Some(Position::new(model_parent, before + inner))
    }

    pub fn to_view_range(&self, view: &Tree, range: Range) -> Option<Range> {
        Some(Range {
            start: self.to_view_position(view, range.start)?,
            end: self.to_view_position(view, range.end)?,
        })
    }

    pub fn to_model_range(&self, view: &Tree, range: Range) -> Option<Range> {
        Some(Range {
            start: self.to_model_position(view, range.start)?,
            end: self.to_model_position(view, range.end)?,
        })
    }

    /// Map every range that can be mapped, keeping their order.
    pub fn to_model_selection(&self, view: &Tree, selection: &Selection) -> Selection {
        let ranges = selection
            .ranges()
            .iter()
            .filter_map(|&range| self.to_model_range(view, range))
            .collect();
        Selection::from_ranges(ranges, selection.is_backward())
    }

    pub fn to_view_selection(&self, view: &Tree, selection: &Selection) -> Selection {
        let ranges = selection
            .ranges()
            .iter()
            .filter_map(|&range| self.to_view_range(view, range))
            .collect();
        Selection::from_ranges(ranges, selection.is_backward())
    }
}
