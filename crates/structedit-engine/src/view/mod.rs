//! # View
//!
//! The editing view: a tree built from the model for display, its
//! selection, the widgets in it and the selection of the (mirrored) DOM.
//!
//! The view is rebuilt from the model after every change, see
//! [`crate::conversion::Downcaster`]. Nothing edits it directly except the
//! DOM selection, which platform code (and the selection compensator) may
//! move on its own.

pub mod dom;
pub mod input;

pub use dom::{DomConverter, DomNode, DomPoint, DomRange, DomSelection, DomTarget, MirrorDomConverter};
pub use input::{BeforeInput, DomEventData, InputOutcome, Key, KeyInput, Modifiers, RawInput, ViewEvent};

use crate::tree::{Selection, Tree};
use crate::widget::WidgetRegistry;

#[derive(Debug, Clone, Default)]
pub struct View {
    pub(crate) tree: Tree,
    pub(crate) selection: Selection,
    pub(crate) widgets: WidgetRegistry,
    pub(crate) dom_selection: DomSelection,
    scroll_requests: usize,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    pub fn dom_selection(&self) -> &DomSelection {
        &self.dom_selection
    }

    /// The DOM selection, for platform code moving the caret on its own.
    pub fn dom_selection_mut(&mut self) -> &mut DomSelection {
        &mut self.dom_selection
    }

    /// Ask for the selection to be scrolled into view.
    pub fn scroll_to_the_selection(&mut self) {
        self.scroll_requests += 1;
    }

    /// How many times scrolling to the selection was requested.
    pub fn scroll_requests(&self) -> usize {
        self.scroll_requests
    }
}
