//! # Widgets
//!
//! A widget is a view element the user handles as one piece: an embedded
//! image, say, rather than the `img` and caption it is built from.
//!
//! Widget metadata lives in a [`WidgetRegistry`] next to the view tree,
//! keyed by [`NodeId`]. Tree nodes themselves stay generic.

pub mod locator;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub use locator::{get_selected_widget, get_widget_ancestor};

use crate::tree::{NodeId, Tree};

/// Computes a widget label from the current state of the tree.
pub type LabelResolver = Rc<dyn Fn(&Tree, NodeId) -> String>;

/// The accessible label of a widget.
#[derive(Clone)]
pub enum WidgetLabel {
    Static(String),
    Resolver(LabelResolver),
}

impl WidgetLabel {
    pub fn resolver(resolve: impl Fn(&Tree, NodeId) -> String + 'static) -> Self {
        Self::Resolver(Rc::new(resolve))
    }

    fn resolve(&self, tree: &Tree, node: NodeId) -> String {
        match self {
            Self::Static(label) => label.clone(),
            Self::Resolver(resolve) => resolve(tree, node),
        }
    }
}

impl From<&str> for WidgetLabel {
    fn from(label: &str) -> Self {
        Self::Static(label.to_string())
    }
}

impl fmt::Debug for WidgetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(label) => f.debug_tuple("Static").field(label).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

#[derive(Debug, Clone)]
struct WidgetMetadata {
    label: WidgetLabel,
    kind: Option<&'static str>,
}

/// Side table of widget metadata for one view tree.
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    widgets: HashMap<NodeId, WidgetMetadata>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `node` as a widget and return it. Marking again replaces the label.
    ///
    /// # Panics
    ///
    /// If `node` is a text node: only elements can be widgets.
    pub fn mark_as_widget(&mut self, tree: &Tree, node: NodeId, label: WidgetLabel) -> NodeId {
        self.mark(tree, node, None, label)
    }

    /// Like [`WidgetRegistry::mark_as_widget`], also recording what kind of
    /// widget this is (for example `"image"`).
    pub fn mark_as_widget_of_kind(
        &mut self,
        tree: &Tree,
        node: NodeId,
        kind: &'static str,
        label: WidgetLabel,
    ) -> NodeId {
        self.mark(tree, node, Some(kind), label)
    }

    fn mark(
        &mut self,
        tree: &Tree,
        node: NodeId,
        kind: Option<&'static str>,
        label: WidgetLabel,
    ) -> NodeId {
        assert!(
            tree.is_element(node),
            "cannot mark {node:?} as a widget: widgets must be elements, not text"
        );
        self.widgets.insert(node, WidgetMetadata { label, kind });
        node
    }

    pub fn is_widget(&self, node: Option<NodeId>) -> bool {
        node.is_some_and(|node| self.widgets.contains_key(&node))
    }

    pub fn is_widget_of_kind(&self, node: Option<NodeId>, kind: &str) -> bool {
        node.and_then(|node| self.widgets.get(&node))
            .is_some_and(|widget| widget.kind == Some(kind))
    }

    /// The widget label, or an empty string when `node` is not a widget.
    pub fn get_label(&self, tree: &Tree, node: NodeId) -> String {
        self.widgets
            .get(&node)
            .map(|widget| widget.label.resolve(tree, node))
            .unwrap_or_default()
    }

    /// Drop all metadata. Called whenever the view is rebuilt.
    pub fn clear(&mut self) {
        self.widgets.clear();
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
