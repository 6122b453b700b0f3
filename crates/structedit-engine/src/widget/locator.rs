//! Where a selection stands relative to widgets.

use super::WidgetRegistry;
use crate::tree::{NodeId, Selection, Tree};

/// The widget the selection is exactly on, if any.
///
/// Only a single range enclosing exactly one widget element counts. A caret,
/// a span that also covers a sibling, or a selection on a plain element all
/// give `None`.
pub fn get_selected_widget(
    tree: &Tree,
    widgets: &WidgetRegistry,
    selection: &Selection,
) -> Option<NodeId> {
    let element = selection.selected_element(tree)?;
    widgets.is_widget(Some(element)).then_some(element)
}

/// The nearest widget containing the whole selection.
///
/// The search starts at the deepest element holding every range boundary.
/// A selection on a widget is *not* inside it, so it does not count as its
/// own ancestor: use [`get_selected_widget`] for that.
pub fn get_widget_ancestor(
    tree: &Tree,
    widgets: &WidgetRegistry,
    selection: &Selection,
) -> Option<NodeId> {
    let mut container: Option<NodeId> = None;
    for range in selection.ranges() {
        for parent in [range.start.parent, range.end.parent] {
            container = Some(match container {
                None => parent,
                Some(current) => tree.common_ancestor(current, parent)?,
            });
        }
    }

    tree.ancestors_inclusive(container?)
        .find(|&node| widgets.is_widget(Some(node)))
}
