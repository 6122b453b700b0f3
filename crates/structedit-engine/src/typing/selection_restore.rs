//! Putting the DOM selection back after input methods move it.
//!
//! Some Android keyboards reposition the caret on their own between a
//! deletion and the key release. The restorer remembers the DOM selection
//! right after each deletion and reapplies it on the next key release.

use log::trace;

use crate::editor::Editor;
use crate::events::{EventInfo, EventRegistry, Priority};
use crate::tree::Tree;
use crate::view::{DomConverter, DomPoint, DomSelection, ViewEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub anchor: DomPoint,
    pub focus: DomPoint,
}

/// Holds at most one snapshot at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionRestorer {
    snapshot: Option<SelectionSnapshot>,
}

impl SelectionRestorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<SelectionSnapshot> {
        self.snapshot
    }

    /// Remember `dom_selection`, replacing anything remembered before.
    pub fn capture(&mut self, dom_selection: &DomSelection) {
        self.snapshot = dom_selection
            .anchor()
            .zip(dom_selection.focus())
            .map(|(anchor, focus)| SelectionSnapshot { anchor, focus });
    }

    /// Apply and forget the snapshot. Returns whether it was applied.
    ///
    /// A snapshot whose points no longer resolve in `tree` (the view was
    /// re-rendered in between) is dropped without touching `dom_selection`.
    pub fn restore(
        &mut self,
        tree: &Tree,
        converter: &dyn DomConverter,
        dom_selection: &mut DomSelection,
    ) -> bool {
        let Some(snapshot) = self.snapshot.take() else {
            return false;
        };
        let resolves = |point: DomPoint| converter.dom_point_to_view(tree, point).is_some();
        if !resolves(snapshot.anchor) || !resolves(snapshot.focus) {
            trace!("dropped stale DOM selection snapshot {snapshot:?}");
            return false;
        }
        dom_selection.collapse(snapshot.anchor);
        dom_selection.extend(snapshot.focus);
        true
    }
}

pub(crate) fn register(events: &mut EventRegistry<Editor, ViewEvent>) {
    events.on("delete", Priority::Lowest, on_delete);
    events.on("keyup", Priority::Lowest, on_key_up);
}

fn on_delete(editor: &mut Editor, _info: &mut EventInfo, _event: &mut ViewEvent) {
    let dom_selection = *editor.view().dom_selection();
    editor.typing.restorer.capture(&dom_selection);
    trace!("captured DOM selection {:?}", editor.typing.restorer.snapshot());
}

fn on_key_up(editor: &mut Editor, _info: &mut EventInfo, _event: &mut ViewEvent) {
    let Editor {
        typing,
        view,
        dom_converter,
        ..
    } = editor;
    if typing
        .restorer
        .restore(&view.tree, dom_converter.as_ref(), &mut view.dom_selection)
    {
        trace!("restored DOM selection {:?}", view.dom_selection());
    }
}
