//! # Typing
//!
//! The delete-intent pipeline. Raw platform input goes in, a single
//! `delete` view event per deletion comes out and is turned into a
//! `delete` or `forwardDelete` command on the model.
//!
//! - [`observer`] normalizes key presses and `beforeinput` events into
//!   [`DeleteIntent`]s, numbering the steps of a held-down key.
//! - [`dispatcher`] maps an intent onto the model and runs the command.
//! - [`selection_restore`] undoes caret drift on input methods that move the
//!   DOM selection after the editor has placed it.
//! - [`delete_command`] is the command itself.

pub mod delete_command;
pub mod dispatcher;
pub mod observer;
pub mod selection_restore;

pub use delete_command::DeleteCommand;
pub use observer::DeleteObserver;
pub use selection_restore::{SelectionRestorer, SelectionSnapshot};

use crate::editor::Editor;
use crate::events::EventRegistry;
use crate::model::{Direction, Unit};
use crate::platform::PlatformCapabilities;
use crate::tree::Selection;
use crate::view::{DomTarget, ViewEvent};

/// How much a single delete step removes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteUnit {
    /// One user-perceived character.
    #[default]
    Character,
    /// One Unicode scalar, so a backspace can peel accents off one by one.
    CodePoint,
    Word,
    /// Exactly the given selection.
    Selection,
}

impl DeleteUnit {
    /// The unit to extend a collapsed selection by. `None` for
    /// [`DeleteUnit::Selection`], which never extends.
    pub fn as_model_unit(self) -> Option<Unit> {
        match self {
            Self::Character => Some(Unit::Character),
            Self::CodePoint => Some(Unit::CodePoint),
            Self::Word => Some(Unit::Word),
            Self::Selection => None,
        }
    }
}

/// A deletion the user asked for, independent of how they asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteIntent {
    pub direction: Direction,
    pub unit: DeleteUnit,
    /// Step number within one held-down key, starting at 0.
    pub sequence: u32,
    /// View selection the platform wants removed, if it said so.
    pub selection_to_remove: Option<Selection>,
    pub dom_target: DomTarget,
}

/// Parameters of the `delete` and `forwardDelete` commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteParams {
    pub unit: DeleteUnit,
    pub sequence: u32,
    /// Model selection to delete instead of the document selection.
    pub selection: Option<Selection>,
}

/// Per-editor state of the pipeline.
#[derive(Debug, Default)]
pub struct TypingState {
    pub(crate) observer: DeleteObserver,
    pub(crate) restorer: SelectionRestorer,
}

impl TypingState {
    pub fn observer(&self) -> &DeleteObserver {
        &self.observer
    }

    pub fn restorer(&self) -> &SelectionRestorer {
        &self.restorer
    }
}

/// Hook the pipeline into the view document events.
pub(crate) fn register(events: &mut EventRegistry<Editor, ViewEvent>, platform: PlatformCapabilities) {
    observer::register(events);
    dispatcher::register(events);
    if platform.async_selection_repositioning {
        selection_restore::register(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DeleteUnit::Character, Some(Unit::Character))]
    #[case(DeleteUnit::CodePoint, Some(Unit::CodePoint))]
    #[case(DeleteUnit::Word, Some(Unit::Word))]
    #[case(DeleteUnit::Selection, None)]
    fn test_model_units(#[case] unit: DeleteUnit, #[case] expected: Option<Unit>) {
        assert_eq!(unit.as_model_unit(), expected);
    }

    #[test]
    fn test_restorer_listens_only_on_affected_platforms() {
        let mut desktop = EventRegistry::new();
        register(&mut desktop, PlatformCapabilities::desktop());
        let mut android = EventRegistry::new();
        register(&mut android, PlatformCapabilities::android());

        assert_eq!(desktop.listener_count("delete"), 1);
        assert_eq!(android.listener_count("delete"), 2);
        assert_eq!(desktop.listener_count("keyup"), 1);
        assert_eq!(android.listener_count("keyup"), 2);
    }
}
