//! Turning raw input into `delete` view events.

use log::debug;

use super::{DeleteIntent, DeleteUnit};
use crate::editor::Editor;
use crate::events::{EventInfo, EventRegistry, Priority};
use crate::model::Direction;
use crate::tree::{Range, Selection};
use crate::view::{BeforeInput, DomEventData, DomRange, Key, KeyInput, ViewEvent};

/// `inputType` of a backward deletion announced through `beforeinput`.
pub const DELETE_CONTENT_BACKWARD: &str = "deleteContentBackward";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gesture {
    direction: Direction,
    sequence: u32,
}

/// Numbers the deletions of one held-down key.
///
/// Idle until the first deletion, which gets sequence 0. Each following
/// deletion in the same direction gets the next number, until the key is
/// released. A deletion in the other direction starts over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteObserver {
    gesture: Option<Gesture>,
}

impl DeleteObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a deletion and return its sequence number.
    pub fn next_sequence(&mut self, direction: Direction) -> u32 {
        let sequence = match self.gesture {
            Some(gesture) if gesture.direction == direction => gesture.sequence + 1,
            _ => 0,
        };
        self.gesture = Some(Gesture {
            direction,
            sequence,
        });
        sequence
    }

    pub fn end_gesture(&mut self) {
        self.gesture = None;
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_some()
    }
}

pub(crate) fn register(events: &mut EventRegistry<Editor, ViewEvent>) {
    events.on("keydown", Priority::Normal, on_key_down);
    events.on("keyup", Priority::Normal, on_key_up);
    events.on("beforeinput", Priority::Normal, on_before_input);
}

fn delete_key(editor: &Editor, input: &KeyInput) -> Option<(Direction, DeleteUnit)> {
    let (direction, unit) = match input.key {
        Key::Delete => (Direction::Forward, DeleteUnit::Character),
        Key::Backspace => (Direction::Backward, DeleteUnit::CodePoint),
        _ => return None,
    };
    if editor.platform().word_modifier.is_pressed(input.modifiers) {
        return Some((direction, DeleteUnit::Word));
    }
    Some((direction, unit))
}

fn on_key_down(editor: &mut Editor, info: &mut EventInfo, event: &mut ViewEvent) {
    let ViewEvent::KeyDown(data) = event else {
        return;
    };
    let Some((direction, unit)) = delete_key(editor, &data.data) else {
        return;
    };

    let intent = DeleteIntent {
        direction,
        unit,
        sequence: editor.typing.observer.next_sequence(direction),
        selection_to_remove: None,
        dom_target: data.data.dom_target,
    };
    fire_delete(editor, info, data, intent);
}

fn on_key_up(editor: &mut Editor, _info: &mut EventInfo, event: &mut ViewEvent) {
    let ViewEvent::KeyUp(data) = event else {
        return;
    };
    if matches!(data.data.key, Key::Delete | Key::Backspace) {
        editor.typing.observer.end_gesture();
    }
}

fn on_before_input(editor: &mut Editor, info: &mut EventInfo, event: &mut ViewEvent) {
    let ViewEvent::BeforeInput(data) = event else {
        return;
    };
    if !editor.platform().before_input_deletions || data.data.input_type != DELETE_CONTENT_BACKWARD {
        return;
    }

    let selection_to_remove = target_selection(editor, &data.data);
    let unit = if selection_to_remove.is_some() {
        DeleteUnit::Selection
    } else {
        DeleteUnit::CodePoint
    };
    let intent = DeleteIntent {
        direction: Direction::Backward,
        unit,
        sequence: editor.typing.observer.next_sequence(Direction::Backward),
        selection_to_remove,
        dom_target: data.data.dom_target,
    };
    fire_delete(editor, info, data, intent);
}

/// The view selection a `beforeinput` deletion asks to remove.
///
/// Target ranges win. Without them, a DOM selection inside one node is used
/// unless it covers exactly one character, which the command works out by
/// itself. Ranges that do not convert are dropped.
fn target_selection(editor: &Editor, input: &BeforeInput) -> Option<Selection> {
    let tree = editor.view().tree();
    let converter = editor.dom_converter();

    let dom_ranges = if input.target_ranges.is_empty() {
        let dom_selection = editor.view().dom_selection();
        let (anchor, focus) = (dom_selection.anchor()?, dom_selection.focus()?);
        if anchor.node != focus.node || anchor.offset + 1 == focus.offset {
            return None;
        }
        vec![DomRange {
            start: anchor,
            end: focus,
        }]
    } else {
        input.target_ranges.clone()
    };

    let ranges: Vec<Range> = dom_ranges
        .iter()
        .filter_map(|range| converter.dom_range_to_view(tree, range))
        .collect();
    let selection = Selection::from_ranges(ranges, false);
    (!selection.is_empty() && !selection.is_collapsed()).then_some(selection)
}

/// Fire `delete` for `intent` and pass the outcome back to the raw event.
fn fire_delete<T>(
    editor: &mut Editor,
    info: &mut EventInfo,
    origin: &mut DomEventData<T>,
    intent: DeleteIntent,
) {
    debug!(
        "delete intent: {:?} {:?} #{}{}",
        intent.direction,
        intent.unit,
        intent.sequence,
        if intent.selection_to_remove.is_some() {
            " with target selection"
        } else {
            ""
        }
    );

    let mut event = ViewEvent::Delete(DomEventData::new(intent));
    let delete_info = editor.fire(&mut event);
    if delete_info.is_stopped() {
        info.stop();
        origin.prevent_default();
    }
    if event.is_default_prevented() {
        origin.prevent_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sequence_counts_up_within_a_gesture() {
        let mut observer = DeleteObserver::new();

        let sequences: Vec<u32> = (0..3)
            .map(|_| observer.next_sequence(Direction::Backward))
            .collect();

        assert_eq!(sequences, vec![0, 1, 2]);
        assert!(observer.is_gesture_active());
    }

    #[test]
    fn test_ending_the_gesture_resets_the_sequence() {
        let mut observer = DeleteObserver::new();
        observer.next_sequence(Direction::Backward);
        observer.next_sequence(Direction::Backward);

        observer.end_gesture();

        assert!(!observer.is_gesture_active());
        assert_eq!(observer.next_sequence(Direction::Backward), 0);
    }

    #[test]
    fn test_changing_direction_starts_a_new_gesture() {
        let mut observer = DeleteObserver::new();
        observer.next_sequence(Direction::Backward);
        observer.next_sequence(Direction::Backward);

        assert_eq!(observer.next_sequence(Direction::Forward), 0);
        assert_eq!(observer.next_sequence(Direction::Forward), 1);
    }
}
