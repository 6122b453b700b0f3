//! Running delete commands for `delete` view events.

use log::{debug, error};

use super::DeleteParams;
use crate::commands::CommandParams;
use crate::editor::Editor;
use crate::events::{EventInfo, EventRegistry, Priority};
use crate::model::Direction;
use crate::view::ViewEvent;

pub(crate) fn register(events: &mut EventRegistry<Editor, ViewEvent>) {
    events.on("delete", Priority::Normal, on_delete);
}

/// Command run for a deletion in `direction`.
pub fn command_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Backward => "delete",
        Direction::Forward => "forwardDelete",
    }
}

/// Execute the delete command for one intent, then claim the event.
///
/// A target selection is mapped range by range onto the model. Ranges with
/// no model counterpart are dropped; if none remain the command still runs
/// with an empty selection and leaves the document alone.
fn on_delete(editor: &mut Editor, _info: &mut EventInfo, event: &mut ViewEvent) {
    let ViewEvent::Delete(data) = event else {
        return;
    };
    let intent = &data.data;

    let selection = intent
        .selection_to_remove
        .as_ref()
        .map(|selection| editor.mapper().to_model_selection(editor.view().tree(), selection));
    let name = command_name(intent.direction);
    let params = CommandParams::Delete(DeleteParams {
        unit: intent.unit,
        sequence: intent.sequence,
        selection,
    });

    debug!("executing {name} #{}", intent.sequence);
    if let Err(err) = editor.execute(name, params) {
        error!("delete intent not handled: {err}");
    }

    data.prevent_default();
    editor.view_mut().scroll_to_the_selection();
}
