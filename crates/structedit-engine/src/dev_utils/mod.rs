//! # Dev Utils
//!
//! Reading and writing documents in the compact data notation from
//! `structedit-syntax`, so tests (and the CLI) can state a whole document and
//! its selection in one string:
//!
//! ```text
//! <paragraph>f[o]o</paragraph>
//! ```
//!
//! [`set_model_data`] replaces the model content, [`get_model_data`] and
//! [`get_view_data`] print the model or view tree with the selection marked.

mod sink;
mod stringify;

pub use sink::{SelectionMarkers, parse_into};
pub use stringify::stringify;

use structedit_syntax::ParseError;
use thiserror::Error;

use crate::model::{Model, document_start};
use crate::tree::Selection;
use crate::view::View;

/// Errors produced while loading data notation into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("selection markers do not pair up: {starts} `[` and {ends} `]`")]
    UnbalancedSelection { starts: usize, ends: usize },

    #[error("selection end comes before its start")]
    SelectionEndBeforeStart,

    #[error("<{child}> is not allowed in <{parent}>")]
    NotAllowed { child: String, parent: String },
}

/// Replace the whole model content with `data`.
///
/// Without selection markers the caret goes to the start of the document.
/// On error the model is left as it was.
pub fn set_model_data(model: &mut Model, data: &str) -> Result<(), DataError> {
    let mut next = model.clone();
    let markers = next.change(|writer| {
        let root = writer.tree().root();
        let old = writer.tree().children(root).to_vec();
        for node in old {
            writer.remove_node(node);
        }
        parse_into(writer, root, data)
    })?;
    let selection = markers.into_selection(next.tree())?;

    next.change(|writer| {
        let selection = selection.unwrap_or_else(|| {
            Selection::collapsed_at(document_start(writer.tree(), writer.schema()))
        });
        writer.set_selection(selection);
    });
    *model = next;
    Ok(())
}

/// The model content and selection in data notation.
pub fn get_model_data(model: &Model) -> String {
    let tree = model.tree();
    stringify(tree, tree.root(), Some(model.selection()))
}

/// The view content and selection in data notation.
pub fn get_view_data(view: &View) -> String {
    let tree = view.tree();
    stringify(tree, tree.root(), Some(view.selection()))
}

/// A model with paragraphs, block and inline images and captions, loaded
/// with `data`.
#[cfg(test)]
pub(crate) fn test_model(data: &str) -> Model {
    let mut schema = crate::model::Schema::new();
    crate::paragraph::register_schema(&mut schema);
    crate::image::register_block_schema(&mut schema);
    crate::image::register_inline_schema(&mut schema);
    crate::image::register_caption_schema(&mut schema);

    let mut model = Model::new(schema);
    if let Err(error) = set_model_data(&mut model, data) {
        panic!("bad test data {data:?}: {error}");
    }
    model
}
