//! The editing model: the authoritative document tree, its selection and
//! the schema that constrains both.
//!
//! Mutations happen inside [`Model::change`], which hands out a single
//! [`ModelWriter`]. The model version only moves when the writer actually
//! changed something.

pub mod delete_content;
pub mod insert_content;
pub mod modify_selection;
pub mod schema;

use std::ops::{Deref, DerefMut};

pub use delete_content::delete_content;
pub use insert_content::insert_content;
pub use modify_selection::{Direction, Unit, modify_selection};
pub use schema::{Schema, SchemaItem};

use crate::tree::{Position, Selection, TEXT_NAME, Tree, Writer};

#[derive(Debug, Clone, Default)]
pub struct Model {
    tree: Tree,
    selection: Selection,
    schema: Schema,
    version: u64,
}

/// A [`Writer`] over the model tree that can also consult the schema.
pub struct ModelWriter<'a> {
    writer: Writer<'a>,
    schema: &'a Schema,
}

impl<'a> ModelWriter<'a> {
    /// The schema outlives the writer borrow so it can be held across mutations.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }
}

impl<'a> Deref for ModelWriter<'a> {
    type Target = Writer<'a>;

    fn deref(&self) -> &Self::Target {
        &self.writer
    }
}

impl DerefMut for ModelWriter<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.writer
    }
}

impl Model {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            ..Self::default()
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The document selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    /// Bumped once per [`Model::change`] block that modified anything.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn change<R>(&mut self, f: impl FnOnce(&mut ModelWriter<'_>) -> R) -> R {
        let mut writer = ModelWriter {
            writer: Writer::new(&mut self.tree, &mut self.selection),
            schema: &self.schema,
        };
        let result = f(&mut writer);
        if writer.has_changed() {
            self.version += 1;
        }
        result
    }
}

/// The first place text could be typed, or the start of the root when there
/// is none.
pub fn document_start(tree: &Tree, schema: &Schema) -> Position {
    tree.descendants(tree.root())
        .into_iter()
        .find(|&node| schema.check_child_in(tree, node, TEXT_NAME))
        .map_or(Position::at_start(tree.root()), Position::at_start)
}
