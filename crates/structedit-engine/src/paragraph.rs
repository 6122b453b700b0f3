//! The default block: the only element plain text lives in out of the box.

use crate::model::schema::BLOCK_NAME;
use crate::model::{Schema, SchemaItem};

pub const PARAGRAPH: &str = "paragraph";

pub fn register_schema(schema: &mut Schema) {
    schema.register(PARAGRAPH, SchemaItem::new().inherit_all_from(BLOCK_NAME));
}
