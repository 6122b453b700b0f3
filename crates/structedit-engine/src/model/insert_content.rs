//! Placing a new element into the document, splitting whatever stands in
//! its way.

use log::debug;

use super::delete_content::delete_range;
use super::{ModelWriter, Schema};
use crate::tree::{NodeId, Position, Range, Selection, Tree};

/// Insert the detached `element` at `range`, replacing its content, and
/// select the element.
///
/// When the schema does not allow the element where the range starts, the
/// insertion point climbs out of ancestors (splitting them when the point is
/// in their middle) until it reaches a parent that accepts it. Attributes the
/// schema does not allow on the element are dropped. Returns `false` and
/// leaves the tree alone when no parent short of a limit element accepts the
/// element.
pub fn insert_content(writer: &mut ModelWriter<'_>, element: NodeId, range: Range) -> bool {
    let schema = writer.schema();
    let Some(name) = writer.tree().name(element).map(str::to_string) else {
        return false;
    };
    if !can_place(writer.tree(), schema, range.start, &name) {
        debug!("{name} cannot be placed at {:?}", range.start);
        return false;
    }
    if !range.is_collapsed() && !delete_range(writer, range) {
        return false;
    }

    let mut position = range.start;
    while !schema.check_child_at(writer.tree(), position, &name) {
        let parent = position.parent;
        let next = if position.is_at_start() {
            Position::before(writer.tree(), parent)
        } else if position.is_at_end(writer.tree()) {
            Position::after(writer.tree(), parent)
        } else {
            Some(writer.split(position))
        };
        let Some(next) = next else {
            return false;
        };
        position = next;
    }

    let disallowed: Vec<String> = writer
        .tree()
        .attributes(element)
        .filter(|(key, _)| !schema.check_attribute(&name, key))
        .map(|(key, _)| key.to_string())
        .collect();
    for key in disallowed {
        writer.remove_attribute(&key, element);
    }

    writer.insert(element, position);
    if let Some(selection) = Selection::on(writer.tree(), element) {
        writer.set_selection(selection);
    }
    true
}

/// Whether some ancestor of `position`, short of leaving a limit, accepts `name`.
fn can_place(tree: &Tree, schema: &Schema, position: Position, name: &str) -> bool {
    let mut position = position;
    loop {
        if schema.check_child_at(tree, position, name) {
            return true;
        }
        if schema.is_limit_node(tree, position.parent) {
            return false;
        }
        match Position::before(tree, position.parent) {
            Some(outer) => position = outer,
            None => return false,
        }
    }
}
