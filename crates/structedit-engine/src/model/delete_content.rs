//! Removing a selected range and joining what is left.

use log::debug;

use super::{ModelWriter, Schema};
use crate::paragraph::PARAGRAPH;
use crate::tree::{NodeId, Position, Range, Selection, TEXT_NAME, Tree};

/// Delete the content of the first range of `selection` and collapse the
/// document selection where it was.
///
/// Blocks cut by the range are merged. A range whose ends lie in different
/// limit elements (say, one in an image caption and one outside) is left
/// alone.
pub fn delete_content(writer: &mut ModelWriter<'_>, selection: &Selection) {
    let Some(range) = selection.first_range() else {
        return;
    };
    if range.is_collapsed() || !delete_range(writer, range) {
        return;
    }

    let caret = selection_after_delete(writer, range.start);
    writer.set_selection(caret);
}

/// Remove `range` and merge the blocks on both sides.
///
/// Returns `false`, changing nothing, when the range crosses a limit boundary.
pub(crate) fn delete_range(writer: &mut ModelWriter<'_>, range: Range) -> bool {
    let schema = writer.schema();
    let tree = writer.tree();
    let start_limit = schema.limit_of(tree, range.start.parent);
    let end_limit = schema.limit_of(tree, range.end.parent);
    if start_limit != end_limit {
        debug!("not deleting {range:?}: it crosses a limit element");
        return false;
    }

    writer.remove(range);
    merge_branches(writer, range.start.parent, range.end.parent);
    true
}

fn merge_branches(writer: &mut ModelWriter<'_>, start_parent: NodeId, end_parent: NodeId) {
    let schema = writer.schema();
    let (mut start_parent, mut end_parent) = (start_parent, end_parent);

    loop {
        let tree = writer.tree();
        if start_parent == end_parent
            || tree.contains(start_parent, end_parent)
            || tree.contains(end_parent, start_parent)
            || schema.is_limit_node(tree, start_parent)
            || schema.is_limit_node(tree, end_parent)
        {
            return;
        }
        let (Some(after_start), Some(old_container)) =
            (Position::after(tree, start_parent), tree.parent(end_parent))
        else {
            return;
        };

        if Position::before(tree, end_parent) != Some(after_start) {
            writer.move_node(end_parent, after_start);
        }
        writer.merge(after_start);

        let mut container = old_container;
        while writer.tree().is_empty(container) && !schema.is_limit_node(writer.tree(), container) {
            let Some(parent) = writer.tree().parent(container) else {
                break;
            };
            writer.remove_node(container);
            container = parent;
        }

        start_parent = after_start.parent;
        end_parent = container;
    }
}

/// Where the caret goes once content starting at `start` is gone.
fn selection_after_delete(writer: &mut ModelWriter<'_>, start: Position) -> Selection {
    let schema = writer.schema();
    if schema.check_child_at(writer.tree(), start, TEXT_NAME) {
        return Selection::collapsed_at(start);
    }

    if writer.tree().is_empty(start.parent)
        && schema.check_child_at(writer.tree(), start, PARAGRAPH)
    {
        let paragraph = writer.create_element(PARAGRAPH, &[]);
        writer.insert(paragraph, start);
        return Selection::collapsed_at(Position::at_start(paragraph));
    }

    nearest_selection(writer.tree(), schema, start)
        .unwrap_or_else(|| Selection::collapsed_at(start))
}

/// A caret in an adjacent text container or an object to select whole.
fn nearest_selection(tree: &Tree, schema: &Schema, position: Position) -> Option<Selection> {
    if let Some(after) = tree.node_after(position) {
        if schema.is_object_node(tree, after) {
            return Selection::on(tree, after);
        }
        if schema.check_child_in(tree, after, TEXT_NAME) {
            return Some(Selection::collapsed_at(Position::at_start(after)));
        }
    }
    if let Some(before) = tree.node_before(position) {
        if schema.is_object_node(tree, before) {
            return Selection::on(tree, before);
        }
        if schema.check_child_in(tree, before, TEXT_NAME) {
            return Some(Selection::collapsed_at(Position::at_end(tree, before)));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev_utils::{get_model_data, test_model};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::inside_text("<paragraph>f[oo]bar</paragraph>", "<paragraph>f[]bar</paragraph>")]
    #[case::across_blocks(
        "<paragraph>fo[o</paragraph><paragraph>ba]r</paragraph>",
        "<paragraph>fo[]r</paragraph>"
    )]
    #[case::across_three_blocks(
        "<paragraph>f[oo</paragraph><paragraph>x</paragraph><paragraph>b]ar</paragraph>",
        "<paragraph>f[]ar</paragraph>"
    )]
    #[case::inline_object(
        "<paragraph>f[<imageInline></imageInline>]oo</paragraph>",
        "<paragraph>f[]oo</paragraph>"
    )]
    #[case::block_object_before_paragraph(
        "[<image></image><paragraph>]foo</paragraph>",
        "<paragraph>[]foo</paragraph>"
    )]
    #[case::only_block_object("[<image></image>]", "<paragraph>[]</paragraph>")]
    #[case::across_caption_boundary(
        "<image><caption>f[oo</caption></image><paragraph>b]ar</paragraph>",
        "<image><caption>f[oo</caption></image><paragraph>b]ar</paragraph>"
    )]
    #[case::collapsed("<paragraph>f[]oo</paragraph>", "<paragraph>f[]oo</paragraph>")]
    fn test_deletes_selected_content(#[case] data: &str, #[case] expected: &str) {
        let mut model = test_model(data);
        let selection = model.selection().clone();

        model.change(|writer| delete_content(writer, &selection));

        assert_eq!(get_model_data(&model), expected);
    }

    #[test]
    fn test_no_op_does_not_bump_version() {
        let mut model = test_model("<image><caption>f[oo</caption></image><paragraph>b]ar</paragraph>");
        let selection = model.selection().clone();
        let version = model.version();

        model.change(|writer| delete_content(writer, &selection));

        assert_eq!(model.version(), version);
    }
}
