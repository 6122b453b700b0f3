//! The `delete` and `forwardDelete` commands.

use super::DeleteParams;
use crate::commands::{Command, CommandParams};
use crate::model::{Direction, Model, ModelWriter, delete_content, modify_selection};
use crate::paragraph::PARAGRAPH;
use crate::tree::{Position, Range, Selection};

/// Deletes the selection, or one unit next to a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteCommand {
    direction: Direction,
}

impl DeleteCommand {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Backspacing in a limit element holding nothing but a non-paragraph
    /// block (an empty heading, say) turns it into an empty paragraph rather
    /// than doing nothing. Only the first step of a gesture does this.
    fn should_replace_with_paragraph(&self, model: &Model, sequence: u32) -> bool {
        if self.direction != Direction::Backward || sequence > 0 {
            return false;
        }
        let (tree, schema, selection) = (model.tree(), model.schema(), model.selection());
        let (Some(limit), Some(first), Some(last)) = (
            schema.limit_element(tree, selection),
            selection.first_range().map(|range| range.start),
            selection.last_range().map(|range| range.end),
        ) else {
            return false;
        };

        if !tree.is_touching(Position::at_start(limit), first)
            || !tree.is_touching(Position::at_end(tree, limit), last)
        {
            return false;
        }
        if !schema.check_child_in(tree, limit, PARAGRAPH) {
            return false;
        }
        tree.children(limit)
            .first()
            .is_none_or(|&child| !tree.is_named(child, PARAGRAPH))
    }
}

fn replace_with_paragraph(writer: &mut ModelWriter<'_>) {
    let Some(limit) = writer
        .schema()
        .limit_element(writer.tree(), writer.selection())
    else {
        return;
    };
    let content = Range::inside(writer.tree(), limit);
    writer.remove(content);
    let paragraph = writer.create_element(PARAGRAPH, &[]);
    writer.append(paragraph, limit);
    writer.set_selection(Selection::collapsed_at(Position::at_start(paragraph)));
}

impl Command for DeleteCommand {
    fn accepts(&self, params: &CommandParams) -> bool {
        matches!(params, CommandParams::None | CommandParams::Delete(_))
    }

    fn execute(&mut self, model: &mut Model, params: CommandParams) {
        let params = match params {
            CommandParams::Delete(params) => params,
            CommandParams::None => DeleteParams::default(),
            CommandParams::InsertImage { .. } => return,
        };
        let mut selection = params
            .selection
            .unwrap_or_else(|| model.selection().clone());
        if selection.is_empty() {
            return;
        }

        if selection.is_collapsed()
            && let Some(unit) = params.unit.as_model_unit()
        {
            modify_selection(model.tree(), model.schema(), &mut selection, self.direction, unit);
        }

        if self.should_replace_with_paragraph(model, params.sequence) {
            model.change(replace_with_paragraph);
            return;
        }
        if selection.is_collapsed() {
            return;
        }

        model.change(|writer| delete_content(writer, &selection));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev_utils::{get_model_data, set_model_data, test_model};
    use crate::model::SchemaItem;
    use crate::model::schema::BLOCK_NAME;
    use crate::typing::DeleteUnit;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn run(model: &mut Model, direction: Direction, params: DeleteParams) {
        DeleteCommand::new(direction).execute(model, CommandParams::Delete(params));
    }

    fn unit(unit: DeleteUnit) -> DeleteParams {
        DeleteParams {
            unit,
            ..DeleteParams::default()
        }
    }

    #[rstest]
    #[case::grapheme(
        "<paragraph>fo\u{1F44D}\u{1F3FD}[]</paragraph>",
        DeleteUnit::Character,
        "<paragraph>fo[]</paragraph>"
    )]
    #[case::code_point(
        "<paragraph>e\u{301}[]</paragraph>",
        DeleteUnit::CodePoint,
        "<paragraph>e[]</paragraph>"
    )]
    #[case::word("<paragraph>foo bar[]</paragraph>", DeleteUnit::Word, "<paragraph>foo []</paragraph>")]
    #[case::merges_paragraphs(
        "<paragraph>foo</paragraph><paragraph>[]bar</paragraph>",
        DeleteUnit::Character,
        "<paragraph>foo[]bar</paragraph>"
    )]
    #[case::removes_inline_image(
        "<paragraph>f<imageInline></imageInline>[]oo</paragraph>",
        DeleteUnit::Character,
        "<paragraph>f[]oo</paragraph>"
    )]
    #[case::start_of_document(
        "<paragraph>[]foo</paragraph>",
        DeleteUnit::Character,
        "<paragraph>[]foo</paragraph>"
    )]
    #[case::start_of_caption(
        "<paragraph>foo</paragraph><image><caption>[]bar</caption></image>",
        DeleteUnit::Character,
        "<paragraph>foo</paragraph><image><caption>[]bar</caption></image>"
    )]
    #[case::selection_unit_on_caret(
        "<paragraph>fo[]o</paragraph>",
        DeleteUnit::Selection,
        "<paragraph>fo[]o</paragraph>"
    )]
    #[case::non_collapsed(
        "<paragraph>f[oo</paragraph><paragraph>ba]r</paragraph>",
        DeleteUnit::Character,
        "<paragraph>f[]r</paragraph>"
    )]
    fn test_backspace(#[case] data: &str, #[case] delete_unit: DeleteUnit, #[case] expected: &str) {
        let mut model = test_model(data);
        run(&mut model, Direction::Backward, unit(delete_unit));
        assert_eq!(get_model_data(&model), expected);
    }

    #[rstest]
    #[case::character("<paragraph>[]foo</paragraph>", "<paragraph>[]oo</paragraph>")]
    #[case::merges_paragraphs(
        "<paragraph>foo[]</paragraph><paragraph>bar</paragraph>",
        "<paragraph>foo[]bar</paragraph>"
    )]
    #[case::end_of_document("<paragraph>foo[]</paragraph>", "<paragraph>foo[]</paragraph>")]
    fn test_forward_delete(#[case] data: &str, #[case] expected: &str) {
        let mut model = test_model(data);
        run(&mut model, Direction::Forward, DeleteParams::default());
        assert_eq!(get_model_data(&model), expected);
    }

    #[test]
    fn test_explicit_selection_wins_over_document_selection() {
        let mut model = test_model("<paragraph>foo[]bar</paragraph>");
        let paragraph = model.tree().children(model.tree().root())[0];
        let target = Selection::from_range(
            Range::new(
                model.tree(),
                Position::new(paragraph, 4),
                Position::new(paragraph, 6),
            ),
            false,
        );

        run(
            &mut model,
            Direction::Backward,
            DeleteParams {
                unit: DeleteUnit::Selection,
                sequence: 0,
                selection: Some(target),
            },
        );

        assert_eq!(get_model_data(&model), "<paragraph>foob[]</paragraph>");
    }

    #[test]
    fn test_empty_explicit_selection_changes_nothing() {
        let mut model = test_model("<paragraph>foo[]</paragraph>");
        let version = model.version();

        run(
            &mut model,
            Direction::Backward,
            DeleteParams {
                selection: Some(Selection::default()),
                ..DeleteParams::default()
            },
        );

        assert_eq!(get_model_data(&model), "<paragraph>foo[]</paragraph>");
        assert_eq!(model.version(), version);
    }

    fn with_heading(data: &str) -> Model {
        let mut model = test_model("");
        model
            .schema_mut()
            .register("heading1", SchemaItem::new().inherit_all_from(BLOCK_NAME));
        set_model_data(&mut model, data).expect("valid data");
        model
    }

    #[test]
    fn test_lone_empty_heading_becomes_paragraph() {
        let mut model = with_heading("<heading1>[]</heading1>");
        run(&mut model, Direction::Backward, DeleteParams::default());
        assert_eq!(get_model_data(&model), "<paragraph>[]</paragraph>");
    }

    #[test]
    fn test_only_first_step_replaces_heading() {
        let mut model = with_heading("<heading1>[]</heading1>");
        run(
            &mut model,
            Direction::Backward,
            DeleteParams {
                sequence: 1,
                ..DeleteParams::default()
            },
        );
        assert_eq!(get_model_data(&model), "<heading1>[]</heading1>");
    }

    #[test]
    fn test_forward_delete_keeps_heading() {
        let mut model = with_heading("<heading1>[]</heading1>");
        run(&mut model, Direction::Forward, DeleteParams::default());
        assert_eq!(get_model_data(&model), "<heading1>[]</heading1>");
    }

    #[test]
    fn test_selected_heading_content_becomes_paragraph() {
        let mut model = with_heading("<heading1>[foo]</heading1>");
        run(&mut model, Direction::Backward, DeleteParams::default());
        assert_eq!(get_model_data(&model), "<paragraph>[]</paragraph>");
    }

    #[test]
    fn test_empty_paragraph_stays() {
        let mut model = test_model("<paragraph>[]</paragraph>");
        let version = model.version();

        run(&mut model, Direction::Backward, DeleteParams::default());

        assert_eq!(get_model_data(&model), "<paragraph>[]</paragraph>");
        assert_eq!(model.version(), version);
    }
}
