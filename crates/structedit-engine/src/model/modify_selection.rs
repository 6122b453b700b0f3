//! Moving the selection focus by one unit, the way a delete key sees the
//! document.
//!
//! Inside text the focus moves by a grapheme, a Unicode scalar or a word.
//! Reaching an object (an image, an inline widget) moves past it so the
//! whole object ends up selected. Crossing out of one block and into the
//! next counts as a single step. Limit elements are never left.

use unicode_segmentation::UnicodeSegmentation;

use super::Schema;
use crate::tree::{NodeId, Position, Selection, TEXT_NAME, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// A user-perceived character (extended grapheme cluster).
    Character,
    /// A single Unicode scalar value.
    CodePoint,
    Word,
}

/// Extend the focus of `selection` one `unit` in `direction`.
///
/// The selection is left untouched when the focus cannot move.
pub fn modify_selection(
    tree: &Tree,
    schema: &Schema,
    selection: &mut Selection,
    direction: Direction,
    unit: Unit,
) {
    let Some(focus) = selection.focus() else {
        return;
    };
    let next = match direction {
        Direction::Backward => step_backward(tree, schema, focus, unit),
        Direction::Forward => step_forward(tree, schema, focus, unit),
    };
    if let Some(next) = next {
        selection.extend(tree, next);
    }
}

fn step_backward(tree: &Tree, schema: &Schema, start: Position, unit: Unit) -> Option<Position> {
    let mut position = start;
    loop {
        if position.is_at_start() {
            if schema.is_limit_node(tree, position.parent) {
                return None;
            }
            position = Position::before(tree, position.parent)?;
            if schema.check_child_at(tree, position, TEXT_NAME) {
                return Some(position);
            }
            continue;
        }

        if let Some((text, inner)) = text_before(tree, position) {
            let moved = chars_before(text_data(tree, text), inner, unit);
            return Some(Position::new(position.parent, position.offset - moved));
        }

        let before = tree.node_before(position)?;
        if schema.is_object_node(tree, before) {
            return Position::before(tree, before);
        }
        let inside = Position::at_end(tree, before);
        if schema.check_child_in(tree, before, TEXT_NAME) {
            return Some(inside);
        }
        position = inside;
    }
}

fn step_forward(tree: &Tree, schema: &Schema, start: Position, unit: Unit) -> Option<Position> {
    let mut position = start;
    loop {
        if position.is_at_end(tree) {
            if schema.is_limit_node(tree, position.parent) {
                return None;
            }
            position = Position::after(tree, position.parent)?;
            if schema.check_child_at(tree, position, TEXT_NAME) {
                return Some(position);
            }
            continue;
        }

        if let Some((text, inner)) = text_after(tree, position) {
            let moved = chars_after(text_data(tree, text), inner, unit);
            return Some(Position::new(position.parent, position.offset + moved));
        }

        let after = tree.node_after(position)?;
        if schema.is_object_node(tree, after) {
            return Position::after(tree, after);
        }
        let inside = Position::at_start(after);
        if schema.check_child_in(tree, after, TEXT_NAME) {
            return Some(inside);
        }
        position = inside;
    }
}

fn text_data(tree: &Tree, text: NodeId) -> &str {
    tree.data_of(text).unwrap_or_default()
}

/// Text node ending at or containing `position`, with the char offset inside it.
fn text_before(tree: &Tree, position: Position) -> Option<(NodeId, usize)> {
    tree.text_at(position).or_else(|| {
        tree.node_before(position)
            .filter(|&n| tree.is_text(n))
            .map(|n| (n, tree.offset_size(n)))
    })
}

/// Text node starting at or containing `position`, with the char offset inside it.
fn text_after(tree: &Tree, position: Position) -> Option<(NodeId, usize)> {
    tree.text_at(position).or_else(|| {
        tree.node_after(position)
            .filter(|&n| tree.is_text(n))
            .map(|n| (n, 0))
    })
}

fn byte_offset(data: &str, chars: usize) -> usize {
    data.char_indices()
        .nth(chars)
        .map(|(byte, _)| byte)
        .unwrap_or(data.len())
}

fn is_blank(segment: &str) -> bool {
    segment.chars().all(char::is_whitespace)
}

/// How many chars one `unit` back from char offset `inner` spans.
fn chars_before(data: &str, inner: usize, unit: Unit) -> usize {
    let prefix = &data[..byte_offset(data, inner)];
    match unit {
        Unit::CodePoint => 1,
        Unit::Character => prefix
            .graphemes(true)
            .next_back()
            .map_or(1, |g| g.chars().count()),
        Unit::Word => {
            let mut segments = prefix.split_word_bounds().rev();
            let Some(last) = segments.next() else {
                return 1;
            };
            let mut count = last.chars().count();
            if is_blank(last)
                && let Some(word) = segments.next()
            {
                count += word.chars().count();
            }
            count
        }
    }
}

/// How many chars one `unit` forward from char offset `inner` spans.
fn chars_after(data: &str, inner: usize, unit: Unit) -> usize {
    let suffix = &data[byte_offset(data, inner)..];
    match unit {
        Unit::CodePoint => 1,
        Unit::Character => suffix
            .graphemes(true)
            .next()
            .map_or(1, |g| g.chars().count()),
        Unit::Word => {
            let mut segments = suffix.split_word_bounds();
            let Some(first) = segments.next() else {
                return 1;
            };
            let mut count = first.chars().count();
            if is_blank(first)
                && let Some(word) = segments.next()
            {
                count += word.chars().count();
            }
            count
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev_utils::{get_model_data, test_model};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn modify(data: &str, direction: Direction, unit: Unit) -> String {
        let mut model = test_model(data);
        let mut selection = model.selection().clone();
        modify_selection(model.tree(), model.schema(), &mut selection, direction, unit);
        model.change(|writer| writer.set_selection(selection));
        get_model_data(&model)
    }

    #[rstest]
    #[case::grapheme("<paragraph>fo[]o</paragraph>", Unit::Character, "<paragraph>f[o]o</paragraph>")]
    #[case::combining_mark_as_character(
        "<paragraph>e\u{301}[]</paragraph>",
        Unit::Character,
        "<paragraph>[e\u{301}]</paragraph>"
    )]
    #[case::combining_mark_as_code_point(
        "<paragraph>e\u{301}[]</paragraph>",
        Unit::CodePoint,
        "<paragraph>e[\u{301}]</paragraph>"
    )]
    #[case::word("<paragraph>foo bar[]</paragraph>", Unit::Word, "<paragraph>foo [bar]</paragraph>")]
    #[case::word_after_space("<paragraph>foo bar []</paragraph>", Unit::Word, "<paragraph>foo [bar ]</paragraph>")]
    #[case::into_previous_block(
        "<paragraph>foo</paragraph><paragraph>[]bar</paragraph>",
        Unit::Character,
        "<paragraph>foo[</paragraph><paragraph>]bar</paragraph>"
    )]
    #[case::selects_inline_object(
        "<paragraph>f<imageInline></imageInline>[]oo</paragraph>",
        Unit::Character,
        "<paragraph>f[<imageInline></imageInline>]oo</paragraph>"
    )]
    #[case::selects_block_object(
        "<image></image><paragraph>[]foo</paragraph>",
        Unit::Character,
        "[<image></image><paragraph>]foo</paragraph>"
    )]
    #[case::document_start("<paragraph>[]foo</paragraph>", Unit::Character, "<paragraph>[]foo</paragraph>")]
    #[case::caption_start(
        "<image><caption>[]foo</caption></image>",
        Unit::Character,
        "<image><caption>[]foo</caption></image>"
    )]
    fn test_backward(#[case] data: &str, #[case] unit: Unit, #[case] expected: &str) {
        assert_eq!(modify(data, Direction::Backward, unit), expected);
    }

    #[rstest]
    #[case::grapheme("<paragraph>f[]oo</paragraph>", Unit::Character, "<paragraph>f[o]o</paragraph>")]
    #[case::word("<paragraph>[]foo bar</paragraph>", Unit::Word, "<paragraph>[foo] bar</paragraph>")]
    #[case::word_after_space("<paragraph>foo[] bar</paragraph>", Unit::Word, "<paragraph>foo[ bar]</paragraph>")]
    #[case::into_next_block(
        "<paragraph>foo[]</paragraph><paragraph>bar</paragraph>",
        Unit::Character,
        "<paragraph>foo[</paragraph><paragraph>]bar</paragraph>"
    )]
    #[case::selects_inline_object(
        "<paragraph>f[]<imageInline></imageInline>oo</paragraph>",
        Unit::Character,
        "<paragraph>f[<imageInline></imageInline>]oo</paragraph>"
    )]
    #[case::document_end("<paragraph>foo[]</paragraph>", Unit::Character, "<paragraph>foo[]</paragraph>")]
    fn test_forward(#[case] data: &str, #[case] unit: Unit, #[case] expected: &str) {
        assert_eq!(modify(data, Direction::Forward, unit), expected);
    }

    #[test]
    fn test_emoji_with_modifier_is_one_character() {
        assert_eq!(
            modify("<paragraph>a👍🏽[]</paragraph>", Direction::Backward, Unit::Character),
            "<paragraph>a[👍🏽]</paragraph>"
        );
    }
}
