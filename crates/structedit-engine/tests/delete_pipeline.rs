//! Raw input through the whole delete pipeline: observer, dispatcher,
//! command and the selection restorer.

use std::cell::RefCell;
use std::rc::Rc;

use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;
use structedit_engine::view::DomPoint;
use structedit_engine::{
    BeforeInput, DeleteIntent, DomRange, DomTarget, Editor, Key, KeyInput, Modifiers,
    PlatformCapabilities, Priority, RawInput, SchemaItem, ViewEvent,
};

fn editor(platform: PlatformCapabilities, data: &str) -> Editor {
    let mut editor = Editor::builder()
        .with_platform(platform)
        .with_image_block()
        .with_image_inline()
        .with_schema(|schema| schema.register("heading1", SchemaItem::new().inherit_all_from("$block")))
        .build();
    editor.set_data(data).unwrap();
    editor
}

fn key_down(key: Key) -> RawInput {
    RawInput::KeyDown(KeyInput::new(key))
}

fn key_up(key: Key) -> RawInput {
    RawInput::KeyUp(KeyInput::new(key))
}

fn delete_content_backward(target_ranges: Vec<DomRange>) -> RawInput {
    RawInput::BeforeInput(BeforeInput {
        input_type: "deleteContentBackward".to_string(),
        target_ranges,
        dom_target: DomTarget(7),
    })
}

/// Record every intent reaching the `delete` event.
fn record_intents(editor: &mut Editor) -> Rc<RefCell<Vec<DeleteIntent>>> {
    let intents = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&intents);
    editor
        .events_mut()
        .on("delete", Priority::Highest, move |_, _, event| {
            if let ViewEvent::Delete(data) = event {
                sink.borrow_mut().push(data.data.clone());
            }
        });
    intents
}

/// The first text node of the `index`-th top-level view element.
fn view_text(editor: &Editor, index: usize) -> DomPoint {
    let tree = editor.view().tree();
    let element = tree.children(tree.root())[index];
    let text = tree.children(element)[0];
    DomPoint::new(tree, text, 0)
}

fn first_view_text(editor: &Editor) -> DomPoint {
    view_text(editor, 0)
}

fn at(point: DomPoint, offset: usize) -> DomPoint {
    DomPoint { offset, ..point }
}

#[test]
fn test_backspace_deletes_one_character() {
    let mut editor = editor(PlatformCapabilities::desktop(), "<paragraph>foo[]</paragraph>");

    let outcome = editor.handle(key_down(Key::Backspace));

    assert!(outcome.prevented);
    assert_snapshot!(editor.data(), @"<paragraph>fo[]</paragraph>");
    assert_snapshot!(editor.view_data(), @"<p>fo[]</p>");
    assert_eq!(editor.view().scroll_requests(), 1);
}

#[test]
fn test_held_key_counts_up_and_release_starts_over() {
    let mut editor = editor(PlatformCapabilities::desktop(), "<paragraph>abcdef[]</paragraph>");
    let intents = record_intents(&mut editor);

    for _ in 0..3 {
        editor.handle(key_down(Key::Backspace));
    }
    editor.handle(key_up(Key::Backspace));
    editor.handle(key_down(Key::Backspace));

    let sequences: Vec<u32> = intents.borrow().iter().map(|intent| intent.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2, 0]);
    assert_snapshot!(editor.data(), @"<paragraph>ab[]</paragraph>");
}

#[test]
fn test_key_release_alone_emits_nothing() {
    let mut editor = editor(PlatformCapabilities::desktop(), "<paragraph>foo[]</paragraph>");
    let intents = record_intents(&mut editor);

    let outcome = editor.handle(key_up(Key::Backspace));

    assert!(!outcome.prevented);
    assert!(intents.borrow().is_empty());
    assert!(!editor.typing().observer().is_gesture_active());
}

#[rstest]
#[case::backspace(Key::Backspace, Modifiers::default(), "<paragraph>foo bar[]</paragraph>", "<paragraph>foo ba[]</paragraph>")]
#[case::delete(Key::Delete, Modifiers::default(), "<paragraph>[]foo bar</paragraph>", "<paragraph>[]oo bar</paragraph>")]
#[case::ctrl_backspace(
    Key::Backspace,
    Modifiers { ctrl: true, ..Modifiers::default() },
    "<paragraph>foo bar[]</paragraph>",
    "<paragraph>foo []</paragraph>"
)]
#[case::ctrl_delete(
    Key::Delete,
    Modifiers { ctrl: true, ..Modifiers::default() },
    "<paragraph>[]foo bar</paragraph>",
    "<paragraph>[] bar</paragraph>"
)]
#[case::alt_is_not_a_word_modifier_here(
    Key::Backspace,
    Modifiers { alt: true, ..Modifiers::default() },
    "<paragraph>foo bar[]</paragraph>",
    "<paragraph>foo ba[]</paragraph>"
)]
fn test_desktop_keys(#[case] key: Key, #[case] modifiers: Modifiers, #[case] data: &str, #[case] expected: &str) {
    let mut editor = editor(PlatformCapabilities::desktop(), data);

    editor.handle(RawInput::KeyDown(KeyInput::new(key).with_modifiers(modifiers)));

    assert_eq!(editor.data(), expected);
}

#[test]
fn test_mac_deletes_words_with_alt() {
    let mut editor = editor(PlatformCapabilities::mac(), "<paragraph>foo bar[]</paragraph>");
    let alt = Modifiers {
        alt: true,
        ..Modifiers::default()
    };

    editor.handle(RawInput::KeyDown(KeyInput::new(Key::Backspace).with_modifiers(alt)));

    assert_snapshot!(editor.data(), @"<paragraph>foo []</paragraph>");
}

#[test]
fn test_backspace_peels_combining_marks() {
    let mut editor = editor(PlatformCapabilities::desktop(), "<paragraph>e\u{301}[]</paragraph>");

    editor.handle(key_down(Key::Backspace));

    assert_eq!(editor.data(), "<paragraph>e[]</paragraph>");
}

#[rstest]
#[case::merges_paragraphs(
    "<paragraph>foo</paragraph><paragraph>[]bar</paragraph>",
    "<paragraph>foo[]bar</paragraph>"
)]
#[case::removes_inline_image(
    "<paragraph>f<imageInline></imageInline>[]oo</paragraph>",
    "<paragraph>f[]oo</paragraph>"
)]
#[case::removes_selected_block_image(
    "<paragraph>foo</paragraph>[<image></image>]",
    "<paragraph>foo[]</paragraph>"
)]
#[case::start_of_document("<paragraph>[]foo</paragraph>", "<paragraph>[]foo</paragraph>")]
#[case::start_of_caption(
    "<image><caption>[]foo</caption></image>",
    "<image><caption>[]foo</caption></image>"
)]
#[case::lone_empty_heading("<heading1>[]</heading1>", "<paragraph>[]</paragraph>")]
fn test_backspace_in_structure(#[case] data: &str, #[case] expected: &str) {
    let mut editor = editor(PlatformCapabilities::desktop(), data);

    editor.handle(key_down(Key::Backspace));

    assert_eq!(editor.data(), expected);
}

#[test]
fn test_heading_is_kept_after_the_first_step() {
    let mut editor = editor(PlatformCapabilities::desktop(), "<heading1>a[]</heading1>");

    editor.handle(key_down(Key::Backspace));
    editor.handle(key_down(Key::Backspace));

    assert_snapshot!(editor.data(), @"<heading1>[]</heading1>");
}

#[test]
fn test_no_op_delete_is_still_claimed() {
    let mut editor = editor(PlatformCapabilities::desktop(), "<paragraph>[]foo</paragraph>");
    let version = editor.model().version();

    let outcome = editor.handle(key_down(Key::Backspace));

    assert!(outcome.prevented);
    assert_eq!(editor.model().version(), version);
}

#[test]
fn test_before_input_is_ignored_on_desktop() {
    let mut editor = editor(PlatformCapabilities::desktop(), "<paragraph>foo[]</paragraph>");
    let intents = record_intents(&mut editor);

    let outcome = editor.handle(delete_content_backward(Vec::new()));

    assert!(!outcome.prevented);
    assert!(intents.borrow().is_empty());
    assert_eq!(editor.data(), "<paragraph>foo[]</paragraph>");
}

#[test]
fn test_before_input_without_target_deletes_a_code_point() {
    let mut editor = editor(PlatformCapabilities::android(), "<paragraph>foo[]</paragraph>");
    let intents = record_intents(&mut editor);

    let outcome = editor.handle(delete_content_backward(Vec::new()));

    assert!(outcome.prevented);
    assert_snapshot!(editor.data(), @"<paragraph>fo[]</paragraph>");
    let intent = &intents.borrow()[0];
    assert_eq!(intent.selection_to_remove, None);
    assert_eq!(intent.dom_target, DomTarget(7));
}

#[test]
fn test_before_input_target_ranges_are_removed() {
    let mut editor = editor(PlatformCapabilities::android(), "<paragraph>foo bar[]</paragraph>");
    let text = first_view_text(&editor);

    editor.handle(delete_content_backward(vec![DomRange {
        start: at(text, 4),
        end: at(text, 7),
    }]));

    assert_snapshot!(editor.data(), @"<paragraph>foo []</paragraph>");
}

#[test]
fn test_before_input_uses_a_wide_dom_selection() {
    let mut editor = editor(PlatformCapabilities::android(), "<paragraph>foo bar[]</paragraph>");
    let text = first_view_text(&editor);
    let dom_selection = editor.view_mut().dom_selection_mut();
    dom_selection.collapse(at(text, 0));
    dom_selection.extend(at(text, 3));

    editor.handle(delete_content_backward(Vec::new()));

    assert_snapshot!(editor.data(), @"<paragraph>[] bar</paragraph>");
}

#[test]
fn test_unconvertible_target_ranges_fall_back_to_the_live_selection() {
    let mut editor = editor(PlatformCapabilities::android(), "<paragraph>foo[]</paragraph>");
    let text = first_view_text(&editor);
    let intents = record_intents(&mut editor);

    editor.handle(delete_content_backward(vec![DomRange {
        start: at(text, 1),
        end: at(text, 40),
    }]));

    assert_eq!(intents.borrow()[0].selection_to_remove, None);
    assert_snapshot!(editor.data(), @"<paragraph>fo[]</paragraph>");
}

#[test]
fn test_target_inside_caption_stays_inside_caption() {
    let mut editor = editor(
        PlatformCapabilities::android(),
        "<paragraph>x</paragraph><image><caption>foo</caption></image>",
    );
    let tree = editor.view().tree();
    let figure = tree.children(tree.root())[1];
    let figcaption = tree.children(figure)[1];
    let text = DomPoint::new(tree, tree.children(figcaption)[0], 0);

    editor.handle(delete_content_backward(vec![DomRange {
        start: at(text, 0),
        end: at(text, 3),
    }]));

    assert_snapshot!(
        editor.data(),
        @"<paragraph>x</paragraph><image><caption>[]</caption></image>"
    );
}

#[test]
fn test_android_restores_the_dom_selection_on_key_release() {
    let mut editor = editor(PlatformCapabilities::android(), "<paragraph>foo[]</paragraph>");

    editor.handle(delete_content_backward(Vec::new()));
    let after_delete = *editor.view().dom_selection();
    let text = first_view_text(&editor);
    editor.view_mut().dom_selection_mut().collapse(at(text, 0));
    editor.handle(key_up(Key::Backspace));

    assert_eq!(after_delete.focus(), Some(at(text, 2)));
    assert_eq!(*editor.view().dom_selection(), after_delete);
    assert_eq!(editor.typing().restorer().snapshot(), None);
}

#[test]
fn test_android_key_release_without_delete_changes_nothing() {
    let mut editor = editor(PlatformCapabilities::android(), "<paragraph>foo[]</paragraph>");
    let text = first_view_text(&editor);
    editor.view_mut().dom_selection_mut().collapse(at(text, 1));

    editor.handle(key_up(Key::Backspace));

    assert_eq!(editor.view().dom_selection().anchor(), Some(at(text, 1)));
    assert_eq!(editor.view().dom_selection().focus(), Some(at(text, 1)));
}

#[test]
fn test_desktop_leaves_the_moved_dom_selection_alone() {
    let mut editor = editor(PlatformCapabilities::desktop(), "<paragraph>foo[]</paragraph>");

    editor.handle(key_down(Key::Backspace));
    let text = first_view_text(&editor);
    editor.view_mut().dom_selection_mut().collapse(at(text, 0));
    editor.handle(key_up(Key::Backspace));

    assert_eq!(editor.view().dom_selection().focus(), Some(at(text, 0)));
}

#[test]
fn test_target_range_from_before_a_re_render_is_ignored() {
    let mut editor = editor(
        PlatformCapabilities::android(),
        "<paragraph>a</paragraph><paragraph>b</paragraph><paragraph>[]c</paragraph>",
    );
    let stale = view_text(&editor, 2);
    for _ in 0..3 {
        editor.handle(key_down(Key::Backspace));
    }
    assert_snapshot!(editor.view_data(), @"<p>a[]c</p>");
    let intents = record_intents(&mut editor);

    let outcome = editor.handle(delete_content_backward(vec![DomRange {
        start: stale,
        end: at(stale, 1),
    }]));

    assert!(outcome.prevented);
    assert_eq!(intents.borrow()[0].selection_to_remove, None);
    assert_snapshot!(editor.data(), @"<paragraph>[]c</paragraph>");
}

#[test]
fn test_stale_target_range_does_not_alias_a_new_node() {
    let mut editor = editor(
        PlatformCapabilities::android(),
        "<paragraph>foo</paragraph><paragraph>bar[]</paragraph>",
    );
    let stale = view_text(&editor, 1);
    editor
        .set_data("<paragraph>xyz[]</paragraph><paragraph>uvw</paragraph>")
        .unwrap();
    let intents = record_intents(&mut editor);

    editor.handle(delete_content_backward(vec![DomRange {
        start: stale,
        end: at(stale, 3),
    }]));

    assert_eq!(intents.borrow()[0].selection_to_remove, None);
    assert_snapshot!(
        editor.data(),
        @"<paragraph>xy[]</paragraph><paragraph>uvw</paragraph>"
    );
}

#[test]
fn test_android_snapshot_from_before_a_re_render_is_dropped() {
    let mut editor = editor(
        PlatformCapabilities::android(),
        "<paragraph>foo</paragraph><paragraph>bar[]</paragraph>",
    );
    editor.handle(key_down(Key::Backspace));
    assert!(editor.typing().restorer().snapshot().is_some());

    editor.set_data("<paragraph>x[]</paragraph>").unwrap();
    let live = *editor.view().dom_selection();
    editor.handle(key_up(Key::Backspace));

    assert_eq!(*editor.view().dom_selection(), live);
    assert_eq!(editor.typing().restorer().snapshot(), None);

    let intents = record_intents(&mut editor);
    editor.handle(delete_content_backward(Vec::new()));

    assert_eq!(intents.borrow()[0].selection_to_remove, None);
    assert_snapshot!(editor.data(), @"<paragraph>[]</paragraph>");
}
