//! Widget queries against rendered views.

use pretty_assertions::assert_eq;
use rstest::rstest;
use structedit_engine::image::{get_image_widget_ancestor, get_selected_image_widget, to_image_widget};
use structedit_engine::widget::{get_selected_widget, get_widget_ancestor};
use structedit_engine::{Editor, NodeId, Position, Range, Selection, Tree, WidgetLabel, WidgetRegistry};
use structedit_engine::tree::Writer;

fn editor(data: &str) -> Editor {
    let mut editor = Editor::builder()
        .with_image_block()
        .with_image_inline()
        .build();
    editor.set_data(data).unwrap();
    editor
}

/// The first child of the view root.
fn first_view_element(editor: &Editor) -> NodeId {
    let tree = editor.view().tree();
    tree.children(tree.root())[0]
}

#[test]
fn test_marked_nodes_are_widgets_with_stable_labels() {
    let mut tree = Tree::new();
    let mut selection = Selection::default();
    let (div, span) = {
        let mut writer = Writer::new(&mut tree, &mut selection);
        (
            writer.create_element("div", &[]),
            writer.create_element("span", &[("title", "x")]),
        )
    };
    let mut widgets = WidgetRegistry::new();

    let marked = widgets.mark_as_widget(&tree, div, "plain".into());
    widgets.mark_as_widget(
        &tree,
        span,
        WidgetLabel::resolver(|tree, node| format!("titled {}", tree.attribute(node, "title").unwrap_or(""))),
    );

    assert_eq!(marked, div);
    for node in [div, span] {
        assert!(widgets.is_widget(Some(node)));
        assert_eq!(widgets.get_label(&tree, node), widgets.get_label(&tree, node));
    }
    assert_eq!(widgets.get_label(&tree, div), "plain");
    assert_eq!(widgets.get_label(&tree, span), "titled x");
    assert!(!widgets.is_widget(None));
}

#[test]
#[should_panic(expected = "widgets must be elements")]
fn test_marking_text_is_a_programming_error() {
    let mut tree = Tree::new();
    let mut selection = Selection::default();
    let text = Writer::new(&mut tree, &mut selection).create_text("foo");

    WidgetRegistry::new().mark_as_widget(&tree, text, "text".into());
}

#[test]
fn test_image_label_picks_up_alt_text() {
    let mut tree = Tree::new();
    let mut selection = Selection::default();
    let mut writer = Writer::new(&mut tree, &mut selection);
    let figure = writer.create_element("figure", &[]);
    let img = writer.create_element("img", &[]);
    writer.append(img, figure);
    drop(writer);
    let mut widgets = WidgetRegistry::new();
    to_image_widget(&mut widgets, &tree, figure, "image widget");

    assert_eq!(widgets.get_label(&tree, figure), "image widget");

    Writer::new(&mut tree, &mut selection).set_attribute("alt", "foo bar baz", img);

    assert_eq!(widgets.get_label(&tree, figure), "foo bar baz image widget");
}

#[test]
fn test_rendered_images_are_labelled_from_alt() {
    let editor = editor(r#"<image alt="a dog"></image><paragraph>foo</paragraph>"#);
    let figure = first_view_element(&editor);

    assert_eq!(
        editor.view().widgets().get_label(editor.view().tree(), figure),
        "a dog image widget"
    );
}

#[test]
fn test_selection_on_image_selects_the_widget() {
    let editor = editor("[<image></image>]<paragraph>foo</paragraph>");
    let view = editor.view();
    let figure = first_view_element(&editor);

    assert_eq!(get_selected_widget(view.tree(), view.widgets(), view.selection()), Some(figure));
    assert_eq!(get_selected_image_widget(view.tree(), view.widgets(), view.selection()), Some(figure));
    assert_eq!(get_widget_ancestor(view.tree(), view.widgets(), view.selection()), None);
}

#[rstest]
#[case::widget_and_sibling("[<image></image><paragraph>f]oo</paragraph>")]
#[case::plain_element("<paragraph>foo</paragraph>[<paragraph></paragraph>]")]
#[case::caret_in_text("<paragraph>f[]oo</paragraph>")]
fn test_no_selected_widget(#[case] data: &str) {
    let editor = editor(data);
    let view = editor.view();

    assert_eq!(get_selected_widget(view.tree(), view.widgets(), view.selection()), None);
}

#[rstest]
#[case::caret("<image><caption>f[]oo</caption></image>")]
#[case::range("<image><caption>[fo]o</caption></image>")]
#[case::whole_caption("<image><caption>[foo]</caption></image>")]
fn test_caption_selection_has_image_ancestor(#[case] data: &str) {
    let editor = editor(data);
    let view = editor.view();
    let figure = first_view_element(&editor);

    assert_eq!(get_widget_ancestor(view.tree(), view.widgets(), view.selection()), Some(figure));
    assert_eq!(get_image_widget_ancestor(view.tree(), view.widgets(), view.selection()), Some(figure));
    assert_eq!(get_selected_widget(view.tree(), view.widgets(), view.selection()), None);
}

#[rstest]
#[case::outside_any_widget("<paragraph>f[o]o</paragraph>")]
#[case::widget_and_sibling("<image><caption>f[oo</caption></image><paragraph>ba]r</paragraph>")]
fn test_no_widget_ancestor(#[case] data: &str) {
    let editor = editor(data);
    let view = editor.view();

    assert_eq!(get_widget_ancestor(view.tree(), view.widgets(), view.selection()), None);
}

#[test]
fn test_hand_built_selection_inside_caption() {
    let editor = editor("<image><caption>foo</caption></image>");
    let tree = editor.view().tree();
    let figure = first_view_element(&editor);
    let figcaption = tree.children(figure)[1];
    let selection = Selection::from_range(
        Range::new(tree, Position::new(figcaption, 1), Position::new(figcaption, 2)),
        true,
    );

    assert_eq!(
        get_widget_ancestor(tree, editor.view().widgets(), &selection),
        Some(figure)
    );
}
