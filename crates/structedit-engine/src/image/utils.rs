//! Image helpers: recognising image widgets in the view and deciding where,
//! and as what, a new image goes in the model.

use std::cmp::Ordering;

use structedit_config::ImageInsertType;

use super::{IMAGE, IMAGE_INLINE, ImageConfigWarning, ImageFeatures};
use crate::model::Schema;
use crate::tree::{NodeId, Position, Range, Selection, Tree};
use crate::widget::{WidgetLabel, WidgetRegistry, get_selected_widget, get_widget_ancestor};

const IMAGE_WIDGET_KIND: &str = "image";

/// Mark a `figure`/`span` as an image widget.
///
/// The label is `label`, prefixed with the `alt` text of the inner `img`
/// when it has one.
pub fn to_image_widget(
    widgets: &mut WidgetRegistry,
    tree: &Tree,
    element: NodeId,
    label: &str,
) -> NodeId {
    let label = label.to_string();
    widgets.mark_as_widget_of_kind(
        tree,
        element,
        IMAGE_WIDGET_KIND,
        WidgetLabel::resolver(move |tree, node| {
            match get_view_image_from_widget(tree, node).and_then(|img| tree.attribute(img, "alt")) {
                Some(alt) => format!("{alt} {label}"),
                None => label.clone(),
            }
        }),
    )
}

pub fn is_image_widget(widgets: &WidgetRegistry, node: Option<NodeId>) -> bool {
    widgets.is_widget_of_kind(node, IMAGE_WIDGET_KIND)
}

pub fn get_selected_image_widget(
    tree: &Tree,
    widgets: &WidgetRegistry,
    selection: &Selection,
) -> Option<NodeId> {
    get_selected_widget(tree, widgets, selection).filter(|&w| is_image_widget(widgets, Some(w)))
}

pub fn get_image_widget_ancestor(
    tree: &Tree,
    widgets: &WidgetRegistry,
    selection: &Selection,
) -> Option<NodeId> {
    get_widget_ancestor(tree, widgets, selection).filter(|&w| is_image_widget(widgets, Some(w)))
}

/// The first `img` inside an image widget, in document order.
pub fn get_view_image_from_widget(tree: &Tree, figure: NodeId) -> Option<NodeId> {
    tree.descendants(figure)
        .into_iter()
        .find(|&node| tree.is_named(node, "img"))
}

pub fn is_image(tree: &Tree, node: Option<NodeId>) -> bool {
    node.is_some_and(|node| tree.is_named(node, IMAGE))
}

pub fn is_image_inline(tree: &Tree, node: Option<NodeId>) -> bool {
    node.is_some_and(|node| tree.is_named(node, IMAGE_INLINE))
}

/// Model element name for an image type.
pub fn image_element_name(image_type: ImageInsertType) -> &'static str {
    match image_type {
        ImageInsertType::Block => IMAGE,
        ImageInsertType::Inline => IMAGE_INLINE,
    }
}

/// Pick the image type to insert at `selection`.
///
/// Missing features decide first, then the configured type, then the
/// selection: on an object, in an empty block or outside any block a block
/// image fits best, anywhere else an inline one. A configured type that
/// needs a disabled feature comes back with a warning.
pub fn determine_image_type_for_insertion(
    tree: &Tree,
    schema: &Schema,
    selection: &Selection,
    features: ImageFeatures,
    configured: Option<ImageInsertType>,
) -> (ImageInsertType, Option<ImageConfigWarning>) {
    if !features.block {
        let warning = (configured == Some(ImageInsertType::Block))
            .then_some(ImageConfigWarning::BlockPluginRequired);
        return (ImageInsertType::Inline, warning);
    }
    if !features.inline {
        let warning = (configured == Some(ImageInsertType::Inline))
            .then_some(ImageConfigWarning::InlinePluginRequired);
        return (ImageInsertType::Block, warning);
    }
    if let Some(image_type) = configured {
        return (image_type, None);
    }

    let image_type = match first_selected_block(tree, schema, selection) {
        None => ImageInsertType::Block,
        Some(block) if schema.is_object_node(tree, block) || tree.is_empty(block) => {
            ImageInsertType::Block
        }
        Some(_) => ImageInsertType::Inline,
    };
    (image_type, None)
}

/// Where a block element should go for the given selection.
///
/// A selected block object is replaced, an empty block is replaced, a caret
/// at the end of a block goes after it, and anything else goes before the
/// block.
pub fn find_optimal_insertion_range(
    tree: &Tree,
    schema: &Schema,
    selection: &Selection,
) -> Option<Range> {
    let focus = selection.focus()?;
    if let Some(element) = selection.selected_element(tree)
        && schema.is_object_node(tree, element)
        && !schema.is_inline_node(tree, element)
    {
        return Range::on(tree, element);
    }

    let Some(block) = first_selected_block(tree, schema, selection) else {
        return Some(Range::collapsed(focus));
    };
    if tree.is_empty(block) {
        return Range::on(tree, block);
    }
    let after = Position::after(tree, block)?;
    if tree.is_touching(focus, after) {
        return Some(Range::collapsed(after));
    }
    Position::before(tree, block).map(Range::collapsed)
}

/// The first block the selection touches.
///
/// That is the selected block element, else the block containing the
/// selection start (without leaving a limit), else the first block inside
/// the selected range.
pub fn first_selected_block(tree: &Tree, schema: &Schema, selection: &Selection) -> Option<NodeId> {
    let range = selection.first_range()?;
    if let Some(element) = selection
        .selected_element(tree)
        .filter(|&element| schema.is_block_node(tree, element))
    {
        return Some(element);
    }
    if let Some(block) = parent_block(tree, schema, range.start.parent) {
        return Some(block);
    }
    if range.is_collapsed() {
        return None;
    }

    let container = range.common_ancestor(tree)?;
    tree.descendants(container).into_iter().find(|&node| {
        schema.is_block_node(tree, node)
            && Position::before(tree, node)
                .and_then(|before| tree.compare(before, range.start))
                .is_some_and(|order| order != Ordering::Less)
            && Position::after(tree, node)
                .and_then(|after| tree.compare(after, range.end))
                .is_some_and(|order| order != Ordering::Greater)
    })
}

fn parent_block(tree: &Tree, schema: &Schema, node: NodeId) -> Option<NodeId> {
    for ancestor in tree.ancestors_inclusive(node) {
        if schema.is_limit_node(tree, ancestor) {
            return None;
        }
        if schema.is_block_node(tree, ancestor) {
            return Some(ancestor);
        }
    }
    None
}

/// Whether an image of the type [`determine_image_type_for_insertion`] picks
/// can go at `selection`, and the selection is not inside another image.
pub fn is_image_allowed(
    tree: &Tree,
    schema: &Schema,
    selection: &Selection,
    features: ImageFeatures,
    configured: Option<ImageInsertType>,
) -> bool {
    let Some(focus) = selection.focus() else {
        return false;
    };
    let (image_type, _) =
        determine_image_type_for_insertion(tree, schema, selection, features, configured);

    let allowed_in_parent = match image_type {
        ImageInsertType::Block => insert_image_parent(tree, schema, selection)
            .is_some_and(|parent| schema.check_child_in(tree, parent, IMAGE)),
        ImageInsertType::Inline => schema.check_child_at(tree, focus, IMAGE_INLINE),
    };
    let inside_image = tree
        .ancestors_inclusive(focus.parent)
        .any(|ancestor| tree.is_named(ancestor, IMAGE));

    allowed_in_parent && !inside_image
}

/// The element a block image inserted at `selection` would end up in.
fn insert_image_parent(tree: &Tree, schema: &Schema, selection: &Selection) -> Option<NodeId> {
    let range = find_optimal_insertion_range(tree, schema, selection)?;
    let parent = range.start.parent;
    if tree.is_empty(parent) && parent != tree.root() {
        return tree.parent(parent);
    }
    Some(parent)
}
