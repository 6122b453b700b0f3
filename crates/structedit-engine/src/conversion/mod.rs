//! # Conversion
//!
//! Model to view. The [`Downcaster`] rebuilds the whole view tree from the
//! model, binds elements in the [`Mapper`] and marks widgets on the way.
//! The view selection and the DOM selection follow.

pub mod mapper;

pub use mapper::Mapper;

use crate::image;
use crate::model::Model;
use crate::paragraph::PARAGRAPH;
use crate::tree::{NodeId, NodeKind, Position, Selection, Tree, Writer};
use crate::view::{DomConverter, View};

/// Renders a model into a view.
#[derive(Debug, Clone, Copy, Default)]
pub struct Downcaster;

impl Downcaster {
    /// Replace the view content with a fresh rendering of `model`.
    pub fn render(
        &self,
        model: &Model,
        view: &mut View,
        mapper: &mut Mapper,
        dom_converter: &dyn DomConverter,
    ) {
        view.tree = Tree::with_generation(view.tree.generation() + 1);
        view.widgets.clear();
        mapper.clear();

        let model_tree = model.tree();
        let view_root = view.tree.root();
        mapper.bind(model_tree.root(), view_root);

        let mut scratch = Selection::default();
        let mut writer = Writer::new(&mut view.tree, &mut scratch);
        let mut widgets = Vec::new();
        for &child in model_tree.children(model_tree.root()) {
            let node = self.convert(model_tree, child, &mut writer, mapper, &mut widgets);
            writer.append(node, view_root);
        }
        for element in widgets {
            image::to_image_widget(&mut view.widgets, &view.tree, element, image::IMAGE_WIDGET_LABEL);
        }

        view.selection = mapper.to_view_selection(&view.tree, model.selection());
        sync_dom_selection(view, dom_converter);
    }

    fn convert(
        &self,
        model: &Tree,
        node: NodeId,
        writer: &mut Writer<'_>,
        mapper: &mut Mapper,
        widgets: &mut Vec<NodeId>,
    ) -> NodeId {
        let (name, attributes) = match model.kind(node) {
            NodeKind::Text(data) => return writer.create_text(data),
            NodeKind::Element { name, attributes } => (name.as_str(), attributes),
        };

        let element = match name {
            image::IMAGE | image::IMAGE_INLINE => {
                let (wrapper, class) = if name == image::IMAGE {
                    ("figure", "image")
                } else {
                    ("span", "image-inline")
                };
                let element = writer.create_element(wrapper, &[("class", class)]);
                let img_attributes: Vec<(&str, &str)> = attributes
                    .iter()
                    .filter(|(key, _)| image::IMAGE_ATTRIBUTES.contains(&key.as_str()))
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect();
                let img = writer.create_element("img", &img_attributes);
                writer.append(img, element);
                widgets.push(element);
                element
            }
            _ => {
                let attributes: Vec<(&str, &str)> = attributes
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect();
                writer.create_element(view_name(name), &attributes)
            }
        };
        mapper.bind(node, element);

        for &child in model.children(node) {
            let converted = self.convert(model, child, writer, mapper, widgets);
            writer.append(converted, element);
        }
        element
    }
}

fn view_name(model_name: &str) -> &str {
    match model_name {
        PARAGRAPH => "p",
        image::CAPTION => "figcaption",
        other => other,
    }
}

/// Point the DOM selection at the view selection.
pub(crate) fn sync_dom_selection(view: &mut View, dom_converter: &dyn DomConverter) {
    let (Some(anchor), Some(focus)) = (view.selection.anchor(), view.selection.focus()) else {
        view.dom_selection.remove_all_ranges();
        return;
    };
    let to_dom = |position: Position| dom_converter.view_position_to_dom(&view.tree, position);
    match (to_dom(anchor), to_dom(focus)) {
        (Some(anchor), Some(focus)) => {
            view.dom_selection.collapse(anchor);
            view.dom_selection.extend(focus);
        }
        _ => view.dom_selection.remove_all_ranges(),
    }
}
