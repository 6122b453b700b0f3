//! Inserting images into the model.

use structedit_config::ImageInsertType;

use super::ImageFeatures;
use super::utils::{
    determine_image_type_for_insertion, find_optimal_insertion_range, image_element_name,
    is_image_allowed,
};
use crate::commands::{Command, CommandParams};
use crate::model::{Model, insert_content};

/// The image settings an editor was built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageInsertion {
    pub features: ImageFeatures,
    pub configured: Option<ImageInsertType>,
}

impl ImageInsertion {
    /// The type an image inserted now would get. Configuration conflicts are
    /// logged.
    pub fn image_type(&self, model: &Model) -> ImageInsertType {
        let (image_type, warning) = determine_image_type_for_insertion(
            model.tree(),
            model.schema(),
            model.selection(),
            self.features,
            self.configured,
        );
        if let Some(warning) = warning {
            warning.log();
        }
        image_type
    }

    pub fn is_allowed(&self, model: &Model) -> bool {
        is_image_allowed(
            model.tree(),
            model.schema(),
            model.selection(),
            self.features,
            self.configured,
        )
    }

    /// Insert an image with `attributes` and select it.
    ///
    /// Block images go to the optimal insertion range, inline images replace
    /// the selection. Returns `false`, leaving the document alone, when the
    /// schema has no room for the image there.
    pub fn insert(&self, model: &mut Model, attributes: &[(&str, &str)]) -> bool {
        let image_type = self.image_type(model);
        model.change(|writer| {
            let range = match image_type {
                ImageInsertType::Block => {
                    find_optimal_insertion_range(writer.tree(), writer.schema(), writer.selection())
                }
                ImageInsertType::Inline => writer.selection().first_range(),
            };
            let Some(range) = range else {
                return false;
            };
            let image = writer.create_element(image_element_name(image_type), attributes);
            insert_content(writer, image, range)
        })
    }
}

/// `insertImage`: enabled wherever an image is allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertImageCommand {
    insertion: ImageInsertion,
}

impl InsertImageCommand {
    pub fn new(insertion: ImageInsertion) -> Self {
        Self { insertion }
    }
}

impl Command for InsertImageCommand {
    fn is_enabled(&self, model: &Model) -> bool {
        self.insertion.is_allowed(model)
    }

    fn accepts(&self, params: &CommandParams) -> bool {
        matches!(params, CommandParams::None | CommandParams::InsertImage { .. })
    }

    fn execute(&mut self, model: &mut Model, params: CommandParams) {
        let attributes = match params {
            CommandParams::InsertImage { attributes } => attributes,
            CommandParams::None => Vec::new(),
            CommandParams::Delete(_) => return,
        };
        let attributes: Vec<(&str, &str)> = attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        self.insertion.insert(model, &attributes);
    }
}
