//! # Image feature
//!
//! Block images (`image`, rendered as a `<figure>`), inline images
//! (`imageInline`, rendered as a `<span>`) and image captions. Both image
//! kinds are widgets in the view.
//!
//! - `utils`: view-side widget helpers and model-side type/placement rules
//! - `insert`: the `insertImage` command

pub mod insert;
pub mod utils;

use log::warn;
use thiserror::Error;

pub use insert::{ImageInsertion, InsertImageCommand};
pub use utils::{
    get_image_widget_ancestor, get_selected_image_widget, get_view_image_from_widget, is_image,
    is_image_inline, is_image_widget, to_image_widget,
};

use crate::model::schema::BLOCK_NAME;
use crate::model::{Schema, SchemaItem};
use crate::tree::TEXT_NAME;

pub const IMAGE: &str = "image";
pub const IMAGE_INLINE: &str = "imageInline";
pub const CAPTION: &str = "caption";

/// Attributes images may carry; the view puts them on the `img`.
pub const IMAGE_ATTRIBUTES: [&str; 3] = ["alt", "src", "srcset"];

pub const IMAGE_WIDGET_LABEL: &str = "image widget";

/// Name the image insertion command is registered under.
pub const INSERT_IMAGE: &str = "insertImage";

/// Which image features an editor was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageFeatures {
    pub block: bool,
    pub inline: bool,
}

impl Default for ImageFeatures {
    fn default() -> Self {
        Self {
            block: true,
            inline: true,
        }
    }
}

/// The configured image type cannot be honoured with the enabled features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImageConfigWarning {
    #[error("image-inline-plugin-required")]
    InlinePluginRequired,

    #[error("image-block-plugin-required")]
    BlockPluginRequired,
}

impl ImageConfigWarning {
    pub(crate) fn log(self) {
        warn!("{self}: falling back to the only enabled image type");
    }
}

pub fn register_block_schema(schema: &mut Schema) {
    schema.register(
        IMAGE,
        SchemaItem::new()
            .allow_where(BLOCK_NAME)
            .block()
            .object()
            .allow_attributes(&IMAGE_ATTRIBUTES),
    );
}

/// Inline images go wherever text goes, except into captions.
pub fn register_inline_schema(schema: &mut Schema) {
    schema.register(
        IMAGE_INLINE,
        SchemaItem::new()
            .allow_where(TEXT_NAME)
            .inline()
            .object()
            .allow_attributes(&IMAGE_ATTRIBUTES),
    );
    schema.add_child_check(|context, child| {
        (child == IMAGE_INLINE && context.last() == Some(&CAPTION)).then_some(false)
    });
}

pub fn register_caption_schema(schema: &mut Schema) {
    schema.register(
        CAPTION,
        SchemaItem::new()
            .allow_in(IMAGE)
            .allow_content_of(BLOCK_NAME)
            .limit(),
    );
}
