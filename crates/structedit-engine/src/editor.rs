use std::fmt;

use structedit_config::Config;

use crate::commands::{CommandError, CommandExecutor, CommandParams, Commands};
use crate::conversion::{Downcaster, Mapper};
use crate::dev_utils::{self, DataError};
use crate::events::{EventInfo, EventRegistry, dispatch};
use crate::image::{self, ImageFeatures, ImageInsertion, InsertImageCommand};
use crate::model::{Direction, Model, ModelWriter, Schema, document_start};
use crate::paragraph;
use crate::platform::PlatformCapabilities;
use crate::tree::Selection;
use crate::typing::{self, DeleteCommand, TypingState};
use crate::view::{DomConverter, InputOutcome, MirrorDomConverter, RawInput, View, ViewEvent};

type SchemaHook = Box<dyn FnOnce(&mut Schema)>;

/// The editing engine, wired up
///
/// ## Model
/// - **Source of truth**: a [`Model`] holding the tree, the document
///   selection and the schema
/// - **Commands**: `delete`, `forwardDelete` and, with images enabled,
///   `insertImage`, all run through [`Editor::execute`]
///
/// ## View
/// - **Rendering**: the [`View`] is rebuilt from the model after every
///   change, image elements becoming widgets on the way
/// - **Mapping**: the [`Mapper`] relates view and model positions
/// - **DOM selection**: kept in step with the view selection on render
///
/// ## Input
/// - **Single entry point**: platform input goes through [`Editor::handle`]
/// - **Delete pipeline**: key presses and `beforeinput` events become
///   `delete` view events, then delete commands
/// - **Platform quirks**: switched on by the injected
///   [`PlatformCapabilities`], never by sniffing the runtime
///
/// ```rust
/// # use structedit_engine::{Editor, Key, KeyInput, RawInput};
/// let mut editor = Editor::builder().build();
/// editor.set_data("<paragraph>foo[]</paragraph>").unwrap();
///
/// let outcome = editor.handle(RawInput::KeyDown(KeyInput::new(Key::Backspace)));
///
/// assert!(outcome.prevented);
/// assert_eq!(editor.data(), "<paragraph>fo[]</paragraph>");
/// ```
pub struct Editor {
    pub(crate) model: Model,
    pub(crate) view: View,
    pub(crate) mapper: Mapper,
    pub(crate) commands: Commands,
    pub(crate) events: EventRegistry<Editor, ViewEvent>,
    pub(crate) platform: PlatformCapabilities,
    pub(crate) dom_converter: Box<dyn DomConverter>,
    pub(crate) typing: TypingState,
    pub(crate) image_insertion: Option<ImageInsertion>,
    pub(crate) config: Config,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("data", &self.data())
            .field("version", &self.model.version())
            .field("commands", &self.commands)
            .field("events", &self.events)
            .field("platform", &self.platform)
            .field("typing", &self.typing)
            .finish_non_exhaustive()
    }
}

impl Editor {
    pub fn builder() -> EditorBuilder {
        EditorBuilder::default()
    }

    /// Feed one raw platform input through the view document events.
    pub fn handle(&mut self, input: RawInput) -> InputOutcome {
        let mut event = ViewEvent::from(input);
        self.fire(&mut event);
        InputOutcome {
            prevented: event.is_default_prevented(),
        }
    }

    /// Fire `event` on the view document. Listeners added while the event
    /// runs wait for the next one.
    pub fn fire(&mut self, event: &mut ViewEvent) -> EventInfo {
        let name = event.name();
        let listeners = self.events.listeners(name);
        dispatch(self, name, listeners, event)
    }

    /// Run a command and re-render if it changed the model.
    pub fn execute(&mut self, name: &str, params: CommandParams) -> Result<(), CommandError> {
        let version = self.model.version();
        let result = self.commands.execute(&mut self.model, name, params);
        if self.model.version() != version {
            self.render();
        }
        result
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.commands.is_enabled(&self.model, name)
    }

    /// Change the model directly, then re-render.
    pub fn change<R>(&mut self, f: impl FnOnce(&mut ModelWriter<'_>) -> R) -> R {
        let result = self.model.change(f);
        self.render();
        result
    }

    /// Replace the document with `data` in data notation.
    pub fn set_data(&mut self, data: &str) -> Result<(), DataError> {
        dev_utils::set_model_data(&mut self.model, data)?;
        self.render();
        Ok(())
    }

    /// The model in data notation.
    pub fn data(&self) -> String {
        dev_utils::get_model_data(&self.model)
    }

    /// The view in data notation.
    pub fn view_data(&self) -> String {
        dev_utils::get_view_data(&self.view)
    }

    /// Insert an image with `attributes` at the selection.
    pub fn insert_image(&mut self, attributes: &[(&str, &str)]) -> Result<(), CommandError> {
        let attributes = attributes
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        self.execute(image::INSERT_IMAGE, CommandParams::InsertImage { attributes })
    }

    /// Whether [`Editor::insert_image`] would insert anything right now.
    pub fn is_image_allowed(&self) -> bool {
        self.image_insertion
            .is_some_and(|insertion| insertion.is_allowed(&self.model))
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn mapper(&self) -> &Mapper {
        &self.mapper
    }

    pub fn platform(&self) -> PlatformCapabilities {
        self.platform
    }

    pub fn dom_converter(&self) -> &dyn DomConverter {
        self.dom_converter.as_ref()
    }

    pub fn typing(&self) -> &TypingState {
        &self.typing
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn events_mut(&mut self) -> &mut EventRegistry<Editor, ViewEvent> {
        &mut self.events
    }

    fn render(&mut self) {
        Downcaster.render(
            &self.model,
            &mut self.view,
            &mut self.mapper,
            self.dom_converter.as_ref(),
        );
    }
}

/// Assembles an [`Editor`]: schema, commands and input handling.
pub struct EditorBuilder {
    config: Config,
    platform: Option<PlatformCapabilities>,
    features: ImageFeatures,
    schema_hooks: Vec<SchemaHook>,
    dom_converter: Option<Box<dyn DomConverter>>,
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            platform: None,
            features: ImageFeatures {
                block: false,
                inline: false,
            },
            schema_hooks: Vec::new(),
            dom_converter: None,
        }
    }
}

impl EditorBuilder {
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Overrides the platform preset from the config.
    pub fn with_platform(mut self, platform: PlatformCapabilities) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Block images, with captions.
    pub fn with_image_block(mut self) -> Self {
        self.features.block = true;
        self
    }

    pub fn with_image_inline(mut self) -> Self {
        self.features.inline = true;
        self
    }

    /// Extra schema rules, applied after the built-in ones in call order.
    pub fn with_schema(mut self, hook: impl FnOnce(&mut Schema) + 'static) -> Self {
        self.schema_hooks.push(Box::new(hook));
        self
    }

    pub fn with_dom_converter(mut self, converter: impl DomConverter + 'static) -> Self {
        self.dom_converter = Some(Box::new(converter));
        self
    }

    pub fn build(self) -> Editor {
        let mut schema = Schema::new();
        paragraph::register_schema(&mut schema);
        if self.features.block {
            image::register_block_schema(&mut schema);
            image::register_caption_schema(&mut schema);
        }
        if self.features.inline {
            image::register_inline_schema(&mut schema);
        }
        for hook in self.schema_hooks {
            hook(&mut schema);
        }

        let mut commands = Commands::new();
        commands.add("delete", DeleteCommand::new(Direction::Backward));
        commands.add("forwardDelete", DeleteCommand::new(Direction::Forward));
        let image_insertion = (self.features.block || self.features.inline).then_some(ImageInsertion {
            features: self.features,
            configured: self.config.image.insert.insert_type,
        });
        if let Some(insertion) = image_insertion {
            commands.add(image::INSERT_IMAGE, InsertImageCommand::new(insertion));
        }

        let platform = self
            .platform
            .unwrap_or_else(|| PlatformCapabilities::from_preset(self.config.platform.preset));
        let mut events = EventRegistry::new();
        typing::register(&mut events, platform);

        let mut model = Model::new(schema);
        model.change(|writer| {
            let start = document_start(writer.tree(), writer.schema());
            writer.set_selection(Selection::collapsed_at(start));
        });

        let mut editor = Editor {
            model,
            view: View::new(),
            mapper: Mapper::new(),
            commands,
            events,
            platform,
            dom_converter: self
                .dom_converter
                .unwrap_or_else(|| Box::new(MirrorDomConverter)),
            typing: TypingState::default(),
            image_insertion,
            config: self.config,
        };
        editor.render();
        editor
    }
}
