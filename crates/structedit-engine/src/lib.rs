pub mod commands;
pub mod conversion;
pub mod dev_utils;
pub mod editor;
pub mod events;
pub mod image;
pub mod model;
pub mod paragraph;
pub mod platform;
pub mod tree;
pub mod typing;
pub mod view;
pub mod widget;

// Re-export key types for easier usage
pub use commands::{Command, CommandError, CommandExecutor, CommandParams, Commands};
pub use editor::{Editor, EditorBuilder};
pub use events::{EventInfo, EventRegistry, Priority};
pub use model::{Direction, Model, Schema, SchemaItem, Unit};
pub use platform::{PlatformCapabilities, WordModifier};
pub use tree::{NodeId, Position, Range, Selection, SelectionMode, Tree};
pub use typing::{DeleteIntent, DeleteParams, DeleteUnit};
pub use view::{
    BeforeInput, DomConverter, DomPoint, DomRange, DomSelection, DomTarget, InputOutcome, Key,
    KeyInput, Modifiers, RawInput, View, ViewEvent,
};
pub use widget::{WidgetLabel, WidgetRegistry};
