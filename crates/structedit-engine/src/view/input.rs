//! Raw platform input and the view events built from it.

use super::dom::{DomRange, DomTarget};
use crate::typing::DeleteIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Enter,
    Escape,
    ArrowLeft,
    ArrowRight,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
    pub dom_target: DomTarget,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
            dom_target: DomTarget::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// A `beforeinput` event: the platform announcing an edit it is about to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeforeInput {
    /// The DOM `inputType`, e.g. `deleteContentBackward`.
    pub input_type: String,
    /// Ranges the platform intends to change. Often empty.
    pub target_ranges: Vec<DomRange>,
    pub dom_target: DomTarget,
}

/// Input as it arrives from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    KeyDown(KeyInput),
    KeyUp(KeyInput),
    BeforeInput(BeforeInput),
}

/// What became of a raw input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputOutcome {
    /// The editor handled the input; the platform must not apply its default action.
    pub prevented: bool,
}

/// Event payload with a "default prevented" flag, like a DOM event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEventData<T> {
    pub data: T,
    default_prevented: bool,
}

impl<T> DomEventData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Events fired on the view document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    KeyDown(DomEventData<KeyInput>),
    KeyUp(DomEventData<KeyInput>),
    BeforeInput(DomEventData<BeforeInput>),
    Delete(DomEventData<DeleteIntent>),
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::KeyDown(_) => "keydown",
            Self::KeyUp(_) => "keyup",
            Self::BeforeInput(_) => "beforeinput",
            Self::Delete(_) => "delete",
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        match self {
            Self::KeyDown(data) | Self::KeyUp(data) => data.is_default_prevented(),
            Self::BeforeInput(data) => data.is_default_prevented(),
            Self::Delete(data) => data.is_default_prevented(),
        }
    }
}

impl From<RawInput> for ViewEvent {
    fn from(input: RawInput) -> Self {
        match input {
            RawInput::KeyDown(key) => Self::KeyDown(DomEventData::new(key)),
            RawInput::KeyUp(key) => Self::KeyUp(DomEventData::new(key)),
            RawInput::BeforeInput(input) => Self::BeforeInput(DomEventData::new(input)),
        }
    }
}
