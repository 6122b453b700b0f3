//! Platform capabilities
//!
//! Input quirks differ per platform. Instead of sniffing the runtime, the
//! editor is handed a [`PlatformCapabilities`] value at construction.

use structedit_config::PlatformPreset;

use crate::view::Modifiers;

/// Which modifier turns a character deletion into a word deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordModifier {
    Alt,
    Ctrl,
}

impl WordModifier {
    pub fn is_pressed(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Alt => modifiers.alt,
            Self::Ctrl => modifiers.ctrl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// The input method moves the DOM selection some time after a deletion,
    /// before the key is released.
    pub async_selection_repositioning: bool,
    /// Deletions arrive as `beforeinput` events rather than key presses.
    pub before_input_deletions: bool,
    pub word_modifier: WordModifier,
}

impl PlatformCapabilities {
    pub fn desktop() -> Self {
        Self {
            async_selection_repositioning: false,
            before_input_deletions: false,
            word_modifier: WordModifier::Ctrl,
        }
    }

    pub fn mac() -> Self {
        Self {
            word_modifier: WordModifier::Alt,
            ..Self::desktop()
        }
    }

    /// Android soft keyboards.
    pub fn android() -> Self {
        Self {
            async_selection_repositioning: true,
            before_input_deletions: true,
            word_modifier: WordModifier::Ctrl,
        }
    }

    pub fn from_preset(preset: PlatformPreset) -> Self {
        match preset {
            PlatformPreset::Desktop => Self::desktop(),
            PlatformPreset::Mac => Self::mac(),
            PlatformPreset::Android => Self::android(),
        }
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::desktop()
    }
}
