//! Browser commands and keybinding resolution

use std::collections::HashMap;

use crate::config::ViewMode;

/// Command identifiers used as keys in the `[keybindings]` table
pub struct CommandId;

impl CommandId {
    pub const BROWSER_OPEN: &'static str = "browser.open";
    pub const BROWSER_RENAME: &'static str = "browser.rename";
    pub const BROWSER_DELETE: &'static str = "browser.delete";
    pub const BROWSER_NEW_FOLDER: &'static str = "browser.new_folder";
    pub const BROWSER_CLEAR_FILTERS: &'static str = "browser.clear_filters";

    pub const VIEW_TILES: &'static str = "view.tiles";
    pub const VIEW_LIST: &'static str = "view.list";
}

/// Action the browser performs for a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserCommand {
    /// Open the selected asset's editor or enter the selected directory
    OpenSelected,
    RenameSelected,
    DeleteSelected,
    NewFolder,
    ClearFilters,
    SetViewMode(ViewMode),
}

impl BrowserCommand {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            CommandId::BROWSER_OPEN => Some(Self::OpenSelected),
            CommandId::BROWSER_RENAME => Some(Self::RenameSelected),
            CommandId::BROWSER_DELETE => Some(Self::DeleteSelected),
            CommandId::BROWSER_NEW_FOLDER => Some(Self::NewFolder),
            CommandId::BROWSER_CLEAR_FILTERS => Some(Self::ClearFilters),
            CommandId::VIEW_TILES => Some(Self::SetViewMode(ViewMode::Tiles)),
            CommandId::VIEW_LIST => Some(Self::SetViewMode(ViewMode::List)),
            _ => None,
        }
    }
}

/// A key with its modifiers, e.g. `Ctrl+Shift+n`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Key name, compared case-insensitively
    pub key: String,
}

impl KeyChord {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Parse `Ctrl+Alt+Shift+Key`; modifiers in any order
    pub fn parse(binding: &str) -> Option<Self> {
        let mut chord = Self::default();
        let mut key = None;

        for part in binding.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "alt" => chord.alt = true,
                "shift" => chord.shift = true,
                "" => return None,
                other => {
                    if key.replace(other.to_string()).is_some() {
                        return None;
                    }
                }
            }
        }

        chord.key = key?;
        Some(chord)
    }
}

/// Key chord -> command lookup built from the `[keybindings]` table
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: HashMap<KeyChord, BrowserCommand>,
}

impl Keymap {
    pub fn new(bindings: &HashMap<String, Vec<String>>) -> Self {
        // Invert command -> keys into key -> command
        let mut map = HashMap::new();
        for (id, keys) in bindings {
            let Some(command) = BrowserCommand::from_id(id) else {
                tracing::warn!("Unknown command in keybindings: {}", id);
                continue;
            };
            for key in keys {
                match KeyChord::parse(key) {
                    Some(chord) => {
                        map.insert(chord, command);
                    }
                    None => tracing::warn!("Invalid key binding {:?} for {}", key, id),
                }
            }
        }
        Self { bindings: map }
    }

    pub fn resolve(&self, chord: &KeyChord) -> Option<BrowserCommand> {
        let command = self.bindings.get(chord).copied();
        tracing::debug!("Key pressed: {:?} -> {:?}", chord, command);
        command
    }
}
