//! Keyboard shortcuts

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::errors::NavError;

/// Platform modifier for application shortcuts
pub fn ctrl_or_cmd() -> &'static str {
    if cfg!(target_os = "macos") {
        "command"
    } else {
        "ctrl"
    }
}

/// Actions the menu binds to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavAction {
    OpenSearchModal,
}

/// Modifier keys held during a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub command: bool,
    pub alt: bool,
    pub shift: bool,
}

/// A key press delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// A parsed combination such as `ctrl+k`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    modifiers: Modifiers,
    key: String,
}

impl KeyCombo {
    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            modifiers: event.modifiers,
            key: event.key.to_lowercase(),
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FromStr for KeyCombo {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::default();
        let mut key = None;

        for part in s.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "" => return Err(NavError::InvalidShortcut(s.to_string())),
                "ctrl" | "control" => modifiers.ctrl = true,
                "command" | "cmd" | "meta" => modifiers.command = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                other => {
                    if key.replace(other.to_string()).is_some() {
                        return Err(NavError::InvalidShortcut(s.to_string()));
                    }
                }
            }
        }

        match key {
            Some(key) => Ok(Self { modifiers, key }),
            None => Err(NavError::InvalidShortcut(s.to_string())),
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            write!(f, "ctrl+")?;
        }
        if self.modifiers.command {
            write!(f, "command+")?;
        }
        if self.modifiers.alt {
            write!(f, "alt+")?;
        }
        if self.modifiers.shift {
            write!(f, "shift+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// Shortcut table, active only between register and remove
#[derive(Debug, Clone, Default)]
pub struct Shortcuts {
    bindings: HashMap<KeyCombo, NavAction>,
    registered: bool,
}

impl Shortcuts {
    pub fn new() -> Self {
        Self::default()
    }

    /// The menu's own bindings
    pub fn with_defaults() -> Result<Self, NavError> {
        let mut shortcuts = Self::new();
        shortcuts.bind(&format!("{}+k", ctrl_or_cmd()), NavAction::OpenSearchModal)?;
        Ok(shortcuts)
    }

    pub fn bind(&mut self, combo: &str, action: NavAction) -> Result<(), NavError> {
        let combo: KeyCombo = combo.parse()?;
        self.bindings.insert(combo, action);
        Ok(())
    }

    pub fn register(&mut self) {
        debug!("Registering {} shortcut(s)", self.bindings.len());
        self.registered = true;
    }

    pub fn remove(&mut self) {
        debug!("Removing shortcuts");
        self.registered = false;
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Action bound to the key press, if shortcuts are registered
    pub fn dispatch(&self, event: &KeyEvent) -> Option<NavAction> {
        if !self.registered {
            return None;
        }
        self.bindings.get(&KeyCombo::from_event(event)).copied()
    }
}
