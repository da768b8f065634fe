//! UI state: which page is shown, the floating menu and the detail modal.
//!
//! The floating menu's visibility is a persisted preference loaded once at
//! startup and passed down; its open/closed state is not persisted.

use std::sync::Arc;
use std::time::Duration;

use crate::storage::{ClientStorage, FLOATING_MENU_KEY, StorageError};
use crate::util::reveal::Reveal;

/// Persisted UI preferences.
#[derive(Debug, Clone)]
pub struct Preferences {
    storage: Arc<ClientStorage>,
    floating_menu_visible: bool,
}

impl Preferences {
    /// Read preferences; the floating menu is visible unless stored `"false"`.
    #[must_use]
    pub fn load(storage: Arc<ClientStorage>) -> Self {
        let floating_menu_visible = storage.get(FLOATING_MENU_KEY).is_none_or(|v| v != "false");
        Self { storage, floating_menu_visible }
    }

    #[must_use]
    pub fn floating_menu_visible(&self) -> bool {
        self.floating_menu_visible
    }

    /// # Errors
    ///
    /// Returns an error if the preference cannot be persisted; the in-memory
    /// value is updated regardless.
    pub fn set_floating_menu_visible(&mut self, visible: bool) -> Result<(), StorageError> {
        self.floating_menu_visible = visible;
        self.storage.set(FLOATING_MENU_KEY, if visible { "true" } else { "false" })
    }

    /// # Errors
    ///
    /// See [`Preferences::set_floating_menu_visible`].
    pub fn toggle_floating_menu(&mut self) -> Result<bool, StorageError> {
        let next = !self.floating_menu_visible;
        self.set_floating_menu_visible(next)?;
        Ok(next)
    }
}

/// Top-level page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Wizard,
    Settings,
    History,
}

/// Entries of the floating menu, top to bottom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Settings,
    History,
    Home,
    QuickGenerate,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [Self::Settings, Self::History, Self::Home, Self::QuickGenerate];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Settings => "Settings",
            Self::History => "History",
            Self::Home => "Home",
            Self::QuickGenerate => "Quick generate",
        }
    }
}

/// What choosing a menu entry asks the caller to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Open(View),
    /// Return the wizard to step 1.
    Home,
    Notice(&'static str),
}

/// Full-text view of one result with its own reveal.
#[derive(Debug)]
pub struct DetailModal {
    pub title: String,
    pub reveal: Reveal,
}

impl DetailModal {
    #[must_use]
    pub fn open(title: impl Into<String>, text: &str, interval: Duration) -> Self {
        Self { title: title.into(), reveal: Reveal::start(text, interval) }
    }
}

#[derive(Debug, Default)]
pub struct UiState {
    pub view: View,
    pub menu_open: bool,
    pub modal: Option<DetailModal>,
}

impl UiState {
    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    /// Apply a menu choice; the menu closes either way.
    pub fn choose(&mut self, item: MenuItem) -> MenuAction {
        self.menu_open = false;
        match item {
            MenuItem::Settings => {
                self.view = View::Settings;
                MenuAction::Open(View::Settings)
            }
            MenuItem::History => {
                self.view = View::History;
                MenuAction::Open(View::History)
            }
            MenuItem::Home => {
                self.view = View::Wizard;
                MenuAction::Home
            }
            MenuItem::QuickGenerate => MenuAction::Notice("Quick generate is coming soon."),
        }
    }

    /// Replace any open modal; the previous reveal stops.
    pub fn open_modal(&mut self, modal: DetailModal) {
        self.modal = Some(modal);
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }
}

#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;
