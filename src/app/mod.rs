//! Application state types and entry glue.
//!
//! Defines the enums and structs that model the TUI state and re-exports
//! the event loop (`run`). The store holds the data-facing view state; the
//! fields here are purely presentational (cursor, scroll, input mode,
//! overlay).

pub mod update;

use ratatui::style::Color;
use std::time::Duration;

use crate::search::SearchInput;
use crate::store::{UserStore, ViewState};

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Overlay dialogs. The detail overlay is keyed by the selected
/// identifier; the store's detail sub-state drives its body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Detail { user_id: u64 },
    Help,
}

/// Display states of the list, derived per frame from the store.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ListPhase {
    Loading,
    Error,
    Empty,
    Populated,
}

/// Derive the list state machine from the view state: `Loading` while the
/// collection fetch is pending, then `Error`, `Empty`, or `Populated`.
pub fn list_phase(state: &ViewState) -> ListPhase {
    if state.loading {
        ListPhase::Loading
    } else if state.error.is_some() {
        ListPhase::Error
    } else if state.filtered_users.is_empty() {
        ListPhase::Empty
    } else {
        ListPhase::Populated
    }
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
}

impl Theme {
    /// Dark default theme.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error_fg: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
        }
    }
}

pub struct AppState {
    pub store: UserStore,
    pub search: SearchInput,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub rows_per_page: usize,
    pub theme: Theme,
}

impl AppState {
    pub fn new(debounce: Duration) -> Self {
        Self {
            store: UserStore::new(),
            search: SearchInput::new(debounce),
            input_mode: InputMode::Normal,
            modal: None,
            selected_index: 0,
            scroll_offset: 0,
            rows_per_page: 10,
            theme: Theme::mocha(),
        }
    }

    /// Clamp the cursor and scroll into the current filtered list. Called
    /// after every commit that can shrink the list.
    pub fn clamp_selection(&mut self) {
        let len = self.store.state().filtered_users.len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
        self.scroll_offset = self.scroll_offset.min(self.selected_index);
    }

    /// Identifier of the user under the cursor, if any.
    pub fn selected_user_id(&self) -> Option<u64> {
        self.store
            .state()
            .filtered_users
            .get(self.selected_index)
            .map(|u| u.id)
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
