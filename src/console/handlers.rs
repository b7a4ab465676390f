//! Reusable key handling composed by the console screens

use crossterm::event::{KeyCode, KeyEvent};

use super::traits::{Navigable, Paginated, ScreenAction};

/// Common keyboard event handling utilities
pub struct CommonKeyHandler;

impl CommonKeyHandler {
    /// Row navigation for list-based views
    pub fn handle_navigation_keys<T: Navigable>(
        navigable: &mut T,
        key: KeyEvent,
    ) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                navigable.navigate_up();
                Some(ScreenAction::None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                navigable.navigate_down();
                Some(ScreenAction::None)
            }
            KeyCode::Home => {
                navigable.navigate_to_first();
                Some(ScreenAction::SetStatus("First item".to_string()))
            }
            KeyCode::End => {
                navigable.navigate_to_last();
                Some(ScreenAction::SetStatus("Last item".to_string()))
            }
            _ => None,
        }
    }

    /// Page switching; left and right are left to column navigation
    pub fn handle_pagination_keys<T: Paginated>(
        paginated: &mut T,
        key: KeyEvent,
    ) -> Option<ScreenAction> {
        match key.code {
            KeyCode::PageUp => {
                paginated.previous_page();
                Some(ScreenAction::SetStatus(format!(
                    "Page {} of {}",
                    paginated.get_current_page() + 1,
                    paginated.get_total_pages().max(1)
                )))
            }
            KeyCode::PageDown => {
                paginated.next_page();
                Some(ScreenAction::SetStatus(format!(
                    "Page {} of {}",
                    paginated.get_current_page() + 1,
                    paginated.get_total_pages().max(1)
                )))
            }
            _ => None,
        }
    }

    /// Keys that work everywhere outside text input
    pub fn handle_global_keys(key: KeyEvent) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Char('q') => Some(ScreenAction::Quit),
            KeyCode::F(1) | KeyCode::Char('?') => Some(ScreenAction::ToggleHelp),
            _ => None,
        }
    }
}

/// Specialized handler for menu-style screens
pub struct MenuHandler;

impl MenuHandler {
    /// Activate the selected entry with Enter
    pub fn handle_menu_selection<T: Navigable>(
        navigable: &T,
        key: KeyEvent,
        menu_actions: &[ScreenAction],
    ) -> Option<ScreenAction> {
        match key.code {
            KeyCode::Enter => navigable
                .get_selected_index()
                .and_then(|selected| menu_actions.get(selected).cloned()),
            _ => None,
        }
    }

    /// Case-insensitive single character shortcuts
    pub fn handle_menu_shortcuts(
        key: KeyEvent,
        shortcuts: &[(char, ScreenAction)],
    ) -> Option<ScreenAction> {
        if let KeyCode::Char(c) = key.code {
            for (shortcut_char, action) in shortcuts {
                if shortcut_char.eq_ignore_ascii_case(&c) {
                    return Some(action.clone());
                }
            }
        }
        None
    }
}
