//! Core traits shared by the console screens and components

use crate::models::DatasetKind;

/// Actions a screen hands back to the application after handling a key
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Open the management dialog for a dataset
    OpenDialog(DatasetKind),
    /// Close the open dialog
    CloseDialog,
    /// Toggle the help popup
    ToggleHelp,
    /// Quit the application
    Quit,
    /// Set status message
    SetStatus(String),
    /// Set error message
    SetError(String),
    /// Clear messages
    ClearMessages,
    /// No action taken
    None,
}

/// Lists with a single selected row
pub trait Navigable {
    fn navigate_up(&mut self);

    fn navigate_down(&mut self);

    fn get_selected_index(&self) -> Option<usize>;

    fn set_selected_index(&mut self, index: Option<usize>);

    fn get_item_count(&self) -> usize;

    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }
}

/// Content split into fixed-size pages
pub trait Paginated {
    /// Current page (0-based)
    fn get_current_page(&self) -> usize;

    fn set_current_page(&mut self, page: usize);

    fn get_total_pages(&self) -> usize;

    fn get_items_per_page(&self) -> usize;

    fn next_page(&mut self) {
        let current = self.get_current_page();
        let total = self.get_total_pages();
        if current + 1 < total {
            self.set_current_page(current + 1);
        }
    }

    fn previous_page(&mut self) {
        let current = self.get_current_page();
        if current > 0 {
            self.set_current_page(current - 1);
        }
    }

    fn go_to_first_page(&mut self) {
        self.set_current_page(0);
    }

    fn go_to_last_page(&mut self) {
        let total = self.get_total_pages();
        if total > 0 {
            self.set_current_page(total - 1);
        }
    }
}
