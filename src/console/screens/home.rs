//! Home screen: header bar and the management menu

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::console::handlers::{CommonKeyHandler, MenuHandler};
use crate::console::traits::{Navigable, ScreenAction};
use crate::console::ui::Styles;
use crate::models::DatasetKind;

pub const APP_TITLE: &str = "Reporting Management System";

#[derive(Debug, Clone)]
pub struct MenuOption {
    pub title: String,
    pub description: String,
    pub shortcut: char,
    pub kind: DatasetKind,
}

impl MenuOption {
    pub fn new(description: &str, shortcut: char, kind: DatasetKind) -> Self {
        Self {
            title: kind.title().to_string(),
            description: description.to_string(),
            shortcut,
            kind,
        }
    }
}

pub struct HomeScreen {
    menu_state: ListState,
    menu_options: Vec<MenuOption>,
}

impl Default for HomeScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HomeScreen {
    pub fn new() -> Self {
        let menu_options = vec![
            MenuOption::new(
                "View, add and rename reporting frameworks",
                'F',
                DatasetKind::Frameworks,
            ),
            MenuOption::new(
                "View, add and rename report destinations",
                'D',
                DatasetKind::Destinations,
            ),
        ];

        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        Self {
            menu_state,
            menu_options,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ScreenAction> {
        if CommonKeyHandler::handle_navigation_keys(self, key).is_some() {
            return Some(ScreenAction::None);
        }

        let actions: Vec<ScreenAction> = self
            .menu_options
            .iter()
            .map(|option| ScreenAction::OpenDialog(option.kind))
            .collect();
        if let Some(action) = MenuHandler::handle_menu_selection(self, key, &actions) {
            return Some(action);
        }

        let shortcuts: Vec<(char, ScreenAction)> = self
            .menu_options
            .iter()
            .map(|option| (option.shortcut, ScreenAction::OpenDialog(option.kind)))
            .collect();
        if let Some(action) = MenuHandler::handle_menu_shortcuts(key, &shortcuts) {
            return Some(action);
        }

        match key.code {
            KeyCode::Esc => Some(ScreenAction::ClearMessages),
            _ => None,
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(4),
            ])
            .split(area);

        self.draw_header(f, chunks[0]);
        self.draw_menu(f, chunks[1]);
        self.draw_instructions(f, chunks[2]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(APP_TITLE)
            .style(Styles::title())
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(header, area);
    }

    fn draw_menu(&mut self, f: &mut Frame, area: Rect) {
        let selected = self.menu_state.selected();
        let items: Vec<ListItem> = self
            .menu_options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if Some(i) == selected {
                    Styles::selected()
                } else {
                    Style::default()
                };

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", option.shortcut), Styles::info()),
                        Span::styled(option.title.clone(), style.add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(Span::styled(
                        format!("     {}", option.description),
                        if Some(i) == selected {
                            style
                        } else {
                            Styles::inactive()
                        },
                    )),
                ])
            })
            .collect();

        let menu = List::new(items)
            .block(
                Block::default()
                    .title("Manage")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(menu, area, &mut self.menu_state);
    }

    fn draw_instructions(&self, f: &mut Frame, area: Rect) {
        let instructions = vec![
            Line::from(vec![
                Span::styled("Navigation: ", Styles::info()),
                Span::raw("↑/↓ to move, "),
                Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" to open"),
            ]),
            Line::from(vec![
                Span::styled("Help: ", Styles::info()),
                Span::raw("? for shortcuts, q to quit"),
            ]),
        ];

        let paragraph = Paragraph::new(instructions).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(paragraph, area);
    }
}

impl Navigable for HomeScreen {
    fn navigate_up(&mut self) {
        let selected = self.menu_state.selected().unwrap_or(0);
        let new_selected = if selected == 0 {
            self.menu_options.len() - 1
        } else {
            selected - 1
        };
        self.menu_state.select(Some(new_selected));
    }

    fn navigate_down(&mut self) {
        let selected = self.menu_state.selected().unwrap_or(0);
        self.menu_state
            .select(Some((selected + 1) % self.menu_options.len()));
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.menu_state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.menu_state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.menu_options.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_menu_opens_dialogs() {
        let mut home = HomeScreen::new();
        assert_eq!(
            home.handle_key(key(KeyCode::Enter)),
            Some(ScreenAction::OpenDialog(DatasetKind::Frameworks))
        );

        home.handle_key(key(KeyCode::Down));
        assert_eq!(
            home.handle_key(key(KeyCode::Enter)),
            Some(ScreenAction::OpenDialog(DatasetKind::Destinations))
        );

        assert_eq!(
            home.handle_key(key(KeyCode::Char('f'))),
            Some(ScreenAction::OpenDialog(DatasetKind::Frameworks))
        );
        assert_eq!(home.handle_key(key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_menu_wraps() {
        let mut home = HomeScreen::new();
        home.navigate_up();
        assert_eq!(home.get_selected_index(), Some(1));
        home.navigate_down();
        assert_eq!(home.get_selected_index(), Some(0));
    }
}
