//! Console application state and main loop

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

use super::components::StatusDisplay;
use super::events::AppEvent;
use super::handlers::CommonKeyHandler;
use super::operations::BackendTasks;
use super::screens::{destinations, frameworks, DestinationsScreen, FrameworksScreen, HomeScreen};
use super::traits::ScreenAction;
use super::ui::{centered_rect, Styles};
use crate::backend::ReportingBackend;
use crate::config::Config;
use crate::models::DatasetKind;

const INPUT_POLL: Duration = Duration::from_millis(100);

pub struct App {
    home: HomeScreen,
    frameworks: FrameworksScreen,
    destinations: DestinationsScreen,
    open_dialog: Option<DatasetKind>,
    next_session: u64,
    tasks: BackendTasks,
    events: UnboundedReceiver<AppEvent>,
    status: StatusDisplay,
    should_quit: bool,
    show_help_popup: bool,
}

impl App {
    pub fn new(config: &Config, backend: Arc<dyn ReportingBackend>) -> Result<Self> {
        let (tx, events) = mpsc::unbounded_channel();

        Ok(Self {
            home: HomeScreen::new(),
            frameworks: frameworks::screen(config.page_size)
                .context("Invalid reporting framework columns")?,
            destinations: destinations::screen(config.page_size)
                .context("Invalid report destination columns")?,
            open_dialog: None,
            next_session: 0,
            tasks: BackendTasks::new(backend, tx),
            events,
            status: StatusDisplay::new(),
            should_quit: false,
            show_help_popup: false,
        })
    }

    /// Column display list applied to both dialogs
    pub fn with_display(mut self, display: Vec<String>) -> Self {
        self.frameworks = self.frameworks.with_display(display.clone());
        self.destinations = self.destinations.with_display(display);
        self
    }

    pub fn open_dialog_kind(&self) -> Option<DatasetKind> {
        self.open_dialog
    }

    pub fn status(&self) -> &StatusDisplay {
        &self.status
    }

    pub fn frameworks(&self) -> &FrameworksScreen {
        &self.frameworks
    }

    pub fn destinations(&self) -> &DestinationsScreen {
        &self.destinations
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(INPUT_POLL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            self.drain_events();

            if self.should_quit {
                info!("Quitting console");
                break;
            }
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Open a management dialog under a fresh session
    pub fn open_dialog(&mut self, kind: DatasetKind) {
        if self.open_dialog.is_some() {
            self.close_dialog();
        }

        self.next_session += 1;
        let session = self.next_session;
        match kind {
            DatasetKind::Frameworks => self.frameworks.open(session, &self.tasks),
            DatasetKind::Destinations => self.destinations.open(session, &self.tasks),
        }
        self.open_dialog = Some(kind);
        self.status.set_loading(format!("Loading {}...", kind));
    }

    pub fn close_dialog(&mut self) {
        match self.open_dialog.take() {
            Some(DatasetKind::Frameworks) => self.frameworks.close(),
            Some(DatasetKind::Destinations) => self.destinations.close(),
            None => {}
        }
        self.status.clear();
    }

    fn dialog_capturing_input(&self) -> bool {
        match self.open_dialog {
            Some(DatasetKind::Frameworks) => self.frameworks.is_capturing_input(),
            Some(DatasetKind::Destinations) => self.destinations.is_capturing_input(),
            None => false,
        }
    }

    /// Handle keyboard input
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help_popup = false;
            }
            return;
        }

        if !self.dialog_capturing_input() {
            if let Some(action) = CommonKeyHandler::handle_global_keys(key) {
                self.apply_action(action);
                return;
            }
        }

        let action = match self.open_dialog {
            Some(DatasetKind::Frameworks) => self.frameworks.handle_key(key, &self.tasks),
            Some(DatasetKind::Destinations) => self.destinations.handle_key(key, &self.tasks),
            None => self.home.handle_key(key),
        };
        if let Some(action) = action {
            self.apply_action(action);
        }
    }

    fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::OpenDialog(kind) => self.open_dialog(kind),
            ScreenAction::CloseDialog => self.close_dialog(),
            ScreenAction::ToggleHelp => self.show_help_popup = !self.show_help_popup,
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::ClearMessages => self.status.clear(),
            ScreenAction::None => {}
        }
    }

    /// Apply every completion that has already arrived
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_app_event(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it
    pub async fn process_next_event(&mut self) -> bool {
        match self.events.recv().await {
            Some(event) => {
                self.handle_app_event(event);
                true
            }
            None => false,
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        debug!(
            "Backend completion for {} (session {})",
            event.kind(),
            event.session()
        );

        let action = match event {
            AppEvent::RecordsLoaded {
                kind: DatasetKind::Frameworks,
                session,
                result,
            } => self.frameworks.apply_loaded(session, result),
            AppEvent::RecordsLoaded {
                kind: DatasetKind::Destinations,
                session,
                result,
            } => self.destinations.apply_loaded(session, result),
            AppEvent::RecordSaved {
                kind: DatasetKind::Frameworks,
                session,
                record_id,
                result,
            } => self.frameworks.apply_saved(session, &record_id, result),
            AppEvent::RecordSaved {
                kind: DatasetKind::Destinations,
                session,
                record_id,
                result,
            } => self.destinations.apply_saved(session, &record_id, result),
        };

        if let Some(action) = action {
            self.apply_action(action);
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.home.draw(f, chunks[0]);

        let dialog_area = centered_rect(90, 85, chunks[0]);
        match self.open_dialog {
            Some(DatasetKind::Frameworks) => self.frameworks.draw(f, dialog_area),
            Some(DatasetKind::Destinations) => self.destinations.draw(f, dialog_area),
            None => {}
        }

        self.status.render(f, chunks[1]);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);
        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );
        f.render_widget(help_popup, popup_area);
    }

    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            q - Quit application\n\
            F1 / ? - Toggle this help\n\n";

        let screen_help = match self.open_dialog {
            None => {
                "Menu:\n\
                ↑/↓ - Navigate menu\n\
                Enter - Open dialog\n\
                F - Manage Reporting Frameworks\n\
                D - Manage Report Destinations"
            }
            Some(_) => {
                "Dialog:\n\
                ↑/↓ Home/End - Select row\n\
                PgUp/PgDn - Previous/next page\n\
                [ / ] - Rows per page\n\
                ←/→ - Select column\n\
                s - Sort by selected column\n\
                Enter - Activate selected cell\n\
                e - Edit selected row\n\
                x - Cancel edit of selected row\n\
                a - Add new record\n\
                r - Reload\n\
                Esc - Close dialog\n\n\
                While editing a name:\n\
                Enter - Save\n\
                Esc - Cancel\n\
                Tab - Leave the input"
            }
        };

        format!("{}{}", global_help, screen_help)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(&Config::default(), Arc::new(MockBackend::instant())).unwrap()
    }

    #[tokio::test]
    async fn test_menu_opens_dialog_and_loads_records() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Char('f')));
        assert_eq!(app.open_dialog_kind(), Some(DatasetKind::Frameworks));
        assert!(app.frameworks().is_loading());

        assert!(app.process_next_event().await);
        assert_eq!(app.frameworks().store().len(), 7);
        assert_eq!(app.status().text(), "ℹ Loaded 7 frameworks");
    }

    #[tokio::test]
    async fn test_closing_dialog_drops_pending_load() {
        let mut app = app();
        app.open_dialog(DatasetKind::Destinations);
        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.open_dialog_kind(), None);

        assert!(app.process_next_event().await);
        assert!(app.destinations().store().is_empty());
        assert_eq!(app.status().text(), "Ready");
    }

    #[tokio::test]
    async fn test_typed_q_goes_to_edit_row() {
        let mut app = app();
        app.open_dialog(DatasetKind::Frameworks);
        app.process_next_event().await;

        app.handle_key_event(key(KeyCode::Char('a')));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit());

        app.handle_key_event(key(KeyCode::Tab));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_help_popup_toggles() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Char('?')));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        app.handle_key_event(key(KeyCode::Esc));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_draw_dialog_over_home() {
        let mut app = app();
        app.open_dialog(DatasetKind::Destinations);
        app.process_next_event().await;

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Reporting Management System"));
        assert!(text.contains("Manage Report Destinations"));
        assert!(text.contains("Jurisdictional Report"));
        assert!(text.contains("Add New"));
    }
}
