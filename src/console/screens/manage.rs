//! Management dialog shared by the reference datasets
//!
//! A `ManageScreen` owns the record store, column configuration and sort
//! intent of one dataset. The table reports user actions as events; this
//! screen applies them to the store and round-trips saves through the
//! backend tasks.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing::{debug, error, info, warn};

use crate::backend::BackendResult;
use crate::console::components::{DataTable, TableResponse};
use crate::console::operations::{BackendTasks, SaveRequest};
use crate::console::store::RecordStore;
use crate::console::table::{ColumnConfig, SortState, TableConfig, TableEvent};
use crate::console::traits::ScreenAction;
use crate::console::ui::Styles;
use crate::models::{DatasetKind, NameDraft, RecordPayload, ReferenceRecord};

pub struct ManageScreen<T: ReferenceRecord> {
    store: RecordStore<T>,
    config: TableConfig,
    display: Option<Vec<String>>,
    sort: SortState,
    table: DataTable,
    page_size: usize,
    session: Option<u64>,
    loading: bool,
}

impl<T: ReferenceRecord> ManageScreen<T> {
    pub fn new(config: TableConfig, page_size: usize) -> Self {
        Self {
            store: RecordStore::new(),
            config,
            display: None,
            sort: SortState::new(),
            table: DataTable::new(page_size),
            page_size,
            session: None,
            loading: false,
        }
    }

    /// Explicit column display list; grouped columns not listed are hidden
    pub fn with_display(mut self, display: Vec<String>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn kind(&self) -> DatasetKind {
        T::KIND
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn store(&self) -> &RecordStore<T> {
        &self.store
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Whether keys should bypass global shortcuts
    pub fn is_capturing_input(&self) -> bool {
        self.table.is_capturing_input()
    }

    pub fn visible_columns(&self) -> Vec<&ColumnConfig> {
        self.config.resolve(self.display.as_deref())
    }

    /// Records in display order
    pub fn view(&self) -> Vec<&T> {
        self.store.sorted(&self.sort, &self.config)
    }

    /// Open the dialog under a new session and start loading
    pub fn open(&mut self, session: u64, tasks: &BackendTasks) {
        info!("Opening {} dialog (session {})", self.kind(), session);
        self.store.clear();
        self.sort.clear();
        self.table = DataTable::new(self.page_size);
        self.session = Some(session);
        self.loading = true;
        tasks.spawn_list(self.kind(), session);
    }

    /// Close the dialog; in-flight completions become stale
    pub fn close(&mut self) {
        info!("Closing {} dialog", self.kind());
        self.session = None;
        self.loading = false;
        self.store.clear();
        self.table.reset();
    }

    /// Re-fetch the list under the current session
    pub fn reload(&mut self, tasks: &BackendTasks) {
        if let Some(session) = self.session {
            self.loading = true;
            tasks.spawn_list(self.kind(), session);
        }
    }

    fn sync_table(&mut self) {
        let view = self.store.sorted(&self.sort, &self.config);
        self.table.sync(&view);
    }

    pub fn add(&mut self) -> String {
        let temp_id = self.store.add_draft();
        debug!("Added draft {} to {}", temp_id, self.kind());
        self.sync_table();
        temp_id
    }

    pub fn edit(&mut self, id: &str) {
        if self.store.begin_edit(id) {
            self.sync_table();
        }
    }

    /// Issue create or update for a record; unknown ids are ignored
    pub fn save(&mut self, id: &str, name: String, tasks: &BackendTasks) -> bool {
        let (Some(session), Some(record)) = (self.session, self.store.get(id)) else {
            warn!("Save requested for unknown {} record {}", self.kind(), id);
            return false;
        };

        let draft = NameDraft::new(name);
        let request = if record.is_new() {
            SaveRequest::Create {
                temp_id: id.to_string(),
                draft,
            }
        } else {
            SaveRequest::Update {
                id: id.to_string(),
                draft,
            }
        };
        tasks.spawn_save(self.kind(), session, request);
        true
    }

    pub fn cancel(&mut self, id: &str) {
        if self.store.cancel(id) {
            debug!("Discarded unsaved {} record {}", self.kind(), id);
        }
        self.sync_table();
    }

    fn is_current(&self, session: u64) -> bool {
        if self.session == Some(session) {
            true
        } else {
            debug!(
                "Dropping stale {} completion from session {}",
                self.kind(),
                session
            );
            false
        }
    }

    /// Apply a list completion; stale sessions yield no action
    pub fn apply_loaded(
        &mut self,
        session: u64,
        result: BackendResult<Vec<RecordPayload>>,
    ) -> Option<ScreenAction> {
        if !self.is_current(session) {
            return None;
        }
        self.loading = false;

        match result {
            Ok(payloads) => {
                let count = payloads.len();
                self.store
                    .replace_all(payloads.into_iter().map(T::from).collect());
                self.sync_table();
                Some(ScreenAction::SetStatus(format!(
                    "Loaded {} {}",
                    count,
                    self.kind()
                )))
            }
            Err(e) => {
                error!("Error fetching {}: {}", self.kind(), e);
                self.store.clear();
                self.sync_table();
                Some(ScreenAction::SetError(format!(
                    "Error fetching {}: {}",
                    self.kind(),
                    e
                )))
            }
        }
    }

    /// Apply a save completion by replacing the record it was issued for
    pub fn apply_saved(
        &mut self,
        session: u64,
        record_id: &str,
        result: BackendResult<RecordPayload>,
    ) -> Option<ScreenAction> {
        if !self.is_current(session) {
            return None;
        }

        match result {
            Ok(payload) => {
                let name = payload.name.clone();
                let replaced = self.store.apply_saved(record_id, T::from(payload));
                self.sync_table();
                replaced.then(|| ScreenAction::SetStatus(format!("Saved '{}'", name)))
            }
            Err(e) => {
                error!("Error saving {} record {}: {}", self.kind(), record_id, e);
                self.table.save_failed(record_id);
                Some(ScreenAction::SetError(format!("Error saving record: {}", e)))
            }
        }
    }

    /// Handle a key while the dialog is open; `None` leaves it unhandled
    pub fn handle_key(&mut self, key: KeyEvent, tasks: &BackendTasks) -> Option<ScreenAction> {
        if !self.table.is_capturing_input() {
            match key.code {
                KeyCode::Char('a') => {
                    self.add();
                    return Some(ScreenAction::SetStatus(format!(
                        "New {} row added",
                        self.kind().record_label()
                    )));
                }
                KeyCode::Char('r') => {
                    self.reload(tasks);
                    return Some(ScreenAction::SetStatus(format!("Reloading {}", self.kind())));
                }
                KeyCode::Esc => return Some(ScreenAction::CloseDialog),
                _ => {}
            }
        }

        let response = {
            let view = self.store.sorted(&self.sort, &self.config);
            let columns = self.config.resolve(self.display.as_deref());
            self.table.handle_key(key, &view, &columns)
        };

        match response {
            TableResponse::Unhandled => None,
            TableResponse::Handled => Some(ScreenAction::None),
            TableResponse::Event(event) => Some(self.apply_event(event, tasks)),
        }
    }

    /// Apply a table event to the store
    pub fn apply_event(&mut self, event: TableEvent, tasks: &BackendTasks) -> ScreenAction {
        match event {
            TableEvent::Edit { id } => {
                self.edit(&id);
                ScreenAction::None
            }
            TableEvent::Save { id, name } => {
                if self.save(&id, name.clone(), tasks) {
                    ScreenAction::SetStatus(format!("Saving '{}'...", name))
                } else {
                    ScreenAction::None
                }
            }
            TableEvent::Cancel { id } => {
                self.cancel(&id);
                ScreenAction::ClearMessages
            }
            TableEvent::Sort { field } => {
                let activated = {
                    let columns = self.config.resolve(self.display.as_deref());
                    self.sort.activate(&field, &columns)
                };
                if !activated {
                    return ScreenAction::None;
                }
                self.sync_table();
                match self.sort.field() {
                    Some(field) => ScreenAction::SetStatus(format!(
                        "Sorted by {} ({})",
                        field,
                        self.sort.direction().as_str()
                    )),
                    None => ScreenAction::SetStatus("Sort cleared".to_string()),
                }
            }
            TableEvent::OpenLink {
                target,
                new_context,
            } => {
                info!("Link activated: {} (new window: {})", target, new_context);
                if new_context {
                    ScreenAction::SetStatus(format!("Opening {} in a new window", target))
                } else {
                    ScreenAction::SetStatus(format!("Navigate to {}", target))
                }
            }
            TableEvent::Custom { field, id } => {
                ScreenAction::SetStatus(format!("{} action requested for record {}", field, id))
            }
        }
    }

    /// Draw the dialog as a popup over `area`
    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        f.render_widget(Clear, area);

        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.kind().title()), Styles::title()))
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(inner);

        let toolbar = Paragraph::new(Line::from(vec![
            Span::styled("[a] ", Styles::info()),
            Span::styled("+ Add New", Styles::action()),
        ]));
        f.render_widget(toolbar, chunks[0]);

        let view = self.store.sorted(&self.sort, &self.config);
        let columns = self.config.resolve(self.display.as_deref());
        self.table
            .render(f, chunks[1], &view, &columns, &self.sort, self.loading);

        let close = Paragraph::new(Line::from(vec![
            Span::styled("[Esc] ", Styles::info()),
            Span::raw("Close"),
        ]))
        .alignment(Alignment::Right);
        f.render_widget(close, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, ReportingBackend};
    use crate::console::events::AppEvent;
    use crate::console::screens::frameworks;
    use crate::models::ReportingFramework;
    use async_trait::async_trait;
    use crossterm::event::KeyModifiers;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    /// Backend double that records every call
    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<String>>,
        fail_updates: bool,
    }

    impl RecordingBackend {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn payload(id: &str, name: &str, count: u32) -> RecordPayload {
        RecordPayload {
            id: id.to_string(),
            name: name.to_string(),
            associated_active_rfe: count,
            updated_by: "Kishan".to_string(),
            updated_on: "04/07/2025".to_string(),
        }
    }

    #[async_trait]
    impl ReportingBackend for RecordingBackend {
        async fn list(&self, kind: DatasetKind) -> BackendResult<Vec<RecordPayload>> {
            self.calls.lock().unwrap().push(format!("list {}", kind));
            Ok(vec![payload("1", "ESRS", 118), payload("4", "SASB", 3)])
        }

        async fn create(&self, kind: DatasetKind, draft: &NameDraft) -> BackendResult<RecordPayload> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("create {} {}", kind, serde_json::to_string(draft).unwrap()));
            Ok(payload("1720000000000", &draft.name, 0))
        }

        async fn update(
            &self,
            kind: DatasetKind,
            id: &str,
            draft: &NameDraft,
        ) -> BackendResult<RecordPayload> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("update {} {} {}", kind, id, draft.name));
            if self.fail_updates {
                return Err(BackendError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            Ok(payload(id, &draft.name, 118))
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(screen: &mut ManageScreen<ReportingFramework>, text: &str, tasks: &BackendTasks) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c)), tasks);
        }
    }

    async fn opened(
        backend: Arc<RecordingBackend>,
    ) -> (
        ManageScreen<ReportingFramework>,
        BackendTasks,
        UnboundedReceiver<AppEvent>,
    ) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tasks = BackendTasks::new(backend, tx);
        let mut screen = frameworks::screen(10).unwrap();

        screen.open(1, &tasks);
        assert!(screen.is_loading());
        match rx.recv().await.unwrap() {
            AppEvent::RecordsLoaded {
                session, result, ..
            } => {
                screen.apply_loaded(session, result);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(!screen.is_loading());
        (screen, tasks, rx)
    }

    async fn apply_next_save(
        screen: &mut ManageScreen<ReportingFramework>,
        rx: &mut UnboundedReceiver<AppEvent>,
    ) -> Option<ScreenAction> {
        match rx.recv().await.unwrap() {
            AppEvent::RecordSaved {
                session,
                record_id,
                result,
                ..
            } => screen.apply_saved(session, &record_id, result),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_then_cancel_makes_no_backend_call() {
        let backend = Arc::new(RecordingBackend::default());
        let (mut screen, tasks, _rx) = opened(Arc::clone(&backend)).await;

        let temp_id = screen.add();
        assert_eq!(screen.store().len(), 3);
        assert!(screen.is_capturing_input());

        screen.handle_key(key(KeyCode::Esc), &tasks);
        assert_eq!(screen.store().len(), 2);
        assert!(screen.store().get(&temp_id).is_none());
        assert_eq!(backend.calls(), vec!["list frameworks"]);
    }

    #[tokio::test]
    async fn test_add_type_and_save_creates_record() {
        let backend = Arc::new(RecordingBackend::default());
        let (mut screen, tasks, mut rx) = opened(Arc::clone(&backend)).await;

        let temp_id = screen.add();
        type_text(&mut screen, "New Standard", &tasks);
        let action = screen.handle_key(key(KeyCode::Enter), &tasks);
        assert_eq!(
            action,
            Some(ScreenAction::SetStatus("Saving 'New Standard'...".to_string()))
        );

        let action = apply_next_save(&mut screen, &mut rx).await;
        assert_eq!(
            action,
            Some(ScreenAction::SetStatus("Saved 'New Standard'".to_string()))
        );
        assert_eq!(
            backend.calls(),
            vec![
                "list frameworks".to_string(),
                r#"create frameworks {"name":"New Standard"}"#.to_string(),
            ]
        );

        assert!(screen.store().get(&temp_id).is_none());
        let saved = screen.store().get("1720000000000").unwrap();
        assert_eq!(saved.name(), "New Standard");
        assert!(!saved.is_new());
        assert!(!saved.is_editing());
        assert!(screen.table().edit_row("1720000000000").is_none());
    }

    #[tokio::test]
    async fn test_empty_new_row_save_is_implicit_cancel() {
        let backend = Arc::new(RecordingBackend::default());
        let (mut screen, tasks, _rx) = opened(Arc::clone(&backend)).await;

        screen.add();
        type_text(&mut screen, "   ", &tasks);
        screen.handle_key(key(KeyCode::Enter), &tasks);

        assert_eq!(screen.store().len(), 2);
        assert_eq!(backend.calls(), vec!["list frameworks"]);
    }

    #[tokio::test]
    async fn test_edit_existing_record_updates_by_id() {
        let backend = Arc::new(RecordingBackend::default());
        let (mut screen, tasks, mut rx) = opened(Arc::clone(&backend)).await;

        screen.apply_event(TableEvent::Edit { id: "1".to_string() }, &tasks);
        assert!(screen.store().get("1").unwrap().is_editing());
        assert!(!screen.store().get("4").unwrap().is_editing());

        type_text(&mut screen, " Updated", &tasks);
        screen.handle_key(key(KeyCode::Enter), &tasks);
        apply_next_save(&mut screen, &mut rx).await;

        let record = screen.store().get("1").unwrap();
        assert_eq!(record.name(), "ESRS Updated");
        assert_eq!(record.associated_count(), 118);
        assert!(!record.is_editing());
        assert_eq!(screen.store().position("1"), Some(0));
    }

    #[tokio::test]
    async fn test_whitespace_rename_never_reaches_backend() {
        let backend = Arc::new(RecordingBackend::default());
        let (mut screen, tasks, mut rx) = opened(Arc::clone(&backend)).await;

        screen.apply_event(TableEvent::Edit { id: "1".to_string() }, &tasks);
        for _ in 0.."ESRS".len() {
            screen.handle_key(key(KeyCode::Backspace), &tasks);
        }
        type_text(&mut screen, "   ", &tasks);
        screen.handle_key(key(KeyCode::Enter), &tasks);

        assert!(rx.try_recv().is_err());
        assert_eq!(backend.calls(), vec!["list frameworks"]);
        let row = screen.table().edit_row("1").unwrap();
        assert_eq!(row.buffer(), "   ");
        assert!(!row.is_saving());
        assert_eq!(screen.store().get("1").unwrap().name(), "ESRS");
    }

    #[tokio::test]
    async fn test_link_events_report_on_status_line() {
        let backend = Arc::new(RecordingBackend::default());
        let (mut screen, tasks, _rx) = opened(Arc::clone(&backend)).await;

        let action = screen.apply_event(
            TableEvent::OpenLink {
                target: "https://example.com/esrs".to_string(),
                new_context: true,
            },
            &tasks,
        );
        assert_eq!(
            action,
            ScreenAction::SetStatus("Opening https://example.com/esrs in a new window".to_string())
        );

        let action = screen.apply_event(
            TableEvent::OpenLink {
                target: "/frameworks/1".to_string(),
                new_context: false,
            },
            &tasks,
        );
        assert_eq!(action, ScreenAction::SetStatus("Navigate to /frameworks/1".to_string()));
        assert_eq!(backend.calls(), vec!["list frameworks"]);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_row_editing() {
        let backend = Arc::new(RecordingBackend {
            fail_updates: true,
            ..Default::default()
        });
        let (mut screen, tasks, mut rx) = opened(Arc::clone(&backend)).await;

        screen.edit("4");
        type_text(&mut screen, "!", &tasks);
        screen.handle_key(key(KeyCode::Enter), &tasks);
        assert!(screen.table().edit_row("4").unwrap().is_saving());

        let action = apply_next_save(&mut screen, &mut rx).await;
        assert!(matches!(action, Some(ScreenAction::SetError(_))));

        let record = screen.store().get("4").unwrap();
        assert_eq!(record.name(), "SASB");
        assert!(record.is_editing());
        let row = screen.table().edit_row("4").unwrap();
        assert!(!row.is_saving());
        assert_eq!(row.buffer(), "SASB!");
    }

    #[tokio::test]
    async fn test_stale_completions_are_dropped() {
        let backend = Arc::new(RecordingBackend::default());
        let (mut screen, tasks, mut rx) = opened(Arc::clone(&backend)).await;

        screen.add();
        type_text(&mut screen, "Late", &tasks);
        screen.handle_key(key(KeyCode::Enter), &tasks);
        screen.close();

        assert_eq!(apply_next_save(&mut screen, &mut rx).await, None);
        assert!(screen.store().is_empty());
    }

    #[tokio::test]
    async fn test_sort_event_cycles_and_reorders() {
        let backend = Arc::new(RecordingBackend::default());
        let (mut screen, tasks, _rx) = opened(backend).await;

        let sort_by = |field: &str| TableEvent::Sort {
            field: field.to_string(),
        };
        screen.apply_event(sort_by("associatedRfes"), &tasks);
        let names: Vec<&str> = screen.view().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["SASB", "ESRS"]);

        assert_eq!(
            screen.apply_event(sort_by("actions"), &tasks),
            ScreenAction::None
        );
        screen.apply_event(sort_by("associatedRfes"), &tasks);
        assert_eq!(
            screen.apply_event(sort_by("associatedRfes"), &tasks),
            ScreenAction::SetStatus("Sort cleared".to_string())
        );
        let names: Vec<&str> = screen.view().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["ESRS", "SASB"]);
    }
}
