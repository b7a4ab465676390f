//! Generic record table driven by column configuration
//!
//! The table never mutates records. It keeps selection, paging, the column
//! cursor and the inline edit rows, and reports everything else to its
//! owner as a [`TableEvent`].

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::config::PAGE_SIZE_OPTIONS;
use crate::console::handlers::CommonKeyHandler;
use crate::console::table::cell::{record_value, render_cell, CellContent, PLACEHOLDER};
use crate::console::table::{
    ColumnConfig, ColumnType, EditOutcome, EditRow, SortState, TableEvent,
};
use crate::console::traits::{Navigable, Paginated};
use crate::console::ui::{truncate_to_width, Styles};
use crate::models::ReferenceRecord;

const HIGHLIGHT_SYMBOL: &str = "▶ ";

/// Result of offering a key to the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableResponse {
    Unhandled,
    Handled,
    Event(TableEvent),
}

pub struct DataTable {
    state: TableState,
    selected: Option<usize>,
    current_page: usize,
    items_per_page: usize,
    column_cursor: usize,
    item_count: usize,
    edit_rows: HashMap<String, EditRow>,
    focused_edit: Option<String>,
}

impl DataTable {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            state: TableState::default(),
            selected: None,
            current_page: 0,
            items_per_page: items_per_page.max(1),
            column_cursor: 0,
            item_count: 0,
            edit_rows: HashMap::new(),
            focused_edit: None,
        }
    }

    /// Back to the first page with nothing selected or mounted
    pub fn reset(&mut self) {
        self.state = TableState::default();
        self.selected = None;
        self.current_page = 0;
        self.column_cursor = 0;
        self.item_count = 0;
        self.edit_rows.clear();
        self.focused_edit = None;
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn column_cursor(&self) -> usize {
        self.column_cursor
    }

    pub fn edit_row(&self, id: &str) -> Option<&EditRow> {
        self.edit_rows.get(id)
    }

    pub fn focused_edit(&self) -> Option<&str> {
        self.focused_edit.as_deref()
    }

    /// Whether keystrokes currently go to an edit input
    pub fn is_capturing_input(&self) -> bool {
        self.focused_edit.is_some()
    }

    /// Reconcile edit rows and selection with the current display order.
    ///
    /// Rows for records that stopped editing are unmounted. A newly mounted
    /// row takes input focus; a new record's row is also selected so its
    /// page is shown.
    pub fn sync<T: ReferenceRecord>(&mut self, view: &[&T]) {
        self.edit_rows
            .retain(|id, _| view.iter().any(|r| r.id() == id && r.is_editing()));
        if let Some(id) = &self.focused_edit {
            if !self.edit_rows.contains_key(id) {
                self.focused_edit = None;
            }
        }

        let mut mounted = None;
        let mut mounted_new = None;
        for (index, record) in view.iter().enumerate() {
            if !record.is_editing() {
                continue;
            }
            match self.edit_rows.get_mut(record.id()) {
                Some(row) => row.sync_name(record.name()),
                None => {
                    self.edit_rows
                        .insert(record.id().to_string(), EditRow::mount(*record));
                    mounted = Some(record.id().to_string());
                    if record.is_new() {
                        mounted_new = Some(index);
                    }
                }
            }
        }

        self.item_count = view.len();
        if let Some(id) = mounted {
            self.focus_edit(&id);
        }
        match mounted_new {
            Some(index) => self.set_selected_index(Some(index)),
            None => self.clamp_selection(),
        }
    }

    /// Owner reported a failed save for a row
    pub fn save_failed(&mut self, id: &str) {
        if let Some(row) = self.edit_rows.get_mut(id) {
            row.save_failed();
        }
    }

    fn focus_edit(&mut self, id: &str) {
        for (row_id, row) in self.edit_rows.iter_mut() {
            row.set_focus(row_id == id);
        }
        self.focused_edit = Some(id.to_string());
    }

    fn unfocus_edit(&mut self) {
        if let Some(id) = self.focused_edit.take() {
            if let Some(row) = self.edit_rows.get_mut(&id) {
                row.set_focus(false);
            }
        }
    }

    fn clamp_selection(&mut self) {
        if self.item_count == 0 {
            self.selected = None;
            self.current_page = 0;
            self.state.select(None);
            return;
        }
        let index = self.selected.unwrap_or(0).min(self.item_count - 1);
        self.set_selected_index(Some(index));
    }

    /// Absolute index of the selected row in the display order
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn page_range(&self) -> (usize, usize) {
        let start = self.current_page * self.items_per_page;
        let end = (start + self.items_per_page).min(self.item_count);
        (start.min(end), end)
    }

    /// Cycle through the rows-per-page options
    pub fn cycle_page_size(&mut self, forward: bool) {
        let position = PAGE_SIZE_OPTIONS
            .iter()
            .position(|size| *size == self.items_per_page)
            .unwrap_or(0);
        let next = if forward {
            (position + 1).min(PAGE_SIZE_OPTIONS.len() - 1)
        } else {
            position.saturating_sub(1)
        };
        self.items_per_page = PAGE_SIZE_OPTIONS[next];
        let selected = self.selected;
        match selected {
            Some(index) => self.set_selected_index(Some(index)),
            None => self.current_page = 0,
        }
    }

    /// Offer a key to the table
    pub fn handle_key<T: ReferenceRecord>(
        &mut self,
        key: KeyEvent,
        view: &[&T],
        columns: &[&ColumnConfig],
    ) -> TableResponse {
        if let Some(id) = self.focused_edit.clone() {
            if let Some(response) = self.handle_edit_key(&id, key) {
                return response;
            }
        }

        if CommonKeyHandler::handle_navigation_keys(self, key).is_some()
            || CommonKeyHandler::handle_pagination_keys(self, key).is_some()
        {
            return TableResponse::Handled;
        }

        match key.code {
            KeyCode::Left => {
                self.column_cursor = self.column_cursor.saturating_sub(1);
                TableResponse::Handled
            }
            KeyCode::Right => {
                if self.column_cursor + 1 < columns.len() {
                    self.column_cursor += 1;
                }
                TableResponse::Handled
            }
            KeyCode::Char('[') => {
                self.cycle_page_size(false);
                TableResponse::Handled
            }
            KeyCode::Char(']') => {
                self.cycle_page_size(true);
                TableResponse::Handled
            }
            KeyCode::Char('s') => match columns.get(self.column_cursor) {
                Some(column) => TableResponse::Event(TableEvent::Sort {
                    field: column.field.clone(),
                }),
                None => TableResponse::Handled,
            },
            KeyCode::Char('e') => self.edit_selected(view),
            KeyCode::Char('x') => self.cancel_selected(view),
            KeyCode::Enter => self.activate_selected(view, columns),
            _ => TableResponse::Unhandled,
        }
    }

    /// Keys routed to the focused edit input; `None` falls through
    fn handle_edit_key(&mut self, id: &str, key: KeyEvent) -> Option<TableResponse> {
        let outcome = {
            let row = self.edit_rows.get_mut(id)?;
            match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    row.insert_char(c);
                    None
                }
                KeyCode::Backspace => {
                    row.backspace();
                    None
                }
                KeyCode::Delete => {
                    row.delete();
                    None
                }
                KeyCode::Left => {
                    row.move_left();
                    None
                }
                KeyCode::Right => {
                    row.move_right();
                    None
                }
                KeyCode::Home => {
                    row.move_home();
                    None
                }
                KeyCode::End => {
                    row.move_end();
                    None
                }
                KeyCode::Enter => Some(row.request_save()),
                KeyCode::Esc => Some(row.request_cancel()),
                KeyCode::Tab => {
                    self.unfocus_edit();
                    return Some(TableResponse::Handled);
                }
                KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown => {
                    self.unfocus_edit();
                    return None;
                }
                _ => return Some(TableResponse::Handled),
            }
        };

        Some(match outcome {
            Some(outcome) => self.outcome_response(outcome),
            None => TableResponse::Handled,
        })
    }

    fn outcome_response(&mut self, outcome: EditOutcome) -> TableResponse {
        match outcome {
            EditOutcome::Save { id, name } => TableResponse::Event(TableEvent::Save { id, name }),
            EditOutcome::Cancel { id } | EditOutcome::Remove { id } => {
                TableResponse::Event(TableEvent::Cancel { id })
            }
            EditOutcome::Inert => TableResponse::Handled,
        }
    }

    fn selected_record<'a, T: ReferenceRecord>(&self, view: &[&'a T]) -> Option<&'a T> {
        self.selected.and_then(|index| view.get(index).copied())
    }

    fn edit_selected<T: ReferenceRecord>(&mut self, view: &[&T]) -> TableResponse {
        let Some(record) = self.selected_record(view) else {
            return TableResponse::Handled;
        };
        if self.edit_rows.contains_key(record.id()) {
            self.focus_edit(record.id());
            TableResponse::Handled
        } else {
            TableResponse::Event(TableEvent::Edit {
                id: record.id().to_string(),
            })
        }
    }

    fn cancel_selected<T: ReferenceRecord>(&mut self, view: &[&T]) -> TableResponse {
        let Some(record) = self.selected_record(view) else {
            return TableResponse::Handled;
        };
        match self.edit_rows.get_mut(record.id()) {
            Some(row) => {
                let outcome = row.request_cancel();
                self.outcome_response(outcome)
            }
            None => TableResponse::Handled,
        }
    }

    fn activate_selected<T: ReferenceRecord>(
        &mut self,
        view: &[&T],
        columns: &[&ColumnConfig],
    ) -> TableResponse {
        let (Some(index), Some(column)) = (self.selected, columns.get(self.column_cursor)) else {
            return TableResponse::Handled;
        };
        let Some(record) = view.get(index).copied() else {
            return TableResponse::Handled;
        };

        if self.edit_rows.contains_key(record.id()) {
            if column.column_type == ColumnType::Actions {
                if let Some(row) = self.edit_rows.get_mut(record.id()) {
                    let outcome = row.request_save();
                    return self.outcome_response(outcome);
                }
            }
            self.focus_edit(record.id());
            return TableResponse::Handled;
        }

        let value = record_value(record);
        match render_cell(&value, column, index) {
            CellContent::EditAction => TableResponse::Event(TableEvent::Edit {
                id: record.id().to_string(),
            }),
            CellContent::Link {
                target,
                new_context,
                ..
            } => TableResponse::Event(TableEvent::OpenLink {
                target,
                new_context,
            }),
            CellContent::Chips { chips, .. } => match chips.into_iter().find_map(|c| c.link) {
                Some(target) => TableResponse::Event(TableEvent::OpenLink {
                    target,
                    new_context: true,
                }),
                None => TableResponse::Handled,
            },
            CellContent::Fallback(_) => TableResponse::Event(TableEvent::Custom {
                field: column.field.clone(),
                id: record.id().to_string(),
            }),
            _ => TableResponse::Handled,
        }
    }

    /// Draw the table, its pagination footer and the selected cell detail
    pub fn render<T: ReferenceRecord>(
        &mut self,
        f: &mut Frame,
        area: Rect,
        view: &[&T],
        columns: &[&ColumnConfig],
        sort: &SortState,
        loading: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        if view.is_empty() {
            let lines = if loading {
                vec![Line::from(Span::styled("⟳ Loading...", Styles::warning()))]
            } else {
                vec![
                    Line::from(Span::styled("No records found", Styles::title())),
                    Line::from(Span::styled(
                        "Press 'a' (Add New) to create your first entry",
                        Styles::inactive(),
                    )),
                ]
            };
            let empty = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block);
            f.render_widget(empty, chunks[0]);
            return;
        }

        let constraints: Vec<Constraint> = columns.iter().map(|c| c.constraint()).collect();
        let inner = block.inner(chunks[0]);
        let symbol_width = HIGHLIGHT_SYMBOL.chars().count() as u16;
        let content = Rect {
            x: inner.x + symbol_width.min(inner.width),
            width: inner.width.saturating_sub(symbol_width),
            ..inner
        };
        let widths: Vec<usize> = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints.clone())
            .split(content)
            .iter()
            .map(|rect| (rect.width as usize).saturating_sub(1))
            .collect();

        let header = Row::new(columns.iter().enumerate().map(|(i, column)| {
            let style = if i == self.column_cursor {
                Styles::header().add_modifier(Modifier::REVERSED)
            } else {
                Styles::header()
            };
            Cell::from(
                Line::from(Span::styled(
                    format!("{}{}", column.label, sort.indicator(column)),
                    style,
                ))
                .alignment(column.alignment()),
            )
        }));

        let (start, end) = self.page_range();
        let rows: Vec<Row> = view[start..end]
            .iter()
            .enumerate()
            .map(|(offset, record)| {
                let index = start + offset;
                let value = record_value(*record);
                let edit_row = self.edit_rows.get(record.id());
                let cells: Vec<Cell> = columns
                    .iter()
                    .zip(widths.iter())
                    .map(|(column, width)| {
                        let line = match edit_row {
                            Some(row) => edit_cell_line(row, *record, &value, column, index),
                            None => fit(render_cell(&value, column, index), *width)
                                .to_line(column.alignment()),
                        };
                        Cell::from(line)
                    })
                    .collect();

                let row = Row::new(cells);
                if record.is_new() {
                    row.style(Styles::new_row())
                } else {
                    row
                }
            })
            .collect();

        let table = Table::new(rows, constraints)
            .header(header)
            .block(block)
            .highlight_style(Styles::selected())
            .highlight_symbol(HIGHLIGHT_SYMBOL);

        self.state
            .select(self.selected.filter(|i| *i >= start && *i < end).map(|i| i - start));
        f.render_stateful_widget(table, chunks[0], &mut self.state);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(
                    "Page {} of {}",
                    self.current_page + 1,
                    self.get_total_pages()
                ),
                Styles::info(),
            ),
            Span::styled(
                format!(
                    "  {} records  Rows per page: {} ([ / ])",
                    self.item_count, self.items_per_page
                ),
                Styles::inactive(),
            ),
        ]));
        f.render_widget(footer, chunks[1]);

        let detail = Paragraph::new(self.detail_line(view, columns));
        f.render_widget(detail, chunks[2]);
    }

    fn detail_line<T: ReferenceRecord>(&self, view: &[&T], columns: &[&ColumnConfig]) -> Line<'static> {
        if let Some(row) = self.focused_edit.as_ref().and_then(|id| self.edit_rows.get(id)) {
            let hint = if row.is_saving() {
                "Saving...".to_string()
            } else if row.is_new() && row.buffer().trim().is_empty() {
                "Enter: discard row  Esc: cancel  Tab: leave input".to_string()
            } else if row.can_save() {
                "Enter: save  Esc: cancel  Tab: leave input".to_string()
            } else {
                "Enter: save (disabled)  Esc: cancel  Tab: leave input".to_string()
            };
            return Line::from(Span::styled(hint, Styles::inactive()));
        }

        let (Some(index), Some(column)) = (self.selected, columns.get(self.column_cursor)) else {
            return Line::default();
        };
        let Some(record) = view.get(index) else {
            return Line::default();
        };

        let cell = render_cell(&record_value(*record), column, index);
        let text = cell.title().unwrap_or_else(|| cell.display());
        Line::from(vec![
            Span::styled(format!("{}: ", column.label), Styles::header()),
            Span::raw(text),
        ])
    }
}

/// Cell line for a row in edit mode
fn edit_cell_line<T: ReferenceRecord>(
    row: &EditRow,
    record: &T,
    value: &serde_json::Value,
    column: &ColumnConfig,
    index: usize,
) -> Line<'static> {
    if column.editable {
        return row.input().to_line();
    }
    match column.column_type {
        ColumnType::Actions => {
            if row.is_saving() {
                return Line::from(Span::styled("⟳", Styles::warning())).alignment(column.alignment());
            }
            let save_style = if row.can_save() {
                Styles::success()
            } else {
                Styles::disabled()
            };
            Line::from(vec![
                Span::styled("[✓]", save_style),
                Span::raw(" "),
                Span::styled("[✗]", Styles::error()),
            ])
            .alignment(column.alignment())
        }
        ColumnType::Number if record.is_new() && !column.row_index => {
            Line::from(Span::styled(PLACEHOLDER, Styles::inactive())).alignment(column.alignment())
        }
        _ => render_cell(value, column, index).to_line(column.alignment()),
    }
}

/// Shorten text-like cells to the rendered column width
fn fit(content: CellContent, width: usize) -> CellContent {
    match content {
        CellContent::Text(text) => CellContent::Text(truncate_to_width(&text, width)),
        CellContent::Link {
            label,
            target,
            new_context,
        } => CellContent::Link {
            label: truncate_to_width(&label, width),
            target,
            new_context,
        },
        other => other,
    }
}

impl Navigable for DataTable {
    fn navigate_up(&mut self) {
        if let Some(index) = self.selected {
            self.set_selected_index(Some(index.saturating_sub(1)));
        } else if self.item_count > 0 {
            self.set_selected_index(Some(0));
        }
    }

    fn navigate_down(&mut self) {
        match self.selected {
            Some(index) if index + 1 < self.item_count => self.set_selected_index(Some(index + 1)),
            None if self.item_count > 0 => self.set_selected_index(Some(0)),
            _ => {}
        }
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.selected
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.selected = index.filter(|i| *i < self.item_count);
        if let Some(i) = self.selected {
            self.current_page = i / self.items_per_page;
        }
    }

    fn get_item_count(&self) -> usize {
        self.item_count
    }
}

impl Paginated for DataTable {
    fn get_current_page(&self) -> usize {
        self.current_page
    }

    fn set_current_page(&mut self, page: usize) {
        let page = page.min(self.get_total_pages() - 1);
        self.current_page = page;
        if self.item_count > 0 {
            self.selected = Some(page * self.items_per_page);
        }
    }

    fn get_total_pages(&self) -> usize {
        self.item_count.div_ceil(self.items_per_page).max(1)
    }

    fn get_items_per_page(&self) -> usize {
        self.items_per_page
    }
}
