//! Configuration-driven table core: columns, cells, sorting and inline editing

pub mod cell;
pub mod columns;
pub mod edit_row;
pub mod sort;

pub use cell::{render_cell, CellContent};
pub use columns::{ColumnConfig, ColumnType, ColumnWidth, ConfigError, TableConfig};
pub use edit_row::{EditOutcome, EditPhase, EditRow};
pub use sort::{SortDirection, SortState};

/// Events the table reports to the screen that owns the records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Edit { id: String },
    Save { id: String, name: String },
    Cancel { id: String },
    Sort { field: String },
    OpenLink { target: String, new_context: bool },
    Custom { field: String, id: String },
}
