//! Reusable UI components for the reporting console

pub mod data_table;
pub mod status_display;

pub use data_table::{DataTable, TableResponse};
pub use status_display::{StatusDisplay, StatusMessage, StatusType};
