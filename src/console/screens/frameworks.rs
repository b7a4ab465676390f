//! Manage Reporting Frameworks dialog

use super::{reference_columns, ManageScreen};
use crate::console::table::{ConfigError, TableConfig};
use crate::models::ReportingFramework;

pub type FrameworksScreen = ManageScreen<ReportingFramework>;

pub fn table_config() -> Result<TableConfig, ConfigError> {
    TableConfig::new(reference_columns("RF #", "Reporting Framework"))
}

pub fn screen(page_size: usize) -> Result<FrameworksScreen, ConfigError> {
    Ok(ManageScreen::new(table_config()?, page_size))
}
