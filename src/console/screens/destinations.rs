//! Manage Report Destinations dialog

use super::{reference_columns, ManageScreen};
use crate::console::table::{ConfigError, TableConfig};
use crate::models::ReportDestination;

pub type DestinationsScreen = ManageScreen<ReportDestination>;

pub fn table_config() -> Result<TableConfig, ConfigError> {
    TableConfig::new(reference_columns("RD #", "Report Destination"))
}

pub fn screen(page_size: usize) -> Result<DestinationsScreen, ConfigError> {
    Ok(ManageScreen::new(table_config()?, page_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_columns_only_when_listed() {
        let config = table_config().unwrap();
        let display = vec!["updatedOn".to_string()];
        let fields: Vec<&str> = config
            .resolve(Some(&display))
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(
            fields,
            vec!["number", "name", "associatedRfes", "actions", "updatedOn"]
        );
        assert_eq!(config.find("number").unwrap().label, "RD #");
    }
}
