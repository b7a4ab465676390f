//! Screens of the reporting console

pub mod destinations;
pub mod frameworks;
pub mod home;
pub mod manage;

pub use destinations::DestinationsScreen;
pub use frameworks::FrameworksScreen;
pub use home::HomeScreen;
pub use manage::ManageScreen;

use ratatui::layout::Alignment;

use crate::console::table::{ColumnConfig, ColumnWidth};

/// Columns shared by both reference datasets
pub(crate) fn reference_columns(index_label: &str, name_label: &str) -> Vec<ColumnConfig> {
    vec![
        ColumnConfig::row_index("number", index_label)
            .sortable()
            .width(ColumnWidth::Fixed(6))
            .order(1),
        ColumnConfig::text("name", "name", name_label)
            .sortable()
            .editable()
            .wide()
            .order(2),
        ColumnConfig::number("associatedRfes", "associatedActiveRfe", "# of Associated RFEs")
            .sortable()
            .width(ColumnWidth::Fixed(22))
            .align(Alignment::Center)
            .order(3),
        ColumnConfig::actions("actions", "Actions")
            .width(ColumnWidth::Fixed(9))
            .order(4),
        ColumnConfig::date("updatedOn", "updatedOn", "Updated On")
            .sortable()
            .group("audit")
            .hidden()
            .width(ColumnWidth::Fixed(12))
            .order(5),
        ColumnConfig::text("updatedBy", "updatedBy", "Updated By")
            .group("audit")
            .hidden()
            .width(ColumnWidth::Fixed(14))
            .order(6),
    ]
}
