//! Plain-text rendering of a record table for non-interactive output

use crate::console::table::cell::{record_value, render_cell};
use crate::console::table::{ColumnConfig, ColumnWidth};
use crate::console::ui::{pad_to_width, truncate_to_width};
use crate::models::ReferenceRecord;
use unicode_width::UnicodeWidthStr;

const MAX_AUTO_WIDTH: usize = 40;
const WIDE_WIDTH: usize = 28;

/// Header, separator and one line per record
pub fn render_plain<T: ReferenceRecord>(records: &[&T], columns: &[&ColumnConfig]) -> Vec<String> {
    let cells: Vec<Vec<String>> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let value = record_value(*record);
            columns
                .iter()
                .map(|column| render_cell(&value, column, index).display())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let content = cells.iter().map(|row| row[i].width()).max().unwrap_or(0);
            column_width(column, content)
        })
        .collect();

    let format_row = |values: Vec<String>| -> String {
        values
            .iter()
            .zip(widths.iter())
            .map(|(value, width)| pad_to_width(&truncate_to_width(value, *width), *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(format_row(columns.iter().map(|c| c.label.clone()).collect()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(cells.into_iter().map(format_row));
    lines
}

fn column_width(column: &ColumnConfig, content: usize) -> usize {
    let label = column.label.width();
    if column.wide {
        return WIDE_WIDTH.max(label);
    }
    match column.width {
        ColumnWidth::Fixed(cells) => (cells as usize).max(label),
        _ => content.max(label).min(MAX_AUTO_WIDTH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::screens::frameworks;
    use crate::models::{RecordPayload, ReportingFramework};

    fn framework(id: &str, name: &str, count: u32) -> ReportingFramework {
        ReportingFramework::from(RecordPayload {
            id: id.to_string(),
            name: name.to_string(),
            associated_active_rfe: count,
            updated_by: "Kishan".to_string(),
            updated_on: "04/07/2025".to_string(),
        })
    }

    #[test]
    fn test_plain_table_rows() {
        let config = frameworks::table_config().unwrap();
        let columns = config.resolve(None);
        let owned = vec![framework("1", "ESRS", 118), framework("2", "", 0)];
        let records: Vec<&ReportingFramework> = owned.iter().collect();

        let lines = render_plain(&records, &columns);
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("RF #   | Reporting Framework"));
        assert!(lines[1].starts_with("-------+-"));

        let first: Vec<&str> = lines[2].split(" | ").map(str::trim).collect();
        assert_eq!(first, vec!["1", "ESRS", "118", "[✎ Edit]"]);

        let second: Vec<&str> = lines[3].split(" | ").map(str::trim).collect();
        assert_eq!(second, vec!["2", "-", "0", "[✎ Edit]"]);
    }

    #[test]
    fn test_auto_width_is_capped() {
        let column = ColumnConfig::text("notes", "notes", "Notes");
        assert_eq!(column_width(&column, 3), 5);
        assert_eq!(column_width(&column, 80), MAX_AUTO_WIDTH);
    }
}
