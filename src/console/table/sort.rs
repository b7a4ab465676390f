//! Tri-state, single-column sort controller

use std::cmp::Ordering;

use serde_json::Value;

use super::columns::ColumnConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    Descending,
    #[default]
    None,
}

impl SortDirection {
    pub fn as_str(&self) -> &str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
            SortDirection::None => "none",
        }
    }
}

/// Sort intent for one table; at most one field is active
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    field: Option<String>,
    direction: SortDirection,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn is_active(&self, field: &str) -> bool {
        self.field.as_deref() == Some(field) && self.direction != SortDirection::None
    }

    /// Advance the sort cycle for `field`.
    ///
    /// Returns false and leaves the state untouched when the column is
    /// unknown or not sortable.
    pub fn activate(&mut self, field: &str, columns: &[&ColumnConfig]) -> bool {
        let sortable = columns
            .iter()
            .any(|column| column.field == field && column.sortable);
        if !sortable {
            return false;
        }

        let is_current = self.field.as_deref() == Some(field);
        match (is_current, self.direction) {
            (true, SortDirection::Ascending) => {
                self.direction = SortDirection::Descending;
            }
            (true, SortDirection::Descending) => {
                self.direction = SortDirection::None;
                self.field = None;
            }
            _ => {
                self.field = Some(field.to_string());
                self.direction = SortDirection::Ascending;
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.field = None;
        self.direction = SortDirection::None;
    }

    /// Header indicator for a column
    pub fn indicator(&self, column: &ColumnConfig) -> &'static str {
        if !column.sortable {
            return "";
        }
        if self.field.as_deref() != Some(column.field.as_str()) {
            return " ↕";
        }
        match self.direction {
            SortDirection::Ascending => " ↑",
            SortDirection::Descending => " ↓",
            SortDirection::None => " ↕",
        }
    }
}

/// Order two resolved cell values; missing values compare greater
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (present(a), present(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => {
                let x = x.as_f64().unwrap_or_default();
                let y = y.as_f64().unwrap_or_default();
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
            (x, y) => x.to_string().to_lowercase().cmp(&y.to_string().to_lowercase()),
        },
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v) => Some(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<ColumnConfig> {
        vec![
            ColumnConfig::text("name", "name", "Name").sortable(),
            ColumnConfig::number("count", "count", "Count").sortable(),
            ColumnConfig::actions("actions", "Actions"),
        ]
    }

    #[test]
    fn test_cycle_returns_to_none_after_three_steps() {
        let owned = columns();
        let columns: Vec<&ColumnConfig> = owned.iter().collect();
        let mut sort = SortState::new();

        assert!(sort.activate("name", &columns));
        assert_eq!(sort.field(), Some("name"));
        assert_eq!(sort.direction(), SortDirection::Ascending);

        assert!(sort.activate("name", &columns));
        assert_eq!(sort.direction(), SortDirection::Descending);

        assert!(sort.activate("name", &columns));
        assert_eq!(sort.field(), None);
        assert_eq!(sort.direction(), SortDirection::None);

        assert!(sort.activate("name", &columns));
        assert_eq!(sort.direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_non_sortable_column_is_inert() {
        let owned = columns();
        let columns: Vec<&ColumnConfig> = owned.iter().collect();
        let mut sort = SortState::new();

        for _ in 0..3 {
            assert!(!sort.activate("actions", &columns));
            assert_eq!(sort, SortState::new());
        }

        sort.activate("count", &columns);
        let before = sort.clone();
        assert!(!sort.activate("unknown", &columns));
        assert_eq!(sort, before);
    }

    #[test]
    fn test_activating_other_field_replaces_previous() {
        let owned = columns();
        let columns: Vec<&ColumnConfig> = owned.iter().collect();
        let mut sort = SortState::new();

        sort.activate("name", &columns);
        sort.activate("name", &columns);
        sort.activate("count", &columns);

        assert_eq!(sort.field(), Some("count"));
        assert_eq!(sort.direction(), SortDirection::Ascending);
        assert!(!sort.is_active("name"));
    }

    #[test]
    fn test_indicators() {
        let owned = columns();
        let columns: Vec<&ColumnConfig> = owned.iter().collect();
        let mut sort = SortState::new();

        assert_eq!(sort.indicator(columns[0]), " ↕");
        assert_eq!(sort.indicator(columns[2]), "");

        sort.activate("name", &columns);
        assert_eq!(sort.indicator(columns[0]), " ↑");
        sort.activate("name", &columns);
        assert_eq!(sort.indicator(columns[0]), " ↓");
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(
            compare_values(Some(&json!(4)), Some(&json!(118))),
            Ordering::Less
        );
        assert_eq!(
            compare_values(Some(&json!("sasb")), Some(&json!("GRI"))),
            Ordering::Greater
        );
        assert_eq!(compare_values(None, Some(&json!("a"))), Ordering::Greater);
        assert_eq!(compare_values(Some(&json!("")), None), Ordering::Equal);
    }
}
