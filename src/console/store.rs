//! Ordered record collection owned by a management screen

use std::cmp::Ordering;

use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use crate::console::table::cell::{lookup, record_value};
use crate::console::table::sort::{compare_values, SortDirection, SortState};
use crate::console::table::TableConfig;
use crate::models::ReferenceRecord;

#[derive(Debug, Clone)]
pub struct RecordStore<T: ReferenceRecord> {
    records: Vec<T>,
    last_temp_millis: i64,
}

impl<T: ReferenceRecord> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            last_temp_millis: 0,
        }
    }
}

impl<T: ReferenceRecord> RecordStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, records: Vec<T>) {
        self.records = records;
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Append a new editing record with a fresh temporary id
    pub fn add_draft(&mut self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        if millis <= self.last_temp_millis {
            millis = self.last_temp_millis + 1;
        }
        self.last_temp_millis = millis;

        let temp_id = format!("temp-{}", millis);
        self.records.push(T::draft(temp_id.clone()));
        temp_id
    }

    /// Flag one record as editing; other rows are left alone
    pub fn begin_edit(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                record.set_editing(true);
                true
            }
            None => false,
        }
    }

    /// Drop an unsaved record, or leave edit mode for a persisted one.
    ///
    /// Returns true when the record was removed.
    pub fn cancel(&mut self, id: &str) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        if self.records[index].is_new() {
            self.records.remove(index);
            true
        } else {
            self.records[index].set_editing(false);
            false
        }
    }

    /// Replace a record by id with the backend representation.
    ///
    /// A record that is no longer present is ignored.
    pub fn apply_saved(&mut self, id: &str, mut saved: T) -> bool {
        match self.records.iter_mut().find(|r| r.id() == id) {
            Some(slot) => {
                saved.mark_persisted();
                *slot = saved;
                true
            }
            None => {
                debug!("Saved record {} is no longer in the store", id);
                false
            }
        }
    }

    /// Records in display order for the given sort intent.
    ///
    /// The row index column keeps insertion order; its descending sort
    /// reverses it.
    pub fn sorted(&self, sort: &SortState, config: &TableConfig) -> Vec<&T> {
        let mut view: Vec<&T> = self.records.iter().collect();

        let (Some(field), direction) = (sort.field(), sort.direction()) else {
            return view;
        };
        if direction == SortDirection::None {
            return view;
        }
        let Some(column) = config.find(field) else {
            return view;
        };

        if column.row_index {
            if direction == SortDirection::Descending {
                view.reverse();
            }
            return view;
        }

        let mut keyed: Vec<(Option<Value>, &T)> = view
            .into_iter()
            .map(|record| {
                let value = record_value(record);
                (lookup(&value, &column.path).cloned(), record)
            })
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ordering = compare_values(a.as_ref(), b.as_ref());
            match direction {
                SortDirection::Descending => descending(ordering, a.as_ref(), b.as_ref()),
                _ => ordering,
            }
        });

        keyed.into_iter().map(|(_, record)| record).collect()
    }
}

/// Reverse an ordering but keep missing values at the end
fn descending(ordering: Ordering, a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let missing = |v: Option<&Value>| compare_values(v, None) == Ordering::Equal;
    match (missing(a), missing(b)) {
        (true, false) | (false, true) => ordering,
        _ => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::table::ColumnConfig;
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

    fn store() -> RecordStore<ReportingFramework> {
        let mut store = RecordStore::new();
        store.replace_all(vec![
            framework("1", "ESRS", 118),
            framework("2", "India BSRS", 19),
            framework("4", "SASB", 3),
            framework("5", "GRI", 5),
        ]);
        store
    }

    fn config() -> TableConfig {
        TableConfig::new(vec![
            ColumnConfig::row_index("number", "RF #").sortable(),
            ColumnConfig::text("name", "name", "Reporting Framework").sortable(),
            ColumnConfig::number("associatedRfes", "associatedActiveRfe", "Count").sortable(),
        ])
        .unwrap()
    }

    fn names(view: &[&ReportingFramework]) -> Vec<String> {
        view.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_add_draft_appends_new_editing_record() {
        let mut store = store();
        let first = store.add_draft();
        let second = store.add_draft();

        assert!(first.starts_with("temp-"));
        assert_ne!(first, second);
        assert_eq!(store.len(), 6);

        let draft = store.get(&first).unwrap();
        assert!(draft.is_new());
        assert!(draft.is_editing());
        assert_eq!(store.position(&first), Some(4));
    }

    #[test]
    fn test_cancel_new_removes_and_existing_clears_flag() {
        let mut store = store();
        let temp = store.add_draft();
        assert!(store.cancel(&temp));
        assert_eq!(store.len(), 4);
        assert!(store.get(&temp).is_none());

        assert!(store.begin_edit("2"));
        assert!(!store.cancel("2"));
        assert!(!store.get("2").unwrap().is_editing());
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_begin_edit_only_touches_target() {
        let mut store = store();
        store.begin_edit("1");
        store.begin_edit("4");
        let editing: Vec<&str> = store
            .records()
            .iter()
            .filter(|r| r.is_editing())
            .map(|r| r.id())
            .collect();
        assert_eq!(editing, vec!["1", "4"]);
        assert!(!store.begin_edit("missing"));
    }

    #[test]
    fn test_apply_saved_replaces_by_id() {
        let mut store = store();
        let temp = store.add_draft();

        assert!(store.apply_saved(&temp, framework("1720000000000", "New Standard", 0)));
        let saved = store.get("1720000000000").unwrap();
        assert!(!saved.is_new());
        assert!(!saved.is_editing());
        assert_eq!(store.position("1720000000000"), Some(4));
        assert!(store.get(&temp).is_none());

        assert!(!store.apply_saved("gone", framework("9", "X", 0)));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_sorted_by_name_and_count() {
        let store = store();
        let config = config();
        let columns = config.resolve(None);
        let mut sort = SortState::new();

        sort.activate("name", &columns);
        assert_eq!(
            names(&store.sorted(&sort, &config)),
            vec!["ESRS", "GRI", "India BSRS", "SASB"]
        );

        sort.activate("name", &columns);
        assert_eq!(
            names(&store.sorted(&sort, &config)),
            vec!["SASB", "India BSRS", "GRI", "ESRS"]
        );

        sort.activate("associatedRfes", &columns);
        assert_eq!(
            names(&store.sorted(&sort, &config)),
            vec!["SASB", "GRI", "India BSRS", "ESRS"]
        );
    }

    #[test]
    fn test_sorted_keeps_missing_names_last() {
        let mut store = store();
        store.add_draft();
        let config = config();
        let columns = config.resolve(None);
        let mut sort = SortState::new();

        sort.activate("name", &columns);
        assert_eq!(names(&store.sorted(&sort, &config)).last().unwrap(), "");

        sort.activate("name", &columns);
        assert_eq!(names(&store.sorted(&sort, &config)).last().unwrap(), "");
    }

    #[test]
    fn test_row_index_sort_uses_insertion_order() {
        let store = store();
        let config = config();
        let columns = config.resolve(None);
        let mut sort = SortState::new();

        assert_eq!(
            names(&store.sorted(&sort, &config)),
            vec!["ESRS", "India BSRS", "SASB", "GRI"]
        );
        sort.activate("number", &columns);
        sort.activate("number", &columns);
        assert_eq!(
            names(&store.sorted(&sort, &config)),
            vec!["GRI", "SASB", "India BSRS", "ESRS"]
        );
    }
}
