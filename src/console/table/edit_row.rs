//! Inline edit row state machine
//!
//! An `EditRow` exists while its record is flagged as editing. It owns the
//! transient name buffer and decides what save and cancel mean; the owning
//! screen performs every change to the record itself.

use crate::console::ui::InputField;
use crate::models::ReferenceRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Editing,
    /// Save requested, waiting for the owner to finish the backend call
    Saving,
}

/// Result of a save or cancel request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Persist the record under the trimmed name
    Save { id: String, name: String },
    /// Leave edit mode without changes
    Cancel { id: String },
    /// Drop the never-saved record from the collection
    Remove { id: String },
    /// Control is disabled; nothing happens
    Inert,
}

#[derive(Debug, Clone)]
pub struct EditRow {
    record_id: String,
    is_new: bool,
    original: String,
    input: InputField,
    dirty: bool,
    phase: EditPhase,
}

impl EditRow {
    /// Enter edit mode for a record; the new row takes input focus
    pub fn mount<T: ReferenceRecord>(record: &T) -> Self {
        let mut input = InputField::new()
            .with_placeholder("Enter name")
            .with_value(record.name());
        input.set_focus(true);

        Self {
            record_id: record.id().to_string(),
            is_new: record.is_new(),
            original: record.name().to_string(),
            input,
            dirty: false,
            phase: EditPhase::Editing,
        }
    }

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn buffer(&self) -> &str {
        &self.input.value
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    pub fn is_saving(&self) -> bool {
        self.phase == EditPhase::Saving
    }

    pub fn is_focused(&self) -> bool {
        self.input.is_focused
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.input.set_focus(focused);
    }

    fn recompute_dirty(&mut self) {
        self.dirty = self.input.value != self.original;
    }

    /// Apply an editing operation unless a save is in flight
    fn edit(&mut self, op: impl FnOnce(&mut InputField)) {
        if self.is_saving() {
            return;
        }
        op(&mut self.input);
        self.recompute_dirty();
    }

    pub fn insert_char(&mut self, c: char) {
        self.edit(|input| input.insert_char(c));
    }

    pub fn backspace(&mut self) {
        self.edit(InputField::delete_char);
    }

    pub fn delete(&mut self) {
        self.edit(InputField::delete_char_forward);
    }

    pub fn set_buffer(&mut self, value: &str) {
        self.edit(|input| input.set_value(value));
    }

    pub fn move_left(&mut self) {
        self.input.move_cursor_left();
    }

    pub fn move_right(&mut self) {
        self.input.move_cursor_right();
    }

    pub fn move_home(&mut self) {
        self.input.move_cursor_to_start();
    }

    pub fn move_end(&mut self) {
        self.input.move_cursor_to_end();
    }

    /// Whether the save control is enabled
    pub fn can_save(&self) -> bool {
        if self.is_saving() {
            return false;
        }
        let trimmed_empty = self.input.value.trim().is_empty();
        if self.is_new {
            !trimmed_empty
        } else {
            !trimmed_empty && self.dirty
        }
    }

    pub fn request_save(&mut self) -> EditOutcome {
        if self.is_saving() {
            return EditOutcome::Inert;
        }
        if self.is_new && self.input.value.trim().is_empty() {
            return EditOutcome::Remove {
                id: self.record_id.clone(),
            };
        }
        if !self.can_save() {
            return EditOutcome::Inert;
        }

        self.phase = EditPhase::Saving;
        EditOutcome::Save {
            id: self.record_id.clone(),
            name: self.input.value.trim().to_string(),
        }
    }

    /// Cancel is ignored while the save is in flight
    pub fn request_cancel(&mut self) -> EditOutcome {
        if self.is_saving() {
            return EditOutcome::Inert;
        }
        if self.is_new {
            return EditOutcome::Remove {
                id: self.record_id.clone(),
            };
        }

        let original = self.original.clone();
        self.input.set_value(&original);
        self.dirty = false;
        EditOutcome::Cancel {
            id: self.record_id.clone(),
        }
    }

    /// Owner reported a failed save; the buffer stays as typed
    pub fn save_failed(&mut self) {
        self.phase = EditPhase::Editing;
    }

    /// Owner replaced the record's name while the row is open
    pub fn sync_name(&mut self, name: &str) {
        if self.original != name {
            self.original = name.to_string();
            self.input.set_value(name);
            self.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecordPayload, ReportingFramework};

    fn esrs() -> ReportingFramework {
        ReportingFramework::from(RecordPayload {
            id: "1".to_string(),
            name: "ESRS".to_string(),
            associated_active_rfe: 118,
            updated_by: "Kishan".to_string(),
            updated_on: "04/07/2025".to_string(),
        })
    }

    #[test]
    fn test_mount_copies_name_and_focuses() {
        let row = EditRow::mount(&esrs());
        assert_eq!(row.buffer(), "ESRS");
        assert!(!row.is_dirty());
        assert!(row.is_focused());
        assert_eq!(row.phase(), EditPhase::Editing);
    }

    #[test]
    fn test_save_enablement_for_existing_record() {
        let mut row = EditRow::mount(&esrs());

        row.set_buffer("");
        assert!(!row.can_save());
        assert_eq!(row.request_save(), EditOutcome::Inert);

        row.set_buffer("ESRS");
        assert!(!row.is_dirty());
        assert!(!row.can_save());

        row.set_buffer("ESRS Updated");
        assert!(row.is_dirty());
        assert!(row.can_save());
    }

    #[test]
    fn test_whitespace_rename_is_inert() {
        let mut row = EditRow::mount(&esrs());
        row.set_buffer("   ");
        assert!(row.is_dirty());
        assert!(!row.can_save());
        assert_eq!(row.request_save(), EditOutcome::Inert);
        assert_eq!(row.phase(), EditPhase::Editing);
    }

    #[test]
    fn test_keystrokes_recompute_dirty() {
        let mut row = EditRow::mount(&esrs());
        row.insert_char('!');
        assert!(row.is_dirty());
        row.backspace();
        assert!(!row.is_dirty());
        row.move_home();
        row.delete();
        assert_eq!(row.buffer(), "SRS");
        assert!(row.is_dirty());
    }

    #[test]
    fn test_save_emits_trimmed_name_and_waits() {
        let mut row = EditRow::mount(&esrs());
        row.set_buffer("  ESRS Updated  ");

        assert_eq!(
            row.request_save(),
            EditOutcome::Save {
                id: "1".to_string(),
                name: "ESRS Updated".to_string(),
            }
        );
        assert!(row.is_saving());
        assert!(!row.can_save());

        row.insert_char('x');
        assert_eq!(row.buffer(), "  ESRS Updated  ");
        assert_eq!(row.request_cancel(), EditOutcome::Inert);

        row.save_failed();
        assert_eq!(row.phase(), EditPhase::Editing);
        assert_eq!(row.buffer(), "  ESRS Updated  ");
        assert!(row.can_save());
    }

    #[test]
    fn test_new_record_save_rules() {
        let draft = ReportingFramework::draft("temp-1".to_string());
        let mut row = EditRow::mount(&draft);
        assert!(!row.can_save());

        row.set_buffer("   ");
        assert!(!row.can_save());
        assert_eq!(
            row.request_save(),
            EditOutcome::Remove {
                id: "temp-1".to_string()
            }
        );

        row.set_buffer("New Standard");
        assert!(row.can_save());
        assert_eq!(
            row.request_save(),
            EditOutcome::Save {
                id: "temp-1".to_string(),
                name: "New Standard".to_string(),
            }
        );
    }

    #[test]
    fn test_cancel_existing_resets_buffer() {
        let mut row = EditRow::mount(&esrs());
        row.set_buffer("Something else");

        assert_eq!(
            row.request_cancel(),
            EditOutcome::Cancel {
                id: "1".to_string()
            }
        );
        assert_eq!(row.buffer(), "ESRS");
        assert!(!row.is_dirty());
    }

    #[test]
    fn test_cancel_new_requests_removal() {
        let mut row = EditRow::mount(&ReportingFramework::draft("temp-9".to_string()));
        row.insert_char('A');
        assert_eq!(
            row.request_cancel(),
            EditOutcome::Remove {
                id: "temp-9".to_string()
            }
        );
    }

    #[test]
    fn test_sync_name_resets_buffer() {
        let mut row = EditRow::mount(&esrs());
        row.set_buffer("draft");
        row.sync_name("ESRS 2");
        assert_eq!(row.buffer(), "ESRS 2");
        assert!(!row.is_dirty());

        row.set_buffer("draft");
        row.sync_name("ESRS 2");
        assert_eq!(row.buffer(), "draft");
    }
}
