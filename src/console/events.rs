//! Completions delivered from backend tasks to the UI loop

use crate::backend::BackendResult;
use crate::models::{DatasetKind, RecordPayload};

/// Result of a spawned backend call, tagged with the dialog session that
/// issued it
#[derive(Debug)]
pub enum AppEvent {
    RecordsLoaded {
        kind: DatasetKind,
        session: u64,
        result: BackendResult<Vec<RecordPayload>>,
    },
    RecordSaved {
        kind: DatasetKind,
        session: u64,
        /// Id the record had when the save was issued; temporary for creates
        record_id: String,
        result: BackendResult<RecordPayload>,
    },
}

impl AppEvent {
    pub fn kind(&self) -> DatasetKind {
        match self {
            AppEvent::RecordsLoaded { kind, .. } | AppEvent::RecordSaved { kind, .. } => *kind,
        }
    }

    pub fn session(&self) -> u64 {
        match self {
            AppEvent::RecordsLoaded { session, .. } | AppEvent::RecordSaved { session, .. } => {
                *session
            }
        }
    }
}
