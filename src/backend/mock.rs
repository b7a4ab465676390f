//! In-process backend serving canned reference data after a fixed delay

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{BackendError, BackendResult, ReportingBackend};
use crate::models::{DatasetKind, NameDraft, RecordPayload};

const SEED_AUTHOR: &str = "Kishan";
const SEED_DATE: &str = "04/07/2025";
const CURRENT_USER: &str = "Current User";

/// Mock backend keeping created and renamed records in memory
pub struct MockBackend {
    latency: Duration,
    state: Mutex<MockState>,
}

struct MockState {
    datasets: HashMap<DatasetKind, Vec<RecordPayload>>,
    last_issued_id: i64,
}

impl MockBackend {
    pub fn new(latency: Duration) -> Self {
        let mut datasets = HashMap::new();
        datasets.insert(DatasetKind::Frameworks, seed_frameworks());
        datasets.insert(DatasetKind::Destinations, seed_destinations());

        Self {
            latency,
            state: Mutex::new(MockState {
                datasets,
                last_issued_id: 0,
            }),
        }
    }

    /// Mock backend with no simulated latency
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl MockState {
    /// Timestamp-based identifier, bumped when two creates share a millisecond
    fn next_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        let id = now.max(self.last_issued_id + 1);
        self.last_issued_id = id;
        id.to_string()
    }
}

#[async_trait]
impl ReportingBackend for MockBackend {
    async fn list(&self, kind: DatasetKind) -> BackendResult<Vec<RecordPayload>> {
        self.simulate_latency().await;
        let state = self.state.lock().await;
        let records = state.datasets.get(&kind).cloned().unwrap_or_default();
        debug!("Mock list {}: {} records", kind, records.len());
        Ok(records)
    }

    async fn create(&self, kind: DatasetKind, draft: &NameDraft) -> BackendResult<RecordPayload> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        let record = RecordPayload {
            id: state.next_id(),
            name: draft.name.clone(),
            associated_active_rfe: 0,
            updated_by: CURRENT_USER.to_string(),
            updated_on: today(),
        };
        state.datasets.entry(kind).or_default().push(record.clone());
        debug!("Mock create {}: {}", kind, record.id);
        Ok(record)
    }

    async fn update(
        &self,
        kind: DatasetKind,
        id: &str,
        draft: &NameDraft,
    ) -> BackendResult<RecordPayload> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        let record = state
            .datasets
            .get_mut(&kind)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| BackendError::NotFound {
                kind,
                id: id.to_string(),
            })?;

        record.name = draft.name.clone();
        record.updated_by = CURRENT_USER.to_string();
        record.updated_on = today();
        debug!("Mock update {}: {}", kind, id);
        Ok(record.clone())
    }
}

fn today() -> String {
    chrono::Local::now().format("%m/%d/%Y").to_string()
}

fn seed(id: &str, name: &str, associated_active_rfe: u32) -> RecordPayload {
    RecordPayload {
        id: id.to_string(),
        name: name.to_string(),
        associated_active_rfe,
        updated_by: SEED_AUTHOR.to_string(),
        updated_on: SEED_DATE.to_string(),
    }
}

fn seed_frameworks() -> Vec<RecordPayload> {
    vec![
        seed("1", "ESRS", 118),
        seed("2", "India BSRS", 19),
        seed("3", "Mexico NIS", 4),
        seed("4", "SASB", 3),
        seed("5", "GRI", 5),
        seed("6", "UK SDR", 2),
        seed("7", "SB 219", 1),
    ]
}

fn seed_destinations() -> Vec<RecordPayload> {
    vec![
        seed("123", "Impact Report", 118),
        seed("124", "Jurisdictional Report", 55),
    ]
}
