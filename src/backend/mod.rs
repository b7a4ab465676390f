//! CRUD backend for the reporting reference datasets
//!
//! The console treats persistence as an opaque collaborator exposing list,
//! create and update per dataset. Two implementations are provided: an
//! in-process mock with canned data and a JSON REST client.

pub mod errors;
pub mod http;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{BackendKind, Config};
use crate::models::{DatasetKind, NameDraft, RecordPayload};

pub use errors::BackendError;
pub use http::HttpBackend;
pub use mock::MockBackend;

pub type BackendResult<T> = Result<T, BackendError>;

/// Backend contract consumed by the management screens
#[async_trait]
pub trait ReportingBackend: Send + Sync {
    /// Fetch the full record list of a dataset
    async fn list(&self, kind: DatasetKind) -> BackendResult<Vec<RecordPayload>>;

    /// Create a record; the backend assigns identifier, count and audit fields
    async fn create(&self, kind: DatasetKind, draft: &NameDraft) -> BackendResult<RecordPayload>;

    /// Rename an existing record
    async fn update(
        &self,
        kind: DatasetKind,
        id: &str,
        draft: &NameDraft,
    ) -> BackendResult<RecordPayload>;
}

/// Build the backend selected by the configuration
pub fn from_config(config: &Config) -> BackendResult<Arc<dyn ReportingBackend>> {
    let backend: Arc<dyn ReportingBackend> = match config.backend {
        BackendKind::Mock => Arc::new(MockBackend::new(config.mock_latency())),
        BackendKind::Http => Arc::new(HttpBackend::new(config)?),
    };
    Ok(backend)
}
