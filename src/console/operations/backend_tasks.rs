//! Spawns backend calls off the UI loop and reports their completion

use std::sync::Arc;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, error, info};

use crate::backend::ReportingBackend;
use crate::console::events::AppEvent;
use crate::models::{DatasetKind, NameDraft};

/// Backend write issued by a save
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Create { temp_id: String, draft: NameDraft },
    Update { id: String, draft: NameDraft },
}

impl SaveRequest {
    /// Id of the record in the store when the save was issued
    pub fn record_id(&self) -> &str {
        match self {
            SaveRequest::Create { temp_id, .. } => temp_id,
            SaveRequest::Update { id, .. } => id,
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            SaveRequest::Create { .. } => "create",
            SaveRequest::Update { .. } => "update",
        }
    }
}

#[derive(Clone)]
pub struct BackendTasks {
    backend: Arc<dyn ReportingBackend>,
    tx: UnboundedSender<AppEvent>,
}

impl BackendTasks {
    pub fn new(backend: Arc<dyn ReportingBackend>, tx: UnboundedSender<AppEvent>) -> Self {
        Self { backend, tx }
    }

    pub fn spawn_list(&self, kind: DatasetKind, session: u64) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        info!("Loading {} (session {})", kind, session);
        tokio::spawn(async move {
            let result = backend.list(kind).await;
            match &result {
                Ok(records) => info!("Loaded {} {}", records.len(), kind),
                Err(e) => error!("Failed to load {}: {}", kind, e),
            }
            Self::deliver(
                &tx,
                AppEvent::RecordsLoaded {
                    kind,
                    session,
                    result,
                },
            );
        })
    }

    pub fn spawn_save(&self, kind: DatasetKind, session: u64, request: SaveRequest) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        info!(
            "Saving {} record {} ({})",
            kind,
            request.record_id(),
            request.operation()
        );
        tokio::spawn(async move {
            let result = match &request {
                SaveRequest::Create { draft, .. } => backend.create(kind, draft).await,
                SaveRequest::Update { id, draft } => backend.update(kind, id, draft).await,
            };
            if let Err(e) = &result {
                error!(
                    "Failed to {} {} record {}: {}",
                    request.operation(),
                    kind,
                    request.record_id(),
                    e
                );
            }
            Self::deliver(
                &tx,
                AppEvent::RecordSaved {
                    kind,
                    session,
                    record_id: request.record_id().to_string(),
                    result,
                },
            );
        })
    }

    fn deliver(tx: &UnboundedSender<AppEvent>, event: AppEvent) {
        if tx.send(event).is_err() {
            debug!("UI loop is gone; dropping backend completion");
        }
    }
}
