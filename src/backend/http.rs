//! JSON REST backend

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::{BackendError, BackendResult, ReportingBackend};
use crate::config::Config;
use crate::models::{DatasetKind, NameDraft, RecordPayload};

/// Backend talking to the reporting API over HTTP
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> BackendResult<Self> {
        let client = Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.http_timeout())
            .build()?;

        info!("Using reporting API at {}", config.api_base_url);

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn collection_url(&self, kind: DatasetKind) -> String {
        format!("{}/{}", self.base_url, kind.collection())
    }

    pub fn record_url(&self, kind: DatasetKind, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.collection(), id)
    }
}

/// Turn non-success statuses into API errors and decode the body
async fn decode_response<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Backend returned {}: {}", status, body);
        return Err(BackendError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Prefer a `message` field from a JSON error body, fall back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ReportingBackend for HttpBackend {
    async fn list(&self, kind: DatasetKind) -> BackendResult<Vec<RecordPayload>> {
        let url = self.collection_url(kind);
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        decode_response(response).await
    }

    async fn create(&self, kind: DatasetKind, draft: &NameDraft) -> BackendResult<RecordPayload> {
        let url = self.collection_url(kind);
        debug!("POST {}", url);
        let response = self.client.post(&url).json(draft).send().await?;
        decode_response(response).await
    }

    async fn update(
        &self,
        kind: DatasetKind,
        id: &str,
        draft: &NameDraft,
    ) -> BackendResult<RecordPayload> {
        let url = self.record_url(kind, id);
        debug!("PUT {}", url);
        let response = self.client.put(&url).json(draft).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                kind,
                id: id.to_string(),
            });
        }
        decode_response(response).await
    }
}
