//! Backend gateway
//!
//! One capability trait covering the backend REST surface, so the engine is
//! testable against a fake backend, plus the production HTTP implementation.
//! A gateway call performs exactly one request and returns a decoded payload
//! or a typed failure; it never retries and holds no state.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::GatewayError;
use crate::history::HistoryRecord;
use crate::ledger::LedgerEntry;
use crate::roster::{ClientInfo, DatasetPreview, ModelInfo};

/// Request timeout for every backend call, surfaced as a transport failure.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Capability interface to the simulation backend.
///
/// The status payload is handed over raw: its reconciliation (including
/// degradation of malformed fields) is the engine's job, not the gateway's.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    /// GET `/api/status`
    async fn fetch_status(&self) -> Result<Value, GatewayError>;

    /// GET `/api/ledger`, the full feed, newest first.
    async fn fetch_ledger(&self) -> Result<Vec<LedgerEntry>, GatewayError>;

    /// POST `/api/start` with the shared secret.
    async fn post_start(&self, db_password: &str) -> Result<(), GatewayError>;

    /// POST `/api/stop`
    async fn post_stop(&self) -> Result<(), GatewayError>;

    /// GET `/api/v1/models/history`, persisted rounds, newest first.
    async fn fetch_history(&self) -> Result<Vec<HistoryRecord>, GatewayError>;

    /// GET `/api/v1/model`
    async fn fetch_model(&self) -> Result<ModelInfo, GatewayError>;

    /// GET `/api/v1/clients`
    async fn fetch_clients(&self) -> Result<Vec<ClientInfo>, GatewayError>;

    /// GET `/api/v1/datasets`, the partition filenames.
    async fn fetch_datasets(&self) -> Result<Vec<String>, GatewayError>;

    /// GET `/api/v1/datasets/{name}`
    async fn fetch_dataset(&self, name: &str) -> Result<DatasetPreview, GatewayError>;
}

/// Production gateway over reqwest.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: &EngineConfig) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn post_json(&self, path: &str, body: Option<Value>) -> Result<(), GatewayError> {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.map_err(transport)?;
        // Success bodies are informational only ({"message": ...}).
        decode::<Value>(response).await.map(|_| ())
    }
}

#[async_trait]
impl ApiGateway for HttpGateway {
    async fn fetch_status(&self) -> Result<Value, GatewayError> {
        self.get_json("/api/status").await
    }

    async fn fetch_ledger(&self) -> Result<Vec<LedgerEntry>, GatewayError> {
        self.get_json("/api/ledger").await
    }

    async fn post_start(&self, db_password: &str) -> Result<(), GatewayError> {
        self.post_json(
            "/api/start",
            Some(serde_json::json!({ "db_password": db_password })),
        )
        .await
    }

    async fn post_stop(&self) -> Result<(), GatewayError> {
        self.post_json("/api/stop", None).await
    }

    async fn fetch_history(&self) -> Result<Vec<HistoryRecord>, GatewayError> {
        self.get_json("/api/v1/models/history").await
    }

    async fn fetch_model(&self) -> Result<ModelInfo, GatewayError> {
        self.get_json("/api/v1/model").await
    }

    async fn fetch_clients(&self) -> Result<Vec<ClientInfo>, GatewayError> {
        self.get_json("/api/v1/clients").await
    }

    async fn fetch_datasets(&self) -> Result<Vec<String>, GatewayError> {
        self.get_json("/api/v1/datasets").await
    }

    async fn fetch_dataset(&self, name: &str) -> Result<DatasetPreview, GatewayError> {
        self.get_json(&format!("/api/v1/datasets/{name}")).await
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
        return Err(GatewayError::Backend {
            status: status.as_u16(),
            message: extract_message(&body),
        });
    }
    serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Best-effort extraction of the backend's error text from a failure body.
/// The backend answers `{"message": ...}` or `{"error": ...}`; anything else
/// comes through truncated and raw.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(text) = value.get(key).and_then(Value::as_str) {
                return text.to_string();
            }
        }
    }
    let mut raw = body.trim().to_string();
    if raw.len() > 200 {
        raw.truncate(200);
    }
    raw
}
