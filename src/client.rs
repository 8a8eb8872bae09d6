//! Remote collection client: JSON-over-HTTP CRUD against one resource.
//!
//! Each call is a single request with no implicit retry; retrying is the
//! caller's policy. Failures surface as [`TabulaError`] variants, never as
//! raw transport errors. Some endpoints wrap payloads as
//! `{ success: bool, data: T }` while others return `T` directly; both
//! shapes normalize here so no caller branches on them.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::error::{Result, TabulaError};
use crate::record::{FieldMap, Record, RecordId};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// CRUD interface for one resource collection.
///
/// Implementations mutate no shared state; reconciling the local
/// collection after a call is the list view's job.
pub trait CollectionClient: Send + Sync {
    /// Fetch the entire collection.
    fn list(&self) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Create a record; the server assigns the id.
    fn create(&self, fields: &FieldMap) -> impl Future<Output = Result<Record>> + Send;

    /// Replace a record's fields, keyed by id.
    fn update(&self, id: &RecordId, fields: &FieldMap)
    -> impl Future<Output = Result<Record>> + Send;

    /// Delete a record by id.
    fn remove(&self, id: &RecordId) -> impl Future<Output = Result<()>> + Send;
}

/// reqwest-backed [`CollectionClient`] for `{base}/{resource}` endpoints.
pub struct HttpCollectionClient {
    http: Client,
    base: Url,
    resource: String,
}

impl HttpCollectionClient {
    /// Build a client for one resource with the default 30 second timeout.
    pub fn new(base: &str, resource: &str) -> Result<Self> {
        Self::with_timeout(base, resource, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base: &str, resource: &str, timeout: Duration) -> Result<Self> {
        // A trailing slash keeps Url::join from eating the last path segment.
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized)
            .map_err(|e| TabulaError::Config(format!("invalid base URL '{base}': {e}")))?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TabulaError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base,
            resource: resource.trim_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> Result<Url> {
        self.base
            .join(&self.resource)
            .map_err(|e| TabulaError::Config(format!("invalid resource path: {e}")))
    }

    fn item_url(&self, id: &RecordId) -> Result<Url> {
        self.base
            .join(&format!("{}/{}", self.resource, id))
            .map_err(|e| TabulaError::Config(format!("invalid resource path: {e}")))
    }
}

impl CollectionClient for HttpCollectionClient {
    async fn list(&self) -> Result<Vec<Record>> {
        let url = self.collection_url()?;
        tracing::debug!(resource = %self.resource, "listing collection");
        let response = self.http.get(url).send().await?;
        let payload = normalize_payload(read_payload(response).await?)?;

        let Value::Array(items) = payload else {
            return Err(TabulaError::MalformedResponse(
                "expected a JSON array of records".to_string(),
            ));
        };
        items.into_iter().map(Record::from_json).collect()
    }

    async fn create(&self, fields: &FieldMap) -> Result<Record> {
        let url = self.collection_url()?;
        tracing::debug!(resource = %self.resource, "creating record");
        let response = self.http.post(url).json(fields).send().await?;
        Record::from_json(normalize_payload(read_payload(response).await?)?)
    }

    async fn update(&self, id: &RecordId, fields: &FieldMap) -> Result<Record> {
        let url = self.item_url(id)?;
        tracing::debug!(resource = %self.resource, id = %id, "updating record");
        let response = self.http.put(url).json(fields).send().await?;
        Record::from_json(normalize_payload(read_payload(response).await?)?)
    }

    async fn remove(&self, id: &RecordId) -> Result<()> {
        let url = self.item_url(id)?;
        tracing::debug!(resource = %self.resource, id = %id, "deleting record");
        let response = self.http.delete(url).send().await?;
        // Delete bodies are often empty or a bare envelope; only a reported
        // failure matters.
        check_envelope(&read_payload(response).await?)
    }
}

/// Read a response body into JSON, mapping non-2xx statuses to
/// [`TabulaError::Server`] with the body's message when one is present.
async fn read_payload(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(TabulaError::Server {
            status: status.as_u16(),
            message: extract_server_message(&text, status),
        });
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| TabulaError::MalformedResponse(e.to_string()))
}

fn extract_server_message(body: &str, status: reqwest::StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = value.get(key).and_then(Value::as_str)
                && !message.is_empty()
            {
                return message.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

/// Unwrap a `{ success, data }` envelope, passing bare payloads through.
/// An envelope with `success: false` is a server-reported failure even on
/// a 2xx response.
fn normalize_payload(value: Value) -> Result<Value> {
    match value {
        Value::Object(mut map) if map.contains_key("success") => {
            let success = map.get("success").and_then(Value::as_bool).unwrap_or(false);
            if !success {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request failed")
                    .to_string();
                return Err(TabulaError::Server {
                    status: 200,
                    message,
                });
            }
            map.remove("data").ok_or_else(|| {
                TabulaError::MalformedResponse("response envelope is missing 'data'".to_string())
            })
        }
        other => Ok(other),
    }
}

/// Like [`normalize_payload`] but for calls with no payload of interest:
/// only a reported failure is an error.
fn check_envelope(value: &Value) -> Result<()> {
    if let Value::Object(map) = value
        && map.contains_key("success")
        && !map.get("success").and_then(Value::as_bool).unwrap_or(false)
    {
        let message = map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        return Err(TabulaError::Server {
            status: 200,
            message,
        });
    }
    Ok(())
}
