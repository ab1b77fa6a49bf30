use core::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{ConstructError, TransportError};
use crate::progress::{progress_body, MonotonicProgress, ProgressSink};
use crate::resource::Resource;
use crate::session::PendingFile;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const LABELS_HEADER: &str = "x-amz-meta-customlabels";

const PHOTOS_PATH: &str = "photos";
const SEARCH_PATH: &str = "search";

/// Which backend access path is active for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    GeneratedClient,
    RawHttp,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransportMode::GeneratedClient => write!(f, "generated client"),
            TransportMode::RawHttp => write!(f, "raw http"),
        }
    }
}

/// One upload attempt. The label, when present, is already trimmed and
/// non-empty; absent means no metadata header at all.
pub struct UploadRequest<'a> {
    pub file: &'a PendingFile,
    pub label: Option<&'a str>,
}

/// A backend access path.
///
/// Both implementations speak the same wire contract
/// (`PUT /photos?name=`, `GET /search?q=`); they differ in how
/// authentication is attached and whether byte-level upload progress is
/// available. Search returns the raw JSON body; normalization happens a
/// layer up so both paths share it. A body that is not JSON at all is
/// returned as `Value::Null`, which normalizes to zero hits.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn upload(
        &self,
        request: UploadRequest<'_>,
        progress: Arc<MonotonicProgress>,
    ) -> Result<(), TransportError>;

    async fn search(&self, term: &str) -> Result<Value, TransportError>;
}

/// Picks the access path for the session, exactly once.
///
/// Tries to build the generated client first; any construction failure is
/// logged and swallowed because raw HTTP is always a valid fallback. The
/// choice is never re-evaluated, so a failure here pins the session to
/// raw HTTP.
#[must_use]
pub fn select_transport(cfg: &Config) -> (Arc<dyn Transport>, TransportMode) {
    match ApiClient::from_config(cfg) {
        Ok(client) => {
            debug!("generated client constructed");
            (Arc::new(client), TransportMode::GeneratedClient)
        }
        Err(e) => {
            debug!("generated client unavailable ({e}), using raw HTTP");
            (Arc::new(RawHttp::new(cfg)), TransportMode::RawHttp)
        }
    }
}

/// SDK-style client: endpoint parsed and API key baked into default
/// headers at construction. Does not expose byte-level transfer progress,
/// so an upload reports a single jump to 100 on completion.
pub struct ApiClient {
    http: Client,
    root: String,
}

impl ApiClient {
    pub fn from_config(cfg: &Config) -> Result<Self, ConstructError> {
        let key = cfg.api_key.as_deref().ok_or(ConstructError::MissingKey)?;
        let root = cfg.api_root.as_deref().ok_or(ConstructError::MissingRoot)?;
        if Resource::new(root).is_none() {
            return Err(ConstructError::InvalidRoot);
        }

        let mut value = HeaderValue::from_str(key).map_err(|_| ConstructError::InvalidKey)?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, value);

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self {
            http,
            root: root.to_string(),
        })
    }

    fn endpoint(&self) -> Result<Resource, TransportError> {
        Resource::new(&self.root).ok_or_else(|| TransportError::Endpoint(self.root.clone()))
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn upload(
        &self,
        request: UploadRequest<'_>,
        progress: Arc<MonotonicProgress>,
    ) -> Result<(), TransportError> {
        let mut endpoint = self.endpoint()?;
        endpoint
            .append_path(PHOTOS_PATH)
            .append_query("name", &request.file.name);

        let mut req = self
            .http
            .put(endpoint.to_string())
            .header(CONTENT_TYPE, request.file.content_type())
            .body(request.file.bytes.clone());
        if let Some(label) = request.label {
            req = req.header(LABELS_HEADER, label);
        }

        let response = req.send().await?;
        ensure_success(response.status())?;
        progress.report(100);
        Ok(())
    }

    async fn search(&self, term: &str) -> Result<Value, TransportError> {
        let mut endpoint = self.endpoint()?;
        endpoint.append_path(SEARCH_PATH).append_query("q", term);

        let response = self.http.get(endpoint.to_string()).send().await?;
        ensure_success(response.status())?;
        Ok(response.json().await.unwrap_or(Value::Null))
    }
}

/// Raw HTTP fallback: never fails to construct, attaches the API key per
/// request when configured, and streams the upload body with chunk-level
/// progress.
pub struct RawHttp {
    http: Client,
    root: Option<String>,
    api_key: Option<String>,
}

impl RawHttp {
    #[must_use]
    pub fn new(cfg: &Config) -> Self {
        Self {
            http: Client::new(),
            root: cfg.api_root.clone(),
            api_key: cfg.api_key.clone(),
        }
    }

    fn endpoint(&self) -> Result<Resource, TransportError> {
        let root = self
            .root
            .as_deref()
            .ok_or_else(|| TransportError::Endpoint("not configured".to_string()))?;
        Resource::new(root).ok_or_else(|| TransportError::Endpoint(root.to_string()))
    }
}

#[async_trait]
impl Transport for RawHttp {
    async fn upload(
        &self,
        request: UploadRequest<'_>,
        progress: Arc<MonotonicProgress>,
    ) -> Result<(), TransportError> {
        let mut endpoint = self.endpoint()?;
        endpoint
            .append_path(PHOTOS_PATH)
            .append_query("name", &request.file.name);

        let body = progress_body(
            request.file.bytes.clone(),
            request.file.size_bytes,
            progress.clone(),
        );
        let mut req = self
            .http
            .put(endpoint.to_string())
            .header(CONTENT_TYPE, request.file.content_type())
            .body(body);
        if let Some(label) = request.label {
            req = req.header(LABELS_HEADER, label);
        }
        if let Some(key) = self.api_key.as_deref() {
            req = req.header(API_KEY_HEADER, key);
        }

        let response = req.send().await?;
        ensure_success(response.status())?;
        progress.report(100);
        Ok(())
    }

    async fn search(&self, term: &str) -> Result<Value, TransportError> {
        let mut endpoint = self.endpoint()?;
        endpoint.append_path(SEARCH_PATH).append_query("q", term);

        let mut req = self.http.get(endpoint.to_string());
        if let Some(key) = self.api_key.as_deref() {
            req = req.header(API_KEY_HEADER, key);
        }

        let response = req.send().await?;
        ensure_success(response.status())?;
        Ok(response.json().await.unwrap_or(Value::Null))
    }
}

fn ensure_success(status: StatusCode) -> Result<(), TransportError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(TransportError::Status(status.as_u16()))
    }
}
