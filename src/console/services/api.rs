//! # Scan API Service
//!
//! Client for the reconnaissance server's HTTP API. Every call goes through
//! one request path so that failures look the same to the console: a
//! non-success status and a transport failure both become an [`ApiError`]
//! carrying the server's message when it sent one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bytes::Bytes;
use regex::Regex;
use reqwest::{header, Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::config::ConsoleProfile;
use crate::console::events::{BulkActionKind, ExportFormat};
use crate::console::models::ScanSummary;

/// Failure of a remote call, already in the shape shown to the operator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-success HTTP status; `message` is the server's own text when present
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request never completed
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with something that is not the expected JSON
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// An export could not be written to disk
    #[error("Failed to save export: {0}")]
    Io(String),

    /// The request was rejected before being sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    fn transport(error: &reqwest::Error) -> Self {
        ApiError::Transport(error_chain(error))
    }
}

/// Flatten an error and its sources into one line
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }
    message
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"message": …}`, `{"error": {"message": …}}` and
/// `["ERROR", "…"]`.
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .or_else(|| match value.as_array() {
            Some(items) if items.first().and_then(|v| v.as_str()) == Some("ERROR") => items.get(1),
            _ => None,
        })?
        .as_str()?
        .trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

/// Reply of the mutating endpoints; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
}

/// Parameters of `api/search`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub scan_id: Option<String>,
    pub event_type: Option<String>,
    /// Plain value, `*` wildcards, or `/regex/`
    pub value: Option<String>,
}

impl SearchQuery {
    /// Rejects a query with no criteria and a `/regex/` value that does not compile
    pub fn validate(&self) -> std::result::Result<(), ApiError> {
        let is_blank = |field: &Option<String>| field.as_deref().map_or(true, |v| v.trim().is_empty());
        if is_blank(&self.scan_id) && is_blank(&self.event_type) && is_blank(&self.value) {
            return Err(ApiError::InvalidRequest(
                "search needs a scan id, an event type or a value".to_string(),
            ));
        }

        if let Some(pattern) = self.regex_pattern() {
            Regex::new(pattern)
                .map_err(|e| ApiError::InvalidRequest(format!("invalid regex: {e}")))?;
        }
        Ok(())
    }

    /// Inner pattern when the value is written as `/regex/`
    pub fn regex_pattern(&self) -> Option<&str> {
        let value = self.value.as_deref()?;
        if value.len() >= 2 && value.starts_with('/') && value.ends_with('/') {
            Some(&value[1..value.len() - 1])
        } else {
            None
        }
    }

    fn form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![("id", self.scan_id.clone().unwrap_or_default())];
        if let Some(event_type) = &self.event_type {
            form.push(("eventType", event_type.clone()));
        }
        if let Some(value) = &self.value {
            form.push(("value", value.clone()));
        }
        form
    }
}

/// HTTP client bound to one server
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    credentials: Option<(String, Option<String>)>,
}

impl ApiClient {
    /// Build a client from a connection profile.
    ///
    /// No request timeout is configured: a request that never answers keeps
    /// the loading indicator up until the operator gives up.
    pub fn new(profile: &ConsoleProfile) -> Result<Self> {
        let mut server = profile.server.trim().to_string();
        if !server.ends_with('/') {
            server.push('/');
        }
        let base_url =
            Url::parse(&server).with_context(|| format!("Invalid server URL '{}'", profile.server))?;

        let client = Client::builder()
            .user_agent(concat!("scanline/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(profile.insecure)
            .build()
            .context("Failed to build HTTP client")?;

        let credentials = profile
            .user
            .clone()
            .map(|user| (user, profile.password.clone()));

        tracing::debug!("ApiClient created for {}", base_url);
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidRequest(format!("bad endpoint '{path}': {e}")))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, password)) => request.basic_auth(user, password.as_deref()),
            None => request,
        }
    }

    /// Send a request and turn any non-success outcome into an [`ApiError`]
    async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, ApiError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            tracing::error!("Request failed: {}", error_chain(&e));
            ApiError::transport(&e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body).unwrap_or_else(|| match status.canonical_reason() {
            Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
            None => format!("HTTP {}", status.as_u16()),
        });
        tracing::warn!("Server answered {}: {}", status.as_u16(), message);
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    /// The shared request path: send, check status, parse the JSON body.
    ///
    /// An empty body is read as `{}` so endpoints that answer with nothing
    /// still succeed for all-optional reply types.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response.text().await.map_err(|e| ApiError::transport(&e))?;
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Full scan collection, in server order
    pub async fn scan_list(&self) -> std::result::Result<Vec<ScanSummary>, ApiError> {
        tracing::info!("Fetching scan list");
        let url = self.endpoint("api/scanlist")?;
        self.request_json(self.client.post(url)).await
    }

    pub async fn delete_scans(&self, ids: &[String]) -> std::result::Result<ApiMessage, ApiError> {
        tracing::info!("Deleting scans {:?}", ids);
        let url = self.endpoint("api/scandelete")?;
        self.request_json(self.client.get(url).query(&[("id", ids.join(","))]))
            .await
    }

    pub async fn stop_scans(&self, ids: &[String]) -> std::result::Result<ApiMessage, ApiError> {
        tracing::info!("Stopping scans {:?}", ids);
        let url = self.endpoint("api/stopscan")?;
        self.request_json(self.client.get(url).query(&[("id", ids.join(","))]))
            .await
    }

    pub async fn rerun_scans(&self, ids: &[String]) -> std::result::Result<ApiMessage, ApiError> {
        tracing::info!("Re-running scans {:?}", ids);
        let url = self.endpoint("api/rerunscanmulti")?;
        self.request_json(self.client.get(url).query(&[("ids", ids.join(","))]))
            .await
    }

    /// Run a mutating bulk operation
    pub async fn dispatch(
        &self,
        kind: BulkActionKind,
        ids: &[String],
    ) -> std::result::Result<ApiMessage, ApiError> {
        match kind {
            BulkActionKind::Stop => self.stop_scans(ids).await,
            BulkActionKind::Delete => self.delete_scans(ids).await,
            BulkActionKind::Rerun => self.rerun_scans(ids).await,
        }
    }

    pub async fn search(
        &self,
        query: &SearchQuery,
    ) -> std::result::Result<serde_json::Value, ApiError> {
        query.validate()?;
        tracing::info!("Searching {:?}", query);
        let url = self.endpoint("api/search")?;
        self.request_json(self.client.post(url).form(&query.form()))
            .await
    }

    /// Download URL for an export of the given scans
    pub fn export_url(
        &self,
        format: ExportFormat,
        ids: &[String],
    ) -> std::result::Result<Url, ApiError> {
        let mut url = self.endpoint(format.endpoint())?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in format.extra_params() {
                query.append_pair(key, value);
            }
            query.append_pair("ids", &ids.join(","));
        }
        Ok(url)
    }

    /// Link to the new-scan form pre-filled from an existing scan
    pub fn clone_url(&self, id: &str) -> std::result::Result<Url, ApiError> {
        let mut url = self.endpoint("clonescan")?;
        url.query_pairs_mut().append_pair("id", id);
        Ok(url)
    }

    /// Stream an export into `dir` and return the written path
    pub async fn download_export(
        &self,
        format: ExportFormat,
        ids: &[String],
        dir: &Path,
    ) -> std::result::Result<PathBuf, ApiError> {
        let url = self.export_url(format, ids)?;
        tracing::info!("Downloading {} export from {}", format, url);
        let mut response = self.send(self.client.get(url)).await?;

        let file_name = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or_else(|| default_export_name(format));
        let path = dir.join(file_name);

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, e))?;
        let written = save_export(&mut response, &path).await?;

        tracing::info!("Wrote {} bytes to {}", written, path.display());
        Ok(path)
    }
}

/// Export body delivered one chunk at a time
trait ExportBody {
    async fn next_chunk(&mut self) -> std::result::Result<Option<Bytes>, ApiError>;
}

impl ExportBody for Response {
    async fn next_chunk(&mut self) -> std::result::Result<Option<Bytes>, ApiError> {
        self.chunk().await.map_err(|e| ApiError::transport(&e))
    }
}

fn io_error(path: &Path, error: std::io::Error) -> ApiError {
    ApiError::Io(format!("{}: {error}", path.display()))
}

/// Sibling `<name>.part` file an export is written to until it is complete
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

/// Write `body` to `path`. Nothing is left at `path` or beside it unless
/// the whole body arrived.
async fn save_export<B: ExportBody>(
    body: &mut B,
    path: &Path,
) -> std::result::Result<usize, ApiError> {
    let partial = partial_path(path);
    let outcome = match write_body(body, &partial).await {
        Ok(written) => tokio::fs::rename(&partial, path)
            .await
            .map(|()| written)
            .map_err(|e| io_error(path, e)),
        Err(e) => Err(e),
    };

    if outcome.is_err() {
        if let Err(e) = tokio::fs::remove_file(&partial).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Could not remove {}: {}", partial.display(), e);
            }
        }
    }
    outcome
}

async fn write_body<B: ExportBody>(
    body: &mut B,
    partial: &Path,
) -> std::result::Result<usize, ApiError> {
    let mut file = tokio::fs::File::create(partial)
        .await
        .map_err(|e| io_error(partial, e))?;

    let mut written = 0usize;
    while let Some(chunk) = body.next_chunk().await? {
        written += chunk.len();
        file.write_all(&chunk)
            .await
            .map_err(|e| io_error(partial, e))?;
    }
    file.flush().await.map_err(|e| io_error(partial, e))?;
    Ok(written)
}

/// File name from a `Content-Disposition: attachment; filename=…` header,
/// stripped of any directory part
fn attachment_filename(disposition: &str) -> Option<String> {
    let raw = disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?
        .trim_matches('"');
    let name = Path::new(raw).file_name()?.to_str()?.to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn default_export_name(format: ExportFormat) -> String {
    format!(
        "SpiderFoot-{}.{}",
        chrono::Local::now().format("%Y%m%d%H%M%S"),
        format.file_extension()
    )
}
