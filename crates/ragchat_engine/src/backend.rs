use std::path::Path;
use std::time::Duration;

use ragchat_logging::{rag_debug, rag_warn};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{BackendError, ChatReply, FailureKind, IngestStatus};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
/// Chat requests always search both the shared corpus and the session's own documents.
pub const SEARCH_MODE: &str = "both";

const UPLOAD_PATH: &str = "upload-pdf";
const ADD_URL_PATH: &str = "add-url";
const CHAT_PATH: &str = "chat";
const PDF_MIME: &str = "application/pdf";
const FALLBACK_FILENAME: &str = "upload.pdf";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Option<Duration>,
    /// Whole-request timeout. `None` waits for the backend indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

#[async_trait::async_trait]
pub trait RagBackend: Send + Sync {
    async fn upload_pdf(&self, path: &Path, session_id: &str)
        -> Result<IngestStatus, BackendError>;

    async fn add_url(&self, url: &str, session_id: &str) -> Result<IngestStatus, BackendError>;

    async fn chat(&self, message: &str, session_id: &str) -> Result<ChatReply, BackendError>;
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
    session_id: &'a str,
    search_mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    answer: String,
    #[serde(default)]
    sources: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base address", settings.base_url),
            ));
        }
        // Endpoints are joined relative to the base, so keep any path prefix intact.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn send_for_status(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<IngestStatus, BackendError> {
        let body = send(request).await?;
        let parsed: StatusResponse = decode(&body)?;
        Ok(IngestStatus::classify(&parsed.status))
    }
}

#[async_trait::async_trait]
impl RagBackend for ReqwestBackend {
    async fn upload_pdf(
        &self,
        path: &Path,
        session_id: &str,
    ) -> Result<IngestStatus, BackendError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            BackendError::new(FailureKind::FileRead, format!("{}: {err}", path.display()))
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string());
        rag_debug!(
            "upload-pdf file={} bytes={} session={}",
            filename,
            bytes.len(),
            short(session_id)
        );

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str(PDF_MIME)
            .map_err(map_reqwest_error)?;
        let form = Form::new()
            .part("file", part)
            .text("session_id", session_id.to_string());

        let url = self.endpoint(UPLOAD_PATH)?;
        self.send_for_status(self.client.post(url).multipart(form))
            .await
    }

    async fn add_url(&self, url: &str, session_id: &str) -> Result<IngestStatus, BackendError> {
        rag_debug!("add-url url={} session={}", url, short(session_id));
        let form = Form::new()
            .text("url", url.to_string())
            .text("session_id", session_id.to_string());

        let endpoint = self.endpoint(ADD_URL_PATH)?;
        self.send_for_status(self.client.post(endpoint).multipart(form))
            .await
    }

    async fn chat(&self, message: &str, session_id: &str) -> Result<ChatReply, BackendError> {
        rag_debug!(
            "chat message_len={} session={}",
            message.len(),
            short(session_id)
        );
        let payload = ChatRequest {
            message,
            session_id,
            search_mode: SEARCH_MODE,
        };

        let url = self.endpoint(CHAT_PATH)?;
        let body = send(self.client.post(url).json(&payload)).await?;
        let parsed: ChatResponse = decode(&body)?;
        Ok(ChatReply {
            answer: parsed.answer,
            sources: parsed.sources.unwrap_or_default(),
        })
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<String, BackendError> {
    let response = request.send().await.map_err(map_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(BackendError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }

    response.text().await.map_err(map_reqwest_error)
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|err| {
        rag_warn!("Unexpected backend response ({}): {}", err, snippet(body));
        BackendError::new(FailureKind::Decode, err.to_string())
    })
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return BackendError::new(FailureKind::Decode, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}

fn short(session_id: &str) -> &str {
    match session_id.char_indices().nth(8) {
        Some((idx, _)) => &session_id[..idx],
        None => session_id,
    }
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
