use std::fmt;

use crate::IngestStatus;

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted {
        request_id: RequestId,
        result: Result<IngestStatus, BackendError>,
    },
    UrlCompleted {
        request_id: RequestId,
        result: Result<IngestStatus, BackendError>,
    },
    ChatCompleted {
        request_id: RequestId,
        result: Result<ChatReply, BackendError>,
    },
}

impl EngineEvent {
    pub fn request_id(&self) -> RequestId {
        match self {
            EngineEvent::UploadCompleted { request_id, .. }
            | EngineEvent::UrlCompleted { request_id, .. }
            | EngineEvent::ChatCompleted { request_id, .. } => *request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Response body was not the expected JSON shape.
    Decode,
    /// The file selected for upload could not be read.
    FileRead,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::FileRead => write!(f, "file read error"),
        }
    }
}
