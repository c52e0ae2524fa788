use std::path::PathBuf;

use crate::{IngestOutcome, RequestId, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The durable session identifier is available.
    SessionLoaded(SessionId),
    /// User picked (or cleared) the PDF to upload.
    FileSelected(Option<PathBuf>),
    /// User clicked Upload.
    UploadClicked,
    /// Backend answered an upload, or the request failed in transport.
    UploadFinished {
        request_id: RequestId,
        result: Result<IngestOutcome, String>,
    },
    /// User edited the URL input box.
    UrlChanged(String),
    /// User clicked Index.
    IndexUrlClicked,
    /// Backend answered a URL indexing request, or the request failed in transport.
    UrlIndexFinished {
        request_id: RequestId,
        result: Result<IngestOutcome, String>,
    },
    /// User edited the chat input box.
    ChatInputChanged(String),
    /// User clicked Send (or pressed Enter).
    SendClicked,
    /// Backend answered a chat request.
    ChatReplied {
        request_id: RequestId,
        answer: String,
        sources: Vec<String>,
    },
    /// A chat request failed in transport.
    ChatFailed { request_id: RequestId, error: String },
    /// Input that changes nothing (e.g. a blank line).
    NoOp,
}
