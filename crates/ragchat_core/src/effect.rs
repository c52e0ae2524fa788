use std::path::PathBuf;

use crate::{RequestId, SessionId};

/// Side effects requested by `update`; each one is a single backend round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    UploadPdf {
        request_id: RequestId,
        path: PathBuf,
        session_id: SessionId,
    },
    IndexUrl {
        request_id: RequestId,
        url: String,
        session_id: SessionId,
    },
    SendChat {
        request_id: RequestId,
        message: String,
        session_id: SessionId,
    },
}
