//! Chat client engine: backend IO and effect execution.
mod backend;
mod engine;
mod persist;
mod status;
mod types;

pub use backend::{BackendSettings, RagBackend, ReqwestBackend, DEFAULT_BACKEND_URL, SEARCH_MODE};
pub use engine::{EngineError, EngineHandle};
pub use persist::{DataDir, PersistError};
pub use status::IngestStatus;
pub use types::{BackendError, ChatReply, EngineEvent, FailureKind, RequestId};
