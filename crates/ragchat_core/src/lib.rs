//! Chat client core: pure state machine, session capability and view-model helpers.
mod effect;
mod msg;
mod outcome;
mod session;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use outcome::IngestOutcome;
pub use session::{
    obtain_session_id, MemorySessionStore, SessionId, SessionStore, SessionStoreError,
    SESSION_KEY,
};
pub use state::{
    AppState, ChatMessage, ChatPolicy, RequestId, Role, Status, StatusSeverity, TranscriptEntry,
    TranscriptOrdering,
};
pub use update::{
    update, CHAT_BUSY_ALERT, CHAT_FAILED_NOTICE, NOT_A_PDF_ALERT, SELECT_PDF_ALERT,
    SESSION_NOT_READY_ALERT,
};
pub use view_model::AppViewModel;
