use std::path::PathBuf;

use crate::{Status, TranscriptEntry};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session_id: Option<String>,
    pub session_badge: String,
    pub status: Status,
    /// Ordered according to the configured `TranscriptOrdering`.
    pub transcript: Vec<TranscriptEntry>,
    pub loading: bool,
    pub in_flight_chats: usize,
    pub chat_error: Option<String>,
    pub chat_input: String,
    pub url_input: String,
    pub selected_file: Option<PathBuf>,
    pub send_enabled: bool,
    pub dirty: bool,
}
