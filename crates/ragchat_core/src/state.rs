use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::view_model::AppViewModel;
use crate::SessionId;

/// Sequence number assigned to every backend request at submission time.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Only present on bot messages; may be empty.
    pub sources: Option<Vec<String>>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            sources: None,
        }
    }

    pub fn bot(text: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            sources: Some(sources),
        }
    }
}

/// A transcript line tagged with the chat request it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub seq: RequestId,
    pub message: ChatMessage,
}

/// How the transcript is ordered in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranscriptOrdering {
    /// Entries appear in the order they were appended (reply arrival order).
    #[default]
    Arrival,
    /// Entries are grouped by submission sequence, each user line followed by its reply.
    Submission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChatPolicy {
    pub ordering: TranscriptOrdering,
    /// Refuse new chat submissions while one is outstanding.
    pub single_flight: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusSeverity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub severity: StatusSeverity,
}

impl Status {
    pub fn new(text: impl Into<String>, severity: StatusSeverity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new("System Ready", StatusSeverity::Info)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    policy: ChatPolicy,
    session_id: Option<SessionId>,
    last_request_id: RequestId,
    status: Status,
    alert: Option<String>,
    selected_file: Option<PathBuf>,
    url_input: String,
    chat_input: String,
    transcript: Vec<TranscriptEntry>,
    in_flight_chats: BTreeSet<RequestId>,
    chat_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: ChatPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let mut transcript = self.transcript.clone();
        if self.policy.ordering == TranscriptOrdering::Submission {
            // Stable: a user line always precedes the reply sharing its seq.
            transcript.sort_by_key(|entry| entry.seq);
        }
        let loading = self.is_loading();

        AppViewModel {
            session_id: self.session_id.as_ref().map(|id| id.as_str().to_string()),
            session_badge: self
                .session_id
                .as_ref()
                .map(|id| format!("ID: {}...", id.short()))
                .unwrap_or_else(|| "ID: ...".to_string()),
            status: self.status.clone(),
            transcript,
            loading,
            in_flight_chats: self.in_flight_chats.len(),
            chat_error: self.chat_error.clone(),
            chat_input: self.chat_input.clone(),
            url_input: self.url_input.clone(),
            selected_file: self.selected_file.clone(),
            send_enabled: !(self.policy.single_flight && loading),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Takes the pending one-shot user prompt, if any.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn policy(&self) -> ChatPolicy {
        self.policy
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight_chats.is_empty()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_session(&mut self, id: SessionId) {
        self.session_id = Some(id);
        self.mark_dirty();
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
        self.mark_dirty();
    }

    pub(crate) fn raise_alert(&mut self, text: impl Into<String>) {
        self.alert = Some(text.into());
        self.mark_dirty();
    }

    pub(crate) fn set_selected_file(&mut self, path: Option<PathBuf>) {
        self.selected_file = path;
        self.mark_dirty();
    }

    pub(crate) fn take_selected_file(&mut self) -> Option<PathBuf> {
        self.selected_file.take()
    }

    pub(crate) fn set_url_input(&mut self, url: String) {
        self.url_input = url;
        self.mark_dirty();
    }

    pub(crate) fn url_input(&self) -> &str {
        &self.url_input
    }

    pub(crate) fn set_chat_input(&mut self, text: String) {
        self.chat_input = text;
        self.mark_dirty();
    }

    pub(crate) fn chat_input(&self) -> &str {
        &self.chat_input
    }

    pub(crate) fn begin_chat(&mut self, seq: RequestId, text: String) {
        self.transcript.push(TranscriptEntry {
            seq,
            message: ChatMessage::user(text),
        });
        self.in_flight_chats.insert(seq);
        self.chat_error = None;
        self.mark_dirty();
    }

    /// Closes out an in-flight chat. Returns false for unknown or already finished requests.
    pub(crate) fn finish_chat(&mut self, seq: RequestId) -> bool {
        if !self.in_flight_chats.remove(&seq) {
            return false;
        }
        self.chat_input.clear();
        self.mark_dirty();
        true
    }

    pub(crate) fn push_bot_reply(&mut self, seq: RequestId, answer: String, sources: Vec<String>) {
        self.transcript.push(TranscriptEntry {
            seq,
            message: ChatMessage::bot(answer, sources),
        });
        self.mark_dirty();
    }

    pub(crate) fn set_chat_error(&mut self, error: String) {
        self.chat_error = Some(error);
        self.mark_dirty();
    }
}
