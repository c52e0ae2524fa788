use ragchat_core::{AppViewModel, RequestId, Role, Status, StatusSeverity, TranscriptEntry};

const TITLE: &str = "Guest RAG Assistant";
const TYPING: &str = "bot> Typing...";
const TRANSCRIPT_REDRAW: &str = "--- transcript ---";

/// Turns successive view models into terminal lines, printing only what changed.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    status: Option<Status>,
    printed: Vec<(RequestId, Role)>,
    loading: bool,
    chat_error: Option<String>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&mut self, view: &AppViewModel) -> Vec<String> {
        self.status = Some(view.status.clone());
        vec![
            TITLE.to_string(),
            view.session_badge.clone(),
            format_status(&view.status),
        ]
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if self.status.as_ref() != Some(&view.status) {
            lines.push(format_status(&view.status));
            self.status = Some(view.status.clone());
        }

        let keys: Vec<_> = view.transcript.iter().map(entry_key).collect();
        if keys.starts_with(&self.printed) {
            for entry in &view.transcript[self.printed.len()..] {
                lines.extend(format_entry(entry));
            }
        } else {
            // A reply was slotted in above lines already on screen.
            lines.push(TRANSCRIPT_REDRAW.to_string());
            for entry in &view.transcript {
                lines.extend(format_entry(entry));
            }
        }
        self.printed = keys;

        if view.chat_error != self.chat_error {
            if let Some(error) = &view.chat_error {
                lines.push(format!("[error] {error}"));
            }
            self.chat_error = view.chat_error.clone();
        }

        if view.loading && (!self.loading || !lines.is_empty()) {
            lines.push(TYPING.to_string());
        }
        self.loading = view.loading;

        lines
    }
}

fn entry_key(entry: &TranscriptEntry) -> (RequestId, Role) {
    (entry.seq, entry.message.role)
}

fn format_entry(entry: &TranscriptEntry) -> Vec<String> {
    let message = &entry.message;
    match message.role {
        Role::User => vec![format!("you> {}", message.text)],
        Role::Bot => {
            let mut lines = vec![format!("bot> {}", message.text)];
            if let Some(sources) = message.sources.as_ref().filter(|s| !s.is_empty()) {
                lines.push(format!("     Sources: {}", sources.join(", ")));
            }
            lines
        }
    }
}

fn format_status(status: &Status) -> String {
    let label = match status.severity {
        StatusSeverity::Info => "info",
        StatusSeverity::Success => "ok",
        StatusSeverity::Warning => "warn",
        StatusSeverity::Error => "error",
    };
    format!("[{label}] {}", status.text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use ragchat_core::ChatMessage;

    use super::*;

    fn entry(seq: RequestId, message: ChatMessage) -> TranscriptEntry {
        TranscriptEntry { seq, message }
    }

    fn view_with(transcript: Vec<TranscriptEntry>, loading: bool) -> AppViewModel {
        AppViewModel {
            session_badge: "ID: abcdefgh...".to_string(),
            transcript,
            loading,
            ..AppViewModel::default()
        }
    }

    #[test]
    fn header_shows_title_badge_and_status() {
        let mut renderer = TerminalRenderer::new();
        let lines = renderer.header(&view_with(Vec::new(), false));
        assert_eq!(
            lines,
            vec![
                "Guest RAG Assistant".to_string(),
                "ID: abcdefgh...".to_string(),
                "[info] System Ready".to_string(),
            ]
        );
        // Nothing changed since the header.
        assert!(renderer.render(&view_with(Vec::new(), false)).is_empty());
    }

    #[test]
    fn only_new_entries_are_printed() {
        let mut renderer = TerminalRenderer::new();
        renderer.header(&view_with(Vec::new(), false));

        let first = vec![entry(1, ChatMessage::user("What is X?"))];
        assert_eq!(
            renderer.render(&view_with(first.clone(), true)),
            vec!["you> What is X?".to_string(), "bot> Typing...".to_string()]
        );

        let mut both = first;
        both.push(entry(1, ChatMessage::bot("X is Y", vec!["doc1".to_string()])));
        assert_eq!(
            renderer.render(&view_with(both, false)),
            vec![
                "bot> X is Y".to_string(),
                "     Sources: doc1".to_string(),
            ]
        );
    }

    #[test]
    fn empty_sources_are_not_listed() {
        let mut renderer = TerminalRenderer::new();
        renderer.header(&view_with(Vec::new(), false));
        let lines = renderer.render(&view_with(
            vec![entry(1, ChatMessage::bot("hello", Vec::new()))],
            false,
        ));
        assert_eq!(lines, vec!["bot> hello".to_string()]);
    }

    #[test]
    fn inserted_reply_redraws_transcript() {
        let mut renderer = TerminalRenderer::new();
        renderer.render(&view_with(
            vec![
                entry(1, ChatMessage::user("first")),
                entry(2, ChatMessage::user("second")),
            ],
            true,
        ));

        let lines = renderer.render(&view_with(
            vec![
                entry(1, ChatMessage::user("first")),
                entry(1, ChatMessage::bot("one", Vec::new())),
                entry(2, ChatMessage::user("second")),
            ],
            true,
        ));
        assert_eq!(
            lines,
            vec![
                "--- transcript ---".to_string(),
                "you> first".to_string(),
                "bot> one".to_string(),
                "you> second".to_string(),
                "bot> Typing...".to_string(),
            ]
        );
    }

    #[test]
    fn status_and_chat_error_are_printed_once() {
        let mut renderer = TerminalRenderer::new();
        renderer.header(&view_with(Vec::new(), false));

        let mut view = view_with(Vec::new(), false);
        view.status = Status::new("Upload failed", StatusSeverity::Error);
        view.chat_error = Some("no answer".to_string());

        assert_eq!(
            renderer.render(&view),
            vec![
                "[error] Upload failed".to_string(),
                "[error] no answer".to_string(),
            ]
        );
        assert!(renderer.render(&view).is_empty());
    }
}
