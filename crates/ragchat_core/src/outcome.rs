/// Classified backend status for an ingestion request (PDF upload or URL indexing).
///
/// Every variant keeps the backend's literal text so the view can echo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Success(String),
    Duplicate(String),
    /// Backend found nothing to index in the submitted document.
    Empty(String),
    Other(String),
}

impl IngestOutcome {
    pub fn backend_text(&self) -> &str {
        match self {
            IngestOutcome::Success(text)
            | IngestOutcome::Duplicate(text)
            | IngestOutcome::Empty(text)
            | IngestOutcome::Other(text) => text,
        }
    }
}
