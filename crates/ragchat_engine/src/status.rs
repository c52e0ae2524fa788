/// Prefix the backend uses for every successful ingestion.
const SUCCESS_PREFIX: &str = "Success";
const DUPLICATE_MARKER: &str = "Duplicate detected.";
const EMPTY_PREFIX: &str = "No documents";

/// Backend ingestion status, classified from the free-form `status` string.
///
/// Each variant carries the literal backend text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestStatus {
    Success(String),
    Duplicate(String),
    Empty(String),
    Other(String),
}

impl IngestStatus {
    pub fn classify(raw: &str) -> Self {
        let text = raw.to_string();
        if raw.starts_with(SUCCESS_PREFIX) {
            IngestStatus::Success(text)
        } else if raw == DUPLICATE_MARKER {
            IngestStatus::Duplicate(text)
        } else if raw.starts_with(EMPTY_PREFIX) {
            IngestStatus::Empty(text)
        } else {
            IngestStatus::Other(text)
        }
    }

    pub fn text(&self) -> &str {
        match self {
            IngestStatus::Success(text)
            | IngestStatus::Duplicate(text)
            | IngestStatus::Empty(text)
            | IngestStatus::Other(text) => text,
        }
    }
}
