use std::path::Path;

use crate::{AppState, Effect, IngestOutcome, Msg, Status, StatusSeverity};

pub const SELECT_PDF_ALERT: &str = "Select a PDF first";
pub const NOT_A_PDF_ALERT: &str = "Only PDF files can be uploaded";
pub const SESSION_NOT_READY_ALERT: &str = "Session is still initializing, try again";
pub const CHAT_BUSY_ALERT: &str = "Still waiting for the previous answer, message not sent";
pub const CHAT_FAILED_NOTICE: &str = "The assistant did not answer (check the log for details)";

const UPLOADING: &str = "Uploading...";
const UPLOAD_SUCCESS: &str = "PDF uploaded and indexed!";
const UPLOAD_FAILED: &str = "Upload failed (check the log for details)";
const SCRAPING: &str = "Scraping URL...";
const URL_SUCCESS: &str = "URL indexed successfully!";
const URL_DUPLICATE: &str = "This URL is already in your context.";
const URL_FAILED: &str = "URL indexing failed (Server Error).";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionLoaded(id) => {
            state.set_session(id);
            Vec::new()
        }
        Msg::FileSelected(Some(path)) if !is_pdf(&path) => {
            state.raise_alert(NOT_A_PDF_ALERT);
            Vec::new()
        }
        Msg::FileSelected(path) => {
            state.set_selected_file(path);
            Vec::new()
        }
        Msg::UploadClicked => {
            let Some(path) = state.take_selected_file() else {
                state.raise_alert(SELECT_PDF_ALERT);
                return (state, Vec::new());
            };
            let Some(session_id) = state.session_id().cloned() else {
                // Keep the selection so the user can retry once the session exists.
                state.set_selected_file(Some(path));
                state.raise_alert(SESSION_NOT_READY_ALERT);
                return (state, Vec::new());
            };
            let request_id = state.next_request_id();
            state.set_status(Status::new(UPLOADING, StatusSeverity::Info));
            vec![Effect::UploadPdf {
                request_id,
                path,
                session_id,
            }]
        }
        Msg::UploadFinished { result, .. } => {
            state.set_status(upload_status(&result));
            Vec::new()
        }
        Msg::UrlChanged(url) => {
            state.set_url_input(url);
            Vec::new()
        }
        Msg::IndexUrlClicked => {
            let url = state.url_input().trim().to_string();
            if url.is_empty() {
                return (state, Vec::new());
            }
            let Some(session_id) = state.session_id().cloned() else {
                state.raise_alert(SESSION_NOT_READY_ALERT);
                return (state, Vec::new());
            };
            let request_id = state.next_request_id();
            state.set_url_input(String::new());
            state.set_status(Status::new(SCRAPING, StatusSeverity::Info));
            vec![Effect::IndexUrl {
                request_id,
                url,
                session_id,
            }]
        }
        Msg::UrlIndexFinished { result, .. } => {
            state.set_status(url_status(&result));
            Vec::new()
        }
        Msg::ChatInputChanged(text) => {
            state.set_chat_input(text);
            Vec::new()
        }
        Msg::SendClicked => {
            if state.chat_input().trim().is_empty() {
                return (state, Vec::new());
            }
            if state.policy().single_flight && state.is_loading() {
                state.raise_alert(CHAT_BUSY_ALERT);
                return (state, Vec::new());
            }
            let Some(session_id) = state.session_id().cloned() else {
                state.raise_alert(SESSION_NOT_READY_ALERT);
                return (state, Vec::new());
            };
            let message = state.chat_input().to_string();
            let request_id = state.next_request_id();
            state.begin_chat(request_id, message.clone());
            vec![Effect::SendChat {
                request_id,
                message,
                session_id,
            }]
        }
        Msg::ChatReplied {
            request_id,
            answer,
            sources,
        } => {
            if state.finish_chat(request_id) {
                state.push_bot_reply(request_id, answer, sources);
            }
            Vec::new()
        }
        Msg::ChatFailed { request_id, .. } => {
            if state.finish_chat(request_id) {
                state.set_chat_error(CHAT_FAILED_NOTICE.to_string());
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn upload_status(result: &Result<IngestOutcome, String>) -> Status {
    match result {
        Ok(IngestOutcome::Success(_)) => Status::new(UPLOAD_SUCCESS, StatusSeverity::Success),
        Ok(outcome) => Status::new(
            format!("Upload Issue: {}", outcome.backend_text()),
            StatusSeverity::Warning,
        ),
        Err(_) => Status::new(UPLOAD_FAILED, StatusSeverity::Error),
    }
}

fn url_status(result: &Result<IngestOutcome, String>) -> Status {
    match result {
        Ok(IngestOutcome::Duplicate(_)) => Status::new(URL_DUPLICATE, StatusSeverity::Warning),
        Ok(IngestOutcome::Success(_)) => Status::new(URL_SUCCESS, StatusSeverity::Success),
        Ok(outcome @ (IngestOutcome::Empty(_) | IngestOutcome::Other(_))) => {
            Status::new(outcome.backend_text(), StatusSeverity::Warning)
        }
        Err(_) => Status::new(URL_FAILED, StatusSeverity::Error),
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
