use std::path::PathBuf;
use std::sync::Once;

use pretty_assertions::assert_eq;
use ragchat_core::{
    update, AppState, Effect, IngestOutcome, Msg, SessionId, StatusSeverity, NOT_A_PDF_ALERT,
    SELECT_PDF_ALERT, SESSION_NOT_READY_ALERT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ragchat_logging::initialize_for_tests);
}

fn ready_state() -> AppState {
    let id = SessionId::new("session-1234567890").unwrap();
    let (mut state, _) = update(AppState::new(), Msg::SessionLoaded(id));
    state.consume_dirty();
    state
}

fn upload(state: AppState, path: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::FileSelected(Some(PathBuf::from(path))));
    update(state, Msg::UploadClicked)
}

fn index_url(state: AppState, url: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::UrlChanged(url.to_string()));
    update(state, Msg::IndexUrlClicked)
}

#[test]
fn initial_status_is_ready() {
    let view = AppState::new().view();
    assert_eq!(view.status.text, "System Ready");
    assert_eq!(view.session_badge, "ID: ...");
}

#[test]
fn session_badge_shows_short_id() {
    assert_eq!(ready_state().view().session_badge, "ID: session-...");
}

#[test]
fn upload_without_file_makes_no_request() {
    init_logging();
    let (mut state, effects) = update(ready_state(), Msg::UploadClicked);

    assert!(effects.is_empty());
    assert_eq!(state.take_alert().as_deref(), Some(SELECT_PDF_ALERT));
    assert_eq!(state.view().status.text, "System Ready");
}

#[test]
fn upload_emits_effect_and_clears_selection() {
    init_logging();
    let (state, effects) = upload(ready_state(), "docs/paper.pdf");

    assert_eq!(
        effects,
        vec![Effect::UploadPdf {
            request_id: 1,
            path: PathBuf::from("docs/paper.pdf"),
            session_id: SessionId::new("session-1234567890").unwrap(),
        }]
    );
    let view = state.view();
    assert_eq!(view.status.text, "Uploading...");
    assert_eq!(view.selected_file, None);

    // Selection was consumed, so a second click prompts again.
    let (mut state, effects) = update(state, Msg::UploadClicked);
    assert!(effects.is_empty());
    assert_eq!(state.take_alert().as_deref(), Some(SELECT_PDF_ALERT));
}

#[test]
fn non_pdf_selection_is_refused() {
    init_logging();
    let (mut state, effects) = upload(ready_state(), "notes.txt");

    assert!(effects.is_empty());
    assert_eq!(state.view().selected_file, None);
    // Refused selection, then the click finds nothing selected.
    assert_eq!(state.take_alert().as_deref(), Some(SELECT_PDF_ALERT));

    let (mut state, _) = update(
        ready_state(),
        Msg::FileSelected(Some(PathBuf::from("scan.PDF"))),
    );
    assert_eq!(state.take_alert(), None);
    assert_eq!(state.view().selected_file, Some(PathBuf::from("scan.PDF")));

    let (mut state, _) = update(state, Msg::FileSelected(Some(PathBuf::from("a.docx"))));
    assert_eq!(state.take_alert().as_deref(), Some(NOT_A_PDF_ALERT));
    assert_eq!(state.view().selected_file, Some(PathBuf::from("scan.PDF")));
}

#[test]
fn upload_before_session_keeps_selection() {
    init_logging();
    let (mut state, effects) = upload(AppState::new(), "a.pdf");

    assert!(effects.is_empty());
    assert_eq!(state.take_alert().as_deref(), Some(SESSION_NOT_READY_ALERT));
    assert_eq!(state.view().selected_file, Some(PathBuf::from("a.pdf")));
}

#[test]
fn upload_outcomes_map_to_status() {
    init_logging();
    let cases = [
        (
            Ok(IngestOutcome::Success("Success: indexed".to_string())),
            "PDF uploaded and indexed!",
            StatusSeverity::Success,
        ),
        (
            Ok(IngestOutcome::Duplicate("Duplicate detected.".to_string())),
            "Upload Issue: Duplicate detected.",
            StatusSeverity::Warning,
        ),
        (
            Ok(IngestOutcome::Empty("No documents provided".to_string())),
            "Upload Issue: No documents provided",
            StatusSeverity::Warning,
        ),
        (
            Err("connection refused".to_string()),
            "Upload failed (check the log for details)",
            StatusSeverity::Error,
        ),
    ];

    for (result, text, severity) in cases {
        let (state, _) = upload(ready_state(), "a.pdf");
        let (state, effects) = update(
            state,
            Msg::UploadFinished {
                request_id: 1,
                result,
            },
        );
        assert!(effects.is_empty());
        let view = state.view();
        assert_eq!(view.status.text, text);
        assert_eq!(view.status.severity, severity);
    }
}

#[test]
fn empty_url_is_a_noop() {
    init_logging();
    let state = ready_state();
    let (mut next, effects) = index_url(state, "   ");

    assert!(effects.is_empty());
    assert_eq!(next.take_alert(), None);
    assert_eq!(next.view().status.text, "System Ready");
}

#[test]
fn url_submission_trims_and_resets_input() {
    init_logging();
    let (state, effects) = index_url(ready_state(), "  https://example.com/page  ");

    assert_eq!(
        effects,
        vec![Effect::IndexUrl {
            request_id: 1,
            url: "https://example.com/page".to_string(),
            session_id: SessionId::new("session-1234567890").unwrap(),
        }]
    );
    let view = state.view();
    assert_eq!(view.url_input, "");
    assert_eq!(view.status.text, "Scraping URL...");
}

#[test]
fn url_outcomes_map_to_status() {
    init_logging();
    let cases = [
        (
            Ok(IngestOutcome::Success("Success: indexed".to_string())),
            "URL indexed successfully!",
        ),
        (
            Ok(IngestOutcome::Duplicate("Duplicate detected.".to_string())),
            "This URL is already in your context.",
        ),
        (
            Ok(IngestOutcome::Empty("No documents provided".to_string())),
            "No documents provided",
        ),
        (
            Ok(IngestOutcome::Other("Scraper blocked".to_string())),
            "Scraper blocked",
        ),
        (
            Err("500".to_string()),
            "URL indexing failed (Server Error).",
        ),
    ];

    for (result, text) in cases {
        let (state, _) = index_url(ready_state(), "https://example.com");
        let (state, _) = update(
            state,
            Msg::UrlIndexFinished {
                request_id: 1,
                result,
            },
        );
        assert_eq!(state.view().status.text, text);
    }
}

#[test]
fn newer_operation_overwrites_status() {
    init_logging();
    let (state, _) = upload(ready_state(), "a.pdf");
    let (state, effects) = index_url(state, "https://example.com");
    assert!(matches!(
        effects.as_slice(),
        [Effect::IndexUrl { request_id: 2, .. }]
    ));

    let (state, _) = update(
        state,
        Msg::UploadFinished {
            request_id: 1,
            result: Ok(IngestOutcome::Success("Success".to_string())),
        },
    );
    assert_eq!(state.view().status.text, "PDF uploaded and indexed!");

    let (state, _) = update(
        state,
        Msg::UrlIndexFinished {
            request_id: 2,
            result: Ok(IngestOutcome::Duplicate("Duplicate detected.".to_string())),
        },
    );
    assert_eq!(
        state.view().status.text,
        "This URL is already in your context."
    );
}
