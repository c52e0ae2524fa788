use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use ragchat_engine::{
    BackendError, BackendSettings, ChatReply, EngineEvent, EngineHandle, FailureKind,
    IngestStatus, RagBackend,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

/// Records every call and answers from canned values.
#[derive(Default)]
struct RecordingBackend {
    calls: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl RagBackend for RecordingBackend {
    async fn upload_pdf(
        &self,
        path: &Path,
        session_id: &str,
    ) -> Result<IngestStatus, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("upload {} {session_id}", path.display()));
        Ok(IngestStatus::Empty("No documents provided".to_string()))
    }

    async fn add_url(&self, url: &str, session_id: &str) -> Result<IngestStatus, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("url {url} {session_id}"));
        Ok(IngestStatus::Success("Success".to_string()))
    }

    async fn chat(&self, message: &str, session_id: &str) -> Result<ChatReply, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("chat {message} {session_id}"));
        Ok(ChatReply {
            answer: format!("echo {message}"),
            sources: Vec::new(),
        })
    }
}

fn collect(engine: &EngineHandle, count: usize) -> Vec<EngineEvent> {
    let mut events = Vec::with_capacity(count);
    while events.len() < count {
        let event = engine.recv_timeout(WAIT).expect("engine event");
        events.push(event);
    }
    events
}

#[test]
fn commands_reach_backend_with_session() {
    let backend = Arc::new(RecordingBackend::default());
    let engine = EngineHandle::with_backend(backend.clone()).expect("engine");

    engine.upload_pdf(1, PathBuf::from("a.pdf"), "sess");
    engine.add_url(2, "https://example.com", "sess");
    engine.chat(3, "hello", "sess");

    let mut events = collect(&engine, 3);
    events.sort_by_key(EngineEvent::request_id);
    assert_eq!(
        events,
        vec![
            EngineEvent::UploadCompleted {
                request_id: 1,
                result: Ok(IngestStatus::Empty("No documents provided".to_string())),
            },
            EngineEvent::UrlCompleted {
                request_id: 2,
                result: Ok(IngestStatus::Success("Success".to_string())),
            },
            EngineEvent::ChatCompleted {
                request_id: 3,
                result: Ok(ChatReply {
                    answer: "echo hello".to_string(),
                    sources: Vec::new(),
                }),
            },
        ]
    );

    let mut calls = backend.calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            "chat hello sess".to_string(),
            "upload a.pdf sess".to_string(),
            "url https://example.com sess".to_string(),
        ]
    );
    assert!(engine.try_recv().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_chats_complete_in_arrival_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({ "message": "slow" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(400))
                .set_body_json(json!({ "answer": "slow answer", "sources": [] })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({ "message": "fast" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "answer": "fast answer", "sources": [] })),
        )
        .mount(&server)
        .await;

    let engine = EngineHandle::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .expect("engine");

    engine.chat(1, "slow", "sess");
    engine.chat(2, "fast", "sess");

    let order: Vec<_> = collect(&engine, 2)
        .iter()
        .map(EngineEvent::request_id)
        .collect();
    assert_eq!(order, vec![2, 1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn transport_failure_is_reported_as_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/add-url"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let engine = EngineHandle::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .expect("engine");

    engine.add_url(9, "https://example.com", "sess");

    match collect(&engine, 1).remove(0) {
        EngineEvent::UrlCompleted { request_id, result } => {
            assert_eq!(request_id, 9);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(503));
        }
        other => panic!("unexpected event {other:?}"),
    }
}
