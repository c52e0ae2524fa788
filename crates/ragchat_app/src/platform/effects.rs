use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use ragchat_core::{Effect, IngestOutcome, Msg};
use ragchat_engine::{BackendSettings, EngineError, EngineEvent, EngineHandle, IngestStatus};
use ragchat_logging::{rag_error, rag_info, rag_warn};

use super::app::AppEvent;

const EVENT_POLL: Duration = Duration::from_millis(250);

/// Anything that can carry out core effects.
pub(crate) trait EffectSink {
    fn enqueue(&self, effects: Vec<Effect>);
}

pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(
        settings: BackendSettings,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(settings)?;
        let runner = Self { engine };
        runner.spawn_event_loop(event_tx);
        Ok(runner)
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>) {
        let engine = self.engine.clone();
        thread::spawn(move || pump_events(|| engine.recv_timeout(EVENT_POLL), &event_tx));
    }
}

/// Forwards engine completions until either side of the pipe goes away.
fn pump_events(
    mut next: impl FnMut() -> Result<EngineEvent, RecvTimeoutError>,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    loop {
        let event = match next() {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                rag_warn!("Engine event channel closed; stopping event pump");
                break;
            }
        };
        if event_tx.send(AppEvent::Core(map_event(event))).is_err() {
            break;
        }
    }
}

impl EffectSink for EffectRunner {
    fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::UploadPdf {
                    request_id,
                    path,
                    session_id,
                } => {
                    rag_info!(
                        "UploadPdf request_id={} path={:?} session={}",
                        request_id,
                        path,
                        session_id.short()
                    );
                    self.engine
                        .upload_pdf(request_id, path, session_id.as_str());
                }
                Effect::IndexUrl {
                    request_id,
                    url,
                    session_id,
                } => {
                    rag_info!(
                        "IndexUrl request_id={} url={} session={}",
                        request_id,
                        url,
                        session_id.short()
                    );
                    self.engine.add_url(request_id, url, session_id.as_str());
                }
                Effect::SendChat {
                    request_id,
                    message,
                    session_id,
                } => {
                    rag_info!(
                        "SendChat request_id={} message_len={} session={}",
                        request_id,
                        message.len(),
                        session_id.short()
                    );
                    self.engine.chat(request_id, message, session_id.as_str());
                }
            }
        }
    }
}

/// Turn an engine completion into the core message, logging failures on the way.
pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted { request_id, result } => Msg::UploadFinished {
            request_id,
            result: match result {
                Ok(status) => {
                    if !matches!(status, IngestStatus::Success(_)) {
                        rag_warn!(
                            "Upload {} returned non-success status: {}",
                            request_id,
                            status.text()
                        );
                    }
                    Ok(map_status(status))
                }
                Err(err) => {
                    rag_error!("Upload {} failed: {}", request_id, err);
                    Err(err.to_string())
                }
            },
        },
        EngineEvent::UrlCompleted { request_id, result } => Msg::UrlIndexFinished {
            request_id,
            result: match result {
                Ok(status) => Ok(map_status(status)),
                Err(err) => {
                    rag_error!("URL indexing {} failed: {}", request_id, err);
                    Err(err.to_string())
                }
            },
        },
        EngineEvent::ChatCompleted { request_id, result } => match result {
            Ok(reply) => Msg::ChatReplied {
                request_id,
                answer: reply.answer,
                sources: reply.sources,
            },
            Err(err) => {
                rag_error!("Chat {} failed: {}", request_id, err);
                Msg::ChatFailed {
                    request_id,
                    error: err.to_string(),
                }
            }
        },
    }
}

fn map_status(status: IngestStatus) -> IngestOutcome {
    match status {
        IngestStatus::Success(text) => IngestOutcome::Success(text),
        IngestStatus::Duplicate(text) => IngestOutcome::Duplicate(text),
        IngestStatus::Empty(text) => IngestOutcome::Empty(text),
        IngestStatus::Other(text) => IngestOutcome::Other(text),
    }
}
