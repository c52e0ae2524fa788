use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use ragchat_logging::{rag_debug, rag_warn};

use crate::backend::{BackendSettings, RagBackend, ReqwestBackend};
use crate::{BackendError, EngineEvent, RequestId};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("backend setup failed: {0}")]
    Backend(#[from] BackendError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
}

enum EngineCommand {
    UploadPdf {
        request_id: RequestId,
        path: PathBuf,
        session_id: String,
    },
    AddUrl {
        request_id: RequestId,
        url: String,
        session_id: String,
    },
    Chat {
        request_id: RequestId,
        message: String,
        session_id: String,
    },
}

/// Handle to the background IO thread.
///
/// Every command runs as its own task, so completions arrive in whatever
/// order the backend answers. Clones share the same command and event
/// channels; the thread exits once every clone is dropped.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, EngineError> {
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn RagBackend>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(backend.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
            rag_debug!("Engine command channel closed; shutting down");
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn upload_pdf(&self, request_id: RequestId, path: PathBuf, session_id: impl Into<String>) {
        self.submit(EngineCommand::UploadPdf {
            request_id,
            path,
            session_id: session_id.into(),
        });
    }

    pub fn add_url(
        &self,
        request_id: RequestId,
        url: impl Into<String>,
        session_id: impl Into<String>,
    ) {
        self.submit(EngineCommand::AddUrl {
            request_id,
            url: url.into(),
            session_id: session_id.into(),
        });
    }

    pub fn chat(
        &self,
        request_id: RequestId,
        message: impl Into<String>,
        session_id: impl Into<String>,
    ) {
        self.submit(EngineCommand::Chat {
            request_id,
            message: message.into(),
            session_id: session_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    /// Blocks up to `timeout` for the next completion.
    ///
    /// `Disconnected` means the engine thread is gone and no more events will arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        let receiver = self
            .event_rx
            .lock()
            .map_err(|_| RecvTimeoutError::Disconnected)?;
        receiver.recv_timeout(timeout)
    }

    fn submit(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            rag_warn!("Engine thread is gone; dropping command");
        }
    }
}

async fn handle_command(backend: &dyn RagBackend, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::UploadPdf {
            request_id,
            path,
            session_id,
        } => EngineEvent::UploadCompleted {
            request_id,
            result: backend.upload_pdf(&path, &session_id).await,
        },
        EngineCommand::AddUrl {
            request_id,
            url,
            session_id,
        } => EngineEvent::UrlCompleted {
            request_id,
            result: backend.add_url(&url, &session_id).await,
        },
        EngineCommand::Chat {
            request_id,
            message,
            session_id,
        } => EngineEvent::ChatCompleted {
            request_id,
            result: backend.chat(&message, &session_id).await,
        },
    }
}
