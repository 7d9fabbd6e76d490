use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use crate::client::{BackendApi, BackendSettings, ReqwestBackend};
use crate::types::{ApiError, ArchivePayload, AskReply, FilePart, OpToken, UploadAck, WireTurn};

/// One request for the backend worker. The operation token is round-tripped
/// into the matching [`TransportEvent`] so the core can drop stale results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    UploadCorpus {
        op: OpToken,
        files: Vec<FilePart>,
    },
    AskQuestion {
        op: OpToken,
        query: String,
        history: Vec<WireTurn>,
    },
    ResetCorpus {
        op: OpToken,
    },
    SubmitBatch {
        op: OpToken,
        files: Vec<FilePart>,
        prompt: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    UploadFinished {
        op: OpToken,
        result: Result<UploadAck, ApiError>,
    },
    AnswerArrived {
        op: OpToken,
        result: Result<AskReply, ApiError>,
    },
    ResetFinished {
        op: OpToken,
        result: Result<UploadAck, ApiError>,
    },
    BatchFinished {
        op: OpToken,
        result: Result<ArchivePayload, ApiError>,
    },
}

/// Bridge between the synchronous core loop and the async HTTP client: a
/// worker thread owns a tokio runtime, commands go in over a channel, events
/// come back over another. The handle imposes no ordering of its own; the
/// core's busy gating keeps each workflow single-flight.
#[derive(Clone)]
pub struct BackendHandle {
    cmd_tx: mpsc::Sender<BackendCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<TransportEvent>>>,
}

impl BackendHandle {
    pub fn new(settings: BackendSettings) -> Result<Self, ApiError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let backend = Arc::new(ReqwestBackend::new(settings)?);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    client_logging::client_error!("tokio runtime failed to start: {err}");
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = execute(backend.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn submit(&self, command: BackendCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<TransportEvent> {
        self.event_rx
            .lock()
            .ok()
            .and_then(|rx| rx.try_recv().ok())
    }
}

async fn execute(api: &dyn BackendApi, command: BackendCommand) -> TransportEvent {
    match command {
        BackendCommand::UploadCorpus { op, files } => TransportEvent::UploadFinished {
            op,
            result: api.upload_corpus(&files).await,
        },
        BackendCommand::AskQuestion { op, query, history } => TransportEvent::AnswerArrived {
            op,
            result: api.ask_question(&query, &history).await,
        },
        BackendCommand::ResetCorpus { op } => TransportEvent::ResetFinished {
            op,
            result: api.reset_corpus().await,
        },
        BackendCommand::SubmitBatch { op, files, prompt } => TransportEvent::BatchFinished {
            op,
            result: api.submit_batch(&files, &prompt).await,
        },
    }
}
