//! Effect runner: executes the side effects the core requests and feeds
//! transport completions back into the main loop as messages.

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use docchat_core::{ApiFailure, ChatTurn, Effect, Msg, Role, SavedArchive, StagedFile};
use docchat_transport::{
    ApiError, ArchivePayload, BackendCommand, BackendHandle, BackendSettings, FilePart,
    TransportEvent, WireTurn, DEFAULT_ARCHIVE_NAME,
};

use crate::save::ArchiveWriter;
use crate::AppEvent;

pub struct EffectRunner {
    backend: BackendHandle,
    writer: ArchiveWriter,
}

impl EffectRunner {
    pub fn new(
        event_tx: mpsc::Sender<AppEvent>,
        settings: BackendSettings,
        download_dir: PathBuf,
    ) -> Result<Self, ApiError> {
        let backend = BackendHandle::new(settings)?;
        let runner = Self {
            backend,
            writer: ArchiveWriter::new(download_dir),
        };
        runner.spawn_event_pump(event_tx);
        Ok(runner)
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::UploadCorpus { op, files } => {
                    client_info!("UploadCorpus op={} files={}", op, files.len());
                    self.backend.submit(BackendCommand::UploadCorpus {
                        op,
                        files: files.iter().map(to_file_part).collect(),
                    });
                }
                Effect::AskQuestion { op, query, history } => {
                    client_info!("AskQuestion op={} history_len={}", op, history.len());
                    self.backend.submit(BackendCommand::AskQuestion {
                        op,
                        query,
                        history: history.iter().map(to_wire_turn).collect(),
                    });
                }
                Effect::ResetCorpus { op } => {
                    client_info!("ResetCorpus op={}", op);
                    self.backend.submit(BackendCommand::ResetCorpus { op });
                }
                Effect::SubmitBatch { op, files, prompt } => {
                    client_info!("SubmitBatch op={} files={}", op, files.len());
                    self.backend.submit(BackendCommand::SubmitBatch {
                        op,
                        files: files.iter().map(to_file_part).collect(),
                        prompt,
                    });
                }
                Effect::SaveArchive { filename, bytes } => match self.writer.write(&filename, &bytes)
                {
                    Ok(path) => {
                        client_info!("archive saved to {}", path.display());
                        println!("archive saved to {}", path.display());
                    }
                    Err(err) => {
                        client_warn!("failed to save archive {}: {}", filename, err);
                        println!("could not save archive {filename}");
                    }
                },
            }
        }
    }

    fn spawn_event_pump(&self, event_tx: mpsc::Sender<AppEvent>) {
        let backend = self.backend.clone();
        thread::spawn(move || loop {
            if let Some(event) = backend.try_recv() {
                if event_tx.send(AppEvent::Intent(map_event(event))).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_event(event: TransportEvent) -> Msg {
    match event {
        TransportEvent::UploadFinished { op, result } => Msg::ChatUploadFinished {
            op,
            result: result.map(|ack| ack.status).map_err(into_failure),
        },
        TransportEvent::AnswerArrived { op, result } => Msg::ChatAnswerArrived {
            op,
            result: result.map(|reply| reply.answer).map_err(into_failure),
        },
        TransportEvent::ResetFinished { op, result } => Msg::ChatResetFinished {
            op,
            result: result.map(|ack| ack.status).map_err(into_failure),
        },
        TransportEvent::BatchFinished { op, result } => Msg::BatchSubmitFinished {
            op,
            result: result.map(into_archive).map_err(into_failure),
        },
    }
}

/// Applies the fixed default archive name when the response suggested none.
fn into_archive(payload: ArchivePayload) -> SavedArchive {
    SavedArchive {
        filename: payload
            .suggested_filename
            .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string()),
        bytes: Arc::new(payload.bytes.to_vec()),
    }
}

/// Raw transport errors go to the log; the core only sees the kind and keeps
/// its own user-facing wording.
fn into_failure(err: ApiError) -> ApiFailure {
    client_warn!("backend call failed: {err}");
    ApiFailure {
        kind: map_failure_kind(err.kind),
        message: err.message,
    }
}

fn map_failure_kind(kind: docchat_transport::FailureKind) -> docchat_core::FailureKind {
    match kind {
        docchat_transport::FailureKind::Network => docchat_core::FailureKind::Network,
        docchat_transport::FailureKind::Timeout => docchat_core::FailureKind::Timeout,
        docchat_transport::FailureKind::HttpStatus(code) => {
            docchat_core::FailureKind::HttpStatus(code)
        }
        docchat_transport::FailureKind::Decode => docchat_core::FailureKind::Decode,
    }
}

fn to_file_part(file: &StagedFile) -> FilePart {
    FilePart {
        name: file.name.clone(),
        mime_type: file.mime_type.clone(),
        bytes: file.bytes.as_ref().clone(),
    }
}

fn to_wire_turn(turn: &ChatTurn) -> WireTurn {
    WireTurn {
        role: match turn.role {
            Role::User => "user".to_string(),
            Role::Assistant => "assistant".to_string(),
        },
        content: turn.content.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn missing_suggestion_falls_back_to_default_name() {
        let archive = into_archive(ArchivePayload {
            bytes: Bytes::from_static(b"zip"),
            suggested_filename: None,
        });
        assert_eq!(archive.filename, DEFAULT_ARCHIVE_NAME);
    }

    #[test]
    fn suggested_name_is_kept() {
        let archive = into_archive(ArchivePayload {
            bytes: Bytes::from_static(b"zip"),
            suggested_filename: Some("report.zip".to_string()),
        });
        assert_eq!(archive.filename, "report.zip");
    }

    #[test]
    fn turns_serialize_with_wire_role_names() {
        assert_eq!(to_wire_turn(&ChatTurn::user("q")).role, "user");
        assert_eq!(to_wire_turn(&ChatTurn::assistant("a")).role, "assistant");
    }

    #[test]
    fn failure_kinds_map_one_to_one() {
        assert_eq!(
            map_failure_kind(docchat_transport::FailureKind::HttpStatus(503)),
            docchat_core::FailureKind::HttpStatus(503)
        );
        assert_eq!(
            map_failure_kind(docchat_transport::FailureKind::Decode),
            docchat_core::FailureKind::Decode
        );
    }
}
