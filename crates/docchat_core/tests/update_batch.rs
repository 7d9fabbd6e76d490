use std::sync::{Arc, Once};

use docchat_core::{
    update, ApiFailure, AppState, Effect, FailureKind, Msg, OpToken, SavedArchive, StagedFile,
    WorkflowStatus, MIME_PDF,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn pdf(name: &str) -> StagedFile {
    StagedFile {
        name: name.to_string(),
        mime_type: MIME_PDF.to_string(),
        bytes: Arc::new(format!("%PDF {name}").into_bytes()),
    }
}

fn archive(filename: &str, payload: &str) -> SavedArchive {
    SavedArchive {
        filename: filename.to_string(),
        bytes: Arc::new(payload.as_bytes().to_vec()),
    }
}

/// Stages one PDF, sets a prompt, submits, and returns the issued token.
fn submit_job(state: AppState) -> (AppState, OpToken) {
    let (state, _) = update(state, Msg::BatchFilesStaged(vec![pdf("doc.pdf")]));
    let (state, _) = update(state, Msg::BatchPromptEdited("summarize".into()));
    let (state, effects) = update(state, Msg::BatchSubmitClicked);
    let op = match effects.as_slice() {
        [Effect::SubmitBatch { op, .. }] => *op,
        other => panic!("expected one SubmitBatch effect, got {other:?}"),
    };
    (state, op)
}

#[test]
fn submit_without_files_is_validation_noop() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::BatchPromptEdited("summarize".into()));
    let (state, effects) = update(state, Msg::BatchSubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(state.batch().status(), WorkflowStatus::Idle);
    assert_eq!(
        state.view().batch.status_line,
        "Please select files and enter a prompt."
    );
}

#[test]
fn submit_without_prompt_is_validation_noop() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::BatchFilesStaged(vec![pdf("doc.pdf")]));
    let (state, effects) = update(state, Msg::BatchSubmitClicked);

    assert!(effects.is_empty());
    assert_eq!(state.batch().status(), WorkflowStatus::Idle);
}

#[test]
fn staging_keeps_only_pdfs() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(
        state,
        Msg::BatchFilesStaged(vec![
            pdf("doc.pdf"),
            StagedFile {
                name: "photo.png".to_string(),
                mime_type: "image/png".to_string(),
                bytes: Arc::new(vec![0x89]),
            },
        ]),
    );

    let names: Vec<&str> = state.batch().files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["doc.pdf"]);
    assert_eq!(state.view().batch.file_names, vec!["doc.pdf".to_string()]);
}

#[test]
fn submit_carries_files_and_prompt() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::BatchFilesStaged(vec![pdf("a.pdf"), pdf("b.pdf")]));
    let (state, _) = update(state, Msg::BatchPromptEdited("summarize each".into()));
    let (state, effects) = update(state, Msg::BatchSubmitClicked);

    match effects.as_slice() {
        [Effect::SubmitBatch { files, prompt, .. }] => {
            assert_eq!(files.len(), 2);
            assert_eq!(prompt, "summarize each");
        }
        other => panic!("expected one SubmitBatch effect, got {other:?}"),
    }
    assert!(state.batch().status().is_busy());
    assert_eq!(state.view().batch.status_line, "Uploading...");
}

#[test]
fn submit_success_stores_archive_and_requests_save() {
    init_logging();
    let state = AppState::new();
    let (state, op) = submit_job(state);

    let (state, effects) = update(
        state,
        Msg::BatchSubmitFinished {
            op,
            result: Ok(archive("report.zip", "zipbytes")),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::SaveArchive {
            filename: "report.zip".to_string(),
            bytes: Arc::new(b"zipbytes".to_vec()),
        }]
    );
    assert_eq!(state.batch().status(), WorkflowStatus::Succeeded);
    assert_eq!(state.view().batch.status_line, "Download Ready");
    assert_eq!(
        state.batch().archive().map(|a| a.filename.as_str()),
        Some("report.zip")
    );
    // Success clears the form for the next job.
    assert!(state.batch().files().is_empty());
    assert_eq!(state.batch().prompt(), "");
}

#[test]
fn second_submit_replaces_previous_archive() {
    init_logging();
    let state = AppState::new();
    let (state, op) = submit_job(state);
    let (state, _) = update(
        state,
        Msg::BatchSubmitFinished {
            op,
            result: Ok(archive("first.zip", "one")),
        },
    );

    let (state, op) = submit_job(state);
    let (state, _) = update(
        state,
        Msg::BatchSubmitFinished {
            op,
            result: Ok(archive("second.zip", "two")),
        },
    );

    let stored = state.batch().archive().expect("archive stored");
    assert_eq!(stored.filename, "second.zip");
    assert_eq!(*stored.bytes, b"two".to_vec());
}

#[test]
fn submit_failure_stores_no_archive() {
    init_logging();
    let state = AppState::new();
    let (state, op) = submit_job(state);

    let (state, effects) = update(
        state,
        Msg::BatchSubmitFinished {
            op,
            result: Err(ApiFailure {
                kind: FailureKind::HttpStatus(500),
                message: "internal server error".to_string(),
            }),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.batch().status(), WorkflowStatus::Failed);
    assert_eq!(state.view().batch.status_line, "Error during upload");
    assert!(state.batch().archive().is_none());
}

#[test]
fn submit_is_single_flight() {
    init_logging();
    let state = AppState::new();
    let (state, _op) = submit_job(state);

    let (state, effects) = update(state, Msg::BatchSubmitClicked);
    assert!(effects.is_empty());
    assert!(state.batch().status().is_busy());
}

#[test]
fn reset_clears_job_and_archive() {
    init_logging();
    let state = AppState::new();
    let (state, op) = submit_job(state);
    let (state, _) = update(
        state,
        Msg::BatchSubmitFinished {
            op,
            result: Ok(archive("report.zip", "zipbytes")),
        },
    );

    let (state, effects) = update(state, Msg::BatchResetClicked);
    assert!(effects.is_empty());
    assert_eq!(state.batch().status(), WorkflowStatus::Idle);
    assert!(state.batch().archive().is_none());
    assert!(state.batch().files().is_empty());
    assert_eq!(state.batch().prompt(), "");
    assert_eq!(state.view().batch.status_line, "");
}

#[test]
fn reset_while_busy_is_rejected() {
    init_logging();
    let state = AppState::new();
    let (state, op) = submit_job(state);

    let before = state.clone();
    let (state, effects) = update(state, Msg::BatchResetClicked);
    assert!(effects.is_empty());
    assert_eq!(state, before);

    // The in-flight submission still completes normally.
    let (state, effects) = update(
        state,
        Msg::BatchSubmitFinished {
            op,
            result: Ok(archive("report.zip", "zipbytes")),
        },
    );
    assert_eq!(effects.len(), 1);
    assert_eq!(state.batch().status(), WorkflowStatus::Succeeded);
}

#[test]
fn stale_submit_completion_is_ignored() {
    init_logging();
    let state = AppState::new();
    let (state, op) = submit_job(state);

    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::BatchSubmitFinished {
            op: op + 1,
            result: Ok(archive("phantom.zip", "zipbytes")),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn chat_and_batch_can_be_busy_at_once() {
    init_logging();
    let state = AppState::new();
    let (state, _op) = submit_job(state);
    assert!(state.batch().status().is_busy());

    let (state, _) = update(state, Msg::ChatQueryEdited("q1".into()));
    let (state, effects) = update(state, Msg::ChatQuerySubmitted);
    assert_eq!(effects.len(), 1);
    assert!(state.chat().status().is_busy());
    assert!(state.batch().status().is_busy());
}
