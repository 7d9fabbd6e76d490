use crate::state::is_chat_document;
use crate::{AppState, BusyKind, Effect, Msg, StagedFile};

/// Pure update function: applies a message to state and returns any effects.
///
/// Both workflows gate every mutating intent on their own `Busy` status, so at
/// most one network operation per workflow is outstanding at a time and
/// completions always arrive in issuance order. Completion messages carry the
/// token of the operation that produced them; a mismatch means the completion
/// is stale and is dropped without touching state.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ChatFilesStaged(files) => {
            state.chat_mut().stage_files(files);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ChatQueryEdited(text) => {
            state.chat_mut().set_pending_query(text);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ChatUploadClicked => {
            if state.chat().status().is_busy() {
                return (state, Vec::new());
            }
            if state.chat().staged_files().is_empty() {
                state
                    .chat_mut()
                    .set_upload_status("Select files to upload first.");
                state.mark_dirty();
                return (state, Vec::new());
            }
            let files: Vec<StagedFile> = state
                .chat()
                .staged_files()
                .iter()
                .filter(|f| is_chat_document(&f.mime_type))
                .cloned()
                .collect();
            if files.is_empty() {
                state
                    .chat_mut()
                    .set_upload_status("No supported files staged (PDF or plain text).");
                state.mark_dirty();
                return (state, Vec::new());
            }
            let op = state.take_op();
            state.chat_mut().begin_upload(op);
            state.mark_dirty();
            vec![Effect::UploadCorpus { op, files }]
        }
        Msg::ChatUploadFinished { op, result } => {
            if !state.chat().is_current(BusyKind::Upload, op) {
                return (state, Vec::new());
            }
            state.chat_mut().apply_upload(result);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ChatQuerySubmitted => {
            if state.chat().status().is_busy() {
                return (state, Vec::new());
            }
            let query = state.chat().pending_query().trim().to_string();
            if query.is_empty() {
                return (state, Vec::new());
            }
            // History is captured before the optimistic append; the backend
            // receives the transcript as it stood when the question was asked.
            let history = state.chat().turns().to_vec();
            let op = state.take_op();
            state.chat_mut().begin_ask(op, query.clone());
            state.mark_dirty();
            vec![Effect::AskQuestion { op, query, history }]
        }
        Msg::ChatAnswerArrived { op, result } => {
            if !state.chat().is_current(BusyKind::Ask, op) {
                return (state, Vec::new());
            }
            state.chat_mut().apply_answer(result);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ChatResetClicked => {
            // Reset while busy is rejected rather than stale-tagged; the
            // in-flight operation completes against unreset state.
            if state.chat().status().is_busy() {
                return (state, Vec::new());
            }
            let op = state.take_op();
            state.chat_mut().begin_reset(op);
            state.mark_dirty();
            vec![Effect::ResetCorpus { op }]
        }
        Msg::ChatResetFinished { op, result } => {
            if !state.chat().is_current(BusyKind::Reset, op) {
                return (state, Vec::new());
            }
            state.chat_mut().apply_reset(result);
            state.mark_dirty();
            Vec::new()
        }
        Msg::BatchFilesStaged(files) => {
            state.batch_mut().stage_files(files);
            state.mark_dirty();
            Vec::new()
        }
        Msg::BatchPromptEdited(text) => {
            state.batch_mut().set_prompt(text);
            state.mark_dirty();
            Vec::new()
        }
        Msg::BatchSubmitClicked => {
            if state.batch().status().is_busy() {
                return (state, Vec::new());
            }
            if state.batch().files().is_empty() || state.batch().prompt().trim().is_empty() {
                state
                    .batch_mut()
                    .set_status_line("Please select files and enter a prompt.");
                state.mark_dirty();
                return (state, Vec::new());
            }
            let files = state.batch().files().to_vec();
            let prompt = state.batch().prompt().to_string();
            let op = state.take_op();
            state.batch_mut().begin_submit(op);
            state.mark_dirty();
            vec![Effect::SubmitBatch { op, files, prompt }]
        }
        Msg::BatchSubmitFinished { op, result } => {
            if !state.batch().is_current(BusyKind::Submit, op) {
                return (state, Vec::new());
            }
            let save = result.as_ref().ok().map(|archive| Effect::SaveArchive {
                filename: archive.filename.clone(),
                bytes: archive.bytes.clone(),
            });
            state.batch_mut().apply_submit(result);
            state.mark_dirty();
            save.into_iter().collect()
        }
        Msg::BatchResetClicked => {
            if state.batch().status().is_busy() {
                return (state, Vec::new());
            }
            state.batch_mut().clear();
            state.mark_dirty();
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
