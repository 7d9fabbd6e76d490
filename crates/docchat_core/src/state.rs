use std::sync::Arc;

use crate::view_model::{AppViewModel, BatchView, ChatView, TurnView};

/// Sequence number stamped on each issued network operation. Completion
/// messages carry it back so late or orphaned responses can be discarded.
pub type OpToken = u64;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT_PLAIN: &str = "text/plain";

/// MIME types the chat corpus upload accepts.
pub fn is_chat_document(mime_type: &str) -> bool {
    mime_type == MIME_PDF || mime_type == MIME_TEXT_PLAIN
}

/// MIME types the batch workflow accepts.
pub fn is_batch_document(mime_type: &str) -> bool {
    mime_type == MIME_PDF
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One transcript message. Immutable once created; ordering in
/// [`ChatSession`] is append-only and equals submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A file the user has staged in the view but that has not left the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Arc<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusyKind {
    Upload,
    Ask,
    Reset,
    Submit,
}

/// Mutually exclusive workflow status. `Busy` carries the token of the one
/// outstanding operation; anything else means new intents may be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowStatus {
    #[default]
    Idle,
    Busy {
        kind: BusyKind,
        op: OpToken,
    },
    Succeeded,
    Failed,
}

impl WorkflowStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowStatus::Busy { .. })
    }
}

/// Transport failure as seen by the state machine. The raw error text is for
/// the diagnostic log; the view gets [`ApiFailure::user_notice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    HttpStatus(u16),
    Decode,
}

impl ApiFailure {
    /// Short human-readable notice for the view. Never the raw transport text.
    pub fn user_notice(&self) -> String {
        match self.kind {
            FailureKind::Network => "Network error. Is the backend running?".to_string(),
            FailureKind::Timeout => "Request timed out.".to_string(),
            FailureKind::HttpStatus(code) => format!("Server error ({code})."),
            FailureKind::Decode => "Unexpected server response.".to_string(),
        }
    }
}

/// Archive returned by a successful batch submission, with the filename the
/// save side effect should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArchive {
    pub filename: String,
    pub bytes: Arc<Vec<u8>>,
}

/// State owned by the single-document chat orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
    pending_query: String,
    staged_files: Vec<StagedFile>,
    staged_names: Vec<String>,
    upload_status: String,
    notice: String,
    status: WorkflowStatus,
}

impl ChatSession {
    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn pending_query(&self) -> &str {
        &self.pending_query
    }

    pub fn staged_files(&self) -> &[StagedFile] {
        &self.staged_files
    }

    /// True when `op` matches the currently outstanding operation of `kind`.
    /// Completions that fail this check are stale and must be ignored.
    pub(crate) fn is_current(&self, kind: BusyKind, op: OpToken) -> bool {
        self.status == WorkflowStatus::Busy { kind, op }
    }

    pub(crate) fn stage_files(&mut self, files: Vec<StagedFile>) {
        self.staged_names = files.iter().map(|f| f.name.clone()).collect();
        self.staged_files = files;
    }

    pub(crate) fn set_pending_query(&mut self, text: String) {
        self.pending_query = text;
    }

    pub(crate) fn set_upload_status(&mut self, line: impl Into<String>) {
        self.upload_status = line.into();
    }

    pub(crate) fn begin_upload(&mut self, op: OpToken) {
        self.status = WorkflowStatus::Busy {
            kind: BusyKind::Upload,
            op,
        };
        self.upload_status = "Uploading...".to_string();
        self.notice.clear();
    }

    pub(crate) fn apply_upload(&mut self, result: Result<String, ApiFailure>) {
        match result {
            Ok(status) => {
                self.upload_status = status;
                self.status = WorkflowStatus::Succeeded;
            }
            Err(_) => {
                self.upload_status = "Upload failed".to_string();
                self.status = WorkflowStatus::Failed;
            }
        }
    }

    /// Optimistic transition: the user turn is appended and the input cleared
    /// before the network round trip starts.
    pub(crate) fn begin_ask(&mut self, op: OpToken, query: String) {
        self.turns.push(ChatTurn::user(query));
        self.pending_query.clear();
        self.notice.clear();
        self.status = WorkflowStatus::Busy {
            kind: BusyKind::Ask,
            op,
        };
    }

    pub(crate) fn apply_answer(&mut self, result: Result<String, ApiFailure>) {
        match result {
            Ok(answer) => {
                self.turns.push(ChatTurn::assistant(answer));
                self.status = WorkflowStatus::Succeeded;
            }
            Err(failure) => {
                // The user turn stays in the transcript; no assistant turn.
                self.notice = failure.user_notice();
                self.status = WorkflowStatus::Failed;
            }
        }
    }

    pub(crate) fn begin_reset(&mut self, op: OpToken) {
        self.status = WorkflowStatus::Busy {
            kind: BusyKind::Reset,
            op,
        };
    }

    pub(crate) fn apply_reset(&mut self, result: Result<String, ApiFailure>) {
        match result {
            Ok(_) => *self = Self::default(),
            Err(failure) => {
                // Nothing is cleared optimistically; the session survives.
                self.notice = failure.user_notice();
                self.status = WorkflowStatus::Failed;
            }
        }
    }

    pub(crate) fn view(&self) -> ChatView {
        ChatView {
            transcript: self
                .turns
                .iter()
                .map(|turn| TurnView {
                    role: turn.role,
                    content: turn.content.clone(),
                })
                .collect(),
            pending_query: self.pending_query.clone(),
            staged_names: self.staged_names.join(", "),
            upload_status: self.upload_status.clone(),
            notice: self.notice.clone(),
            busy: match self.status {
                WorkflowStatus::Busy { kind, .. } => Some(kind),
                _ => None,
            },
        }
    }
}

/// State owned by the batch query orchestrator. A new submission replaces the
/// stored archive entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchJob {
    files: Vec<StagedFile>,
    file_names: Vec<String>,
    prompt: String,
    status_line: String,
    status: WorkflowStatus,
    archive: Option<SavedArchive>,
}

impl BatchJob {
    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn archive(&self) -> Option<&SavedArchive> {
        self.archive.as_ref()
    }

    pub(crate) fn is_current(&self, kind: BusyKind, op: OpToken) -> bool {
        self.status == WorkflowStatus::Busy { kind, op }
    }

    /// Non-PDF files are dropped silently, mirroring a picker `accept` filter.
    pub(crate) fn stage_files(&mut self, files: Vec<StagedFile>) {
        let files: Vec<StagedFile> = files
            .into_iter()
            .filter(|f| is_batch_document(&f.mime_type))
            .collect();
        self.file_names = files.iter().map(|f| f.name.clone()).collect();
        self.files = files;
    }

    pub(crate) fn set_prompt(&mut self, text: String) {
        self.prompt = text;
    }

    pub(crate) fn set_status_line(&mut self, line: impl Into<String>) {
        self.status_line = line.into();
    }

    pub(crate) fn begin_submit(&mut self, op: OpToken) {
        self.status = WorkflowStatus::Busy {
            kind: BusyKind::Submit,
            op,
        };
        self.status_line = "Uploading...".to_string();
    }

    pub(crate) fn apply_submit(&mut self, result: Result<SavedArchive, ApiFailure>) {
        match result {
            Ok(archive) => {
                self.archive = Some(archive);
                self.files.clear();
                self.file_names.clear();
                self.prompt.clear();
                self.status_line = "Download Ready".to_string();
                self.status = WorkflowStatus::Succeeded;
            }
            Err(_) => {
                self.status_line = "Error during upload".to_string();
                self.status = WorkflowStatus::Failed;
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn view(&self) -> BatchView {
        BatchView {
            file_names: self.file_names.clone(),
            prompt: self.prompt.clone(),
            status_line: self.status_line.clone(),
            busy: self.status.is_busy(),
            archive_filename: self.archive.as_ref().map(|a| a.filename.clone()),
        }
    }
}

/// Whole-client state: the two independent orchestrators plus the operation
/// token counter and the render-coalescing dirty flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    chat: ChatSession,
    batch: BatchJob,
    next_op: OpToken,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn batch(&self) -> &BatchJob {
        &self.batch
    }

    pub(crate) fn chat_mut(&mut self) -> &mut ChatSession {
        &mut self.chat
    }

    pub(crate) fn batch_mut(&mut self) -> &mut BatchJob {
        &mut self.batch
    }

    pub(crate) fn take_op(&mut self) -> OpToken {
        self.next_op += 1;
        self.next_op
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the dirty flag and clears it. The platform loop renders only
    /// when this was set since the last render.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            chat: self.chat.view(),
            batch: self.batch.view(),
            dirty: self.dirty,
        }
    }
}
