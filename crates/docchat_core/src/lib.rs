//! Docchat core: pure orchestration state machines for the chat and batch
//! workflows. No IO happens here; user intents and transport completions come
//! in as [`Msg`]s and requested side effects go out as [`Effect`]s.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    is_batch_document, is_chat_document, ApiFailure, AppState, BatchJob, BusyKind, ChatSession,
    ChatTurn, FailureKind, OpToken, Role, SavedArchive, StagedFile, WorkflowStatus, MIME_PDF,
    MIME_TEXT_PLAIN,
};
pub use update::update;
pub use view_model::{AppViewModel, BatchView, ChatView, TurnView};
