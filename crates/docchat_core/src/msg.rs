use crate::state::{ApiFailure, OpToken, SavedArchive, StagedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User dropped or picked files for the chat corpus.
    ChatFilesStaged(Vec<StagedFile>),
    /// User edited the chat question input.
    ChatQueryEdited(String),
    /// User clicked Upload.
    ChatUploadClicked,
    /// Transport finished the corpus upload; payload is the backend status line.
    ChatUploadFinished {
        op: OpToken,
        result: Result<String, ApiFailure>,
    },
    /// User submitted the current question.
    ChatQuerySubmitted,
    /// Transport returned the assistant answer for an in-flight question.
    ChatAnswerArrived {
        op: OpToken,
        result: Result<String, ApiFailure>,
    },
    /// User clicked Reset Chat.
    ChatResetClicked,
    /// Transport finished the server-side corpus reset.
    ChatResetFinished {
        op: OpToken,
        result: Result<String, ApiFailure>,
    },
    /// User dropped or picked files for a batch job.
    BatchFilesStaged(Vec<StagedFile>),
    /// User edited the shared batch prompt.
    BatchPromptEdited(String),
    /// User clicked Submit on the batch form.
    BatchSubmitClicked,
    /// Transport finished the batch round trip; payload is the result archive.
    BatchSubmitFinished {
        op: OpToken,
        result: Result<SavedArchive, ApiFailure>,
    },
    /// User clicked Reset on the batch form.
    BatchResetClicked,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
