use std::sync::Arc;

use crate::state::{ChatTurn, OpToken, StagedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the given (already MIME-filtered) files to the corpus store.
    UploadCorpus {
        op: OpToken,
        files: Vec<StagedFile>,
    },
    /// Ask one question; `history` is the transcript as it stood before the
    /// question was appended.
    AskQuestion {
        op: OpToken,
        query: String,
        history: Vec<ChatTurn>,
    },
    /// Tell the backend to discard the current corpus.
    ResetCorpus { op: OpToken },
    /// Submit the batch job for processing.
    SubmitBatch {
        op: OpToken,
        files: Vec<StagedFile>,
        prompt: String,
    },
    /// Hand the result archive to the platform save mechanism.
    SaveArchive {
        filename: String,
        bytes: Arc<Vec<u8>>,
    },
}
