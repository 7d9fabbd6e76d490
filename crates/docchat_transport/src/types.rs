use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type OpToken = u64;

/// Uniform failure shape handed across the adapter boundary. Plain data so
/// callers can compare and store it without trait objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error("network error")]
    Network,
    #[error("timeout")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("decode error")]
    Decode,
}

/// Backend acknowledgement for upload and reset calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadAck {
    pub status: String,
}

/// Backend answer for one chat question.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AskReply {
    pub answer: String,
}

/// One transcript turn as serialized on the wire: `{"role": ..., "content": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireTurn {
    pub role: String,
    pub content: String,
}

/// One file as attached to a multipart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Binary result of a batch submission. `suggested_filename` comes from the
/// `content-disposition` response header when present and well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePayload {
    pub bytes: Bytes,
    pub suggested_filename: Option<String>,
}
