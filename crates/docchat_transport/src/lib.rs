//! Docchat transport: the HTTP adapter between the pure orchestration core
//! and the document-processing backend. Every operation is one shot (no
//! retries) and returns a uniform [`ApiError`] on failure.
mod client;
mod filename;
mod handle;
mod types;

pub use client::{BackendApi, BackendSettings, ReqwestBackend, DEFAULT_BACKEND_ORIGIN};
pub use filename::{suggested_filename, DEFAULT_ARCHIVE_NAME};
pub use handle::{BackendCommand, BackendHandle, TransportEvent};
pub use types::{
    ApiError, ArchivePayload, AskReply, FailureKind, FilePart, OpToken, UploadAck, WireTurn,
};
