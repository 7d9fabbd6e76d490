use std::time::Duration;

use client_logging::{client_debug, client_warn};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::filename::suggested_filename;
use crate::types::{ApiError, ArchivePayload, AskReply, FailureKind, FilePart, UploadAck, WireTurn};

/// Fixed development origin of the processing backend.
pub const DEFAULT_BACKEND_ORIGIN: &str = "http://127.0.0.1:5000/";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BACKEND_ORIGIN).expect("default origin parses"),
            connect_timeout: Duration::from_secs(10),
            // Batch jobs run one LLM pass per document; give them room.
            request_timeout: Duration::from_secs(600),
        }
    }
}

/// The four backend operations. One HTTP round trip per call, no retries;
/// retry policy belongs to the caller.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    /// `POST /upload_documents`, multipart with repeated `file` fields.
    /// Callers pre-filter by MIME type; the adapter sends what it is given.
    async fn upload_corpus(&self, files: &[FilePart]) -> Result<UploadAck, ApiError>;

    /// `POST /ask_documents` with `{query, chat_history}`. The full history is
    /// sent even though the backend keeps server-side state; it may use it for
    /// conversational context.
    async fn ask_question(&self, query: &str, history: &[WireTurn])
        -> Result<AskReply, ApiError>;

    /// `POST /clear_db`, empty body.
    async fn reset_corpus(&self) -> Result<UploadAck, ApiError>;

    /// `POST /batch_file_query`, multipart with repeated `uploaded_files`
    /// fields plus `user_prompt`. The body is an opaque archive and is never
    /// JSON-decoded.
    async fn submit_batch(
        &self,
        files: &[FilePart],
        prompt: &str,
    ) -> Result<ArchivePayload, ApiError>;
}

#[derive(Serialize)]
struct AskRequest<'a> {
    query: &'a str,
    chat_history: &'a [WireTurn],
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))
    }

    fn multipart_files(field: &'static str, files: &[FilePart]) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str(&file.mime_type)
                .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
            form = form.part(field, part);
        }
        Ok(form)
    }
}

#[async_trait::async_trait]
impl BackendApi for ReqwestBackend {
    async fn upload_corpus(&self, files: &[FilePart]) -> Result<UploadAck, ApiError> {
        client_debug!("upload_corpus: {} file(s)", files.len());
        let form = Self::multipart_files("file", files)?;
        let response = self
            .client
            .post(self.endpoint("upload_documents")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_json(check_status(response)?).await
    }

    async fn ask_question(
        &self,
        query: &str,
        history: &[WireTurn],
    ) -> Result<AskReply, ApiError> {
        client_debug!("ask_question: {} prior turn(s)", history.len());
        let body = AskRequest {
            query,
            chat_history: history,
        };
        let response = self
            .client
            .post(self.endpoint("ask_documents")?)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_json(check_status(response)?).await
    }

    async fn reset_corpus(&self) -> Result<UploadAck, ApiError> {
        client_debug!("reset_corpus");
        let response = self
            .client
            .post(self.endpoint("clear_db")?)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_json(check_status(response)?).await
    }

    async fn submit_batch(
        &self,
        files: &[FilePart],
        prompt: &str,
    ) -> Result<ArchivePayload, ApiError> {
        client_debug!("submit_batch: {} file(s)", files.len());
        let form =
            Self::multipart_files("uploaded_files", files)?.text("user_prompt", prompt.to_string());
        let response = self
            .client
            .post(self.endpoint("batch_file_query")?)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = check_status(response)?;

        // Header is read before the body is consumed. A malformed or missing
        // token degrades to None; the caller applies the default name.
        let suggested = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(suggested_filename);

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        Ok(ArchivePayload {
            bytes,
            suggested_filename: suggested,
        })
    }
}

/// Non-2xx becomes `HttpStatus` before any body decoding is attempted.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if !status.is_success() {
        client_warn!("backend returned {}", status);
        return Err(ApiError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    Ok(response)
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(map_transport_error)?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
