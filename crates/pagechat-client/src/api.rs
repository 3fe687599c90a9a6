//! HTTP transport for the pagechat backend.
//!
//! One method per backend operation. Every method performs a single request
//! with no retries; a non-2xx response surfaces as [`Error::Api`] carrying
//! the server-provided detail when present, except HTTP 429 which maps to
//! [`Error::RateLimited`]. `chat` is the one exception to the
//! parse-and-return rule: it hands back the raw, still-open response so the
//! caller can read the body incrementally.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use pagechat_core::{
    validate_upload, ChatRequest, Conversation, ConversationExport, DocumentRecord, Error, Message,
    Result, UploadResponse,
};

use crate::config::ClientConfig;

/// Error body shape used by the backend for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP client for the pagechat backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(base_url = %config.base_url, "Initializing API client");

        Ok(Self { http, config })
    }

    /// Create with configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Map a non-2xx response into an error, preserving the server detail.
    pub async fn response_error(response: Response) -> Error {
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Error::RateLimited;
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail.or(body.error))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Upload a document as a multipart form.
    ///
    /// Validation (extension allowlist, size cap) runs client-side first, so
    /// a doomed upload never leaves the process.
    pub async fn upload_document(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        let validation = validate_upload(filename, bytes.len() as u64);
        if !validation.allowed {
            return Err(Error::InvalidInput(
                validation
                    .block_reason
                    .unwrap_or_else(|| "upload rejected".to_string()),
            ));
        }

        debug!(filename, size = bytes.len(), "Uploading document");

        let part = Part::bytes(bytes).file_name(filename.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch the current status record for one document.
    ///
    /// Returns `Ok(None)` when the document no longer exists (404).
    pub async fn get_document_status(&self, id: Uuid) -> Result<Option<DocumentRecord>> {
        let response = self
            .http
            .get(self.url(&format!("/api/documents/{}", id)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        Ok(Some(response.json().await?))
    }

    /// List all documents.
    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let response = self.http.get(self.url("/api/documents")).send().await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Delete a document and all its server-side resources.
    pub async fn delete_document(&self, id: Uuid) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/documents/{}", id)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        debug!(document_id = %id, "Document deleted");
        Ok(())
    }

    // =========================================================================
    // Conversations
    // =========================================================================

    /// List all conversations, most recently updated first.
    pub async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let response = self.http.get(self.url("/api/conversations")).send().await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch the full message history of one conversation.
    pub async fn get_conversation_messages(&self, id: Uuid) -> Result<Vec<Message>> {
        let response = self
            .http
            .get(self.url(&format!("/api/conversations/{}/messages", id)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Delete a conversation.
    pub async fn delete_conversation(&self, id: Uuid) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/conversations/{}", id)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        debug!(conversation_id = %id, "Conversation deleted");
        Ok(())
    }

    /// Rename a conversation; returns the updated record.
    pub async fn rename_conversation(&self, id: Uuid, title: &str) -> Result<Conversation> {
        let response = self
            .http
            .patch(self.url(&format!("/api/conversations/{}/rename", id)))
            .json(&serde_json::json!({ "title": title }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Export a conversation as markdown.
    pub async fn export_conversation(&self, id: Uuid) -> Result<ConversationExport> {
        let response = self
            .http
            .get(self.url(&format!("/api/conversations/{}/export", id)))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::response_error(response).await);
        }

        Ok(response.json().await?)
    }

    // =========================================================================
    // Chat
    // =========================================================================

    /// Open a streaming chat request.
    ///
    /// Returns the raw, still-open response; the caller checks the status
    /// and reads the body incrementally. See [`crate::stream::event_stream`].
    pub async fn chat(&self, request: &ChatRequest) -> Result<Response> {
        debug!(
            question_len = request.question.len(),
            document_count = request.document_ids.len(),
            "Opening chat stream"
        );

        Ok(self
            .http
            .post(self.url("/api/chat"))
            .json(request)
            .send()
            .await?)
    }
}
