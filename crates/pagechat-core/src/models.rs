//! Core data models for pagechat.
//!
//! These types mirror the backend HTTP contract: documents, conversations,
//! messages, and citations. Raw wire records live next to the cleaned-up
//! domain types they convert into.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// Processing state of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Uploaded, indexing still running server-side.
    Processing,
    /// Indexed and available for retrieval.
    Ready,
    /// Indexing failed; the document cannot be queried.
    Failed,
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentStatus::Processing => write!(f, "processing"),
            DocumentStatus::Ready => write!(f, "ready"),
            DocumentStatus::Failed => write!(f, "failed"),
        }
    }
}

/// An uploaded source document as tracked by the session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    pub status: DocumentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    pub upload_date: DateTime<Utc>,
}

/// Raw document record as returned by the backend.
///
/// The backend does not report a three-state status directly; it exposes
/// `processed` and `processing_error`, which [`DocumentRecord::status`]
/// folds into a [`DocumentStatus`].
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub filename: String,
    pub original_filename: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub page_count: Option<u32>,
    pub upload_date: DateTime<Utc>,
    #[serde(default)]
    pub processed: bool,
    #[serde(default)]
    pub processing_error: Option<String>,
    #[serde(default)]
    pub chunk_count: Option<u32>,
}

impl DocumentRecord {
    /// Fold the backend's `processed`/`processing_error` pair into a status.
    pub fn status(&self) -> DocumentStatus {
        if self.processed {
            DocumentStatus::Ready
        } else if self.processing_error.is_some() {
            DocumentStatus::Failed
        } else {
            DocumentStatus::Processing
        }
    }
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        let status = record.status();
        Document {
            id: record.id,
            filename: record.filename,
            original_filename: record.original_filename,
            status,
            page_count: record.page_count,
            upload_date: record.upload_date,
        }
    }
}

/// Acknowledgment returned by the upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub document_id: Uuid,
    pub filename: String,
    pub status: String,
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// CONVERSATION TYPES
// =============================================================================

/// A persisted conversation. The title is assigned server-side on the first
/// turn and may still be null for a freshly created conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Markdown export of a conversation, with a suggested download filename.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationExport {
    pub filename: String,
    pub content: String,
}

// =============================================================================
// MESSAGE TYPES
// =============================================================================

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A pointer from an assistant answer back to a page of a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: Uuid,
    pub filename: String,
    pub page: u32,
    pub chunk_text: String,
}

/// A single turn in a conversation. Assistant messages carry citations;
/// user messages never do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
            citations: None,
            created_at: Utc::now(),
        }
    }

    /// Create an assistant message stamped with the current time.
    pub fn assistant(content: impl Into<String>, citations: Vec<Citation>) -> Self {
        Message {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: content.into(),
            citations: Some(citations),
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// CHAT REQUEST
// =============================================================================

/// Request body for the streaming chat endpoint.
///
/// `document_ids` is always serialized, even when empty — the backend decides
/// how to answer a question with no candidate documents.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub question: String,
    pub document_ids: Vec<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<Uuid>,
}
