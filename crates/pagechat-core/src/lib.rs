//! # pagechat-core
//!
//! Core types for the pagechat client: the document/conversation/message
//! data model, the streamed chat event model, and the shared error type
//! that other pagechat crates depend on.

pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod upload;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{parse_event_line, ChatEvent, SseLineBuffer};
pub use models::{
    ChatRequest, Citation, Conversation, ConversationExport, Document, DocumentRecord,
    DocumentStatus, Message, Role, UploadResponse,
};
pub use upload::{validate_upload, ValidationResult};
