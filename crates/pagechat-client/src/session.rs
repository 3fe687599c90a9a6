//! Session store: the single shared mutable state of the client.
//!
//! Holds documents, conversations, the open conversation's messages, and the
//! in-flight streaming buffer. All mutation goes through setters; the store
//! is shared across tasks as [`SharedStore`] and carries no ambient global.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use pagechat_core::{Citation, Conversation, Document, DocumentStatus, Message, UploadResponse};

/// Store handle shared between the chat session, the sync loop, and the UI.
pub type SharedStore = Arc<RwLock<SessionStore>>;

/// Create an empty shared store.
pub fn shared_store() -> SharedStore {
    Arc::new(RwLock::new(SessionStore::default()))
}

/// Process-wide client state with explicit setters as the only mutation path.
#[derive(Debug, Default)]
pub struct SessionStore {
    documents: Vec<Document>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    current_conversation_id: Option<Uuid>,
    is_streaming: bool,
    is_loading_documents: bool,
    is_loading_conversations: bool,
    is_loading_messages: bool,
    streaming_content: String,
    streaming_citations: Vec<Citation>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Documents
    // =========================================================================

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Documents available as retrieval candidates.
    pub fn ready_documents(&self) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Ready)
            .collect()
    }

    /// Documents still being indexed server-side.
    pub fn processing_documents(&self) -> Vec<&Document> {
        self.documents
            .iter()
            .filter(|d| d.status == DocumentStatus::Processing)
            .collect()
    }

    pub fn set_documents(&mut self, documents: Vec<Document>) {
        self.documents = documents;
    }

    /// Prepend a newly uploaded document.
    pub fn add_document(&mut self, document: Document) {
        self.documents.insert(0, document);
    }

    /// Track a fresh upload acknowledgment as a processing document.
    pub fn register_upload(&mut self, response: &UploadResponse, original_filename: &str) {
        self.add_document(Document {
            id: response.document_id,
            filename: response.filename.clone(),
            original_filename: original_filename.to_string(),
            status: DocumentStatus::Processing,
            page_count: None,
            upload_date: Utc::now(),
        });
    }

    pub fn remove_document(&mut self, id: Uuid) {
        self.documents.retain(|d| d.id != id);
    }

    pub fn update_document_status(&mut self, id: Uuid, status: DocumentStatus) {
        if let Some(doc) = self.documents.iter_mut().find(|d| d.id == id) {
            doc.status = status;
        }
    }

    pub fn is_loading_documents(&self) -> bool {
        self.is_loading_documents
    }

    pub fn set_loading_documents(&mut self, loading: bool) {
        self.is_loading_documents = loading;
    }

    // =========================================================================
    // Conversations
    // =========================================================================

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn set_conversations(&mut self, conversations: Vec<Conversation>) {
        self.conversations = conversations;
    }

    /// Prepend a conversation, replacing any existing entry with the same id.
    pub fn add_conversation(&mut self, conversation: Conversation) {
        self.conversations.retain(|c| c.id != conversation.id);
        self.conversations.insert(0, conversation);
    }

    /// Remove a conversation. Removing the open one also clears the current
    /// conversation id and the message list.
    pub fn remove_conversation(&mut self, id: Uuid) {
        self.conversations.retain(|c| c.id != id);
        if self.current_conversation_id == Some(id) {
            self.current_conversation_id = None;
            self.messages.clear();
        }
    }

    pub fn is_loading_conversations(&self) -> bool {
        self.is_loading_conversations
    }

    pub fn set_loading_conversations(&mut self, loading: bool) {
        self.is_loading_conversations = loading;
    }

    pub fn current_conversation_id(&self) -> Option<Uuid> {
        self.current_conversation_id
    }

    pub fn set_current_conversation_id(&mut self, id: Option<Uuid>) {
        self.current_conversation_id = id;
    }

    // =========================================================================
    // Messages and streaming buffer
    // =========================================================================

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Append a message; ordering is append-only per conversation.
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn is_loading_messages(&self) -> bool {
        self.is_loading_messages
    }

    pub fn set_loading_messages(&mut self, loading: bool) {
        self.is_loading_messages = loading;
    }

    pub fn is_streaming(&self) -> bool {
        self.is_streaming
    }

    pub fn set_is_streaming(&mut self, streaming: bool) {
        self.is_streaming = streaming;
    }

    pub fn streaming_content(&self) -> &str {
        &self.streaming_content
    }

    pub fn set_streaming_content(&mut self, content: String) {
        self.streaming_content = content;
    }

    pub fn streaming_citations(&self) -> &[Citation] {
        &self.streaming_citations
    }

    pub fn add_streaming_citation(&mut self, citation: Citation) {
        self.streaming_citations.push(citation);
    }

    pub fn set_streaming_citations(&mut self, citations: Vec<Citation>) {
        self.streaming_citations = citations;
    }

    /// Reset the streaming buffer (start and end of every streaming session).
    pub fn clear_streaming_buffer(&mut self) {
        self.streaming_content.clear();
        self.streaming_citations.clear();
    }
}
