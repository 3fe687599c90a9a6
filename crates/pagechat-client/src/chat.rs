//! Streaming answer session.
//!
//! `send_message` drives the whole lifecycle of one question: optimistic user
//! message, candidate document selection, the streaming read loop, and
//! finalization of the assistant message. At most one session is in flight
//! at a time; the busy flag is cleared on every exit path, including
//! mid-stream transport failure, so the user can always retry.

use tracing::{debug, info, warn};
use uuid::Uuid;

use pagechat_core::{
    ChatEvent, ChatRequest, Conversation, ConversationExport, Error, Message, Result,
    UploadResponse,
};

use crate::api::ApiClient;
use crate::notify::NoticeBus;
use crate::session::SharedStore;
use crate::stream::event_stream;

use futures::StreamExt;

/// Orchestrates chat turns against one shared session store.
#[derive(Clone)]
pub struct ChatSession {
    api: ApiClient,
    store: SharedStore,
    notices: NoticeBus,
}

impl ChatSession {
    pub fn new(api: ApiClient, store: SharedStore, notices: NoticeBus) -> Self {
        Self {
            api,
            store,
            notices,
        }
    }

    /// Submit one question and stream the answer into the store.
    ///
    /// Rejects blank input and rejects submission while a stream is already
    /// in flight. The user message is appended optimistically and never
    /// rolled back.
    pub async fn send_message(&self, question: &str) -> Result<()> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput("question is empty".to_string()));
        }

        // Guard, optimistic append, and buffer reset under one lock so two
        // concurrent submissions cannot both pass the busy check.
        let (document_ids, conversation_id) = {
            let mut store = self.store.write().await;
            if store.is_streaming() {
                return Err(Error::Busy("a response is already streaming".to_string()));
            }
            store.add_message(Message::user(question));
            store.set_is_streaming(true);
            store.clear_streaming_buffer();

            let ready: Vec<Uuid> = store.ready_documents().iter().map(|d| d.id).collect();
            (ready, store.current_conversation_id())
        };

        // Only ready documents are retrieval candidates. With none ready the
        // request still goes out; the server decides what to do.
        if document_ids.is_empty() {
            self.notices
                .info("No ready documents found. Upload some PDFs first!");
        }

        let result = self
            .stream_answer(question, document_ids, conversation_id)
            .await;

        // Release regardless of outcome. The buffer clears too, so a stream
        // that errored or closed without done leaves nothing stale behind.
        {
            let mut store = self.store.write().await;
            store.set_is_streaming(false);
            store.clear_streaming_buffer();
        }

        result
    }

    async fn stream_answer(
        &self,
        question: &str,
        document_ids: Vec<Uuid>,
        conversation_id: Option<Uuid>,
    ) -> Result<()> {
        let request = ChatRequest {
            question: question.to_string(),
            document_ids,
            conversation_id,
        };

        let response = self.api.chat(&request).await?;
        if !response.status().is_success() {
            return Err(ApiClient::response_error(response).await);
        }

        let mut events = event_stream(response);
        let mut content = String::new();
        let mut finalized = false;
        let mut event_count = 0usize;

        while let Some(event) = events.next().await {
            let event = event?;
            event_count += 1;

            match event {
                ChatEvent::Start { conversation_id } => {
                    self.handle_start(conversation_id).await;
                }
                ChatEvent::Chunk { content: fragment } => {
                    if finalized {
                        debug!("Dropping chunk received after done");
                        continue;
                    }
                    content.push_str(&fragment);
                    self.store
                        .write()
                        .await
                        .set_streaming_content(content.clone());
                }
                ChatEvent::Citation { data } => {
                    if finalized {
                        debug!("Dropping citation received after done");
                        continue;
                    }
                    self.store.write().await.add_streaming_citation(data);
                }
                ChatEvent::Done {
                    full_content,
                    citations,
                } => {
                    if finalized {
                        debug!("Dropping duplicate done event");
                        continue;
                    }
                    finalized = true;

                    // Buffer state is read synchronously here; citation
                    // events arriving after this point are dropped.
                    let mut store = self.store.write().await;
                    let citations =
                        citations.unwrap_or_else(|| store.streaming_citations().to_vec());
                    let text = full_content.unwrap_or_else(|| content.clone());
                    store.add_message(Message::assistant(text, citations));
                    store.clear_streaming_buffer();
                }
                ChatEvent::Error { content } => {
                    // Server-signaled error; the stream is expected to close
                    // normally afterward.
                    self.notices.error(content);
                }
                ChatEvent::Ignored => {}
            }
        }

        debug!(event_count, finalized, "Chat stream closed");
        Ok(())
    }

    /// Adopt the server-assigned conversation id, once. A later start event
    /// with a different id must not overwrite it.
    async fn handle_start(&self, conversation_id: Option<Uuid>) {
        let Some(id) = conversation_id else {
            return;
        };

        let adopted = {
            let mut store = self.store.write().await;
            if store.current_conversation_id().is_none() {
                store.set_current_conversation_id(Some(id));
                true
            } else {
                false
            }
        };

        if adopted {
            info!(conversation_id = %id, "Adopted new conversation");
            // Refresh so the freshly created conversation shows its title.
            match self.api.list_conversations().await {
                Ok(conversations) => {
                    self.store.write().await.set_conversations(conversations);
                }
                Err(e) => warn!(error = %e, "Failed to refresh conversation list"),
            }
        }
    }

    // =========================================================================
    // Document management
    // =========================================================================

    /// Upload a document and track it in the store as processing.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        let response = self.api.upload_document(filename, bytes).await?;
        self.store
            .write()
            .await
            .register_upload(&response, filename);
        Ok(response)
    }

    /// Delete a document server-side and drop it from the store.
    pub async fn delete_document(&self, id: Uuid) -> Result<()> {
        self.api.delete_document(id).await?;
        self.store.write().await.remove_document(id);
        Ok(())
    }

    // =========================================================================
    // Conversation management
    // =========================================================================

    /// Open a conversation: set it current and load its history. Switching
    /// conversation replaces the whole message list.
    pub async fn open_conversation(&self, id: Uuid) -> Result<()> {
        {
            let mut store = self.store.write().await;
            store.set_current_conversation_id(Some(id));
            store.set_loading_messages(true);
        }

        let result = self.api.get_conversation_messages(id).await;

        let mut store = self.store.write().await;
        store.set_loading_messages(false);
        match result {
            Ok(messages) => {
                store.set_messages(messages);
                Ok(())
            }
            Err(e) => {
                store.set_messages(Vec::new());
                Err(e)
            }
        }
    }

    /// Start over with no conversation selected.
    pub async fn new_conversation(&self) {
        let mut store = self.store.write().await;
        store.set_current_conversation_id(None);
        store.set_messages(Vec::new());
    }

    /// Delete a conversation server-side and drop it from the store.
    pub async fn delete_conversation(&self, id: Uuid) -> Result<()> {
        self.api.delete_conversation(id).await?;
        self.store.write().await.remove_conversation(id);
        Ok(())
    }

    /// Rename a conversation and refresh its entry in the store.
    pub async fn rename_conversation(&self, id: Uuid, title: &str) -> Result<Conversation> {
        let conversation = self.api.rename_conversation(id, title).await?;
        self.store
            .write()
            .await
            .add_conversation(conversation.clone());
        Ok(conversation)
    }

    /// Export a conversation as markdown.
    pub async fn export_conversation(&self, id: Uuid) -> Result<ConversationExport> {
        self.api.export_conversation(id).await
    }
}
