//! # pagechat-client
//!
//! Client-side machinery for a document-question-answering backend:
//! the HTTP transport ([`ApiClient`]), the streaming answer pipeline
//! ([`ChatSession`]), the session store, and the document-status sync loop.
//!
//! Everything runs against one shared [`SessionStore`]; all mutation goes
//! through its setters, and the store is the only shared mutable state.

pub mod api;
pub mod chat;
pub mod config;
pub mod notify;
pub mod session;
pub mod stream;
pub mod sync;

pub use api::ApiClient;
pub use chat::ChatSession;
pub use config::ClientConfig;
pub use notify::{Notice, NoticeBus, NoticeLevel};
pub use session::{shared_store, SessionStore, SharedStore};
pub use stream::{event_stream, parse_event_stream, EventStream};
pub use sync::{SyncHandle, SyncLoop};
