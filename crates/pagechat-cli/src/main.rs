//! pagechat — interactive terminal client for a document-question-answering
//! backend. Upload documents, watch them index, and converse with an
//! assistant that cites source pages.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pagechat_client::{shared_store, ApiClient, ChatSession, ClientConfig, NoticeBus, SyncLoop};

mod repl;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    info!(base_url = %config.base_url, "Starting pagechat");

    let api = ApiClient::new(config)?;
    let store = shared_store();
    let notices = NoticeBus::new();
    let session = ChatSession::new(api.clone(), store.clone(), notices.clone());

    // Print notices as they arrive.
    let mut notice_rx = notices.subscribe();
    tokio::spawn(async move {
        while let Ok(notice) = notice_rx.recv().await {
            eprintln!("[{:?}] {}", notice.level, notice.message);
        }
    });

    let sync = SyncLoop::new(api, store.clone());
    sync.initial_load().await;
    let sync_handle = sync.start();

    let result = repl::run(session, store, notices).await;

    // Deterministic teardown of the polling task.
    sync_handle.shutdown().await;

    result
}
