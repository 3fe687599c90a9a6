//! Document and conversation sync.
//!
//! One initial fetch on session start, then a fixed-interval status poll
//! that only issues HTTP calls while at least one document is still
//! processing. The poll runs as a single background task with deterministic
//! shutdown (teardown stops it; siblings keep polling when one check fails).

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pagechat_core::{Document, DocumentStatus};

use crate::api::ApiClient;
use crate::session::SharedStore;

/// Handle for controlling a running sync loop.
pub struct SyncHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Stop the loop and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}

/// Periodic document-status synchronization against the backend.
pub struct SyncLoop {
    api: ApiClient,
    store: SharedStore,
    poll_interval: Duration,
}

impl SyncLoop {
    pub fn new(api: ApiClient, store: SharedStore) -> Self {
        let poll_interval = Duration::from_millis(api.config().poll_interval_ms);
        Self {
            api,
            store,
            poll_interval,
        }
    }

    /// One-shot fetch of documents and conversations on session start.
    ///
    /// The two fetches run concurrently; a failure of either is logged and
    /// leaves that list empty.
    pub async fn initial_load(&self) {
        {
            let mut store = self.store.write().await;
            store.set_loading_documents(true);
            store.set_loading_conversations(true);
        }

        let (documents, conversations) =
            tokio::join!(self.api.list_documents(), self.api.list_conversations());

        let mut store = self.store.write().await;

        match documents {
            Ok(records) => {
                let documents: Vec<Document> = records.into_iter().map(Document::from).collect();
                debug!(count = documents.len(), "Loaded documents");
                store.set_documents(documents);
            }
            Err(e) => warn!(error = %e, "Failed to load documents"),
        }
        store.set_loading_documents(false);

        match conversations {
            Ok(conversations) => {
                debug!(count = conversations.len(), "Loaded conversations");
                store.set_conversations(conversations);
            }
            Err(e) => warn!(error = %e, "Failed to load conversations"),
        }
        store.set_loading_conversations(false);
    }

    /// Start the polling task and return a handle for control.
    pub fn start(self) -> SyncHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            self.run(&mut shutdown_rx).await;
        });

        SyncHandle { shutdown_tx, task }
    }

    async fn run(&self, shutdown_rx: &mut mpsc::Receiver<()>) {
        info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Sync loop started"
        );

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Sync loop received shutdown signal");
                    break;
                }
                _ = sleep(self.poll_interval) => {}
            }

            let processing: Vec<Uuid> = {
                let store = self.store.read().await;
                store.processing_documents().iter().map(|d| d.id).collect()
            };

            // No status calls while nothing is processing.
            if processing.is_empty() {
                continue;
            }

            self.poll_documents(&processing).await;
        }

        info!("Sync loop stopped");
    }

    /// Re-check every currently-processing document. Checks are independent;
    /// one failure never stops polling for siblings.
    async fn poll_documents(&self, ids: &[Uuid]) {
        for &id in ids {
            match self.api.get_document_status(id).await {
                Ok(Some(record)) => {
                    let status = record.status();
                    if status != DocumentStatus::Processing {
                        info!(document_id = %id, %status, "Document left processing state");
                        self.store.write().await.update_document_status(id, status);
                    }
                }
                Ok(None) => {
                    debug!(document_id = %id, "Document gone during status poll");
                }
                Err(e) => {
                    warn!(document_id = %id, error = %e, "Status check failed");
                }
            }
        }
    }
}
