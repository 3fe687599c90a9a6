//! Integration tests for initial load and background status polling.

use std::time::Duration;

use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pagechat_client::{shared_store, ApiClient, ClientConfig, SharedStore, SyncLoop};
use pagechat_core::{Document, DocumentStatus};

fn sync_loop(server: &MockServer, store: SharedStore) -> SyncLoop {
    let api = ApiClient::new(
        ClientConfig::default()
            .with_base_url(server.uri())
            .with_timeout(5)
            .with_poll_interval(25),
    )
    .expect("Failed to create client");
    SyncLoop::new(api, store)
}

fn document_record_json(id: Uuid, processed: bool, error: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "filename": format!("{}.pdf", id),
        "original_filename": "report.pdf",
        "file_size": 2048,
        "page_count": 7,
        "upload_date": "2026-02-01T09:30:00Z",
        "processed": processed,
        "processing_error": error,
        "chunk_count": null
    })
}

fn processing_document(id: Uuid) -> Document {
    Document {
        id,
        filename: format!("{}.pdf", id),
        original_filename: "report.pdf".to_string(),
        status: DocumentStatus::Processing,
        page_count: None,
        upload_date: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn test_initial_load_populates_store() {
    let server = MockServer::start().await;
    let conv_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            document_record_json(Uuid::new_v4(), true, None),
            document_record_json(Uuid::new_v4(), false, Some("ocr failed")),
            document_record_json(Uuid::new_v4(), false, None),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "id": conv_id,
            "title": "Quarterly review",
            "created_at": "2026-02-01T09:30:00Z",
            "updated_at": "2026-02-01T09:30:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let store = shared_store();
    sync_loop(&server, store.clone()).initial_load().await;

    let store = store.read().await;
    assert_eq!(store.documents().len(), 3);
    assert_eq!(store.documents()[0].status, DocumentStatus::Ready);
    assert_eq!(store.documents()[1].status, DocumentStatus::Failed);
    assert_eq!(store.documents()[2].status, DocumentStatus::Processing);
    assert_eq!(store.conversations().len(), 1);
    assert_eq!(store.conversations()[0].id, conv_id);
    assert!(!store.is_loading_documents());
    assert!(!store.is_loading_conversations());
}

#[tokio::test]
async fn test_initial_load_failure_leaves_list_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/documents"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/conversations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let store = shared_store();
    sync_loop(&server, store.clone()).initial_load().await;

    let store = store.read().await;
    assert!(store.documents().is_empty());
    assert!(!store.is_loading_documents());
    assert!(!store.is_loading_conversations());
}

#[tokio::test]
async fn test_poll_promotes_document_then_goes_quiet() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    // Once the document reports processed, polling for it must stop. A
    // second status call would overrun the expectation.
    Mock::given(method("GET"))
        .and(path(format!("/api/documents/{}", id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document_record_json(id, true, None)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = shared_store();
    store.write().await.add_document(processing_document(id));

    let handle = sync_loop(&server, store.clone()).start();
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.shutdown().await;

    assert_eq!(
        store.read().await.documents()[0].status,
        DocumentStatus::Ready
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_no_requests_while_nothing_processing() {
    let server = MockServer::start().await;

    let store = shared_store();
    let ready = Document {
        status: DocumentStatus::Ready,
        ..processing_document(Uuid::new_v4())
    };
    store.write().await.add_document(ready);

    let handle = sync_loop(&server, store.clone()).start();
    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.shutdown().await;

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_check_does_not_block_siblings() {
    let server = MockServer::start().await;
    let broken = Uuid::new_v4();
    let finishing = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/documents/{}", broken)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/documents/{}", finishing)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(document_record_json(finishing, false, Some("ocr failed"))),
        )
        .mount(&server)
        .await;

    let store = shared_store();
    {
        let mut store = store.write().await;
        store.add_document(processing_document(broken));
        store.add_document(processing_document(finishing));
    }

    let handle = sync_loop(&server, store.clone()).start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.shutdown().await;

    let store = store.read().await;
    let finished = store.documents().iter().find(|d| d.id == finishing).unwrap();
    assert_eq!(finished.status, DocumentStatus::Failed);
    // The failing document stays in processing and keeps being retried.
    let stuck = store.documents().iter().find(|d| d.id == broken).unwrap();
    assert_eq!(stuck.status, DocumentStatus::Processing);
}

#[tokio::test]
async fn test_shutdown_stops_polling() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    // Document never finishes, so the loop would poll forever.
    Mock::given(method("GET"))
        .and(path(format!("/api/documents/{}", id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(document_record_json(id, false, None)),
        )
        .mount(&server)
        .await;

    let store = shared_store();
    store.write().await.add_document(processing_document(id));

    let handle = sync_loop(&server, store.clone()).start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    handle.shutdown().await;

    let polled = server.received_requests().await.unwrap().len();
    assert!(polled >= 1, "loop should have polled at least once");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        server.received_requests().await.unwrap().len(),
        polled,
        "no polls after shutdown"
    );
}
