
use docqa_client::{
    ApiClient, ClientConfig, ClientError, DocumentApi, HealthState, SelectedFile, PDF_MEDIA_TYPE,
};
use reqwest::StatusCode;
use test_helpers::{spawn_backend, spawn_backend_at, write_fixture, BackendState};

fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(ClientConfig::new(base_url).expect("mock backend URL is valid"))
}

#[tokio::test]
async fn health_check_decodes_status() {
    let backend = spawn_backend(BackendState::default()).await;
    let client = client_for(&backend.base_url);

    let health = client.check_health().await.unwrap();

    assert_eq!(health.status, HealthState::Healthy);
    assert_eq!(health.document_count, Some(0));
    assert_eq!(health.extra.get("qdrant_connected"), Some(&serde_json::json!(true)));
}

#[tokio::test]
async fn upload_sends_pdf_in_file_field() {
    let backend = spawn_backend(BackendState::default()).await;
    let client = client_for(&backend.base_url);
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "report.pdf");

    let result = client
        .upload_document(&SelectedFile::from_path(&path))
        .await
        .unwrap();

    assert_eq!(result.chunks_added, 12);
    assert_eq!(result.filename, "report.pdf");

    let uploads = backend.state.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].field, "file");
    assert_eq!(uploads[0].filename, "report.pdf");
    assert_eq!(uploads[0].content_type.as_deref(), Some(PDF_MEDIA_TYPE));
    assert!(uploads[0].size > 0);
}

#[tokio::test]
async fn upload_rejection_carries_backend_detail() {
    let backend = spawn_backend(BackendState::default()).await;
    let client = client_for(&backend.base_url);
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "notes.txt");

    let err = client
        .upload_document(&SelectedFile::new(&path, PDF_MEDIA_TYPE))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.display_message(), "Only PDF files are allowed");
}

#[tokio::test]
async fn upload_of_missing_file_fails_before_sending() {
    let backend = spawn_backend(BackendState::default()).await;
    let client = client_for(&backend.base_url);
    let dir = tempfile::tempdir().unwrap();

    let err = client
        .upload_document(&SelectedFile::from_path(dir.path().join("gone.pdf")))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Io { .. }));
    assert!(backend.state.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn query_returns_answer_unchanged() {
    let backend = spawn_backend(BackendState::default()).await;
    *backend.state.answer.lock().unwrap() = "## Summary\nThis is...".to_string();
    let client = client_for(&backend.base_url);

    let answer = client.query_documents("What is the summary?").await.unwrap();

    assert_eq!(answer.answer, "## Summary\nThis is...");
    assert_eq!(
        backend.state.questions.lock().unwrap().clone(),
        vec!["What is the summary?".to_string()]
    );
}

#[tokio::test]
async fn query_failure_surfaces_detail() {
    let backend = spawn_backend(BackendState::default()).await;
    *backend.state.query_failure.lock().unwrap() = Some((
        StatusCode::SERVICE_UNAVAILABLE,
        "Service not ready. Please wait for initialization.".to_string(),
    ));
    let client = client_for(&backend.base_url);

    let err = client.query_documents("anything").await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert!(err
        .display_message()
        .contains("Service not ready. Please wait for initialization."));
}

#[tokio::test]
async fn list_documents_is_repeatable() {
    let backend = spawn_backend(BackendState {
        documents: std::sync::Mutex::new(vec!["a.pdf".into(), "b.pdf".into()]),
        ..BackendState::default()
    })
    .await;
    let client = client_for(&backend.base_url);

    let first = client.list_documents().await.unwrap();
    let second = client.list_documents().await.unwrap();

    assert_eq!(first, vec!["a.pdf".to_string(), "b.pdf".to_string()]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn list_documents_normalizes_legacy_payload() {
    let backend = spawn_backend(BackendState {
        legacy_documents: true,
        ..BackendState::default()
    })
    .await;
    let client = client_for(&backend.base_url);

    assert!(client.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn clear_documents_empties_backend() {
    let backend = spawn_backend(BackendState {
        documents: std::sync::Mutex::new(vec!["a.pdf".into()]),
        ..BackendState::default()
    })
    .await;
    let client = client_for(&backend.base_url);

    let message = client.clear_documents().await.unwrap();

    assert_eq!(message, "All documents cleared successfully");
    assert!(client.list_documents().await.unwrap().is_empty());
}

#[tokio::test]
async fn requests_go_through_base_path_prefix() {
    let backend = spawn_backend_at(
        BackendState {
            documents: std::sync::Mutex::new(vec!["a.pdf".into()]),
            ..BackendState::default()
        },
        "/api",
    )
    .await;

    let prefixed = client_for(&format!("{}/api/", backend.base_url));
    let health = prefixed.check_health().await.unwrap();
    assert_eq!(health.status, HealthState::Healthy);
    assert_eq!(prefixed.list_documents().await.unwrap(), vec!["a.pdf".to_string()]);

    let unprefixed = client_for(&backend.base_url);
    let err = unprefixed.check_health().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client_for(&format!("http://{}", addr));

    let err = client.check_health().await.unwrap_err();

    assert!(matches!(err, ClientError::Http(_)));
    assert!(!err.display_message().is_empty());
}
