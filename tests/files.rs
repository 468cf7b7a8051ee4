mod common;

use common::{fail, ok, setup};
use serde_json::json;
use std::fs;
use wiremock::matchers::{body_json, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_upload_file_as_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/files/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\"; filename=\"test.txt\""))
        .and(body_string_contains("this is a test file"))
        .respond_with(ok(200, json!({
            "id": "new-file-id",
            "filename": "test.txt",
            "size": 19,
            "mimetype": "text/plain"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let file = client
        .files()
        .upload("test.txt", b"this is a test file".to_vec())
        .await
        .unwrap();

    assert_eq!(file.id, "new-file-id");
    assert_eq!(file.mime_type, "text/plain");
}

#[tokio::test]
async fn test_upload_path_streams_file_with_name_field() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/v1/files/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("filename=\"clip.mp4\""))
        .and(body_string_contains("name=\"name\""))
        .and(body_string_contains("holiday"))
        .and(body_string_contains("dummy video"))
        .respond_with(ok(200, json!({ "id": "clip-id", "filename": "holiday" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("clip.mp4");
    fs::write(&file_path, b"dummy video").unwrap();

    let file = client
        .files()
        .upload_path(&file_path, Some("holiday"))
        .await
        .unwrap();
    assert_eq!(file.id, "clip-id");
}

#[tokio::test]
async fn test_upload_path_missing_file_is_io_error() {
    let (server, client) = setup().await;

    let err = client
        .files()
        .upload_path("/definitely/not/here.png", None)
        .await
        .unwrap_err();
    assert!(matches!(err, qalpuch::QalpuchError::IoError(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_list_rename_delete() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/files/test-cuid"))
        .respond_with(ok(200, json!({
            "id": "test-cuid",
            "filename": "a.png",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/files"))
        .respond_with(ok(200, json!([{ "id": "a" }, { "id": "b" }])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v1/files/test-cuid"))
        .and(body_json(json!({ "name": "b.png" })))
        .respond_with(ok(200, json!({ "id": "test-cuid", "filename": "b.png" })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/files/test-cuid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let file = client.files().get("test-cuid").await.unwrap();
    assert_eq!(file.filename, "a.png");
    assert!(file.updated_at > file.created_at);

    assert_eq!(client.files().list().await.unwrap().len(), 2);

    let renamed = client.files().rename("test-cuid", "b.png").await.unwrap();
    assert_eq!(renamed.filename, "b.png");

    client.files().delete("test-cuid").await.unwrap();
}

#[tokio::test]
async fn test_download_returns_raw_bytes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/files/test-cuid/download"))
        .and(header("authorization", "Bearer test_token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"raw \x00 bytes".to_vec()))
        .mount(&server)
        .await;

    let bytes = client.files().download("test-cuid").await.unwrap();
    assert_eq!(bytes, b"raw \x00 bytes");

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("nested").join("out.bin");
    let written = client.files().download_to("test-cuid", &dest).await.unwrap();
    assert_eq!(written, dest);
    assert_eq!(fs::read(&dest).unwrap(), b"raw \x00 bytes");
}

#[tokio::test]
async fn test_download_failure_is_classified() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v1/files/gone/download"))
        .respond_with(fail(404, "File not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/files/secret/download"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client.files().download("gone").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("File not found"));

    let err = client.files().download("secret").await.unwrap_err();
    assert_eq!(err.kind(), Some(qalpuch::ErrorKind::Forbidden));
    assert!(err.to_string().contains("Forbidden"));
}
