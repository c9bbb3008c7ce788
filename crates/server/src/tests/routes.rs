use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::{AppConfig, HostingConfig, ServerConfig, UploadConfig};
use crate::database::connection::DbConfig;
use crate::server::router::app;
use crate::server::state::AppState;
use crate::tests::mocks::{MemoryStore, RecordingHost};

const BOUNDARY: &str = "notes-test-boundary";

struct TestApp {
    router: Router,
    store: MemoryStore,
    host: RecordingHost,
    spool_dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self::with(MemoryStore::default(), RecordingHost::default())
    }

    fn with(store: MemoryStore, host: RecordingHost) -> Self {
        Self::build(store, host, None)
    }

    fn spooling_into(temp_dir: PathBuf) -> Self {
        Self::build(MemoryStore::default(), RecordingHost::default(), Some(temp_dir))
    }

    fn build(store: MemoryStore, host: RecordingHost, temp_dir: Option<PathBuf>) -> Self {
        let spool_dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            server: ServerConfig {
                address: "127.0.0.1:0".to_string(),
            },
            database: DbConfig::development("notes_db", "notes_guest", "notespass"),
            uploads: UploadConfig {
                temp_dir: temp_dir.unwrap_or_else(|| spool_dir.path().to_path_buf()),
                ..UploadConfig::default()
            },
            hosting: HostingConfig::default(),
        };
        let state = AppState::new(config, store.clone(), host.clone());
        Self {
            router: app(Arc::new(state)),
            store,
            host,
            spool_dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        self.send(
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn add_to_list(&self, user_id: i32, resource_id: i64) -> (StatusCode, Value) {
        self.post_bookmark(json!({ "userId": user_id, "resourceId": resource_id }))
            .await
    }

    async fn post_bookmark(&self, payload: Value) -> (StatusCode, Value) {
        let body = payload.to_string();
        self.send_json(
            Request::post("/add-to-list")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    async fn upload(&self, fields: &[(&str, &str)], file: Option<&[u8]>) -> (StatusCode, Value) {
        let request = Request::post("/resource")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        self.send_json(request).await
    }
}

fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(content) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"pdf\"; filename=\"algebra.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_fields() -> [(&'static str, &'static str); 3] {
    [
        ("userId", "4"),
        ("resourceName", "Linear algebra"),
        ("resourceClass", "math"),
    ]
}

fn spool_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}

#[tokio::test]
async fn upload_records_hosted_url_and_removes_spool() {
    let app = TestApp::new();

    let (status, body) = app
        .upload(&upload_fields(), Some(&b"%PDF-1.4 notes"[..]))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let uploads = app.host.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].content, b"%PDF-1.4 notes");
    assert_eq!(uploads[0].request.file_name, "algebra.pdf");
    assert_eq!(uploads[0].request.tags, vec!["note".to_string()]);
    let public_id = &uploads[0].request.public_id;
    assert!(public_id.starts_with("note/"), "public id: {public_id}");

    let hosted_url = RecordingHost::url_for(public_id);
    let resources = app.store.resources();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].resource_path, hosted_url);
    assert_eq!(resources[0].user_id, 4);
    assert_eq!(body["resourcePath"], hosted_url.as_str());
    assert_eq!(body["resourceName"], "Linear algebra");
    assert_eq!(body["resourceClass"], "math");
    assert!(spool_is_empty(app.spool_dir.path()));
}

#[tokio::test]
async fn rejected_upload_creates_no_row_and_removes_spool() {
    let host = RecordingHost::default();
    host.reject_uploads();
    let app = TestApp::with(MemoryStore::default(), host);

    let (status, body) = app.upload(&upload_fields(), Some(&b"not a pdf"[..])).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Invalid image file"));
    assert!(app.store.resources().is_empty());
    assert!(spool_is_empty(app.spool_dir.path()));
}

#[tokio::test]
async fn failed_insert_destroys_hosted_file() {
    let store = MemoryStore::default();
    store.fail_all();
    let app = TestApp::with(store, RecordingHost::default());

    let (status, body) = app.upload(&upload_fields(), Some(&b"%PDF"[..])).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));

    let uploads = app.host.uploads();
    let destroyed = app.host.destroyed();
    assert_eq!(destroyed.len(), 1);
    assert_eq!(destroyed[0].public_id, uploads[0].request.public_id);
    assert!(spool_is_empty(app.spool_dir.path()));
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app.upload(&upload_fields(), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing form field `pdf`");
    assert!(app.host.uploads().is_empty());
}

#[tokio::test]
async fn upload_with_non_numeric_user_is_rejected() {
    let app = TestApp::new();

    let fields = [
        ("userId", "abc"),
        ("resourceName", "Linear algebra"),
        ("resourceClass", "math"),
    ];
    let (status, _) = app.upload(&fields, Some(&b"%PDF"[..])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.host.uploads().is_empty());
    assert!(spool_is_empty(app.spool_dir.path()));
}

#[tokio::test]
async fn upload_without_resource_fields_is_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .upload(&[("userId", "4"), ("resourceClass", "math")], Some(&b"%PDF"[..]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing form field `resourceName`");

    let (status, body) = app
        .upload(&[("userId", "4"), ("resourceName", "Linear algebra")], Some(&b"%PDF"[..]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing form field `resourceClass`");

    assert!(app.host.uploads().is_empty());
    assert!(app.store.resources().is_empty());
    assert!(spool_is_empty(app.spool_dir.path()));
}

#[tokio::test]
async fn unwritable_spool_dir_fails_before_hosting() {
    let missing = tempfile::tempdir().unwrap().path().join("gone");
    let app = TestApp::spooling_into(missing);

    let (status, body) = app.upload(&upload_fields(), Some(&b"%PDF"[..])).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Something went wrong" }));
    assert!(app.host.uploads().is_empty());
    assert!(app.store.resources().is_empty());
}

#[tokio::test]
async fn all_resources_excludes_callers_rows() {
    let app = TestApp::new();
    app.store.add_user(1, "Ada");
    app.store.add_user(2, "Grace");
    app.store.seed_resource(1, "mine");
    app.store.seed_resource(2, "graces");
    app.store.seed_resource(3, "orphan");

    let (status, body) = app.get("/all-resources/1").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["userId"] != 1));
    assert_eq!(rows[0]["User"]["name"], "Grace");
    assert!(rows[1]["User"].is_null());
}

#[tokio::test]
async fn my_resources_returns_only_callers_rows() {
    let app = TestApp::new();
    app.store.seed_resource(1, "first");
    app.store.seed_resource(2, "other");
    app.store.seed_resource(1, "second");

    let (status, body) = app.get("/my-resources/1").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["userId"] == 1));
    assert!(rows.iter().all(|row| row.get("User").is_none()));
}

#[tokio::test]
async fn listing_failures_return_fetch_message() {
    let store = MemoryStore::default();
    store.fail_all();
    let app = TestApp::with(store, RecordingHost::default());

    for uri in ["/all-resources/1", "/my-resources/1", "/get-my-list/1"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(
            body,
            json!({ "message": "An error occurred while fetching resources." })
        );
    }
}

#[tokio::test]
async fn unparsable_listing_ids_return_fetch_message() {
    let app = TestApp::new();

    for uri in ["/all-resources/abc", "/my-resources/abc", "/get-my-list/abc"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(
            body,
            json!({ "message": "An error occurred while fetching resources." })
        );
    }
}

#[tokio::test]
async fn unparsable_delete_id_returns_delete_message() {
    let app = TestApp::new();
    app.store.seed_resource(1, "kept");

    let (status, body) = app.delete("/delete-resource/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "message": "Resource couldn't be deleted!" }));
    assert_eq!(app.store.resources().len(), 1);
}

#[tokio::test]
async fn deleting_unknown_resource_still_succeeds() {
    let app = TestApp::new();
    let kept = app.store.seed_resource(1, "kept");

    let (status, body) = app.delete("/delete-resource/999").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "message": "Resource deleted successfully!" }));
    assert_eq!(app.store.resources(), vec![kept.clone()]);

    let (status, _) = app.delete(&format!("/delete-resource/{}", kept.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.store.resources().is_empty());
}

#[tokio::test]
async fn delete_failure_returns_not_found() {
    let store = MemoryStore::default();
    store.fail_all();
    let app = TestApp::with(store, RecordingHost::default());

    let (status, body) = app.delete("/delete-resource/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "message": "Resource couldn't be deleted!" }));
}

#[tokio::test]
async fn adding_same_bookmark_twice_creates_two_rows() {
    let app = TestApp::new();
    let resource = app.store.seed_resource(2, "shared");

    let (status, first) = app.add_to_list(1, resource.id).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, second) = app.add_to_list(1, resource.id).await;
    assert_eq!(status, StatusCode::CREATED);

    assert_ne!(first["id"], second["id"]);
    assert_eq!(first["userId"], 1);
    assert_eq!(first["resourceId"], resource.id);
    assert_eq!(app.store.bookmarks().len(), 2);
}

#[tokio::test]
async fn add_to_list_accepts_numeric_strings() {
    let app = TestApp::new();

    let (status, body) = app
        .post_bookmark(json!({ "userId": "1", "resourceId": "2" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], 1);
    assert_eq!(body["resourceId"], 2);
    assert_eq!(app.store.bookmarks().len(), 1);
}

#[tokio::test]
async fn unreadable_bookmark_body_returns_internal_error() {
    let app = TestApp::new();

    for payload in [json!({}), json!({ "userId": "one", "resourceId": 2 })] {
        let (status, body) = app.post_bookmark(payload).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal Server Error" }));
    }
    assert!(app.store.bookmarks().is_empty());
}

#[tokio::test]
async fn add_to_list_failure_returns_internal_error() {
    let store = MemoryStore::default();
    store.fail_all();
    let app = TestApp::with(store, RecordingHost::default());

    let (status, body) = app.add_to_list(1, 1).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal Server Error" }));
}

#[tokio::test]
async fn my_list_joins_resource_fields() {
    let app = TestApp::new();
    let resource = app.store.seed_resource(2, "shared");
    app.add_to_list(1, resource.id).await;
    app.add_to_list(1, 404).await;
    app.add_to_list(3, resource.id).await;

    let (status, body) = app.get("/get-my-list/1").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["Resource"]["resourceName"], "shared");
    assert_eq!(rows[0]["Resource"]["resourcePath"], resource.resource_path.as_str());
    assert!(rows[1]["Resource"].is_null());
}

#[tokio::test]
async fn delete_from_list_is_a_no_op() {
    let app = TestApp::new();
    let resource = app.store.seed_resource(2, "shared");
    app.add_to_list(1, resource.id).await;

    let (status, body) = app
        .delete(&format!("/delete-from-list/{}", resource.id))
        .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert!(body.is_empty());
    assert_eq!(app.store.bookmarks().len(), 1);
}
