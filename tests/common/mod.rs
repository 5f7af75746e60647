#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use rentbase_api::storage::LocalStorage;
use rentbase_api::store::MemoryStore;
use rentbase_api::{app, AppState};

/// In-process application over the memory store. The temp dir backing file
/// uploads lives as long as the test app does.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    _upload_dir: tempfile::TempDir,
}

pub fn spawn_app() -> TestApp {
    let upload_dir = tempfile::tempdir().expect("failed to create upload dir");
    let store = Arc::new(MemoryStore::new());
    let files = Arc::new(LocalStorage::new(
        upload_dir.path(),
        "http://localhost:3000/files",
    ));

    let state = AppState::new(store.clone(), files);
    TestApp {
        router: app(state),
        store,
        _upload_dir: upload_dir,
    }
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

/// Drive one request through the router and decode the JSON envelope.
pub async fn send(app: &TestApp, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

/// Register a user through the public auth surface; returns the bearer token
/// and profile id.
pub async fn register(
    app: &TestApp,
    user_type: &str,
    full_name: &str,
    email: &str,
) -> Result<(String, Uuid)> {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            &format!("/auth/{}/register", user_type),
            None,
            Some(json!({
                "fullName": full_name,
                "email": email,
                "phone": "9999900000",
                "password": "secret123",
            })),
        ),
    )
    .await?;

    anyhow::ensure!(
        status == StatusCode::CREATED,
        "registration failed: {} {}",
        status,
        body
    );
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let id: Uuid = body["data"]["user"]["id"].as_str().unwrap().parse()?;
    Ok((token, id))
}

/// Build a multipart body with a single file field and optional extra text
/// fields, returning (content-type, body).
pub fn multipart_body(
    file_field: Option<(&str, &str, &[u8])>,
    text_fields: &[(&str, &str)],
) -> (String, Vec<u8>) {
    let boundary = "rentbase-test-boundary";
    let mut body = Vec::new();

    if let Some((name, file_name, bytes)) = file_field {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                boundary, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    for (name, value) in text_fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    (
        format!("multipart/form-data; boundary={}", boundary),
        body,
    )
}

pub fn multipart_request(
    uri: &str,
    token: &str,
    content_type: &str,
    body: Vec<u8>,
) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", content_type)
        .body(Body::from(body))
        .expect("request")
}
