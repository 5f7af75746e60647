mod common;

use anyhow::Result;
use axum::http::StatusCode;

use common::{json_request, multipart_body, multipart_request, register, send, spawn_app};

#[tokio::test]
async fn upload_then_list_shows_document_last() -> Result<()> {
    let app = spawn_app();
    let (token, _) = register(&app, "owner", "Meera Shah", "meera@example.com").await?;

    let (content_type, body) = multipart_body(
        Some(("file", "pan.pdf", b"pdf bytes")),
        &[("docType", "pan")],
    );
    let (status, response) = send(
        &app,
        multipart_request("/api/owner/documents", &token, &content_type, body),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Document uploaded successfully");
    assert_eq!(response["data"]["docType"], "pan");
    let pan_url = response["data"]["docUrl"].as_str().unwrap().to_string();
    assert!(pan_url.contains("owner_documents"));

    let (content_type, body) = multipart_body(
        Some(("file", "gst.pdf", b"more bytes")),
        &[("docType", "gst")],
    );
    send(
        &app,
        multipart_request("/api/owner/documents", &token, &content_type, body),
    )
    .await?;

    let (status, response) = send(
        &app,
        json_request("GET", "/api/owner/documents", Some(&token), None),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let docs = response["data"].as_array().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0]["docType"], "pan");
    assert_eq!(docs[1]["docType"], "gst");
    Ok(())
}

#[tokio::test]
async fn upload_without_file_is_bad_request() -> Result<()> {
    let app = spawn_app();
    let (token, _) = register(&app, "owner", "Meera Shah", "meera@example.com").await?;

    let (content_type, body) = multipart_body(None, &[("docType", "pan")]);
    let (status, response) = send(
        &app,
        multipart_request("/api/owner/documents", &token, &content_type, body),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "No document uploaded");
    Ok(())
}

#[tokio::test]
async fn delete_document_removes_only_matching_id() -> Result<()> {
    let app = spawn_app();
    let (token, _) = register(&app, "owner", "Meera Shah", "meera@example.com").await?;

    let (content_type, body) = multipart_body(
        Some(("file", "pan.pdf", b"pdf bytes")),
        &[("docType", "pan")],
    );
    let (_, response) = send(
        &app,
        multipart_request("/api/owner/documents", &token, &content_type, body),
    )
    .await?;
    let doc_id = response["data"]["id"].as_str().unwrap().to_string();

    // deleting an unknown id succeeds and leaves the list unchanged
    let (status, _) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/api/owner/documents/{}", uuid::Uuid::new_v4()),
            Some(&token),
            None,
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, response) = send(
        &app,
        json_request("GET", "/api/owner/documents", Some(&token), None),
    )
    .await?;
    assert_eq!(response["data"].as_array().unwrap().len(), 1);

    let (status, response) = send(
        &app,
        json_request(
            "DELETE",
            &format!("/api/owner/documents/{}", doc_id),
            Some(&token),
            None,
        ),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Document deleted successfully");

    let (_, response) = send(
        &app,
        json_request("GET", "/api/owner/documents", Some(&token), None),
    )
    .await?;
    assert!(response["data"].as_array().unwrap().is_empty());
    Ok(())
}
