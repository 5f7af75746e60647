use axum::extract::{Multipart, Path, State};
use axum::Extension;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::Document;
use crate::state::AppState;

/// POST /api/owner/documents - multipart with a `file` field and a
/// `docType` text field.
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> ApiResult<Document> {
    let mut upload: Option<(Vec<u8>, String)> = None;
    let mut doc_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
                upload = Some((bytes.to_vec(), file_name));
            }
            Some("docType") => {
                doc_type = Some(field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read docType: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let (bytes, file_name) =
        upload.ok_or_else(|| ApiError::bad_request("No document uploaded"))?;
    let doc_type = doc_type.unwrap_or_else(|| "other".to_string());

    let document = state
        .profiles
        .add_document(user.id, &bytes, &file_name, doc_type)
        .await?;

    Ok(ApiResponse::with_message(
        "Document uploaded successfully",
        document,
    ))
}

/// GET /api/owner/documents
pub async fn list_documents(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Document>> {
    let documents = state.profiles.list_documents(user.id).await?;
    Ok(ApiResponse::success(documents))
}

/// DELETE /api/owner/documents/:id - deleting an unknown id still succeeds.
pub async fn delete_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    state.profiles.remove_document(user.id, id).await?;
    Ok(ApiResponse::message_only("Document deleted successfully"))
}
