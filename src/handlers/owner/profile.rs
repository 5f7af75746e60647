use axum::extract::{Multipart, State};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::models::{Profile, ProfileUpdate, VerificationStatus};
use crate::state::AppState;

/// GET /api/owner/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Profile> {
    let profile = state.profiles.get_profile(user.id).await?;
    Ok(ApiResponse::success(profile))
}

/// POST /api/owner/profile
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ProfileUpdate>,
) -> ApiResult<Profile> {
    let profile = state.profiles.create_or_update_profile(&user, body).await?;
    Ok(ApiResponse::with_message(
        "Profile created successfully",
        profile,
    ))
}

/// PUT /api/owner/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<ProfileUpdate>,
) -> ApiResult<Profile> {
    let profile = state.profiles.create_or_update_profile(&user, body).await?;
    Ok(ApiResponse::with_message(
        "Profile updated successfully",
        profile,
    ))
}

#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    pub avatar: String,
}

/// POST /api/owner/profile/avatar
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<AvatarRequest>,
) -> ApiResult<Value> {
    let avatar = state.profiles.set_avatar(user.id, body.avatar).await?;
    Ok(ApiResponse::with_message(
        "Avatar updated successfully",
        json!({ "avatar": avatar }),
    ))
}

/// POST /api/owner/profile/photo - multipart with a `photo` file field.
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> ApiResult<Value> {
    let mut upload: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("photo") {
            let file_name = field.file_name().unwrap_or("photo").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;
            upload = Some((bytes.to_vec(), file_name));
        }
    }

    let (bytes, file_name) = upload.ok_or_else(|| ApiError::bad_request("No photo uploaded"))?;
    let url = state
        .profiles
        .set_profile_photo(user.id, &bytes, &file_name)
        .await?;

    Ok(ApiResponse::with_message(
        "Profile photo uploaded successfully",
        json!({ "profilePhoto": url }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub verification_status: String,
    pub verified_by: Option<String>,
}

/// PATCH /api/owner/verify
pub async fn verify_kyc(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<VerifyRequest>,
) -> ApiResult<Value> {
    let status = VerificationStatus::parse(&body.verification_status).ok_or_else(|| {
        ApiError::bad_request(format!(
            "Invalid verification status '{}'",
            body.verification_status
        ))
    })?;

    let status = state
        .profiles
        .set_verification(user.id, status, body.verified_by)
        .await?;

    Ok(ApiResponse::with_message(
        "KYC verification updated successfully",
        json!({ "verificationStatus": status }),
    ))
}
