//! Public auth surface: registration and login per user type, plus a
//! stateless logout acknowledgement.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, issue_token, verify_password};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Profile, UserType};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: Profile,
}

fn parse_user_type(raw: &str) -> Result<UserType, ApiError> {
    UserType::parse(raw)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown user type '{}'", raw)))
}

/// POST /auth/:usertype/register
pub async fn register(
    Path(user_type): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<AuthPayload> {
    let user_type = parse_user_type(&user_type)?;

    // Trim once up front; the duplicate check and the insert must agree on
    // the stored value.
    let full_name = body.full_name.trim();
    let email = body.email.trim();
    let phone = body.phone.trim();

    if full_name.is_empty() || email.is_empty() {
        return Err(ApiError::bad_request("Full name and email are required"));
    }
    if body.password.len() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    if state
        .store
        .find_profile_by_email(email, user_type)
        .await?
        .is_some()
    {
        return Err(ApiError::bad_request("Email already registered"));
    }

    let profile = Profile::register(
        full_name,
        email,
        phone,
        user_type,
        hash_password(&body.password),
    );
    state.store.insert_profile(&profile).await?;

    let token = issue_token(&profile)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {}", e)))?;
    tracing::info!(user = %profile.id, user_type = %user_type, "registered");

    Ok(ApiResponse::created(
        "Registered successfully",
        AuthPayload {
            token,
            user: profile,
        },
    ))
}

/// POST /auth/:usertype/login
pub async fn login(
    Path(user_type): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<AuthPayload> {
    let user_type = parse_user_type(&user_type)?;

    let profile = state
        .store
        .find_profile_by_email(&body.email, user_type)
        .await?
        .filter(|p| verify_password(&body.password, &p.password))
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    let token = issue_token(&profile)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {}", e)))?;

    Ok(ApiResponse::with_message(
        "Logged in successfully",
        AuthPayload {
            token,
            user: profile,
        },
    ))
}

/// POST /auth/logout - tokens are stateless, nothing to revoke server-side.
pub async fn logout() -> ApiResponse<()> {
    ApiResponse::message_only("Logged out successfully")
}
