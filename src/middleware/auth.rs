use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{verify_token, Claims};
use crate::error::ApiError;
use crate::models::UserType;

/// Authenticated identity extracted from the bearer token. This is the
/// registration-time view of the user; profile edits do not retroactively
/// change an outstanding token.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub full_name: String,
    pub email_id: String,
    pub phonenumber: String,
    pub user_type: UserType,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            full_name: claims.full_name,
            email_id: claims.email_id,
            phonenumber: claims.phonenumber,
            user_type: claims.user_type,
        }
    }
}

/// Bearer-token middleware: validates the token and injects `AuthUser` into
/// request extensions for downstream handlers.
pub async fn bearer_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;
    let claims = verify_token(&token).map_err(ApiError::unauthorized)?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Guard for the owner surface: rejects tenants (and any request that
/// somehow bypassed `bearer_auth`).
pub async fn require_owner(request: Request, next: Next) -> Result<Response, ApiError> {
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.user_type == UserType::Owner => Ok(next.run(request).await),
        Some(_) => Err(ApiError::forbidden("Owner account required")),
        None => Err(ApiError::unauthorized("Authentication required")),
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
