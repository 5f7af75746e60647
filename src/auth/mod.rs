//! Token issuance and credential hashing for the auth surface.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config;
use crate::models::{Profile, UserType};

const ISSUER: &str = "rentbase-api";

/// JWT claims carrying the authenticated identity consumed by the
/// profile and visit-request surfaces.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (profile id)
    pub sub: Uuid,
    pub full_name: String,
    pub email_id: String,
    pub phonenumber: String,
    pub user_type: UserType,
    /// Token expiration timestamp
    pub exp: i64,
    /// Token issued at timestamp
    pub iat: i64,
    /// Token issuer
    pub iss: String,
}

/// Generate a signed token for a freshly registered or logged-in profile.
pub fn issue_token(profile: &Profile) -> Result<String, jsonwebtoken::errors::Error> {
    let security = &config::config().security;
    let now = Utc::now();

    let claims = Claims {
        sub: profile.id,
        full_name: profile.full_name.clone(),
        email_id: profile.email_id.clone(),
        phonenumber: profile.phonenumber.clone(),
        user_type: profile.user_type,
        exp: (now + Duration::hours(security.jwt_expiry_hours as i64)).timestamp(),
        iat: now.timestamp(),
        iss: ISSUER.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(security.jwt_secret.as_bytes()),
    )
}

/// Validate a bearer token and extract its claims.
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("Invalid token: {}", e))?;

    Ok(token_data.claims)
}

pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    hash_password(password) == hash
}
