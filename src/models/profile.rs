use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the marketplace a profile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Tenant,
    Owner,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Tenant => "tenant",
            UserType::Owner => "owner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tenant" => Some(UserType::Tenant),
            "owner" => Some(UserType::Owner),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// KYC verification state for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(VerificationStatus::Pending),
            "verified" => Some(VerificationStatus::Verified),
            "rejected" => Some(VerificationStatus::Rejected),
            _ => None,
        }
    }
}

/// An uploaded KYC document attached to a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub doc_type: String,
    pub doc_url: String,
}

impl Document {
    pub fn new(doc_type: impl Into<String>, doc_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            doc_type: doc_type.into(),
            doc_url: doc_url.into(),
        }
    }
}

/// Persisted record of a tenant's or landlord's identity, KYC and media data.
///
/// The password hash is stored alongside the profile but is never serialized;
/// every outbound representation goes through this struct, so the hash cannot
/// leak into a response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub full_name: String,
    pub email_id: String,
    pub phonenumber: String,
    pub user_type: UserType,
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhaar_card: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub verification_status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    pub documents: Vec<Document>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Fresh profile as created at registration time. KYC and media fields
    /// start empty and are filled in through the profile endpoints.
    pub fn register(
        full_name: impl Into<String>,
        email_id: impl Into<String>,
        phonenumber: impl Into<String>,
        user_type: UserType,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            email_id: email_id.into(),
            phonenumber: phonenumber.into(),
            user_type,
            password: password_hash.into(),
            dob: None,
            gender: None,
            company_name: None,
            gst_number: None,
            pan_card: None,
            aadhaar_card: None,
            address: None,
            verification_status: VerificationStatus::Pending,
            verified_by: None,
            avatar: None,
            profile_photo: None,
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial-update payload for `POST/PUT /api/owner/profile`.
///
/// Every field is optional: anything omitted keeps its prior value, and the
/// identity trio (name/email/phone) falls back to the registration values
/// carried by the authenticated user when absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub company_name: Option<String>,
    pub gst_number: Option<String>,
    pub pan_card: Option<String>,
    pub aadhaar_card: Option<String>,
    pub address: Option<String>,
}
