//! Postgres store backend over sqlx. Queries are built at runtime so the
//! crate compiles without a live database.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{
    Document, Profile, PropertySummary, TenantSummary, UserType, VerificationStatus, VisitRequest,
    VisitRequestView, VisitStatus,
};

use super::{ProfileStore, Store, StoreError, VisitRequestStore};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS profiles (
    id UUID PRIMARY KEY,
    full_name TEXT NOT NULL,
    email_id TEXT NOT NULL,
    phonenumber TEXT NOT NULL,
    user_type TEXT NOT NULL,
    password TEXT NOT NULL,
    dob DATE,
    gender TEXT,
    company_name TEXT,
    gst_number TEXT,
    pan_card TEXT,
    aadhaar_card TEXT,
    address TEXT,
    verification_status TEXT NOT NULL DEFAULT 'pending',
    verified_by TEXT,
    avatar TEXT,
    profile_photo TEXT,
    documents JSONB NOT NULL DEFAULT '[]',
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS profiles_email_type_idx ON profiles (email_id, user_type);

CREATE TABLE IF NOT EXISTS properties (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    location TEXT,
    images JSONB NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS visit_requests (
    id UUID PRIMARY KEY,
    tenant UUID NOT NULL REFERENCES profiles (id),
    landlord UUID NOT NULL REFERENCES profiles (id),
    property UUID NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    progress INT NOT NULL DEFAULT 0,
    scheduled_date TIMESTAMPTZ,
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);
CREATE INDEX IF NOT EXISTS visit_requests_landlord_idx ON visit_requests (landlord, created_at DESC);
"#;

const PROFILE_COLUMNS: &str = "id, full_name, email_id, phonenumber, user_type, password, dob, \
     gender, company_name, gst_number, pan_card, aadhaar_card, address, verification_status, \
     verified_by, avatar, profile_photo, documents, created_at, updated_at";

#[derive(FromRow)]
struct ProfileRow {
    id: Uuid,
    full_name: String,
    email_id: String,
    phonenumber: String,
    user_type: String,
    password: String,
    dob: Option<NaiveDate>,
    gender: Option<String>,
    company_name: Option<String>,
    gst_number: Option<String>,
    pan_card: Option<String>,
    aadhaar_card: Option<String>,
    address: Option<String>,
    verification_status: String,
    verified_by: Option<String>,
    avatar: Option<String>,
    profile_photo: Option<String>,
    documents: Json<Vec<Document>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, StoreError> {
        let user_type = UserType::parse(&row.user_type)
            .ok_or_else(|| StoreError::Query(format!("unknown user_type '{}'", row.user_type)))?;
        let verification_status = VerificationStatus::parse(&row.verification_status)
            .ok_or_else(|| {
                StoreError::Query(format!(
                    "unknown verification_status '{}'",
                    row.verification_status
                ))
            })?;

        Ok(Profile {
            id: row.id,
            full_name: row.full_name,
            email_id: row.email_id,
            phonenumber: row.phonenumber,
            user_type,
            password: row.password,
            dob: row.dob,
            gender: row.gender,
            company_name: row.company_name,
            gst_number: row.gst_number,
            pan_card: row.pan_card,
            aadhaar_card: row.aadhaar_card,
            address: row.address,
            verification_status,
            verified_by: row.verified_by,
            avatar: row.avatar,
            profile_photo: row.profile_photo,
            documents: row.documents.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct VisitRequestRow {
    id: Uuid,
    tenant: Uuid,
    landlord: Uuid,
    property: Uuid,
    status: String,
    progress: i32,
    scheduled_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VisitRequestRow> for VisitRequest {
    type Error = StoreError;

    fn try_from(row: VisitRequestRow) -> Result<Self, StoreError> {
        let status = VisitStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Query(format!("unknown visit status '{}'", row.status)))?;

        Ok(VisitRequest {
            id: row.id,
            tenant: row.tenant,
            landlord: row.landlord,
            property: row.property,
            status,
            progress: row.progress,
            scheduled_date: row.scheduled_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Joined row for the landlord listing: request plus resolved tenant and
/// (possibly missing) property columns.
#[derive(FromRow)]
struct VisitViewRow {
    id: Uuid,
    status: String,
    progress: i32,
    scheduled_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    tenant_id: Uuid,
    tenant_full_name: String,
    tenant_email_id: String,
    tenant_phonenumber: String,
    tenant_profile_photo: Option<String>,
    property_id: Option<Uuid>,
    property_title: Option<String>,
    property_location: Option<String>,
    property_images: Option<Json<Vec<String>>>,
}

impl TryFrom<VisitViewRow> for VisitRequestView {
    type Error = StoreError;

    fn try_from(row: VisitViewRow) -> Result<Self, StoreError> {
        let status = VisitStatus::parse(&row.status)
            .ok_or_else(|| StoreError::Query(format!("unknown visit status '{}'", row.status)))?;

        let property = match (row.property_id, row.property_title) {
            (Some(id), Some(title)) => Some(PropertySummary {
                id,
                title,
                location: row.property_location,
                images: row.property_images.map(|j| j.0).unwrap_or_default(),
            }),
            _ => None,
        };

        Ok(VisitRequestView {
            id: row.id,
            tenant: TenantSummary {
                id: row.tenant_id,
                full_name: row.tenant_full_name,
                email_id: row.tenant_email_id,
                phonenumber: row.tenant_phonenumber,
                profile_photo: row.tenant_profile_photo,
            },
            property,
            status,
            progress: row.progress,
            scheduled_date: row.scheduled_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the idempotent schema DDL.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }

    async fn find_profile_by_email(
        &self,
        email_id: &str,
        user_type: UserType,
    ) -> Result<Option<Profile>, StoreError> {
        let sql = format!(
            "SELECT {} FROM profiles WHERE email_id = $1 AND user_type = $2",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(email_id)
            .bind(user_type.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Profile::try_from).transpose()
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let sql = format!(
            "INSERT INTO profiles ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, \
             $12, $13, $14, $15, $16, $17, $18, $19, $20)",
            PROFILE_COLUMNS
        );
        sqlx::query(&sql)
            .bind(profile.id)
            .bind(&profile.full_name)
            .bind(&profile.email_id)
            .bind(&profile.phonenumber)
            .bind(profile.user_type.as_str())
            .bind(&profile.password)
            .bind(profile.dob)
            .bind(&profile.gender)
            .bind(&profile.company_name)
            .bind(&profile.gst_number)
            .bind(&profile.pan_card)
            .bind(&profile.aadhaar_card)
            .bind(&profile.address)
            .bind(profile.verification_status.as_str())
            .bind(&profile.verified_by)
            .bind(&profile.avatar)
            .bind(&profile.profile_photo)
            .bind(Json(&profile.documents))
            .bind(profile.created_at)
            .bind(profile.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE profiles SET full_name = $2, email_id = $3, phonenumber = $4, dob = $5, \
             gender = $6, company_name = $7, gst_number = $8, pan_card = $9, aadhaar_card = $10, \
             address = $11, verification_status = $12, verified_by = $13, avatar = $14, \
             profile_photo = $15, documents = $16, updated_at = $17 WHERE id = $1",
        )
        .bind(profile.id)
        .bind(&profile.full_name)
        .bind(&profile.email_id)
        .bind(&profile.phonenumber)
        .bind(profile.dob)
        .bind(&profile.gender)
        .bind(&profile.company_name)
        .bind(&profile.gst_number)
        .bind(&profile.pan_card)
        .bind(&profile.aadhaar_card)
        .bind(&profile.address)
        .bind(profile.verification_status.as_str())
        .bind(&profile.verified_by)
        .bind(&profile.avatar)
        .bind(&profile.profile_photo)
        .bind(Json(&profile.documents))
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "profile {} not found",
                profile.id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl VisitRequestStore for PgStore {
    async fn get_visit_request(&self, id: Uuid) -> Result<Option<VisitRequest>, StoreError> {
        let row = sqlx::query_as::<_, VisitRequestRow>(
            "SELECT id, tenant, landlord, property, status, progress, scheduled_date, notes, \
             created_at, updated_at FROM visit_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(VisitRequest::try_from).transpose()
    }

    async fn insert_visit_request(&self, request: &VisitRequest) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO visit_requests (id, tenant, landlord, property, status, progress, \
             scheduled_date, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(request.id)
        .bind(request.tenant)
        .bind(request.landlord)
        .bind(request.property)
        .bind(request.status.as_str())
        .bind(request.progress)
        .bind(request.scheduled_date)
        .bind(&request.notes)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_visit_request(&self, request: &VisitRequest) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE visit_requests SET status = $2, progress = $3, scheduled_date = $4, \
             notes = $5, updated_at = $6 WHERE id = $1",
        )
        .bind(request.id)
        .bind(request.status.as_str())
        .bind(request.progress)
        .bind(request.scheduled_date)
        .bind(&request.notes)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "visit request {} not found",
                request.id
            )));
        }
        Ok(())
    }

    async fn list_visit_requests(
        &self,
        landlord: Uuid,
        status: Option<VisitStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VisitRequestView>, StoreError> {
        let mut sql = String::from(
            "SELECT vr.id, vr.status, vr.progress, vr.scheduled_date, vr.notes, vr.created_at, \
             vr.updated_at, \
             t.id AS tenant_id, t.full_name AS tenant_full_name, t.email_id AS tenant_email_id, \
             t.phonenumber AS tenant_phonenumber, t.profile_photo AS tenant_profile_photo, \
             p.id AS property_id, p.title AS property_title, p.location AS property_location, \
             p.images AS property_images \
             FROM visit_requests vr \
             JOIN profiles t ON t.id = vr.tenant \
             LEFT JOIN properties p ON p.id = vr.property \
             WHERE vr.landlord = $1",
        );
        if status.is_some() {
            sql.push_str(" AND vr.status = $4");
        }
        sql.push_str(" ORDER BY vr.created_at DESC LIMIT $2 OFFSET $3");

        let mut query = sqlx::query_as::<_, VisitViewRow>(&sql)
            .bind(landlord)
            .bind(limit)
            .bind(offset);
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(VisitRequestView::try_from).collect()
    }

    async fn count_visit_requests(
        &self,
        landlord: Uuid,
        status: Option<VisitStatus>,
    ) -> Result<i64, StoreError> {
        // Same tenant join as the listing so the count never includes
        // requests the page would drop.
        let count: (i64,) = if let Some(status) = status {
            sqlx::query_as(
                "SELECT COUNT(*) FROM visit_requests vr JOIN profiles t ON t.id = vr.tenant \
                 WHERE vr.landlord = $1 AND vr.status = $2",
            )
            .bind(landlord)
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_as(
                "SELECT COUNT(*) FROM visit_requests vr JOIN profiles t ON t.id = vr.tenant \
                 WHERE vr.landlord = $1",
            )
            .bind(landlord)
            .fetch_one(&self.pool)
            .await?
        };
        Ok(count.0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn upsert_property(&self, property: &PropertySummary) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO properties (id, title, location, images) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET title = $2, location = $3, images = $4",
        )
        .bind(property.id)
        .bind(&property.title)
        .bind(&property.location)
        .bind(Json(&property.images))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
