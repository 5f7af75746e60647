use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{Document, Profile, ProfileUpdate, VerificationStatus};
use crate::storage::FileStorage;
use crate::store::Store;

const PHOTO_CATEGORY: &str = "profile_photos";
const DOCUMENT_CATEGORY: &str = "owner_documents";

/// Profile, media and KYC-document operations. Holds its store and
/// file-storage capabilities by injection so the whole service runs against
/// a fake store in tests.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn Store>,
    files: Arc<dyn FileStorage>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn Store>, files: Arc<dyn FileStorage>) -> Self {
        Self { store, files }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, ApiError> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Profile not found"))
    }

    /// Partial update: any field omitted from the input keeps its prior
    /// value, except the identity trio (name/email/phone) which falls back
    /// to the registration values carried by the authenticated user.
    pub async fn create_or_update_profile(
        &self,
        user: &AuthUser,
        input: ProfileUpdate,
    ) -> Result<Profile, ApiError> {
        let mut profile = self.get_profile(user.id).await?;

        profile.full_name = input.full_name.unwrap_or_else(|| user.full_name.clone());
        profile.email_id = input.email.unwrap_or_else(|| user.email_id.clone());
        profile.phonenumber = input.phone.unwrap_or_else(|| user.phonenumber.clone());

        if let Some(dob) = input.dob {
            profile.dob = Some(dob);
        }
        if let Some(gender) = input.gender {
            profile.gender = Some(gender);
        }
        if let Some(company_name) = input.company_name {
            profile.company_name = Some(company_name);
        }
        if let Some(gst_number) = input.gst_number {
            profile.gst_number = Some(gst_number);
        }
        if let Some(pan_card) = input.pan_card {
            profile.pan_card = Some(pan_card);
        }
        if let Some(aadhaar_card) = input.aadhaar_card {
            profile.aadhaar_card = Some(aadhaar_card);
        }
        if let Some(address) = input.address {
            profile.address = Some(address);
        }
        profile.updated_at = Utc::now();

        self.store.save_profile(&profile).await?;
        Ok(profile)
    }

    pub async fn set_avatar(&self, user_id: Uuid, avatar: String) -> Result<String, ApiError> {
        let mut profile = self.get_profile(user_id).await?;
        profile.avatar = Some(avatar.clone());
        profile.updated_at = Utc::now();
        self.store.save_profile(&profile).await?;
        Ok(avatar)
    }

    /// Store the uploaded photo bytes and point the profile at the returned
    /// URL. A successful upload followed by a failed save leaves the stored
    /// file orphaned; there is no compensation step.
    pub async fn set_profile_photo(
        &self,
        user_id: Uuid,
        bytes: &[u8],
        file_name: &str,
    ) -> Result<String, ApiError> {
        let stored = self.files.save_file(bytes, PHOTO_CATEGORY, file_name).await?;

        let mut profile = self.get_profile(user_id).await?;
        profile.profile_photo = Some(stored.url.clone());
        profile.updated_at = Utc::now();
        self.store.save_profile(&profile).await?;
        Ok(stored.url)
    }

    pub async fn add_document(
        &self,
        user_id: Uuid,
        bytes: &[u8],
        file_name: &str,
        doc_type: String,
    ) -> Result<Document, ApiError> {
        let stored = self
            .files
            .save_file(bytes, DOCUMENT_CATEGORY, file_name)
            .await?;

        let mut profile = self.get_profile(user_id).await?;
        let document = Document::new(doc_type, stored.url);
        profile.documents.push(document.clone());
        profile.updated_at = Utc::now();
        self.store.save_profile(&profile).await?;
        Ok(document)
    }

    pub async fn list_documents(&self, user_id: Uuid) -> Result<Vec<Document>, ApiError> {
        Ok(self.get_profile(user_id).await?.documents)
    }

    /// Drop the document with the given id. Removing an id that is not
    /// present is a successful no-op.
    pub async fn remove_document(&self, user_id: Uuid, document_id: Uuid) -> Result<(), ApiError> {
        let mut profile = self.get_profile(user_id).await?;
        profile.documents.retain(|doc| doc.id != document_id);
        profile.updated_at = Utc::now();
        self.store.save_profile(&profile).await?;
        Ok(())
    }

    /// Unconditional overwrite of the verification fields. Restricting who
    /// may call this to administrative roles is the outer layer's job.
    pub async fn set_verification(
        &self,
        user_id: Uuid,
        status: VerificationStatus,
        verified_by: Option<String>,
    ) -> Result<VerificationStatus, ApiError> {
        let mut profile = self.get_profile(user_id).await?;
        profile.verification_status = status;
        profile.verified_by = verified_by;
        profile.updated_at = Utc::now();
        self.store.save_profile(&profile).await?;
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hash_password;
    use crate::models::UserType;
    use crate::storage::LocalStorage;
    use crate::store::{MemoryStore, ProfileStore};

    async fn service_with_owner() -> (ProfileService, AuthUser, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(MemoryStore::new());
        let files = Arc::new(LocalStorage::new(dir.path(), "http://localhost/files"));

        let profile = Profile::register(
            "Meera Shah",
            "meera@example.com",
            "9876500000",
            UserType::Owner,
            hash_password("pw"),
        );
        store.insert_profile(&profile).await.expect("insert");

        let user = AuthUser {
            id: profile.id,
            full_name: profile.full_name.clone(),
            email_id: profile.email_id.clone(),
            phonenumber: profile.phonenumber.clone(),
            user_type: UserType::Owner,
        };

        (ProfileService::new(store, files), user, dir)
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let (service, _, _dir) = service_with_owner().await;
        let err = service.get_profile(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_merges_and_falls_back_to_registration_identity() {
        let (service, user, _dir) = service_with_owner().await;

        let updated = service
            .create_or_update_profile(
                &user,
                ProfileUpdate {
                    company_name: Some("Shah Estates".into()),
                    gst_number: Some("27AAAAA0000A1Z5".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        // identity fields came from the authenticated user
        assert_eq!(updated.full_name, "Meera Shah");
        assert_eq!(updated.email_id, "meera@example.com");
        assert_eq!(updated.company_name.as_deref(), Some("Shah Estates"));

        // second partial update keeps the earlier KYC fields
        let updated = service
            .create_or_update_profile(
                &user,
                ProfileUpdate {
                    full_name: Some("Meera V. Shah".into()),
                    address: Some("12 Hill Road, Pune".into()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.full_name, "Meera V. Shah");
        assert_eq!(updated.gst_number.as_deref(), Some("27AAAAA0000A1Z5"));
        assert_eq!(updated.address.as_deref(), Some("12 Hill Road, Pune"));
    }

    #[tokio::test]
    async fn add_then_list_documents_appends_in_order() {
        let (service, user, _dir) = service_with_owner().await;

        service
            .add_document(user.id, b"pan bytes", "pan.pdf", "pan".into())
            .await
            .expect("add pan");
        let added = service
            .add_document(user.id, b"gst bytes", "gst.pdf", "gst".into())
            .await
            .expect("add gst");

        let docs = service.list_documents(user.id).await.expect("list");
        assert_eq!(docs.len(), 2);
        let last = docs.last().unwrap();
        assert_eq!(last.doc_type, "gst");
        assert_eq!(last.doc_url, added.doc_url);
        assert!(last.doc_url.contains("owner_documents"));
    }

    #[tokio::test]
    async fn remove_unknown_document_is_a_successful_noop() {
        let (service, user, _dir) = service_with_owner().await;

        service
            .add_document(user.id, b"pan", "pan.pdf", "pan".into())
            .await
            .expect("add");

        service
            .remove_document(user.id, Uuid::new_v4())
            .await
            .expect("noop remove succeeds");
        assert_eq!(service.list_documents(user.id).await.unwrap().len(), 1);

        let id = service.list_documents(user.id).await.unwrap()[0].id;
        service.remove_document(user.id, id).await.expect("remove");
        assert!(service.list_documents(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn verification_overwrites_unconditionally() {
        let (service, user, _dir) = service_with_owner().await;

        let status = service
            .set_verification(user.id, VerificationStatus::Verified, Some("admin-7".into()))
            .await
            .expect("verify");
        assert_eq!(status, VerificationStatus::Verified);

        let status = service
            .set_verification(user.id, VerificationStatus::Rejected, None)
            .await
            .expect("reject");
        assert_eq!(status, VerificationStatus::Rejected);

        let profile = service.get_profile(user.id).await.unwrap();
        assert_eq!(profile.verification_status, VerificationStatus::Rejected);
        assert_eq!(profile.verified_by, None);
    }

    #[tokio::test]
    async fn photo_upload_updates_profile_url() {
        let (service, user, _dir) = service_with_owner().await;

        let url = service
            .set_profile_photo(user.id, b"jpeg bytes", "me.jpg")
            .await
            .expect("upload");
        assert!(url.contains("profile_photos"));

        let profile = service.get_profile(user.id).await.unwrap();
        assert_eq!(profile.profile_photo.as_deref(), Some(url.as_str()));
    }
}
