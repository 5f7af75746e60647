//! File-storage collaborator. Handlers never touch the filesystem directly;
//! they hand bytes to a `FileStorage` capability that returns a durable URL.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of persisting an uploaded file.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub url: String,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist `bytes` under `category`, keeping the original name visible in
    /// the stored name. Durable and idempotent per call; every call yields a
    /// distinct URL.
    async fn save_file(
        &self,
        bytes: &[u8],
        category: &str,
        original_name: &str,
    ) -> Result<StoredFile, StorageError>;
}

/// Local-disk backend: files land under `<root>/<category>/` and are served
/// from `<public_base_url>/<category>/<name>` by the host's static layer.
pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }
}

/// Strip path separators and other hostile characters from a client-supplied
/// file name before it touches the filesystem. A lone dot survives so
/// extensions stay readable; adjacent dots (`..` traversal runs) do not.
fn sanitize_name(original: &str) -> String {
    let mapped: Vec<char> = original
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned: String = mapped
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let dot_before = i > 0 && mapped[i - 1] == '.';
            let dot_after = mapped.get(i + 1) == Some(&'.');
            if c == '.' && (dot_before || dot_after) {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn save_file(
        &self,
        bytes: &[u8],
        category: &str,
        original_name: &str,
    ) -> Result<StoredFile, StorageError> {
        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize_name(original_name));
        let dir = self.root.join(category);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&stored_name), bytes).await?;

        let url = format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            category,
            stored_name
        );
        tracing::debug!(category, name = %stored_name, "stored uploaded file");
        Ok(StoredFile { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_separators_and_traversal_dots() {
        assert_eq!(sanitize_name("../../etc/passwd"), "______etc_passwd");
        assert_eq!(sanitize_name("pan card.pdf"), "pan_card.pdf");
        assert_eq!(sanitize_name("report..final.pdf"), "report__final.pdf");
        assert_eq!(sanitize_name("..."), "___");
        assert_eq!(sanitize_name(""), "upload");
    }

    #[tokio::test]
    async fn save_file_writes_under_category() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::new(dir.path(), "http://localhost:3000/files");

        let stored = storage
            .save_file(b"hello", "owner_documents", "proof.pdf")
            .await
            .expect("save");

        assert!(stored.url.starts_with("http://localhost:3000/files/owner_documents/"));
        assert!(stored.url.ends_with("-proof.pdf"));

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("owner_documents"))
            .expect("read dir")
            .collect();
        assert_eq!(entries.len(), 1);
    }
}
