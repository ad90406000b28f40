use std::path::PathBuf;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::config::Settings;

#[derive(Debug, Clone)]
pub(crate) struct StorageService {
    upload_dir: PathBuf,
    max_upload_size: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct StoredPdf {
    pub(crate) path: String,
    pub(crate) size: i64,
    pub(crate) sha256: String,
}

impl StorageService {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let upload_dir = PathBuf::from(&settings.storage().upload_dir);
        std::fs::create_dir_all(&upload_dir)?;

        Ok(Self {
            upload_dir,
            max_upload_size: settings.storage().max_upload_size_mb * 1024 * 1024,
        })
    }

    pub(crate) fn max_upload_size(&self) -> u64 {
        self.max_upload_size
    }

    /// Writes the uploaded bytes under a fresh random file name and returns
    /// the stored path together with size and content digest.
    pub(crate) async fn save_pdf(&self, bytes: &[u8]) -> anyhow::Result<StoredPdf> {
        let file_name = format!("{}.pdf", Uuid::new_v4());
        let path = self.upload_dir.join(&file_name);

        let size = bytes.len() as i64;
        let hash_hex = hex::encode(Sha256::digest(bytes));

        tokio::fs::write(&path, bytes).await?;

        Ok(StoredPdf { path: path.to_string_lossy().into_owned(), size, sha256: hash_hex })
    }
}

#[cfg(test)]
mod tests {
    use super::StorageService;
    use crate::core::config::Settings;
    use crate::test_support;

    #[tokio::test]
    async fn save_pdf_writes_bytes_to_disk() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();

        let settings = Settings::load().expect("settings");
        let storage = StorageService::from_settings(&settings).expect("storage");

        let payload = b"%PDF-1.4 fake payload";
        let stored = storage.save_pdf(payload).await.expect("save");

        assert!(stored.path.ends_with(".pdf"));
        assert_eq!(stored.size, payload.len() as i64);
        assert_eq!(stored.sha256.len(), 64);

        let written = tokio::fs::read(&stored.path).await.expect("read back");
        assert_eq!(written, payload);

        tokio::fs::remove_file(&stored.path).await.expect("cleanup");
    }

    #[tokio::test]
    async fn distinct_uploads_get_distinct_paths() {
        let _guard = test_support::env_lock().await;
        test_support::set_test_env();

        let settings = Settings::load().expect("settings");
        let storage = StorageService::from_settings(&settings).expect("storage");

        let first = storage.save_pdf(b"one").await.expect("first");
        let second = storage.save_pdf(b"one").await.expect("second");
        assert_ne!(first.path, second.path);

        tokio::fs::remove_file(&first.path).await.expect("cleanup");
        tokio::fs::remove_file(&second.path).await.expect("cleanup");
    }
}
