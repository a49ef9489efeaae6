use bytes::Bytes;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Asset not found: {0}")]
    NotFound(String),
}

/// Directory of uploaded image and PDF files, keyed by their generated
/// unique filename. The raw bytes are meaningless without the owning
/// metadata record.
pub struct AssetStore {
    base_path: PathBuf,
}

impl AssetStore {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, std::io::Error> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    fn asset_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    pub async fn put(&self, name: &str, data: Bytes) -> Result<(), AssetStoreError> {
        let path = self.asset_path(name);
        tokio::fs::write(&path, &data).await?;
        Ok(())
    }

    pub async fn get(&self, name: &str) -> Result<Bytes, AssetStoreError> {
        let path = self.asset_path(name);
        if !path.exists() {
            return Err(AssetStoreError::NotFound(name.to_string()));
        }
        let data = tokio::fs::read(&path).await?;
        Ok(Bytes::from(data))
    }

    /// Remove an asset. Removing a name that doesn't exist is not an error.
    pub async fn delete(&self, name: &str) -> Result<(), AssetStoreError> {
        let path = self.asset_path(name);
        if path.exists() {
            tokio::fs::remove_file(&path).await?;
        }
        Ok(())
    }

    pub async fn exists(&self, name: &str) -> Result<bool, AssetStoreError> {
        let path = self.asset_path(name);
        Ok(path.exists())
    }
}
