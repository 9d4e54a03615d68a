mod local;

pub use local::LocalStore;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("store error: {0}")]
    Internal(String),
}

/// A store for opaque blobs keyed by string paths.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write (create or overwrite) an object.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError>;

    /// Read an object. Returns `StoreError::NotFound` if absent.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Read an object, returning `None` if it does not exist.
    async fn get_opt(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        match self.get(key).await {
            Ok(data) => Ok(Some(data)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete an object. No-op if absent.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// -- Configuration --

pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";

/// Configuration for the upload store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory uploaded files are written to and served from.
    pub upload_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
        }
    }
}

// -- Factory --

/// Create the upload store, creating its directory if it does not exist yet.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ObjectStore>, StoreError> {
    std::fs::create_dir_all(&config.upload_dir).map_err(|e| {
        StoreError::Internal(format!("mkdir {}: {e}", config.upload_dir.display()))
    })?;
    tracing::debug!(dir = %config.upload_dir.display(), "upload directory ready");
    Ok(Arc::new(LocalStore::new(config)))
}
