use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{ObjectStore, StoreConfig, StoreError};

/// Filesystem-backed store rooted at the upload directory.
pub struct LocalStore {
    base_dir: PathBuf,
}

impl LocalStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            base_dir: config.upload_dir.clone(),
        }
    }

    /// Keys are relative paths below `base_dir`; anything that could climb
    /// out of it is rejected.
    fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(key);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || key.contains('\\') {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(rel))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put(&self, key: &str, data: Bytes) -> Result<(), StoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Internal(format!("mkdir: {e}")))?;
        }
        // Write next to the target and rename, so readers never observe a
        // partially written object.
        let tmp = path.with_file_name(format!(
            ".{}.{:08x}.partial",
            path.file_name().and_then(|n| n.to_str()).unwrap_or("object"),
            rand::random::<u32>()
        ));
        if let Err(e) = tokio::fs::write(&tmp, &data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StoreError::Internal(format!("write {}: {e}", tmp.display())));
        }
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            StoreError::Internal(format!("rename to {}: {e}", path.display()))
        })
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            // Reading a directory is not an object lookup hit.
            Err(_) if path.is_dir() => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(StoreError::Internal(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Internal(format!(
                "delete {}: {e}",
                path.display()
            ))),
        }
    }
}
