use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use gethelp_core::{upload, CreateHelpRequest, HelpRequest, ImageUpload, NewHelpRequest};
use gethelp_db::{Database, DbError};
use gethelp_store::ObjectStore;
use tracing::{info, warn};

use crate::{RequestService, ServiceError};

/// Implementation backed by a database and the upload store.
pub struct LocalService {
    db: Arc<dyn Database>,
    store: Arc<dyn ObjectStore>,
}

impl LocalService {
    pub fn new(db: Arc<dyn Database>, store: Arc<dyn ObjectStore>) -> Self {
        Self { db, store }
    }

    /// Write the image into the store and return its file name.
    async fn save_image(&self, image: ImageUpload) -> Result<String, ServiceError> {
        let filename = upload::generate_filename(&image.original_name);
        let size = image.data.len();
        self.store
            .put(&filename, Bytes::from(image.data))
            .await
            .map_err(|e| ServiceError::Upload(e.to_string()))?;
        info!(%filename, size, "stored upload");
        Ok(filename)
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        ServiceError::Internal(e.to_string())
    }
}

#[async_trait]
impl RequestService for LocalService {
    async fn list_requests(&self) -> Result<Vec<HelpRequest>, ServiceError> {
        Ok(self.db.list_requests().await?)
    }

    async fn create_request(
        &self,
        input: &CreateHelpRequest,
        image: Option<ImageUpload>,
    ) -> Result<HelpRequest, ServiceError> {
        let image = image.filter(|img| !img.is_empty_placeholder());
        let filename = match image {
            Some(img) => Some(self.save_image(img).await?),
            None => None,
        };

        let row = NewHelpRequest {
            title: input.title.clone(),
            body: input.body.clone(),
            image_url: filename
                .as_deref()
                .map(upload::public_path)
                .unwrap_or_default(),
        };

        match self.db.insert_request(&row).await {
            Ok(created) => {
                info!(id = %created.id, has_image = created.has_image(), "request created");
                Ok(created)
            }
            Err(e) => {
                // Do not leave an unreferenced file behind.
                if let Some(filename) = filename {
                    if let Err(cleanup) = self.store.delete(&filename).await {
                        warn!(%filename, error = %cleanup, "failed to remove orphaned upload");
                    }
                }
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gethelp_db::SqliteDatabase;
    use gethelp_store::StoreConfig;

    struct FailingDatabase;

    #[async_trait]
    impl Database for FailingDatabase {
        async fn insert_request(&self, _input: &NewHelpRequest) -> Result<HelpRequest, DbError> {
            Err(DbError::Internal("disk full".into()))
        }
        async fn list_requests(&self) -> Result<Vec<HelpRequest>, DbError> {
            Err(DbError::Internal("connection reset".into()))
        }
    }

    fn make_service(
        db: Arc<dyn Database>,
    ) -> (LocalService, Arc<dyn ObjectStore>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let store = gethelp_store::create_store(&StoreConfig {
            upload_dir: tmp.path().join("uploads"),
        })
        .unwrap();
        (LocalService::new(db, store.clone()), store, tmp)
    }

    fn uploaded_files(tmp: &tempfile::TempDir) -> Vec<String> {
        std::fs::read_dir(tmp.path().join("uploads"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    fn sqlite() -> Arc<dyn Database> {
        Arc::new(SqliteDatabase::open_in_memory().unwrap())
    }

    fn input(title: &str, body: &str) -> CreateHelpRequest {
        CreateHelpRequest {
            title: title.into(),
            body: body.into(),
        }
    }

    fn png(name: &str, data: &[u8]) -> ImageUpload {
        ImageUpload {
            original_name: name.into(),
            content_type: Some("image/png".into()),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn create_without_image_has_empty_url() {
        let (svc, _store, tmp) = make_service(sqlite());
        let created = svc
            .create_request(&input("Need food", "Family of 4"), None)
            .await
            .unwrap();
        assert_eq!(created.image_url, "");

        let all = svc.list_requests().await.unwrap();
        assert_eq!(all, vec![created]);
        assert!(uploaded_files(&tmp).is_empty());
    }

    #[tokio::test]
    async fn create_with_image_stores_bytes() {
        let (svc, store, _tmp) = make_service(sqlite());
        let bytes = b"\x89PNG\r\n\x1a\nfake";
        let created = svc
            .create_request(&input("Roof", "Leaking"), Some(png("roof.png", bytes)))
            .await
            .unwrap();

        let filename = upload::filename_from_public_path(&created.image_url).unwrap();
        assert!(filename.starts_with("request-"));
        assert!(filename.ends_with(".png"));
        assert_eq!(store.get(filename).await.unwrap().as_ref(), bytes);
    }

    #[tokio::test]
    async fn empty_placeholder_part_is_ignored() {
        let (svc, _store, tmp) = make_service(sqlite());
        let placeholder = ImageUpload {
            original_name: String::new(),
            content_type: Some("application/octet-stream".into()),
            data: vec![],
        };
        let created = svc
            .create_request(&input("t", "b"), Some(placeholder))
            .await
            .unwrap();
        assert_eq!(created.image_url, "");
        assert!(uploaded_files(&tmp).is_empty());
    }

    #[tokio::test]
    async fn missing_title_is_accepted() {
        let (svc, _store, _tmp) = make_service(sqlite());
        let created = svc
            .create_request(&CreateHelpRequest::default(), None)
            .await
            .unwrap();
        assert_eq!(created.title, "");
        assert_eq!(created.body, "");
    }

    #[tokio::test]
    async fn insert_failure_removes_written_upload() {
        let (svc, _store, tmp) = make_service(Arc::new(FailingDatabase));
        let err = svc
            .create_request(&input("t", "b"), Some(png("a.png", b"data")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
        assert!(uploaded_files(&tmp).is_empty());
    }

    #[tokio::test]
    async fn list_failure_is_internal() {
        let (svc, _store, _tmp) = make_service(Arc::new(FailingDatabase));
        let err = svc.list_requests().await.unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn upload_failure_skips_insert() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("uploads");
        let store = gethelp_store::create_store(&StoreConfig {
            upload_dir: dir.clone(),
        })
        .unwrap();
        // Replace the directory with a file so writes below it fail.
        std::fs::remove_dir(&dir).unwrap();
        std::fs::write(&dir, b"not a directory").unwrap();

        let db = sqlite();
        let svc = LocalService::new(db.clone(), store);
        let err = svc
            .create_request(&input("t", "b"), Some(png("a.png", b"data")))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Upload(_)));
        assert!(db.list_requests().await.unwrap().is_empty());
    }
}
