use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use gethelp_db::Database;
use gethelp_service::LocalService;
use gethelp_store::StoreConfig;
use tokio::net::TcpListener;

use crate::config::DEFAULT_MAX_UPLOAD_BYTES;

/// A router plus the scratch directory its uploads land in.
pub struct TestApp {
    pub router: Router,
    pub upload_dir: PathBuf,
}

/// In-memory SQLite and a temp upload directory.
pub async fn test_app() -> TestApp {
    let db = Arc::new(gethelp_db::SqliteDatabase::open_in_memory().unwrap());
    test_app_with(db, DEFAULT_MAX_UPLOAD_BYTES).await
}

/// Build a router over `db` with a temp upload directory and the given
/// body limit.
pub async fn test_app_with(db: Arc<dyn Database>, max_upload_bytes: usize) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap().keep().join("uploads");
    let store = gethelp_store::create_store(&StoreConfig {
        upload_dir: upload_dir.clone(),
    })
    .unwrap();
    let service = LocalService::new(db, store.clone());
    TestApp {
        router: crate::routes::build_router(service, store, max_upload_bytes),
        upload_dir,
    }
}

pub async fn test_router() -> Router {
    test_app().await.router
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    pub upload_dir: PathBuf,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let TestApp { router, upload_dir } = test_app().await;
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    TestServer {
        base_url,
        upload_dir,
        _handle: handle,
    }
}
