pub mod config;
mod routes;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use gethelp_db::Database;
use gethelp_service::LocalService;
use gethelp_store::ObjectStore;
use tokio::net::TcpListener;
use tracing::info;

pub use routes::build_router;

pub async fn serve(
    listener: TcpListener,
    db: Arc<dyn Database>,
    store: Arc<dyn ObjectStore>,
    max_upload_bytes: usize,
) -> Result<()> {
    let service = LocalService::new(db, store.clone());
    let app = build_router(service, store, max_upload_bytes);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
