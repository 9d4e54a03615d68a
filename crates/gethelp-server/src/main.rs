use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gethelp_server::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gethelp_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::parse();

    let db = gethelp_db::connect(&config.db_config()).await?;
    let store = gethelp_store::create_store(&config.store_config())?;
    info!(upload_dir = %config.upload_dir.display(), "upload directory ready");

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("gethelp-server listening on http://{addr}");

    gethelp_server::serve(listener, db, store, config.max_upload_bytes).await
}
