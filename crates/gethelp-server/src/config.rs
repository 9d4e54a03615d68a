use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use gethelp_db::DbConfig;
use gethelp_store::{StoreConfig, DEFAULT_UPLOAD_DIR};

/// 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "gethelp-server", about = "GetHelp request board API server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "GETHELP_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// postgres://…, sqlite:<path>, sqlite::memory: or a file path
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory uploaded images are written to and served from
    #[arg(long, env = "GETHELP_UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
    pub upload_dir: PathBuf,

    /// Largest accepted request body in bytes
    #[arg(long, env = "GETHELP_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            database_url: self.database_url.clone().filter(|u| !u.is_empty()),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            upload_dir: self.upload_dir.clone(),
        }
    }
}
