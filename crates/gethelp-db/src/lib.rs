#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "postgres")]
pub use postgres::PostgresDatabase;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use gethelp_core::{HelpRequest, NewHelpRequest};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Internal(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence for help requests.
///
/// Backends assign `id` and `created_at` on insert and return rows newest
/// first. Rows with equal timestamps come back in reverse insertion order.
#[async_trait]
pub trait Database: Send + Sync {
    async fn insert_request(&self, input: &NewHelpRequest) -> Result<HelpRequest, DbError>;
    async fn list_requests(&self) -> Result<Vec<HelpRequest>, DbError>;
}

/// Which backend a connection string points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Sqlite(PathBuf),
    SqliteInMemory,
    Postgres(String),
}

/// Database configuration.
#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    /// `postgres://…`, `sqlite://<path>`, `sqlite:<path>`, `sqlite::memory:`
    /// or a bare file path. `None` uses `<data dir>/gethelp.db`.
    pub database_url: Option<String>,
}

impl DbConfig {
    pub fn backend(&self) -> Backend {
        let Some(url) = self.database_url.as_deref() else {
            return Backend::Sqlite(data_dir().join("gethelp.db"));
        };
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return Backend::Postgres(url.to_string());
        }
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        if path == ":memory:" {
            Backend::SqliteInMemory
        } else {
            Backend::Sqlite(PathBuf::from(path))
        }
    }
}

/// Open the backend selected by `config`, running migrations.
pub async fn connect(config: &DbConfig) -> Result<Arc<dyn Database>, DbError> {
    match config.backend() {
        #[cfg(feature = "sqlite")]
        Backend::Sqlite(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            tracing::info!(path = %path.display(), "opening sqlite database");
            Ok(Arc::new(SqliteDatabase::open_path(&path)?))
        }
        #[cfg(feature = "sqlite")]
        Backend::SqliteInMemory => {
            tracing::info!("opening in-memory sqlite database");
            Ok(Arc::new(SqliteDatabase::open_in_memory()?))
        }
        #[cfg(feature = "postgres")]
        Backend::Postgres(url) => {
            tracing::info!("connecting to postgres");
            Ok(Arc::new(PostgresDatabase::connect(&url).await?))
        }
        #[allow(unreachable_patterns)]
        other => Err(DbError::Config(format!(
            "backend {other:?} is not enabled in this build"
        ))),
    }
}

/// `$XDG_DATA_HOME/gethelp`, falling back to `~/.local/share/gethelp`.
pub fn data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share")
    } else {
        PathBuf::from(".")
    };
    base.join("gethelp")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> DbConfig {
        DbConfig {
            database_url: Some(url.to_string()),
        }
    }

    #[test]
    fn postgres_urls_select_postgres() {
        assert_eq!(
            config("postgres://u:p@localhost/gethelp").backend(),
            Backend::Postgres("postgres://u:p@localhost/gethelp".into())
        );
        assert!(matches!(
            config("postgresql://localhost/gethelp").backend(),
            Backend::Postgres(_)
        ));
    }

    #[test]
    fn sqlite_url_forms() {
        assert_eq!(
            config("sqlite:///tmp/board.db").backend(),
            Backend::Sqlite(PathBuf::from("/tmp/board.db"))
        );
        assert_eq!(
            config("sqlite:board.db").backend(),
            Backend::Sqlite(PathBuf::from("board.db"))
        );
        assert_eq!(
            config("/var/lib/gethelp/board.db").backend(),
            Backend::Sqlite(PathBuf::from("/var/lib/gethelp/board.db"))
        );
        assert_eq!(config("sqlite::memory:").backend(), Backend::SqliteInMemory);
    }

    #[test]
    fn default_is_sqlite_in_data_dir() {
        match DbConfig::default().backend() {
            Backend::Sqlite(path) => {
                assert!(path.ends_with("gethelp/gethelp.db"), "{}", path.display())
            }
            other => panic!("unexpected backend {other:?}"),
        }
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn connect_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/dir/board.db");
        let db = connect(&config(&path.to_string_lossy())).await.unwrap();
        assert!(db.list_requests().await.unwrap().is_empty());
        assert!(path.exists());
    }
}
