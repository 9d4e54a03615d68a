pub(crate) mod migrations;
pub mod queries;

use async_trait::async_trait;
use gethelp_core::{HelpRequest, NewHelpRequest};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::{Database, DbError};

/// Map a sqlx::Error into a DbError::Internal.
pub(crate) fn pg_err(e: sqlx::Error) -> DbError {
    DbError::Internal(e.to_string())
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pub(crate) pool: PgPool,
}

impl PostgresDatabase {
    /// Connect to a Postgres database and run migrations.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(pg_err)?;

        let db = Self { pool };
        migrations::run(&db.pool).await?;
        Ok(db)
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn insert_request(&self, input: &NewHelpRequest) -> Result<HelpRequest, DbError> {
        self.pg_insert_request(input).await
    }

    async fn list_requests(&self) -> Result<Vec<HelpRequest>, DbError> {
        self.pg_list_requests().await
    }
}
