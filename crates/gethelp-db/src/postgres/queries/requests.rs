use chrono::{DateTime, Utc};

use gethelp_core::{HelpRequest, NewHelpRequest};

use super::super::{pg_err, PostgresDatabase};
use crate::DbError;

#[derive(sqlx::FromRow)]
struct RequestRow {
    id: String,
    title: String,
    body: String,
    image_url: String,
    created_at: DateTime<Utc>,
}

impl From<RequestRow> for HelpRequest {
    fn from(r: RequestRow) -> Self {
        HelpRequest {
            id: r.id,
            title: r.title,
            body: r.body,
            image_url: r.image_url,
            created_at: r.created_at,
        }
    }
}

impl PostgresDatabase {
    pub(crate) async fn pg_insert_request(
        &self,
        input: &NewHelpRequest,
    ) -> Result<HelpRequest, DbError> {
        let id = uuid::Uuid::new_v4().to_string();

        let row = sqlx::query_as::<_, RequestRow>(
            "INSERT INTO requests (id, title, body, image_url, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, title, body, image_url, created_at",
        )
        .bind(&id)
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.image_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(row.into())
    }

    pub(crate) async fn pg_list_requests(&self) -> Result<Vec<HelpRequest>, DbError> {
        let rows = sqlx::query_as::<_, RequestRow>(
            "SELECT id, title, body, image_url, created_at
             FROM requests
             ORDER BY created_at DESC, seq DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}
