use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Row};

use gethelp_core::{HelpRequest, NewHelpRequest};

use super::super::{SqliteDatabase, SqliteResultExt};
use crate::DbError;

/// Timestamps are stored as fixed-width RFC 3339 text so that string order
/// equals time order.
fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_request(row: &Row) -> rusqlite::Result<HelpRequest> {
    let created_at: String = row.get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);
    Ok(HelpRequest {
        id: row.get("id")?,
        title: row.get("title")?,
        body: row.get("body")?,
        image_url: row.get("image_url")?,
        created_at,
    })
}

impl SqliteDatabase {
    pub fn insert_request_sync(&self, input: &NewHelpRequest) -> Result<HelpRequest, DbError> {
        self.with_conn(|conn| {
            let id = uuid::Uuid::new_v4().to_string();
            let now = format_ts(&Utc::now());
            conn.execute(
                "INSERT INTO requests (id, title, body, image_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, input.title, input.body, input.image_url, now],
            )
            .to_db()?;
            conn.query_row(
                "SELECT * FROM requests WHERE id = ?1",
                params![id],
                row_to_request,
            )
            .to_db()
        })
    }

    pub fn list_requests_sync(&self) -> Result<Vec<HelpRequest>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT * FROM requests ORDER BY created_at DESC, seq DESC")
                .to_db()?;
            let requests = stmt
                .query_map([], row_to_request)
                .to_db()?
                .collect::<Result<Vec<_>, _>>()
                .to_db()?;
            Ok(requests)
        })
    }
}
