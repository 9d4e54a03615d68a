use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use gethelp_core::upload;
use gethelp_store::StoreError;
use serde_json::{json, Value};
use tracing::error;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/uploads/{filename}", get(get_upload))
}

async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    if !upload::is_valid_filename(&filename) {
        return Err(not_found());
    }

    match state.store.get_opt(&filename).await {
        Ok(Some(data)) => Response::builder()
            .header(header::CONTENT_TYPE, content_type_for(&filename))
            .body(Body::from(data))
            .map_err(|e| internal(&filename, e)),
        Ok(None) | Err(StoreError::InvalidKey(_)) => Err(not_found()),
        Err(e) => Err(internal(&filename, e)),
    }
}

/// Content type from the file extension, case-insensitive.
fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

fn internal(filename: &str, e: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    error!(%filename, error = %e, "failed to read upload");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Error reading upload" })),
    )
}
