use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Request, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use gethelp_core::{CreateHelpRequest, ImageUpload};
use gethelp_service::RequestService;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::AppState;

const CREATE_ERROR: &str = "Error creating request";
const FETCH_ERROR: &str = "Error fetching requests";

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/requests", get(list_requests).post(create_request))
}

async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state
        .service
        .list_requests()
        .await
        .map(|r| Json(json!(r)))
        .map_err(|e| {
            error!(error = %e, "failed to list requests");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": FETCH_ERROR })),
            )
        })
}

/// Accepts a multipart form, or a JSON `{title, body}` object without an
/// image.
async fn create_request(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let (input, image) = if is_json(request.headers()) {
        let Json(input) = Json::<CreateHelpRequest>::from_request(request, &state)
            .await
            .map_err(|e| {
                error!(error = %e, "rejected json body");
                create_error(e.status())
            })?;
        (input, None)
    } else {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| {
                error!(error = %e, "rejected request body");
                create_error(e.status())
            })?;
        read_form(multipart).await.map_err(|e| {
            error!(error = %e, "failed to read multipart body");
            create_error(e.status())
        })?
    };

    state
        .service
        .create_request(&input, image)
        .await
        .map(|r| (StatusCode::CREATED, Json(json!(r))))
        .map_err(|e| {
            error!(error = %e, "failed to create request");
            create_error(StatusCode::INTERNAL_SERVER_ERROR)
        })
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Collect `title`, `body` and the first `image` file part. Other fields
/// are skipped.
async fn read_form(
    mut multipart: Multipart,
) -> Result<(CreateHelpRequest, Option<ImageUpload>), MultipartError> {
    let mut input = CreateHelpRequest::default();
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "title" => input.title = field.text().await?,
            "body" => input.body = field.text().await?,
            "image" => {
                let Some(original_name) = field.file_name().map(str::to_string) else {
                    debug!("ignoring image field without a file name");
                    continue;
                };
                if image.is_some() {
                    warn!(%original_name, "ignoring extra image part");
                    continue;
                }
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?.to_vec();
                image = Some(ImageUpload {
                    original_name,
                    content_type,
                    data,
                });
            }
            _ => debug!(field = %name, "ignoring unknown form field"),
        }
    }

    Ok((input, image))
}

fn create_error(status: StatusCode) -> (StatusCode, Json<Value>) {
    // Oversized bodies keep their 413.
    let status = if status == StatusCode::PAYLOAD_TOO_LARGE {
        status
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(json!({ "error": CREATE_ERROR })))
}
