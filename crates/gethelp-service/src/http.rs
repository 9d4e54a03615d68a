use async_trait::async_trait;
use bytes::Bytes;
use gethelp_core::{CreateHelpRequest, HelpRequest, ImageUpload};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use crate::{RequestService, ServiceError};

/// Async HTTP client implementation of RequestService.
/// Connects to a running gethelp-server.
#[derive(Clone)]
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a server-relative path such as an `imageUrl` against the API origin.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Check if the server is reachable.
    pub async fn health_check(&self) -> Result<(), ServiceError> {
        let resp = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(format!("connection failed: {e}")))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(ServiceError::Internal(format!(
                "health check failed: {}",
                resp.status()
            )))
        }
    }

    /// Download an uploaded file by its public path (e.g. a request's `imageUrl`).
    pub async fn fetch_upload(&self, image_url: &str) -> Result<Bytes, ServiceError> {
        let resp = self
            .client
            .get(self.resolve_url(image_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            resp.bytes()
                .await
                .map_err(|e| ServiceError::Internal(format!("read body: {e}")))
        } else {
            Err(parse_error_with_status(status, resp).await)
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ServiceError> {
        let resp = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_multipart<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ServiceError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }
}

/// Multipart body for a new request. The `image` part is omitted entirely
/// when there is no image.
fn create_form(
    input: &CreateHelpRequest,
    image: Option<ImageUpload>,
) -> Result<Form, ServiceError> {
    let form = Form::new()
        .text("title", input.title.clone())
        .text("body", input.body.clone());
    let Some(image) = image else {
        return Ok(form);
    };
    let mut part = Part::bytes(image.data).file_name(image.original_name);
    if let Some(ct) = image.content_type.as_deref() {
        part = part
            .mime_str(ct)
            .map_err(|e| ServiceError::InvalidInput(format!("content type {ct}: {e}")))?;
    }
    Ok(form.part("image", part))
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error_with_status(
    status: StatusCode,
    resp: reqwest::Response,
) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(msg)
    } else if status == StatusCode::BAD_REQUEST {
        ServiceError::InvalidInput(msg)
    } else {
        ServiceError::Internal(msg)
    }
}

#[async_trait]
impl RequestService for HttpService {
    async fn list_requests(&self) -> Result<Vec<HelpRequest>, ServiceError> {
        self.get_json("/api/requests").await
    }

    async fn create_request(
        &self,
        input: &CreateHelpRequest,
        image: Option<ImageUpload>,
    ) -> Result<HelpRequest, ServiceError> {
        let form = create_form(input, image)?;
        self.post_multipart("/api/requests", form).await
    }
}
