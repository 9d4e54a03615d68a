use async_trait::async_trait;
use gethelp_core::{CreateHelpRequest, HelpRequest, ImageUpload};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Operations of the request board.
///
/// The server programs against `LocalService` (database + upload store).
/// The terminal client uses `HttpService`, which talks to a running server.
#[async_trait]
pub trait RequestService: Send + Sync {
    /// All requests, newest first.
    async fn list_requests(&self) -> Result<Vec<HelpRequest>, ServiceError>;

    /// Store a new request, saving `image` first when one is attached.
    async fn create_request(
        &self,
        input: &CreateHelpRequest,
        image: Option<ImageUpload>,
    ) -> Result<HelpRequest, ServiceError>;
}
