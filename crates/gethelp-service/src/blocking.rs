use bytes::Bytes;
use gethelp_core::{CreateHelpRequest, HelpRequest, ImageUpload};
use tokio::runtime::Runtime;

use crate::{HttpService, RequestService, ServiceError};

/// Blocking wrapper around the async `HttpService`.
///
/// Creates an internal tokio runtime and uses `block_on()` for each call.
/// Designed for sync callers like the TUI.
pub struct BlockingHttpService {
    inner: HttpService,
    rt: Runtime,
}

impl BlockingHttpService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let rt = Runtime::new()
            .map_err(|e| ServiceError::Internal(format!("failed to create tokio runtime: {e}")))?;
        Ok(Self {
            inner: HttpService::new(base_url),
            rt,
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn resolve_url(&self, path: &str) -> String {
        self.inner.resolve_url(path)
    }

    pub fn health_check(&self) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.health_check())
    }

    pub fn fetch_upload(&self, image_url: &str) -> Result<Bytes, ServiceError> {
        self.rt.block_on(self.inner.fetch_upload(image_url))
    }

    // -- Trait method delegates --

    pub fn list_requests(&self) -> Result<Vec<HelpRequest>, ServiceError> {
        self.rt.block_on(self.inner.list_requests())
    }

    pub fn create_request(
        &self,
        input: &CreateHelpRequest,
        image: Option<ImageUpload>,
    ) -> Result<HelpRequest, ServiceError> {
        self.rt.block_on(self.inner.create_request(input, image))
    }
}
