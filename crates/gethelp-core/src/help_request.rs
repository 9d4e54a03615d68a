use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-submitted request for help, as stored and listed by the board.
///
/// Serialized with camelCase keys so the JSON shape matches what
/// browser clients of the board already expect (`imageUrl`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
    pub id: String,
    pub title: String,
    pub body: String,
    /// `/uploads/<name>` when an image was attached, otherwise empty.
    #[serde(default)]
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl HelpRequest {
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// Text fields of a new request. Absent fields are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateHelpRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// A row about to be inserted; `id` and `created_at` are assigned by the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewHelpRequest {
    pub title: String,
    pub body: String,
    pub image_url: String,
}

/// An image file received alongside a new request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name as supplied by the client, used only for its extension.
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl ImageUpload {
    /// Browsers submit an empty, unnamed file part when no file was picked.
    pub fn is_empty_placeholder(&self) -> bool {
        self.original_name.is_empty() && self.data.is_empty()
    }
}
