pub mod help_request;
pub mod upload;

pub use help_request::{CreateHelpRequest, HelpRequest, ImageUpload, NewHelpRequest};
