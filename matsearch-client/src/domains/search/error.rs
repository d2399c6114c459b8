use matsearch_model::{ModelError, SearchMode};
use thiserror::Error;

use crate::infrastructure::ApiError;

/// Client-side gate failures; raising one means no request was sent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    #[error("Please enter search content or path")]
    MissingQueryOrPath { mode: SearchMode },
    #[error("Please enter search content")]
    MissingPositive { mode: SearchMode },
    #[error("Please select an image first")]
    MissingImageId { mode: SearchMode },
    #[error("Please enter text and select an image to compare")]
    MissingSimilarityInput,
    #[error("Invalid search form: {0}")]
    InvalidForm(#[from] ModelError),
    #[error("Invalid video parameters: missing video path")]
    MissingClipPath,
    #[error("Invalid video parameters: clip end ({end}) must be after start ({start})")]
    InvalidClipRange { start: f64, end: f64 },
    #[error("Invalid video parameters: '{0}' is not a valid clip bound")]
    InvalidClipBound(String),
    #[error("Only image files are allowed!")]
    NotAnImage { mime: String },
    #[error("Image size can not exceed {}MB!", limit / (1024 * 1024))]
    FileTooLarge { size: u64, limit: u64 },
    #[error("{mode} does not search by uploaded image")]
    UploadNotUsed { mode: SearchMode },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error("Search failed: {0}")]
    Transport(String),
    #[error("Search failed: {0}")]
    Server(String),
    #[error("Invalid image ID: {0:?}")]
    InvalidIdentifier(String),
    #[error("Upload failed: {0}")]
    Upload(String),
}

impl SearchError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SearchError::Validation(_))
    }
}

impl From<ApiError> for SearchError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(message) => SearchError::Transport(message),
            ApiError::Status { message, .. } => SearchError::Server(message),
            ApiError::Malformed(message) => {
                SearchError::Server(format!("malformed response: {message}"))
            }
        }
    }
}
