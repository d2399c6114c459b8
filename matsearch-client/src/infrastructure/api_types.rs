//! Wire shapes of backend responses that the client consumes directly.
//!
//! Search results are deliberately absent: they stay as raw JSON until the
//! normalizer turns them into model types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `GET /api/status`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawStatus {
    /// Whether an indexing pass is running
    pub status: bool,
    pub total_images: u64,
    pub total_videos: u64,
    pub total_video_frames: u64,
    pub total_pexels_videos: u64,
    pub scanning_files: u64,
    pub remain_files: u64,
    /// Fraction in `[0, 1]`
    pub progress: f64,
    /// Whole seconds
    pub remain_time: Option<u64>,
    pub current_model: Option<String>,
}

/// Body of `GET /api/scan`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    pub status: String,
}

impl ScanResponse {
    pub fn already_scanning(&self) -> bool {
        self.status.eq_ignore_ascii_case("already scanning")
    }
}

/// Body of `POST /api/upload`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub status: Option<String>,
    pub error: Option<String>,
    /// Server-side location of the stored upload, named by content hash
    pub file_path: Option<String>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// Content hash the server stored the upload under.
    pub fn stored_name(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .and_then(|path| path.rsplit(['/', '\\']).next())
            .filter(|name| !name.is_empty())
    }
}

/// One entry of `GET /api/models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub current: bool,
}

pub type ModelCatalog = BTreeMap<String, ModelInfo>;

/// Body of `GET /api/change_model`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelChangeResponse {
    pub success: bool,
    pub model: Option<String>,
    pub error: Option<String>,
}
