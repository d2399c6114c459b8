//! Client-side gate for query-image uploads.

use std::path::Path;

use crate::domains::search::ValidationFailure;
use crate::infrastructure::api_types::UploadResponse;

/// Uploads must be strictly smaller than this.
pub const DEFAULT_UPLOAD_LIMIT: u64 = 10 * 1024 * 1024;

/// A file selected for upload, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Reads `path`, guessing the MIME type from its extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, mime_for_path(path), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn validate(&self) -> Result<(), ValidationFailure> {
        self.validate_with_limit(DEFAULT_UPLOAD_LIMIT)
    }

    /// Accepts only `image/*` types smaller than `limit` bytes.
    pub fn validate_with_limit(&self, limit: u64) -> Result<(), ValidationFailure> {
        if !self.mime.trim().to_ascii_lowercase().starts_with("image/") {
            return Err(ValidationFailure::NotAnImage {
                mime: self.mime.clone(),
            });
        }
        if self.size() >= limit {
            return Err(ValidationFailure::FileTooLarge {
                size: self.size(),
                limit,
            });
        }
        Ok(())
    }
}

/// MIME type by file extension; unknown extensions are opaque binary.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("heic") => "image/heic",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        Some("mp4") => "video/mp4",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}

/// Exactly one of these is reported per upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success,
    Failure(String),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success)
    }
}

impl From<UploadResponse> for UploadOutcome {
    fn from(response: UploadResponse) -> Self {
        if response.is_success() {
            UploadOutcome::Success
        } else {
            let reason = response
                .error
                .or(response.status)
                .unwrap_or_else(|| "Unknown error".to_string());
            UploadOutcome::Failure(reason)
        }
    }
}
