use matsearch_model::ResultItem;

use super::codec::MediaUrlCodec;
use crate::domains::search::ValidationFailure;

/// A validated request for a downloadable video segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipRequest {
    path: String,
    start_seconds: u64,
    end_seconds: u64,
}

impl ClipRequest {
    pub fn new(
        path: impl Into<String>,
        start_seconds: u64,
        end_seconds: u64,
    ) -> Result<Self, ValidationFailure> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ValidationFailure::MissingClipPath);
        }
        if end_seconds <= start_seconds {
            return Err(ValidationFailure::InvalidClipRange {
                start: start_seconds as f64,
                end: end_seconds as f64,
            });
        }
        Ok(Self {
            path,
            start_seconds,
            end_seconds,
        })
    }

    /// Builds a request from the segment bounds carried by a video hit.
    pub fn from_result(item: &ResultItem) -> Result<Self, ValidationFailure> {
        let start = parse_seconds(&item.start_time)?;
        let end = parse_seconds(&item.end_time)?;
        if end <= start {
            return Err(ValidationFailure::InvalidClipRange { start, end });
        }
        Self::new(item.path.clone(), start.floor() as u64, end.ceil() as u64)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn start_seconds(&self) -> u64 {
        self.start_seconds
    }

    pub fn end_seconds(&self) -> u64 {
        self.end_seconds
    }

    pub fn locator(&self) -> String {
        MediaUrlCodec::clip_url(&self.path, self.start_seconds, self.end_seconds)
    }

    /// Name offered for the saved file: the final path component.
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .find(|part| !part.is_empty())
            .unwrap_or(&self.path)
    }
}

fn parse_seconds(raw: &str) -> Result<f64, ValidationFailure> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationFailure::InvalidClipBound(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationFailure::InvalidClipBound(raw.to_string()));
    }
    Ok(value)
}
