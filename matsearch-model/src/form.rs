use crate::error::{ModelError, Result};
use crate::mode::SearchMode;

pub const DEFAULT_POSITIVE_THRESHOLD: f64 = 0.5;
pub const DEFAULT_NEGATIVE_THRESHOLD: f64 = 0.5;
pub const DEFAULT_IMAGE_THRESHOLD: f64 = 0.7;
pub const DEFAULT_TOP_N: u32 = 12;

/// Query parameters sent verbatim as the body of a match request.
///
/// The backend ignores fields the selected mode does not use, so the whole
/// record always travels.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchForm {
    pub positive: String,
    pub negative: String,
    pub path: String,
    pub positive_threshold: f64,
    pub negative_threshold: f64,
    pub image_threshold: f64,
    pub top_n: u32,
    /// Last dispatched mode, not the currently selected one.
    pub search_type: SearchMode,
    pub img_id: Option<String>,
    pub text: String,
    /// Epoch seconds
    pub start_time: Option<f64>,
    /// Epoch seconds
    pub end_time: Option<f64>,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            positive: String::new(),
            negative: String::new(),
            path: String::new(),
            positive_threshold: DEFAULT_POSITIVE_THRESHOLD,
            negative_threshold: DEFAULT_NEGATIVE_THRESHOLD,
            image_threshold: DEFAULT_IMAGE_THRESHOLD,
            top_n: DEFAULT_TOP_N,
            search_type: SearchMode::default(),
            img_id: None,
            text: String::new(),
            start_time: None,
            end_time: None,
        }
    }
}

impl SearchForm {
    pub fn has_positive(&self) -> bool {
        !self.positive.trim().is_empty()
    }

    pub fn has_path(&self) -> bool {
        !self.path.trim().is_empty()
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// An empty identifier counts as unset.
    pub fn image_id(&self) -> Option<&str> {
        self.img_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    pub fn clear_time_range(&mut self) {
        self.start_time = None;
        self.end_time = None;
    }

    /// Checks numeric bounds the UI sliders normally enforce.
    pub fn validate_ranges(&self) -> Result<()> {
        for (field, value) in [
            ("positive_threshold", self.positive_threshold),
            ("negative_threshold", self.negative_threshold),
            ("image_threshold", self.image_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ModelError::ThresholdOutOfRange { field, value });
            }
        }
        if self.top_n == 0 {
            return Err(ModelError::InvalidTopN);
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time)
            && start > end
        {
            return Err(ModelError::InvalidTimeRange);
        }
        Ok(())
    }
}
