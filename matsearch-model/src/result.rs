use crate::mode::{ResultShape, SearchMode};

/// One normalized match. Absent backend fields are already defaulted.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultItem {
    pub score: f64,
    pub path: String,
    /// Thumbnail locator for images, streaming locator for videos
    pub url: String,
    pub start_time: String,
    pub end_time: String,
}

impl ResultItem {
    /// Video hits carry the matched segment bounds.
    pub fn has_segment(&self) -> bool {
        !self.start_time.is_empty() && !self.end_time.is_empty()
    }
}

/// Outcome of the text/image similarity mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreResult {
    /// Percentage
    pub score: f64,
}

/// The sole output artifact of a completed search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOutcome {
    Items {
        mode: SearchMode,
        items: Vec<ResultItem>,
    },
    Score {
        mode: SearchMode,
        score: ScoreResult,
    },
}

impl SearchOutcome {
    pub fn mode(&self) -> SearchMode {
        match self {
            SearchOutcome::Items { mode, .. } | SearchOutcome::Score { mode, .. } => {
                *mode
            }
        }
    }

    pub fn items(&self) -> &[ResultItem] {
        match self {
            SearchOutcome::Items { items, .. } => items,
            SearchOutcome::Score { .. } => &[],
        }
    }

    pub fn score(&self) -> Option<ScoreResult> {
        match self {
            SearchOutcome::Score { score, .. } => Some(*score),
            SearchOutcome::Items { .. } => None,
        }
    }

    /// Non-empty locators of image hits, in result order (gallery preview list).
    pub fn image_urls(&self) -> Vec<&str> {
        if self.mode().result_shape() != ResultShape::Images {
            return Vec::new();
        }
        self.items()
            .iter()
            .map(|item| item.url.as_str())
            .filter(|url| !url.is_empty())
            .collect()
    }
}
