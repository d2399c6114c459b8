//! Search mode taxonomy.
//!
//! The backend speaks in integer codes; everything on this side of the wire
//! uses [`SearchMode`] and asks it for its precondition and result shape
//! instead of comparing numbers.

use std::fmt::{self, Display, Formatter};

use crate::error::ModelError;

/// Query variants understood by the matching endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "u8", try_from = "i64")
)]
pub enum SearchMode {
    /// Free text (or path filter) against indexed images
    #[default]
    TextToImage = 0,
    /// Image against images
    ImageToImage = 1,
    /// Free text (or path filter) against indexed video frames
    TextToVideo = 2,
    /// Image against video frames
    ImageToVideo = 3,
    /// Similarity score between one text and one image
    TextImageSimilarity = 4,
    /// Indexed image against images
    IndexedImageToImage = 5,
    /// Indexed image against video frames
    IndexedImageToVideo = 6,
    /// Free text against the externally sourced (Pexels) video catalogue
    TextToPexelsVideo = 9,
}

/// What must be present on the form before a mode may be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// `positive` or `path` non-empty
    PositiveOrPath,
    /// `img_id` set
    ImageId,
    /// `text` non-empty and `img_id` set
    TextAndImageId,
    /// `positive` non-empty
    Positive,
}

/// Shape of a successful matching response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    Images,
    Videos,
    Score,
}

impl SearchMode {
    pub const ALL: [SearchMode; 8] = [
        SearchMode::TextToImage,
        SearchMode::ImageToImage,
        SearchMode::TextToVideo,
        SearchMode::ImageToVideo,
        SearchMode::TextImageSimilarity,
        SearchMode::IndexedImageToImage,
        SearchMode::IndexedImageToVideo,
        SearchMode::TextToPexelsVideo,
    ];

    /// Wire code sent as `search_type`.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn precondition(self) -> Precondition {
        match self {
            SearchMode::TextToImage | SearchMode::TextToVideo => {
                Precondition::PositiveOrPath
            }
            SearchMode::ImageToImage
            | SearchMode::ImageToVideo
            | SearchMode::IndexedImageToImage
            | SearchMode::IndexedImageToVideo => Precondition::ImageId,
            SearchMode::TextImageSimilarity => Precondition::TextAndImageId,
            SearchMode::TextToPexelsVideo => Precondition::Positive,
        }
    }

    /// Modes the backend answers from the image last uploaded in the same
    /// HTTP session.
    pub const fn uses_uploaded_image(self) -> bool {
        matches!(self, SearchMode::ImageToImage | SearchMode::ImageToVideo)
    }

    pub const fn result_shape(self) -> ResultShape {
        match self {
            SearchMode::TextToImage
            | SearchMode::ImageToImage
            | SearchMode::IndexedImageToImage => ResultShape::Images,
            SearchMode::TextToVideo
            | SearchMode::ImageToVideo
            | SearchMode::IndexedImageToVideo
            | SearchMode::TextToPexelsVideo => ResultShape::Videos,
            SearchMode::TextImageSimilarity => ResultShape::Score,
        }
    }

    /// Human readable label, also accepted by [`SearchMode::from_name`].
    pub const fn label(self) -> &'static str {
        match self {
            SearchMode::TextToImage => "text-to-image",
            SearchMode::ImageToImage => "image-to-image",
            SearchMode::TextToVideo => "text-to-video",
            SearchMode::ImageToVideo => "image-to-video",
            SearchMode::TextImageSimilarity => "text-image-similarity",
            SearchMode::IndexedImageToImage => "indexed-image-to-image",
            SearchMode::IndexedImageToVideo => "indexed-image-to-video",
            SearchMode::TextToPexelsVideo => "text-to-pexels-video",
        }
    }

    /// Parses either a label or a numeric code.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Ok(code) = name.parse::<i64>() {
            return Self::try_from(code).ok();
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.label().eq_ignore_ascii_case(name))
    }
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.code())
    }
}

impl From<SearchMode> for u8 {
    fn from(mode: SearchMode) -> Self {
        mode.code()
    }
}

impl TryFrom<i64> for SearchMode {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SearchMode::TextToImage),
            1 => Ok(SearchMode::ImageToImage),
            2 => Ok(SearchMode::TextToVideo),
            3 => Ok(SearchMode::ImageToVideo),
            4 => Ok(SearchMode::TextImageSimilarity),
            5 => Ok(SearchMode::IndexedImageToImage),
            6 => Ok(SearchMode::IndexedImageToVideo),
            9 => Ok(SearchMode::TextToPexelsVideo),
            other => Err(ModelError::UnknownSearchMode(other)),
        }
    }
}

impl TryFrom<u8> for SearchMode {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_try_from() {
        for mode in SearchMode::ALL {
            assert_eq!(SearchMode::try_from(mode.code()), Ok(mode));
        }
    }

    #[test]
    fn gaps_in_the_code_table_are_rejected() {
        for code in [7_i64, 8, 10, -1] {
            assert_eq!(
                SearchMode::try_from(code),
                Err(ModelError::UnknownSearchMode(code))
            );
        }
    }

    #[test]
    fn shapes_follow_the_mode_table() {
        use ResultShape::*;
        let shapes: Vec<_> =
            SearchMode::ALL.iter().map(|m| m.result_shape()).collect();
        assert_eq!(
            shapes,
            vec![Images, Images, Videos, Videos, Score, Images, Videos, Videos]
        );
    }

    #[test]
    fn only_upload_seeded_modes_use_the_uploaded_image() {
        let uploaded: Vec<_> = SearchMode::ALL
            .into_iter()
            .filter(|m| m.uses_uploaded_image())
            .collect();
        assert_eq!(
            uploaded,
            vec![SearchMode::ImageToImage, SearchMode::ImageToVideo]
        );
    }

    #[test]
    fn names_and_codes_both_parse() {
        assert_eq!(
            SearchMode::from_name("indexed-image-to-video"),
            Some(SearchMode::IndexedImageToVideo)
        );
        assert_eq!(
            SearchMode::from_name("9"),
            Some(SearchMode::TextToPexelsVideo)
        );
        assert_eq!(SearchMode::from_name("8"), None);
        assert_eq!(SearchMode::from_name("movies"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_wire_code() {
        let json = serde_json::to_string(&SearchMode::TextToPexelsVideo).unwrap();
        assert_eq!(json, "9");
        let mode: SearchMode = serde_json::from_str("6").unwrap();
        assert_eq!(mode, SearchMode::IndexedImageToVideo);
        assert!(serde_json::from_str::<SearchMode>("7").is_err());
    }
}
