use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    UnknownSearchMode(i64),
    ThresholdOutOfRange { field: &'static str, value: f64 },
    InvalidTopN,
    InvalidTimeRange,
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownSearchMode(code) => {
                write!(f, "unknown search mode code: {code}")
            }
            ModelError::ThresholdOutOfRange { field, value } => {
                write!(f, "{field} must be within [0, 1], got {value}")
            }
            ModelError::InvalidTopN => write!(f, "top_n must be at least 1"),
            ModelError::InvalidTimeRange => {
                write!(f, "time range start must not be after its end")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
