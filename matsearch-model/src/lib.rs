//! Core data model definitions shared across MatSearch crates.
#![allow(missing_docs)]

pub mod error;
pub mod form;
pub mod mode;
pub mod result;
pub mod status;
#[cfg(feature = "chrono")]
pub mod time_range;

pub use error::{ModelError, Result as ModelResult};
pub use form::SearchForm;
pub use mode::{Precondition, ResultShape, SearchMode};
pub use result::{ResultItem, ScoreResult, SearchOutcome};
pub use status::StatusSnapshot;
#[cfg(feature = "chrono")]
pub use time_range::TimeRange;
