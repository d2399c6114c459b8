//! Search domain - mode validation, dispatch, normalization and reverse
//! queries built from displayed results.

pub mod dispatcher;
pub mod error;
pub mod normalizer;
pub mod reverse;
pub mod validation;

pub use self::dispatcher::{PublishedResults, SearchDispatcher};
pub use self::error::{SearchError, ValidationFailure};
pub use self::normalizer::{normalize, normalize_items};
pub use self::reverse::{build_from_result_url, extract_identifier};
pub use self::validation::check_preconditions;
