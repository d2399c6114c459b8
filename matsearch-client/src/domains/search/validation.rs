use matsearch_model::{Precondition, SearchForm, SearchMode};

use super::error::ValidationFailure;

/// The only client-side gate before contacting the backend.
pub fn check_preconditions(
    mode: SearchMode,
    form: &SearchForm,
) -> Result<(), ValidationFailure> {
    match mode.precondition() {
        Precondition::PositiveOrPath => {
            if !form.has_positive() && !form.has_path() {
                return Err(ValidationFailure::MissingQueryOrPath { mode });
            }
        }
        Precondition::Positive => {
            if !form.has_positive() {
                return Err(ValidationFailure::MissingPositive { mode });
            }
        }
        Precondition::ImageId => {
            if form.image_id().is_none() {
                return Err(ValidationFailure::MissingImageId { mode });
            }
        }
        Precondition::TextAndImageId => {
            if !form.has_text() || form.image_id().is_none() {
                return Err(ValidationFailure::MissingSimilarityInput);
            }
        }
    }
    form.validate_ranges()?;
    Ok(())
}
