//! Reverse queries: seed a new search with the identifier embedded in a
//! previously resolved media locator.

use matsearch_model::{SearchForm, SearchMode};

use super::error::SearchError;

/// Takes the segment after the final `/`, dropping any `?query` or
/// `#fragment`. The token must be non-empty and URL-safe; anything else is
/// rejected rather than guessed at.
pub fn extract_identifier(url: &str) -> Result<String, SearchError> {
    let without_suffix = url.split(['?', '#']).next().unwrap_or_default();
    let token = without_suffix.rsplit('/').next().unwrap_or_default();

    if token.is_empty() {
        return Err(SearchError::InvalidIdentifier(url.to_string()));
    }
    let url_safe = token
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '='));
    if !url_safe {
        return Err(SearchError::InvalidIdentifier(url.to_string()));
    }
    Ok(token.to_string())
}

/// Points `form` at the image behind `url` for a follow-up search in `mode`.
pub fn build_from_result_url(
    mode: SearchMode,
    url: &str,
    form: &mut SearchForm,
) -> Result<(), SearchError> {
    let token = extract_identifier(url)?;
    form.search_type = mode;
    form.img_id = Some(token);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_locator_yields_image_id() {
        let mut form = SearchForm::default();
        build_from_result_url(
            SearchMode::IndexedImageToImage,
            "/api/get_image/42?thumbnail=1",
            &mut form,
        )
        .unwrap();
        assert_eq!(form.img_id.as_deref(), Some("42"));
        assert_eq!(form.search_type, SearchMode::IndexedImageToImage);
    }

    #[test]
    fn absolute_urls_and_fragments_are_handled() {
        assert_eq!(
            extract_identifier("http://host:8085/api/get_image/917#top").unwrap(),
            "917"
        );
        assert_eq!(
            extract_identifier("/api/get_video/YS9iLm1wNA==").unwrap(),
            "YS9iLm1wNA=="
        );
    }

    #[test]
    fn empty_or_unsafe_tokens_are_invalid() {
        for url in ["", "/api/get_image/", "/api/get_image/?thumbnail=1", "/api/x/a%2Fb"] {
            assert_eq!(
                extract_identifier(url),
                Err(SearchError::InvalidIdentifier(url.to_string())),
                "{url}"
            );
        }
    }

    #[test]
    fn failed_extraction_leaves_form_untouched() {
        let mut form = SearchForm::default();
        form.img_id = Some("5".into());
        assert!(build_from_result_url(SearchMode::ImageToVideo, "/api/get_image/", &mut form).is_err());
        assert_eq!(form.img_id.as_deref(), Some("5"));
        assert_eq!(form.search_type, SearchMode::TextToImage);
    }
}
