//! Maps raw match payloads onto [`ResultItem`]s.
//!
//! The raw entry type never leaves this module.

use matsearch_model::{ResultItem, ResultShape, ScoreResult, SearchMode, SearchOutcome};
use serde::Deserialize;
use serde_json::Value;

use super::error::SearchError;
use crate::domains::media::MediaUrlCodec;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawResultEntry {
    url: Option<Value>,
    path: Option<Value>,
    score: Option<Value>,
    start_time: Option<Value>,
    end_time: Option<Value>,
}

/// Normalizes a whole response body for `mode`.
pub fn normalize(mode: SearchMode, payload: Value) -> Result<SearchOutcome, SearchError> {
    match mode.result_shape() {
        ResultShape::Score => {
            let score = payload
                .get("score")
                .and_then(Value::as_f64)
                .ok_or_else(|| malformed(mode, "expected an object with a numeric score"))?;
            Ok(SearchOutcome::Score {
                mode,
                score: ScoreResult { score },
            })
        }
        ResultShape::Images | ResultShape::Videos => match payload {
            Value::Array(entries) => Ok(SearchOutcome::Items {
                mode,
                items: normalize_items(mode, entries)?,
            }),
            _ => Err(malformed(mode, "expected a list of results")),
        },
    }
}

/// Normalizes a list of raw entries. Image modes keep the server-resolved
/// `url`; video modes synthesize a streaming locator from `path`.
pub fn normalize_items(
    mode: SearchMode,
    entries: Vec<Value>,
) -> Result<Vec<ResultItem>, SearchError> {
    let shape = mode.result_shape();
    entries
        .into_iter()
        .map(|entry| {
            let raw: RawResultEntry = serde_json::from_value(entry)
                .map_err(|e| malformed(mode, &format!("invalid result entry: {e}")))?;
            Ok(raw.into_item(shape))
        })
        .collect()
}

impl RawResultEntry {
    fn into_item(self, shape: ResultShape) -> ResultItem {
        let path = text_of(self.path.as_ref());
        let url = match shape {
            ResultShape::Videos => MediaUrlCodec::video_url(&path),
            ResultShape::Images | ResultShape::Score => text_of(self.url.as_ref()),
        };
        ResultItem {
            score: self.score.as_ref().and_then(Value::as_f64).unwrap_or(0.0),
            path,
            url,
            start_time: text_of(self.start_time.as_ref()),
            end_time: text_of(self.end_time.as_ref()),
        }
    }
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn malformed(mode: SearchMode, detail: &str) -> SearchError {
    SearchError::Server(format!("malformed {} response: {detail}", mode.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn image_entries_keep_url_and_default_the_rest() {
        let outcome = normalize(SearchMode::TextToImage, json!([{"url": "/x"}, {}])).unwrap();
        let items = outcome.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].url, "/x");
        assert_eq!(items[1].url, "");
        assert_eq!(items[1].score, 0.0);
        assert_eq!(items[1].start_time, "");
        assert_eq!(items[1].end_time, "");
    }

    #[test]
    fn image_entries_ignore_path_for_url() {
        let items = normalize_items(
            SearchMode::IndexedImageToImage,
            vec![json!({"path": "/p/cat.jpg", "score": 0.91})],
        )
        .unwrap();
        assert_eq!(items[0].url, "");
        assert_eq!(items[0].path, "/p/cat.jpg");
        assert_eq!(items[0].score, 0.91);
    }

    #[test]
    fn video_entries_get_streaming_locator() {
        let outcome =
            normalize(SearchMode::TextToPexelsVideo, json!([{"path": "a/b.mp4"}])).unwrap();
        let items = outcome.items();
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].url,
            format!("/api/get_video/{}", MediaUrlCodec::encode_path("a/b.mp4"))
        );
    }

    #[test]
    fn video_entries_without_path_have_empty_url() {
        for mode in [
            SearchMode::TextToVideo,
            SearchMode::ImageToVideo,
            SearchMode::IndexedImageToVideo,
        ] {
            let items =
                normalize_items(mode, vec![json!({"url": "/ignored", "score": 0.5})]).unwrap();
            assert_eq!(items[0].url, "");
            assert_eq!(items[0].score, 0.5);
        }
    }

    #[test]
    fn segment_bounds_are_rendered_as_text() {
        let items = normalize_items(
            SearchMode::TextToVideo,
            vec![json!({"path": "v.mp4", "start_time": 12, "end_time": "00:00:20"})],
        )
        .unwrap();
        assert_eq!(items[0].start_time, "12");
        assert_eq!(items[0].end_time, "00:00:20");
    }

    #[test]
    fn similarity_yields_a_single_score() {
        let outcome = normalize(SearchMode::TextImageSimilarity, json!({"score": 73.4})).unwrap();
        assert_eq!(outcome.score(), Some(ScoreResult { score: 73.4 }));
        assert!(outcome.items().is_empty());
    }

    #[test]
    fn wrong_payload_shapes_are_server_failures() {
        assert!(matches!(
            normalize(SearchMode::TextImageSimilarity, json!([])),
            Err(SearchError::Server(_))
        ));
        assert!(matches!(
            normalize(SearchMode::TextToImage, json!({"score": 1})),
            Err(SearchError::Server(_))
        ));
        assert!(matches!(
            normalize(SearchMode::TextToVideo, json!([1, 2])),
            Err(SearchError::Server(_))
        ));
    }
}
