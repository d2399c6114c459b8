use base64::{Engine, engine::general_purpose::URL_SAFE};

use crate::infrastructure::constants::routes;

/// Builds media locators from filesystem paths and image identifiers.
///
/// Paths travel as a single URL segment: the UTF-8 bytes are encoded with the
/// padded URL-safe base64 alphabet, which the backend reverses. There is no
/// client-side decode.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaUrlCodec;

impl MediaUrlCodec {
    pub fn encode_path(path: &str) -> String {
        URL_SAFE.encode(path.as_bytes())
    }

    /// `/api/get_video/{token}`, or empty for an empty path
    pub fn video_url(path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        format!("{}/{}", routes::media::GET_VIDEO, Self::encode_path(path))
    }

    /// `/api/download_video_clip/{token}/{start}/{end}`; ordering is the
    /// caller's concern.
    pub fn clip_url(path: &str, start_seconds: u64, end_seconds: u64) -> String {
        format!(
            "{}/{}/{}/{}",
            routes::media::DOWNLOAD_VIDEO_CLIP,
            Self::encode_path(path),
            start_seconds,
            end_seconds
        )
    }

    /// `/api/get_image/{id}?thumbnail=1`, or empty for an empty id
    pub fn image_url(image_id: &str) -> String {
        if image_id.is_empty() {
            return String::new();
        }
        format!("{}/{}?thumbnail=1", routes::media::GET_IMAGE, image_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(token: &str) -> String {
        String::from_utf8(URL_SAFE.decode(token).unwrap()).unwrap()
    }

    #[test]
    fn encoded_paths_decode_back() {
        for path in [
            "a/b.mp4",
            "/Users/me/Movies/holiday 2023.mov",
            "D:\\视频\\海边?.mkv",
            "~/Pictures/Photos Library.photoslibrary/originals/é+ü.heic",
            "",
        ] {
            assert_eq!(decode(&MediaUrlCodec::encode_path(path)), path);
        }
    }

    #[test]
    fn tokens_are_a_single_url_safe_segment() {
        // '?' and '>' bytes land on the two alphabet slots that differ
        let token = MediaUrlCodec::encode_path("\u{FBFF}/??>>");
        assert!(!token.contains('/'));
        assert!(!token.contains('+'));
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '='))
        );
    }

    #[test]
    fn video_url_embeds_token() {
        assert_eq!(
            MediaUrlCodec::video_url("a/b.mp4"),
            format!("/api/get_video/{}", MediaUrlCodec::encode_path("a/b.mp4"))
        );
        assert_eq!(MediaUrlCodec::video_url("a/b.mp4"), "/api/get_video/YS9iLm1wNA==");
        assert_eq!(MediaUrlCodec::video_url(""), "");
    }

    #[test]
    fn clip_and_image_locators() {
        assert_eq!(
            MediaUrlCodec::clip_url("a/b.mp4", 4, 12),
            "/api/download_video_clip/YS9iLm1wNA==/4/12"
        );
        assert_eq!(MediaUrlCodec::image_url("42"), "/api/get_image/42?thumbnail=1");
        assert_eq!(MediaUrlCodec::image_url(""), "");
    }
}
