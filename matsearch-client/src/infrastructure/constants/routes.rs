//! API Routes Constants for the MatSearch client
//!
//! Every backend endpoint the client talks to. The service is unversioned;
//! all routes live under `/api`.

/// Background indexing endpoints
pub mod indexing {
    /// Indexing progress snapshot
    pub const STATUS: &str = "/api/status";
    /// Start a background indexing pass
    pub const SCAN: &str = "/api/scan";
    /// Drop cached search artifacts
    pub const CLEAN_CACHE: &str = "/api/clean_cache";
}

/// Matching endpoints
pub mod search {
    /// Dispatch a search; body is the whole search form
    pub const MATCH: &str = "/api/match";
    /// Upload the query image for image-seeded modes
    pub const UPLOAD: &str = "/api/upload";
}

/// Media locators handed to the renderer
pub mod media {
    /// Image bytes (requires image id parameter)
    pub const GET_IMAGE: &str = "/api/get_image";
    /// Video stream (requires path token parameter)
    pub const GET_VIDEO: &str = "/api/get_video";
    /// Clip download (requires path token, start and end parameters)
    pub const DOWNLOAD_VIDEO_CLIP: &str = "/api/download_video_clip";
}

/// Embedding model selection
pub mod models {
    /// Available models
    pub const LIST: &str = "/api/models";
    /// Switch the active model (query parameter `model`)
    pub const CHANGE: &str = "/api/change_model";
}
