//! API service trait
//!
//! Abstraction over the HTTP operations the domains need, so dispatch,
//! polling and the session can run against [`ApiClient`] or a test stub.
//!
//! [`ApiClient`]: crate::infrastructure::api_client::ApiClient

use async_trait::async_trait;
use matsearch_model::SearchForm;

use crate::domains::upload::UploadRequest;
use crate::infrastructure::ApiResult;
use crate::infrastructure::api_types::{
    ModelCatalog, ModelChangeResponse, RawStatus, ScanResponse, UploadResponse,
};

/// Operations offered by the matching/indexing service
#[async_trait]
pub trait ApiService: Send + Sync + std::fmt::Debug {
    /// Fetch the indexing progress snapshot
    async fn fetch_status(&self) -> ApiResult<RawStatus>;

    /// Start a background indexing pass
    async fn start_scan(&self) -> ApiResult<ScanResponse>;

    /// Clear cached search artifacts
    async fn clean_cache(&self) -> ApiResult<()>;

    /// Send the whole form to the matching endpoint, returning the raw payload
    async fn match_media(&self, form: &SearchForm) -> ApiResult<serde_json::Value>;

    /// Upload the query image for image-seeded modes
    async fn upload_image(&self, upload: &UploadRequest) -> ApiResult<UploadResponse>;

    /// Download the bytes behind a (relative or absolute) locator
    async fn get_bytes(&self, locator: &str) -> ApiResult<Vec<u8>>;

    /// List embedding models known to the backend
    async fn list_models(&self) -> ApiResult<ModelCatalog>;

    /// Switch the active embedding model
    async fn change_model(&self, name: &str) -> ApiResult<ModelChangeResponse>;

    /// Build a full URL from a path
    fn build_url(&self, path: &str) -> String;

    /// Get the base URL
    fn base_url(&self) -> &str;
}
