use async_trait::async_trait;
use log::{debug, info};
use matsearch_model::SearchForm;
use reqwest::{Client, RequestBuilder, StatusCode, multipart};
use serde::de::DeserializeOwned;

use crate::app::AppConfig;
use crate::domains::upload::UploadRequest;
use crate::infrastructure::api_types::{
    ModelCatalog, ModelChangeResponse, RawStatus, ScanResponse, UploadResponse,
};
use crate::infrastructure::constants::routes;
use crate::infrastructure::services::api::ApiService;
use crate::infrastructure::{ApiError, ApiResult};

/// HTTP client for the matching service.
///
/// Keeps a cookie store so an uploaded query image stays bound to the same
/// backend session as the following match request.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: &AppConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            config.server_url
        );

        Ok(Self {
            client,
            base_url: config.server_url.trim_end_matches('/').to_string(),
        })
    }

    /// Execute a request and decode a JSON body
    async fn execute_request<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Malformed(e.to_string()))
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    /// Execute a request whose body is ignored (e.g. 204 No Content)
    async fn execute_no_content(&self, request: RequestBuilder) -> ApiResult<()> {
        let response = request.send().await?;
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            s if s.is_success() => Ok(()),
            _ => Err(Self::status_error(status, response).await),
        }
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> ApiError {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        ApiError::from_status(status.as_u16(), &error_text)
    }
}

#[async_trait]
impl ApiService for ApiClient {
    async fn fetch_status(&self) -> ApiResult<RawStatus> {
        let request = self.client.get(self.build_url(routes::indexing::STATUS));
        self.execute_request(request).await
    }

    async fn start_scan(&self) -> ApiResult<ScanResponse> {
        let request = self.client.get(self.build_url(routes::indexing::SCAN));
        self.execute_request(request).await
    }

    async fn clean_cache(&self) -> ApiResult<()> {
        let request = self.client.post(self.build_url(routes::indexing::CLEAN_CACHE));
        self.execute_no_content(request).await
    }

    async fn match_media(&self, form: &SearchForm) -> ApiResult<serde_json::Value> {
        let url = self.build_url(routes::search::MATCH);
        debug!(
            "[ApiClient] POST {} (search_type={})",
            url,
            form.search_type.code()
        );
        let request = self.client.post(&url).json(form);
        self.execute_request(request).await
    }

    async fn upload_image(&self, upload: &UploadRequest) -> ApiResult<UploadResponse> {
        let part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime)
            .map_err(|e| ApiError::Transport(format!("invalid upload part: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        let request = self
            .client
            .post(self.build_url(routes::search::UPLOAD))
            .multipart(form);
        let response = request.send().await?;
        let status = response.status();

        // Rejections still carry a JSON body with an `error` field
        if status.is_success() || status == StatusCode::BAD_REQUEST {
            response
                .json::<UploadResponse>()
                .await
                .map_err(|e| ApiError::Malformed(e.to_string()))
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    async fn get_bytes(&self, locator: &str) -> ApiResult<Vec<u8>> {
        let url = self.build_url(locator);
        debug!("[ApiClient] GET bytes from: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    async fn list_models(&self) -> ApiResult<ModelCatalog> {
        let request = self.client.get(self.build_url(routes::models::LIST));
        self.execute_request(request).await
    }

    async fn change_model(&self, name: &str) -> ApiResult<ModelChangeResponse> {
        let request = self
            .client
            .get(self.build_url(routes::models::CHANGE))
            .query(&[("model", name)]);
        self.execute_request(request).await
    }

    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
