use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use matsearch_model::SearchForm;
use serde_json::Value;
use tokio::sync::Notify;

use crate::domains::upload::UploadRequest;
use crate::infrastructure::api_types::{
    ModelCatalog, ModelChangeResponse, RawStatus, ScanResponse, UploadResponse,
};
use crate::infrastructure::services::api::ApiService;
use crate::infrastructure::{ApiError, ApiResult};

/// A scripted response, optionally held back until its gate is released.
#[derive(Debug)]
struct Scripted<T> {
    result: ApiResult<T>,
    gate: Option<Arc<Notify>>,
}

impl<T> Scripted<T> {
    async fn resolve(self) -> ApiResult<T> {
        if let Some(gate) = self.gate {
            gate.notified().await;
        }
        self.result
    }
}

/// In-memory [`ApiService`] with scripted responses and call recording.
///
/// Responses are consumed in FIFO order; when a queue is empty the stub falls
/// back to a benign default (an empty match list, an idle status).
#[derive(Debug, Clone)]
pub struct TestApiService {
    inner: Arc<Mutex<InnerApiState>>,
    base_url: Arc<str>,
}

#[derive(Debug, Default)]
struct InnerApiState {
    match_responses: VecDeque<Scripted<Value>>,
    status_responses: VecDeque<Scripted<RawStatus>>,
    scan_response: Option<ApiResult<ScanResponse>>,
    upload_response: Option<ApiResult<UploadResponse>>,
    bytes_response: Option<ApiResult<Vec<u8>>>,
    models: ModelCatalog,
    match_forms: Vec<SearchForm>,
    status_calls: usize,
    scan_calls: usize,
    clean_cache_calls: usize,
    uploads: Vec<UploadRequest>,
    byte_requests: Vec<String>,
    model_changes: Vec<String>,
}

impl Default for TestApiService {
    fn default() -> Self {
        Self::new("http://localhost:8085")
    }
}

impl TestApiService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(InnerApiState::default())),
            base_url: Arc::from(base_url.into()),
        }
    }

    fn state(&self) -> MutexGuard<'_, InnerApiState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_match_response(&self, result: ApiResult<Value>) {
        self.state()
            .match_responses
            .push_back(Scripted { result, gate: None });
    }

    /// Queues a match response that is only delivered after the returned
    /// gate is notified.
    pub fn push_gated_match_response(&self, result: ApiResult<Value>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state().match_responses.push_back(Scripted {
            result,
            gate: Some(Arc::clone(&gate)),
        });
        gate
    }

    pub fn push_status(&self, result: ApiResult<RawStatus>) {
        self.state()
            .status_responses
            .push_back(Scripted { result, gate: None });
    }

    pub fn push_gated_status(&self, result: ApiResult<RawStatus>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state().status_responses.push_back(Scripted {
            result,
            gate: Some(Arc::clone(&gate)),
        });
        gate
    }

    pub fn set_scan_response(&self, result: ApiResult<ScanResponse>) {
        self.state().scan_response = Some(result);
    }

    pub fn set_upload_response(&self, result: ApiResult<UploadResponse>) {
        self.state().upload_response = Some(result);
    }

    pub fn set_bytes_response(&self, result: ApiResult<Vec<u8>>) {
        self.state().bytes_response = Some(result);
    }

    pub fn set_models(&self, models: ModelCatalog) {
        self.state().models = models;
    }

    /// Forms received by the matching endpoint, in call order.
    pub fn match_forms(&self) -> Vec<SearchForm> {
        self.state().match_forms.clone()
    }

    pub fn match_calls(&self) -> usize {
        self.state().match_forms.len()
    }

    pub fn status_calls(&self) -> usize {
        self.state().status_calls
    }

    pub fn scan_calls(&self) -> usize {
        self.state().scan_calls
    }

    pub fn clean_cache_calls(&self) -> usize {
        self.state().clean_cache_calls
    }

    pub fn uploads(&self) -> Vec<UploadRequest> {
        self.state().uploads.clone()
    }

    pub fn byte_requests(&self) -> Vec<String> {
        self.state().byte_requests.clone()
    }

    pub fn model_changes(&self) -> Vec<String> {
        self.state().model_changes.clone()
    }
}

#[async_trait]
impl ApiService for TestApiService {
    async fn fetch_status(&self) -> ApiResult<RawStatus> {
        let scripted = {
            let mut state = self.state();
            state.status_calls += 1;
            state.status_responses.pop_front()
        };
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(RawStatus::default()),
        }
    }

    async fn start_scan(&self) -> ApiResult<ScanResponse> {
        let mut state = self.state();
        state.scan_calls += 1;
        state.scan_response.clone().unwrap_or_else(|| {
            Ok(ScanResponse {
                status: "start scanning".into(),
            })
        })
    }

    async fn clean_cache(&self) -> ApiResult<()> {
        self.state().clean_cache_calls += 1;
        Ok(())
    }

    async fn match_media(&self, form: &SearchForm) -> ApiResult<Value> {
        let scripted = {
            let mut state = self.state();
            state.match_forms.push(form.clone());
            state.match_responses.pop_front()
        };
        match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(Value::Array(Vec::new())),
        }
    }

    async fn upload_image(&self, upload: &UploadRequest) -> ApiResult<UploadResponse> {
        let mut state = self.state();
        state.uploads.push(upload.clone());
        state.upload_response.clone().unwrap_or_else(|| {
            Ok(UploadResponse {
                status: Some("success".into()),
                file_path: Some(format!("/tmp/upload/{}", upload.file_name)),
                ..UploadResponse::default()
            })
        })
    }

    async fn get_bytes(&self, locator: &str) -> ApiResult<Vec<u8>> {
        let mut state = self.state();
        state.byte_requests.push(locator.to_string());
        state.bytes_response.clone().unwrap_or_else(|| {
            Err(ApiError::Status {
                status: 404,
                message: "TestApiService::get_bytes not configured".into(),
            })
        })
    }

    async fn list_models(&self) -> ApiResult<ModelCatalog> {
        Ok(self.state().models.clone())
    }

    async fn change_model(&self, name: &str) -> ApiResult<ModelChangeResponse> {
        let mut state = self.state();
        if !state.models.contains_key(name) {
            return Err(ApiError::Status {
                status: 400,
                message: "invalid model name".into(),
            });
        }
        state.model_changes.push(name.to_string());
        for (key, info) in state.models.iter_mut() {
            info.current = key == name;
        }
        Ok(ModelChangeResponse {
            success: true,
            model: Some(name.to_string()),
            error: None,
        })
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
