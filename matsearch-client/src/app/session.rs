//! Session state object
//!
//! Owns the search form, the dispatcher and the status poller for one
//! connection to the matching service. Views subscribe to the published
//! results and status instead of reading shared globals.

use std::sync::Arc;

use log::{debug, info};
use matsearch_model::{ResultItem, SearchForm, SearchMode, SearchOutcome, StatusSnapshot, TimeRange};
use tokio::sync::watch;

use super::bootstrap::AppConfig;
use crate::common::notifications::{BusyIndicator, Notifier};
use crate::domains::indexing::{PollerState, StatusPoller};
use crate::domains::media::ClipRequest;
use crate::domains::search::{PublishedResults, SearchDispatcher, SearchError, ValidationFailure};
use crate::domains::upload::{UploadOutcome, UploadRequest};
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::api_types::{ModelCatalog, ModelChangeResponse};
use crate::infrastructure::services::api::ApiService;
use crate::infrastructure::{ApiError, ApiResult};

/// Result of asking the backend to index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStart {
    Started,
    AlreadyRunning,
}

/// A downloaded video segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipDownload {
    /// Suggested file name, the last component of the source path
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct Session {
    config: AppConfig,
    api: Arc<dyn ApiService>,
    notifier: Arc<dyn Notifier>,
    dispatcher: SearchDispatcher,
    poller: StatusPoller,
    form: SearchForm,
}

impl Session {
    /// Builds a session backed by a real HTTP client.
    pub fn connect(
        config: AppConfig,
        notifier: Arc<dyn Notifier>,
        busy: Arc<dyn BusyIndicator>,
    ) -> ApiResult<Self> {
        let api: Arc<dyn ApiService> = Arc::new(ApiClient::new(&config)?);
        Ok(Self::with_api(config, api, notifier, busy))
    }

    pub fn with_api(
        config: AppConfig,
        api: Arc<dyn ApiService>,
        notifier: Arc<dyn Notifier>,
        busy: Arc<dyn BusyIndicator>,
    ) -> Self {
        let dispatcher =
            SearchDispatcher::new(Arc::clone(&api), Arc::clone(&notifier), busy);
        let poller = StatusPoller::new(
            Arc::clone(&api),
            Arc::clone(&notifier),
            config.status_poll_interval,
        );
        Self {
            config,
            api,
            notifier,
            dispatcher,
            poller,
            form: SearchForm::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<dyn ApiService> {
        &self.api
    }

    /// Begins status polling. Must be called inside a tokio runtime.
    pub fn start(&self) {
        info!("[Session] starting against {}", self.api.base_url());
        self.poller.start();
    }

    /// Stops polling and closes the dispatcher. Fetches and searches still
    /// in flight finish but publish nothing.
    pub fn teardown(&self) {
        self.poller.stop();
        self.dispatcher.close();
    }

    pub fn poller_state(&self) -> PollerState {
        self.poller.state()
    }

    pub fn form(&self) -> &SearchForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SearchForm {
        &mut self.form
    }

    /// Sets or clears the time filter. Clearing also drops the bounds from
    /// the form so later searches are unfiltered.
    pub fn set_time_range(&mut self, range: Option<TimeRange>) {
        if range.is_none() {
            self.form.clear_time_range();
        }
        self.dispatcher.set_time_range(range);
    }

    pub async fn search(&mut self, mode: SearchMode) -> Result<SearchOutcome, SearchError> {
        self.dispatcher.dispatch(mode, &mut self.form).await
    }

    pub async fn search_from_result(
        &mut self,
        mode: SearchMode,
        url: &str,
    ) -> Result<SearchOutcome, SearchError> {
        self.dispatcher
            .search_from_result(mode, url, &mut self.form)
            .await
    }

    pub fn results(&self) -> Option<PublishedResults> {
        self.dispatcher.results()
    }

    pub fn subscribe_results(&self) -> watch::Receiver<Option<PublishedResults>> {
        self.dispatcher.subscribe_results()
    }

    pub fn status(&self) -> Option<StatusSnapshot> {
        self.poller.snapshot()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<Option<StatusSnapshot>> {
        self.poller.subscribe()
    }

    /// One status fetch outside the polling schedule.
    pub async fn refresh_status(&self) -> ApiResult<StatusSnapshot> {
        self.poller.refresh().await
    }

    /// Starts an indexing pass unless the last snapshot already reports one.
    pub async fn start_scan(&self) -> ApiResult<ScanStart> {
        if self.status().is_some_and(|s| s.is_scanning) {
            self.notifier.warning("Scan is already in progress");
            return Ok(ScanStart::AlreadyRunning);
        }

        match self.api.start_scan().await {
            Ok(response) if response.already_scanning() => {
                self.notifier.warning("Scan is already in progress");
                Ok(ScanStart::AlreadyRunning)
            }
            Ok(_) => {
                self.notifier.success("Scan started successfully");
                // The poller reports the failure itself.
                let _ = self.poller.refresh().await;
                Ok(ScanStart::Started)
            }
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to start scan: {}", failure_text(&err)));
                Err(err)
            }
        }
    }

    pub async fn clean_cache(&self) -> ApiResult<()> {
        match self.api.clean_cache().await {
            Ok(()) => {
                self.notifier.success("Cache cleaned successfully");
                Ok(())
            }
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to clean cache: {}", failure_text(&err)));
                Err(err)
            }
        }
    }

    /// Validates and uploads a query image. Reports exactly one notification.
    pub async fn upload_image(&self, upload: &UploadRequest) -> UploadOutcome {
        self.upload(upload).await.0
    }

    /// Uploads the image and runs an upload-seeded search against it in the
    /// same HTTP session, since the server matches the upload it last stored
    /// for this cookie.
    pub async fn search_with_upload(
        &mut self,
        mode: SearchMode,
        upload: &UploadRequest,
    ) -> Result<SearchOutcome, SearchError> {
        if !mode.uses_uploaded_image() {
            let failure = ValidationFailure::UploadNotUsed { mode };
            self.notifier.error(&failure.to_string());
            return Err(failure.into());
        }

        let stored = match self.upload(upload).await {
            (UploadOutcome::Success, stored) => stored,
            (UploadOutcome::Failure(reason), _) => return Err(SearchError::Upload(reason)),
        };
        let img_id = stored.unwrap_or_else(|| upload.file_name.clone());
        debug!("[Session] searching {} against upload {}", mode, img_id);
        self.form.img_id = Some(img_id);
        self.dispatcher.dispatch(mode, &mut self.form).await
    }

    async fn upload(&self, upload: &UploadRequest) -> (UploadOutcome, Option<String>) {
        if let Err(failure) = upload.validate_with_limit(self.config.upload_limit_bytes) {
            let message = failure.to_string();
            self.notifier.error(&message);
            return (UploadOutcome::Failure(message), None);
        }

        let (outcome, stored) = match self.api.upload_image(upload).await {
            Ok(response) => {
                let stored = response.stored_name().map(str::to_string);
                (UploadOutcome::from(response), stored)
            }
            Err(err) => (UploadOutcome::Failure(failure_text(&err)), None),
        };
        match &outcome {
            UploadOutcome::Success => self.notifier.success("File uploaded successfully"),
            UploadOutcome::Failure(reason) => {
                self.notifier.error(&format!("Upload failed: {reason}"))
            }
        }
        (outcome, stored)
    }

    /// Builds a clip request from a video hit, reporting bad bounds.
    pub fn clip_for_result(&self, item: &ResultItem) -> Result<ClipRequest, ValidationFailure> {
        ClipRequest::from_result(item).inspect_err(|failure| {
            self.notifier.error(&failure.to_string());
        })
    }

    pub async fn download_clip(&self, clip: &ClipRequest) -> ApiResult<ClipDownload> {
        debug!(
            "[Session] downloading clip {}s..{}s of {}",
            clip.start_seconds(),
            clip.end_seconds(),
            clip.path()
        );
        match self.api.get_bytes(&clip.locator()).await {
            Ok(bytes) => {
                self.notifier.success("Video clip downloaded successfully");
                Ok(ClipDownload {
                    file_name: clip.file_name().to_string(),
                    bytes,
                })
            }
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to download video clip: {}", failure_text(&err)));
                Err(err)
            }
        }
    }

    pub async fn list_models(&self) -> ApiResult<ModelCatalog> {
        self.api.list_models().await.inspect_err(|err| {
            self.notifier
                .error(&format!("Failed to get models: {}", failure_text(err)));
        })
    }

    /// Switches the embedding model, then refreshes the status so the new
    /// model name shows up.
    pub async fn change_model(&self, name: &str) -> ApiResult<ModelChangeResponse> {
        let response = match self.api.change_model(name).await {
            Ok(response) => response,
            Err(err) => {
                self.notifier
                    .error(&format!("Failed to change model: {}", failure_text(&err)));
                return Err(err);
            }
        };

        if response.success {
            let model = response.model.as_deref().unwrap_or(name);
            self.notifier.success(&format!("Model changed to {model}"));
            let _ = self.poller.refresh().await;
        } else {
            let reason = response.error.as_deref().unwrap_or("Unknown error");
            self.notifier
                .error(&format!("Failed to change model: {reason}"));
        }
        Ok(response)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Backend text for status errors, full description otherwise.
fn failure_text(err: &ApiError) -> String {
    match err {
        ApiError::Status { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
