//! Search dispatcher for server-backed matching

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use log::{debug, info};
use matsearch_model::{ResultShape, SearchForm, SearchMode, SearchOutcome, TimeRange};
use tokio::sync::watch;

use super::error::SearchError;
use super::normalizer::normalize;
use super::reverse::build_from_result_url;
use super::validation::check_preconditions;
use crate::common::notifications::{BusyGuard, BusyIndicator, Notifier};
use crate::infrastructure::services::api::ApiService;

/// The displayed-results slot, tagged with the request that filled it.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedResults {
    pub request_id: u64,
    pub outcome: SearchOutcome,
}

/// Validates, sends and normalizes searches, and publishes the newest
/// outcome.
///
/// Every dispatch takes a monotonically increasing request id. Responses
/// still go back to their caller, but only the most recent request may fill
/// the published slot, so a slow earlier search never overwrites a later one.
#[derive(Debug)]
pub struct SearchDispatcher {
    api: Arc<dyn ApiService>,
    notifier: Arc<dyn Notifier>,
    busy: Arc<dyn BusyIndicator>,
    time_range: watch::Sender<Option<TimeRange>>,
    latest_request: AtomicU64,
    closed: AtomicBool,
    results: watch::Sender<Option<PublishedResults>>,
}

impl SearchDispatcher {
    pub fn new(
        api: Arc<dyn ApiService>,
        notifier: Arc<dyn Notifier>,
        busy: Arc<dyn BusyIndicator>,
    ) -> Self {
        Self {
            api,
            notifier,
            busy,
            time_range: watch::channel(None).0,
            latest_request: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            results: watch::channel(None).0,
        }
    }

    /// Activates (or clears) the time-range filter applied to later dispatches.
    pub fn set_time_range(&self, range: Option<TimeRange>) {
        self.time_range.send_replace(range);
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        *self.time_range.borrow()
    }

    /// Currently displayed outcome, if any search has completed.
    pub fn results(&self) -> Option<PublishedResults> {
        self.results.borrow().clone()
    }

    pub fn subscribe_results(&self) -> watch::Receiver<Option<PublishedResults>> {
        self.results.subscribe()
    }

    /// Stops publishing. Searches still return their outcome to the caller,
    /// including ones in flight, but the results slot keeps its last value.
    pub fn close(&self) {
        self.results.send_if_modified(|_| {
            self.closed.store(true, Ordering::SeqCst);
            false
        });
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn latest_request_id(&self) -> u64 {
        self.latest_request.load(Ordering::SeqCst)
    }

    /// Runs one search in `mode`.
    ///
    /// Always records `mode` as the form's `search_type` and copies an active
    /// time range into it. Precondition failures return before any request.
    pub async fn dispatch(
        &self,
        mode: SearchMode,
        form: &mut SearchForm,
    ) -> Result<SearchOutcome, SearchError> {
        form.search_type = mode;
        let range = self.time_range();
        if let Some(range) = range {
            let (start, end) = range.as_epoch_seconds();
            form.start_time = Some(start);
            form.end_time = Some(end);
        }

        if let Err(failure) = check_preconditions(mode, form) {
            self.notifier.error(&failure.to_string());
            return Err(failure.into());
        }

        let request_id = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "[SearchDispatcher] request #{} mode={} top_n={}",
            request_id, mode, form.top_n
        );

        let response = {
            let _busy = BusyGuard::start(self.busy.as_ref(), "Searching...");
            self.api.match_media(form).await
        };

        let outcome = match response
            .map_err(SearchError::from)
            .and_then(|payload| normalize(mode, payload))
        {
            Ok(outcome) => outcome,
            Err(err) => {
                self.notifier.error(&err.to_string());
                return Err(err);
            }
        };

        if self.publish(request_id, &outcome) {
            info!(
                "[SearchDispatcher] request #{} completed with {} items",
                request_id,
                outcome.items().len()
            );
            self.notifier.success(&summary(&outcome));
        } else {
            debug!(
                "[SearchDispatcher] request #{} not published (latest #{}, closed={})",
                request_id,
                self.latest_request_id(),
                self.is_closed()
            );
        }

        Ok(outcome)
    }

    /// Reverse query: seed `form` from a displayed result's locator, then
    /// dispatch.
    pub async fn search_from_result(
        &self,
        mode: SearchMode,
        url: &str,
        form: &mut SearchForm,
    ) -> Result<SearchOutcome, SearchError> {
        if let Err(err) = build_from_result_url(mode, url, form) {
            self.notifier.error(&err.to_string());
            return Err(err);
        }
        self.dispatch(mode, form).await
    }

    fn publish(&self, request_id: u64, outcome: &SearchOutcome) -> bool {
        self.results.send_if_modified(|slot| {
            if self.closed.load(Ordering::SeqCst)
                || self.latest_request.load(Ordering::SeqCst) != request_id
            {
                return false;
            }
            *slot = Some(PublishedResults {
                request_id,
                outcome: outcome.clone(),
            });
            true
        })
    }
}

fn summary(outcome: &SearchOutcome) -> String {
    let count = outcome.items().len();
    match (outcome.mode(), outcome.mode().result_shape()) {
        (_, ResultShape::Score) => {
            let score = outcome.score().map(|s| s.score).unwrap_or_default();
            format!("Similarity score: {score}%")
        }
        (SearchMode::TextToPexelsVideo, _) => format!("Found {count} Pexels videos"),
        (_, ResultShape::Videos) => format!("Found {count} videos"),
        (_, ResultShape::Images) => format!("Found {count} images"),
    }
}
