//! Periodic status polling
//!
//! One background task per poller. The task fetches immediately on start and
//! then once per period until the poller is stopped or dropped.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use matsearch_model::StatusSnapshot;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::common::notifications::Notifier;
use crate::infrastructure::api_types::RawStatus;
use crate::infrastructure::services::api::ApiService;
use crate::infrastructure::{ApiError, ApiResult};

/// Default polling period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Lifecycle of a poller. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Polling,
    Stopped,
}

#[derive(Debug)]
pub struct StatusPoller {
    api: Arc<dyn ApiService>,
    notifier: Arc<dyn Notifier>,
    period: Duration,
    state: watch::Sender<PollerState>,
    snapshot: Arc<watch::Sender<Option<StatusSnapshot>>>,
    cancel: CancellationToken,
}

impl StatusPoller {
    pub fn new(api: Arc<dyn ApiService>, notifier: Arc<dyn Notifier>, period: Duration) -> Self {
        let period = if period.is_zero() {
            warn!("[StatusPoller] zero poll interval, using {:?}", DEFAULT_POLL_INTERVAL);
            DEFAULT_POLL_INTERVAL
        } else {
            period
        };
        Self {
            api,
            notifier,
            period,
            state: watch::channel(PollerState::Idle).0,
            snapshot: Arc::new(watch::channel(None).0),
            cancel: CancellationToken::new(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> PollerState {
        *self.state.borrow()
    }

    /// Latest successfully fetched snapshot.
    pub fn snapshot(&self) -> Option<StatusSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<StatusSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Spawns the polling task on the current tokio runtime.
    ///
    /// Only the first call from `Idle` does anything; starting an already
    /// polling or stopped poller is a no-op.
    pub fn start(&self) {
        let started = self.state.send_if_modified(|state| {
            if *state == PollerState::Idle {
                *state = PollerState::Polling;
                true
            } else {
                false
            }
        });
        if !started {
            debug!("[StatusPoller] start ignored in state {:?}", self.state());
            return;
        }

        info!("[StatusPoller] polling every {:?}", self.period);
        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        let snapshot = Arc::clone(&self.snapshot);
        let cancel = self.cancel.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                // A fetch still in flight at stop is dropped with its result.
                let fetched = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => None,
                    result = api.fetch_status() => Some(result),
                };
                let Some(result) = fetched else { break };
                match apply(&snapshot, &cancel, notifier.as_ref(), result) {
                    Ok(fresh) => debug!(
                        "[StatusPoller] snapshot: scanning={} progress={:.1}%",
                        fresh.is_scanning, fresh.progress
                    ),
                    Err(err) => debug!("[StatusPoller] keeping previous snapshot: {}", err),
                }
            }
            debug!("[StatusPoller] polling task finished");
        });
    }

    /// Cancels the timer and any in-flight fetch. Idempotent.
    ///
    /// Once this returns no further snapshot is published.
    pub fn stop(&self) {
        self.cancel_under_lock();
        if self.state.send_replace(PollerState::Stopped) != PollerState::Stopped {
            info!("[StatusPoller] stopped");
        }
    }

    /// Fetches once, outside the periodic schedule. A stopped poller still
    /// returns the fetched snapshot but no longer publishes it.
    pub async fn refresh(&self) -> ApiResult<StatusSnapshot> {
        let result = self.api.fetch_status().await;
        apply(&self.snapshot, &self.cancel, self.notifier.as_ref(), result)
    }

    /// Cancels while holding the snapshot lock, so a publish either
    /// completed before cancellation or observes it.
    fn cancel_under_lock(&self) {
        self.snapshot.send_if_modified(|_| {
            self.cancel.cancel();
            false
        });
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel_under_lock();
    }
}

/// Publishes a successful fetch unless the poller was stopped; a failure
/// notifies and keeps the previous snapshot.
fn apply(
    snapshot: &watch::Sender<Option<StatusSnapshot>>,
    cancel: &CancellationToken,
    notifier: &dyn Notifier,
    result: ApiResult<RawStatus>,
) -> Result<StatusSnapshot, ApiError> {
    match result {
        Ok(raw) => {
            let fresh = StatusSnapshot::from(raw);
            let published = snapshot.send_if_modified(|slot| {
                if cancel.is_cancelled() {
                    return false;
                }
                *slot = Some(fresh.clone());
                true
            });
            if !published {
                debug!("[StatusPoller] discarding snapshot fetched after stop");
            }
            Ok(fresh)
        }
        Err(err) => {
            if cancel.is_cancelled() {
                debug!("[StatusPoller] ignoring failure after stop: {}", err);
            } else {
                warn!("[StatusPoller] status fetch failed: {}", err);
                notifier.error(&format!("Failed to get status: {err}"));
            }
            Err(err)
        }
    }
}
