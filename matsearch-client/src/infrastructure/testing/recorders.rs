use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::common::notifications::{BusyIndicator, Notifier, NotifyLevel};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps every notification for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<(NotifyLevel, String)>>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(NotifyLevel, String)> {
        lock(&self.messages).clone()
    }

    pub fn with_level(&self, level: NotifyLevel) -> Vec<String> {
        lock(&self.messages)
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn last(&self) -> Option<(NotifyLevel, String)> {
        lock(&self.messages).last().cloned()
    }

    pub fn clear(&self) {
        lock(&self.messages).clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        lock(&self.messages).push((level, message.to_string()));
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingBusyIndicator {
    inner: Arc<Mutex<BusyState>>,
}

#[derive(Debug, Default)]
struct BusyState {
    active: usize,
    labels: Vec<String>,
}

impl RecordingBusyIndicator {
    /// Starts not yet matched by a stop.
    pub fn active(&self) -> usize {
        lock(&self.inner).active
    }

    pub fn labels(&self) -> Vec<String> {
        lock(&self.inner).labels.clone()
    }
}

impl BusyIndicator for RecordingBusyIndicator {
    fn start(&self, label: &str) {
        let mut state = lock(&self.inner);
        state.active += 1;
        state.labels.push(label.to_string());
    }

    fn stop(&self) {
        let mut state = lock(&self.inner);
        state.active = state.active.saturating_sub(1);
    }
}
