//! Collaborator capabilities the UI layer provides: leveled one-shot
//! notifications and a full-screen blocking indicator.

use std::fmt::Debug;

use log::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Success,
    Warning,
    Error,
}

/// Sink for user-visible messages.
pub trait Notifier: Send + Sync + Debug {
    fn notify(&self, level: NotifyLevel, message: &str);

    fn success(&self, message: &str) {
        self.notify(NotifyLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NotifyLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotifyLevel::Error, message);
    }
}

/// Routes notifications to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Success => info!("{}", message),
            NotifyLevel::Warning => warn!("{}", message),
            NotifyLevel::Error => error!("{}", message),
        }
    }
}

/// Full-screen blocking indicator shown while a search is running.
pub trait BusyIndicator: Send + Sync + Debug {
    fn start(&self, label: &str);
    fn stop(&self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBusyIndicator;

impl BusyIndicator for NoopBusyIndicator {
    fn start(&self, _label: &str) {}
    fn stop(&self) {}
}

/// Stops the indicator when dropped, on every exit path.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    indicator: &'a dyn BusyIndicator,
}

impl<'a> BusyGuard<'a> {
    pub fn start(indicator: &'a dyn BusyIndicator, label: &str) -> Self {
        indicator.start(label);
        Self { indicator }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.indicator.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::RecordingBusyIndicator;

    #[test]
    fn guard_stops_indicator_on_drop() {
        let indicator = RecordingBusyIndicator::default();
        {
            let _guard = BusyGuard::start(&indicator, "Searching...");
            assert_eq!(indicator.active(), 1);
        }
        assert_eq!(indicator.active(), 0);
        assert_eq!(indicator.labels(), vec!["Searching...".to_string()]);
    }
}
