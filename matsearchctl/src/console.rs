use std::io::{IsTerminal, Write};

use matsearch_client::{BusyIndicator, Notifier, NotifyLevel};

/// Prints notifications to stderr so stdout stays machine readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        let tag = match level {
            NotifyLevel::Success => "ok",
            NotifyLevel::Warning => "warning",
            NotifyLevel::Error => "error",
        };
        eprintln!("{tag}: {message}");
    }
}

/// Shows the busy label on interactive terminals only.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleBusyIndicator {
    interactive: bool,
}

impl Default for ConsoleBusyIndicator {
    fn default() -> Self {
        Self {
            interactive: std::io::stderr().is_terminal(),
        }
    }
}

impl BusyIndicator for ConsoleBusyIndicator {
    fn start(&self, label: &str) {
        if self.interactive {
            let mut err = std::io::stderr();
            let _ = write!(err, "{label}\r");
            let _ = err.flush();
        }
    }

    fn stop(&self) {
        if self.interactive {
            let mut err = std::io::stderr();
            let _ = write!(err, "\x1b[2K\r");
            let _ = err.flush();
        }
    }
}
