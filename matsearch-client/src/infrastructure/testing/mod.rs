//! Test doubles for the service seams.
//!
//! Compiled into the library so integration tests and downstream front ends
//! can drive the domains without a running backend.

mod recorders;
mod stubs;

pub use recorders::{RecordingBusyIndicator, RecordingNotifier};
pub use stubs::TestApiService;
