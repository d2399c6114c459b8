//! Live view of the backend's background indexing pass.

pub mod format;
pub mod poller;

pub use format::format_duration;
pub use poller::{PollerState, StatusPoller};
