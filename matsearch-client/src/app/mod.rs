//! Application wiring: configuration and the session state object.

pub mod bootstrap;
pub mod session;

pub use bootstrap::{AppConfig, ConfigError};
pub use session::{ClipDownload, ScanStart, Session};
