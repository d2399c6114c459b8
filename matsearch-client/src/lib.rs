//! Client-side orchestration for the MatSearch multi-modal media search
//! service: search-mode dispatch, result normalization, media locators and a
//! live view of the background indexing pass.

pub mod app;
pub mod common;
pub mod domains;
pub mod infrastructure;

pub use app::{AppConfig, ConfigError, Session};
pub use common::notifications::{BusyIndicator, LogNotifier, Notifier, NotifyLevel};
pub use domains::indexing::{PollerState, StatusPoller, format_duration};
pub use domains::media::MediaUrlCodec;
pub use domains::search::{SearchDispatcher, SearchError, ValidationFailure};
pub use infrastructure::api_client::ApiClient;
pub use infrastructure::services::api::ApiService;

pub use matsearch_model as model;
