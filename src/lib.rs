//! CrossEngage UI-API statistics adapter.
//!
//! This crate authenticates against the CrossEngage UI API, fetches
//! campaign, message and A/B-variation performance statistics plus segment
//! metadata, and flattens the nested JSON responses into tabular records.
//! Each run is one sequential pipeline: authenticate, list campaigns, then
//! one to three dependent calls per campaign (or one segment lookup per
//! input record).

pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod flatten;
pub mod http;

// Re-export commonly used types
pub use api::types::{Session, StatsGroup};
pub use api::ApiClient;
pub use config::{
    Credentials, DateWindow, ExportConfig, FetchMode, DEFAULT_BASE_URL, DEFAULT_SEGMENT_ID_FIELD,
};
pub use error::{Result, XngError};
pub use export::Exporter;
pub use flatten::Record;
pub use http::{ApiRequest, HttpClient, HttpResponse, MockHttpClient, ReqwestHttpClient};
