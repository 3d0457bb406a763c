//! Caller-facing configuration: credentials, fetch mode and date window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default vendor API base URL.
pub const DEFAULT_BASE_URL: &str = "https://ui-api.crossengage.io";

/// Default input-record field holding the segment id in segment-details mode.
pub const DEFAULT_SEGMENT_ID_FIELD: &str = "Campaign Segment ID";

/// Login credentials for the vendor UI API.
///
/// The API key is part of the credential set the host stores, but only email
/// and password participate in the login handshake.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// UI login email
    pub email: String,
    /// UI password
    pub password: String,
    /// API key; stored alongside the login but unused by the statistics flow
    pub api_key: Option<String>,
}

// Secrets must never reach logs, so Debug is written by hand.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// What an export run fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FetchMode {
    /// One record per campaign, with the campaign's inline statistics.
    Campaign,
    /// One record per (campaign, message).
    Message,
    /// One record per (campaign, message, A/B variation).
    Variation,
    /// Resolve segment ids found on caller-supplied input records.
    SegmentDetails,
}

/// Inclusive calendar-date window, expanded to full-day UTC bounds on the
/// wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Start of the window as an ISO-8601 instant at the first millisecond
    /// of the day.
    pub fn start_bound(&self) -> String {
        format!("{}T00:00:00.000Z", self.start.format("%Y-%m-%d"))
    }

    /// End of the window, inclusive to the last millisecond of the day.
    pub fn end_bound(&self) -> String {
        format!("{}T23:59:59.999Z", self.end.format("%Y-%m-%d"))
    }
}

/// Configuration for one export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// The entity to fetch.
    pub mode: FetchMode,
    /// Statistics date window (ignored in segment-details mode).
    pub window: DateWindow,
    /// Input-record field holding the segment id (segment-details mode).
    pub segment_id_field: String,
}

impl ExportConfig {
    /// Configuration with the default segment id field.
    pub fn new(mode: FetchMode, window: DateWindow) -> Self {
        Self {
            mode,
            window,
            segment_id_field: DEFAULT_SEGMENT_ID_FIELD.to_string(),
        }
    }

    /// Override the field name the segment id is read from.
    pub fn with_segment_id_field(mut self, field: impl Into<String>) -> Self {
        self.segment_id_field = field.into();
        self
    }
}
