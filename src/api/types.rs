//! Wire types for the vendor UI API.
//!
//! Every payload is decoded exactly once at the API boundary. Fields the
//! vendor may omit are `Option`, so the flattener works over fully-typed
//! optionals instead of probing raw JSON. Passthrough values whose shape the
//! vendor does not guarantee (ids, timestamps) stay `serde_json::Value`.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Response body of the login call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
}

/// Authenticated session for one run.
///
/// Held in memory only; never persisted and never refreshed. A run that
/// outlives token validity fails its next call with the vendor's
/// authorization error.
#[derive(Clone)]
pub struct Session {
    pub company_id: u64,
    pub token: String,
    pub refresh_token: String,
}

// Tokens must never reach logs, so Debug is written by hand.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("company_id", &self.company_id)
            .field("token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Campaign list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignList {
    #[serde(default)]
    pub list: Vec<Campaign>,
}

/// One campaign as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,
    pub campaign_name: Option<String>,
    pub campaign_mode: Option<String>,
    pub campaign_class: Option<String>,
    pub status: Option<String>,
    pub created: Option<Value>,
    pub modified: Option<Value>,
    pub next_dispatch: Option<Value>,
    pub group_name: Option<String>,
    #[serde(default)]
    pub labels: Vec<CampaignLabel>,
    /// Inline statistics map keyed by metric id rendered as a string.
    #[serde(default)]
    pub statistics: HashMap<String, Value>,
}

/// A label attached to a campaign.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignLabel {
    pub name: Option<String>,
}

/// Campaign detail ("full") payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDetail {
    /// Channel configs under the current API version.
    pub channel_configs: Option<Vec<ChannelConfig>>,
    /// Older API versions ship the same list under `messages`.
    pub messages: Option<Vec<ChannelConfig>>,
    pub class_options: Option<ClassOptions>,
    pub filter_id: Option<Value>,
}

impl CampaignDetail {
    /// The campaign's channel configs regardless of API version field name.
    pub fn channels(&self) -> &[ChannelConfig] {
        self.channel_configs
            .as_deref()
            .or(self.messages.as_deref())
            .unwrap_or(&[])
    }
}

/// Scheduling options on the campaign detail.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOptions {
    pub start_date: Option<String>,
}

/// One channel-specific rendering of a campaign (a "message").
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    pub id: Value,
    pub label: Option<String>,
    pub channel_type: Option<String>,
    pub sub_channel_type: Option<String>,
    pub filter_id: Option<Value>,
    pub mail_options: Option<ChannelOptions>,
    pub channel_options: Option<ChannelOptions>,
    pub experiment: Option<Experiment>,
}

/// Subject-bearing options blob shared by mail and generic channels.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelOptions {
    pub subject: Option<String>,
}

/// A/B experiment attached to a message.
#[derive(Debug, Clone, Deserialize)]
pub struct Experiment {
    #[serde(default)]
    pub variations: Vec<Variation>,
}

/// One arm of an A/B experiment.
#[derive(Debug, Clone, Deserialize)]
pub struct Variation {
    pub id: Value,
    pub content: Option<VariationContent>,
}

/// Renderable content of a variation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationContent {
    pub label: Option<String>,
    pub mail_options: Option<ChannelOptions>,
    pub channel_options: Option<ChannelOptions>,
}

/// One entry of the metric dictionary.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricDefinition {
    pub id: i64,
    pub name: String,
}

/// Stats breakdown for one campaign, one entry per message or variation.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub overall: Vec<StatsEntry>,
}

/// Statistics for a single message or variation.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsEntry {
    /// The vendor renders these ids as strings; numbers are tolerated.
    pub id: Value,
    /// Metric id (as string) to value.
    #[serde(default)]
    pub values: HashMap<String, Value>,
}

impl StatsResponse {
    /// Entry matching the given id, with both sides rendered as strings.
    pub fn entry_for(&self, id: &str) -> Option<&StatsEntry> {
        self.overall.iter().find(|entry| id_string(&entry.id) == id)
    }
}

/// Segment (filter) resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Segment {
    pub id: Value,
    pub label: Option<String>,
}

/// Grouping for the per-campaign stats breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsGroup {
    Message,
    Variation,
}

impl StatsGroup {
    /// Value of the `groupBy` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            StatsGroup::Message => "MESSAGE",
            StatsGroup::Variation => "VARIATION",
        }
    }
}

impl std::fmt::Display for StatsGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsGroup::Message => write!(f, "message"),
            StatsGroup::Variation => write!(f, "variation"),
        }
    }
}

/// Render a vendor id for display or as a join key: strings come through
/// unquoted, everything else via its JSON encoding.
pub fn id_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
