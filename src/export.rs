//! The export pipeline: authenticate, fetch, flatten.
//!
//! One sequential pass per run. Every network call is awaited in order,
//! including the per-campaign and per-input-record loops; a failure anywhere
//! aborts the run and discards accumulated records.

use serde_json::Value;

use crate::api::types::{id_string, Session, StatsGroup};
use crate::api::ApiClient;
use crate::config::{Credentials, ExportConfig, FetchMode};
use crate::error::{Result, XngError};
use crate::flatten::{self, Record, RunContext};
use crate::http::HttpClient;

/// Runs one export: authenticates, fetches the configured entity, and
/// returns the flattened records.
pub struct Exporter<C: HttpClient> {
    api: ApiClient<C>,
    config: ExportConfig,
}

impl<C: HttpClient> Exporter<C> {
    pub fn new(http: C, config: ExportConfig) -> Self {
        Self {
            api: ApiClient::new(http),
            config,
        }
    }

    /// Run a statistics export (campaign, message or variation mode).
    ///
    /// Segment-details mode reads caller-supplied input records instead of
    /// listing campaigns; use [`Exporter::run_with_input`] for it.
    pub async fn run(&self, credentials: &Credentials) -> Result<Vec<Record>> {
        self.run_with_input(credentials, &[]).await
    }

    /// Run an export, supplying the input records segment-details mode reads.
    #[tracing::instrument(skip_all, fields(mode = ?self.config.mode))]
    pub async fn run_with_input(
        &self,
        credentials: &Credentials,
        input: &[Value],
    ) -> Result<Vec<Record>> {
        let session = self.api.authenticate(credentials).await?;

        let records = match self.config.mode {
            FetchMode::Campaign => self.campaign_statistics(&session).await?,
            FetchMode::Message => self.grouped_statistics(&session, StatsGroup::Message).await?,
            FetchMode::Variation => {
                self.grouped_statistics(&session, StatsGroup::Variation)
                    .await?
            }
            FetchMode::SegmentDetails => self.segment_details(&session, input).await?,
        };

        tracing::info!(records = records.len(), "export complete");
        Ok(records)
    }

    /// One record per campaign, from the inline statistics on the list
    /// response.
    async fn campaign_statistics(&self, session: &Session) -> Result<Vec<Record>> {
        let window = &self.config.window;
        let campaigns = self.api.list_campaigns(session, window).await?;
        let metrics = self.api.metric_definitions(session).await?;
        let ctx = RunContext::new(session.company_id, window);

        Ok(campaigns
            .iter()
            .map(|campaign| flatten::campaign_record(&ctx, campaign, &metrics))
            .collect())
    }

    /// One record per message or per variation, joining each campaign's
    /// detail with its grouped stats breakdown. Strictly sequential.
    async fn grouped_statistics(
        &self,
        session: &Session,
        group: StatsGroup,
    ) -> Result<Vec<Record>> {
        let window = &self.config.window;
        let campaigns = self.api.list_campaigns(session, window).await?;
        let metrics = self.api.metric_definitions(session).await?;
        let ctx = RunContext::new(session.company_id, window);

        let mut records = Vec::new();
        for campaign in &campaigns {
            let detail = self.api.campaign_detail(session, campaign.id).await?;
            let stats = self
                .api
                .campaign_stats(session, campaign.id, group, window)
                .await?;

            let rows = match group {
                StatsGroup::Message => {
                    flatten::message_records(&ctx, campaign, &detail, &stats, &metrics)?
                }
                StatsGroup::Variation => {
                    flatten::variation_records(&ctx, campaign, &detail, &stats, &metrics)?
                }
            };
            tracing::debug!(campaign = campaign.id, rows = rows.len(), "flattened campaign");
            records.extend(rows);
        }
        Ok(records)
    }

    /// One {Segment ID, Segment Name} record per input record, in input
    /// order. The campaign listing is skipped entirely in this mode.
    async fn segment_details(&self, session: &Session, input: &[Value]) -> Result<Vec<Record>> {
        let field = &self.config.segment_id_field;

        let mut records = Vec::with_capacity(input.len());
        for item in input {
            let segment_id = item
                .get(field)
                .filter(|value| !value.is_null())
                .ok_or_else(|| XngError::MissingSegmentField(field.clone()))?;

            let segment = self.api.segment(session, &id_string(segment_id)).await?;
            records.push(flatten::segment_record(&segment));
        }
        Ok(records)
    }
}
