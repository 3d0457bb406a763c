//! Flattening of vendor payloads into tabular output records.
//!
//! Pure functions, no IO: each one merges a campaign with its message,
//! variation and metric data into flat records of display-named columns.
//! Optional vendor fields become null or empty-string columns; the two
//! lookup-by-id joins (message and variation statistics) are the only
//! places allowed to fail, with an error naming the offending id.

use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::api::types::{
    id_string, Campaign, CampaignDetail, CampaignLabel, ChannelConfig, ChannelOptions,
    MetricDefinition, Segment, StatsGroup, StatsResponse,
};
use crate::config::DateWindow;
use crate::error::{Result, XngError};

/// A flat output row: display-named columns to JSON values.
pub type Record = Map<String, Value>;

/// Run-level context stamped onto every statistics record.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub company_id: u64,
    pub start_date: String,
    pub end_date: String,
}

impl RunContext {
    pub fn new(company_id: u64, window: &DateWindow) -> Self {
        Self {
            company_id,
            start_date: window.start_bound(),
            end_date: window.end_bound(),
        }
    }
}

/// One record for a campaign, with its inline statistics map relabeled via
/// the metric dictionary.
pub fn campaign_record(
    ctx: &RunContext,
    campaign: &Campaign,
    metrics: &[MetricDefinition],
) -> Record {
    let mut record = Record::new();
    campaign_columns(&mut record, ctx, campaign);
    metric_columns(&mut record, metrics, &campaign.statistics);
    record
}

/// One record per channel config of a campaign, joined with the per-message
/// stats breakdown.
///
/// A message id with no entry in the stats response aborts with
/// [`XngError::MissingStatistics`].
pub fn message_records(
    ctx: &RunContext,
    campaign: &Campaign,
    detail: &CampaignDetail,
    stats: &StatsResponse,
    metrics: &[MetricDefinition],
) -> Result<Vec<Record>> {
    detail
        .channels()
        .iter()
        .map(|message| {
            let mut record = Record::new();
            campaign_columns(&mut record, ctx, campaign);
            record.insert("Campaign Start Date".into(), class_start_date(detail));
            record.insert("Campaign Segment ID".into(), opt_value(&detail.filter_id));
            message_columns(&mut record, message);
            record.insert("Message Segment ID".into(), opt_value(&message.filter_id));

            let id = id_string(&message.id);
            let entry = stats.entry_for(&id).ok_or(XngError::MissingStatistics {
                group: StatsGroup::Message,
                id,
            })?;
            metric_columns(&mut record, metrics, &entry.values);
            Ok(record)
        })
        .collect()
}

/// Records for every A/B variation of a campaign's messages.
///
/// Messages without a non-empty `experiment.variations` list contribute no
/// records. A variation id with no entry in the stats response aborts with
/// [`XngError::MissingStatistics`].
pub fn variation_records(
    ctx: &RunContext,
    campaign: &Campaign,
    detail: &CampaignDetail,
    stats: &StatsResponse,
    metrics: &[MetricDefinition],
) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for message in detail.channels() {
        let Some(experiment) = &message.experiment else {
            continue;
        };
        for variation in &experiment.variations {
            let mut record = Record::new();
            campaign_columns(&mut record, ctx, campaign);
            record.insert("Campaign Start Date".into(), class_start_date(detail));
            message_columns(&mut record, message);

            record.insert("Variation ID".into(), variation.id.clone());
            let content = variation.content.as_ref();
            record.insert(
                "Variation Name".into(),
                content
                    .and_then(|c| c.label.clone())
                    .unwrap_or_default()
                    .into(),
            );
            // The variation's own content overrides the message-level subject.
            record.insert(
                "Mail Subject".into(),
                content
                    .map(|c| subject(c.mail_options.as_ref(), c.channel_options.as_ref()))
                    .unwrap_or_default()
                    .into(),
            );

            let id = id_string(&variation.id);
            let entry = stats.entry_for(&id).ok_or(XngError::MissingStatistics {
                group: StatsGroup::Variation,
                id,
            })?;
            metric_columns(&mut record, metrics, &entry.values);
            records.push(record);
        }
    }
    Ok(records)
}

/// The {Segment ID, Segment Name} row for one resolved segment.
pub fn segment_record(segment: &Segment) -> Record {
    let mut record = Record::new();
    record.insert("Segment ID".into(), segment.id.clone());
    record.insert(
        "Segment Name".into(),
        segment.label.clone().map(Value::String).unwrap_or_default(),
    );
    record
}

/// Campaign attributes shared by every statistics mode.
fn campaign_columns(record: &mut Record, ctx: &RunContext, campaign: &Campaign) {
    record.insert("Company ID".into(), ctx.company_id.into());
    record.insert("Start Date".into(), ctx.start_date.clone().into());
    record.insert("End Date".into(), ctx.end_date.clone().into());
    record.insert("Campaign ID".into(), campaign.id.into());
    record.insert("Campaign Name".into(), opt_string(&campaign.campaign_name));
    record.insert("Campaign Mode".into(), opt_string(&campaign.campaign_mode));
    record.insert(
        "Campaign Class".into(),
        opt_string(&campaign.campaign_class),
    );
    record.insert("Campaign Status".into(), opt_string(&campaign.status));
    record.insert("Campaign Created".into(), opt_value(&campaign.created));
    record.insert("Campaign Modified".into(), opt_value(&campaign.modified));
    record.insert(
        "Next Campaign Dispatch".into(),
        opt_value(&campaign.next_dispatch),
    );
    record.insert("Campaign Group".into(), opt_string(&campaign.group_name));
    record.insert(
        "Campaign Labels".into(),
        joined_labels(&campaign.labels).into(),
    );
}

/// Message identity and channel attributes.
fn message_columns(record: &mut Record, message: &ChannelConfig) {
    record.insert("Message ID".into(), message.id.clone());
    record.insert("Message Name".into(), opt_string(&message.label));
    record.insert("Message Channel".into(), opt_string(&message.channel_type));
    record.insert(
        "Message Provider".into(),
        opt_string(&message.sub_channel_type),
    );
    record.insert(
        "Mail Subject".into(),
        subject(
            message.mail_options.as_ref(),
            message.channel_options.as_ref(),
        )
        .into(),
    );
}

/// One column per metric whose id appears in the stats map, named by the
/// metric display name. Values that do not encode a finite number become
/// null.
fn metric_columns(
    record: &mut Record,
    metrics: &[MetricDefinition],
    values: &HashMap<String, Value>,
) {
    for metric in metrics {
        if let Some(raw) = values.get(&metric.id.to_string()) {
            record.insert(metric.name.clone(), finite_or_null(raw));
        }
    }
}

/// Subject precedence: mail options first, then channel options, else empty.
fn subject(mail: Option<&ChannelOptions>, channel: Option<&ChannelOptions>) -> String {
    mail.and_then(|options| options.subject.clone())
        .or_else(|| channel.and_then(|options| options.subject.clone()))
        .unwrap_or_default()
}

/// `classOptions.startDate` from the detail, empty string when absent.
fn class_start_date(detail: &CampaignDetail) -> Value {
    detail
        .class_options
        .as_ref()
        .and_then(|options| options.start_date.clone())
        .unwrap_or_default()
        .into()
}

fn joined_labels(labels: &[CampaignLabel]) -> String {
    labels
        .iter()
        .filter_map(|label| label.name.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Keep values that encode a finite number, coerce everything else to null.
fn finite_or_null(raw: &Value) -> Value {
    match raw {
        // serde_json numbers cannot carry NaN or infinity
        Value::Number(_) => raw.clone(),
        Value::String(s) if s.trim().parse::<f64>().map_or(false, f64::is_finite) => raw.clone(),
        _ => Value::Null,
    }
}

fn opt_string(value: &Option<String>) -> Value {
    value.clone().map(Value::String).unwrap_or(Value::Null)
}

fn opt_value(value: &Option<Value>) -> Value {
    value.clone().unwrap_or(Value::Null)
}
