//! Replacement metrics and analytics snapshots.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ServiceKind;

/// One successful replacement as reported by the splice step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsEvent {
    pub original_text: String,
    pub transformed_text: String,
    #[serde(default)]
    pub toxicity_score: f64,
    #[serde(rename = "aiService")]
    pub service: ServiceKind,
    #[serde(rename = "promptType")]
    pub prompt_style: String,
    #[serde(rename = "processingTime", default)]
    pub processing_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Persisted history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub domain: String,
    pub original_text: String,
    pub transformed_text: String,
    pub toxicity_score: f64,
    pub service: ServiceKind,
    pub prompt_style: String,
    pub processing_time_ms: u64,
}

/// Per-day aggregate, updated incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAggregate {
    pub count: u64,
    pub total_toxicity: f64,
    pub avg_toxicity: f64,
}

impl DailyAggregate {
    /// Fold one event in; the average is recomputed from the running total.
    pub fn add(&mut self, toxicity: f64) {
        self.count += 1;
        self.total_toxicity += toxicity;
        self.avg_toxicity = self.total_toxicity / self.count as f64;
    }
}

/// Read-only view handed to the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub total_count: u64,
    pub history: Vec<ReplacementRecord>,
    pub daily_stats: BTreeMap<String, DailyAggregate>,
}
