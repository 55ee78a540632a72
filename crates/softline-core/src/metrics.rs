//! Replacement history and aggregates.
//!
//! History is newest-first and bounded; daily aggregates are updated
//! incrementally and only ever reset together with the history.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use softline_protocols::{
    AnalyticsSnapshot, DailyAggregate, MetricsEvent, MetricsSink, ReplacementRecord,
};
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::error::MetricsError;

pub const DEFAULT_HISTORY_LIMIT: usize = 500;
const DATE_FORMAT: &str = "%Y-%m-%d";
const UNKNOWN: &str = "unknown";

/// Per-domain totals derived from the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainStat {
    pub domain: String,
    pub count: u64,
    pub avg_toxicity: f64,
}

/// Dashboard headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_count: u64,
    pub last_hour: u64,
    pub avg_toxicity_24h: f64,
    pub last_7_days: u64,
}

#[derive(Debug, Default)]
struct MetricsState {
    total_count: u64,
    history: VecDeque<ReplacementRecord>,
    daily_stats: BTreeMap<String, DailyAggregate>,
}

pub struct MetricsStore {
    state: RwLock<MetricsState>,
    history_limit: usize,
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            state: RwLock::new(MetricsState::default()),
            history_limit: history_limit.max(1),
        }
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Record one replacement now.
    pub fn record(&self, event: MetricsEvent) -> ReplacementRecord {
        self.record_at(event, Utc::now())
    }

    /// Record one replacement at `now`: bump the total, prepend to history
    /// (evicting the oldest beyond the limit) and fold into today's aggregate.
    pub fn record_at(&self, event: MetricsEvent, now: DateTime<Utc>) -> ReplacementRecord {
        let url = event.url.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let record = ReplacementRecord {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            domain: domain_of(&url),
            url,
            original_text: event.original_text,
            transformed_text: event.transformed_text,
            toxicity_score: event.toxicity_score,
            service: event.service,
            prompt_style: event.prompt_style,
            processing_time_ms: event.processing_time_ms,
        };

        let mut state = self.state.write();
        state.total_count += 1;
        state.history.push_front(record.clone());
        state.history.truncate(self.history_limit);
        state
            .daily_stats
            .entry(now.format(DATE_FORMAT).to_string())
            .or_default()
            .add(record.toxicity_score);

        debug!(domain = %record.domain, total = state.total_count, "Recorded replacement");
        record
    }

    /// Apply an `updateReplaceCount` notification: `count` goes to the
    /// total, and the attached event (if any) is recorded as one entry.
    pub fn apply_count(&self, count: u64, event: Option<MetricsEvent>) {
        match event {
            Some(event) => {
                self.record(event);
                if count > 1 {
                    self.state.write().total_count += count - 1;
                }
            }
            None => self.state.write().total_count += count,
        }
    }

    pub fn total_count(&self) -> u64 {
        self.state.read().total_count
    }

    pub fn history_len(&self) -> usize {
        self.state.read().history.len()
    }

    pub fn query(&self) -> AnalyticsSnapshot {
        let state = self.state.read();
        AnalyticsSnapshot {
            total_count: state.total_count,
            history: state.history.iter().cloned().collect(),
            daily_stats: state.daily_stats.clone(),
        }
    }

    /// Top `limit` domains by replacement count over the retained history.
    pub fn domain_stats(&self, limit: usize) -> Vec<DomainStat> {
        let state = self.state.read();
        let mut totals: HashMap<&str, (u64, f64)> = HashMap::new();
        for record in &state.history {
            let entry = totals.entry(record.domain.as_str()).or_default();
            entry.0 += 1;
            entry.1 += record.toxicity_score;
        }

        let mut stats: Vec<DomainStat> = totals
            .into_iter()
            .map(|(domain, (count, total))| DomainStat {
                domain: domain.to_string(),
                count,
                avg_toxicity: total / count as f64,
            })
            .collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.domain.cmp(&b.domain)));
        stats.truncate(limit);
        stats
    }

    pub fn summary(&self, now: DateTime<Utc>) -> MetricsSummary {
        let state = self.state.read();
        let hour_ago = now - Duration::hours(1);
        let day_ago = now - Duration::hours(24);

        let last_hour = state
            .history
            .iter()
            .filter(|r| r.timestamp >= hour_ago && r.timestamp <= now)
            .count() as u64;

        let recent: Vec<f64> = state
            .history
            .iter()
            .filter(|r| r.timestamp >= day_ago && r.timestamp <= now)
            .map(|r| r.toxicity_score)
            .collect();
        let avg_toxicity_24h = if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<f64>() / recent.len() as f64
        };

        let today = now.date_naive();
        let week_start = (now - Duration::days(7)).date_naive();
        let last_7_days = state
            .daily_stats
            .iter()
            .filter_map(|(date, agg)| {
                let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
                (date >= week_start && date <= today).then_some(agg.count)
            })
            .sum();

        MetricsSummary {
            total_count: state.total_count,
            last_hour,
            avg_toxicity_24h,
            last_7_days,
        }
    }

    /// Reset history, daily aggregates and total together.
    pub fn clear(&self) {
        *self.state.write() = MetricsState::default();
        info!("Analytics cleared");
    }

    /// Load a snapshot written by [`save`](Self::save). A missing file yields
    /// an empty store.
    pub fn load(path: &Path, history_limit: usize) -> Result<Self, MetricsError> {
        let store = Self::with_history_limit(history_limit);
        if !path.exists() {
            return Ok(store);
        }
        let content = fs::read_to_string(path)?;
        let snapshot: AnalyticsSnapshot = serde_json::from_str(&content)?;
        {
            let mut state = store.state.write();
            state.total_count = snapshot.total_count;
            state.history = snapshot.history.into_iter().take(store.history_limit).collect();
            state.daily_stats = snapshot.daily_stats;
        }
        debug!(path = %path.display(), records = store.history_len(), "Loaded analytics");
        Ok(store)
    }

    pub fn save(&self, path: &Path) -> Result<(), MetricsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.query())?;
        fs::write(path, json)?;
        debug!(path = %path.display(), "Saved analytics");
        Ok(())
    }
}

impl MetricsSink for MetricsStore {
    fn record(&self, event: MetricsEvent) {
        MetricsStore::record(self, event);
    }
}

fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
