//! Metrics sink trait.

use crate::types::MetricsEvent;

/// Receives one event per successful splice.
pub trait MetricsSink: Send + Sync {
    fn record(&self, event: MetricsEvent);
}
