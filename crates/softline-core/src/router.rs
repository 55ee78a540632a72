//! Dispatch of [`ExtensionMessage`]s.

use std::sync::Arc;

use serde_json::Value;
use softline_protocols::{ExtensionMessage, ExtensionResponse};
use tracing::{debug, warn};

use crate::metrics::MetricsStore;
use crate::pipeline::MutationPipeline;
use crate::transform::TransformService;

/// Answers the message protocol against a pipeline, its transform service
/// and the metrics store.
pub struct MessageRouter {
    pipeline: Arc<MutationPipeline>,
    transform: Arc<TransformService>,
    metrics: Arc<MetricsStore>,
}

impl MessageRouter {
    pub fn new(
        pipeline: Arc<MutationPipeline>,
        transform: Arc<TransformService>,
        metrics: Arc<MetricsStore>,
    ) -> Self {
        Self {
            pipeline,
            transform,
            metrics,
        }
    }

    pub async fn handle(&self, message: ExtensionMessage) -> ExtensionResponse {
        debug!(?message, "Handling message");
        match message {
            ExtensionMessage::TransformText { text } => {
                let settings = self.pipeline.settings();
                ExtensionResponse::Transform(self.transform.transform_with(&settings, &text).await)
            }
            ExtensionMessage::UpdateReplaceCount { count, metrics } => {
                self.metrics.apply_count(count, metrics);
                ExtensionResponse::ok()
            }
            ExtensionMessage::GetAnalytics => ExtensionResponse::Analytics {
                success: true,
                data: self.metrics.query(),
            },
            ExtensionMessage::UpdateSettings { settings } => {
                match self.pipeline.apply_settings(settings).await {
                    Ok(_) => ExtensionResponse::ok(),
                    Err(e) => ExtensionResponse::error(e.to_string()),
                }
            }
            ExtensionMessage::Toggle => match self.pipeline.toggle().await {
                Ok(is_enabled) => ExtensionResponse::Toggled {
                    success: true,
                    is_enabled,
                },
                Err(e) => ExtensionResponse::error(e.to_string()),
            },
            ExtensionMessage::GetStatus => ExtensionResponse::Status {
                is_enabled: self.pipeline.is_enabled(),
            },
            ExtensionMessage::GetReplaceCount => ExtensionResponse::Count {
                count: self.metrics.total_count(),
            },
            ExtensionMessage::Enable => match self.pipeline.enable().await {
                Ok(_) => ExtensionResponse::ok(),
                Err(e) => ExtensionResponse::error(e.to_string()),
            },
        }
    }

    /// Decode a raw JSON message, dispatch it and encode the reply.
    pub async fn handle_json(&self, message: Value) -> Value {
        let response = match serde_json::from_value::<ExtensionMessage>(message) {
            Ok(message) => self.handle(message).await,
            Err(e) => {
                warn!(error = %e, "Rejected malformed message");
                ExtensionResponse::error(format!("invalid message: {e}"))
            }
        };
        serde_json::to_value(&response)
            .unwrap_or_else(|e| serde_json::json!({ "success": false, "error": e.to_string() }))
    }
}
