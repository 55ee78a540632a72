//! Wire messages exchanged between the page script, the background worker
//! and the dashboard.

use serde::{Deserialize, Serialize};

use crate::types::{AnalyticsSnapshot, MetricsEvent, Settings, TransformResult};

/// Incoming request, tagged by its `action` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionMessage {
    TransformText {
        text: String,
    },
    UpdateReplaceCount {
        #[serde(default = "default_count")]
        count: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        metrics: Option<MetricsEvent>,
    },
    GetAnalytics,
    UpdateSettings {
        settings: Settings,
    },
    Toggle,
    GetStatus,
    GetReplaceCount,
    Enable,
}

fn default_count() -> u64 {
    1
}

/// Reply to an `ExtensionMessage`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtensionResponse {
    Transform(TransformResult),
    Analytics {
        success: bool,
        data: AnalyticsSnapshot,
    },
    Status {
        #[serde(rename = "isEnabled")]
        is_enabled: bool,
    },
    Toggled {
        success: bool,
        #[serde(rename = "isEnabled")]
        is_enabled: bool,
    },
    Count {
        count: u64,
    },
    Ack {
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ExtensionResponse {
    pub fn ok() -> Self {
        Self::Ack {
            success: true,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Ack {
            success: false,
            error: Some(message.into()),
        }
    }
}
