//! Runtime settings pushed by the options UI.

use serde::{Deserialize, Serialize};

use super::ServiceKind;

/// The settings input. Re-applied on every settings-update notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true", alias = "use_remote_transform")]
    pub use_remote_transform: bool,

    #[serde(default)]
    pub backend: ServiceKind,

    #[serde(default = "default_style_key", alias = "style_key")]
    pub style_key: String,

    #[serde(default = "default_true", alias = "show_highlight")]
    pub show_highlight: bool,

    /// Fragments scoring below this are left alone. 0.0 transforms every gated fragment.
    #[serde(default, alias = "toxicity_threshold")]
    pub toxicity_threshold: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            use_remote_transform: true,
            backend: ServiceKind::default(),
            style_key: default_style_key(),
            show_highlight: true,
            toxicity_threshold: 0.0,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_style_key() -> String {
    "DEFAULT".to_string()
}
