//! Backend identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which rewrite backend produced (or should produce) a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Chat-completion backend.
    #[default]
    #[serde(alias = "openai")]
    Primary,
    /// Summarization backend.
    #[serde(alias = "huggingface")]
    Secondary,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }

    /// Identifier of the provider extension serving this kind.
    pub fn provider_id(&self) -> &'static str {
        match self {
            Self::Primary => "openai",
            Self::Secondary => "huggingface",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primary" | "openai" => Ok(Self::Primary),
            "secondary" | "huggingface" => Ok(Self::Secondary),
            other => Err(format!("unknown backend: {}", other)),
        }
    }
}
