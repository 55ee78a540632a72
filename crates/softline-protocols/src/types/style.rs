//! Rewrite style keys.

use serde::{Deserialize, Serialize};

/// Named rewrite instruction selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewriteStyle {
    /// General detoxification.
    #[default]
    Default,
    /// Conflict de-escalation.
    AggressiveTransformer,
    /// Hate-speech neutralization.
    HateSpeechTransformer,
    /// Workplace professionalism.
    ProfessionalTransformer,
    /// Educational tone.
    EducationalTransformer,
}

impl RewriteStyle {
    pub const ALL: [RewriteStyle; 5] = [
        Self::Default,
        Self::AggressiveTransformer,
        Self::HateSpeechTransformer,
        Self::ProfessionalTransformer,
        Self::EducationalTransformer,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::AggressiveTransformer => "AGGRESSIVE_TRANSFORMER",
            Self::HateSpeechTransformer => "HATE_SPEECH_TRANSFORMER",
            Self::ProfessionalTransformer => "PROFESSIONAL_TRANSFORMER",
            Self::EducationalTransformer => "EDUCATIONAL_TRANSFORMER",
        }
    }

    /// Exact lookup, case-insensitive. `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.key().eq_ignore_ascii_case(key.trim()))
    }

    /// Lookup that falls back to [`RewriteStyle::Default`].
    pub fn resolve(key: &str) -> Self {
        Self::from_key(key).unwrap_or_default()
    }
}
