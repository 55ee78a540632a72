//! Toxicity classification types and trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Scores strictly above this are considered toxic.
pub const TOXIC_THRESHOLD: f64 = 0.5;

/// A remote classifier returning the probability of the toxic class.
#[async_trait]
pub trait ToxicityClassifier: Send + Sync {
    fn id(&self) -> &str;

    /// Returns a finite score in `[0, 1]`, or an error when the call fails
    /// or the score cannot be extracted.
    async fn classify(&self, text: &str) -> Result<f64, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMethod {
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToxicityAssessment {
    pub toxicity_score: f64,
    pub is_toxic: bool,
    /// 0 at the decision boundary, 1 at either extreme.
    pub confidence: f64,
    pub method: ScoreMethod,
}

impl ToxicityAssessment {
    pub fn from_score(score: f64, method: ScoreMethod) -> Self {
        let toxicity_score = score.clamp(0.0, 1.0);
        Self {
            toxicity_score,
            is_toxic: toxicity_score > TOXIC_THRESHOLD,
            confidence: (toxicity_score - TOXIC_THRESHOLD).abs() * 2.0,
            method,
        }
    }

    pub fn level(&self) -> ToxicityLevel {
        ToxicityLevel::from_score(self.toxicity_score)
    }
}

/// Human-readable bucket for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToxicityLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ToxicityLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Self::VeryLow
        } else if score < 0.4 {
            Self::Low
        } else if score < 0.6 {
            Self::Medium
        } else if score < 0.8 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}
