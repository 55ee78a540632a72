//! Toxicity scoring with a remote classifier and a local fallback.

use std::sync::Arc;
use std::time::Duration;

use softline_protocols::{ProviderError, ScoreMethod, ToxicityAssessment, ToxicityClassifier};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::fallback::FallbackScorer;

const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);

/// Never fails: any classifier error degrades to [`FallbackScorer`].
pub struct ToxicityScorer {
    classifier: Option<Arc<dyn ToxicityClassifier>>,
    fallback: FallbackScorer,
    batch_delay: Duration,
}

impl ToxicityScorer {
    pub fn new(classifier: Option<Arc<dyn ToxicityClassifier>>) -> Self {
        Self {
            classifier,
            fallback: FallbackScorer::new(),
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    /// Pause between consecutive remote calls in [`score_batch`](Self::score_batch).
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.classifier.is_some()
    }

    pub async fn score(&self, text: &str) -> ToxicityAssessment {
        if let Some(classifier) = &self.classifier {
            match classifier.classify(text).await {
                Ok(score) if score.is_finite() => {
                    return ToxicityAssessment::from_score(score, ScoreMethod::Remote);
                }
                Ok(score) => {
                    warn!(classifier = classifier.id(), score, "Non-finite classifier score, using fallback");
                }
                Err(ProviderError::MissingCredentials(_)) => {
                    debug!(classifier = classifier.id(), "No classifier credentials, using fallback");
                }
                Err(e) => {
                    warn!(classifier = classifier.id(), error = %e, "Classifier failed, using fallback");
                }
            }
        }
        ToxicityAssessment::from_score(self.fallback.score(text), ScoreMethod::Fallback)
    }

    /// Score texts one after another, pausing between remote calls.
    pub async fn score_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<ToxicityAssessment> {
        let mut results = Vec::with_capacity(texts.len());
        for (i, text) in texts.iter().enumerate() {
            if i > 0 && self.has_remote() && !self.batch_delay.is_zero() {
                sleep(self.batch_delay).await;
            }
            results.push(self.score(text.as_ref()).await);
        }
        results
    }
}
