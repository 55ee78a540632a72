//! Deterministic keyword and heuristic toxicity scorer.

const TOXIC_KEYWORDS: &[&str] = &[
    "fuck", "shit", "damn", "bitch", "asshole", "idiot", "moron", "stupid", "hate", "kill", "die",
    "fucking", "bullshit", "crap", "suck",
];

const AGGRESSIVE_PHRASES: &[&str] = &[
    "you're",
    "you are",
    "you should",
    "you need to",
    "you must",
    "terrible",
    "awful",
    "horrible",
    "disgusting",
    "pathetic",
];

const KEYWORD_WEIGHT: f64 = 0.3;
const PHRASE_WEIGHT: f64 = 0.1;
const EXCLAMATION_BONUS: f64 = 0.2;
const EXCLAMATION_LIMIT: usize = 2;
const CAPS_BONUS: f64 = 0.1;
const CAPS_RATIO: f64 = 0.3;

/// Scores text with no network access. The same input always yields the
/// same score.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackScorer;

impl FallbackScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, text: &str) -> f64 {
        let lower = text.to_lowercase();
        let mut score = 0.0;

        // Each keyword counts once regardless of how often it occurs.
        score += TOXIC_KEYWORDS.iter().filter(|k| lower.contains(*k)).count() as f64 * KEYWORD_WEIGHT;
        score += AGGRESSIVE_PHRASES.iter().filter(|p| lower.contains(*p)).count() as f64 * PHRASE_WEIGHT;

        if text.chars().filter(|c| *c == '!').count() > EXCLAMATION_LIMIT {
            score += EXCLAMATION_BONUS;
        }

        let length = text.chars().count();
        let upper = text.chars().filter(char::is_ascii_uppercase).count();
        if length > 0 && upper as f64 > length as f64 * CAPS_RATIO {
            score += CAPS_BONUS;
        }

        score.clamp(0.0, 1.0)
    }
}
