//! Lexical pre-filter.

/// Fixed negative-keyword set. Matching is by substring, not by token.
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "hate",
    "stupid",
    "ugly",
    "terrible",
    "awful",
    "horrible",
    "disgusting",
    "bad",
    "wrong",
    "fail",
    "loser",
    "idiot",
    "moron",
    "dumb",
    "suck",
    "annoying",
    "angry",
    "sad",
    "depressed",
    "boring",
    "useless",
    "hopeless",
];

const MIN_LENGTH: usize = 3;

/// Decides whether a fragment is worth scoring at all.
#[derive(Debug, Clone, Default)]
pub struct KeywordGate {
    extra: Vec<String>,
}

impl KeywordGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add keywords on top of the built-in set. Entries are lowercased;
    /// blank entries are ignored.
    pub fn with_extra_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { extra }
    }

    pub fn should_consider(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_LENGTH {
            return false;
        }
        let lower = trimmed.to_lowercase();
        NEGATIVE_KEYWORDS.iter().any(|k| lower.contains(k))
            || self.extra.iter().any(|k| lower.contains(k.as_str()))
    }
}
