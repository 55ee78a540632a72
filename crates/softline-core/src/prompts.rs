//! Static rewrite instructions, one per [`RewriteStyle`].

use softline_protocols::RewriteStyle;

const OUTPUT_RULE: &str = "Reply with the rewritten text only, without quotes or commentary.";

const DEFAULT_PROMPT: &str = "You moderate online discussion. Rewrite the user's message so it \
carries the same meaning and sentiment without toxic, offensive or insulting language. Remove \
profanity and slurs, keep the writer's point, and keep the tone respectful. If the message has no \
constructive content, turn it into a neutral statement. Never add anything inflammatory.";

const AGGRESSIVE_PROMPT: &str = "You de-escalate conflict. Rewrite the user's hostile or \
confrontational message as a calm, assertive statement. Turn threats into concerns and personal \
attacks into observations about the issue. Prefer \"I\" statements over accusatory \"you\" \
statements, and keep the writer's right to disagree.";

const HATE_SPEECH_PROMPT: &str = "You neutralize hate speech. Rewrite the user's message without \
discriminatory language, slurs or generalizations about groups. Keep any legitimate concern it \
raises, framed around behaviour or policy instead of identity, and use inclusive wording.";

const PROFESSIONAL_PROMPT: &str = "You edit workplace communication. Rewrite the user's message in \
a measured, professional tone suitable for colleagues. Replace emotional outbursts and personal \
attacks with constructive feedback while keeping the core message.";

const EDUCATIONAL_PROMPT: &str = "You edit content for learning environments. Rewrite the user's \
message as constructive, age-appropriate language. Turn negative criticism into feedback, and \
offensive remarks into respectful questions or observations that encourage understanding.";

fn instruction(style: RewriteStyle) -> &'static str {
    match style {
        RewriteStyle::Default => DEFAULT_PROMPT,
        RewriteStyle::AggressiveTransformer => AGGRESSIVE_PROMPT,
        RewriteStyle::HateSpeechTransformer => HATE_SPEECH_PROMPT,
        RewriteStyle::ProfessionalTransformer => PROFESSIONAL_PROMPT,
        RewriteStyle::EducationalTransformer => EDUCATIONAL_PROMPT,
    }
}

/// System prompt for `style_key`. Unknown keys get the default template.
pub fn system_prompt(style_key: &str) -> String {
    format!("{}\n\n{}", instruction(RewriteStyle::resolve(style_key)), OUTPUT_RULE)
}

/// Every known style key with a one-line summary.
pub fn available_styles() -> Vec<(&'static str, &'static str)> {
    RewriteStyle::ALL
        .into_iter()
        .map(|style| (style.key(), summary(style)))
        .collect()
}

fn summary(style: RewriteStyle) -> &'static str {
    match style {
        RewriteStyle::Default => "General detoxification",
        RewriteStyle::AggressiveTransformer => "Conflict de-escalation",
        RewriteStyle::HateSpeechTransformer => "Hate-speech neutralization",
        RewriteStyle::ProfessionalTransformer => "Workplace professionalism",
        RewriteStyle::EducationalTransformer => "Educational tone",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key() {
        let prompt = system_prompt("PROFESSIONAL_TRANSFORMER");
        assert!(prompt.starts_with(PROFESSIONAL_PROMPT));
        assert!(prompt.ends_with(OUTPUT_RULE));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(system_prompt("hate_speech_transformer"), system_prompt("HATE_SPEECH_TRANSFORMER"));
    }

    #[test]
    fn test_unknown_key_uses_default() {
        assert_eq!(system_prompt("NOPE"), system_prompt("DEFAULT"));
        assert_eq!(system_prompt(""), system_prompt("DEFAULT"));
    }

    #[test]
    fn test_templates_are_distinct() {
        let prompts: std::collections::HashSet<String> = RewriteStyle::ALL
            .into_iter()
            .map(|s| system_prompt(s.key()))
            .collect();
        assert_eq!(prompts.len(), 5);
    }

    #[test]
    fn test_available_styles() {
        let styles = available_styles();
        assert_eq!(styles.len(), 5);
        assert_eq!(styles[0].0, "DEFAULT");
    }
}
