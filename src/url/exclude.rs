use crate::ConfigError;
use regex::Regex;

/// A single excluded anchor-text entry with its compiled matcher
///
/// Matching is case-insensitive and requires either an exact match or a
/// whole-word/phrase occurrence: excluding "ad" must not match "advanced"
/// but must match "Sponsored Ad".
#[derive(Debug, Clone)]
pub struct ExcludedPhrase {
    phrase: String,
    word_match: Regex,
}

impl ExcludedPhrase {
    pub fn new(phrase: &str) -> Result<Self, ConfigError> {
        let normalized = phrase.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ConfigError::InvalidPhrase(
                "excluded phrase is empty".to_string(),
            ));
        }

        let pattern = format!(r"(?i)\b{}\b", regex::escape(&normalized));
        let word_match = Regex::new(&pattern)
            .map_err(|e| ConfigError::InvalidPhrase(format!("'{}': {}", phrase, e)))?;

        Ok(Self {
            phrase: normalized,
            word_match,
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        if text.eq_ignore_ascii_case(&self.phrase) {
            return true;
        }
        self.word_match.is_match(text)
    }
}

/// Checks anchor text against every configured excluded phrase
pub fn is_excluded_text(text: &str, phrases: &[ExcludedPhrase]) -> bool {
    phrases.iter().any(|phrase| phrase.matches(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(entries: &[&str]) -> Vec<ExcludedPhrase> {
        entries.iter().map(|e| ExcludedPhrase::new(e).unwrap()).collect()
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let list = phrases(&["Unsubscribe"]);
        assert!(is_excluded_text("unsubscribe", &list));
        assert!(is_excluded_text("UNSUBSCRIBE", &list));
        assert!(is_excluded_text("  Unsubscribe  ", &list));
    }

    #[test]
    fn test_whole_word_not_substring() {
        let list = phrases(&["ad"]);
        assert!(!is_excluded_text("advanced", &list));
        assert!(!is_excluded_text("roadmap", &list));
        assert!(is_excluded_text("Sponsored Ad", &list));
        assert!(is_excluded_text("ad", &list));
    }

    #[test]
    fn test_phrase_match_inside_text() {
        let list = phrases(&["privacy policy"]);
        assert!(is_excluded_text("Read our Privacy Policy here", &list));
        assert!(!is_excluded_text("privacy policies", &list));
    }

    #[test]
    fn test_no_match() {
        let list = phrases(&["unsubscribe", "view in browser"]);
        assert!(!is_excluded_text("Interesting article", &list));
    }

    #[test]
    fn test_empty_phrase_rejected() {
        assert!(ExcludedPhrase::new("   ").is_err());
    }

    #[test]
    fn test_phrase_with_regex_metacharacters() {
        let list = phrases(&["today's deal"]);
        assert!(is_excluded_text("Get today's deal now", &list));
        assert!(!is_excluded_text("today's dealer", &list));
    }

    #[test]
    fn test_empty_text_not_excluded() {
        let list = phrases(&["unsubscribe"]);
        assert!(!is_excluded_text("", &list));
    }
}
