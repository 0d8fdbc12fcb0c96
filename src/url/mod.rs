//! URL validation and link filtering policy
//!
//! This module provides URL validity checks, public-suffix-aware domain
//! extraction, hierarchical blocked-domain matching, anchor-text exclusion,
//! and the arXiv URL rewrite.

mod domain;
mod exclude;
mod transform;

use crate::config::PolicyConfig;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

pub use domain::{is_blocked_host, registrable_domain};
pub use exclude::{is_excluded_text, ExcludedPhrase};
pub use transform::transform_arxiv_url;

/// Checks whether a string is an absolute URL with a scheme and a host
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => !parsed.scheme().is_empty() && parsed.has_host(),
        Err(_) => false,
    }
}

/// The compiled link filtering policy
///
/// Built once from [`PolicyConfig`] at startup and passed by reference into
/// the extractor and fetcher; immutable for the whole run.
#[derive(Debug, Clone)]
pub struct LinkPolicy {
    blocked_domains: HashSet<String>,
    excluded_phrases: Vec<ExcludedPhrase>,
}

impl LinkPolicy {
    /// Compiles the policy from configuration
    ///
    /// Blocked domains are lowercased; excluded phrases get a pre-compiled
    /// case-insensitive whole-word matcher each.
    pub fn new(config: &PolicyConfig) -> Result<Self, ConfigError> {
        let blocked_domains = config
            .blocked_domains
            .iter()
            .map(|domain| domain.trim().to_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();

        let excluded_phrases = config
            .excluded_link_texts
            .iter()
            .map(|phrase| ExcludedPhrase::new(phrase))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            blocked_domains,
            excluded_phrases,
        })
    }

    /// True if the URL's domain, or any parent domain up to the registrable
    /// domain, is in the blocked set
    pub fn is_blocked(&self, url: &str) -> bool {
        is_blocked_host(url, &self.blocked_domains)
    }

    /// True if the anchor text matches any configured excluded phrase
    pub fn is_excluded_text(&self, text: &str) -> bool {
        is_excluded_text(text, &self.excluded_phrases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_policy(blocked: &[&str], excluded: &[&str]) -> LinkPolicy {
        LinkPolicy::new(&PolicyConfig {
            blocked_domains: blocked.iter().map(|s| s.to_string()).collect(),
            excluded_link_texts: excluded.iter().map(|s| s.to_string()).collect(),
        })
        .unwrap()
    }

    #[test]
    fn test_valid_urls() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1#frag"));
        assert!(is_valid_url("https://127.0.0.1:8080/x"));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("/relative/path"));
        assert!(!is_valid_url("example.com/no-scheme"));
        assert!(!is_valid_url("mailto:someone@example.com")); // no host
    }

    #[test]
    fn test_policy_blocks_hierarchically() {
        let policy = create_test_policy(&["example.com"], &[]);
        assert!(policy.is_blocked("https://example.com/"));
        assert!(policy.is_blocked("https://a.b.example.com/"));
        assert!(!policy.is_blocked("https://notexample.com/"));
    }

    #[test]
    fn test_policy_normalizes_blocked_entries() {
        let policy = create_test_policy(&["  Example.COM "], &[]);
        assert!(policy.is_blocked("https://example.com/"));
    }

    #[test]
    fn test_policy_excluded_text() {
        let policy = create_test_policy(&[], &["unsubscribe"]);
        assert!(policy.is_excluded_text("Unsubscribe"));
        assert!(policy.is_excluded_text("click to unsubscribe now"));
        assert!(!policy.is_excluded_text("subscribe"));
    }

    #[test]
    fn test_empty_policy_permits_everything() {
        let policy = create_test_policy(&[], &[]);
        assert!(!policy.is_blocked("https://example.com/"));
        assert!(!policy.is_excluded_text("anything"));
    }
}
