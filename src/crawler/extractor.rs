//! Link discovery and filtering
//!
//! Scans rendered markdown for link constructs and runs each one through the
//! filtering chain: image-link skip, URL validity, anchor-text exclusion,
//! blocked-domain check, first-occurrence deduplication, and finally the
//! network redirect probe. Local checks run first so a link that can be
//! rejected without a request never costs one.

use crate::crawler::fetcher::redirects_to_blocked;
use crate::url::{is_valid_url, LinkPolicy};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::collections::HashSet;

/// A link that survived all filtering
///
/// The URL passed every validity and policy check, and the anchor text is
/// the first one seen for that URL within a single extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub text: String,
    pub url: String,
}

// Markdown links with an optional leading `!` captured, since the regex
// crate has no lookbehind to exclude image forms directly.
static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(!?)\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Scans markdown for `[text](url)` constructs, excluding `![...]` image forms
///
/// Purely lexical; applies no policy. Matches are returned in document order.
pub fn scan_markdown_links(markdown: &str) -> Vec<(String, String)> {
    MARKDOWN_LINK
        .captures_iter(markdown)
        .filter(|captures| captures[1].is_empty())
        .map(|captures| (captures[2].to_string(), captures[3].to_string()))
        .collect()
}

/// Extracts filtered, deduplicated link candidates from rendered markdown
///
/// Output preserves first-seen order; for a URL appearing more than once the
/// first anchor text wins and later occurrences are silently dropped. The
/// redirect probe runs last and only for links that passed every local check.
pub async fn extract_links(
    markdown: &str,
    policy: &LinkPolicy,
    probe: &Client,
) -> Vec<LinkCandidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for (text, url) in scan_markdown_links(markdown) {
        if text.trim().starts_with('!') {
            tracing::debug!("Skipping image link: {} - {}", text, url);
            continue;
        }

        if !is_valid_url(&url) {
            tracing::debug!("Skipping invalid URL: {}", url);
            continue;
        }

        if policy.is_excluded_text(&text) {
            tracing::debug!("Excluded link text: {} - {}", text, url);
            continue;
        }

        if policy.is_blocked(&url) {
            tracing::debug!("Skipping blocked domain: {}", url);
            continue;
        }

        if !seen.insert(url.clone()) {
            tracing::debug!("Duplicate link skipped: {}", url);
            continue;
        }

        if redirects_to_blocked(probe, &url, policy).await {
            tracing::debug!("Skipping link that redirects to blocked domain: {}", url);
            continue;
        }

        candidates.push(LinkCandidate { text, url });
    }

    tracing::debug!("Extracted {} unique web links", candidates.len());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_finds_links_in_order() {
        let markdown = "See [first](https://a.example/1) and [second](https://b.example/2).";
        let links = scan_markdown_links(markdown);
        assert_eq!(
            links,
            vec![
                ("first".to_string(), "https://a.example/1".to_string()),
                ("second".to_string(), "https://b.example/2".to_string()),
            ]
        );
    }

    #[test]
    fn test_scan_excludes_image_links() {
        let markdown = "![logo](https://a.example/logo.png) and [real](https://a.example/page)";
        let links = scan_markdown_links(markdown);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].0, "real");
    }

    #[test]
    fn test_scan_of_linked_image_keeps_the_sigil() {
        // The inner image breaks the outer construct; the scan reports one
        // match whose text carries the `!` sigil, and extract_links drops it.
        let markdown = "[![banner](https://a.example/b.png)](https://a.example/target)";
        let links = scan_markdown_links(markdown);
        assert_eq!(
            links,
            vec![("![banner".to_string(), "https://a.example/b.png".to_string())]
        );
        assert!(links[0].0.starts_with('!'));
    }

    #[test]
    fn test_scan_plain_text_yields_nothing() {
        assert!(scan_markdown_links("no links here [broken (half)").is_empty());
    }

    #[test]
    fn test_scan_same_url_twice_reports_both() {
        let markdown = "[one](https://a.example/x) [two](https://a.example/x)";
        assert_eq!(scan_markdown_links(markdown).len(), 2);
    }

    // Filtering behavior (validity, exclusion, blocking, dedup, redirect
    // probe) is covered end-to-end in tests/harvest_tests.rs where a mock
    // server backs the probe client.
}
