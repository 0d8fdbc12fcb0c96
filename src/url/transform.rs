use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static ARXIV_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"arxiv\.org/(?:abs|pdf)/(\d+\.\d+)").unwrap());

/// Rewrites an arXiv abstract or PDF URL to its canonical PDF URL
///
/// `https://arxiv.org/abs/2101.00001` becomes
/// `https://arxiv.org/pdf/2101.00001.pdf` with identifier `2101.00001`.
/// Any other URL is returned unchanged with no identifier.
///
/// # Returns
///
/// The (possibly rewritten) URL and the extracted arXiv identifier, if any.
pub fn transform_arxiv_url(url: &str) -> (String, Option<String>) {
    let is_arxiv_host = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h == "arxiv.org" || h.ends_with(".arxiv.org")))
        .unwrap_or(false);

    if !is_arxiv_host {
        return (url.to_string(), None);
    }

    match ARXIV_ID.captures(url) {
        Some(captures) => {
            let id = captures[1].to_string();
            let canonical = format!("https://arxiv.org/pdf/{}.pdf", id);
            if canonical != url {
                tracing::info!("Transformed arXiv URL: {} -> {}", url, canonical);
            }
            (canonical, Some(id))
        }
        None => {
            tracing::warn!("Could not extract arXiv ID from URL: {}", url);
            (url.to_string(), None)
        }
    }
}
