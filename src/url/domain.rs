use std::collections::HashSet;
use url::Url;

/// Extracts the public-suffix-aware registrable domain from a URL
///
/// The registrable domain is the organization-level domain+suffix pair,
/// independent of subdomains: `https://news.example.co.uk/x` yields
/// `example.co.uk`. Hosts without a listed public suffix (IP addresses,
/// bare names) fall back to the host itself.
///
/// # Returns
///
/// * `Some(String)` - The lowercase registrable domain
/// * `None` - The string is not an absolute URL with a host
pub fn registrable_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(registrable_for_host(&host))
}

fn registrable_for_host(host: &str) -> String {
    psl::domain_str(host)
        .map(str::to_string)
        .unwrap_or_else(|| host.to_string())
}

/// Checks a URL's hostname against a blocked-domain set
///
/// Matching is hierarchical: the registrable domain is checked first, then
/// every hostname suffix between it and the full host, least specific first.
/// For `a.b.example.com` the candidates are `example.com`, `b.example.com`,
/// and `a.b.example.com`; any hit blocks the URL. Invalid URLs are not
/// blocked (they are rejected earlier by validity checks).
pub fn is_blocked_host(url: &str, blocked: &HashSet<String>) -> bool {
    if blocked.is_empty() {
        return false;
    }

    let host = match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_lowercase)) {
        Some(host) => host,
        None => return false,
    };

    let registrable = registrable_for_host(&host);
    if blocked.contains(&registrable) {
        return true;
    }

    // Walk subdomain levels outward from the registrable domain
    let Some(prefix) = host.strip_suffix(&registrable) else {
        return false;
    };

    let mut candidate = registrable;
    for label in prefix.trim_end_matches('.').rsplit('.') {
        if label.is_empty() {
            continue;
        }
        candidate = format!("{}.{}", label, candidate);
        if blocked.contains(&candidate) {
            return true;
        }
    }

    false
}
