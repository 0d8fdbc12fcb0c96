//! HTTP fetching and resource classification
//!
//! This module handles all network traffic for the harvester:
//! - Building the fetch and redirect-probe HTTP clients
//! - Fetching a URL with bounded 429 retries and redirect following
//! - Re-checking the post-redirect URL against the blocking policy
//! - Classifying the final resource as PDF, renderable page, or rejected
//! - Streaming PDF downloads to disk

use crate::config::FetchConfig;
use crate::render;
use crate::url::{transform_arxiv_url, LinkPolicy};
use crate::HarvestError;
use reqwest::{header, redirect::Policy, Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;

/// Result of fetching and classifying one URL
#[derive(Debug)]
pub enum FetchOutcome {
    /// The resource is a PDF document
    ///
    /// The body is not buffered here; the caller streams it to disk
    /// separately via [`download_pdf`].
    Pdf {
        /// Final URL after redirects and the arXiv rewrite
        final_url: String,
    },

    /// The resource is a text page, rendered to markdown
    Page {
        /// Rendered page content
        markdown: String,
        /// Final URL after redirects
        final_url: String,
    },

    /// The resource was rejected; nothing will be persisted
    Rejected { reason: RejectReason },
}

/// Why a fetched URL produced nothing
#[derive(Debug, Error)]
pub enum RejectReason {
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("rate limited, gave up after {0} retries")]
    RateLimitExhausted(u32),

    #[error("redirected to blocked destination {0}")]
    BlockedRedirect(String),

    #[error("unsupported content type '{0}'")]
    UnsupportedContent(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Builds the main HTTP client
///
/// Redirects are followed automatically (limit 10). The user agent comes from
/// configuration and defaults to a browser-like identity because some origins
/// reject unidentified clients.
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    let mut headers = header::HeaderMap::new();
    if let Some(referer) = &config.referer {
        if let Ok(value) = header::HeaderValue::from_str(referer) {
            headers.insert(header::REFERER, value);
        }
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(10))
        .default_headers(headers)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the redirect-probe client
///
/// Probes must see the redirect itself, so this client never follows one.
pub fn build_probe_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.probe_timeout_secs))
        .redirect(Policy::none())
        .build()
}

/// Checks whether a URL immediately redirects to a blocked destination
///
/// Sends a HEAD request without following redirects and evaluates the
/// `Location` target (resolved against the request URL when relative)
/// against the blocking policy. A network failure fails open: the URL is
/// treated as not blocked, and the condition is logged.
pub async fn redirects_to_blocked(probe: &Client, url: &str, policy: &LinkPolicy) -> bool {
    let response = match probe.head(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Redirect check failed for {}: {}", url, e);
            return false;
        }
    };

    if !response.status().is_redirection() {
        return false;
    }

    let location = match response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(location) => location,
        None => return false,
    };

    let target = match response.url().join(location) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => location.to_string(),
    };

    policy.is_blocked(&target)
}

/// Fetches a URL and classifies the final resource
///
/// # Behavior
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | HTTP 429 | Retried up to `max-retries` times after `retry-delay-secs` |
/// | Other non-success status | `Rejected(HttpStatus)` |
/// | Final URL blocked after redirects | `Rejected(BlockedRedirect)` |
/// | PDF content type, `.pdf` path, or arXiv id | `Pdf` |
/// | Non-`text/*` content type | `Rejected(UnsupportedContent)` |
/// | `text/*` body | parsed, rendered, `Page` |
/// | Timeout / DNS / connection failure | `Rejected(Transport)` |
///
/// The arXiv rewrite is applied to the final URL, and the rewritten URL is
/// canonical for classification and downstream naming. This never returns an
/// error and never panics; every failure is a `Rejected` outcome.
pub async fn fetch_url(
    client: &Client,
    url: &str,
    policy: &LinkPolicy,
    config: &FetchConfig,
) -> FetchOutcome {
    let mut retries: u32 = 0;

    loop {
        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return transport_rejection(url, &e),
        };

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            if retries >= config.max_retries {
                tracing::warn!(
                    "Rate limited on {} and out of retries ({})",
                    url,
                    config.max_retries
                );
                return FetchOutcome::Rejected {
                    reason: RejectReason::RateLimitExhausted(retries),
                };
            }
            retries += 1;
            tracing::warn!(
                "Received 429 for {}, retry {}/{} in {}s",
                url,
                retries,
                config.max_retries,
                config.retry_delay_secs
            );
            tokio::time::sleep(Duration::from_secs(config.retry_delay_secs)).await;
            continue;
        }

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::Rejected {
                reason: RejectReason::HttpStatus(status.as_u16()),
            };
        }

        // Re-check the destination we actually landed on
        let final_url = response.url().to_string();
        if policy.is_blocked(&final_url) {
            tracing::warn!("{} redirected to blocked destination {}", url, final_url);
            return FetchOutcome::Rejected {
                reason: RejectReason::BlockedRedirect(final_url),
            };
        }

        let (final_url, arxiv_id) = transform_arxiv_url(&final_url);

        let content_type = parse_content_type(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );

        if is_pdf_resource(&content_type, &final_url, arxiv_id.is_some()) {
            tracing::debug!("Detected PDF: {}", final_url);
            return FetchOutcome::Pdf { final_url };
        }

        if !content_type.starts_with("text/") {
            tracing::debug!(
                "Skipping non-text content: {} ({})",
                final_url,
                content_type
            );
            return FetchOutcome::Rejected {
                reason: RejectReason::UnsupportedContent(content_type),
            };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return transport_rejection(url, &e),
        };

        let markdown = render::render_html(&body);
        return FetchOutcome::Page { markdown, final_url };
    }
}

/// Streams a document to disk in fixed-size chunks
///
/// The body is never buffered whole; each chunk is written as it arrives.
/// Returns the number of bytes written.
pub async fn download_pdf(client: &Client, url: &str, path: &Path) -> crate::Result<u64> {
    tracing::info!("Attempting to download PDF from: {}", url);

    let mut response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    let mut file = tokio::fs::File::create(path).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await.map_err(|source| HarvestError::Http {
        url: url.to_string(),
        source,
    })? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    tracing::info!("Downloaded PDF: {} ({} bytes)", path.display(), written);
    Ok(written)
}

/// Normalizes a Content-Type header to its lowercase media type
fn parse_content_type(header: Option<&str>) -> String {
    header
        .unwrap_or("")
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

fn is_pdf_resource(content_type: &str, final_url: &str, has_arxiv_id: bool) -> bool {
    content_type == "application/pdf"
        || final_url.to_ascii_lowercase().ends_with(".pdf")
        || has_arxiv_id
}

fn transport_rejection(url: &str, error: &reqwest::Error) -> FetchOutcome {
    let description = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    };

    tracing::warn!("Error fetching {}: {}", url, description);
    FetchOutcome::Rejected {
        reason: RejectReason::Transport(description),
    }
}
