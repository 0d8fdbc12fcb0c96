//! Harvest orchestration
//!
//! The [`Harvester`] drives one run: it extracts links from rendered
//! markdown, fetches each unvisited one, and persists the result. Fetched
//! pages are saved but their own outbound links are not expanded further.

use crate::config::Config;
use crate::crawler::extractor::{extract_links, LinkCandidate};
use crate::crawler::fetcher::{
    build_http_client, build_probe_client, download_pdf, fetch_url, FetchOutcome,
};
use crate::output::{sanitize_filename, unique_path, write_page_file};
use crate::url::{transform_arxiv_url, LinkPolicy};
use crate::Result;
use reqwest::Client;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Counters for one harvest call
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestStats {
    /// Pages rendered and written as markdown files
    pub pages_saved: usize,
    /// PDF documents downloaded
    pub documents_saved: usize,
    /// Links that were fetched (or attempted) and produced nothing
    pub rejected: usize,
    /// Links skipped because their URL was already visited this run
    pub duplicates_skipped: usize,
}

/// Drives link extraction, fetching, and persistence for one run
///
/// Owns the run-scoped visited set: a set of URLs already attempted, keyed by
/// the canonical pre-transform URL. It grows monotonically during the run and
/// is reset only by constructing a new `Harvester`.
pub struct Harvester {
    config: Config,
    policy: LinkPolicy,
    client: Client,
    probe: Client,
    visited: HashSet<String>,
}

impl Harvester {
    /// Creates a harvester with a fresh visited set
    pub fn new(config: Config) -> Result<Self> {
        let policy = LinkPolicy::new(&config.policy)?;
        let client = build_http_client(&config.fetch)?;
        let probe = build_probe_client(&config.fetch)?;

        Ok(Self {
            config,
            policy,
            client,
            probe,
            visited: HashSet::new(),
        })
    }

    /// URLs attempted so far in this run
    pub fn visited(&self) -> &HashSet<String> {
        &self.visited
    }

    /// Renders an HTML document and returns its markdown
    pub fn render_document(&self, html: &str) -> String {
        crate::render::render_html(html)
    }

    /// Extracts links from rendered markdown and persists each unvisited one
    ///
    /// Every attempted URL is recorded as visited exactly once, whatever the
    /// outcome, so a given source URL is fetched at most once per run. Links
    /// are attempted in first-seen order.
    pub async fn process_markdown(
        &mut self,
        markdown: &str,
        output_dir: &Path,
    ) -> Result<HarvestStats> {
        let candidates = extract_links(markdown, &self.policy, &self.probe).await;
        tracing::info!("Found {} links in the content", candidates.len());

        let mut stats = HarvestStats::default();
        for candidate in candidates {
            // Check-and-mark in one step; failed fetches count as visited too
            if !self.visited.insert(candidate.url.clone()) {
                tracing::debug!("Skipping already processed link: {}", candidate.url);
                stats.duplicates_skipped += 1;
                continue;
            }

            if let Err(e) = self
                .persist_candidate(&candidate, output_dir, &mut stats)
                .await
            {
                tracing::error!("Failed to persist {}: {}", candidate.url, e);
                stats.rejected += 1;
            }
        }

        Ok(stats)
    }

    async fn persist_candidate(
        &self,
        candidate: &LinkCandidate,
        output_dir: &Path,
        stats: &mut HarvestStats,
    ) -> Result<()> {
        match fetch_url(&self.client, &candidate.url, &self.policy, &self.config.fetch).await {
            FetchOutcome::Pdf { final_url } => {
                let path = self.document_path(candidate, &final_url, output_dir);
                download_pdf(&self.client, &final_url, &path).await?;
                tracing::info!("Saved PDF: {}", path.display());
                stats.documents_saved += 1;
            }
            FetchOutcome::Page { markdown, .. } => {
                let base = base_name(&candidate.text, &candidate.url);
                let path = unique_path(output_dir, &base, ".md");
                write_page_file(&path, &candidate.text, &candidate.url, &markdown)?;
                tracing::info!("Saved page: {}", path.display());
                stats.pages_saved += 1;
            }
            FetchOutcome::Rejected { reason } => {
                tracing::debug!("Link produced nothing ({}): {}", reason, candidate.url);
                stats.rejected += 1;
            }
        }

        Ok(())
    }

    /// Computes the target path for a PDF download
    ///
    /// Prefers the sanitized anchor text as base name, falling back to the
    /// final URL; arXiv documents get an `arxiv_<id>_` prefix.
    fn document_path(
        &self,
        candidate: &LinkCandidate,
        final_url: &str,
        output_dir: &Path,
    ) -> PathBuf {
        let mut base = base_name(&candidate.text, final_url);

        if let (_, Some(id)) = transform_arxiv_url(final_url) {
            base = format!("arxiv_{}_{}", id, base);
        }

        unique_path(output_dir, &base, ".pdf")
    }
}

fn base_name(text: &str, fallback: &str) -> String {
    let source = if text.trim().is_empty() { fallback } else { text };
    sanitize_filename(source)
}
