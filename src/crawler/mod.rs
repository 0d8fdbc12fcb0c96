//! Link extraction, fetching, and harvest orchestration

mod extractor;
mod fetcher;
mod harvester;

pub use extractor::{extract_links, scan_markdown_links, LinkCandidate};
pub use fetcher::{
    build_http_client, build_probe_client, download_pdf, fetch_url, redirects_to_blocked,
    FetchOutcome, RejectReason,
};
pub use harvester::{Harvester, HarvestStats};
