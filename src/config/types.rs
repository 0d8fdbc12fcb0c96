use serde::Deserialize;

/// Main configuration structure for Mailmark
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// HTTP fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request. Some origins reject
    /// unidentified clients, so the default mimics a desktop browser.
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Optional Referer header sent with page fetches
    #[serde(default)]
    pub referer: Option<String>,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Timeout for redirect-probe HEAD requests in seconds
    #[serde(rename = "probe-timeout-secs", default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Seconds to wait before retrying after HTTP 429
    #[serde(rename = "retry-delay-secs", default = "default_retry_delay")]
    pub retry_delay_secs: u64,

    /// Maximum number of retries after HTTP 429 before giving up
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,
}

/// Output placement configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory where rendered documents are written
    #[serde(rename = "output-dir")]
    pub output_dir: String,

    /// Subdirectory of output-dir for harvested link content
    #[serde(rename = "links-subdir", default = "default_links_subdir")]
    pub links_subdir: String,
}

/// Link filtering policy configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicyConfig {
    /// Domains whose links are never fetched. Matching is public-suffix aware
    /// and hierarchical: "example.com" also blocks "a.example.com".
    #[serde(rename = "blocked-domains", default)]
    pub blocked_domains: Vec<String>,

    /// Anchor texts whose links are skipped (case-insensitive whole-word match)
    #[serde(rename = "excluded-link-texts", default)]
    pub excluded_link_texts: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            referer: None,
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            retry_delay_secs: default_retry_delay(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_retry_delay() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    3
}

fn default_links_subdir() -> String {
    "links".to_string()
}
