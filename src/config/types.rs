use serde::Deserialize;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for warmupcache
///
/// Every section is optional in the TOML file; command-line flags are applied
/// on top of whatever the file provides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub warmup: WarmupConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Warm-up behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WarmupConfig {
    /// Sitemap URLs to warm, processed in order
    pub sitemaps: Vec<String>,

    /// Number of concurrent workers
    pub parallelism: usize,

    /// Only warm the first N URLs of each sitemap
    pub limit: Option<usize>,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Resolve sitemaps without fetching any page
    #[serde(rename = "dry-run")]
    pub dry_run: bool,

    /// Print the run summary when done
    pub summary: bool,

    /// Show the progress bar
    pub progress: bool,
}

impl Default for WarmupConfig {
    fn default() -> Self {
        Self {
            sitemaps: Vec::new(),
            parallelism: 1,
            limit: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dry_run: false,
            summary: false,
            progress: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Product name sent in the User-Agent header
    pub name: String,

    /// Product version sent in the User-Agent header
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value (`name/version`)
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the markdown report file
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,
}
