use serde::Deserialize;

/// Default capacity of the bounded page buffer between fetcher and matcher
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 20;

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for Sumi-Sift
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub search: SearchConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Capacity of the page buffer between the fetcher and the matcher
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,

    /// Number of fetch workers; 1 keeps pages in input order
    #[serde(rename = "fetch-workers")]
    pub fetch_workers: usize,

    /// Per-request timeout in seconds (0 disables the timeout)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Bound for the URL channel; unbounded when absent
    #[serde(rename = "url-channel-capacity")]
    pub url_channel_capacity: Option<usize>,

    /// Maximum number of URLs to crawl; negative means no limit
    #[serde(rename = "url-limit")]
    pub url_limit: i64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            fetch_workers: 1,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            url_channel_capacity: None,
            url_limit: crate::source::NO_LIMIT,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiSift".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/sumi-sift".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the user agent header value: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// URL provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Path to the CSV file of URLs
    pub path: String,

    /// Zero-based index of the field holding the URL
    #[serde(rename = "url-column")]
    pub url_column: usize,

    /// Field value marking a header row
    #[serde(rename = "header-label")]
    pub header_label: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: "urls.txt".to_string(),
            url_column: 1,
            header_label: "URL".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the results file
    #[serde(rename = "results-path")]
    pub results_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "results.txt".to_string(),
        }
    }
}

/// Search term handling
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Compile the term as a raw regular expression instead of a literal
    pub regex: bool,
}
