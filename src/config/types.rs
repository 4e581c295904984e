use serde::Deserialize;

/// Environment variable consulted for the sink credential when none is inline
pub const DEFAULT_API_KEY_ENV: &str = "CRAWLER_API_KEY";

/// Main configuration structure for Article Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub sink: SinkConfig,
}

/// Traversal bounds and politeness settings
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Address the traversal starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Maximum number of distinct pages visited in one run
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Pause between consecutive fetches (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Hard deadline for every fetch and for the upload (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// What to pull out of each page and which links to follow
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Selector for the page heading; the first match wins
    #[serde(rename = "title-selector", default = "default_title_selector")]
    pub title_selector: String,

    /// Selector for the paragraph blocks making up the content preview
    #[serde(rename = "content-selector", default = "default_content_selector")]
    pub content_selector: String,

    /// Only hrefs starting with this path are followed
    #[serde(rename = "link-prefix", default = "default_link_prefix")]
    pub link_prefix: String,

    /// Cap on candidate links taken from a single page
    #[serde(rename = "max-links-per-page", default = "default_max_links_per_page")]
    pub max_links_per_page: usize,

    /// Language tag stamped on every record
    #[serde(default = "default_language")]
    pub language: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// Free-form comment shown in parentheses
    #[serde(default = "default_comment")]
    pub comment: String,
}

/// Where the gathered batch is delivered
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Batch endpoint accepting `{"pages": [...]}`
    pub endpoint: String,

    /// Inline credential; takes precedence over the environment
    #[serde(rename = "api-key", default)]
    pub api_key: Option<String>,

    /// Environment variable holding the credential
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,
}

impl SinkConfig {
    /// Resolves the credential, inline value first, then the environment
    ///
    /// Empty or whitespace-only values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            title_selector: default_title_selector(),
            content_selector: default_content_selector(),
            link_prefix: default_link_prefix(),
            max_links_per_page: default_max_links_per_page(),
            language: default_language(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            comment: default_comment(),
        }
    }
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_title_selector() -> String {
    "h1".to_string()
}

fn default_content_selector() -> String {
    ".mw-parser-output p".to_string()
}

fn default_link_prefix() -> String {
    "/wiki/".to_string()
}

fn default_max_links_per_page() -> usize {
    10
}

fn default_language() -> String {
    "en".to_string()
}

fn default_crawler_name() -> String {
    "OggoleCrawler".to_string()
}

fn default_crawler_version() -> String {
    "1.0".to_string()
}

fn default_comment() -> String {
    "Educational purposes".to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}
