use serde::Deserialize;

/// Listing the original tool was pointed at
pub const DEFAULT_BASE_URL: &str = "https://www.larodan.com/products/category/monounsaturated-fa/";

/// Main configuration structure for the scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// First listing page; later pages live under `page/{n}/`
    pub base_url: String,

    /// Maximum number of product pages processed at the same time
    pub concurrency: u32,

    /// Per-request timeout applied by the HTTP client (seconds)
    pub request_timeout_secs: u64,

    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrency: 3,
            request_timeout_secs: 30,
            accept_invalid_certs: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "LarodanScraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// `Name/Version`, followed by `(+ContactURL; ContactEmail)` when any
    /// contact detail is configured.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// JSON document holding every collected product
    pub products_file: String,

    /// Directory receiving the normalized structure diagrams
    pub images_dir: String,

    /// Directory for transient safety data sheet downloads
    pub scratch_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            products_file: "products/products.json".to_string(),
            images_dir: "products/images".to_string(),
            scratch_dir: "tmp".to_string(),
        }
    }
}
