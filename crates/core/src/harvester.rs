//! Main scraping API.
//!
//! [`Harvester`] runs the whole pipeline for one request: validate the
//! rules, fetch the page, parse it and evaluate the rules once. Rule errors
//! surface before any network I/O and fetch errors before any extraction.
//!
//! # Example
//!
//! ```rust,no_run
//! use harvest_core::{Harvester, HarvesterConfig, RuleSurface, ScrapeRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> harvest_core::Result<()> {
//! let harvester = Harvester::new(HarvesterConfig::builder().timeout(10).build())?;
//!
//! let request = ScrapeRequest::new("https://example.com")
//!     .selector("title", RuleSurface::new("h1"))
//!     .selector("links", RuleSurface::new("a").with_all(true));
//!
//! let response = harvester.scrape(&request).await?;
//! println!("{:?}", response.data);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::extract::{ExtractedData, extract_fields};
#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, Fetcher, HttpFetcher, parse_url};
use crate::parse::Document;
use crate::rule::{RuleSet, RuleSurface, RuleSurfaces};
use crate::Result;

/// A scrape request: where to look and what to take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    pub selectors: RuleSurfaces,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), selectors: RuleSurfaces::new() }
    }

    /// Adds (or replaces) the rule for `field`.
    pub fn selector(mut self, field: impl Into<String>, surface: RuleSurface) -> Self {
        self.selectors.insert(field.into(), surface);
        self
    }
}

/// Successful scrape output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub data: ExtractedData,
}

/// Parses `html` and applies `rules` to it.
///
/// The document lives only for the duration of this call.
pub fn extract_html(html: &str, rules: &RuleSet) -> Result<ExtractedData> {
    let doc = Document::parse(html);
    extract_fields(&doc, rules)
}

/// Configuration for a [`Harvester`].
///
/// # Example
///
/// ```rust
/// use harvest_core::HarvesterConfig;
///
/// let config = HarvesterConfig::builder()
///     .timeout(5)
///     .user_agent("my-bot/1.0")
///     .build();
/// assert_eq!(config.timeout, 5);
/// ```
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HarvesterConfig {
    /// Page fetch timeout in seconds (default: 30).
    pub timeout: u64,

    /// User-Agent sent with every page request.
    pub user_agent: String,
}

#[cfg(feature = "fetch")]
impl Default for HarvesterConfig {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self { timeout: fetch.timeout, user_agent: fetch.user_agent }
    }
}

#[cfg(feature = "fetch")]
impl HarvesterConfig {
    /// Creates a new builder for HarvesterConfig.
    pub fn builder() -> HarvesterConfigBuilder {
        HarvesterConfigBuilder::new()
    }

    /// The fetch settings this configuration implies.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig { timeout: self.timeout, user_agent: self.user_agent.clone() }
    }
}

/// Builder for HarvesterConfig.
#[cfg(feature = "fetch")]
pub struct HarvesterConfigBuilder {
    config: HarvesterConfig,
}

#[cfg(feature = "fetch")]
impl HarvesterConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: HarvesterConfig::default() }
    }

    /// Sets the fetch timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.timeout = value;
        self
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.user_agent = value.into();
        self
    }

    pub fn build(self) -> HarvesterConfig {
        self.config
    }
}

#[cfg(feature = "fetch")]
impl Default for HarvesterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch, parse and extract pipeline.
///
/// The fetcher is the only stateful part and is meant to be shared: clone
/// the harvester (or put it behind an `Arc`) rather than building one per
/// request.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct Harvester<F = HttpFetcher> {
    fetcher: F,
}

#[cfg(feature = "fetch")]
impl Harvester<HttpFetcher> {
    /// Creates a harvester fetching over HTTP.
    pub fn new(config: HarvesterConfig) -> Result<Self> {
        Ok(Self { fetcher: HttpFetcher::new(config.fetch_config())? })
    }
}

#[cfg(feature = "fetch")]
impl<F: Fetcher> Harvester<F> {
    /// Creates a harvester around any [`Fetcher`].
    pub fn with_fetcher(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs a full scrape.
    ///
    /// # Errors
    ///
    /// - rule and URL errors, before anything is fetched
    /// - fetch errors, before anything is extracted
    /// - [`HarvestError::IndexOutOfRange`](crate::HarvestError::IndexOutOfRange)
    ///   if any `order` rule asked for a missing match
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResponse> {
        let rules = RuleSet::from_surfaces(&request.selectors)?;
        let url = parse_url(&request.url)?;

        let html = self.fetcher.fetch(&url).await?;
        let data = extract_html(&html, &rules)?;

        Ok(ScrapeResponse { data })
    }

    /// Validates `surfaces` and extracts from already-fetched markup.
    pub fn extract(&self, html: &str, surfaces: &RuleSurfaces) -> Result<ScrapeResponse> {
        let rules = RuleSet::from_surfaces(surfaces)?;
        Ok(ScrapeResponse { data: extract_html(html, &rules)? })
    }
}

/// Fetches `url` and applies `surfaces` with default settings.
#[cfg(feature = "fetch")]
pub async fn fetch_and_extract(url: &str, surfaces: &RuleSurfaces) -> Result<ScrapeResponse> {
    let harvester = Harvester::new(HarvesterConfig::default())?;
    let request = ScrapeRequest { url: url.to_string(), selectors: surfaces.clone() };
    harvester.scrape(&request).await
}
