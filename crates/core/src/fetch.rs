//! Content fetching from URLs, files, and stdin.
//!
//! URL fetching goes through the [`Fetcher`] trait so the orchestrator can be
//! driven by something other than plain HTTP. [`HttpFetcher`] owns a single
//! `reqwest::Client`; build it once and share it between requests.

use std::fs;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{HarvestError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: "Mozilla/5.0 (compatible; Harvest/0.1)".to_string() }
    }
}

/// Source of page markup.
///
/// Implementations report network failures, timeouts and non-success
/// responses as errors; they never retry.
pub trait Fetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String>> + Send;
}

/// [`Fetcher`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(HarvestError::HttpError)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let response = self
            .client
            .get(url.clone())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarvestError::Status { status: status.as_u16(), url: url.to_string() });
        }

        response.text().await.map_err(|e| self.map_transport_error(e))
    }
}

impl HttpFetcher {
    fn map_transport_error(&self, err: reqwest::Error) -> HarvestError {
        if err.is_timeout() { HarvestError::Timeout { timeout: self.config.timeout } } else { HarvestError::HttpError(err) }
    }
}

/// Parses `url` and checks it is fetchable over HTTP.
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| HarvestError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(HarvestError::InvalidUrl(format!(
            "unsupported scheme '{}', expected http or https",
            other
        ))),
    }
}

/// Fetches HTML content from a URL with a one-off client.
///
/// Prefer a long-lived [`HttpFetcher`] when fetching more than once.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed = parse_url(url)?;
    HttpFetcher::new(config.clone())?.fetch(&parsed).await
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(HarvestError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(HarvestError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(HarvestError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 30);
        assert!(config.user_agent.contains("Harvest"));
    }

    #[test]
    fn test_http_fetcher_keeps_config() {
        let config = FetchConfig { timeout: 7, user_agent: "bot/1".to_string() };
        let fetcher = HttpFetcher::new(config).unwrap();
        assert_eq!(fetcher.config().timeout, 7);
        assert_eq!(fetcher.config().user_agent, "bot/1");
    }

    #[test]
    fn test_parse_url() {
        assert!(parse_url("http://example.com").is_ok());
        assert!(parse_url("https://example.com/path?q=1").is_ok());
        assert!(matches!(parse_url("example.com"), Err(HarvestError::InvalidUrl(_))));
        assert!(matches!(parse_url("ftp://example.com"), Err(HarvestError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_url_invalid() {
        let config = FetchConfig::default();
        let result = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(fetch_url("not-a-url", &config))
        })
        .join()
        .unwrap();

        assert!(matches!(result, Err(HarvestError::InvalidUrl(_))));
    }

    #[test]
    fn test_fetch_file_not_found() {
        let result = fetch_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(HarvestError::FileNotFound(_))));
    }

    #[test]
    fn test_fetch_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<h1>Saved</h1>").unwrap();

        let html = fetch_file(path.to_str().unwrap()).unwrap();
        assert_eq!(html, "<h1>Saved</h1>");
    }
}
