//! Sitemap retrieval.

use crate::error::{Result, SitemapError};
use crate::parser::parse_page_urls;
use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use sweep_core::{PageUrl, SitemapConfig};
use tracing::{debug, info};
use url::Url;

/// Where a sitemap lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapSource {
    /// Retrieved over HTTP(S)
    Remote(Url),
    /// Read from the local filesystem
    Local(PathBuf),
}

impl SitemapSource {
    /// Classify a reference: anything parsing as an `http`/`https` URL is
    /// remote, everything else is treated as a path.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        match Url::parse(reference) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::Remote(url),
            _ => Self::Local(PathBuf::from(reference)),
        }
    }
}

impl fmt::Display for SitemapSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Raw sitemap text and its origin. Discarded once URLs are extracted.
#[derive(Debug, Clone)]
pub struct SitemapDocument {
    /// Where the text came from
    pub source: SitemapSource,
    /// Unparsed document body
    pub content: String,
}

impl SitemapDocument {
    /// Extract the listed page URLs.
    pub fn page_urls(&self) -> Result<Vec<PageUrl>> {
        parse_page_urls(&self.content)
    }
}

/// Fetches sitemaps and extracts their page URLs.
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    client: Client,
}

impl SitemapResolver {
    /// Create a resolver with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(&SitemapConfig::default())
    }

    /// Create a resolver with explicit HTTP settings.
    pub fn with_config(config: &SitemapConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SitemapError::Client(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Retrieve the sitemap text. No retries: any failure is returned as is.
    pub async fn fetch(&self, source: &SitemapSource) -> Result<SitemapDocument> {
        let content = match source {
            SitemapSource::Remote(url) => {
                debug!(url = %url, "fetching remote sitemap");
                let fetch_err = |source| SitemapError::Fetch {
                    url: url.to_string(),
                    source,
                };
                self.client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(fetch_err)?
                    .text()
                    .await
                    .map_err(fetch_err)?
            }
            SitemapSource::Local(path) => {
                debug!(path = %path.display(), "reading local sitemap");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| SitemapError::Read {
                        path: path.display().to_string(),
                        source,
                    })?
            }
        };

        Ok(SitemapDocument {
            source: source.clone(),
            content,
        })
    }

    /// Fetch and parse a sitemap reference into its page URLs.
    pub async fn resolve(&self, reference: &str) -> Result<Vec<PageUrl>> {
        let source = SitemapSource::parse(reference);
        let document = self.fetch(&source).await?;
        let urls = document.page_urls()?;

        info!(count = urls.len(), sitemap = %source, "found urls in sitemap");
        Ok(urls)
    }
}
