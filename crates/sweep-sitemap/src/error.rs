//! Sitemap error types.

use thiserror::Error;

/// Errors raised while resolving a sitemap.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// Remote sitemap could not be retrieved
    #[error("failed to fetch sitemap {url}: {source}")]
    Fetch {
        /// Requested URL
        url: String,
        /// Underlying transport or status error
        #[source]
        source: reqwest::Error,
    },

    /// Local sitemap could not be read
    #[error("failed to read sitemap {path}: {source}")]
    Read {
        /// Requested path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Sitemap text is not well-formed XML
    #[error("failed to parse sitemap XML: {0}")]
    Parse(#[from] roxmltree::Error),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Result type alias using `SitemapError`.
pub type Result<T> = std::result::Result<T, SitemapError>;
