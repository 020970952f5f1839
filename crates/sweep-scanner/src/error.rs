//! Scanner error types.

use std::time::Duration;
use sweep_core::PageUrl;
use thiserror::Error;

/// Errors raised while auditing pages.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Navigation plus network settle exceeded the page budget
    #[error("Navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout {
        /// Page being scanned
        url: PageUrl,
        /// Budget that elapsed
        timeout: Duration,
    },

    /// The audit engine could not be injected or did not produce a result
    #[error("Audit engine failed on {url}: {reason}")]
    Audit {
        /// Page being scanned
        url: PageUrl,
        /// What went wrong
        reason: String,
    },

    /// The audit engine source could not be obtained
    #[error("Failed to load audit engine from {location}: {reason}")]
    AuditScriptLoad {
        /// File path or URL
        location: String,
        /// What went wrong
        reason: String,
    },

    /// Page scan panicked
    #[error("Scan of {url} panicked: {reason}")]
    Panicked {
        /// Page being scanned
        url: PageUrl,
        /// Panic payload, when it was a string
        reason: String,
    },

    /// Browser session failure
    #[error("Browser error: {0}")]
    Browser(#[from] sweep_browser::BrowserError),

    /// Artifact could not be written
    #[error("Report error: {0}")]
    Report(#[from] sweep_reports::ReportError),

    /// Sitemap could not be resolved
    #[error("Sitemap error: {0}")]
    Sitemap(#[from] sweep_sitemap::SitemapError),
}

/// Result type alias using `ScanError`.
pub type Result<T> = std::result::Result<T, ScanError>;
