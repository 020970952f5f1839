//! Scan orchestrator for sitemap-wide audits.
//!
//! Resolves the sitemap, then audits each page through a [`PageAuditor`]
//! with at most `max_concurrent_scans` pages in flight. A failing or
//! panicking page is logged and recorded; the rest of the run continues.

use crate::error::{Result, ScanError};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use sweep_core::PageUrl;
use sweep_reports::ReportArtifact;
use sweep_sitemap::SitemapResolver;
use tracing::{error, info};

/// Audits a single page and persists its artifacts.
#[async_trait::async_trait]
pub trait PageAuditor: Send + Sync {
    /// Scan `url` and return the written artifact pair.
    async fn audit(&self, url: &PageUrl) -> Result<ReportArtifact>;
}

/// Result of auditing one page from a sitemap.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    /// Page that was audited
    pub url: PageUrl,
    /// Written artifacts on success
    pub artifact: Option<ReportArtifact>,
    /// Error message if the audit failed
    pub error: Option<String>,
}

impl PageOutcome {
    /// Whether the page produced an artifact pair.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.artifact.is_some()
    }
}

/// Orchestrates auditing of every page listed in a sitemap.
pub struct ScanOrchestrator {
    /// Sitemap retrieval
    resolver: SitemapResolver,
    /// Per-page audit unit
    auditor: Arc<dyn PageAuditor>,
    /// Maximum concurrent page audits
    max_concurrent_scans: usize,
}

impl ScanOrchestrator {
    /// Create an orchestrator that audits one page at a time.
    #[must_use]
    pub fn new(resolver: SitemapResolver, auditor: Arc<dyn PageAuditor>) -> Self {
        Self {
            resolver,
            auditor,
            max_concurrent_scans: 1,
        }
    }

    /// Set the maximum number of pages audited at once. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_scans(mut self, max: usize) -> Self {
        self.max_concurrent_scans = max.max(1);
        self
    }

    /// Resolve `sitemap` and audit every listed page.
    ///
    /// Fails only when the sitemap itself cannot be fetched or parsed; in
    /// that case no page is audited. Per-page failures are reported in the
    /// returned outcomes, which follow document order.
    pub async fn run(&self, sitemap: &str) -> Result<Vec<PageOutcome>> {
        let urls = self.resolver.resolve(sitemap).await?;
        Ok(self.scan_urls(urls).await)
    }

    /// Audit `urls` with the configured concurrency bound.
    pub async fn scan_urls(&self, urls: Vec<PageUrl>) -> Vec<PageOutcome> {
        let total = urls.len();
        let mut futures = FuturesUnordered::new();
        let mut outcomes: Vec<Option<PageOutcome>> = vec![None; total];

        for (index, url) in urls.into_iter().enumerate() {
            futures.push(self.scan_page(index, url));

            // Respect concurrency limit
            while futures.len() >= self.max_concurrent_scans {
                if let Some((index, outcome)) = futures.next().await {
                    outcomes[index] = Some(outcome);
                }
            }
        }

        // Collect remaining results
        while let Some((index, outcome)) = futures.next().await {
            outcomes[index] = Some(outcome);
        }

        let outcomes: Vec<PageOutcome> = outcomes.into_iter().flatten().collect();
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        info!(scanned = total - failed, failed, "sitemap scan finished");
        outcomes
    }

    async fn scan_page(&self, index: usize, url: PageUrl) -> (usize, PageOutcome) {
        let result = AssertUnwindSafe(self.auditor.audit(&url))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(ScanError::Panicked {
                    url: url.clone(),
                    reason,
                })
            });

        let outcome = match result {
            Ok(artifact) => PageOutcome {
                url,
                artifact: Some(artifact),
                error: None,
            },
            Err(e) => {
                error!(url = %url, error = %e, "error scanning page");
                PageOutcome {
                    url,
                    artifact: None,
                    error: Some(e.to_string()),
                }
            }
        };

        (index, outcome)
    }
}
