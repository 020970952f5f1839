//! Sweep Scanner - accessibility audit orchestration.
//!
//! This crate drives the audit pipeline: it resolves a sitemap, opens an
//! isolated browser session per page, injects the axe-core engine, runs it
//! with the WCAG 2 A/AA rule tags and hands the findings to the report
//! store. A page that fails is logged and skipped; it never aborts the run.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sweep_browser::BrowserEngine;
//! use sweep_reports::ReportStore;
//! use sweep_scanner::{AuditScript, PageScanner, ScanOrchestrator};
//! use sweep_sitemap::SitemapResolver;
//!
//! let script = AuditScript::load(&config.audit).await?;
//! let scanner = PageScanner::new(Arc::new(BrowserEngine::new()), script, ReportStore::new("reports"));
//! let orchestrator = ScanOrchestrator::new(SitemapResolver::new()?, Arc::new(scanner))
//!     .with_max_concurrent_scans(2);
//!
//! let outcomes = orchestrator.run("https://example.com/sitemap.xml").await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod audit;
pub mod error;
pub mod orchestrator;
pub mod page;

// Re-export commonly used types
pub use audit::{AuditScript, AUDIT_RULE_TAGS};
pub use error::{Result, ScanError};
pub use orchestrator::{PageAuditor, PageOutcome, ScanOrchestrator};
pub use page::PageScanner;
