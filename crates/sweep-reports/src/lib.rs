//! Sweep Reports - artifact persistence and listing.
//!
//! Every successful page scan becomes an artifact pair in a flat reports
//! directory: `axe-<slug>.json` with the full audit result and
//! `axe-<slug>.html`, a minimal page embedding the same data. The directory
//! listing is the index; nothing else is stored.
//!
//! # Example
//!
//! ```rust,ignore
//! use sweep_reports::{list_reports, ReportStore};
//!
//! let store = ReportStore::new("reports");
//! let artifact = store.persist(&scan_result).await?;
//! println!("saved {}", artifact.json_path.display());
//!
//! for entry in list_reports(store.dir()).await? {
//!     println!("{}", entry.file_name);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod catalog;
pub mod error;
pub mod result;
pub mod store;

pub use catalog::{list_reports, ReportCatalogEntry};
pub use error::{ReportError, Result};
pub use result::ScanResult;
pub use store::{ReportArtifact, ReportStore};
