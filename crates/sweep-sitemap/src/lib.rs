//! Sitemap resolution.
//!
//! Turns a sitemap reference (an `http(s)` URL or a local path) into the
//! ordered list of page URLs it lists. Any failure here is fatal for a run:
//! nothing is scanned when the sitemap cannot be fetched or parsed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod parser;
pub mod resolver;

pub use error::{Result, SitemapError};
pub use parser::parse_page_urls;
pub use resolver::{SitemapDocument, SitemapResolver, SitemapSource};
