//! Sweep Core - Foundation crate for the Sweep accessibility scanner.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other Sweep crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Shared newtypes (`PageUrl`, `TimestampSlug`, `SessionId`)
//!
//! # Example
//!
//! ```rust
//! use sweep_core::{AppConfig, TimestampSlug};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.server.port, 3000);
//!
//! let slug = TimestampSlug::now();
//! assert!(!slug.as_str().contains(':'));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, AuditConfig, BrowserConfig, ReportsConfig, ScanningConfig, ServerConfig,
    SitemapConfig, DEFAULT_AUDIT_SCRIPT_URL,
};
pub use error::{ConfigError, ConfigResult, Result, SweepError};
pub use types::{PageUrl, SessionId, TimestampSlug};
