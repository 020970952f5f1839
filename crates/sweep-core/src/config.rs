//! Configuration management for Sweep.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// axe-core build downloaded when no local script is configured.
pub const DEFAULT_AUDIT_SCRIPT_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/axe-core/4.9.3/axe.min.js";

/// Main application configuration.
///
/// This is loaded from `~/.config/sweep/config.toml` (or platform equivalent)
/// unless a path is given explicitly. If the file doesn't exist, default
/// values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Artifact storage settings
    pub reports: ReportsConfig,
    /// Scanning behavior settings
    pub scanning: ScanningConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Audit engine settings
    pub audit: AuditConfig,
    /// Sitemap retrieval settings
    pub sitemap: SitemapConfig,
    /// Report catalog HTTP settings
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to
    /// defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// Unlike [`AppConfig::load`], a missing file is an error here.
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration (explicit path or default location) and apply
    /// overrides from the process environment.
    ///
    /// Supports the following environment variables:
    /// - `PORT`: Override the report catalog port
    /// - `SWEEP_REPORTS_DIR`: Override the reports directory
    /// - `SWEEP_HEADLESS`: Override browser headless mode (true/false)
    /// - `SWEEP_CONCURRENT_SCANS`: Override the number of pages scanned at once
    /// - `SWEEP_AUDIT_SCRIPT`: Use a local audit engine script
    pub fn load_with_env(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment-style overrides through a lookup function.
    ///
    /// Values that fail to parse are rejected rather than ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PORT") {
            self.server.port = parse_override("PORT", &val)?;
            tracing::debug!("Override server.port from env: {}", self.server.port);
        }

        if let Some(val) = lookup("SWEEP_REPORTS_DIR") {
            self.reports.dir = PathBuf::from(val);
            tracing::debug!("Override reports.dir from env: {}", self.reports.dir.display());
        }

        if let Some(val) = lookup("SWEEP_HEADLESS") {
            self.browser.headless = parse_override("SWEEP_HEADLESS", &val)?;
            tracing::debug!("Override browser.headless from env: {}", self.browser.headless);
        }

        if let Some(val) = lookup("SWEEP_CONCURRENT_SCANS") {
            self.scanning.concurrent_scans = parse_override("SWEEP_CONCURRENT_SCANS", &val)?;
            tracing::debug!(
                "Override scanning.concurrent_scans from env: {}",
                self.scanning.concurrent_scans
            );
        }

        if let Some(val) = lookup("SWEEP_AUDIT_SCRIPT") {
            self.audit.script_path = Some(PathBuf::from(val));
        }

        Ok(())
    }

    /// Reject values the scanner cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scanning.concurrent_scans == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.concurrent_scans".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.scanning.navigation_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.navigation_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.audit.download_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audit.download_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/sweep/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("org", "sweep", "sweep").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn parse_override<T: std::str::FromStr>(field: &str, val: &str) -> ConfigResult<T>
where
    T::Err: std::fmt::Display,
{
    val.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

/// Artifact storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Directory holding the `axe-<slug>.json` / `.html` pairs
    pub dir: PathBuf,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
        }
    }
}

/// Scanning behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Number of pages scanned at once (1 = strict sitemap order)
    pub concurrent_scans: usize,
    /// Navigation plus network-idle budget per page, in seconds
    pub navigation_timeout_secs: u64,
    /// How long the network must stay quiet to count as idle
    pub idle_quiet_ms: u64,
    /// Interval between network activity probes
    pub idle_poll_ms: u64,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            concurrent_scans: 1,
            navigation_timeout_secs: 120,
            idle_quiet_ms: 500,
            idle_poll_ms: 100,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
    /// Chromium executable; auto-detected when unset
    pub executable: Option<PathBuf>,
    /// Pass `--no-sandbox` to Chromium
    pub no_sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            executable: None,
            no_sandbox: true,
        }
    }
}

/// Audit engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Local copy of `axe.min.js`; takes precedence over `script_url`
    pub script_path: Option<PathBuf>,
    /// Where to download the engine from when no local copy is configured
    pub script_url: String,
    /// Download timeout in seconds
    pub download_timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            script_path: None,
            script_url: DEFAULT_AUDIT_SCRIPT_URL.to_string(),
            download_timeout_secs: 60,
        }
    }
}

/// Sitemap retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            user_agent: format!("sweep/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Report catalog HTTP settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen port
    pub port: u16,
    /// Front-end asset directory served at `/`
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            public_dir: PathBuf::from("public"),
        }
    }
}
