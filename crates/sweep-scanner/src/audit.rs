//! The axe-core audit engine as seen from the scanner.
//!
//! The engine is opaque: its source is injected verbatim and its `run`
//! entry point is called with a fixed rule-tag filter.

use crate::error::{Result, ScanError};
use std::sync::Arc;
use std::time::Duration;
use sweep_core::AuditConfig;
use tracing::info;

/// Conformance levels the audit is restricted to.
pub const AUDIT_RULE_TAGS: [&str; 2] = ["wcag2a", "wcag2aa"];

/// Evaluates to `true` once the engine is present in the page.
pub const ENGINE_PRESENCE_PROBE: &str = "typeof window.axe !== 'undefined'";

/// Expression running the engine over the whole document.
#[must_use]
pub fn run_expression() -> String {
    let tags = serde_json::to_string(&AUDIT_RULE_TAGS).unwrap_or_else(|_| "[]".to_string());
    format!("axe.run(document, {{ runOnly: {{ type: 'tag', values: {tags} }} }})")
}

/// Audit engine source, loaded once and shared by every page scan.
#[derive(Debug, Clone)]
pub struct AuditScript {
    source: Arc<str>,
}

impl AuditScript {
    /// Wrap source text that is already in memory.
    pub fn from_source(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Load the engine: the configured local file when set, otherwise a
    /// download of `script_url`. Resolves once with the full source or fails.
    pub async fn load(config: &AuditConfig) -> Result<Self> {
        let (location, source) = match &config.script_path {
            Some(path) => {
                let location = path.display().to_string();
                let source = tokio::fs::read_to_string(path).await.map_err(|e| {
                    ScanError::AuditScriptLoad {
                        location: location.clone(),
                        reason: e.to_string(),
                    }
                })?;
                (location, source)
            }
            None => {
                let timeout = Duration::from_secs(config.download_timeout_secs);
                let source = download(&config.script_url, timeout).await?;
                (config.script_url.clone(), source)
            }
        };

        if source.trim().is_empty() {
            return Err(ScanError::AuditScriptLoad {
                location,
                reason: "script is empty".to_string(),
            });
        }

        info!(location = %location, bytes = source.len(), "loaded audit engine");
        Ok(Self::from_source(source))
    }

    /// Script text to inject
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

async fn download(url: &str, timeout: Duration) -> Result<String> {
    let load_err = |e: reqwest::Error| ScanError::AuditScriptLoad {
        location: url.to_string(),
        reason: e.to_string(),
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(load_err)?;

    client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(load_err)?
        .text()
        .await
        .map_err(load_err)
}
