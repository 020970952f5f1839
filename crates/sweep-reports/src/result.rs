//! The structured outcome of auditing one page.

use crate::error::{ReportError, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sweep_core::PageUrl;

/// Findings for one page as returned by the audit engine.
///
/// The three finding collections are opaque records: they are counted,
/// never interpreted. Every other top-level field of the engine output
/// (engine version, environment, `inapplicable`, ...) is carried through
/// unchanged in `engine_metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Page the scan was requested for
    pub url: PageUrl,
    /// When the audit ran (RFC 3339)
    #[serde(default = "now_rfc3339")]
    pub timestamp: String,
    /// Rules that failed
    #[serde(default)]
    pub violations: Vec<Value>,
    /// Rules that need manual review
    #[serde(default)]
    pub incomplete: Vec<Value>,
    /// Rules that passed
    #[serde(default)]
    pub passes: Vec<Value>,
    /// Remaining engine output
    #[serde(flatten)]
    pub engine_metadata: Map<String, Value>,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl ScanResult {
    /// Build a result from raw engine output.
    ///
    /// The requested URL replaces the engine's own `url`; when the page
    /// ended up somewhere else (redirects) the engine value is kept as
    /// `finalUrl`.
    pub fn from_engine_output(url: &PageUrl, output: Value) -> Result<Self> {
        let mut fields = match output {
            Value::Object(fields) => fields,
            other => {
                return Err(ReportError::InvalidResult(format!(
                    "expected an object, got {}",
                    type_name(&other)
                )))
            }
        };

        if let Some(engine_url) = fields.remove("url") {
            if engine_url.as_str() != Some(url.as_str()) {
                fields.insert("finalUrl".to_string(), engine_url);
            }
        }
        fields.insert("url".to_string(), Value::String(url.as_str().to_string()));

        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Number of violations
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Number of incomplete checks
    #[must_use]
    pub fn incomplete_count(&self) -> usize {
        self.incomplete.len()
    }

    /// Number of passed rules
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// One-line summary, e.g. `3 violations, 1 incomplete`
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} violations, {} incomplete",
            self.violation_count(),
            self.incomplete_count()
        )
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
