//! Shared types used across the Sweep workspace.
//!
//! This module defines the newtypes that travel between the sitemap
//! resolver, the page scanner and the report store.

use crate::error::SweepError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

/// A page location taken verbatim from a sitemap `loc` entry.
///
/// No normalization or scheme validation is applied: the scanner receives
/// exactly what the sitemap contains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageUrl(String);

impl PageUrl {
    /// Wrap a location string.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PageUrl {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for PageUrl {
    fn from(url: String) -> Self {
        Self(url)
    }
}

/// Identifier of one isolated browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new random `SessionId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Filesystem-safe, lexicographically sortable stamp naming an artifact pair.
///
/// Derived from the UTC ISO-8601 instant with `:` and `.` replaced by `-`,
/// e.g. `2024-01-01T12-30-05-123Z`. A second artifact claiming an already
/// used stamp gets a `_N` disambiguator appended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimestampSlug(String);

impl TimestampSlug {
    /// Slug for the current instant.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(&Utc::now())
    }

    /// Slug for a specific instant.
    #[must_use]
    pub fn from_datetime(dt: &DateTime<Utc>) -> Self {
        Self(dt.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string())
    }

    /// Parse a slug read back from an artifact filename.
    ///
    /// Accepts second-precision stamps (`2024-01-01T00-00-00`), millisecond
    /// stamps (`2024-01-01T00-00-00-000Z`) and either form with a `_N`
    /// disambiguator.
    ///
    /// # Errors
    /// Returns error if the text does not have the slug shape.
    pub fn parse(slug: &str) -> Result<Self, SweepError> {
        if slug_regex().is_match(slug) {
            Ok(Self(slug.to_string()))
        } else {
            Err(SweepError::Validation(format!(
                "invalid timestamp slug: '{slug}'"
            )))
        }
    }

    /// The same stamp with a collision disambiguator appended.
    #[must_use]
    pub fn with_disambiguator(&self, n: u32) -> Self {
        Self(format!("{}_{n}", self.timestamp_part()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The stamp without any disambiguator.
    #[must_use]
    pub fn timestamp_part(&self) -> &str {
        self.0.split_once('_').map_or(self.0.as_str(), |(ts, _)| ts)
    }

    /// Collision counter, `0` when none was appended.
    #[must_use]
    pub fn disambiguator(&self) -> u32 {
        self.0
            .split_once('_')
            .and_then(|(_, n)| n.parse().ok())
            .unwrap_or(0)
    }
}

fn slug_regex() -> &'static Regex {
    static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
    SLUG_REGEX.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}-\d{2}-\d{2}(-\d{3}Z)?(_\d+)?$").expect("valid regex")
    })
}

impl Ord for TimestampSlug {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp_part()
            .cmp(other.timestamp_part())
            .then_with(|| self.disambiguator().cmp(&other.disambiguator()))
    }
}

impl PartialOrd for TimestampSlug {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimestampSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_page_url_is_verbatim() {
        let url = PageUrl::new("  https://example.com/a?b=c  ");
        assert_eq!(url.as_str(), "  https://example.com/a?b=c  ");
    }

    #[test]
    fn test_page_url_serializes_as_string() {
        let url = PageUrl::from("https://example.com/");
        let json = serde_json::to_string(&url).expect("serialize page url");
        assert_eq!(json, "\"https://example.com/\"");
    }

    #[test]
    fn test_session_id_generate() {
        let id1 = SessionId::generate();
        let id2 = SessionId::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_slug_matches_iso_with_safe_separators() {
        let dt = Utc
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(42);
        let slug = TimestampSlug::from_datetime(&dt);
        assert_eq!(slug.as_str(), "2024-03-09T14-05-07-042Z");
        assert!(!slug.as_str().contains(':'));
        assert!(!slug.as_str().contains('.'));
    }

    #[test]
    fn test_slug_parse() {
        for valid in [
            "2024-01-01T00-00-00",
            "2024-01-01T00-00-00-000Z",
            "2024-01-01T00-00-00-000Z_3",
        ] {
            assert!(TimestampSlug::parse(valid).is_ok(), "Failed for: {valid}");
        }

        for invalid in ["", "latest", "2024-01-01T00:00:00.000Z", "2024-01-01"] {
            assert!(TimestampSlug::parse(invalid).is_err(), "Should fail for: {invalid}");
        }
    }

    #[test]
    fn test_slugs_one_second_apart_are_ordered() {
        let first = Utc
            .with_ymd_and_hms(2024, 1, 1, 23, 59, 59)
            .single()
            .expect("valid datetime");
        let second = first + chrono::Duration::seconds(1);

        let a = TimestampSlug::from_datetime(&first);
        let b = TimestampSlug::from_datetime(&second);
        assert_ne!(a, b);
        assert!(a.as_str() < b.as_str());
        assert!(a < b);
    }

    #[test]
    fn test_disambiguator_sorts_after_base() {
        let base = TimestampSlug::parse("2024-01-01T00-00-00-000Z").expect("valid slug");
        let second = base.with_disambiguator(2);
        let tenth = base.with_disambiguator(10);

        assert_eq!(second.as_str(), "2024-01-01T00-00-00-000Z_2");
        assert_eq!(second.timestamp_part(), base.as_str());
        assert_eq!(second.disambiguator(), 2);
        assert_eq!(base.disambiguator(), 0);
        assert!(base < second);
        assert!(second < tenth);
    }
}
