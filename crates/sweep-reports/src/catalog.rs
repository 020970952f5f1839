//! Listing of stored JSON artifacts.

use crate::error::{ReportError, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;
use sweep_core::TimestampSlug;
use tokio::fs;

/// One JSON artifact in the reports directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportCatalogEntry {
    /// Bare file name inside the reports directory
    pub file_name: String,
    /// Slug parsed from an `axe-<slug>.json` name
    #[serde(skip)]
    pub slug: Option<TimestampSlug>,
}

impl ReportCatalogEntry {
    /// Build an entry, parsing the slug when the name has the artifact shape.
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let slug = file_name
            .strip_prefix("axe-")
            .and_then(|rest| rest.strip_suffix(".json"))
            .and_then(|slug| TimestampSlug::parse(slug).ok());
        Self { file_name, slug }
    }

    /// Ordering key: the slug's instant and disambiguator when known,
    /// otherwise the plain file name.
    fn sort_key(&self) -> (&str, u32, &str) {
        match &self.slug {
            Some(slug) => (slug.timestamp_part(), slug.disambiguator(), &self.file_name),
            None => (&self.file_name, 0, &self.file_name),
        }
    }
}

impl Ord for ReportCatalogEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for ReportCatalogEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// List the JSON artifacts in `dir`, newest first.
///
/// The directory is created when missing so a fresh install lists an
/// empty catalog. Nothing is cached: every call re-reads the directory.
pub async fn list_reports(dir: &Path) -> Result<Vec<ReportCatalogEntry>> {
    let read_err = |source| ReportError::ReadDir {
        path: dir.display().to_string(),
        source,
    };

    fs::create_dir_all(dir)
        .await
        .map_err(|source| ReportError::CreateDir {
            path: dir.display().to_string(),
            source,
        })?;

    let mut entries = Vec::new();
    let mut listing = fs::read_dir(dir).await.map_err(read_err)?;
    while let Some(entry) = listing.next_entry().await.map_err(read_err)? {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !name.ends_with(".json") {
            continue;
        }
        if !entry.file_type().await.map_err(read_err)?.is_file() {
            continue;
        }
        entries.push(ReportCatalogEntry::new(name));
    }

    entries.sort_by(|a, b| b.cmp(a));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "{}").expect("write file");
    }

    fn names(entries: &[ReportCatalogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.file_name.as_str()).collect()
    }

    #[test]
    fn test_entry_parses_slug() {
        let entry = ReportCatalogEntry::new("axe-2024-01-01T00-00-00-000Z_2.json");
        let slug = entry.slug.expect("slug parsed");
        assert_eq!(slug.timestamp_part(), "2024-01-01T00-00-00-000Z");
        assert_eq!(slug.disambiguator(), 2);

        assert!(ReportCatalogEntry::new("notes.json").slug.is_none());
    }

    #[tokio::test]
    async fn test_newest_first() {
        let tmp = TempDir::new().expect("create temp dir");
        touch(tmp.path(), "axe-2024-01-01T00-00-00.json");
        touch(tmp.path(), "axe-2024-01-02T00-00-00.json");

        let entries = list_reports(tmp.path()).await.expect("list reports");
        assert_eq!(
            names(&entries),
            vec!["axe-2024-01-02T00-00-00.json", "axe-2024-01-01T00-00-00.json"]
        );
    }

    #[tokio::test]
    async fn test_only_json_files_listed() {
        let tmp = TempDir::new().expect("create temp dir");
        touch(tmp.path(), "axe-2024-01-01T00-00-00-000Z.json");
        touch(tmp.path(), "axe-2024-01-01T00-00-00-000Z.html");
        touch(tmp.path(), "README.md");
        std::fs::create_dir(tmp.path().join("archive.json")).expect("create dir");

        let entries = list_reports(tmp.path()).await.expect("list reports");
        assert_eq!(names(&entries), vec!["axe-2024-01-01T00-00-00-000Z.json"]);
    }

    #[tokio::test]
    async fn test_disambiguated_names_are_newer() {
        let tmp = TempDir::new().expect("create temp dir");
        touch(tmp.path(), "axe-2024-01-01T00-00-00-000Z.json");
        touch(tmp.path(), "axe-2024-01-01T00-00-00-000Z_2.json");
        touch(tmp.path(), "axe-2024-01-01T00-00-00-000Z_10.json");
        touch(tmp.path(), "axe-2024-01-01T00-00-00-001Z.json");

        let entries = list_reports(tmp.path()).await.expect("list reports");
        assert_eq!(
            names(&entries),
            vec![
                "axe-2024-01-01T00-00-00-001Z.json",
                "axe-2024-01-01T00-00-00-000Z_10.json",
                "axe-2024-01-01T00-00-00-000Z_2.json",
                "axe-2024-01-01T00-00-00-000Z.json",
            ]
        );
    }

    #[tokio::test]
    async fn test_plain_names_fall_back_to_reverse_lexicographic() {
        let tmp = TempDir::new().expect("create temp dir");
        touch(tmp.path(), "alpha.json");
        touch(tmp.path(), "beta.json");

        let entries = list_reports(tmp.path()).await.expect("list reports");
        assert_eq!(names(&entries), vec!["beta.json", "alpha.json"]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_created_and_empty() {
        let tmp = TempDir::new().expect("create temp dir");
        let dir = tmp.path().join("reports");

        let entries = list_reports(&dir).await.expect("list reports");
        assert!(entries.is_empty());
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_unreadable_path_is_an_error() {
        let tmp = TempDir::new().expect("create temp dir");
        let file = tmp.path().join("reports");
        std::fs::write(&file, "not a directory").expect("write file");

        assert!(list_reports(&file).await.is_err());
    }
}
