//! Artifact pair persistence.

use crate::error::{ReportError, Result};
use crate::result::ScanResult;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use sweep_core::TimestampSlug;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Disambiguated names tried before giving up on a timestamp.
const MAX_SLUG_ATTEMPTS: u32 = 1000;

/// Locations of one written artifact pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    /// Slug shared by both files
    pub slug: TimestampSlug,
    /// Full result as pretty-printed JSON
    pub json_path: PathBuf,
    /// Minimal human-readable page
    pub html_path: PathBuf,
}

/// File name of the JSON artifact for a slug.
#[must_use]
pub fn json_file_name(slug: &TimestampSlug) -> String {
    format!("axe-{slug}.json")
}

/// File name of the HTML artifact for a slug.
#[must_use]
pub fn html_file_name(slug: &TimestampSlug) -> String {
    format!("axe-{slug}.html")
}

/// Writes scan results into a flat reports directory.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    /// Create a store rooted at `dir`. Nothing touches the disk until the
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reports directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the JSON and HTML artifacts for one result.
    ///
    /// The slug comes from the current instant; if another artifact already
    /// claimed it, a `_N` disambiguator is appended. Either both files are
    /// written or neither remains on disk.
    pub async fn persist(&self, result: &ScanResult) -> Result<ReportArtifact> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| ReportError::CreateDir {
                path: self.dir.display().to_string(),
                source,
            })?;

        let json = serde_json::to_string_pretty(result)?;
        let html = render_html(result, &json);

        let (slug, json_path, mut json_file) = self.claim(&TimestampSlug::now()).await?;
        let html_path = self.dir.join(html_file_name(&slug));

        let written = async {
            let json_err = |source| ReportError::Write {
                path: json_path.display().to_string(),
                source,
            };
            json_file.write_all(json.as_bytes()).await.map_err(json_err)?;
            json_file.flush().await.map_err(json_err)?;
            write_new(&html_path, html.as_bytes()).await
        }
        .await;

        if let Err(e) = written {
            // No partial pairs: drop whatever part made it to disk
            discard(&json_path).await;
            return Err(e);
        }

        info!(
            url = %result.url,
            json = %json_path.display(),
            html = %html_path.display(),
            "saved report"
        );

        Ok(ReportArtifact {
            slug,
            json_path,
            html_path,
        })
    }

    /// Reserve a JSON file name that no other artifact uses.
    async fn claim(&self, base: &TimestampSlug) -> Result<(TimestampSlug, PathBuf, fs::File)> {
        for attempt in 0..MAX_SLUG_ATTEMPTS {
            let slug = if attempt == 0 {
                base.clone()
            } else {
                base.with_disambiguator(attempt)
            };

            // An orphaned HTML file would block the pair later on
            let html_path = self.dir.join(html_file_name(&slug));
            if fs::try_exists(&html_path).await.unwrap_or(false) {
                continue;
            }

            let json_path = self.dir.join(json_file_name(&slug));
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&json_path)
                .await
            {
                Ok(file) => return Ok((slug, json_path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(source) => {
                    return Err(ReportError::Write {
                        path: json_path.display().to_string(),
                        source,
                    })
                }
            }
        }

        Err(ReportError::SlugExhausted {
            slug: base.to_string(),
        })
    }
}

async fn write_new(path: &Path, contents: &[u8]) -> Result<()> {
    let write_err = |source| ReportError::Write {
        path: path.display().to_string(),
        source,
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(write_err)?;
    file.write_all(contents).await.map_err(write_err)?;
    file.flush().await.map_err(write_err)?;
    Ok(())
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "failed to remove partial artifact");
    }
}

fn render_html(result: &ScanResult, json: &str) -> String {
    let url = escape_html(result.url.as_str());
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>Axe report</title></head>\
         <body><h1>Axe report for {url}</h1><pre>{}</pre></body></html>",
        escape_html(json)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
