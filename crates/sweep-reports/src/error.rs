//! Report persistence errors.

use thiserror::Error;

/// Errors raised while writing or listing artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Reports directory could not be created
    #[error("failed to create reports directory {path}: {source}")]
    CreateDir {
        /// Directory path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An artifact file could not be written
    #[error("failed to write artifact {path}: {source}")]
    Write {
        /// Artifact path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Reports directory could not be listed
    #[error("failed to read reports directory {path}: {source}")]
    ReadDir {
        /// Directory path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Every disambiguated name for a slug is already taken
    #[error("no free artifact name for timestamp {slug}")]
    SlugExhausted {
        /// Base timestamp slug
        slug: String,
    },

    /// The audit engine returned something that is not a result object
    #[error("invalid audit result: {0}")]
    InvalidResult(String),

    /// JSON encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using `ReportError`.
pub type Result<T> = std::result::Result<T, ReportError>;
