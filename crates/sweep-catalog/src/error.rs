//! Catalog error types.

use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised while running the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The listen address could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Requested address
        addr: SocketAddr,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    /// Report listing failed
    #[error(transparent)]
    Report(#[from] sweep_reports::ReportError),
}

/// Result type alias using `CatalogError`.
pub type Result<T> = std::result::Result<T, CatalogError>;
