//! Sweep Catalog - HTTP front door to stored reports.
//!
//! Serves the report listing at `/api/reports`, the artifact files under
//! `/reports/`, and the static front-end from the public directory.
//! Handlers hold no state: every listing re-reads the reports directory.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod routes;

pub use error::{CatalogError, Result};
pub use routes::build_router;

use std::net::SocketAddr;
use std::path::Path;
use sweep_core::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

/// Bind the catalog on `0.0.0.0:<server.port>` and serve until the process
/// is stopped.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| CatalogError::Bind { addr, source })?;
    serve_on(listener, &config.reports.dir, &config.server.public_dir).await
}

/// Serve the catalog on an already bound listener.
pub async fn serve_on(listener: TcpListener, reports_dir: &Path, public_dir: &Path) -> Result<()> {
    let app = build_router(reports_dir, public_dir);

    if let Ok(addr) = listener.local_addr() {
        info!(%addr, reports = %reports_dir.display(), "catalog listening on http://localhost:{}", addr.port());
    }

    axum::serve(listener, app).await.map_err(CatalogError::Serve)
}
