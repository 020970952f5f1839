//! Router and handlers.

use crate::error::CatalogError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sweep_reports::list_reports;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error};

#[derive(Clone)]
struct CatalogState {
    reports_dir: Arc<PathBuf>,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        error!(error = %self, "catalog request failed");
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

/// Build the catalog router.
///
/// - `GET /api/reports`: JSON array of report file names, newest first
/// - `GET /reports/<file>`: stored artifacts
/// - anything else: static assets from `public_dir`
pub fn build_router(reports_dir: &Path, public_dir: &Path) -> Router {
    let state = CatalogState {
        reports_dir: Arc::new(reports_dir.to_path_buf()),
    };

    Router::new()
        .route("/api/reports", get(list_handler))
        .with_state(state)
        .nest_service("/reports", ServeDir::new(reports_dir))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
}

async fn list_handler(State(state): State<CatalogState>) -> Result<Json<Vec<String>>, CatalogError> {
    let entries = list_reports(&state.reports_dir).await?;
    debug!(count = entries.len(), "listed reports");
    Ok(Json(entries.into_iter().map(|e| e.file_name).collect()))
}
