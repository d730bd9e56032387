use std::path::PathBuf;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use serde::Deserialize;

use super::assets::Assets;
use super::{ApiError, AppState};
use crate::models::{DirectoryEntry, SortKey, SortOrder};
use crate::services::fs::scan_dir;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub path: Option<String>,
    pub sort: Option<SortKey>,
    pub order: Option<SortOrder>,
}

pub async fn index() -> Result<Html<String>, ApiError> {
    Assets::text("index.html").map(Html).ok_or_else(|| {
        tracing::error!("index.html missing from embedded assets");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "index page unavailable")
    })
}

pub async fn list_directory(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<DirectoryEntry>>, ApiError> {
    let path = query
        .path
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.default_path.clone());

    if !state.fs.exists(&path) {
        tracing::warn!(path = %path.display(), "requested path does not exist");
        return Err(ApiError::path_not_found());
    }

    let sort = state.config.sort_spec(query.sort, query.order);
    let started = Instant::now();
    let outcome = scan_dir(state.fs.clone(), path.clone(), sort)
        .await
        .map_err(|e| {
            tracing::warn!(path = %path.display(), "scan failed: {}", e);
            ApiError::from(e)
        })?;

    if outcome.skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped = outcome.skipped,
            "some entries could not be read"
        );
    }
    tracing::info!(
        path = %path.display(),
        entries = outcome.entries.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "listed directory"
    );

    Ok(Json(outcome.entries))
}
