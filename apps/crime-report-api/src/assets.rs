//! Frontend pages and assets served from the base directory

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Path as UrlPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::charts::is_plain_file_name;
use crate::error::ApiError;
use crate::state::AppState;

/// Content type for the frontend file types that may be served by name
pub fn asset_content_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    match ext {
        "html" => Some("text/html; charset=utf-8"),
        "css" => Some("text/css; charset=utf-8"),
        "js" => Some("application/javascript; charset=utf-8"),
        _ => None,
    }
}

async fn send_file(site_dir: &Path, file_name: &str) -> Result<Response, ApiError> {
    let content_type =
        asset_content_type(file_name).ok_or_else(|| ApiError::InvalidFileType(file_name.into()))?;

    if !is_plain_file_name(file_name) {
        return Err(ApiError::FileNotFound(file_name.into()));
    }

    let path = site_dir.join(file_name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Asset not readable");
            return Err(ApiError::FileNotFound(file_name.into()));
        }
    };

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Handler: GET /
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    page(&state, "index.html").await
}

/// Handler: GET /report
pub async fn report_page(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    page(&state, "report.html").await
}

async fn page(state: &AppState, file_name: &str) -> Result<Response, ApiError> {
    send_file(&state.site_dir, file_name)
        .await
        .map_err(|e| match e {
            ApiError::FileNotFound(name) => ApiError::PageNotFound(name),
            other => other,
        })
}

/// Handler: GET /:filename
pub async fn static_file(
    State(state): State<Arc<AppState>>,
    UrlPath(file_name): UrlPath<String>,
) -> Result<Response, ApiError> {
    send_file(&state.site_dir, &file_name).await
}
