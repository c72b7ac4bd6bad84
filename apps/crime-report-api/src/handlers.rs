//! HTTP handlers for the crime report API

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use report_store::{Report, ReportStore, ReportSubmission};
use serde::Serialize;
use tracing::info;

use crate::auth::{authorize_query, PasswordQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// File name offered to browsers for the CSV export
pub const EXPORT_FILE_NAME: &str = "crime_reports.csv";

/// Run a store operation on the blocking pool
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&ReportStore) -> report_store::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Report store task failed: {}", e)))?;
    Ok(result?)
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub charts_folder: String,
    pub available_charts: Vec<String>,
    pub folder_exists: bool,
}

/// Handler: GET /api/health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        charts_folder: state.charts.path().display().to_string(),
        available_charts: state.charts.list(),
        folder_exists: state.charts.exists(),
    })
}

/// Handler: GET /api/charts/:name
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.charts.read(&name).await?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "image/png")], bytes).into_response())
}

/// Response to a successful submission
#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    pub report_id: u64,
}

/// Handler: POST /api/submit-report
pub async fn submit_report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(submission) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    let report = with_store(&state, move |store| store.submit(submission)).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: "Report submitted successfully",
            report_id: report.id,
        }),
    ))
}

/// Stored reports for the admin view
#[derive(Serialize)]
pub struct ReportListResponse {
    pub reports: Vec<Report>,
    pub count: usize,
}

/// Handler: GET /api/reports
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PasswordQuery>, QueryRejection>,
) -> Result<Json<ReportListResponse>, ApiError> {
    authorize_query(state.admin_secret(), query)?;

    let reports = with_store(&state, |store| store.load_all()).await?;
    let count = reports.len();

    Ok(Json(ReportListResponse { reports, count }))
}

/// Outcome of an admin mutation
#[derive(Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: &'static str,
}

/// Handler: DELETE /api/reports/:id
pub async fn delete_report(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PasswordQuery>, QueryRejection>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    authorize_query(state.admin_secret(), query)?;

    let Path(id) = id.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;

    if !with_store(&state, move |store| store.delete_by_id(id)).await? {
        return Err(ApiError::ReportNotFound(id));
    }

    Ok(Json(ActionResponse {
        success: true,
        message: "Report deleted successfully",
    }))
}

/// Handler: DELETE /api/reports/delete-all
pub async fn delete_all_reports(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PasswordQuery>, QueryRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
    authorize_query(state.admin_secret(), query)?;

    with_store(&state, |store| store.delete_all()).await?;

    Ok(Json(ActionResponse {
        success: true,
        message: "All reports deleted successfully",
    }))
}

/// Handler: GET /api/reports/export
pub async fn export_reports(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PasswordQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    authorize_query(state.admin_secret(), query)?;

    let csv = with_store(&state, |store| store.export_csv()).await?;
    info!(bytes = csv.len(), "Sending CSV export");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}
