//! Error types for the crime report API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use report_store::StoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Report not found: {0}")]
    ReportNotFound(u64),

    #[error("Chart not found: {requested}")]
    ChartNotFound {
        requested: String,
        available_charts: Vec<String>,
        folder: String,
        folder_exists: bool,
    },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("{0} not found")]
    PageNotFound(String),

    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::InvalidRequest(_) | ApiError::InvalidFileType(_) => StatusCode::BAD_REQUEST,
            ApiError::ReportNotFound(_)
            | ApiError::ChartNotFound { .. }
            | ApiError::FileNotFound(_)
            | ApiError::PageNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::MissingField(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Empty) => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let mut body = match &self {
            ApiError::Unauthorized => json!({ "error": "Unauthorized" }),
            ApiError::InvalidRequest(msg) => json!({ "error": msg }),
            ApiError::ReportNotFound(_) => json!({ "error": "Report not found" }),
            ApiError::ChartNotFound {
                requested,
                available_charts,
                folder,
                folder_exists,
            } => json!({
                "error": format!(
                    "Chart not found: {}. Available charts: {}",
                    requested,
                    available_charts.join(", ")
                ),
                "requested": requested,
                "available_charts": available_charts,
                "folder": folder,
                "folder_exists": folder_exists,
            }),
            ApiError::FileNotFound(name) => json!({ "error": format!("File not found: {}", name) }),
            ApiError::PageNotFound(name) => json!({ "error": format!("{} not found", name) }),
            ApiError::InvalidFileType(_) => json!({ "error": "Invalid file type" }),
            ApiError::Store(e) if e.is_client_error() => json!({ "error": e.to_string() }),
            ApiError::Store(e) => {
                tracing::error!("Store error: {}", e);
                json!({ "error": "Report storage error" })
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                json!({ "error": "Internal error" })
            }
        };

        body["status"] = json!(status.as_u16());

        (status, Json(body)).into_response()
    }
}

/// Turn a handler panic into the usual JSON 500 response
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    // Logged by the Internal arm of into_response
    ApiError::Internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}
