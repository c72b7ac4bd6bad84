//! Crime Report API Server
//!
//! Serves pre-generated crime charts and the citizen report frontend, and
//! collects incident reports into a JSON file. Provides REST endpoints for:
//!
//! - Chart delivery and a health overview of the chart folder
//! - Report submission
//! - Password-gated report listing, deletion and CSV export

use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{delete, get, post},
    Router,
};
use clap::Parser;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod assets;
mod auth;
mod charts;
mod config;
mod error;
mod handlers;
mod state;

use config::{Args, Config};
use state::AppState;

/// Build the router with every route and middleware layer
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend pages
        .route("/", get(assets::index))
        .route("/report", get(assets::report_page))
        // Health and charts
        .route("/api/health", get(handlers::health))
        .route("/api/charts/:name", get(handlers::get_chart))
        // Report endpoints
        .route("/api/submit-report", post(handlers::submit_report))
        .route("/api/reports", get(handlers::list_reports))
        .route("/api/reports/export", get(handlers::export_reports))
        .route("/api/reports/delete-all", delete(handlers::delete_all_reports))
        .route("/api/reports/:id", delete(handlers::delete_report))
        // Frontend assets by name
        .route("/:filename", get(assets::static_file))
        // Add middleware
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_args(args)?;

    info!("Initializing crime report API...");
    let state = Arc::new(AppState::new(&config)?);

    let app = app(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Server listening on http://{}", config.addr);
    info!("Health check: http://{}/api/health", config.addr);

    axum::serve(listener, app).await?;

    Ok(())
}
