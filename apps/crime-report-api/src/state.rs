//! Application state for the crime report API

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use report_store::ReportStore;
use tracing::{info, warn};

use crate::charts::ChartFolder;
use crate::config::Config;

pub struct AppState {
    pub store: Arc<ReportStore>,
    pub charts: ChartFolder,
    /// Directory holding the frontend pages and assets
    pub site_dir: PathBuf,
    pub admin_secret: Option<String>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        info!("Base directory: {}", config.base_dir.display());

        let charts = ChartFolder::resolve(&config.base_dir, config.charts_dir.as_deref());
        info!("Charts folder: {}", charts.path().display());
        charts.ensure_exists().with_context(|| {
            format!("Failed to create charts folder {}", charts.path().display())
        })?;

        let store = ReportStore::open(&config.reports_file).with_id_policy(config.id_policy);
        info!(
            "Reports file: {} (id policy: {})",
            store.path().display(),
            store.id_policy()
        );

        if config.admin_secret.is_none() {
            warn!("ADMIN_PASSWORD is not set; admin report routes will reject every request");
        }

        Ok(Self {
            store: Arc::new(store),
            charts,
            site_dir: config.base_dir.clone(),
            admin_secret: config.admin_secret.clone(),
        })
    }

    pub fn admin_secret(&self) -> Option<&str> {
        self.admin_secret.as_deref()
    }
}
