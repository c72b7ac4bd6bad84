//! Chart image folder
//!
//! The folder is chosen once at startup and handed to the router as part of
//! the application state.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::ApiError;

/// Folders probed for chart images, relative to the base directory
pub const CANDIDATE_FOLDERS: [&str; 3] = ["charts", "graph", "static/charts"];

/// Extension appended to chart names that lack it
pub const CHART_EXTENSION: &str = ".png";

#[derive(Debug, Clone)]
pub struct ChartFolder {
    path: PathBuf,
}

impl ChartFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Pick the chart folder: an explicit override wins, then the first
    /// existing candidate, then the first candidate.
    pub fn resolve(base_dir: &Path, explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }

        let candidates: Vec<PathBuf> = CANDIDATE_FOLDERS
            .iter()
            .map(|c| base_dir.join(c))
            .collect();

        let path = candidates
            .iter()
            .find(|c| c.is_dir())
            .unwrap_or(&candidates[0])
            .clone();

        Self::new(path)
    }

    /// Create the folder if it does not exist yet
    pub fn ensure_exists(&self) -> std::io::Result<()> {
        if self.exists() {
            let charts = self.list();
            info!(
                folder = %self.path.display(),
                count = charts.len(),
                "Found chart files: {:?}",
                charts
            );
            return Ok(());
        }

        warn!(folder = %self.path.display(), "Charts folder does not exist, creating it");
        std::fs::create_dir_all(&self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Sorted `.png` file names currently in the folder
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.path) else {
            return Vec::new();
        };

        let mut charts: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(CHART_EXTENSION))
            .collect();
        charts.sort();
        charts
    }

    /// Read a chart by name, appending `.png` when missing
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, ApiError> {
        let file_name = chart_file_name(name);

        if is_plain_file_name(&file_name) {
            let path = self.path.join(&file_name);
            let is_file = tokio::fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);

            if is_file {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| ApiError::Internal(e.into()))?;
                info!(chart = %file_name, bytes = bytes.len(), "Serving chart");
                return Ok(bytes);
            }
        }

        let available_charts = self.list();
        warn!(chart = %file_name, available = ?available_charts, "Chart not found");

        Err(ApiError::ChartNotFound {
            requested: file_name,
            available_charts,
            folder: self.path.display().to_string(),
            folder_exists: self.exists(),
        })
    }
}

pub fn chart_file_name(name: &str) -> String {
    if name.ends_with(CHART_EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, CHART_EXTENSION)
    }
}

/// True when `name` is a single path component that stays inside its folder
pub fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != ".."
        && !name.starts_with("..")
}
