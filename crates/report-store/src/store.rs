//! JSON-file backed report store
//!
//! The whole file is the unit of read and write. A process-wide mutex
//! serializes every operation so that `submit` and `delete_by_id`, which
//! load and then rewrite the collection, cannot interleave.

use std::fs::Permissions;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::export::to_csv;
use crate::model::{IdPolicy, Report, ReportSubmission};

pub struct ReportStore {
    path: PathBuf,
    id_policy: IdPolicy,
    lock: Mutex<()>,
}

impl ReportStore {
    /// Bind a store to its backing file. Nothing is read or created until
    /// the first operation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            id_policy: IdPolicy::default(),
            lock: Mutex::new(()),
        }
    }

    pub fn with_id_policy(mut self, id_policy: IdPolicy) -> Self {
        self.id_policy = id_policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Load every stored report in file order.
    ///
    /// A missing file is an empty collection; a file that exists but does
    /// not hold a JSON array of reports is a [`StoreError::Parse`].
    pub fn load_all(&self) -> Result<Vec<Report>> {
        let _guard = self.guard()?;
        self.read()
    }

    /// Replace the stored collection.
    pub fn save_all(&self, reports: &[Report]) -> Result<()> {
        let _guard = self.guard()?;
        self.write(reports)
    }

    /// Validate a submission, assign it an id and append it to the store.
    pub fn submit(&self, submission: ReportSubmission) -> Result<Report> {
        let valid = submission.validate()?;

        let _guard = self.guard()?;
        let mut reports = self.read()?;

        let id = self.id_policy.next_id(&reports);
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let report = valid.into_report(id, timestamp);

        reports.push(report.clone());
        self.write(&reports)?;

        info!(id = report.id, total = reports.len(), "New report submitted");
        Ok(report)
    }

    /// Remove every report with the given id.
    ///
    /// Returns `false` (and leaves the file untouched) when no report matched.
    pub fn delete_by_id(&self, id: u64) -> Result<bool> {
        let _guard = self.guard()?;
        let mut reports = self.read()?;

        let original_len = reports.len();
        reports.retain(|r| r.id != id);

        if reports.len() == original_len {
            debug!(id, "Report not found for deletion");
            return Ok(false);
        }

        self.write(&reports)?;
        info!(id, remaining = reports.len(), "Deleted report");
        Ok(true)
    }

    /// Clear the store, creating the backing file if it does not exist.
    pub fn delete_all(&self) -> Result<()> {
        let _guard = self.guard()?;
        self.write(&[])?;
        info!("Deleted all reports");
        Ok(())
    }

    /// Render the stored reports as CSV with a header row.
    pub fn export_csv(&self) -> Result<String> {
        let reports = self.load_all()?;
        if reports.is_empty() {
            return Err(StoreError::Empty);
        }

        let csv = to_csv(&reports)?;
        info!(count = reports.len(), "Exported reports to CSV");
        Ok(csv)
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| StoreError::Poisoned)
    }

    fn read(&self) -> Result<Vec<Report>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Write to a sibling temp file and rename it over the target, so a
    /// crash mid-write leaves the previous collection intact.
    fn write(&self, reports: &[Report]) -> Result<()> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, reports)?;
            writer.write_all(b"\n").map_err(write_err)?;
            writer.flush().map_err(write_err)?;
        }
        if let Some(perms) = self.target_permissions() {
            tmp.as_file().set_permissions(perms).map_err(write_err)?;
        }
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!(path = %self.path.display(), count = reports.len(), "Saved reports");
        Ok(())
    }

    /// Mode for the rewritten file: the current file's permissions, or
    /// 0644 for a new file instead of the temp file's private 0600.
    fn target_permissions(&self) -> Option<Permissions> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => new_file_permissions(),
        }
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
