//! CSV export of stored reports

use crate::error::{Result, StoreError};
use crate::model::Report;

/// Serialize reports as CSV: one header row, then one row per report in
/// input order. Columns follow [`crate::CSV_COLUMNS`].
pub fn to_csv(reports: &[Report]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for report in reports {
        writer.serialize(report)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::Csv(e.into_error().into()))?;

    // Every field is a String, so the output is valid UTF-8
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
