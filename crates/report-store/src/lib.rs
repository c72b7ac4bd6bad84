//! Report store for citizen-submitted incident reports
//!
//! Reports are persisted as a single pretty-printed JSON array. Every
//! operation reads (and, for mutations, rewrites) the whole file; there is
//! no in-memory cache between calls.
//!
//! ```no_run
//! use report_store::{ReportStore, ReportSubmission};
//!
//! let store = ReportStore::open("crime_reports.json");
//! let report = store.submit(ReportSubmission {
//!     name: Some("A".into()),
//!     email: Some("a@x.com".into()),
//!     phone: Some("1".into()),
//!     location: Some("L".into()),
//!     crime_type: Some("theft".into()),
//!     description: Some("d".into()),
//!     date: Some("2024-01-01".into()),
//! })?;
//! assert_eq!(report.status, "pending");
//! # Ok::<(), report_store::StoreError>(())
//! ```

pub mod error;
pub mod export;
pub mod model;
pub mod store;

pub use error::{Result, StoreError};
pub use export::to_csv;
pub use model::{IdPolicy, Report, ReportSubmission, CSV_COLUMNS, PENDING_STATUS, REQUIRED_FIELDS};
pub use store::ReportStore;
