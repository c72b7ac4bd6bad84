//! Data models for incident reports

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Status assigned to every newly submitted report
pub const PENDING_STATUS: &str = "pending";

/// User-provided fields, in the order they are validated
pub const REQUIRED_FIELDS: [&str; 7] = [
    "name",
    "email",
    "phone",
    "location",
    "crime_type",
    "description",
    "date",
];

/// Column order of the CSV export. Matches the field order of [`Report`].
pub const CSV_COLUMNS: [&str; 10] = [
    "id",
    "timestamp",
    "name",
    "email",
    "phone",
    "location",
    "crime_type",
    "description",
    "date",
    "status",
];

/// A single submitted incident report as persisted on disk
///
/// Field order is significant: it is the key order of the JSON objects and
/// the column order of the CSV export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: u64,
    /// Server-side creation time (ISO-8601)
    pub timestamp: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub crime_type: String,
    pub description: String,
    /// Date of the incident as entered by the reporter
    pub date: String,
    pub status: String,
}

/// Report submission as received from a client
///
/// Every field is optional at parse time so that a missing field can be
/// reported by name instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub crime_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Submission whose required fields have all been checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub crime_type: String,
    pub description: String,
    pub date: String,
}

impl ReportSubmission {
    /// Check that every required field is present and non-empty.
    ///
    /// Fields are checked in [`REQUIRED_FIELDS`] order and the first failing
    /// one is returned as [`StoreError::MissingField`].
    pub fn validate(self) -> Result<ValidSubmission> {
        Ok(ValidSubmission {
            name: required("name", self.name)?,
            email: required("email", self.email)?,
            phone: required("phone", self.phone)?,
            location: required("location", self.location)?,
            crime_type: required("crime_type", self.crime_type)?,
            description: required("description", self.description)?,
            date: required("date", self.date)?,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(StoreError::MissingField(field)),
    }
}

impl ValidSubmission {
    /// Turn the submission into a stored report
    pub fn into_report(self, id: u64, timestamp: String) -> Report {
        Report {
            id,
            timestamp,
            name: self.name,
            email: self.email,
            phone: self.phone,
            location: self.location,
            crime_type: self.crime_type,
            description: self.description,
            date: self.date,
            status: PENDING_STATUS.to_string(),
        }
    }
}

/// How a new report id is derived from the current collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// `len + 1`. Can reissue an existing id once reports have been deleted.
    #[default]
    Count,
    /// `max(id) + 1`. Never collides with a stored id.
    Sequential,
}

impl IdPolicy {
    pub fn next_id(self, reports: &[Report]) -> u64 {
        match self {
            IdPolicy::Count => reports.len() as u64 + 1,
            IdPolicy::Sequential => reports.iter().map(|r| r.id).max().unwrap_or(0) + 1,
        }
    }
}

impl FromStr for IdPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "count" => Ok(IdPolicy::Count),
            "sequential" | "max" => Ok(IdPolicy::Sequential),
            other => Err(format!("Unknown id policy: {}", other)),
        }
    }
}

impl std::fmt::Display for IdPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdPolicy::Count => write!(f, "count"),
            IdPolicy::Sequential => write!(f, "sequential"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_submission() -> ReportSubmission {
        ReportSubmission {
            name: Some("A".into()),
            email: Some("a@x.com".into()),
            phone: Some("1".into()),
            location: Some("L".into()),
            crime_type: Some("theft".into()),
            description: Some("d".into()),
            date: Some("2024-01-01".into()),
        }
    }

    fn report(id: u64) -> Report {
        full_submission()
            .validate()
            .unwrap()
            .into_report(id, "2024-01-01T00:00:00Z".into())
    }

    #[test]
    fn test_complete_submission_validates() {
        let valid = full_submission().validate().unwrap();
        assert_eq!(valid.name, "A");
        assert_eq!(valid.date, "2024-01-01");
    }

    #[test]
    fn test_first_missing_field_is_reported() {
        let mut sub = full_submission();
        sub.phone = None;
        sub.date = None;
        let err = sub.validate().unwrap_err();
        assert!(matches!(err, StoreError::MissingField("phone")));
        assert_eq!(err.to_string(), "Missing required field: phone");
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut sub = full_submission();
        sub.crime_type = Some(String::new());
        assert!(matches!(
            sub.validate(),
            Err(StoreError::MissingField("crime_type"))
        ));
    }

    #[test]
    fn test_whitespace_counts_as_present() {
        let mut sub = full_submission();
        sub.description = Some("  ".into());
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn test_submission_deserializes_with_missing_fields() {
        let sub: ReportSubmission = serde_json::from_str(r#"{"name": "A"}"#).unwrap();
        assert_eq!(sub.name.as_deref(), Some("A"));
        assert!(sub.email.is_none());
    }

    #[test]
    fn test_new_report_is_pending() {
        let r = report(7);
        assert_eq!(r.id, 7);
        assert_eq!(r.status, PENDING_STATUS);
    }

    #[test]
    fn test_report_json_key_order_matches_csv_columns() {
        let json = serde_json::to_string(&report(1)).unwrap();
        let positions: Vec<usize> = CSV_COLUMNS
            .iter()
            .map(|c| json.find(&format!("\"{}\":", c)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_count_policy_reuses_ids_after_gaps() {
        let reports = vec![report(1), report(3)];
        assert_eq!(IdPolicy::Count.next_id(&reports), 3);
        assert_eq!(IdPolicy::Sequential.next_id(&reports), 4);
    }

    #[test]
    fn test_policies_agree_on_empty_collection() {
        assert_eq!(IdPolicy::Count.next_id(&[]), 1);
        assert_eq!(IdPolicy::Sequential.next_id(&[]), 1);
    }

    #[test]
    fn test_id_policy_parsing() {
        assert_eq!("count".parse::<IdPolicy>().unwrap(), IdPolicy::Count);
        assert_eq!("Sequential".parse::<IdPolicy>().unwrap(), IdPolicy::Sequential);
        assert!("random".parse::<IdPolicy>().is_err());
        assert_eq!(IdPolicy::Sequential.to_string(), "sequential");
    }
}
