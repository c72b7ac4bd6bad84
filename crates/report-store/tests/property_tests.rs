//! Property-based tests for report-store
//!
//! Exercises the store against a temporary directory using proptest.

use proptest::prelude::*;
use report_store::{
    to_csv, Report, ReportStore, ReportSubmission, StoreError, CSV_COLUMNS, REQUIRED_FIELDS,
};
use tempfile::TempDir;

// ============================================================
// Strategies
// ============================================================

/// Non-empty free text, including characters that need CSV quoting
fn field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9 @.\\-]{1,30}",
        "[a-z]{1,10}[,\"\n][a-z]{1,10}",
    ]
}

fn submission() -> impl Strategy<Value = ReportSubmission> {
    (
        field_value(),
        field_value(),
        field_value(),
        field_value(),
        field_value(),
        field_value(),
        field_value(),
    )
        .prop_map(
            |(name, email, phone, location, crime_type, description, date)| ReportSubmission {
                name: Some(name),
                email: Some(email),
                phone: Some(phone),
                location: Some(location),
                crime_type: Some(crime_type),
                description: Some(description),
                date: Some(date),
            },
        )
}

fn blank(sub: &mut ReportSubmission, field: &str, empty: bool) {
    let value = if empty { Some(String::new()) } else { None };
    match field {
        "name" => sub.name = value,
        "email" => sub.email = value,
        "phone" => sub.phone = value,
        "location" => sub.location = value,
        "crime_type" => sub.crime_type = value,
        "description" => sub.description = value,
        "date" => sub.date = value,
        other => panic!("unknown field {}", other),
    }
}

fn new_store() -> (TempDir, ReportStore) {
    let dir = TempDir::new().unwrap();
    let store = ReportStore::open(dir.path().join("crime_reports.json"));
    (dir, store)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // ============================================================
    // Submission
    // ============================================================

    #[test]
    fn complete_submission_gets_previous_count_plus_one(
        subs in proptest::collection::vec(submission(), 1..8)
    ) {
        let (_dir, store) = new_store();
        for sub in subs {
            let before = store.load_all().unwrap().len() as u64;
            let report = store.submit(sub).unwrap();
            prop_assert_eq!(report.id, before + 1);
            prop_assert_eq!(report.status.as_str(), "pending");
        }
    }

    #[test]
    fn missing_field_is_named_and_store_unchanged(
        existing in proptest::collection::vec(submission(), 0..4),
        sub in submission(),
        field_idx in 0..REQUIRED_FIELDS.len(),
        empty in any::<bool>()
    ) {
        let (_dir, store) = new_store();
        for s in existing {
            store.submit(s).unwrap();
        }
        let before = store.load_all().unwrap();

        let field = REQUIRED_FIELDS[field_idx];
        let mut sub = sub;
        blank(&mut sub, field, empty);

        match store.submit(sub) {
            Err(StoreError::MissingField(name)) => prop_assert_eq!(name, field),
            other => prop_assert!(false, "expected MissingField, got {:?}", other),
        }
        prop_assert_eq!(store.load_all().unwrap(), before);
    }

    // ============================================================
    // Deletion
    // ============================================================

    #[test]
    fn delete_present_id_keeps_others_in_order(
        subs in proptest::collection::vec(submission(), 1..8),
        pick in any::<prop::sample::Index>()
    ) {
        let (_dir, store) = new_store();
        for sub in subs {
            store.submit(sub).unwrap();
        }
        let before = store.load_all().unwrap();
        let target = before[pick.index(before.len())].id;

        prop_assert!(store.delete_by_id(target).unwrap());

        let expected: Vec<Report> = before.into_iter().filter(|r| r.id != target).collect();
        prop_assert_eq!(store.load_all().unwrap(), expected);
    }

    #[test]
    fn delete_absent_id_is_not_found(
        subs in proptest::collection::vec(submission(), 0..6),
        offset in 1u64..1000
    ) {
        let (_dir, store) = new_store();
        for sub in subs {
            store.submit(sub).unwrap();
        }
        let before = store.load_all().unwrap();
        let absent = before.len() as u64 + offset;

        prop_assert!(!store.delete_by_id(absent).unwrap());
        prop_assert_eq!(store.load_all().unwrap(), before);
    }

    #[test]
    fn delete_all_empties_store(subs in proptest::collection::vec(submission(), 0..6)) {
        let (_dir, store) = new_store();
        for sub in subs {
            store.submit(sub).unwrap();
        }
        store.delete_all().unwrap();
        prop_assert!(store.load_all().unwrap().is_empty());
    }

    // ============================================================
    // CSV Export
    // ============================================================

    #[test]
    fn export_preserves_every_value(subs in proptest::collection::vec(submission(), 1..6)) {
        let (_dir, store) = new_store();
        for sub in subs {
            store.submit(sub).unwrap();
        }
        let stored = store.load_all().unwrap();
        let csv = store.export_csv().unwrap();
        prop_assert_eq!(&csv, &to_csv(&stored).unwrap());

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        prop_assert_eq!(headers, CSV_COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>());

        let rows: Vec<Report> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(rows, stored);
    }
}
