use crate::api::CompletionRecord;
use crate::services::compare::compute_cohort_comparison;

fn create_test_record(worker: &str, duration: f64) -> CompletionRecord {
    CompletionRecord {
        worker_name: Some(worker.to_string()),
        duration_minutes: duration,
        ..Default::default()
    }
}

fn is_ana(record: &CompletionRecord) -> bool {
    record.worker_name.as_deref() == Some("Ana")
}

#[test]
fn test_cohort_differences() {
    let records = vec![
        create_test_record("Ana", 10.0),
        create_test_record("Ana", 20.0),
        create_test_record("Luis", 30.0),
        create_test_record("Luis", 40.0),
        create_test_record("Luis", 80.0),
    ];
    let comparison = compute_cohort_comparison(&records, is_ana);

    let matching = comparison.matching.as_ref().unwrap();
    let others = comparison.others.as_ref().unwrap();
    assert_eq!(matching.count, 2);
    assert_eq!(others.count, 3);
    assert_eq!(matching.mean, 15.0);
    assert_eq!(others.mean, 50.0);
    assert_eq!(comparison.mean_difference, Some(-35.0));
    assert_eq!(comparison.median_difference, Some(15.0 - 40.0));
}

#[test]
fn test_empty_cohort_has_no_difference() {
    let records = vec![
        create_test_record("Luis", 30.0),
        create_test_record("Marta", 40.0),
    ];
    let comparison = compute_cohort_comparison(&records, is_ana);

    assert!(comparison.matching.is_none());
    assert_eq!(comparison.others.as_ref().unwrap().count, 2);
    assert!(comparison.mean_difference.is_none());
    assert!(comparison.median_difference.is_none());
}

#[test]
fn test_empty_input() {
    let comparison = compute_cohort_comparison(&[], is_ana);
    assert!(comparison.matching.is_none());
    assert!(comparison.others.is_none());
}
