use pchk_probe::{Severity, ThresholdError, Thresholds, Verdict};

#[test]
fn missing_thresholds_are_rejected() {
    assert_eq!(
        Thresholds::new(None, Some(10)),
        Err(ThresholdError::Missing { name: "warn" })
    );
    assert_eq!(
        Thresholds::new(Some(10), None),
        Err(ThresholdError::Missing { name: "critical" })
    );
}

#[test]
fn zero_and_negative_thresholds_are_rejected() {
    assert_eq!(
        Thresholds::new(Some(0), Some(10)),
        Err(ThresholdError::NotPositive { name: "warn", value: 0 })
    );
    assert_eq!(
        Thresholds::new(Some(10), Some(-5)),
        Err(ThresholdError::NotPositive { name: "critical", value: -5 })
    );
}

#[test]
fn valid_thresholds_keep_their_values() {
    let th = Thresholds::new(Some(5), Some(10)).unwrap();
    assert_eq!(th.warn(), 5);
    assert_eq!(th.crit(), 10);
    assert!(!th.is_inverted());
}

#[test]
fn usage_verdict_maps_to_unknown() {
    let v = Verdict::usage("Please specify a warning and critical level");
    assert_eq!(v.severity, Severity::Unknown);
    assert_eq!(v.exit_code(), 3);
    assert_eq!(v.to_string(), "UNKNOWN: Please specify a warning and critical level");
}
