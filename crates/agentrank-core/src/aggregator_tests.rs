use super::*;

fn result(signal: Signal, status: SignalStatus, score: u8) -> SignalResult {
    SignalResult::new(signal, signal.default_weight(), status, score, "test")
}

fn all_pass() -> Vec<SignalResult> {
    Signal::ALL
        .iter()
        .map(|s| result(*s, SignalStatus::Pass, 100))
        .collect()
}

#[test]
fn test_default_catalog_is_valid() {
    let catalog = WeightCatalog::from_config(&WeightsConfig::default()).unwrap();
    assert_eq!(catalog, WeightCatalog::default());
    assert_eq!(catalog.weight(Signal::Structure), 25);
}

#[test]
fn test_catalog_rejects_bad_sum() {
    let config = WeightsConfig {
        hydration: 10,
        ..Default::default()
    };
    let err = WeightCatalog::from_config(&config).unwrap_err();
    assert!(matches!(err, AggregationError::WeightSum(90)));
}

#[test]
fn test_catalog_rejects_zero_weight() {
    let config = WeightsConfig {
        permissions: 0,
        structure: 45,
        ..Default::default()
    };
    let err = WeightCatalog::from_config(&config).unwrap_err();
    assert!(matches!(err, AggregationError::InvalidWeight { weight: 0, .. }));
}

#[test]
fn test_catalog_rejects_missing_and_duplicate() {
    let err = WeightCatalog::new([
        (Signal::Permissions, 50),
        (Signal::Structure, 50),
    ])
    .unwrap_err();
    assert!(matches!(err, AggregationError::MissingSignal(ref s) if s == "hostility"));

    let err = WeightCatalog::new([
        (Signal::Permissions, 20),
        (Signal::Permissions, 20),
    ])
    .unwrap_err();
    assert!(matches!(err, AggregationError::DuplicateSignal(_)));
}

#[test]
fn test_all_pass_scores_100() {
    let report = ScoreAggregator::default().aggregate(all_pass()).unwrap();
    assert_eq!(report.score, 100);
    assert_eq!(report.verdict, SignalStatus::Pass);
}

#[test]
fn test_weighted_mean_rounds_half_up() {
    // 20*100 + 25*50 + 15*100 + 20*100 + 20*80 = 8350 -> 83.5 -> 84
    let results = vec![
        result(Signal::Permissions, SignalStatus::Pass, 100),
        result(Signal::Structure, SignalStatus::Warn, 50),
        result(Signal::Hostility, SignalStatus::Pass, 100),
        result(Signal::Accessibility, SignalStatus::Pass, 100),
        result(Signal::Hydration, SignalStatus::Pass, 80),
    ];
    let report = ScoreAggregator::default().aggregate(results).unwrap();
    assert_eq!(report.score, 84);
    assert_eq!(report.verdict, SignalStatus::Warn);
}

#[test]
fn test_single_fail_dominates() {
    for failing in Signal::ALL {
        let results = Signal::ALL
            .iter()
            .map(|s| {
                if *s == failing {
                    result(*s, SignalStatus::Fail, 100)
                } else {
                    result(*s, SignalStatus::Pass, 100)
                }
            })
            .collect();
        let report = ScoreAggregator::default().aggregate(results).unwrap();
        assert_eq!(report.verdict, SignalStatus::Fail, "failing {}", failing);
    }
}

#[test]
fn test_fail_beats_warn() {
    let mut results = all_pass();
    results[1] = result(Signal::Structure, SignalStatus::Warn, 50);
    results[2] = result(Signal::Hostility, SignalStatus::Fail, 0);
    let report = ScoreAggregator::default().aggregate(results).unwrap();
    assert_eq!(report.verdict, SignalStatus::Fail);
}

#[test]
fn test_order_independent() {
    let forward = all_pass();
    let mut reversed = all_pass();
    reversed.reverse();
    let aggregator = ScoreAggregator::default();
    let a = aggregator.aggregate(forward).unwrap();
    let b = aggregator.aggregate(reversed).unwrap();
    assert_eq!(a, b);
    let names: Vec<_> = b.signals.iter().map(|r| r.signal).collect();
    assert_eq!(names, Signal::ALL.to_vec());
}

#[test]
fn test_missing_result_is_rejected() {
    let mut results = all_pass();
    results.pop();
    let err = ScoreAggregator::default().aggregate(results).unwrap_err();
    assert!(matches!(err, AggregationError::MissingSignal(ref s) if s == "hydration"));
}

#[test]
fn test_duplicate_result_is_rejected() {
    let mut results = all_pass();
    results.push(result(Signal::Structure, SignalStatus::Pass, 100));
    let err = ScoreAggregator::default().aggregate(results).unwrap_err();
    assert!(matches!(err, AggregationError::DuplicateSignal(_)));
}

#[test]
fn test_weight_mismatch_is_rejected() {
    let mut results = all_pass();
    results[0] = SignalResult::new(Signal::Permissions, 30, SignalStatus::Pass, 100, "x");
    let err = ScoreAggregator::default().aggregate(results).unwrap_err();
    assert!(matches!(
        err,
        AggregationError::WeightMismatch { expected: 20, actual: 30, .. }
    ));
}

#[test]
fn test_custom_catalog() {
    let catalog = WeightCatalog::new([
        (Signal::Permissions, 10),
        (Signal::Structure, 10),
        (Signal::Hostility, 10),
        (Signal::Accessibility, 10),
        (Signal::Hydration, 60),
    ])
    .unwrap();
    let aggregator = ScoreAggregator::new(catalog.clone());
    let results = Signal::ALL
        .iter()
        .map(|s| {
            let score = if *s == Signal::Hydration { 0 } else { 100 };
            SignalResult::new(*s, catalog.weight(*s), SignalStatus::Pass, score, "x")
        })
        .collect();
    let report = aggregator.aggregate(results).unwrap();
    assert_eq!(report.score, 40);
}
