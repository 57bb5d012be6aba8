use hivetime::core::calculator::budget::{Band, BudgetStatus, BudgetUsage, Thresholds, classify, evaluate};

fn bounded(live: i64, budget: i64) -> BudgetUsage {
    match evaluate(live, Some(budget), &Thresholds::default()) {
        BudgetStatus::Bounded(u) => u,
        BudgetStatus::Unbounded => panic!("expected a bounded budget"),
    }
}

#[test]
fn missing_or_non_positive_budget_is_unbounded() {
    let t = Thresholds::default();
    assert_eq!(evaluate(500, None, &t), BudgetStatus::Unbounded);
    assert_eq!(evaluate(500, Some(0), &t), BudgetStatus::Unbounded);
    assert_eq!(evaluate(500, Some(-60), &t), BudgetStatus::Unbounded);
    assert_eq!(evaluate(500, None, &t).band(), None);
}

#[test]
fn half_used() {
    let u = bounded(1800, 3600);
    assert_eq!(u.percentage, 50.0);
    assert!(!u.is_over_budget);
    assert_eq!(u.overtime_ratio, 0.0);
    assert_eq!(u.band, Band::Nominal);
    assert_eq!(u.remaining_seconds(), 1800);
}

#[test]
fn one_second_over() {
    let u = bounded(3601, 3600);
    assert_eq!(u.percentage, 100.0);
    assert!(u.is_over_budget);
    assert!(u.overtime_ratio < 0.001);
    assert_eq!(u.band, Band::Critical);
    assert_eq!(u.remaining_seconds(), -1);
}

#[test]
fn overtime_is_clamped_at_double() {
    assert_eq!(bounded(7200, 3600).overtime_ratio, 1.0);
    assert_eq!(bounded(7200, 3600).overtime_percentage(), 100.0);
    assert_eq!(bounded(36_000, 3600).overtime_ratio, 1.0);
    assert_eq!(bounded(5400, 3600).overtime_ratio, 0.5);
}

#[test]
fn exactly_on_budget_is_not_over() {
    let u = bounded(3600, 3600);
    assert!(!u.is_over_budget);
    assert_eq!(u.percentage, 100.0);
    assert_eq!(u.band, Band::Critical);
}

#[test]
fn band_boundaries() {
    let t = Thresholds::default();
    assert_eq!(classify(0.0, false, &t), Band::Nominal);
    assert_eq!(classify(69.9, false, &t), Band::Nominal);
    assert_eq!(classify(70.0, false, &t), Band::Warning);
    assert_eq!(classify(94.9, false, &t), Band::Warning);
    assert_eq!(classify(95.0, false, &t), Band::Critical);
    assert_eq!(classify(10.0, true, &t), Band::Critical);
}

#[test]
fn custom_thresholds() {
    let t = Thresholds {
        warning: 50.0,
        critical: 80.0,
    };
    assert_eq!(classify(55.0, false, &t), Band::Warning);
    assert_eq!(classify(80.0, false, &t), Band::Critical);
}

#[test]
fn live_165_of_200_is_warning() {
    let u = bounded(165, 200);
    assert!((u.percentage - 82.5).abs() < 1e-9);
    assert_eq!(u.band, Band::Warning);
    assert_eq!(u.band.as_str(), "warning");
}

#[test]
fn negative_live_counts_as_zero() {
    let u = bounded(-10, 100);
    assert_eq!(u.live_seconds, 0);
    assert_eq!(u.percentage, 0.0);
}

#[test]
fn serializes_with_mode_tag() {
    let json = serde_json::to_value(evaluate(10, None, &Thresholds::default())).unwrap();
    assert_eq!(json["mode"], "unbounded");

    let json = serde_json::to_value(evaluate(90, Some(100), &Thresholds::default())).unwrap();
    assert_eq!(json["mode"], "bounded");
    assert_eq!(json["band"], "warning");
    assert_eq!(json["is_over_budget"], false);
}
