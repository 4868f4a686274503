use proptest::prelude::*;
use tsgraph::api::{endpoint_labels, find_linear_labels, find_log_labels, ordinal_labels};

#[test]
fn linear_search_finds_round_steps() {
    let set = find_linear_labels(0.0, 100.0, false, 5, 15).expect("labels");
    assert_eq!(set.ticks, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
    assert_eq!(set.nice_range.min, 0.0);
    assert_eq!(set.nice_range.max, 100.0);
}

#[test]
fn nice_range_covers_awkward_bounds() {
    let set = find_linear_labels(3.7, 96.1, false, 4, 12).expect("labels");
    assert!(set.nice_range.min <= 3.7);
    assert!(set.nice_range.max >= 96.1);
}

#[test]
fn endpoint_degradation_is_exactly_two_labels() {
    assert!(find_linear_labels(0.0, 100.0, false, 45, 46).is_none());
    let degraded = endpoint_labels(0.0, 100.0);
    assert_eq!(degraded.ticks.len(), 2);
}

#[test]
fn log_labels_handle_fractional_decades() {
    let set = find_log_labels(0.35, 740.0);
    assert_eq!(*set.ticks.first().expect("first"), 0.1);
    assert_eq!(*set.ticks.last().expect("last"), 1_000.0);
}

#[test]
fn ordinal_labels_match_period_of_record_rows() {
    let set = ordinal_labels(7);
    assert_eq!(set.ticks.len(), 7);
    assert_eq!(set.nice_range.min, 0.0);
    assert_eq!(set.nice_range.max, 8.0);
}

proptest! {
    #[test]
    fn linear_labels_cover_range_and_respect_counts(
        min in -1.0e6_f64..1.0e6,
        span in 1.0e-2_f64..1.0e6,
    ) {
        let max = min + span;
        if let Some(set) = find_linear_labels(min, max, false, 3, 12) {
            prop_assert!(set.ticks.len() >= 3);
            prop_assert!(set.ticks.len() <= 12);
            prop_assert!(*set.ticks.first().expect("first") <= min);
            prop_assert!(*set.ticks.last().expect("last") >= max);
            for pair in set.ticks.windows(2) {
                prop_assert!(pair[0] < pair[1]);
            }
        }
    }

    #[test]
    fn included_endpoints_appear_verbatim(
        min in -1.0e4_f64..1.0e4,
        span in 1.0_f64..1.0e4,
    ) {
        let max = min + span;
        if let Some(set) = find_linear_labels(min, max, true, 3, 12) {
            prop_assert_eq!(*set.ticks.first().expect("first"), min);
            prop_assert_eq!(*set.ticks.last().expect("last"), max);
        }
    }

    #[test]
    fn log_labels_always_bracket_positive_input(
        min in 1.0e-3_f64..1.0e3,
        factor in 1.5_f64..1.0e3,
    ) {
        let set = find_log_labels(min, min * factor);
        prop_assert!(set.nice_range.min <= min);
        prop_assert!(set.nice_range.max >= min * factor);
        for pair in set.ticks.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }
}
