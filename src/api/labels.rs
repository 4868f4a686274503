use serde::{Deserialize, Serialize};

use crate::core::types::ValueRange;

/// Ordered tick positions for one numeric axis, plus the "nice" range the
/// ticks imply. The nice range may slightly exceed the raw data range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSet {
    pub ticks: Vec<f64>,
    /// Unlabeled sub-ticks between the majors.
    pub minor: Vec<f64>,
    pub nice_range: ValueRange,
}

impl TickSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

/// Nice step mantissas tried at each decade, in ascending order.
const NICE_MANTISSAS: [f64; 4] = [1.0, 2.0, 5.0, 10.0];

/// Searches for a nice linear tick step yielding a count in
/// `[min_count, max_count]`.
///
/// Steps are 1/2/5/10-scaled powers of ten tried from fine to coarse; the
/// first step whose covering tick count fits wins. `include_endpoints`
/// snaps the outermost ticks onto the exact raw endpoints once a step is
/// found. Returns `None` when no step satisfies the count bracket; callers
/// degrade to `endpoint_labels`.
#[must_use]
pub fn find_linear_labels(
    min: f64,
    max: f64,
    include_endpoints: bool,
    min_count: usize,
    max_count: usize,
) -> Option<TickSet> {
    if !min.is_finite() || !max.is_finite() || min_count == 0 || max_count < min_count {
        return None;
    }
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    if min == max {
        return Some(synthetic_range(min));
    }

    let span = max - min;
    // Start one decade below the span so fine steps are tried first.
    let base_exponent = (span.log10().floor() as i32) - 2;

    for exponent in base_exponent..=base_exponent + 5 {
        for mantissa in NICE_MANTISSAS {
            let step = mantissa * 10.0_f64.powi(exponent);
            if !step.is_finite() || step <= 0.0 {
                continue;
            }
            let first = (min / step).floor() * step;
            let last = (max / step).ceil() * step;
            let count = ((last - first) / step).round() as i64 + 1;
            if count < min_count as i64 || count > max_count as i64 {
                continue;
            }

            let mut ticks: Vec<f64> =
                (0..count).map(|index| first + index as f64 * step).collect();
            if include_endpoints {
                ticks[0] = min;
                let last_index = ticks.len() - 1;
                ticks[last_index] = max;
            }
            let minor = half_step_minors(&ticks);
            return Some(TickSet {
                nice_range: ValueRange::new(first.min(min), last.max(max)),
                ticks,
                minor,
            });
        }
    }
    None
}

/// Two-endpoint degradation used when the step search fails.
#[must_use]
pub fn endpoint_labels(min: f64, max: f64) -> TickSet {
    if min == max {
        return synthetic_range(min);
    }
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    TickSet {
        ticks: vec![min, max],
        minor: Vec::new(),
        nice_range: ValueRange::new(min, max),
    }
}

/// Decade labels for a logarithmic axis with 2x/5x sub-ticks.
///
/// A non-positive range cannot live on a log axis, so it is substituted
/// with the default decade range [0.1, 100].
#[must_use]
pub fn find_log_labels(min: f64, max: f64) -> TickSet {
    let (min, max) = if min.is_finite() && max.is_finite() && min > 0.0 && max > min {
        (min, max)
    } else {
        (0.1, 100.0)
    };

    let first_decade = min.log10().floor() as i32;
    let last_decade = max.log10().ceil() as i32;

    let mut ticks = Vec::new();
    let mut minor = Vec::new();
    for decade in first_decade..=last_decade {
        let value = 10.0_f64.powi(decade);
        ticks.push(value);
        if decade < last_decade {
            minor.push(2.0 * value);
            minor.push(5.0 * value);
        }
    }
    TickSet {
        nice_range: ValueRange::new(
            10.0_f64.powi(first_decade),
            10.0_f64.powi(last_decade),
        ),
        ticks,
        minor,
    }
}

/// Integer ordinal positions 1..=count for period-of-record and
/// multi-series raster axes.
#[must_use]
pub fn ordinal_labels(count: usize) -> TickSet {
    let ticks: Vec<f64> = (1..=count).map(|index| index as f64).collect();
    TickSet {
        ticks,
        minor: Vec::new(),
        nice_range: ValueRange::new(0.0, count as f64 + 1.0),
    }
}

/// Whole-number ticks for count-like axes: calendar years, day-of-year
/// positions, absolute-day rows.
///
/// Steps come from the 1/2/5 ladder scaled to keep the count under
/// `max_count`; ticks land on step multiples inside the range.
#[must_use]
pub fn integer_labels(min: f64, max: f64, max_count: usize) -> TickSet {
    if !min.is_finite() || !max.is_finite() || max_count < 2 {
        return endpoint_labels(min, max);
    }
    let lo = min.floor();
    let hi = max.ceil();
    if lo >= hi {
        return synthetic_range(lo);
    }

    let span = hi - lo;
    let mut step = 1.0_f64;
    let mut scale = 1.0_f64;
    loop {
        for mantissa in [1.0, 2.0, 5.0] {
            let candidate = mantissa * scale;
            if span / candidate + 1.0 <= max_count as f64 {
                step = candidate;
                break;
            }
        }
        if span / step + 1.0 <= max_count as f64 {
            break;
        }
        scale *= 10.0;
    }

    let first = (lo / step).ceil() * step;
    let mut ticks = Vec::new();
    let mut tick = first;
    while tick <= hi {
        ticks.push(tick);
        tick += step;
    }
    if ticks.len() < 2 {
        return endpoint_labels(lo, hi);
    }
    TickSet {
        ticks,
        minor: Vec::new(),
        nice_range: ValueRange::new(lo, hi),
    }
}

fn synthetic_range(value: f64) -> TickSet {
    // Zero-width input: synthesize a two-label range around the value.
    let pad = if value == 0.0 { 1.0 } else { value.abs() * 0.5 };
    TickSet {
        ticks: vec![value - pad, value + pad],
        minor: Vec::new(),
        nice_range: ValueRange::new(value - pad, value + pad),
    }
}

fn half_step_minors(ticks: &[f64]) -> Vec<f64> {
    ticks
        .windows(2)
        .map(|pair| (pair[0] + pair[1]) * 0.5)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{endpoint_labels, find_linear_labels, find_log_labels, ordinal_labels};

    #[test]
    fn ticks_cover_the_raw_range() {
        let set = find_linear_labels(3.2, 97.5, false, 4, 12).expect("labels");
        assert!(*set.ticks.first().expect("first") <= 3.2);
        assert!(*set.ticks.last().expect("last") >= 97.5);
        assert!(set.len() >= 4 && set.len() <= 12);
    }

    #[test]
    fn ticks_are_strictly_increasing() {
        let set = find_linear_labels(-14.0, 230.0, false, 3, 10).expect("labels");
        for pair in set.ticks.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn endpoints_are_snapped_when_requested() {
        let set = find_linear_labels(3.2, 97.5, true, 4, 12).expect("labels");
        assert_eq!(*set.ticks.first().expect("first"), 3.2);
        assert_eq!(*set.ticks.last().expect("last"), 97.5);
    }

    #[test]
    fn impossible_bracket_returns_none() {
        assert!(find_linear_labels(0.0, 100.0, false, 40, 41).is_none());
    }

    #[test]
    fn zero_width_range_is_synthesized() {
        let set = find_linear_labels(5.0, 5.0, false, 2, 10).expect("labels");
        assert_eq!(set.len(), 2);
        assert!(set.ticks[0] < 5.0 && set.ticks[1] > 5.0);
    }

    #[test]
    fn endpoint_degradation_keeps_both_values() {
        let set = endpoint_labels(1.25, 7.75);
        assert_eq!(set.ticks, vec![1.25, 7.75]);
    }

    #[test]
    fn log_labels_substitute_default_decades_for_non_positive_input() {
        let set = find_log_labels(-5.0, 100.0);
        assert_eq!(set.nice_range.min, 0.1);
        assert_eq!(set.nice_range.max, 100.0);
    }

    #[test]
    fn log_labels_are_decades_with_sub_ticks() {
        let set = find_log_labels(1.0, 1_000.0);
        assert_eq!(set.ticks, vec![1.0, 10.0, 100.0, 1_000.0]);
        assert!(set.minor.contains(&2.0));
        assert!(set.minor.contains(&500.0));
    }

    #[test]
    fn integer_labels_never_emit_fractions() {
        let set = super::integer_labels(2000.0, 2001.0, 12);
        assert_eq!(set.ticks, vec![2000.0, 2001.0]);

        let set = super::integer_labels(1.0, 367.0, 12);
        assert!(set.ticks.len() <= 12);
        for &tick in &set.ticks {
            assert_eq!(tick, tick.trunc());
        }
    }

    #[test]
    fn ordinal_labels_run_one_through_count() {
        let set = ordinal_labels(4);
        assert_eq!(set.ticks, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(set.nice_range.max, 5.0);
    }
}
