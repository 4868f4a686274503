use std::sync::Arc;

use tsgraph::core::area_series::derive_stacked;
use tsgraph::core::bar_series::{BarAlignment, BarOptions, project_bars};
use tsgraph::core::interval::SECONDS_PER_DAY;
use tsgraph::core::line_series::project_line;
use tsgraph::core::step_series::{StepStyle, project_steps};
use tsgraph::core::{
    CalendarStep, CalendarUnit, DataRect, DateRange, DeviceRect, IntervalPrecision,
    RecordingInterval, RegionTransform, Sample, TimeSeries,
};

fn daily(name: &str, values: &[f64]) -> TimeSeries {
    let samples = values
        .iter()
        .enumerate()
        .map(|(day, &v)| Sample::new(day as i64 * SECONDS_PER_DAY, v))
        .collect();
    TimeSeries::new(
        name,
        "CFS",
        RecordingInterval::Regular(CalendarStep::new(CalendarUnit::Day, 1).expect("step")),
        samples,
    )
    .expect("valid series")
}

fn irregular(name: &str, points: &[(i64, f64)]) -> TimeSeries {
    let samples = points.iter().map(|&(t, v)| Sample::new(t, v)).collect();
    TimeSeries::new(
        name,
        "CFS",
        RecordingInterval::Irregular(IntervalPrecision::Day),
        samples,
    )
    .expect("valid series")
}

fn transform(days: i64, y_min: f64, y_max: f64) -> RegionTransform {
    RegionTransform::new(
        DeviceRect::new(0.0, 0.0, 1_000.0, 400.0),
        DataRect::new(0.0, (days * SECONDS_PER_DAY) as f64, y_min, y_max),
    )
    .expect("valid transform")
}

#[test]
fn thirty_day_gap_with_seven_day_allowance_draws_isolated_markers() {
    let series = irregular("sparse", &[(0, 5.0), (30 * SECONDS_PER_DAY, 7.0)]);
    let geometry = project_line(
        &series,
        transform(40, 0.0, 10.0),
        DateRange::new(0, 40 * SECONDS_PER_DAY),
        Some(7 * SECONDS_PER_DAY),
    );
    assert!(geometry.runs.is_empty(), "no connecting segment may exist");
    assert_eq!(geometry.isolated.len(), 2);
}

#[test]
fn default_gap_for_daily_precision_connects_month_scale_gaps() {
    // Daily-precision irregular data defaults to a one-year allowed gap, so
    // a 30-day hole still connects.
    let series = irregular("sparse", &[(0, 5.0), (30 * SECONDS_PER_DAY, 7.0)]);
    let geometry = project_line(
        &series,
        transform(40, 0.0, 10.0),
        DateRange::new(0, 40 * SECONDS_PER_DAY),
        None,
    );
    assert_eq!(geometry.runs.len(), 1);
    assert!(geometry.isolated.is_empty());
}

#[test]
fn missing_values_split_runs_without_bridging() {
    let series = daily("gappy", &[1.0, 2.0, f64::NAN, 4.0, 5.0]);
    let geometry = project_line(
        &series,
        transform(5, 0.0, 10.0),
        DateRange::new(0, 5 * SECONDS_PER_DAY),
        None,
    );
    assert_eq!(geometry.runs.len(), 2);
    assert_eq!(geometry.runs[0].points.len(), 2);
    assert_eq!(geometry.runs[1].points.len(), 2);
}

#[test]
fn step_styles_differ_only_in_rise_placement() {
    let series = daily("steps", &[10.0, 30.0]);
    let t = transform(2, 0.0, 40.0);
    let period = DateRange::new(0, 2 * SECONDS_PER_DAY);

    let starting = project_steps(&series, t, period, Some(StepStyle::IntervalStarting), None);
    let ending = project_steps(&series, t, period, Some(StepStyle::IntervalEnding), None);

    let s = &starting.runs[0].points;
    let e = &ending.runs[0].points;
    assert_eq!(s.first(), e.first());
    assert_eq!(s.last(), e.last());
    // Interval-starting rises at the new timestamp, interval-ending at the
    // previous one.
    assert!(s[1].0 > e[1].0);
}

#[test]
fn bars_tile_without_overlap_and_span_the_interval() {
    let series_count = 3;
    let series: Vec<TimeSeries> = (0..series_count)
        .map(|k| daily(&format!("s{k}"), &[4.0 + k as f64]))
        .collect();
    let t = transform(1, 0.0, 10.0);
    let period = DateRange::new(0, SECONDS_PER_DAY);

    let mut bars = Vec::new();
    for (index, s) in series.iter().enumerate() {
        let projected = project_bars(
            s,
            t,
            period,
            BarOptions {
                alignment: BarAlignment::Left,
                overlap: false,
                series_index: index,
                series_count,
                baseline: 0.0,
            },
        );
        assert_eq!(projected.len(), 1);
        bars.push(projected[0]);
    }

    // Pairwise disjoint.
    for i in 0..bars.len() {
        for j in i + 1..bars.len() {
            let (a, b) = (bars[i], bars[j]);
            let disjoint = a.left + a.width <= b.left + 1e-9 || b.left + b.width <= a.left + 1e-9;
            assert!(disjoint, "bars {i} and {j} overlap");
        }
    }
    // Collectively they span exactly N times the single-bar width.
    let total: f64 = bars.iter().map(|b| b.width).sum();
    let leftmost = bars.iter().map(|b| b.left).fold(f64::INFINITY, f64::min);
    let rightmost = bars
        .iter()
        .map(|b| b.left + b.width)
        .fold(f64::NEG_INFINITY, f64::max);
    assert!((rightmost - leftmost - total).abs() < 1e-9);
    assert!((total - bars[0].width * series_count as f64).abs() < 1e-9);
}

#[test]
fn stacked_top_boundary_is_previous_plus_raw_value() {
    let a = daily("base", &[1.0, 2.0, 3.0, 4.0]);
    let b = daily("mid", &[5.0, 6.0, 7.0, 8.0]);
    let c = daily("top", &[0.5, 0.5, 0.5, 0.5]);
    let raw = [&a, &b, &c];
    let derived = derive_stacked(&raw).expect("stack");

    for level in 1..derived.len() {
        let below = derived[level - 1].samples();
        let here = derived[level].samples();
        let source = raw[level].samples();
        for ((lower, upper), original) in below.iter().zip(here.iter()).zip(source.iter()) {
            assert_eq!(upper.time, lower.time);
            assert!((upper.value - (lower.value + original.value)).abs() < 1e-12);
        }
    }
}
