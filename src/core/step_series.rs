use serde::{Deserialize, Serialize};

use crate::core::interval::RecordingInterval;
use crate::core::line_series::{LineGeometry, flush_run, gap_limit};
use crate::core::scale::RegionTransform;
use crate::core::series::TimeSeries;
use crate::core::types::DateRange;

/// Whether a recorded value holds for the interval that starts or ends at
/// its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStyle {
    /// Value carries forward from its timestamp; the vertical rise is drawn
    /// at the next timestamp using the previous value.
    IntervalStarting,
    /// Value describes the interval ending at its timestamp; the vertical
    /// rise is drawn at the previous timestamp using the next value.
    IntervalEnding,
}

/// Default step style for a recording interval.
///
/// Sub-daily data conventionally reports interval-ending values; daily and
/// coarser data reports interval-starting values.
#[must_use]
pub fn auto_step_style(interval: RecordingInterval) -> StepStyle {
    if interval.is_sub_daily() {
        StepStyle::IntervalEnding
    } else {
        StepStyle::IntervalStarting
    }
}

/// Projects a series into stepped polyline runs.
///
/// Run breaking follows the same missing-value and allowed-gap rules as the
/// direct-line projection.
#[must_use]
pub fn project_steps(
    series: &TimeSeries,
    transform: RegionTransform,
    period: DateRange,
    style: Option<StepStyle>,
    allowed_gap_seconds: Option<i64>,
) -> LineGeometry {
    let style = style.unwrap_or_else(|| auto_step_style(series.interval()));
    let allowed_gap = gap_limit(series, allowed_gap_seconds);
    let mut geometry = LineGeometry::default();
    let mut run: Vec<(f64, f64)> = Vec::new();
    let mut last: Option<(i64, f64)> = None;

    for sample in series.samples_in(period) {
        if sample.is_missing() {
            flush_run(&mut geometry, &mut run);
            last = None;
            continue;
        }
        if let (Some((previous_time, _)), Some(limit)) = (last, allowed_gap) {
            if sample.time - previous_time > limit {
                flush_run(&mut geometry, &mut run);
                last = None;
            }
        }

        let (x, y) = transform.to_px(sample.time as f64, sample.value);
        if let Some((previous_time, previous_value)) = last {
            match style {
                StepStyle::IntervalStarting => {
                    // Carry the previous value to the new timestamp, then rise.
                    let carry_y = transform.y_to_px(previous_value);
                    run.push((x, carry_y));
                }
                StepStyle::IntervalEnding => {
                    // Rise at the previous timestamp to the new value.
                    let rise_x = transform.x_to_px(previous_time as f64);
                    run.push((rise_x, y));
                }
            }
        }
        run.push((x, y));
        last = Some((sample.time, sample.value));
    }
    flush_run(&mut geometry, &mut run);
    geometry
}

#[cfg(test)]
mod tests {
    use super::{StepStyle, auto_step_style, project_steps};
    use crate::core::interval::{
        CalendarStep, CalendarUnit, IntervalPrecision, RecordingInterval,
    };
    use crate::core::scale::RegionTransform;
    use crate::core::series::{Sample, TimeSeries};
    use crate::core::types::{DataRect, DateRange, DeviceRect};

    fn series(unit: CalendarUnit, times_values: &[(i64, f64)]) -> TimeSeries {
        let samples = times_values
            .iter()
            .map(|&(t, v)| Sample::new(t, v))
            .collect();
        TimeSeries::new(
            "stepped",
            "CFS",
            RecordingInterval::Regular(CalendarStep::new(unit, 1).expect("step")),
            samples,
        )
        .expect("valid series")
    }

    fn transform() -> RegionTransform {
        RegionTransform::new(
            DeviceRect::new(0.0, 0.0, 100.0, 100.0),
            DataRect::new(0.0, 100.0, 0.0, 100.0),
        )
        .expect("valid transform")
    }

    #[test]
    fn sub_daily_defaults_to_interval_ending() {
        assert_eq!(
            auto_step_style(RecordingInterval::Irregular(IntervalPrecision::Hour)),
            StepStyle::IntervalEnding
        );
        assert_eq!(
            auto_step_style(RecordingInterval::Irregular(IntervalPrecision::Day)),
            StepStyle::IntervalStarting
        );
    }

    #[test]
    fn interval_starting_carries_previous_value_forward() {
        let s = series(CalendarUnit::Day, &[(0, 10.0), (50, 30.0)]);
        let geometry = project_steps(
            &s,
            transform(),
            DateRange::new(0, 100),
            Some(StepStyle::IntervalStarting),
            None,
        );
        let run = &geometry.runs[0].points;
        // (0,10) -> (50,10) -> (50,30): rise happens at the new timestamp.
        assert_eq!(run.len(), 3);
        assert_eq!(run[1].0, 50.0);
        assert_eq!(run[1].1, run[0].1);
    }

    #[test]
    fn interval_ending_rises_at_previous_timestamp() {
        let s = series(CalendarUnit::Hour, &[(0, 10.0), (50, 30.0)]);
        let geometry = project_steps(
            &s,
            transform(),
            DateRange::new(0, 100),
            Some(StepStyle::IntervalEnding),
            None,
        );
        let run = &geometry.runs[0].points;
        // (0,10) -> (0,30) -> (50,30): rise happens at the old timestamp.
        assert_eq!(run.len(), 3);
        assert_eq!(run[1].0, run[0].0);
        assert_eq!(run[1].1, run[2].1);
    }
}
