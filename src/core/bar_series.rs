use serde::{Deserialize, Serialize};

use crate::core::interval::{CalendarStep, CalendarUnit, RecordingInterval, step_forward};
use crate::core::scale::RegionTransform;
use crate::core::series::TimeSeries;
use crate::core::types::DateRange;

/// Horizontal placement of a bar relative to its sample timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarAlignment {
    /// Bar spans the interval starting at the timestamp.
    #[default]
    Left,
    /// Bar is centered on the timestamp.
    Center,
    /// Bar spans the interval ending at the timestamp.
    Right,
}

/// Per-call bar projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarOptions {
    pub alignment: BarAlignment,
    /// When false, series sharing the axis tile side by side instead of
    /// drawing over each other.
    pub overlap: bool,
    /// This series' position among the bar series on the axis.
    pub series_index: usize,
    /// Total bar series sharing the axis.
    pub series_count: usize,
    /// Value the bars grow from; clamped into the visible range when the
    /// range does not cross it.
    pub baseline: f64,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            alignment: BarAlignment::Left,
            overlap: false,
            series_index: 0,
            series_count: 1,
            baseline: 0.0,
        }
    }
}

/// Fraction shaved off monthly bars so neighboring months never collide
/// despite their varying calendar length.
pub const MONTHLY_BAR_INSET_RATIO: f64 = 0.08;

/// One projected bar in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// True when the sample value sits above the baseline.
    pub above_baseline: bool,
}

/// Projects a series into baseline-anchored bar rectangles.
///
/// Bar width derives from the data interval; irregular series fall back to
/// a daily nominal width. Missing values produce no bar.
#[must_use]
pub fn project_bars(
    series: &TimeSeries,
    transform: RegionTransform,
    period: DateRange,
    options: BarOptions,
) -> Vec<BarRect> {
    let step = interval_step(series.interval());
    let count = options.series_count.max(1);
    let baseline_px = transform.baseline_px(options.baseline);
    let mut bars = Vec::new();

    for sample in series.samples_in(period) {
        if sample.is_missing() {
            continue;
        }
        let interval_end = step_forward(sample.time, step.unit, step.multiplier);
        let full_width =
            transform.x_to_px(interval_end as f64) - transform.x_to_px(sample.time as f64);
        if !full_width.is_finite() || full_width <= 0.0 {
            continue;
        }
        let inset = if step.unit == CalendarUnit::Month {
            full_width * MONTHLY_BAR_INSET_RATIO
        } else {
            0.0
        };
        let usable_width = full_width - inset;

        let anchor = transform.x_to_px(sample.time as f64);
        let slot_left = match options.alignment {
            BarAlignment::Left => anchor,
            BarAlignment::Center => anchor - usable_width * 0.5,
            BarAlignment::Right => anchor - usable_width,
        };

        // Without overlap the interval is shared: N series tile N bars of
        // width/N, offset by series position.
        let (bar_left, bar_width) = if options.overlap || count == 1 {
            (slot_left, usable_width)
        } else {
            let tile = usable_width / count as f64;
            (slot_left + tile * options.series_index as f64, tile)
        };

        let value_px = transform.y_to_px(sample.value);
        let top = value_px.min(baseline_px);
        let height = (value_px - baseline_px).abs();
        bars.push(BarRect {
            left: bar_left,
            top,
            width: bar_width,
            height,
            above_baseline: value_px <= baseline_px,
        });
    }
    bars
}

fn interval_step(interval: RecordingInterval) -> CalendarStep {
    match interval {
        RecordingInterval::Regular(step) => step,
        RecordingInterval::Irregular(precision) => {
            let unit = match precision {
                crate::core::interval::IntervalPrecision::Minute => CalendarUnit::Minute,
                crate::core::interval::IntervalPrecision::Hour => CalendarUnit::Hour,
                crate::core::interval::IntervalPrecision::Day => CalendarUnit::Day,
                crate::core::interval::IntervalPrecision::Month => CalendarUnit::Month,
                crate::core::interval::IntervalPrecision::Year => CalendarUnit::Year,
            };
            CalendarStep { unit, multiplier: 1 }
        }
    }
}

/// Baseline value for a visible range that may not cross zero.
///
/// When zero lies outside the range, bars grow from the nearest edge so
/// they stay inside the plot instead of running off it.
#[must_use]
pub fn clamped_baseline(range_min: f64, range_max: f64) -> f64 {
    if range_min > 0.0 {
        range_min
    } else if range_max < 0.0 {
        range_max
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{BarAlignment, BarOptions, clamped_baseline, project_bars};
    use crate::core::interval::{CalendarStep, CalendarUnit, RecordingInterval, SECONDS_PER_DAY};
    use crate::core::scale::RegionTransform;
    use crate::core::series::{Sample, TimeSeries};
    use crate::core::types::{DataRect, DateRange, DeviceRect};

    fn daily(values: &[f64]) -> TimeSeries {
        let samples = values
            .iter()
            .enumerate()
            .map(|(day, &v)| Sample::new(day as i64 * SECONDS_PER_DAY, v))
            .collect();
        TimeSeries::new(
            "bars",
            "IN",
            RecordingInterval::Regular(CalendarStep::new(CalendarUnit::Day, 1).expect("step")),
            samples,
        )
        .expect("valid series")
    }

    fn transform(days: f64, y_min: f64, y_max: f64) -> RegionTransform {
        RegionTransform::new(
            DeviceRect::new(0.0, 0.0, 100.0 * days, 100.0),
            DataRect::new(0.0, days * SECONDS_PER_DAY as f64, y_min, y_max),
        )
        .expect("valid transform")
    }

    #[test]
    fn tiled_bars_are_disjoint_and_cover_the_interval() {
        let s = daily(&[5.0, 7.0]);
        let t = transform(2.0, 0.0, 10.0);
        let period = DateRange::new(0, 2 * SECONDS_PER_DAY);
        let count = 2;
        let mut all = Vec::new();
        for index in 0..count {
            let bars = project_bars(
                &s,
                t,
                period,
                BarOptions {
                    series_index: index,
                    series_count: count,
                    ..BarOptions::default()
                },
            );
            all.push(bars);
        }
        let first = all[0][0];
        let second = all[1][0];
        assert!((first.left + first.width - second.left).abs() < 1e-9);
        assert!((first.width + second.width - 100.0).abs() < 1e-9);
    }

    #[test]
    fn negative_values_hang_below_the_baseline() {
        let s = daily(&[-4.0]);
        let t = transform(1.0, -10.0, 10.0);
        let bars = project_bars(
            &s,
            t,
            DateRange::new(0, SECONDS_PER_DAY),
            BarOptions::default(),
        );
        assert_eq!(bars.len(), 1);
        assert!(!bars[0].above_baseline);
        // Baseline at value 0 maps to the vertical middle.
        assert!((bars[0].top - 50.0).abs() < 1e-9);
    }

    #[test]
    fn baseline_clamps_to_range_edge_when_zero_is_outside() {
        assert_eq!(clamped_baseline(2.0, 10.0), 2.0);
        assert_eq!(clamped_baseline(-10.0, -2.0), -2.0);
        assert_eq!(clamped_baseline(-5.0, 5.0), 0.0);
    }
}
