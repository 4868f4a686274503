use serde::{Deserialize, Serialize};

use chrono::Datelike;

use crate::core::interval::{SECONDS_PER_DAY, hour_of_day, month_of, to_datetime, year_of};
use crate::core::scale::RegionTransform;
use crate::core::series::{AxisBinding, TimeSeries};
use crate::core::types::{DateRange, ValueRange};

/// Bounded calendar unit used as the X axis in single-series raster mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarAxis {
    /// X is day of year on a leap-year grid (1..367).
    DayOfYear,
    /// X is month of year (1..13).
    MonthOfYear,
    /// X is hour of day (0..24); Y is the absolute day.
    HourOfDay,
}

impl CalendarAxis {
    #[must_use]
    pub fn x_range(self) -> ValueRange {
        match self {
            Self::DayOfYear => ValueRange::new(1.0, 367.0),
            Self::MonthOfYear => ValueRange::new(1.0, 13.0),
            Self::HourOfDay => ValueRange::new(0.0, 24.0),
        }
    }
}

/// Cell-mapping mode for the raster encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RasterMode {
    /// Single non-annual series: calendar position against year (or day).
    Calendar(CalendarAxis),
    /// Multiple series, or a single annual series: real time against the
    /// ordinal series index, first series in the top row.
    Ordinal,
}

/// Chooses the raster mode the way the limits engine expects it.
#[must_use]
pub fn select_raster_mode(binding: &AxisBinding) -> RasterMode {
    let mut active = binding.active();
    let first = active.next();
    let multiple = active.next().is_some();
    match first {
        Some((_, series)) if !multiple && !series.interval().is_annual() => {
            let axis = match series.interval().precision() {
                crate::core::interval::IntervalPrecision::Minute
                | crate::core::interval::IntervalPrecision::Hour => CalendarAxis::HourOfDay,
                crate::core::interval::IntervalPrecision::Day => CalendarAxis::DayOfYear,
                crate::core::interval::IntervalPrecision::Month
                | crate::core::interval::IntervalPrecision::Year => CalendarAxis::MonthOfYear,
            };
            RasterMode::Calendar(axis)
        }
        _ => RasterMode::Ordinal,
    }
}

/// One heat-map cell in pixel coordinates, carrying its sample value for
/// the symbol-table color lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterCell {
    pub slot_index: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub value: f64,
}

/// Day-of-year slot on the leap-year grid.
///
/// Non-leap years place March onward one slot later so a given slot always
/// means the same calendar date, and stretch the February 28 cell across
/// the vacant February 29 slot so it never reads as missing.
#[must_use]
pub fn leap_adjusted_slot(time: i64) -> (u32, u32) {
    let dt = to_datetime(time);
    let ordinal = dt.ordinal();
    if dt.date_naive().leap_year() {
        (ordinal, 1)
    } else if ordinal < 59 {
        (ordinal, 1)
    } else if ordinal == 59 {
        (59, 2)
    } else {
        (ordinal + 1, 1)
    }
}

/// Y extent for calendar mode: year rows, or absolute-day rows for the
/// hour-of-day axis.
#[must_use]
pub fn calendar_y_range(series: &TimeSeries, axis: CalendarAxis) -> ValueRange {
    let period = series.period();
    match axis {
        CalendarAxis::HourOfDay => {
            let first = epoch_day(period.start);
            let last = epoch_day(period.end);
            ValueRange::new(first as f64, (last + 1) as f64)
        }
        CalendarAxis::DayOfYear | CalendarAxis::MonthOfYear => {
            let first = year_of(period.start);
            let last = year_of(period.end);
            ValueRange::new(f64::from(first), f64::from(last + 1))
        }
    }
}

fn epoch_day(time: i64) -> i64 {
    time.div_euclid(SECONDS_PER_DAY)
}

/// Projects a single series into calendar-position cells.
///
/// Missing samples produce no cell; the pipeline backfills the whole plot
/// rectangle with the missing color first, so absent cells read as missing
/// rather than blank.
#[must_use]
pub fn project_calendar_cells(
    slot_index: usize,
    series: &TimeSeries,
    transform: RegionTransform,
    visible: DateRange,
    axis: CalendarAxis,
) -> Vec<RasterCell> {
    // Sub-daily values conventionally describe the interval ending at their
    // timestamp; anchor such cells at the interval start.
    let shift = if series.interval().is_sub_daily() {
        series.interval().nominal_seconds().unwrap_or(0)
    } else {
        0
    };
    let mut cells = Vec::new();

    for sample in series.samples_in(visible) {
        if sample.is_missing() {
            continue;
        }
        let anchor = sample.time - shift;
        let (x0, x1, y0, y1) = match axis {
            CalendarAxis::DayOfYear => {
                let (slot, span) = leap_adjusted_slot(anchor);
                let year = f64::from(year_of(anchor));
                (
                    f64::from(slot),
                    f64::from(slot + span),
                    year,
                    year + 1.0,
                )
            }
            CalendarAxis::MonthOfYear => {
                let month = f64::from(month_of(anchor));
                let year = f64::from(year_of(anchor));
                (month, month + 1.0, year, year + 1.0)
            }
            CalendarAxis::HourOfDay => {
                let hour = hour_of_day(anchor);
                let span = shift.max(series.interval().nominal_seconds().unwrap_or(3_600)) as f64
                    / 3_600.0;
                let day = epoch_day(anchor) as f64;
                (hour, (hour + span).min(24.0), day, day + 1.0)
            }
        };
        cells.push(cell_from_bounds(slot_index, transform, x0, x1, y0, y1, sample.value));
    }
    cells
}

/// Projects every enabled series into ordinal-row cells over real time.
///
/// Cell width is one data interval; sub-daily series (which carry a time of
/// day) fill the interval ending at the sample timestamp, coarser series
/// the interval starting at it.
#[must_use]
pub fn project_ordinal_cells(
    binding: &AxisBinding,
    transform: RegionTransform,
    visible: DateRange,
) -> Vec<RasterCell> {
    let mut cells = Vec::new();
    let mut ordinal = 0;

    for (slot_index, series) in binding.active() {
        ordinal += 1;
        let interval = series.interval();
        let step = interval
            .nominal_seconds()
            .unwrap_or(SECONDS_PER_DAY);
        for sample in series.samples_in(visible) {
            if sample.is_missing() {
                continue;
            }
            let (start, end) = if interval.is_sub_daily() {
                (sample.time - step, sample.time)
            } else {
                (sample.time, sample.time + step)
            };
            cells.push(cell_from_bounds(
                slot_index,
                transform,
                start as f64,
                end as f64,
                ordinal as f64 - 0.5,
                ordinal as f64 + 0.5,
                sample.value,
            ));
        }
    }
    cells
}

fn cell_from_bounds(
    slot_index: usize,
    transform: RegionTransform,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    value: f64,
) -> RasterCell {
    let left = transform.x_to_px(x0);
    let right = transform.x_to_px(x1);
    let top_a = transform.y_to_px(y0);
    let top_b = transform.y_to_px(y1);
    RasterCell {
        slot_index,
        left: left.min(right),
        top: top_a.min(top_b),
        width: (right - left).abs(),
        height: (top_b - top_a).abs(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CalendarAxis, RasterMode, leap_adjusted_slot, project_calendar_cells, select_raster_mode,
    };
    use crate::core::interval::{
        CalendarStep, CalendarUnit, RecordingInterval, SECONDS_PER_DAY,
    };
    use crate::core::scale::RegionTransform;
    use crate::core::series::{AxisBinding, Sample, TimeSeries};
    use crate::core::types::{DataRect, DateRange, DeviceRect};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn ts(y: i32, mo: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap().timestamp()
    }

    fn daily(name: &str, start: i64, days: usize) -> Arc<TimeSeries> {
        let samples = (0..days)
            .map(|k| Sample::new(start + k as i64 * SECONDS_PER_DAY, k as f64))
            .collect();
        Arc::new(
            TimeSeries::new(
                name,
                "F",
                RecordingInterval::Regular(
                    CalendarStep::new(CalendarUnit::Day, 1).expect("step"),
                ),
                samples,
            )
            .expect("valid series"),
        )
    }

    #[test]
    fn single_daily_series_selects_day_of_year_axis() {
        let binding = AxisBinding::new(vec![Some(daily("t", ts(2000, 1, 1), 30))]);
        assert_eq!(
            select_raster_mode(&binding),
            RasterMode::Calendar(CalendarAxis::DayOfYear)
        );
    }

    #[test]
    fn two_series_select_ordinal_mode() {
        let binding = AxisBinding::new(vec![
            Some(daily("a", ts(2000, 1, 1), 3)),
            Some(daily("b", ts(2000, 1, 1), 3)),
        ]);
        assert_eq!(select_raster_mode(&binding), RasterMode::Ordinal);
    }

    #[test]
    fn leap_day_occupies_slot_sixty() {
        assert_eq!(leap_adjusted_slot(ts(2000, 2, 29)), (60, 1));
        assert_eq!(leap_adjusted_slot(ts(2000, 3, 1)), (61, 1));
    }

    #[test]
    fn non_leap_february_28_spans_the_vacant_slot() {
        assert_eq!(leap_adjusted_slot(ts(2001, 2, 28)), (59, 2));
        assert_eq!(leap_adjusted_slot(ts(2001, 3, 1)), (61, 1));
    }

    #[test]
    fn feb_28_cell_is_twice_as_wide_in_non_leap_years() {
        let series = daily("t", ts(2001, 2, 27), 3);
        let transform = RegionTransform::new(
            DeviceRect::new(0.0, 0.0, 366.0, 100.0),
            DataRect::new(1.0, 367.0, 2001.0, 2002.0),
        )
        .expect("valid transform");
        let cells = project_calendar_cells(
            0,
            &series,
            transform,
            DateRange::new(ts(2001, 2, 27), ts(2001, 3, 2)),
            CalendarAxis::DayOfYear,
        );
        assert_eq!(cells.len(), 3);
        assert!((cells[1].width - 2.0).abs() < 1e-9);
        assert!((cells[0].width - 1.0).abs() < 1e-9);
    }
}
