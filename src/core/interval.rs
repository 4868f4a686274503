use chrono::{DateTime, Datelike, Months, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Calendar unit used for regular recording steps and date-axis granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CalendarUnit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl CalendarUnit {
    /// Nominal length in seconds; months and years use calendar averages and
    /// are only suitable for pixel-spacing estimates, never for stepping.
    #[must_use]
    pub fn nominal_seconds(self) -> i64 {
        match self {
            Self::Minute => SECONDS_PER_MINUTE,
            Self::Hour => SECONDS_PER_HOUR,
            Self::Day => SECONDS_PER_DAY,
            Self::Month => 30 * SECONDS_PER_DAY,
            Self::Year => 365 * SECONDS_PER_DAY,
        }
    }
}

/// A regular recording step: unit times a positive multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarStep {
    pub unit: CalendarUnit,
    pub multiplier: u32,
}

impl CalendarStep {
    pub fn new(unit: CalendarUnit, multiplier: u32) -> GraphResult<Self> {
        if multiplier == 0 {
            return Err(GraphError::InvalidData(
                "calendar step multiplier must be > 0".to_owned(),
            ));
        }
        Ok(Self { unit, multiplier })
    }

    #[must_use]
    pub fn nominal_seconds(self) -> i64 {
        self.unit.nominal_seconds() * i64::from(self.multiplier)
    }
}

/// Date precision of a series' timestamps, independent of regularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IntervalPrecision {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl IntervalPrecision {
    #[must_use]
    pub fn is_sub_daily(self) -> bool {
        matches!(self, Self::Minute | Self::Hour)
    }
}

/// How a series' samples are spaced in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordingInterval {
    Regular(CalendarStep),
    Irregular(IntervalPrecision),
}

impl RecordingInterval {
    #[must_use]
    pub fn precision(self) -> IntervalPrecision {
        match self {
            Self::Regular(step) => match step.unit {
                CalendarUnit::Minute => IntervalPrecision::Minute,
                CalendarUnit::Hour => IntervalPrecision::Hour,
                CalendarUnit::Day => IntervalPrecision::Day,
                CalendarUnit::Month => IntervalPrecision::Month,
                CalendarUnit::Year => IntervalPrecision::Year,
            },
            Self::Irregular(precision) => precision,
        }
    }

    #[must_use]
    pub fn is_sub_daily(self) -> bool {
        self.precision().is_sub_daily()
    }

    #[must_use]
    pub fn is_annual(self) -> bool {
        matches!(self.precision(), IntervalPrecision::Year)
    }

    /// Nominal sample spacing in seconds; irregular series report `None`.
    #[must_use]
    pub fn nominal_seconds(self) -> Option<i64> {
        match self {
            Self::Regular(step) => Some(step.nominal_seconds()),
            Self::Irregular(_) => None,
        }
    }

    /// Largest time gap across which two consecutive points may be
    /// connected, scaled to the series' date precision.
    #[must_use]
    pub fn default_allowed_gap_seconds(self) -> i64 {
        match self.precision() {
            IntervalPrecision::Minute | IntervalPrecision::Hour => 7 * SECONDS_PER_DAY,
            IntervalPrecision::Day => 365 * SECONDS_PER_DAY,
            IntervalPrecision::Month | IntervalPrecision::Year => 2 * 365 * SECONDS_PER_DAY,
        }
    }
}

/// Converts unix seconds to a UTC datetime, saturating out-of-range inputs
/// to the epoch rather than panicking on hostile data.
#[must_use]
pub fn to_datetime(time: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(time, 0)
        .unwrap_or_else(|| Utc.timestamp_opt(0, 0).single().expect("epoch is valid"))
}

/// Truncates a timestamp to the start of its calendar unit.
#[must_use]
pub fn floor_to_unit(time: i64, unit: CalendarUnit) -> i64 {
    let dt = to_datetime(time);
    let floored = match unit {
        CalendarUnit::Minute => dt.with_second(0),
        CalendarUnit::Hour => dt.with_second(0).and_then(|d| d.with_minute(0)),
        CalendarUnit::Day => dt
            .with_second(0)
            .and_then(|d| d.with_minute(0))
            .and_then(|d| d.with_hour(0)),
        CalendarUnit::Month => dt
            .with_second(0)
            .and_then(|d| d.with_minute(0))
            .and_then(|d| d.with_hour(0))
            .and_then(|d| d.with_day(1)),
        CalendarUnit::Year => dt
            .with_second(0)
            .and_then(|d| d.with_minute(0))
            .and_then(|d| d.with_hour(0))
            .and_then(|d| d.with_day(1))
            .and_then(|d| d.with_month(1)),
    };
    floored.map_or(time, |d| d.timestamp())
}

/// Truncates to the unit, then aligns down onto the `multiplier` grid within
/// the unit's natural parent (years onto multiples of the step, months and
/// hours and minutes onto offsets within year/day/hour).
#[must_use]
pub fn align_to_step(time: i64, unit: CalendarUnit, multiplier: u32) -> i64 {
    let floored = floor_to_unit(time, unit);
    if multiplier <= 1 {
        return floored;
    }
    let step = i64::from(multiplier);
    let dt = to_datetime(floored);
    match unit {
        CalendarUnit::Year => {
            let year = i64::from(dt.year());
            let aligned = year - year.rem_euclid(step);
            Utc.with_ymd_and_hms(aligned as i32, 1, 1, 0, 0, 0)
                .single()
                .map_or(floored, |d| d.timestamp())
        }
        CalendarUnit::Month => {
            let month0 = i64::from(dt.month0());
            let aligned = month0 - month0.rem_euclid(step);
            Utc.with_ymd_and_hms(dt.year(), aligned as u32 + 1, 1, 0, 0, 0)
                .single()
                .map_or(floored, |d| d.timestamp())
        }
        CalendarUnit::Day => {
            // Days align onto a grid anchored at the start of the month so
            // weekly steps restart on the 1st, 8th, 15th, 22nd, 29th.
            let day0 = i64::from(dt.day0());
            let aligned = day0 - day0.rem_euclid(step);
            Utc.with_ymd_and_hms(dt.year(), dt.month(), aligned as u32 + 1, 0, 0, 0)
                .single()
                .map_or(floored, |d| d.timestamp())
        }
        CalendarUnit::Hour => {
            let hour = i64::from(dt.hour());
            let aligned = hour - hour.rem_euclid(step);
            floored - (hour - aligned) * SECONDS_PER_HOUR
        }
        CalendarUnit::Minute => {
            let minute = i64::from(dt.minute());
            let aligned = minute - minute.rem_euclid(step);
            floored - (minute - aligned) * SECONDS_PER_MINUTE
        }
    }
}

/// Advances a timestamp by one calendar step.
///
/// Month and year steps are calendar-exact (month lengths vary, the
/// day-of-month clamps); minute/hour/day steps are fixed-length.
#[must_use]
pub fn step_forward(time: i64, unit: CalendarUnit, multiplier: u32) -> i64 {
    let count = i64::from(multiplier.max(1));
    match unit {
        CalendarUnit::Minute => time + count * SECONDS_PER_MINUTE,
        CalendarUnit::Hour => time + count * SECONDS_PER_HOUR,
        CalendarUnit::Day => time + count * SECONDS_PER_DAY,
        CalendarUnit::Month => to_datetime(time)
            .checked_add_months(Months::new(multiplier.max(1)))
            .map_or(time + count * CalendarUnit::Month.nominal_seconds(), |d| {
                d.timestamp()
            }),
        CalendarUnit::Year => to_datetime(time)
            .checked_add_months(Months::new(multiplier.max(1).saturating_mul(12)))
            .map_or(time + count * CalendarUnit::Year.nominal_seconds(), |d| {
                d.timestamp()
            }),
    }
}

/// Day of year (1..=366) of a timestamp.
#[must_use]
pub fn day_of_year(time: i64) -> u32 {
    to_datetime(time).ordinal()
}

/// Calendar year of a timestamp.
#[must_use]
pub fn year_of(time: i64) -> i32 {
    to_datetime(time).year()
}

/// Month of year (1..=12) of a timestamp.
#[must_use]
pub fn month_of(time: i64) -> u32 {
    to_datetime(time).month()
}

/// Fractional hour of day in [0, 24).
#[must_use]
pub fn hour_of_day(time: i64) -> f64 {
    let dt = to_datetime(time);
    f64::from(dt.hour())
        + f64::from(dt.minute()) / 60.0
        + f64::from(dt.second()) / 3_600.0
}

#[cfg(test)]
mod tests {
    use super::{
        CalendarStep, CalendarUnit, IntervalPrecision, RecordingInterval, SECONDS_PER_DAY,
        align_to_step, day_of_year, floor_to_unit, step_forward, to_datetime,
    };
    use chrono::{Datelike, TimeZone, Utc};

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap().timestamp()
    }

    #[test]
    fn floor_truncates_each_unit() {
        let t = ts(1999, 7, 17, 13, 42);
        assert_eq!(floor_to_unit(t, CalendarUnit::Hour), ts(1999, 7, 17, 13, 0));
        assert_eq!(floor_to_unit(t, CalendarUnit::Day), ts(1999, 7, 17, 0, 0));
        assert_eq!(floor_to_unit(t, CalendarUnit::Month), ts(1999, 7, 1, 0, 0));
        assert_eq!(floor_to_unit(t, CalendarUnit::Year), ts(1999, 1, 1, 0, 0));
    }

    #[test]
    fn align_snaps_years_onto_step_grid() {
        let t = ts(1997, 3, 4, 0, 0);
        assert_eq!(align_to_step(t, CalendarUnit::Year, 5), ts(1995, 1, 1, 0, 0));
        assert_eq!(
            align_to_step(t, CalendarUnit::Month, 3),
            ts(1997, 1, 1, 0, 0)
        );
    }

    #[test]
    fn month_step_is_calendar_exact() {
        let jan31 = ts(2001, 1, 31, 0, 0);
        let stepped = step_forward(jan31, CalendarUnit::Month, 1);
        let dt = to_datetime(stepped);
        assert_eq!((dt.year(), dt.month(), dt.day()), (2001, 2, 28));
    }

    #[test]
    fn leap_day_has_ordinal_sixty() {
        let feb29 = ts(2000, 2, 29, 0, 0);
        assert_eq!(day_of_year(feb29), 60);
    }

    #[test]
    fn gap_defaults_scale_with_precision() {
        let hourly = RecordingInterval::Irregular(IntervalPrecision::Hour);
        let daily = RecordingInterval::Regular(
            CalendarStep::new(CalendarUnit::Day, 1).expect("valid step"),
        );
        assert_eq!(hourly.default_allowed_gap_seconds(), 7 * SECONDS_PER_DAY);
        assert_eq!(daily.default_allowed_gap_seconds(), 365 * SECONDS_PER_DAY);
    }
}
