use serde::{Deserialize, Serialize};

use crate::core::interval::{
    CalendarUnit, SECONDS_PER_DAY, SECONDS_PER_HOUR, align_to_step, step_forward, to_datetime,
};
use crate::core::types::DateRange;

/// Pixel buffer added to the measured label width when testing whether a
/// candidate step leaves room between neighboring labels.
pub const LABEL_SPACING_BUFFER_PX: f64 = 6.0;

/// Average calendar month in seconds, used only for span classification.
const AVG_MONTH_SECONDS: f64 = 30.44 * SECONDS_PER_DAY as f64;

/// Step multipliers tried per granularity, finest first.
const YEAR_STEPS: [u32; 8] = [1, 2, 5, 10, 20, 25, 50, 100];
const MONTH_STEPS: [u32; 5] = [1, 2, 3, 4, 6];
const DAY_STEPS: [u32; 3] = [1, 2, 7];
const HOUR_STEPS: [u32; 6] = [1, 2, 3, 4, 6, 12];
const MINUTE_STEPS: [u32; 7] = [1, 2, 5, 10, 15, 20, 30];

/// Ordered date ticks for the time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTickSet {
    pub ticks: Vec<i64>,
    /// Unlabeled sub-ticks between (or within) the majors.
    pub minor: Vec<i64>,
    pub labels: Vec<String>,
    pub unit: CalendarUnit,
    pub multiplier: u32,
}

impl DateTickSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

/// Granularity ladder keyed to the visible span.
///
/// Doubling the span can only hold or coarsen the unit, never refine it.
#[must_use]
pub fn granularity_for_span(span_seconds: i64) -> CalendarUnit {
    let span = span_seconds.max(0) as f64;
    if span > 36.0 * AVG_MONTH_SECONDS {
        CalendarUnit::Year
    } else if span > 90.0 * SECONDS_PER_DAY as f64 {
        CalendarUnit::Month
    } else if span > 168.0 * SECONDS_PER_HOUR as f64 {
        CalendarUnit::Day
    } else if span > 1_440.0 * 60.0 {
        CalendarUnit::Hour
    } else {
        CalendarUnit::Minute
    }
}

fn steps_for(unit: CalendarUnit) -> &'static [u32] {
    match unit {
        CalendarUnit::Year => &YEAR_STEPS,
        CalendarUnit::Month => &MONTH_STEPS,
        CalendarUnit::Day => &DAY_STEPS,
        CalendarUnit::Hour => &HOUR_STEPS,
        CalendarUnit::Minute => &MINUTE_STEPS,
    }
}

/// Strftime-style pattern for tick labels at a granularity.
#[must_use]
pub fn label_pattern(unit: CalendarUnit) -> &'static str {
    match unit {
        CalendarUnit::Year => "%Y",
        CalendarUnit::Month => "%b %Y",
        CalendarUnit::Day => "%d %b %Y",
        CalendarUnit::Hour => "%d %b %H:00",
        CalendarUnit::Minute => "%H:%M",
    }
}

/// Representative widest label used to pre-measure the strip before ticks
/// exist.
#[must_use]
pub fn sample_label(unit: CalendarUnit) -> &'static str {
    match unit {
        CalendarUnit::Year => "8888",
        CalendarUnit::Month => "May 8888",
        CalendarUnit::Day => "88 May 8888",
        CalendarUnit::Hour => "88 May 88:00",
        CalendarUnit::Minute => "88:88",
    }
}

#[must_use]
pub fn format_tick(time: i64, unit: CalendarUnit) -> String {
    to_datetime(time).format(label_pattern(unit)).to_string()
}

/// Searches the granularity's step multipliers for the first whose
/// projected on-screen spacing holds the measured label width plus buffer.
///
/// When no multiplier fits, the axis degrades to a single label at the
/// first aligned position. A zero-width visible range yields one tick at
/// the range start.
#[must_use]
pub fn find_date_labels(
    visible: DateRange,
    pixel_span: f64,
    label_px_width: f64,
) -> DateTickSet {
    let span_seconds = visible.span_seconds();
    let unit = granularity_for_span(span_seconds);

    if span_seconds <= 0 || !pixel_span.is_finite() || pixel_span <= 0.0 {
        return single_label(visible.start, unit, 1);
    }

    let needed = label_px_width.max(0.0) + LABEL_SPACING_BUFFER_PX;
    let px_per_second = pixel_span / span_seconds as f64;

    for &multiplier in steps_for(unit) {
        let step_seconds = unit.nominal_seconds() as f64 * f64::from(multiplier);
        if step_seconds * px_per_second < needed {
            continue;
        }
        let ticks = generate_ticks(visible, unit, multiplier);
        if ticks.is_empty() {
            continue;
        }
        let minor = generate_minors(&ticks, visible, unit, multiplier);
        let labels = ticks.iter().map(|&t| format_tick(t, unit)).collect();
        return DateTickSet {
            ticks,
            minor,
            labels,
            unit,
            multiplier,
        };
    }

    single_label(visible.start, unit, 1)
}

fn single_label(anchor: i64, unit: CalendarUnit, multiplier: u32) -> DateTickSet {
    DateTickSet {
        ticks: vec![anchor],
        minor: Vec::new(),
        labels: vec![format_tick(anchor, unit)],
        unit,
        multiplier,
    }
}

fn generate_ticks(visible: DateRange, unit: CalendarUnit, multiplier: u32) -> Vec<i64> {
    let mut tick = align_to_step(visible.start, unit, multiplier);
    while tick < visible.start {
        tick = step_forward(tick, unit, multiplier);
    }
    let mut ticks = Vec::new();
    while tick <= visible.end {
        ticks.push(tick);
        tick = step_forward(tick, unit, multiplier);
    }
    ticks
}

/// Minor ticks: every single unit between majors when stepping by more
/// than one unit, otherwise half-step midpoints. Minute-by-minute axes get
/// no minors.
fn generate_minors(
    majors: &[i64],
    visible: DateRange,
    unit: CalendarUnit,
    multiplier: u32,
) -> Vec<i64> {
    let mut minor = Vec::new();
    if multiplier > 1 {
        let mut tick = align_to_step(visible.start, unit, 1);
        while tick < visible.start {
            tick = step_forward(tick, unit, 1);
        }
        while tick <= visible.end {
            if !majors.contains(&tick) {
                minor.push(tick);
            }
            tick = step_forward(tick, unit, 1);
        }
    } else if unit != CalendarUnit::Minute {
        for pair in majors.windows(2) {
            minor.push((pair[0] + pair[1]) / 2);
        }
    }
    minor
}
