use serde::{Deserialize, Serialize};

use crate::core::scale::RegionTransform;
use crate::core::series::TimeSeries;
use crate::core::types::DateRange;

/// One unbroken polyline in pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineRun {
    pub points: Vec<(f64, f64)>,
}

/// Deterministic geometry for a connected-line series.
///
/// `runs` hold the connectable stretches; `isolated` are valid points with
/// no drawable neighbor on either side, rendered as markers when the style
/// asks for them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineGeometry {
    pub runs: Vec<PolylineRun>,
    pub isolated: Vec<(f64, f64)>,
}

impl LineGeometry {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() && self.isolated.is_empty()
    }
}

/// Projects a series into straight-segment polyline runs.
///
/// A missing value breaks the current run. For irregular series, two
/// consecutive points further apart than `allowed_gap_seconds` are treated
/// the same as a missing value between them; regular series encode their
/// gaps as explicit missing samples, so only the missing test applies.
#[must_use]
pub fn project_line(
    series: &TimeSeries,
    transform: RegionTransform,
    period: DateRange,
    allowed_gap_seconds: Option<i64>,
) -> LineGeometry {
    let allowed_gap = gap_limit(series, allowed_gap_seconds);
    let mut geometry = LineGeometry::default();
    let mut run: Vec<(f64, f64)> = Vec::new();
    let mut last_time: Option<i64> = None;

    for sample in series.samples_in(period) {
        if sample.is_missing() {
            flush_run(&mut geometry, &mut run);
            last_time = None;
            continue;
        }
        if let (Some(previous), Some(limit)) = (last_time, allowed_gap) {
            if sample.time - previous > limit {
                flush_run(&mut geometry, &mut run);
            }
        }
        run.push(transform.to_px(sample.time as f64, sample.value));
        last_time = Some(sample.time);
    }
    flush_run(&mut geometry, &mut run);
    geometry
}

pub(crate) fn gap_limit(series: &TimeSeries, override_seconds: Option<i64>) -> Option<i64> {
    match series.interval() {
        crate::core::interval::RecordingInterval::Regular(_) => None,
        crate::core::interval::RecordingInterval::Irregular(_) => {
            Some(override_seconds.unwrap_or_else(|| {
                series.interval().default_allowed_gap_seconds()
            }))
        }
    }
}

pub(crate) fn flush_run(geometry: &mut LineGeometry, run: &mut Vec<(f64, f64)>) {
    match run.len() {
        0 => {}
        1 => geometry.isolated.push(run[0]),
        _ => geometry.runs.push(PolylineRun {
            points: std::mem::take(run),
        }),
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::project_line;
    use crate::core::interval::{IntervalPrecision, RecordingInterval, SECONDS_PER_DAY};
    use crate::core::scale::RegionTransform;
    use crate::core::series::{Sample, TimeSeries};
    use crate::core::types::{DataRect, DateRange, DeviceRect};

    fn transform(x_right: f64) -> RegionTransform {
        RegionTransform::new(
            DeviceRect::new(0.0, 0.0, 1_000.0, 500.0),
            DataRect::new(0.0, x_right, 0.0, 100.0),
        )
        .expect("valid transform")
    }

    fn irregular(times_values: &[(i64, f64)]) -> TimeSeries {
        let samples = times_values
            .iter()
            .map(|&(t, v)| Sample {
                time: t,
                value: v,
                quality: None,
            })
            .collect();
        TimeSeries::new(
            "irr",
            "CFS",
            RecordingInterval::Irregular(IntervalPrecision::Day),
            samples,
        )
        .expect("valid series")
    }

    #[test]
    fn missing_value_breaks_the_run() {
        let series = irregular(&[(0, 10.0), (100, 20.0), (200, f64::NAN), (300, 30.0)]);
        let geometry = project_line(&series, transform(1_000.0), DateRange::new(0, 1_000), None);
        assert_eq!(geometry.runs.len(), 1);
        assert_eq!(geometry.isolated.len(), 1);
    }

    #[test]
    fn excessive_gap_forces_isolated_markers() {
        let day = SECONDS_PER_DAY;
        let series = irregular(&[(0, 10.0), (30 * day, 20.0)]);
        let geometry = project_line(
            &series,
            transform((40 * day) as f64),
            DateRange::new(0, 40 * day),
            Some(7 * day),
        );
        assert!(geometry.runs.is_empty());
        assert_eq!(geometry.isolated.len(), 2);
    }

    #[test]
    fn points_within_gap_connect_normally() {
        let day = SECONDS_PER_DAY;
        let series = irregular(&[(0, 10.0), (3 * day, 20.0), (5 * day, 15.0)]);
        let geometry = project_line(
            &series,
            transform((10 * day) as f64),
            DateRange::new(0, 10 * day),
            Some(7 * day),
        );
        assert_eq!(geometry.runs.len(), 1);
        assert_eq!(geometry.runs[0].points.len(), 3);
    }
}
