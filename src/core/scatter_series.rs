use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::interval::month_of;
use crate::core::scale::RegionTransform;
use crate::core::series::TimeSeries;
use crate::core::types::{DataPoint, DataRect, DateRange};

/// Slope/intercept of a least-squares fit supplied by the analysis
/// provider; the engine only draws it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    #[must_use]
    pub fn value_at(self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Deterministic geometry for one scatter pairing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScatterGeometry {
    /// Marker positions in pixel coordinates.
    pub points: Vec<(f64, f64)>,
    /// Best-fit line segments (one for a single fit, up to twelve for
    /// monthly-stratified fits), clipped to the plot rectangle.
    pub fit_segments: Vec<((f64, f64), (f64, f64))>,
    /// Confidence-interval polylines, sorted by X and clamped to the plot
    /// rectangle.
    pub confidence_runs: Vec<Vec<(f64, f64)>>,
}

/// Pairs two series into (independent, dependent) value points at exactly
/// matching timestamps, skipping pairs where either side is missing.
#[must_use]
pub fn pair_values(
    independent: &TimeSeries,
    dependent: &TimeSeries,
    period: DateRange,
) -> Vec<DataPoint> {
    let left = independent.samples_in(period);
    let right = dependent.samples_in(period);
    let mut pairs = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        let (a, b) = (left[i], right[j]);
        if a.time < b.time {
            i += 1;
        } else if b.time < a.time {
            j += 1;
        } else {
            if !a.is_missing() && !b.is_missing() {
                pairs.push(DataPoint::new(a.value, b.value));
            }
            i += 1;
            j += 1;
        }
    }
    pairs
}

/// Stratifies paired timestamps by calendar month (1..=12).
///
/// Used when the analysis provider supplies monthly fits; the engine still
/// needs the pairing to know which months are populated.
#[must_use]
pub fn months_present(
    independent: &TimeSeries,
    dependent: &TimeSeries,
    period: DateRange,
) -> [bool; 12] {
    let mut present = [false; 12];
    let left = independent.samples_in(period);
    let right = dependent.samples_in(period);
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        let (a, b) = (left[i], right[j]);
        if a.time < b.time {
            i += 1;
        } else if b.time < a.time {
            j += 1;
        } else {
            if !a.is_missing() && !b.is_missing() {
                present[month_of(a.time) as usize - 1] = true;
            }
            i += 1;
            j += 1;
        }
    }
    present
}

/// Projects paired values, fit overlays, and confidence curves into pixel
/// geometry.
///
/// Fit lines are clipped to the plot's data rectangle. Confidence curves
/// are sorted by X before segment assembly so the drawn path cannot cross
/// itself, and out-of-rectangle stretches are clamped onto the rectangle
/// edge by linear interpolation.
#[must_use]
pub fn project_scatter(
    pairs: &[DataPoint],
    transform: RegionTransform,
    fits: &[LinearFit],
    confidence_curves: &[Vec<DataPoint>],
) -> ScatterGeometry {
    let rect = transform.data();
    let mut geometry = ScatterGeometry::default();

    for pair in pairs {
        if in_rect(rect, pair.x, pair.y) {
            geometry.points.push(transform.to_px(pair.x, pair.y));
        }
    }

    for fit in fits {
        if let Some(((x1, y1), (x2, y2))) = clip_fit_line(*fit, rect) {
            geometry
                .fit_segments
                .push((transform.to_px(x1, y1), transform.to_px(x2, y2)));
        }
    }

    for curve in confidence_curves {
        let mut sorted: Vec<DataPoint> = curve
            .iter()
            .copied()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .collect();
        sorted.sort_by_key(|p| OrderedFloat(p.x));
        let runs = clip_polyline(&sorted, rect);
        for run in runs {
            if run.len() >= 2 {
                geometry
                    .confidence_runs
                    .push(run.into_iter().map(|(x, y)| transform.to_px(x, y)).collect());
            }
        }
    }
    geometry
}

fn in_rect(rect: DataRect, x: f64, y: f64) -> bool {
    let (x_lo, x_hi) = ordered(rect.x_left, rect.x_right);
    let (y_lo, y_hi) = ordered(rect.y_bottom, rect.y_top);
    x >= x_lo && x <= x_hi && y >= y_lo && y <= y_hi
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Intersects an infinite fit line with the data rectangle.
fn clip_fit_line(fit: LinearFit, rect: DataRect) -> Option<((f64, f64), (f64, f64))> {
    let (x_lo, x_hi) = ordered(rect.x_left, rect.x_right);
    let (y_lo, y_hi) = ordered(rect.y_bottom, rect.y_top);
    clip_segment(
        (x_lo, fit.value_at(x_lo)),
        (x_hi, fit.value_at(x_hi)),
        (x_lo, x_hi),
        (y_lo, y_hi),
    )
}

/// Liang-Barsky clip of one segment to an axis-aligned box.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    x_bounds: (f64, f64),
    y_bounds: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    let checks = [
        (-dx, from.0 - x_bounds.0),
        (dx, x_bounds.1 - from.0),
        (-dy, from.1 - y_bounds.0),
        (dy, y_bounds.1 - from.1),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

/// Clips a sorted polyline to the rectangle, splitting where the curve
/// leaves and re-enters. Fully outside segments contribute only their
/// interpolated edge points, so the curve degenerates to the edge instead
/// of escaping the plot.
fn clip_polyline(points: &[DataPoint], rect: DataRect) -> Vec<Vec<(f64, f64)>> {
    let (x_bounds, y_bounds) = (
        ordered(rect.x_left, rect.x_right),
        ordered(rect.y_bottom, rect.y_top),
    );
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for pair in points.windows(2) {
        let from = (pair[0].x, pair[0].y);
        let to = (pair[1].x, pair[1].y);
        match clip_segment(from, to, x_bounds, y_bounds) {
            Some((a, b)) => {
                if current.is_empty() {
                    current.push(a);
                } else if current.last() != Some(&a) {
                    runs.push(std::mem::take(&mut current));
                    current.push(a);
                }
                current.push(b);
            }
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::{LinearFit, pair_values, project_scatter};
    use crate::core::interval::{IntervalPrecision, RecordingInterval};
    use crate::core::scale::RegionTransform;
    use crate::core::series::{Sample, TimeSeries};
    use crate::core::types::{DataPoint, DataRect, DateRange, DeviceRect};

    fn series(times_values: &[(i64, f64)]) -> TimeSeries {
        let samples = times_values
            .iter()
            .map(|&(t, v)| Sample::new(t, v))
            .collect();
        TimeSeries::new(
            "s",
            "CFS",
            RecordingInterval::Irregular(IntervalPrecision::Day),
            samples,
        )
        .expect("valid series")
    }

    fn transform() -> RegionTransform {
        RegionTransform::new(
            DeviceRect::new(0.0, 0.0, 100.0, 100.0),
            DataRect::new(0.0, 10.0, 0.0, 10.0),
        )
        .expect("valid transform")
    }

    #[test]
    fn pairing_requires_exact_timestamp_match() {
        let a = series(&[(0, 1.0), (10, 2.0), (20, 3.0)]);
        let b = series(&[(10, 5.0), (20, 6.0), (30, 7.0)]);
        let pairs = pair_values(&a, &b, DateRange::new(0, 100));
        assert_eq!(
            pairs,
            vec![DataPoint::new(2.0, 5.0), DataPoint::new(3.0, 6.0)]
        );
    }

    #[test]
    fn fit_line_is_clipped_to_the_plot_rect() {
        let geometry = project_scatter(
            &[],
            transform(),
            &[LinearFit {
                slope: 2.0,
                intercept: -5.0,
            }],
            &[],
        );
        assert_eq!(geometry.fit_segments.len(), 1);
        let ((x1, y1), (x2, y2)) = geometry.fit_segments[0];
        for value in [x1, y1, x2, y2] {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn steep_fit_outside_the_rect_is_dropped() {
        let geometry = project_scatter(
            &[],
            transform(),
            &[LinearFit {
                slope: 0.0,
                intercept: 50.0,
            }],
            &[],
        );
        assert!(geometry.fit_segments.is_empty());
    }

    #[test]
    fn confidence_curve_is_sorted_before_drawing() {
        let curve = vec![
            DataPoint::new(8.0, 4.0),
            DataPoint::new(2.0, 2.0),
            DataPoint::new(5.0, 3.0),
        ];
        let geometry = project_scatter(&[], transform(), &[], &[curve]);
        assert_eq!(geometry.confidence_runs.len(), 1);
        let run = &geometry.confidence_runs[0];
        for pair in run.windows(2) {
            assert!(pair[0].0 <= pair[1].0);
        }
    }

    #[test]
    fn curve_stretch_outside_the_rect_clamps_to_the_edge() {
        let curve = vec![
            DataPoint::new(1.0, 5.0),
            DataPoint::new(4.0, 25.0),
            DataPoint::new(7.0, 5.0),
        ];
        let geometry = project_scatter(&[], transform(), &[], &[curve]);
        assert!(!geometry.confidence_runs.is_empty());
        for &(x, y) in geometry.confidence_runs.iter().flatten() {
            assert!((0.0..=100.0).contains(&x));
            assert!((0.0..=100.0).contains(&y));
        }
    }
}
