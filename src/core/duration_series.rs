use serde::{Deserialize, Serialize};

use crate::core::line_series::{LineGeometry, PolylineRun};
use crate::core::scale::RegionTransform;

/// Percent-of-time-exceeded curve supplied by the analysis provider.
///
/// `percents` run over [0, 100]; `values` are the matching exceedance
/// values. Both arrays are position-aligned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DurationCurve {
    pub percents: Vec<f64>,
    pub values: Vec<f64>,
}

impl DurationCurve {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.percents.is_empty() || self.values.is_empty()
    }
}

/// Projects a duration curve onto the percent axis.
///
/// The X domain is always [0, 100]; non-finite entries break the polyline
/// the same way missing values do elsewhere.
#[must_use]
pub fn project_duration(curve: &DurationCurve, transform: RegionTransform) -> LineGeometry {
    let mut geometry = LineGeometry::default();
    let mut run: Vec<(f64, f64)> = Vec::new();

    for (&percent, &value) in curve.percents.iter().zip(curve.values.iter()) {
        if !percent.is_finite() || !value.is_finite() {
            flush(&mut geometry, &mut run);
            continue;
        }
        run.push(transform.to_px(percent, value));
    }
    flush(&mut geometry, &mut run);
    geometry
}

fn flush(geometry: &mut LineGeometry, run: &mut Vec<(f64, f64)>) {
    match run.len() {
        0 => {}
        1 => geometry.isolated.push(run[0]),
        _ => geometry.runs.push(PolylineRun {
            points: std::mem::take(run),
        }),
    }
    run.clear();
}
