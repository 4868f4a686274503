use serde::{Deserialize, Serialize};

use tracing::warn;

use crate::core::duration_series::DurationCurve;
use crate::core::scatter_series::LinearFit;
use crate::core::series::{AxisBinding, TimeSeries};
use crate::core::types::{DataPoint, DateRange, ValueRange};
use crate::error::{GraphError, GraphResult};

/// Precomputed regression output for one scatter pairing.
///
/// Everything here is supplied by the analysis provider; the engine only
/// draws it. `monthly_fits` is indexed by calendar month (January first)
/// when stratified fits were requested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegressionResult {
    pub fit: Option<LinearFit>,
    pub monthly_fits: Vec<Option<LinearFit>>,
    /// Confidence-interval curves as (independent, dependent) value points.
    pub confidence_curves: Vec<Vec<DataPoint>>,
    /// Value range of the independent variable used by the analysis.
    pub independent: Option<ValueRange>,
    /// Value range of the dependent variable used by the analysis.
    pub dependent: Option<ValueRange>,
}

/// External statistics collaborator.
///
/// Implementations run synchronously; the engine invokes them only when
/// analysis inputs changed since the previous render cycle.
pub trait AnalysisProvider {
    fn regression(
        &self,
        independent: &TimeSeries,
        dependent: &TimeSeries,
        period: DateRange,
    ) -> GraphResult<RegressionResult>;

    fn duration_curve(&self, series: &TimeSeries, period: DateRange) -> GraphResult<DurationCurve>;
}

/// Provider that answers every request with an empty result; used when the
/// host wires no statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAnalysis;

impl AnalysisProvider for NullAnalysis {
    fn regression(
        &self,
        _independent: &TimeSeries,
        _dependent: &TimeSeries,
        _period: DateRange,
    ) -> GraphResult<RegressionResult> {
        Ok(RegressionResult::default())
    }

    fn duration_curve(
        &self,
        _series: &TimeSeries,
        _period: DateRange,
    ) -> GraphResult<DurationCurve> {
        Ok(DurationCurve::default())
    }
}

/// Per-cycle analysis cache, position-aligned with the axis binding slots.
///
/// A failed provider call leaves `None` in its slot so index-based style
/// lookups stay aligned; the affected series is skipped for the analysis
/// feature but still drawn by baseline encodings.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResults {
    pub regressions: Vec<Option<RegressionResult>>,
    pub durations: Vec<Option<DurationCurve>>,
}

/// Runs scatter regressions for every enabled series against the first
/// enabled series.
#[must_use]
pub fn run_regressions(
    provider: &dyn AnalysisProvider,
    binding: &AxisBinding,
    period: DateRange,
) -> AnalysisResults {
    let mut results = AnalysisResults {
        regressions: vec![None; binding.len()],
        durations: Vec::new(),
    };
    let mut active = binding.active();
    let Some((_, independent)) = active.next() else {
        return results;
    };
    for (slot_index, dependent) in active {
        match provider.regression(independent, dependent, period) {
            Ok(result) => results.regressions[slot_index] = Some(result),
            Err(err) => {
                warn!(
                    series = dependent.name(),
                    error = %GraphError::AnalysisFailure(err.to_string()),
                    "regression failed; series keeps a null analysis slot"
                );
            }
        }
    }
    results
}

/// Runs duration curves for every enabled series.
#[must_use]
pub fn run_duration_curves(
    provider: &dyn AnalysisProvider,
    binding: &AxisBinding,
    period: DateRange,
) -> AnalysisResults {
    let mut results = AnalysisResults {
        regressions: Vec::new(),
        durations: vec![None; binding.len()],
    };
    for (slot_index, series) in binding.active() {
        match provider.duration_curve(series, period) {
            Ok(curve) if !curve.is_empty() => results.durations[slot_index] = Some(curve),
            Ok(_) => {}
            Err(err) => {
                warn!(
                    series = series.name(),
                    error = %GraphError::AnalysisFailure(err.to_string()),
                    "duration analysis failed; series keeps a null analysis slot"
                );
            }
        }
    }
    results
}
