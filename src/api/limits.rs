use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::analysis::AnalysisResults;
use crate::api::config::{Encoding, UnitsPolicy};
use crate::core::area_series::derive_stacked;
use crate::core::raster_series::{self, RasterMode};
use crate::core::series::AxisBinding;
use crate::core::types::{DateRange, ValueRange, YAxis};
use crate::error::{GraphError, GraphResult};

/// Explicit per-axis display-limit overrides from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LimitOverrides {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// How the computed raw value range combines with prior view state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LimitsMode {
    /// Replace the view with the freshly computed raw range.
    #[default]
    Auto,
    /// Reuse the existing (possibly zoomed) range untouched.
    KeepCurrent,
    /// Raw range widened, never narrowed, by the explicit overrides.
    Widened(LimitOverrides),
}

/// Units-compatibility check, supplied by the host.
///
/// The engine never interprets unit strings beyond asking this question.
pub trait UnitsChecker {
    fn compatible(&self, first: &str, second: &str) -> bool;
}

/// Case-insensitive string equality; the default check.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactUnits;

impl UnitsChecker for ExactUnits {
    fn compatible(&self, first: &str, second: &str) -> bool {
        first.eq_ignore_ascii_case(second)
    }
}

/// Computed extents for one value axis under one encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub axis: YAxis,
    /// X extent in axis units: unix seconds when `x_is_time`, otherwise
    /// percent, independent values, or calendar positions.
    pub x: ValueRange,
    pub y: ValueRange,
    /// The date period backing the axis, used for sample slicing.
    pub period: DateRange,
    pub units: String,
    pub units_ignored: bool,
    /// Ordinal axes draw row 1 at the top.
    pub y_reversed: bool,
    pub x_is_time: bool,
}

/// Everything `compute_axis_limits` needs for one axis.
pub struct LimitsRequest<'a> {
    pub axis: YAxis,
    pub binding: &'a AxisBinding,
    pub encoding: &'a Encoding,
    /// The currently visible period; value extents are taken within it.
    pub visible_period: DateRange,
    pub mode: LimitsMode,
    /// Per-axis ignore-units override from configuration, when present.
    pub ignore_units: Option<bool>,
    pub units_policy: UnitsPolicy,
    /// The axis' current value range, consulted by `KeepCurrent`.
    pub existing: Option<ValueRange>,
    pub analysis: Option<&'a AnalysisResults>,
}

/// Computes the value and date extents for one axis.
///
/// Returns `Ok(None)` when the axis has no enabled series or no finite
/// values to show — the axis renders nothing, which is not an error.
/// Returns `UnitsIncompatible` when mixed units survive every resolution
/// step; the caller skips that axis and leaves the other one alone.
pub fn compute_axis_limits(
    request: &LimitsRequest<'_>,
    checker: &dyn UnitsChecker,
) -> GraphResult<Option<AxisLimits>> {
    let Some(full_period) = request.binding.union_period() else {
        return Ok(None);
    };
    let units = resolve_units(request, checker)?;

    let raw = match request.encoding {
        Encoding::Line | Encoding::Step { .. } | Encoding::Bar { .. } | Encoding::Area => {
            value_extent(request)
        }
        Encoding::StackedArea => stacked_extent(request),
        Encoding::Scatter { .. } => {
            return Ok(scatter_limits(request, full_period, units));
        }
        Encoding::Duration => duration_extent(request),
        Encoding::PeriodOfRecord => {
            let count = request.binding.active_count();
            return Ok(Some(AxisLimits {
                axis: request.axis,
                x: time_range(full_period),
                y: ValueRange::new(0.0, count as f64 + 1.0),
                period: full_period,
                units: units.units,
                units_ignored: units.ignored,
                y_reversed: true,
                x_is_time: true,
            }));
        }
        Encoding::Raster => {
            return Ok(raster_limits(request, full_period, units));
        }
    };

    let Some(raw) = raw else {
        return Ok(None);
    };
    let y = resolve_mode(raw, request.mode, request.existing);
    let x = match request.encoding {
        Encoding::Duration => ValueRange::new(0.0, 100.0),
        _ => time_range(full_period),
    };
    Ok(Some(AxisLimits {
        axis: request.axis,
        x,
        y,
        period: full_period,
        units: units.units,
        units_ignored: units.ignored,
        y_reversed: false,
        x_is_time: !matches!(request.encoding, Encoding::Duration),
    }))
}

/// Widens `shared` so the right axis extends the date period but can never
/// narrow what the left axis established.
#[must_use]
pub fn extend_shared_period(shared: DateRange, right: Option<&AxisLimits>) -> DateRange {
    match right {
        Some(limits) => shared.union(limits.period),
        None => shared,
    }
}

struct ResolvedUnits {
    units: String,
    ignored: bool,
}

fn resolve_units(
    request: &LimitsRequest<'_>,
    checker: &dyn UnitsChecker,
) -> GraphResult<ResolvedUnits> {
    let mut active = request.binding.active();
    let Some((_, first)) = active.next() else {
        return Ok(ResolvedUnits {
            units: String::new(),
            ignored: false,
        });
    };
    let reference = first.units().to_owned();

    if request.encoding.forces_ignore_units() {
        return Ok(ResolvedUnits {
            units: reference,
            ignored: true,
        });
    }

    for (_, series) in active {
        if checker.compatible(&reference, series.units()) {
            continue;
        }
        if request.ignore_units == Some(true) {
            return Ok(ResolvedUnits {
                units: reference,
                ignored: true,
            });
        }
        match request.units_policy {
            UnitsPolicy::Abort => {
                return Err(GraphError::UnitsIncompatible {
                    axis: request.axis,
                    first: reference,
                    second: series.units().to_owned(),
                });
            }
            UnitsPolicy::Continue => {
                warn!(
                    axis = ?request.axis,
                    first = %reference,
                    second = series.units(),
                    "mixed units on axis; continuing per policy"
                );
                return Ok(ResolvedUnits {
                    units: reference,
                    ignored: true,
                });
            }
        }
    }
    Ok(ResolvedUnits {
        units: reference,
        ignored: false,
    })
}

fn value_extent(request: &LimitsRequest<'_>) -> Option<ValueRange> {
    let mut extent: Option<ValueRange> = None;
    for (_, series) in request.binding.active() {
        if let Some(range) = series.value_extent_in(request.visible_period) {
            extent = Some(match extent {
                Some(current) => current.union(range),
                None => range,
            });
        }
    }
    extent
}

fn stacked_extent(request: &LimitsRequest<'_>) -> Option<ValueRange> {
    let sources: Vec<_> = request
        .binding
        .active()
        .map(|(_, series)| series.as_ref())
        .collect();
    let derived = derive_stacked(&sources).ok()?;
    let mut extent = ValueRange::new(0.0, 0.0);
    let mut any = false;
    for level in &derived {
        if let Some(range) = level.value_extent_in(request.visible_period) {
            extent = extent.union(range);
            any = true;
        }
    }
    any.then_some(extent)
}

fn duration_extent(request: &LimitsRequest<'_>) -> Option<ValueRange> {
    if let Some(analysis) = request.analysis {
        let mut extent: Option<ValueRange> = None;
        for curve in analysis.durations.iter().flatten() {
            for &value in &curve.values {
                if value.is_finite() {
                    extent = Some(match extent {
                        Some(range) => range.include(value),
                        None => ValueRange::new(value, value),
                    });
                }
            }
        }
        if extent.is_some() {
            return extent;
        }
    }
    value_extent(request)
}

fn scatter_limits(
    request: &LimitsRequest<'_>,
    full_period: DateRange,
    units: ResolvedUnits,
) -> Option<AxisLimits> {
    let mut active = request.binding.active();
    let (_, independent) = active.next()?;

    let mut x: Option<ValueRange> = None;
    let mut y: Option<ValueRange> = None;
    if let Some(analysis) = request.analysis {
        for regression in analysis.regressions.iter().flatten() {
            if let Some(range) = regression.independent {
                x = Some(x.map_or(range, |current| current.union(range)));
            }
            if let Some(range) = regression.dependent {
                y = Some(y.map_or(range, |current| current.union(range)));
            }
        }
    }

    // No regression succeeded: fall back to the raw sample extents.
    let x = x.or_else(|| independent.value_extent_in(request.visible_period))?;
    let y = y.or_else(|| {
        let mut extent: Option<ValueRange> = None;
        for (_, series) in active {
            if let Some(range) = series.value_extent_in(request.visible_period) {
                extent = Some(match extent {
                    Some(current) => current.union(range),
                    None => range,
                });
            }
        }
        extent
    })?;

    Some(AxisLimits {
        axis: request.axis,
        x,
        y: resolve_mode(y, request.mode, request.existing),
        period: full_period,
        units: units.units,
        units_ignored: units.ignored,
        y_reversed: false,
        x_is_time: false,
    })
}

fn raster_limits(
    request: &LimitsRequest<'_>,
    full_period: DateRange,
    units: ResolvedUnits,
) -> Option<AxisLimits> {
    match raster_series::select_raster_mode(request.binding) {
        RasterMode::Calendar(axis) => {
            let (_, series) = request.binding.active().next()?;
            Some(AxisLimits {
                axis: request.axis,
                x: axis.x_range(),
                y: raster_series::calendar_y_range(series, axis),
                period: full_period,
                units: units.units,
                units_ignored: units.ignored,
                y_reversed: true,
                x_is_time: false,
            })
        }
        RasterMode::Ordinal => {
            let count = request.binding.active_count();
            (count > 0).then(|| AxisLimits {
                axis: request.axis,
                x: time_range(full_period),
                y: ValueRange::new(0.0, count as f64 + 1.0),
                period: full_period,
                units: units.units,
                units_ignored: units.ignored,
                y_reversed: true,
                x_is_time: true,
            })
        }
    }
}

fn resolve_mode(raw: ValueRange, mode: LimitsMode, existing: Option<ValueRange>) -> ValueRange {
    match mode {
        LimitsMode::Auto => raw,
        LimitsMode::KeepCurrent => existing.unwrap_or(raw),
        LimitsMode::Widened(overrides) => raw.widened_by(overrides.min, overrides.max),
    }
}

fn time_range(period: DateRange) -> ValueRange {
    ValueRange::new(period.start as f64, period.end as f64)
}

#[cfg(test)]
mod tests {
    use super::{
        ExactUnits, LimitOverrides, LimitsMode, LimitsRequest, compute_axis_limits,
    };
    use crate::api::config::{Encoding, UnitsPolicy};
    use crate::core::interval::{IntervalPrecision, RecordingInterval};
    use crate::core::series::{AxisBinding, Sample, TimeSeries};
    use crate::core::types::{DateRange, ValueRange, YAxis};
    use crate::error::GraphError;
    use std::sync::Arc;

    fn series(name: &str, units: &str, values: &[(i64, f64)]) -> Arc<TimeSeries> {
        let samples = values.iter().map(|&(t, v)| Sample::new(t, v)).collect();
        Arc::new(
            TimeSeries::new(
                name,
                units,
                RecordingInterval::Irregular(IntervalPrecision::Day),
                samples,
            )
            .expect("valid series"),
        )
    }

    fn request<'a>(binding: &'a AxisBinding, encoding: &'a Encoding) -> LimitsRequest<'a> {
        LimitsRequest {
            axis: YAxis::Left,
            binding,
            encoding,
            visible_period: DateRange::new(0, 1_000),
            mode: LimitsMode::Auto,
            ignore_units: None,
            units_policy: UnitsPolicy::Abort,
            existing: None,
            analysis: None,
        }
    }

    #[test]
    fn mixed_units_abort_by_default() {
        let binding = AxisBinding::new(vec![
            Some(series("flow", "CFS", &[(0, 1.0), (10, 2.0)])),
            Some(series("volume", "AF", &[(0, 3.0), (10, 4.0)])),
        ]);
        let encoding = Encoding::Line;
        let result = compute_axis_limits(&request(&binding, &encoding), &ExactUnits);
        assert!(matches!(
            result,
            Err(GraphError::UnitsIncompatible { axis: YAxis::Left, .. })
        ));
    }

    #[test]
    fn ignore_override_allows_mixed_units() {
        let binding = AxisBinding::new(vec![
            Some(series("flow", "CFS", &[(0, 1.0), (10, 2.0)])),
            Some(series("volume", "AF", &[(0, 3.0), (10, 4.0)])),
        ]);
        let encoding = Encoding::Line;
        let mut req = request(&binding, &encoding);
        req.ignore_units = Some(true);
        let limits = compute_axis_limits(&req, &ExactUnits)
            .expect("limits")
            .expect("axis present");
        assert!(limits.units_ignored);
        assert_eq!(limits.y, ValueRange::new(1.0, 4.0));
    }

    #[test]
    fn duration_forces_percent_axis() {
        let binding = AxisBinding::new(vec![Some(series("q", "CFS", &[(0, 5.0), (10, 9.0)]))]);
        let encoding = Encoding::Duration;
        let limits = compute_axis_limits(&request(&binding, &encoding), &ExactUnits)
            .expect("limits")
            .expect("axis present");
        assert_eq!(limits.x, ValueRange::new(0.0, 100.0));
        assert!(!limits.x_is_time);
        assert!(limits.units_ignored);
    }

    #[test]
    fn period_of_record_reverses_ordinal_axis() {
        let binding = AxisBinding::new(vec![
            Some(series("a", "CFS", &[(0, 1.0), (10, 2.0)])),
            Some(series("b", "AF", &[(5, 1.0), (20, 2.0)])),
        ]);
        let encoding = Encoding::PeriodOfRecord;
        let limits = compute_axis_limits(&request(&binding, &encoding), &ExactUnits)
            .expect("limits")
            .expect("axis present");
        assert_eq!(limits.y, ValueRange::new(0.0, 3.0));
        assert!(limits.y_reversed);
    }

    #[test]
    fn overrides_widen_but_never_narrow() {
        let binding = AxisBinding::new(vec![Some(series("q", "CFS", &[(0, 5.0), (10, 9.0)]))]);
        let encoding = Encoding::Line;
        let mut req = request(&binding, &encoding);
        req.mode = LimitsMode::Widened(LimitOverrides {
            min: Some(7.0),
            max: Some(20.0),
        });
        let limits = compute_axis_limits(&req, &ExactUnits)
            .expect("limits")
            .expect("axis present");
        assert_eq!(limits.y, ValueRange::new(5.0, 20.0));
    }

    #[test]
    fn keep_current_reuses_the_existing_range() {
        let binding = AxisBinding::new(vec![Some(series("q", "CFS", &[(0, 5.0), (10, 9.0)]))]);
        let encoding = Encoding::Line;
        let mut req = request(&binding, &encoding);
        req.mode = LimitsMode::KeepCurrent;
        req.existing = Some(ValueRange::new(6.0, 7.0));
        let limits = compute_axis_limits(&req, &ExactUnits)
            .expect("limits")
            .expect("axis present");
        assert_eq!(limits.y, ValueRange::new(6.0, 7.0));
    }

    #[test]
    fn empty_axis_is_not_an_error() {
        let binding = AxisBinding::new(vec![None]);
        let encoding = Encoding::Line;
        let result = compute_axis_limits(&request(&binding, &encoding), &ExactUnits);
        assert!(matches!(result, Ok(None)));
    }
}
