use tracing::{debug, warn};

use crate::api::analysis::AnalysisResults;
use crate::api::config::{Encoding, GraphEngineConfig, StyleLookup, series_key};
use crate::api::limits::{AxisLimits, UnitsChecker};
use crate::api::symbol_table::SymbolTable;
use crate::core::area_series::{derive_stacked, project_area};
use crate::core::bar_series::{BarOptions, clamped_baseline, project_bars};
use crate::core::duration_series::project_duration;
use crate::core::line_series::{LineGeometry, project_line};
use crate::core::period_series::project_period_bars;
use crate::core::raster_series::{RasterMode, project_calendar_cells, project_ordinal_cells, select_raster_mode};
use crate::core::scale::RegionTransform;
use crate::core::scatter_series::{LinearFit, pair_values, project_scatter};
use crate::core::series::{AxisBinding, SeriesRef, TimeSeries};
use crate::core::step_series::project_steps;
use crate::core::types::{DateRange, YAxis};
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, PolygonPrimitive, RectPrimitive, RenderFrame,
    SymbolKind, SymbolPrimitive,
};

/// Default series colors cycled by slot position when the style store has
/// no per-series color.
pub const DEFAULT_PALETTE: [Color; 8] = [
    Color::rgb(0.12, 0.29, 0.69),
    Color::rgb(0.84, 0.19, 0.16),
    Color::rgb(0.17, 0.55, 0.24),
    Color::rgb(0.58, 0.21, 0.60),
    Color::rgb(0.90, 0.49, 0.09),
    Color::rgb(0.10, 0.60, 0.62),
    Color::rgb(0.55, 0.38, 0.19),
    Color::rgb(0.35, 0.35, 0.35),
];

/// Resolved drawing style for one series slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub color: Color,
    pub line_width: f64,
    pub stroke: LineStrokeStyle,
    pub symbol: SymbolKind,
    pub symbol_size_px: f64,
    /// Alpha applied to area and bar fills.
    pub fill_alpha: f64,
}

/// Style for a slot: explicit configuration first, palette fallback after.
#[must_use]
pub fn style_for_slot(styles: &dyn StyleLookup, axis: YAxis, slot_index: usize) -> SeriesStyle {
    let color = styles
        .get_color(&series_key(axis, slot_index, "color"))
        .unwrap_or(DEFAULT_PALETTE[slot_index % DEFAULT_PALETTE.len()]);
    let line_width = styles
        .get_f64(&series_key(axis, slot_index, "line-width"))
        .filter(|w| w.is_finite() && *w > 0.0)
        .unwrap_or(1.5);
    SeriesStyle {
        color,
        line_width,
        stroke: LineStrokeStyle::Solid,
        symbol: SymbolKind::Circle,
        symbol_size_px: 5.0,
        fill_alpha: 0.55,
    }
}

/// One recoverable per-series condition recorded during a render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderWarning {
    pub series: String,
    pub message: String,
}

/// Collaborators and configuration the series pass needs.
pub struct PipelineContext<'a> {
    pub config: &'a GraphEngineConfig,
    pub styles: &'a dyn StyleLookup,
    pub units: &'a dyn UnitsChecker,
    pub symbol_table: Option<&'a SymbolTable>,
    pub analysis: Option<&'a AnalysisResults>,
}

/// Renders every series bound to one axis through the encoding dispatch.
///
/// Individual series failures (unit mismatch, empty window, absent
/// analysis) skip that series and record a warning; they never fail the
/// axis.
pub fn render_axis_series(
    frame: &mut RenderFrame,
    axis: YAxis,
    binding: &AxisBinding,
    limits: &AxisLimits,
    transform: RegionTransform,
    visible: DateRange,
    ctx: &PipelineContext<'_>,
) -> Vec<RenderWarning> {
    let mut warnings = Vec::new();

    match ctx.config.encoding {
        Encoding::PeriodOfRecord => {
            render_period_of_record(frame, axis, binding, transform, visible, ctx);
            return warnings;
        }
        Encoding::Raster => {
            render_raster(frame, axis, binding, transform, visible, ctx, &mut warnings);
            return warnings;
        }
        Encoding::StackedArea => {
            render_stacked_area(frame, axis, binding, transform, visible, ctx, &mut warnings);
            return warnings;
        }
        Encoding::Scatter { .. } => {
            render_scatter(frame, axis, binding, transform, visible, ctx, &mut warnings);
            return warnings;
        }
        _ => {}
    }

    let bar_count = binding.active_count();
    let mut bar_position = 0;

    for (slot_index, series) in binding.active() {
        if skip_for_units(series, limits, ctx, &mut warnings) {
            continue;
        }
        if series.samples_in(visible).is_empty() {
            debug!(series = series.name(), "no visible samples; nothing drawn");
            continue;
        }
        let style = style_for_slot(ctx.styles, axis, slot_index);

        match ctx.config.encoding {
            Encoding::Line => {
                let geometry = project_line(
                    series,
                    transform,
                    visible,
                    ctx.config.allowed_gap_seconds,
                );
                push_line_geometry(frame, &geometry, style, ctx.config.isolated_markers);
            }
            Encoding::Step { style: step_style } => {
                let geometry = project_steps(
                    series,
                    transform,
                    visible,
                    step_style,
                    ctx.config.allowed_gap_seconds,
                );
                push_line_geometry(frame, &geometry, style, ctx.config.isolated_markers);
            }
            Encoding::Bar { alignment, overlap } => {
                let options = BarOptions {
                    alignment,
                    overlap,
                    series_index: bar_position,
                    series_count: bar_count,
                    baseline: clamped_baseline(limits.y.min, limits.y.max),
                };
                bar_position += 1;
                let fill = with_alpha(style.color, style.fill_alpha);
                for bar in project_bars(series, transform, visible, options) {
                    frame.push_rect(RectPrimitive::new(
                        bar.left, bar.top, bar.width, bar.height, fill,
                    ));
                }
            }
            Encoding::Area => {
                let baseline = clamped_baseline(limits.y.min, limits.y.max);
                let geometry = project_area(
                    series,
                    transform,
                    visible,
                    baseline,
                    ctx.config.allowed_gap_seconds,
                );
                let fill = with_alpha(style.color, style.fill_alpha);
                for polygon in geometry.polygons {
                    frame.push_polygon(PolygonPrimitive::new(polygon, fill));
                }
            }
            Encoding::Duration => {
                let curve = ctx
                    .analysis
                    .and_then(|a| a.durations.get(slot_index))
                    .and_then(Option::as_ref);
                match curve {
                    Some(curve) => {
                        let geometry = project_duration(curve, transform);
                        push_line_geometry(frame, &geometry, style, ctx.config.isolated_markers);
                    }
                    None => warnings.push(RenderWarning {
                        series: series.name().to_owned(),
                        message: "no duration analysis available".to_owned(),
                    }),
                }
            }
            Encoding::StackedArea
            | Encoding::Scatter { .. }
            | Encoding::PeriodOfRecord
            | Encoding::Raster => unreachable!("handled above"),
        }
    }
    warnings
}

fn skip_for_units(
    series: &SeriesRef,
    limits: &AxisLimits,
    ctx: &PipelineContext<'_>,
    warnings: &mut Vec<RenderWarning>,
) -> bool {
    if limits.units_ignored || limits.units.is_empty() {
        return false;
    }
    if ctx.units.compatible(&limits.units, series.units()) {
        return false;
    }
    warn!(
        series = series.name(),
        axis_units = %limits.units,
        series_units = series.units(),
        "series units incompatible with axis; skipped"
    );
    warnings.push(RenderWarning {
        series: series.name().to_owned(),
        message: format!(
            "units `{}` incompatible with axis units `{}`",
            series.units(),
            limits.units
        ),
    });
    true
}

fn push_line_geometry(
    frame: &mut RenderFrame,
    geometry: &LineGeometry,
    style: SeriesStyle,
    isolated_markers: bool,
) {
    for run in &geometry.runs {
        for pair in run.points.windows(2) {
            frame.push_line(
                LinePrimitive::new(
                    pair[0].0,
                    pair[0].1,
                    pair[1].0,
                    pair[1].1,
                    style.line_width,
                    style.color,
                )
                .styled(style.stroke),
            );
        }
    }
    if isolated_markers {
        for &(x, y) in &geometry.isolated {
            frame.push_symbol(SymbolPrimitive::new(
                x,
                y,
                style.symbol_size_px,
                style.symbol,
                style.color,
            ));
        }
    }
}

fn render_stacked_area(
    frame: &mut RenderFrame,
    axis: YAxis,
    binding: &AxisBinding,
    transform: RegionTransform,
    visible: DateRange,
    ctx: &PipelineContext<'_>,
    warnings: &mut Vec<RenderWarning>,
) {
    let active: Vec<(usize, &SeriesRef)> = binding.active().collect();
    let sources: Vec<&TimeSeries> = active.iter().map(|(_, s)| s.as_ref()).collect();
    let derived = match derive_stacked(&sources) {
        Ok(derived) => derived,
        Err(err) => {
            warnings.push(RenderWarning {
                series: "stacked area".to_owned(),
                message: err.to_string(),
            });
            return;
        }
    };

    // Top of the stack first so every lower band paints over the taller
    // cumulative fills beneath its boundary.
    for (level, stacked) in derived.iter().enumerate().rev() {
        let slot_index = active[level].0;
        let style = style_for_slot(ctx.styles, axis, slot_index);
        let fill = with_alpha(style.color, 1.0);
        let geometry = project_area(
            stacked,
            transform,
            visible,
            0.0,
            ctx.config.allowed_gap_seconds,
        );
        for polygon in geometry.polygons {
            frame.push_polygon(PolygonPrimitive::new(polygon, fill));
        }
    }
}

fn render_scatter(
    frame: &mut RenderFrame,
    axis: YAxis,
    binding: &AxisBinding,
    transform: RegionTransform,
    visible: DateRange,
    ctx: &PipelineContext<'_>,
    warnings: &mut Vec<RenderWarning>,
) {
    let (monthly_fits, confidence) = match ctx.config.encoding {
        Encoding::Scatter {
            monthly_fits,
            confidence,
        } => (monthly_fits, confidence),
        _ => (false, false),
    };
    let mut active = binding.active();
    let Some((_, independent)) = active.next() else {
        return;
    };

    for (slot_index, dependent) in active {
        let pairs = pair_values(independent, dependent, visible);
        if pairs.is_empty() {
            debug!(series = dependent.name(), "no paired samples; nothing drawn");
            continue;
        }
        let regression = ctx
            .analysis
            .and_then(|a| a.regressions.get(slot_index))
            .and_then(Option::as_ref);

        let mut fits: Vec<LinearFit> = Vec::new();
        let mut curves: Vec<Vec<crate::core::types::DataPoint>> = Vec::new();
        match regression {
            Some(result) => {
                if monthly_fits && !result.monthly_fits.is_empty() {
                    fits.extend(result.monthly_fits.iter().flatten().copied());
                } else if let Some(fit) = result.fit {
                    fits.push(fit);
                }
                if confidence {
                    curves.extend(result.confidence_curves.iter().cloned());
                }
            }
            None => warnings.push(RenderWarning {
                series: dependent.name().to_owned(),
                message: "no regression available; markers only".to_owned(),
            }),
        }

        let style = style_for_slot(ctx.styles, axis, slot_index);
        let geometry = project_scatter(&pairs, transform, &fits, &curves);
        for &(x, y) in &geometry.points {
            frame.push_symbol(SymbolPrimitive::new(
                x,
                y,
                style.symbol_size_px,
                style.symbol,
                style.color,
            ));
        }
        for ((x1, y1), (x2, y2)) in geometry.fit_segments {
            frame.push_line(LinePrimitive::new(
                x1, y1, x2, y2, style.line_width, style.color,
            ));
        }
        for run in geometry.confidence_runs {
            for pair in run.windows(2) {
                frame.push_line(
                    LinePrimitive::new(
                        pair[0].0,
                        pair[0].1,
                        pair[1].0,
                        pair[1].1,
                        style.line_width,
                        style.color,
                    )
                    .styled(LineStrokeStyle::Dashed),
                );
            }
        }
    }
}

fn render_period_of_record(
    frame: &mut RenderFrame,
    axis: YAxis,
    binding: &AxisBinding,
    transform: RegionTransform,
    visible: DateRange,
    ctx: &PipelineContext<'_>,
) {
    for bar in project_period_bars(binding, transform, visible) {
        let style = style_for_slot(ctx.styles, axis, bar.slot_index);
        frame.push_rect(RectPrimitive::new(
            bar.left,
            bar.top,
            bar.width,
            bar.height,
            with_alpha(style.color, style.fill_alpha),
        ));
    }
}

fn render_raster(
    frame: &mut RenderFrame,
    _axis: YAxis,
    binding: &AxisBinding,
    transform: RegionTransform,
    visible: DateRange,
    ctx: &PipelineContext<'_>,
    warnings: &mut Vec<RenderWarning>,
) {
    let Some(table) = ctx.symbol_table else {
        warnings.push(RenderWarning {
            series: "raster".to_owned(),
            message: "no symbol table supplied; raster cells skipped".to_owned(),
        });
        return;
    };

    // Pre-fill the whole plot with the missing color so every gap reads as
    // an explicit missing cell instead of blank canvas.
    let plot = transform.device();
    frame.push_rect(RectPrimitive::new(
        plot.left,
        plot.top,
        plot.width,
        plot.height,
        table.missing_color(),
    ));

    let cells = match select_raster_mode(binding) {
        RasterMode::Calendar(calendar_axis) => match binding.active().next() {
            Some((slot_index, series)) => {
                project_calendar_cells(slot_index, series, transform, visible, calendar_axis)
            }
            None => Vec::new(),
        },
        RasterMode::Ordinal => project_ordinal_cells(binding, transform, visible),
    };

    for cell in cells {
        frame.push_rect(RectPrimitive::new(
            cell.left,
            cell.top,
            cell.width,
            cell.height,
            table.color_for(cell.value),
        ));
    }
}

fn with_alpha(color: Color, alpha: f64) -> Color {
    Color::rgba(color.red, color.green, color.blue, alpha.clamp(0.0, 1.0))
}
