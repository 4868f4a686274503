use tracing::{debug, debug_span, warn};

use crate::api::analysis::{AnalysisProvider, AnalysisResults, run_duration_curves, run_regressions};
use crate::api::axes::{
    AxisScene, XTicks, render_back_axes, render_front_axes, render_reference_overlay,
};
use crate::api::config::{
    AxisScaleKind, Encoding, GraphEngineConfig, LegendPosition, StyleLookup,
};
use crate::api::date_labels::{find_date_labels, granularity_for_span, sample_label};
use crate::api::labels::{
    TickSet, endpoint_labels, find_linear_labels, find_log_labels, integer_labels, ordinal_labels,
};
use crate::api::layout::{LayoutInputs, RegionId, RegionTree, layout};
use crate::api::legend::{LegendEntry, build_raster_legend, build_series_legend};
use crate::api::limits::{
    AxisLimits, LimitsMode, LimitsRequest, UnitsChecker, compute_axis_limits,
    extend_shared_period,
};
use crate::api::pipeline::{PipelineContext, RenderWarning, render_axis_series, style_for_slot};
use crate::api::symbol_table::SymbolTable;
use crate::api::text::TextMetrics;
use crate::core::interval::SECONDS_PER_DAY;
use crate::core::scale::RegionTransform;
use crate::core::series::{AxisBinding, SeriesSlot};
use crate::core::types::{DataRect, DateRange, ValueRange, Viewport, YAxis};
use crate::core::windowing::VisibleWindow;
use crate::error::{GraphError, GraphResult};
use crate::render::{Color, RenderFrame, Renderer};

/// Target pixel spacing between value-axis labels.
const VALUE_LABEL_SPACING_PX: f64 = 40.0;
/// Target pixel spacing between numeric X-axis labels.
const X_LABEL_SPACING_PX: f64 = 80.0;

/// Collaborators supplied per render call; the controller owns none of
/// them.
pub struct RenderContext<'a> {
    pub metrics: &'a dyn TextMetrics,
    pub styles: &'a dyn StyleLookup,
    pub analysis: &'a dyn AnalysisProvider,
    pub units: &'a dyn UnitsChecker,
    pub symbol_table: Option<&'a SymbolTable>,
}

/// Outcome of one completed render cycle.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub cycle: u64,
    /// Recoverable per-series conditions.
    pub warnings: Vec<RenderWarning>,
    /// Axis-level unit conflicts; the axis was skipped and the caller
    /// decides how to proceed.
    pub axis_errors: Vec<GraphError>,
}

/// Tick sets and region tree memoized from the last completed cycle.
///
/// Sub-routines never mutate these; a cycle computes fresh values and the
/// controller swaps them in wholesale at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleCache {
    pub regions: RegionTree,
    pub x_ticks: XTicks,
    pub left_ticks: Option<TickSet>,
    pub right_ticks: Option<TickSet>,
}

/// Phases of one render cycle, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CyclePhase {
    AnalyzeIfStale,
    ComputeLimits,
    ComputeLabelsAndLayout,
    RenderBackAxes,
    RenderSeries,
    RenderFrontAxesAndLegend,
    Done,
}

/// Owns one chart's mutable state and sequences the render cycle.
///
/// Rendering is synchronous and single-threaded; a cycle always runs to
/// completion (or aborts wholesale) before the next may start. A failed
/// cycle leaves the previous cache untouched, so the last good image
/// remains valid.
pub struct GraphController {
    config: GraphEngineConfig,
    left: AxisBinding,
    right: AxisBinding,
    window: Option<VisibleWindow>,
    left_analysis: Option<AnalysisResults>,
    right_analysis: Option<AnalysisResults>,
    analysis_stale: bool,
    cache: Option<CycleCache>,
    reference_mode: bool,
    cycles: u64,
}

impl GraphController {
    pub fn new(config: GraphEngineConfig) -> GraphResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            left: AxisBinding::default(),
            right: AxisBinding::default(),
            window: None,
            left_analysis: None,
            right_analysis: None,
            analysis_stale: true,
            cache: None,
            reference_mode: false,
            cycles: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GraphEngineConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GraphEngineConfig) -> GraphResult<()> {
        config.validate()?;
        self.analysis_stale = true;
        self.cache = None;
        self.config = config;
        Ok(())
    }

    pub fn set_encoding(&mut self, encoding: Encoding) {
        if self.config.encoding != encoding {
            self.config.encoding = encoding;
            self.analysis_stale = true;
            self.cache = None;
        }
    }

    /// Binds the ordered series slots of one axis, preserving positions
    /// (including `None` placeholders) for index-aligned style lookups.
    pub fn bind_series(&mut self, axis: YAxis, slots: Vec<SeriesSlot>) {
        match axis {
            YAxis::Left => self.left = AxisBinding::new(slots),
            YAxis::Right => self.right = AxisBinding::new(slots),
        }
        self.analysis_stale = true;
        self.cache = None;
    }

    #[must_use]
    pub fn binding(&self, axis: YAxis) -> &AxisBinding {
        match axis {
            YAxis::Left => &self.left,
            YAxis::Right => &self.right,
        }
    }

    pub fn set_series_enabled(
        &mut self,
        axis: YAxis,
        slot_index: usize,
        enabled: bool,
    ) -> GraphResult<()> {
        let binding = match axis {
            YAxis::Left => &mut self.left,
            YAxis::Right => &mut self.right,
        };
        binding.set_enabled(slot_index, enabled)?;
        self.analysis_stale = true;
        self.cache = None;
        Ok(())
    }

    /// Switches between the main view and the always-full-period reference
    /// view with the highlighted zoom window.
    pub fn set_reference_mode(&mut self, reference: bool) {
        if self.reference_mode != reference {
            self.reference_mode = reference;
            self.cache = None;
        }
    }

    #[must_use]
    pub fn window(&self) -> Option<&VisibleWindow> {
        self.window.as_ref()
    }

    #[must_use]
    pub fn last_cache(&self) -> Option<&CycleCache> {
        self.cache.as_ref()
    }

    /// Pins the view to explicit limits; triggers a full relayout.
    pub fn zoom_to(
        &mut self,
        period: DateRange,
        left: Option<ValueRange>,
        right: Option<ValueRange>,
    ) -> GraphResult<()> {
        self.ensure_window()?.set_view(period, left, right)?;
        self.cache = None;
        Ok(())
    }

    pub fn zoom_by_factor(&mut self, factor: f64, anchor: i64) -> GraphResult<()> {
        self.ensure_window()?.zoom_by_factor(factor, anchor)?;
        self.cache = None;
        Ok(())
    }

    pub fn pan_by_seconds(&mut self, delta: i64) -> GraphResult<()> {
        self.ensure_window()?.pan_by_seconds(delta);
        self.cache = None;
        Ok(())
    }

    pub fn reset_zoom(&mut self) -> GraphResult<()> {
        self.ensure_window()?.reset_to_full();
        self.cache = None;
        Ok(())
    }

    fn ensure_window(&mut self) -> GraphResult<&mut VisibleWindow> {
        if self.window.is_none() {
            let period = self.full_data_period().ok_or_else(|| {
                GraphError::InvalidData("no series bound to either axis".to_owned())
            })?;
            self.window = Some(VisibleWindow::new(period));
        }
        Ok(self.window.as_mut().expect("window just ensured"))
    }

    fn full_data_period(&self) -> Option<DateRange> {
        match (self.left.union_period(), self.right.union_period()) {
            (Some(a), Some(b)) => Some(a.union(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    /// Runs one render cycle and hands the frame to the renderer.
    pub fn render(
        &mut self,
        viewport: Viewport,
        ctx: &RenderContext<'_>,
        renderer: &mut dyn Renderer,
    ) -> GraphResult<RenderReport> {
        let (frame, report) = self.render_to_frame(viewport, ctx)?;
        renderer.render(&frame)?;
        Ok(report)
    }

    /// Runs one render cycle and returns the materialized frame.
    ///
    /// Any structural error aborts just this cycle; caches from the
    /// previous successful cycle are left in place.
    pub fn render_to_frame(
        &mut self,
        viewport: Viewport,
        ctx: &RenderContext<'_>,
    ) -> GraphResult<(RenderFrame, RenderReport)> {
        viewport.validate()?;
        self.config.validate()?;
        if self.full_data_period().is_none() {
            return Err(GraphError::InvalidData(
                "no series bound to either axis".to_owned(),
            ));
        }

        let span = debug_span!("render_cycle", cycle = self.cycles);
        let _guard = span.enter();

        let mut cycle = Cycle {
            frame: RenderFrame::new(viewport),
            report: RenderReport {
                cycle: self.cycles,
                ..RenderReport::default()
            },
            viewport,
            left_limits: None,
            right_limits: None,
            visible_period: DateRange::new(0, 0),
            tree: None,
            x_ticks: None,
            left_ticks: None,
            right_ticks: None,
            left_transform: None,
            right_transform: None,
        };

        let mut phase = CyclePhase::AnalyzeIfStale;
        while phase != CyclePhase::Done {
            phase = match phase {
                CyclePhase::AnalyzeIfStale => {
                    self.analyze_if_stale(ctx);
                    CyclePhase::ComputeLimits
                }
                CyclePhase::ComputeLimits => {
                    self.compute_limits(&mut cycle, ctx)?;
                    CyclePhase::ComputeLabelsAndLayout
                }
                CyclePhase::ComputeLabelsAndLayout => {
                    self.compute_labels_and_layout(&mut cycle, ctx)?;
                    CyclePhase::RenderBackAxes
                }
                CyclePhase::RenderBackAxes => {
                    self.render_back(&mut cycle);
                    CyclePhase::RenderSeries
                }
                CyclePhase::RenderSeries => {
                    self.render_series(&mut cycle, ctx);
                    CyclePhase::RenderFrontAxesAndLegend
                }
                CyclePhase::RenderFrontAxesAndLegend => {
                    self.render_front(&mut cycle, ctx);
                    CyclePhase::Done
                }
                CyclePhase::Done => CyclePhase::Done,
            };
        }

        cycle.frame.validate()?;
        self.cache = Some(CycleCache {
            regions: cycle.tree.take().expect("layout phase ran"),
            x_ticks: cycle.x_ticks.take().expect("label phase ran"),
            left_ticks: cycle.left_ticks.clone(),
            right_ticks: cycle.right_ticks.clone(),
        });
        self.cycles += 1;
        Ok((cycle.frame, cycle.report))
    }

    fn analyze_if_stale(&mut self, ctx: &RenderContext<'_>) {
        if !self.config.encoding.needs_analysis() {
            return;
        }
        if !self.analysis_stale && (self.left_analysis.is_some() || self.right_analysis.is_some())
        {
            return;
        }
        debug!("analysis inputs changed; re-running external analysis");
        for axis in YAxis::BOTH {
            let binding = self.binding(axis);
            let Some(period) = binding.union_period() else {
                continue;
            };
            let results = match self.config.encoding {
                Encoding::Scatter { .. } => run_regressions(ctx.analysis, binding, period),
                Encoding::Duration => run_duration_curves(ctx.analysis, binding, period),
                _ => continue,
            };
            match axis {
                YAxis::Left => self.left_analysis = Some(results),
                YAxis::Right => self.right_analysis = Some(results),
            }
        }
        self.analysis_stale = false;
    }

    fn compute_limits(&mut self, cycle: &mut Cycle, ctx: &RenderContext<'_>) -> GraphResult<()> {
        let window_explicit = self.window.is_some_and(VisibleWindow::is_explicit_view);
        let full_period = self
            .full_data_period()
            .ok_or_else(|| GraphError::InvalidData("no series bound".to_owned()))?;
        let provisional_visible = match (&self.window, self.reference_mode) {
            (Some(window), false) => window.current_period(),
            _ => full_period,
        };

        for axis in YAxis::BOTH {
            let binding = self.binding(axis);
            if binding.is_empty() {
                continue;
            }
            let axis_config = self.config.axis(axis);
            let mode = if window_explicit && !self.reference_mode {
                LimitsMode::KeepCurrent
            } else {
                axis_config.limits_mode
            };
            let existing = self
                .window
                .as_ref()
                .and_then(|w| w.axis(axis))
                .map(|w| w.current);
            let analysis = match axis {
                YAxis::Left => self.left_analysis.as_ref(),
                YAxis::Right => self.right_analysis.as_ref(),
            };
            let request = LimitsRequest {
                axis,
                binding,
                encoding: &self.config.encoding,
                visible_period: provisional_visible,
                mode,
                ignore_units: axis_config.ignore_units,
                units_policy: self.config.units_policy,
                existing,
                analysis,
            };
            match compute_axis_limits(&request, ctx.units) {
                Ok(Some(limits)) => match axis {
                    YAxis::Left => cycle.left_limits = Some(limits),
                    YAxis::Right => cycle.right_limits = Some(limits),
                },
                Ok(None) => {
                    debug!(?axis, "axis has nothing to show");
                }
                Err(err @ GraphError::UnitsIncompatible { .. }) => {
                    warn!(?axis, error = %err, "axis skipped; units unresolved");
                    cycle.report.axis_errors.push(err);
                }
                Err(err) => return Err(err),
            }
        }

        // The right axis may extend the shared date period; it never
        // narrows what the left axis established.
        let mut shared = cycle
            .left_limits
            .as_ref()
            .map_or(full_period, |l| l.period);
        shared = extend_shared_period(shared, cycle.right_limits.as_ref());

        let reference_mode = self.reference_mode;
        let window = self.ensure_window()?;
        window.set_full_period(shared);
        for (axis, limits) in [
            (YAxis::Left, cycle.left_limits.as_ref()),
            (YAxis::Right, cycle.right_limits.as_ref()),
        ] {
            if let Some(limits) = limits {
                window.set_axis_full(axis, limits.y);
            }
        }
        cycle.visible_period = if reference_mode {
            window.full_period()
        } else {
            window.current_period()
        };
        // A zero-width period (single-sample data) gets a synthetic day of
        // breathing room, mirroring the zero-width label-range rule.
        if cycle.visible_period.span_seconds() == 0 {
            cycle.visible_period = DateRange::new(
                cycle.visible_period.start - SECONDS_PER_DAY / 2,
                cycle.visible_period.end + SECONDS_PER_DAY / 2,
            );
        }

        // Time-based x extents follow the (possibly zoomed) visible period
        // so geometry and labels derive from the same window.
        for limits in [cycle.left_limits.as_mut(), cycle.right_limits.as_mut()]
            .into_iter()
            .flatten()
        {
            if limits.x_is_time {
                limits.x = ValueRange::new(
                    cycle.visible_period.start as f64,
                    cycle.visible_period.end as f64,
                );
            }
        }
        Ok(())
    }

    fn compute_labels_and_layout(
        &mut self,
        cycle: &mut Cycle,
        ctx: &RenderContext<'_>,
    ) -> GraphResult<()> {
        let entries = self.legend_entries(ctx.styles);
        let primary = cycle
            .left_limits
            .as_ref()
            .or(cycle.right_limits.as_ref());
        let x_is_time = primary.is_some_and(|l| l.x_is_time);

        let bottom_sample = if x_is_time {
            sample_label(granularity_for_span(cycle.visible_period.span_seconds()))
        } else if primary.is_some() {
            "8888.88"
        } else {
            ""
        };

        let inputs = LayoutInputs {
            legend_entries: &entries,
            symbol_table: ctx.symbol_table,
            has_left_axis: cycle.left_limits.is_some(),
            has_right_axis: cycle.right_limits.is_some(),
            bottom_label_sample: bottom_sample,
        };
        let mut tree = layout(cycle.viewport, &self.config, ctx.metrics, &inputs)?;
        let plot = tree.device(RegionId::Plot);
        if plot.is_degenerate() {
            return Err(GraphError::InvalidData(
                "plot area collapsed; viewport too small for decorations".to_owned(),
            ));
        }

        let x_range = match primary {
            Some(limits) => nice_x_range(limits),
            None => ValueRange::new(0.0, 1.0),
        };

        // X ticks agree with the transform because both derive from the
        // same range below.
        let x_ticks = match primary {
            Some(limits) if limits.x_is_time => {
                let label_width = ctx
                    .metrics
                    .measure(&self.config.font, bottom_sample)
                    .width;
                XTicks::Date(find_date_labels(
                    cycle.visible_period,
                    plot.width,
                    label_width,
                ))
            }
            Some(limits) => {
                let max_count = ((plot.width / X_LABEL_SPACING_PX).floor() as usize).clamp(2, 12);
                // Calendar-position raster axes carry whole-number ticks.
                let set = if matches!(self.config.encoding, Encoding::Raster) {
                    integer_labels(limits.x.min, limits.x.max, max_count)
                } else {
                    find_linear_labels(limits.x.min, limits.x.max, false, 2, max_count)
                        .unwrap_or_else(|| {
                            debug!("x label search exhausted; endpoint degradation");
                            endpoint_labels(limits.x.min, limits.x.max)
                        })
                };
                XTicks::Numeric(set)
            }
            None => XTicks::Numeric(endpoint_labels(0.0, 1.0)),
        };
        let x_final = match &x_ticks {
            XTicks::Numeric(set) if !x_is_time => set.nice_range,
            _ => x_range,
        };

        for (axis, limits_slot, ticks_slot, transform_slot) in [
            (
                YAxis::Left,
                &cycle.left_limits,
                &mut cycle.left_ticks,
                &mut cycle.left_transform,
            ),
            (
                YAxis::Right,
                &cycle.right_limits,
                &mut cycle.right_ticks,
                &mut cycle.right_transform,
            ),
        ] {
            let Some(limits) = limits_slot.as_ref() else {
                continue;
            };
            let axis_config = self.config.axis(axis);
            // Ordinal axes (period-of-record rows, multi-series raster rows)
            // label integer positions 1..N; calendar raster rows label whole
            // years or days.
            let ticks = match self.config.encoding {
                Encoding::PeriodOfRecord => ordinal_labels(self.binding(axis).active_count()),
                Encoding::Raster if limits.x_is_time => {
                    ordinal_labels(self.binding(axis).active_count())
                }
                Encoding::Raster => integer_labels(limits.y.min, limits.y.max, 12),
                _ => match axis_config.scale {
                    AxisScaleKind::Log => find_log_labels(limits.y.min, limits.y.max),
                    AxisScaleKind::Linear => {
                        let max_count =
                            ((plot.height / VALUE_LABEL_SPACING_PX).floor() as usize).clamp(2, 12);
                        find_linear_labels(limits.y.min, limits.y.max, false, 2, max_count)
                            .unwrap_or_else(|| {
                                warn!(
                                    ?axis,
                                    error = %GraphError::NoLabelsFound {
                                        min: limits.y.min,
                                        max: limits.y.max,
                                    },
                                    "degrading to endpoint labels"
                                );
                                endpoint_labels(limits.y.min, limits.y.max)
                            })
                    }
                },
            };
            let mut rect = DataRect::new(
                x_final.min,
                x_final.max,
                ticks.nice_range.min,
                ticks.nice_range.max,
            );
            if axis_config.reversed != limits.y_reversed {
                rect = rect.reversed_y();
            }
            *transform_slot = Some(RegionTransform::new(plot, rect)?);
            *ticks_slot = Some(ticks);
        }

        let plot_rect = cycle
            .left_transform
            .or(cycle.right_transform)
            .map(|t| t.data())
            .unwrap_or(DataRect::new(x_final.min, x_final.max, 0.0, 1.0));
        tree.set_data(RegionId::Plot, plot_rect)?;

        cycle.x_ticks = Some(x_ticks);
        cycle.tree = Some(tree);
        Ok(())
    }

    fn render_back(&self, cycle: &mut Cycle) {
        let Some(scene) = make_scene(
            &cycle.tree,
            &cycle.x_ticks,
            &cycle.left_ticks,
            &cycle.right_ticks,
            cycle.left_transform,
            cycle.right_transform,
        ) else {
            return;
        };
        render_back_axes(&mut cycle.frame, &scene);
    }

    fn render_series(&self, cycle: &mut Cycle, ctx: &RenderContext<'_>) {
        for axis in YAxis::BOTH {
            let (binding, limits, transform, analysis) = match axis {
                YAxis::Left => (
                    &self.left,
                    cycle.left_limits.as_ref(),
                    cycle.left_transform,
                    self.left_analysis.as_ref(),
                ),
                YAxis::Right => (
                    &self.right,
                    cycle.right_limits.as_ref(),
                    cycle.right_transform,
                    self.right_analysis.as_ref(),
                ),
            };
            let (Some(limits), Some(transform)) = (limits, transform) else {
                continue;
            };
            let pipeline_ctx = PipelineContext {
                config: &self.config,
                styles: ctx.styles,
                units: ctx.units,
                symbol_table: ctx.symbol_table,
                analysis,
            };
            let warnings = render_axis_series(
                &mut cycle.frame,
                axis,
                binding,
                limits,
                transform,
                cycle.visible_period,
                &pipeline_ctx,
            );
            cycle.report.warnings.extend(warnings);
        }
    }

    fn render_front(&self, cycle: &mut Cycle, ctx: &RenderContext<'_>) {
        let Some(tree) = cycle.tree.as_ref() else {
            return;
        };
        if let Some(scene) = make_scene(
            &cycle.tree,
            &cycle.x_ticks,
            &cycle.left_ticks,
            &cycle.right_ticks,
            cycle.left_transform,
            cycle.right_transform,
        ) {
            render_front_axes(&mut cycle.frame, &scene, tree, &self.config);

            if self.reference_mode {
                if let Some(window) = &self.window {
                    if window.current_period() != window.full_period() {
                        render_reference_overlay(
                            &mut cycle.frame,
                            scene.x_transform,
                            scene.plot,
                            window.current_period(),
                        );
                    }
                }
            }
        }

        let entries = self.legend_entries(ctx.styles);
        let legend_region = match self.config.legend_position {
            LegendPosition::Bottom => Some(RegionId::BottomLegend),
            LegendPosition::Left => Some(RegionId::LeftLegend),
            LegendPosition::Right => Some(RegionId::RightLegend),
            LegendPosition::Inside => Some(RegionId::InsideLegend),
            LegendPosition::Hidden => None,
        };
        if let Some(region) = legend_region {
            build_series_legend(
                &mut cycle.frame,
                tree.device(region),
                &entries,
                &self.config.font,
                ctx.metrics,
                Color::BLACK,
            );
        }
        if let (Encoding::Raster, Some(table)) = (self.config.encoding, ctx.symbol_table) {
            build_raster_legend(
                &mut cycle.frame,
                tree.device(RegionId::RasterLegend),
                table,
                &self.config.font,
                ctx.metrics,
                Color::BLACK,
            );
        }
    }

    fn legend_entries(&self, styles: &dyn StyleLookup) -> Vec<LegendEntry> {
        let mut entries = Vec::new();
        for axis in YAxis::BOTH {
            for (slot_index, series) in self.binding(axis).active() {
                entries.push(LegendEntry {
                    label: series.name().to_owned(),
                    color: style_for_slot(styles, axis, slot_index).color,
                });
            }
        }
        entries
    }
}

/// Per-cycle scratch state; dropped when the cycle ends.
struct Cycle {
    frame: RenderFrame,
    report: RenderReport,
    viewport: Viewport,
    left_limits: Option<AxisLimits>,
    right_limits: Option<AxisLimits>,
    visible_period: DateRange,
    tree: Option<RegionTree>,
    x_ticks: Option<XTicks>,
    left_ticks: Option<TickSet>,
    right_ticks: Option<TickSet>,
    left_transform: Option<RegionTransform>,
    right_transform: Option<RegionTransform>,
}

/// Builds the axis scene from the cycle's disjoint fields so the frame can
/// stay mutably borrowable alongside it.
fn make_scene<'a>(
    tree: &'a Option<RegionTree>,
    x_ticks: &'a Option<XTicks>,
    left_ticks: &'a Option<TickSet>,
    right_ticks: &'a Option<TickSet>,
    left_transform: Option<RegionTransform>,
    right_transform: Option<RegionTransform>,
) -> Option<AxisScene<'a>> {
    let tree = tree.as_ref()?;
    let x_ticks = x_ticks.as_ref()?;
    let x_transform = left_transform.or(right_transform)?;
    Some(AxisScene {
        plot: tree.device(RegionId::Plot),
        x_transform,
        x_ticks,
        left: left_ticks.as_ref().zip(left_transform),
        right: right_ticks.as_ref().zip(right_transform),
    })
}

fn nice_x_range(limits: &AxisLimits) -> ValueRange {
    limits.x
}
