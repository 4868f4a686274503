use serde::{Deserialize, Serialize};

use crate::api::config::GraphEngineConfig;
use crate::api::date_labels::DateTickSet;
use crate::api::labels::TickSet;
use crate::api::layout::{RegionId, RegionTree};
use crate::core::scale::RegionTransform;
use crate::core::types::{DateRange, DeviceRect};
use crate::render::{Color, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

pub const MAJOR_TICK_LEN_PX: f64 = 5.0;
pub const MINOR_TICK_LEN_PX: f64 = 3.0;
pub const GRID_COLOR: Color = Color::rgba(0.0, 0.0, 0.0, 0.12);
pub const AXIS_COLOR: Color = Color::BLACK;

/// X-axis ticks: calendar dates for time axes, numeric for percent,
/// scatter, and calendar-position axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XTicks {
    Date(DateTickSet),
    Numeric(TickSet),
}

impl XTicks {
    /// Major positions in x-domain units (unix seconds for date axes).
    #[must_use]
    pub fn positions(&self) -> Vec<f64> {
        match self {
            Self::Date(set) => set.ticks.iter().map(|&t| t as f64).collect(),
            Self::Numeric(set) => set.ticks.clone(),
        }
    }

    #[must_use]
    pub fn minor_positions(&self) -> Vec<f64> {
        match self {
            Self::Date(set) => set.minor.iter().map(|&t| t as f64).collect(),
            Self::Numeric(set) => set.minor.clone(),
        }
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::Date(set) => set.labels.clone(),
            Self::Numeric(set) => set.ticks.iter().map(|&v| format_value(v)).collect(),
        }
    }
}

/// Compact numeric label: up to six decimals, trailing zeros trimmed,
/// scientific only for magnitudes the plain form would mangle.
#[must_use]
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return "nan".to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    let abs = value.abs();
    if !(1e-4..1e9).contains(&abs) {
        return format!("{value:e}");
    }
    let mut text = format!("{value:.6}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

/// Everything the axis passes need to draw one plot's frame.
pub struct AxisScene<'a> {
    pub plot: DeviceRect,
    /// Transform carrying the x domain (left axis preferred).
    pub x_transform: RegionTransform,
    pub x_ticks: &'a XTicks,
    pub left: Option<(&'a TickSet, RegionTransform)>,
    pub right: Option<(&'a TickSet, RegionTransform)>,
}

/// Grid lines drawn behind the data.
pub fn render_back_axes(frame: &mut RenderFrame, scene: &AxisScene<'_>) {
    let plot = scene.plot;
    if plot.is_degenerate() {
        return;
    }

    for x in scene.x_ticks.positions() {
        let px = scene.x_transform.x_to_px(x);
        if px < plot.left - 0.5 || px > plot.right() + 0.5 {
            continue;
        }
        frame.push_line(LinePrimitive::new(
            px,
            plot.top,
            px,
            plot.bottom(),
            1.0,
            GRID_COLOR,
        ));
    }

    let value_grid = scene.left.or(scene.right);
    if let Some((ticks, transform)) = value_grid {
        for &value in &ticks.ticks {
            let py = transform.y_to_px(value);
            if py < plot.top - 0.5 || py > plot.bottom() + 0.5 {
                continue;
            }
            frame.push_line(
                LinePrimitive::new(plot.left, py, plot.right(), py, 1.0, GRID_COLOR)
                    .styled(LineStrokeStyle::Solid),
            );
        }
    }
}

/// Border, tick marks, tick labels, and titles drawn over the data.
pub fn render_front_axes(
    frame: &mut RenderFrame,
    scene: &AxisScene<'_>,
    tree: &RegionTree,
    config: &GraphEngineConfig,
) {
    let plot = scene.plot;
    if plot.is_degenerate() {
        return;
    }

    // Plot border.
    for (x1, y1, x2, y2) in [
        (plot.left, plot.top, plot.right(), plot.top),
        (plot.right(), plot.top, plot.right(), plot.bottom()),
        (plot.left, plot.bottom(), plot.right(), plot.bottom()),
        (plot.left, plot.top, plot.left, plot.bottom()),
    ] {
        frame.push_line(LinePrimitive::new(x1, y1, x2, y2, 1.0, AXIS_COLOR));
    }

    render_x_ticks(frame, scene, config);
    if let Some((ticks, transform)) = scene.left {
        render_value_ticks(frame, plot, ticks, transform, config, true);
    }
    if let Some((ticks, transform)) = scene.right {
        render_value_ticks(frame, plot, ticks, transform, config, false);
    }

    render_titles(frame, tree, config);
}

fn render_x_ticks(frame: &mut RenderFrame, scene: &AxisScene<'_>, config: &GraphEngineConfig) {
    let plot = scene.plot;
    let labels = scene.x_ticks.labels();
    let label_top = plot.bottom() + MAJOR_TICK_LEN_PX + 2.0;

    for (position, label) in scene.x_ticks.positions().iter().zip(labels.iter()) {
        let px = scene.x_transform.x_to_px(*position);
        if px < plot.left - 0.5 || px > plot.right() + 0.5 {
            continue;
        }
        frame.push_line(LinePrimitive::new(
            px,
            plot.bottom(),
            px,
            plot.bottom() + MAJOR_TICK_LEN_PX,
            1.0,
            AXIS_COLOR,
        ));
        if !label.is_empty() {
            frame.push_text(TextPrimitive::new(
                label.clone(),
                px,
                label_top,
                config.font.size_px,
                AXIS_COLOR,
                TextHAlign::Center,
            ));
        }
    }
    for position in scene.x_ticks.minor_positions() {
        let px = scene.x_transform.x_to_px(position);
        if px < plot.left - 0.5 || px > plot.right() + 0.5 {
            continue;
        }
        frame.push_line(LinePrimitive::new(
            px,
            plot.bottom(),
            px,
            plot.bottom() + MINOR_TICK_LEN_PX,
            1.0,
            AXIS_COLOR,
        ));
    }
}

fn render_value_ticks(
    frame: &mut RenderFrame,
    plot: DeviceRect,
    ticks: &TickSet,
    transform: RegionTransform,
    config: &GraphEngineConfig,
    left_side: bool,
) {
    let (edge, tick_dir, label_x, align) = if left_side {
        (
            plot.left,
            -MAJOR_TICK_LEN_PX,
            plot.left - MAJOR_TICK_LEN_PX - 2.0,
            TextHAlign::Right,
        )
    } else {
        (
            plot.right(),
            MAJOR_TICK_LEN_PX,
            plot.right() + MAJOR_TICK_LEN_PX + 2.0,
            TextHAlign::Left,
        )
    };

    for &value in &ticks.ticks {
        let py = transform.y_to_px(value);
        if py < plot.top - 0.5 || py > plot.bottom() + 0.5 {
            continue;
        }
        frame.push_line(LinePrimitive::new(
            edge,
            py,
            edge + tick_dir,
            py,
            1.0,
            AXIS_COLOR,
        ));
        frame.push_text(TextPrimitive::new(
            format_value(value),
            label_x,
            py - config.font.size_px * 0.5,
            config.font.size_px,
            AXIS_COLOR,
            align,
        ));
    }
    for &value in &ticks.minor {
        let py = transform.y_to_px(value);
        if py < plot.top - 0.5 || py > plot.bottom() + 0.5 {
            continue;
        }
        let dir = if left_side {
            -MINOR_TICK_LEN_PX
        } else {
            MINOR_TICK_LEN_PX
        };
        frame.push_line(LinePrimitive::new(edge, py, edge + dir, py, 1.0, AXIS_COLOR));
    }
}

fn render_titles(frame: &mut RenderFrame, tree: &RegionTree, config: &GraphEngineConfig) {
    let title_region = tree.device(RegionId::MainTitle);
    if !config.title.is_empty() && !title_region.is_degenerate() {
        frame.push_text(TextPrimitive::new(
            config.title.clone(),
            title_region.center_x(),
            title_region.top,
            config.title_font.size_px,
            AXIS_COLOR,
            TextHAlign::Center,
        ));
    }
    let subtitle_region = tree.device(RegionId::Subtitle);
    if !config.subtitle.is_empty() && !subtitle_region.is_degenerate() {
        frame.push_text(TextPrimitive::new(
            config.subtitle.clone(),
            subtitle_region.center_x(),
            subtitle_region.top,
            config.font.size_px,
            AXIS_COLOR,
            TextHAlign::Center,
        ));
    }

    let left_title = tree.device(RegionId::LeftAxisTitle);
    if !config.left_axis.title.is_empty() && !left_title.is_degenerate() {
        frame.push_text(
            TextPrimitive::new(
                config.left_axis.title.clone(),
                left_title.left,
                left_title.center_y(),
                config.font.size_px,
                AXIS_COLOR,
                TextHAlign::Center,
            )
            .vertical(),
        );
    }
    let right_title = tree.device(RegionId::RightAxisTitle);
    if !config.right_axis.title.is_empty() && !right_title.is_degenerate() {
        frame.push_text(
            TextPrimitive::new(
                config.right_axis.title.clone(),
                right_title.left,
                right_title.center_y(),
                config.font.size_px,
                AXIS_COLOR,
                TextHAlign::Center,
            )
            .vertical(),
        );
    }
    let bottom_title = tree.device(RegionId::BottomAxisTitle);
    if !config.time_axis_title.is_empty() && !bottom_title.is_degenerate() {
        frame.push_text(TextPrimitive::new(
            config.time_axis_title.clone(),
            bottom_title.center_x(),
            bottom_title.top,
            config.font.size_px,
            AXIS_COLOR,
            TextHAlign::Center,
        ));
    }
}

/// Highlights the zoom window of the main view inside a reference
/// (full-period) rendering.
pub fn render_reference_overlay(
    frame: &mut RenderFrame,
    x_transform: RegionTransform,
    plot: DeviceRect,
    highlight: DateRange,
) {
    if plot.is_degenerate() {
        return;
    }
    let left = x_transform
        .x_to_px(highlight.start as f64)
        .clamp(plot.left, plot.right());
    let right = x_transform
        .x_to_px(highlight.end as f64)
        .clamp(plot.left, plot.right());
    if right <= left {
        return;
    }
    frame.push_rect(RectPrimitive::new(
        left,
        plot.top,
        right - left,
        plot.height,
        Color::rgba(0.95, 0.83, 0.24, 0.25),
    ));
    for x in [left, right] {
        frame.push_line(LinePrimitive::new(
            x,
            plot.top,
            x,
            plot.bottom(),
            1.0,
            Color::rgba(0.75, 0.6, 0.0, 0.9),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::format_value;

    #[test]
    fn labels_trim_trailing_zeros() {
        assert_eq!(format_value(12.5), "12.5");
        assert_eq!(format_value(100.0), "100");
        assert_eq!(format_value(0.0), "0");
    }

    #[test]
    fn extreme_magnitudes_use_scientific_form() {
        assert!(format_value(1.0e12).contains('e'));
        assert!(format_value(2.0e-7).contains('e'));
    }
}
