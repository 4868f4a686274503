use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::config::{Encoding, GraphEngineConfig, LegendPosition};
use crate::api::legend::{LegendEntry, legend_size, raster_legend_size};
use crate::api::symbol_table::SymbolTable;
use crate::api::text::{TextMetrics, line_height, max_digit_width};
use crate::core::scale::RegionTransform;
use crate::core::types::{DataRect, DeviceRect, Viewport};
use crate::error::{GraphError, GraphResult};

/// Names for every screen-space region of one chart.
///
/// The full set exists in every computed tree; regions a configuration does
/// not use collapse to zero size instead of disappearing, so downstream
/// indexing stays stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionId {
    Page,
    MainTitle,
    Subtitle,
    /// Reserved strip above the plot for a future top axis; always zero
    /// height today but kept so sibling offsets do not shift.
    TopAxis,
    BottomLegend,
    LeftLegend,
    RightLegend,
    /// Continuous color-scale key for the raster encoding.
    RasterLegend,
    /// Legend anchored inside the plot's upper-left corner.
    InsideLegend,
    LeftAxisTitle,
    LeftAxisLabels,
    RightAxisTitle,
    RightAxisLabels,
    BottomAxisTitle,
    BottomAxisLabels,
    Plot,
}

/// One named region: its device rectangle plus, once assigned, the data
/// rectangle mapped onto it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRegion {
    pub device: DeviceRect,
    pub data: Option<DataRect>,
}

impl LayoutRegion {
    #[must_use]
    fn device_only(device: DeviceRect) -> Self {
        Self { device, data: None }
    }
}

/// The computed region tree; recomputed as a whole pass on every resize or
/// configuration change, never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTree {
    regions: IndexMap<RegionId, LayoutRegion>,
}

impl RegionTree {
    fn insert(&mut self, id: RegionId, device: DeviceRect) {
        self.regions.insert(id, LayoutRegion::device_only(device));
    }

    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&LayoutRegion> {
        self.regions.get(&id)
    }

    /// Device rectangle of a region; zero when the tree predates it.
    #[must_use]
    pub fn device(&self, id: RegionId) -> DeviceRect {
        self.regions
            .get(&id)
            .map_or(DeviceRect::zero(), |region| region.device)
    }

    /// Assigns the data-space rectangle of a region.
    pub fn set_data(&mut self, id: RegionId, data: DataRect) -> GraphResult<()> {
        let region = self
            .regions
            .get_mut(&id)
            .ok_or_else(|| GraphError::InvalidData(format!("unknown region {id:?}")))?;
        region.data = Some(data);
        Ok(())
    }

    /// Data↔device transform of a region with an assigned data rectangle.
    pub fn transform(&self, id: RegionId) -> GraphResult<RegionTransform> {
        let region = self
            .regions
            .get(&id)
            .ok_or_else(|| GraphError::InvalidData(format!("unknown region {id:?}")))?;
        let data = region.data.ok_or_else(|| {
            GraphError::InvalidData(format!("region {id:?} has no data rectangle"))
        })?;
        RegionTransform::new(region.device, data)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionId, &LayoutRegion)> {
        self.regions.iter()
    }
}

/// Measured inputs the layout pass cannot derive from configuration alone.
pub struct LayoutInputs<'a> {
    pub legend_entries: &'a [LegendEntry],
    /// Symbol table backing the raster legend, when the encoding is raster.
    pub symbol_table: Option<&'a SymbolTable>,
    pub has_left_axis: bool,
    pub has_right_axis: bool,
    /// Representative widest bottom-axis label, e.g. from
    /// `date_labels::sample_label`.
    pub bottom_label_sample: &'a str,
}

/// Partitions the canvas in one top-down pass driven by measured text
/// extents.
///
/// Allocation order: page, main title, subtitle, top-axis placeholder,
/// legends, axis titles, axis labels, bottom axis title and labels; the
/// remaining rectangle is the plot area shared by both value axes.
pub fn layout(
    viewport: Viewport,
    config: &GraphEngineConfig,
    metrics: &dyn TextMetrics,
    inputs: &LayoutInputs<'_>,
) -> GraphResult<RegionTree> {
    viewport.validate()?;
    config.validate()?;

    let pad = config.margin_px;
    let mut tree = RegionTree {
        regions: IndexMap::new(),
    };

    let page = viewport.rect();
    tree.insert(RegionId::Page, page);
    let mut remaining = DeviceRect::new(
        page.left + pad,
        page.top + pad,
        page.width - 2.0 * pad,
        page.height - 2.0 * pad,
    );

    let title_height = if config.title.is_empty() {
        0.0
    } else {
        metrics.measure(&config.title_font, &config.title).height + pad
    };
    let (title_strip, rest) = remaining.take_top(title_height);
    tree.insert(RegionId::MainTitle, title_strip);
    remaining = rest;

    let subtitle_height = if config.subtitle.is_empty() {
        0.0
    } else {
        metrics.measure(&config.font, &config.subtitle).height + pad
    };
    let (subtitle_strip, rest) = remaining.take_top(subtitle_height);
    tree.insert(RegionId::Subtitle, subtitle_strip);
    remaining = rest;

    let (top_axis, rest) = remaining.take_top(0.0);
    tree.insert(RegionId::TopAxis, top_axis);
    remaining = rest;

    // Raster legend and a right-hand series legend are mutually exclusive;
    // the color key wins the column.
    let raster_size = match (config.encoding, inputs.symbol_table) {
        (Encoding::Raster, Some(table)) => raster_legend_size(table, &config.font, metrics),
        _ => crate::api::text::TextSize::zero(),
    };
    let raster_active = raster_size.width > 0.0;

    let series_legend = if config.legend_position == LegendPosition::Hidden
        || (raster_active && config.legend_position == LegendPosition::Right)
    {
        crate::api::text::TextSize::zero()
    } else {
        legend_size(inputs.legend_entries, &config.font, metrics)
    };

    let (bottom_legend, rest) = remaining.take_bottom(
        if config.legend_position == LegendPosition::Bottom {
            series_legend.height
        } else {
            0.0
        },
    );
    tree.insert(RegionId::BottomLegend, bottom_legend);
    remaining = rest;

    let (left_legend, rest) = remaining.take_left(
        if config.legend_position == LegendPosition::Left {
            series_legend.width
        } else {
            0.0
        },
    );
    tree.insert(RegionId::LeftLegend, left_legend);
    remaining = rest;

    let (right_legend, rest) = remaining.take_right(
        if config.legend_position == LegendPosition::Right && !raster_active {
            series_legend.width
        } else {
            0.0
        },
    );
    tree.insert(RegionId::RightLegend, right_legend);
    remaining = rest;

    let (raster_legend, rest) = remaining.take_right(raster_size.width);
    tree.insert(RegionId::RasterLegend, raster_legend);
    remaining = rest;

    // Axis titles render rotated, so their strip width is one line height.
    let row_height = line_height(metrics, &config.font);
    let (left_title, rest) = remaining.take_left(if config.left_axis.title.is_empty() {
        0.0
    } else {
        row_height + pad
    });
    tree.insert(RegionId::LeftAxisTitle, left_title);
    remaining = rest;

    let (right_title, rest) = remaining.take_right(if config.right_axis.title.is_empty() {
        0.0
    } else {
        row_height + pad
    });
    tree.insert(RegionId::RightAxisTitle, right_title);
    remaining = rest;

    // Value-label strips are sized from the widest digit glyph times the
    // configured character estimate; actual labels do not exist yet.
    let digit = max_digit_width(metrics, &config.font);
    let (left_labels, rest) = remaining.take_left(if inputs.has_left_axis {
        digit * config.left_axis.label_chars as f64 + pad
    } else {
        0.0
    });
    tree.insert(RegionId::LeftAxisLabels, left_labels);
    remaining = rest;

    let (right_labels, rest) = remaining.take_right(if inputs.has_right_axis {
        digit * config.right_axis.label_chars as f64 + pad
    } else {
        0.0
    });
    tree.insert(RegionId::RightAxisLabels, right_labels);
    remaining = rest;

    let (bottom_title, rest) = remaining.take_bottom(if config.time_axis_title.is_empty() {
        0.0
    } else {
        row_height + pad
    });
    tree.insert(RegionId::BottomAxisTitle, bottom_title);
    remaining = rest;

    let bottom_label_height = if inputs.bottom_label_sample.is_empty() {
        0.0
    } else {
        metrics
            .measure(&config.font, inputs.bottom_label_sample)
            .height
            + pad
    };
    let (bottom_labels, rest) = remaining.take_bottom(bottom_label_height);
    tree.insert(RegionId::BottomAxisLabels, bottom_labels);
    remaining = rest;

    let inside = if config.legend_position == LegendPosition::Inside {
        DeviceRect::new(
            remaining.left + pad,
            remaining.top + pad,
            series_legend.width.min(remaining.width),
            series_legend.height.min(remaining.height),
        )
    } else {
        DeviceRect::new(remaining.left, remaining.top, 0.0, 0.0)
    };
    tree.insert(RegionId::InsideLegend, inside);

    tree.insert(RegionId::Plot, remaining);
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::{LayoutInputs, RegionId, layout};
    use crate::api::config::{GraphEngineConfig, LegendPosition};
    use crate::api::legend::LegendEntry;
    use crate::api::text::FixedCellMetrics;
    use crate::core::types::{DataRect, Viewport};
    use crate::render::Color;

    fn inputs<'a>(entries: &'a [LegendEntry]) -> LayoutInputs<'a> {
        LayoutInputs {
            legend_entries: entries,
            symbol_table: None,
            has_left_axis: true,
            has_right_axis: false,
            bottom_label_sample: "88 May 8888",
        }
    }

    fn entries() -> Vec<LegendEntry> {
        vec![
            LegendEntry {
                label: "observed flow".to_owned(),
                color: Color::BLACK,
            },
            LegendEntry {
                label: "simulated flow".to_owned(),
                color: Color::BLACK,
            },
        ]
    }

    #[test]
    fn every_region_exists_even_when_degenerate() {
        let config = GraphEngineConfig::default();
        let metrics = FixedCellMetrics::default();
        let entries = entries();
        let tree = layout(
            Viewport::new(800, 600),
            &config,
            &metrics,
            &inputs(&entries),
        )
        .expect("layout");
        for id in [
            RegionId::Page,
            RegionId::MainTitle,
            RegionId::Subtitle,
            RegionId::TopAxis,
            RegionId::BottomLegend,
            RegionId::LeftLegend,
            RegionId::RightLegend,
            RegionId::RasterLegend,
            RegionId::InsideLegend,
            RegionId::LeftAxisTitle,
            RegionId::LeftAxisLabels,
            RegionId::RightAxisTitle,
            RegionId::RightAxisLabels,
            RegionId::BottomAxisTitle,
            RegionId::BottomAxisLabels,
            RegionId::Plot,
        ] {
            assert!(tree.get(id).is_some(), "missing region {id:?}");
        }
    }

    #[test]
    fn empty_title_collapses_to_zero_height() {
        let config = GraphEngineConfig::default();
        let metrics = FixedCellMetrics::default();
        let entries = entries();
        let tree = layout(
            Viewport::new(800, 600),
            &config,
            &metrics,
            &inputs(&entries),
        )
        .expect("layout");
        assert_eq!(tree.device(RegionId::MainTitle).height, 0.0);

        let mut titled = GraphEngineConfig::default();
        titled.title = "Flows at Gauge 7".to_owned();
        let tree = layout(
            Viewport::new(800, 600),
            &titled,
            &metrics,
            &inputs(&entries),
        )
        .expect("layout");
        assert!(tree.device(RegionId::MainTitle).height > 0.0);
    }

    #[test]
    fn plot_never_overlaps_the_label_strip() {
        let config = GraphEngineConfig::default();
        let metrics = FixedCellMetrics::default();
        let entries = entries();
        let tree = layout(
            Viewport::new(800, 600),
            &config,
            &metrics,
            &inputs(&entries),
        )
        .expect("layout");
        let plot = tree.device(RegionId::Plot);
        let labels = tree.device(RegionId::LeftAxisLabels);
        assert!(labels.right() <= plot.left + 1e-9);
        assert!(labels.width > 0.0);
    }

    #[test]
    fn bottom_legend_reserves_rows_for_entries() {
        let mut config = GraphEngineConfig::default();
        config.legend_position = LegendPosition::Bottom;
        let metrics = FixedCellMetrics::default();
        let entries = entries();
        let tree = layout(
            Viewport::new(800, 600),
            &config,
            &metrics,
            &inputs(&entries),
        )
        .expect("layout");
        assert!(tree.device(RegionId::BottomLegend).height > 0.0);
        assert_eq!(tree.device(RegionId::LeftLegend).width, 0.0);
    }

    #[test]
    fn transform_requires_an_assigned_data_rect() {
        let config = GraphEngineConfig::default();
        let metrics = FixedCellMetrics::default();
        let entries = entries();
        let mut tree = layout(
            Viewport::new(800, 600),
            &config,
            &metrics,
            &inputs(&entries),
        )
        .expect("layout");
        assert!(tree.transform(RegionId::Plot).is_err());
        tree.set_data(RegionId::Plot, DataRect::new(0.0, 1.0, 0.0, 1.0))
            .expect("set data");
        assert!(tree.transform(RegionId::Plot).is_ok());
    }
}
