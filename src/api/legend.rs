use crate::api::symbol_table::SymbolTable;
use crate::api::text::{FontSpec, TextMetrics, TextSize, line_height, max_label_width};
use crate::core::types::DeviceRect;
use crate::render::{Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

/// Fixed width of the color swatch drawn before each legend entry.
pub const SWATCH_WIDTH_PX: f64 = 24.0;
/// Gap between swatch and entry text, and between legend rows.
pub const LEGEND_PADDING_PX: f64 = 6.0;

/// One resolved legend entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color,
}

/// Measured extent of a stacked (one entry per line) legend block.
#[must_use]
pub fn legend_size(
    entries: &[LegendEntry],
    font: &FontSpec,
    metrics: &dyn TextMetrics,
) -> TextSize {
    if entries.is_empty() {
        return TextSize::zero();
    }
    let labels: Vec<&str> = entries.iter().map(|entry| entry.label.as_str()).collect();
    let row_height = line_height(metrics, font) + LEGEND_PADDING_PX;
    TextSize {
        width: SWATCH_WIDTH_PX
            + LEGEND_PADDING_PX
            + max_label_width(metrics, font, &labels)
            + LEGEND_PADDING_PX,
        height: row_height * entries.len() as f64,
    }
}

/// Measured extent of the continuous color-scale key, sized from the
/// symbol-table row strings.
#[must_use]
pub fn raster_legend_size(
    table: &SymbolTable,
    font: &FontSpec,
    metrics: &dyn TextMetrics,
) -> TextSize {
    let labels = table.row_labels();
    if labels.is_empty() {
        return TextSize::zero();
    }
    let row_height = line_height(metrics, font) + LEGEND_PADDING_PX;
    TextSize {
        width: SWATCH_WIDTH_PX
            + LEGEND_PADDING_PX
            + max_label_width(metrics, font, &labels)
            + LEGEND_PADDING_PX,
        height: row_height * labels.len() as f64,
    }
}

/// Emits swatch + label rows for the series legend into `frame`.
///
/// Entries render top-down from the region's upper-left corner; anything
/// that would overflow the region is dropped rather than clipped mid-glyph.
pub fn build_series_legend(
    frame: &mut RenderFrame,
    region: DeviceRect,
    entries: &[LegendEntry],
    font: &FontSpec,
    metrics: &dyn TextMetrics,
    text_color: Color,
) {
    if region.is_degenerate() {
        return;
    }
    let row_height = line_height(metrics, font) + LEGEND_PADDING_PX;
    let swatch_height = (row_height - LEGEND_PADDING_PX).max(2.0);

    for (row, entry) in entries.iter().enumerate() {
        let top = region.top + row as f64 * row_height;
        if top + row_height > region.bottom() + 0.5 {
            break;
        }
        frame.push_rect(RectPrimitive::new(
            region.left,
            top,
            SWATCH_WIDTH_PX,
            swatch_height,
            entry.color,
        ));
        if !entry.label.is_empty() {
            frame.push_text(TextPrimitive::new(
                entry.label.clone(),
                region.left + SWATCH_WIDTH_PX + LEGEND_PADDING_PX,
                top,
                font.size_px,
                text_color,
                TextHAlign::Left,
            ));
        }
    }
}

/// Emits the color-scale key for the raster encoding into `frame`.
pub fn build_raster_legend(
    frame: &mut RenderFrame,
    region: DeviceRect,
    table: &SymbolTable,
    font: &FontSpec,
    metrics: &dyn TextMetrics,
    text_color: Color,
) {
    if region.is_degenerate() {
        return;
    }
    let row_height = line_height(metrics, font) + LEGEND_PADDING_PX;
    let swatch_height = (row_height - LEGEND_PADDING_PX).max(2.0);

    for (row_index, row) in table.rows().iter().enumerate() {
        let top = region.top + row_index as f64 * row_height;
        if top + row_height > region.bottom() + 0.5 {
            break;
        }
        frame.push_rect(RectPrimitive::new(
            region.left,
            top,
            SWATCH_WIDTH_PX,
            swatch_height,
            row.color,
        ));
        if !row.label.is_empty() {
            frame.push_text(TextPrimitive::new(
                row.label.clone(),
                region.left + SWATCH_WIDTH_PX + LEGEND_PADDING_PX,
                top,
                font.size_px,
                text_color,
                TextHAlign::Left,
            ));
        }
    }
}
