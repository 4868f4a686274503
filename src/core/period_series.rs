use serde::{Deserialize, Serialize};

use crate::core::scale::RegionTransform;
use crate::core::series::AxisBinding;
use crate::core::types::DateRange;

/// Fraction of an ordinal row filled by its period-of-record bar.
pub const PERIOD_ROW_FILL_RATIO: f64 = 0.6;

/// One period-of-record row bar in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodBar {
    /// Original slot index of the series (for style lookup).
    pub slot_index: usize,
    /// Ordinal row position (1-based, top row first).
    pub ordinal: usize,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Projects one horizontal bar per enabled series spanning that series'
/// data period, at the series' ordinal row on a [0, count+1] reversed axis.
///
/// Gaps between rows come from `PERIOD_ROW_FILL_RATIO`; a row with no
/// overlap between its period and the visible window produces no bar.
#[must_use]
pub fn project_period_bars(
    binding: &AxisBinding,
    transform: RegionTransform,
    visible: DateRange,
) -> Vec<PeriodBar> {
    let mut bars = Vec::new();
    let mut ordinal = 0;

    for (slot_index, series) in binding.active() {
        ordinal += 1;
        let Some(span) = series.period().intersect(visible) else {
            continue;
        };
        let left = transform.x_to_px(span.start as f64);
        let right = transform.x_to_px(span.end as f64);
        let center_y = transform.y_to_px(ordinal as f64);
        let row_height =
            (transform.y_to_px(ordinal as f64 + 1.0) - center_y).abs() * PERIOD_ROW_FILL_RATIO;
        bars.push(PeriodBar {
            slot_index,
            ordinal,
            left,
            top: center_y - row_height * 0.5,
            width: (right - left).max(1.0),
            height: row_height,
        });
    }
    bars
}
