use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// Canvas size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> GraphResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(GraphError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    #[must_use]
    pub fn rect(self) -> DeviceRect {
        DeviceRect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Identifies one of the two value axes sharing the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YAxis {
    Left,
    Right,
}

impl YAxis {
    pub const BOTH: [YAxis; 2] = [YAxis::Left, YAxis::Right];
}

/// Axis-aligned rectangle in device space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DeviceRect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        self.left + self.width * 0.5
    }

    #[must_use]
    pub fn center_y(self) -> f64 {
        self.top + self.height * 0.5
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }

    /// Splits off a strip of `height` pixels from the top edge.
    ///
    /// Returns `(strip, remainder)`. The strip is clamped to the available
    /// height so degenerate requests collapse to zero instead of going
    /// negative.
    #[must_use]
    pub fn take_top(self, height: f64) -> (Self, Self) {
        let taken = height.clamp(0.0, self.height);
        (
            Self::new(self.left, self.top, self.width, taken),
            Self::new(self.left, self.top + taken, self.width, self.height - taken),
        )
    }

    /// Splits off a strip of `height` pixels from the bottom edge.
    #[must_use]
    pub fn take_bottom(self, height: f64) -> (Self, Self) {
        let taken = height.clamp(0.0, self.height);
        (
            Self::new(self.left, self.bottom() - taken, self.width, taken),
            Self::new(self.left, self.top, self.width, self.height - taken),
        )
    }

    /// Splits off a column of `width` pixels from the left edge.
    #[must_use]
    pub fn take_left(self, width: f64) -> (Self, Self) {
        let taken = width.clamp(0.0, self.width);
        (
            Self::new(self.left, self.top, taken, self.height),
            Self::new(self.left + taken, self.top, self.width - taken, self.height),
        )
    }

    /// Splits off a column of `width` pixels from the right edge.
    #[must_use]
    pub fn take_right(self, width: f64) -> (Self, Self) {
        let taken = width.clamp(0.0, self.width);
        (
            Self::new(self.right() - taken, self.top, taken, self.height),
            Self::new(self.left, self.top, self.width - taken, self.height),
        )
    }

    pub fn validate(self) -> GraphResult<()> {
        for (name, value) in [
            ("left", self.left),
            ("top", self.top),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() {
                return Err(GraphError::InvalidData(format!(
                    "device rect field `{name}` must be finite"
                )));
            }
        }
        Ok(())
    }
}

/// Data-space rectangle assigned to a layout region.
///
/// `x_left`/`x_right` are the data values mapped to the region's left and
/// right device edges; `y_bottom`/`y_top` map to the bottom and top edges.
/// A reversed value axis is expressed by swapping `y_bottom` and `y_top`,
/// never by changing device geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataRect {
    pub x_left: f64,
    pub x_right: f64,
    pub y_bottom: f64,
    pub y_top: f64,
}

impl DataRect {
    #[must_use]
    pub fn new(x_left: f64, x_right: f64, y_bottom: f64, y_top: f64) -> Self {
        Self {
            x_left,
            x_right,
            y_bottom,
            y_top,
        }
    }

    #[must_use]
    pub fn reversed_y(self) -> Self {
        Self {
            y_bottom: self.y_top,
            y_top: self.y_bottom,
            ..self
        }
    }

    #[must_use]
    pub fn x_span(self) -> f64 {
        self.x_right - self.x_left
    }

    #[must_use]
    pub fn y_span(self) -> f64 {
        self.y_top - self.y_bottom
    }

    pub fn validate(self) -> GraphResult<()> {
        for (name, value) in [
            ("x_left", self.x_left),
            ("x_right", self.x_right),
            ("y_bottom", self.y_bottom),
            ("y_top", self.y_top),
        ] {
            if !value.is_finite() {
                return Err(GraphError::InvalidData(format!(
                    "data rect field `{name}` must be finite"
                )));
            }
        }
        if self.x_left == self.x_right || self.y_bottom == self.y_top {
            return Err(GraphError::InvalidData(
                "data rect must span a non-zero range on both axes".to_owned(),
            ));
        }
        Ok(())
    }
}

/// One projected point in data space: x is unix seconds, y a value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Inclusive date period in unix seconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    #[must_use]
    pub fn new(start: i64, end: i64) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    #[must_use]
    pub fn span_seconds(self) -> i64 {
        self.end - self.start
    }

    #[must_use]
    pub fn contains(self, time: i64) -> bool {
        time >= self.start && time <= self.end
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[must_use]
    pub fn intersect(self, other: Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Self { start, end })
    }
}

/// Inclusive value extent on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn include(self, value: f64) -> Self {
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Widens to cover `other` without ever narrowing.
    #[must_use]
    pub fn widened_by(self, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min: min.map_or(self.min, |m| m.min(self.min)),
            max: max.map_or(self.max, |m| m.max(self.max)),
        }
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !self.min.is_finite() || !self.max.is_finite() || self.min == self.max
    }
}

#[cfg(test)]
mod tests {
    use super::{DataRect, DateRange, DeviceRect, ValueRange};

    #[test]
    fn take_top_clamps_to_available_height() {
        let rect = DeviceRect::new(0.0, 0.0, 100.0, 40.0);
        let (strip, rest) = rect.take_top(60.0);
        assert_eq!(strip.height, 40.0);
        assert_eq!(rest.height, 0.0);
    }

    #[test]
    fn take_sides_preserve_total_width() {
        let rect = DeviceRect::new(10.0, 10.0, 200.0, 100.0);
        let (left, rest) = rect.take_left(30.0);
        let (right, middle) = rest.take_right(50.0);
        assert_eq!(left.width + middle.width + right.width, rect.width);
        assert_eq!(middle.left, 40.0);
    }

    #[test]
    fn reversed_y_swaps_edge_values_only() {
        let rect = DataRect::new(0.0, 10.0, 1.0, 5.0).reversed_y();
        assert_eq!(rect.y_bottom, 5.0);
        assert_eq!(rect.y_top, 1.0);
        assert_eq!(rect.x_left, 0.0);
    }

    #[test]
    fn date_range_normalizes_order() {
        let range = DateRange::new(50, 10);
        assert_eq!(range.start, 10);
        assert_eq!(range.end, 50);
    }

    #[test]
    fn value_range_widen_never_narrows() {
        let range = ValueRange::new(2.0, 8.0);
        let widened = range.widened_by(Some(5.0), Some(4.0));
        assert_eq!(widened.min, 2.0);
        assert_eq!(widened.max, 8.0);
        let widened = range.widened_by(Some(-1.0), Some(20.0));
        assert_eq!(widened.min, -1.0);
        assert_eq!(widened.max, 20.0);
    }
}
