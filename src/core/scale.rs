use serde::{Deserialize, Serialize};

use crate::core::types::{DataRect, DeviceRect};
use crate::error::{GraphError, GraphResult};

/// Affine mapping between a region's data rectangle and its device
/// rectangle.
///
/// The transform is the single source of truth for data→pixel conversion;
/// every encoding projects through it so geometry agrees pixel-for-pixel
/// with the tick and label computation done in the same coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionTransform {
    device: DeviceRect,
    data: DataRect,
}

impl RegionTransform {
    pub fn new(device: DeviceRect, data: DataRect) -> GraphResult<Self> {
        device.validate()?;
        data.validate()?;
        if device.is_degenerate() {
            return Err(GraphError::InvalidData(
                "region transform needs a non-degenerate device rect".to_owned(),
            ));
        }
        Ok(Self { device, data })
    }

    #[must_use]
    pub fn device(self) -> DeviceRect {
        self.device
    }

    #[must_use]
    pub fn data(self) -> DataRect {
        self.data
    }

    #[must_use]
    pub fn x_to_px(self, x: f64) -> f64 {
        let normalized = (x - self.data.x_left) / self.data.x_span();
        self.device.left + normalized * self.device.width
    }

    #[must_use]
    pub fn y_to_px(self, y: f64) -> f64 {
        let normalized = (y - self.data.y_top) / (self.data.y_bottom - self.data.y_top);
        self.device.top + normalized * self.device.height
    }

    #[must_use]
    pub fn px_to_x(self, px: f64) -> f64 {
        let normalized = (px - self.device.left) / self.device.width;
        self.data.x_left + normalized * self.data.x_span()
    }

    #[must_use]
    pub fn px_to_y(self, py: f64) -> f64 {
        let normalized = (py - self.device.top) / self.device.height;
        self.data.y_top + normalized * (self.data.y_bottom - self.data.y_top)
    }

    #[must_use]
    pub fn to_px(self, x: f64, y: f64) -> (f64, f64) {
        (self.x_to_px(x), self.y_to_px(y))
    }

    /// Device-space Y of a value baseline clamped into the region.
    #[must_use]
    pub fn baseline_px(self, baseline: f64) -> f64 {
        self.y_to_px(baseline)
            .clamp(self.device.top, self.device.bottom())
    }
}
