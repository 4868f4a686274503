use serde::{Deserialize, Serialize};

use crate::core::types::{DateRange, ValueRange, YAxis};
use crate::error::{GraphError, GraphResult};

/// Smallest zoomable time span.
pub const MIN_PERIOD_SPAN_SECONDS: i64 = 60;

/// Full versus current value limits for one value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisWindow {
    /// Extent over the full data period.
    pub full: ValueRange,
    /// Extent currently shown; differs from `full` when zoomed.
    pub current: ValueRange,
}

impl AxisWindow {
    #[must_use]
    pub fn new(range: ValueRange) -> Self {
        Self {
            full: range,
            current: range,
        }
    }
}

/// The shared X period and per-axis value limits of one chart view.
///
/// "Full" limits always describe the whole data period; "current" limits are
/// what the plot shows and are the only state zoom/pan operations mutate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleWindow {
    full_period: DateRange,
    current_period: DateRange,
    left: Option<AxisWindow>,
    right: Option<AxisWindow>,
    /// Set when the host pinned the view explicitly; limit recomputation
    /// must then leave the current ranges alone.
    explicit_view: bool,
}

impl VisibleWindow {
    #[must_use]
    pub fn new(full_period: DateRange) -> Self {
        Self {
            full_period,
            current_period: full_period,
            left: None,
            right: None,
            explicit_view: false,
        }
    }

    #[must_use]
    pub fn full_period(self) -> DateRange {
        self.full_period
    }

    #[must_use]
    pub fn current_period(self) -> DateRange {
        self.current_period
    }

    #[must_use]
    pub fn axis(self, axis: YAxis) -> Option<AxisWindow> {
        match axis {
            YAxis::Left => self.left,
            YAxis::Right => self.right,
        }
    }

    #[must_use]
    pub fn is_zoomed(self) -> bool {
        self.current_period != self.full_period
            || [self.left, self.right]
                .into_iter()
                .flatten()
                .any(|w| w.current != w.full)
    }

    #[must_use]
    pub fn is_explicit_view(self) -> bool {
        self.explicit_view
    }

    /// Replaces the full period, widening the current period only when it
    /// was not zoomed or pinned.
    pub fn set_full_period(&mut self, period: DateRange) {
        let follow = !self.explicit_view && self.current_period == self.full_period;
        self.full_period = period;
        if follow {
            self.current_period = period;
        }
    }

    pub fn set_axis_full(&mut self, axis: YAxis, range: ValueRange) {
        let slot = match axis {
            YAxis::Left => &mut self.left,
            YAxis::Right => &mut self.right,
        };
        match slot {
            Some(window) => {
                let follow = !self.explicit_view && window.current == window.full;
                window.full = range;
                if follow {
                    window.current = range;
                }
            }
            None => *slot = Some(AxisWindow::new(range)),
        }
    }

    pub fn set_axis_current(&mut self, axis: YAxis, range: ValueRange) -> GraphResult<()> {
        if range.is_degenerate() {
            return Err(GraphError::InvalidData(
                "axis view range must be finite and non-empty".to_owned(),
            ));
        }
        let slot = match axis {
            YAxis::Left => &mut self.left,
            YAxis::Right => &mut self.right,
        };
        match slot {
            Some(window) => window.current = range,
            None => {
                *slot = Some(AxisWindow {
                    full: range,
                    current: range,
                });
            }
        }
        Ok(())
    }

    /// Pins the current view to explicit host-supplied limits.
    pub fn set_view(
        &mut self,
        period: DateRange,
        left: Option<ValueRange>,
        right: Option<ValueRange>,
    ) -> GraphResult<()> {
        if period.span_seconds() <= 0 {
            return Err(GraphError::InvalidData(
                "view period must span a positive duration".to_owned(),
            ));
        }
        self.current_period = period;
        if let Some(range) = left {
            self.set_axis_current(YAxis::Left, range)?;
        }
        if let Some(range) = right {
            self.set_axis_current(YAxis::Right, range)?;
        }
        self.explicit_view = true;
        Ok(())
    }

    /// Shifts the current period by a time delta, clamped into the full
    /// period so panning cannot escape the data.
    pub fn pan_by_seconds(&mut self, delta: i64) {
        let span = self.current_period.span_seconds();
        let lo = self.full_period.start;
        let hi = (self.full_period.end - span).max(lo);
        let start = (self.current_period.start + delta).clamp(lo, hi);
        self.current_period = DateRange::new(start, start + span);
        self.explicit_view = true;
    }

    /// Zooms the current period about an anchor time.
    ///
    /// `factor > 1.0` zooms in, `0.0 < factor < 1.0` zooms out. The result
    /// is clamped to `MIN_PERIOD_SPAN_SECONDS` and to the full period.
    pub fn zoom_by_factor(&mut self, factor: f64, anchor: i64) -> GraphResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(GraphError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        let anchor = anchor.clamp(self.current_period.start, self.current_period.end);
        let span = self.current_period.span_seconds() as f64;
        let new_span = (span / factor).max(MIN_PERIOD_SPAN_SECONDS as f64);
        let ratio = if span > 0.0 {
            (anchor - self.current_period.start) as f64 / span
        } else {
            0.5
        };
        let start = anchor - (new_span * ratio) as i64;
        let end = start + new_span as i64;
        self.current_period = DateRange::new(
            start.max(self.full_period.start),
            end.min(self.full_period.end).max(start + MIN_PERIOD_SPAN_SECONDS),
        );
        self.explicit_view = true;
        Ok(())
    }

    /// Restores the full-period view and releases the explicit pin.
    pub fn reset_to_full(&mut self) {
        self.current_period = self.full_period;
        for slot in [&mut self.left, &mut self.right] {
            if let Some(window) = slot {
                window.current = window.full;
            }
        }
        self.explicit_view = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{MIN_PERIOD_SPAN_SECONDS, VisibleWindow};
    use crate::core::types::{DateRange, ValueRange, YAxis};

    #[test]
    fn pan_clamps_inside_full_period() {
        let mut window = VisibleWindow::new(DateRange::new(0, 1_000));
        window
            .set_view(DateRange::new(100, 300), None, None)
            .expect("view");
        window.pan_by_seconds(5_000);
        assert_eq!(window.current_period(), DateRange::new(800, 1_000));
    }

    #[test]
    fn zoom_in_shrinks_span_about_anchor() {
        let mut window = VisibleWindow::new(DateRange::new(0, 10_000));
        window.zoom_by_factor(2.0, 5_000).expect("zoom");
        let current = window.current_period();
        assert!(current.span_seconds() <= 5_000 + 1);
        assert!(current.contains(5_000));
    }

    #[test]
    fn zoom_respects_minimum_span() {
        let mut window = VisibleWindow::new(DateRange::new(0, 10_000));
        window.zoom_by_factor(1.0e9, 5_000).expect("zoom");
        assert!(window.current_period().span_seconds() >= MIN_PERIOD_SPAN_SECONDS);
    }

    #[test]
    fn full_period_updates_follow_only_unzoomed_views() {
        let mut window = VisibleWindow::new(DateRange::new(0, 100));
        window.set_full_period(DateRange::new(0, 200));
        assert_eq!(window.current_period(), DateRange::new(0, 200));

        window
            .set_view(DateRange::new(10, 50), None, None)
            .expect("view");
        window.set_full_period(DateRange::new(0, 400));
        assert_eq!(window.current_period(), DateRange::new(10, 50));
    }

    #[test]
    fn reset_restores_axis_ranges() {
        let mut window = VisibleWindow::new(DateRange::new(0, 100));
        window.set_axis_full(YAxis::Left, ValueRange::new(0.0, 10.0));
        window
            .set_axis_current(YAxis::Left, ValueRange::new(2.0, 4.0))
            .expect("range");
        window.reset_to_full();
        let axis = window.axis(YAxis::Left).expect("axis window");
        assert_eq!(axis.current, axis.full);
    }
}
