use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api::limits::LimitsMode;
use crate::api::text::FontSpec;
use crate::core::bar_series::BarAlignment;
use crate::core::step_series::StepStyle;
use crate::core::types::YAxis;
use crate::error::{GraphError, GraphResult};
use crate::render::Color;

/// Visual encoding of the bound series, carrying only the parameters each
/// variant needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Encoding {
    Line,
    Step {
        /// Explicit step style; `None` selects automatically from the
        /// series interval.
        style: Option<StepStyle>,
    },
    Bar {
        alignment: BarAlignment,
        /// When true, series draw over each other instead of tiling.
        overlap: bool,
    },
    Area,
    StackedArea,
    Scatter {
        /// Overlay monthly-stratified fits instead of the single fit.
        monthly_fits: bool,
        /// Overlay confidence-interval curves when the analysis has them.
        confidence: bool,
    },
    Duration,
    PeriodOfRecord,
    Raster,
}

impl Encoding {
    /// Encodings whose axes mix incommensurable quantities by construction
    /// (percent, ordinal rows, value pairs), so the units check is moot.
    /// The double-mass comparison, when configured upstream, belongs to
    /// this set as well.
    #[must_use]
    pub fn forces_ignore_units(self) -> bool {
        matches!(
            self,
            Self::Duration | Self::Scatter { .. } | Self::Raster | Self::PeriodOfRecord
        )
    }

    /// Encodings that consume external analysis results.
    #[must_use]
    pub fn needs_analysis(self) -> bool {
        matches!(self, Self::Scatter { .. } | Self::Duration)
    }
}

/// Scale family of a value axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisScaleKind {
    #[default]
    Linear,
    Log,
}

/// What happens when series with incompatible units land on one axis and
/// no explicit override resolves it.
///
/// The default aborts that axis' render; hosts preferring the old
/// permissive behavior opt into `Continue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitsPolicy {
    #[default]
    Abort,
    Continue,
}

/// Where the series legend lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LegendPosition {
    #[default]
    Bottom,
    Left,
    Right,
    /// Anchored inside the plot's upper-left corner.
    Inside,
    Hidden,
}

/// Per-axis configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub title: String,
    pub scale: AxisScaleKind,
    pub reversed: bool,
    /// Tri-state ignore-units override; `None` defers to `UnitsPolicy`.
    pub ignore_units: Option<bool>,
    pub limits_mode: LimitsMode,
    /// Estimated label character count used to size the label strip before
    /// ticks exist.
    pub label_chars: usize,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            scale: AxisScaleKind::Linear,
            reversed: false,
            ignore_units: None,
            limits_mode: LimitsMode::Auto,
            label_chars: 8,
        }
    }
}

/// Validated engine configuration for one chart instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEngineConfig {
    pub title: String,
    pub subtitle: String,
    pub font: FontSpec,
    pub title_font: FontSpec,
    pub legend_position: LegendPosition,
    pub units_policy: UnitsPolicy,
    pub encoding: Encoding,
    pub left_axis: AxisConfig,
    pub right_axis: AxisConfig,
    pub time_axis_title: String,
    /// Overrides the precision-scaled allowed connection gap.
    pub allowed_gap_seconds: Option<i64>,
    /// Draw markers for points that cannot connect to a neighbor.
    pub isolated_markers: bool,
    pub margin_px: f64,
}

impl Default for GraphEngineConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            font: FontSpec::default(),
            title_font: FontSpec::new("Sans", 16.0),
            legend_position: LegendPosition::default(),
            units_policy: UnitsPolicy::default(),
            encoding: Encoding::Line,
            left_axis: AxisConfig::default(),
            right_axis: AxisConfig::default(),
            time_axis_title: String::new(),
            allowed_gap_seconds: None,
            isolated_markers: true,
            margin_px: 4.0,
        }
    }
}

impl GraphEngineConfig {
    pub fn validate(&self) -> GraphResult<()> {
        for (name, font) in [("font", &self.font), ("title_font", &self.title_font)] {
            if !font.size_px.is_finite() || font.size_px <= 0.0 {
                return Err(GraphError::InvalidData(format!(
                    "config `{name}` size must be finite and > 0"
                )));
            }
        }
        if !self.margin_px.is_finite() || self.margin_px < 0.0 {
            return Err(GraphError::InvalidData(
                "config margin must be finite and >= 0".to_owned(),
            ));
        }
        if let Some(gap) = self.allowed_gap_seconds {
            if gap <= 0 {
                return Err(GraphError::InvalidData(
                    "allowed gap must be > 0 seconds".to_owned(),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn axis(&self, axis: YAxis) -> &AxisConfig {
        match axis {
            YAxis::Left => &self.left_axis,
            YAxis::Right => &self.right_axis,
        }
    }
}

/// Hierarchical key→string property resolver supplied by the host.
///
/// Keys are dotted paths (`"left.series.2.color"`); the engine treats the
/// store as pure input and never writes to it.
pub trait StyleLookup {
    fn get(&self, key: &str) -> Option<&str>;

    fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key)?.trim().parse().ok()
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.trim() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }

    /// Parses `"r,g,b"` or `"r,g,b,a"` with channels in 0..=255.
    fn get_color(&self, key: &str) -> Option<Color> {
        let raw = self.get(key)?;
        let mut channels = [0.0_f64; 4];
        channels[3] = 255.0;
        let mut count = 0;
        for (index, part) in raw.split(',').enumerate() {
            if index >= 4 {
                return None;
            }
            channels[index] = part.trim().parse::<f64>().ok()?;
            count = index + 1;
        }
        if count < 3 {
            return None;
        }
        let color = Color::rgba(
            channels[0] / 255.0,
            channels[1] / 255.0,
            channels[2] / 255.0,
            channels[3] / 255.0,
        );
        color.validate().ok()?;
        Some(color)
    }
}

/// In-memory style store for hosts and tests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStyles {
    entries: IndexMap<String, String>,
}

impl MemoryStyles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

impl StyleLookup for MemoryStyles {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

/// Key for a per-axis property, e.g. `axis_key(Left, "max") == "left.max"`.
#[must_use]
pub fn axis_key(axis: YAxis, property: &str) -> String {
    match axis {
        YAxis::Left => format!("left.{property}"),
        YAxis::Right => format!("right.{property}"),
    }
}

/// Key for a per-series property at a slot position, e.g.
/// `series_key(Left, 2, "color") == "left.series.2.color"`.
#[must_use]
pub fn series_key(axis: YAxis, slot_index: usize, property: &str) -> String {
    match axis {
        YAxis::Left => format!("left.series.{slot_index}.{property}"),
        YAxis::Right => format!("right.series.{slot_index}.{property}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Encoding, GraphEngineConfig, MemoryStyles, StyleLookup, axis_key, series_key};
    use crate::core::types::YAxis;

    #[test]
    fn default_config_validates() {
        GraphEngineConfig::default().validate().expect("valid");
    }

    #[test]
    fn zero_font_size_is_rejected() {
        let mut config = GraphEngineConfig::default();
        config.font.size_px = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn scatter_and_duration_force_ignore_units() {
        assert!(Encoding::Duration.forces_ignore_units());
        assert!(
            Encoding::Scatter {
                monthly_fits: false,
                confidence: false
            }
            .forces_ignore_units()
        );
        assert!(!Encoding::Line.forces_ignore_units());
    }

    #[test]
    fn style_keys_are_position_aligned() {
        assert_eq!(series_key(YAxis::Left, 3, "color"), "left.series.3.color");
        assert_eq!(axis_key(YAxis::Right, "max"), "right.max");
    }

    #[test]
    fn color_parsing_accepts_rgb_and_rgba() {
        let styles = MemoryStyles::new()
            .with("a.color", "255, 0, 0")
            .with("b.color", "0,128,255,128")
            .with("c.color", "garbage");
        assert!(styles.get_color("a.color").is_some());
        let b = styles.get_color("b.color").expect("rgba");
        assert!((b.alpha - 128.0 / 255.0).abs() < 1e-12);
        assert!(styles.get_color("c.color").is_none());
    }
}
