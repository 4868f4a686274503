use serde::{Deserialize, Serialize};

/// Font descriptor handed to the text-metrics provider and backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size_px: f64,
}

impl FontSpec {
    #[must_use]
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("Sans", 12.0)
    }
}

/// Measured pixel extent of a string.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

impl TextSize {
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// Text measurement capability supplied by the host.
///
/// The layout and label search only ever ask for string extents, so any
/// font system (Pango, a bitmap atlas, a test stub) can stand behind this.
pub trait TextMetrics {
    fn measure(&self, font: &FontSpec, text: &str) -> TextSize;
}

/// Deterministic metrics for tests and headless layout: every glyph is a
/// fixed fraction of the font size.
#[derive(Debug, Clone, Copy)]
pub struct FixedCellMetrics {
    pub width_ratio: f64,
    pub height_ratio: f64,
}

impl Default for FixedCellMetrics {
    fn default() -> Self {
        Self {
            width_ratio: 0.6,
            height_ratio: 1.25,
        }
    }
}

impl TextMetrics for FixedCellMetrics {
    fn measure(&self, font: &FontSpec, text: &str) -> TextSize {
        if text.is_empty() {
            return TextSize::zero();
        }
        TextSize {
            width: font.size_px * self.width_ratio * text.chars().count() as f64,
            height: font.size_px * self.height_ratio,
        }
    }
}

/// Widest digit glyph under the font, probed over 0..=9.
///
/// Numeric label strips are sized from this instead of from the actual
/// labels, which are not known until the plot rectangle exists.
#[must_use]
pub fn max_digit_width(metrics: &dyn TextMetrics, font: &FontSpec) -> f64 {
    let mut widest = 0.0_f64;
    for digit in 0..=9_u32 {
        let width = metrics.measure(font, &digit.to_string()).width;
        widest = widest.max(width);
    }
    widest
}

/// Widest string in a set; zero for an empty set.
#[must_use]
pub fn max_label_width<S: AsRef<str>>(
    metrics: &dyn TextMetrics,
    font: &FontSpec,
    labels: &[S],
) -> f64 {
    labels
        .iter()
        .map(|label| metrics.measure(font, label.as_ref()).width)
        .fold(0.0, f64::max)
}

/// Line height under the font, measured from a representative glyph run.
#[must_use]
pub fn line_height(metrics: &dyn TextMetrics, font: &FontSpec) -> f64 {
    metrics.measure(font, "Mg0").height
}

#[cfg(test)]
mod tests {
    use super::{FixedCellMetrics, FontSpec, TextMetrics, max_digit_width, max_label_width};

    #[test]
    fn fixed_metrics_scale_with_font_size() {
        let metrics = FixedCellMetrics::default();
        let small = metrics.measure(&FontSpec::new("Sans", 10.0), "abc");
        let large = metrics.measure(&FontSpec::new("Sans", 20.0), "abc");
        assert!(large.width > small.width);
        assert!(large.height > small.height);
    }

    #[test]
    fn digit_probe_matches_single_glyph_width() {
        let metrics = FixedCellMetrics::default();
        let font = FontSpec::default();
        let probe = max_digit_width(&metrics, &font);
        assert_eq!(probe, metrics.measure(&font, "8").width);
    }

    #[test]
    fn empty_label_set_has_zero_width() {
        let metrics = FixedCellMetrics::default();
        let labels: [&str; 0] = [];
        assert_eq!(max_label_width(&metrics, &FontSpec::default(), &labels), 0.0);
    }
}
