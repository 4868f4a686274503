use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::render::Color;

/// One value-range→color row of an externally supplied symbol table.
///
/// A row covers all values up to and including its bound; rows are ordered
/// by ascending bound and the last row also covers everything above it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolRow {
    pub upper_bound: f64,
    pub color: Color,
    pub label: String,
}

/// Ordered value→color mapping used to fill raster cells and to size the
/// raster legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    rows: Vec<SymbolRow>,
    missing_color: Color,
}

impl SymbolTable {
    pub fn new(rows: Vec<SymbolRow>, missing_color: Color) -> GraphResult<Self> {
        if rows.is_empty() {
            return Err(GraphError::InvalidData(
                "symbol table needs at least one row".to_owned(),
            ));
        }
        for row in &rows {
            if !row.upper_bound.is_finite() {
                return Err(GraphError::InvalidData(
                    "symbol table bounds must be finite".to_owned(),
                ));
            }
            row.color.validate()?;
        }
        for pair in rows.windows(2) {
            if pair[1].upper_bound <= pair[0].upper_bound {
                return Err(GraphError::InvalidData(
                    "symbol table bounds must be strictly ascending".to_owned(),
                ));
            }
        }
        missing_color.validate()?;
        Ok(Self {
            rows,
            missing_color,
        })
    }

    /// Evenly splits a value range across a color ramp; a convenience for
    /// hosts without a curated table.
    pub fn evenly_spaced(min: f64, max: f64, colors: &[Color], missing: Color) -> GraphResult<Self> {
        if colors.is_empty() || !min.is_finite() || !max.is_finite() || min >= max {
            return Err(GraphError::InvalidData(
                "evenly spaced symbol table needs a finite range and colors".to_owned(),
            ));
        }
        let step = (max - min) / colors.len() as f64;
        let rows = colors
            .iter()
            .enumerate()
            .map(|(index, &color)| {
                let bound = min + step * (index + 1) as f64;
                SymbolRow {
                    upper_bound: bound,
                    color,
                    label: format!("<= {bound:.3}"),
                }
            })
            .collect();
        Self::new(rows, missing)
    }

    #[must_use]
    pub fn rows(&self) -> &[SymbolRow] {
        &self.rows
    }

    #[must_use]
    pub fn missing_color(&self) -> Color {
        self.missing_color
    }

    /// Color of the first row whose bound holds `value`; values above every
    /// bound take the last row's color, missing values the missing color.
    #[must_use]
    pub fn color_for(&self, value: f64) -> Color {
        if !value.is_finite() {
            return self.missing_color;
        }
        for row in &self.rows {
            if value <= row.upper_bound {
                return row.color;
            }
        }
        self.rows[self.rows.len() - 1].color
    }

    #[must_use]
    pub fn row_labels(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.label.as_str()).collect()
    }
}
