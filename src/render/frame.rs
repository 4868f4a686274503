use crate::core::types::Viewport;
use crate::error::{GraphError, GraphResult};
use crate::render::{
    LinePrimitive, PolygonPrimitive, RectPrimitive, SymbolPrimitive, TextPrimitive,
};
use serde::{Deserialize, Serialize};

/// Backend-agnostic scene for one chart draw pass.
///
/// Primitive vectors are drawn in order within each kind, and kinds are
/// drawn rects → polygons → lines → symbols → texts so filled geometry
/// never obscures axis lines or labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub polygons: Vec<PolygonPrimitive>,
    pub symbols: Vec<SymbolPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            lines: Vec::new(),
            rects: Vec::new(),
            polygons: Vec::new(),
            symbols: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn push_line(&mut self, line: LinePrimitive) {
        self.lines.push(line);
    }

    pub fn push_rect(&mut self, rect: RectPrimitive) {
        self.rects.push(rect);
    }

    pub fn push_polygon(&mut self, polygon: PolygonPrimitive) {
        self.polygons.push(polygon);
    }

    pub fn push_symbol(&mut self, symbol: SymbolPrimitive) {
        self.symbols.push(symbol);
    }

    pub fn push_text(&mut self, text: TextPrimitive) {
        self.texts.push(text);
    }

    /// Appends another frame's primitives, keeping this frame's viewport.
    pub fn merge(&mut self, other: RenderFrame) -> GraphResult<()> {
        if other.viewport != self.viewport {
            return Err(GraphError::InvalidData(
                "cannot merge frames with different viewports".to_owned(),
            ));
        }
        self.lines.extend(other.lines);
        self.rects.extend(other.rects);
        self.polygons.extend(other.polygons);
        self.symbols.extend(other.symbols);
        self.texts.extend(other.texts);
        Ok(())
    }

    pub fn validate(&self) -> GraphResult<()> {
        self.viewport.validate()?;
        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for polygon in &self.polygons {
            polygon.validate()?;
        }
        for symbol in &self.symbols {
            symbol.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.rects.is_empty()
            && self.polygons.is_empty()
            && self.symbols.is_empty()
            && self.texts.is_empty()
    }

    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.lines.len()
            + self.rects.len()
            + self.polygons.len()
            + self.symbols.len()
            + self.texts.len()
    }
}
