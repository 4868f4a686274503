use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;
use std::f64::consts::FRAC_PI_2;

use crate::api::text::{FontSpec, TextMetrics, TextSize};
use crate::error::{GraphError, GraphResult};
use crate::render::{
    Color, LineStrokeStyle, RenderFrame, Renderer, SymbolKind, TextHAlign, TextOrientation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub polygons_drawn: usize,
    pub symbols_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// Renders offscreen into an image surface through `Renderer::render`;
/// hosts embedding a drawing widget can lift the surface out afterwards.
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    last_stats: CairoRenderStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> GraphResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(GraphError::InvalidData(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::WHITE,
            last_stats: CairoRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn set_clear_color(&mut self, color: Color) -> GraphResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    #[must_use]
    pub fn last_stats(&self) -> CairoRenderStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> GraphResult<()> {
        frame.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        let mut stats = CairoRenderStats::default();

        for rect in &frame.rects {
            apply_color(context, rect.color);
            context.rectangle(rect.left, rect.top, rect.width, rect.height);
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            stats.rects_drawn += 1;
        }

        for polygon in &frame.polygons {
            let mut points = polygon.points.iter();
            if let Some(&(x, y)) = points.next() {
                context.move_to(x, y);
                for &(x, y) in points {
                    context.line_to(x, y);
                }
                context.close_path();
                apply_color(context, polygon.color);
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill polygon", err))?;
            }
            stats.polygons_drawn += 1;
        }

        for line in &frame.lines {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            apply_dash(context, line.style, line.stroke_width);
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            stats.lines_drawn += 1;
        }
        context.set_dash(&[], 0.0);

        for symbol in &frame.symbols {
            apply_color(context, symbol.color);
            draw_symbol(context, *symbol)?;
            stats.symbols_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let font_description =
                FontDescription::from_string(&format!("Sans {}", text.font_size_px));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let offset = match text.h_align {
                TextHAlign::Left => 0.0,
                TextHAlign::Center => -f64::from(text_width) / 2.0,
                TextHAlign::Right => -f64::from(text_width),
            };

            apply_color(context, text.color);
            context.save().ok();
            match text.orientation {
                TextOrientation::Horizontal => {
                    context.move_to(text.x + offset, text.y);
                }
                TextOrientation::VerticalUp => {
                    context.translate(text.x, text.y - offset);
                    context.rotate(-FRAC_PI_2);
                    context.move_to(0.0, 0.0);
                }
            }
            pangocairo::functions::show_layout(context, &layout);
            context.restore().ok();
            stats.texts_drawn += 1;
        }

        self.last_stats = stats;
        Ok(())
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> GraphResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

/// Pango-backed text measurement for layout and label search.
#[derive(Debug)]
pub struct CairoTextMetrics {
    surface: ImageSurface,
}

impl CairoTextMetrics {
    pub fn new() -> GraphResult<Self> {
        let surface = ImageSurface::create(Format::ARgb32, 1, 1)
            .map_err(|err| map_backend_error("failed to create measuring surface", err))?;
        Ok(Self { surface })
    }
}

impl TextMetrics for CairoTextMetrics {
    fn measure(&self, font: &FontSpec, text: &str) -> TextSize {
        let Ok(context) = Context::new(&self.surface) else {
            return TextSize::zero();
        };
        let layout = pangocairo::functions::create_layout(&context);
        let font_description =
            FontDescription::from_string(&format!("{} {}", font.family, font.size_px));
        layout.set_font_description(Some(&font_description));
        layout.set_text(text);
        let (width, height) = layout.pixel_size();
        TextSize {
            width: f64::from(width),
            height: f64::from(height),
        }
    }
}

fn draw_symbol(context: &Context, symbol: crate::render::SymbolPrimitive) -> GraphResult<()> {
    let half = symbol.size_px * 0.5;
    let (x, y) = (symbol.x, symbol.y);
    match symbol.kind {
        SymbolKind::Circle => {
            context.arc(x, y, half, 0.0, std::f64::consts::TAU);
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill circle symbol", err))?;
        }
        SymbolKind::Square => {
            context.rectangle(x - half, y - half, symbol.size_px, symbol.size_px);
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill square symbol", err))?;
        }
        SymbolKind::Diamond => {
            context.move_to(x, y - half);
            context.line_to(x + half, y);
            context.line_to(x, y + half);
            context.line_to(x - half, y);
            context.close_path();
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill diamond symbol", err))?;
        }
        SymbolKind::TriangleUp => {
            context.move_to(x, y - half);
            context.line_to(x + half, y + half);
            context.line_to(x - half, y + half);
            context.close_path();
            context
                .fill()
                .map_err(|err| map_backend_error("failed to fill triangle symbol", err))?;
        }
        SymbolKind::Plus | SymbolKind::Cross => {
            context.set_line_width((symbol.size_px * 0.2).max(1.0));
            if symbol.kind == SymbolKind::Plus {
                context.move_to(x - half, y);
                context.line_to(x + half, y);
                context.move_to(x, y - half);
                context.line_to(x, y + half);
            } else {
                context.move_to(x - half, y - half);
                context.line_to(x + half, y + half);
                context.move_to(x - half, y + half);
                context.line_to(x + half, y - half);
            }
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke symbol", err))?;
        }
    }
    Ok(())
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_dash(context: &Context, style: LineStrokeStyle, stroke_width: f64) {
    match style {
        LineStrokeStyle::Solid => context.set_dash(&[], 0.0),
        LineStrokeStyle::Dashed => context.set_dash(&[stroke_width * 4.0, stroke_width * 3.0], 0.0),
        LineStrokeStyle::Dotted => context.set_dash(&[stroke_width, stroke_width * 2.0], 0.0),
    }
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> GraphError {
    GraphError::Backend(format!("{prefix}: {err}"))
}
