//! Vello surface and Parley text measurement.

use std::cell::RefCell;

use kurbo::{Affine, Rect, Size, Stroke};
use knobkit_core::{MeasureError, ScaleFont, TextMeasure};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, Layout, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use vello::Scene;

use crate::frame::{DrawCommand, OffscreenBuffer};
use crate::renderer::{RenderResult, RendererError};
use crate::surface::Surface;

/// Lay out a single line of text.
fn build_layout(
    font_cx: &mut FontContext,
    layout_cx: &mut LayoutContext<Brush>,
    text: &str,
    font: &ScaleFont,
    brush: Brush,
) -> Layout<Brush> {
    let mut builder = layout_cx.ranged_builder(font_cx, text, 1.0, false);
    builder.push_default(StyleProperty::FontSize(font.size as f32));
    builder.push_default(StyleProperty::Brush(brush));
    builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
        font.family.as_str().into(),
    )));
    let mut layout = builder.build(text);
    layout.break_all_lines(None);
    layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
    layout
}

/// Measures label text with Parley.
pub struct ParleyTextMeasure {
    font_cx: RefCell<FontContext>,
    layout_cx: RefCell<LayoutContext<Brush>>,
}

impl Default for ParleyTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyTextMeasure {
    pub fn new() -> Self {
        Self {
            font_cx: RefCell::new(FontContext::new()),
            layout_cx: RefCell::new(LayoutContext::new()),
        }
    }

    /// Make an extra font available under its own family name.
    pub fn register_font(&self, data: &'static [u8]) {
        self.font_cx
            .borrow_mut()
            .collection
            .register_fonts(vello::peniko::Blob::new(std::sync::Arc::new(data)), None);
    }
}

impl TextMeasure for ParleyTextMeasure {
    fn measure(&self, text: &str, font: &ScaleFont) -> Result<Size, MeasureError> {
        if !(font.size.is_finite() && font.size > 0.0) {
            return Err(MeasureError::InvalidSize(font.size));
        }
        let mut font_cx = self
            .font_cx
            .try_borrow_mut()
            .map_err(|e| MeasureError::Failed(e.to_string()))?;
        let mut layout_cx = self
            .layout_cx
            .try_borrow_mut()
            .map_err(|e| MeasureError::Failed(e.to_string()))?;
        let layout = build_layout(&mut font_cx, &mut layout_cx, text, font, Brush::default());
        if !text.is_empty() && layout.width() <= 0.0 {
            return Err(MeasureError::FontUnavailable(font.family.clone()));
        }
        Ok(Size::new(layout.width() as f64, layout.height() as f64))
    }
}

/// A surface that replays frames into a [`vello::Scene`].
pub struct VelloSurface {
    scene: Scene,
    /// Placement of the widget in the target scene.
    transform: Affine,
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            transform: Affine::IDENTITY,
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take the scene, leaving an empty one behind.
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn draw_text(&mut self, text: &str, origin: kurbo::Point, font: &ScaleFont, color: Color) -> usize {
        let brush = Brush::Solid(color);
        let layout = build_layout(
            &mut self.font_cx,
            &mut self.layout_cx,
            text,
            font,
            brush.clone(),
        );
        let text_transform = self.transform * Affine::translate((origin.x, origin.y));
        let mut glyph_count = 0;

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                glyph_count += glyphs.len();
                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
        glyph_count
    }
}

impl Surface for VelloSurface {
    fn blit(&mut self, frame: &OffscreenBuffer) -> RenderResult<()> {
        let size = frame.size();
        if !(size.width.is_finite() && size.height.is_finite()) {
            return Err(RendererError::Surface(format!("invalid frame size {size:?}")));
        }
        self.scene.reset();
        let transform = self.transform;

        for command in frame.commands() {
            match command {
                DrawCommand::Clear(color) => {
                    let rect = Rect::from_origin_size((0.0, 0.0), size);
                    self.scene.fill(Fill::NonZero, transform, *color, None, &rect);
                }
                DrawCommand::FillEllipse { ellipse, brush } => {
                    self.scene.fill(Fill::NonZero, transform, brush, None, ellipse);
                }
                DrawCommand::StrokeEllipse {
                    ellipse,
                    stroke,
                    color,
                } => {
                    self.scene.stroke(stroke, transform, *color, None, ellipse);
                }
                DrawCommand::Line { line, width, color } => {
                    self.scene
                        .stroke(&Stroke::new(*width), transform, *color, None, line);
                }
                DrawCommand::StrokeArc { arc, width, color } => {
                    self.scene
                        .stroke(&Stroke::new(*width), transform, *color, None, arc);
                }
                DrawCommand::Text {
                    text,
                    origin,
                    font,
                    color,
                } => {
                    if self.draw_text(text, *origin, font, *color) == 0 && !text.is_empty() {
                        log::warn!("No glyphs for label {text:?} in {:?}", font.family);
                    }
                }
            }
        }
        Ok(())
    }
}
