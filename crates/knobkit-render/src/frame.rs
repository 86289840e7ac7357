//! Offscreen display list.
//!
//! A frame is painted completely into an [`OffscreenBuffer`] and only then
//! handed to a surface in one blit, so a half-painted knob is never visible.

use kurbo::{Arc, Ellipse, Line, Point, Size, Stroke};
use knobkit_core::ScaleFont;
use peniko::{Brush, Color};

/// One drawing operation, in widget-local coordinates.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Fill the whole buffer.
    Clear(Color),
    FillEllipse {
        ellipse: Ellipse,
        brush: Brush,
    },
    StrokeEllipse {
        ellipse: Ellipse,
        stroke: Stroke,
        color: Color,
    },
    Line {
        line: Line,
        width: f64,
        color: Color,
    },
    StrokeArc {
        arc: Arc,
        width: f64,
        color: Color,
    },
    /// Text with its top-left corner at `origin`.
    Text {
        text: String,
        origin: Point,
        font: ScaleFont,
        color: Color,
    },
}

/// Owned render target for one widget, sized to the widget bounds.
#[derive(Debug, Clone, Default)]
pub struct OffscreenBuffer {
    size: Size,
    commands: Vec<DrawCommand>,
}

impl OffscreenBuffer {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop everything painted so far and start over with a solid fill.
    pub fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Texts in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_commands() {
        let mut buffer = OffscreenBuffer::new(Size::new(10.0, 10.0));
        buffer.push(DrawCommand::Line {
            line: Line::new((0.0, 0.0), (5.0, 5.0)),
            width: 1.0,
            color: Color::BLACK,
        });
        buffer.clear(Color::WHITE);
        assert_eq!(buffer.len(), 1);
        assert!(matches!(buffer.commands()[0], DrawCommand::Clear(_)));
    }

    #[test]
    fn test_texts_in_order() {
        let mut buffer = OffscreenBuffer::new(Size::new(10.0, 10.0));
        for t in ["a", "b"] {
            buffer.push(DrawCommand::Text {
                text: t.into(),
                origin: Point::ZERO,
                font: ScaleFont::default(),
                color: Color::BLACK,
            });
        }
        assert_eq!(buffer.texts().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
