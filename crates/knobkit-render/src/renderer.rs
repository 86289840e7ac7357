//! Renderer trait abstraction.

use knobkit_core::{KnobBrushes, KnobConfiguration, Layout, MeasureError, TextMeasure};
use peniko::Color;
use thiserror::Error;

use crate::frame::OffscreenBuffer;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Measure failed: {0}")]
    Measure(#[from] MeasureError),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything a single knob frame is painted from.
pub struct RenderContext<'a> {
    pub config: &'a KnobConfiguration,
    pub layout: &'a Layout,
    pub brushes: &'a KnobBrushes,
    pub measure: &'a dyn TextMeasure,
    /// Current value.
    pub value: i32,
    /// Draw the focus ring.
    pub focused: bool,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context showing the minimum, unfocused.
    pub fn new(
        config: &'a KnobConfiguration,
        layout: &'a Layout,
        brushes: &'a KnobBrushes,
        measure: &'a dyn TextMeasure,
    ) -> Self {
        Self {
            config,
            layout,
            brushes,
            measure,
            value: config.minimum(),
            focused: false,
        }
    }

    pub fn with_value(mut self, value: i32) -> Self {
        self.value = value;
        self
    }

    pub fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

/// Paints frames into an offscreen buffer.
pub trait Renderer: Send + Sync {
    /// Paint one complete frame. Faults are handled inside; the buffer
    /// always ends up holding a usable frame.
    fn build_frame(&mut self, ctx: &RenderContext, buffer: &mut OffscreenBuffer);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.config.background_color()
    }
}
