//! knobkit Render Library
//!
//! Paints knob frames into an offscreen display list and blits them onto a
//! visible surface. A Vello backend is available behind `vello-renderer`.

mod frame;
mod knob_renderer;
mod renderer;
mod surface;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use frame::{DrawCommand, OffscreenBuffer};
pub use knob_renderer::KnobRenderer;
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use surface::{RecordingSurface, Surface};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{ParleyTextMeasure, VelloSurface};
