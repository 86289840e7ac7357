//! knobkit Widgets
//!
//! The [`Knob`] widget facade and an egui host adapter.
//!
//! - **Knob**: owns model, interaction state, layout, offscreen buffer,
//!   brushes and observers for one dial
//! - **egui host**: `KnobWidget` plus the surface and text measurement it
//!   paints and lays out with

pub mod egui_host;
pub mod knob;

pub use egui_host::{EguiSurface, EguiTextMeasure, KnobWidget};
pub use knob::{DEFAULT_SIZE, Knob};
