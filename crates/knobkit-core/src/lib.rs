//! knobkit Core Library
//!
//! Toolkit-agnostic model for a rotary dial: the bounded value and its
//! configuration, angle/value geometry, face layout and the pointer/keyboard
//! interaction state machine.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod layout;
pub mod notify;
pub mod text;
pub mod value;

pub use config::{KnobConfiguration, PointerStyle};
pub use error::{KnobError, KnobResult};
pub use geometry::{Sweep, angle_from_value, point_on_circle, value_from_point};
pub use input::{FocusEvent, Key, KeyEvent, MouseButton, PointerEvent};
pub use interaction::{EventResponse, Interaction, InteractionPhase};
pub use layout::{KnobBrushes, Layout, REFERENCE_SIZE};
pub use notify::{Observers, SubscriptionId};
pub use text::{ApproxTextMeasure, MeasureError, ScaleFont, TextMeasure};
pub use value::{Invalidation, KnobState, ValueModel};
