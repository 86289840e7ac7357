//! Pointer/keyboard/wheel/focus state machine.
//!
//! ```text
//! Idle --down in face--> Focused --down in face--> Rotating
//!                          |                          |
//!                          +--up in face (later)------+
//! any --focus lost--> Idle
//! ```
//!
//! The press that focuses the knob never moves the value; a second, distinct
//! press is needed before pointer movement commits.

use kurbo::Point;

use crate::geometry::Sweep;
use crate::input::{FocusEvent, KeyEvent, MouseButton, PointerEvent, WHEEL_DELTA};
use crate::layout::Layout;
use crate::value::ValueModel;

/// Interaction state of a knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionPhase {
    /// Not focused.
    #[default]
    Idle,
    /// Focused; keys work, pointer movement does not commit.
    Focused,
    /// Focused and armed; pointer drags and the wheel commit values.
    Rotating,
}

impl InteractionPhase {
    pub fn is_focused(self) -> bool {
        matches!(self, Self::Focused | Self::Rotating)
    }

    pub fn is_rotating(self) -> bool {
        matches!(self, Self::Rotating)
    }
}

/// What the host should do with an event after the knob saw it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventResponse {
    /// The knob consumed the event; don't bubble it to the parent.
    pub handled: bool,
    /// The knob wants keyboard focus.
    pub request_focus: bool,
}

impl EventResponse {
    fn handled() -> Self {
        Self {
            handled: true,
            request_focus: false,
        }
    }
}

/// Tracks the interaction phase and primary button state of one knob.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    phase: InteractionPhase,
    primary_pressed: bool,
    /// The press that took the knob out of Idle has not been released yet.
    focusing_press: bool,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> InteractionPhase {
        self.phase
    }

    pub fn is_focused(&self) -> bool {
        self.phase.is_focused()
    }

    pub fn is_rotating(&self) -> bool {
        self.phase.is_rotating()
    }

    fn set_phase(&mut self, phase: InteractionPhase, model: &mut ValueModel) {
        if self.phase != phase {
            log::trace!("Knob interaction {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            model.request_redraw();
        }
    }

    fn value_at(model: &ValueModel, layout: &Layout, position: Point) -> i32 {
        Sweep::from_config(model.config()).value_at(position, layout.center)
    }

    /// Process a pointer event in widget-local coordinates.
    pub fn handle_pointer_event(
        &mut self,
        event: &PointerEvent,
        model: &mut ValueModel,
        layout: &Layout,
    ) -> EventResponse {
        match *event {
            PointerEvent::Down { position, button } => {
                // Presses that start elsewhere belong to another widget
                if !layout.bounds_contain(position) {
                    return EventResponse::default();
                }
                if button == MouseButton::Left {
                    self.primary_pressed = true;
                }
                if !layout.face_contains(position) {
                    return EventResponse::default();
                }
                if self.phase.is_focused() {
                    self.set_phase(InteractionPhase::Rotating, model);
                    EventResponse::handled()
                } else {
                    self.focusing_press = true;
                    self.set_phase(InteractionPhase::Focused, model);
                    EventResponse {
                        handled: true,
                        request_focus: true,
                    }
                }
            }
            PointerEvent::Up { position, button } => {
                if button == MouseButton::Left {
                    self.primary_pressed = false;
                }
                let focusing = std::mem::take(&mut self.focusing_press);
                if !layout.face_contains(position) {
                    return EventResponse::default();
                }
                match self.phase {
                    InteractionPhase::Rotating => {
                        model.set_value(Self::value_at(model, layout, position));
                        EventResponse::handled()
                    }
                    InteractionPhase::Focused if !focusing => {
                        self.set_phase(InteractionPhase::Rotating, model);
                        EventResponse::handled()
                    }
                    InteractionPhase::Focused => EventResponse::handled(),
                    InteractionPhase::Idle => EventResponse::default(),
                }
            }
            PointerEvent::Move { position } => {
                if self.primary_pressed && self.phase.is_rotating() {
                    model.set_value(Self::value_at(model, layout, position));
                    EventResponse::handled()
                } else {
                    EventResponse::default()
                }
            }
            PointerEvent::Scroll { position, delta } => {
                if !self.phase.is_rotating() || !layout.face_contains(position) {
                    return EventResponse::default();
                }
                let config = model.config();
                let partitions = i64::from(config.mouse_wheel_bar_partitions());
                let step = i64::from(delta / WHEEL_DELTA) * config.range() / partitions;
                model.set_proper_value(i64::from(model.value()) + step);
                EventResponse::handled()
            }
        }
    }

    /// Process a key event. Arrow keys step the value by one while focused.
    pub fn handle_key_event(&mut self, event: &KeyEvent, model: &mut ValueModel) -> EventResponse {
        let KeyEvent::Pressed(key) = event else {
            return EventResponse::default();
        };
        if !self.phase.is_focused() || !key.is_arrow() {
            return EventResponse::default();
        }
        let value = model.value();
        if key.is_increment() && value < model.config().maximum() {
            model.set_value(value + 1);
        } else if key.is_decrement() && value > model.config().minimum() {
            model.set_value(value - 1);
        }
        model.request_redraw();
        EventResponse::handled()
    }

    /// Process a focus lifecycle event.
    pub fn handle_focus_event(&mut self, event: FocusEvent, model: &mut ValueModel) {
        match event {
            FocusEvent::Lost => {
                self.focusing_press = false;
                self.set_phase(InteractionPhase::Idle, model);
                // The focus ring has to go even if the phase looked idle already
                model.request_redraw();
            }
        }
    }
}
