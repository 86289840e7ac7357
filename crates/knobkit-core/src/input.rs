//! Input event types delivered by the host.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Wheel delta reported for one detent of a standard mouse wheel.
pub const WHEEL_DELTA: i32 = 120;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in widget-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// Wheel rotation; `delta` is in [`WHEEL_DELTA`] units per detent,
    /// positive away from the user.
    Scroll {
        position: Point,
        delta: i32,
    },
}

/// Keys the knob reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Any other key, by name.
    Other(String),
}

impl Key {
    /// Map a key name as reported by most toolkits (`"ArrowUp"`, `"Up"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            other => Key::Other(other.to_string()),
        }
    }

    /// Arrow keys belong to the knob, not to focus navigation.
    pub fn is_arrow(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight
        )
    }

    /// Up and right turn the knob clockwise.
    pub fn is_increment(&self) -> bool {
        matches!(self, Key::ArrowUp | Key::ArrowRight)
    }

    /// Down and left turn the knob counter-clockwise.
    pub fn is_decrement(&self) -> bool {
        matches!(self, Key::ArrowDown | Key::ArrowLeft)
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

/// Focus lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusEvent {
    /// The host moved keyboard focus elsewhere, for any reason.
    Lost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_name() {
        assert_eq!(Key::from_name("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::from_name("Left"), Key::ArrowLeft);
        assert_eq!(Key::from_name("a"), Key::Other("a".to_string()));
    }

    #[test]
    fn test_key_classes() {
        assert!(Key::ArrowUp.is_increment());
        assert!(Key::ArrowRight.is_increment());
        assert!(Key::ArrowDown.is_decrement());
        assert!(Key::ArrowLeft.is_decrement());
        assert!(Key::ArrowLeft.is_arrow());
        assert!(!Key::Other("Tab".into()).is_arrow());
    }

    #[test]
    fn test_pointer_event_serde() {
        let event = PointerEvent::Scroll {
            position: Point::new(10.0, 20.0),
            delta: -WHEEL_DELTA,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
