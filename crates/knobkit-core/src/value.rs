//! Value model: the bounded value and the validated configuration surface.
//!
//! Setters only store. Side effects (relayout, redraw, change notification)
//! are recorded as a pending [`Invalidation`] which the owning widget drains
//! after each mutation.

use peniko::Color;

use crate::config::{
    KnobConfiguration, MAX_END_ANGLE, MIN_START_ANGLE, PointerStyle, tick_spacing_is_positive,
};
use crate::error::{KnobError, KnobResult};
use crate::text::ScaleFont;

/// Side effects accumulated since the last drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Invalidation {
    /// Face geometry, brushes or the offscreen buffer are stale.
    pub relayout: bool,
    /// The visible frame is stale.
    pub redraw: bool,
    /// Number of accepted value writes, one notification each.
    pub value_changes: u32,
}

impl Invalidation {
    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combine two sets of pending effects.
    pub fn merge(self, other: Self) -> Self {
        Self {
            relayout: self.relayout || other.relayout,
            redraw: self.redraw || other.redraw,
            value_changes: self.value_changes.saturating_add(other.value_changes),
        }
    }
}

/// Snapshot of the dynamic knob state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnobState {
    /// Current value, normally within `[minimum, maximum]`.
    pub value: i32,
    /// Whether the knob holds focus (focus ring shown).
    pub focused: bool,
    /// Whether pointer movement commits values. Implies `focused`.
    pub rotating: bool,
}

/// Owns the configuration and current value; sole source of truth for what
/// the knob points at.
#[derive(Debug, Clone, Default)]
pub struct ValueModel {
    config: KnobConfiguration,
    value: i32,
    pending: Invalidation,
}

impl ValueModel {
    /// Create a model with default configuration and value 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model from an existing configuration.
    pub fn with_config(config: KnobConfiguration) -> Self {
        Self {
            value: config.minimum,
            config,
            pending: Invalidation::default(),
        }
    }

    pub fn config(&self) -> &KnobConfiguration {
        &self.config
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// Pending side effects, without clearing them.
    pub fn pending(&self) -> Invalidation {
        self.pending
    }

    /// Drain pending side effects.
    pub fn take_pending(&mut self) -> Invalidation {
        std::mem::take(&mut self.pending)
    }

    /// Request a redraw without any configuration change.
    pub fn request_redraw(&mut self) {
        self.pending.redraw = true;
    }

    fn touch(&mut self) {
        self.pending.relayout = true;
        self.pending.redraw = true;
    }

    // --- value -----------------------------------------------------------

    /// Set the value if it lies in `[minimum, maximum]`.
    ///
    /// Out-of-range input is ignored: no state change, no notification.
    /// This path never clamps.
    pub fn set_value(&mut self, value: i32) {
        if value < self.config.minimum || value > self.config.maximum {
            log::trace!("Rejected knob value {value}");
            return;
        }
        self.value = value;
        self.pending.redraw = true;
        self.pending.value_changes = self.pending.value_changes.saturating_add(1);
    }

    /// Clamp into `[minimum, maximum]`, then set. Always accepted unless the
    /// range itself is inverted.
    pub fn set_proper_value(&mut self, value: i64) {
        let min = i64::from(self.config.minimum);
        let max = i64::from(self.config.maximum);
        let clamped = if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        };
        // clamped lies between two i32 bounds
        self.set_value(clamped as i32);
    }

    // --- range -----------------------------------------------------------

    /// Set the minimum. Accepted unconditionally, without checking the
    /// maximum or the current value.
    pub fn set_minimum(&mut self, minimum: i32) {
        self.config.minimum = minimum;
        self.touch();
    }

    /// Set the maximum if it exceeds the current minimum.
    ///
    /// Hides the small scale when the existing subdivision pairing no longer
    /// yields a positive tick spacing over the new range.
    pub fn set_maximum(&mut self, maximum: i32) {
        if maximum <= self.config.minimum {
            return;
        }
        self.config.maximum = maximum;
        let divisions = self.config.scale_divisions;
        let sub_divisions = self.config.scale_sub_divisions;
        if sub_divisions > 0
            && divisions > 0
            && !tick_spacing_is_positive(self.config.range(), divisions, sub_divisions)
        {
            self.config.show_small_scale = false;
        }
        self.touch();
    }

    pub fn set_large_change(&mut self, large_change: i32) {
        self.config.large_change = large_change;
        self.touch();
    }

    pub fn set_small_change(&mut self, small_change: i32) {
        self.config.small_change = small_change;
        self.touch();
    }

    // --- sweep -----------------------------------------------------------

    /// Accepted within `[90, end_angle)`.
    pub fn set_start_angle(&mut self, degrees: f64) {
        if degrees >= MIN_START_ANGLE && degrees < self.config.end_angle {
            self.config.start_angle = degrees;
            self.touch();
        }
    }

    /// Accepted within `(start_angle, 450]`.
    pub fn set_end_angle(&mut self, degrees: f64) {
        if degrees <= MAX_END_ANGLE && degrees > self.config.start_angle {
            self.config.end_angle = degrees;
            self.touch();
        }
    }

    // --- scale -----------------------------------------------------------

    /// Accepted when more than one division is requested.
    pub fn set_scale_divisions(&mut self, divisions: i32) {
        if divisions > 1 {
            self.config.scale_divisions = divisions;
            self.touch();
        }
    }

    /// Accepted only when the pairing with the current divisions leaves a
    /// positive tick spacing over the current range.
    pub fn set_scale_sub_divisions(&mut self, sub_divisions: i32) {
        if tick_spacing_is_positive(
            self.config.range(),
            self.config.scale_divisions,
            sub_divisions,
        ) {
            self.config.scale_sub_divisions = sub_divisions;
            self.touch();
        }
    }

    /// Showing is subject to the same spacing rule as the subdivisions;
    /// hiding is always accepted.
    pub fn set_show_small_scale(&mut self, show: bool) {
        if show
            && !tick_spacing_is_positive(
                self.config.range(),
                self.config.scale_divisions,
                self.config.scale_sub_divisions,
            )
        {
            return;
        }
        self.config.show_small_scale = show;
        self.touch();
    }

    pub fn set_show_large_scale(&mut self, show: bool) {
        self.config.show_large_scale = show;
        self.touch();
    }

    pub fn set_draw_div_inside(&mut self, inside: bool) {
        self.config.draw_div_inside = inside;
        self.touch();
    }

    pub fn set_pointer_style(&mut self, style: PointerStyle) {
        self.config.pointer_style = style;
        self.touch();
    }

    pub fn set_scale_font(&mut self, font: ScaleFont) {
        self.config.scale_font = font;
        self.touch();
    }

    pub fn set_scale_font_auto_size(&mut self, auto_size: bool) {
        self.config.scale_font_auto_size = auto_size;
        self.touch();
    }

    /// Number of wheel steps that span the whole range.
    ///
    /// Unlike the other setters this one reports invalid input.
    pub fn set_mouse_wheel_bar_partitions(&mut self, partitions: i32) -> KnobResult<()> {
        if partitions <= 0 {
            return Err(KnobError::WheelPartitionsOutOfRange(partitions));
        }
        self.config.mouse_wheel_bar_partitions = partitions;
        self.touch();
        Ok(())
    }

    // --- colours ---------------------------------------------------------

    pub fn set_knob_color(&mut self, color: Color) {
        self.config.knob_color = color;
        self.touch();
    }

    pub fn set_pointer_color(&mut self, color: Color) {
        self.config.pointer_color = color;
        self.touch();
    }

    pub fn set_scale_color(&mut self, color: Color) {
        self.config.scale_color = color;
        self.touch();
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.config.background_color = color;
        self.touch();
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn proper_value_always_lands_in_range(
            min in -1000i32..1000,
            span in 1i32..5000,
            input in any::<i64>(),
        ) {
            let mut model = ValueModel::new();
            model.set_minimum(min);
            model.set_maximum(min + span);
            model.set_proper_value(input);
            prop_assert!(model.value() >= min && model.value() <= min + span);
        }

        #[test]
        fn set_value_never_clamps(input in any::<i32>()) {
            let mut model = ValueModel::new();
            model.set_value(50);
            model.take_pending();
            model.set_value(input);
            let pending = model.take_pending();
            if (0..=100).contains(&input) {
                prop_assert_eq!(model.value(), input);
                prop_assert_eq!(pending.value_changes, 1);
            } else {
                prop_assert_eq!(model.value(), 50);
                prop_assert_eq!(pending.value_changes, 0);
            }
        }
    }
}
