//! Knob configuration fields and their defaults.
//!
//! Fields are only written through [`ValueModel`](crate::value::ValueModel),
//! which applies the per-field validation rules.

use peniko::Color;
use serde::{Deserialize, Serialize};

use crate::color::{DEFAULT_BACKGROUND, SLATE_BLUE};
use crate::text::ScaleFont;

/// Lowest accepted start angle (degrees, 90 = bottom).
pub const MIN_START_ANGLE: f64 = 90.0;
/// Highest accepted end angle (degrees, 450 = bottom again).
pub const MAX_END_ANGLE: f64 = 450.0;

/// Style of the pointer that marks the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerStyle {
    /// Small raised disc near the rim.
    #[default]
    Circle,
    /// Thick line along the radius.
    Line,
}

/// Every host-configurable field of a knob.
///
/// Angles are in degrees on screen (y-down): 90 is the bottom, 180 the left,
/// 270 the top, 360 the right and 450 the bottom again. The pair (90, 450)
/// sweeps a full circle, (180, 360) the upper half.
#[derive(Debug, Clone, PartialEq)]
pub struct KnobConfiguration {
    pub(crate) minimum: i32,
    pub(crate) maximum: i32,
    pub(crate) large_change: i32,
    pub(crate) small_change: i32,
    pub(crate) start_angle: f64,
    pub(crate) end_angle: f64,
    pub(crate) scale_divisions: i32,
    pub(crate) scale_sub_divisions: i32,
    pub(crate) show_large_scale: bool,
    pub(crate) show_small_scale: bool,
    pub(crate) draw_div_inside: bool,
    pub(crate) pointer_style: PointerStyle,
    pub(crate) scale_font: ScaleFont,
    pub(crate) scale_font_auto_size: bool,
    pub(crate) mouse_wheel_bar_partitions: i32,
    pub(crate) knob_color: Color,
    pub(crate) pointer_color: Color,
    pub(crate) scale_color: Color,
    pub(crate) background_color: Color,
}

impl Default for KnobConfiguration {
    fn default() -> Self {
        Self {
            minimum: 0,
            maximum: 100,
            large_change: 5,
            small_change: 1,
            start_angle: 135.0,
            end_angle: 405.0,
            scale_divisions: 11,
            scale_sub_divisions: 4,
            show_large_scale: true,
            show_small_scale: false,
            draw_div_inside: false,
            pointer_style: PointerStyle::Circle,
            scale_font: ScaleFont::default(),
            scale_font_auto_size: true,
            mouse_wheel_bar_partitions: 10,
            knob_color: Color::WHITE,
            pointer_color: SLATE_BLUE,
            scale_color: Color::BLACK,
            background_color: DEFAULT_BACKGROUND,
        }
    }
}

impl KnobConfiguration {
    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    /// Width of the value range. Computed in `i64` so extreme bounds
    /// cannot overflow.
    pub fn range(&self) -> i64 {
        i64::from(self.maximum) - i64::from(self.minimum)
    }

    pub fn large_change(&self) -> i32 {
        self.large_change
    }

    pub fn small_change(&self) -> i32 {
        self.small_change
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Sweep in degrees between start and end angle.
    pub fn delta_angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn scale_divisions(&self) -> i32 {
        self.scale_divisions
    }

    pub fn scale_sub_divisions(&self) -> i32 {
        self.scale_sub_divisions
    }

    pub fn show_large_scale(&self) -> bool {
        self.show_large_scale
    }

    pub fn show_small_scale(&self) -> bool {
        self.show_small_scale
    }

    pub fn draw_div_inside(&self) -> bool {
        self.draw_div_inside
    }

    pub fn pointer_style(&self) -> PointerStyle {
        self.pointer_style
    }

    pub fn scale_font(&self) -> &ScaleFont {
        &self.scale_font
    }

    pub fn scale_font_auto_size(&self) -> bool {
        self.scale_font_auto_size
    }

    pub fn mouse_wheel_bar_partitions(&self) -> i32 {
        self.mouse_wheel_bar_partitions
    }

    pub fn knob_color(&self) -> Color {
        self.knob_color
    }

    pub fn pointer_color(&self) -> Color {
        self.pointer_color
    }

    pub fn scale_color(&self) -> Color {
        self.scale_color
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    /// The longer of the minimum and maximum label strings.
    ///
    /// Used to reserve label space and to size the circle pointer. Ties go to
    /// the minimum, so `-5`/`10` picks `-5`.
    pub fn widest_label(&self) -> String {
        let max = self.maximum.to_string();
        let min = self.minimum.to_string();
        if max.len() > min.len() { max } else { min }
    }
}

/// Whether `sub_divisions` minor ticks per division over `range` leave a
/// strictly positive integer spacing.
pub fn tick_spacing_is_positive(range: i64, divisions: i32, sub_divisions: i32) -> bool {
    if divisions <= 0 || sub_divisions <= 0 {
        return false;
    }
    let ticks = i64::from(divisions) * i64::from(sub_divisions);
    range / ticks > 0
}
