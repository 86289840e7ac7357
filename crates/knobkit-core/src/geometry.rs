//! Angle/value/point mapping.
//!
//! Angles are in degrees, measured clockwise from the positive x axis in
//! screen coordinates (y grows downwards).

use kurbo::Point;

use crate::config::KnobConfiguration;

/// Angle on the sweep that represents `value`.
///
/// A degenerate range (`maximum == minimum`) maps everything to the start.
pub fn angle_from_value(
    value: i32,
    start_angle: f64,
    end_angle: f64,
    minimum: i32,
    maximum: i32,
) -> f64 {
    let range = f64::from(maximum) - f64::from(minimum);
    if range == 0.0 {
        return start_angle;
    }
    start_angle + (end_angle - start_angle) * (f64::from(value) - f64::from(minimum)) / range
}

/// Polar to cartesian, screen convention.
pub fn point_on_circle(center: Point, radius: f64, angle_deg: f64) -> Point {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    Point::new(center.x + radius * cos, center.y + radius * sin)
}

/// Value under `point`, the inverse of [`angle_from_value`].
///
/// The arctangent only covers ±90°, so the left and right half planes are
/// resolved separately; a point exactly above or below the centre belongs to
/// the left branch. The result is rounded to the nearest step and clamped
/// into `[minimum, maximum]`.
pub fn value_from_point(
    point: Point,
    center: Point,
    start_angle: f64,
    delta_angle: f64,
    minimum: i32,
    maximum: i32,
) -> i32 {
    let angle = if point.x <= center.x {
        ((center.y - point.y) / (center.x - point.x)).atan().to_degrees() + (180.0 - start_angle)
    } else {
        ((point.y - center.y) / (point.x - center.x)).atan().to_degrees() + 360.0 - start_angle
    };

    let range = f64::from(maximum) - f64::from(minimum);
    // NaN (point on the centre) saturates to 0 and lands on the minimum
    let steps = (angle * range / delta_angle).round_ties_even() as i64;
    let v = i64::from(minimum).saturating_add(steps);
    if v > i64::from(maximum) {
        maximum
    } else if v < i64::from(minimum) {
        minimum
    } else {
        v as i32
    }
}

/// Label shown at major tick `index` of `divisions`.
///
/// Ticks are spread linearly over the range; halves round towards the
/// minimum so a 0..255 scale over 11 ticks reads 0, 25, 51, 76, ...
pub fn division_label(minimum: i32, maximum: i32, divisions: i32, index: i32) -> i64 {
    let steps = i64::from(divisions) - 1;
    if steps <= 0 {
        return i64::from(minimum);
    }
    let range = i64::from(maximum) - i64::from(minimum);
    let exact = (i64::from(index) * range) as f64 / steps as f64;
    i64::from(minimum) + (exact - 0.5).ceil() as i64
}

/// The sweep of a knob: angular span plus the value range spread over it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub start_angle: f64,
    pub end_angle: f64,
    pub minimum: i32,
    pub maximum: i32,
}

impl Sweep {
    /// Sweep of a configuration.
    pub fn from_config(config: &KnobConfiguration) -> Self {
        Self {
            start_angle: config.start_angle(),
            end_angle: config.end_angle(),
            minimum: config.minimum(),
            maximum: config.maximum(),
        }
    }

    pub fn delta_angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Angle of `value` on this sweep.
    pub fn angle_for(&self, value: i32) -> f64 {
        angle_from_value(value, self.start_angle, self.end_angle, self.minimum, self.maximum)
    }

    /// Point at `radius` from `center` in the direction of `value`.
    pub fn point_for(&self, value: i32, center: Point, radius: f64) -> Point {
        point_on_circle(center, radius, self.angle_for(value))
    }

    /// Value under `point` for a knob centred on `center`.
    pub fn value_at(&self, point: Point, center: Point) -> i32 {
        value_from_point(
            point,
            center,
            self.start_angle,
            self.delta_angle(),
            self.minimum,
            self.maximum,
        )
    }
}

impl From<&KnobConfiguration> for Sweep {
    fn from(config: &KnobConfiguration) -> Self {
        Self::from_config(config)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn value_round_trips_through_angle(value in 0i32..=100, radius in 5.0f64..500.0) {
            let sweep = Sweep::from_config(&KnobConfiguration::default());
            let c = Point::new(200.0, 200.0);
            let p = sweep.point_for(value, c, radius);
            prop_assert_eq!(sweep.value_at(p, c), value);
        }

        #[test]
        fn value_from_point_stays_in_range(x in -500.0f64..500.0, y in -500.0f64..500.0) {
            let v = value_from_point(Point::new(x, y), Point::ZERO, 135.0, 270.0, -20, 20);
            prop_assert!((-20..=20).contains(&v));
        }
    }
}
