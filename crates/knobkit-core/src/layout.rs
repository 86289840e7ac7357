//! Layout/dimension calculation for the knob face.
//!
//! Computed at construction, on resize and after any configuration change.
//! Everything that depends on widget size, label extent or colours lives
//! here so it is never read stale.

use kurbo::{Point, Rect, Size};
use peniko::{Brush, Gradient};

use crate::color::{GRADIENT_TINT, darken, lighten};
use crate::config::KnobConfiguration;
use crate::text::{ApproxTextMeasure, ScaleFont, TextMeasure};

/// Widget width at which the draw ratio is 1.
pub const REFERENCE_SIZE: f64 = 150.0;

/// Space reserved for graduation ticks, in draw-ratio units.
pub const TICK_RESERVE: f64 = 4.0;

/// Resolved geometry of one knob at one size.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Widget bounds (always square).
    pub bounds: Size,
    /// Size normalisation factor, `width / 150`.
    pub draw_ratio: f64,
    /// Rectangle of the knob face.
    pub face: Rect,
    /// Centre of the face.
    pub center: Point,
    /// Radius of the face.
    pub radius: f64,
    /// Font the labels are drawn with.
    pub font: ScaleFont,
    /// Larger of the widest label's width and height, whole pixels.
    pub label_extent: f64,
    /// Labels were measured by the supplied measurer, not the fallback.
    pub measured: bool,
}

impl Layout {
    /// Compute the layout for `config` at `bounds`.
    ///
    /// Measurement failures are logged and fall back to
    /// [`ApproxTextMeasure`] so a layout is always produced.
    pub fn compute(config: &KnobConfiguration, bounds: Size, measure: &dyn TextMeasure) -> Self {
        let width = bounds.width.max(0.0);
        let height = bounds.height.max(0.0);
        let draw_ratio = if width == 0.0 {
            1.0
        } else {
            width / REFERENCE_SIZE
        };

        let font = config
            .scale_font()
            .effective(config.scale_font_auto_size(), draw_ratio);
        let label = config.widest_label();
        let (label_size, measured) = match measure.measure(&label, &font) {
            Ok(size) => (size, true),
            Err(e) => {
                log::warn!("Failed to measure scale label {label:?}: {e}");
                let size = ApproxTextMeasure::default()
                    .measure(&label, &font)
                    .unwrap_or(Size::ZERO);
                (size, false)
            }
        };
        let label_extent = label_size.width.trunc().max(label_size.height.trunc());

        let face = if config.show_large_scale() {
            let tick = TICK_RESERVE * draw_ratio;
            let (inset, side) = if config.draw_div_inside() {
                (tick, width - 2.0 * tick)
            } else {
                (label_extent, width - 2.0 * label_extent - tick)
            };
            let inset = inset.trunc();
            let side = if side.trunc() <= 0.0 { 1.0 } else { side.trunc() };
            Rect::from_origin_size((inset, inset), (side, side))
        } else {
            Rect::new(0.0, 0.0, width, height)
        };

        let center = Point::new(
            face.x0 + (face.width() / 2.0).floor(),
            face.y0 + (face.height() / 2.0).floor(),
        );
        let radius = (face.width() / 2.0).floor();

        log::debug!(
            "Knob layout: bounds {}x{}, ratio {draw_ratio:.3}, face {face:?}",
            width,
            height
        );

        Self {
            bounds: Size::new(width, height),
            draw_ratio,
            face,
            center,
            radius,
            font,
            label_extent,
            measured,
        }
    }

    /// Whether `point` hits the face rectangle.
    pub fn face_contains(&self, point: Point) -> bool {
        self.face.contains(point)
    }

    /// Whether `point` lies within the widget bounds.
    pub fn bounds_contain(&self, point: Point) -> bool {
        Rect::from_origin_size(Point::ZERO, self.bounds).contains(point)
    }
}

/// Diagonal gradients for the knob face and pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct KnobBrushes {
    pub face: Brush,
    pub pointer: Brush,
}

impl KnobBrushes {
    /// Build both gradients across `face`, top-left light to bottom-right dark.
    pub fn new(config: &KnobConfiguration, face: Rect) -> Self {
        let diagonal = |color| {
            Brush::Gradient(
                Gradient::new_linear(Point::new(face.x0, face.y0), Point::new(face.x1, face.y1))
                    .with_stops([lighten(color, GRADIENT_TINT), darken(color, GRADIENT_TINT)]),
            )
        };
        Self {
            face: diagonal(config.knob_color()),
            pointer: diagonal(config.pointer_color()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MeasureError;
    use crate::value::ValueModel;

    struct FailingMeasure;

    impl TextMeasure for FailingMeasure {
        fn measure(&self, _text: &str, font: &ScaleFont) -> Result<Size, MeasureError> {
            Err(MeasureError::FontUnavailable(font.family.clone()))
        }
    }

    fn square(side: f64) -> Size {
        Size::new(side, side)
    }

    #[test]
    fn test_draw_ratio() {
        let config = KnobConfiguration::default();
        let m = ApproxTextMeasure::default();
        assert!((Layout::compute(&config, square(300.0), &m).draw_ratio - 2.0).abs() < 1e-9);
        assert_eq!(Layout::compute(&config, square(0.0), &m).draw_ratio, 1.0);
    }

    #[test]
    fn test_face_outside_labels() {
        // "100" at auto size 6px: 3 * 3.6 = 10.8 wide, 7.2 high -> extent 10
        let config = KnobConfiguration::default();
        let layout = Layout::compute(&config, square(150.0), &ApproxTextMeasure::default());
        assert_eq!(layout.label_extent, 10.0);
        assert_eq!(layout.face, Rect::new(10.0, 10.0, 136.0, 136.0));
        assert_eq!(layout.center, Point::new(73.0, 73.0));
        assert_eq!(layout.radius, 63.0);
    }

    #[test]
    fn test_face_inside_labels() {
        let mut model = ValueModel::new();
        model.set_draw_div_inside(true);
        let layout = Layout::compute(model.config(), square(150.0), &ApproxTextMeasure::default());
        assert_eq!(layout.face, Rect::new(4.0, 4.0, 146.0, 146.0));
        assert_eq!(layout.radius, 71.0);
    }

    #[test]
    fn test_face_without_scale_fills_bounds() {
        let mut model = ValueModel::new();
        model.set_show_large_scale(false);
        let layout = Layout::compute(model.config(), square(120.0), &ApproxTextMeasure::default());
        assert_eq!(layout.face, Rect::new(0.0, 0.0, 120.0, 120.0));
        assert_eq!(layout.center, Point::new(60.0, 60.0));
        assert_eq!(layout.radius, 60.0);
    }

    #[test]
    fn test_tiny_face_never_collapses() {
        let config = KnobConfiguration::default();
        let layout = Layout::compute(&config, square(8.0), &ApproxTextMeasure::default());
        assert_eq!(layout.face.width(), 1.0);
        assert_eq!(layout.face.height(), 1.0);
    }

    #[test]
    fn test_fixed_font_is_used() {
        let mut model = ValueModel::new();
        model.set_scale_font(ScaleFont::new("Roboto", 20.0));
        model.set_scale_font_auto_size(false);
        let layout = Layout::compute(model.config(), square(300.0), &ApproxTextMeasure::default());
        assert_eq!(layout.font, ScaleFont::new("Roboto", 20.0));
        // 3 * 12 = 36 wide
        assert_eq!(layout.label_extent, 36.0);
    }

    #[test]
    fn test_failed_measure_falls_back() {
        let config = KnobConfiguration::default();
        let failing = Layout::compute(&config, square(150.0), &FailingMeasure);
        let approx = Layout::compute(&config, square(150.0), &ApproxTextMeasure::default());
        assert!(!failing.measured);
        assert!(approx.measured);
        assert_eq!(failing.face, approx.face);
        assert_eq!(failing.label_extent, approx.label_extent);
    }

    #[test]
    fn test_bounds_contain() {
        let config = KnobConfiguration::default();
        let layout = Layout::compute(&config, square(150.0), &ApproxTextMeasure::default());
        assert!(layout.bounds_contain(Point::new(1.0, 1.0)));
        assert!(layout.bounds_contain(Point::new(149.0, 0.0)));
        assert!(!layout.bounds_contain(Point::new(-1.0, 20.0)));
        assert!(!layout.bounds_contain(Point::new(900.0, 75.0)));
    }

    #[test]
    fn test_brushes_are_gradients() {
        let config = KnobConfiguration::default();
        let brushes = KnobBrushes::new(&config, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(matches!(brushes.face, Brush::Gradient(_)));
        assert!(matches!(brushes.pointer, Brush::Gradient(_)));
        assert_ne!(brushes.face, brushes.pointer);
    }
}
