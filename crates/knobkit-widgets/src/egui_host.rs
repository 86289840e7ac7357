//! egui host adapter.
//!
//! [`KnobWidget`] feeds egui input into a [`Knob`] and blits its frames with
//! an [`egui::Painter`]. Coordinates are translated so the knob only ever
//! sees widget-local positions.

use std::f64::consts::TAU;

use egui::epaint::Mesh;
use egui::{
    Align2, Color32, Context, Event, EventFilter, FontFamily, FontId, Id, LayerId, MouseWheelUnit,
    Painter, Pos2, Response, Sense, Shape, Stroke, Ui, Vec2, Widget, vec2,
};
use kurbo::{Ellipse, Shape as _, Size};
use knobkit_core::{
    FocusEvent, Key, KeyEvent, MeasureError, MouseButton, PointerEvent, ScaleFont, TextMeasure,
    input::WHEEL_DELTA,
};
use knobkit_render::{DrawCommand, OffscreenBuffer, RenderResult, Surface};
use peniko::{Brush, Color};

use crate::knob::Knob;

/// Pixels egui reports per wheel line.
const PIXELS_PER_LINE: f32 = 20.0;

/// Segments used to approximate circles and arcs.
const CURVE_SEGMENTS: usize = 64;

/// Convert a peniko colour for egui.
pub fn to_color32(color: Color) -> Color32 {
    let c = color.to_rgba8();
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

/// Wheel notches (in multiples of [`WHEEL_DELTA`]) for an egui scroll.
pub fn wheel_delta(unit: MouseWheelUnit, delta: Vec2) -> i32 {
    let lines = match unit {
        MouseWheelUnit::Line => delta.y,
        MouseWheelUnit::Point => delta.y / PIXELS_PER_LINE,
        MouseWheelUnit::Page => delta.y * 3.0,
    };
    (lines * WHEEL_DELTA as f32).round() as i32
}

fn key_from_egui(key: egui::Key) -> Key {
    match key {
        egui::Key::ArrowUp => Key::ArrowUp,
        egui::Key::ArrowDown => Key::ArrowDown,
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::ArrowRight => Key::ArrowRight,
        other => Key::Other(other.name().to_owned()),
    }
}

fn button_from_egui(button: egui::PointerButton) -> MouseButton {
    match button {
        egui::PointerButton::Primary => MouseButton::Left,
        egui::PointerButton::Secondary => MouseButton::Right,
        _ => MouseButton::Middle,
    }
}

/// egui only knows the families it was configured with.
fn font_id(font: &ScaleFont) -> FontId {
    let family = match font.family.as_str() {
        "monospace" => FontFamily::Monospace,
        _ => FontFamily::Proportional,
    };
    FontId::new(font.size as f32, family)
}

/// Set once a [`KnobWidget`] has run inside a pass of the context.
fn fonts_ready_id() -> Id {
    Id::new("knobkit_fonts_ready")
}

/// Measures labels with egui's font system.
///
/// egui has no fonts until its first pass starts. Until then measuring
/// fails and layouts fall back to the approximate measurer; [`KnobWidget`]
/// lays the knob out again once it runs inside a pass.
pub struct EguiTextMeasure {
    painter: Painter,
}

impl EguiTextMeasure {
    pub fn new(ctx: &Context) -> Self {
        Self {
            painter: Painter::new(ctx.clone(), LayerId::background(), egui::Rect::EVERYTHING),
        }
    }

    fn fonts_ready(&self) -> bool {
        let ctx = self.painter.ctx();
        ctx.cumulative_pass_nr() > 0
            || ctx.data(|d| d.get_temp::<bool>(fonts_ready_id()).unwrap_or(false))
    }
}

impl TextMeasure for EguiTextMeasure {
    fn measure(&self, text: &str, font: &ScaleFont) -> Result<Size, MeasureError> {
        if !(font.size.is_finite() && font.size > 0.0) {
            return Err(MeasureError::InvalidSize(font.size));
        }
        if !self.fonts_ready() {
            return Err(MeasureError::Failed("egui fonts not loaded yet".into()));
        }
        let galley = self
            .painter
            .layout_no_wrap(text.to_owned(), font_id(font), Color32::PLACEHOLDER);
        let size = galley.size();
        Ok(Size::new(f64::from(size.x), f64::from(size.y)))
    }
}

/// Blits frames onto an egui painter at `origin`.
pub struct EguiSurface {
    painter: Painter,
    origin: Pos2,
}

impl EguiSurface {
    pub fn new(painter: Painter, origin: Pos2) -> Self {
        Self { painter, origin }
    }

    fn pos(&self, point: kurbo::Point) -> Pos2 {
        self.origin + vec2(point.x as f32, point.y as f32)
    }

    fn ellipse_points(&self, ellipse: &Ellipse) -> Vec<Pos2> {
        let center = ellipse.center();
        let radii = ellipse.radii();
        (0..=CURVE_SEGMENTS)
            .map(|i| {
                let t = TAU * i as f64 / CURVE_SEGMENTS as f64;
                self.pos(kurbo::Point::new(
                    center.x + radii.x * t.cos(),
                    center.y + radii.y * t.sin(),
                ))
            })
            .collect()
    }

    /// Fill an ellipse. Gradients are shaded along the bounding box diagonal
    /// with per-vertex colours.
    fn fill_ellipse(&self, ellipse: &Ellipse, brush: &Brush) {
        let (from, to) = match brush {
            Brush::Solid(color) => (*color, *color),
            Brush::Gradient(gradient) => {
                let stop = |s: Option<&peniko::ColorStop>| {
                    s.map(|s| s.color.to_alpha_color::<peniko::color::Srgb>())
                        .unwrap_or(Color::TRANSPARENT)
                };
                (stop(gradient.stops.first()), stop(gradient.stops.last()))
            }
            _ => {
                log::warn!("Unsupported brush for egui surface, filling grey");
                (Color::from_rgba8(128, 128, 128, 255), Color::from_rgba8(128, 128, 128, 255))
            }
        };

        let bounds = ellipse.bounding_box();
        let diagonal = kurbo::Vec2::new(bounds.width(), bounds.height());
        let length_sq = diagonal.hypot2();
        let shade = |p: kurbo::Point| {
            let t = if length_sq > 0.0 {
                ((p - bounds.origin()).dot(diagonal) / length_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            to_color32(mix(from, to, t))
        };

        let center = ellipse.center();
        let radii = ellipse.radii();
        let mut mesh = Mesh::default();
        mesh.colored_vertex(self.pos(center), shade(center));
        for i in 0..CURVE_SEGMENTS {
            let t = TAU * i as f64 / CURVE_SEGMENTS as f64;
            let p = kurbo::Point::new(center.x + radii.x * t.cos(), center.y + radii.y * t.sin());
            mesh.colored_vertex(self.pos(p), shade(p));
        }
        let n = CURVE_SEGMENTS as u32;
        for i in 0..n {
            mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
        }
        self.painter.add(Shape::mesh(mesh));
    }
}

fn mix(a: Color, b: Color, t: f64) -> Color {
    let (a, b) = (a.to_rgba8(), b.to_rgba8());
    let lerp = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    Color::from_rgba8(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b), lerp(a.a, b.a))
}

impl Surface for EguiSurface {
    fn blit(&mut self, frame: &OffscreenBuffer) -> RenderResult<()> {
        for command in frame.commands() {
            match command {
                DrawCommand::Clear(color) => {
                    let size = frame.size();
                    let rect = egui::Rect::from_min_size(
                        self.origin,
                        vec2(size.width as f32, size.height as f32),
                    );
                    self.painter.rect_filled(rect, 0.0, to_color32(*color));
                }
                DrawCommand::FillEllipse { ellipse, brush } => self.fill_ellipse(ellipse, brush),
                DrawCommand::StrokeEllipse {
                    ellipse,
                    stroke,
                    color,
                } => {
                    let egui_stroke = Stroke::new(stroke.width as f32, to_color32(*color));
                    let points = self.ellipse_points(ellipse);
                    if stroke.dash_pattern.is_empty() {
                        self.painter.add(Shape::line(points, egui_stroke));
                    } else {
                        let dash = stroke.dash_pattern[0] as f32;
                        let gap = stroke.dash_pattern.get(1).copied().unwrap_or(stroke.dash_pattern[0]);
                        self.painter.extend(Shape::dashed_line(
                            &points,
                            egui_stroke,
                            dash,
                            gap as f32,
                        ));
                    }
                }
                DrawCommand::Line { line, width, color } => {
                    self.painter.line_segment(
                        [self.pos(line.p0), self.pos(line.p1)],
                        Stroke::new(*width as f32, to_color32(*color)),
                    );
                }
                DrawCommand::StrokeArc { arc, width, color } => {
                    let points = (0..=CURVE_SEGMENTS / 2)
                        .map(|i| {
                            let t = arc.start_angle
                                + arc.sweep_angle * i as f64 / (CURVE_SEGMENTS / 2) as f64;
                            self.pos(kurbo::Point::new(
                                arc.center.x + arc.radii.x * t.cos(),
                                arc.center.y + arc.radii.y * t.sin(),
                            ))
                        })
                        .collect();
                    self.painter.add(Shape::line(
                        points,
                        Stroke::new(*width as f32, to_color32(*color)),
                    ));
                }
                DrawCommand::Text {
                    text,
                    origin,
                    font,
                    color,
                } => {
                    self.painter.text(
                        self.pos(*origin),
                        Align2::LEFT_TOP,
                        text,
                        font_id(font),
                        to_color32(*color),
                    );
                }
            }
        }
        Ok(())
    }
}

/// Shows a [`Knob`] inside an egui layout.
///
/// ```ignore
/// ui.add(KnobWidget::new(&mut self.red).size(120.0));
/// ```
pub struct KnobWidget<'a> {
    knob: &'a mut Knob,
    size: Option<f32>,
}

impl<'a> KnobWidget<'a> {
    pub fn new(knob: &'a mut Knob) -> Self {
        Self { knob, size: None }
    }

    /// Side length in points. Defaults to the knob's current size.
    pub fn size(mut self, side: f32) -> Self {
        self.size = Some(side);
        self
    }
}

impl Widget for KnobWidget<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let knob = self.knob;
        ui.ctx()
            .data_mut(|d| d.insert_temp(fonts_ready_id(), true));
        if knob.refresh_layout() {
            log::debug!("Knob laid out again with loaded fonts");
        }
        let side = self.size.unwrap_or(knob.size().width as f32);
        let (rect, mut response) = ui.allocate_exact_size(vec2(side, side), Sense::click_and_drag());
        if (knob.size().width - f64::from(side)).abs() > f64::EPSILON {
            knob.resize(Size::new(f64::from(side), f64::from(side)));
        }

        let before = knob.value();
        let origin = rect.min;
        let local = |pos: Pos2| kurbo::Point::new(f64::from(pos.x - origin.x), f64::from(pos.y - origin.y));

        if response.lost_focus() {
            knob.handle_focus_event(FocusEvent::Lost);
        }
        if response.has_focus() {
            ui.memory_mut(|m| {
                m.set_focus_lock_filter(
                    response.id,
                    EventFilter {
                        horizontal_arrows: true,
                        vertical_arrows: true,
                        ..Default::default()
                    },
                );
            });
        }

        let (events, hover) = ui.input(|i| (i.events.clone(), i.pointer.latest_pos()));
        let mut wants_focus = false;
        let mut wheel_handled = false;
        for event in &events {
            let pointer = match event {
                Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let position = local(*pos);
                    let button = button_from_egui(*button);
                    Some(if *pressed {
                        PointerEvent::Down { position, button }
                    } else {
                        PointerEvent::Up { position, button }
                    })
                }
                Event::PointerMoved(pos) => Some(PointerEvent::Move {
                    position: local(*pos),
                }),
                Event::MouseWheel { unit, delta, .. } => hover.map(|pos| PointerEvent::Scroll {
                    position: local(pos),
                    delta: wheel_delta(*unit, *delta),
                }),
                Event::Key { key, pressed, .. } if response.has_focus() => {
                    let key = key_from_egui(*key);
                    if knob.wants_key(&key) {
                        let event = if *pressed {
                            KeyEvent::Pressed(key)
                        } else {
                            KeyEvent::Released(key)
                        };
                        knob.handle_key_event(&event);
                    }
                    None
                }
                _ => None,
            };
            if let Some(pointer) = pointer {
                let result = knob.handle_pointer_event(&pointer);
                wants_focus |= result.request_focus;
                wheel_handled |= result.handled && matches!(pointer, PointerEvent::Scroll { .. });
            }
        }

        if wants_focus {
            response.request_focus();
        }
        if wheel_handled {
            // Keep the parent scroll area still
            ui.input_mut(|i| {
                i.smooth_scroll_delta = Vec2::ZERO;
                i.raw_scroll_delta = Vec2::ZERO;
            });
        }
        if knob.value() != before {
            response.mark_changed();
        }

        if ui.is_rect_visible(rect) {
            let mut surface = EguiSurface::new(ui.painter_at(rect), origin);
            knob.paint(&mut surface);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, RawInput};
    use knobkit_core::{InteractionPhase, Sweep};

    #[test]
    fn test_color_conversion() {
        let c = to_color32(Color::from_rgba8(106, 90, 205, 255));
        assert_eq!(c, Color32::from_rgb(106, 90, 205));
    }

    #[test]
    fn test_wheel_delta_units() {
        assert_eq!(wheel_delta(MouseWheelUnit::Line, vec2(0.0, 1.0)), 120);
        assert_eq!(wheel_delta(MouseWheelUnit::Line, vec2(0.0, -2.0)), -240);
        assert_eq!(wheel_delta(MouseWheelUnit::Point, vec2(0.0, 20.0)), 120);
        assert_eq!(wheel_delta(MouseWheelUnit::Page, vec2(0.0, 1.0)), 360);
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(key_from_egui(egui::Key::ArrowUp), Key::ArrowUp);
        assert!(!key_from_egui(egui::Key::Tab).is_arrow());
    }

    #[test]
    fn test_mix_endpoints() {
        let a = Color::from_rgba8(0, 0, 0, 255);
        let b = Color::from_rgba8(200, 100, 50, 255);
        assert_eq!(mix(a, b, 0.0).to_rgba8(), a.to_rgba8());
        assert_eq!(mix(a, b, 1.0).to_rgba8(), b.to_rgba8());
        assert_eq!(mix(a, b, 0.5).to_rgba8(), Color::from_rgba8(100, 50, 25, 255).to_rgba8());
    }

    #[test]
    fn test_unknown_family_falls_back_to_proportional() {
        let id = font_id(&ScaleFont::new("Microsoft Sans Serif", 8.25));
        assert_eq!(id.family, FontFamily::Proportional);
        assert_eq!(font_id(&ScaleFont::new("monospace", 9.0)).family, FontFamily::Monospace);
    }

    /// Run one egui frame showing `knob` and return where it was placed.
    fn run_frame(ctx: &Context, knob: &mut Knob, events: Vec<Event>) -> egui::Rect {
        let input = RawInput {
            screen_rect: Some(egui::Rect::from_min_size(Pos2::ZERO, vec2(1024.0, 1024.0))),
            events,
            ..Default::default()
        };
        let mut rect = egui::Rect::NOTHING;
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                rect = ui.add(KnobWidget::new(&mut *knob)).rect;
            });
        });
        rect
    }

    /// Screen position halfway out from the centre towards `value`.
    fn screen_point(knob: &Knob, rect: egui::Rect, value: i32) -> Pos2 {
        let layout = knob.layout();
        let p = Sweep::from_config(knob.config()).point_for(value, layout.center, layout.radius / 2.0);
        rect.min + vec2(p.x as f32, p.y as f32)
    }

    fn button(pos: Pos2, pressed: bool) -> Event {
        Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    fn click(pos: Pos2) -> Vec<Event> {
        vec![Event::PointerMoved(pos), button(pos, true), button(pos, false)]
    }

    /// A knob shown once and clicked twice at `value`, so it is rotating.
    fn rotating(ctx: &Context, value: i32) -> (Knob, egui::Rect) {
        let mut knob = Knob::new();
        let rect = run_frame(ctx, &mut knob, Vec::new());
        let p = screen_point(&knob, rect, value);
        run_frame(ctx, &mut knob, click(p));
        assert_eq!(knob.phase(), InteractionPhase::Focused);
        assert_eq!(knob.value(), 0);
        run_frame(ctx, &mut knob, click(p));
        assert_eq!(knob.phase(), InteractionPhase::Rotating);
        (knob, rect)
    }

    #[test]
    fn test_click_click_drag_in_egui() {
        let ctx = Context::default();
        let (mut knob, rect) = rotating(&ctx, 30);
        assert_eq!(knob.value(), 30);

        let start = screen_point(&knob, rect, 30);
        let end = screen_point(&knob, rect, 70);
        run_frame(&ctx, &mut knob, vec![button(start, true), Event::PointerMoved(end)]);
        assert_eq!(knob.value(), 70);
        run_frame(&ctx, &mut knob, vec![button(end, false)]);
        assert_eq!(knob.value(), 70);
        assert_eq!(knob.phase(), InteractionPhase::Rotating);
    }

    #[test]
    fn test_drag_started_elsewhere_leaves_value() {
        let ctx = Context::default();
        let (mut knob, rect) = rotating(&ctx, 50);

        let outside = Pos2::new(900.0, rect.center().y);
        let across = screen_point(&knob, rect, 80);
        run_frame(
            &ctx,
            &mut knob,
            vec![
                Event::PointerMoved(outside),
                button(outside, true),
                Event::PointerMoved(across),
            ],
        );
        let back = screen_point(&knob, rect, 20);
        run_frame(&ctx, &mut knob, vec![Event::PointerMoved(back)]);
        assert_eq!(knob.value(), 50);
        run_frame(&ctx, &mut knob, vec![button(outside, false)]);
        assert_eq!(knob.value(), 50);
    }

    #[test]
    fn test_escape_drops_focus() {
        let ctx = Context::default();
        let (mut knob, _) = rotating(&ctx, 50);
        let escape = Event::Key {
            key: egui::Key::Escape,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: Modifiers::NONE,
        };
        run_frame(&ctx, &mut knob, vec![escape]);
        assert_eq!(knob.phase(), InteractionPhase::Idle);
        assert_eq!(knob.value(), 50);
    }

    #[test]
    fn test_arrow_keys_reach_focused_knob() {
        let ctx = Context::default();
        let (mut knob, _) = rotating(&ctx, 50);
        let up = Event::Key {
            key: egui::Key::ArrowUp,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: Modifiers::NONE,
        };
        run_frame(&ctx, &mut knob, vec![up]);
        assert_eq!(knob.value(), 51);
    }

    #[test]
    fn test_wheel_steps_rotating_knob() {
        let ctx = Context::default();
        let (mut knob, rect) = rotating(&ctx, 50);
        let p = screen_point(&knob, rect, 50);
        let wheel = Event::MouseWheel {
            unit: MouseWheelUnit::Line,
            delta: vec2(0.0, 1.0),
            modifiers: Modifiers::NONE,
        };
        run_frame(&ctx, &mut knob, vec![Event::PointerMoved(p), wheel]);
        assert_eq!(knob.value(), 60);
    }

    #[test]
    fn test_wheel_ignored_until_rotating() {
        let ctx = Context::default();
        let mut knob = Knob::new();
        let rect = run_frame(&ctx, &mut knob, Vec::new());
        let p = screen_point(&knob, rect, 50);
        let wheel = Event::MouseWheel {
            unit: MouseWheelUnit::Line,
            delta: vec2(0.0, 1.0),
            modifiers: Modifiers::NONE,
        };
        run_frame(&ctx, &mut knob, vec![Event::PointerMoved(p), wheel]);
        assert_eq!(knob.value(), 0);
    }

    #[test]
    fn test_measure_before_first_frame_falls_back() {
        let ctx = Context::default();
        let measure = EguiTextMeasure::new(&ctx);
        let font = ScaleFont::new("sans-serif", 6.0);
        assert!(matches!(measure.measure("100", &font), Err(MeasureError::Failed(_))));

        let mut knob = Knob::with_measure(Box::new(EguiTextMeasure::new(&ctx)));
        assert!(!knob.layout().measured);
        run_frame(&ctx, &mut knob, Vec::new());
        assert!(knob.layout().measured);
        assert!(measure.measure("100", &font).is_ok());
    }
}
