//! The knob painter.

use std::f64::consts::{FRAC_PI_4, PI};

use kurbo::{Arc, Ellipse, Line, Point, Rect, Stroke, Vec2};
use knobkit_core::color::{FOCUS_RING_TINT, GRADIENT_TINT, darken, lighten};
use knobkit_core::geometry::division_label;
use knobkit_core::{PointerStyle, Sweep, point_on_circle};

use crate::frame::{DrawCommand, OffscreenBuffer};
use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};

/// Dash pattern of the focus ring.
const FOCUS_DASH: [f64; 2] = [2.0, 2.0];

/// Paints face, border, focus ring, pointer and graduations.
///
/// Paint order is fixed; later steps draw over earlier ones.
#[derive(Debug, Default, Clone, Copy)]
pub struct KnobRenderer;

impl KnobRenderer {
    pub fn new() -> Self {
        Self
    }

    fn draw_pointer(&self, ctx: &RenderContext, buffer: &mut OffscreenBuffer) -> RenderResult<()> {
        let layout = ctx.layout;
        let angle = Sweep::from_config(ctx.config).angle_for(ctx.value);
        if !angle.is_finite() {
            return Err(RendererError::RenderFailed(format!(
                "pointer angle for value {} is not finite",
                ctx.value
            )));
        }
        let radius = layout.radius;
        let center = layout.center;

        match ctx.config.pointer_style() {
            PointerStyle::Line => {
                let half = (radius / 2.0).trunc();
                let width = (half / 4.0).trunc().max(1.0);
                let (from, to) = if ctx.config.draw_div_inside() {
                    (radius / 10.0, radius - self.maximum_extent(ctx))
                } else {
                    (radius - layout.draw_ratio * 10.0 - half, radius - 4.0)
                };
                buffer.push(DrawCommand::Line {
                    line: Line::new(
                        point_on_circle(center, from, angle),
                        point_on_circle(center, to, angle),
                    ),
                    width,
                    color: ctx.config.pointer_color(),
                });
            }
            PointerStyle::Circle => {
                let diameter = layout.label_extent;
                if diameter <= 0.0 {
                    return Err(RendererError::RenderFailed(
                        "pointer circle has no size".into(),
                    ));
                }
                // Pull the dot 2px in so it stays inside the rim
                let distance = radius - (diameter / 2.0).trunc() - 2.0;
                let dot = point_on_circle(center, distance, angle);
                let bounds = Rect::from_center_size(dot, (diameter, diameter));

                let rim = lighten(ctx.config.pointer_color(), GRADIENT_TINT);
                let radii = Vec2::new(diameter / 2.0, diameter / 2.0);
                for (start_angle, color) in [
                    (3.0 * FRAC_PI_4, darken(rim, GRADIENT_TINT)),
                    (-FRAC_PI_4, lighten(rim, GRADIENT_TINT)),
                ] {
                    buffer.push(DrawCommand::StrokeArc {
                        arc: Arc {
                            center: dot,
                            radii,
                            start_angle,
                            sweep_angle: PI,
                            x_rotation: 0.0,
                        },
                        width: 1.0,
                        color,
                    });
                }
                buffer.push(DrawCommand::FillEllipse {
                    ellipse: Ellipse::from_rect(bounds),
                    brush: ctx.brushes.pointer.clone(),
                });
            }
        }
        Ok(())
    }

    /// Larger of the maximum label's width and height, whole pixels. The
    /// inside line pointer stops short of it rather than the widest label.
    fn maximum_extent(&self, ctx: &RenderContext) -> f64 {
        let label = ctx.config.maximum().to_string();
        match ctx.measure.measure(&label, &ctx.layout.font) {
            Ok(size) => size.width.trunc().max(size.height.trunc()),
            Err(e) => {
                log::warn!("Failed to measure maximum label {label}: {e}");
                ctx.layout.label_extent
            }
        }
    }

    fn draw_divisions(&self, ctx: &RenderContext, buffer: &mut OffscreenBuffer) {
        let config = ctx.config;
        if !config.show_large_scale() {
            return;
        }
        let layout = ctx.layout;
        let divisions = config.scale_divisions();
        if divisions < 2 {
            log::warn!("Skipping graduations: {divisions} divisions");
            return;
        }
        let sub = config.scale_sub_divisions().max(0);
        let major_step = config.delta_angle() / f64::from(divisions - 1);
        let minor_step = major_step / f64::from(sub + 1);
        let tick = 2.0 * layout.draw_ratio;

        for n in 0..divisions {
            let angle = config.start_angle() + f64::from(n) * major_step;
            buffer.push(self.tick(ctx, angle, tick, 2.0 * layout.draw_ratio));

            let label = division_label(config.minimum(), config.maximum(), divisions, n);
            if let Err(e) = self.draw_label(ctx, buffer, &label.to_string(), angle, tick) {
                log::warn!("Failed to draw scale label {label}: {e}");
            }

            if n == divisions - 1 {
                break;
            }
            if config.show_small_scale() {
                for j in 1..=sub {
                    let minor = angle + f64::from(j) * minor_step;
                    buffer.push(self.tick(ctx, minor, tick / 2.0, layout.draw_ratio));
                }
            }
        }
    }

    /// Graduation running outwards from the rim.
    fn tick(&self, ctx: &RenderContext, angle: f64, length: f64, width: f64) -> DrawCommand {
        let center = ctx.layout.center;
        let radius = ctx.layout.radius;
        DrawCommand::Line {
            line: Line::new(
                point_on_circle(center, radius, angle),
                point_on_circle(center, radius + length, angle),
            ),
            width,
            color: ctx.config.scale_color(),
        }
    }

    fn draw_label(
        &self,
        ctx: &RenderContext,
        buffer: &mut OffscreenBuffer,
        text: &str,
        angle: f64,
        tick: f64,
    ) -> RenderResult<()> {
        let layout = ctx.layout;
        let size = ctx.measure.measure(text, &layout.font)?;
        let half_extent = (layout.label_extent / 2.0).trunc();
        let distance = if ctx.config.draw_div_inside() {
            layout.radius - half_extent - 2.0
        } else {
            layout.radius + tick + half_extent
        };
        let anchor = point_on_circle(layout.center, distance, angle);
        buffer.push(DrawCommand::Text {
            text: text.to_owned(),
            origin: Point::new(anchor.x - size.width * 0.5, anchor.y - size.height * 0.5),
            font: layout.font.clone(),
            color: ctx.config.scale_color(),
        });
        Ok(())
    }
}

impl Renderer for KnobRenderer {
    fn build_frame(&mut self, ctx: &RenderContext, buffer: &mut OffscreenBuffer) {
        let background = self.background_color(ctx);
        buffer.clear(background);

        let face = Ellipse::from_rect(ctx.layout.face);
        buffer.push(DrawCommand::FillEllipse {
            ellipse: face,
            brush: ctx.brushes.face.clone(),
        });
        buffer.push(DrawCommand::StrokeEllipse {
            ellipse: face,
            stroke: Stroke::new(1.0),
            color: background,
        });
        if ctx.focused {
            buffer.push(DrawCommand::StrokeEllipse {
                ellipse: face,
                stroke: Stroke::new(1.0).with_dashes(0.0, FOCUS_DASH),
                color: darken(background, FOCUS_RING_TINT),
            });
        }

        if let Err(e) = self.draw_pointer(ctx, buffer) {
            log::warn!("Failed to draw knob pointer: {e}");
        }
        self.draw_divisions(ctx, buffer);
    }
}
