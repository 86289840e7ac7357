//! Colour tinting helpers used to derive gradients and rim tones.

use peniko::Color;

/// Tint delta applied to the knob and pointer colours when building
/// their diagonal gradients.
pub const GRADIENT_TINT: u8 = 55;

/// Darkening applied to the background colour for the focus ring.
pub const FOCUS_RING_TINT: u8 = 40;

/// Default host background (window face grey).
pub const DEFAULT_BACKGROUND: Color = Color::from_rgba8(240, 240, 240, 255);

/// Default pointer colour (slate blue).
pub const SLATE_BLUE: Color = Color::from_rgba8(106, 90, 205, 255);

/// Lighten every channel by `delta`, saturating at 255. Alpha is kept.
pub fn lighten(color: Color, delta: u8) -> Color {
    let c = color.to_rgba8();
    Color::from_rgba8(
        c.r.saturating_add(delta),
        c.g.saturating_add(delta),
        c.b.saturating_add(delta),
        c.a,
    )
}

/// Darken every channel by `delta`, saturating at 0. Alpha is kept.
pub fn darken(color: Color, delta: u8) -> Color {
    let c = color.to_rgba8();
    Color::from_rgba8(
        c.r.saturating_sub(delta),
        c.g.saturating_sub(delta),
        c.b.saturating_sub(delta),
        c.a,
    )
}
