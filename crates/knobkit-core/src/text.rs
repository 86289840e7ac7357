//! Text measurement seam for scale labels.
//!
//! Layout and rendering only need the extent of a label string; the host
//! toolkit supplies the actual measurement through [`TextMeasure`].

use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest font size used when the scale font is auto-sized.
pub const MIN_AUTO_FONT_SIZE: f64 = 6.0;

/// Text measurement errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    #[error("Font not available: {0}")]
    FontUnavailable(String),
    #[error("Invalid font size: {0}")]
    InvalidSize(f64),
    #[error("Measurement failed: {0}")]
    Failed(String),
}

/// Font used for the graduation labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleFont {
    /// Font family name.
    pub family: String,
    /// Font size in pixels.
    pub size: f64,
}

impl ScaleFont {
    /// Create a new scale font.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    /// Same family at a different size.
    pub fn with_size(&self, size: f64) -> Self {
        Self {
            family: self.family.clone(),
            size,
        }
    }

    /// The font actually used for labels.
    ///
    /// With auto-size enabled the family is kept and the size follows the
    /// draw ratio, never dropping below [`MIN_AUTO_FONT_SIZE`].
    pub fn effective(&self, auto_size: bool, draw_ratio: f64) -> Self {
        if auto_size {
            self.with_size((MIN_AUTO_FONT_SIZE * draw_ratio).max(MIN_AUTO_FONT_SIZE))
        } else {
            self.clone()
        }
    }
}

impl Default for ScaleFont {
    fn default() -> Self {
        Self::new("sans-serif", 8.25)
    }
}

/// Measures the rendered extent of a single line of text.
pub trait TextMeasure {
    /// Return the width and height `text` occupies when drawn with `font`.
    fn measure(&self, text: &str, font: &ScaleFont) -> Result<Size, MeasureError>;
}

/// Deterministic measurement for headless hosts.
///
/// Every glyph advances by a fixed fraction of the font size and the line
/// height is a fixed multiple of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxTextMeasure {
    /// Horizontal advance per character, as a fraction of the font size.
    pub advance: f64,
    /// Line height, as a multiple of the font size.
    pub line_height: f64,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn measure(&self, text: &str, font: &ScaleFont) -> Result<Size, MeasureError> {
        if !font.size.is_finite() || font.size <= 0.0 {
            return Err(MeasureError::InvalidSize(font.size));
        }
        let glyphs = text.chars().count() as f64;
        Ok(Size::new(
            glyphs * font.size * self.advance,
            font.size * self.line_height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_font_auto_size() {
        let font = ScaleFont::new("Roboto", 11.0);
        assert_eq!(font.effective(true, 2.0).size, 12.0);
        // Never below the minimum
        assert_eq!(font.effective(true, 0.5).size, MIN_AUTO_FONT_SIZE);
        assert_eq!(font.effective(true, 0.5).family, "Roboto");
        // Fixed size keeps the configured font
        assert_eq!(font.effective(false, 2.0), font);
    }

    #[test]
    fn test_approx_measure() {
        let m = ApproxTextMeasure::default();
        let size = m.measure("100", &ScaleFont::new("x", 10.0)).unwrap();
        assert!((size.width - 18.0).abs() < 1e-9);
        assert!((size.height - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_approx_measure_rejects_bad_size() {
        let m = ApproxTextMeasure::default();
        assert_eq!(
            m.measure("1", &ScaleFont::new("x", 0.0)),
            Err(MeasureError::InvalidSize(0.0))
        );
    }
}
