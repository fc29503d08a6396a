//! # Text Measurement
//!
//! The measurement half of the text service: how big a single line is at a
//! given font size, and where each glyph sits for drawing. Lines are never
//! wrapped.
//!
//! The measured box runs from the ascender line down to the lowest ink, the
//! same box a poster line occupies when stacked, so a line's measured height
//! is the height it advances the layout cursor by.

pub mod shaping;

use serde::Serialize;

use crate::font::{builtin, FontContext, FontFace, TrueTypeFont};
use shaping::{shape_text, shaped_width};

/// Rendered size of a line of text, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// A glyph placed relative to the left end of the line's baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGlyph {
    pub glyph_id: u16,
    /// Pixels right of the line start.
    pub x: f64,
    /// Pixels above the baseline (GPOS offsets).
    pub y_offset: f64,
    pub advance: f64,
}

/// Measure one line of text with a font from the context.
pub fn measure(fonts: &FontContext, text: &str, font_id: &str, font_size: f64) -> TextExtent {
    measure_text(fonts.face(font_id), text, font_size)
}

/// Measure one line of text in a face.
pub fn measure_text(face: &FontFace, text: &str, font_size: f64) -> TextExtent {
    match face {
        FontFace::Builtin => TextExtent {
            width: builtin::text_width(text, font_size),
            height: builtin::text_height(text, font_size),
        },
        FontFace::TrueType(font) => measure_truetype(font, text, font_size),
    }
}

fn measure_truetype(font: &TrueTypeFont, text: &str, font_size: f64) -> TextExtent {
    if text.is_empty() {
        return TextExtent::default();
    }
    let Some(glyphs) = shape_text(text, &font.data) else {
        return TextExtent {
            width: builtin::text_width(text, font_size),
            height: builtin::text_height(text, font_size),
        };
    };
    let scale = font.scale(font_size);
    let width = shaped_width(&glyphs, font.units_per_em, font_size);

    // Lowest ink below the baseline. Glyphs without outlines (spaces) don't count.
    let lowest = font
        .face()
        .map(|face| {
            glyphs
                .iter()
                .filter_map(|g| face.glyph_bounding_box(ttf_parser::GlyphId(g.glyph_id)))
                .map(|bbox| i32::from(bbox.y_min))
                .min()
                .unwrap_or(0)
        })
        .unwrap_or(i32::from(font.descender));
    let bottom = lowest.min(0);
    let height = (f64::from(font.ascender) - f64::from(bottom)) * scale;

    TextExtent { width, height }
}

/// Lay out glyph positions for drawing.
pub fn position_glyphs(face: &FontFace, text: &str, font_size: f64) -> Vec<PositionedGlyph> {
    match face {
        FontFace::Builtin => {
            let advance = builtin::ADVANCE * font_size;
            text.chars()
                .filter(|c| !c.is_control())
                .enumerate()
                .filter(|(_, c)| !c.is_whitespace())
                .map(|(i, _)| PositionedGlyph {
                    glyph_id: 0,
                    x: i as f64 * advance,
                    y_offset: 0.0,
                    advance,
                })
                .collect()
        }
        FontFace::TrueType(font) => {
            let Some(glyphs) = shape_text(text, &font.data) else {
                return Vec::new();
            };
            let scale = font.scale(font_size);
            let mut pen = 0.0;
            let mut placed = Vec::with_capacity(glyphs.len());
            for g in &glyphs {
                let advance = f64::from(g.x_advance) * scale;
                placed.push(PositionedGlyph {
                    glyph_id: g.glyph_id,
                    x: pen + f64::from(g.x_offset) * scale,
                    y_offset: f64::from(g.y_offset) * scale,
                    advance,
                });
                pen += advance;
            }
            placed
        }
    }
}

/// Distance from the top of a measured line to its baseline.
pub fn baseline_offset(face: &FontFace, font_size: f64) -> f64 {
    match face {
        FontFace::Builtin => builtin::ASCENT * font_size,
        FontFace::TrueType(font) => f64::from(font.ascender) * font.scale(font_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_measure() {
        let ext = measure_text(&FontFace::Builtin, "AB", 100.0);
        assert!((ext.width - 120.0).abs() < 1e-9);
        assert!((ext.height - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_measure_unknown_font_uses_builtin() {
        let fonts = FontContext::builtin();
        let a = measure(&fonts, "Poster", "Nope", 30.0);
        let b = measure_text(&FontFace::Builtin, "Poster", 30.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_builtin_glyphs_skip_spaces_but_keep_advance() {
        let glyphs = position_glyphs(&FontFace::Builtin, "A B", 10.0);
        assert_eq!(glyphs.len(), 2);
        assert!((glyphs[0].x - 0.0).abs() < 1e-9);
        assert!((glyphs[1].x - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_builtin_baseline() {
        assert!((baseline_offset(&FontFace::Builtin, 50.0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_measures_zero() {
        assert_eq!(measure_text(&FontFace::Builtin, "", 80.0), TextExtent::default());
    }
}
