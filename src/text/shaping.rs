//! # OpenType Shaping
//!
//! Wraps rustybuzz to perform OpenType shaping (GSUB/GPOS) on a single line.
//! Shaping gives real glyph IDs with kerning and ligatures applied, so the
//! measured width of a line is the width it will actually be drawn at.
//!
//! The built-in fallback face bypasses shaping entirely.

/// A single glyph produced by OpenType shaping. Units are font units.
#[derive(Debug, Clone)]
pub struct ShapedGlyph {
    pub glyph_id: u16,
    pub x_advance: i32,
    /// Horizontal offset from GPOS (kerning, mark positioning).
    pub x_offset: i32,
    /// Vertical offset from GPOS.
    pub y_offset: i32,
}

/// Shape text using the given font data.
///
/// Returns `None` if the font data can't be parsed.
pub fn shape_text(text: &str, font_data: &[u8]) -> Option<Vec<ShapedGlyph>> {
    let face = rustybuzz::Face::from_slice(font_data, 0)?;
    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(text);

    let output = rustybuzz::shape(&face, &[], buffer);

    let glyphs = output
        .glyph_infos()
        .iter()
        .zip(output.glyph_positions().iter())
        .map(|(info, pos)| ShapedGlyph {
            glyph_id: info.glyph_id as u16,
            x_advance: pos.x_advance,
            x_offset: pos.x_offset,
            y_offset: pos.y_offset,
        })
        .collect();

    Some(glyphs)
}

/// Total advance width of shaped glyphs in pixels.
pub fn shaped_width(glyphs: &[ShapedGlyph], units_per_em: u16, font_size: f64) -> f64 {
    let scale = font_size / f64::from(units_per_em);
    glyphs.iter().map(|g| f64::from(g.x_advance) * scale).sum()
}
