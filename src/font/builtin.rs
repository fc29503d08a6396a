//! Metrics for the built-in fallback face.
//!
//! When a requested font cannot be loaded the poster still renders, using a
//! plain block face whose glyphs are solid cap-height bars on a fixed
//! advance. The proportions are simple constants so that layout with the
//! fallback is fully predictable.

/// Horizontal advance of every character, in em.
pub const ADVANCE: f64 = 0.6;
/// Distance from the top of the line box to the baseline, in em.
pub const ASCENT: f64 = 0.8;
/// Distance from the baseline to the bottom of the line box, in em.
pub const DESCENT: f64 = 0.2;
/// Height of a drawn block above the baseline, in em.
pub const CAP_HEIGHT: f64 = 0.7;
/// Width of a drawn block, in em. Centered in its advance.
pub const BLOCK_WIDTH: f64 = 0.5;

/// Number of advances a string occupies. Control characters take no space.
pub fn advance_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_control()).count()
}

pub fn text_width(text: &str, font_size: f64) -> f64 {
    advance_count(text) as f64 * ADVANCE * font_size
}

/// Height of the line box, zero for text with nothing to draw.
pub fn text_height(text: &str, font_size: f64) -> f64 {
    if advance_count(text) == 0 {
        0.0
    } else {
        (ASCENT + DESCENT) * font_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_is_linear_in_size() {
        assert!((text_width("HELLO", 10.0) - 30.0).abs() < 1e-9);
        assert!((text_width("HELLO", 20.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_has_no_extent() {
        assert_eq!(text_width("", 50.0), 0.0);
        assert_eq!(text_height("", 50.0), 0.0);
    }

    #[test]
    fn test_height_is_full_em() {
        assert!((text_height("g", 40.0) - 40.0).abs() < 1e-9);
    }
}
