//! # Style Values
//!
//! The small set of presentational values a poster line can carry: a color
//! and a horizontal alignment. Colors are parsed with `csscolorparser`, so
//! anything a stylesheet would accept (`navy`, `#c0ffee`, `rgb(10, 20, 30)`)
//! works in markup too.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An sRGB color with straight (non-premultiplied) alpha, channels 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse any CSS color string.
    pub fn parse(value: &str) -> Option<Self> {
        let parsed = csscolorparser::parse(value.trim()).ok()?;
        Some(Self {
            r: f64::from(parsed.r),
            g: f64::from(parsed.g),
            b: f64::from(parsed.b),
            a: f64::from(parsed.a),
        })
    }

    /// 8-bit RGBA channels.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        let [r, g, b, a] = self.to_rgba8();
        tiny_skia::Color::from_rgba8(r, g, b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Horizontal placement of a text line inside the usable area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Flush against the left margin.
    Start,
    /// Centered on the full canvas width.
    #[default]
    Center,
    /// Flush against the right margin.
    End,
}

impl FromStr for Alignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "start" | "left" => Ok(Alignment::Start),
            "center" | "centre" | "middle" => Ok(Alignment::Center),
            "end" | "right" => Ok(Alignment::End),
            other => Err(format!(
                "unknown alignment '{other}' (expected start, center or end)"
            )),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Alignment::Start => "start",
            Alignment::Center => "center",
            Alignment::End => "end",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_color() {
        let c = Color::parse("red").unwrap();
        assert_eq!(c.to_rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_parse_hex_color() {
        let c = Color::parse("#336699").unwrap();
        assert_eq!(c.to_rgba8(), [0x33, 0x66, 0x99, 255]);
    }

    #[test]
    fn test_parse_rgb_function() {
        let c = Color::parse("rgb(10, 20, 30)").unwrap();
        assert_eq!(c.to_rgba8(), [10, 20, 30, 255]);
    }

    #[test]
    fn test_parse_garbage_color() {
        assert!(Color::parse("not-a-color").is_none());
    }

    #[test]
    fn test_alignment_synonyms() {
        assert_eq!("left".parse::<Alignment>().unwrap(), Alignment::Start);
        assert_eq!("END".parse::<Alignment>().unwrap(), Alignment::End);
        assert_eq!("center".parse::<Alignment>().unwrap(), Alignment::Center);
        assert!("diagonal".parse::<Alignment>().is_err());
    }
}
