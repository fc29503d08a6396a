//! # Document Model
//!
//! The typed form of a poster description. A document is a canvas plus an
//! ordered list of elements stacked top to bottom. Each element is exactly
//! one of a text line, an image, or a blank spacer.
//!
//! Elements only describe what the author asked for. Everything the engine
//! computes (heights, font sizes, positions) lives in the layout records, so
//! a `Document` is never mutated once parsing is done.

use crate::error::AfficheError;
use crate::style::{Alignment, Color};
use serde::{Deserialize, Serialize};

/// Each `size=bigger` step multiplies a text line's share of free space by this.
pub const SIZE_STEP: f64 = 1.2;

/// Weight of a blank spacer relative to a plain text line or image.
pub const BLANK_WEIGHT: f64 = 0.25;

/// A complete poster ready for layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub canvas: Canvas,

    /// Elements in stacking order, top to bottom.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Document {
    /// Every distinct font identity referenced by a text line, in first-use order.
    pub fn font_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for element in &self.elements {
            if let Element::Text(line) = element {
                if !ids.contains(&line.font.as_str()) {
                    ids.push(&line.font);
                }
            }
        }
        ids
    }

    /// Reject sizes no markup line could produce: negative or non-finite
    /// lengths and font sizes that aren't positive.
    pub fn check_values(&self) -> Result<(), AfficheError> {
        for (index, element) in self.elements.iter().enumerate() {
            let invalid = |message: String| AfficheError::InvalidElement { index, message };
            match element {
                Element::Text(line) => match line.size {
                    TextSize::Height(dim) if !dim.is_valid() => {
                        return Err(invalid(format!("invalid height {dim:?}")));
                    }
                    TextSize::FontPx(px) if !(px.is_finite() && px > 0.0) => {
                        return Err(invalid(format!("invalid font size {px}px")));
                    }
                    _ => {}
                },
                Element::Image(image) => {
                    for (key, dim) in [("width", image.width), ("height", image.height)] {
                        if let Some(dim) = dim.filter(|d| !d.is_valid()) {
                            return Err(invalid(format!("invalid {key} {dim:?}")));
                        }
                    }
                }
                Element::Blank => {}
            }
        }
        Ok(())
    }

    /// Every image source the document needs, background included.
    pub fn image_sources(&self) -> Vec<&str> {
        let mut sources: Vec<&str> = Vec::new();
        if let Background::Image { src } = &self.canvas.background {
            sources.push(src);
        }
        for element in &self.elements {
            if let Element::Image(image) = element {
                if !sources.contains(&image.src.as_str()) {
                    sources.push(&image.src);
                }
            }
        }
        sources
    }
}

/// The fixed-size target image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Canvas {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub margin: Margin,
    #[serde(default)]
    pub background: Background,
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    1536
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
            background: Background::default(),
        }
    }
}

impl Canvas {
    /// Resolve margins into the usable area.
    ///
    /// Fails when the margins swallow the whole canvas, because every later
    /// stage divides by the usable dimensions.
    pub fn area(&self) -> Result<Area, AfficheError> {
        if !self.margin.is_valid() {
            return Err(AfficheError::Geometry(format!(
                "margin {} is not a finite, non-negative value",
                self.margin
            )));
        }
        let (margin_x, margin_y) = match self.margin {
            Margin::Fraction(f) => (
                (self.width as f64 * f).floor(),
                (self.height as f64 * f).floor(),
            ),
            Margin::Pixels(px) => (px, px),
        };
        let area = Area {
            margin_x,
            margin_y,
            width: self.width as f64 - 2.0 * margin_x,
            height: self.height as f64 - 2.0 * margin_y,
        };
        if area.width <= 0.0 || area.height <= 0.0 {
            return Err(AfficheError::Geometry(format!(
                "{}x{} canvas with {} margin leaves {}x{} usable pixels",
                self.width, self.height, self.margin, area.width, area.height
            )));
        }
        Ok(area)
    }
}

/// Space kept clear around the poster content, on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Margin {
    /// Fraction of the canvas dimension on each axis (0.05 = 5%).
    Fraction(f64),
    /// Absolute pixels on every side.
    Pixels(f64),
}

impl Default for Margin {
    fn default() -> Self {
        Margin::Fraction(0.05)
    }
}

impl Margin {
    /// Parse `10%` or `40` style margin values.
    pub fn parse(value: &str) -> Option<Self> {
        if let Some(pct) = value.strip_suffix('%') {
            let pct: f64 = pct.parse().ok()?;
            Some(Margin::Fraction(pct / 100.0)).filter(|m| m.is_valid())
        } else {
            let px: f64 = value.strip_suffix("px").unwrap_or(value).parse().ok()?;
            Some(Margin::Pixels(px)).filter(|m| m.is_valid())
        }
    }

    pub fn is_valid(self) -> bool {
        let (Margin::Fraction(v) | Margin::Pixels(v)) = self;
        v.is_finite() && v >= 0.0
    }
}

impl std::fmt::Display for Margin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Margin::Fraction(v) => write!(f, "{}%", v * 100.0),
            Margin::Pixels(v) => write!(f, "{v}px"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Background {
    Color { color: Color },
    /// An image stretched over the whole canvas.
    Image { src: String },
}

impl Default for Background {
    fn default() -> Self {
        Background::Color {
            color: Color::WHITE,
        }
    }
}

/// The usable rectangle of a canvas: everything inside the margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub margin_x: f64,
    pub margin_y: f64,
    pub width: f64,
    pub height: f64,
}

/// A length that is either absolute or relative to a usable dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    Px(f64),
    /// Percentage (0–100) of the usable width or height.
    Percent(f64),
}

impl Dimension {
    /// Parse `120` or `30%`.
    pub fn parse(value: &str) -> Option<Self> {
        let dimension = match value.strip_suffix('%') {
            Some(pct) => Dimension::Percent(pct.parse().ok()?),
            None => Dimension::Px(value.parse().ok()?),
        };
        dimension.is_valid().then_some(dimension)
    }

    /// Finite and not negative.
    pub fn is_valid(self) -> bool {
        let (Dimension::Px(v) | Dimension::Percent(v)) = self;
        v.is_finite() && v >= 0.0
    }

    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            Dimension::Px(px) => px,
            Dimension::Percent(pct) => basis * pct / 100.0,
        }
    }
}

/// One stacked item of the poster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Element {
    Text(TextLine),
    Image(ImageElement),
    /// Vertical breathing room, a quarter of a standard line.
    Blank,
}

/// A single line of text. Never wrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLine {
    pub text: String,
    #[serde(default)]
    pub alignment: Alignment,
    /// Net `bigger`/`smaller` steps.
    #[serde(default)]
    pub size_modifier: i32,
    #[serde(default)]
    pub size: TextSize,
    #[serde(default)]
    pub color: Color,
    /// Font identity: a family name or a font file path.
    #[serde(default = "default_font")]
    pub font: String,
}

pub fn default_font() -> String {
    "Arial".to_string()
}

impl TextLine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            alignment: Alignment::default(),
            size_modifier: 0,
            size: TextSize::Auto,
            color: Color::BLACK,
            font: default_font(),
        }
    }

    pub fn style_key(&self) -> StyleKey {
        StyleKey {
            size_modifier: self.size_modifier,
            font: self.font.clone(),
        }
    }
}

/// How a text line's size was specified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum TextSize {
    /// Share the leftover height with other implicit elements.
    #[default]
    Auto,
    /// A height budget (`size=120` or `size=30%`), still fitted like `Auto`.
    Height(Dimension),
    /// A literal font size (`size=48px`), never adjusted.
    FontPx(f64),
    /// `size=biggest`: fill the usable width exactly.
    Biggest,
}

/// Lines sharing a style key render at one shared font size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StyleKey {
    pub size_modifier: i32,
    pub font: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    /// File path or `data:` URI. Raster or SVG.
    pub src: String,
    #[serde(default)]
    pub width: Option<Dimension>,
    #[serde(default)]
    pub height: Option<Dimension>,
}

impl ImageElement {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
            width: None,
            height: None,
        }
    }
}
