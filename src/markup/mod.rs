//! # Poster Markup
//!
//! The plain-text input format. One line of the file is one poster element:
//!
//! ```text
//! !size 1080x1350
//! !font Bebas Neue
//! # comments are skipped
//! GRAND OPENING size=biggest
//! Saturday {date} color=#c0392b
//!
//! logo.png width=40%
//! Doors at eight alignment=right size=smaller
//! ```
//!
//! - `!name args` lines are canvas directives.
//! - `#` lines are comments.
//! - Empty lines are blank spacers.
//! - Everything else is split on whitespace. Known `key=value` tokens are
//!   attributes, the remaining tokens are the text. A token naming an image
//!   file turns the whole line into an image.
//!
//! Directives take effect from the line they appear on, so `!font` can switch
//! fonts partway down the poster. Bad values are errors carrying the line
//! number; unknown directives only warn.

use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;

use crate::error::AfficheError;
use crate::font::FontLibrary;
use crate::model::{
    default_font, Background, Canvas, Dimension, Document, Element, ImageElement, Margin,
    TextLine, TextSize,
};
use crate::style::{Alignment, Color};

/// File suffixes that mark a line as an image.
const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".webp", ".svg"];

pub const DEFAULT_DATE_FORMAT: &str = "%B %-d, %Y";

/// Parse `WxH` into pixel dimensions. Both must be positive.
pub fn parse_canvas_size(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    let w: u32 = w.parse().ok()?;
    let h: u32 = h.parse().ok()?;
    (w > 0 && h > 0).then_some((w, h))
}

/// Turns markup text into a [`Document`].
///
/// Fonts are resolved through the library so that different spellings of
/// one font share a style group. Relative paths resolve against `base_dir`.
pub struct MarkupParser<'a> {
    fonts: &'a FontLibrary,
    base_dir: Option<PathBuf>,
    today: NaiveDate,
}

impl<'a> MarkupParser<'a> {
    pub fn new(fonts: &'a FontLibrary) -> Self {
        Self {
            fonts,
            base_dir: None,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Directory that relative image and font paths are resolved against.
    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// The date `{date}` expands to.
    pub fn today(mut self, date: NaiveDate) -> Self {
        self.today = date;
        self
    }

    pub fn parse(&self, source: &str) -> Result<Document, AfficheError> {
        let mut state = ParseState {
            canvas: Canvas::default(),
            font: self.fonts.canonical_id(&default_font()),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            elements: Vec::new(),
        };

        for (index, raw) in source.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if let Some(directive) = line.strip_prefix('!') {
                self.apply_directive(&mut state, directive, line_no)?;
            } else if line.starts_with('#') {
                continue;
            } else if line.is_empty() {
                state.elements.push(Element::Blank);
            } else {
                let element = self.parse_content(&state, line, line_no)?;
                state.elements.push(element);
            }
        }

        log::debug!("markup: {} element(s)", state.elements.len());
        Ok(Document {
            canvas: state.canvas,
            elements: state.elements,
        })
    }

    fn apply_directive(
        &self,
        state: &mut ParseState,
        directive: &str,
        line: usize,
    ) -> Result<(), AfficheError> {
        let (name, args) = match directive.trim().split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (directive.trim(), ""),
        };
        let require = |what: &str| -> Result<(), AfficheError> {
            if args.is_empty() {
                Err(AfficheError::markup(line, format!("!{name} needs {what}")))
            } else {
                Ok(())
            }
        };

        match name {
            "font" => {
                require("a font name or path")?;
                let id = if looks_like_path(args) {
                    self.resolve_path(args)
                } else {
                    args.to_string()
                };
                state.font = self.fonts.canonical_id(&id);
            }
            "size" => {
                require("a WIDTHxHEIGHT value")?;
                let (width, height) = parse_canvas_size(args).ok_or_else(|| {
                    AfficheError::markup(line, format!("invalid canvas size '{args}', expected e.g. 1024x1536"))
                })?;
                state.canvas.width = width;
                state.canvas.height = height;
            }
            "margin" => {
                require("a pixel or percentage value")?;
                state.canvas.margin = Margin::parse(args)
                    .ok_or_else(|| AfficheError::markup(line, format!("invalid margin '{args}'")))?;
            }
            "background_color" => {
                require("a color")?;
                let color = Color::parse(args)
                    .ok_or_else(|| AfficheError::markup(line, format!("unknown color '{args}'")))?;
                state.canvas.background = Background::Color { color };
            }
            "background_image" => {
                require("an image path")?;
                state.canvas.background = Background::Image {
                    src: self.resolve_path(args),
                };
            }
            "date_format" => {
                require("a strftime format")?;
                if StrftimeItems::new(args).any(|item| matches!(item, Item::Error)) {
                    return Err(AfficheError::markup(line, format!("invalid date format '{args}'")));
                }
                state.date_format = args.to_string();
            }
            other => log::warn!("line {line}: unknown directive '!{other}' ignored"),
        }
        Ok(())
    }

    fn parse_content(&self, state: &ParseState, line: &str, line_no: usize) -> Result<Element, AfficheError> {
        let mut text_parts: Vec<&str> = Vec::new();
        let mut alignment = Alignment::default();
        let mut size_modifier = 0;
        let mut size = TextSize::Auto;
        let mut width = None;
        let mut height = None;
        let mut color = Color::BLACK;

        let is_image = line.split_whitespace().any(is_image_token);

        for token in line.split_whitespace() {
            let Some((key, value)) = token.split_once('=') else {
                text_parts.push(token);
                continue;
            };
            match key {
                "alignment" => {
                    alignment = value
                        .parse()
                        .map_err(|e: String| AfficheError::markup(line_no, e))?;
                }
                "size" => match value {
                    "bigger" => size_modifier += 1,
                    "smaller" => size_modifier -= 1,
                    "biggest" => size = TextSize::Biggest,
                    _ => size = parse_text_size(value).ok_or_else(|| {
                        AfficheError::markup(line_no, format!("invalid size '{value}'"))
                    })?,
                },
                "width" => width = Some(parse_dimension(value, "width", line_no)?),
                "height" => height = Some(parse_dimension(value, "height", line_no)?),
                "color" => {
                    color = Color::parse(value).ok_or_else(|| {
                        AfficheError::markup(line_no, format!("unknown color '{value}'"))
                    })?;
                }
                _ => text_parts.push(token),
            }
        }

        let text = text_parts.join(" ");
        if is_image {
            // A numeric size on an image line means its height.
            let height = height.or(match size {
                TextSize::Height(dim) => Some(dim),
                TextSize::FontPx(px) => Some(Dimension::Px(px)),
                TextSize::Auto | TextSize::Biggest => None,
            });
            return Ok(Element::Image(ImageElement {
                src: self.resolve_path(&text),
                width,
                height,
            }));
        }

        Ok(Element::Text(TextLine {
            text: self.expand_date(&text, &state.date_format),
            alignment,
            size_modifier,
            size,
            color,
            font: state.font.clone(),
        }))
    }

    fn expand_date(&self, text: &str, format: &str) -> String {
        if !text.contains("{date}") {
            return text.to_string();
        }
        let date = self.today.format(format).to_string();
        text.replace("{date}", &date)
    }

    fn resolve_path(&self, raw: &str) -> String {
        let path = Path::new(raw);
        match &self.base_dir {
            Some(base) if !raw.starts_with("data:") && path.is_relative() => {
                base.join(path).to_string_lossy().into_owned()
            }
            _ => raw.to_string(),
        }
    }
}

struct ParseState {
    canvas: Canvas,
    font: String,
    date_format: String,
    elements: Vec<Element>,
}

fn is_image_token(token: &str) -> bool {
    let lower = token.to_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| lower.contains(suffix))
}

fn looks_like_path(value: &str) -> bool {
    let lower = value.to_lowercase();
    value.contains('/') || [".ttf", ".otf", ".ttc"].iter().any(|ext| lower.ends_with(ext))
}

/// `48px` is a literal font size, `120` and `30%` are height budgets.
fn parse_text_size(value: &str) -> Option<TextSize> {
    if let Some(px) = value.strip_suffix("px") {
        let px: f64 = px.parse().ok()?;
        return (px.is_finite() && px > 0.0).then_some(TextSize::FontPx(px));
    }
    Dimension::parse(value).map(TextSize::Height)
}

fn parse_dimension(value: &str, key: &str, line: usize) -> Result<Dimension, AfficheError> {
    let number = value.strip_suffix("px").unwrap_or(value);
    Dimension::parse(number).ok_or_else(|| AfficheError::markup(line, format!("invalid {key} '{value}'")))
}
