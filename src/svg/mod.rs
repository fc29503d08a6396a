//! # SVG Images
//!
//! Parses a subset of SVG into drawing commands and rasterizes them at the
//! size the layout gives the image. Supports: rect, circle, ellipse, line,
//! polyline, polygon, path, g (group). Path commands: M, L, H, V, C, Q, Z
//! (absolute + relative). Fill and stroke come from attributes or an inline
//! `style`, inherited through groups.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::style::Color;

/// Size used when a document declares neither width/height nor a viewBox.
const DEFAULT_WIDTH: f64 = 300.0;
const DEFAULT_HEIGHT: f64 = 150.0;

/// A parsed SVG viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Drawing commands produced by the SVG parser, in user units.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgCommand {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    ClosePath,
    SetFill(Color),
    SetStroke(Color),
    SetStrokeWidth(f64),
    Fill,
    Stroke,
    FillAndStroke,
    SaveState,
    RestoreState,
}

/// A vector image: intrinsic size plus its drawing commands.
#[derive(Debug, Clone)]
pub struct SvgImage {
    pub width: f64,
    pub height: f64,
    pub view_box: ViewBox,
    pub commands: Vec<SvgCommand>,
}

impl SvgImage {
    /// Parse an SVG document.
    pub fn parse(content: &str) -> Result<Self, String> {
        let root = read_root(content)?;
        let view_box = root.view_box;
        let (width, height) = match (root.width, root.height, view_box) {
            (Some(w), Some(h), _) => (w, h),
            (Some(w), None, Some(vb)) if vb.width > 0.0 => (w, w * vb.height / vb.width),
            (None, Some(h), Some(vb)) if vb.height > 0.0 => (h * vb.width / vb.height, h),
            (None, None, Some(vb)) => (vb.width, vb.height),
            _ => (
                root.width.unwrap_or(DEFAULT_WIDTH),
                root.height.unwrap_or(DEFAULT_HEIGHT),
            ),
        };
        if width <= 0.0 || height <= 0.0 {
            return Err(format!("SVG has a degenerate size {width}x{height}"));
        }
        let view_box = view_box.unwrap_or(ViewBox {
            min_x: 0.0,
            min_y: 0.0,
            width,
            height,
        });
        Ok(Self {
            width,
            height,
            view_box,
            commands: parse_svg(content),
        })
    }

    /// Intrinsic size in whole pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (
            self.width.round().max(1.0) as u32,
            self.height.round().max(1.0) as u32,
        )
    }

    /// Rasterize into a new pixmap of the given size, stretching the viewBox.
    pub fn rasterize(&self, width: u32, height: u32) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(width, height)?;
        let sx = f64::from(width) / self.view_box.width;
        let sy = f64::from(height) / self.view_box.height;
        let transform = Transform::from_row(
            sx as f32,
            0.0,
            0.0,
            sy as f32,
            (-self.view_box.min_x * sx) as f32,
            (-self.view_box.min_y * sy) as f32,
        );
        draw_commands(&mut pixmap, &self.commands, transform);
        Some(pixmap)
    }
}

#[derive(Debug, Clone, Copy)]
struct PaintState {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: f64,
}

fn draw_commands(pixmap: &mut Pixmap, commands: &[SvgCommand], transform: Transform) {
    let mut state = PaintState {
        fill: None,
        stroke: None,
        stroke_width: 1.0,
    };
    let mut saved: Vec<PaintState> = Vec::new();
    let mut builder = PathBuilder::new();

    for command in commands {
        match *command {
            SvgCommand::MoveTo(x, y) => builder.move_to(x as f32, y as f32),
            SvgCommand::LineTo(x, y) => builder.line_to(x as f32, y as f32),
            SvgCommand::CurveTo(x1, y1, x2, y2, x, y) => builder.cubic_to(
                x1 as f32, y1 as f32, x2 as f32, y2 as f32, x as f32, y as f32,
            ),
            SvgCommand::ClosePath => builder.close(),
            SvgCommand::SetFill(c) => state.fill = Some(c),
            SvgCommand::SetStroke(c) => state.stroke = Some(c),
            SvgCommand::SetStrokeWidth(w) => state.stroke_width = w,
            SvgCommand::SaveState => saved.push(state),
            SvgCommand::RestoreState => {
                if let Some(prev) = saved.pop() {
                    state = prev;
                }
            }
            SvgCommand::Fill | SvgCommand::Stroke | SvgCommand::FillAndStroke => {
                let path = std::mem::replace(&mut builder, PathBuilder::new()).finish();
                let Some(path) = path else { continue };
                let wants_fill = !matches!(command, SvgCommand::Stroke);
                let wants_stroke = !matches!(command, SvgCommand::Fill);
                if let (true, Some(color)) = (wants_fill, state.fill) {
                    pixmap.fill_path(&path, &paint(color), FillRule::Winding, transform, None);
                }
                if let (true, Some(color)) = (wants_stroke, state.stroke) {
                    let stroke = Stroke {
                        width: state.stroke_width as f32,
                        ..Stroke::default()
                    };
                    pixmap.stroke_path(&path, &paint(color), &stroke, transform, None);
                }
            }
        }
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

struct RootAttributes {
    width: Option<f64>,
    height: Option<f64>,
    view_box: Option<ViewBox>,
}

/// Find the outermost `<svg>` element and read its sizing attributes.
fn read_root(content: &str) -> Result<RootAttributes, String> {
    let mut reader = Reader::from_str(content);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.name().as_ref() != b"svg" {
                    return Err("document root is not an <svg> element".to_string());
                }
                return Ok(RootAttributes {
                    width: get_attr(&e, "width").as_deref().and_then(parse_length),
                    height: get_attr(&e, "height").as_deref().and_then(parse_length),
                    view_box: get_attr(&e, "viewBox").as_deref().and_then(parse_view_box),
                });
            }
            Ok(Event::Eof) => return Err("no <svg> element found".to_string()),
            Err(e) => return Err(format!("malformed SVG: {e}")),
            _ => {}
        }
        buf.clear();
    }
}

/// Parse an absolute SVG length such as `120`, `120px` or `120.5`.
fn parse_length(s: &str) -> Option<f64> {
    let s = s.trim();
    let number = s.strip_suffix("px").unwrap_or(s);
    number.parse::<f64>().ok().filter(|v| *v > 0.0)
}

/// Parse a viewBox string like "0 0 100 100".
pub fn parse_view_box(s: &str) -> Option<ViewBox> {
    let parts: Vec<f64> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .filter_map(|p| p.parse::<f64>().ok())
        .collect();
    match parts[..] {
        [min_x, min_y, width, height] if width > 0.0 && height > 0.0 => Some(ViewBox {
            min_x,
            min_y,
            width,
            height,
        }),
        _ => None,
    }
}

/// Parse SVG XML content into drawing commands.
pub fn parse_svg(content: &str) -> Vec<SvgCommand> {
    let mut commands = Vec::new();
    let mut reader = Reader::from_str(content);

    let mut fill_stack: Vec<Option<Color>> = vec![Some(Color::BLACK)];
    let mut stroke_stack: Vec<Option<Color>> = vec![None];
    let mut stroke_width_stack: Vec<f64> = vec![1.0];

    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf);
        let (e, is_start) = match &event {
            Ok(Event::Start(e)) => (e, true),
            Ok(Event::Empty(e)) => (e, false),
            Ok(Event::End(e)) => {
                if matches!(e.name().as_ref(), b"g" | b"svg") {
                    fill_stack.pop();
                    stroke_stack.pop();
                    stroke_width_stack.pop();
                    commands.push(SvgCommand::RestoreState);
                }
                buf.clear();
                continue;
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {
                buf.clear();
                continue;
            }
        };

        let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let inherited_fill = fill_stack.last().copied().unwrap_or(Some(Color::BLACK));
        let inherited_stroke = stroke_stack.last().copied().unwrap_or(None);

        let current_fill = match get_presentation(e, "fill") {
            Some(f) if f == "none" => None,
            Some(f) => Color::parse(&f).or(inherited_fill),
            None => inherited_fill,
        };
        let current_stroke = match get_presentation(e, "stroke") {
            Some(s) if s == "none" => None,
            Some(s) => Color::parse(&s).or(inherited_stroke),
            None => inherited_stroke,
        };
        let current_sw = get_presentation(e, "stroke-width")
            .as_deref()
            .and_then(parse_length)
            .unwrap_or(*stroke_width_stack.last().unwrap_or(&1.0));

        match tag_name.as_str() {
            "g" | "svg" if is_start => {
                commands.push(SvgCommand::SaveState);
                fill_stack.push(current_fill);
                stroke_stack.push(current_stroke);
                stroke_width_stack.push(current_sw);
            }
            "rect" => {
                let x = get_attr_f64(e, "x").unwrap_or(0.0);
                let y = get_attr_f64(e, "y").unwrap_or(0.0);
                let w = get_attr_f64(e, "width").unwrap_or(0.0);
                let h = get_attr_f64(e, "height").unwrap_or(0.0);
                emit_shape(&mut commands, current_fill, current_stroke, current_sw, || {
                    vec![
                        SvgCommand::MoveTo(x, y),
                        SvgCommand::LineTo(x + w, y),
                        SvgCommand::LineTo(x + w, y + h),
                        SvgCommand::LineTo(x, y + h),
                        SvgCommand::ClosePath,
                    ]
                });
            }
            "circle" => {
                let cx = get_attr_f64(e, "cx").unwrap_or(0.0);
                let cy = get_attr_f64(e, "cy").unwrap_or(0.0);
                let r = get_attr_f64(e, "r").unwrap_or(0.0);
                emit_shape(&mut commands, current_fill, current_stroke, current_sw, || {
                    ellipse_commands(cx, cy, r, r)
                });
            }
            "ellipse" => {
                let cx = get_attr_f64(e, "cx").unwrap_or(0.0);
                let cy = get_attr_f64(e, "cy").unwrap_or(0.0);
                let rx = get_attr_f64(e, "rx").unwrap_or(0.0);
                let ry = get_attr_f64(e, "ry").unwrap_or(0.0);
                emit_shape(&mut commands, current_fill, current_stroke, current_sw, || {
                    ellipse_commands(cx, cy, rx, ry)
                });
            }
            "line" => {
                let x1 = get_attr_f64(e, "x1").unwrap_or(0.0);
                let y1 = get_attr_f64(e, "y1").unwrap_or(0.0);
                let x2 = get_attr_f64(e, "x2").unwrap_or(0.0);
                let y2 = get_attr_f64(e, "y2").unwrap_or(0.0);
                // Lines only have stroke, no fill
                emit_shape(&mut commands, None, current_stroke, current_sw, || {
                    vec![SvgCommand::MoveTo(x1, y1), SvgCommand::LineTo(x2, y2)]
                });
            }
            "polyline" | "polygon" => {
                let points = parse_points(&get_attr(e, "points").unwrap_or_default());
                if let Some((&(x0, y0), rest)) = points.split_first() {
                    let close = tag_name == "polygon";
                    let fill = if close { current_fill } else { None };
                    emit_shape(&mut commands, fill, current_stroke, current_sw, || {
                        let mut cmds = vec![SvgCommand::MoveTo(x0, y0)];
                        cmds.extend(rest.iter().map(|&(px, py)| SvgCommand::LineTo(px, py)));
                        if close {
                            cmds.push(SvgCommand::ClosePath);
                        }
                        cmds
                    });
                }
            }
            "path" => {
                let path_cmds = parse_path_d(&get_attr(e, "d").unwrap_or_default());
                if !path_cmds.is_empty() {
                    emit_shape(&mut commands, current_fill, current_stroke, current_sw, || {
                        path_cmds
                    });
                }
            }
            _ => {}
        }
        buf.clear();
    }

    commands
}

fn emit_shape(
    commands: &mut Vec<SvgCommand>,
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: f64,
    path_fn: impl FnOnce() -> Vec<SvgCommand>,
) {
    let paint_op = match (fill, stroke) {
        (Some(_), Some(_)) => SvgCommand::FillAndStroke,
        (Some(_), None) => SvgCommand::Fill,
        (None, Some(_)) => SvgCommand::Stroke,
        (None, None) => return,
    };

    commands.push(SvgCommand::SaveState);
    if let Some(color) = fill {
        commands.push(SvgCommand::SetFill(color));
    }
    if let Some(color) = stroke {
        commands.push(SvgCommand::SetStroke(color));
        commands.push(SvgCommand::SetStrokeWidth(stroke_width));
    }
    commands.extend(path_fn());
    commands.push(paint_op);
    commands.push(SvgCommand::RestoreState);
}

/// Generate cubic bezier commands to approximate an ellipse.
fn ellipse_commands(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<SvgCommand> {
    let k: f64 = 0.5522847498;
    let kx = rx * k;
    let ky = ry * k;

    vec![
        SvgCommand::MoveTo(cx + rx, cy),
        SvgCommand::CurveTo(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry),
        SvgCommand::CurveTo(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy),
        SvgCommand::CurveTo(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry),
        SvgCommand::CurveTo(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy),
        SvgCommand::ClosePath,
    ]
}

/// Parse an SVG path `d` attribute into drawing commands.
fn parse_path_d(d: &str) -> Vec<SvgCommand> {
    let tokens = tokenize_path(d);
    let num = |i: usize| tokens.get(i).and_then(|t| t.parse::<f64>().ok()).unwrap_or(0.0);
    let has_numbers = |i: usize, n: usize| (i..i + n).all(|j| tokens.get(j).is_some_and(|t| is_number(t)));

    let mut commands = Vec::new();
    let (mut cur_x, mut cur_y) = (0.0f64, 0.0f64);
    let (mut start_x, mut start_y) = (0.0f64, 0.0f64);
    let mut i = 0;

    while i < tokens.len() {
        let op = tokens[i].as_str();
        let relative = op.chars().all(|c| c.is_ascii_lowercase());
        let (ox, oy) = if relative { (cur_x, cur_y) } else { (0.0, 0.0) };
        i += 1;
        match op {
            "M" | "m" => {
                if !has_numbers(i, 2) {
                    continue;
                }
                cur_x = ox + num(i);
                cur_y = oy + num(i + 1);
                start_x = cur_x;
                start_y = cur_y;
                commands.push(SvgCommand::MoveTo(cur_x, cur_y));
                i += 2;
                // Implicit LineTo for subsequent coordinate pairs
                while has_numbers(i, 2) {
                    let (bx, by) = if relative { (cur_x, cur_y) } else { (0.0, 0.0) };
                    cur_x = bx + num(i);
                    cur_y = by + num(i + 1);
                    commands.push(SvgCommand::LineTo(cur_x, cur_y));
                    i += 2;
                }
            }
            "L" | "l" => {
                while has_numbers(i, 2) {
                    let (bx, by) = if relative { (cur_x, cur_y) } else { (0.0, 0.0) };
                    cur_x = bx + num(i);
                    cur_y = by + num(i + 1);
                    commands.push(SvgCommand::LineTo(cur_x, cur_y));
                    i += 2;
                }
            }
            "H" | "h" => {
                while has_numbers(i, 1) {
                    cur_x = (if relative { cur_x } else { 0.0 }) + num(i);
                    commands.push(SvgCommand::LineTo(cur_x, cur_y));
                    i += 1;
                }
            }
            "V" | "v" => {
                while has_numbers(i, 1) {
                    cur_y = (if relative { cur_y } else { 0.0 }) + num(i);
                    commands.push(SvgCommand::LineTo(cur_x, cur_y));
                    i += 1;
                }
            }
            "C" | "c" => {
                while has_numbers(i, 6) {
                    let (bx, by) = if relative { (cur_x, cur_y) } else { (0.0, 0.0) };
                    let x1 = bx + num(i);
                    let y1 = by + num(i + 1);
                    let x2 = bx + num(i + 2);
                    let y2 = by + num(i + 3);
                    cur_x = bx + num(i + 4);
                    cur_y = by + num(i + 5);
                    commands.push(SvgCommand::CurveTo(x1, y1, x2, y2, cur_x, cur_y));
                    i += 6;
                }
            }
            "Q" | "q" => {
                while has_numbers(i, 4) {
                    let (bx, by) = if relative { (cur_x, cur_y) } else { (0.0, 0.0) };
                    let qx = bx + num(i);
                    let qy = by + num(i + 1);
                    let end_x = bx + num(i + 2);
                    let end_y = by + num(i + 3);
                    // Convert quadratic to cubic
                    let c1x = cur_x + (2.0 / 3.0) * (qx - cur_x);
                    let c1y = cur_y + (2.0 / 3.0) * (qy - cur_y);
                    let c2x = end_x + (2.0 / 3.0) * (qx - end_x);
                    let c2y = end_y + (2.0 / 3.0) * (qy - end_y);
                    cur_x = end_x;
                    cur_y = end_y;
                    commands.push(SvgCommand::CurveTo(c1x, c1y, c2x, c2y, cur_x, cur_y));
                    i += 4;
                }
            }
            "Z" | "z" => {
                commands.push(SvgCommand::ClosePath);
                cur_x = start_x;
                cur_y = start_y;
            }
            _ => {}
        }
    }

    commands
}

/// Tokenize a path `d` string into commands and numbers.
fn tokenize_path(d: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in d.chars() {
        if ch.is_alphabetic() && ch != 'e' && ch != 'E' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            tokens.push(ch.to_string());
        } else if ch == '-' && !current.is_empty() && !current.ends_with(['e', 'E']) {
            // Negative sign starts a new number (unless after exponent)
            tokens.push(std::mem::take(&mut current));
            current.push(ch);
        } else if ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E') {
            current.push(ch);
        } else if (ch == ',' || ch.is_whitespace()) && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn is_number(s: &str) -> bool {
    s.parse::<f64>().is_ok()
}

/// Parse SVG points attribute (e.g., "10,20 30,40").
fn parse_points(s: &str) -> Vec<(f64, f64)> {
    let nums: Vec<f64> = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<f64>().ok())
        .collect();

    nums.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

/// A presentation property, from an inline `style` declaration or the attribute.
fn get_presentation(e: &BytesStart, name: &str) -> Option<String> {
    let from_style = get_attr(e, "style").and_then(|style| {
        style.split(';').find_map(|decl| {
            let (key, value) = decl.split_once(':')?;
            (key.trim() == name).then(|| value.trim().to_string())
        })
    });
    from_style.or_else(|| get_attr(e, name))
}

/// Helper to get an attribute value from a quick-xml BytesStart.
fn get_attr(e: &BytesStart, name: &str) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .and_then(|attr| String::from_utf8(attr.value.to_vec()).ok())
}

fn get_attr_f64(e: &BytesStart, name: &str) -> Option<f64> {
    get_attr(e, name).and_then(|s| s.trim().trim_end_matches("px").parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view_box() {
        let vb = parse_view_box("0 0 100 200").unwrap();
        assert!((vb.min_x - 0.0).abs() < 0.001);
        assert!((vb.width - 100.0).abs() < 0.001);
        assert!((vb.height - 200.0).abs() < 0.001);
    }

    #[test]
    fn test_parse_view_box_invalid() {
        assert!(parse_view_box("bad").is_none());
        assert!(parse_view_box("0 0 0 10").is_none());
    }

    #[test]
    fn test_intrinsic_size_from_attributes() {
        let svg = SvgImage::parse(r#"<svg width="120px" height="60"><rect/></svg>"#).unwrap();
        assert_eq!(svg.dimensions(), (120, 60));
    }

    #[test]
    fn test_intrinsic_size_from_view_box() {
        let svg = SvgImage::parse(r#"<svg viewBox="0 0 40 10"></svg>"#).unwrap();
        assert_eq!(svg.dimensions(), (40, 10));
    }

    #[test]
    fn test_width_only_keeps_view_box_ratio() {
        let svg = SvgImage::parse(r#"<svg width="200" viewBox="0 0 40 10"></svg>"#).unwrap();
        assert_eq!(svg.dimensions(), (200, 50));
    }

    #[test]
    fn test_default_size_without_hints() {
        let svg = SvgImage::parse("<svg></svg>").unwrap();
        assert_eq!(svg.dimensions(), (300, 150));
    }

    #[test]
    fn test_non_svg_root_rejected() {
        assert!(SvgImage::parse("<html></html>").is_err());
    }

    #[test]
    fn test_parse_rect() {
        let cmds = parse_svg(r##"<rect x="10" y="20" width="100" height="50" fill="#ff0000"/>"##);
        assert!(cmds
            .iter()
            .any(|c| matches!(c, SvgCommand::SetFill(color) if (color.r - 1.0).abs() < 0.01)));
        assert!(cmds.iter().any(|c| matches!(c, SvgCommand::Fill)));
    }

    #[test]
    fn test_parse_circle() {
        let cmds = parse_svg(r#"<circle cx="50" cy="50" r="25" fill="blue"/>"#);
        assert!(cmds.iter().any(|c| matches!(c, SvgCommand::CurveTo(..))));
    }

    #[test]
    fn test_style_attribute_overrides() {
        let cmds = parse_svg(r#"<rect width="5" height="5" fill="red" style="fill: none; stroke: black"/>"#);
        assert!(!cmds.iter().any(|c| matches!(c, SvgCommand::SetFill(_))));
        assert!(cmds.iter().any(|c| matches!(c, SvgCommand::Stroke)));
    }

    #[test]
    fn test_group_fill_inherited() {
        let cmds = parse_svg(r##"<g fill="#00ff00"><rect width="5" height="5"/></g>"##);
        assert!(cmds
            .iter()
            .any(|c| matches!(c, SvgCommand::SetFill(color) if (color.g - 1.0).abs() < 0.01)));
    }

    #[test]
    fn test_parse_path_m_l_z() {
        let cmds = parse_path_d("M 10 20 L 30 40 Z");
        assert_eq!(cmds[0], SvgCommand::MoveTo(10.0, 20.0));
        assert_eq!(cmds[1], SvgCommand::LineTo(30.0, 40.0));
        assert_eq!(cmds[2], SvgCommand::ClosePath);
    }

    #[test]
    fn test_parse_path_relative() {
        let cmds = parse_path_d("m 10 20 l 5 5 z");
        assert_eq!(cmds[0], SvgCommand::MoveTo(10.0, 20.0));
        assert_eq!(cmds[1], SvgCommand::LineTo(15.0, 25.0));
    }

    #[test]
    fn test_parse_path_compact_negatives() {
        let cmds = parse_path_d("M10-5L-3,4");
        assert_eq!(cmds[0], SvgCommand::MoveTo(10.0, -5.0));
        assert_eq!(cmds[1], SvgCommand::LineTo(-3.0, 4.0));
    }

    #[test]
    fn test_rasterize_fills_pixels() {
        let svg = SvgImage::parse(
            r##"<svg viewBox="0 0 10 10"><rect width="10" height="10" fill="#ff0000"/></svg>"##,
        )
        .unwrap();
        let pixmap = svg.rasterize(20, 20).unwrap();
        let px = pixmap.pixel(10, 10).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 0, 0, 255));
    }

    #[test]
    fn test_empty_svg_draws_nothing() {
        assert!(parse_svg("").is_empty());
    }
}
