//! # Rasterization
//!
//! Paints a finished [`Layout`] onto a `tiny-skia` pixmap and encodes it.
//!
//! Painting is strictly in document order: background first, then every
//! placed element top to bottom. Nothing here makes sizing decisions. Every
//! box comes from the layout, and this module only draws into it.
//!
//! Glyph outlines come from `ttf-parser` in font units (y up) and are mapped
//! to the canvas with a y-flipping transform anchored on the baseline. The
//! built-in face draws each character as a solid block.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Transform,
};

use crate::error::AfficheError;
use crate::font::{builtin, FontFace};
use crate::image_loader::LoadedImage;
use crate::layout::{Layout, PlacedElement};
use crate::model::{Background, Document, Element, TextLine};
use crate::resources::Resources;
use crate::style::Color;
use crate::text::{baseline_offset, position_glyphs};

/// Paint a laid-out document.
pub fn paint(document: &Document, layout: &Layout, resources: &Resources) -> Result<Pixmap, AfficheError> {
    let mut pixmap = Pixmap::new(layout.canvas_width, layout.canvas_height).ok_or_else(|| {
        AfficheError::Geometry(format!(
            "cannot allocate a {}x{} canvas",
            layout.canvas_width, layout.canvas_height
        ))
    })?;

    paint_background(&mut pixmap, &document.canvas.background, resources)?;

    for placed in &layout.elements {
        match &document.elements[placed.index] {
            Element::Text(line) => paint_text(&mut pixmap, line, placed, resources),
            Element::Image(image) => {
                let loaded = resources.images.get(&image.src)?;
                paint_image(&mut pixmap, loaded, placed);
            }
            Element::Blank => {}
        }
    }
    Ok(pixmap)
}

fn paint_background(
    pixmap: &mut Pixmap,
    background: &Background,
    resources: &Resources,
) -> Result<(), AfficheError> {
    match background {
        Background::Color { color } => pixmap.fill(color.to_skia()),
        Background::Image { src } => {
            pixmap.fill(Color::WHITE.to_skia());
            let (width, height) = (pixmap.width(), pixmap.height());
            let loaded = resources.images.get(src)?;
            if let Some(stretched) = scaled_pixmap(loaded, width, height) {
                pixmap.draw_pixmap(
                    0,
                    0,
                    stretched.as_ref(),
                    &PixmapPaint::default(),
                    Transform::identity(),
                    None,
                );
            }
        }
    }
    Ok(())
}

fn paint_text(pixmap: &mut Pixmap, line: &TextLine, placed: &PlacedElement, resources: &Resources) {
    let Some(font_size) = placed.font_size() else {
        return;
    };
    let face = resources.fonts.face(&line.font);
    let glyphs = position_glyphs(face, &line.text, font_size);
    let baseline = placed.y + baseline_offset(face, font_size);

    let mut paint = Paint::default();
    paint.set_color(line.color.to_skia());
    paint.anti_alias = true;

    match face {
        FontFace::Builtin => {
            let block_width = builtin::BLOCK_WIDTH * font_size;
            let block_height = builtin::CAP_HEIGHT * font_size;
            for glyph in &glyphs {
                let left = placed.x + glyph.x + (glyph.advance - block_width) / 2.0;
                let top = baseline - block_height;
                if let Some(rect) =
                    Rect::from_xywh(left as f32, top as f32, block_width as f32, block_height as f32)
                {
                    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                }
            }
        }
        FontFace::TrueType(font) => {
            let Some(ttf) = font.face() else {
                return;
            };
            let scale = font.scale(font_size) as f32;
            for glyph in &glyphs {
                let mut outline = GlyphOutline(PathBuilder::new());
                if ttf
                    .outline_glyph(ttf_parser::GlyphId(glyph.glyph_id), &mut outline)
                    .is_none()
                {
                    continue;
                }
                let Some(path) = outline.0.finish() else {
                    continue;
                };
                let transform = Transform::from_row(
                    scale,
                    0.0,
                    0.0,
                    -scale,
                    (placed.x + glyph.x) as f32,
                    (baseline - glyph.y_offset) as f32,
                );
                pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
            }
        }
    }
}

/// Receives `ttf-parser` outline callbacks into a tiny-skia path.
struct GlyphOutline(PathBuilder);

impl ttf_parser::OutlineBuilder for GlyphOutline {
    fn move_to(&mut self, x: f32, y: f32) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.0.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.0.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.0.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.0.close();
    }
}

fn paint_image(pixmap: &mut Pixmap, image: &LoadedImage, placed: &PlacedElement) {
    let width = placed.width.round();
    let height = placed.height.round();
    if width < 1.0 || height < 1.0 {
        return;
    }
    let Some(scaled) = scaled_pixmap(image, width as u32, height as u32) else {
        return;
    };
    pixmap.draw_pixmap(
        placed.x.round() as i32,
        placed.y.round() as i32,
        scaled.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// An image resampled (or rasterized) to exactly `width` × `height`.
fn scaled_pixmap(image: &LoadedImage, width: u32, height: u32) -> Option<Pixmap> {
    match image {
        LoadedImage::Raster(rgba) => {
            let resized;
            let source = if rgba.dimensions() == (width, height) {
                rgba
            } else {
                resized = image::imageops::resize(rgba, width, height, FilterType::Triangle);
                &resized
            };
            rgba_to_pixmap(source)
        }
        LoadedImage::Vector(svg) => svg.rasterize(width, height),
    }
}

fn rgba_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Convert to straight-alpha RGBA for encoding.
pub fn to_rgba_image(pixmap: &Pixmap) -> Result<RgbaImage, AfficheError> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| AfficheError::Encode("pixel buffer size mismatch".to_string()))
}

/// Write the poster. `.jpg`/`.jpeg` paths are encoded as JPEG, anything else as PNG.
pub fn save(image: &RgbaImage, path: &Path) -> Result<(), AfficheError> {
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "jpg" | "jpeg"))
        .unwrap_or(false);

    let result = if is_jpeg {
        // JPEG has no alpha channel.
        image::DynamicImage::ImageRgba8(image.clone())
            .to_rgb8()
            .save_with_format(path, image::ImageFormat::Jpeg)
    } else {
        image.save_with_format(path, image::ImageFormat::Png)
    };
    result.map_err(|e| AfficheError::Encode(format!("{}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::image_loader::ImageStore;
    use crate::layout::LayoutEngine;
    use crate::model::{Canvas, ImageElement, Margin, TextSize};

    fn builtin_resources() -> Resources {
        Resources {
            fonts: FontContext::builtin(),
            images: ImageStore::default(),
        }
    }

    fn render(document: &Document, resources: &Resources) -> RgbaImage {
        let layout = LayoutEngine::new().layout(document, resources).unwrap();
        to_rgba_image(&paint(document, &layout, resources).unwrap()).unwrap()
    }

    fn canvas(width: u32, height: u32) -> Canvas {
        Canvas {
            width,
            height,
            margin: Margin::Pixels(0.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_background_color_fills_canvas() {
        let mut c = canvas(8, 8);
        c.background = Background::Color {
            color: Color::rgb(1.0, 0.0, 0.0),
        };
        let document = Document {
            canvas: c,
            elements: vec![],
        };
        let image = render(&document, &builtin_resources());
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(7, 7).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_builtin_text_draws_blocks() {
        let mut line = TextLine::new("I");
        line.size = TextSize::FontPx(100.0);
        let document = Document {
            canvas: canvas(200, 200),
            elements: vec![Element::Text(line)],
        };
        let image = render(&document, &builtin_resources());
        // Line box 60×100 centered at (70, 50); block spans x 75..125, y 60..130.
        assert_eq!(image.get_pixel(100, 95).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(10, 10).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(100, 140).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_raster_image_is_drawn_in_its_box() {
        let mut images = ImageStore::default();
        images.insert(
            "blue.png",
            LoadedImage::Raster(RgbaImage::from_pixel(200, 200, image::Rgba([0, 0, 255, 255]))),
        );
        let resources = Resources {
            fonts: FontContext::builtin(),
            images,
        };
        let document = Document {
            canvas: canvas(100, 50),
            elements: vec![Element::Image(ImageElement::new("blue.png"))],
        };
        let image = render(&document, &resources);
        // 200×200 contained in 100×50 → 50×50 centered.
        assert_eq!(image.get_pixel(50, 25).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(5, 25).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let document = Document {
            canvas: canvas(10, 10),
            elements: vec![],
        };
        let mut with_bg = document.clone();
        with_bg.canvas.background = Background::Image {
            src: "gone.png".into(),
        };
        let resources = builtin_resources();
        let layout = LayoutEngine::new().layout(&with_bg, &resources).unwrap();
        assert!(matches!(
            paint(&with_bg, &layout, &resources),
            Err(AfficheError::Image { .. })
        ));
    }

    #[test]
    fn test_save_picks_format_from_extension() {
        let dir = tempfile::tempdir().unwrap();
        let image = RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));

        let png = dir.path().join("poster.png");
        save(&image, &png).unwrap();
        assert_eq!(image::ImageFormat::from_path(&png).unwrap(), image::ImageFormat::Png);
        assert_eq!(image::open(&png).unwrap().to_rgba8().get_pixel(0, 0).0, [10, 20, 30, 255]);

        let jpg = dir.path().join("poster.JPG");
        save(&image, &jpg).unwrap();
        let bytes = std::fs::read(&jpg).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(image::open(&jpg).unwrap().to_rgb8().dimensions(), (4, 3));
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let image = RgbaImage::new(1, 1);
        let result = save(&image, Path::new("/no/such/dir/poster.png"));
        assert!(matches!(result, Err(AfficheError::Encode(_))));
    }
}
