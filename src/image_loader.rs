//! # Image Loading and Decoding
//!
//! Loads images from file paths or `data:` URIs. PNG, JPEG and WebP are
//! decoded to straight-alpha RGBA with the `image` crate; SVG is parsed into
//! vector commands and rasterized later at whatever size layout decides.
//!
//! Every image a document references is loaded before layout starts. A
//! source that can't be read is a hard error: layout needs real dimensions.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use image::RgbaImage;

use crate::error::AfficheError;
use crate::svg::SvgImage;

/// A decoded image.
#[derive(Debug, Clone)]
pub enum LoadedImage {
    Raster(RgbaImage),
    Vector(SvgImage),
}

impl LoadedImage {
    /// Intrinsic pixel dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            LoadedImage::Raster(img) => img.dimensions(),
            LoadedImage::Vector(svg) => svg.dimensions(),
        }
    }
}

/// Every image of one document, keyed by source string.
#[derive(Debug, Default)]
pub struct ImageStore {
    images: HashMap<String, LoadedImage>,
}

impl ImageStore {
    /// Load all sources, failing on the first one that can't be loaded.
    pub fn load<'a>(sources: impl IntoIterator<Item = &'a str>) -> Result<Self, AfficheError> {
        let mut images = HashMap::new();
        for src in sources {
            if images.contains_key(src) {
                continue;
            }
            let image = load_image(src)?;
            let (w, h) = image.dimensions();
            log::debug!("image '{src}' loaded ({w}x{h})");
            images.insert(src.to_string(), image);
        }
        Ok(Self { images })
    }

    pub fn insert(&mut self, src: &str, image: LoadedImage) {
        self.images.insert(src.to_string(), image);
    }

    pub fn get(&self, src: &str) -> Result<&LoadedImage, AfficheError> {
        self.images
            .get(src)
            .ok_or_else(|| AfficheError::image(src, "image was not loaded before layout"))
    }
}

/// Load an image from a source string.
///
/// Supported `src` formats:
/// - `data:image/...;base64,...`: data URI
/// - anything else: a file path
pub fn load_image(src: &str) -> Result<LoadedImage, AfficheError> {
    let raw_bytes = read_source_bytes(src)?;
    decode_image_bytes(&raw_bytes).map_err(|reason| AfficheError::image(src, reason))
}

/// Resolve the source string to raw image bytes.
fn read_source_bytes(src: &str) -> Result<Vec<u8>, AfficheError> {
    // Data URI: data:image/png;base64,iVBOR...
    if src.starts_with("data:image/") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| AfficheError::image(src, "invalid data URI: missing comma"))?;
        return base64_decode(&src[comma_pos + 1..]).map_err(|reason| AfficheError::image(src, reason));
    }

    std::fs::read(Path::new(src)).map_err(|e| AfficheError::image(src, e.to_string()))
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| format!("base64 decode error: {e}"))
}

/// Detect the image format from its leading bytes and decode accordingly.
fn decode_image_bytes(data: &[u8]) -> Result<LoadedImage, String> {
    if data.len() < 4 {
        return Err("image data too short".to_string());
    }

    if is_jpeg(data) || is_png(data) || is_webp(data) {
        decode_raster(data)
    } else if is_svg(data) {
        let text = std::str::from_utf8(data).map_err(|_| "SVG is not valid UTF-8".to_string())?;
        SvgImage::parse(text).map(LoadedImage::Vector)
    } else {
        Err("unsupported image format (expected PNG, JPEG, WebP or SVG)".to_string())
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.len() >= 4 && data[0] == 0x89 && data[1] == 0x50 && data[2] == 0x4E && data[3] == 0x47
}

fn is_webp(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP"
}

/// SVG is text: skip a BOM and leading whitespace, then look for markup.
fn is_svg(data: &[u8]) -> bool {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    let start = data.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(data.len());
    let head = &data[start..data.len().min(start + 512)];
    head.starts_with(b"<svg")
        || ((head.starts_with(b"<?xml") || head.starts_with(b"<!--"))
            && head.windows(4).any(|w| w == b"<svg"))
}

fn decode_raster(data: &[u8]) -> Result<LoadedImage, String> {
    let reader = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("format detection error: {e}"))?;
    let img = reader.decode().map_err(|e| format!("failed to decode: {e}"))?;
    Ok(LoadedImage::Raster(img.to_rgba8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), w, h, image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    #[test]
    fn test_is_jpeg() {
        assert!(is_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_jpeg(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!is_jpeg(&[0xFF]));
    }

    #[test]
    fn test_is_png() {
        assert!(is_png(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!is_png(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_png(&[0x89, 0x50]));
    }

    #[test]
    fn test_is_svg() {
        assert!(is_svg(b"  <svg xmlns='http://www.w3.org/2000/svg'/>"));
        assert!(is_svg(b"<?xml version=\"1.0\"?>\n<svg></svg>"));
        assert!(!is_svg(b"<html></html>"));
    }

    #[test]
    fn test_invalid_data_uri() {
        assert!(load_image("data:image/png;base64").is_err());
    }

    #[test]
    fn test_missing_file_is_image_error() {
        let err = load_image("/no/such/poster-logo.png").unwrap_err();
        assert!(matches!(err, AfficheError::Image { .. }));
    }

    #[test]
    fn test_too_short_data() {
        assert!(decode_image_bytes(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_unsupported_format() {
        assert!(decode_image_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04]).is_err());
    }

    #[test]
    fn test_decode_png_dimensions() {
        let loaded = decode_image_bytes(&png_bytes(3, 2)).unwrap();
        assert_eq!(loaded.dimensions(), (3, 2));
        match loaded {
            LoadedImage::Raster(img) => assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]),
            LoadedImage::Vector(_) => panic!("PNG should decode to a raster"),
        }
    }

    #[test]
    fn test_decode_minimal_jpeg() {
        let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 2, image::ColorType::Rgb8)
            .unwrap();
        assert_eq!(decode_image_bytes(&buf).unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn test_base64_data_uri() {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes(1, 1));
        let loaded = load_image(&format!("data:image/png;base64,{b64}")).unwrap();
        assert_eq!(loaded.dimensions(), (1, 1));
    }

    #[test]
    fn test_svg_file_loads_as_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.svg");
        std::fs::write(&path, r#"<svg width="40" height="20"></svg>"#).unwrap();
        let loaded = load_image(path.to_str().unwrap()).unwrap();
        assert!(matches!(loaded, LoadedImage::Vector(_)));
        assert_eq!(loaded.dimensions(), (40, 20));
    }

    #[test]
    fn test_store_reports_unloaded_source() {
        let store = ImageStore::default();
        assert!(store.get("never.png").is_err());
    }
}
