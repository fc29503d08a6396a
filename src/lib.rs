//! # Affiche
//!
//! A poster renderer. Write a few lines of plain markup, get one fixed-size
//! image back with every line sized to fill the space.
//!
//! Most text renderers start from a font size and let the content decide how
//! tall the result is. A poster is the other way around: the canvas is fixed
//! and the content has to be fitted into it. Affiche treats the canvas as the
//! hard constraint. Free height is shared out by weight, each tier of lines
//! gets the biggest font size that still fits the width, and whatever is left
//! over centers the stack.
//!
//! ## Architecture
//!
//! ```text
//! Input (markup or JSON)
//!       ↓
//!   [markup]   : Lines, directives and attributes → Document
//!       ↓
//!   [font]     : Font library lookup, faces loaded once per document
//!   [image_loader] : Every referenced image decoded up front
//!       ↓
//!   [layout]   : Heights → font sizes → positions
//!       ↓
//!   [raster]   : Paint with tiny-skia, encode PNG or JPEG
//! ```

pub mod error;
pub mod font;
pub mod image_loader;
pub mod layout;
pub mod markup;
pub mod model;
pub mod raster;
pub mod resources;
pub mod style;
pub mod svg;
pub mod text;

pub use error::AfficheError;

use std::path::Path;

use image::RgbaImage;

use font::FontLibrary;
use layout::{Layout, LayoutEngine};
use markup::MarkupParser;
use model::Document;
use resources::Resources;

/// A rendered poster and the layout it was painted from.
#[derive(Debug)]
pub struct RenderedPoster {
    pub image: RgbaImage,
    pub layout: Layout,
}

impl RenderedPoster {
    /// Encode to `path`; the extension picks PNG or JPEG.
    pub fn save(&self, path: &Path) -> Result<(), AfficheError> {
        raster::save(&self.image, path)
    }
}

/// Render a document.
///
/// This is the primary entry point. Fonts are looked up in `fonts`; any that
/// can't be found render with the built-in face. Images are loaded before
/// layout, so a missing image fails the render before anything is painted.
pub fn render(document: &Document, fonts: &FontLibrary) -> Result<RenderedPoster, AfficheError> {
    let resources = Resources::load(document, fonts)?;
    let layout = LayoutEngine::new().layout(document, &resources)?;
    let pixmap = raster::paint(document, &layout, &resources)?;
    let image = raster::to_rgba_image(&pixmap)?;
    Ok(RenderedPoster { image, layout })
}

/// Render a document described as JSON.
pub fn render_json(json: &str, fonts: &FontLibrary) -> Result<RenderedPoster, AfficheError> {
    let document: Document = serde_json::from_str(json)?;
    render(&document, fonts)
}

/// Render poster markup. Relative paths resolve against `base_dir`.
pub fn render_markup(
    source: &str,
    base_dir: &Path,
    fonts: &FontLibrary,
) -> Result<RenderedPoster, AfficheError> {
    let document = MarkupParser::new(fonts).base_dir(base_dir).parse(source)?;
    render(&document, fonts)
}
