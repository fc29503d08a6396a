//! Everything a document needs loaded before layout: its fonts and images.

use crate::error::AfficheError;
use crate::font::{FontContext, FontLibrary};
use crate::image_loader::ImageStore;
use crate::layout::Measure;
use crate::model::Document;
use crate::text::{self, TextExtent};

/// Loaded fonts and images for one document. Read-only once built.
#[derive(Debug, Default)]
pub struct Resources {
    pub fonts: FontContext,
    pub images: ImageStore,
}

impl Resources {
    /// Load every font and image the document references.
    ///
    /// Missing fonts degrade to the built-in face. Missing images are errors.
    pub fn load(document: &Document, library: &FontLibrary) -> Result<Self, AfficheError> {
        let fonts = FontContext::load(library, document.font_ids());
        let images = ImageStore::load(document.image_sources())?;
        Ok(Self { fonts, images })
    }
}

impl Measure for Resources {
    fn text_extent(&self, text: &str, font_id: &str, font_size: f64) -> TextExtent {
        text::measure(&self.fonts, text, font_id, font_size)
    }

    fn image_size(&self, src: &str) -> Result<(u32, u32), AfficheError> {
        Ok(self.images.get(src)?.dimensions())
    }
}
