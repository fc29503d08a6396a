//! # Poster Layout Engine
//!
//! Turns an ordered list of elements and a fixed canvas into concrete sizes
//! and positions. There is no page flow and no wrapping: the canvas is the
//! whole world, and everything has to be reconciled against it in a single
//! deterministic pass.
//!
//! ## Stages
//!
//! ```text
//! Document ─► [height]  explicit sizes, auto-fit lines, then proportional
//!             │         shares of the leftover height          → HeightPlan
//!             ▼
//!             [fit]     one font size per style group, shrunk so
//!             │         no member overflows the usable width   → FontPlan
//!             ▼
//!             [compose] measured heights, centering slack, and
//!                       a single top-to-bottom placement walk  → Layout
//! ```
//!
//! Each stage reads the document and the records of earlier stages and
//! produces a new record. Nothing is written back into the document, and no
//! stage is revisited.
//!
//! Text and image sizes come from a [`Measure`] implementation, so the
//! engine itself never touches font files or decoders.

pub mod compose;
pub mod fit;
pub mod height;

use serde::Serialize;

use crate::error::AfficheError;
use crate::model::{Area, Document, Element, BLANK_WEIGHT, SIZE_STEP};
use crate::text::TextExtent;

pub use compose::compose;
pub use fit::{fit_font_sizes, FontPlan, GroupFit};
pub use height::{resolve_heights, Allotment, HeightPlan};

/// The measurement service layout depends on.
pub trait Measure {
    /// Rendered box of `text` in font `font_id` at `font_size` pixels.
    fn text_extent(&self, text: &str, font_id: &str, font_size: f64) -> TextExtent;

    /// Intrinsic pixel dimensions of an image source.
    fn image_size(&self, src: &str) -> Result<(u32, u32), AfficheError>;
}

/// Tunables of the sizing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Font size derived from a height budget: `floor(height × ratio)`.
    pub height_to_font: f64,
    /// Size auto-fit lines are first measured at before scaling.
    pub probe_size: f64,
    /// Smallest font size any line is given.
    pub min_font_size: f64,
    /// Weight multiplier per `bigger` step.
    pub size_step: f64,
    /// Weight of a blank spacer.
    pub blank_weight: f64,
}

impl LayoutConfig {
    /// Share of leftover height an element claims when it has no explicit size.
    pub fn weight(&self, element: &Element) -> f64 {
        match element {
            Element::Text(line) => self.size_step.powi(line.size_modifier),
            Element::Image(_) => 1.0,
            Element::Blank => self.blank_weight,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            height_to_font: 0.8,
            probe_size: 1000.0,
            min_font_size: 1.0,
            size_step: SIZE_STEP,
            blank_weight: BLANK_WEIGHT,
        }
    }
}

/// A fully resolved poster: where every element goes and how big it is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub area: Area,
    /// Sum of every element's final height.
    pub total_height: f64,
    /// Usable height minus total height. Negative when content overflows.
    pub slack: f64,
    pub elements: Vec<PlacedElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedElement {
    /// Position of the element in the document.
    pub index: usize,
    pub kind: PlacedKind,
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlacedKind {
    Text {
        #[serde(rename = "fontSize")]
        font_size: f64,
    },
    Image,
    Blank,
}

impl PlacedElement {
    pub fn font_size(&self) -> Option<f64> {
        match self.kind {
            PlacedKind::Text { font_size } => Some(font_size),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Main entry point: lay out a document on its canvas.
    pub fn layout(&self, document: &Document, measure: &impl Measure) -> Result<Layout, AfficheError> {
        let area = document.canvas.area()?;
        document.check_values()?;

        let heights = resolve_heights(document, &area, &self.config, measure)?;
        log::debug!(
            "heights: explicit {:.1}px, leftover {:.1}px, unit {:.2}px",
            heights.explicit_total,
            heights.leftover,
            heights.unit_height
        );

        let fonts = fit_font_sizes(document, &heights, &area, &self.config, measure);
        for group in &fonts.groups {
            log::debug!(
                "style group (modifier {}, font '{}'): {} line(s) at {}px",
                group.key.size_modifier,
                group.key.font,
                group.members.len(),
                group.font_size
            );
        }

        let layout = compose(document, &heights, &fonts, &area, &self.config, measure)?;
        log::debug!(
            "composed {} element(s), total {:.1}px, slack {:.1}px",
            layout.elements.len(),
            layout.total_height,
            layout.slack
        );
        Ok(layout)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::Measure;
    use crate::error::AfficheError;
    use crate::font::builtin;
    use crate::text::TextExtent;

    /// Built-in font metrics for every font, plus a table of image sizes.
    #[derive(Default)]
    pub(crate) struct StubMeasure {
        pub images: HashMap<String, (u32, u32)>,
    }

    impl StubMeasure {
        pub fn with_image(mut self, src: &str, w: u32, h: u32) -> Self {
            self.images.insert(src.to_string(), (w, h));
            self
        }
    }

    impl Measure for StubMeasure {
        fn text_extent(&self, text: &str, _font_id: &str, font_size: f64) -> TextExtent {
            TextExtent {
                width: builtin::text_width(text, font_size),
                height: builtin::text_height(text, font_size),
            }
        }

        fn image_size(&self, src: &str) -> Result<(u32, u32), AfficheError> {
            self.images
                .get(src)
                .copied()
                .ok_or_else(|| AfficheError::image(src, "not in stub"))
        }
    }
}
