//! # Vertical Composition
//!
//! Last layout stage. Each element gets its final rendered height (measured
//! glyph box for text, fitted box for images, allotment for blanks), the
//! whole stack is centered vertically in the usable area, and one walk down
//! the list assigns positions.
//!
//! When content is taller than the usable area the slack goes negative and
//! the stack overflows evenly past the top and bottom margins.

use super::fit::FontPlan;
use super::height::HeightPlan;
use super::{Layout, LayoutConfig, Measure, PlacedElement, PlacedKind};
use crate::error::AfficheError;
use crate::model::{Area, Document, Element, ImageElement};
use crate::style::Alignment;

/// An element's box before the vertical position is known.
struct ElementBox {
    kind: PlacedKind,
    x: f64,
    width: f64,
    height: f64,
}

pub fn compose(
    document: &Document,
    heights: &HeightPlan,
    fonts: &FontPlan,
    area: &Area,
    config: &LayoutConfig,
    measure: &impl Measure,
) -> Result<Layout, AfficheError> {
    let canvas_width = f64::from(document.canvas.width);

    let mut sized = Vec::with_capacity(document.elements.len());
    for (i, element) in document.elements.iter().enumerate() {
        let allotted = heights.allotments[i].height();
        let item = match element {
            Element::Text(line) => {
                let font_size = fonts.font_sizes[i].unwrap_or(config.min_font_size);
                let extent = measure.text_extent(&line.text, &line.font, font_size);
                let x = match line.alignment {
                    Alignment::Start => area.margin_x,
                    Alignment::Center => (canvas_width - extent.width) / 2.0,
                    Alignment::End => canvas_width - area.margin_x - extent.width,
                };
                ElementBox {
                    kind: PlacedKind::Text { font_size },
                    x,
                    width: extent.width,
                    height: extent.height,
                }
            }
            Element::Image(image) => {
                let (width, height) = fit_image(image, allotted, area, measure)?;
                ElementBox {
                    kind: PlacedKind::Image,
                    x: (canvas_width - width) / 2.0,
                    width,
                    height,
                }
            }
            Element::Blank => ElementBox {
                kind: PlacedKind::Blank,
                x: area.margin_x,
                width: 0.0,
                height: allotted,
            },
        };
        sized.push(item);
    }

    let total_height: f64 = sized.iter().map(|s| s.height).sum();
    let slack = area.height - total_height;
    if slack < 0.0 {
        log::warn!(
            "content is {:.0}px taller than the usable area and will overflow the margins",
            -slack
        );
    }

    let mut cursor = area.margin_y + slack / 2.0;
    let elements = sized
        .into_iter()
        .enumerate()
        .map(|(index, s)| {
            let placed = PlacedElement {
                index,
                kind: s.kind,
                x: s.x,
                y: cursor,
                width: s.width,
                height: s.height,
            };
            cursor += s.height;
            placed
        })
        .collect();

    Ok(Layout {
        canvas_width: document.canvas.width,
        canvas_height: document.canvas.height,
        area: *area,
        total_height,
        slack,
        elements,
    })
}

/// Scale an image to fit inside its box, keeping the aspect ratio.
///
/// The box is the explicit width (capped at the usable width) or the usable
/// width, by the allotted height. Images only grow past their natural size
/// when the line asks for a `width` or `height`.
fn fit_image(
    image: &ImageElement,
    allotted: f64,
    area: &Area,
    measure: &impl Measure,
) -> Result<(f64, f64), AfficheError> {
    let (sw, sh) = measure.image_size(&image.src)?;
    if sw == 0 || sh == 0 {
        return Ok((0.0, 0.0));
    }
    let box_width = image
        .width
        .map_or(area.width, |w| w.resolve(area.width))
        .min(area.width);
    let box_height = allotted.max(0.0);

    let mut scale = (box_width / f64::from(sw)).min(box_height / f64::from(sh));
    if image.width.is_none() && image.height.is_none() {
        scale = scale.min(1.0);
    }
    Ok(((f64::from(sw) * scale).round(), (f64::from(sh) * scale).round()))
}
