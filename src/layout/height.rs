//! # Height Resolution
//!
//! First layout stage. Every element is either *explicit* (its height is
//! known from what the author wrote, or from measuring an auto-fit line) or
//! *implicit* (it gets a weighted share of whatever height is left).
//!
//! Auto-fit lines are solved here, before the leftover is computed, because
//! their height comes out of text measurement rather than allocation.

use super::fit::solve_autofit;
use super::{LayoutConfig, Measure};
use crate::error::AfficheError;
use crate::model::{Area, Document, Element, ImageElement, TextLine, TextSize};

/// How an element's layout height was decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Allotment {
    Explicit(f64),
    /// A share of the leftover height. For text this is only a budget that
    /// seeds font fitting, not the final rendered height.
    Implicit { weight: f64, height: f64 },
}

impl Allotment {
    pub fn height(&self) -> f64 {
        match *self {
            Allotment::Explicit(h) => h,
            Allotment::Implicit { height, .. } => height,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Allotment::Explicit(_))
    }
}

/// Output of height resolution, one allotment per document element.
#[derive(Debug, Clone)]
pub struct HeightPlan {
    pub allotments: Vec<Allotment>,
    /// Font sizes already final after this stage (`Npx` and auto-fit lines).
    pub fixed_font_sizes: Vec<Option<f64>>,
    pub explicit_total: f64,
    /// Height shared by implicit elements. Never negative.
    pub leftover: f64,
    pub unit_height: f64,
}

/// Classify every element and allocate leftover height by weight.
pub fn resolve_heights(
    document: &Document,
    area: &Area,
    config: &LayoutConfig,
    measure: &impl Measure,
) -> Result<HeightPlan, AfficheError> {
    let count = document.elements.len();
    let mut explicit: Vec<Option<f64>> = vec![None; count];
    let mut fixed_font_sizes: Vec<Option<f64>> = vec![None; count];

    for (i, element) in document.elements.iter().enumerate() {
        match element {
            Element::Text(line) => match line.size {
                TextSize::Height(dim) => explicit[i] = Some(dim.resolve(area.height)),
                TextSize::FontPx(px) => {
                    let extent = measure.text_extent(&line.text, &line.font, px);
                    fixed_font_sizes[i] = Some(px);
                    explicit[i] = Some(extent.height);
                }
                TextSize::Auto | TextSize::Biggest => {}
            },
            Element::Image(image) => explicit[i] = explicit_image_height(image, area, measure)?,
            Element::Blank => {}
        }
    }

    // Auto-fit lines, after everything the author sized directly.
    for (i, element) in document.elements.iter().enumerate() {
        if let Element::Text(line @ TextLine { size: TextSize::Biggest, .. }) = element {
            let size = solve_autofit(line, area.width, config, measure);
            fixed_font_sizes[i] = Some(size);
            explicit[i] = Some(measure.text_extent(&line.text, &line.font, size).height);
        }
    }

    let explicit_total: f64 = explicit.iter().flatten().sum();
    let mut leftover = area.height - explicit_total;
    if leftover < 0.0 {
        log::warn!(
            "explicitly sized content is {:.0}px taller than the usable area; \
             implicit elements get no height",
            -leftover
        );
        leftover = 0.0;
    }

    let total_weight: f64 = document
        .elements
        .iter()
        .zip(&explicit)
        .filter(|(_, h)| h.is_none())
        .map(|(el, _)| config.weight(el))
        .sum();
    let unit_height = if total_weight > 0.0 {
        leftover / total_weight
    } else {
        0.0
    };

    let allotments = document
        .elements
        .iter()
        .zip(&explicit)
        .map(|(el, h)| match h {
            Some(h) => Allotment::Explicit(*h),
            None => {
                let weight = config.weight(el);
                Allotment::Implicit {
                    weight,
                    height: unit_height * weight,
                }
            }
        })
        .collect();

    Ok(HeightPlan {
        allotments,
        fixed_font_sizes,
        explicit_total,
        leftover,
        unit_height,
    })
}

/// Height of an image the author sized, or `None` when it shares leftover space.
///
/// A width alone fixes the height too, through the source aspect ratio.
fn explicit_image_height(
    image: &ImageElement,
    area: &Area,
    measure: &impl Measure,
) -> Result<Option<f64>, AfficheError> {
    match (image.height, image.width) {
        (Some(h), _) => Ok(Some(h.resolve(area.height).round())),
        (None, Some(w)) => {
            let (sw, sh) = measure.image_size(&image.src)?;
            if sw == 0 {
                return Ok(Some(0.0));
            }
            let width = w.resolve(area.width).min(area.width);
            Ok(Some((width * f64::from(sh) / f64::from(sw)).round()))
        }
        (None, None) => Ok(None),
    }
}
