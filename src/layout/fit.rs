//! # Font-Size Fitting
//!
//! Second layout stage. Lines that share a style key (size modifier plus
//! font) are rendered at one shared size, so a poster reads as a set of
//! consistent tiers instead of every line at its own size.
//!
//! Each member proposes a candidate from its height budget, shrunk until it
//! fits the usable width. The group takes the smallest candidate, which
//! keeps every member inside the width.

use super::height::HeightPlan;
use super::{LayoutConfig, Measure};
use crate::model::{Area, Document, Element, StyleKey, TextLine};

/// One style group and the size its members share.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupFit {
    pub key: StyleKey,
    pub font_size: f64,
    /// Element indices, in document order.
    pub members: Vec<usize>,
}

/// Output of font fitting. `font_sizes[i]` is `Some` for every text element.
#[derive(Debug, Clone)]
pub struct FontPlan {
    pub font_sizes: Vec<Option<f64>>,
    pub groups: Vec<GroupFit>,
}

pub fn fit_font_sizes(
    document: &Document,
    heights: &HeightPlan,
    area: &Area,
    config: &LayoutConfig,
    measure: &impl Measure,
) -> FontPlan {
    let mut font_sizes = heights.fixed_font_sizes.clone();
    let mut groups: Vec<GroupFit> = Vec::new();

    for (i, element) in document.elements.iter().enumerate() {
        let Element::Text(line) = element else {
            continue;
        };
        if heights.fixed_font_sizes[i].is_some() {
            continue;
        }
        let budget = heights.allotments[i].height();
        let candidate = candidate_size(line, budget, area.width, config, measure);

        let key = line.style_key();
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => {
                group.font_size = group.font_size.min(candidate);
                group.members.push(i);
            }
            None => groups.push(GroupFit {
                key,
                font_size: candidate,
                members: vec![i],
            }),
        }
    }

    for group in &groups {
        for &i in &group.members {
            font_sizes[i] = Some(group.font_size);
        }
    }

    FontPlan { font_sizes, groups }
}

/// Largest whole font size within a height budget whose width fits.
fn candidate_size(
    line: &TextLine,
    budget: f64,
    usable_width: f64,
    config: &LayoutConfig,
    measure: &impl Measure,
) -> f64 {
    let min = config.min_font_size;
    let mut size = (budget * config.height_to_font).floor().max(min);

    let width = measure.text_extent(&line.text, &line.font, size).width;
    if width <= usable_width || width <= 0.0 {
        return size;
    }

    size = (size * usable_width / width).floor().max(min);
    // Shaping is not perfectly linear in size; step down until it really fits.
    while size > min && measure.text_extent(&line.text, &line.font, size).width > usable_width {
        size -= 1.0;
    }
    size.max(min)
}

/// Solve an auto-fit line's font size so it spans the usable width.
///
/// Measures once at the probe size and scales linearly. The result is not
/// rounded, so the fill is as close to exact as the font's scaling allows.
pub fn solve_autofit(
    line: &TextLine,
    usable_width: f64,
    config: &LayoutConfig,
    measure: &impl Measure,
) -> f64 {
    let probe = config.probe_size;
    let width = measure.text_extent(&line.text, &line.font, probe).width;
    if width <= 0.0 {
        log::warn!(
            "cannot fit '{}' to the width: it has no measurable width",
            line.text
        );
        return config.min_font_size;
    }
    (probe * usable_width / width).max(config.min_font_size)
}
