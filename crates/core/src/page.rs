//! Page driver: input validation, orientation partitioning and the layout
//! pipeline from marks to ordered paragraphs.

use rayon::prelude::*;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::Rect;
use crate::layout::{
    Paragraph, compose_lines, divide_into_paragraphs, extend_bboxes, make_words,
    order_paragraphs,
};
use crate::mark::{Mark, Orientation};
use crate::orient::{mark_to_upright, path_to_upright, rect_from_upright, rect_to_upright};
use crate::params::LayoutParams;
use crate::table::{
    Grid, Ruling, SubPath, build_ruled_tables, detect_tables, extract_rulings, find_grids,
};
use crate::text::{PageText, emit_page};

/// Everything the interpreter delivers for one page.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageInput {
    #[cfg_attr(feature = "serde", serde(default))]
    pub page: usize,
    pub bbox: Rect,
    #[cfg_attr(feature = "serde", serde(default))]
    pub marks: Vec<Mark>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strokes: Vec<SubPath>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fills: Vec<SubPath>,
}

impl PageInput {
    pub fn new(page: usize, bbox: Rect, marks: Vec<Mark>) -> Self {
        Self {
            page,
            bbox,
            marks,
            strokes: Vec::new(),
            fills: Vec::new(),
        }
    }

    pub fn with_paths(mut self, strokes: Vec<SubPath>, fills: Vec<SubPath>) -> Self {
        self.strokes = strokes;
        self.fills = fills;
        self
    }

    /// Rejects non-finite numbers and inverted rectangles.
    pub fn validate(&self) -> Result<()> {
        check_rect("page", &self.bbox)?;
        for mark in &self.marks {
            check_rect("mark", &mark.bbox)?;
            check_finite("font size", mark.font_size)?;
        }
        for path in self.strokes.iter().chain(&self.fills) {
            for &(x, y) in &path.points {
                check_finite("path x", x)?;
                check_finite("path y", y)?;
            }
        }
        Ok(())
    }

    /// Fails if the marks are not all in one orientation.
    fn check_orientation(&self) -> Result<()> {
        let Some(first) = self.marks.first() else {
            return Ok(());
        };
        match self.marks.iter().find(|m| m.orientation != first.orientation) {
            Some(other) => Err(LayoutError::MixedOrientation {
                expected: first.orientation,
                found: other.orientation,
            }),
            None => Ok(()),
        }
    }
}

fn check_finite(what: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LayoutError::NonFinite { what, value })
    }
}

fn check_rect(what: &'static str, rect: &Rect) -> Result<()> {
    for v in [rect.llx, rect.lly, rect.urx, rect.ury] {
        check_finite(what, v)?;
    }
    if rect.is_valid() {
        Ok(())
    } else {
        Err(LayoutError::InvalidRect { what, rect: *rect })
    }
}

/// The analysed layout of one upright page.
#[derive(Clone, Debug)]
pub struct PageLayout {
    page: usize,
    bbox: Rect,
    paragraphs: Vec<Paragraph>,
    rulings: Vec<Ruling>,
    grids: Vec<Grid>,
}

impl PageLayout {
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// Paragraphs in reading order. Tables appear as table paragraphs.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn rulings(&self) -> &[Ruling] {
        &self.rulings
    }

    pub fn grids(&self) -> &[Grid] {
        &self.grids
    }

    pub fn to_text(&self, params: &LayoutParams) -> PageText {
        emit_page(self.page, &self.paragraphs, params)
    }
}

/// Runs the layout pipeline on a page whose marks share one orientation
/// and are already upright.
///
/// # Panics
///
/// Panics if the marks are in more than one orientation. Use
/// [`extract_page`] for pages that may mix them.
pub fn analyze_page(input: &PageInput, params: &LayoutParams) -> PageLayout {
    if let Err(err) = input.check_orientation() {
        panic!("{err}; partition marks by orientation first");
    }
    let top = input.bbox.ury;

    let words = make_words(&input.marks, top, params);
    let bags = divide_into_paragraphs(&words, top, params);
    let bag_count = bags.len();
    let mut paragraphs: Vec<Paragraph> = bags
        .into_iter()
        .filter_map(|bag| {
            debug_assert!(!bag.is_empty(), "empty paragraph bag");
            Paragraph::from_lines(compose_lines(&words, bag, top, params))
        })
        .collect();
    debug!(
        marks = input.marks.len(),
        words = words.len(),
        bags = bag_count,
        lines = paragraphs.iter().map(|p| p.lines().len()).sum::<usize>(),
        "composed paragraphs"
    );

    let rulings = extract_rulings(&input.strokes, &input.fills, params);
    let grids = find_grids(&rulings, params.ruling_tol);
    debug!(rulings = rulings.len(), grids = grids.len(), "rulings");

    let mut ruled = Vec::new();
    if params.use_ruled_tables && !grids.is_empty() {
        let (tables, free) = build_ruled_tables(&grids, paragraphs, params);
        ruled = tables;
        paragraphs = free;
    }
    if params.detect_tables {
        let blocked: Vec<Rect> = ruled.iter().map(Paragraph::bbox).collect();
        paragraphs = detect_tables(paragraphs, &blocked, params);
    }
    paragraphs.extend(ruled);

    extend_bboxes(&mut paragraphs);
    let paragraphs = order_paragraphs(paragraphs);
    debug!(
        page = input.page,
        paragraphs = paragraphs.len(),
        tables = paragraphs.iter().filter(|p| p.is_table()).count(),
        "page laid out"
    );

    PageLayout {
        page: input.page,
        bbox: input.bbox,
        paragraphs,
        rulings,
        grids,
    }
}

/// Like [`analyze_page`] but validates the input and reports mixed
/// orientations as an error.
pub fn try_analyze_page(input: &PageInput, params: &LayoutParams) -> Result<PageLayout> {
    params.validate()?;
    input.validate()?;
    input.check_orientation()?;
    Ok(analyze_page(input, params))
}

/// Marks grouped by orientation, in order of first appearance.
fn partition_by_orientation(marks: &[Mark]) -> Vec<(Orientation, Vec<&Mark>)> {
    let mut groups: Vec<(Orientation, Vec<&Mark>)> = Vec::new();
    for mark in marks {
        match groups.iter_mut().find(|(o, _)| *o == mark.orientation) {
            Some((_, group)) => group.push(mark),
            None => groups.push((mark.orientation, vec![mark])),
        }
    }
    groups
}

/// Extracts text from one page of any mix of orientations.
///
/// Each orientation is turned upright, analysed on its own and turned back;
/// the results are joined by blank lines.
pub fn extract_page(input: &PageInput, params: &LayoutParams) -> Result<PageText> {
    params.validate()?;
    input.validate()?;

    let mut out = PageText {
        page: input.page,
        ..PageText::default()
    };
    for (orientation, marks) in partition_by_orientation(&input.marks) {
        let upright = PageInput {
            page: input.page,
            bbox: rect_to_upright(orientation, input.bbox),
            marks: marks
                .into_iter()
                .map(|m| mark_to_upright(orientation, m))
                .collect(),
            strokes: input
                .strokes
                .iter()
                .map(|p| path_to_upright(orientation, p))
                .collect(),
            fills: input
                .fills
                .iter()
                .map(|p| path_to_upright(orientation, p))
                .collect(),
        };
        let mut text = analyze_page(&upright, params).to_text(params);
        if orientation != Orientation::Deg0 {
            text.map_bboxes(|r| rect_from_upright(orientation, r));
        }
        debug!(page = input.page, %orientation, chars = text.text.len(), "orientation done");
        out.append(text, input.bbox);
    }
    Ok(out)
}

/// Outcome for one page of a batch.
#[derive(Debug)]
pub struct PageResult {
    pub page: usize,
    pub result: Result<PageText>,
}

/// Extracts pages in parallel. Results keep input order and a failing page
/// does not affect the others.
pub fn extract_pages(inputs: &[PageInput], params: &LayoutParams) -> Vec<PageResult> {
    inputs
        .par_iter()
        .map(|input| PageResult {
            page: input.page,
            result: extract_page(input, params),
        })
        .collect()
}
