//! Mark-to-word grouping.
//!
//! Marks arrive in interpreter emission order. Consecutive marks are merged
//! into a word while the reading gap stays below a space width, does not
//! jump back further than kerning allows, and the baseline does not shift.

use crate::geometry::Rect;
use crate::mark::Mark;
use crate::params::LayoutParams;

/// Font size used to scale relative tolerances. Guards against zero-size fonts.
#[inline]
pub(crate) fn size_scale(font_size: f64) -> f64 {
    if font_size > 0.0 { font_size } else { 1.0 }
}

/// A non-empty run of marks read as one word.
#[derive(Clone, Debug, PartialEq)]
pub struct Word {
    marks: Vec<Mark>,
    bbox: Rect,
    font_size: f64,
    depth: f64,
    space_after: bool,
}

impl Word {
    /// Starts a word with a single mark.
    pub fn new(mark: Mark, page_top: f64) -> Self {
        Self {
            bbox: mark.bbox,
            font_size: mark.font_size,
            depth: mark.bbox.depth(page_top),
            marks: vec![mark],
            space_after: false,
        }
    }

    /// Appends a mark, growing the bbox and font size.
    pub fn push(&mut self, mark: Mark, page_top: f64) {
        self.bbox = self.bbox.union(&mark.bbox);
        self.font_size = self.font_size.max(mark.font_size);
        self.depth = self.bbox.depth(page_top);
        self.marks.push(mark);
    }

    /// Appends all marks of `other`. Used to rejoin word fragments.
    pub fn absorb(&mut self, other: Word, page_top: f64) {
        for mark in other.marks {
            self.push(mark, page_top);
        }
        self.space_after = other.space_after;
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn space_after(&self) -> bool {
        self.space_after
    }

    pub(crate) fn set_space_after(&mut self, space_after: bool) {
        self.space_after = space_after;
    }

    pub fn text(&self) -> String {
        self.marks.iter().map(|m| m.text.as_str()).collect()
    }

    pub fn is_whitespace(&self) -> bool {
        self.marks.iter().all(Mark::is_whitespace)
    }

    /// Font of the first mark.
    pub fn first_font(&self) -> &str {
        self.marks.first().map_or("", |m| m.font.as_str())
    }

    /// Font of the last mark.
    pub fn last_font(&self) -> &str {
        self.marks.last().map_or("", |m| m.font.as_str())
    }

    /// Reading gap from the end of this word to the start of `next`.
    pub fn gap_to(&self, next: &Word) -> f64 {
        next.bbox.llx - self.bbox.urx
    }
}

/// Returns true if `mark` must start a new word after `word`.
fn begins_new_word(word: &Word, mark: &Mark, page_top: f64, params: &LayoutParams) -> bool {
    let size = size_scale(word.font_size);
    let reading_gap = mark.bbox.llx - word.bbox.urx;
    let depth_gap = (mark.depth(page_top) - word.depth).abs();
    reading_gap >= params.max_word_advance * size
        || reading_gap < -params.max_kerning * size
        || depth_gap > params.max_leading * size
}

/// Groups marks into words in emission order. Whitespace marks end the
/// current word and are dropped.
pub fn make_words(marks: &[Mark], page_top: f64, params: &LayoutParams) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;

    for mark in marks {
        if mark.is_whitespace() {
            if let Some(word) = current.take() {
                words.push(word);
            }
            continue;
        }
        let extends = current
            .as_ref()
            .is_some_and(|word| !begins_new_word(word, mark, page_top, params));
        if extends {
            if let Some(word) = current.as_mut() {
                word.push(mark.clone(), page_top);
            }
        } else if let Some(word) = current.replace(Word::new(mark.clone(), page_top)) {
            words.push(word);
        }
    }
    if let Some(word) = current {
        words.push(word);
    }

    words.retain(|w| !w.is_whitespace());
    words
}
