//! Marks aligned to emitted text.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::geometry::{Rect, union_all};
use crate::mark::{Color, Mark};

/// One emitted text fragment and where it came from.
///
/// `offset` is a byte offset into the page text. Separators the emitter
/// inserts have `meta` set and carry no colours.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextMark {
    pub text: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub original: Vec<u8>,
    pub bbox: Rect,
    pub font: String,
    pub font_size: f64,
    pub offset: usize,
    pub meta: bool,
    pub fill_color: Color,
    pub stroke_color: Color,
}

impl TextMark {
    pub(crate) fn from_mark(mark: &Mark, text: &str, offset: usize) -> Self {
        Self {
            text: text.to_string(),
            original: mark.original.clone(),
            bbox: mark.bbox,
            font: mark.font.clone(),
            font_size: mark.font_size,
            offset,
            meta: false,
            fill_color: mark.fill_color.clone(),
            stroke_color: mark.stroke_color.clone(),
        }
    }

    pub(crate) fn meta(text: &str, bbox: Rect, offset: usize) -> Self {
        Self {
            text: text.to_string(),
            original: Vec::new(),
            bbox,
            font: String::new(),
            font_size: 0.0,
            offset,
            meta: true,
            fill_color: None,
            stroke_color: None,
        }
    }

    /// Byte offset just past this mark's text.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Marks in emission order with strictly increasing offsets.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TextMarkArray {
    marks: Vec<TextMark>,
}

impl TextMarkArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mark: TextMark) {
        debug_assert!(self.marks.last().is_none_or(|m| m.end() <= mark.offset));
        self.marks.push(mark);
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn elements(&self) -> &[TextMark] {
        &self.marks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TextMark> {
        self.marks.iter()
    }

    /// Marks whose text overlaps the byte range `[start, end)`.
    pub fn range_offset(&self, start: usize, end: usize) -> TextMarkArray {
        let first = self.marks.partition_point(|m| m.end() <= start);
        let marks = self.marks[first..]
            .iter()
            .take_while(|m| m.offset < end)
            .cloned()
            .collect();
        TextMarkArray { marks }
    }

    /// Smallest rectangle holding every non-meta mark in `[start, end)`.
    pub fn bbox_range_offset(&self, start: usize, end: usize) -> Option<Rect> {
        let range = self.range_offset(start, end);
        let rects: Vec<Rect> = range.iter().filter(|m| !m.meta).map(|m| m.bbox).collect();
        union_all(&rects)
    }

    /// Concatenated text of all marks.
    pub fn text(&self) -> String {
        self.marks.iter().map(|m| m.text.as_str()).collect()
    }

    /// Copy of the marks from index `first` on.
    pub(crate) fn slice_from(&self, first: usize) -> TextMarkArray {
        TextMarkArray {
            marks: self.marks[first.min(self.marks.len())..].to_vec(),
        }
    }

    /// Moves every offset by `delta` bytes.
    pub(crate) fn shifted(mut self, delta: isize) -> Self {
        for m in &mut self.marks {
            m.offset = m.offset.saturating_add_signed(delta);
        }
        self
    }

    pub(crate) fn extend(&mut self, other: TextMarkArray) {
        for m in other.marks {
            self.push(m);
        }
    }

    pub(crate) fn map_bboxes(&mut self, f: impl Fn(Rect) -> Rect) {
        for m in &mut self.marks {
            m.bbox = f(m.bbox);
        }
    }
}

impl<'a> IntoIterator for &'a TextMarkArray {
    type Item = &'a TextMark;
    type IntoIter = std::slice::Iter<'a, TextMark>;

    fn into_iter(self) -> Self::IntoIter {
        self.marks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array() -> TextMarkArray {
        let mut arr = TextMarkArray::new();
        let a = Mark::new("ab", Rect::new(0.0, 0.0, 10.0, 10.0), "F", 10.0);
        let c = Mark::new("c", Rect::new(15.0, 0.0, 20.0, 12.0), "F", 10.0);
        arr.push(TextMark::from_mark(&a, "ab", 0));
        arr.push(TextMark::meta(" ", Rect::new(100.0, 100.0, 200.0, 200.0), 2));
        arr.push(TextMark::from_mark(&c, "c", 3));
        arr
    }

    #[test]
    fn range_selects_overlapping_marks() {
        let arr = array();
        assert_eq!(arr.range_offset(1, 3).text(), "ab ");
        assert_eq!(arr.range_offset(3, 4).text(), "c");
        assert!(arr.range_offset(4, 10).is_empty());
        assert!(arr.range_offset(2, 2).is_empty());
    }

    #[test]
    fn bbox_skips_meta_marks() {
        let arr = array();
        assert_eq!(arr.bbox_range_offset(0, 4), Some(Rect::new(0.0, 0.0, 20.0, 12.0)));
        assert_eq!(arr.bbox_range_offset(2, 3), None);
    }

    #[test]
    fn shifting_moves_offsets() {
        let arr = array().shifted(5);
        let offsets: Vec<usize> = arr.iter().map(|m| m.offset).collect();
        assert_eq!(offsets, vec![5, 7, 8]);
    }
}
