//! Page text output: the emitted string, its marks and its tables.

mod emit;
mod marks;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::geometry::Rect;

pub use emit::emit_page;
pub use marks::{TextMark, TextMarkArray};

/// Extracted text for one page.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PageText {
    pub page: usize,
    pub text: String,
    pub marks: TextMarkArray,
    pub tables: Vec<TextTable>,
}

/// A table as emitted. `cells[y][x]`, row 0 at the top.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TextTable {
    pub bbox: Rect,
    pub w: usize,
    pub h: usize,
    pub cells: Vec<Vec<TableCell>>,
}

/// One table cell. Mark offsets are relative to the cell text. Empty cells
/// have no bbox.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TableCell {
    pub text: String,
    pub bbox: Option<Rect>,
    pub marks: TextMarkArray,
}

impl PageText {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Appends `other`, separated by a blank line when both have text.
    pub fn append(&mut self, other: PageText, separator_bbox: Rect) {
        if other.is_empty() && other.tables.is_empty() {
            return;
        }
        if !self.is_empty() && !other.is_empty() {
            self.marks
                .push(TextMark::meta("\n\n", separator_bbox, self.text.len()));
            self.text.push_str("\n\n");
        }
        let shift = self.text.len() as isize;
        self.text.push_str(&other.text);
        self.marks.extend(other.marks.shifted(shift));
        self.tables.extend(other.tables);
    }

    /// Applies `f` to every bbox: marks, tables and cells.
    pub(crate) fn map_bboxes(&mut self, f: impl Fn(Rect) -> Rect + Copy) {
        self.marks.map_bboxes(f);
        for table in &mut self.tables {
            table.bbox = f(table.bbox);
            for cell in table.cells.iter_mut().flatten() {
                cell.bbox = cell.bbox.map(f);
                cell.marks.map_bboxes(f);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::Mark;

    fn page(text: &str) -> PageText {
        let mut marks = TextMarkArray::new();
        let m = Mark::new(text, Rect::new(0.0, 0.0, 10.0, 10.0), "F", 10.0);
        marks.push(TextMark::from_mark(&m, text, 0));
        PageText {
            page: 1,
            text: text.to_string(),
            marks,
            tables: Vec::new(),
        }
    }

    #[test]
    fn append_joins_with_blank_line() {
        let mut a = page("up");
        a.append(page("side"), Rect::default());
        assert_eq!(a.text, "up\n\nside");
        assert_eq!(a.marks.text(), a.text);
        assert_eq!(a.marks.elements()[2].offset, 4);
    }

    #[test]
    fn append_to_empty_has_no_separator() {
        let mut a = PageText::default();
        a.append(page("only"), Rect::default());
        assert_eq!(a.text, "only");
        assert_eq!(a.marks.len(), 1);
    }
}
