//! Paragraphs: composed lines or a whole table.

use crate::geometry::{Rect, union_all};
use crate::table::Table;

use super::line::{Line, sort_lines};

#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    lines: Vec<Line>,
    bbox: Rect,
    ebbox: Rect,
    font_size: f64,
    table: Option<Box<Table>>,
}

impl Paragraph {
    /// A text paragraph. Lines are re-sorted by depth then x.
    ///
    /// Returns `None` when `lines` is empty.
    pub fn from_lines(mut lines: Vec<Line>) -> Option<Self> {
        sort_lines(&mut lines);
        let rects: Vec<Rect> = lines.iter().map(Line::bbox).collect();
        let bbox = union_all(&rects)?;
        let font_size = lines.iter().map(Line::font_size).fold(0.0, f64::max);
        Some(Self {
            lines,
            bbox,
            ebbox: bbox,
            font_size,
            table: None,
        })
    }

    /// A paragraph standing for a whole table. It has no lines of its own.
    pub fn from_table(table: Table) -> Self {
        let bbox = table.bbox();
        Self {
            lines: Vec::new(),
            bbox,
            ebbox: bbox,
            font_size: table.font_size(),
            table: Some(Box::new(table)),
        }
    }

    /// Joins text paragraphs into one. Table paragraphs are not merged and
    /// are returned as-is when alone.
    pub fn merge(paras: Vec<Paragraph>) -> Option<Self> {
        if paras.len() == 1 {
            return paras.into_iter().next();
        }
        let lines: Vec<Line> = paras
            .into_iter()
            .filter(|p| !p.is_table())
            .flat_map(|p| p.lines)
            .collect();
        Self::from_lines(lines)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// Bbox widened into neighbour-free space. Only reading order uses it.
    pub fn ebbox(&self) -> Rect {
        self.ebbox
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_deref()
    }

    pub fn is_table(&self) -> bool {
        self.table.is_some()
    }
}

fn strictly_y_overlap(a: &Rect, b: &Rect) -> bool {
    a.lly < b.ury && b.lly < a.ury
}

/// Computes extended bboxes for all paragraphs.
///
/// Each paragraph gets a horizontal corridor bounded by the nearest
/// paragraphs beside it, then widens to cover paragraphs below it that
/// overlap it in x and fit in that corridor.
pub(crate) fn extend_bboxes(paras: &mut [Paragraph]) {
    let boxes: Vec<Rect> = paras.iter().map(Paragraph::bbox).collect();
    for (i, para) in paras.iter_mut().enumerate() {
        let own = boxes[i];
        let mut left = f64::NEG_INFINITY;
        let mut right = f64::INFINITY;
        for (j, other) in boxes.iter().enumerate() {
            if i == j || !strictly_y_overlap(&own, other) {
                continue;
            }
            if other.urx <= own.llx {
                left = left.max(other.urx);
            } else if other.llx >= own.urx {
                right = right.min(other.llx);
            }
        }

        let mut ext = own;
        for (j, below) in boxes.iter().enumerate() {
            if i == j || below.ury > own.lly {
                continue;
            }
            if below.x_overlaps(&own) && below.llx >= left && below.urx <= right {
                ext.llx = ext.llx.min(below.llx);
                ext.urx = ext.urx.max(below.urx);
            }
        }
        para.ebbox = ext;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::word::Word;
    use crate::mark::Mark;
    use crate::params::LayoutParams;

    fn para(llx: f64, lly: f64, urx: f64, ury: f64) -> Paragraph {
        let word = Word::new(
            Mark::new("x", Rect::new(llx, lly, urx, ury), "F", 10.0),
            1000.0,
        );
        let line = Line::new(vec![word], &LayoutParams::default()).unwrap();
        Paragraph::from_lines(vec![line]).unwrap()
    }

    #[test]
    fn empty_lines_make_no_paragraph() {
        assert!(Paragraph::from_lines(Vec::new()).is_none());
    }

    #[test]
    fn merge_sorts_lines() {
        let merged = Paragraph::merge(vec![para(0.0, 10.0, 5.0, 20.0), para(0.0, 30.0, 5.0, 40.0)])
            .unwrap();
        assert_eq!(merged.lines().len(), 2);
        assert_eq!(merged.lines()[0].bbox().lly, 30.0);
        assert_eq!(merged.bbox(), Rect::new(0.0, 10.0, 5.0, 40.0));
    }

    #[test]
    fn heading_extends_over_its_column() {
        let mut paras = vec![
            para(0.0, 480.0, 40.0, 500.0),
            para(0.0, 300.0, 100.0, 470.0),
            para(110.0, 300.0, 200.0, 500.0),
        ];
        extend_bboxes(&mut paras);
        assert_eq!(paras[0].ebbox(), Rect::new(0.0, 480.0, 100.0, 500.0));
        assert_eq!(paras[1].ebbox(), paras[1].bbox());
    }

    #[test]
    fn spanning_footer_is_not_absorbed() {
        let mut paras = vec![
            para(0.0, 400.0, 100.0, 500.0),
            para(110.0, 400.0, 200.0, 500.0),
            para(0.0, 0.0, 200.0, 50.0),
        ];
        extend_bboxes(&mut paras);
        assert_eq!(paras[0].ebbox(), paras[0].bbox());
        assert_eq!(paras[1].ebbox(), paras[1].bbox());
    }
}
