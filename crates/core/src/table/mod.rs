//! Table discovery.
//!
//! Tables come from two sources: ruling grids drawn on the page
//! ([`ruling`], [`grid`]) and paragraphs that line up in rows and columns
//! ([`detect`]). Both produce a [`Table`] whose cells are paragraphs and
//! both accept a table only when it passes the same density test.

mod clustering;
pub mod detect;
pub mod grid;
pub mod ruling;

pub use detect::detect_tables;
pub use grid::{Grid, build_ruled_tables, find_grids};
pub use ruling::{Ruling, RulingKind, SubPath, extract_rulings};

use crate::geometry::{Rect, union_all};
use crate::layout::Paragraph;
use crate::params::LayoutParams;

/// A `w x h` grid of optional cell paragraphs. Row 0 is the top row.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    w: usize,
    h: usize,
    cells: Vec<Option<Paragraph>>,
    bbox: Rect,
}

impl Table {
    /// Builds a table from row-major cells.
    ///
    /// Returns `None` if the cell count does not match `w * h` or every
    /// cell is empty.
    pub fn new(w: usize, h: usize, cells: Vec<Option<Paragraph>>) -> Option<Self> {
        if cells.len() != w * h {
            return None;
        }
        let rects: Vec<Rect> = cells.iter().flatten().map(Paragraph::bbox).collect();
        let bbox = union_all(&rects)?;
        Some(Self { w, h, cells, bbox })
    }

    pub fn w(&self) -> usize {
        self.w
    }

    pub fn h(&self) -> usize {
        self.h
    }

    /// Union of all cell bboxes.
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<&Paragraph> {
        if x >= self.w || y >= self.h {
            return None;
        }
        self.cells[y * self.w + x].as_ref()
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Paragraph>]> + '_ {
        self.cells.chunks(self.w.max(1))
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn font_size(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .map(Paragraph::font_size)
            .fold(0.0, f64::max)
    }
}

/// Cell occupancy of a candidate grid, row-major.
#[derive(Clone, Debug)]
pub(crate) struct Occupancy {
    w: usize,
    h: usize,
    filled: Vec<bool>,
}

impl Occupancy {
    pub(crate) fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            filled: vec![false; w * h],
        }
    }

    /// Marks a cell; returns false if it was already filled.
    pub(crate) fn fill(&mut self, x: usize, y: usize) -> bool {
        let cell = &mut self.filled[y * self.w + x];
        !std::mem::replace(cell, true)
    }

    fn is_filled(&self, x: usize, y: usize) -> bool {
        self.filled[y * self.w + x]
    }

    /// Density test on the top-left `w x h` corner.
    pub(crate) fn is_dense(&self, w: usize, h: usize, params: &LayoutParams) -> bool {
        if w < 2 || h < 2 || w > self.w || h > self.h {
            return false;
        }
        let mut total = 0;
        for y in 0..h {
            let row = (0..w).filter(|&x| self.is_filled(x, y)).count();
            if row < params.table_min_occ_row {
                return false;
            }
            total += row;
        }
        for x in 0..w {
            let col = (0..h).filter(|&y| self.is_filled(x, y)).count();
            if col < params.table_min_occ_col {
                return false;
            }
        }
        total as f64 >= params.table_min_fill * (w * h) as f64
    }

    /// Largest dense top-left corner, by area then height.
    pub(crate) fn densest(&self, params: &LayoutParams) -> Option<(usize, usize)> {
        let mut sizes: Vec<(usize, usize)> = (2..=self.w)
            .flat_map(|w| (2..=self.h).map(move |h| (w, h)))
            .collect();
        sizes.sort_by(|a, b| (b.0 * b.1).cmp(&(a.0 * a.1)).then(b.1.cmp(&a.1)));
        sizes.into_iter().find(|&(w, h)| self.is_dense(w, h, params))
    }
}
