//! Ruling grids and the tables drawn by them.

use std::collections::VecDeque;

use tracing::trace;

use crate::geometry::{Rect, cmp_f64, union_all};
use crate::layout::Paragraph;
use crate::params::LayoutParams;

use super::clustering::cluster_centers;
use super::ruling::{Ruling, RulingKind};
use super::{Occupancy, Table};

/// A connected set of rulings with at least two of each kind.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub horizontals: Vec<Ruling>,
    pub verticals: Vec<Ruling>,
    pub bbox: Rect,
}

impl Grid {
    /// Column boundaries, left to right.
    fn column_edges(&self, tol: f64) -> Vec<f64> {
        cluster_centers(self.verticals.iter().map(|r| r.primary).collect(), tol)
    }

    /// Row boundaries, top to bottom.
    fn row_edges(&self, tol: f64) -> Vec<f64> {
        let mut edges = cluster_centers(self.horizontals.iter().map(|r| r.primary).collect(), tol);
        edges.reverse();
        edges
    }
}

/// Groups rulings into grids by transitive intersection.
pub fn find_grids(rulings: &[Ruling], tol: f64) -> Vec<Grid> {
    let mut visited = vec![false; rulings.len()];
    let mut grids = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for start in 0..rulings.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.clear();
        queue.push_back(start);
        let mut members = Vec::new();
        while let Some(idx) = queue.pop_front() {
            members.push(idx);
            for (other, r) in rulings.iter().enumerate() {
                if !visited[other] && rulings[idx].intersects(r, tol) {
                    visited[other] = true;
                    queue.push_back(other);
                }
            }
        }

        let (horizontals, verticals): (Vec<Ruling>, Vec<Ruling>) = members
            .into_iter()
            .map(|i| rulings[i])
            .partition(|r| r.kind == RulingKind::Horizontal);
        if horizontals.len() < 2 || verticals.len() < 2 {
            continue;
        }
        let rects: Vec<Rect> = horizontals.iter().chain(&verticals).map(Ruling::bbox).collect();
        if let Some(bbox) = union_all(&rects) {
            grids.push(Grid {
                horizontals,
                verticals,
                bbox,
            });
        }
    }

    grids.sort_by(|a, b| cmp_f64(b.bbox.ury, a.bbox.ury).then(cmp_f64(a.bbox.llx, b.bbox.llx)));
    grids
}

/// Index of the band in `edges` holding `v`. `edges` must be monotone in
/// the direction given by `descending`.
fn band(edges: &[f64], v: f64, descending: bool) -> Option<usize> {
    edges.windows(2).position(|w| {
        let (a, b) = if descending { (w[1], w[0]) } else { (w[0], w[1]) };
        a <= v && v <= b
    })
}

/// Turns each grid into a table over the paragraphs whose centres fall in
/// its cells. Returns the table paragraphs and the paragraphs left free.
pub fn build_ruled_tables(
    grids: &[Grid],
    paras: Vec<Paragraph>,
    params: &LayoutParams,
) -> (Vec<Paragraph>, Vec<Paragraph>) {
    let mut free: Vec<Option<Paragraph>> = paras.into_iter().map(Some).collect();
    let mut tables = Vec::new();

    for grid in grids {
        let cols = grid.column_edges(params.ruling_tol);
        let rows = grid.row_edges(params.ruling_tol);
        if cols.len() < 3 || rows.len() < 3 {
            continue;
        }
        let (w, h) = (cols.len() - 1, rows.len() - 1);

        let mut placed: Vec<Vec<usize>> = vec![Vec::new(); w * h];
        for (i, slot) in free.iter().enumerate() {
            let Some(para) = slot else { continue };
            let r = para.bbox();
            let (cx, cy) = (r.center_x(), r.center_y());
            if let (Some(x), Some(y)) = (band(&cols, cx, false), band(&rows, cy, true)) {
                placed[y * w + x].push(i);
            }
        }

        let mut occ = Occupancy::new(w, h);
        for (cell, ids) in placed.iter().enumerate() {
            if !ids.is_empty() {
                occ.fill(cell % w, cell / w);
            }
        }
        if !occ.is_dense(w, h, params) {
            trace!(w, h, "ruled grid too sparse");
            continue;
        }

        let cells: Vec<Option<Paragraph>> = placed
            .into_iter()
            .map(|ids| {
                let members: Vec<Paragraph> = ids.into_iter().filter_map(|i| free[i].take()).collect();
                if members.is_empty() {
                    None
                } else {
                    Paragraph::merge(members)
                }
            })
            .collect();
        if let Some(table) = Table::new(w, h, cells) {
            trace!(w, h, "ruled table");
            tables.push(Paragraph::from_table(table));
        }
    }

    (tables, free.into_iter().flatten().collect())
}
