//! Table detection from paragraph alignment.
//!
//! Paragraphs that share a left edge, centre or right edge form column
//! runs; paragraphs that share a bottom, centre or top form row runs. Every
//! paragraph sitting on both a column and a row anchors a candidate table
//! spanning the rest of that column and row. Candidates are validated by
//! placing every paragraph overlapping them on the grid, then shrunk to their
//! largest dense corner. The largest shrunk tables win.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::geometry::{Rect, cmp_f64, union_all};
use crate::index::RectIndex;
use crate::layout::{Paragraph, size_scale};
use crate::params::LayoutParams;

use super::clustering::{anchored_runs, dedup_runs};
use super::{Occupancy, Table};

type Attr = fn(&Rect) -> f64;

fn llx(r: &Rect) -> f64 {
    r.llx
}

fn urx(r: &Rect) -> f64 {
    r.urx
}

fn lly(r: &Rect) -> f64 {
    r.lly
}

fn ury(r: &Rect) -> f64 {
    r.ury
}

const X_ATTRS: [Attr; 3] = [llx, Rect::center_x, urx];
const Y_ATTRS: [Attr; 3] = [lly, Rect::center_y, ury];

/// A candidate table: the top row fixes the columns, the left column
/// fixes the rows. Both start at the shared anchor paragraph.
#[derive(Clone, Debug)]
struct Candidate {
    top_row: Vec<usize>,
    left_col: Vec<usize>,
    bbox: Rect,
}

impl Candidate {
    fn area(&self) -> usize {
        self.top_row.len() * self.left_col.len()
    }
}

/// Paragraph ids with their grid positions.
#[derive(Debug, Clone)]
struct Placement {
    w: usize,
    h: usize,
    cells: Vec<(usize, usize, usize)>,
    bbox: Rect,
}

struct Detector<'a> {
    rects: Vec<Rect>,
    sizes: Vec<f64>,
    index: RectIndex,
    params: &'a LayoutParams,
}

impl<'a> Detector<'a> {
    fn new(paras: &[Paragraph], params: &'a LayoutParams) -> Self {
        let rects: Vec<Rect> = paras.iter().map(Paragraph::bbox).collect();
        Self {
            index: RectIndex::new(&rects),
            sizes: paras.iter().map(|p| size_scale(p.font_size())).collect(),
            rects,
            params,
        }
    }

    fn x_tol(&self, id: usize) -> f64 {
        self.params.max_intra_reading_gap * self.sizes[id]
    }

    fn y_tol(&self, id: usize) -> f64 {
        self.params.line_depth * self.sizes[id]
    }

    fn columns(&self, ids: &[usize]) -> Vec<Vec<usize>> {
        let runs = X_ATTRS
            .iter()
            .flat_map(|attr| {
                anchored_runs(ids, |i| attr(&self.rects[i]), |i| self.x_tol(i), 2)
            })
            .collect();
        let mut cols = dedup_runs(runs);
        for col in &mut cols {
            col.sort_by(|&a, &b| {
                cmp_f64(self.rects[b].ury, self.rects[a].ury)
                    .then(cmp_f64(self.rects[a].llx, self.rects[b].llx))
            });
        }
        cols
    }

    fn rows(&self, ids: &[usize]) -> Vec<Vec<usize>> {
        let runs = Y_ATTRS
            .iter()
            .flat_map(|attr| {
                anchored_runs(ids, |i| attr(&self.rects[i]), |i| self.y_tol(i), 2)
            })
            .collect();
        let mut rows = dedup_runs(runs);
        for row in &mut rows {
            row.sort_by(|&a, &b| cmp_f64(self.rects[a].llx, self.rects[b].llx));
        }
        rows
    }

    fn candidates(&self, ids: &[usize]) -> Vec<Candidate> {
        let columns = self.columns(ids);
        let rows = self.rows(ids);

        let mut rows_of: FxHashMap<usize, Vec<(usize, usize)>> = FxHashMap::default();
        for (r, row) in rows.iter().enumerate() {
            for (pos, &id) in row.iter().enumerate() {
                rows_of.entry(id).or_default().push((r, pos));
            }
        }

        let mut cands = Vec::new();
        for col in &columns {
            for (ci, anchor) in col.iter().enumerate() {
                let Some(hits) = rows_of.get(anchor) else {
                    continue;
                };
                for &(r, ri) in hits {
                    let top_row = rows[r][ri..].to_vec();
                    let left_col = col[ci..].to_vec();
                    if top_row.len() < 2 || left_col.len() < 2 {
                        continue;
                    }
                    let rects: Vec<Rect> = top_row
                        .iter()
                        .chain(&left_col)
                        .map(|&id| self.rects[id])
                        .collect();
                    if let Some(bbox) = union_all(&rects) {
                        cands.push(Candidate {
                            top_row,
                            left_col,
                            bbox,
                        });
                    }
                }
            }
        }
        cands.sort_by(|a, b| {
            b.area()
                .cmp(&a.area())
                .then(cmp_f64(b.bbox.ury, a.bbox.ury))
        });
        cands
    }

    /// Closest anchor that `id` aligns with on any attribute.
    fn align(
        &self,
        id: usize,
        anchors: &[usize],
        attrs: &[Attr; 3],
        tol: impl Fn(usize) -> f64,
    ) -> Option<usize> {
        let r = &self.rects[id];
        anchors
            .iter()
            .enumerate()
            .flat_map(|(pos, &a)| {
                let ar = &self.rects[a];
                let limit = tol(a);
                attrs.iter().filter_map(move |attr| {
                    let d = (attr(r) - attr(ar)).abs();
                    (d <= limit).then_some((d, pos))
                })
            })
            .min_by(|a, b| cmp_f64(a.0, b.0).then(a.1.cmp(&b.1)))
            .map(|(_, pos)| pos)
    }

    /// Area a candidate claims: its bbox grown right and down by the
    /// alignment tolerances of its header row and anchor column.
    fn region(&self, cand: &Candidate) -> Rect {
        let reach_x = cand.top_row.iter().map(|&id| self.x_tol(id)).fold(0.0, f64::max);
        let reach_y = cand.left_col.iter().map(|&id| self.y_tol(id)).fold(0.0, f64::max);
        let b = &cand.bbox;
        Rect::new(b.llx, b.lly - reach_y, b.urx + reach_x, b.ury)
    }

    fn place(&self, cand: &Candidate, free: &FxHashSet<usize>) -> Option<Placement> {
        let (w, h) = (cand.top_row.len(), cand.left_col.len());
        let mut occ = Occupancy::new(w, h);
        let mut cells = Vec::new();
        let region = self.region(cand);
        let hits = self.index.overlap(&region);
        let members = hits
            .iter()
            .map(|i| i as usize)
            .filter(|id| free.contains(id))
            .filter(|&id| {
                let r = &self.rects[id];
                strictly_overlap(&region, r) || region.contains_point((r.center_x(), r.center_y()))
            });
        for id in members {
            let x = if cand.left_col.contains(&id) {
                Some(0)
            } else {
                cand.top_row
                    .iter()
                    .position(|&a| a == id)
                    .or_else(|| self.align(id, &cand.top_row, &X_ATTRS, |a| self.x_tol(a)))
            };
            let y = if cand.top_row.contains(&id) {
                Some(0)
            } else {
                cand.left_col
                    .iter()
                    .position(|&a| a == id)
                    .or_else(|| self.align(id, &cand.left_col, &Y_ATTRS, |a| self.y_tol(a)))
            };
            let (Some(x), Some(y)) = (x, y) else {
                trace!(id, "paragraph off the grid");
                return None;
            };
            if !occ.fill(x, y) {
                trace!(id, x, y, "cell taken twice");
                return None;
            }
            cells.push((id, x, y));
        }

        let (sw, sh) = occ.densest(self.params)?;
        cells.retain(|&(_, x, y)| x < sw && y < sh);
        let rects: Vec<Rect> = cells.iter().map(|&(id, _, _)| self.rects[id]).collect();
        let bbox = union_all(&rects)?;
        Some(Placement {
            w: sw,
            h: sh,
            cells,
            bbox,
        })
    }
}

fn strictly_overlap(a: &Rect, b: &Rect) -> bool {
    a.llx < b.urx && b.llx < a.urx && a.lly < b.ury && b.lly < a.ury
}

/// Keeps the largest placements first, ties going to the higher one.
/// Placements clashing with `blocked`, with a kept table or reusing its
/// paragraphs are dropped.
fn select_placements(mut placements: Vec<Placement>, blocked: &[Rect]) -> Vec<Placement> {
    placements.sort_by(|a, b| {
        (b.w * b.h)
            .cmp(&(a.w * a.h))
            .then(cmp_f64(b.bbox.ury, a.bbox.ury))
    });
    let mut used: FxHashSet<usize> = FxHashSet::default();
    let mut kept: Vec<Placement> = Vec::new();
    for placement in placements {
        let clashes = blocked
            .iter()
            .chain(kept.iter().map(|k| &k.bbox))
            .any(|r| strictly_overlap(r, &placement.bbox));
        if clashes || placement.cells.iter().any(|(id, _, _)| used.contains(id)) {
            continue;
        }
        trace!(w = placement.w, h = placement.h, "aligned table");
        used.extend(placement.cells.iter().map(|&(id, _, _)| id));
        kept.push(placement);
    }
    kept
}

/// Replaces paragraphs that form aligned tables with table paragraphs.
///
/// Tables overlapping any rectangle in `blocked` are not built. Table
/// paragraphs in `paras` are passed through untouched.
pub fn detect_tables(
    paras: Vec<Paragraph>,
    blocked: &[Rect],
    params: &LayoutParams,
) -> Vec<Paragraph> {
    let detector = Detector::new(&paras, params);
    let ids: Vec<usize> = (0..paras.len()).filter(|&i| !paras[i].is_table()).collect();
    let free: FxHashSet<usize> = ids.iter().copied().collect();

    let candidates = detector.candidates(&ids);
    let placements: Vec<Placement> = candidates
        .iter()
        .filter(|c| !blocked.iter().any(|b| strictly_overlap(b, &c.bbox)))
        .filter_map(|c| detector.place(c, &free))
        .collect();
    let accepted = select_placements(placements, blocked);
    debug!(candidates = candidates.len(), tables = accepted.len(), "table detection");

    let mut slots: Vec<Option<Paragraph>> = paras.into_iter().map(Some).collect();
    let mut tables = Vec::with_capacity(accepted.len());
    for placement in accepted {
        let mut cells: Vec<Option<Paragraph>> = vec![None; placement.w * placement.h];
        for (id, x, y) in placement.cells {
            debug_assert!(cells[y * placement.w + x].is_none(), "duplicate cell assignment");
            cells[y * placement.w + x] = slots[id].take();
        }
        if let Some(table) = Table::new(placement.w, placement.h, cells) {
            tables.push(Paragraph::from_table(table));
        }
    }
    slots.into_iter().flatten().chain(tables).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Line, Word};
    use crate::mark::Mark;

    fn para(text: &str, llx: f64, lly: f64) -> Paragraph {
        let w = 5.0 * text.chars().count() as f64;
        let mark = Mark::new(text, Rect::new(llx, lly, llx + w, lly + 10.0), "F", 10.0);
        let line = Line::new(vec![Word::new(mark, 1000.0)], &LayoutParams::default()).unwrap();
        Paragraph::from_lines(vec![line]).unwrap()
    }

    fn tables(paras: &[Paragraph]) -> Vec<&Table> {
        paras.iter().filter_map(Paragraph::table).collect()
    }

    #[test]
    fn three_by_two_grid() {
        let paras = vec![
            para("Apples", 0.0, 500.0),
            para("12", 100.0, 500.0),
            para("3.5", 200.0, 500.0),
            para("Pears", 0.0, 470.0),
            para("7", 100.0, 470.0),
            para("1.25", 200.0, 470.0),
        ];
        let out = detect_tables(paras, &[], &LayoutParams::default());
        assert_eq!(out.len(), 1);
        let table = tables(&out)[0];
        assert_eq!((table.w(), table.h()), (3, 2));
        assert_eq!(table.occupied(), 6);
        assert_eq!(table.cell(2, 1).unwrap().bbox().llx, 200.0);
        assert_eq!(table.cell(0, 0).unwrap().bbox().lly, 500.0);
    }

    #[test]
    fn interior_cell_taller_than_its_row_anchor() {
        let tall = Paragraph::merge(vec![para("7", 100.0, 470.0), para("8", 100.0, 458.0)]).unwrap();
        let paras = vec![
            para("Apples", 0.0, 500.0),
            para("12", 100.0, 500.0),
            para("3.5", 200.0, 500.0),
            para("Pears", 0.0, 470.0),
            tall,
            para("1.25", 200.0, 470.0),
        ];
        let out = detect_tables(paras, &[], &LayoutParams::default());
        assert_eq!(out.len(), 1);
        let table = tables(&out)[0];
        assert_eq!((table.w(), table.h()), (3, 2));
        assert_eq!(table.occupied(), 6);
        assert_eq!(table.cell(1, 1).unwrap().bbox().lly, 458.0);
    }

    fn placement(w: usize, h: usize, first_id: usize, bbox: Rect) -> Placement {
        let cells = (0..w * h).map(|i| (first_id + i, i % w, i / w)).collect();
        Placement { w, h, cells, bbox }
    }

    #[test]
    fn larger_placement_wins_over_earlier_smaller_one() {
        let small = placement(2, 2, 0, Rect::new(0.0, 0.0, 100.0, 100.0));
        let large = placement(3, 2, 0, Rect::new(0.0, 0.0, 150.0, 100.0));
        let kept = select_placements(vec![small, large], &[]);
        assert_eq!(kept.len(), 1);
        assert_eq!((kept[0].w, kept[0].h), (3, 2));
    }

    #[test]
    fn equal_area_goes_to_the_higher_placement() {
        let low = placement(2, 2, 0, Rect::new(0.0, 290.0, 50.0, 340.0));
        let high = placement(2, 2, 10, Rect::new(0.0, 300.0, 50.0, 350.0));
        let apart = placement(2, 2, 20, Rect::new(0.0, 100.0, 50.0, 150.0));
        let kept = select_placements(vec![apart, low, high], &[]);
        let tops: Vec<f64> = kept.iter().map(|p| p.bbox.ury).collect();
        assert_eq!(tops, vec![350.0, 150.0]);
    }

    #[test]
    fn placements_sharing_paragraphs_are_dropped() {
        let first = placement(2, 2, 0, Rect::new(0.0, 300.0, 50.0, 350.0));
        let reuse = placement(2, 2, 3, Rect::new(0.0, 100.0, 50.0, 150.0));
        let blocked = placement(2, 2, 10, Rect::new(200.0, 100.0, 250.0, 150.0));
        let kept = select_placements(vec![first, reuse, blocked], &[Rect::new(240.0, 0.0, 300.0, 200.0)]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].bbox.ury, 350.0);
    }

    #[test]
    fn two_columns_with_footer_are_not_a_table() {
        let mut wide = para("footer", 0.0, 0.0);
        wide = Paragraph::merge(vec![wide, para("footer", 170.0, 0.0)]).unwrap();
        let paras = vec![para("left", 0.0, 490.0), para("right", 180.0, 490.0), wide];
        let out = detect_tables(paras, &[], &LayoutParams::default());
        assert!(tables(&out).is_empty());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn stray_paragraph_inside_rejects_candidate() {
        let paras = vec![
            para("a", 0.0, 500.0),
            para("b", 100.0, 500.0),
            para("c", 0.0, 470.0),
            para("d", 100.0, 470.0),
            para("stray", 45.0, 485.0),
        ];
        let out = detect_tables(paras, &[], &LayoutParams::default());
        assert!(tables(&out).is_empty());
    }

    #[test]
    fn blocked_region_suppresses_table() {
        let paras = vec![
            para("a", 0.0, 500.0),
            para("b", 100.0, 500.0),
            para("c", 0.0, 470.0),
            para("d", 100.0, 470.0),
        ];
        let blocked = [Rect::new(50.0, 450.0, 150.0, 520.0)];
        let out = detect_tables(paras, &blocked, &LayoutParams::default());
        assert!(tables(&out).is_empty());
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn accepted_tables_satisfy_density() {
        let mut paras = Vec::new();
        for row in 0..4 {
            for col in 0..3 {
                if (row + col) % 4 == 3 {
                    continue;
                }
                paras.push(para("v", col as f64 * 80.0, 600.0 - row as f64 * 30.0));
            }
        }
        let params = LayoutParams::default();
        let out = detect_tables(paras, &[], &params);
        for table in tables(&out) {
            assert!(table.w() >= 2 && table.h() >= 2);
            for y in 0..table.h() {
                let row = (0..table.w()).filter(|&x| table.cell(x, y).is_some()).count();
                assert!(row >= params.table_min_occ_row);
            }
            for x in 0..table.w() {
                let col = (0..table.h()).filter(|&y| table.cell(x, y).is_some()).count();
                assert!(col >= params.table_min_occ_col);
            }
            assert!(table.occupied() as f64 >= params.table_min_fill * (table.w() * table.h()) as f64);
        }
        assert!(!tables(&out).is_empty());
    }
}
