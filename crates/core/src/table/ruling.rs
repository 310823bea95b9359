//! Ruling extraction from vector paths.
//!
//! Stroked segments and thin filled rectangles become horizontal or
//! vertical rulings. Collinear rulings are then coalesced so a line drawn
//! as several touching segments counts once.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::geometry::{Point, Rect};
use crate::params::LayoutParams;

/// An ordered point list from one subpath.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SubPath {
    pub points: Vec<Point>,
}

impl SubPath {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Closed rectangle path through the four corners of `r`.
    pub fn rect(r: Rect) -> Self {
        Self::new(vec![
            (r.llx, r.lly),
            (r.urx, r.lly),
            (r.urx, r.ury),
            (r.llx, r.ury),
            (r.llx, r.lly),
        ])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum RulingKind {
    Horizontal,
    Vertical,
}

/// A horizontal or vertical line segment. `primary` is the constant
/// coordinate, `[lo, hi]` the extent along the other axis.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Ruling {
    pub kind: RulingKind,
    pub primary: f64,
    pub lo: f64,
    pub hi: f64,
}

impl Ruling {
    pub fn new(kind: RulingKind, primary: f64, a: f64, b: f64) -> Self {
        Self {
            kind,
            primary,
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn length(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn bbox(&self) -> Rect {
        match self.kind {
            RulingKind::Horizontal => Rect::new(self.lo, self.primary, self.hi, self.primary),
            RulingKind::Vertical => Rect::new(self.primary, self.lo, self.primary, self.hi),
        }
    }

    /// True for perpendicular rulings that cross or touch within `tol`.
    pub fn intersects(&self, other: &Ruling, tol: f64) -> bool {
        self.kind != other.kind
            && other.lo - tol <= self.primary
            && self.primary <= other.hi + tol
            && self.lo - tol <= other.primary
            && other.primary <= self.hi + tol
    }

    fn segment(p: Point, q: Point, params: &LayoutParams) -> Option<Self> {
        let dx = (q.0 - p.0).abs();
        let dy = (q.1 - p.1).abs();
        if dx >= params.ruling_significant && dy <= params.ruling_tol {
            Some(Self::new(RulingKind::Horizontal, (p.1 + q.1) / 2.0, p.0, q.0))
        } else if dy >= params.ruling_significant && dx <= params.ruling_tol {
            Some(Self::new(RulingKind::Vertical, (p.0 + q.0) / 2.0, p.1, q.1))
        } else {
            None
        }
    }

    /// A thin axis-aligned filled rectangle drawn as 4 points, or 5 with
    /// the first repeated.
    fn filled(path: &SubPath, params: &LayoutParams) -> Option<Self> {
        let pts = &path.points;
        let corners = match pts.len() {
            4 => pts.as_slice(),
            5 if near(pts[0], pts[4], params.ruling_tol) => &pts[..4],
            _ => return None,
        };
        let r = Rect::bounding(corners)?;
        let tol = params.ruling_tol;
        let on_corner = |p: &Point| {
            ((p.0 - r.llx).abs() <= tol || (p.0 - r.urx).abs() <= tol)
                && ((p.1 - r.lly).abs() <= tol || (p.1 - r.ury).abs() <= tol)
        };
        if !corners.iter().all(on_corner) {
            return None;
        }
        if r.height() <= tol && r.width() >= params.ruling_significant {
            Some(Self::new(RulingKind::Horizontal, r.center_y(), r.llx, r.urx))
        } else if r.width() <= tol && r.height() >= params.ruling_significant {
            Some(Self::new(RulingKind::Vertical, r.center_x(), r.lly, r.ury))
        } else {
            None
        }
    }
}

fn near(a: Point, b: Point, tol: f64) -> bool {
    (a.0 - b.0).abs() <= tol && (a.1 - b.1).abs() <= tol
}

/// Rulings from stroked and filled subpaths, sorted and coalesced.
pub fn extract_rulings(
    strokes: &[SubPath],
    fills: &[SubPath],
    params: &LayoutParams,
) -> Vec<Ruling> {
    let stroked = strokes.iter().flat_map(|path| {
        path.points
            .iter()
            .tuple_windows()
            .filter_map(|(&p, &q)| Ruling::segment(p, q, params))
    });
    let filled = fills.iter().filter_map(|path| Ruling::filled(path, params));
    tidy(stroked.chain(filled).collect(), params.ruling_tol)
}

/// Sorts by (kind, primary, lo, hi), drops duplicates and joins collinear
/// rulings that touch or overlap within `tol`.
pub(crate) fn tidy(mut rulings: Vec<Ruling>, tol: f64) -> Vec<Ruling> {
    rulings.sort_by_key(|r| {
        (
            r.kind,
            OrderedFloat(r.primary),
            OrderedFloat(r.lo),
            OrderedFloat(r.hi),
        )
    });
    rulings.dedup();

    let mut out = Vec::with_capacity(rulings.len());
    for (_, group) in &rulings
        .into_iter()
        .chunk_by(|r| r.kind)
    {
        let group: Vec<Ruling> = group.collect();
        let mut start = 0;
        while start < group.len() {
            let anchor = group[start].primary;
            let end = group[start..]
                .iter()
                .position(|r| r.primary - anchor > tol)
                .map_or(group.len(), |n| start + n);
            out.extend(join_collinear(&group[start..end], tol));
            start = end;
        }
    }
    out
}

/// Joins rulings on one line whose extents touch within `tol`.
fn join_collinear(group: &[Ruling], tol: f64) -> Vec<Ruling> {
    let mut sorted = group.to_vec();
    sorted.sort_by_key(|r| OrderedFloat(r.lo));
    let mut joined: Vec<Ruling> = Vec::new();
    for r in sorted {
        match joined.last_mut() {
            Some(last) if r.lo <= last.hi + tol => {
                last.hi = last.hi.max(r.hi);
            }
            _ => joined.push(r),
        }
    }
    joined
}
