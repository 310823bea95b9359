//! Geometric primitives: points, rectangles and tolerance helpers.
//!
//! All coordinates are PDF user-space points with the origin at the bottom
//! left and y increasing upward. `depth` values are measured downward from
//! the page top so that sorting by depth follows top-to-bottom reading.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance used for rectangle equality.
pub const RECT_EQ_TOL: f64 = 1e-2;

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// An axis-aligned rectangle with `llx <= urx` and `lly <= ury`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl Rect {
    pub const fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self { llx, lly, urx, ury }
    }

    /// Builds the smallest rectangle containing two corner points in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            llx: a.0.min(b.0),
            lly: a.1.min(b.1),
            urx: a.0.max(b.0),
            ury: a.1.max(b.1),
        }
    }

    /// Bounding box of a set of points. `None` for an empty slice.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(
            rest.iter()
                .fold(Self::from_corners(*first, *first), |acc, p| {
                    acc.union(&Self::from_corners(*p, *p))
                }),
        )
    }

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn center_x(&self) -> f64 {
        (self.llx + self.urx) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.lly + self.ury) / 2.0
    }

    /// True when all four coordinates are finite and the corners are ordered.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.llx <= self.urx && self.lly <= self.ury
    }

    pub fn is_finite(&self) -> bool {
        self.llx.is_finite() && self.lly.is_finite() && self.urx.is_finite() && self.ury.is_finite()
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            llx: self.llx.min(other.llx),
            lly: self.lly.min(other.lly),
            urx: self.urx.max(other.urx),
            ury: self.ury.max(other.ury),
        }
    }

    /// Overlapping region of two rectangles, `None` if they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let r = Self {
            llx: self.llx.max(other.llx),
            lly: self.lly.max(other.lly),
            urx: self.urx.min(other.urx),
            ury: self.ury.min(other.ury),
        };
        (r.llx <= r.urx && r.lly <= r.ury).then_some(r)
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Self) -> bool {
        self.llx <= other.llx && other.urx <= self.urx && self.lly <= other.lly && other.ury <= self.ury
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.llx <= p.0 && p.0 <= self.urx && self.lly <= p.1 && p.1 <= self.ury
    }

    /// Reading-direction (x) overlap. Touching edges count as overlapping.
    pub fn x_overlaps(&self, other: &Self) -> bool {
        self.llx <= other.urx && other.llx <= self.urx
    }

    /// Depth-direction (y) overlap. Touching edges count as overlapping.
    pub fn y_overlaps(&self, other: &Self) -> bool {
        self.lly <= other.ury && other.lly <= self.ury
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.x_overlaps(other) && self.y_overlaps(other)
    }

    /// x-overlap after widening `self` by `gap` on both sides.
    pub fn x_overlaps_plus_gap(&self, other: &Self, gap: f64) -> bool {
        self.llx - gap <= other.urx && other.llx <= self.urx + gap
    }

    /// Coordinate-wise equality within [`RECT_EQ_TOL`].
    pub fn approx_eq(&self, other: &Self) -> bool {
        (self.llx - other.llx).abs() < RECT_EQ_TOL
            && (self.lly - other.lly).abs() < RECT_EQ_TOL
            && (self.urx - other.urx).abs() < RECT_EQ_TOL
            && (self.ury - other.ury).abs() < RECT_EQ_TOL
    }

    /// Distance from `page_top` down to the bottom edge.
    pub fn depth(&self, page_top: f64) -> f64 {
        page_top - self.lly
    }

    /// Distance from `page_top` down to the top edge.
    pub fn top_depth(&self, page_top: f64) -> f64 {
        page_top - self.ury
    }
}

/// Union of an iterator of rectangles.
pub fn union_all<'a, I>(rects: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a Rect>,
{
    rects.into_iter().fold(None, |acc: Option<Rect>, r| {
        Some(match acc {
            Some(a) => a.union(r),
            None => *r,
        })
    })
}

/// Relative tolerance test: `|a - b| <= tol * scale`.
#[inline]
pub fn within_tol(a: f64, b: f64, tol: f64, scale: f64) -> bool {
    (a - b).abs() <= tol * scale
}

/// Total order on floats for sort comparators (NaN sorts equal).
#[inline]
pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 20.0, 15.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 20.0, 15.0));
        assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert_eq!(a.intersection(&Rect::new(11.0, 0.0, 12.0, 1.0)), None);
    }

    #[test]
    fn overlap_counts_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.x_overlaps(&b));
        assert!(!a.x_overlaps(&Rect::new(10.5, 0.0, 20.0, 10.0)));
        assert!(a.x_overlaps_plus_gap(&Rect::new(10.5, 0.0, 20.0, 10.0), 0.5));
    }

    #[test]
    fn approx_eq_uses_hundredth_tolerance() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.approx_eq(&Rect::new(0.005, 0.0, 10.0, 9.995)));
        assert!(!a.approx_eq(&Rect::new(0.02, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn bounding_points() {
        let r = Rect::bounding(&[(3.0, 4.0), (1.0, 9.0), (2.0, -1.0)]).unwrap();
        assert_eq!(r, Rect::new(1.0, -1.0, 3.0, 9.0));
        assert!(Rect::bounding(&[]).is_none());
    }

    #[test]
    fn depth_is_measured_from_page_top() {
        let r = Rect::new(0.0, 700.0, 10.0, 712.0);
        assert_eq!(r.depth(792.0), 92.0);
        assert_eq!(r.top_depth(792.0), 80.0);
    }
}
