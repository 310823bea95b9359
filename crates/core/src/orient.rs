//! Quarter-turn rotations between page space and an upright frame.
//!
//! Marks drawn at orientation `θ` read left to right after rotating the
//! page by `-θ`. The layout core only handles upright text, so rotated
//! marks are turned upright, analysed, and their output turned back.

use crate::geometry::{Point, Rect};
use crate::mark::{Mark, Orientation};
use crate::table::SubPath;

/// Maps a page-space point into the upright frame for `o`.
pub fn to_upright(o: Orientation, (x, y): Point) -> Point {
    match o {
        Orientation::Deg0 => (x, y),
        Orientation::Deg90 => (y, -x),
        Orientation::Deg180 => (-x, -y),
        Orientation::Deg270 => (-y, x),
    }
}

/// Inverse of [`to_upright`].
pub fn from_upright(o: Orientation, (u, v): Point) -> Point {
    match o {
        Orientation::Deg0 => (u, v),
        Orientation::Deg90 => (-v, u),
        Orientation::Deg180 => (-u, -v),
        Orientation::Deg270 => (v, -u),
    }
}

fn map_rect(r: Rect, f: impl Fn(Point) -> Point) -> Rect {
    Rect::from_corners(f((r.llx, r.lly)), f((r.urx, r.ury)))
}

pub fn rect_to_upright(o: Orientation, r: Rect) -> Rect {
    map_rect(r, |p| to_upright(o, p))
}

pub fn rect_from_upright(o: Orientation, r: Rect) -> Rect {
    map_rect(r, |p| from_upright(o, p))
}

pub(crate) fn mark_to_upright(o: Orientation, mark: &Mark) -> Mark {
    Mark {
        bbox: rect_to_upright(o, mark.bbox),
        ..mark.clone()
    }
}

pub(crate) fn path_to_upright(o: Orientation, path: &SubPath) -> SubPath {
    SubPath::new(path.points.iter().map(|&p| to_upright(o, p)).collect())
}
