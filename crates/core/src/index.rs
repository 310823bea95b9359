//! Multi-attribute sorted index over rectangles.
//!
//! For each attribute the index keeps a permutation of `0..N` sorted by that
//! attribute. Half-space queries binary search the sorted values and return
//! the matching prefix or suffix of the permutation as a roaring bitmap, so
//! callers combine constraints with cheap set algebra.

use roaring::RoaringBitmap;

use crate::geometry::{Rect, cmp_f64};

/// Rectangle attribute a query can range over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attr {
    Llx,
    Urx,
    Lly,
    Ury,
    /// `page_top - lly`; only available when the index was built with a page top.
    Depth,
}

impl Attr {
    const ALL: [Attr; 5] = [Attr::Llx, Attr::Urx, Attr::Lly, Attr::Ury, Attr::Depth];

    const fn slot(self) -> usize {
        match self {
            Attr::Llx => 0,
            Attr::Urx => 1,
            Attr::Lly => 2,
            Attr::Ury => 3,
            Attr::Depth => 4,
        }
    }

    fn value(self, r: &Rect, page_top: f64) -> f64 {
        match self {
            Attr::Llx => r.llx,
            Attr::Urx => r.urx,
            Attr::Lly => r.lly,
            Attr::Ury => r.ury,
            Attr::Depth => r.depth(page_top),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct SortedColumn {
    order: Vec<u32>,
    values: Vec<f64>,
}

impl SortedColumn {
    fn build(rects: &[Rect], attr: Attr, page_top: f64) -> Self {
        let mut order: Vec<u32> = (0..rects.len() as u32).collect();
        order.sort_by(|&a, &b| {
            cmp_f64(
                attr.value(&rects[a as usize], page_top),
                attr.value(&rects[b as usize], page_top),
            )
            .then(a.cmp(&b))
        });
        let values = order
            .iter()
            .map(|&i| attr.value(&rects[i as usize], page_top))
            .collect();
        Self { order, values }
    }

    fn le(&self, z: f64) -> RoaringBitmap {
        let n = self.values.partition_point(|&v| v <= z);
        self.order[..n].iter().copied().collect()
    }

    fn ge(&self, z: f64) -> RoaringBitmap {
        let n = self.values.partition_point(|&v| v < z);
        self.order[n..].iter().copied().collect()
    }
}

/// Read-only index over a slice of rectangles.
#[derive(Clone, Debug)]
pub struct RectIndex {
    rects: Vec<Rect>,
    columns: Vec<SortedColumn>,
    has_depth: bool,
}

impl RectIndex {
    /// Builds an index over `llx`, `urx`, `lly` and `ury`.
    pub fn new(rects: &[Rect]) -> Self {
        Self::build(rects, None)
    }

    /// Builds an index that also supports [`Attr::Depth`] queries.
    pub fn with_depth(rects: &[Rect], page_top: f64) -> Self {
        Self::build(rects, Some(page_top))
    }

    fn build(rects: &[Rect], page_top: Option<f64>) -> Self {
        debug_assert!(rects.len() <= u32::MAX as usize);
        let columns = Attr::ALL
            .iter()
            .map(|&attr| match (attr, page_top) {
                (Attr::Depth, None) => SortedColumn::default(),
                (_, top) => SortedColumn::build(rects, attr, top.unwrap_or(0.0)),
            })
            .collect();
        Self {
            rects: rects.to_vec(),
            columns,
            has_depth: page_top.is_some(),
        }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rect(&self, idx: u32) -> &Rect {
        &self.rects[idx as usize]
    }

    /// Every index in the structure.
    pub fn all(&self) -> RoaringBitmap {
        let mut set = RoaringBitmap::new();
        set.insert_range(0..self.rects.len() as u32);
        set
    }

    fn column(&self, attr: Attr) -> &SortedColumn {
        debug_assert!(
            attr != Attr::Depth || self.has_depth,
            "depth query on an index built without a page top"
        );
        &self.columns[attr.slot()]
    }

    /// Indices where `attr(rect) <= z`.
    pub fn le(&self, attr: Attr, z: f64) -> RoaringBitmap {
        self.column(attr).le(z)
    }

    /// Indices where `attr(rect) >= z`.
    pub fn ge(&self, attr: Attr, z: f64) -> RoaringBitmap {
        self.column(attr).ge(z)
    }

    /// Indices where `lo <= attr(rect) <= hi`.
    pub fn range(&self, attr: Attr, lo: f64, hi: f64) -> RoaringBitmap {
        if lo > hi {
            return RoaringBitmap::new();
        }
        let col = self.column(attr);
        let start = col.values.partition_point(|&v| v < lo);
        let end = col.values.partition_point(|&v| v <= hi);
        col.order[start..end.max(start)].iter().copied().collect()
    }

    /// Indices whose x extent overlaps `[llx, urx]`.
    pub fn x_overlap(&self, llx: f64, urx: f64) -> RoaringBitmap {
        let mut set = self.ge(Attr::Urx, llx);
        set &= &self.le(Attr::Llx, urx);
        set
    }

    /// Indices whose y extent overlaps `[lly, ury]`.
    pub fn y_overlap(&self, lly: f64, ury: f64) -> RoaringBitmap {
        let mut set = self.ge(Attr::Ury, lly);
        set &= &self.le(Attr::Lly, ury);
        set
    }

    /// Indices whose rectangles overlap `r` in both axes.
    pub fn overlap(&self, r: &Rect) -> RoaringBitmap {
        let mut set = self.x_overlap(r.llx, r.urx);
        set &= &self.y_overlap(r.lly, r.ury);
        set
    }

    /// Indices whose rectangles lie entirely inside `r`.
    pub fn inside(&self, r: &Rect) -> RoaringBitmap {
        let mut set = self.ge(Attr::Llx, r.llx);
        set &= &self.le(Attr::Urx, r.urx);
        set &= &self.ge(Attr::Lly, r.lly);
        set &= &self.le(Attr::Ury, r.ury);
        set
    }
}
