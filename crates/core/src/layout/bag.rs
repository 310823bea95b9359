//! Depth-binned word containers.
//!
//! A [`WordBag`] holds ids of words stored in a page-wide word arena. Words
//! are bucketed by `floor(depth / depth_bin_points)` and every bin is kept
//! sorted by increasing `llx`, so the left-most word of a depth band is
//! always at the front of its bin.

use std::collections::BTreeMap;

use crate::geometry::{Rect, cmp_f64};
use crate::params::LayoutParams;

use super::word::{Word, size_scale};

/// Index of a word in the page word arena.
pub type WordId = usize;

#[derive(Clone, Debug)]
pub struct WordBag {
    bins: BTreeMap<i64, Vec<WordId>>,
    bbox: Option<Rect>,
    font_size: f64,
    bin_points: f64,
    len: usize,
}

impl WordBag {
    pub fn new(bin_points: f64) -> Self {
        debug_assert!(bin_points > 0.0);
        Self {
            bins: BTreeMap::new(),
            bbox: None,
            font_size: 0.0,
            bin_points,
            len: 0,
        }
    }

    /// A bag holding every word in `words`.
    pub fn from_words(words: &[Word], bin_points: f64) -> Self {
        let mut bag = Self::new(bin_points);
        for id in 0..words.len() {
            bag.insert(words, id);
        }
        bag
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Union of the member word bboxes.
    pub fn bbox(&self) -> Option<Rect> {
        self.bbox
    }

    /// Largest font size of the words added.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn depth_index(&self, depth: f64) -> i64 {
        (depth / self.bin_points).floor() as i64
    }

    pub fn insert(&mut self, words: &[Word], id: WordId) {
        let word = &words[id];
        let bin = self.bins.entry(self.depth_index(word.depth())).or_default();
        let llx = word.bbox().llx;
        let pos = bin.partition_point(|&other| {
            let o = words[other].bbox().llx;
            o < llx || (o == llx && other < id)
        });
        bin.insert(pos, id);
        self.bbox = Some(match self.bbox {
            Some(b) => b.union(&word.bbox()),
            None => word.bbox(),
        });
        self.font_size = self.font_size.max(word.font_size());
        self.len += 1;
    }

    /// Removes `id`; returns false if it was not in the bag.
    pub fn remove(&mut self, words: &[Word], id: WordId) -> bool {
        let idx = self.depth_index(words[id].depth());
        let Some(bin) = self.bins.get_mut(&idx) else {
            return false;
        };
        let Some(pos) = bin.iter().position(|&w| w == id) else {
            return false;
        };
        bin.remove(pos);
        if bin.is_empty() {
            self.bins.remove(&idx);
        }
        self.len -= 1;
        let r = words[id].bbox();
        let on_edge = self
            .bbox
            .is_some_and(|b| r.llx <= b.llx || r.lly <= b.lly || r.urx >= b.urx || r.ury >= b.ury);
        if on_edge {
            self.bbox = self.ids().map(|w| words[w].bbox()).reduce(|a, b| a.union(&b));
        }
        true
    }

    /// Depth-bin indices in increasing order.
    pub fn depth_indexes(&self) -> impl Iterator<Item = i64> + '_ {
        self.bins.keys().copied()
    }

    /// Number of non-empty depth bins.
    pub fn row_count(&self) -> usize {
        self.bins.len()
    }

    pub fn bin(&self, idx: i64) -> &[WordId] {
        self.bins.get(&idx).map_or(&[][..], Vec::as_slice)
    }

    /// Bins whose index covers any depth in `[min_depth, max_depth]`.
    pub fn bins_in_range(
        &self,
        min_depth: f64,
        max_depth: f64,
    ) -> impl Iterator<Item = (i64, &[WordId])> + '_ {
        let lo = self.depth_index(min_depth);
        let hi = self.depth_index(max_depth).max(lo);
        self.bins.range(lo..=hi).map(|(k, v)| (*k, v.as_slice()))
    }

    /// Left-most word in a bin.
    pub fn first_word(&self, idx: i64) -> Option<WordId> {
        self.bins.get(&idx).and_then(|bin| bin.first().copied())
    }

    /// Left-most word of the shallowest bin.
    pub fn top_left_word(&self) -> Option<WordId> {
        self.bins.values().next().and_then(|bin| bin.first().copied())
    }

    pub fn ids(&self) -> impl Iterator<Item = WordId> + '_ {
        self.bins.values().flat_map(|bin| bin.iter().copied())
    }

    pub fn contains(&self, words: &[Word], id: WordId) -> bool {
        self.bin(self.depth_index(words[id].depth())).contains(&id)
    }

    /// Depth of the shallowest word.
    pub fn min_depth(&self, words: &[Word]) -> Option<f64> {
        self.bins
            .values()
            .next()
            .and_then(|bin| bin.iter().map(|&id| words[id].depth()).min_by(|a, b| cmp_f64(*a, *b)))
    }

    /// Depth of the deepest word.
    pub fn max_depth(&self, words: &[Word]) -> Option<f64> {
        self.bins
            .values()
            .next_back()
            .and_then(|bin| bin.iter().map(|&id| words[id].depth()).max_by(|a, b| cmp_f64(*a, *b)))
    }

    /// Left-most word whose depth lies in `[min_depth, max_depth]`.
    /// Ties on `llx` go to the shallower word.
    pub fn leftmost_in_depth_range(
        &self,
        words: &[Word],
        min_depth: f64,
        max_depth: f64,
    ) -> Option<WordId> {
        self.bins_in_range(min_depth, max_depth)
            .flat_map(|(_, bin)| bin.iter().copied())
            .filter(|&id| {
                let d = words[id].depth();
                min_depth <= d && d <= max_depth
            })
            .min_by(|&a, &b| {
                cmp_f64(words[a].bbox().llx, words[b].bbox().llx)
                    .then(cmp_f64(words[a].depth(), words[b].depth()))
                    .then(a.cmp(&b))
            })
    }

    /// The word that should start the next line: the left-most word within
    /// `top_word_range` font sizes below the shallowest word. A small raised
    /// glyph at the top of the bag therefore does not seed a line when a
    /// normal word to its left is close below it.
    pub fn top_reading_word(&self, words: &[Word], params: &LayoutParams) -> Option<WordId> {
        let min_depth = self.min_depth(words)?;
        let range = params.top_word_range * size_scale(self.font_size);
        self.leftmost_in_depth_range(words, min_depth, min_depth + range)
    }

    /// Moves every word of `other` into this bag.
    pub fn absorb(&mut self, words: &[Word], other: WordBag) {
        for id in other.ids() {
            self.insert(words, id);
        }
    }
}
