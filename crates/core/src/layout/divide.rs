//! Region division: splitting a page's words into paragraph bags.
//!
//! Paragraphs are grown greedily from the top-left remaining word. A
//! paragraph absorbs words in a depth band around it that either overlap it
//! in the reading direction (vertical scan) or lie within a short reading
//! gap of it (horizontal scan). When growth stalls, a left-gutter probe pulls
//! in list bullets and leading numerals. Candidate lookups go through a
//! [`RectIndex`] over all page words and a roaring bitmap of the words still
//! in the page bag.

use roaring::RoaringBitmap;
use tracing::{debug, trace};

use crate::geometry::{Rect, cmp_f64, within_tol};
use crate::index::{Attr, RectIndex};
use crate::params::LayoutParams;

use super::bag::{WordBag, WordId};
use super::word::{Word, size_scale};

/// Page-wide state shared by the growth scans.
struct Divider<'a> {
    words: &'a [Word],
    index: RectIndex,
    page_top: f64,
    tallest: f64,
    page: WordBag,
    remaining: RoaringBitmap,
    params: &'a LayoutParams,
}

impl<'a> Divider<'a> {
    fn new(words: &'a [Word], page_top: f64, params: &'a LayoutParams) -> Self {
        let rects: Vec<Rect> = words.iter().map(Word::bbox).collect();
        let index = RectIndex::with_depth(&rects, page_top);
        let remaining = index.all();
        let tallest = rects.iter().map(Rect::height).fold(0.0, f64::max);
        Self {
            words,
            index,
            page_top,
            tallest,
            page: WordBag::from_words(words, params.depth_bin_points),
            remaining,
            params,
        }
    }

    fn take(&mut self, para: &mut WordBag, id: WordId) {
        let removed = self.page.remove(self.words, id);
        debug_assert!(removed, "word {id} moved twice");
        self.remaining.remove(id as u32);
        para.insert(self.words, id);
    }

    /// Remaining words whose vertical extent comes within `depth_gap` of
    /// `bbox`. Coarse filter on depth through the index, exact test after.
    fn band(&self, bbox: &Rect, depth_gap: f64) -> Vec<WordId> {
        let lo = bbox.lly - depth_gap - self.tallest;
        let hi = bbox.ury + depth_gap;
        let mut cands = self
            .index
            .range(Attr::Depth, self.page_top - hi, self.page_top - lo);
        cands &= &self.remaining;
        cands
            .iter()
            .map(|id| id as WordId)
            .filter(|&id| {
                let r = self.words[id].bbox();
                r.ury >= bbox.lly - depth_gap && r.lly <= bbox.ury + depth_gap
            })
            .collect()
    }

    /// One growth scan. `reach` widens the paragraph in the reading
    /// direction, in font sizes; zero means plain x-overlap.
    fn scan(&mut self, para: &mut WordBag, reach: f64) -> usize {
        let Some(bbox) = para.bbox() else {
            return 0;
        };
        let size = size_scale(para.font_size());
        let depth_gap = self.params.max_intra_depth_gap * size;
        let gap = reach * size;
        let mut added = 0;
        for id in self.band(&bbox, depth_gap) {
            let word = &self.words[id];
            if !bbox.x_overlaps_plus_gap(&word.bbox(), gap) {
                continue;
            }
            if !within_tol(
                word.font_size(),
                para.font_size(),
                self.params.intra_font_tol,
                size,
            ) {
                continue;
            }
            self.take(para, id);
            added += 1;
        }
        added
    }

    /// Pulls in words just left of the paragraph that share its rows, when
    /// there are few of them or they line up with a good share of its rows.
    fn probe_left_gutter(&mut self, para: &mut WordBag) -> usize {
        let Some(bbox) = para.bbox() else {
            return 0;
        };
        let reach = self.params.min_inter_reading_gap * size_scale(para.font_size());
        let mut cands = self.index.range(Attr::Urx, bbox.llx - reach, bbox.llx);
        cands &= &self.remaining;
        let gutter: Vec<WordId> = cands
            .iter()
            .map(|id| id as WordId)
            .filter(|&id| {
                let r = self.words[id].bbox();
                r.llx < bbox.llx && r.lly < bbox.ury && r.ury > bbox.lly
            })
            .collect();
        if gutter.is_empty() {
            return 0;
        }
        let rows = para.row_count() as f64;
        let count = gutter.len();
        if count <= self.params.gutter_small_count
            || count as f64 > self.params.gutter_row_fraction * rows
        {
            trace!(count, rows, "left gutter pulled in");
            for id in gutter {
                self.take(para, id);
            }
            count
        } else {
            0
        }
    }

    fn grow(&mut self, para: &mut WordBag) {
        loop {
            let mut added = self.scan(para, 0.0);
            added += self.scan(para, self.params.max_intra_reading_gap);
            if added > 0 {
                continue;
            }
            if self.probe_left_gutter(para) == 0 {
                break;
            }
        }
    }
}

/// Splits all `words` into one bag per paragraph region. Every word ends up
/// in exactly one bag.
pub fn divide_into_paragraphs(
    words: &[Word],
    page_top: f64,
    params: &LayoutParams,
) -> Vec<WordBag> {
    let mut divider = Divider::new(words, page_top, params);
    let mut bags = Vec::new();
    while let Some(seed) = divider.page.top_left_word() {
        let mut para = WordBag::new(params.depth_bin_points);
        divider.take(&mut para, seed);
        divider.grow(&mut para);
        bags.push(para);
    }
    debug_assert!(divider.remaining.is_empty());
    let divided = bags.len();
    let bags = merge_contained(words, bags, params);
    debug!(words = words.len(), divided, merged = bags.len(), "paragraph regions");
    bags
}

/// Folds bags that sit inside a larger bag (widened slightly to the left)
/// into that bag. Catches orphan leading characters.
fn merge_contained(words: &[Word], mut bags: Vec<WordBag>, params: &LayoutParams) -> Vec<WordBag> {
    let area = |b: &WordBag| b.bbox().map_or(0.0, |r| r.area());
    let height = |b: &WordBag| b.bbox().map_or(0.0, |r| r.height());
    bags.sort_by(|a, b| {
        cmp_f64(area(b), area(a)).then(cmp_f64(height(b), height(a)))
    });

    let mut merged: Vec<WordBag> = Vec::with_capacity(bags.len());
    for bag in bags {
        let Some(inner) = bag.bbox() else {
            continue;
        };
        let host = merged.iter_mut().find(|host| {
            host.bbox().is_some_and(|outer| {
                let widened = Rect {
                    llx: outer.llx - params.merge_extension * size_scale(host.font_size()),
                    ..outer
                };
                widened.contains(&inner)
            })
        });
        match host {
            Some(host) => host.absorb(words, bag),
            None => merged.push(bag),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::Mark;

    const TOP: f64 = 200.0;

    fn word(text: &str, llx: f64, lly: f64, size: f64) -> Word {
        let w = 0.5 * size * text.chars().count() as f64;
        Word::new(
            Mark::new(text, Rect::new(llx, lly, llx + w, lly + size), "F", size),
            TOP,
        )
    }

    fn texts(words: &[Word], bags: &[WordBag]) -> Vec<Vec<String>> {
        let mut out: Vec<Vec<String>> = bags
            .iter()
            .map(|b| {
                let mut t: Vec<String> = b.ids().map(|id| words[id].text()).collect();
                t.sort();
                t
            })
            .collect();
        out.sort();
        out
    }

    #[test]
    fn lines_of_a_paragraph_stay_together() {
        let words = vec![
            word("alpha", 0.0, 100.0, 10.0),
            word("beta", 30.0, 100.0, 10.0),
            word("gamma", 0.0, 88.0, 10.0),
            word("delta", 0.0, 76.0, 10.0),
        ];
        let bags = divide_into_paragraphs(&words, TOP, &LayoutParams::default());
        assert_eq!(bags.len(), 1);
        assert_eq!(bags[0].len(), 4);
    }

    #[test]
    fn depth_gap_separates_paragraphs() {
        let words = vec![
            word("one", 0.0, 100.0, 10.0),
            word("two", 0.0, 60.0, 10.0),
        ];
        let bags = divide_into_paragraphs(&words, TOP, &LayoutParams::default());
        assert_eq!(bags.len(), 2);
    }

    #[test]
    fn wide_reading_gap_separates_columns() {
        let words = vec![
            word("left", 0.0, 100.0, 10.0),
            word("right", 60.0, 100.0, 10.0),
        ];
        let bags = divide_into_paragraphs(&words, TOP, &LayoutParams::default());
        assert_eq!(bags.len(), 2);
    }

    #[test]
    fn font_size_jump_separates_heading() {
        let words = vec![
            word("Title", 0.0, 112.0, 18.0),
            word("body", 0.0, 100.0, 10.0),
        ];
        let bags = divide_into_paragraphs(&words, TOP, &LayoutParams::default());
        assert_eq!(bags.len(), 2);
    }

    #[test]
    fn gutter_probe_pulls_bullet() {
        // The bullet sits lower than the text and in a larger font, so the
        // scans reject it; only the gutter probe can claim it.
        let words = vec![word("item", 20.0, 100.0, 10.0), word("•", 10.0, 97.5, 12.0)];
        let bags = divide_into_paragraphs(&words, TOP, &LayoutParams::default());
        assert_eq!(texts(&words, &bags), vec![vec!["item", "•"]]);
    }

    #[test]
    fn every_word_lands_in_one_bag() {
        let mut words = Vec::new();
        for row in 0..6 {
            for col in 0..4 {
                words.push(word("w", col as f64 * 40.0, 150.0 - row as f64 * 25.0, 10.0));
            }
        }
        let bags = divide_into_paragraphs(&words, TOP, &LayoutParams::default());
        let mut seen: Vec<WordId> = bags.iter().flat_map(|b| b.ids().collect::<Vec<_>>()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..words.len()).collect::<Vec<_>>());
    }

    #[test]
    fn contained_orphan_is_merged() {
        let words = vec![
            word("big", 10.0, 100.0, 10.0),
            word("x", 10.0, 100.0, 2.0),
        ];
        let bags = divide_into_paragraphs(&words, TOP, &LayoutParams::default());
        assert_eq!(bags.len(), 1);
    }
}
