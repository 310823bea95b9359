//! Line composition within a paragraph bag.

use crate::geometry::{Rect, cmp_f64, union_all, within_tol};
use crate::params::LayoutParams;

use super::bag::WordBag;
use super::word::{Word, size_scale};

/// Characters in Unicode's `Hyphen` property.
const HYPHENS: [char; 11] = [
    '\u{002D}', '\u{00AD}', '\u{058A}', '\u{1806}', '\u{2010}', '\u{2011}', '\u{2E17}', '\u{30FB}',
    '\u{FE63}', '\u{FF0D}', '\u{FF65}',
];

pub fn is_hyphen(c: char) -> bool {
    HYPHENS.contains(&c)
}

/// A run of words sharing a baseline, ordered by increasing x.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    words: Vec<Word>,
    bbox: Rect,
    depth: f64,
    font_size: f64,
    hyphenated: bool,
}

impl Line {
    /// Builds a line from words already in reading order.
    ///
    /// Returns `None` for an empty word list.
    pub fn new(words: Vec<Word>, params: &LayoutParams) -> Option<Self> {
        let rects: Vec<Rect> = words.iter().map(Word::bbox).collect();
        let bbox = union_all(&rects)?;
        let depth = words.iter().map(Word::depth).fold(f64::MIN, f64::max);
        let font_size = words.iter().map(Word::font_size).fold(0.0, f64::max);
        let mut line = Self {
            words,
            bbox,
            depth,
            font_size,
            hyphenated: false,
        };
        line.hyphenated = ends_with_hyphen(&line.text(), params.hyphenation_min);
        Some(line)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// True when the line ends in a hyphen that splits a word across lines.
    pub fn hyphenated(&self) -> bool {
        self.hyphenated
    }

    pub fn text(&self) -> String {
        let mut text = String::new();
        for word in &self.words {
            text.push_str(&word.text());
            if word.space_after() {
                text.push(' ');
            }
        }
        text
    }
}

fn ends_with_hyphen(text: &str, min_runes: usize) -> bool {
    if text.chars().count() < min_runes {
        return false;
    }
    let mut tail = text.chars().rev();
    match (tail.next(), tail.next()) {
        (Some(last), Some(prev)) => is_hyphen(last) && !prev.is_whitespace(),
        _ => false,
    }
}

/// Rejoins words split by out-of-order emission and marks the remaining
/// word breaks as spaces.
fn merge_fragments(words: Vec<Word>, size: f64, page_top: f64, params: &LayoutParams) -> Vec<Word> {
    let max_gap = params.max_intra_line_gap * size;
    let mut merged: Vec<Word> = Vec::with_capacity(words.len());
    for word in words {
        if let Some(prev) = merged.last_mut() {
            let fragment = prev.gap_to(&word) < max_gap
                && prev.last_font() == word.first_font()
                && within_tol(
                    prev.font_size(),
                    word.font_size(),
                    params.intra_word_font_tol,
                    size,
                );
            if fragment {
                prev.absorb(word, page_top);
                continue;
            }
            prev.set_space_after(true);
        }
        merged.push(word);
    }
    merged
}

/// Arranges every word of `bag` into lines, sorted by depth then x.
pub fn compose_lines(
    words: &[Word],
    mut bag: WordBag,
    page_top: f64,
    params: &LayoutParams,
) -> Vec<Line> {
    let mut lines = Vec::new();
    while let Some(seed) = bag.top_reading_word(words, params) {
        bag.remove(words, seed);
        let first = &words[seed];
        let size = size_scale(first.font_size());
        let min_depth = first.depth() - params.line_depth * size;
        let max_depth = first.depth() + params.line_depth * size;
        let max_gap = params.intra_word * size;

        let mut members = vec![seed];
        while let Some(next) = bag.leftmost_in_depth_range(words, min_depth, max_depth) {
            let last = members[members.len() - 1];
            let gap = words[last].gap_to(&words[next]);
            if gap < -params.max_overlap * size || gap > max_gap {
                break;
            }
            bag.remove(words, next);
            members.push(next);
        }

        let line_words = members.into_iter().map(|id| words[id].clone()).collect();
        let line_words = merge_fragments(line_words, size, page_top, params);
        if let Some(line) = Line::new(line_words, params) {
            lines.push(line);
        }
    }
    sort_lines(&mut lines);
    lines
}

pub(crate) fn sort_lines(lines: &mut [Line]) {
    lines.sort_by(|a, b| cmp_f64(a.depth, b.depth).then(cmp_f64(a.bbox.llx, b.bbox.llx)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::Mark;

    const TOP: f64 = 100.0;

    fn word(text: &str, llx: f64, lly: f64) -> Word {
        let w = 5.0 * text.chars().count() as f64;
        Word::new(
            Mark::new(text, Rect::new(llx, lly, llx + w, lly + 10.0), "F", 10.0),
            TOP,
        )
    }

    fn lines_of(words: &[Word]) -> Vec<Line> {
        let params = LayoutParams::default();
        let bag = WordBag::from_words(words, params.depth_bin_points);
        compose_lines(words, bag, TOP, &params)
    }

    #[test]
    fn words_on_a_baseline_form_one_line() {
        let words = vec![word("world", 30.0, 50.0), word("hello", 0.0, 50.0)];
        let lines = lines_of(&words);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "hello world");
        assert!(lines[0].words()[0].space_after());
        assert!(!lines[0].words()[1].space_after());
    }

    #[test]
    fn lines_sorted_by_depth() {
        let words = vec![word("second", 0.0, 38.0), word("first", 0.0, 50.0)];
        let lines = lines_of(&words);
        let texts: Vec<String> = lines.iter().map(Line::text).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(lines[0].depth() < lines[1].depth());
    }

    #[test]
    fn wide_gap_breaks_line() {
        let words = vec![word("a", 0.0, 50.0), word("b", 20.0, 50.0)];
        let lines = lines_of(&words);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].bbox().llx, 0.0);
        assert_eq!(lines[1].bbox().llx, 20.0);
    }

    #[test]
    fn touching_fragments_merge() {
        let words = vec![word("frag", 0.0, 50.0), word("ment", 20.0, 50.0)];
        let lines = lines_of(&words);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].words().len(), 1);
        assert_eq!(lines[0].text(), "fragment");
    }

    #[test]
    fn fragments_in_other_fonts_stay_apart() {
        let a = word("bold", 0.0, 50.0);
        let b = Word::new(
            Mark::new("face", Rect::new(20.0, 50.0, 40.0, 60.0), "G", 10.0),
            TOP,
        );
        let lines = lines_of(&[a, b]);
        assert_eq!(lines[0].text(), "bold face");
    }

    #[test]
    fn hyphen_detection() {
        assert!(ends_with_hyphen("exten-", 4));
        assert!(ends_with_hyphen("co\u{2010}", 3));
        assert!(!ends_with_hyphen("ab-", 4));
        assert!(!ends_with_hyphen("dash -", 4));
        assert!(!ends_with_hyphen("plain", 4));
    }

    #[test]
    fn line_aggregates() {
        let words = vec![word("exten-", 0.0, 50.0)];
        let lines = lines_of(&words);
        let line = &lines[0];
        assert!(line.hyphenated());
        assert_eq!(line.depth(), 50.0);
        assert_eq!(line.font_size(), 10.0);
        assert_eq!(line.bbox(), Rect::new(0.0, 50.0, 30.0, 60.0));
    }
}
