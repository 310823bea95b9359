//! Layout analysis parameters.
//!
//! Contains LayoutParams for controlling how marks are grouped into words,
//! lines, paragraphs and tables. Unless noted otherwise, distances are
//! relative to the font size of the element being grown.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Parameters for page layout analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutParams {
    /// A reading gap of at least this much ends a word (about a space wide).
    pub max_word_advance: f64,

    /// A mark this far back from the end of the word starts a new word.
    pub max_kerning: f64,

    /// A baseline shift larger than this starts a new word.
    pub max_leading: f64,

    /// Width of a word bag depth bin, in points.
    pub depth_bin_points: f64,

    /// Words within this many font sizes of the shallowest word compete to
    /// seed a line. Keeps superscripts from starting lines.
    pub top_word_range: f64,

    /// Depth tolerance for words on the same line.
    pub line_depth: f64,

    /// Largest gap between consecutive words on a line.
    pub intra_word: f64,

    /// Largest backward overlap between consecutive words on a line.
    pub max_overlap: f64,

    /// Adjacent words on a line closer than this are fragments of one word.
    pub max_intra_line_gap: f64,

    /// Font size tolerance for merging word fragments.
    pub intra_word_font_tol: f64,

    /// Reading-direction reach when growing a paragraph sideways.
    pub max_intra_reading_gap: f64,

    /// Reach of the left-gutter probe that pulls bullets into paragraphs.
    pub min_inter_reading_gap: f64,

    /// Largest depth gap between a paragraph and a word that joins it.
    pub max_intra_depth_gap: f64,

    /// Font size tolerance for words joining a paragraph.
    pub intra_font_tol: f64,

    /// Font size tolerance between neighbouring paragraphs.
    pub inter_font_tol: f64,

    /// The gutter probe always fires for this many words or fewer.
    pub gutter_small_count: usize,

    /// The gutter probe also fires when its words exceed this fraction of
    /// the paragraph's depth rows.
    pub gutter_row_fraction: f64,

    /// Leftward extension, in font sizes, used when merging contained bags.
    pub merge_extension: f64,

    /// Minimum runes in a line before a trailing hyphen counts.
    pub hyphenation_min: usize,

    /// Collinearity and thinness tolerance for rulings, in points.
    pub ruling_tol: f64,

    /// Minimum ruling length, in points.
    pub ruling_significant: f64,

    /// Minimum non-empty cells in every table row.
    pub table_min_occ_row: usize,

    /// Minimum non-empty cells in every table column.
    pub table_min_occ_col: usize,

    /// Minimum fraction of non-empty table cells.
    pub table_min_fill: f64,

    /// Elide hyphens at the end of wrapped lines.
    pub do_hyphens: bool,

    /// Run text-alignment table detection.
    pub detect_tables: bool,

    /// Build tables from ruling grids.
    pub use_ruled_tables: bool,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            max_word_advance: 0.11,
            max_kerning: 0.19,
            max_leading: 0.04,
            depth_bin_points: 2.0,
            top_word_range: 1.0,
            line_depth: 0.5,
            intra_word: 1.0,
            max_overlap: 0.46,
            max_intra_line_gap: 0.02,
            intra_word_font_tol: 0.04,
            max_intra_reading_gap: 1.0,
            min_inter_reading_gap: 0.8,
            max_intra_depth_gap: 0.25,
            intra_font_tol: 0.1,
            inter_font_tol: 0.2,
            gutter_small_count: 5,
            gutter_row_fraction: 0.3,
            merge_extension: 0.99,
            hyphenation_min: 4,
            ruling_tol: 1.0,
            ruling_significant: 10.0,
            table_min_occ_row: 2,
            table_min_occ_col: 2,
            table_min_fill: 0.3,
            do_hyphens: true,
            detect_tables: true,
            use_ruled_tables: true,
        }
    }
}

impl LayoutParams {
    /// Checks that every tunable is in its legal range.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_word_advance", self.max_word_advance),
            ("max_kerning", self.max_kerning),
            ("max_leading", self.max_leading),
            ("depth_bin_points", self.depth_bin_points),
            ("top_word_range", self.top_word_range),
            ("line_depth", self.line_depth),
            ("intra_word", self.intra_word),
            ("max_intra_reading_gap", self.max_intra_reading_gap),
            ("min_inter_reading_gap", self.min_inter_reading_gap),
            ("ruling_significant", self.ruling_significant),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::InvalidParams(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("max_overlap", self.max_overlap),
            ("max_intra_line_gap", self.max_intra_line_gap),
            ("intra_word_font_tol", self.intra_word_font_tol),
            ("max_intra_depth_gap", self.max_intra_depth_gap),
            ("intra_font_tol", self.intra_font_tol),
            ("inter_font_tol", self.inter_font_tol),
            ("gutter_row_fraction", self.gutter_row_fraction),
            ("merge_extension", self.merge_extension),
            ("ruling_tol", self.ruling_tol),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LayoutError::InvalidParams(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        if !(self.table_min_fill > 0.0 && self.table_min_fill <= 1.0) {
            return Err(LayoutError::InvalidParams(format!(
                "table_min_fill should be in (0, 1], got {}",
                self.table_min_fill
            )));
        }
        if self.table_min_occ_row < 2 || self.table_min_occ_col < 2 {
            return Err(LayoutError::InvalidParams(
                "table occupancy minimums should be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LayoutParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_bin_width() {
        let params = LayoutParams {
            depth_bin_points: 0.0,
            ..LayoutParams::default()
        };
        assert!(matches!(
            params.validate(),
            Err(LayoutError::InvalidParams(msg)) if msg.contains("depth_bin_points")
        ));
    }

    #[test]
    fn rejects_fill_ratio_out_of_range() {
        let params = LayoutParams {
            table_min_fill: 1.5,
            ..LayoutParams::default()
        };
        assert!(params.validate().is_err());
    }
}
