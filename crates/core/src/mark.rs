//! Glyph marks as delivered by the content-stream interpreter.
//!
//! Use `Mark::builder()` to construct marks with optional fields.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::Rect;

/// Optional color type for fill/stroke colors.
pub type Color = Option<Vec<f64>>;

/// Quarter-turn text orientation, counter-clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i32", into = "i32"))]
pub enum Orientation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Orientation {
    pub const fn degrees(self) -> i32 {
        match self {
            Orientation::Deg0 => 0,
            Orientation::Deg90 => 90,
            Orientation::Deg180 => 180,
            Orientation::Deg270 => 270,
        }
    }
}

impl TryFrom<i32> for Orientation {
    type Error = LayoutError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        match degrees.rem_euclid(360) {
            0 => Ok(Orientation::Deg0),
            90 => Ok(Orientation::Deg90),
            180 => Ok(Orientation::Deg180),
            270 => Ok(Orientation::Deg270),
            _ => Err(LayoutError::UnsupportedOrientation(degrees)),
        }
    }
}

impl From<Orientation> for i32 {
    fn from(o: Orientation) -> Self {
        o.degrees()
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// A single rendered glyph.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mark {
    /// Unicode text of the glyph (may be several chars for ligatures).
    pub text: String,
    /// Uninterpreted source bytes of the character code.
    #[cfg_attr(feature = "serde", serde(default))]
    pub original: Vec<u8>,
    pub bbox: Rect,
    pub font: String,
    pub font_size: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub orientation: Orientation,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fill_color: Color,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stroke_color: Color,
}

impl Mark {
    /// Creates a mark with upright orientation and no colors.
    /// `original` defaults to the UTF-8 bytes of `text`.
    pub fn new(text: &str, bbox: Rect, font: &str, font_size: f64) -> Self {
        Self::builder(text, bbox, font, font_size).build()
    }

    pub fn builder(text: &str, bbox: Rect, font: &str, font_size: f64) -> MarkBuilder {
        MarkBuilder::new(text, bbox, font, font_size)
    }

    /// True for marks that carry no visible text.
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }

    /// Depth of the bottom edge below `page_top`.
    pub fn depth(&self, page_top: f64) -> f64 {
        self.bbox.depth(page_top)
    }
}

/// Builder for Mark with fluent API for optional fields.
///
/// # Example
/// ```
/// use folio_core::geometry::Rect;
/// use folio_core::mark::{Mark, Orientation};
///
/// let m = Mark::builder("A", Rect::new(0.0, 0.0, 6.0, 10.0), "Helvetica", 10.0)
///     .orientation(Orientation::Deg90)
///     .fill_color(Some(vec![0.0, 0.0, 0.0]))
///     .build();
/// assert_eq!(m.original, b"A".to_vec());
/// ```
#[derive(Debug, Clone)]
pub struct MarkBuilder {
    mark: Mark,
}

impl MarkBuilder {
    pub fn new(text: &str, bbox: Rect, font: &str, font_size: f64) -> Self {
        Self {
            mark: Mark {
                text: text.to_string(),
                original: text.as_bytes().to_vec(),
                bbox,
                font: font.to_string(),
                font_size,
                orientation: Orientation::Deg0,
                fill_color: None,
                stroke_color: None,
            },
        }
    }

    /// Sets the raw character code bytes.
    pub fn original(mut self, original: &[u8]) -> Self {
        self.mark.original = original.to_vec();
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.mark.orientation = orientation;
        self
    }

    pub fn fill_color(mut self, color: Color) -> Self {
        self.mark.fill_color = color;
        self
    }

    pub fn stroke_color(mut self, color: Color) -> Self {
        self.mark.stroke_color = color;
        self
    }

    pub fn build(self) -> Mark {
        self.mark
    }
}
