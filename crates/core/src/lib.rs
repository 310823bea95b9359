//! folio - page layout analysis for positioned text marks.
//!
//! Takes the glyphs and vector paths an interpreter found on a page and
//! recovers words, paragraphs, lines, tables and a reading order, then
//! emits the page text together with a mark array that maps every emitted
//! byte range back to page geometry.

pub mod error;
pub mod geometry;
pub mod index;
pub mod layout;
pub mod mark;
pub mod orient;
pub mod page;
pub mod params;
pub mod table;
pub mod text;

pub use error::{LayoutError, Result};
pub use geometry::Rect;
pub use mark::{Color, Mark, Orientation};
pub use page::{
    PageInput, PageLayout, PageResult, analyze_page, extract_page, extract_pages,
    try_analyze_page,
};
pub use params::LayoutParams;
pub use table::{SubPath, Table};
pub use text::{PageText, TableCell, TextMark, TextMarkArray, TextTable};
