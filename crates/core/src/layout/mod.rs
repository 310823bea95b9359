//! Layout analysis for a single upright page.
//!
//! This module contains:
//! - Mark to word grouping (`word`)
//! - Depth-binned word bags (`bag`)
//! - Paragraph region division (`divide`)
//! - Line composition (`line`) and paragraphs (`paragraph`)
//! - Reading order (`order`)

pub mod bag;
pub mod divide;
pub mod line;
pub mod order;
pub mod paragraph;
pub mod word;

pub use bag::{WordBag, WordId};
pub use divide::divide_into_paragraphs;
pub use line::{Line, compose_lines, is_hyphen};
pub use order::order_paragraphs;
pub use paragraph::Paragraph;
pub use word::{Word, make_words};

pub(crate) use paragraph::extend_bboxes;
pub(crate) use word::size_scale;
