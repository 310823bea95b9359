//! Error types for the folio layout library.

use thiserror::Error;

use crate::geometry::Rect;
use crate::mark::Orientation;

/// Primary error type for page layout operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("invalid {what} rectangle: {rect:?}")]
    InvalidRect { what: &'static str, rect: Rect },

    #[error("invalid layout parameters: {0}")]
    InvalidParams(String),

    #[error("mixed orientations on one page: expected {expected}, found {found}")]
    MixedOrientation {
        expected: Orientation,
        found: Orientation,
    },

    #[error("unsupported orientation: {0} degrees")]
    UnsupportedOrientation(i32),
}

/// Convenience Result type alias for LayoutError.
pub type Result<T> = std::result::Result<T, LayoutError>;
