//! Error types for the tiling counter and its line protocol.

use std::num::ParseIntError;

use thiserror::Error;

/// Failures of the tiling search itself.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TilingError {
    /// The cell count of the grid does not fit in a `usize`.
    #[error("a {width}x{length} grid has too many cells to index")]
    DimensionsTooLarge { width: usize, length: usize },

    /// The number of tilings does not fit in a `u128`.
    #[error("the tiling count of a {width}x{length} grid exceeds {}", u128::MAX)]
    CountOverflow { width: usize, length: usize },
}

/// Failures while reading queries or writing answers.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("line {line_number}: expected `width length`, found {line:?}")]
    MalformedLine { line_number: usize, line: String },

    #[error("line {line_number}: {token:?} is not a non-negative integer")]
    InvalidDimension {
        line_number: usize,
        token: String,
        #[source]
        source: ParseIntError,
    },

    #[error("line {line_number}: {source}")]
    Tiling {
        line_number: usize,
        #[source]
        source: TilingError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
