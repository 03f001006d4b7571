//! Tetromino Tiling Counter Library
//!
//! Counts the ways to cover a `width × length` rectangle with the seven free
//! tetrominoes in any rotation, with no overlap and no overhang.

pub mod error;
pub mod grid;
pub mod mask;
pub mod pieces;
pub mod protocol;
pub mod tiling;

pub use error::{ProtocolError, TilingError};
pub use tiling::{result, result_with, Count, SearchOptions};
