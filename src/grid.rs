//! Immutable occupancy grid for tiling searches.
//!
//! A grid is `width` rows by `length` columns. Coordinates are `(x, y)` with
//! `x` indexing columns (`0..length`) and `y` indexing rows (`0..width`).
//! Cells are numbered row-major, `idx = y * length + x`, and the occupancy
//! bitmask over those indices is the grid's canonical key.

use std::fmt;

use crate::mask::CellMask;
use crate::pieces::{Piece, CELLS_PER_PIECE};

/// A grid coordinate as `(x, y)`.
pub type Coord = (usize, usize);

/// Converts `(x, y)` to a row-major cell index.
#[inline(always)]
pub const fn coord_to_idx(length: usize, x: usize, y: usize) -> usize {
    y * length + x
}

/// Converts a row-major cell index back to `(x, y)`.
#[inline(always)]
pub const fn idx_to_coord(length: usize, cell_index: usize) -> Coord {
    (cell_index % length, cell_index / length)
}

/// Rectangular occupancy grid backed by a cell mask.
///
/// Grids are never mutated after construction; [`Grid::place`] returns a new
/// grid and leaves the receiver untouched, so search branches can share a
/// parent freely.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Grid<M> {
    width: usize,
    length: usize,
    occupied: M,
}

impl<M: CellMask> Grid<M> {
    /// Creates a grid with no occupied cells.
    ///
    /// # Panics
    ///
    /// Panics if `width * length` exceeds the capacity of `M`.
    pub fn empty(width: usize, length: usize) -> Self {
        let cells = Self::checked_cells(width, length);
        Self {
            width,
            length,
            occupied: M::empty(cells),
        }
    }

    /// Creates a grid with every cell occupied.
    ///
    /// # Panics
    ///
    /// Panics if `width * length` exceeds the capacity of `M`.
    pub fn filled(width: usize, length: usize) -> Self {
        let cells = Self::checked_cells(width, length);
        Self {
            width,
            length,
            occupied: M::full(cells),
        }
    }

    fn checked_cells(width: usize, length: usize) -> usize {
        match width.checked_mul(length) {
            Some(cells) if cells <= M::CAPACITY => cells,
            _ => panic!(
                "a {width}x{length} grid does not fit in a {}-cell mask",
                M::CAPACITY
            ),
        }
    }

    /// Number of rows.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of columns.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.length
    }

    /// The canonical key: equal occupancy yields equal keys.
    #[inline]
    pub fn key(&self) -> &M {
        &self.occupied
    }

    pub fn into_key(self) -> M {
        self.occupied
    }

    /// Returns whether `(x, y)` is occupied. Cells outside the grid are not.
    pub fn is_occupied(&self, (x, y): Coord) -> bool {
        x < self.length
            && y < self.width
            && self.occupied.contains(coord_to_idx(self.length, x, y))
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.count_ones()
    }

    /// Finds the first unoccupied cell in row-major order.
    ///
    /// Returns `None` if the grid is full.
    #[inline]
    pub fn first_empty(&self) -> Option<Coord> {
        self.occupied
            .first_clear(self.cell_count())
            .map(|cell| idx_to_coord(self.length, cell))
    }

    /// Stamps `piece` onto the grid with its top-left corner at `anchor`.
    ///
    /// Returns `None` if any filled piece cell would leave the grid or land on
    /// an occupied cell; otherwise returns the grid with the piece's cells
    /// added.
    pub fn place(&self, piece: &Piece, (anchor_x, anchor_y): Coord) -> Option<Self> {
        if piece.rows() + anchor_y > self.width || piece.cols() + anchor_x > self.length {
            return None;
        }

        let mut cells = [0usize; CELLS_PER_PIECE];
        for (slot, (row, col)) in cells.iter_mut().zip(piece.occupied_cells()) {
            let cell = coord_to_idx(self.length, anchor_x + col, anchor_y + row);
            if self.occupied.contains(cell) {
                return None;
            }
            *slot = cell;
        }

        let mut occupied = self.occupied.clone();
        for cell in cells {
            occupied.insert(cell);
        }
        Some(Self {
            width: self.width,
            length: self.length,
            occupied,
        })
    }
}

/// Renders the grid one row per line, `#` for occupied and `.` for empty.
impl<M: CellMask> fmt::Display for Grid<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.width {
            for x in 0..self.length {
                f.write_str(if self.is_occupied((x, y)) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
