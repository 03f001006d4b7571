//! Tetromino definitions and the rotation catalogue.
//!
//! Each base shape is a small boolean occupancy matrix. The catalogue holds
//! every geometrically distinct 90° rotation of the seven free tetrominoes,
//! built once per process and shared read-only by every search.

use std::fmt;

use once_cell::sync::Lazy;

/// Number of cells in every tetromino.
pub const CELLS_PER_PIECE: usize = 4;

/// Largest row or column span of any tetromino rotation (the Long piece).
pub const MAX_SPAN: usize = 4;

/// Total number of distinct rotations across all seven shapes.
pub const NUM_ROTATIONS: usize = 19;

/// The seven free tetrominoes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Square,
    Long,
    S,
    Z,
    L,
    J,
    T,
}

impl Shape {
    /// All shapes in catalogue order.
    pub const ALL: [Shape; 7] = [
        Shape::Square,
        Shape::Long,
        Shape::S,
        Shape::Z,
        Shape::L,
        Shape::J,
        Shape::T,
    ];

    /// Number of distinct 90° rotations of this shape.
    ///
    /// The square is symmetric under a quarter turn; the long, S and Z shapes
    /// are symmetric under a half turn.
    pub const fn rotation_count(self) -> usize {
        match self {
            Shape::Square => 1,
            Shape::Long | Shape::S | Shape::Z => 2,
            Shape::L | Shape::J | Shape::T => 4,
        }
    }

    /// Occupancy rows of the base orientation, `1` marking a filled cell.
    const fn base(self) -> &'static [&'static [u8]] {
        match self {
            Shape::Square => &[&[1, 1], &[1, 1]],
            Shape::Long => &[&[1, 1, 1, 1]],
            Shape::S => &[&[0, 1, 1], &[1, 1, 0]],
            Shape::Z => &[&[1, 1, 0], &[0, 1, 1]],
            Shape::L => &[&[1, 0], &[1, 0], &[1, 1]],
            Shape::J => &[&[0, 1], &[0, 1], &[1, 1]],
            Shape::T => &[&[1, 1, 1], &[0, 1, 0]],
        }
    }
}

/// One rotation of a tetromino as a `rows × cols` occupancy matrix.
///
/// Uses a fixed-size backing array so pieces are `Copy` and never allocate.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    shape: Shape,
    rows: usize,
    cols: usize,
    cells: [[bool; MAX_SPAN]; MAX_SPAN],
}

impl Piece {
    /// Builds the base orientation of a shape.
    pub fn base(shape: Shape) -> Self {
        let rows = shape.base();
        let mut cells = [[false; MAX_SPAN]; MAX_SPAN];
        for (r, row) in rows.iter().enumerate() {
            for (c, &filled) in row.iter().enumerate() {
                cells[r][c] = filled != 0;
            }
        }
        Self {
            shape,
            rows: rows.len(),
            cols: rows[0].len(),
            cells,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns whether the cell at `(row, col)` of this rotation is filled.
    ///
    /// Cells outside the matrix are reported as empty.
    #[inline]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row][col]
    }

    /// Filled cells as `(row, col)` pairs in row-major order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows)
            .flat_map(move |r| (0..self.cols).map(move |c| (r, c)))
            .filter(move |&(r, c)| self.cells[r][c])
    }

    /// Column of the leftmost filled cell in row 0.
    ///
    /// This is the piece's first cell in row-major order, so anchoring the
    /// piece `lead_column()` columns to the left of a target cell makes the
    /// piece cover that target with its first cell.
    pub fn lead_column(&self) -> usize {
        (0..self.cols)
            .find(|&c| self.cells[0][c])
            .unwrap_or(self.cols)
    }

    /// Rotates the piece 90° clockwise.
    ///
    /// An `R × C` matrix becomes `C × R` with `new[i][j] = old[R-1-j][i]`.
    pub fn rotate(&self) -> Self {
        let mut cells = [[false; MAX_SPAN]; MAX_SPAN];
        for i in 0..self.cols {
            for j in 0..self.rows {
                cells[i][j] = self.cells[self.rows - 1 - j][i];
            }
        }
        Self {
            shape: self.shape,
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Base orientation followed by its `rotation_count() - 1` successors.
    pub fn rotations(shape: Shape) -> Vec<Piece> {
        let mut rotations = Vec::with_capacity(shape.rotation_count());
        let mut current = Piece::base(shape);
        for _ in 0..shape.rotation_count() {
            rotations.push(current);
            current = current.rotate();
        }
        rotations
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({:?}", self.shape)?;
        for r in 0..self.rows {
            f.write_str(" ")?;
            for c in 0..self.cols {
                f.write_str(if self.is_occupied(r, c) { "#" } else { "." })?;
            }
        }
        f.write_str(")")
    }
}

static CATALOGUE: Lazy<Vec<Piece>> = Lazy::new(|| {
    Shape::ALL
        .iter()
        .flat_map(|&shape| Piece::rotations(shape))
        .collect()
});

/// Every distinct rotation of every tetromino, in [`Shape::ALL`] order.
pub fn all_rotations() -> &'static [Piece] {
    &CATALOGUE
}
