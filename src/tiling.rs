//! Memoized depth-first tiling counter.
//!
//! The search always fills the first empty cell in row-major order. Every
//! cell before it is already covered, so any tetromino covering it must do so
//! with its own first cell (top row, leftmost filled column). That fixes one
//! anchor per rotation, and each tiling is reached by exactly one sequence of
//! placements.
//!
//! Key points:
//! - Grid occupancy is a bitmask, which doubles as the memoization key
//! - FxHashMap cache from key to completion count, one per query
//! - Iterative work stack instead of recursion, so tall grids cannot blow
//!   the thread stack

use log::debug;
use rustc_hash::FxHashMap;

use crate::error::TilingError;
use crate::grid::{Coord, Grid};
use crate::mask::{CellMask, WideMask};
use crate::pieces::{all_rotations, Piece, CELLS_PER_PIECE};

/// Number of tilings of a grid.
pub type Count = u128;

/// Knobs for a single search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    /// Cache completion counts per grid state. Disabling this recomputes every
    /// subtree and exists as a reference mode.
    pub memoize: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { memoize: true }
    }
}

/// Work counters collected during a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Grid states whose children were enumerated.
    pub expanded: u64,
    /// Child states answered from the cache.
    pub cache_hits: u64,
    /// Placements attempted, successful or not.
    pub placements_tried: u64,
    /// Complete tilings reached directly.
    pub completed: u64,
}

/// A grid state on the work stack, partway through its candidate rotations.
struct Frame<M> {
    grid: Grid<M>,
    target: Coord,
    next_rotation: usize,
    total: Count,
}

impl<M: CellMask> Frame<M> {
    /// Returns the next grid reachable by placing a rotation over the target.
    fn next_child(&mut self, rotations: &[Piece], stats: &mut SearchStats) -> Option<Grid<M>> {
        let (x, y) = self.target;
        while let Some(piece) = rotations.get(self.next_rotation) {
            self.next_rotation += 1;
            // pieces whose lead cell is right of the target would start left of column 0
            let Some(anchor_x) = x.checked_sub(piece.lead_column()) else {
                continue;
            };
            stats.placements_tried += 1;
            if let Some(child) = self.grid.place(piece, (anchor_x, y)) {
                return Some(child);
            }
        }
        None
    }

    fn add(&mut self, count: Count) -> Result<(), TilingError> {
        self.total = self
            .total
            .checked_add(count)
            .ok_or(TilingError::CountOverflow {
                width: self.grid.width(),
                length: self.grid.length(),
            })?;
        Ok(())
    }
}

/// Outcome of visiting a grid state.
enum Visit<M> {
    /// The count is already known.
    Known(Count),
    /// The state must be explored.
    Explore(Frame<M>),
}

/// Tiling counter for one grid size.
pub struct TilingSearch<M> {
    rotations: &'static [Piece],
    cache: Option<FxHashMap<M, Count>>,
    stats: SearchStats,
}

impl<M: CellMask> TilingSearch<M> {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            rotations: all_rotations(),
            cache: options.memoize.then(FxHashMap::default),
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Number of distinct grid states cached so far.
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map_or(0, FxHashMap::len)
    }

    /// Counts the ways to complete `grid` into a full tiling.
    ///
    /// Cached states are answered without exploration; every state that is
    /// fully explored is cached under its key before its count is handed to
    /// its parent.
    pub fn possibilities(&mut self, grid: Grid<M>) -> Result<Count, TilingError> {
        let mut stack = match self.visit(grid) {
            Visit::Known(count) => return Ok(count),
            Visit::Explore(frame) => vec![frame],
        };
        let mut result = 0;

        while let Some(frame) = stack.last_mut() {
            match frame.next_child(self.rotations, &mut self.stats) {
                Some(child) => match self.visit(child) {
                    Visit::Known(count) => frame.add(count)?,
                    Visit::Explore(child_frame) => stack.push(child_frame),
                },
                None => {
                    let total = frame.total;
                    if let Some(done) = stack.pop() {
                        self.store(done.grid.into_key(), total);
                    }
                    match stack.last_mut() {
                        Some(parent) => parent.add(total)?,
                        None => result = total,
                    }
                }
            }
        }

        Ok(result)
    }

    fn visit(&mut self, grid: Grid<M>) -> Visit<M> {
        let Some(target) = grid.first_empty() else {
            self.stats.completed += 1;
            return Visit::Known(1);
        };
        if let Some(&count) = self.cache.as_ref().and_then(|cache| cache.get(grid.key())) {
            self.stats.cache_hits += 1;
            return Visit::Known(count);
        }
        self.stats.expanded += 1;
        Visit::Explore(Frame {
            grid,
            target,
            next_rotation: 0,
            total: 0,
        })
    }

    fn store(&mut self, key: M, count: Count) {
        if let Some(cache) = self.cache.as_mut() {
            cache.insert(key, count);
        }
    }
}

/// Counts the tetromino tilings of a `width × length` grid.
///
/// Returns `Ok(0)` when the area is not a multiple of four.
pub fn result(width: usize, length: usize) -> Result<Count, TilingError> {
    result_with(width, length, SearchOptions::default())
}

/// [`result`] with explicit search options.
pub fn result_with(
    width: usize,
    length: usize,
    options: SearchOptions,
) -> Result<Count, TilingError> {
    let cells = width
        .checked_mul(length)
        .ok_or(TilingError::DimensionsTooLarge { width, length })?;
    if cells % CELLS_PER_PIECE != 0 {
        return Ok(0);
    }

    // transposing preserves the count; scanning along the shorter side keeps
    // the frontier, and so the number of reachable states, small
    let (width, length) = if width < length {
        (length, width)
    } else {
        (width, length)
    };

    // pick the narrowest key that indexes every cell
    if cells <= u64::CAPACITY {
        count::<u64>(width, length, options)
    } else if cells <= u128::CAPACITY {
        count::<u128>(width, length, options)
    } else {
        count::<WideMask>(width, length, options)
    }
}

fn count<M: CellMask>(
    width: usize,
    length: usize,
    options: SearchOptions,
) -> Result<Count, TilingError> {
    let mut search = TilingSearch::<M>::new(options);
    let total = search.possibilities(Grid::empty(width, length))?;
    let stats = search.stats();
    debug!(
        "{}x{}: {} tilings, {} states expanded, {} cache hits, {} completions reached, \
         {} placements tried, {} cached",
        width,
        length,
        total,
        stats.expanded,
        stats.cache_hits,
        stats.completed,
        stats.placements_tried,
        search.cache_len()
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cells of every fixed tetromino as `(dx, dy)` offsets, written out by hand.
    const FIXED_TETROMINOES: [[(i32, i32); 4]; 19] = [
        [(0, 0), (1, 0), (0, 1), (1, 1)],
        [(0, 0), (1, 0), (2, 0), (3, 0)],
        [(0, 0), (0, 1), (0, 2), (0, 3)],
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(1, 0), (0, 1), (1, 1), (0, 2)],
        [(0, 0), (0, 1), (0, 2), (1, 2)],
        [(0, 0), (1, 0), (2, 0), (0, 1)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(0, 0), (1, 0), (0, 1), (0, 2)],
        [(0, 0), (1, 0), (2, 0), (2, 1)],
        [(0, 0), (1, 0), (2, 0), (1, 1)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(0, 0), (0, 1), (1, 1), (0, 2)],
    ];

    /// Exact-cover count over every placement of every fixed tetromino,
    /// independent of the catalogue and of the anchoring rule.
    fn brute_force(width: usize, length: usize) -> u64 {
        let (w, l) = (width as i32, length as i32);
        let cells = width * length;
        let mut by_cell: Vec<Vec<u64>> = vec![Vec::new(); cells];
        for shape in &FIXED_TETROMINOES {
            for oy in 0..w {
                for ox in 0..l {
                    let placed: Option<Vec<usize>> = shape
                        .iter()
                        .map(|&(dx, dy)| {
                            let (x, y) = (ox + dx, oy + dy);
                            ((0..l).contains(&x) && (0..w).contains(&y))
                                .then(|| (y * l + x) as usize)
                        })
                        .collect();
                    if let Some(placed) = placed {
                        let mask = placed.iter().fold(0u64, |m, &c| m | 1 << c);
                        for c in placed {
                            by_cell[c].push(mask);
                        }
                    }
                }
            }
        }

        fn cover(
            covered: u64,
            cells: usize,
            by_cell: &[Vec<u64>],
            memo: &mut std::collections::HashMap<u64, u64>,
        ) -> u64 {
            let Some(target) = (0..cells).find(|&c| covered & (1 << c) == 0) else {
                return 1;
            };
            if let Some(&known) = memo.get(&covered) {
                return known;
            }
            let total = by_cell[target]
                .iter()
                .filter(|&&mask| covered & mask == 0)
                .map(|&mask| cover(covered | mask, cells, by_cell, memo))
                .sum();
            memo.insert(covered, total);
            total
        }

        cover(0, cells, &by_cell, &mut std::collections::HashMap::new())
    }

    #[test]
    fn test_fixed_tetromino_table_matches_catalogue() {
        let mut from_catalogue: Vec<Vec<(i32, i32)>> = all_rotations()
            .iter()
            .map(|p| {
                let mut cells: Vec<_> = p
                    .occupied_cells()
                    .map(|(r, c)| (c as i32, r as i32))
                    .collect();
                cells.sort();
                cells
            })
            .collect();
        let mut by_hand: Vec<Vec<(i32, i32)>> = FIXED_TETROMINOES
            .iter()
            .map(|cells| {
                let mut cells = cells.to_vec();
                cells.sort();
                cells
            })
            .collect();
        from_catalogue.sort();
        by_hand.sort();
        assert_eq!(from_catalogue, by_hand);
    }

    #[test]
    fn test_area_not_divisible_by_four() {
        assert_eq!(result(1, 1), Ok(0));
        assert_eq!(result(2, 3), Ok(0));
        assert_eq!(result(3, 5), Ok(0));
        assert_eq!(result(2, 2 * 64 + 1), Ok(0));
    }

    #[test]
    fn test_zero_area_has_one_tiling() {
        assert_eq!(result(0, 0), Ok(1));
        assert_eq!(result(0, 7), Ok(1));
        assert_eq!(result(5, 0), Ok(1));
    }

    #[test]
    fn test_known_counts() {
        assert_eq!(result(2, 2), Ok(1));
        assert_eq!(result(1, 4), Ok(1));
        assert_eq!(result(4, 1), Ok(1));
        assert_eq!(result(2, 4), Ok(4));
        assert_eq!(result(3, 4), Ok(23));
        assert_eq!(result(4, 4), Ok(117));
        assert_eq!(result(4, 5), Ok(454));
        assert_eq!(result(4, 6), Ok(2003));
        assert_eq!(result(2, 8), Ok(25));
        assert_eq!(result(3, 8), Ok(997));
        assert_eq!(result(6, 6), Ok(178_939));
    }

    #[test]
    fn test_matches_brute_force_up_to_six_by_six() {
        for width in 0..=6 {
            for length in 0..=6 {
                assert_eq!(
                    result(width, length),
                    Ok(Count::from(brute_force(width, length))),
                    "mismatch on {width}x{length}"
                );
            }
        }
    }

    #[test]
    fn test_transpose_symmetry() {
        for width in 0..=8 {
            for length in width..=8 {
                if width * length > 40 {
                    continue;
                }
                assert_eq!(
                    result(width, length),
                    result(length, width),
                    "{width}x{length} differs from its transpose"
                );
            }
        }
        assert_eq!(result(4, 12), Ok(15_747_348));
        assert_eq!(result(12, 4), Ok(15_747_348));
    }

    #[test]
    fn test_search_is_symmetric_in_either_orientation() {
        let options = SearchOptions::default();
        for (width, length) in [(2, 4), (3, 4), (4, 5), (2, 10), (4, 6)] {
            assert_eq!(
                count::<u64>(width, length, options),
                count::<u64>(length, width, options),
                "{width}x{length} searched row-wise differs from its transpose"
            );
        }
    }

    #[test]
    fn test_long_rows_search_the_short_side() {
        let start = std::time::Instant::now();
        assert_eq!(result(2, 32), Ok(2_550_409));
        assert_eq!(result(32, 2), Ok(2_550_409));
        assert!(
            start.elapsed() < std::time::Duration::from_secs(5),
            "2x32 took {:?}",
            start.elapsed()
        );
    }

    #[test]
    fn test_memoization_does_not_change_counts() {
        let uncached = SearchOptions { memoize: false };
        for (width, length) in [(2, 2), (2, 4), (4, 4), (3, 8), (4, 5), (2, 10)] {
            assert_eq!(
                result_with(width, length, uncached),
                result(width, length),
                "cache changed the count for {width}x{length}"
            );
        }
    }

    #[test]
    fn test_repeated_calls_agree() {
        let first = result(4, 6);
        for _ in 0..3 {
            assert_eq!(result(4, 6), first);
        }
    }

    #[test]
    fn test_u128_keys() {
        assert_eq!(result(20, 4), Ok(2_373_975_139_658));
        assert_eq!(result(36, 2), Ok(17_480_761));
    }

    #[test]
    fn test_key_width_boundaries() {
        // exactly fills a u64
        assert_eq!(result(8, 8), Ok(19_077_209_438));
        // exactly fills a u128
        assert_eq!(result(64, 2), Ok(12_422_650_078_084));
        assert_eq!(result(2, 64), Ok(12_422_650_078_084));
        // first size past a u128
        assert_eq!(result(66, 2), Ok(32_522_920_134_769));
    }

    #[test]
    fn test_wide_keys_and_counts_beyond_u64() {
        assert_eq!(result(40, 4), Ok(20_987_809_633_896_924_838_156_673));
        assert_eq!(result(4, 40), Ok(20_987_809_633_896_924_838_156_673));
    }

    #[test]
    fn test_dimensions_too_large() {
        assert_eq!(
            result(usize::MAX, 2),
            Err(TilingError::DimensionsTooLarge {
                width: usize::MAX,
                length: 2
            })
        );
    }

    #[test]
    fn test_cache_serves_repeated_states() {
        let mut search = TilingSearch::<u64>::new(SearchOptions::default());
        assert_eq!(search.possibilities(Grid::empty(4, 4)), Ok(117));
        let stats = search.stats();
        assert!(stats.cache_hits > 0);
        assert_eq!(search.cache_len() as u64, stats.expanded);

        // the root is now cached
        assert_eq!(search.possibilities(Grid::empty(4, 4)), Ok(117));
        assert_eq!(search.stats().expanded, stats.expanded);
    }

    #[test]
    fn test_uncached_search_explores_more() {
        let mut cached = TilingSearch::<u64>::new(SearchOptions::default());
        let mut uncached = TilingSearch::<u64>::new(SearchOptions { memoize: false });
        let grid = Grid::empty(4, 6);
        assert_eq!(cached.possibilities(grid.clone()), uncached.possibilities(grid));
        assert_eq!(uncached.cache_len(), 0);
        assert_eq!(uncached.stats().cache_hits, 0);
        assert!(uncached.stats().expanded > cached.stats().expanded);
        assert_eq!(uncached.stats().completed, 2003);
        assert!(cached.stats().completed < 2003);
    }

    #[test]
    fn test_possibilities_from_partial_grid() {
        let square = Piece::base(crate::pieces::Shape::Square);
        let grid = Grid::<u64>::empty(2, 4).place(&square, (0, 0)).unwrap();
        let mut search = TilingSearch::new(SearchOptions::default());
        // the remaining 2x2 block only takes a square
        assert_eq!(search.possibilities(grid), Ok(1));

        let mut search = TilingSearch::new(SearchOptions::default());
        assert_eq!(search.possibilities(Grid::<u64>::filled(3, 4)), Ok(1));
    }
}
