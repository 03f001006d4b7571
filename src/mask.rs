//! Bitmask representations of grid occupancy.
//!
//! Bit `i` is set when cell `i` (row-major index) is occupied. The mask is the
//! grid's canonical key: equal occupancy always gives equal masks, so it is
//! used directly as the memoization key. Small grids use a single machine
//! word; larger ones fall back to a bit vector.

use std::fmt::Debug;
use std::hash::Hash;

use bitvec::prelude::*;

/// Occupancy bitmask over a fixed number of cells.
pub trait CellMask: Clone + Eq + Hash + Debug {
    /// Largest number of cells this representation can index.
    const CAPACITY: usize;

    /// Mask with no cells set.
    fn empty(cells: usize) -> Self;

    /// Mask with the lowest `cells` bits set.
    fn full(cells: usize) -> Self;

    fn contains(&self, cell: usize) -> bool;

    /// Sets bit `cell`.
    ///
    /// Panics if `cell` is outside the mask.
    fn insert(&mut self, cell: usize);

    /// Index of the lowest clear bit below `cells`, or `None` if all are set.
    fn first_clear(&self, cells: usize) -> Option<usize>;

    fn count_ones(&self) -> usize;
}

macro_rules! word_mask {
    ($word:ty) => {
        impl CellMask for $word {
            const CAPACITY: usize = <$word>::BITS as usize;

            #[inline]
            fn empty(_cells: usize) -> Self {
                0
            }

            #[inline]
            fn full(cells: usize) -> Self {
                if cells >= Self::CAPACITY {
                    <$word>::MAX
                } else {
                    ((1 as $word) << cells) - 1
                }
            }

            #[inline(always)]
            fn contains(&self, cell: usize) -> bool {
                (*self >> cell) & 1 != 0
            }

            #[inline(always)]
            fn insert(&mut self, cell: usize) {
                assert!(cell < Self::CAPACITY, "cell {cell} is outside the mask");
                *self |= (1 as $word) << cell;
            }

            #[inline(always)]
            fn first_clear(&self, cells: usize) -> Option<usize> {
                // the number of trailing 1s equals the index of the first 0 bit
                let index = self.trailing_ones() as usize;
                (index < cells).then_some(index)
            }

            #[inline]
            fn count_ones(&self) -> usize {
                <$word>::count_ones(*self) as usize
            }
        }
    };
}

word_mask!(u64);
word_mask!(u128);

/// Arbitrary-width mask for grids with more than 128 cells.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct WideMask(BitVec<u64, Lsb0>);

impl CellMask for WideMask {
    const CAPACITY: usize = usize::MAX;

    fn empty(cells: usize) -> Self {
        WideMask(bitvec![u64, Lsb0; 0; cells])
    }

    fn full(cells: usize) -> Self {
        WideMask(bitvec![u64, Lsb0; 1; cells])
    }

    #[inline]
    fn contains(&self, cell: usize) -> bool {
        self.0.get(cell).is_some_and(|bit| *bit)
    }

    #[inline]
    fn insert(&mut self, cell: usize) {
        assert!(cell < self.0.len(), "cell {cell} is outside the mask");
        self.0.set(cell, true);
    }

    fn first_clear(&self, cells: usize) -> Option<usize> {
        self.0.first_zero().filter(|&cell| cell < cells)
    }

    fn count_ones(&self) -> usize {
        self.0.count_ones()
    }
}
