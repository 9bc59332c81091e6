//! Owned storage of a dense factorization
//!
//! - [`DenseStore`]: column-major coefficient block with a fixed row stride
//! - [`PivotMaps`]: the row permutation, its inverse and the update pivot rows
//! - [`CapacityPlan`]: single source of truth for how large both must be

use crate::traits::FactorScalar;

/// Buffer sizes for a basis of `rows` rows and `maximum_pivots` update slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    pub rows: usize,
    pub maximum_pivots: usize,
}

impl CapacityPlan {
    pub fn new(rows: usize, maximum_pivots: usize) -> Self {
        Self {
            rows,
            maximum_pivots,
        }
    }

    /// Update columns reserved beyond the square part.
    ///
    /// At least half the row count so that small pivot capacities still leave
    /// slack for a typical update chain.
    pub fn update_columns(&self) -> usize {
        self.maximum_pivots.max(self.rows.div_ceil(2))
    }

    /// Values the element store must hold, `None` on overflow
    pub fn element_space(&self) -> Option<usize> {
        self.rows
            .checked_add(self.update_columns())?
            .checked_mul(self.rows)
    }

    /// Element space for a store of `T`, provided both the store and the
    /// update-slot map stay within an allocation
    pub fn checked_space<T>(&self) -> Option<usize> {
        let space = self.element_space()?;
        (space <= allocation_limit::<T>() && self.maximum_pivots <= allocation_limit::<usize>())
            .then_some(space)
    }
}

/// Longest `Vec<E>` that can be allocated
fn allocation_limit<E>() -> usize {
    isize::MAX as usize / std::mem::size_of::<E>().max(1)
}

/// Column-major dense block with explicit row stride
#[derive(Debug, Clone)]
pub struct DenseStore<T: FactorScalar> {
    values: Vec<T>,
    stride: usize,
}

impl<T: FactorScalar> DenseStore<T> {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            stride: 0,
        }
    }

    /// Allocated values, the `maximum_space` of the factorization
    pub fn space(&self) -> usize {
        self.values.len()
    }

    /// Set the row stride; content is kept but reinterpreted
    pub fn set_stride(&mut self, stride: usize) {
        self.stride = stride;
    }

    /// Grow to at least `space` values. Never shrinks.
    ///
    /// Returns whether the block was reallocated.
    pub fn reserve_space(&mut self, space: usize) -> bool {
        if space > self.values.len() {
            self.values.resize(space, T::zero());
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn column(&self, k: usize) -> &[T] {
        let start = k * self.stride;
        &self.values[start..start + self.stride]
    }

    #[inline]
    pub fn column_mut(&mut self, k: usize) -> &mut [T] {
        let start = k * self.stride;
        &mut self.values[start..start + self.stride]
    }

    /// Column `k` and every column after it, as separate borrows
    #[inline]
    pub fn split_at_column_mut(&mut self, k: usize) -> (&mut [T], &mut [T]) {
        let start = k * self.stride;
        let (head, tail) = self.values.split_at_mut(start + self.stride);
        (&mut head[start..], tail)
    }

    /// Exchange two rows within columns `0..=last`
    pub fn swap_rows_through(&mut self, last: usize, a: usize, b: usize) {
        for k in 0..=last {
            self.column_mut(k).swap(a, b);
        }
    }

    /// The raw block, used to stage sparse input at its front
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T: FactorScalar> Default for DenseStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Permutation bookkeeping of a dense factorization
#[derive(Debug, Clone, Default)]
pub struct PivotMaps {
    /// Original row → pivot position
    pub row_position: Vec<usize>,
    /// Pivot position → original row
    pub position_row: Vec<usize>,
    /// Update slot → internal row of its pivot
    pub update_pivot: Vec<usize>,
}

impl PivotMaps {
    /// Grow to `rows` rows and `pivots` update slots, keeping content
    pub fn reserve(&mut self, rows: usize, pivots: usize) {
        if rows > self.row_position.len() {
            self.row_position.resize(rows, 0);
            self.position_row.resize(rows, 0);
        }
        if pivots > self.update_pivot.len() {
            self.update_pivot.resize(pivots, 0);
        }
    }

    /// Identity on the first `rows` pivot positions
    pub fn reset(&mut self, rows: usize) {
        for (j, row) in self.position_row[..rows].iter_mut().enumerate() {
            *row = j;
        }
    }

    /// Rebuild the row → position map from its inverse
    pub fn finalize(&mut self, rows: usize) {
        for j in 0..rows {
            let row = self.position_row[j];
            self.row_position[row] = j;
        }
    }
}
