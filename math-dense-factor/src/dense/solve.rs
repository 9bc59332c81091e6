//! FTRAN and BTRAN against a dense factorization
//!
//! Both solves gather the right-hand side into the work buffer in internal row
//! order, run the triangular factors and the update chain there, then scatter
//! the result back while dropping entries at or below the zero tolerance. The
//! work buffer is zeroed entry by entry during the scatter.

use super::DenseFactorization;
use crate::blas_helpers::{sub_dot, sub_scaled};
use crate::error::SolveStatus;
use crate::region::RegionVector;
use crate::traits::FactorScalar;

impl<T: FactorScalar> DenseFactorization<T> {
    /// Solve `B·x = b`, overwriting `region`
    ///
    /// Input is indexed by original row, output by basis slot. With
    /// `no_permute` the unpacked region is taken to be in internal row order
    /// already and is solved in place.
    ///
    /// # Panics
    ///
    /// Panics if `no_permute` is requested for a packed region.
    pub fn update_column(&mut self, region: &mut RegionVector<T>, no_permute: bool) -> SolveStatus {
        debug_assert!(self.status.is_valid(), "FTRAN needs a valid factorization");
        let rows = self.number_rows;
        let tolerance = self.config.zero_tolerance;

        if no_permute {
            assert!(!region.is_packed(), "no_permute needs an unpacked region");
            let (elements, indices) = region.parts_mut();
            self.ftran_in_place(&mut elements[..rows]);
            indices.clear();
            for (j, value) in elements[..rows].iter_mut().enumerate() {
                if value.magnitude() > tolerance {
                    indices.push(j);
                } else {
                    *value = T::zero();
                }
            }
            return SolveStatus::Complete;
        }

        let mut work = std::mem::take(&mut self.work);
        self.gather(region, &mut work[..rows]);
        self.ftran_in_place(&mut work[..rows]);
        let row_position = &self.maps.row_position[..rows];
        compact(
            region,
            &mut work[..rows],
            row_position.iter().copied().zip(0..rows),
            tolerance,
        );
        self.restore_work(work);
        SolveStatus::Complete
    }

    /// Solve `Bᵗ·x = b`, overwriting `region`
    ///
    /// Input is indexed by basis slot, output by original row.
    pub fn update_column_transpose(&mut self, region: &mut RegionVector<T>) -> SolveStatus {
        debug_assert!(self.status.is_valid(), "BTRAN needs a valid factorization");
        let rows = self.number_rows;
        let tolerance = self.config.zero_tolerance;

        let mut work = std::mem::take(&mut self.work);
        self.gather(region, &mut work[..rows]);
        self.btran_in_place(&mut work[..rows]);
        let position_row = &self.maps.position_row[..rows];
        compact(
            region,
            &mut work[..rows],
            (0..rows).zip(position_row.iter().copied()),
            tolerance,
        );
        self.restore_work(work);
        SolveStatus::Complete
    }

    /// FTRAN ahead of a column replacement.
    ///
    /// The dense strategy keeps nothing for the following update, so this is a
    /// plain FTRAN.
    pub fn update_column_ft(&mut self, region: &mut RegionVector<T>) -> SolveStatus {
        self.update_column(region, false)
    }

    /// FTRAN two regions in one call; `no_permute` applies to `second` only
    pub fn update_two_columns_ft(
        &mut self,
        first: &mut RegionVector<T>,
        second: &mut RegionVector<T>,
        no_permute: bool,
    ) -> SolveStatus {
        let status = self.update_column(first, false);
        self.update_column(second, no_permute);
        status
    }

    /// Move the right-hand side into `work` in internal row order, clearing it
    /// from `region`
    fn gather(&self, region: &mut RegionVector<T>, work: &mut [T]) {
        let rows = work.len();
        let packed = region.is_packed();
        let (elements, indices) = region.parts_mut();
        if packed {
            for (k, &row) in indices.iter().enumerate() {
                work[self.maps.row_position[row]] = elements[k];
                elements[k] = T::zero();
            }
        } else {
            for (slot, &row) in work.iter_mut().zip(&self.maps.position_row[..rows]) {
                *slot = elements[row];
                elements[row] = T::zero();
            }
        }
        indices.clear();
    }

    fn ftran_in_place(&self, region: &mut [T]) {
        let rows = self.number_rows;
        let columns = self.number_columns;

        // L, unit diagonal
        for i in 0..columns {
            let value = region[i];
            sub_scaled(
                value,
                &self.store.column(i)[i + 1..rows],
                &mut region[i + 1..rows],
            );
        }

        // U, diagonal holds reciprocals
        for i in (0..columns).rev() {
            let column = self.store.column(i);
            let value = region[i] * column[i];
            region[i] = value;
            sub_scaled(value, &column[..i], &mut region[..i]);
        }

        // Updates, oldest first
        for slot in 0..self.number_pivots {
            let update = self.store.column(columns + slot);
            let pivot = self.maps.update_pivot[slot];
            let value = region[pivot] * update[pivot];
            sub_scaled(value, update, region);
            region[pivot] = value;
        }
    }

    fn btran_in_place(&self, region: &mut [T]) {
        let rows = self.number_rows;
        let columns = self.number_columns;

        // Updates, newest first
        for slot in (0..self.number_pivots).rev() {
            let update = self.store.column(columns + slot);
            let pivot = self.maps.update_pivot[slot];
            let value = sub_dot(region[pivot], &region[..pivot], &update[..pivot]);
            let value = sub_dot(value, &region[pivot + 1..rows], &update[pivot + 1..rows]);
            region[pivot] = value * update[pivot];
        }

        // Uᵗ
        for i in 0..columns {
            let column = self.store.column(i);
            let value = sub_dot(region[i], &region[..i], &column[..i]);
            region[i] = value * column[i];
        }

        // Lᵗ
        for i in (0..columns).rev() {
            let column = self.store.column(i);
            region[i] = sub_dot(region[i], &region[i + 1..rows], &column[i + 1..rows]);
        }
    }

    fn restore_work(&mut self, work: Vec<T>) {
        debug_assert!(
            work.iter().all(|value| value.is_zero()),
            "work buffer must be zero after a solve"
        );
        self.work = work;
    }
}

/// Scatter `work[internal]` to `region[external]` for each pair, zeroing
/// `work` as it goes and keeping only entries above `tolerance`
fn compact<T: FactorScalar>(
    region: &mut RegionVector<T>,
    work: &mut [T],
    pairs: impl Iterator<Item = (usize, usize)>,
    tolerance: T,
) {
    let packed = region.is_packed();
    let (elements, indices) = region.parts_mut();
    for (internal, external) in pairs {
        let value = work[internal];
        work[internal] = T::zero();
        if value.magnitude() > tolerance {
            let slot = if packed { indices.len() } else { external };
            elements[slot] = value;
            indices.push(external);
        }
    }
}
