//! Column replacement
//!
//! A basis change is recorded as one more update column instead of touching
//! the factors: the FTRAN-ed entering column, permuted into internal rows,
//! with the reciprocal pivot in place of the pivot entry.

use super::DenseFactorization;
use crate::error::{FactorError, ReplaceStatus, Result};
use crate::region::RegionVector;
use crate::traits::FactorScalar;

impl<T: FactorScalar> DenseFactorization<T> {
    /// Append the update for replacing the basic column in slot `pivot_row`
    ///
    /// `column` holds `B⁻¹a` for the entering column `a`, in caller row order,
    /// packed or unpacked. `pivot_check` is its entry in `pivot_row`.
    ///
    /// Fails without modifying anything when the chain is full
    /// ([`FactorError::NoRoom`]) or the pivot is not above the zero tolerance
    /// ([`FactorError::SingularPivot`]). `check_before_modifying` has no
    /// effect: a dense update cannot partially fail.
    pub fn replace_column(
        &mut self,
        column: &RegionVector<T>,
        pivot_row: usize,
        pivot_check: T,
        _check_before_modifying: bool,
    ) -> Result<ReplaceStatus> {
        debug_assert!(
            self.status.is_valid(),
            "replace_column needs a valid factorization"
        );
        if self.number_pivots >= self.config.maximum_pivots {
            return Err(FactorError::NoRoom {
                maximum_pivots: self.config.maximum_pivots,
            });
        }
        if pivot_check.magnitude() <= self.config.zero_tolerance {
            return Err(FactorError::SingularPivot {
                magnitude: pivot_check.magnitude().to_f64_lossy(),
                tolerance: self.config.zero_tolerance.to_f64_lossy(),
            });
        }

        let slot = self.number_pivots;
        let row_position = &self.maps.row_position;
        let update = self.store.column_mut(self.number_columns + slot);
        update.fill(T::zero());
        for (row, value) in column.iter() {
            update[row_position[row]] = value;
        }
        let real_pivot_row = row_position[pivot_row];
        update[real_pivot_row] = T::one() / pivot_check;
        self.maps.update_pivot[slot] = real_pivot_row;
        self.number_pivots += 1;

        let interval = self.config.log_interval;
        if interval > 0 && self.number_pivots % interval == 0 {
            log::info!(
                "Dense factor: {} of {} updates used, last pivot {:.6e}",
                self.number_pivots,
                self.config.maximum_pivots,
                pivot_check.to_f64_lossy()
            );
        }
        Ok(ReplaceStatus::Ok)
    }
}
