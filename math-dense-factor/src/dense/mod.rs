//! Dense basis factorization strategy
//!
//! This module provides:
//! - [`DenseFactorization`]: in-place dense LU with product-form column updates
//! - [`solve_dense`]: one-shot factor and solve of a square system

mod factorization;
mod solve;
mod store;
mod update;

pub use factorization::DenseFactorization;
pub use store::CapacityPlan;

use crate::config::FactorConfig;
use crate::error::{FactorError, FactorStatus, ReplaceStatus, Result, SolveStatus};
use crate::region::RegionVector;
use crate::traits::{BasisFactorization, FactorScalar};
use ndarray::{Array1, Array2};

impl<T: FactorScalar> BasisFactorization<T> for DenseFactorization<T> {
    fn get_areas(
        &mut self,
        rows: usize,
        columns: usize,
        maximum_l: usize,
        maximum_u: usize,
    ) -> Result<()> {
        DenseFactorization::get_areas(self, rows, columns, maximum_l, maximum_u)
    }

    fn factor(&mut self) -> Result<()> {
        DenseFactorization::factor(self)
    }

    fn replace_column(
        &mut self,
        column: &RegionVector<T>,
        pivot_row: usize,
        pivot_check: T,
        check_before_modifying: bool,
    ) -> Result<ReplaceStatus> {
        DenseFactorization::replace_column(
            self,
            column,
            pivot_row,
            pivot_check,
            check_before_modifying,
        )
    }

    fn update_column(&mut self, region: &mut RegionVector<T>, no_permute: bool) -> SolveStatus {
        DenseFactorization::update_column(self, region, no_permute)
    }

    fn update_column_transpose(&mut self, region: &mut RegionVector<T>) -> SolveStatus {
        DenseFactorization::update_column_transpose(self, region)
    }

    fn make_non_singular(&self, sequence: &mut [usize], number_columns: usize) {
        DenseFactorization::make_non_singular(self, sequence, number_columns)
    }

    fn post_process(&self, sequence: &[usize], pivot_variable: &mut [usize]) {
        DenseFactorization::post_process(self, sequence, pivot_variable)
    }

    fn status(&self) -> FactorStatus {
        self.status
    }

    fn number_rows(&self) -> usize {
        self.number_rows
    }

    fn number_pivots(&self) -> usize {
        self.number_pivots
    }

    fn maximum_pivots(&self) -> usize {
        self.config.maximum_pivots
    }
}

/// Solve Ax = b with a fresh dense factorization
///
/// This is a convenience function that combines loading, factorization and
/// FTRAN, and maps the basis-slot result back to the columns of `a`.
pub fn solve_dense<T: FactorScalar>(a: &Array2<T>, b: &Array1<T>) -> Result<Array1<T>>
where
    FactorConfig<T>: Default,
{
    let n = a.nrows();
    if b.len() != n {
        return Err(FactorError::DimensionMismatch {
            expected: n,
            got: b.len(),
        });
    }

    let mut factorization = DenseFactorization::new();
    factorization.load_matrix(a)?;
    factorization.factor()?;

    let mut region = RegionVector::from_array(b, T::zero());
    factorization.update_column(&mut region, false);

    let mut x = Array1::from_elem(n, T::zero());
    let row_position = factorization.row_position();
    for (slot, value) in region.iter() {
        x[row_position[slot]] = value;
    }
    Ok(x)
}
