//! Core traits for basis factorization
//!
//! This module defines the two abstractions the rest of the crate is built on:
//! - [`FactorScalar`]: Trait for the real scalar types a basis can be factored over
//! - [`BasisFactorization`]: Trait for a pluggable factorization strategy as seen
//!   by a simplex engine

use crate::error::{FactorError, FactorStatus, ReplaceStatus, SolveStatus};
use crate::region::RegionVector;
use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::Debug;

/// Trait for scalar types that can be stored in a dense factorization.
///
/// Pivot selection compares magnitudes, so only ordered real fields qualify.
///
/// # Implementations
///
/// Provided for:
/// - `f64` (default for simplex bases)
/// - `f32` (for memory-constrained applications)
pub trait FactorScalar:
    Float + NumAssign + FromPrimitive + ToPrimitive + Debug + Send + Sync + 'static
{
    /// Absolute value used for pivot search and output compaction
    #[inline]
    fn magnitude(self) -> Self {
        self.abs()
    }

    /// Lossy conversion used in diagnostics and error payloads
    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self.to_f64().unwrap_or(f64::NAN)
    }
}

impl FactorScalar for f64 {}

impl FactorScalar for f32 {}

/// A basis factorization strategy.
///
/// The simplex engine sizes the strategy, loads the basis columns, factors,
/// then alternates solves and column replacements until the update chain is
/// full and it refactors from scratch. Recovery policy stays with the caller:
/// implementations only report what happened.
pub trait BasisFactorization<T: FactorScalar> {
    /// Reserve storage for a `rows × columns` basis.
    ///
    /// `maximum_l` and `maximum_u` are fill-in hints for sparse strategies.
    fn get_areas(
        &mut self,
        rows: usize,
        columns: usize,
        maximum_l: usize,
        maximum_u: usize,
    ) -> Result<(), FactorError>;

    /// Factor the loaded basis.
    fn factor(&mut self) -> Result<(), FactorError>;

    /// Append the update for replacing the basic column at `pivot_row`.
    ///
    /// `column` is the FTRAN-ed entering column and `pivot_check` its value in
    /// `pivot_row`.
    fn replace_column(
        &mut self,
        column: &RegionVector<T>,
        pivot_row: usize,
        pivot_check: T,
        check_before_modifying: bool,
    ) -> Result<ReplaceStatus, FactorError>;

    /// Solve `B·x = b` in place.
    fn update_column(&mut self, region: &mut RegionVector<T>, no_permute: bool) -> SolveStatus;

    /// Solve `Bᵗ·x = b` in place.
    fn update_column_transpose(&mut self, region: &mut RegionVector<T>) -> SolveStatus;

    /// Replace the columns that could not be pivoted by slacks.
    fn make_non_singular(&self, sequence: &mut [usize], number_columns: usize);

    /// Write the final column assignment back in original row order.
    fn post_process(&self, sequence: &[usize], pivot_variable: &mut [usize]);

    /// Current factorization status
    fn status(&self) -> FactorStatus;

    /// Number of rows in the basis
    fn number_rows(&self) -> usize;

    /// Number of update columns appended since the last factor
    fn number_pivots(&self) -> usize;

    /// Capacity of the update chain
    fn maximum_pivots(&self) -> usize;
}
