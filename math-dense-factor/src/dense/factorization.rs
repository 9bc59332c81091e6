//! Dense LU factorization of a square simplex basis
//!
//! The basis is eliminated in place, column by column, with partial pivoting
//! by magnitude. After [`DenseFactorization::factor`] the first
//! `number_columns` columns of the store hold:
//! - the L multipliers strictly below the diagonal
//! - the reciprocal of each pivot on the diagonal
//! - U strictly above the diagonal
//!
//! Update columns appended by `replace_column` follow them.

use super::store::{CapacityPlan, DenseStore, PivotMaps};
use crate::blas_helpers::{largest_above, scale, sub_scaled};
use crate::config::{self, FactorConfig};
use crate::error::{FactorError, FactorStatus, Result};
use crate::traits::FactorScalar;
use ndarray::Array2;

/// Dense basis factorization with product-form column updates
#[derive(Debug, Clone)]
pub struct DenseFactorization<T: FactorScalar> {
    pub(crate) config: FactorConfig<T>,
    pub(crate) store: DenseStore<T>,
    pub(crate) maps: PivotMaps,
    /// Scratch vector, all zero between calls
    pub(crate) work: Vec<T>,
    intake_starts: Vec<usize>,
    intake_rows: Vec<usize>,
    pub(crate) status: FactorStatus,
    pub(crate) number_rows: usize,
    pub(crate) number_columns: usize,
    number_good_u: usize,
    pub(crate) number_pivots: usize,
    maximum_rows: usize,
}

impl<T: FactorScalar> DenseFactorization<T>
where
    FactorConfig<T>: Default,
{
    /// Create an empty factorization with default parameters
    pub fn new() -> Self {
        Self::from_valid_config(FactorConfig::default())
    }
}

impl<T: FactorScalar> Default for DenseFactorization<T>
where
    FactorConfig<T>: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FactorScalar> DenseFactorization<T> {
    /// Create an empty factorization, rejecting out-of-range parameters
    pub fn with_config(config: FactorConfig<T>) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: FactorConfig<T>) -> Self {
        Self {
            config,
            store: DenseStore::new(),
            maps: PivotMaps::default(),
            work: Vec::new(),
            intake_starts: Vec::new(),
            intake_rows: Vec::new(),
            status: FactorStatus::Unfactored,
            number_rows: 0,
            number_columns: 0,
            number_good_u: 0,
            number_pivots: 0,
            maximum_rows: 0,
        }
    }

    /// Reserve storage for a `rows × columns` basis
    ///
    /// The element store is sized for the square part plus
    /// `max(maximum_pivots, ceil(rows / 2))` update columns. Buffers only grow.
    /// The fill-in hints are ignored by the dense strategy.
    pub fn get_areas(
        &mut self,
        rows: usize,
        columns: usize,
        _maximum_l: usize,
        _maximum_u: usize,
    ) -> Result<()> {
        if rows != columns {
            return Err(FactorError::NotSquare { rows, columns });
        }
        let space = Self::checked_space(rows, self.config.maximum_pivots)?;
        if rows != self.number_rows || columns != self.number_columns {
            self.status = FactorStatus::Unfactored;
            self.number_good_u = 0;
            self.number_pivots = 0;
        }
        self.number_rows = rows;
        self.number_columns = columns;
        self.store.set_stride(rows);
        self.grow_buffers(space);
        Ok(())
    }

    fn checked_space(rows: usize, maximum_pivots: usize) -> Result<usize> {
        CapacityPlan::new(rows, maximum_pivots)
            .checked_space::<T>()
            .ok_or(FactorError::CapacityOverflow {
                rows,
                maximum_pivots,
            })
    }

    /// Grow every buffer to `space` stored values and the current dimensions
    /// and pivot capacity
    fn grow_buffers(&mut self, space: usize) {
        if self.store.reserve_space(space) {
            log::debug!(
                "Dense factor storage grown to {} values ({} rows, {} update slots)",
                self.store.space(),
                self.number_rows,
                self.config.maximum_pivots
            );
        }
        if self.number_rows > self.maximum_rows {
            self.maximum_rows = self.number_rows;
            self.work.resize(self.maximum_rows, T::zero());
        }
        self.maps.reserve(self.maximum_rows, self.config.maximum_pivots);
    }

    /// Change the update-chain capacity
    ///
    /// Growing keeps the current factors and update columns. The capacity is
    /// never lowered below the updates already appended, so a full chain
    /// stays full until the next `factor`. Fails without changing anything
    /// when the storage for the requested capacity cannot be allocated.
    pub fn set_maximum_pivots(&mut self, maximum_pivots: usize) -> Result<()> {
        let maximum_pivots = maximum_pivots.max(self.number_pivots);
        let space = Self::checked_space(self.number_rows, maximum_pivots)?;
        self.config.maximum_pivots = maximum_pivots;
        self.grow_buffers(space);
        Ok(())
    }

    /// Set the zero tolerance, which must lie in `(0, 0.1)`
    pub fn set_zero_tolerance(&mut self, value: T) -> Result<()> {
        config::check_zero_tolerance(value)?;
        self.config.zero_tolerance = value;
        Ok(())
    }

    /// Set the pivot tolerance, which must lie in `(0, 1]`
    pub fn set_pivot_tolerance(&mut self, value: T) -> Result<()> {
        config::check_pivot_tolerance(value)?;
        self.config.pivot_tolerance = value;
        Ok(())
    }

    /// Non-negative values select `+1`, negative ones `-1`
    pub fn set_slack_value(&mut self, value: T) {
        self.config.slack_value = config::normalize_slack(value);
    }

    pub fn config(&self) -> &FactorConfig<T> {
        &self.config
    }

    pub fn zero_tolerance(&self) -> T {
        self.config.zero_tolerance
    }

    pub fn pivot_tolerance(&self) -> T {
        self.config.pivot_tolerance
    }

    pub fn slack_value(&self) -> T {
        self.config.slack_value
    }

    pub fn status(&self) -> FactorStatus {
        self.status
    }

    pub fn number_rows(&self) -> usize {
        self.number_rows
    }

    pub fn number_columns(&self) -> usize {
        self.number_columns
    }

    /// Columns eliminated by the last factor
    pub fn number_good_u(&self) -> usize {
        self.number_good_u
    }

    pub fn number_pivots(&self) -> usize {
        self.number_pivots
    }

    pub fn maximum_pivots(&self) -> usize {
        self.config.maximum_pivots
    }

    pub fn maximum_rows(&self) -> usize {
        self.maximum_rows
    }

    /// Allocated size of the element store
    pub fn maximum_space(&self) -> usize {
        self.store.space()
    }

    /// Stored values in use: factors plus update columns
    pub fn number_elements(&self) -> usize {
        self.number_rows * (self.number_columns + self.number_pivots)
    }

    /// Original row → pivot position. A basis slot `r` holds loaded column
    /// `row_position()[r]`.
    pub fn row_position(&self) -> &[usize] {
        &self.maps.row_position[..self.number_rows]
    }

    /// Pivot position → original row
    pub fn position_row(&self) -> &[usize] {
        &self.maps.position_row[..self.number_rows]
    }

    /// Internal pivot row of every appended update, oldest first
    pub fn update_pivots(&self) -> &[usize] {
        &self.maps.update_pivot[..self.number_pivots]
    }

    /// Stored column `k`: a factor column for `k < number_columns`, an update
    /// column after that
    pub fn factor_column(&self, k: usize) -> &[T] {
        self.store.column(k)
    }

    /// Raw access to a basis column before `factor`
    ///
    /// # Panics
    ///
    /// Panics if `column` is not below `number_columns`.
    pub fn column_mut(&mut self, column: usize) -> &mut [T] {
        assert!(
            column < self.number_columns,
            "column {column} out of range for {} columns",
            self.number_columns
        );
        self.store.column_mut(column)
    }

    /// Copy a dense basis column into the store
    pub fn load_dense_column(&mut self, column: usize, values: &[T]) -> Result<()> {
        self.check_column(column)?;
        if values.len() != self.number_rows {
            return Err(FactorError::DimensionMismatch {
                expected: self.number_rows,
                got: values.len(),
            });
        }
        self.store.column_mut(column).copy_from_slice(values);
        Ok(())
    }

    /// Load the slack of `row` into basis column `column`
    pub fn load_slack_column(&mut self, column: usize, row: usize) -> Result<()> {
        self.check_column(column)?;
        if row >= self.number_rows {
            return Err(FactorError::DimensionMismatch {
                expected: self.number_rows,
                got: row + 1,
            });
        }
        let slack = self.config.slack_value;
        let target = self.store.column_mut(column);
        target.fill(T::zero());
        target[row] = slack;
        Ok(())
    }

    /// Size the storage for a square matrix and load all of its columns
    pub fn load_matrix(&mut self, matrix: &Array2<T>) -> Result<()> {
        self.get_areas(matrix.nrows(), matrix.ncols(), 0, 0)?;
        for (k, source) in matrix.columns().into_iter().enumerate() {
            for (target, &value) in self.store.column_mut(k).iter_mut().zip(source.iter()) {
                *target = value;
            }
        }
        Ok(())
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column < self.number_columns {
            Ok(())
        } else {
            Err(FactorError::ColumnOutOfRange {
                column,
                columns: self.number_columns,
            })
        }
    }

    /// Stage the basis in compressed column form for [`Self::pre_process`]
    ///
    /// Values are written to the front of the element store, so column `i`
    /// must start at or before offset `i × rows`, where its dense copy will
    /// land. That holds whenever no column repeats a row.
    pub fn stage_sparse_columns(
        &mut self,
        starts: &[usize],
        row_indices: &[usize],
        values: &[T],
    ) -> Result<()> {
        let rows = self.number_rows;
        let columns = self.number_columns;
        if starts.len() != columns + 1 {
            return Err(FactorError::DimensionMismatch {
                expected: columns + 1,
                got: starts.len(),
            });
        }
        if row_indices.len() != values.len() {
            return Err(FactorError::DimensionMismatch {
                expected: row_indices.len(),
                got: values.len(),
            });
        }
        if starts[columns] != values.len() {
            return Err(FactorError::DimensionMismatch {
                expected: starts[columns],
                got: values.len(),
            });
        }
        for column in 0..columns {
            let (start, end) = (starts[column], starts[column + 1]);
            if end < start {
                return Err(FactorError::MalformedColumn {
                    column,
                    reason: "column starts decrease",
                });
            }
            if end - start > rows {
                return Err(FactorError::MalformedColumn {
                    column,
                    reason: "more entries than rows",
                });
            }
            if start > column * rows {
                return Err(FactorError::MalformedColumn {
                    column,
                    reason: "column data would be overwritten before it is read",
                });
            }
            if row_indices[start..end].iter().any(|&row| row >= rows) {
                return Err(FactorError::MalformedColumn {
                    column,
                    reason: "row index out of range",
                });
            }
        }

        self.store.as_mut_slice()[..values.len()].copy_from_slice(values);
        self.intake_starts.clear();
        self.intake_starts.extend_from_slice(starts);
        self.intake_rows.clear();
        self.intake_rows.extend_from_slice(row_indices);
        Ok(())
    }

    /// Expand the staged compressed columns into the dense layout
    ///
    /// Columns are expanded last to first, each through the work buffer, so
    /// staged data of earlier columns is still intact when it is read.
    pub fn pre_process(&mut self) -> Result<()> {
        let rows = self.number_rows;
        let columns = self.number_columns;
        if self.intake_starts.len() != columns + 1 {
            return Err(FactorError::DimensionMismatch {
                expected: columns + 1,
                got: self.intake_starts.len(),
            });
        }

        let mut work = std::mem::take(&mut self.work);
        for i in (0..columns).rev() {
            let put = i * rows;
            let (start, end) = (self.intake_starts[i], self.intake_starts[i + 1]);
            debug_assert!(start <= put, "staged column {i} overlaps its target");
            work[..rows].fill(T::zero());
            let staged = self.store.as_slice();
            for j in start..end {
                work[self.intake_rows[j]] = staged[j];
            }
            self.store.column_mut(i).copy_from_slice(&work[..rows]);
        }
        work[..rows].fill(T::zero());
        self.work = work;

        self.intake_starts.clear();
        self.intake_rows.clear();
        Ok(())
    }

    /// Factor the loaded basis in place
    ///
    /// Each column takes the largest entry at or below the diagonal as pivot,
    /// provided it is above the zero tolerance. The row exchange is applied to
    /// every column already processed, so earlier L multipliers stay aligned.
    /// On a singular basis elimination stops and `number_good_u` tells how
    /// many columns were pivoted.
    pub fn factor(&mut self) -> Result<()> {
        let rows = self.number_rows;
        let columns = self.number_columns;
        debug_assert_eq!(rows, columns, "dense factorization needs a square basis");

        self.number_pivots = 0;
        self.number_good_u = 0;
        self.status = FactorStatus::Valid;
        self.maps.reset(rows);
        let tolerance = self.config.zero_tolerance;

        for i in 0..columns {
            let Some((offset, _)) = largest_above(&self.store.column(i)[i..rows], tolerance)
            else {
                self.status = FactorStatus::Singular;
                break;
            };
            let pivot_row = i + offset;
            if pivot_row != i {
                self.store.swap_rows_through(i, i, pivot_row);
                self.maps.position_row.swap(i, pivot_row);
            }

            let (pivot_column, later) = self.store.split_at_column_mut(i);
            let pivot_value = T::one() / pivot_column[i];
            pivot_column[i] = pivot_value;
            scale(pivot_value, &mut pivot_column[i + 1..]);

            for column in later.chunks_exact_mut(rows).take(columns - i - 1) {
                if pivot_row != i {
                    column.swap(i, pivot_row);
                }
                let value = column[i];
                sub_scaled(value, &pivot_column[i + 1..], &mut column[i + 1..]);
            }
            self.number_good_u += 1;
        }
        self.maps.finalize(rows);

        if self.status == FactorStatus::Singular {
            log::warn!(
                "Dense factor: basis singular after {} of {} columns",
                self.number_good_u,
                columns
            );
            return Err(FactorError::Singular {
                good_columns: self.number_good_u,
                columns,
            });
        }
        log::debug!("Dense factor: {rows} x {columns} basis factored");
        Ok(())
    }

    /// Replace the columns that could not be pivoted by slacks
    ///
    /// Rows that did not receive one of the first `number_good_u` pivots get
    /// the slack variable `row + number_columns`, in increasing row order, in
    /// `sequence[number_good_u..]`. The caller reloads the basis from the
    /// amended `sequence` and factors again.
    pub fn make_non_singular(&self, sequence: &mut [usize], number_columns: usize) {
        let rows = self.number_rows;
        let good = self.number_good_u;
        debug_assert!(good < rows, "make_non_singular on a non-singular basis");

        let mut pivoted = vec![false; rows];
        for &row in &self.maps.position_row[..good] {
            pivoted[row] = true;
        }
        let free_rows = (0..rows).filter(|&row| !pivoted[row]);
        for (slot, row) in sequence[good..rows].iter_mut().zip(free_rows) {
            *slot = row + number_columns;
        }
        log::debug!("Dense factor: {} slacks put in basis", rows - good);
    }

    /// Assign the variable of every pivot position to its original row
    pub fn post_process(&self, sequence: &[usize], pivot_variable: &mut [usize]) {
        let rows = self.number_rows;
        for (&row, &variable) in self.maps.position_row[..rows].iter().zip(&sequence[..rows]) {
            pivot_variable[row] = variable;
        }
    }
}
