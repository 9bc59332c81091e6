//! Error and status types
//!
//! Numeric outcomes are reported, never recovered from: the simplex engine
//! decides when to repair the basis or refactor. Every type carries the
//! integer code the engine's status handling is keyed on.

use thiserror::Error;

/// Errors reported by a basis factorization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FactorError {
    #[error("Basis is singular: {good_columns} of {columns} columns could be pivoted")]
    Singular { good_columns: usize, columns: usize },
    #[error("Replacement pivot {magnitude:e} is not above the zero tolerance {tolerance:e}")]
    SingularPivot { magnitude: f64, tolerance: f64 },
    #[error("No room for another update: {maximum_pivots} pivots already appended")]
    NoRoom { maximum_pivots: usize },
    #[error("Storage for {rows} rows and {maximum_pivots} update columns cannot be allocated")]
    CapacityOverflow { rows: usize, maximum_pivots: usize },
    #[error("Basis must be square: {rows} rows, {columns} columns")]
    NotSquare { rows: usize, columns: usize },
    #[error("Dimensions mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Column {column} is out of range for a basis of {columns} columns")]
    ColumnOutOfRange { column: usize, columns: usize },
    #[error("Staged column {column} is malformed: {reason}")]
    MalformedColumn { column: usize, reason: &'static str },
    #[error("Invalid {name}: {value:e}")]
    InvalidParameter { name: &'static str, value: f64 },
}

impl FactorError {
    /// Integer code of the error.
    ///
    /// `-1` for a singular basis, `2` for a singular replacement pivot, `3`
    /// when the update chain is full or cannot be sized, `-2` for malformed
    /// input.
    pub fn code(&self) -> i32 {
        match self {
            FactorError::Singular { .. } => -1,
            FactorError::SingularPivot { .. } => 2,
            FactorError::NoRoom { .. } | FactorError::CapacityOverflow { .. } => 3,
            FactorError::NotSquare { .. }
            | FactorError::DimensionMismatch { .. }
            | FactorError::ColumnOutOfRange { .. }
            | FactorError::MalformedColumn { .. }
            | FactorError::InvalidParameter { .. } => -2,
        }
    }

    /// Whether a full refactorization from scratch clears this error
    pub fn needs_refactor(&self) -> bool {
        matches!(self, FactorError::NoRoom { .. })
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, FactorError>;

/// State of the stored factorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FactorStatus {
    /// Nothing factored since the last resize
    #[default]
    Unfactored,
    /// The last factor stopped at a column without an acceptable pivot
    Singular,
    /// The stored factors are usable for solves and updates
    Valid,
}

impl FactorStatus {
    pub fn code(self) -> i32 {
        match self {
            FactorStatus::Valid => 0,
            FactorStatus::Unfactored | FactorStatus::Singular => -1,
        }
    }

    pub fn is_valid(self) -> bool {
        self == FactorStatus::Valid
    }
}

/// Successful outcome of a column replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceStatus {
    Ok,
    /// Accepted but accuracy is doubtful. Reserved for sparse strategies.
    ProbablyOk,
}

impl ReplaceStatus {
    pub fn code(self) -> i32 {
        match self {
            ReplaceStatus::Ok => 0,
            ReplaceStatus::ProbablyOk => 1,
        }
    }
}

/// Outcome of an FTRAN or BTRAN
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Complete,
    /// The update part of the solve was postponed. Reserved for strategies
    /// that defer the FT update.
    Deferred,
}

impl SolveStatus {
    pub fn code(self) -> i32 {
        match self {
            SolveStatus::Complete => 0,
            SolveStatus::Deferred => 1,
        }
    }
}
