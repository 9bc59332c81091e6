//! Factorization parameters

use crate::error::FactorError;
use crate::traits::FactorScalar;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable parameters of a dense factorization
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactorConfig<R> {
    /// Entries at or below this magnitude never become pivots and are
    /// dropped from solve output
    pub zero_tolerance: R,
    /// Minimum pivot-to-column-max ratio requested by the caller.
    ///
    /// Stored and validated only; pivot search uses `zero_tolerance`.
    pub pivot_tolerance: R,
    /// Diagonal value of slack columns, always `1` or `-1`
    pub slack_value: R,
    /// Number of update columns that fit before a refactor is required
    pub maximum_pivots: usize,
    /// Log update-chain progress every N appended pivots (0 = no output)
    #[cfg_attr(feature = "serde", serde(default))]
    pub log_interval: usize,
}

impl Default for FactorConfig<f64> {
    fn default() -> Self {
        Self {
            zero_tolerance: 1e-13,
            pivot_tolerance: 0.1,
            slack_value: -1.0,
            maximum_pivots: 200,
            log_interval: 0,
        }
    }
}

impl Default for FactorConfig<f32> {
    fn default() -> Self {
        Self {
            zero_tolerance: 1e-6,
            pivot_tolerance: 0.1,
            slack_value: -1.0,
            maximum_pivots: 200,
            log_interval: 0,
        }
    }
}

impl<R: FactorScalar> FactorConfig<R> {
    /// Set the update-chain capacity
    pub fn with_maximum_pivots(mut self, maximum_pivots: usize) -> Self {
        self.maximum_pivots = maximum_pivots;
        self
    }

    pub fn with_zero_tolerance(mut self, zero_tolerance: R) -> Self {
        self.zero_tolerance = zero_tolerance;
        self
    }

    pub fn with_pivot_tolerance(mut self, pivot_tolerance: R) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }

    /// Any non-negative value selects `+1`, a negative one `-1`
    pub fn with_slack_value(mut self, slack_value: R) -> Self {
        self.slack_value = normalize_slack(slack_value);
        self
    }

    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    /// Check every parameter against its admissible range
    pub fn validate(&self) -> Result<(), FactorError> {
        check_zero_tolerance(self.zero_tolerance)?;
        check_pivot_tolerance(self.pivot_tolerance)?;
        if self.slack_value.abs() != R::one() {
            return Err(FactorError::InvalidParameter {
                name: "slack value",
                value: self.slack_value.to_f64_lossy(),
            });
        }
        Ok(())
    }
}

pub(crate) fn normalize_slack<R: FactorScalar>(value: R) -> R {
    if value >= R::zero() { R::one() } else { -R::one() }
}

/// Zero tolerance must lie in `(0, 0.1)`
pub(crate) fn check_zero_tolerance<R: FactorScalar>(value: R) -> Result<(), FactorError> {
    let limit = R::from_f64(0.1).unwrap_or_else(R::one);
    if value > R::zero() && value < limit {
        Ok(())
    } else {
        Err(FactorError::InvalidParameter {
            name: "zero tolerance",
            value: value.to_f64_lossy(),
        })
    }
}

/// Pivot tolerance must lie in `(0, 1]`
pub(crate) fn check_pivot_tolerance<R: FactorScalar>(value: R) -> Result<(), FactorError> {
    if value > R::zero() && value <= R::one() {
        Ok(())
    } else {
        Err(FactorError::InvalidParameter {
            name: "pivot tolerance",
            value: value.to_f64_lossy(),
        })
    }
}
