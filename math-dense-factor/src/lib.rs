//! Dense basis factorization for simplex solvers
//!
//! This crate provides a dense LU factorization strategy for the square basis
//! matrix of a simplex method. It keeps the factors of the basis in one dense
//! column-major block, records basis changes as appended update columns
//! instead of refactoring, and solves against the result.
//!
//! # Features
//!
//! - **Factorization**: in-place LU with partial pivoting by magnitude
//! - **Updates**: column replacement without refactorization, until the
//!   configured number of pivots is used up
//! - **Solves**: FTRAN (`B·x = b`) and BTRAN (`Bᵗ·x = b`) on packed or
//!   unpacked [`RegionVector`]s
//! - **Repair**: slack substitution for singular bases
//! - **Generic Scalar Types**: Works with f64 and f32
//!
//! # Example
//!
//! ```
//! use math_dense_factor::{DenseFactorization, RegionVector};
//! use ndarray::array;
//!
//! let mut factorization = DenseFactorization::<f64>::new();
//! factorization.load_matrix(&array![[2.0, 0.0], [0.0, 4.0]]).unwrap();
//! factorization.factor().unwrap();
//!
//! let mut region = RegionVector::from_array(&array![2.0, 4.0], 0.0);
//! factorization.update_column(&mut region, false);
//! assert_eq!(region.to_array(2), array![1.0, 1.0]);
//! ```

pub mod blas_helpers;
pub mod config;
pub mod dense;
pub mod error;
pub mod region;
pub mod traits;

pub use config::FactorConfig;
pub use dense::{CapacityPlan, DenseFactorization, solve_dense};
pub use error::{FactorError, FactorStatus, ReplaceStatus, Result, SolveStatus};
pub use region::RegionVector;
pub use traits::{BasisFactorization, FactorScalar};
