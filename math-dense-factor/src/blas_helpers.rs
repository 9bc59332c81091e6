//! Level-1 kernels over column slices
//!
//! The dense factorization works on raw column slices of its store, so these
//! helpers take slices rather than `ndarray` views.

use crate::traits::FactorScalar;

/// Subtract a multiple: y = y - α * x
#[inline]
pub fn sub_scaled<T: FactorScalar>(alpha: T, x: &[T], y: &mut [T]) {
    debug_assert_eq!(x.len(), y.len(), "Slice lengths must match for sub_scaled");
    for (xi, yi) in x.iter().zip(y.iter_mut()) {
        *yi -= alpha * *xi;
    }
}

/// Subtract an inner product term by term: v - x_0 * y_0 - x_1 * y_1 - ...
#[inline]
pub fn sub_dot<T: FactorScalar>(value: T, x: &[T], y: &[T]) -> T {
    debug_assert_eq!(x.len(), y.len(), "Slice lengths must match for sub_dot");
    let mut value = value;
    for (xi, yi) in x.iter().zip(y.iter()) {
        value -= *xi * *yi;
    }
    value
}

/// Scale in place: x = α * x
#[inline]
pub fn scale<T: FactorScalar>(alpha: T, x: &mut [T]) {
    for xi in x.iter_mut() {
        *xi *= alpha;
    }
}

/// Position and magnitude of the largest entry strictly above `threshold`
#[inline]
pub fn largest_above<T: FactorScalar>(x: &[T], threshold: T) -> Option<(usize, T)> {
    let mut best = None;
    let mut largest = threshold;
    for (i, &xi) in x.iter().enumerate() {
        let value = xi.magnitude();
        if value > largest {
            largest = value;
            best = Some((i, value));
        }
    }
    best
}
