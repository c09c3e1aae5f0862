//! Dense vector arithmetic over `&[T]`.
//!
//! These are the only vector operations the solver needs. Binary operations
//! walk both slices in lockstep and stop at the shorter one; lengths are the
//! caller's responsibility.

use num_traits::Float;

/// Returns a zero vector of length `n`.
pub fn zeros<T: Float>(n: usize) -> Vec<T> {
    vec![T::zero(); n]
}

/// `v = factor * v`
pub fn scale<T: Float>(v: &mut [T], factor: T) {
    for x in v.iter_mut() {
        *x = *x * factor;
    }
}

/// `dst = dst + src`
pub fn add_assign<T: Float>(dst: &mut [T], src: &[T]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = *d + s;
    }
}

/// `y = alpha * x + y`
pub fn axpy<T: Float>(alpha: T, x: &[T], y: &mut [T]) {
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = *yi + alpha * xi;
    }
}

/// Sum of element-wise products.
pub fn dot<T: Float>(x: &[T], y: &[T]) -> T {
    x.iter()
        .zip(y)
        .fold(T::zero(), |acc, (&xi, &yi)| acc + xi * yi)
}

/// Largest absolute entry, zero for an empty vector.
///
/// A NaN entry makes the result NaN, so a poisoned residual can never pass a
/// `max_abs(r) <= precision` test.
pub fn max_abs<T: Float>(v: &[T]) -> T {
    let mut max = T::zero();
    for &x in v {
        if x.is_nan() {
            return x;
        }
        max = max.max(x.abs());
    }
    max
}

/// True when every entry is exactly zero.
pub fn all_zero<T: Float>(v: &[T]) -> bool {
    v.iter().all(|&x| x == T::zero())
}
