//! `conjgrad`: the Conjugate Gradient method for `T·x = b`, where `T` is a
//! symmetric positive-definite operator known only through its action on
//! vectors.
//!
//! The free functions [`solve`], [`solve_prec`] and [`solve_stoppable`] never
//! fail: whatever stops the iteration (convergence, an exhausted search
//! direction, cancellation or the `T.dim()` iteration cap) they hand back the
//! best solution found so far. [`ConjugateGradient`] offers the same loop with
//! input validation, tunable drift correction and a report of why it stopped.

// Core modules
pub mod algorithms;

// Re-export from conjgrad_core
pub use conjgrad_core::{
    error::Result, vector, CancelSignal, CancelToken, ConjGradError, DenseMatrix, FnOperator,
    LinearOperator, Matrix, NeverCancel, SparseMatrix, Triplete,
};

pub use algorithms::{
    check_symmetry_and_positive_diagonal, ConjugateGradient, ConjugateGradientMetadata,
    SolveAlgorithm, SolveResult, Termination, RESIDUAL_UPDATE_FREQUENCY,
};

use num_traits::Float;

/// Solves `t·x = b` to the best attainable accuracy.
pub fn solve<T, O>(t: &O, b: &[T]) -> Vec<T>
where
    T: Float,
    O: LinearOperator<T> + ?Sized,
{
    solve_prec(t, b, T::zero())
}

/// Solves `t·x = b`, returning as soon as every entry of the residual
/// `b - t·x` is at most `precision` in absolute value.
pub fn solve_prec<T, O>(t: &O, b: &[T], precision: T) -> Vec<T>
where
    T: Float,
    O: LinearOperator<T> + ?Sized,
{
    solve_stoppable(t, b, precision, NeverCancel)
}

/// Like [`solve_prec`], but polls `cancel` after each iteration and returns
/// the current approximation once it fires.
///
/// ```
/// use conjgrad::{solve_stoppable, CancelToken, DenseMatrix};
///
/// let t = DenseMatrix::<f64>::from_diagonal(&[2.0, 4.0]);
/// let token = CancelToken::new();
/// let x = solve_stoppable(&t, &[4.0, 8.0], 1e-12, token.clone());
/// assert!((x[0] - 2.0).abs() < 1e-9 && (x[1] - 2.0).abs() < 1e-9);
/// ```
pub fn solve_stoppable<T, O, C>(t: &O, b: &[T], precision: T, cancel: C) -> Vec<T>
where
    T: Float,
    O: LinearOperator<T> + ?Sized,
    C: CancelSignal,
{
    algorithms::conjugate_gradient::solve_cg(t, b, precision, RESIDUAL_UPDATE_FREQUENCY, cancel).x
}
