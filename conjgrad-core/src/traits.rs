use num_traits::Float;
use std::fmt::Debug;
use std::sync::Arc;

/// A linear map `T` applied as a black box.
///
/// The conjugate gradient solver only ever asks an operator for its dimension
/// and for the product `T·v`, so dense matrices, sparse matrices and fully
/// implicit operators (stencils, Hessian-vector products, ...) can all be
/// plugged in interchangeably.
pub trait LinearOperator<T: Float> {
    /// Length of the vectors this operator consumes and produces.
    fn dim(&self) -> usize;

    /// Returns `T·v`. `v` has length `dim()` and so must the result.
    fn apply(&self, v: &[T]) -> Vec<T>;
}

impl<T: Float, O: LinearOperator<T> + ?Sized> LinearOperator<T> for &O {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn apply(&self, v: &[T]) -> Vec<T> {
        (**self).apply(v)
    }
}

impl<T: Float, O: LinearOperator<T> + ?Sized> LinearOperator<T> for Box<O> {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn apply(&self, v: &[T]) -> Vec<T> {
        (**self).apply(v)
    }
}

impl<T: Float, O: LinearOperator<T> + ?Sized> LinearOperator<T> for Arc<O> {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn apply(&self, v: &[T]) -> Vec<T> {
        (**self).apply(v)
    }
}

/// Generic trait representing a materialized matrix.
/// Implementations can be sparse or dense.
pub trait Matrix: Debug {
    /// The underlying numeric type of the matrix elements (e.g., f32, f64).
    type Value: Float + Debug;

    /// Returns the dimensions of the matrix as (rows, columns).
    fn dims(&self) -> (usize, usize);

    /// Returns the entry at `(row, col)`, zero for structural zeros and
    /// out-of-bounds indices.
    fn entry(&self, row: usize, col: usize) -> Self::Value;

    /// Returns the number of rows.
    fn rows(&self) -> usize {
        self.dims().0
    }

    /// Returns the number of columns.
    fn cols(&self) -> usize {
        self.dims().1
    }

    /// Checks if the matrix is square.
    fn is_square(&self) -> bool {
        let (rows, cols) = self.dims();
        rows == cols
    }

    /// Checks `|a_ij - a_ji| <= tolerance` for every pair of entries.
    /// Visits all `rows * cols` positions; sparse types override this.
    fn is_symmetric(&self, tolerance: Self::Value) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.rows();
        (0..n).all(|i| {
            (i + 1..n).all(|j| (self.entry(i, j) - self.entry(j, i)).abs() <= tolerance)
        })
    }

    /// Returns the main diagonal.
    fn diagonal(&self) -> Vec<Self::Value> {
        let n = self.rows().min(self.cols());
        (0..n).map(|i| self.entry(i, i)).collect()
    }
}
