use crate::traits::LinearOperator;
use num_traits::Float;
use std::fmt;

/// A fully implicit operator: a dimension plus a closure computing `T·v`.
pub struct FnOperator<F> {
    dim: usize,
    apply: F,
}

impl<F> FnOperator<F> {
    pub fn new(dim: usize, apply: F) -> Self {
        Self { dim, apply }
    }
}

impl<F> fmt::Debug for FnOperator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperator").field("dim", &self.dim).finish()
    }
}

impl<T, F> LinearOperator<T> for FnOperator<F>
where
    T: Float,
    F: Fn(&[T]) -> Vec<T>,
{
    fn dim(&self) -> usize {
        self.dim
    }

    fn apply(&self, v: &[T]) -> Vec<T> {
        (self.apply)(v)
    }
}
