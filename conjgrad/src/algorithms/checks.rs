use conjgrad_core::{error::Result, ConjGradError, Matrix};
use log::debug;
use num_traits::Zero;

/// Checks that a materialized matrix is square, symmetric within `tolerance`
/// and has a strictly positive diagonal.
///
/// These are necessary, not sufficient, conditions for positive-definiteness.
/// The solver itself never calls this; it is meant for callers who want to
/// reject obviously unsuitable matrices up front.
pub fn check_symmetry_and_positive_diagonal<M: Matrix + ?Sized>(
    matrix: &M,
    tolerance: M::Value,
) -> Result<()> {
    let (rows, cols) = matrix.dims();
    if !matrix.is_square() {
        return Err(ConjGradError::InvalidDimensions(format!(
            "Matrix must be square (dims: {}x{})",
            rows, cols
        )));
    }
    if !matrix.is_symmetric(tolerance) {
        return Err(ConjGradError::NonSymmetricMatrix);
    }
    // `!(d > 0)` also rejects NaN.
    if let Some(i) = matrix.diagonal().iter().position(|&d| !(d > M::Value::zero())) {
        debug!("Diagonal entry {} is not positive", i);
        return Err(ConjGradError::NonPositiveDiagonal);
    }
    Ok(())
}
