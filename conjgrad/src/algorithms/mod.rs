use conjgrad_core::{error::Result, ConjGradError, LinearOperator};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub mod checks;
pub mod conjugate_gradient;

pub use checks::check_symmetry_and_positive_diagonal;
pub use conjugate_gradient::{ConjugateGradientMetadata, Termination};

/// Number of iterations between direct recomputations of the residual.
pub const RESIDUAL_UPDATE_FREQUENCY: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult<V, M> {
    pub x: Vec<V>,   // Solution vector
    pub metadata: M, // Metadata about the solve process
}

// --- Algorithm Trait Definition ---
/// Trait representing a specific linear system solving algorithm.
/// Generic over the scalar type and the operator it applies.
pub trait SolveAlgorithm<T: Float, O: LinearOperator<T> + ?Sized> {
    type Metadata: Debug;

    /// Solves the linear system Tx = b for x.
    ///
    /// # Arguments
    ///
    /// * `a` - The operator T.
    /// * `b` - The right-hand side vector b.
    ///
    /// # Returns
    ///
    /// A `Result` containing the solution vector x or a `ConjGradError`.
    fn solve(&self, a: &O, b: &[T]) -> Result<SolveResult<T, Self::Metadata>>;

    // Helper for input validation, can be called by implementations.
    fn validate_inputs(&self, a: &O, b: &[T]) -> Result<()> {
        if a.dim() != b.len() {
            return Err(ConjGradError::InvalidDimensions(format!(
                "Operator dimension ({}) must match RHS vector b length ({})",
                a.dim(),
                b.len()
            )));
        }
        Ok(())
    }
}

// --- Algorithm Struct Definitions ---

/// Conjugate Gradient Algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Float + Deserialize<'de>"))]
pub struct ConjugateGradient<T = f64> {
    /// Stop once the largest absolute residual entry is at most this value.
    /// Zero asks for the best attainable accuracy.
    pub precision: T,
    /// Every this many iterations the residual is recomputed as `b - T·x`
    /// instead of being updated incrementally. Zero never recomputes.
    pub residual_update_frequency: usize,
}

impl<T: Float> Default for ConjugateGradient<T> {
    fn default() -> Self {
        Self {
            precision: T::zero(),
            residual_update_frequency: RESIDUAL_UPDATE_FREQUENCY,
        }
    }
}

impl<T: Float> ConjugateGradient<T> {
    /// Creates a new instance of the Conjugate Gradient algorithm with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new instance of the Conjugate Gradient algorithm with specified parameters.
    pub fn with_params(precision: T, residual_update_frequency: usize) -> Self {
        Self {
            precision,
            residual_update_frequency,
        }
    }

    pub(crate) fn validate_params(&self) -> Result<()> {
        if self.precision.is_nan() || self.precision < T::zero() {
            return Err(ConjGradError::InvalidParameter(
                "precision must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}
