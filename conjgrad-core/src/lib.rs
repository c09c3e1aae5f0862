//! # Conjugate Gradient Core Library
//!
//! Provides the abstractions the conjugate gradient solver is written
//! against: linear operators, vector arithmetic, cancellation signals, plus
//! sparse and dense matrices that implement them.

pub mod cancel;
pub mod dense_matrix;
pub mod error;
pub mod operator;
pub mod sparse_matrix;
pub mod traits;
pub mod vector;

// Re-export public types
pub use cancel::{CancelSignal, CancelToken, NeverCancel};
pub use dense_matrix::DenseMatrix;
pub use error::ConjGradError;
pub use operator::FnOperator;
pub use sparse_matrix::{SparseMatrix, Triplete};
pub use traits::{LinearOperator, Matrix};
