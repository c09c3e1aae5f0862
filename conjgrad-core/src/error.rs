use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConjGradError {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Matrix is not symmetric")]
    NonSymmetricMatrix,

    #[error("Matrix has non-positive diagonal elements")]
    NonPositiveDiagonal,
}

pub type Result<T> = core::result::Result<T, ConjGradError>;
