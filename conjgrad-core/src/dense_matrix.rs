use crate::error::{ConjGradError, Result};
use crate::traits::{LinearOperator, Matrix};
use num_traits::Float;
use std::fmt::Debug;

/// Represents a dense matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T = f64> {
    rows: usize,
    cols: usize,
    data: Vec<T>, // Data stored row-major: data[row * cols + col]
}

impl<T: Float> DenseMatrix<T> {
    /// Creates a new DenseMatrix from raw data, dimensions, assuming row-major order.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(ConjGradError::InvalidDimensions(format!(
                "Data length ({}) does not match dimensions ({}x{})",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a new DenseMatrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        Self::from_diagonal(&vec![T::one(); n])
    }

    /// Square matrix with `diagonal` on the main diagonal.
    pub fn from_diagonal(diagonal: &[T]) -> Self {
        let n = diagonal.len();
        let mut matrix = Self::zeros(n, n);
        for (i, &d) in diagonal.iter().enumerate() {
            matrix.data[i * n + i] = d;
        }
        matrix
    }

    /// Builds a matrix from equally long rows.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.len());
        if let Some((r, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(ConjGradError::InvalidDimensions(format!(
                "Row {} has {} entries, expected {}",
                r,
                row.len(),
                cols
            )));
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data: rows.concat(),
        })
    }

    /// Returns a slice view of the underlying data vector.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable slice view of the underlying data vector.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Gets the element at the specified row and column (immutable).
    /// Returns None if indices are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Gets the element at the specified row and column (mutable).
    /// Returns None if indices are out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            self.data.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// `y = self * x`
    pub fn matvec(&self, x: &[T]) -> Vec<T> {
        if self.cols == 0 {
            return vec![T::zero(); self.rows];
        }
        self.data
            .chunks(self.cols)
            .map(|row| crate::vector::dot(row, x))
            .collect()
    }
}

impl<T: Float + Debug> Matrix for DenseMatrix<T> {
    type Value = T;

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn entry(&self, row: usize, col: usize) -> T {
        self.get(row, col).copied().unwrap_or_else(T::zero)
    }
}

impl<T: Float> LinearOperator<T> for DenseMatrix<T> {
    fn dim(&self) -> usize {
        self.rows
    }

    fn apply(&self, v: &[T]) -> Vec<T> {
        self.matvec(v)
    }
}
