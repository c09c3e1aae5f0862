use crate::error::{ConjGradError, Result};
use crate::traits::{LinearOperator, Matrix};
use num_traits::Float;
use std::fmt::Debug;

/// Represents a sparse matrix in Compressed Sparse Row (CSR) format.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T = f64> {
    /// Number of rows.
    rows: usize,
    /// Number of columns.
    cols: usize,
    /// Vector containing the non-zero values of the matrix.
    pub(crate) values: Vec<T>,
    /// Vector containing the column indices corresponding to the values.
    pub(crate) col_indices: Vec<usize>,
    /// Vector containing the pointers to the start of each row in `values` and `col_indices`.
    /// The length of this vector is `rows + 1`. `row_ptr[i]` gives the index in `values`
    /// where row `i` starts, and `row_ptr[rows]` gives the total number of non-zero elements (nnz).
    pub(crate) row_ptr: Vec<usize>,
}

impl<T: Float> SparseMatrix<T> {
    /// Creates a new empty SparseMatrix with given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        SparseMatrix {
            rows,
            cols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptr: vec![0; rows + 1],
        }
    }

    /// Builds a matrix from coordinate triplets. Duplicate coordinates are kept
    /// as separate entries and therefore sum in products.
    pub fn from_triplets(rows: usize, cols: usize, triplets: Vec<Triplete<T>>) -> Result<Self> {
        let mut coords = triplets;
        coords.sort_unstable_by_key(|t| (t.row, t.col));

        // Count non-zeros per row
        let mut row_ptr = vec![0usize; rows + 1];
        for t in &coords {
            if t.row >= rows {
                return Err(ConjGradError::InvalidDimensions(format!(
                    "Row index {} out of bounds for {} rows",
                    t.row, rows
                )));
            }
            if t.col >= cols {
                return Err(ConjGradError::InvalidDimensions(format!(
                    "Column index {} out of bounds for {} columns",
                    t.col, cols
                )));
            }
            row_ptr[t.row + 1] += 1;
        }
        for i in 1..=rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        // Sorted by row, so the values and column indices are already in CSR order.
        let (col_indices, values) = coords.into_iter().map(|t| (t.col, t.value)).unzip();

        Ok(SparseMatrix {
            rows,
            cols,
            values,
            col_indices,
            row_ptr,
        })
    }

    /// Creates a SparseMatrix from CSR components.
    /// Performs basic validation.
    pub fn from_csr(
        rows: usize,
        cols: usize,
        values: Vec<T>,
        col_indices: Vec<usize>,
        row_ptr: Vec<usize>,
    ) -> Result<Self> {
        if row_ptr.len() != rows + 1 {
            return Err(ConjGradError::InvalidDimensions(
                "row_ptr length must be rows + 1".to_string(),
            ));
        }
        if values.len() != col_indices.len() {
            return Err(ConjGradError::InvalidDimensions(
                "values and col_indices must have the same length".to_string(),
            ));
        }
        if let Some(&last_ptr) = row_ptr.last() {
            if last_ptr != values.len() {
                return Err(ConjGradError::InvalidDimensions(
                    "Last element of row_ptr must equal the number of non-zero values".to_string(),
                ));
            }
        }
        if row_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConjGradError::InvalidDimensions(
                "row_ptr must be non-decreasing".to_string(),
            ));
        }
        if col_indices.iter().any(|&c| c >= cols) {
            return Err(ConjGradError::InvalidDimensions(
                "Column index out of bounds".to_string(),
            ));
        }

        Ok(SparseMatrix {
            rows,
            cols,
            values,
            col_indices,
            row_ptr,
        })
    }

    /// Creates a SparseMatrix from a dense 2D representation, dropping exact zeros.
    pub fn from_dense(dense: &[Vec<T>]) -> Result<Self> {
        let rows = dense.len();
        let cols = dense.first().map_or(0, |row| row.len());
        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptr = vec![0; rows + 1];

        for (r, row_vec) in dense.iter().enumerate() {
            if row_vec.len() != cols {
                return Err(ConjGradError::InvalidDimensions(format!(
                    "Input dense matrix must be rectangular: row {} has {} entries, expected {}",
                    r,
                    row_vec.len(),
                    cols
                )));
            }
            for (c, &val) in row_vec.iter().enumerate() {
                if val != T::zero() {
                    values.push(val);
                    col_indices.push(c);
                }
            }
            row_ptr[r + 1] = values.len();
        }

        Ok(SparseMatrix {
            rows,
            cols,
            values,
            col_indices,
            row_ptr,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of non-zero elements.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Gets the stored value at a specific row and column.
    /// Scans the row, so this is meant for testing/debugging.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.rows || col >= self.cols {
            return None;
        }

        let row_start = self.row_ptr[row];
        let row_end = self.row_ptr[row + 1];

        // Duplicates from `from_triplets` are summed.
        let mut found = None;
        for i in row_start..row_end {
            if self.col_indices[i] == col {
                found = Some(found.unwrap_or_else(T::zero) + self.values[i]);
            }
        }
        found
    }

    /// Returns a slice containing the non-zero values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Returns a slice containing the column indices.
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Returns a slice containing the row pointers.
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// `y = self * x`. Missing entries of a short `x` count as zero.
    pub fn spmv(&self, x: &[T]) -> Vec<T> {
        (0..self.rows)
            .map(|row| {
                (self.row_ptr[row]..self.row_ptr[row + 1]).fold(T::zero(), |acc, i| {
                    let xi = x.get(self.col_indices[i]).copied().unwrap_or_else(T::zero);
                    acc + self.values[i] * xi
                })
            })
            .collect()
    }

    pub fn iter(&self) -> SparseMatrixIter<'_, T> {
        SparseMatrixIter {
            matrix: self,
            row: 0,
            index: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triplete<T = f64> {
    row: usize,
    col: usize,
    value: T,
}

impl<T: Copy> Triplete<T> {
    pub fn new(row: usize, col: usize, value: T) -> Self {
        Triplete { row, col, value }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn value(&self) -> T {
        self.value
    }
}

/// Walks the stored entries in row-major order.
pub struct SparseMatrixIter<'a, T> {
    matrix: &'a SparseMatrix<T>,
    row: usize,
    index: usize,
}

impl<T: Copy> Iterator for SparseMatrixIter<'_, T> {
    type Item = Triplete<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let m = self.matrix;
        if self.index >= m.values.len() {
            return None;
        }
        while self.index >= m.row_ptr[self.row + 1] {
            self.row += 1;
        }
        let index = self.index;
        self.index += 1;
        Some(Triplete {
            row: self.row,
            col: m.col_indices[index],
            value: m.values[index],
        })
    }
}

impl<T: Float + Debug> Matrix for SparseMatrix<T> {
    type Value = T;

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn entry(&self, row: usize, col: usize) -> T {
        self.get(row, col).unwrap_or_else(T::zero)
    }

    /// Only visits stored entries.
    fn is_symmetric(&self, tolerance: T) -> bool {
        self.is_square()
            && self.iter().all(|t| {
                let mirrored = self.entry(t.col, t.row);
                (self.entry(t.row, t.col) - mirrored).abs() <= tolerance
            })
    }
}

impl<T: Float> LinearOperator<T> for SparseMatrix<T> {
    fn dim(&self) -> usize {
        self.rows
    }

    fn apply(&self, v: &[T]) -> Vec<T> {
        self.spmv(v)
    }
}
