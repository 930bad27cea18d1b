//! Compressed sparse column storage.
//!
//! Layout follows the usual CSC convention: `col_ptr` has `cols + 1`
//! entries, and the entries of column `j` are `row_idx[col_ptr[j]..col_ptr[j+1]]`
//! with matching `values`. Row indices within a column are strictly
//! increasing and explicit zeros are never stored.

use nalgebra::{DMatrix, Scalar};
use num_traits::Zero;

/// Sparse matrix in compressed sparse column form
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T> {
    rows: usize,
    cols: usize,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
    values: Vec<T>,
}

impl<T> SparseMatrix<T>
where
    T: Scalar + Zero + Copy,
{
    /// All-zero sparse matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            col_ptr: vec![0; cols + 1],
            row_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Compress a dense matrix, dropping zeros
    pub fn from_dense(m: &DMatrix<T>) -> Self {
        let (rows, cols) = m.shape();
        let mut col_ptr = Vec::with_capacity(cols + 1);
        let mut row_idx = Vec::new();
        let mut values = Vec::new();
        col_ptr.push(0);
        for j in 0..cols {
            for i in 0..rows {
                let v = m[(i, j)];
                if !v.is_zero() {
                    row_idx.push(i);
                    values.push(v);
                }
            }
            col_ptr.push(values.len());
        }
        Self {
            rows,
            cols,
            col_ptr,
            row_idx,
            values,
        }
    }

    /// Build from (row, col, value) triplets. Duplicates are summed and
    /// out-of-range triplets are rejected.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, T)]) -> Option<Self> {
        let mut dense = DMatrix::from_element(rows, cols, T::zero());
        for &(i, j, v) in triplets {
            if i >= rows || j >= cols {
                return None;
            }
            dense[(i, j)] = dense[(i, j)] + v;
        }
        Some(Self::from_dense(&dense))
    }

    /// Build from raw CSC arrays. Returns `None` when the arrays are
    /// inconsistent with each other or with the shape.
    pub fn from_csc(
        rows: usize,
        cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Option<Self> {
        if col_ptr.len() != cols + 1 || row_idx.len() != values.len() {
            return None;
        }
        if col_ptr.first() != Some(&0) || col_ptr.last() != Some(&values.len()) {
            return None;
        }
        if col_ptr.windows(2).any(|w| w[0] > w[1]) {
            return None;
        }
        for j in 0..cols {
            let col = &row_idx[col_ptr[j]..col_ptr[j + 1]];
            if col.iter().any(|&i| i >= rows) || col.windows(2).any(|w| w[0] >= w[1]) {
                return None;
            }
        }
        Some(Self {
            rows,
            cols,
            col_ptr,
            row_idx,
            values,
        })
    }

    pub fn to_dense(&self) -> DMatrix<T> {
        let mut dense = DMatrix::from_element(self.rows, self.cols, T::zero());
        for j in 0..self.cols {
            for k in self.col_ptr[j]..self.col_ptr[j + 1] {
                dense[(self.row_idx[k], j)] = self.values[k];
            }
        }
        dense
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored nonzeros
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Element at (i, j); zero when not stored or out of range
    pub fn get(&self, i: usize, j: usize) -> T {
        if j >= self.cols {
            return T::zero();
        }
        let range = self.col_ptr[j]..self.col_ptr[j + 1];
        match self.row_idx[range.clone()].binary_search(&i) {
            Ok(pos) => self.values[range.start + pos],
            Err(_) => T::zero(),
        }
    }

    pub fn transpose(&self) -> Self {
        Self::from_dense(&self.to_dense().transpose())
    }

    /// Apply `f` to every element, including implicit zeros, and
    /// re-compress. Needed for maps where `f(0) != 0`.
    pub fn map<U, F>(&self, f: F) -> SparseMatrix<U>
    where
        U: Scalar + Zero + Copy,
        F: FnMut(T) -> U,
    {
        SparseMatrix::from_dense(&self.to_dense().map(f))
    }

    /// Apply `f` to stored nonzeros only. `f` must map zero to zero.
    pub fn map_nonzeros<U, F>(&self, f: F) -> SparseMatrix<U>
    where
        U: Scalar + Zero + Copy,
        F: FnMut(T) -> U,
    {
        let values: Vec<U> = self.values.iter().copied().map(f).collect();
        let mut col_ptr = Vec::with_capacity(self.cols + 1);
        let mut row_idx = Vec::with_capacity(values.len());
        let mut kept = Vec::with_capacity(values.len());
        col_ptr.push(0);
        for j in 0..self.cols {
            for k in self.col_ptr[j]..self.col_ptr[j + 1] {
                if !values[k].is_zero() {
                    row_idx.push(self.row_idx[k]);
                    kept.push(values[k]);
                }
            }
            col_ptr.push(kept.len());
        }
        SparseMatrix {
            rows: self.rows,
            cols: self.cols,
            col_ptr,
            row_idx,
            values: kept,
        }
    }

    /// Column pointers (`jc`)
    pub fn col_ptr(&self) -> &[usize] {
        &self.col_ptr
    }

    /// Row indices (`ir`)
    pub fn row_idx(&self) -> &[usize] {
        &self.row_idx
    }

    /// Stored nonzero values
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Iterate stored entries as (row, col, value)
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.cols).flat_map(move |j| {
            (self.col_ptr[j]..self.col_ptr[j + 1]).map(move |k| (self.row_idx[k], j, self.values[k]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseMatrix<f64> {
        // [1 0 0; 0 0 2; 3 0 0]
        SparseMatrix::from_dense(&DMatrix::from_row_slice(
            3,
            3,
            &[1.0, 0.0, 0.0, 0.0, 0.0, 2.0, 3.0, 0.0, 0.0],
        ))
    }

    #[test]
    fn test_csc_layout() {
        let s = sample();
        assert_eq!(s.nnz(), 3);
        assert_eq!(s.col_ptr(), &[0, 2, 2, 3]);
        assert_eq!(s.row_idx(), &[0, 2, 1]);
        assert_eq!(s.values(), &[1.0, 3.0, 2.0]);
    }

    #[test]
    fn test_get_missing_is_zero() {
        let s = sample();
        assert_eq!(s.get(2, 0), 3.0);
        assert_eq!(s.get(1, 1), 0.0);
        assert_eq!(s.get(0, 7), 0.0);
    }

    #[test]
    fn test_triplets_sum_duplicates() {
        let s = SparseMatrix::from_triplets(2, 2, &[(0, 0, 1.0), (0, 0, 2.0), (1, 1, 4.0)]).unwrap();
        assert_eq!(s.get(0, 0), 3.0);
        assert_eq!(s.nnz(), 2);
        assert!(SparseMatrix::<f64>::from_triplets(2, 2, &[(2, 0, 1.0)]).is_none());
    }

    #[test]
    fn test_from_csc_rejects_unsorted_rows() {
        assert!(SparseMatrix::from_csc(3, 1, vec![0, 2], vec![2, 0], vec![1.0, 2.0]).is_none());
        assert!(SparseMatrix::from_csc(3, 1, vec![0, 2], vec![0, 2], vec![1.0, 2.0]).is_some());
    }

    #[test]
    fn test_from_csc_rejects_non_monotone_col_ptr() {
        // middle entry points past the stored nonzeros
        assert!(SparseMatrix::<f64>::from_csc(2, 2, vec![0, 5, 2], vec![0, 1], vec![1.0, 2.0]).is_none());
        assert!(SparseMatrix::<f64>::from_csc(2, 2, vec![0, 2, 1], vec![0, 1], vec![1.0, 2.0]).is_none());
    }

    #[test]
    fn test_map_nonzeros_drops_new_zeros() {
        let s = sample().map_nonzeros(|x| if x > 1.5 { x } else { 0.0 });
        assert_eq!(s.nnz(), 2);
        assert_eq!(s.get(0, 0), 0.0);
    }

    #[test]
    fn test_transpose() {
        let t = sample().transpose();
        assert_eq!(t.get(0, 2), 3.0);
        assert_eq!(t.get(2, 1), 2.0);
    }
}
