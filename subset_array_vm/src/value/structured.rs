//! Structured matrices: diagonal and permutation.
//!
//! Both are stored compactly and expand to dense only on demand.

use nalgebra::{DMatrix, DVector};

/// Rectangular diagonal matrix. Only the leading `min(rows, cols)`
/// diagonal entries are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagMatrix {
    pub rows: usize,
    pub cols: usize,
    pub diag: DVector<f64>,
}

impl DiagMatrix {
    /// Square diagonal matrix with `diag` on the diagonal
    pub fn from_diagonal(diag: &[f64]) -> Self {
        Self {
            rows: diag.len(),
            cols: diag.len(),
            diag: DVector::from_column_slice(diag),
        }
    }

    /// Rectangular diagonal matrix. Returns `None` unless `diag` has
    /// exactly `min(rows, cols)` entries.
    pub fn new(rows: usize, cols: usize, diag: &[f64]) -> Option<Self> {
        if diag.len() != rows.min(cols) {
            return None;
        }
        Some(Self {
            rows,
            cols,
            diag: DVector::from_column_slice(diag),
        })
    }

    pub fn identity(n: usize) -> Self {
        Self {
            rows: n,
            cols: n,
            diag: DVector::from_element(n, 1.0),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i == j && i < self.diag.len() {
            self.diag[i]
        } else {
            0.0
        }
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(self.rows, self.cols);
        for (i, &d) in self.diag.iter().enumerate() {
            m[(i, i)] = d;
        }
        m
    }

    pub fn transpose(&self) -> Self {
        Self {
            rows: self.cols,
            cols: self.rows,
            diag: self.diag.clone(),
        }
    }
}

/// Square permutation matrix.
///
/// Row `i` of the matrix is the unit row vector `e_{perm[i]}`, so
/// `(P * A)` row `i` is row `perm[i]` of `A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermMatrix {
    perm: Vec<usize>,
}

impl PermMatrix {
    /// Returns `None` if `perm` is not a permutation of `0..n`
    pub fn new(perm: Vec<usize>) -> Option<Self> {
        let n = perm.len();
        let mut seen = vec![false; n];
        for &p in &perm {
            if p >= n || seen[p] {
                return None;
            }
            seen[p] = true;
        }
        Some(Self { perm })
    }

    pub fn identity(n: usize) -> Self {
        Self {
            perm: (0..n).collect(),
        }
    }

    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    pub fn order(&self) -> usize {
        self.perm.len()
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.perm.len(), self.perm.len())
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        match self.perm.get(i) {
            Some(&p) if p == j => 1.0,
            _ => 0.0,
        }
    }

    /// The inverse permutation, which is also the transpose
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.perm.len()];
        for (i, &p) in self.perm.iter().enumerate() {
            inv[p] = i;
        }
        Self { perm: inv }
    }

    /// `self * other`
    pub fn compose(&self, other: &PermMatrix) -> Option<PermMatrix> {
        if self.order() != other.order() {
            return None;
        }
        // (P*Q) row i = row perm[i] of Q = e_{q[perm[i]]}
        Some(Self {
            perm: self.perm.iter().map(|&p| other.perm[p]).collect(),
        })
    }

    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.perm.len();
        let mut m = DMatrix::zeros(n, n);
        for (i, &p) in self.perm.iter().enumerate() {
            m[(i, p)] = 1.0;
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diag_rectangular() {
        let d = DiagMatrix::new(2, 3, &[4.0, 5.0]).unwrap();
        let m = d.to_dense();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m[(1, 1)], 5.0);
        assert_eq!(m[(0, 2)], 0.0);
        assert!(DiagMatrix::new(2, 3, &[1.0]).is_none());
    }

    #[test]
    fn test_perm_rejects_duplicates() {
        assert!(PermMatrix::new(vec![0, 0, 1]).is_none());
        assert!(PermMatrix::new(vec![0, 3, 1]).is_none());
    }

    #[test]
    fn test_perm_inverse_is_transpose() {
        let p = PermMatrix::new(vec![2, 0, 1]).unwrap();
        assert_eq!(p.inverse().to_dense(), p.to_dense().transpose());
        assert_eq!(p.compose(&p.inverse()), Some(PermMatrix::identity(3)));
    }

    #[test]
    fn test_perm_compose_matches_dense_product() {
        let p = PermMatrix::new(vec![1, 2, 0]).unwrap();
        let q = PermMatrix::new(vec![2, 1, 0]).unwrap();
        let pq = p.compose(&q).unwrap();
        assert_eq!(pq.to_dense(), p.to_dense() * q.to_dense());
    }
}
