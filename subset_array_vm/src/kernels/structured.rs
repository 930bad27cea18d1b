//! Diagonal and permutation matrix kernels.
//!
//! Products between structured matrices keep their structure; mixing with
//! a full matrix scales or permutes its rows without expanding the
//! structured side.

use nalgebra::{DMatrix, DVector};

use super::element::wrong_operand;
use crate::error::{DispatchError, DispatchResult};
use crate::value::{DiagMatrix, PermMatrix, SparseMatrix, Value};

fn diag(v: &Value) -> DispatchResult<&DiagMatrix> {
    match v {
        Value::DiagMatrix(d) => Ok(d),
        other => Err(wrong_operand("diagonal matrix", other)),
    }
}

fn perm(v: &Value) -> DispatchResult<&PermMatrix> {
    match v {
        Value::PermMatrix(p) => Ok(p),
        other => Err(wrong_operand("permutation matrix", other)),
    }
}

fn full(v: &Value) -> DispatchResult<&DMatrix<f64>> {
    match v {
        Value::Matrix(m) => Ok(m),
        other => Err(wrong_operand("matrix", other)),
    }
}

fn sparse(v: &Value) -> DispatchResult<&SparseMatrix<f64>> {
    match v {
        Value::SparseMatrix(s) => Ok(s),
        other => Err(wrong_operand("sparse matrix", other)),
    }
}

// ========== diagonal, diagonal ==========

fn same_shape(op: &str, a: &DiagMatrix, b: &DiagMatrix) -> DispatchResult<()> {
    if a.shape() == b.shape() {
        Ok(())
    } else {
        Err(DispatchError::nonconformant(op, a.shape(), b.shape()))
    }
}

pub fn dm_add(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (diag(a)?, diag(b)?);
    same_shape("+", x, y)?;
    Ok(Value::DiagMatrix(DiagMatrix {
        rows: x.rows,
        cols: x.cols,
        diag: &x.diag + &y.diag,
    }))
}

pub fn dm_sub(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (diag(a)?, diag(b)?);
    same_shape("-", x, y)?;
    Ok(Value::DiagMatrix(DiagMatrix {
        rows: x.rows,
        cols: x.cols,
        diag: &x.diag - &y.diag,
    }))
}

/// Product of two diagonal matrices is diagonal
pub fn dm_mul(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (diag(a)?, diag(b)?);
    if x.cols != y.rows {
        return Err(DispatchError::nonconformant("*", x.shape(), y.shape()));
    }
    let n = x.rows.min(y.cols);
    let d = DVector::from_fn(n, |i, _| {
        if i < x.diag.len() && i < y.diag.len() {
            x.diag[i] * y.diag[i]
        } else {
            0.0
        }
    });
    Ok(Value::DiagMatrix(DiagMatrix {
        rows: x.rows,
        cols: y.cols,
        diag: d,
    }))
}

pub fn dm_uminus(a: &Value) -> DispatchResult<Value> {
    let x = diag(a)?;
    Ok(Value::DiagMatrix(DiagMatrix {
        rows: x.rows,
        cols: x.cols,
        diag: -&x.diag,
    }))
}

pub fn dm_uplus(a: &Value) -> DispatchResult<Value> {
    Ok(Value::DiagMatrix(diag(a)?.clone()))
}

/// Real diagonal: transpose and hermitian coincide
pub fn dm_transpose(a: &Value) -> DispatchResult<Value> {
    Ok(Value::DiagMatrix(diag(a)?.transpose()))
}

// ========== diagonal, full ==========

/// `D * M` scales the rows of `M`
pub fn dm_m_mul(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (d, m) = (diag(a)?, full(b)?);
    if d.cols != m.nrows() {
        return Err(DispatchError::nonconformant("*", d.shape(), m.shape()));
    }
    Ok(Value::Matrix(DMatrix::from_fn(d.rows, m.ncols(), |i, j| {
        if i < d.diag.len() {
            d.diag[i] * m[(i, j)]
        } else {
            0.0
        }
    })))
}

/// `D \ M` divides the rows of `M`
pub fn dm_m_ldiv(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (d, m) = (diag(a)?, full(b)?);
    if d.rows != m.nrows() {
        return Err(DispatchError::nonconformant("\\", d.shape(), m.shape()));
    }
    Ok(Value::Matrix(DMatrix::from_fn(d.cols, m.ncols(), |i, j| {
        match d.diag.get(i) {
            Some(&di) if di != 0.0 => m[(i, j)] / di,
            _ => 0.0,
        }
    })))
}

pub fn dm_m_add(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (d, m) = (diag(a)?, full(b)?);
    if d.shape() != m.shape() {
        return Err(DispatchError::nonconformant("+", d.shape(), m.shape()));
    }
    let mut out = m.clone();
    for (i, &di) in d.diag.iter().enumerate() {
        out[(i, i)] += di;
    }
    Ok(Value::Matrix(out))
}

pub fn dm_m_sub(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (d, m) = (diag(a)?, full(b)?);
    if d.shape() != m.shape() {
        return Err(DispatchError::nonconformant("-", d.shape(), m.shape()));
    }
    let mut out = -m;
    for (i, &di) in d.diag.iter().enumerate() {
        out[(i, i)] += di;
    }
    Ok(Value::Matrix(out))
}

// ========== permutation ==========

pub fn pm_mul(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (p, q) = (perm(a)?, perm(b)?);
    p.compose(q)
        .map(Value::PermMatrix)
        .ok_or_else(|| DispatchError::nonconformant("*", p.shape(), q.shape()))
}

/// `P \ Q = P' * Q`
pub fn pm_ldiv(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (p, q) = (perm(a)?, perm(b)?);
    p.inverse()
        .compose(q)
        .map(Value::PermMatrix)
        .ok_or_else(|| DispatchError::nonconformant("\\", p.shape(), q.shape()))
}

/// `P / Q = P * Q'`
pub fn pm_div(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (p, q) = (perm(a)?, perm(b)?);
    p.compose(&q.inverse())
        .map(Value::PermMatrix)
        .ok_or_else(|| DispatchError::nonconformant("/", p.shape(), q.shape()))
}

/// The transpose of a permutation is its inverse
pub fn pm_transpose(a: &Value) -> DispatchResult<Value> {
    Ok(Value::PermMatrix(perm(a)?.inverse()))
}

pub fn pm_uplus(a: &Value) -> DispatchResult<Value> {
    Ok(Value::PermMatrix(perm(a)?.clone()))
}

/// Row `i` of `P * S` is row `perm[i]` of `S`
fn permute_rows(p: &PermMatrix, s: &SparseMatrix<f64>) -> SparseMatrix<f64> {
    let dense = s.to_dense();
    let permuted = DMatrix::from_fn(dense.nrows(), dense.ncols(), |i, j| dense[(p.perm()[i], j)]);
    SparseMatrix::from_dense(&permuted)
}

/// `P * S` stays sparse
pub fn pm_sm_mul(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (p, s) = (perm(a)?, sparse(b)?);
    if p.order() != s.shape().0 {
        return Err(DispatchError::nonconformant("*", p.shape(), s.shape()));
    }
    Ok(Value::SparseMatrix(permute_rows(p, s)))
}

/// `P \ S = P' * S`
pub fn pm_sm_ldiv(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (p, s) = (perm(a)?, sparse(b)?);
    if p.order() != s.shape().0 {
        return Err(DispatchError::nonconformant("\\", p.shape(), s.shape()));
    }
    Ok(Value::SparseMatrix(permute_rows(&p.inverse(), s)))
}

/// Column `perm[k]` of `S * P` is column `k` of `S`
fn permute_cols(s: &SparseMatrix<f64>, p: &PermMatrix) -> SparseMatrix<f64> {
    let dense = s.to_dense();
    let mut permuted = DMatrix::zeros(dense.nrows(), dense.ncols());
    for (k, &j) in p.perm().iter().enumerate() {
        permuted.set_column(j, &dense.column(k));
    }
    SparseMatrix::from_dense(&permuted)
}

/// `S * P` stays sparse. A 1x1 sparse side scales the permutation; a 1x1
/// permutation is the identity.
pub fn sm_pm_mul(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (s, p) = (sparse(a)?, perm(b)?);
    if s.shape() == (1, 1) {
        let d = s.get(0, 0);
        return Ok(Value::SparseMatrix(SparseMatrix::from_dense(&(p.to_dense() * d))));
    }
    if p.order() == 1 {
        return Ok(Value::SparseMatrix(s.clone()));
    }
    if s.shape().1 != p.order() {
        return Err(DispatchError::nonconformant("*", s.shape(), p.shape()));
    }
    Ok(Value::SparseMatrix(permute_cols(s, p)))
}

/// `S / P = S * P'`
pub fn sm_pm_div(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (s, p) = (sparse(a)?, perm(b)?);
    if s.shape().1 != p.order() {
        return Err(DispatchError::nonconformant("/", s.shape(), p.shape()));
    }
    Ok(Value::SparseMatrix(permute_cols(s, &p.inverse())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diag_product_stays_diagonal() {
        let a = Value::DiagMatrix(DiagMatrix::from_diagonal(&[1.0, 2.0]));
        let b = Value::DiagMatrix(DiagMatrix::from_diagonal(&[3.0, 4.0]));
        assert_eq!(
            dm_mul(&a, &b).unwrap(),
            Value::DiagMatrix(DiagMatrix::from_diagonal(&[3.0, 8.0]))
        );
    }

    #[test]
    fn test_rectangular_diag_product_shape() {
        let a = Value::DiagMatrix(DiagMatrix::new(2, 3, &[1.0, 2.0]).unwrap());
        let b = Value::DiagMatrix(DiagMatrix::new(3, 1, &[5.0]).unwrap());
        let out = dm_mul(&a, &b).unwrap();
        assert_eq!(out.dims(), (2, 1));
        assert_eq!(out.to_real_dense().unwrap(), DMatrix::from_row_slice(2, 1, &[5.0, 0.0]));
    }

    #[test]
    fn test_diag_scales_rows() {
        let d = Value::DiagMatrix(DiagMatrix::from_diagonal(&[2.0, 3.0]));
        let m = Value::matrix_from_rows(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            dm_m_mul(&d, &m).unwrap(),
            Value::matrix_from_rows(2, 2, &[2.0, 2.0, 3.0, 3.0])
        );
        assert_eq!(
            dm_m_ldiv(&d, &Value::matrix_from_rows(2, 1, &[4.0, 9.0])).unwrap(),
            Value::matrix_from_rows(2, 1, &[2.0, 3.0])
        );
    }

    #[test]
    fn test_diag_minus_full() {
        let d = Value::DiagMatrix(DiagMatrix::from_diagonal(&[5.0, 5.0]));
        let m = Value::matrix_from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            dm_m_sub(&d, &m).unwrap(),
            Value::matrix_from_rows(2, 2, &[4.0, -2.0, -3.0, 1.0])
        );
    }

    #[test]
    fn test_perm_product_matches_dense() {
        let p = PermMatrix::new(vec![1, 2, 0]).unwrap();
        let q = PermMatrix::new(vec![0, 2, 1]).unwrap();
        let out = pm_mul(&Value::PermMatrix(p.clone()), &Value::PermMatrix(q.clone())).unwrap();
        assert_eq!(out.to_real_dense().unwrap(), p.to_dense() * q.to_dense());
    }

    #[test]
    fn test_perm_ldiv_undoes_mul() {
        let p = Value::PermMatrix(PermMatrix::new(vec![2, 0, 1]).unwrap());
        let out = pm_ldiv(&p, &p).unwrap();
        assert_eq!(out, Value::PermMatrix(PermMatrix::identity(3)));
    }

    #[test]
    fn test_perm_times_sparse() {
        let p = PermMatrix::new(vec![1, 0]).unwrap();
        let s = SparseMatrix::from_dense(&DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 2.0]));
        let out = pm_sm_mul(&Value::PermMatrix(p.clone()), &Value::SparseMatrix(s.clone())).unwrap();
        let expected = p.to_dense() * s.to_dense();
        assert_eq!(out, Value::SparseMatrix(SparseMatrix::from_dense(&expected)));
    }

    #[test]
    fn test_sparse_times_perm_stays_sparse() {
        let p = PermMatrix::new(vec![2, 0, 1]).unwrap();
        let s = SparseMatrix::from_dense(&DMatrix::from_row_slice(
            2,
            3,
            &[1.0, 0.0, 3.0, 0.0, 2.0, 0.0],
        ));
        let (sv, pv) = (Value::SparseMatrix(s.clone()), Value::PermMatrix(p.clone()));

        let out = sm_pm_mul(&sv, &pv).unwrap();
        let expected = s.to_dense() * p.to_dense();
        assert_eq!(out, Value::SparseMatrix(SparseMatrix::from_dense(&expected)));

        let out = sm_pm_div(&sv, &pv).unwrap();
        let expected = s.to_dense() * p.to_dense().transpose();
        assert_eq!(out, Value::SparseMatrix(SparseMatrix::from_dense(&expected)));
    }

    #[test]
    fn test_scalar_sparse_times_perm() {
        let s = Value::SparseMatrix(SparseMatrix::from_dense(&DMatrix::from_element(1, 1, 2.0)));
        let p = PermMatrix::new(vec![1, 0]).unwrap();
        let out = sm_pm_mul(&s, &Value::PermMatrix(p.clone())).unwrap();
        assert_eq!(out, Value::SparseMatrix(SparseMatrix::from_dense(&(p.to_dense() * 2.0))));
    }
}
