//! Sparse kernels.
//!
//! Sparse arithmetic is computed on dense copies and re-compressed when the
//! result type is sparse. Which operations keep a sparse result follows the
//! usual rules: sparse-sparse arithmetic and anything elementwise-multiplied
//! by a sparse operand stay sparse; mixing with a full matrix under `+`,
//! `-`, `*`, `/` and `\` gives a full result.

use super::element::{operand, wrong_operand, SparseElement};
use super::{elementwise, linalg};
use crate::error::{DispatchError, DispatchResult};
use crate::value::{SparseMatrix, Value};

/// Re-compress a dense kernel result of element type `T`
fn sparsify<T: SparseElement>(result: DispatchResult<Value>) -> DispatchResult<Value> {
    let value = result?;
    match T::view(&value) {
        Some(m) => Ok(T::wrap_sparse(SparseMatrix::from_dense(m))),
        None => Ok(value),
    }
}

macro_rules! sparse_result {
    ($(#[$doc:meta])* $name:ident => $module:ident :: $dense:ident) => {
        $(#[$doc])*
        pub fn $name<T: SparseElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
            sparsify::<T>($module::$dense::<T>(a, b))
        }
    };
}

sparse_result!(
    /// sparse + sparse
    add => elementwise::add
);
sparse_result!(sub => elementwise::sub);
sparse_result!(mul => linalg::mul);
sparse_result!(
    /// `.*` with at least one sparse side is sparse
    el_mul => elementwise::el_mul
);
sparse_result!(el_div => elementwise::el_div);
sparse_result!(
    /// `.\` with a sparse numerator on the right
    el_ldiv => elementwise::el_ldiv
);
sparse_result!(
    /// `.^` with a sparse side. A result that leaves the real line comes
    /// back full complex.
    el_pow => elementwise::el_pow
);
sparse_result!(ldiv => linalg::ldiv);

/// sparse / sparse
pub fn div<T: SparseElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    sparsify::<T>(linalg::div::<T>(a, b))
}

/// full / sparse. A 1x1 sparse divisor divides elementwise; anything else
/// is a full right division.
pub fn full_div_sparse<T: SparseElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    if b.is_scalar() {
        let x = operand::<T>(a)?;
        let d = operand::<T>(b)?[(0, 0)];
        return Ok(T::wrap(x.map(|v| v / d)));
    }
    linalg::div::<T>(a, b)
}

/// sparse / full. A 1x1 full divisor keeps the result sparse.
pub fn sparse_div_full<T: SparseElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    if b.is_scalar() {
        let d = operand::<T>(b)?[(0, 0)];
        let s = T::view_sparse(a)
            .map(|s| s.map_nonzeros(|v| v / d))
            .ok_or_else(|| wrong_operand("sparse matrix", a))?;
        // x / 0 turns implicit zeros into NaN
        if d.is_nonzero() {
            return Ok(T::wrap_sparse(s));
        }
    }
    linalg::div::<T>(a, b)
}

/// `^` on sparse operands: integer powers of a square sparse matrix.
pub fn pow<T: SparseElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    if !a.is_scalar() && !b.is_scalar() {
        return Err(DispatchError::domain_error(
            "can't do A ^ B for A and B both matrices",
        ));
    }
    sparsify::<T>(linalg::pow::<T>(a, b))
}

// ========== Unary ==========

pub fn uminus<T: SparseElement>(a: &Value) -> DispatchResult<Value> {
    let s = T::view_sparse(a).ok_or_else(|| wrong_operand("sparse matrix", a))?;
    Ok(T::wrap_sparse(s.map_nonzeros(|v| -v)))
}

pub fn uplus<T: SparseElement>(a: &Value) -> DispatchResult<Value> {
    let s = T::view_sparse(a).ok_or_else(|| wrong_operand("sparse matrix", a))?;
    Ok(T::wrap_sparse(s.clone()))
}

pub fn transpose<T: SparseElement>(a: &Value) -> DispatchResult<Value> {
    let s = T::view_sparse(a).ok_or_else(|| wrong_operand("sparse matrix", a))?;
    Ok(T::wrap_sparse(s.transpose()))
}

pub fn hermitian<T: SparseElement>(a: &Value) -> DispatchResult<Value> {
    let s = T::view_sparse(a).ok_or_else(|| wrong_operand("sparse matrix", a))?;
    Ok(T::wrap_sparse(s.transpose().map_nonzeros(|v| v.conjugate())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn sparse(rows: usize, cols: usize, data: &[f64]) -> Value {
        Value::SparseMatrix(SparseMatrix::from_dense(&DMatrix::from_row_slice(rows, cols, data)))
    }

    #[test]
    fn test_sparse_add_stays_sparse() {
        let a = sparse(2, 2, &[1.0, 0.0, 0.0, 2.0]);
        let out = add::<f64>(&a, &a).unwrap();
        assert_eq!(out, sparse(2, 2, &[2.0, 0.0, 0.0, 4.0]));
    }

    #[test]
    fn test_cancellation_drops_entries() {
        let a = sparse(1, 2, &[1.0, 3.0]);
        match sub::<f64>(&a, &a).unwrap() {
            Value::SparseMatrix(s) => assert_eq!(s.nnz(), 0),
            other => panic!("expected sparse, got {:?}", other),
        }
    }

    #[test]
    fn test_full_div_scalar_sparse() {
        let a = Value::matrix_from_rows(1, 2, &[2.0, 4.0]);
        let out = full_div_sparse::<f64>(&a, &sparse(1, 1, &[2.0])).unwrap();
        assert_eq!(out, Value::matrix_from_rows(1, 2, &[1.0, 2.0]));
    }

    #[test]
    fn test_full_div_scalar_sparse_zero() {
        let a = Value::matrix_from_rows(1, 1, &[1.0]);
        let out = full_div_sparse::<f64>(&a, &sparse(1, 1, &[0.0])).unwrap();
        assert_eq!(out, Value::scalar(f64::INFINITY));
    }

    #[test]
    fn test_sparse_div_scalar_keeps_sparse() {
        let a = sparse(2, 2, &[2.0, 0.0, 0.0, 8.0]);
        let out = sparse_div_full::<f64>(&a, &Value::scalar(2.0)).unwrap();
        assert_eq!(out, sparse(2, 2, &[1.0, 0.0, 0.0, 4.0]));
    }

    #[test]
    fn test_transpose() {
        let a = sparse(2, 3, &[0.0, 1.0, 0.0, 0.0, 0.0, 2.0]);
        let out = transpose::<f64>(&a).unwrap();
        assert_eq!(out.dims(), (3, 2));
        assert_eq!(out, sparse(3, 2, &[0.0, 0.0, 1.0, 0.0, 0.0, 2.0]));
    }
}
