//! Concatenation kernels. A 0x0 operand contributes nothing.

use nalgebra::{DMatrix, Scalar};

use super::element::{exact, operand, wrong_operand, ArrayElement, NumericElement, SparseElement};
use crate::error::{DispatchError, DispatchResult};
use crate::ops::CatDim;
use crate::value::{CellArray, CharMatrix, Quote, SparseMatrix, Value};

fn mismatch(dim: CatDim, a: (usize, usize), b: (usize, usize)) -> DispatchError {
    let which = match dim {
        CatDim::Horizontal => "horizontal",
        CatDim::Vertical => "vertical",
    };
    DispatchError::domain_error(format!(
        "{} dimensions mismatch ({}x{} vs {}x{})",
        which, a.0, a.1, b.0, b.1
    ))
}

/// Shape of `[a, b]` or `[a; b]`, `None` when one side is 0x0 and the
/// other side should be returned unchanged
fn cat_shape(
    dim: CatDim,
    a: (usize, usize),
    b: (usize, usize),
) -> DispatchResult<Option<(usize, usize)>> {
    if a == (0, 0) || b == (0, 0) {
        return Ok(None);
    }
    match dim {
        CatDim::Horizontal if a.0 == b.0 => Ok(Some((a.0, a.1 + b.1))),
        CatDim::Vertical if a.1 == b.1 => Ok(Some((a.0 + b.0, a.1))),
        _ => Err(mismatch(dim, a, b)),
    }
}

/// Join two dense matrices
pub fn cat_matrices<T: Scalar + Copy>(a: &DMatrix<T>, b: &DMatrix<T>, dim: CatDim) -> DispatchResult<DMatrix<T>> {
    let Some((rows, cols)) = cat_shape(dim, a.shape(), b.shape())? else {
        return Ok(if a.shape() == (0, 0) { b.clone() } else { a.clone() });
    };
    let (ar, ac) = a.shape();
    Ok(DMatrix::from_fn(rows, cols, |i, j| match dim {
        CatDim::Horizontal if j < ac => a[(i, j)],
        CatDim::Horizontal => b[(i, j - ac)],
        CatDim::Vertical if i < ar => a[(i, j)],
        CatDim::Vertical => b[(i - ar, j)],
    }))
}

/// Concatenation of floating-point values; mixed inputs are converted to `T`
pub fn cat<T: NumericElement>(a: &Value, b: &Value, dim: CatDim) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    Ok(T::wrap(cat_matrices(&x, &y, dim)?))
}

/// Concatenation of two arrays of the same element type
pub fn cat_same<T: ArrayElement>(a: &Value, b: &Value, dim: CatDim) -> DispatchResult<Value> {
    Ok(T::wrap(cat_matrices(exact::<T>(a)?, exact::<T>(b)?, dim)?))
}

/// Sparse result; either side may be dense or sparse
pub fn cat_sparse<T: SparseElement>(a: &Value, b: &Value, dim: CatDim) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    Ok(T::wrap_sparse(SparseMatrix::from_dense(&cat_matrices(&x, &y, dim)?)))
}

/// Character concatenation. The result is single-quoted only when both
/// sides are.
pub fn cat_char(a: &Value, b: &Value, dim: CatDim) -> DispatchResult<Value> {
    let (Value::CharMatrix(x), Value::CharMatrix(y)) = (a, b) else {
        return Err(wrong_operand("string", if a.is_string() { b } else { a }));
    };
    let quote = match (x.quote, y.quote) {
        (Quote::Single, Quote::Single) => Quote::Single,
        _ => Quote::Double,
    };
    Ok(Value::CharMatrix(CharMatrix::new(
        cat_matrices(&x.data, &y.data, dim)?,
        quote,
    )))
}

pub fn cat_cell(a: &Value, b: &Value, dim: CatDim) -> DispatchResult<Value> {
    let (Value::Cell(x), Value::Cell(y)) = (a, b) else {
        return Err(wrong_operand("cell", if matches!(a, Value::Cell(_)) { b } else { a }));
    };
    let Some((rows, cols)) = cat_shape(dim, x.shape(), y.shape())? else {
        return Ok(Value::Cell(if x.shape() == (0, 0) { y.clone() } else { x.clone() }));
    };
    let mut cells = Vec::with_capacity(rows * cols);
    for j in 0..cols {
        for i in 0..rows {
            let cell = match dim {
                CatDim::Horizontal if j < x.cols => x.get(i, j),
                CatDim::Horizontal => y.get(i, j - x.cols),
                CatDim::Vertical if i < x.rows => x.get(i, j),
                CatDim::Vertical => y.get(i - x.rows, j),
            };
            cells.push(cell.cloned().ok_or_else(|| mismatch(dim, x.shape(), y.shape()))?);
        }
    }
    CellArray::from_cells(rows, cols, cells)
        .map(Value::Cell)
        .ok_or_else(|| mismatch(dim, x.shape(), y.shape()))
}

/// `[x, []]`: the literal empty contributes nothing
pub fn keep_left(a: &Value, _b: &Value, _dim: CatDim) -> DispatchResult<Value> {
    Ok(a.storable_value())
}

/// `[[], x]`
pub fn keep_right(_a: &Value, b: &Value, _dim: CatDim) -> DispatchResult<Value> {
    Ok(b.storable_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_horizontal() {
        let a = Value::matrix_from_rows(2, 1, &[1.0, 2.0]);
        let b = Value::matrix_from_rows(2, 2, &[3.0, 4.0, 5.0, 6.0]);
        let out = cat::<f64>(&a, &b, CatDim::Horizontal).unwrap();
        assert_eq!(out, Value::matrix_from_rows(2, 3, &[1.0, 3.0, 4.0, 2.0, 5.0, 6.0]));
    }

    #[test]
    fn test_vertical_mismatch_message() {
        let a = Value::matrix_from_rows(1, 2, &[1.0, 2.0]);
        let b = Value::matrix_from_rows(1, 3, &[1.0, 2.0, 3.0]);
        let err = cat::<f64>(&a, &b, CatDim::Vertical).unwrap_err();
        assert_eq!(err.to_string(), "vertical dimensions mismatch (1x2 vs 1x3)");
    }

    #[test]
    fn test_empty_operand_skipped() {
        let a = Value::matrix_from_rows(1, 2, &[1.0, 2.0]);
        let empty = Value::Matrix(DMatrix::zeros(0, 0));
        assert_eq!(cat::<f64>(&empty, &a, CatDim::Vertical).unwrap(), a);
    }

    #[test]
    fn test_char_quote() {
        let out = cat_char(&Value::sq_string("ab"), &Value::string("c"), CatDim::Horizontal).unwrap();
        assert_eq!(out, Value::string("abc"));
        let out = cat_char(&Value::sq_string("ab"), &Value::sq_string("c"), CatDim::Horizontal).unwrap();
        assert_eq!(out, Value::sq_string("abc"));
    }

    #[test]
    fn test_cell_horizontal() {
        let a = Value::Cell(CellArray::row(vec![Value::scalar(1.0)]));
        let b = Value::Cell(CellArray::row(vec![Value::string("x"), Value::scalar(2.0)]));
        match cat_cell(&a, &b, CatDim::Horizontal).unwrap() {
            Value::Cell(c) => {
                assert_eq!(c.shape(), (1, 3));
                assert_eq!(c.get(0, 1), Some(&Value::string("x")));
            }
            other => panic!("expected cell, got {:?}", other),
        }
    }

    #[test]
    fn test_keep_left_drops_sentinel() {
        let out = keep_right(Value::null_matrix(), Value::null_str(), CatDim::Horizontal).unwrap();
        assert!(!out.is_null());
        assert_eq!(out, Value::string(""));
    }
}
