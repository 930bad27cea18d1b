//! Indexed-assignment kernels.
//!
//! Indices are 0-based linear (column-major) positions. Plain assignment
//! may grow an empty array or a vector; compound assignment never resizes.
//! Assigning one of the literal-empty sentinels deletes the indexed
//! elements.

use std::borrow::Cow;

use nalgebra::DMatrix;

use super::element::{exact, operand, wrong_operand, ArrayElement, NumericElement, SparseElement};
use crate::error::{DispatchError, DispatchResult};
use crate::value::{CellArray, SparseMatrix, Value};

/// Shape after growing `shape` so that linear index `max` exists
fn grown_shape(shape: (usize, usize), max: usize) -> DispatchResult<(usize, usize)> {
    let needed = max + 1;
    match shape {
        (r, c) if r * c >= needed => Ok((r, c)),
        (0, _) | (_, 0) | (1, _) => Ok((1, needed)),
        (_, 1) => Ok((needed, 1)),
        _ => Err(DispatchError::domain_error(
            "A(I) = X: unable to resize A",
        )),
    }
}

fn check_count(index: &[usize], rhs: (usize, usize)) -> DispatchResult<()> {
    let count = rhs.0 * rhs.1;
    if count == 1 || count == index.len() {
        Ok(())
    } else {
        Err(DispatchError::nonconformant("=", (1, index.len()), rhs))
    }
}

/// Write `values` at `index`, combining with the current element
fn place<T, F>(
    target: &mut DMatrix<T>,
    index: &[usize],
    values: &DMatrix<T>,
    resize: bool,
    combine: F,
) -> DispatchResult<()>
where
    T: ArrayElement,
    F: Fn(T, T) -> T,
{
    check_count(index, values.shape())?;
    if let Some(&max) = index.iter().max() {
        let numel = target.len();
        if max >= numel {
            if !resize {
                return Err(DispatchError::index_out_of_bound(max + 1, numel));
            }
            let (rows, cols) = grown_shape(target.shape(), max)?;
            target.resize_mut(rows, cols, T::fill());
        }
    }
    let broadcast = values.len() == 1;
    for (k, &i) in index.iter().enumerate() {
        let v = values[if broadcast { 0 } else { k }];
        target[i] = combine(target[i], v);
    }
    Ok(())
}

fn target<T: ArrayElement>(lhs: &mut Value) -> DispatchResult<&mut DMatrix<T>> {
    if T::view(lhs).is_none() {
        return Err(wrong_operand(T::TYPE_NAME, lhs));
    }
    T::view_mut(lhs).ok_or_else(|| DispatchError::domain_error("assignment target changed type"))
}

/// `A(I) = X` where both sides have the same element type
pub fn assign_same<T: ArrayElement>(lhs: &mut Value, index: &[usize], rhs: &Value) -> DispatchResult<()> {
    let values = exact::<T>(rhs)?;
    place(target::<T>(lhs)?, index, values, true, |_, v| v)
}

/// `A(I) = X` where `X` is converted to the element type of `A`
pub fn assign<T: NumericElement>(lhs: &mut Value, index: &[usize], rhs: &Value) -> DispatchResult<()> {
    let values: Cow<'_, DMatrix<T>> = operand::<T>(rhs)?;
    place(target::<T>(lhs)?, index, &values, true, |_, v| v)
}

macro_rules! compound_assign {
    ($(#[$doc:meta])* $name:ident, |$x:ident, $y:ident| $body:expr) => {
        $(#[$doc])*
        pub fn $name<T: NumericElement>(lhs: &mut Value, index: &[usize], rhs: &Value) -> DispatchResult<()> {
            let values = operand::<T>(rhs)?;
            place(target::<T>(lhs)?, index, &values, false, |$x: T, $y: T| $body)
        }
    };
}

compound_assign!(
    /// `A(I) += X`
    add_eq, |x, y| x + y
);
compound_assign!(
    /// `A(I) -= X`
    sub_eq, |x, y| x - y
);
compound_assign!(
    /// `A(I) .*= X`
    el_mul_eq, |x, y| x * y
);
compound_assign!(
    /// `A(I) ./= X`
    el_div_eq, |x, y| x / y
);

/// `S(I) = X` for sparse `S`. The assignment runs on a dense copy which is
/// compressed again afterwards.
pub fn assign_sparse<T: SparseElement>(lhs: &mut Value, index: &[usize], rhs: &Value) -> DispatchResult<()> {
    let s = T::view_sparse(lhs).ok_or_else(|| wrong_operand("sparse matrix", lhs))?;
    let mut dense = s.to_dense();
    let values = operand::<T>(rhs)?;
    place(&mut dense, index, &values, true, |_, v| v)?;
    *lhs = T::wrap_sparse(SparseMatrix::from_dense(&dense));
    Ok(())
}

/// Positions kept after deleting `index`, checked against `numel`
fn kept_positions(index: &[usize], numel: usize) -> DispatchResult<Vec<usize>> {
    let mut deleted = vec![false; numel];
    for &i in index {
        if i >= numel {
            return Err(DispatchError::index_out_of_bound(i + 1, numel));
        }
        deleted[i] = true;
    }
    Ok((0..numel).filter(|&i| !deleted[i]).collect())
}

/// Shape left after deleting elements by linear index: columns stay
/// columns, everything else becomes a row
fn deleted_shape(shape: (usize, usize), kept: usize, deleted_any: bool) -> (usize, usize) {
    if !deleted_any {
        shape
    } else if shape.1 == 1 && shape.0 != 1 {
        (kept, 1)
    } else {
        (1, kept)
    }
}

/// `A(I) = []`
pub fn delete_elements<T: ArrayElement>(lhs: &mut Value, index: &[usize], rhs: &Value) -> DispatchResult<()> {
    if !rhs.is_null() {
        return Err(DispatchError::domain_error(
            "=: nonconformant arguments; deletion requires a literal empty",
        ));
    }
    let m = target::<T>(lhs)?;
    let kept = kept_positions(index, m.len())?;
    let (rows, cols) = deleted_shape(m.shape(), kept.len(), !index.is_empty());
    let data: Vec<T> = kept.iter().map(|&i| m[i]).collect();
    *m = DMatrix::from_column_slice(rows, cols, &data);
    Ok(())
}

/// `C(I) = D` for cell arrays, and `C(I) = []` deletion
pub fn assign_cell(lhs: &mut Value, index: &[usize], rhs: &Value) -> DispatchResult<()> {
    let cells = match lhs {
        Value::Cell(cells) => cells,
        other => return Err(wrong_operand("cell", other)),
    };
    if rhs.is_null() {
        let kept = kept_positions(index, cells.len())?;
        let (rows, cols) = deleted_shape(cells.shape(), kept.len(), !index.is_empty());
        let data = kept.iter().map(|&i| cells.cells[i].clone()).collect();
        *cells = CellArray::from_cells(rows, cols, data)
            .ok_or_else(|| DispatchError::domain_error("cell deletion produced an invalid shape"))?;
        return Ok(());
    }
    let Value::Cell(values) = rhs else {
        return Err(DispatchError::domain_error(
            "conversion to cell array from other types is not possible; use '{' instead of '('",
        ));
    };
    check_count(index, values.shape())?;
    if let Some(&max) = index.iter().max() {
        if max >= cells.len() {
            let (rows, cols) = grown_shape(cells.shape(), max)?;
            let mut grown = CellArray::new(rows, cols);
            // column-major positions survive a vector or empty growth
            for (i, cell) in cells.cells.drain(..).enumerate() {
                grown.cells[i] = cell;
            }
            *cells = grown;
        }
    }
    let broadcast = values.len() == 1;
    for (k, &i) in index.iter().enumerate() {
        cells.cells[i] = values.cells[if broadcast { 0 } else { k }].clone();
    }
    Ok(())
}
