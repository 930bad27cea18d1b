//! Logical, character and cell kernels.

use super::element::{exact, wrong_operand};
use super::elementwise::broadcast;
use crate::error::DispatchResult;
use crate::value::{CellArray, CharMatrix, Value};

// ========== bool ==========

pub fn and(a: &Value, b: &Value) -> DispatchResult<Value> {
    let out = broadcast("&", exact::<bool>(a)?, exact::<bool>(b)?, |x, y| x && y)?;
    Ok(Value::BoolMatrix(out))
}

pub fn or(a: &Value, b: &Value) -> DispatchResult<Value> {
    let out = broadcast("|", exact::<bool>(a)?, exact::<bool>(b)?, |x, y| x || y)?;
    Ok(Value::BoolMatrix(out))
}

pub fn bool_eq(a: &Value, b: &Value) -> DispatchResult<Value> {
    let out = broadcast("==", exact::<bool>(a)?, exact::<bool>(b)?, |x, y| x == y)?;
    Ok(Value::BoolMatrix(out))
}

pub fn bool_ne(a: &Value, b: &Value) -> DispatchResult<Value> {
    let out = broadcast("!=", exact::<bool>(a)?, exact::<bool>(b)?, |x, y| x != y)?;
    Ok(Value::BoolMatrix(out))
}

pub fn not(a: &Value) -> DispatchResult<Value> {
    Ok(Value::BoolMatrix(exact::<bool>(a)?.map(|x| !x)))
}

// ========== char ==========

fn chars(v: &Value) -> DispatchResult<&CharMatrix> {
    match v {
        Value::CharMatrix(c) => Ok(c),
        other => Err(wrong_operand("string", other)),
    }
}

/// Character-by-character equality, both quoting styles alike
pub fn char_eq(a: &Value, b: &Value) -> DispatchResult<Value> {
    let out = broadcast("==", &chars(a)?.data, &chars(b)?.data, |x, y| x == y)?;
    Ok(Value::BoolMatrix(out))
}

pub fn char_ne(a: &Value, b: &Value) -> DispatchResult<Value> {
    let out = broadcast("!=", &chars(a)?.data, &chars(b)?.data, |x, y| x != y)?;
    Ok(Value::BoolMatrix(out))
}

/// Transpose keeping the quoting style
pub fn char_transpose(a: &Value) -> DispatchResult<Value> {
    let c = chars(a)?;
    Ok(Value::CharMatrix(CharMatrix::new(c.data.transpose(), c.quote)))
}

// ========== cell ==========

pub fn cell_transpose(a: &Value) -> DispatchResult<Value> {
    let Value::Cell(c) = a else {
        return Err(wrong_operand("cell", a));
    };
    let mut cells = Vec::with_capacity(c.len());
    // column-major walk of the transposed shape
    for i in 0..c.rows {
        for j in 0..c.cols {
            if let Some(v) = c.get(i, j) {
                cells.push(v.clone());
            }
        }
    }
    CellArray::from_cells(c.cols, c.rows, cells)
        .map(Value::Cell)
        .ok_or_else(|| wrong_operand("cell", a))
}
