//! Conversion kernels (used for widen edges and explicit conversions) and
//! narrowing functions.

use nalgebra::DMatrix;

use super::element::wrong_operand;
use super::integer::saturate;
use crate::error::DispatchResult;
use crate::value::{CharMatrix, Complex32, Complex64, NullKind, Quote, SparseMatrix, Value};

fn real_dense(v: &Value) -> DispatchResult<DMatrix<f64>> {
    v.to_real_dense().ok_or_else(|| wrong_operand("real numeric", v))
}

fn complex_dense(v: &Value) -> DispatchResult<DMatrix<Complex64>> {
    v.to_complex_dense().ok_or_else(|| wrong_operand("numeric", v))
}

// ========== Widening ==========

/// Any real representation to a full double matrix. Sentinels become an
/// ordinary 0x0 matrix.
pub fn to_matrix(v: &Value) -> DispatchResult<Value> {
    Ok(Value::Matrix(real_dense(v)?))
}

pub fn to_complex_matrix(v: &Value) -> DispatchResult<Value> {
    Ok(Value::ComplexMatrix(complex_dense(v)?))
}

pub fn to_float_complex_matrix(v: &Value) -> DispatchResult<Value> {
    match v {
        Value::FloatMatrix(m) => Ok(Value::FloatComplexMatrix(m.map(|x| Complex32::new(x, 0.0)))),
        Value::FloatComplexMatrix(m) => Ok(Value::FloatComplexMatrix(m.clone())),
        other => Err(wrong_operand("float matrix", other)),
    }
}

pub fn to_sparse_complex(v: &Value) -> DispatchResult<Value> {
    match v {
        Value::SparseMatrix(s) => Ok(Value::SparseComplexMatrix(
            s.map_nonzeros(|x| Complex64::new(x, 0.0)),
        )),
        other => Ok(Value::SparseComplexMatrix(SparseMatrix::from_dense(
            &complex_dense(other)?,
        ))),
    }
}

/// `""` to an ordinary empty double-quoted string, `''` to single-quoted
pub fn null_to_storable(v: &Value) -> DispatchResult<Value> {
    match v {
        Value::Null(kind) => Ok(kind.storable()),
        other => Err(wrong_operand("null", other)),
    }
}

// ========== Conversions ==========

pub fn to_sparse(v: &Value) -> DispatchResult<Value> {
    Ok(Value::SparseMatrix(SparseMatrix::from_dense(&real_dense(v)?)))
}

pub fn to_float_matrix(v: &Value) -> DispatchResult<Value> {
    Ok(Value::FloatMatrix(real_dense(v)?.map(|x| x as f32)))
}

pub fn to_float_complex_from_complex(v: &Value) -> DispatchResult<Value> {
    Ok(Value::FloatComplexMatrix(
        complex_dense(v)?.map(|z| Complex32::new(z.re as f32, z.im as f32)),
    ))
}

pub fn to_int32(v: &Value) -> DispatchResult<Value> {
    Ok(Value::Int32Matrix(real_dense(v)?.map(saturate)))
}

pub fn to_bool(v: &Value) -> DispatchResult<Value> {
    let m = real_dense(v)?;
    if m.iter().any(|x| x.is_nan()) {
        return Err(crate::error::DispatchError::domain_error(
            "logical: NaN can't be converted to logical value",
        ));
    }
    Ok(Value::BoolMatrix(m.map(|x| x != 0.0)))
}

/// Numeric codes to characters; codes outside the valid range are an error
pub fn to_string(v: &Value) -> DispatchResult<Value> {
    let m = real_dense(v)?;
    let mut out = DMatrix::from_element(m.nrows(), m.ncols(), '\0');
    for (slot, &x) in out.iter_mut().zip(m.iter()) {
        *slot = char::from_u32(saturate(x).max(0) as u32).ok_or_else(|| {
            crate::error::DispatchError::domain_error(format!(
                "char: wrong type argument '{}'",
                x
            ))
        })?;
    }
    Ok(Value::CharMatrix(CharMatrix::new(out, Quote::Double)))
}

/// Change the quoting style of a character array
pub fn to_sq_string(v: &Value) -> DispatchResult<Value> {
    match v {
        Value::CharMatrix(c) => Ok(Value::CharMatrix(CharMatrix::new(c.data.clone(), Quote::Single))),
        Value::Null(NullKind::SqStr) | Value::Null(NullKind::Str) => {
            Ok(Value::CharMatrix(CharMatrix::empty(Quote::Single)))
        }
        other => Err(wrong_operand("string", other)),
    }
}

// ========== Narrowing ==========

/// Complex matrix whose imaginary parts are all zero to a real matrix
pub fn narrow_complex(v: &Value) -> Option<Value> {
    match v {
        Value::ComplexMatrix(m) if m.iter().all(|z| z.im == 0.0) => {
            Some(Value::Matrix(m.map(|z| z.re)))
        }
        _ => None,
    }
}

pub fn narrow_float_complex(v: &Value) -> Option<Value> {
    match v {
        Value::FloatComplexMatrix(m) if m.iter().all(|z| z.im == 0.0) => {
            Some(Value::FloatMatrix(m.map(|z| z.re)))
        }
        _ => None,
    }
}

pub fn narrow_sparse_complex(v: &Value) -> Option<Value> {
    match v {
        Value::SparseComplexMatrix(s) if s.values().iter().all(|z| z.im == 0.0) => {
            Some(Value::SparseMatrix(s.map_nonzeros(|z| z.re)))
        }
        _ => None,
    }
}

/// A 1x1 diagonal matrix is just a scalar
pub fn narrow_diag(v: &Value) -> Option<Value> {
    match v {
        Value::DiagMatrix(d) if d.shape() == (1, 1) => Some(Value::scalar(d.get(0, 0))),
        _ => None,
    }
}
