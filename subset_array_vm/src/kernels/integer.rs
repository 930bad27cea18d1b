//! int32 kernels.
//!
//! Arithmetic is carried out in double precision and converted back with
//! round-half-away-from-zero and saturation, so `int32(7) / 2` is 4 and
//! overflow clamps to the representable range.

use nalgebra::DMatrix;

use super::element::{exact, wrong_operand};
use super::elementwise::{broadcast, compare_elements};
use crate::error::{DispatchError, DispatchResult};
use crate::ops::{BinaryOp, CatDim};
use crate::value::Value;

/// Round and saturate; NaN maps to zero
pub fn saturate(x: f64) -> i32 {
    // `as` saturates at the bounds and maps NaN to 0
    x.round() as i32
}

/// Either operand as doubles: int32 matrices exactly, real doubles as is
fn as_doubles(v: &Value) -> DispatchResult<DMatrix<f64>> {
    match v {
        Value::Int32Matrix(m) => Ok(m.map(f64::from)),
        Value::Matrix(m) => Ok(m.clone()),
        other => Err(wrong_operand("int32 matrix", other)),
    }
}

fn int_arith(op: &str, a: &Value, b: &Value, f: fn(f64, f64) -> f64) -> DispatchResult<Value> {
    let (x, y) = (as_doubles(a)?, as_doubles(b)?);
    Ok(Value::Int32Matrix(broadcast(op, &x, &y, |p, q| saturate(f(p, q)))?))
}

pub fn add(a: &Value, b: &Value) -> DispatchResult<Value> {
    int_arith("+", a, b, |p, q| p + q)
}

pub fn sub(a: &Value, b: &Value) -> DispatchResult<Value> {
    int_arith("-", a, b, |p, q| p - q)
}

pub fn el_mul(a: &Value, b: &Value) -> DispatchResult<Value> {
    int_arith(".*", a, b, |p, q| p * q)
}

pub fn el_div(a: &Value, b: &Value) -> DispatchResult<Value> {
    int_arith("./", a, b, |p, q| p / q)
}

pub fn el_pow(a: &Value, b: &Value) -> DispatchResult<Value> {
    int_arith(".^", a, b, f64::powf)
}

/// `*` with a scalar side is elementwise; int32 matrix products are not
/// defined
pub fn mul(a: &Value, b: &Value) -> DispatchResult<Value> {
    if a.is_scalar() || b.is_scalar() {
        return el_mul(a, b);
    }
    Err(DispatchError::domain_error(
        "binary operator '*' not implemented for 'int32 matrix' by 'int32 matrix' operations",
    ))
}

/// `/` by a scalar
pub fn div(a: &Value, b: &Value) -> DispatchResult<Value> {
    if b.is_scalar() {
        return el_div(a, b);
    }
    Err(DispatchError::domain_error(
        "binary operator '/' not implemented for 'int32 matrix' by 'int32 matrix' operations",
    ))
}

macro_rules! int_compare {
    ($name:ident, $op:expr) => {
        pub fn $name(a: &Value, b: &Value) -> DispatchResult<Value> {
            let (x, y) = (as_doubles(a)?, as_doubles(b)?);
            let out = broadcast($op.as_str(), &x, &y, |p: f64, q: f64| compare_elements($op, p, q))?;
            Ok(Value::BoolMatrix(out))
        }
    };
}

int_compare!(lt, BinaryOp::Lt);
int_compare!(le, BinaryOp::Le);
int_compare!(eq, BinaryOp::Eq);
int_compare!(ge, BinaryOp::Ge);
int_compare!(gt, BinaryOp::Gt);
int_compare!(ne, BinaryOp::Ne);

pub fn uminus(a: &Value) -> DispatchResult<Value> {
    Ok(Value::Int32Matrix(exact::<i32>(a)?.map(i32::saturating_neg)))
}

pub fn not(a: &Value) -> DispatchResult<Value> {
    Ok(Value::BoolMatrix(exact::<i32>(a)?.map(|x| x == 0)))
}

/// `[a, b]` with at least one int32 side; the result is int32
pub fn cat(a: &Value, b: &Value, dim: CatDim) -> DispatchResult<Value> {
    let joined = super::concat::cat_matrices(&as_doubles(a)?, &as_doubles(b)?, dim)?;
    Ok(Value::Int32Matrix(joined.map(saturate)))
}

/// `A(I) = X` with `X` int32 or double
pub fn assign(lhs: &mut Value, index: &[usize], rhs: &Value) -> DispatchResult<()> {
    let values = as_doubles(rhs)?.map(saturate);
    let converted = Value::Int32Matrix(values);
    super::assign::assign_same::<i32>(lhs, index, &converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(data: &[i32]) -> Value {
        Value::Int32Matrix(DMatrix::from_row_slice(1, data.len(), data))
    }

    #[test]
    fn test_saturate() {
        assert_eq!(saturate(2.5), 3);
        assert_eq!(saturate(-2.5), -3);
        assert_eq!(saturate(1e12), i32::MAX);
        assert_eq!(saturate(f64::NAN), 0);
    }

    #[test]
    fn test_int_division_rounds() {
        let out = el_div(&ints(&[7]), &ints(&[2])).unwrap();
        assert_eq!(out, ints(&[4]));
    }

    #[test]
    fn test_int_plus_double_is_int() {
        let out = add(&ints(&[1, 2]), &Value::scalar(0.4)).unwrap();
        assert_eq!(out, ints(&[1, 2]));
    }

    #[test]
    fn test_overflow_saturates() {
        let out = add(&ints(&[i32::MAX]), &ints(&[1])).unwrap();
        assert_eq!(out, ints(&[i32::MAX]));
        assert_eq!(uminus(&ints(&[i32::MIN])).unwrap(), ints(&[i32::MAX]));
    }

    #[test]
    fn test_divide_by_zero_saturates() {
        assert_eq!(el_div(&ints(&[5]), &ints(&[0])).unwrap(), ints(&[i32::MAX]));
    }

    #[test]
    fn test_assign_from_double() {
        let mut a = ints(&[1, 2]);
        assign(&mut a, &[1], &Value::scalar(9.6)).unwrap();
        assert_eq!(a, ints(&[1, 10]));
    }

    #[test]
    fn test_cat_with_double() {
        let out = cat(&ints(&[1]), &Value::scalar(2.6), CatDim::Horizontal).unwrap();
        assert_eq!(out, ints(&[1, 3]));
    }
}
