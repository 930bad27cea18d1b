//! Elementwise kernels for the dense floating-point representations.
//!
//! Operands broadcast: along each dimension the extents must agree or one
//! of them must be 1. Anything else is a nonconformant-arguments error.

use nalgebra::{ComplexField, DMatrix, Scalar};

use super::element::{exact, operand, ArrayElement, NumericElement};
use crate::error::{DispatchError, DispatchResult};
use crate::ops::BinaryOp;
use crate::value::Value;

fn broadcast_extent(a: usize, b: usize) -> Option<usize> {
    if a == b {
        Some(a)
    } else if a == 1 {
        Some(b)
    } else if b == 1 {
        Some(a)
    } else {
        None
    }
}

/// Combine `a` and `b` element by element with broadcasting
pub fn broadcast<A, B, C, F>(op: &str, a: &DMatrix<A>, b: &DMatrix<B>, f: F) -> DispatchResult<DMatrix<C>>
where
    A: Scalar + Copy,
    B: Scalar + Copy,
    C: Scalar,
    F: Fn(A, B) -> C,
{
    let (ar, ac) = a.shape();
    let (br, bc) = b.shape();
    let (rows, cols) = broadcast_extent(ar, br)
        .zip(broadcast_extent(ac, bc))
        .ok_or_else(|| DispatchError::nonconformant(op, a.shape(), b.shape()))?;
    Ok(DMatrix::from_fn(rows, cols, |i, j| {
        let x = a[(if ar == 1 { 0 } else { i }, if ac == 1 { 0 } else { j })];
        let y = b[(if br == 1 { 0 } else { i }, if bc == 1 { 0 } else { j })];
        f(x, y)
    }))
}

macro_rules! arith_kernel {
    ($(#[$doc:meta])* $name:ident, $sym:expr, |$x:ident, $y:ident| $body:expr) => {
        $(#[$doc])*
        pub fn $name<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
            let lhs = operand::<T>(a)?;
            let rhs = operand::<T>(b)?;
            Ok(T::wrap(broadcast($sym, &lhs, &rhs, |$x: T, $y: T| $body)?))
        }
    };
}

arith_kernel!(add, "+", |x, y| x + y);
arith_kernel!(sub, "-", |x, y| x - y);
arith_kernel!(
    /// `.*`
    el_mul, ".*", |x, y| x * y
);
arith_kernel!(
    /// `./`
    el_div, "./", |x, y| x / y
);
arith_kernel!(
    /// `.\`
    el_ldiv, ".\\", |x, y| y / x
);

/// `.^`. A real negative base raised to a non-integer exponent produces a
/// complex result for the whole array.
pub fn el_pow<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let base = operand::<T>(a)?;
    let exp = operand::<T>(b)?;
    let leaves_real_line = broadcast(".^", &base, &exp, |x: T, y: T| T::needs_complex_pow(x, y))?
        .iter()
        .any(|&c| c);
    if leaves_real_line {
        let base = base.map(T::to_complex);
        let exp = exp.map(T::to_complex);
        let out = broadcast(".^", &base, &exp, |x: T::Complex, y: T::Complex| x.powc(y))?;
        return Ok(T::Complex::wrap(out));
    }
    Ok(T::wrap(broadcast(".^", &base, &exp, |x: T, y: T| x.powc(y))?))
}

pub(crate) fn compare_elements<T: NumericElement>(op: BinaryOp, x: T, y: T) -> bool {
    use std::cmp::Ordering::{Equal, Greater, Less};
    match op {
        BinaryOp::Eq => x == y,
        BinaryOp::Ne => x != y,
        BinaryOp::Lt => T::order(x, y) == Some(Less),
        BinaryOp::Le => matches!(T::order(x, y), Some(Less | Equal)),
        BinaryOp::Gt => T::order(x, y) == Some(Greater),
        BinaryOp::Ge => matches!(T::order(x, y), Some(Greater | Equal)),
        _ => false,
    }
}

macro_rules! compare_kernel {
    ($name:ident, $op:expr) => {
        pub fn $name<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
            let lhs = operand::<T>(a)?;
            let rhs = operand::<T>(b)?;
            let out = broadcast($op.as_str(), &lhs, &rhs, |x: T, y: T| {
                compare_elements($op, x, y)
            })?;
            Ok(Value::BoolMatrix(out))
        }
    };
}

compare_kernel!(lt, BinaryOp::Lt);
compare_kernel!(le, BinaryOp::Le);
compare_kernel!(eq, BinaryOp::Eq);
compare_kernel!(ge, BinaryOp::Ge);
compare_kernel!(gt, BinaryOp::Gt);
compare_kernel!(ne, BinaryOp::Ne);

/// Elementwise `&`
pub fn el_and<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let lhs = operand::<T>(a)?;
    let rhs = operand::<T>(b)?;
    let out = broadcast("&", &lhs, &rhs, |x: T, y: T| x.is_nonzero() && y.is_nonzero())?;
    Ok(Value::BoolMatrix(out))
}

/// Elementwise `|`
pub fn el_or<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let lhs = operand::<T>(a)?;
    let rhs = operand::<T>(b)?;
    let out = broadcast("|", &lhs, &rhs, |x: T, y: T| x.is_nonzero() || y.is_nonzero())?;
    Ok(Value::BoolMatrix(out))
}

// ========== Unary ==========

pub fn not<T: NumericElement>(a: &Value) -> DispatchResult<Value> {
    let m = operand::<T>(a)?;
    Ok(Value::BoolMatrix(m.map(|x| !x.is_nonzero())))
}

pub fn uplus<T: ArrayElement>(a: &Value) -> DispatchResult<Value> {
    Ok(T::wrap(exact::<T>(a)?.clone()))
}

pub fn uminus<T: NumericElement>(a: &Value) -> DispatchResult<Value> {
    let m = operand::<T>(a)?;
    Ok(T::wrap(m.map(|x| -x)))
}

/// `.'` for any dense representation
pub fn transpose<T: ArrayElement>(a: &Value) -> DispatchResult<Value> {
    Ok(T::wrap(exact::<T>(a)?.transpose()))
}

/// `'`; conjugates complex elements
pub fn hermitian<T: NumericElement>(a: &Value) -> DispatchResult<Value> {
    let m = operand::<T>(a)?;
    Ok(T::wrap(m.adjoint()))
}
