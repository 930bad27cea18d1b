//! Matrix-algebra kernels: products, left and right division, matrix power
//! and the fused transpose-multiply forms.

use nalgebra::{ComplexField, DMatrix};
use tracing::warn;

use super::element::{operand, ArrayElement, NumericElement};
use super::elementwise::broadcast;
use crate::error::{DispatchError, DispatchResult};
use crate::value::Value;

const SINGULAR_TOLERANCE: f64 = 1.0e-12;

fn is_scalar<T>(m: &DMatrix<T>) -> bool {
    m.nrows() == 1 && m.ncols() == 1
}

/// `a * b`, where a 1x1 operand scales the other
pub(crate) fn matmul<T: NumericElement>(op: &str, a: &DMatrix<T>, b: &DMatrix<T>) -> DispatchResult<DMatrix<T>> {
    if is_scalar(a) || is_scalar(b) {
        return broadcast(op, a, b, |x: T, y: T| x * y);
    }
    if a.ncols() != b.nrows() {
        return Err(DispatchError::nonconformant(op, a.shape(), b.shape()));
    }
    Ok(a * b)
}

/// Solve `a * x = b`. Square systems use LU; singular or rectangular ones
/// fall back to a least-squares solution.
pub(crate) fn solve<T: NumericElement>(a: &DMatrix<T>, b: &DMatrix<T>) -> DispatchResult<DMatrix<T>> {
    if a.is_square() {
        if let Some(x) = a.clone().lu().solve(b) {
            if x.iter().all(|v| v.is_finite()) {
                return Ok(x);
            }
        }
        warn!(order = a.nrows(), "matrix singular to machine precision");
    }
    let eps: T::RealField = nalgebra::convert(SINGULAR_TOLERANCE);
    a.clone()
        .svd(true, true)
        .solve(b, eps)
        .map_err(DispatchError::domain_error)
}

/// `a \ b`
pub(crate) fn left_divide<T: NumericElement>(a: &DMatrix<T>, b: &DMatrix<T>) -> DispatchResult<DMatrix<T>> {
    if is_scalar(a) {
        return broadcast("\\", a, b, |x: T, y: T| y / x);
    }
    if a.nrows() != b.nrows() {
        return Err(DispatchError::nonconformant("\\", a.shape(), b.shape()));
    }
    solve(a, b)
}

/// `a / b`, computed as `(b.' \ a.').'`
pub(crate) fn right_divide<T: NumericElement>(a: &DMatrix<T>, b: &DMatrix<T>) -> DispatchResult<DMatrix<T>> {
    if is_scalar(b) {
        return broadcast("/", a, b, |x: T, y: T| x / y);
    }
    if a.ncols() != b.ncols() {
        return Err(DispatchError::nonconformant("/", a.shape(), b.shape()));
    }
    Ok(solve(&b.transpose(), &a.transpose())?.transpose())
}

pub fn mul<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    Ok(T::wrap(matmul("*", &x, &y)?))
}

pub fn div<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    Ok(T::wrap(right_divide(&x, &y)?))
}

pub fn ldiv<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    Ok(T::wrap(left_divide(&x, &y)?))
}

/// `a.' * b`
pub fn trans_mul<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    Ok(T::wrap(matmul("*", &x.transpose(), &y)?))
}

/// `a * b.'`
pub fn mul_trans<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    Ok(T::wrap(matmul("*", &x, &y.transpose())?))
}

/// `a' * b`
pub fn herm_mul<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    Ok(T::wrap(matmul("*", &x.adjoint(), &y)?))
}

/// `a * b'`
pub fn mul_herm<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    Ok(T::wrap(matmul("*", &x, &y.adjoint())?))
}

// ========== Power ==========

const BOTH_MATRICES: &str = "can't do A ^ B for A and B both matrices";
const SQUARE_ONLY: &str = "for x^y, only square matrix arguments are permitted and one argument must be scalar.  Use .^ for elementwise power.";

/// Integer power of a square matrix by repeated squaring
fn integer_power<T: NumericElement>(m: &DMatrix<T>, n: i64) -> DispatchResult<DMatrix<T>> {
    let mut base = if n < 0 {
        m.clone()
            .try_inverse()
            .ok_or_else(|| DispatchError::domain_error("xpow: matrix is singular"))?
    } else {
        m.clone()
    };
    let mut k = n.unsigned_abs();
    let mut acc = DMatrix::<T>::identity(m.nrows(), m.ncols());
    while k > 0 {
        if k & 1 == 1 {
            acc = &acc * &base;
        }
        k >>= 1;
        if k > 0 {
            base = &base * &base;
        }
    }
    Ok(acc)
}

/// `a ^ b`.
///
/// Scalar ^ scalar is the elementwise power. A square matrix may be raised
/// to an integer scalar, and a scalar may be raised to a square matrix
/// (through the matrix exponential). Two non-scalar operands are an error.
pub fn pow<T: NumericElement>(a: &Value, b: &Value) -> DispatchResult<Value> {
    let (x, y) = (operand::<T>(a)?, operand::<T>(b)?);
    match (is_scalar(&x), is_scalar(&y)) {
        (true, true) => super::elementwise::el_pow::<T>(a, b),
        (false, false) => Err(DispatchError::domain_error(BOTH_MATRICES)),
        (false, true) => {
            if !x.is_square() {
                return Err(DispatchError::domain_error(SQUARE_ONLY));
            }
            match y[(0, 0)].integer_value() {
                Some(n) => Ok(T::wrap(integer_power(&x, n)?)),
                None => Err(DispatchError::domain_error(
                    "xpow: non-integer power of a matrix is not supported",
                )),
            }
        }
        (true, false) => {
            if !y.is_square() {
                return Err(DispatchError::domain_error(SQUARE_ONLY));
            }
            // s ^ A = expm(log(s) * A)
            let s = x[(0, 0)];
            let zero: T::RealField = nalgebra::convert(0.0);
            let real_positive = s.imaginary() == zero && s.real() > zero;
            if real_positive {
                let log_s = s.ln();
                Ok(T::wrap(y.map(|v| v * log_s).exp()))
            } else {
                let log_s = s.to_complex().ln();
                let exponent = y.map(|v| v.to_complex() * log_s);
                Ok(T::Complex::wrap(exponent.exp()))
            }
        }
    }
}
