//! Element traits that let one generic kernel serve several
//! representations.
//!
//! `ArrayElement` covers every dense element type (numeric, logical,
//! integer, character). `NumericElement` adds the arithmetic the
//! floating-point kernels need.

use std::borrow::Cow;
use std::cmp::Ordering;

use nalgebra::{ComplexField, DMatrix, Scalar};

use crate::error::{DispatchError, DispatchResult};
use crate::value::{CharMatrix, Complex32, Complex64, Quote, SparseMatrix, Value};

/// Element of a dense array representation
pub trait ArrayElement: Scalar + Copy {
    /// Representation name, for kernel error messages
    const TYPE_NAME: &'static str;

    fn view(v: &Value) -> Option<&DMatrix<Self>>;
    fn view_mut(v: &mut Value) -> Option<&mut DMatrix<Self>>;
    fn wrap(m: DMatrix<Self>) -> Value;
    /// Value used to pad an array that grows
    fn fill() -> Self;
}

/// Floating-point element, real or complex, single or double
pub trait NumericElement: ArrayElement + ComplexField {
    /// The complex counterpart (`Self` for complex types)
    type Complex: NumericElement;

    fn lift(x: f64) -> Self;
    fn to_complex(self) -> Self::Complex;

    /// Dense copy of any value this type can absorb without losing its
    /// imaginary part
    fn coerce(v: &Value) -> Option<DMatrix<Self>>;

    /// Ordering used by `<`, `<=`, `>`, `>=`. Complex values order by
    /// magnitude, then by argument.
    fn order(a: Self, b: Self) -> Option<Ordering>;

    fn is_nonzero(self) -> bool;

    /// `Some(n)` when the value is an exact integer
    fn integer_value(self) -> Option<i64>;

    /// True when `base .^ exp` leaves the real line
    fn needs_complex_pow(base: Self, exp: Self) -> bool;
}

/// Element of a sparse representation
pub trait SparseElement: NumericElement + num_traits::Zero {
    fn view_sparse(v: &Value) -> Option<&SparseMatrix<Self>>;
    fn wrap_sparse(s: SparseMatrix<Self>) -> Value;
}

pub(crate) fn wrong_operand(expected: &str, got: &Value) -> DispatchError {
    DispatchError::domain_error(format!(
        "kernel expected {} operand, got {}",
        expected,
        got.type_name()
    ))
}

/// Borrow `v` as a `T` matrix, converting when it is another compatible
/// representation
pub fn operand<T: NumericElement>(v: &Value) -> DispatchResult<Cow<'_, DMatrix<T>>> {
    if let Some(m) = T::view(v) {
        return Ok(Cow::Borrowed(m));
    }
    T::coerce(v)
        .map(Cow::Owned)
        .ok_or_else(|| wrong_operand(T::TYPE_NAME, v))
}

/// Borrow `v` as exactly a `T` matrix
pub fn exact<T: ArrayElement>(v: &Value) -> DispatchResult<&DMatrix<T>> {
    T::view(v).ok_or_else(|| wrong_operand(T::TYPE_NAME, v))
}

fn real_order<T: PartialOrd>(a: T, b: T) -> Option<Ordering> {
    a.partial_cmp(&b)
}

fn complex_order(a: Complex64, b: Complex64) -> Option<Ordering> {
    match a.norm().partial_cmp(&b.norm())? {
        Ordering::Equal => a.arg().partial_cmp(&b.arg()),
        other => Some(other),
    }
}

// Largest magnitude an f64 holds every integer up to.
const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

fn real_integer(x: f64) -> Option<i64> {
    if x.is_finite() && x.fract() == 0.0 && x.abs() <= EXACT_INT_LIMIT {
        Some(x as i64)
    } else {
        None
    }
}

impl ArrayElement for f64 {
    const TYPE_NAME: &'static str = "matrix";

    fn view(v: &Value) -> Option<&DMatrix<Self>> {
        match v {
            Value::Matrix(m) => Some(m),
            _ => None,
        }
    }
    fn view_mut(v: &mut Value) -> Option<&mut DMatrix<Self>> {
        match v {
            Value::Matrix(m) => Some(m),
            _ => None,
        }
    }
    fn wrap(m: DMatrix<Self>) -> Value {
        Value::Matrix(m)
    }
    fn fill() -> Self {
        0.0
    }
}

impl NumericElement for f64 {
    type Complex = Complex64;

    fn lift(x: f64) -> Self {
        x
    }
    fn to_complex(self) -> Complex64 {
        Complex64::new(self, 0.0)
    }
    fn coerce(v: &Value) -> Option<DMatrix<Self>> {
        v.to_real_dense()
    }
    fn order(a: Self, b: Self) -> Option<Ordering> {
        real_order(a, b)
    }
    fn is_nonzero(self) -> bool {
        self != 0.0
    }
    fn integer_value(self) -> Option<i64> {
        real_integer(self)
    }
    fn needs_complex_pow(base: Self, exp: Self) -> bool {
        base < 0.0 && exp.fract() != 0.0
    }
}

impl ArrayElement for f32 {
    const TYPE_NAME: &'static str = "float matrix";

    fn view(v: &Value) -> Option<&DMatrix<Self>> {
        match v {
            Value::FloatMatrix(m) => Some(m),
            _ => None,
        }
    }
    fn view_mut(v: &mut Value) -> Option<&mut DMatrix<Self>> {
        match v {
            Value::FloatMatrix(m) => Some(m),
            _ => None,
        }
    }
    fn wrap(m: DMatrix<Self>) -> Value {
        Value::FloatMatrix(m)
    }
    fn fill() -> Self {
        0.0
    }
}

impl NumericElement for f32 {
    type Complex = Complex32;

    fn lift(x: f64) -> Self {
        x as f32
    }
    fn to_complex(self) -> Complex32 {
        Complex32::new(self, 0.0)
    }
    fn coerce(v: &Value) -> Option<DMatrix<Self>> {
        v.to_real_dense().map(|m| m.map(|x| x as f32))
    }
    fn order(a: Self, b: Self) -> Option<Ordering> {
        real_order(a, b)
    }
    fn is_nonzero(self) -> bool {
        self != 0.0
    }
    fn integer_value(self) -> Option<i64> {
        real_integer(f64::from(self))
    }
    fn needs_complex_pow(base: Self, exp: Self) -> bool {
        base < 0.0 && exp.fract() != 0.0
    }
}

impl ArrayElement for Complex64 {
    const TYPE_NAME: &'static str = "complex matrix";

    fn view(v: &Value) -> Option<&DMatrix<Self>> {
        match v {
            Value::ComplexMatrix(m) => Some(m),
            _ => None,
        }
    }
    fn view_mut(v: &mut Value) -> Option<&mut DMatrix<Self>> {
        match v {
            Value::ComplexMatrix(m) => Some(m),
            _ => None,
        }
    }
    fn wrap(m: DMatrix<Self>) -> Value {
        Value::ComplexMatrix(m)
    }
    fn fill() -> Self {
        Complex64::new(0.0, 0.0)
    }
}

impl NumericElement for Complex64 {
    type Complex = Complex64;

    fn lift(x: f64) -> Self {
        Complex64::new(x, 0.0)
    }
    fn to_complex(self) -> Complex64 {
        self
    }
    fn coerce(v: &Value) -> Option<DMatrix<Self>> {
        v.to_complex_dense()
    }
    fn order(a: Self, b: Self) -> Option<Ordering> {
        complex_order(a, b)
    }
    fn is_nonzero(self) -> bool {
        self.re != 0.0 || self.im != 0.0
    }
    fn integer_value(self) -> Option<i64> {
        if self.im == 0.0 {
            real_integer(self.re)
        } else {
            None
        }
    }
    fn needs_complex_pow(_base: Self, _exp: Self) -> bool {
        false
    }
}

impl ArrayElement for Complex32 {
    const TYPE_NAME: &'static str = "float complex matrix";

    fn view(v: &Value) -> Option<&DMatrix<Self>> {
        match v {
            Value::FloatComplexMatrix(m) => Some(m),
            _ => None,
        }
    }
    fn view_mut(v: &mut Value) -> Option<&mut DMatrix<Self>> {
        match v {
            Value::FloatComplexMatrix(m) => Some(m),
            _ => None,
        }
    }
    fn wrap(m: DMatrix<Self>) -> Value {
        Value::FloatComplexMatrix(m)
    }
    fn fill() -> Self {
        Complex32::new(0.0, 0.0)
    }
}

impl NumericElement for Complex32 {
    type Complex = Complex32;

    fn lift(x: f64) -> Self {
        Complex32::new(x as f32, 0.0)
    }
    fn to_complex(self) -> Complex32 {
        self
    }
    fn coerce(v: &Value) -> Option<DMatrix<Self>> {
        v.to_complex_dense()
            .map(|m| m.map(|z| Complex32::new(z.re as f32, z.im as f32)))
    }
    fn order(a: Self, b: Self) -> Option<Ordering> {
        complex_order(
            Complex64::new(f64::from(a.re), f64::from(a.im)),
            Complex64::new(f64::from(b.re), f64::from(b.im)),
        )
    }
    fn is_nonzero(self) -> bool {
        self.re != 0.0 || self.im != 0.0
    }
    fn integer_value(self) -> Option<i64> {
        if self.im == 0.0 {
            real_integer(f64::from(self.re))
        } else {
            None
        }
    }
    fn needs_complex_pow(_base: Self, _exp: Self) -> bool {
        false
    }
}

impl SparseElement for f64 {
    fn view_sparse(v: &Value) -> Option<&SparseMatrix<Self>> {
        match v {
            Value::SparseMatrix(s) => Some(s),
            _ => None,
        }
    }
    fn wrap_sparse(s: SparseMatrix<Self>) -> Value {
        Value::SparseMatrix(s)
    }
}

impl SparseElement for Complex64 {
    fn view_sparse(v: &Value) -> Option<&SparseMatrix<Self>> {
        match v {
            Value::SparseComplexMatrix(s) => Some(s),
            _ => None,
        }
    }
    fn wrap_sparse(s: SparseMatrix<Self>) -> Value {
        Value::SparseComplexMatrix(s)
    }
}

impl ArrayElement for i32 {
    const TYPE_NAME: &'static str = "int32 matrix";

    fn view(v: &Value) -> Option<&DMatrix<Self>> {
        match v {
            Value::Int32Matrix(m) => Some(m),
            _ => None,
        }
    }
    fn view_mut(v: &mut Value) -> Option<&mut DMatrix<Self>> {
        match v {
            Value::Int32Matrix(m) => Some(m),
            _ => None,
        }
    }
    fn wrap(m: DMatrix<Self>) -> Value {
        Value::Int32Matrix(m)
    }
    fn fill() -> Self {
        0
    }
}

impl ArrayElement for bool {
    const TYPE_NAME: &'static str = "bool matrix";

    fn view(v: &Value) -> Option<&DMatrix<Self>> {
        match v {
            Value::BoolMatrix(m) => Some(m),
            _ => None,
        }
    }
    fn view_mut(v: &mut Value) -> Option<&mut DMatrix<Self>> {
        match v {
            Value::BoolMatrix(m) => Some(m),
            _ => None,
        }
    }
    fn wrap(m: DMatrix<Self>) -> Value {
        Value::BoolMatrix(m)
    }
    fn fill() -> Self {
        false
    }
}

impl ArrayElement for char {
    const TYPE_NAME: &'static str = "string";

    fn view(v: &Value) -> Option<&DMatrix<Self>> {
        match v {
            Value::CharMatrix(c) => Some(&c.data),
            _ => None,
        }
    }
    fn view_mut(v: &mut Value) -> Option<&mut DMatrix<Self>> {
        match v {
            Value::CharMatrix(c) => Some(&mut c.data),
            _ => None,
        }
    }
    /// Double-quoted; kernels that must keep the quote set it afterwards
    fn wrap(m: DMatrix<Self>) -> Value {
        Value::CharMatrix(CharMatrix::new(m, Quote::Double))
    }
    fn fill() -> Self {
        '\0'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_borrows_exact_type() {
        let v = Value::scalar(3.0);
        assert!(matches!(operand::<f64>(&v).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_operand_coerces_real_to_complex() {
        let v = Value::scalar(3.0);
        let m = operand::<Complex64>(&v).unwrap();
        assert_eq!(m[(0, 0)], Complex64::new(3.0, 0.0));
    }

    #[test]
    fn test_operand_refuses_complex_to_real() {
        let v = Value::complex_scalar(1.0, 2.0);
        assert!(operand::<f64>(&v).is_err());
    }

    #[test]
    fn test_complex_order_by_magnitude() {
        let a = Complex64::new(0.0, 1.0);
        let b = Complex64::new(2.0, 0.0);
        assert_eq!(Complex64::order(a, b), Some(Ordering::Less));
    }

    #[test]
    fn test_integer_value() {
        assert_eq!(3.0_f64.integer_value(), Some(3));
        assert_eq!(2.5_f64.integer_value(), None);
        assert_eq!(Complex64::new(2.0, 1.0).integer_value(), None);
    }
}
