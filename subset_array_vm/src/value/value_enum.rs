//! The Value enum and ValueKind.

use std::fmt;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::{
    CellArray, CharMatrix, Complex32, Complex64, DiagMatrix, NullKind, PermMatrix, Quote,
    SparseMatrix,
};

/// Language-visible numeric value.
///
/// Each variant is one concrete representation the dispatch engine can
/// key kernels on. All matrices are two-dimensional and column-major.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // ========== Dense ==========
    Matrix(DMatrix<f64>),
    ComplexMatrix(DMatrix<Complex64>),
    FloatMatrix(DMatrix<f32>),
    FloatComplexMatrix(DMatrix<Complex32>),

    // ========== Sparse ==========
    SparseMatrix(SparseMatrix<f64>),
    SparseComplexMatrix(SparseMatrix<Complex64>),

    // ========== Structured ==========
    DiagMatrix(DiagMatrix),
    PermMatrix(PermMatrix),

    // ========== Integer / logical / text ==========
    Int32Matrix(DMatrix<i32>),
    BoolMatrix(DMatrix<bool>),
    CharMatrix(CharMatrix),

    // ========== Containers ==========
    Cell(CellArray),

    /// One of the literal-empty sentinels (`[]`, `""`, `''`).
    ///
    /// The variant carries no storage, so every `Value::Null(kind)` denotes
    /// the singleton for `kind`: a clone or a directly built variant is
    /// indistinguishable from `kind.instance()` and is never mutated in
    /// place (`make_storable` replaces it first). Sentinel identity is the
    /// kind, not the address.
    Null(NullKind),
}

/// Discriminant of a `Value`, used to bind representations to `TypeId`s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Matrix,
    ComplexMatrix,
    FloatMatrix,
    FloatComplexMatrix,
    SparseMatrix,
    SparseComplexMatrix,
    DiagMatrix,
    PermMatrix,
    Int32Matrix,
    BoolMatrix,
    String,
    SqString,
    Cell,
    NullMatrix,
    NullString,
    NullSqString,
}

impl ValueKind {
    pub const ALL: [ValueKind; 16] = [
        ValueKind::Matrix,
        ValueKind::ComplexMatrix,
        ValueKind::FloatMatrix,
        ValueKind::FloatComplexMatrix,
        ValueKind::SparseMatrix,
        ValueKind::SparseComplexMatrix,
        ValueKind::DiagMatrix,
        ValueKind::PermMatrix,
        ValueKind::Int32Matrix,
        ValueKind::BoolMatrix,
        ValueKind::String,
        ValueKind::SqString,
        ValueKind::Cell,
        ValueKind::NullMatrix,
        ValueKind::NullString,
        ValueKind::NullSqString,
    ];

    /// Registered type name of this representation
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::Matrix => "matrix",
            ValueKind::ComplexMatrix => "complex matrix",
            ValueKind::FloatMatrix => "float matrix",
            ValueKind::FloatComplexMatrix => "float complex matrix",
            ValueKind::SparseMatrix => "sparse matrix",
            ValueKind::SparseComplexMatrix => "sparse complex matrix",
            ValueKind::DiagMatrix => "diagonal matrix",
            ValueKind::PermMatrix => "permutation matrix",
            ValueKind::Int32Matrix => "int32 matrix",
            ValueKind::BoolMatrix => "bool matrix",
            ValueKind::String => "string",
            ValueKind::SqString => "sq_string",
            ValueKind::Cell => "cell",
            ValueKind::NullMatrix => "null_matrix",
            ValueKind::NullString => "null_string",
            ValueKind::NullSqString => "null_sq_string",
        }
    }
}

impl Value {
    /// Representation discriminant
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Matrix(_) => ValueKind::Matrix,
            Value::ComplexMatrix(_) => ValueKind::ComplexMatrix,
            Value::FloatMatrix(_) => ValueKind::FloatMatrix,
            Value::FloatComplexMatrix(_) => ValueKind::FloatComplexMatrix,
            Value::SparseMatrix(_) => ValueKind::SparseMatrix,
            Value::SparseComplexMatrix(_) => ValueKind::SparseComplexMatrix,
            Value::DiagMatrix(_) => ValueKind::DiagMatrix,
            Value::PermMatrix(_) => ValueKind::PermMatrix,
            Value::Int32Matrix(_) => ValueKind::Int32Matrix,
            Value::BoolMatrix(_) => ValueKind::BoolMatrix,
            Value::CharMatrix(c) => match c.quote {
                Quote::Double => ValueKind::String,
                Quote::Single => ValueKind::SqString,
            },
            Value::Cell(_) => ValueKind::Cell,
            Value::Null(NullKind::Matrix) => ValueKind::NullMatrix,
            Value::Null(NullKind::Str) => ValueKind::NullString,
            Value::Null(NullKind::SqStr) => ValueKind::NullSqString,
        }
    }

    /// Registered type name of this value's representation
    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    // ========== Constructors ==========

    /// 1x1 real matrix
    pub fn scalar(x: f64) -> Self {
        Value::Matrix(DMatrix::from_element(1, 1, x))
    }

    /// 1x1 complex matrix
    pub fn complex_scalar(re: f64, im: f64) -> Self {
        Value::ComplexMatrix(DMatrix::from_element(1, 1, Complex64::new(re, im)))
    }

    /// 1x1 logical
    pub fn bool_scalar(b: bool) -> Self {
        Value::BoolMatrix(DMatrix::from_element(1, 1, b))
    }

    /// Real matrix from row-major data, the order literals are written in
    pub fn matrix_from_rows(rows: usize, cols: usize, data: &[f64]) -> Self {
        Value::Matrix(DMatrix::from_row_slice(rows, cols, data))
    }

    /// Double-quoted string row
    pub fn string(s: &str) -> Self {
        Value::CharMatrix(CharMatrix::from_str(s, Quote::Double))
    }

    /// Single-quoted string row
    pub fn sq_string(s: &str) -> Self {
        Value::CharMatrix(CharMatrix::from_str(s, Quote::Single))
    }

    // ========== Sentinels ==========

    /// The process-wide `[]` instance
    pub fn null_matrix() -> &'static Value {
        NullKind::Matrix.instance()
    }

    /// The process-wide `""` instance
    pub fn null_str() -> &'static Value {
        NullKind::Str.instance()
    }

    /// The process-wide `''` instance
    pub fn null_sq_str() -> &'static Value {
        NullKind::SqStr.instance()
    }

    /// True only for the three literal-empty sentinels. Ordinary empty
    /// arrays, including the storable clone of a sentinel, are not null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    /// A value that may be stored and modified.
    ///
    /// Sentinels become an ordinary empty value of the same declared type
    /// (which is no longer null); everything else is cloned unchanged.
    pub fn storable_value(&self) -> Value {
        match self {
            Value::Null(kind) => kind.storable(),
            other => other.clone(),
        }
    }

    /// Replace a sentinel in place by its storable clone. Call before any
    /// in-place modification.
    pub fn make_storable(&mut self) {
        if let Value::Null(kind) = self {
            *self = kind.storable();
        }
    }

    // ========== Shape ==========

    /// (rows, columns)
    pub fn dims(&self) -> (usize, usize) {
        match self {
            Value::Matrix(m) => m.shape(),
            Value::ComplexMatrix(m) => m.shape(),
            Value::FloatMatrix(m) => m.shape(),
            Value::FloatComplexMatrix(m) => m.shape(),
            Value::SparseMatrix(s) => s.shape(),
            Value::SparseComplexMatrix(s) => s.shape(),
            Value::DiagMatrix(d) => d.shape(),
            Value::PermMatrix(p) => p.shape(),
            Value::Int32Matrix(m) => m.shape(),
            Value::BoolMatrix(m) => m.shape(),
            Value::CharMatrix(c) => c.data.shape(),
            Value::Cell(c) => c.shape(),
            Value::Null(_) => (0, 0),
        }
    }

    pub fn rows(&self) -> usize {
        self.dims().0
    }

    pub fn cols(&self) -> usize {
        self.dims().1
    }

    pub fn numel(&self) -> usize {
        let (r, c) = self.dims();
        r * c
    }

    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    pub fn is_scalar(&self) -> bool {
        self.dims() == (1, 1)
    }

    // ========== Predicates ==========

    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            Value::ComplexMatrix(_) | Value::FloatComplexMatrix(_) | Value::SparseComplexMatrix(_)
        )
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Value::SparseMatrix(_) | Value::SparseComplexMatrix(_))
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Value::FloatMatrix(_) | Value::FloatComplexMatrix(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Value::CharMatrix(_) | Value::Null(NullKind::Str) | Value::Null(NullKind::SqStr)
        )
    }

    /// True for the representations arithmetic kernels accept
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            Value::CharMatrix(_) | Value::Cell(_) | Value::BoolMatrix(_) | Value::Null(_)
        )
    }

    // ========== Extraction ==========

    /// First element as a real double, if the value is numeric or logical.
    /// Complex values contribute their real part.
    pub fn scalar_value(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        match self {
            Value::Matrix(m) => Some(m[(0, 0)]),
            Value::ComplexMatrix(m) => Some(m[(0, 0)].re),
            Value::FloatMatrix(m) => Some(f64::from(m[(0, 0)])),
            Value::FloatComplexMatrix(m) => Some(f64::from(m[(0, 0)].re)),
            Value::SparseMatrix(s) => Some(s.get(0, 0)),
            Value::SparseComplexMatrix(s) => Some(s.get(0, 0).re),
            Value::DiagMatrix(d) => Some(d.get(0, 0)),
            Value::PermMatrix(p) => Some(p.get(0, 0)),
            Value::Int32Matrix(m) => Some(f64::from(m[(0, 0)])),
            Value::BoolMatrix(m) => Some(if m[(0, 0)] { 1.0 } else { 0.0 }),
            Value::CharMatrix(c) => Some(f64::from(u32::from(c.data[(0, 0)]))),
            Value::Cell(_) | Value::Null(_) => None,
        }
    }

    /// Full real dense copy of numeric, logical and character values.
    /// Complex values are rejected rather than silently truncated.
    pub fn to_real_dense(&self) -> Option<DMatrix<f64>> {
        match self {
            Value::Matrix(m) => Some(m.clone()),
            Value::FloatMatrix(m) => Some(m.map(f64::from)),
            Value::SparseMatrix(s) => Some(s.to_dense()),
            Value::DiagMatrix(d) => Some(d.to_dense()),
            Value::PermMatrix(p) => Some(p.to_dense()),
            Value::Int32Matrix(m) => Some(m.map(f64::from)),
            Value::BoolMatrix(m) => Some(m.map(|b| if b { 1.0 } else { 0.0 })),
            Value::CharMatrix(c) => Some(c.data.map(|ch| f64::from(u32::from(ch)))),
            Value::Null(_) => Some(DMatrix::zeros(0, 0)),
            _ => None,
        }
    }

    /// Full complex dense copy of any numeric value
    pub fn to_complex_dense(&self) -> Option<DMatrix<Complex64>> {
        match self {
            Value::ComplexMatrix(m) => Some(m.clone()),
            Value::FloatComplexMatrix(m) => {
                Some(m.map(|z| Complex64::new(f64::from(z.re), f64::from(z.im))))
            }
            Value::SparseComplexMatrix(s) => Some(s.to_dense()),
            other => other
                .to_real_dense()
                .map(|m| m.map(|x| Complex64::new(x, 0.0))),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::scalar(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool_scalar(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<DMatrix<f64>> for Value {
    fn from(m: DMatrix<f64>) -> Self {
        Value::Matrix(m)
    }
}

impl From<DMatrix<Complex64>> for Value {
    fn from(m: DMatrix<Complex64>) -> Self {
        Value::ComplexMatrix(m)
    }
}

impl From<DMatrix<bool>> for Value {
    fn from(m: DMatrix<bool>) -> Self {
        Value::BoolMatrix(m)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, c) = self.dims();
        match self {
            Value::CharMatrix(chars) if r <= 1 => match chars.quote {
                Quote::Double => write!(f, "\"{}\"", chars.row_string(0)),
                Quote::Single => write!(f, "'{}'", chars.row_string(0)),
            },
            Value::Null(NullKind::Matrix) => write!(f, "[]"),
            Value::Null(NullKind::Str) => write!(f, "\"\""),
            Value::Null(NullKind::SqStr) => write!(f, "''"),
            _ if self.is_scalar() => match self {
                Value::ComplexMatrix(m) => write!(f, "{}", m[(0, 0)]),
                Value::FloatComplexMatrix(m) => write!(f, "{}", m[(0, 0)]),
                Value::BoolMatrix(m) => write!(f, "{}", u8::from(m[(0, 0)])),
                Value::Cell(_) => write!(f, "{{1x1 cell}}"),
                other => match other.scalar_value() {
                    Some(x) => write!(f, "{}", x),
                    None => write!(f, "<{}>", other.type_name()),
                },
            },
            _ => write!(f, "<{}x{} {}>", r, c, self.type_name()),
        }
    }
}
