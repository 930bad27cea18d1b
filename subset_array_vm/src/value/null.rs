//! Literal-empty sentinels.
//!
//! `[]`, `""` and `''` each exist once per process. They mark "the user
//! wrote a literal empty here", which indexed assignment treats as
//! deletion. Storing or modifying a sentinel always goes through
//! `storable`, which yields an ordinary empty value that is no longer null.

use nalgebra::DMatrix;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::{CharMatrix, Quote, Value};

static NULL_MATRIX: Lazy<Value> = Lazy::new(|| Value::Null(NullKind::Matrix));
static NULL_STR: Lazy<Value> = Lazy::new(|| Value::Null(NullKind::Str));
static NULL_SQ_STR: Lazy<Value> = Lazy::new(|| Value::Null(NullKind::SqStr));

/// Which literal empty a sentinel stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullKind {
    /// `[]`
    Matrix,
    /// `""`
    Str,
    /// `''`
    SqStr,
}

impl NullKind {
    /// The unique process-wide instance
    pub fn instance(self) -> &'static Value {
        match self {
            NullKind::Matrix => &NULL_MATRIX,
            NullKind::Str => &NULL_STR,
            NullKind::SqStr => &NULL_SQ_STR,
        }
    }

    /// Ordinary empty value of the declared type
    pub fn storable(self) -> Value {
        match self {
            NullKind::Matrix => Value::Matrix(DMatrix::zeros(0, 0)),
            NullKind::Str => Value::CharMatrix(CharMatrix::empty(Quote::Double)),
            NullKind::SqStr => Value::CharMatrix(CharMatrix::empty(Quote::Single)),
        }
    }
}
