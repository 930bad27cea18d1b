//! Value module - language-visible array values.
//!
//! # Module Organization
//!
//! - `value_enum.rs`: Value enum and ValueKind
//! - `sparse.rs`: SparseMatrix, compressed sparse column storage
//! - `structured.rs`: DiagMatrix and PermMatrix
//! - `char_matrix.rs`: CharMatrix and its quoting style
//! - `cell.rs`: CellArray
//! - `null.rs`: the process-wide literal-empty sentinels

mod cell;
mod char_matrix;
mod null;
mod sparse;
mod structured;
mod value_enum;

pub use cell::CellArray;
pub use char_matrix::{CharMatrix, Quote};
pub use null::NullKind;
pub use sparse::SparseMatrix;
pub use structured::{DiagMatrix, PermMatrix};
pub use value_enum::{Value, ValueKind};

pub use nalgebra::{Complex, DMatrix, DVector};

/// Double-precision complex element
pub type Complex64 = Complex<f64>;
/// Single-precision complex element
pub type Complex32 = Complex<f32>;
