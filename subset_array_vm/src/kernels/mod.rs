//! Reference kernels
//!
//! Kernels are plain functions over `Value`s. The resolver has already
//! matched the operand types when a kernel runs, so a kernel only checks
//! shapes and computes; a representation mismatch is reported as a domain
//! error rather than a panic.
//!
//! # Module Organization
//!
//! - `element`: element traits shared by the generic kernels
//! - `elementwise`: broadcasting arithmetic, comparisons, unary operators
//! - `linalg`: matrix products, divisions and powers
//! - `concat`: horizontal and vertical concatenation
//! - `assign`: indexed assignment, compound assignment and deletion
//! - `sparse`: sparse-result variants of the dense kernels
//! - `structured`: diagonal and permutation matrices
//! - `integer`: saturating int32 arithmetic
//! - `logical`: bool, character and cell kernels
//! - `convert`: widen, convert and narrow functions

pub mod assign;
pub mod concat;
pub mod convert;
pub mod element;
pub mod elementwise;
pub mod integer;
pub mod linalg;
pub mod logical;
pub mod sparse;
pub mod structured;

pub use element::{ArrayElement, NumericElement, SparseElement};
