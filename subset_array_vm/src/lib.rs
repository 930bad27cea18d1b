// Library code never prints; diagnostics go through `tracing`.
// The optable binary (bin/) may write to stdout/stderr.
#![deny(clippy::print_stderr)]

//! Runtime operator dispatch for a dynamically typed numeric-array
//! language.
//!
//! Values carry a runtime representation (full, complex, sparse, diagonal,
//! permutation, int32, bool, character, cell, literal-empty). Every
//! representation is registered in a `TypeRegistry`; kernels for each
//! operator and type pair live in an `OperatorTable`; the resolver in
//! `dispatch` picks a kernel, widening operands by a single step when no
//! exact kernel exists.
//!
//! # Module Organization
//!
//! - `types`: TypeId, TypeRegistry, widen/narrow edges
//! - `table`: kernel signatures and the operator table
//! - `context`: start-up builder and the frozen dispatch context
//! - `dispatch`: the resolver (binary, unary, concat, assign, convert)
//! - `value`: value representations and literal-empty sentinels
//! - `kernels`: reference kernels
//! - `operators`: installers wiring kernels into the table
//! - `config`: dispatch configuration (TOML / environment)
//! - `error`: ConfigError and DispatchError

// Core modules
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod ops;
pub mod table;
pub mod types;
pub mod value;

// Reference kernels and their installers
pub mod kernels;
mod operators;

pub use config::{DispatchConfig, WideningOrder};
pub use context::{ContextBuilder, DispatchContext};
pub use error::{ConfigError, ConfigResult, DispatchError, DispatchResult};
pub use ops::{AssignOp, BinaryOp, CatDim, OperatorKind, UnaryOp};
pub use table::{Kernel, OperatorTable, TableEntry};
pub use types::{TypeGroup, TypeId, TypeRegistry};
pub use value::{NullKind, Value, ValueKind};
