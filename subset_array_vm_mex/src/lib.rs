// Library code never prints; diagnostics go through `tracing`.
#![deny(clippy::print_stderr)]

//! External array compatibility bridge.
//!
//! Native extensions see arrays through a fixed accessor API (class
//! predicates, dimensions, typed data, sparse index arrays, cells, struct
//! fields). `MxArray` implements that API over a swappable
//! representation: arrays handed out by the interpreter start as a cheap
//! `ValueRep` around a language `Value` and are converted to a full
//! representation only when an accessor needs raw storage.
//!
//! # Module Organization
//!
//! - `array`: the MxArray handle and its mutate-and-retry forwarding
//! - `rep`: the MxRep capability trait and the representations
//! - `data`: typed element storage
//! - `class`: class ids and complexity flags
//! - `error`: MexError

pub mod array;
pub mod class;
pub mod data;
pub mod error;
pub mod rep;

pub use array::MxArray;
pub use class::{MxClassId, MxComplexity};
pub use data::MxData;
pub use error::{MexError, MexResult};
pub use rep::{CellRep, MxRep, NumericRep, SparseRep, StructRep, ValueRep};
