//! Array representations behind an `MxArray` handle.
//!
//! A representation answers some accessors natively and, for the rest,
//! either fails with `InvalidType` or raises its mutation flag. A raised
//! flag tells the owning handle to swap in the representation returned by
//! `mutate()` and retry the accessor once.
//!
//! # Module Organization
//!
//! - `value.rs`: ValueRep, a cheap wrapper around a language `Value`
//! - `numeric.rs`: NumericRep, dense numeric, logical and char storage
//! - `sparse.rs`: SparseRep, compressed sparse column storage
//! - `cell.rs`: CellRep
//! - `structure.rs`: StructRep

mod cell;
mod numeric;
mod sparse;
mod structure;
mod value;

pub use cell::CellRep;
pub use numeric::NumericRep;
pub use sparse::SparseRep;
pub use structure::StructRep;
pub use value::ValueRep;

use std::fmt;

use subset_array_vm::Value;

use crate::array::MxArray;
use crate::class::MxClassId;
use crate::data::MxData;
use crate::error::{MexError, MexResult};

/// Capability set of an external array representation.
///
/// Only identity, shape and conversion back to a `Value` are required.
/// Every other accessor defaults to an `InvalidType` failure, so each
/// representation overrides exactly the accessors its class supports.
pub trait MxRep: fmt::Debug + Send {
    /// Deep copy
    fn dup(&self) -> Box<dyn MxRep>;

    fn class_id(&self) -> MxClassId;

    /// (rows, columns)
    fn dims(&self) -> (usize, usize);

    /// Language value with the same contents
    fn as_value(&self) -> MexResult<Value>;

    fn is_complex(&self) -> bool {
        false
    }

    fn is_sparse(&self) -> bool {
        false
    }

    /// True only when the representation is one of the literal-empty
    /// sentinels
    fn is_null(&self) -> bool {
        false
    }

    fn is_logical_scalar_true(&self) -> bool {
        false
    }

    /// First element as a double
    fn scalar(&self) -> MexResult<f64> {
        Err(MexError::invalid_type("get_scalar", self.class_id()))
    }

    /// Character contents in column-major order
    fn string(&self) -> MexResult<String> {
        Err(MexError::invalid_type("array_to_string", self.class_id()))
    }

    fn set_dims(&mut self, _rows: usize, _cols: usize) -> MexResult<()> {
        Err(MexError::invalid_type("set_dimensions", self.class_id()))
    }

    // ========== Raw element data ==========

    fn data(&self) -> MexResult<&MxData> {
        Err(MexError::invalid_type("get_data", self.class_id()))
    }

    fn data_mut(&mut self) -> MexResult<&mut MxData> {
        Err(MexError::invalid_type("get_data", self.class_id()))
    }

    fn set_data(&mut self, _data: MxData) -> MexResult<()> {
        Err(MexError::invalid_type("set_data", self.class_id()))
    }

    // ========== Sparse index arrays ==========

    fn ir(&self) -> MexResult<&[usize]> {
        Err(MexError::invalid_type("get_ir", self.class_id()))
    }

    fn ir_mut(&mut self) -> MexResult<&mut [usize]> {
        Err(MexError::invalid_type("get_ir", self.class_id()))
    }

    fn jc(&self) -> MexResult<&[usize]> {
        Err(MexError::invalid_type("get_jc", self.class_id()))
    }

    fn jc_mut(&mut self) -> MexResult<&mut [usize]> {
        Err(MexError::invalid_type("get_jc", self.class_id()))
    }

    fn nzmax(&self) -> MexResult<usize> {
        Err(MexError::invalid_type("get_nzmax", self.class_id()))
    }

    fn set_ir(&mut self, _ir: Vec<usize>) -> MexResult<()> {
        Err(MexError::invalid_type("set_ir", self.class_id()))
    }

    fn set_jc(&mut self, _jc: Vec<usize>) -> MexResult<()> {
        Err(MexError::invalid_type("set_jc", self.class_id()))
    }

    fn set_nzmax(&mut self, _nzmax: usize) -> MexResult<()> {
        Err(MexError::invalid_type("set_nzmax", self.class_id()))
    }

    // ========== Cells ==========

    fn cell(&self, _index: usize) -> MexResult<Option<&MxArray>> {
        Err(MexError::invalid_type("get_cell", self.class_id()))
    }

    fn set_cell(&mut self, _index: usize, _value: Option<MxArray>) -> MexResult<()> {
        Err(MexError::invalid_type("set_cell", self.class_id()))
    }

    // ========== Struct fields ==========

    fn field_count(&self) -> MexResult<usize> {
        Err(MexError::invalid_type("get_number_of_fields", self.class_id()))
    }

    fn field_name(&self, _key: usize) -> MexResult<&str> {
        Err(MexError::invalid_type("get_field_name_by_number", self.class_id()))
    }

    fn field_number(&self, _name: &str) -> MexResult<Option<usize>> {
        Err(MexError::invalid_type("get_field_number", self.class_id()))
    }

    fn add_field(&mut self, _name: &str) -> MexResult<usize> {
        Err(MexError::invalid_type("add_field", self.class_id()))
    }

    fn remove_field(&mut self, _key: usize) -> MexResult<()> {
        Err(MexError::invalid_type("remove_field", self.class_id()))
    }

    fn field(&self, _index: usize, _key: usize) -> MexResult<Option<&MxArray>> {
        Err(MexError::invalid_type("get_field_by_number", self.class_id()))
    }

    fn set_field(&mut self, _index: usize, _key: usize, _value: Option<MxArray>) -> MexResult<()> {
        Err(MexError::invalid_type("set_field_by_number", self.class_id()))
    }

    // ========== Mutation ==========

    /// Raised when the last accessor could not be served by this
    /// representation
    fn mutation_needed(&self) -> bool {
        false
    }

    /// Richer representation with the same contents. `None` when this
    /// representation never mutates.
    fn mutate(&self) -> Option<Box<dyn MxRep>> {
        None
    }
}

/// Reject linear `index` outside `extent` elements
pub(crate) fn check_index(accessor: &'static str, index: usize, extent: usize) -> MexResult<()> {
    if index < extent {
        Ok(())
    } else {
        Err(MexError::out_of_bound(accessor, index, extent))
    }
}
