//! Cheap representation over a language value.
//!
//! Class predicates, shape, scalar and string extraction are answered from
//! the wrapped `Value` directly. Anything that exposes raw storage, or
//! changes the array, raises the mutation flag; the handle then swaps in
//! the full representation built by `mutate()`.

use std::cell::Cell;

use subset_array_vm::value::NullKind;
use subset_array_vm::Value;

use super::{CellRep, MxRep, NumericRep, SparseRep};
use crate::array::MxArray;
use crate::class::MxClassId;
use crate::data::MxData;
use crate::error::{MexError, MexResult};

const REPLACEMENT_UNIT: u16 = 0xFFFD;

/// Representation that borrows nothing and copies nothing until asked for
/// raw data
#[derive(Debug)]
pub struct ValueRep {
    value: Value,
    mutation_flag: Cell<bool>,
}

impl ValueRep {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            mutation_flag: Cell::new(false),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    fn request_mutation<T>(&self, accessor: &'static str) -> MexResult<T> {
        self.mutation_flag.set(true);
        Err(MexError::MutationPending(accessor))
    }
}

fn class_of(value: &Value) -> MxClassId {
    match value {
        Value::FloatMatrix(_) | Value::FloatComplexMatrix(_) => MxClassId::Single,
        Value::Int32Matrix(_) => MxClassId::Int32,
        Value::BoolMatrix(_) => MxClassId::Logical,
        Value::CharMatrix(_) | Value::Null(NullKind::Str | NullKind::SqStr) => MxClassId::Char,
        Value::Cell(_) => MxClassId::Cell,
        _ => MxClassId::Double,
    }
}

fn char_unit(c: char) -> u16 {
    u16::try_from(u32::from(c)).unwrap_or(REPLACEMENT_UNIT)
}

/// Full representation holding the same contents as `value`. Sentinels
/// become an ordinary empty array of their declared class.
fn full_rep(value: &Value) -> Box<dyn MxRep> {
    let (rows, cols) = value.dims();
    let dense = |data: MxData| -> Box<dyn MxRep> { Box::new(NumericRep::new(rows, cols, data)) };
    match value {
        Value::Matrix(m) => dense(MxData::Double(m.iter().copied().collect())),
        Value::ComplexMatrix(m) => dense(MxData::ComplexDouble(m.iter().copied().collect())),
        Value::FloatMatrix(m) => dense(MxData::Single(m.iter().copied().collect())),
        Value::FloatComplexMatrix(m) => dense(MxData::ComplexSingle(m.iter().copied().collect())),
        Value::DiagMatrix(d) => dense(MxData::Double(d.to_dense().iter().copied().collect())),
        Value::PermMatrix(p) => dense(MxData::Double(p.to_dense().iter().copied().collect())),
        Value::Int32Matrix(m) => dense(MxData::Int32(m.iter().copied().collect())),
        Value::BoolMatrix(m) => dense(MxData::Logical(m.iter().copied().collect())),
        Value::CharMatrix(c) => dense(MxData::Char(c.data.iter().map(|&ch| char_unit(ch)).collect())),
        Value::SparseMatrix(s) => Box::new(SparseRep::from_parts(
            rows,
            cols,
            s.col_ptr().to_vec(),
            s.row_idx().to_vec(),
            MxData::Double(s.values().to_vec()),
        )),
        Value::SparseComplexMatrix(s) => Box::new(SparseRep::from_parts(
            rows,
            cols,
            s.col_ptr().to_vec(),
            s.row_idx().to_vec(),
            MxData::ComplexDouble(s.values().to_vec()),
        )),
        Value::Cell(c) => Box::new(CellRep::from_cells(
            rows,
            cols,
            c.cells.iter().map(|v| Some(MxArray::from_value(v.clone()))).collect(),
        )),
        Value::Null(kind) => full_rep(&kind.storable()),
    }
}

impl MxRep for ValueRep {
    fn dup(&self) -> Box<dyn MxRep> {
        Box::new(ValueRep::new(self.value.clone()))
    }

    fn class_id(&self) -> MxClassId {
        class_of(&self.value)
    }

    fn dims(&self) -> (usize, usize) {
        self.value.dims()
    }

    fn as_value(&self) -> MexResult<Value> {
        Ok(self.value.clone())
    }

    fn is_complex(&self) -> bool {
        self.value.is_complex()
    }

    fn is_sparse(&self) -> bool {
        self.value.is_sparse()
    }

    fn is_null(&self) -> bool {
        self.value.is_null()
    }

    fn is_logical_scalar_true(&self) -> bool {
        matches!(&self.value, Value::BoolMatrix(m) if m.shape() == (1, 1) && m[(0, 0)])
    }

    fn scalar(&self) -> MexResult<f64> {
        if matches!(self.value, Value::Cell(_)) {
            return Err(MexError::invalid_type("get_scalar", self.class_id()));
        }
        self.value
            .scalar_value()
            .ok_or_else(|| MexError::out_of_bound("get_scalar", 0, 0))
    }

    fn string(&self) -> MexResult<String> {
        match &self.value {
            Value::CharMatrix(c) => Ok(c.data.iter().collect()),
            Value::Null(NullKind::Str | NullKind::SqStr) => Ok(String::new()),
            _ => Err(MexError::invalid_type("array_to_string", self.class_id())),
        }
    }

    fn set_dims(&mut self, _rows: usize, _cols: usize) -> MexResult<()> {
        self.request_mutation("set_dimensions")
    }

    fn data(&self) -> MexResult<&MxData> {
        self.request_mutation("get_data")
    }

    fn data_mut(&mut self) -> MexResult<&mut MxData> {
        self.request_mutation("get_data")
    }

    fn set_data(&mut self, _data: MxData) -> MexResult<()> {
        self.request_mutation("set_data")
    }

    fn ir(&self) -> MexResult<&[usize]> {
        self.request_mutation("get_ir")
    }

    fn ir_mut(&mut self) -> MexResult<&mut [usize]> {
        self.request_mutation("get_ir")
    }

    fn jc(&self) -> MexResult<&[usize]> {
        self.request_mutation("get_jc")
    }

    fn jc_mut(&mut self) -> MexResult<&mut [usize]> {
        self.request_mutation("get_jc")
    }

    fn nzmax(&self) -> MexResult<usize> {
        self.request_mutation("get_nzmax")
    }

    fn set_ir(&mut self, _ir: Vec<usize>) -> MexResult<()> {
        self.request_mutation("set_ir")
    }

    fn set_jc(&mut self, _jc: Vec<usize>) -> MexResult<()> {
        self.request_mutation("set_jc")
    }

    fn set_nzmax(&mut self, _nzmax: usize) -> MexResult<()> {
        self.request_mutation("set_nzmax")
    }

    fn cell(&self, _index: usize) -> MexResult<Option<&MxArray>> {
        self.request_mutation("get_cell")
    }

    fn set_cell(&mut self, _index: usize, _value: Option<MxArray>) -> MexResult<()> {
        self.request_mutation("set_cell")
    }

    fn field_count(&self) -> MexResult<usize> {
        self.request_mutation("get_number_of_fields")
    }

    fn field_name(&self, _key: usize) -> MexResult<&str> {
        self.request_mutation("get_field_name_by_number")
    }

    fn field_number(&self, _name: &str) -> MexResult<Option<usize>> {
        self.request_mutation("get_field_number")
    }

    fn add_field(&mut self, _name: &str) -> MexResult<usize> {
        self.request_mutation("add_field")
    }

    fn remove_field(&mut self, _key: usize) -> MexResult<()> {
        self.request_mutation("remove_field")
    }

    fn field(&self, _index: usize, _key: usize) -> MexResult<Option<&MxArray>> {
        self.request_mutation("get_field_by_number")
    }

    fn set_field(&mut self, _index: usize, _key: usize, _value: Option<MxArray>) -> MexResult<()> {
        self.request_mutation("set_field_by_number")
    }

    fn mutation_needed(&self) -> bool {
        self.mutation_flag.get()
    }

    fn mutate(&self) -> Option<Box<dyn MxRep>> {
        Some(full_rep(&self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates_do_not_raise() {
        let rep = ValueRep::new(Value::string("hi"));
        assert_eq!(rep.class_id(), MxClassId::Char);
        assert_eq!(rep.dims(), (1, 2));
        assert_eq!(rep.string().unwrap(), "hi");
        assert!(!rep.mutation_needed());
    }

    #[test]
    fn test_raw_data_raises() {
        let rep = ValueRep::new(Value::scalar(3.0));
        assert_eq!(rep.data().unwrap_err(), MexError::MutationPending("get_data"));
        assert!(rep.mutation_needed());
        let full = rep.mutate().unwrap();
        assert_eq!(full.data().unwrap(), &MxData::Double(vec![3.0]));
        assert!(!full.mutation_needed());
    }

    #[test]
    fn test_sentinel_mutates_to_ordinary_char() {
        let rep = ValueRep::new(Value::null_sq_str().clone());
        assert!(rep.is_null());
        let full = rep.mutate().unwrap();
        assert!(!full.is_null());
        assert_eq!(full.class_id(), MxClassId::Char);
        assert_eq!(full.dims(), (0, 0));
    }

    #[test]
    fn test_wide_chars_replaced() {
        assert_eq!(char_unit('a'), 97);
        assert_eq!(char_unit('\u{1F600}'), REPLACEMENT_UNIT);
    }
}
