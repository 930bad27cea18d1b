use subset_array_vm::Value;

use super::{check_index, MxRep};
use crate::array::MxArray;
use crate::class::MxClassId;
use crate::error::{MexError, MexResult};

/// Struct array: named fields, one element handle per (element, field).
///
/// Storage is element-major: the value of field `k` of element `i` lives
/// at `i * nfields + k`.
#[derive(Debug)]
pub struct StructRep {
    rows: usize,
    cols: usize,
    fields: Vec<String>,
    values: Vec<Option<MxArray>>,
}

impl StructRep {
    pub fn new<S: AsRef<str>>(rows: usize, cols: usize, fields: &[S]) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(fields.len());
        for f in fields {
            if !names.iter().any(|n| n == f.as_ref()) {
                names.push(f.as_ref().to_string());
            }
        }
        let len = rows * cols * names.len();
        Self {
            rows,
            cols,
            fields: names,
            values: (0..len).map(|_| None).collect(),
        }
    }

    fn numel(&self) -> usize {
        self.rows * self.cols
    }

    /// Rebuild storage for a new field list. `source(k)` names the old
    /// field number that feeds new field `k`, if any.
    fn relayout(&mut self, nfields: usize, source: impl Fn(usize) -> Option<usize>) {
        let old_nfields = self.fields.len();
        let mut old: Vec<Option<MxArray>> = std::mem::take(&mut self.values);
        let mut values = Vec::with_capacity(self.numel() * nfields);
        for i in 0..self.numel() {
            for k in 0..nfields {
                let moved = source(k).and_then(|old_k| old.get_mut(i * old_nfields + old_k)?.take());
                values.push(moved);
            }
        }
        self.values = values;
    }
}

impl MxRep for StructRep {
    fn dup(&self) -> Box<dyn MxRep> {
        Box::new(StructRep {
            rows: self.rows,
            cols: self.cols,
            fields: self.fields.clone(),
            values: self.values.iter().map(|v| v.as_ref().map(MxArray::dup)).collect(),
        })
    }

    fn class_id(&self) -> MxClassId {
        MxClassId::Struct
    }

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The dispatch engine has no struct values
    fn as_value(&self) -> MexResult<Value> {
        Err(MexError::invalid_type("as_value", MxClassId::Struct))
    }

    fn set_dims(&mut self, rows: usize, cols: usize) -> MexResult<()> {
        self.rows = rows;
        self.cols = cols;
        let len = self.numel() * self.fields.len();
        self.values.resize_with(len, || None);
        Ok(())
    }

    fn field_count(&self) -> MexResult<usize> {
        Ok(self.fields.len())
    }

    fn field_name(&self, key: usize) -> MexResult<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| MexError::out_of_bound("get_field_name_by_number", key, self.fields.len()))
    }

    fn field_number(&self, name: &str) -> MexResult<Option<usize>> {
        Ok(self.fields.iter().position(|f| f == name))
    }

    /// Adding an existing field returns its number and changes nothing
    fn add_field(&mut self, name: &str) -> MexResult<usize> {
        if let Some(k) = self.fields.iter().position(|f| f == name) {
            return Ok(k);
        }
        let old_nfields = self.fields.len();
        self.relayout(old_nfields + 1, |k| (k < old_nfields).then_some(k));
        self.fields.push(name.to_string());
        Ok(old_nfields)
    }

    fn remove_field(&mut self, key: usize) -> MexResult<()> {
        check_index("remove_field", key, self.fields.len())?;
        let nfields = self.fields.len() - 1;
        self.relayout(nfields, |k| Some(if k < key { k } else { k + 1 }));
        self.fields.remove(key);
        Ok(())
    }

    fn field(&self, index: usize, key: usize) -> MexResult<Option<&MxArray>> {
        check_index("get_field_by_number", index, self.numel())?;
        check_index("get_field_by_number", key, self.fields.len())?;
        Ok(self.values[index * self.fields.len() + key].as_ref())
    }

    fn set_field(&mut self, index: usize, key: usize, value: Option<MxArray>) -> MexResult<()> {
        check_index("set_field_by_number", index, self.numel())?;
        check_index("set_field_by_number", key, self.fields.len())?;
        let nfields = self.fields.len();
        self.values[index * nfields + key] = value;
        Ok(())
    }
}
