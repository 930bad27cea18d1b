//! Dense numeric, logical and character storage

use nalgebra::{DMatrix, Scalar};
use subset_array_vm::value::{CharMatrix, Quote};
use subset_array_vm::Value;

use super::MxRep;
use crate::class::{MxClassId, MxComplexity};
use crate::data::MxData;
use crate::error::{MexError, MexResult};

/// Full dense representation: shape plus column-major typed data
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRep {
    rows: usize,
    cols: usize,
    data: MxData,
}

impl NumericRep {
    pub fn new(rows: usize, cols: usize, data: MxData) -> Self {
        Self { rows, cols, data }
    }

    /// Zero-filled `rows x cols` array of `class`
    pub fn zeros(class: MxClassId, rows: usize, cols: usize, complexity: MxComplexity) -> MexResult<Self> {
        let data = MxData::zeros(class, complexity, rows * cols)
            .ok_or_else(|| MexError::invalid_type("create_numeric_array", class))?;
        Ok(Self::new(rows, cols, data))
    }

    fn numel(&self) -> usize {
        self.rows * self.cols
    }
}

/// Column-major matrix from the first `rows * cols` elements
fn matrix<T: Scalar + Copy>(rows: usize, cols: usize, v: &[T]) -> MexResult<DMatrix<T>> {
    let n = rows * cols;
    if v.len() < n {
        return Err(MexError::invalid_data(
            "as_value",
            format!("{} elements for a {}x{} array", v.len(), rows, cols),
        ));
    }
    Ok(DMatrix::from_column_slice(rows, cols, &v[..n]))
}

fn saturate<T>(x: T) -> i32
where
    T: Copy + Default + PartialOrd + TryInto<i32>,
{
    x.try_into()
        .unwrap_or(if x > T::default() { i32::MAX } else { i32::MIN })
}

fn widen_int<T: Copy + Into<i32>>(v: &[T]) -> Vec<i32> {
    v.iter().map(|&x| x.into()).collect()
}

fn saturate_int<T>(v: &[T]) -> Vec<i32>
where
    T: Copy + Default + PartialOrd + TryInto<i32>,
{
    v.iter().map(|&x| saturate(x)).collect()
}

/// Language value for dense typed data. Integer classes other than int32
/// land in int32, saturating where the range is wider.
fn dense_value(rows: usize, cols: usize, data: &MxData) -> MexResult<Value> {
    let value = match data {
        MxData::Double(v) => Value::Matrix(matrix(rows, cols, v)?),
        MxData::Single(v) => Value::FloatMatrix(matrix(rows, cols, v)?),
        MxData::ComplexDouble(v) => Value::ComplexMatrix(matrix(rows, cols, v)?),
        MxData::ComplexSingle(v) => Value::FloatComplexMatrix(matrix(rows, cols, v)?),
        MxData::Int32(v) => Value::Int32Matrix(matrix(rows, cols, v)?),
        MxData::Int8(v) => Value::Int32Matrix(matrix(rows, cols, &widen_int(v))?),
        MxData::Uint8(v) => Value::Int32Matrix(matrix(rows, cols, &widen_int(v))?),
        MxData::Int16(v) => Value::Int32Matrix(matrix(rows, cols, &widen_int(v))?),
        MxData::Uint16(v) => Value::Int32Matrix(matrix(rows, cols, &widen_int(v))?),
        MxData::Uint32(v) => Value::Int32Matrix(matrix(rows, cols, &saturate_int(v))?),
        MxData::Int64(v) => Value::Int32Matrix(matrix(rows, cols, &saturate_int(v))?),
        MxData::Uint64(v) => Value::Int32Matrix(matrix(rows, cols, &saturate_int(v))?),
        MxData::Logical(v) => Value::BoolMatrix(matrix(rows, cols, v)?),
        MxData::Char(v) => {
            let chars: Vec<char> = v
                .iter()
                .map(|&u| char::from_u32(u32::from(u)).unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect();
            Value::CharMatrix(CharMatrix::new(matrix(rows, cols, &chars)?, Quote::Single))
        }
    };
    Ok(value)
}

impl MxRep for NumericRep {
    fn dup(&self) -> Box<dyn MxRep> {
        Box::new(self.clone())
    }

    fn class_id(&self) -> MxClassId {
        self.data.class_id()
    }

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn as_value(&self) -> MexResult<Value> {
        dense_value(self.rows, self.cols, &self.data)
    }

    fn is_complex(&self) -> bool {
        self.data.is_complex()
    }

    fn is_logical_scalar_true(&self) -> bool {
        self.numel() == 1 && matches!(&self.data, MxData::Logical(v) if v.first() == Some(&true))
    }

    fn scalar(&self) -> MexResult<f64> {
        if self.numel() == 0 {
            return Err(MexError::out_of_bound("get_scalar", 0, 0));
        }
        self.data
            .first_as_f64()
            .ok_or_else(|| MexError::out_of_bound("get_scalar", 0, self.data.len()))
    }

    fn string(&self) -> MexResult<String> {
        match &self.data {
            MxData::Char(v) => {
                let n = self.numel().min(v.len());
                Ok(String::from_utf16_lossy(&v[..n]))
            }
            _ => Err(MexError::invalid_type("array_to_string", self.class_id())),
        }
    }

    fn set_dims(&mut self, rows: usize, cols: usize) -> MexResult<()> {
        self.rows = rows;
        self.cols = cols;
        self.data.resize(rows * cols);
        Ok(())
    }

    fn data(&self) -> MexResult<&MxData> {
        Ok(&self.data)
    }

    fn data_mut(&mut self) -> MexResult<&mut MxData> {
        Ok(&mut self.data)
    }

    fn set_data(&mut self, data: MxData) -> MexResult<()> {
        if !self.data.same_layout(&data) {
            return Err(MexError::invalid_type("set_data", self.class_id()));
        }
        self.data = data;
        Ok(())
    }
}
