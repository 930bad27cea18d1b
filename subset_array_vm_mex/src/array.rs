//! The `MxArray` handle.
//!
//! A handle owns exactly one active representation. Predicates, shape,
//! scalar and string extraction go straight to it. Every other accessor is
//! forwarded through `do_mutable`: if the active representation raises its
//! mutation flag, the handle replaces it with the result of `mutate()` and
//! retries once. A second request is a representation invariant violation.
//! The handle itself never changes identity; swapping the boxed
//! representation is the only mutation it performs.

use subset_array_vm::value::{Complex32, Complex64};
use subset_array_vm::{BinaryOp, DispatchContext, UnaryOp, Value};
use tracing::{debug, error, trace};

use crate::class::{MxClassId, MxComplexity};
use crate::data::MxData;
use crate::error::{MexError, MexResult};
use crate::rep::{CellRep, MxRep, NumericRep, SparseRep, StructRep, ValueRep};

/// External array handle
#[derive(Debug)]
pub struct MxArray {
    rep: Box<dyn MxRep>,
    name: Option<String>,
    mutations: usize,
}

/// `is_<class>` predicates
macro_rules! class_predicates {
    ($($name:ident => $class:ident),* $(,)?) => {
        $(
            pub fn $name(&self) -> bool {
                self.class_id() == MxClassId::$class
            }
        )*
    };
}

/// Typed views of the element data: getter, mutable getter and setter per
/// element type
macro_rules! typed_data {
    ($($get:ident, $get_mut:ident, $set:ident => $variant:ident($ty:ty);)*) => {
        $(
            pub fn $get(&mut self) -> MexResult<&[$ty]> {
                let accessor = concat!("get_", stringify!($get));
                self.serve(accessor, |rep| rep.data().map(|_| ()))?;
                match self.rep.data()? {
                    MxData::$variant(v) => Ok(v.as_slice()),
                    other => Err(MexError::invalid_type(accessor, other.class_id())),
                }
            }

            pub fn $get_mut(&mut self) -> MexResult<&mut [$ty]> {
                let accessor = concat!("get_", stringify!($get));
                self.serve(accessor, |rep| rep.data().map(|_| ()))?;
                match self.rep.data_mut()? {
                    MxData::$variant(v) => Ok(v.as_mut_slice()),
                    other => Err(MexError::invalid_type(accessor, other.class_id())),
                }
            }

            pub fn $set(&mut self, data: Vec<$ty>) -> MexResult<()> {
                self.set_data_as(stringify!($set), MxData::$variant(data))
            }
        )*
    };
}

impl MxArray {
    // ========== Construction ==========

    /// Handle over an arbitrary representation
    pub fn from_rep(rep: Box<dyn MxRep>) -> Self {
        Self {
            rep,
            name: None,
            mutations: 0,
        }
    }

    /// Cheap handle over a language value; nothing is copied until raw
    /// storage is requested
    pub fn from_value(value: Value) -> Self {
        Self::from_rep(Box::new(ValueRep::new(value)))
    }

    /// Zero-filled `rows x cols` double matrix
    pub fn create_double_matrix(rows: usize, cols: usize, complexity: MxComplexity) -> Self {
        let n = rows * cols;
        let data = match complexity {
            MxComplexity::Real => MxData::Double(vec![0.0; n]),
            MxComplexity::Complex => MxData::ComplexDouble(vec![Complex64::new(0.0, 0.0); n]),
        };
        Self::from_rep(Box::new(NumericRep::new(rows, cols, data)))
    }

    /// Zero-filled array of any class with flat storage
    pub fn create_numeric_array(
        class: MxClassId,
        rows: usize,
        cols: usize,
        complexity: MxComplexity,
    ) -> MexResult<Self> {
        let rep = NumericRep::zeros(class, rows, cols, complexity)?;
        Ok(Self::from_rep(Box::new(rep)))
    }

    pub fn create_logical_matrix(rows: usize, cols: usize) -> Self {
        let rep = NumericRep::new(rows, cols, MxData::Logical(vec![false; rows * cols]));
        Self::from_rep(Box::new(rep))
    }

    pub fn create_double_scalar(x: f64) -> Self {
        Self::from_rep(Box::new(NumericRep::new(1, 1, MxData::Double(vec![x]))))
    }

    pub fn create_logical_scalar(b: bool) -> Self {
        Self::from_rep(Box::new(NumericRep::new(1, 1, MxData::Logical(vec![b]))))
    }

    /// 1xN char array. The empty string is 0x0.
    pub fn create_string(s: &str) -> Self {
        let units: Vec<u16> = s.encode_utf16().collect();
        let (rows, cols) = if units.is_empty() { (0, 0) } else { (1, units.len()) };
        Self::from_rep(Box::new(NumericRep::new(rows, cols, MxData::Char(units))))
    }

    /// Char matrix with one row per string, blank-padded to the longest
    pub fn create_char_matrix<S: AsRef<str>>(lines: &[S]) -> Self {
        let rows: Vec<Vec<u16>> = lines.iter().map(|l| l.as_ref().encode_utf16().collect()).collect();
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let blank = u16::from(b' ');
        let mut units = Vec::with_capacity(rows.len() * cols);
        for j in 0..cols {
            for row in &rows {
                units.push(row.get(j).copied().unwrap_or(blank));
            }
        }
        Self::from_rep(Box::new(NumericRep::new(rows.len(), cols, MxData::Char(units))))
    }

    /// Empty double sparse matrix with room for `nzmax` entries
    pub fn create_sparse(rows: usize, cols: usize, nzmax: usize, complexity: MxComplexity) -> Self {
        Self::from_rep(Box::new(SparseRep::double(rows, cols, nzmax, complexity)))
    }

    pub fn create_sparse_logical(rows: usize, cols: usize, nzmax: usize) -> Self {
        Self::from_rep(Box::new(SparseRep::logical(rows, cols, nzmax)))
    }

    /// Cell array with every element unset
    pub fn create_cell_matrix(rows: usize, cols: usize) -> Self {
        Self::from_rep(Box::new(CellRep::new(rows, cols)))
    }

    pub fn create_struct_matrix<S: AsRef<str>>(rows: usize, cols: usize, fields: &[S]) -> Self {
        Self::from_rep(Box::new(StructRep::new(rows, cols, fields)))
    }

    /// Deep copy, keeping the variable name
    pub fn dup(&self) -> Self {
        Self {
            rep: self.rep.dup(),
            name: self.name.clone(),
            mutations: 0,
        }
    }

    /// Language value with the same contents
    pub fn as_value(&self) -> MexResult<Value> {
        self.rep.as_value()
    }

    // ========== Identity ==========

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = Some(name.into());
    }

    /// How many times the active representation has been replaced
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    // ========== Class predicates ==========

    pub fn class_id(&self) -> MxClassId {
        self.rep.class_id()
    }

    pub fn class_name(&self) -> &'static str {
        self.class_id().name()
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.class_name() == name
    }

    class_predicates! {
        is_cell => Cell,
        is_struct => Struct,
        is_logical => Logical,
        is_char => Char,
        is_double => Double,
        is_single => Single,
        is_int8 => Int8,
        is_uint8 => Uint8,
        is_int16 => Int16,
        is_uint16 => Uint16,
        is_int32 => Int32,
        is_uint32 => Uint32,
        is_int64 => Int64,
        is_uint64 => Uint64,
    }

    pub fn is_numeric(&self) -> bool {
        self.class_id().is_numeric()
    }

    pub fn is_complex(&self) -> bool {
        self.rep.is_complex()
    }

    pub fn is_sparse(&self) -> bool {
        self.rep.is_sparse()
    }

    /// True only while the handle wraps one of the literal-empty sentinels
    pub fn is_null(&self) -> bool {
        self.rep.is_null()
    }

    pub fn is_logical_scalar(&self) -> bool {
        self.is_logical() && self.is_scalar()
    }

    pub fn is_logical_scalar_true(&self) -> bool {
        self.rep.is_logical_scalar_true()
    }

    // ========== Shape ==========

    pub fn dims(&self) -> (usize, usize) {
        self.rep.dims()
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

    /// Bytes per element
    pub fn element_size(&self) -> usize {
        self.class_id()
            .element_size(MxComplexity::from_flag(self.is_complex()))
    }

    /// Column-major linear index of 0-based subscripts.
    ///
    /// Arrays are 2-D, so every dimension past the second has extent 1 and
    /// its subscript must be 0. A subscript outside its extent is an
    /// `IndexOutOfBound` error.
    pub fn calc_single_subscript(&self, subs: &[usize]) -> MexResult<usize> {
        let (rows, cols) = self.dims();
        let extents = [rows, cols].into_iter().chain(std::iter::repeat(1));
        let mut index = 0;
        let mut stride = 1;
        for (&s, extent) in subs.iter().zip(extents) {
            if s >= extent {
                return Err(MexError::out_of_bound("calc_single_subscript", s, extent));
            }
            index += s * stride;
            stride *= extent;
        }
        Ok(index)
    }

    pub fn set_rows(&mut self, rows: usize) -> MexResult<()> {
        let cols = self.cols();
        self.set_dims(rows, cols)
    }

    pub fn set_cols(&mut self, cols: usize) -> MexResult<()> {
        let rows = self.rows();
        self.set_dims(rows, cols)
    }

    pub fn set_dims(&mut self, rows: usize, cols: usize) -> MexResult<()> {
        self.do_mutable("set_dimensions", |rep| rep.set_dims(rows, cols))
    }

    // ========== Scalar and string extraction ==========

    pub fn scalar(&self) -> MexResult<f64> {
        self.rep.scalar()
    }

    /// Character contents, column-major
    pub fn string(&self) -> MexResult<String> {
        self.rep.string()
    }

    // ========== Element data ==========

    pub fn data(&mut self) -> MexResult<&MxData> {
        self.serve("get_data", |rep| rep.data().map(|_| ()))?;
        self.rep.data()
    }

    pub fn data_mut(&mut self) -> MexResult<&mut MxData> {
        self.serve("get_data", |rep| rep.data().map(|_| ()))?;
        self.rep.data_mut()
    }

    /// Replace the element data. The class and complexity must match.
    pub fn set_data(&mut self, data: MxData) -> MexResult<()> {
        self.set_data_as("set_data", data)
    }

    typed_data! {
        doubles, doubles_mut, set_doubles => Double(f64);
        singles, singles_mut, set_singles => Single(f32);
        int8s, int8s_mut, set_int8s => Int8(i8);
        uint8s, uint8s_mut, set_uint8s => Uint8(u8);
        int16s, int16s_mut, set_int16s => Int16(i16);
        uint16s, uint16s_mut, set_uint16s => Uint16(u16);
        int32s, int32s_mut, set_int32s => Int32(i32);
        uint32s, uint32s_mut, set_uint32s => Uint32(u32);
        int64s, int64s_mut, set_int64s => Int64(i64);
        uint64s, uint64s_mut, set_uint64s => Uint64(u64);
        logicals, logicals_mut, set_logicals => Logical(bool);
        chars, chars_mut, set_chars => Char(u16);
        complex_doubles, complex_doubles_mut, set_complex_doubles => ComplexDouble(Complex64);
        complex_singles, complex_singles_mut, set_complex_singles => ComplexSingle(Complex32);
    }

    fn set_data_as(&mut self, accessor: &'static str, data: MxData) -> MexResult<()> {
        self.serve(accessor, |rep| rep.data().map(|_| ()))?;
        self.rep.set_data(data).map_err(|e| rename_accessor(e, accessor))
    }

    // ========== Sparse index arrays ==========

    pub fn ir(&mut self) -> MexResult<&[usize]> {
        self.serve("get_ir", |rep| rep.ir().map(|_| ()))?;
        self.rep.ir()
    }

    pub fn ir_mut(&mut self) -> MexResult<&mut [usize]> {
        self.serve("get_ir", |rep| rep.ir().map(|_| ()))?;
        self.rep.ir_mut()
    }

    pub fn jc(&mut self) -> MexResult<&[usize]> {
        self.serve("get_jc", |rep| rep.jc().map(|_| ()))?;
        self.rep.jc()
    }

    pub fn jc_mut(&mut self) -> MexResult<&mut [usize]> {
        self.serve("get_jc", |rep| rep.jc().map(|_| ()))?;
        self.rep.jc_mut()
    }

    pub fn nzmax(&mut self) -> MexResult<usize> {
        self.do_mutable("get_nzmax", |rep| rep.nzmax())
    }

    pub fn set_ir(&mut self, ir: Vec<usize>) -> MexResult<()> {
        self.serve("set_ir", |rep| rep.ir().map(|_| ()))?;
        self.rep.set_ir(ir)
    }

    pub fn set_jc(&mut self, jc: Vec<usize>) -> MexResult<()> {
        self.serve("set_jc", |rep| rep.jc().map(|_| ()))?;
        self.rep.set_jc(jc)
    }

    pub fn set_nzmax(&mut self, nzmax: usize) -> MexResult<()> {
        self.do_mutable("set_nzmax", |rep| rep.set_nzmax(nzmax))
    }

    // ========== Cells ==========

    /// Element `index` (column-major) of a cell array; `None` when unset
    pub fn cell(&mut self, index: usize) -> MexResult<Option<&MxArray>> {
        self.serve("get_cell", |rep| rep.cell(index).map(|_| ()))?;
        self.rep.cell(index)
    }

    pub fn set_cell(&mut self, index: usize, value: Option<MxArray>) -> MexResult<()> {
        self.serve("set_cell", |rep| rep.cell(index).map(|_| ()))?;
        self.rep.set_cell(index, value)
    }

    // ========== Struct fields ==========

    pub fn field_count(&mut self) -> MexResult<usize> {
        self.do_mutable("get_number_of_fields", |rep| rep.field_count())
    }

    pub fn field_name(&mut self, key: usize) -> MexResult<&str> {
        self.serve("get_field_name_by_number", |rep| rep.field_name(key).map(|_| ()))?;
        self.rep.field_name(key)
    }

    pub fn field_number(&mut self, name: &str) -> MexResult<Option<usize>> {
        self.do_mutable("get_field_number", |rep| rep.field_number(name))
    }

    /// Add a field, returning its number. An existing field is left as is.
    pub fn add_field(&mut self, name: &str) -> MexResult<usize> {
        self.do_mutable("add_field", |rep| rep.add_field(name))
    }

    pub fn remove_field(&mut self, key: usize) -> MexResult<()> {
        self.do_mutable("remove_field", |rep| rep.remove_field(key))
    }

    pub fn field(&mut self, index: usize, key: usize) -> MexResult<Option<&MxArray>> {
        self.serve("get_field_by_number", |rep| rep.field(index, key).map(|_| ()))?;
        self.rep.field(index, key)
    }

    pub fn set_field(&mut self, index: usize, key: usize, value: Option<MxArray>) -> MexResult<()> {
        self.serve("set_field_by_number", |rep| rep.field(index, key).map(|_| ()))?;
        self.rep.set_field(index, key, value)
    }

    /// Field `name` of element `index`; `None` when the field is unset or
    /// does not exist
    pub fn field_by_name(&mut self, index: usize, name: &str) -> MexResult<Option<&MxArray>> {
        match self.field_number(name)? {
            Some(key) => self.field(index, key),
            None => Ok(None),
        }
    }

    /// Set field `name` of element `index`, adding the field if needed
    pub fn set_field_by_name(&mut self, index: usize, name: &str, value: Option<MxArray>) -> MexResult<()> {
        let key = self.add_field(name)?;
        self.set_field(index, key, value)
    }

    // ========== Operators ==========

    /// Apply a binary operator through the dispatch engine
    pub fn binary_op(&self, ctx: &DispatchContext, op: BinaryOp, rhs: &MxArray) -> MexResult<MxArray> {
        let result = ctx.binary_op(op, &self.as_value()?, &rhs.as_value()?)?;
        Ok(MxArray::from_value(result))
    }

    /// Apply a unary operator through the dispatch engine
    pub fn unary_op(&self, ctx: &DispatchContext, op: UnaryOp) -> MexResult<MxArray> {
        let result = ctx.unary_op(op, &self.as_value()?)?;
        Ok(MxArray::from_value(result))
    }

    // ========== Mutate and retry ==========

    /// Run `f` against the active representation. If it raises the mutation
    /// flag, swap in the mutated representation and run `f` once more.
    fn do_mutable<R>(
        &mut self,
        accessor: &'static str,
        f: impl Fn(&mut dyn MxRep) -> MexResult<R>,
    ) -> MexResult<R> {
        let first = f(self.rep.as_mut());
        if !self.rep.mutation_needed() {
            trace!(accessor, "served by active representation");
            return first;
        }
        self.mutate(accessor)?;
        let retried = f(self.rep.as_mut());
        if self.rep.mutation_needed() {
            error!(
                accessor,
                class = %self.rep.class_id(),
                "representation requested a second mutation"
            );
            return Err(MexError::RepresentationInvariant {
                accessor,
                reason: "mutation requested twice",
            });
        }
        retried
    }

    /// `do_mutable` for accessors that hand out borrows: `probe` only has
    /// to succeed on a representation able to serve the real call
    fn serve(&mut self, accessor: &'static str, probe: impl Fn(&mut dyn MxRep) -> MexResult<()>) -> MexResult<()> {
        self.do_mutable(accessor, probe)
            .map_err(|e| rename_accessor(e, accessor))
    }

    fn mutate(&mut self, accessor: &'static str) -> MexResult<()> {
        match self.rep.mutate() {
            Some(rep) => {
                debug!(
                    accessor,
                    from = %self.rep.class_id(),
                    to = %rep.class_id(),
                    "replacing array representation"
                );
                self.rep = rep;
                self.mutations += 1;
                Ok(())
            }
            None => {
                error!(accessor, "representation requested mutation without a replacement");
                Err(MexError::RepresentationInvariant {
                    accessor,
                    reason: "mutation requested without a replacement",
                })
            }
        }
    }
}

/// Report an invalid-type failure under the accessor the caller used
fn rename_accessor(err: MexError, accessor: &'static str) -> MexError {
    match err {
        MexError::InvalidType { class, .. } => MexError::InvalidType { accessor, class },
        other => other,
    }
}

impl From<Value> for MxArray {
    fn from(value: Value) -> Self {
        MxArray::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_handle_answers_predicates_without_mutation() {
        let a = MxArray::from_value(Value::matrix_from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        assert!(a.is_double());
        assert!(a.is_numeric());
        assert!(!a.is_complex());
        assert_eq!(a.dims(), (2, 3));
        assert_eq!(a.scalar().unwrap(), 1.0);
        assert_eq!(a.mutation_count(), 0);
    }

    #[test]
    fn test_doubles_mutates_once() {
        let mut a = MxArray::from_value(Value::matrix_from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(a.doubles().unwrap(), &[1.0, 3.0, 2.0, 4.0]);
        assert_eq!(a.mutation_count(), 1);
        a.doubles_mut().unwrap()[0] = 10.0;
        assert_eq!(a.mutation_count(), 1);
        assert_eq!(
            a.as_value().unwrap(),
            Value::matrix_from_rows(2, 2, &[10.0, 2.0, 3.0, 4.0])
        );
    }

    #[test]
    fn test_wrong_typed_getter_reports_caller_accessor() {
        let mut a = MxArray::create_double_scalar(1.0);
        assert_eq!(
            a.int8s().unwrap_err(),
            MexError::InvalidType {
                accessor: "get_int8s",
                class: "double"
            }
        );
        let mut c = MxArray::create_cell_matrix(1, 1);
        assert_eq!(
            c.set_doubles(vec![1.0]).unwrap_err(),
            MexError::InvalidType {
                accessor: "set_doubles",
                class: "cell"
            }
        );
    }

    #[test]
    fn test_calc_single_subscript() {
        let a = MxArray::create_double_matrix(3, 4, MxComplexity::Real);
        assert_eq!(a.calc_single_subscript(&[2, 1]).unwrap(), 5);
        assert_eq!(a.calc_single_subscript(&[1]).unwrap(), 1);
        assert_eq!(a.calc_single_subscript(&[0, 3, 0]).unwrap(), 9);
    }

    #[test]
    fn test_calc_single_subscript_rejects_out_of_range() {
        let a = MxArray::create_double_matrix(3, 4, MxComplexity::Real);
        assert_eq!(
            a.calc_single_subscript(&[3, 0]).unwrap_err(),
            MexError::out_of_bound("calc_single_subscript", 3, 3)
        );
        assert_eq!(
            a.calc_single_subscript(&[0, 4]).unwrap_err(),
            MexError::out_of_bound("calc_single_subscript", 4, 4)
        );
        // trailing dimensions of a 2-D array are singletons
        assert_eq!(
            a.calc_single_subscript(&[0, 3, 7]).unwrap_err(),
            MexError::out_of_bound("calc_single_subscript", 7, 1)
        );
    }

    #[test]
    fn test_char_matrix_is_padded() {
        let a = MxArray::create_char_matrix(&["ab", "c"]);
        assert_eq!(a.dims(), (2, 2));
        assert_eq!(a.string().unwrap(), "acb ");
    }

    #[test]
    fn test_dup_keeps_name_and_contents() {
        let mut a = MxArray::create_string("xyz");
        a.set_name("s");
        let b = a.dup();
        assert_eq!(b.name(), Some("s"));
        assert_eq!(b.string().unwrap(), "xyz");
        assert_eq!(b.mutation_count(), 0);
    }

    #[test]
    fn test_empty_string_is_zero_by_zero() {
        let a = MxArray::create_string("");
        assert!(a.is_char());
        assert_eq!(a.dims(), (0, 0));
    }
}
