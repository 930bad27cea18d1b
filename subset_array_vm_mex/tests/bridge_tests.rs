//! MxArray handle: lazy mutation, invariant checks, sentinels and the
//! per-class accessors.

use pretty_assertions::assert_eq;
use subset_array_vm::value::{CellArray, DMatrix, SparseMatrix};
use subset_array_vm::{BinaryOp, DispatchContext, DispatchError, Value};
use subset_array_vm_mex::{MexError, MexResult, MxArray, MxClassId, MxComplexity, MxData, MxRep};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn builtin() -> DispatchContext {
    DispatchContext::builtin().unwrap_or_else(|e| panic!("built-in context failed: {}", e))
}

/// Representation that asks for mutation and mutates into itself
#[derive(Debug)]
struct Stubborn;

impl MxRep for Stubborn {
    fn dup(&self) -> Box<dyn MxRep> {
        Box::new(Stubborn)
    }

    fn class_id(&self) -> MxClassId {
        MxClassId::Double
    }

    fn dims(&self) -> (usize, usize) {
        (1, 1)
    }

    fn as_value(&self) -> MexResult<Value> {
        Ok(Value::scalar(0.0))
    }

    fn mutation_needed(&self) -> bool {
        true
    }

    fn mutate(&self) -> Option<Box<dyn MxRep>> {
        Some(Box::new(Stubborn))
    }
}

/// Representation that asks for mutation but has nothing to offer
#[derive(Debug)]
struct Stranded;

impl MxRep for Stranded {
    fn dup(&self) -> Box<dyn MxRep> {
        Box::new(Stranded)
    }

    fn class_id(&self) -> MxClassId {
        MxClassId::Double
    }

    fn dims(&self) -> (usize, usize) {
        (1, 1)
    }

    fn as_value(&self) -> MexResult<Value> {
        Ok(Value::scalar(0.0))
    }

    fn mutation_needed(&self) -> bool {
        true
    }
}

// ==================== Mutate and retry ====================

#[test]
fn test_full_only_accessor_mutates_once() {
    init_tracing();
    let mut a = MxArray::from_value(Value::matrix_from_rows(1, 3, &[1.0, 2.0, 3.0]));
    assert_eq!(a.mutation_count(), 0);

    assert_eq!(a.doubles().unwrap(), &[1.0, 2.0, 3.0]);
    assert_eq!(a.mutation_count(), 1);

    // later calls are served by the full representation
    a.set_doubles(vec![4.0, 5.0, 6.0]).unwrap();
    assert_eq!(a.doubles().unwrap(), &[4.0, 5.0, 6.0]);
    a.set_dims(3, 1).unwrap();
    assert_eq!(a.mutation_count(), 1);
    assert_eq!(a.as_value().unwrap(), Value::matrix_from_rows(3, 1, &[4.0, 5.0, 6.0]));
}

#[test]
fn test_cheap_accessors_never_mutate() {
    let a = MxArray::from_value(Value::string("abc"));
    assert!(a.is_char());
    assert!(!a.is_numeric());
    assert_eq!(a.dims(), (1, 3));
    assert_eq!(a.string().unwrap(), "abc");
    assert_eq!(a.element_size(), 2);
    assert_eq!(a.mutation_count(), 0);
}

#[test]
fn test_second_mutation_request_is_invariant_violation() {
    init_tracing();
    let mut a = MxArray::from_rep(Box::new(Stubborn));
    let err = a.doubles().unwrap_err();
    assert!(err.is_invariant_violation());
    assert_eq!(
        err,
        MexError::RepresentationInvariant {
            accessor: "get_doubles",
            reason: "mutation requested twice",
        }
    );
    // the single permitted swap did happen
    assert_eq!(a.mutation_count(), 1);
}

#[test]
fn test_mutation_request_without_replacement() {
    let mut a = MxArray::from_rep(Box::new(Stranded));
    let err = a.set_dims(2, 2).unwrap_err();
    assert!(err.is_invariant_violation());
    assert_eq!(a.mutation_count(), 0);
}

#[test]
fn test_accessor_invalid_after_mutation_reports_class() {
    let mut a = MxArray::from_value(Value::scalar(1.0));
    assert_eq!(
        a.cell(0).unwrap_err(),
        MexError::InvalidType {
            accessor: "get_cell",
            class: "double",
        }
    );
    assert_eq!(a.mutation_count(), 1);
}

#[test]
fn test_dup_has_independent_representation() {
    let mut a = MxArray::from_value(Value::matrix_from_rows(1, 2, &[1.0, 2.0]));
    let b = a.dup();
    a.doubles_mut().unwrap()[1] = 9.0;
    assert_eq!(b.mutation_count(), 0);
    assert_eq!(b.as_value().unwrap(), Value::matrix_from_rows(1, 2, &[1.0, 2.0]));
}

// ==================== Sentinels ====================

#[test]
fn test_sentinel_handle_loses_null_status_on_mutation() {
    let mut a = MxArray::from_value(Value::null_matrix().clone());
    assert!(a.is_null());
    assert!(a.is_empty());

    a.set_dims(1, 2).unwrap();
    assert!(!a.is_null());
    assert!(a.is_double());
    assert_eq!(a.as_value().unwrap(), Value::Matrix(DMatrix::zeros(1, 2)));

    // the process-wide instance is untouched
    assert!(Value::null_matrix().is_null());
}

#[test]
fn test_null_string_keeps_declared_class() {
    let mut s = MxArray::from_value(Value::null_str().clone());
    assert!(s.is_char());
    assert_eq!(s.string().unwrap(), "");
    assert!(s.chars().unwrap().is_empty());
    assert!(!s.is_null());
    assert!(s.is_char());
}

// ==================== Per-class accessors ====================

#[test]
fn test_sparse_value_exposes_index_arrays() {
    // [1 0; 0 2; 3 0]
    let dense = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 0.0, 2.0, 3.0, 0.0]);
    let mut a = MxArray::from_value(Value::SparseMatrix(SparseMatrix::from_dense(&dense)));
    assert!(a.is_sparse());
    assert_eq!(a.mutation_count(), 0);

    assert_eq!(a.jc().unwrap(), &[0, 2, 3]);
    assert_eq!(a.ir().unwrap(), &[0, 2, 1]);
    assert_eq!(a.doubles().unwrap(), &[1.0, 3.0, 2.0]);
    assert_eq!(a.nzmax().unwrap(), 3);
    assert_eq!(a.mutation_count(), 1);
}

#[test]
fn test_sparse_built_by_caller() {
    let mut a = MxArray::create_sparse(2, 2, 1, MxComplexity::Real);
    a.ir_mut().unwrap()[0] = 1;
    a.jc_mut().unwrap().copy_from_slice(&[0, 0, 1]);
    a.doubles_mut().unwrap()[0] = 7.0;
    let expected = SparseMatrix::from_dense(&DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 0.0, 7.0]));
    assert_eq!(a.as_value().unwrap(), Value::SparseMatrix(expected));
}

#[test]
fn test_sparse_with_non_monotone_jc_is_invalid_data() {
    let mut a = MxArray::create_sparse(2, 2, 2, MxComplexity::Real);
    a.set_ir(vec![0, 1]).unwrap();
    a.set_doubles(vec![1.0, 2.0]).unwrap();
    a.set_jc(vec![0, 5, 2]).unwrap();
    assert!(matches!(
        a.as_value(),
        Err(MexError::InvalidData {
            accessor: "as_value",
            ..
        })
    ));
}

#[test]
fn test_cell_value_elements() {
    let value = Value::Cell(CellArray::row(vec![Value::scalar(1.0), Value::string("two")]));
    let mut a = MxArray::from_value(value);
    assert!(a.is_cell());

    let second = a.cell(1).unwrap().map(|c| c.string().unwrap());
    assert_eq!(second, Some("two".to_string()));

    a.set_cell(0, None).unwrap();
    let back = a.as_value().unwrap();
    assert_eq!(
        back,
        Value::Cell(CellArray::row(vec![
            Value::Matrix(DMatrix::zeros(0, 0)),
            Value::string("two"),
        ]))
    );
}

#[test]
fn test_struct_fields_by_name() {
    let mut s = MxArray::create_struct_matrix(1, 1, &["alpha"]);
    assert!(s.is_struct());
    s.set_field_by_name(0, "beta", Some(MxArray::create_double_scalar(2.0)))
        .unwrap();
    assert_eq!(s.field_count().unwrap(), 2);
    assert_eq!(s.field_name(1).unwrap(), "beta");

    let beta = s.field_by_name(0, "beta").unwrap().map(|f| f.scalar().unwrap());
    assert_eq!(beta, Some(2.0));
    assert!(s.field_by_name(0, "alpha").unwrap().is_none());
    assert!(s.field_by_name(0, "gamma").unwrap().is_none());
    assert!(s.as_value().is_err());
}

#[test]
fn test_numeric_array_of_integer_class() {
    let mut a = MxArray::create_numeric_array(MxClassId::Uint8, 1, 3, MxComplexity::Real).unwrap();
    assert!(a.is_uint8());
    a.set_uint8s(vec![1, 200, 255]).unwrap();
    assert_eq!(
        a.as_value().unwrap(),
        Value::Int32Matrix(DMatrix::from_row_slice(1, 3, &[1, 200, 255]))
    );
    assert!(MxArray::create_numeric_array(MxClassId::Int8, 1, 1, MxComplexity::Complex).is_err());
}

#[test]
fn test_complex_data_is_interleaved() {
    let mut a = MxArray::from_value(Value::complex_scalar(1.0, -2.0));
    assert!(a.is_complex());
    let z = a.complex_doubles().unwrap();
    assert_eq!((z[0].re, z[0].im), (1.0, -2.0));
    assert_eq!(a.element_size(), 16);
}

#[test]
fn test_logical_scalar() {
    let t = MxArray::from_value(Value::bool_scalar(true));
    assert!(t.is_logical_scalar());
    assert!(t.is_logical_scalar_true());
    let f = MxArray::create_logical_scalar(false);
    assert!(f.is_logical_scalar());
    assert!(!f.is_logical_scalar_true());
}

#[test]
fn test_set_data_rejects_other_class() {
    let mut a = MxArray::create_double_matrix(1, 1, MxComplexity::Real);
    assert!(a.set_data(MxData::Single(vec![1.0])).is_err());
    a.set_data(MxData::Double(vec![3.0])).unwrap();
    assert_eq!(a.scalar().unwrap(), 3.0);
}

// ==================== Dispatch through the bridge ====================

#[test]
fn test_binary_op_on_handles() {
    let ctx = builtin();
    let mut a = MxArray::create_double_matrix(1, 2, MxComplexity::Real);
    a.set_doubles(vec![1.0, 2.0]).unwrap();
    let b = MxArray::from_value(Value::complex_scalar(0.0, 1.0));

    let sum = a.binary_op(&ctx, BinaryOp::Add, &b).unwrap();
    assert!(sum.is_complex());
    assert_eq!(sum.dims(), (1, 2));
    assert_eq!(sum.mutation_count(), 0);
}

#[test]
fn test_dispatch_failure_surfaces_unchanged() {
    let ctx = builtin();
    let cell = MxArray::create_cell_matrix(1, 1);
    let err = cell
        .binary_op(&ctx, BinaryOp::Mul, &MxArray::create_double_scalar(1.0))
        .unwrap_err();
    match err {
        MexError::Dispatch(e @ DispatchError::UnsupportedOperator { .. }) => {
            assert_eq!(e.to_string(), "cell: matrix failed for operator *");
        }
        other => panic!("expected unsupported operator, got {:?}", other),
    }
}
