//! Literal-empty sentinels: identity, storable clones, concatenation and
//! deletion.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use subset_array_vm::value::CellArray;
use subset_array_vm::{AssignOp, CatDim, NullKind, Value, ValueKind};

#[test]
fn test_sentinel_is_singleton() {
    assert!(std::ptr::eq(Value::null_matrix(), Value::null_matrix()));
    assert!(std::ptr::eq(Value::null_str(), NullKind::Str.instance()));
    assert!(!std::ptr::eq(Value::null_str(), Value::null_sq_str()));
}

#[test]
fn test_only_sentinels_are_null() {
    assert!(Value::null_matrix().is_null());
    assert!(Value::null_str().is_null());
    assert!(Value::null_sq_str().is_null());

    let ordinary = Value::Matrix(subset_array_vm::value::DMatrix::zeros(0, 0));
    assert!(!ordinary.is_null());
    assert!(!Value::string("").is_null());
    assert!(!Value::null_matrix().storable_value().is_null());
}

#[test]
fn test_storable_clone_keeps_declared_type() {
    assert_eq!(Value::null_matrix().storable_value().kind(), ValueKind::Matrix);
    assert_eq!(Value::null_str().storable_value().kind(), ValueKind::String);
    assert_eq!(Value::null_sq_str().storable_value().kind(), ValueKind::SqString);
}

#[test]
fn test_assigning_into_sentinel_clones_first() {
    let ctx = builtin();
    let mut lhs = Value::null_matrix().clone();
    ctx.assign_op(AssignOp::AsnEq, &mut lhs, &[1], &Value::scalar(4.0)).unwrap();
    assert!(!lhs.is_null());
    assert_eq!(lhs, row(&[0.0, 4.0]));
    // the process-wide instance is untouched
    assert_eq!(Value::null_matrix().dims(), (0, 0));
    assert!(Value::null_matrix().is_null());
}

#[test]
fn test_concat_skips_sentinels() {
    let ctx = builtin();
    let a = row(&[1.0, 2.0]);
    assert_eq!(ctx.concat(&a, Value::null_matrix(), CatDim::Horizontal).unwrap(), a);
    assert_eq!(ctx.concat(Value::null_matrix(), &a, CatDim::Vertical).unwrap(), a);

    let s = Value::sq_string("abc");
    assert_eq!(ctx.concat(Value::null_str(), &s, CatDim::Horizontal).unwrap(), s);
}

#[test]
fn test_concat_of_two_sentinels_is_ordinary() {
    let ctx = builtin();
    let out = ctx
        .concat(Value::null_matrix(), Value::null_matrix(), CatDim::Horizontal)
        .unwrap();
    assert!(!out.is_null());
    assert_eq!(out.dims(), (0, 0));
}

#[test]
fn test_sentinel_rhs_deletes() {
    let ctx = builtin();
    let mut a = row(&[1.0, 2.0, 3.0, 4.0]);
    ctx.assign_op(AssignOp::AsnEq, &mut a, &[0, 2], Value::null_matrix()).unwrap();
    assert_eq!(a, row(&[2.0, 4.0]));

    let mut s = Value::string("hello");
    ctx.assign_op(AssignOp::AsnEq, &mut s, &[0], Value::null_sq_str()).unwrap();
    assert_eq!(s, Value::string("ello"));
}

#[test]
fn test_ordinary_empty_rhs_does_not_delete() {
    let ctx = builtin();
    let mut a = row(&[1.0, 2.0]);
    let ordinary = Value::null_matrix().storable_value();
    assert!(ctx.assign_op(AssignOp::AsnEq, &mut a, &[0], &ordinary).is_err());
    assert_eq!(a, row(&[1.0, 2.0]));
}

#[test]
fn test_cell_deletion() {
    let ctx = builtin();
    let mut c = Value::Cell(CellArray::row(vec![
        Value::scalar(1.0),
        Value::string("two"),
        Value::scalar(3.0),
    ]));
    ctx.assign_op(AssignOp::AsnEq, &mut c, &[1], Value::null_matrix()).unwrap();
    assert_eq!(
        c,
        Value::Cell(CellArray::row(vec![Value::scalar(1.0), Value::scalar(3.0)]))
    );
}

#[test]
fn test_null_string_widens_to_ordinary_string() {
    let ctx = builtin();
    let out = ctx.convert_to(Value::null_str(), "string").unwrap();
    assert_eq!(out.kind(), ValueKind::String);
    assert!(!out.is_null());
}
