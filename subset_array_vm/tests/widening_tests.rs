//! Single-step widening: equivalence with manual conversion, the one-hop
//! limit, candidate order and the configuration switches.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use subset_array_vm::value::{DiagMatrix, DMatrix};
use subset_array_vm::{
    BinaryOp, CatDim, ContextBuilder, DispatchConfig, DispatchResult, TypeGroup, UnaryOp, Value,
    ValueKind, WideningOrder,
};

fn tag_left(_: &Value, _: &Value) -> DispatchResult<Value> {
    Ok(Value::string("left widened"))
}

fn tag_right(_: &Value, _: &Value) -> DispatchResult<Value> {
    Ok(Value::string("right widened"))
}

fn tag_both(_: &Value, _: &Value) -> DispatchResult<Value> {
    Ok(Value::string("both widened"))
}

fn to_complex(v: &Value) -> DispatchResult<Value> {
    Ok(Value::ComplexMatrix(
        v.to_complex_dense().unwrap_or_else(|| DMatrix::zeros(0, 0)),
    ))
}

fn to_matrix(v: &Value) -> DispatchResult<Value> {
    Ok(Value::Matrix(v.to_real_dense().unwrap_or_else(|| DMatrix::zeros(0, 0))))
}

// ==================== Built-in widening ====================

#[test]
fn test_widening_matches_manual_conversion() {
    init_tracing();
    let ctx = builtin();
    let m = row(&[1.0, 2.0]);
    let cm = complex_row(&[(0.0, 1.0), (1.0, 1.0)]);

    let widened = ctx.binary_op(BinaryOp::Add, &m, &cm).unwrap();
    let manual = ctx.convert_to(&m, "complex matrix").unwrap();
    let direct = ctx.binary_op(BinaryOp::Add, &manual, &cm).unwrap();
    assert_eq!(widened, direct);
    assert_eq!(widened, complex_row(&[(1.0, 1.0), (3.0, 1.0)]));
}

#[test]
fn test_right_operand_widened_when_left_has_no_edge() {
    let ctx = builtin();
    let out = ctx
        .binary_op(BinaryOp::Sub, &complex_row(&[(3.0, 1.0)]), &row(&[1.0]))
        .unwrap();
    assert_eq!(out, complex_row(&[(2.0, 1.0)]));
}

#[test]
fn test_both_operands_widened() {
    let ctx = builtin();
    // bool -> matrix and string -> matrix
    let out = ctx.binary_op(BinaryOp::Add, &bools(&[true]), &Value::string("a")).unwrap();
    assert_eq!(out, Value::scalar(98.0));
}

#[test]
fn test_diagonal_falls_back_to_full_kernel() {
    let ctx = builtin();
    let d = Value::DiagMatrix(DiagMatrix::from_diagonal(&[1.0, 2.0]));
    let out = ctx
        .binary_op(BinaryOp::ElMul, &d, &mat(2, 2, &[5.0, 5.0, 5.0, 5.0]))
        .unwrap();
    assert_eq!(out, mat(2, 2, &[5.0, 0.0, 0.0, 10.0]));
}

#[test]
fn test_unary_widens_once() {
    let ctx = builtin();
    let out = ctx.unary_op(UnaryOp::UMinus, &bools(&[true, false])).unwrap();
    assert_eq!(out, row(&[-1.0, -0.0]));
}

#[test]
fn test_concat_widens() {
    let ctx = builtin();
    let out = ctx
        .concat(&row(&[1.0]), &complex_row(&[(2.0, 1.0)]), CatDim::Horizontal)
        .unwrap();
    assert_eq!(out, complex_row(&[(1.0, 0.0), (2.0, 1.0)]));
}

// ==================== One hop only ====================

#[test]
fn test_no_chained_widening() {
    let mut builder = ContextBuilder::new();
    let b = builder.register_value_type(ValueKind::BoolMatrix, TypeGroup::Logical).unwrap();
    let m = builder.register_value_type(ValueKind::Matrix, TypeGroup::Dense).unwrap();
    let cm = builder
        .register_value_type(ValueKind::ComplexMatrix, TypeGroup::Dense)
        .unwrap();
    builder.install_widen(b, m, to_matrix).unwrap();
    builder.install_widen(m, cm, to_complex).unwrap();
    // only reachable from bool through two hops
    builder.install_binary(BinaryOp::Add, cm, cm, tag_both).unwrap();
    let ctx = builder.build();

    let err = ctx
        .binary_op(BinaryOp::Add, &bools(&[true]), &complex_row(&[(1.0, 0.0)]))
        .unwrap_err();
    assert!(err.is_unsupported());
}

// ==================== Candidate order ====================

fn ambiguous(config: DispatchConfig) -> subset_array_vm::DispatchContext {
    let mut builder = ContextBuilder::with_config(config);
    let b = builder.register_value_type(ValueKind::BoolMatrix, TypeGroup::Logical).unwrap();
    let s = builder.register_value_type(ValueKind::String, TypeGroup::Character).unwrap();
    let m = builder.register_value_type(ValueKind::Matrix, TypeGroup::Dense).unwrap();
    builder.install_widen(b, m, to_matrix).unwrap();
    builder.install_widen(s, m, to_matrix).unwrap();
    builder.install_binary(BinaryOp::Add, m, s, tag_left).unwrap();
    builder.install_binary(BinaryOp::Add, b, m, tag_right).unwrap();
    builder.install_binary(BinaryOp::Add, m, m, tag_both).unwrap();
    builder.build()
}

#[test]
fn test_left_first_by_default() {
    let ctx = ambiguous(DispatchConfig::default());
    let out = ctx.binary_op(BinaryOp::Add, &bools(&[true]), &Value::string("x")).unwrap();
    assert_eq!(out, Value::string("left widened"));
}

#[test]
fn test_right_first_configurable() {
    let ctx = ambiguous(DispatchConfig {
        widening: WideningOrder::RightFirst,
        ..DispatchConfig::default()
    });
    let out = ctx.binary_op(BinaryOp::Add, &bools(&[true]), &Value::string("x")).unwrap();
    assert_eq!(out, Value::string("right widened"));
}

#[test]
fn test_single_side_preferred_over_both() {
    let mut builder = ContextBuilder::new();
    let b = builder.register_value_type(ValueKind::BoolMatrix, TypeGroup::Logical).unwrap();
    let s = builder.register_value_type(ValueKind::String, TypeGroup::Character).unwrap();
    let m = builder.register_value_type(ValueKind::Matrix, TypeGroup::Dense).unwrap();
    builder.install_widen(b, m, to_matrix).unwrap();
    builder.install_widen(s, m, to_matrix).unwrap();
    builder.install_binary(BinaryOp::Add, b, m, tag_right).unwrap();
    builder.install_binary(BinaryOp::Add, m, m, tag_both).unwrap();
    let ctx = builder.build();

    let out = ctx.binary_op(BinaryOp::Add, &bools(&[true]), &Value::string("x")).unwrap();
    assert_eq!(out, Value::string("right widened"));
}

// ==================== Configuration switches ====================

#[test]
fn test_widening_disabled() {
    let ctx = builtin_with(DispatchConfig {
        allow_widening: false,
        ..DispatchConfig::default()
    });
    let err = ctx
        .binary_op(BinaryOp::Add, &row(&[1.0]), &complex_row(&[(1.0, 1.0)]))
        .unwrap_err();
    assert!(err.is_unsupported());
    // the direct path still works
    assert_eq!(
        ctx.binary_op(BinaryOp::Add, &row(&[1.0]), &row(&[2.0])).unwrap(),
        Value::scalar(3.0)
    );
}

#[test]
fn test_narrow_results() {
    let ctx = builtin_with(DispatchConfig {
        narrow_results: true,
        ..DispatchConfig::default()
    });
    let out = ctx
        .binary_op(
            BinaryOp::Add,
            &complex_row(&[(1.0, 2.0)]),
            &complex_row(&[(1.0, -2.0)]),
        )
        .unwrap();
    assert_eq!(out, Value::scalar(2.0));

    // default configuration keeps the complex result
    let plain = builtin()
        .binary_op(
            BinaryOp::Add,
            &complex_row(&[(1.0, 2.0)]),
            &complex_row(&[(1.0, -2.0)]),
        )
        .unwrap();
    assert_eq!(plain, complex_row(&[(2.0, 0.0)]));
}

#[test]
fn test_config_from_toml_drives_context() {
    let config = DispatchConfig::from_toml_str("widening = \"right-first\"").unwrap();
    let ctx = ambiguous(config);
    let out = ctx.binary_op(BinaryOp::Add, &bools(&[true]), &Value::string("x")).unwrap();
    assert_eq!(out, Value::string("right widened"));
}
