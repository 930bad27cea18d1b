//! Shared helpers for integration tests
// Each integration test target uses a different subset of these helpers.
#![allow(dead_code)]

use subset_array_vm::value::{Complex64, DMatrix, SparseMatrix};
use subset_array_vm::{ContextBuilder, DispatchConfig, DispatchContext, Value};

/// Context with every built-in type and kernel, default configuration
pub fn builtin() -> DispatchContext {
    DispatchContext::builtin().unwrap_or_else(|e| panic!("built-in context failed: {}", e))
}

/// Built-in context with an explicit configuration
pub fn builtin_with(config: DispatchConfig) -> DispatchContext {
    ContextBuilder::builtin_with_config(config)
        .unwrap_or_else(|e| panic!("built-in context failed: {}", e))
        .build()
}

/// Route `tracing` output through the test harness. Safe to call from
/// every test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn row(data: &[f64]) -> Value {
    Value::matrix_from_rows(1, data.len(), data)
}

pub fn mat(rows: usize, cols: usize, data: &[f64]) -> Value {
    Value::matrix_from_rows(rows, cols, data)
}

/// Complex row vector from (re, im) pairs
pub fn complex_row(data: &[(f64, f64)]) -> Value {
    let values: Vec<Complex64> = data.iter().map(|&(re, im)| Complex64::new(re, im)).collect();
    Value::ComplexMatrix(DMatrix::from_row_slice(1, values.len(), &values))
}

pub fn bools(data: &[bool]) -> Value {
    Value::BoolMatrix(DMatrix::from_row_slice(1, data.len(), data))
}

pub fn ints(data: &[i32]) -> Value {
    Value::Int32Matrix(DMatrix::from_row_slice(1, data.len(), data))
}

pub fn sparse(rows: usize, cols: usize, data: &[f64]) -> Value {
    Value::SparseMatrix(SparseMatrix::from_dense(&DMatrix::from_row_slice(rows, cols, data)))
}

/// Sparse complex row vector from (re, im) pairs
pub fn sparse_complex_row(data: &[(f64, f64)]) -> Value {
    let values: Vec<Complex64> = data.iter().map(|&(re, im)| Complex64::new(re, im)).collect();
    Value::SparseComplexMatrix(SparseMatrix::from_dense(&DMatrix::from_row_slice(
        1,
        values.len(),
        &values,
    )))
}
