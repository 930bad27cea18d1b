use super::*;
use crate::error::{ConfigError, DispatchError, DispatchResult};
use crate::value::{DMatrix, Value, ValueKind};

fn to_complex(v: &Value) -> DispatchResult<Value> {
    Ok(Value::ComplexMatrix(v.to_complex_dense().unwrap_or_else(|| DMatrix::zeros(0, 0))))
}

fn decline(_: &Value) -> Option<Value> {
    None
}

#[test]
fn test_ids_are_dense_and_ordered() {
    let mut reg = TypeRegistry::new();
    let a = reg.register_type("a", TypeGroup::Other).unwrap();
    let b = reg.register_type("b", TypeGroup::Other).unwrap();
    assert_eq!(a.raw(), 0);
    assert_eq!(b.raw(), 1);
    assert!(a < b);
    assert_eq!(reg.len(), 2);
}

#[test]
fn test_duplicate_name_rejected() {
    let mut reg = TypeRegistry::new();
    reg.register_type("matrix", TypeGroup::Dense).unwrap();
    let err = reg.register_type("matrix", TypeGroup::Sparse).unwrap_err();
    assert_eq!(err, ConfigError::DuplicateType("matrix".to_string()));
    assert_eq!(reg.len(), 1);
}

#[test]
fn test_lookup_and_name_of() {
    let mut reg = TypeRegistry::new();
    let id = reg.register_value_type(ValueKind::Cell, TypeGroup::Cell).unwrap();
    assert_eq!(reg.lookup("cell"), Some(id));
    assert_eq!(reg.name_of(id), "cell");
    assert_eq!(reg.lookup("struct"), None);
    assert!(matches!(reg.require("struct"), Err(ConfigError::UnknownTypeName(_))));
    assert_eq!(reg.name_of(TypeId::from_raw(99)), "<unknown type>");
}

#[test]
fn test_type_of_is_stable() {
    let mut reg = TypeRegistry::new();
    let m = reg.register_value_type(ValueKind::Matrix, TypeGroup::Dense).unwrap();
    let v = Value::scalar(1.0);
    assert_eq!(reg.type_of(&v).unwrap(), m);
    assert_eq!(reg.type_of(&v).unwrap(), m);
    assert_eq!(reg.type_of(&Value::matrix_from_rows(2, 2, &[0.0; 4])).unwrap(), m);
}

#[test]
fn test_type_of_unregistered_kind() {
    let reg = TypeRegistry::new();
    let err = reg.type_of(&Value::string("x")).unwrap_err();
    assert_eq!(err, DispatchError::UnregisteredType("string".to_string()));
}

#[test]
fn test_sentinels_have_their_own_types() {
    let mut reg = TypeRegistry::new();
    let m = reg.register_value_type(ValueKind::Matrix, TypeGroup::Dense).unwrap();
    let n = reg.register_value_type(ValueKind::NullMatrix, TypeGroup::Null).unwrap();
    assert_eq!(reg.type_of(Value::null_matrix()).unwrap(), n);
    assert_eq!(reg.type_of(&Value::null_matrix().storable_value()).unwrap(), m);
}

#[test]
fn test_widen_edge_replaced_by_later_install() {
    let mut reg = TypeRegistry::new();
    let m = reg.register_type("m", TypeGroup::Dense).unwrap();
    let cm = reg.register_type("cm", TypeGroup::Dense).unwrap();
    let other = reg.register_type("other", TypeGroup::Other).unwrap();
    reg.set_widen(m, cm, to_complex).unwrap();
    assert_eq!(reg.widen_edge(m).map(|e| e.target), Some(cm));
    reg.set_widen(m, other, to_complex).unwrap();
    assert_eq!(reg.widen_edge(m).map(|e| e.target), Some(other));
    assert!(reg.widen_edge(cm).is_none());
}

#[test]
fn test_edges_check_ids() {
    let mut reg = TypeRegistry::new();
    let m = reg.register_type("m", TypeGroup::Dense).unwrap();
    let bogus = TypeId::from_raw(7);
    assert_eq!(
        reg.set_widen(m, bogus, to_complex).unwrap_err(),
        ConfigError::UnknownTypeId(bogus)
    );
    assert_eq!(
        reg.set_narrow(bogus, decline).unwrap_err(),
        ConfigError::UnknownTypeId(bogus)
    );
    assert_eq!(reg.set_widen(m, m, to_complex).unwrap_err(), ConfigError::SelfWidening("m".to_string()));
}

#[test]
fn test_narrow_edge_recorded() {
    let mut reg = TypeRegistry::new();
    let cm = reg.register_type("cm", TypeGroup::Dense).unwrap();
    assert!(reg.narrow_edge(cm).is_none());
    reg.set_narrow(cm, decline).unwrap();
    let edge = reg.narrow_edge(cm).unwrap();
    assert_eq!((edge.func)(&Value::scalar(1.0)), None);
}

#[test]
fn test_info_and_iter() {
    let mut reg = TypeRegistry::new();
    reg.register_type("a", TypeGroup::Logical).unwrap();
    reg.register_type("b", TypeGroup::Cell).unwrap();
    let names: Vec<&str> = reg.iter().map(|info| info.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    let info = reg.info(TypeId::from_raw(1)).unwrap();
    assert_eq!(info.group, TypeGroup::Cell);
}

#[test]
fn test_type_id_display() {
    assert_eq!(TypeId::from_raw(3).to_string(), "#3");
}
