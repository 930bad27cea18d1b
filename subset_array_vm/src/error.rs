//! Error types for operator dispatch
//!
//! Two families live here: `ConfigError` for mistakes made while the
//! type registry and operator table are being assembled, and
//! `DispatchError` for failures surfaced while evaluating expressions.

use thiserror::Error;

use crate::ops::OperatorKind;
use crate::types::TypeId;

/// Start-up configuration error
///
/// Raised by the registration phase. Any of these aborts context
/// construction; none of them can occur once a `DispatchContext` exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A type name was registered twice
    #[error("ConfigError: type '{0}' registered twice")]
    DuplicateType(String),

    /// An installer referenced a type id this registry never issued
    #[error("ConfigError: installer referenced unregistered type id {0}")]
    UnknownTypeId(TypeId),

    /// An installer looked up a type by a name nobody registered
    #[error("ConfigError: no type named '{0}' is registered")]
    UnknownTypeName(String),

    /// A widen edge pointing back at its own source type
    #[error("ConfigError: type '{0}' cannot widen to itself")]
    SelfWidening(String),

    /// Configuration text could not be parsed
    #[error("ConfigError: invalid dispatch configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for the registration phase
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error surfaced by the dispatch resolver or by a kernel
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No kernel and no single-step widening path
    #[error("{}", unsupported_message(.kind, .left_name, .right_name.as_deref()))]
    UnsupportedOperator {
        kind: OperatorKind,
        left: TypeId,
        right: Option<TypeId>,
        left_name: String,
        right_name: Option<String>,
    },

    /// A value whose representation was never registered with this context
    #[error("type '{0}' is not registered with this dispatch context")]
    UnregisteredType(String),

    /// Shapes of the two operands are incompatible
    #[error("operator {op}: nonconformant arguments (op1 is {}x{}, op2 is {}x{})", .op1.0, .op1.1, .op2.0, .op2.1)]
    Nonconformant {
        op: String,
        op1: (usize, usize),
        op2: (usize, usize),
    },

    /// Index outside the extent of the indexed value
    #[error("index ({index}): out of bound {extent}")]
    IndexOutOfBound { index: usize, extent: usize },

    /// Kernel-raised domain error
    #[error("{0}")]
    DomainError(String),
}

fn unsupported_message(kind: &OperatorKind, left: &str, right: Option<&str>) -> String {
    match right {
        Some(right) => format!("{}: {} failed for operator {}", left, right, kind.symbol()),
        None => format!("{} failed for operator {}", left, kind.symbol()),
    }
}

impl DispatchError {
    /// Create a domain error
    pub fn domain_error<S: Into<String>>(msg: S) -> Self {
        DispatchError::DomainError(msg.into())
    }

    /// Create a nonconformant-arguments error
    pub fn nonconformant<S: Into<String>>(op: S, op1: (usize, usize), op2: (usize, usize)) -> Self {
        DispatchError::Nonconformant {
            op: op.into(),
            op1,
            op2,
        }
    }

    /// Create an index error (`index` is 1-based, as users see it)
    pub fn index_out_of_bound(index: usize, extent: usize) -> Self {
        DispatchError::IndexOutOfBound { index, extent }
    }

    /// True for the "no kernel, no widening path" failure
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DispatchError::UnsupportedOperator { .. })
    }
}

/// Result type alias for dispatch and kernels
pub type DispatchResult<T> = Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::BinaryOp;

    #[test]
    fn test_unsupported_display() {
        let err = DispatchError::UnsupportedOperator {
            kind: OperatorKind::Binary(BinaryOp::Add),
            left: TypeId::from_raw(0),
            right: Some(TypeId::from_raw(1)),
            left_name: "matrix".to_string(),
            right_name: Some("cell".to_string()),
        };
        assert_eq!(err.to_string(), "matrix: cell failed for operator +");
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_nonconformant_display() {
        let err = DispatchError::nonconformant("+", (2, 2), (3, 1));
        assert_eq!(
            err.to_string(),
            "operator +: nonconformant arguments (op1 is 2x2, op2 is 3x1)"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::SelfWidening("matrix".to_string());
        assert_eq!(
            err.to_string(),
            "ConfigError: type 'matrix' cannot widen to itself"
        );
    }
}
