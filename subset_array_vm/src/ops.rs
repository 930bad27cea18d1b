//! Operator tags
//!
//! The operator set is closed: new operators are added here, never at
//! run time. Each family gets its own enum so the operator table can key
//! its maps precisely; `OperatorKind` unifies them for error reporting and
//! generic lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Binary operator type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    LeftDiv,
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
    Ne,
    ElMul,
    ElDiv,
    ElPow,
    ElLeftDiv,
    ElAnd,
    ElOr,
    /// `A.' * B` without forming the transpose
    TransMul,
    /// `A * B.'`
    MulTrans,
    /// `A' * B`
    HermMul,
    /// `A * B'`
    MulHerm,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 22] = [
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Pow,
        BinaryOp::LeftDiv,
        BinaryOp::Lt,
        BinaryOp::Le,
        BinaryOp::Eq,
        BinaryOp::Ge,
        BinaryOp::Gt,
        BinaryOp::Ne,
        BinaryOp::ElMul,
        BinaryOp::ElDiv,
        BinaryOp::ElPow,
        BinaryOp::ElLeftDiv,
        BinaryOp::ElAnd,
        BinaryOp::ElOr,
        BinaryOp::TransMul,
        BinaryOp::MulTrans,
        BinaryOp::HermMul,
        BinaryOp::MulHerm,
    ];

    /// Get the operator as written in the language
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
            BinaryOp::LeftDiv => "\\",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Eq => "==",
            BinaryOp::Ge => ">=",
            BinaryOp::Gt => ">",
            BinaryOp::Ne => "!=",
            BinaryOp::ElMul => ".*",
            BinaryOp::ElDiv => "./",
            BinaryOp::ElPow => ".^",
            BinaryOp::ElLeftDiv => ".\\",
            BinaryOp::ElAnd => "&",
            BinaryOp::ElOr => "|",
            BinaryOp::TransMul => "transtimes",
            BinaryOp::MulTrans => "timestrans",
            BinaryOp::HermMul => "hermtimes",
            BinaryOp::MulHerm => "timesherm",
        }
    }

    /// True for the six relational operators
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Eq | BinaryOp::Ge | BinaryOp::Gt | BinaryOp::Ne
        )
    }
}

/// Unary operator type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    UPlus,
    UMinus,
    Transpose,
    Hermitian,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::UPlus => "+",
            UnaryOp::UMinus => "-",
            UnaryOp::Transpose => ".'",
            UnaryOp::Hermitian => "'",
        }
    }
}

/// Indexed-assignment operator type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    AsnEq,
    AddEq,
    SubEq,
    ElMulEq,
    ElDivEq,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::AsnEq => "=",
            AssignOp::AddEq => "+=",
            AssignOp::SubEq => "-=",
            AssignOp::ElMulEq => ".*=",
            AssignOp::ElDivEq => "./=",
        }
    }

    /// The binary operator a compound assignment applies, if any
    pub fn binary_op(&self) -> Option<BinaryOp> {
        match self {
            AssignOp::AsnEq => None,
            AssignOp::AddEq => Some(BinaryOp::Add),
            AssignOp::SubEq => Some(BinaryOp::Sub),
            AssignOp::ElMulEq => Some(BinaryOp::ElMul),
            AssignOp::ElDivEq => Some(BinaryOp::ElDiv),
        }
    }
}

/// Concatenation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatDim {
    /// `[a; b]`
    Vertical,
    /// `[a, b]`
    Horizontal,
}

/// Every operator the table can hold an entry for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Binary(BinaryOp),
    Unary(UnaryOp),
    Concatenate,
    Assign(AssignOp),
    Convert,
    Widen,
}

impl OperatorKind {
    /// Symbol used in user-facing error messages
    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorKind::Binary(op) => op.as_str(),
            OperatorKind::Unary(op) => op.as_str(),
            OperatorKind::Concatenate => "[]",
            OperatorKind::Assign(op) => op.as_str(),
            OperatorKind::Convert => "convert",
            OperatorKind::Widen => "widen",
        }
    }

    /// True for kinds keyed on a (left, right) type pair
    pub fn is_binary_keyed(&self) -> bool {
        !matches!(
            self,
            OperatorKind::Unary(_) | OperatorKind::Widen
        )
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_symbols_unique() {
        let mut seen = std::collections::HashSet::new();
        for op in BinaryOp::ALL {
            assert!(seen.insert(op.as_str()), "duplicate symbol {}", op.as_str());
        }
    }

    #[test]
    fn test_compound_assignment_maps_to_binary() {
        assert_eq!(AssignOp::AddEq.binary_op(), Some(BinaryOp::Add));
        assert_eq!(AssignOp::AsnEq.binary_op(), None);
    }

    #[test]
    fn test_kind_keying() {
        assert!(OperatorKind::Concatenate.is_binary_keyed());
        assert!(OperatorKind::Convert.is_binary_keyed());
        assert!(!OperatorKind::Unary(UnaryOp::Not).is_binary_keyed());
        assert!(!OperatorKind::Widen.is_binary_keyed());
    }
}
