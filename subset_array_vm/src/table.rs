//! Operator table
//!
//! Maps (operator, left type, right type) to a kernel. Each operator
//! family has its own map because the kernel signatures differ. The table
//! is filled during start-up by the installers in `operators` and is
//! read-only afterwards.

use std::collections::HashMap;

use tracing::{trace, warn};

use crate::error::DispatchResult;
use crate::ops::{AssignOp, BinaryOp, CatDim, OperatorKind, UnaryOp};
use crate::types::TypeId;
use crate::value::Value;

/// Binary kernel
pub type BinaryFn = fn(&Value, &Value) -> DispatchResult<Value>;
/// Unary kernel
pub type UnaryFn = fn(&Value) -> DispatchResult<Value>;
/// Concatenation kernel
pub type CatFn = fn(&Value, &Value, CatDim) -> DispatchResult<Value>;
/// Indexed-assignment kernel. Indices are 0-based linear positions into
/// the left operand, which already holds a storable (non-sentinel) value.
pub type AssignFn = fn(&mut Value, &[usize], &Value) -> DispatchResult<()>;
/// Conversion between two types. Also used for widen edges.
pub type ConvFn = fn(&Value) -> DispatchResult<Value>;
/// Demotion to a cheaper representation, `None` when not applicable
pub type NarrowFn = fn(&Value) -> Option<Value>;

/// A kernel returned by the generic `OperatorTable::lookup`
#[derive(Debug, Clone, Copy)]
pub enum Kernel {
    Binary(BinaryFn),
    Unary(UnaryFn),
    Cat(CatFn),
    Assign(AssignFn),
    Convert(ConvFn),
}

/// One installed entry, as reported by `OperatorTable::entries`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub kind: OperatorKind,
    pub left: TypeId,
    pub right: Option<TypeId>,
}

/// Keyed store of kernels
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    binary: HashMap<(BinaryOp, TypeId, TypeId), BinaryFn>,
    unary: HashMap<(UnaryOp, TypeId), UnaryFn>,
    cat: HashMap<(TypeId, TypeId), CatFn>,
    assign: HashMap<(AssignOp, TypeId, TypeId), AssignFn>,
    assign_conv: HashMap<(TypeId, TypeId), TypeId>,
    conv: HashMap<(TypeId, TypeId), ConvFn>,
}

fn note_replaced(replaced: bool, kind: OperatorKind, left: TypeId, right: Option<TypeId>) {
    if replaced {
        warn!(operator = %kind, %left, right = ?right, "replaced existing kernel");
    } else {
        trace!(operator = %kind, %left, right = ?right, "installed kernel");
    }
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Installation ==========

    pub fn insert_binary(&mut self, op: BinaryOp, left: TypeId, right: TypeId, f: BinaryFn) {
        let replaced = self.binary.insert((op, left, right), f).is_some();
        note_replaced(replaced, OperatorKind::Binary(op), left, Some(right));
    }

    pub fn insert_unary(&mut self, op: UnaryOp, operand: TypeId, f: UnaryFn) {
        let replaced = self.unary.insert((op, operand), f).is_some();
        note_replaced(replaced, OperatorKind::Unary(op), operand, None);
    }

    pub fn insert_cat(&mut self, left: TypeId, right: TypeId, f: CatFn) {
        let replaced = self.cat.insert((left, right), f).is_some();
        note_replaced(replaced, OperatorKind::Concatenate, left, Some(right));
    }

    pub fn insert_assign(&mut self, op: AssignOp, left: TypeId, right: TypeId, f: AssignFn) {
        let replaced = self.assign.insert((op, left, right), f).is_some();
        note_replaced(replaced, OperatorKind::Assign(op), left, Some(right));
    }

    /// Record that assigning a `right` into a `left` first converts the
    /// left operand to `result`
    pub fn insert_assign_conv(&mut self, left: TypeId, right: TypeId, result: TypeId) {
        let replaced = self.assign_conv.insert((left, right), result).is_some();
        note_replaced(
            replaced,
            OperatorKind::Assign(AssignOp::AsnEq),
            left,
            Some(right),
        );
    }

    pub fn insert_conv(&mut self, from: TypeId, to: TypeId, f: ConvFn) {
        let replaced = self.conv.insert((from, to), f).is_some();
        note_replaced(replaced, OperatorKind::Convert, from, Some(to));
    }

    // ========== Lookup ==========

    pub fn binary(&self, op: BinaryOp, left: TypeId, right: TypeId) -> Option<BinaryFn> {
        self.binary.get(&(op, left, right)).copied()
    }

    pub fn unary(&self, op: UnaryOp, operand: TypeId) -> Option<UnaryFn> {
        self.unary.get(&(op, operand)).copied()
    }

    pub fn cat(&self, left: TypeId, right: TypeId) -> Option<CatFn> {
        self.cat.get(&(left, right)).copied()
    }

    pub fn assign(&self, op: AssignOp, left: TypeId, right: TypeId) -> Option<AssignFn> {
        self.assign.get(&(op, left, right)).copied()
    }

    pub fn assign_conv(&self, left: TypeId, right: TypeId) -> Option<TypeId> {
        self.assign_conv.get(&(left, right)).copied()
    }

    pub fn conv(&self, from: TypeId, to: TypeId) -> Option<ConvFn> {
        self.conv.get(&(from, to)).copied()
    }

    /// Generic lookup over every family. `right` is ignored for unary
    /// operators and required for every pair-keyed kind. Widen edges live
    /// on the type registry, not here, so `OperatorKind::Widen` never hits.
    pub fn lookup(&self, kind: OperatorKind, left: TypeId, right: Option<TypeId>) -> Option<Kernel> {
        match (kind, right) {
            (OperatorKind::Unary(op), _) => self.unary(op, left).map(Kernel::Unary),
            (OperatorKind::Binary(op), Some(r)) => self.binary(op, left, r).map(Kernel::Binary),
            (OperatorKind::Concatenate, Some(r)) => self.cat(left, r).map(Kernel::Cat),
            (OperatorKind::Assign(op), Some(r)) => self.assign(op, left, r).map(Kernel::Assign),
            (OperatorKind::Convert, Some(r)) => self.conv(left, r).map(Kernel::Convert),
            _ => None,
        }
    }

    /// Number of installed kernels across all families
    pub fn len(&self) -> usize {
        self.binary.len()
            + self.unary.len()
            + self.cat.len()
            + self.assign.len()
            + self.assign_conv.len()
            + self.conv.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every installed kernel key. Order is unspecified.
    pub fn entries(&self) -> impl Iterator<Item = TableEntry> + '_ {
        let binary = self.binary.keys().map(|&(op, l, r)| TableEntry {
            kind: OperatorKind::Binary(op),
            left: l,
            right: Some(r),
        });
        let unary = self.unary.keys().map(|&(op, t)| TableEntry {
            kind: OperatorKind::Unary(op),
            left: t,
            right: None,
        });
        let cat = self.cat.keys().map(|&(l, r)| TableEntry {
            kind: OperatorKind::Concatenate,
            left: l,
            right: Some(r),
        });
        let assign = self.assign.keys().map(|&(op, l, r)| TableEntry {
            kind: OperatorKind::Assign(op),
            left: l,
            right: Some(r),
        });
        let conv = self.conv.keys().map(|&(l, r)| TableEntry {
            kind: OperatorKind::Convert,
            left: l,
            right: Some(r),
        });
        binary.chain(unary).chain(cat).chain(assign).chain(conv)
    }

    /// Assign-conversion rules as (left, right, converted left)
    pub fn assign_conv_entries(&self) -> impl Iterator<Item = (TypeId, TypeId, TypeId)> + '_ {
        self.assign_conv.iter().map(|(&(l, r), &t)| (l, r, t))
    }
}
