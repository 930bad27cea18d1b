//! Dispatch resolver
//!
//! Every operator application goes through the same steps:
//!
//! 1. Resolve the runtime `TypeId` of each operand.
//! 2. Look up a kernel for the exact types (fast path).
//! 3. Otherwise try single-step widening: widen one operand through its
//!    type's widen edge, or both, and look up again. Only one hop per side.
//! 4. Otherwise fail with `UnsupportedOperator`.
//!
//! Shape handling is entirely up to the kernels. The resolver is stateless
//! between calls.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::config::WideningOrder;
use crate::context::DispatchContext;
use crate::error::{DispatchError, DispatchResult};
use crate::ops::{AssignOp, BinaryOp, CatDim, OperatorKind, UnaryOp};
use crate::types::{ConversionEdge, TypeId};
use crate::value::Value;

/// Chosen widening: which sides to convert and the kernel found for the
/// converted pair
struct Widening<'a, K> {
    kernel: K,
    left: Option<&'a ConversionEdge>,
    right: Option<&'a ConversionEdge>,
}

fn widen_operand<'v>(value: &'v Value, edge: Option<&ConversionEdge>) -> DispatchResult<Cow<'v, Value>> {
    match edge {
        Some(edge) => Ok(Cow::Owned((edge.func)(value)?)),
        None => Ok(Cow::Borrowed(value)),
    }
}

impl DispatchContext {
    /// Runtime type of a value
    pub fn type_of(&self, value: &Value) -> DispatchResult<TypeId> {
        self.registry.type_of(value)
    }

    /// Registered name of a type
    pub fn name_of(&self, id: TypeId) -> &str {
        self.registry.name_of(id)
    }

    fn unsupported(&self, kind: OperatorKind, left: TypeId, right: Option<TypeId>) -> DispatchError {
        DispatchError::UnsupportedOperator {
            kind,
            left,
            right,
            left_name: self.name_of(left).to_string(),
            right_name: right.map(|r| self.name_of(r).to_string()),
        }
    }

    /// Single-step widening search for a pair-keyed operator.
    ///
    /// Candidates are tried in the configured order: one side, the other
    /// side, then both sides together. The both-sides candidate is only
    /// considered when both operands have a widen edge.
    fn find_widening<K>(
        &self,
        kind: OperatorKind,
        lt: TypeId,
        rt: TypeId,
        find: impl Fn(TypeId, TypeId) -> Option<K>,
    ) -> Option<Widening<'_, K>> {
        if !self.config.allow_widening {
            return None;
        }
        let lw = self.registry.widen_edge(lt);
        let rw = self.registry.widen_edge(rt);

        let left_only = lw.map(|e| (Some(e), None));
        let right_only = rw.map(|e| (None, Some(e)));
        let both = lw.zip(rw).map(|(l, r)| (Some(l), Some(r)));
        let singles = match self.config.widening {
            WideningOrder::LeftFirst => [left_only, right_only],
            WideningOrder::RightFirst => [right_only, left_only],
        };

        for (left, right) in singles.into_iter().chain([both]).flatten() {
            let l = left.map_or(lt, |e: &ConversionEdge| e.target);
            let r = right.map_or(rt, |e: &ConversionEdge| e.target);
            if let Some(kernel) = find(l, r) {
                debug!(
                    operator = %kind,
                    left = self.name_of(lt),
                    right = self.name_of(rt),
                    widened_left = self.name_of(l),
                    widened_right = self.name_of(r),
                    "widened operands"
                );
                return Some(Widening {
                    kernel,
                    left,
                    right,
                });
            }
        }
        None
    }

    fn finish(&self, result: Value) -> DispatchResult<Value> {
        if self.config.narrow_results {
            self.narrow(result)
        } else {
            Ok(result)
        }
    }

    /// Apply a binary operator
    pub fn binary_op(&self, op: BinaryOp, left: &Value, right: &Value) -> DispatchResult<Value> {
        let lt = self.type_of(left)?;
        let rt = self.type_of(right)?;
        if let Some(f) = self.table.binary(op, lt, rt) {
            trace!(operator = op.as_str(), %lt, %rt, "fast path");
            return self.finish(f(left, right)?);
        }

        let kind = OperatorKind::Binary(op);
        let w = self
            .find_widening(kind, lt, rt, |l, r| self.table.binary(op, l, r))
            .ok_or_else(|| self.unsupported(kind, lt, Some(rt)))?;
        let l = widen_operand(left, w.left)?;
        let r = widen_operand(right, w.right)?;
        self.finish((w.kernel)(&l, &r)?)
    }

    /// Apply a unary operator. On a miss the operand is widened once.
    pub fn unary_op(&self, op: UnaryOp, operand: &Value) -> DispatchResult<Value> {
        let t = self.type_of(operand)?;
        if let Some(f) = self.table.unary(op, t) {
            trace!(operator = op.as_str(), %t, "fast path");
            return self.finish(f(operand)?);
        }

        let kind = OperatorKind::Unary(op);
        let edge = self
            .registry
            .widen_edge(t)
            .filter(|_| self.config.allow_widening)
            .ok_or_else(|| self.unsupported(kind, t, None))?;
        let f = self
            .table
            .unary(op, edge.target)
            .ok_or_else(|| self.unsupported(kind, t, None))?;
        debug!(
            operator = %kind,
            from = self.name_of(t),
            to = self.name_of(edge.target),
            "widened operand"
        );
        let widened = (edge.func)(operand)?;
        self.finish(f(&widened)?)
    }

    /// Concatenate two values along `dim`
    pub fn concat(&self, left: &Value, right: &Value, dim: CatDim) -> DispatchResult<Value> {
        let lt = self.type_of(left)?;
        let rt = self.type_of(right)?;
        if let Some(f) = self.table.cat(lt, rt) {
            trace!(%lt, %rt, ?dim, "fast path");
            return self.finish(f(left, right, dim)?);
        }

        let kind = OperatorKind::Concatenate;
        let w = self
            .find_widening(kind, lt, rt, |l, r| self.table.cat(l, r))
            .ok_or_else(|| self.unsupported(kind, lt, Some(rt)))?;
        let l = widen_operand(left, w.left)?;
        let r = widen_operand(right, w.right)?;
        self.finish((w.kernel)(&l, &r, dim)?)
    }

    /// Indexed assignment `lhs(index) op= rhs`, `index` being 0-based
    /// linear positions.
    ///
    /// A sentinel on the left is first replaced by its storable clone. On
    /// a kernel miss the left operand is converted through a registered
    /// assign-conversion, or failing that the right operand is widened.
    /// Either retry happens once.
    pub fn assign_op(
        &self,
        op: AssignOp,
        lhs: &mut Value,
        index: &[usize],
        rhs: &Value,
    ) -> DispatchResult<()> {
        lhs.make_storable();
        let lt = self.type_of(lhs)?;
        let rt = self.type_of(rhs)?;
        if let Some(f) = self.table.assign(op, lt, rt) {
            trace!(operator = op.as_str(), %lt, %rt, "fast path");
            return f(lhs, index, rhs);
        }

        let kind = OperatorKind::Assign(op);
        if let Some(ct) = self.table.assign_conv(lt, rt) {
            if let Some(f) = self.table.assign(op, ct, rt) {
                debug!(
                    operator = %kind,
                    from = self.name_of(lt),
                    to = self.name_of(ct),
                    "converted assignment target"
                );
                let mut converted = self.convert(lhs, ct)?;
                f(&mut converted, index, rhs)?;
                *lhs = converted;
                return Ok(());
            }
        }

        if self.config.allow_widening {
            if let Some(edge) = self.registry.widen_edge(rt) {
                if let Some(f) = self.table.assign(op, lt, edge.target) {
                    debug!(
                        operator = %kind,
                        from = self.name_of(rt),
                        to = self.name_of(edge.target),
                        "widened assigned value"
                    );
                    let widened = (edge.func)(rhs)?;
                    return f(lhs, index, &widened);
                }
            }
        }

        Err(self.unsupported(kind, lt, Some(rt)))
    }

    /// Convert `value` to type `to`.
    ///
    /// A value already of type `to` is cloned. Otherwise an installed
    /// conversion kernel is used, or the widen edge when it leads to `to`.
    pub fn convert(&self, value: &Value, to: TypeId) -> DispatchResult<Value> {
        let from = self.type_of(value)?;
        if from == to {
            return Ok(value.clone());
        }
        if let Some(f) = self.table.conv(from, to) {
            return f(value);
        }
        match self.registry.widen_edge(from) {
            Some(edge) if edge.target == to => (edge.func)(value),
            _ => Err(self.unsupported(OperatorKind::Convert, from, Some(to))),
        }
    }

    /// Convert `value` to the type registered as `type_name`
    pub fn convert_to(&self, value: &Value, type_name: &str) -> DispatchResult<Value> {
        let to = self
            .registry
            .lookup(type_name)
            .ok_or_else(|| DispatchError::UnregisteredType(type_name.to_string()))?;
        self.convert(value, to)
    }

    /// Demote `value` through its type's narrow edge. Values whose type
    /// has no edge, or whose edge declines, are returned unchanged.
    pub fn narrow(&self, value: Value) -> DispatchResult<Value> {
        let t = self.type_of(&value)?;
        match self.registry.narrow_edge(t).and_then(|edge| (edge.func)(&value)) {
            Some(narrowed) => {
                trace!(from = self.name_of(t), to = narrowed.type_name(), "narrowed");
                Ok(narrowed)
            }
            None => Ok(value),
        }
    }
}
