//! Dispatch context
//!
//! Registration happens on a `ContextBuilder`, single-threaded, at
//! start-up. `build` freezes the registry and table into a
//! `DispatchContext` that is read-only and safe to share across threads.

use tracing::debug;

use crate::config::DispatchConfig;
use crate::error::ConfigResult;
use crate::operators;
use crate::ops::{AssignOp, BinaryOp, UnaryOp};
use crate::table::{AssignFn, BinaryFn, CatFn, ConvFn, NarrowFn, OperatorTable, UnaryFn};
use crate::types::{TypeGroup, TypeId, TypeRegistry};
use crate::value::ValueKind;

/// Mutable start-up phase of a dispatch context
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    registry: TypeRegistry,
    table: OperatorTable,
    config: DispatchConfig,
}

/// Frozen registry, operator table and configuration
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub(crate) registry: TypeRegistry,
    pub(crate) table: OperatorTable,
    pub(crate) config: DispatchConfig,
}

/// Type group of each built-in representation
fn builtin_group(kind: ValueKind) -> TypeGroup {
    match kind {
        ValueKind::Matrix
        | ValueKind::ComplexMatrix
        | ValueKind::FloatMatrix
        | ValueKind::FloatComplexMatrix => TypeGroup::Dense,
        ValueKind::SparseMatrix | ValueKind::SparseComplexMatrix => TypeGroup::Sparse,
        ValueKind::DiagMatrix => TypeGroup::Diagonal,
        ValueKind::PermMatrix => TypeGroup::Permutation,
        ValueKind::Int32Matrix => TypeGroup::Integer,
        ValueKind::BoolMatrix => TypeGroup::Logical,
        ValueKind::String | ValueKind::SqString => TypeGroup::Character,
        ValueKind::Cell => TypeGroup::Cell,
        ValueKind::NullMatrix | ValueKind::NullString | ValueKind::NullSqString => TypeGroup::Null,
    }
}

impl ContextBuilder {
    /// Empty registry and table with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Register every built-in representation and run all installers
    pub fn with_builtin_types() -> ConfigResult<Self> {
        Self::with_config(DispatchConfig::default()).install_builtins()
    }

    /// Like `with_builtin_types`, with an explicit configuration
    pub fn builtin_with_config(config: DispatchConfig) -> ConfigResult<Self> {
        Self::with_config(config).install_builtins()
    }

    fn install_builtins(mut self) -> ConfigResult<Self> {
        for kind in ValueKind::ALL {
            self.register_value_type(kind, builtin_group(kind))?;
        }
        operators::install_ops(&mut self)?;
        debug!(
            types = self.registry.len(),
            kernels = self.table.len(),
            "installed built-in operators"
        );
        Ok(self)
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DispatchConfig) {
        self.config = config;
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn table(&self) -> &OperatorTable {
        &self.table
    }

    // ========== Type registration ==========

    pub fn register_type(&mut self, name: &str, group: TypeGroup) -> ConfigResult<TypeId> {
        self.registry.register_type(name, group)
    }

    pub fn register_value_type(&mut self, kind: ValueKind, group: TypeGroup) -> ConfigResult<TypeId> {
        self.registry.register_value_type(kind, group)
    }

    /// Id of a registered type, for installers that look types up by name
    pub fn type_id(&self, name: &str) -> ConfigResult<TypeId> {
        self.registry.require(name)
    }

    // ========== Kernel installation ==========

    pub fn install_binary(
        &mut self,
        op: BinaryOp,
        left: TypeId,
        right: TypeId,
        f: BinaryFn,
    ) -> ConfigResult<()> {
        self.registry.check(left)?;
        self.registry.check(right)?;
        self.table.insert_binary(op, left, right, f);
        Ok(())
    }

    pub fn install_unary(&mut self, op: UnaryOp, operand: TypeId, f: UnaryFn) -> ConfigResult<()> {
        self.registry.check(operand)?;
        self.table.insert_unary(op, operand, f);
        Ok(())
    }

    pub fn install_cat(&mut self, left: TypeId, right: TypeId, f: CatFn) -> ConfigResult<()> {
        self.registry.check(left)?;
        self.registry.check(right)?;
        self.table.insert_cat(left, right, f);
        Ok(())
    }

    pub fn install_assign(
        &mut self,
        op: AssignOp,
        left: TypeId,
        right: TypeId,
        f: AssignFn,
    ) -> ConfigResult<()> {
        self.registry.check(left)?;
        self.registry.check(right)?;
        self.table.insert_assign(op, left, right, f);
        Ok(())
    }

    /// Assigning a `right` into a `left` converts the left operand to
    /// `result` first
    pub fn install_assign_conv(
        &mut self,
        left: TypeId,
        right: TypeId,
        result: TypeId,
    ) -> ConfigResult<()> {
        self.registry.check(left)?;
        self.registry.check(right)?;
        self.registry.check(result)?;
        self.table.insert_assign_conv(left, right, result);
        Ok(())
    }

    pub fn install_conv(&mut self, from: TypeId, to: TypeId, f: ConvFn) -> ConfigResult<()> {
        self.registry.check(from)?;
        self.registry.check(to)?;
        self.table.insert_conv(from, to, f);
        Ok(())
    }

    /// Install the default widen edge of `from`
    pub fn install_widen(&mut self, from: TypeId, to: TypeId, f: ConvFn) -> ConfigResult<()> {
        self.registry.set_widen(from, to, f)
    }

    /// Install the narrow edge of `from`
    pub fn install_narrow(&mut self, from: TypeId, f: NarrowFn) -> ConfigResult<()> {
        self.registry.set_narrow(from, f)
    }

    /// Freeze into a read-only context
    pub fn build(self) -> DispatchContext {
        debug!(
            types = self.registry.len(),
            kernels = self.table.len(),
            widening = %self.config.widening,
            "dispatch context frozen"
        );
        DispatchContext {
            registry: self.registry,
            table: self.table,
            config: self.config,
        }
    }
}

impl DispatchContext {
    /// Context with every built-in type and operator
    pub fn builtin() -> ConfigResult<Self> {
        Ok(ContextBuilder::with_builtin_types()?.build())
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn table(&self) -> &OperatorTable {
        &self.table
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }
}
