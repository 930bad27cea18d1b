use std::collections::HashMap;

use tracing::debug;

use super::{ConversionEdge, NarrowEdge, TypeGroup, TypeId, TypeInfo};
use crate::error::{ConfigError, ConfigResult, DispatchError, DispatchResult};
use crate::table::{ConvFn, NarrowFn};
use crate::value::{Value, ValueKind};

const UNKNOWN_TYPE_NAME: &str = "<unknown type>";

/// Registry of every representation the engine dispatches on.
///
/// Append-only: types are registered during start-up and never removed.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: Vec<TypeInfo>,
    by_name: HashMap<String, TypeId>,
    by_kind: HashMap<ValueKind, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a representation under a unique name.
    pub fn register_type(&mut self, name: &str, group: TypeGroup) -> ConfigResult<TypeId> {
        if self.by_name.contains_key(name) {
            return Err(ConfigError::DuplicateType(name.to_string()));
        }
        let raw = u32::try_from(self.types.len())
            .map_err(|_| ConfigError::InvalidConfig("type id space exhausted".to_string()))?;
        let id = TypeId(raw);
        self.types.push(TypeInfo {
            id,
            name: name.to_string(),
            group,
            widen: None,
            narrow: None,
        });
        self.by_name.insert(name.to_string(), id);
        debug!(type_name = name, type_id = raw, ?group, "registered type");
        Ok(id)
    }

    /// Register one of the built-in value representations and bind it so
    /// that `type_of` can resolve values of that kind.
    pub fn register_value_type(&mut self, kind: ValueKind, group: TypeGroup) -> ConfigResult<TypeId> {
        let id = self.register_type(kind.type_name(), group)?;
        self.by_kind.insert(kind, id);
        Ok(id)
    }

    /// Runtime type of a value.
    pub fn type_of(&self, value: &Value) -> DispatchResult<TypeId> {
        let kind = value.kind();
        self.by_kind
            .get(&kind)
            .copied()
            .ok_or_else(|| DispatchError::UnregisteredType(kind.type_name().to_string()))
    }

    /// Registered name of a type.
    pub fn name_of(&self, id: TypeId) -> &str {
        self.types
            .get(id.index())
            .map(|info| info.name.as_str())
            .unwrap_or(UNKNOWN_TYPE_NAME)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Like `lookup`, for installers that cannot proceed without the type.
    pub fn require(&self, name: &str) -> ConfigResult<TypeId> {
        self.lookup(name)
            .ok_or_else(|| ConfigError::UnknownTypeName(name.to_string()))
    }

    /// Fails with `UnknownTypeId` when `id` was not issued here.
    pub fn check(&self, id: TypeId) -> ConfigResult<()> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(ConfigError::UnknownTypeId(id))
        }
    }

    pub fn contains(&self, id: TypeId) -> bool {
        id.index() < self.types.len()
    }

    pub fn info(&self, id: TypeId) -> Option<&TypeInfo> {
        self.types.get(id.index())
    }

    /// Install the default widen edge of `from`. A later call replaces it.
    pub fn set_widen(&mut self, from: TypeId, to: TypeId, func: ConvFn) -> ConfigResult<()> {
        self.check(from)?;
        self.check(to)?;
        if from == to {
            return Err(ConfigError::SelfWidening(self.name_of(from).to_string()));
        }
        debug!(
            from = self.name_of(from),
            to = self.name_of(to),
            "installed widen edge"
        );
        self.types[from.index()].widen = Some(ConversionEdge { target: to, func });
        Ok(())
    }

    /// Install the narrow edge of `from`. A later call replaces it.
    pub fn set_narrow(&mut self, from: TypeId, func: NarrowFn) -> ConfigResult<()> {
        self.check(from)?;
        debug!(from = self.name_of(from), "installed narrow edge");
        self.types[from.index()].narrow = Some(NarrowEdge { func });
        Ok(())
    }

    pub fn widen_edge(&self, id: TypeId) -> Option<&ConversionEdge> {
        self.types.get(id.index()).and_then(|info| info.widen.as_ref())
    }

    pub fn narrow_edge(&self, id: TypeId) -> Option<&NarrowEdge> {
        self.types.get(id.index()).and_then(|info| info.narrow.as_ref())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.types.iter()
    }
}
