//! Runtime type identity for array representations.
//!
//! Every concrete representation the engine can dispatch on is registered
//! once and receives a `TypeId`. The registry also owns the per-type
//! conversion edges used by automatic widening and result narrowing.
//!
//! # Module Organization
//!
//! - `registry.rs`: TypeRegistry, the name/kind to TypeId map
//! - this file: TypeId, TypeGroup, conversion edges, TypeInfo

mod registry;

#[cfg(test)]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::{ConvFn, NarrowFn};

pub use registry::TypeRegistry;

/// Opaque runtime token for one concrete representation.
///
/// Ids are dense indices handed out in registration order and are only
/// meaningful within the registry that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(u32);

impl TypeId {
    /// Build an id from its raw index. Only useful for tests and tooling;
    /// ids used for dispatch come from `TypeRegistry::register_type`.
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse family a representation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeGroup {
    Dense,
    Sparse,
    Diagonal,
    Permutation,
    Integer,
    Logical,
    Character,
    Cell,
    /// The literal-empty sentinels
    Null,
    /// Anything registered by an embedder
    Other,
}

/// Default conversion out of a type (its widen edge)
#[derive(Clone, Copy)]
pub struct ConversionEdge {
    pub target: TypeId,
    pub func: ConvFn,
}

impl fmt::Debug for ConversionEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionEdge")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Demotion back toward a simpler representation.
///
/// The function declines (returns `None`) when the value cannot be
/// represented more simply without loss.
#[derive(Clone, Copy)]
pub struct NarrowEdge {
    pub func: NarrowFn,
}

impl fmt::Debug for NarrowEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrowEdge").finish_non_exhaustive()
    }
}

/// Per-type metadata
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub id: TypeId,
    pub name: String,
    pub group: TypeGroup,
    pub widen: Option<ConversionEdge>,
    pub narrow: Option<NarrowEdge>,
}
