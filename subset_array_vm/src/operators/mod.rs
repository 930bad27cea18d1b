//! Built-in operator installers
//!
//! Each submodule installs the kernels of one family of type pairs into a
//! `ContextBuilder`. Installers are organisational only: they all write to
//! the same operator table, and the order they run in does not matter
//! except where two of them install the same key (last write wins).
//!
//! # Module Organization
//!
//! - `dense`: m_m, cm_cm, fm_fm, fcm_fcm, m_fm
//! - `sparse`: sm_sm, scm_scm, m_sm, m_scm, cm_scm
//! - `structured`: dm_dm, dm_m, pm_pm, pm_sm
//! - `integer`: i32_i32, i32_m
//! - `logical`: b_b, str_str, cell
//! - `null`: literal-empty concatenation and deletion
//! - `conversions`: widen, narrow, convert and assign-conversion edges

mod conversions;
mod dense;
mod integer;
mod logical;
mod null;
mod sparse;
mod structured;

use tracing::debug;

use crate::context::ContextBuilder;
use crate::error::ConfigResult;
use crate::types::TypeId;

/// Install a list of binary kernels for one `(left, right)` pair
macro_rules! binary_kernels {
    ($b:expr, $l:expr, $r:expr, { $($op:ident => $f:expr),* $(,)? }) => {{
        $( $b.install_binary($crate::ops::BinaryOp::$op, $l, $r, $f)?; )*
    }};
}

/// Install a list of unary kernels for one operand type
macro_rules! unary_kernels {
    ($b:expr, $t:expr, { $($op:ident => $f:expr),* $(,)? }) => {{
        $( $b.install_unary($crate::ops::UnaryOp::$op, $t, $f)?; )*
    }};
}

/// Install a list of assignment kernels for one `(lhs, rhs)` pair
macro_rules! assign_kernels {
    ($b:expr, $l:expr, $r:expr, { $($op:ident => $f:expr),* $(,)? }) => {{
        $( $b.install_assign($crate::ops::AssignOp::$op, $l, $r, $f)?; )*
    }};
}

pub(crate) use {assign_kernels, binary_kernels, unary_kernels};

/// Ids of the built-in representations, looked up by name once
#[derive(Debug, Clone, Copy)]
pub(crate) struct Builtins {
    pub m: TypeId,
    pub cm: TypeId,
    pub fm: TypeId,
    pub fcm: TypeId,
    pub sm: TypeId,
    pub scm: TypeId,
    pub dm: TypeId,
    pub pm: TypeId,
    pub int32: TypeId,
    pub logical: TypeId,
    pub string: TypeId,
    pub sq_string: TypeId,
    pub cell: TypeId,
    pub null_matrix: TypeId,
    pub null_str: TypeId,
    pub null_sq_str: TypeId,
}

impl Builtins {
    pub fn resolve(b: &ContextBuilder) -> ConfigResult<Self> {
        Ok(Self {
            m: b.type_id("matrix")?,
            cm: b.type_id("complex matrix")?,
            fm: b.type_id("float matrix")?,
            fcm: b.type_id("float complex matrix")?,
            sm: b.type_id("sparse matrix")?,
            scm: b.type_id("sparse complex matrix")?,
            dm: b.type_id("diagonal matrix")?,
            pm: b.type_id("permutation matrix")?,
            int32: b.type_id("int32 matrix")?,
            logical: b.type_id("bool matrix")?,
            string: b.type_id("string")?,
            sq_string: b.type_id("sq_string")?,
            cell: b.type_id("cell")?,
            null_matrix: b.type_id("null_matrix")?,
            null_str: b.type_id("null_string")?,
            null_sq_str: b.type_id("null_sq_string")?,
        })
    }

    /// The three literal-empty sentinels
    pub fn nulls(&self) -> [TypeId; 3] {
        [self.null_matrix, self.null_str, self.null_sq_str]
    }

    /// Every built-in type that is not a sentinel
    pub fn storable(&self) -> [TypeId; 13] {
        [
            self.m, self.cm, self.fm, self.fcm, self.sm, self.scm, self.dm, self.pm, self.int32,
            self.logical, self.string, self.sq_string, self.cell,
        ]
    }
}

/// Run every built-in installer. All built-in types must already be
/// registered.
pub(crate) fn install_ops(b: &mut ContextBuilder) -> ConfigResult<()> {
    let t = Builtins::resolve(b)?;

    conversions::install(b, &t)?;
    dense::install(b, &t)?;
    sparse::install(b, &t)?;
    structured::install(b, &t)?;
    integer::install(b, &t)?;
    logical::install(b, &t)?;
    null::install(b, &t)?;

    debug!(kernels = b.table().len(), "built-in installers done");
    Ok(())
}
