//! Structured families: dm_dm, dm_m, pm_pm and pm_sm.
//!
//! Only the operations that keep or exploit the structure are installed.
//! Everything else reaches the full-matrix kernels through the widen edges
//! to `matrix`.

use super::{binary_kernels, unary_kernels, Builtins};
use crate::context::ContextBuilder;
use crate::error::ConfigResult;
use crate::kernels::structured;

pub(super) fn install(b: &mut ContextBuilder, t: &Builtins) -> ConfigResult<()> {
    // dm_dm
    binary_kernels!(b, t.dm, t.dm, {
        Add => structured::dm_add,
        Sub => structured::dm_sub,
        Mul => structured::dm_mul,
    });
    unary_kernels!(b, t.dm, {
        UPlus => structured::dm_uplus,
        UMinus => structured::dm_uminus,
        Transpose => structured::dm_transpose,
        Hermitian => structured::dm_transpose,
    });

    // dm_m
    binary_kernels!(b, t.dm, t.m, {
        Add => structured::dm_m_add,
        Sub => structured::dm_m_sub,
        Mul => structured::dm_m_mul,
        LeftDiv => structured::dm_m_ldiv,
    });

    // pm_pm
    binary_kernels!(b, t.pm, t.pm, {
        Mul => structured::pm_mul,
        LeftDiv => structured::pm_ldiv,
        Div => structured::pm_div,
    });
    unary_kernels!(b, t.pm, {
        UPlus => structured::pm_uplus,
        Transpose => structured::pm_transpose,
        Hermitian => structured::pm_transpose,
    });

    // pm_sm
    binary_kernels!(b, t.pm, t.sm, {
        Mul => structured::pm_sm_mul,
        LeftDiv => structured::pm_sm_ldiv,
    });
    binary_kernels!(b, t.sm, t.pm, {
        Mul => structured::sm_pm_mul,
        Div => structured::sm_pm_div,
    });

    Ok(())
}
