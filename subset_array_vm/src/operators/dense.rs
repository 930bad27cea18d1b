//! Full-matrix families: m_m, cm_cm, fm_fm, fcm_fcm and m_fm.
//!
//! Real/complex mixes are not installed: the real side widens to complex.

use super::{assign_kernels, binary_kernels, unary_kernels, Builtins};
use crate::context::ContextBuilder;
use crate::error::ConfigResult;
use crate::kernels::{assign, concat, elementwise, linalg, NumericElement};
use crate::types::TypeId;

/// Every binary operator for a pair whose kernels compute in `T`
fn install_binary_pair<T: NumericElement>(
    b: &mut ContextBuilder,
    l: TypeId,
    r: TypeId,
) -> ConfigResult<()> {
    binary_kernels!(b, l, r, {
        Add => elementwise::add::<T>,
        Sub => elementwise::sub::<T>,
        Mul => linalg::mul::<T>,
        Div => linalg::div::<T>,
        Pow => linalg::pow::<T>,
        LeftDiv => linalg::ldiv::<T>,
        Lt => elementwise::lt::<T>,
        Le => elementwise::le::<T>,
        Eq => elementwise::eq::<T>,
        Ge => elementwise::ge::<T>,
        Gt => elementwise::gt::<T>,
        Ne => elementwise::ne::<T>,
        ElMul => elementwise::el_mul::<T>,
        ElDiv => elementwise::el_div::<T>,
        ElPow => elementwise::el_pow::<T>,
        ElLeftDiv => elementwise::el_ldiv::<T>,
        ElAnd => elementwise::el_and::<T>,
        ElOr => elementwise::el_or::<T>,
        TransMul => linalg::trans_mul::<T>,
        MulTrans => linalg::mul_trans::<T>,
        HermMul => linalg::herm_mul::<T>,
        MulHerm => linalg::mul_herm::<T>,
    });
    b.install_cat(l, r, concat::cat::<T>)?;
    Ok(())
}

/// Indexed assignment into a `T` target
fn install_assign_into<T: NumericElement>(
    b: &mut ContextBuilder,
    lhs: TypeId,
    rhs: TypeId,
) -> ConfigResult<()> {
    assign_kernels!(b, lhs, rhs, {
        AsnEq => assign::assign::<T>,
        AddEq => assign::add_eq::<T>,
        SubEq => assign::sub_eq::<T>,
        ElMulEq => assign::el_mul_eq::<T>,
        ElDivEq => assign::el_div_eq::<T>,
    });
    Ok(())
}

fn install_unary<T: NumericElement>(b: &mut ContextBuilder, t: TypeId) -> ConfigResult<()> {
    unary_kernels!(b, t, {
        Not => elementwise::not::<T>,
        UPlus => elementwise::uplus::<T>,
        UMinus => elementwise::uminus::<T>,
        Transpose => elementwise::transpose::<T>,
        Hermitian => elementwise::hermitian::<T>,
    });
    Ok(())
}

/// Same representation on both sides
fn install_same<T: NumericElement>(b: &mut ContextBuilder, t: TypeId) -> ConfigResult<()> {
    install_binary_pair::<T>(b, t, t)?;
    install_assign_into::<T>(b, t, t)?;
    install_unary::<T>(b, t)
}

pub(super) fn install(b: &mut ContextBuilder, t: &Builtins) -> ConfigResult<()> {
    // m_m, cm_cm, fm_fm, fcm_fcm
    install_same::<f64>(b, t.m)?;
    install_same::<crate::value::Complex64>(b, t.cm)?;
    install_same::<f32>(b, t.fm)?;
    install_same::<crate::value::Complex32>(b, t.fcm)?;

    // m_fm: single precision wins
    install_binary_pair::<f32>(b, t.m, t.fm)?;
    install_binary_pair::<f32>(b, t.fm, t.m)?;
    install_assign_into::<f32>(b, t.fm, t.m)?;

    Ok(())
}
