//! Sparse families: sm_sm, scm_scm, m_sm, m_scm and cm_scm.
//!
//! Sparse with sparse stays sparse for arithmetic. Mixed with a full
//! matrix, `+ - * \` give a full result, `.*` and `.^` stay sparse, and a
//! sparse numerator over a scalar keeps its pattern. Comparisons always
//! return a full bool matrix.

use super::{assign_kernels, binary_kernels, unary_kernels, Builtins};
use crate::context::ContextBuilder;
use crate::error::ConfigResult;
use crate::kernels::{assign, concat, elementwise, linalg, sparse, SparseElement};
use crate::types::TypeId;
use crate::value::Complex64;

/// Comparisons and logical operators computed on dense copies
fn install_predicates<T: SparseElement>(b: &mut ContextBuilder, l: TypeId, r: TypeId) -> ConfigResult<()> {
    binary_kernels!(b, l, r, {
        Lt => elementwise::lt::<T>,
        Le => elementwise::le::<T>,
        Eq => elementwise::eq::<T>,
        Ge => elementwise::ge::<T>,
        Gt => elementwise::gt::<T>,
        Ne => elementwise::ne::<T>,
        ElAnd => elementwise::el_and::<T>,
        ElOr => elementwise::el_or::<T>,
    });
    Ok(())
}

fn install_sparse_pair<T: SparseElement>(b: &mut ContextBuilder, t: TypeId) -> ConfigResult<()> {
    binary_kernels!(b, t, t, {
        Add => sparse::add::<T>,
        Sub => sparse::sub::<T>,
        Mul => sparse::mul::<T>,
        Div => sparse::div::<T>,
        Pow => sparse::pow::<T>,
        LeftDiv => sparse::ldiv::<T>,
        ElMul => sparse::el_mul::<T>,
        ElDiv => sparse::el_div::<T>,
        ElPow => sparse::el_pow::<T>,
        ElLeftDiv => sparse::el_ldiv::<T>,
    });
    install_predicates::<T>(b, t, t)?;
    unary_kernels!(b, t, {
        Not => elementwise::not::<T>,
        UPlus => sparse::uplus::<T>,
        UMinus => sparse::uminus::<T>,
        Transpose => sparse::transpose::<T>,
        Hermitian => sparse::hermitian::<T>,
    });
    b.install_cat(t, t, concat::cat_sparse::<T>)?;
    assign_kernels!(b, t, t, {
        AsnEq => assign::assign_sparse::<T>,
    });
    Ok(())
}

/// Both orders of a full `f` and sparse `s` pair, computing in `T`
fn install_mixed<T: SparseElement>(b: &mut ContextBuilder, f: TypeId, s: TypeId) -> ConfigResult<()> {
    binary_kernels!(b, f, s, {
        Add => elementwise::add::<T>,
        Sub => elementwise::sub::<T>,
        Mul => linalg::mul::<T>,
        Div => sparse::full_div_sparse::<T>,
        Pow => linalg::pow::<T>,
        LeftDiv => linalg::ldiv::<T>,
        ElMul => sparse::el_mul::<T>,
        ElDiv => elementwise::el_div::<T>,
        ElPow => sparse::el_pow::<T>,
        ElLeftDiv => sparse::el_ldiv::<T>,
    });
    binary_kernels!(b, s, f, {
        Add => elementwise::add::<T>,
        Sub => elementwise::sub::<T>,
        Mul => linalg::mul::<T>,
        Div => sparse::sparse_div_full::<T>,
        Pow => sparse::pow::<T>,
        LeftDiv => linalg::ldiv::<T>,
        ElMul => sparse::el_mul::<T>,
        ElDiv => elementwise::el_div::<T>,
        ElPow => sparse::el_pow::<T>,
        ElLeftDiv => elementwise::el_ldiv::<T>,
    });
    for (l, r) in [(f, s), (s, f)] {
        binary_kernels!(b, l, r, {
            TransMul => linalg::trans_mul::<T>,
            MulTrans => linalg::mul_trans::<T>,
            HermMul => linalg::herm_mul::<T>,
            MulHerm => linalg::mul_herm::<T>,
        });
    }
    install_predicates::<T>(b, f, s)?;
    install_predicates::<T>(b, s, f)?;
    b.install_cat(f, s, concat::cat_sparse::<T>)?;
    b.install_cat(s, f, concat::cat_sparse::<T>)?;
    Ok(())
}

pub(super) fn install(b: &mut ContextBuilder, t: &Builtins) -> ConfigResult<()> {
    install_sparse_pair::<f64>(b, t.sm)?;
    install_sparse_pair::<Complex64>(b, t.scm)?;

    // m_sm
    install_mixed::<f64>(b, t.m, t.sm)?;
    assign_kernels!(b, t.sm, t.m, {
        AsnEq => assign::assign_sparse::<f64>,
    });
    assign_kernels!(b, t.m, t.sm, {
        AsnEq => assign::assign::<f64>,
    });

    // m_scm and cm_scm
    install_mixed::<Complex64>(b, t.m, t.scm)?;
    install_mixed::<Complex64>(b, t.cm, t.scm)?;
    assign_kernels!(b, t.scm, t.cm, {
        AsnEq => assign::assign_sparse::<Complex64>,
    });
    assign_kernels!(b, t.scm, t.m, {
        AsnEq => assign::assign_sparse::<Complex64>,
    });
    assign_kernels!(b, t.cm, t.scm, {
        AsnEq => assign::assign::<Complex64>,
    });

    Ok(())
}
