//! int32 families: i32_i32 and i32_m. Mixed with a double the result is
//! int32, in either operand order.

use super::{assign_kernels, binary_kernels, unary_kernels, Builtins};
use crate::context::ContextBuilder;
use crate::error::ConfigResult;
use crate::kernels::{elementwise, integer};
use crate::types::TypeId;

fn install_pair(b: &mut ContextBuilder, l: TypeId, r: TypeId) -> ConfigResult<()> {
    binary_kernels!(b, l, r, {
        Add => integer::add,
        Sub => integer::sub,
        Mul => integer::mul,
        Div => integer::div,
        Lt => integer::lt,
        Le => integer::le,
        Eq => integer::eq,
        Ge => integer::ge,
        Gt => integer::gt,
        Ne => integer::ne,
        ElMul => integer::el_mul,
        ElDiv => integer::el_div,
        ElPow => integer::el_pow,
    });
    b.install_cat(l, r, integer::cat)?;
    Ok(())
}

pub(super) fn install(b: &mut ContextBuilder, t: &Builtins) -> ConfigResult<()> {
    // i32_i32
    install_pair(b, t.int32, t.int32)?;
    unary_kernels!(b, t.int32, {
        Not => integer::not,
        UPlus => elementwise::uplus::<i32>,
        UMinus => integer::uminus,
        Transpose => elementwise::transpose::<i32>,
        Hermitian => elementwise::transpose::<i32>,
    });
    assign_kernels!(b, t.int32, t.int32, {
        AsnEq => integer::assign,
    });

    // i32_m
    install_pair(b, t.int32, t.m)?;
    install_pair(b, t.m, t.int32)?;
    assign_kernels!(b, t.int32, t.m, {
        AsnEq => integer::assign,
    });

    Ok(())
}
