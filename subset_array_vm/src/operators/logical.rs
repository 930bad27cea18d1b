//! Non-numeric families: b_b, str_str and cell.
//!
//! Arithmetic on bool and character arrays is not installed; those
//! operands widen to `matrix`.

use super::{assign_kernels, binary_kernels, unary_kernels, Builtins};
use crate::context::ContextBuilder;
use crate::error::ConfigResult;
use crate::kernels::{assign, concat, elementwise, logical};

pub(super) fn install(b: &mut ContextBuilder, t: &Builtins) -> ConfigResult<()> {
    // b_b
    binary_kernels!(b, t.logical, t.logical, {
        ElAnd => logical::and,
        ElOr => logical::or,
        Eq => logical::bool_eq,
        Ne => logical::bool_ne,
    });
    unary_kernels!(b, t.logical, {
        Not => logical::not,
        Transpose => elementwise::transpose::<bool>,
        Hermitian => elementwise::transpose::<bool>,
    });
    b.install_cat(t.logical, t.logical, concat::cat_same::<bool>)?;
    assign_kernels!(b, t.logical, t.logical, {
        AsnEq => assign::assign_same::<bool>,
    });

    // str_str, any mix of quoting styles
    let strings = [t.string, t.sq_string];
    for &l in &strings {
        for &r in &strings {
            binary_kernels!(b, l, r, {
                Eq => logical::char_eq,
                Ne => logical::char_ne,
            });
            b.install_cat(l, r, concat::cat_char)?;
            // the target keeps its quoting style
            assign_kernels!(b, l, r, {
                AsnEq => assign::assign_same::<char>,
            });
        }
        unary_kernels!(b, l, {
            Transpose => logical::char_transpose,
            Hermitian => logical::char_transpose,
        });
    }

    // cell
    b.install_cat(t.cell, t.cell, concat::cat_cell)?;
    unary_kernels!(b, t.cell, {
        Transpose => logical::cell_transpose,
        Hermitian => logical::cell_transpose,
    });
    assign_kernels!(b, t.cell, t.cell, {
        AsnEq => assign::assign_cell,
    });

    Ok(())
}
