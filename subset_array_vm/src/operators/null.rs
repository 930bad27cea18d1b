//! Literal-empty sentinels.
//!
//! In concatenation a sentinel contributes nothing. As the right side of
//! a plain assignment it deletes the indexed elements.

use super::{assign_kernels, Builtins};
use crate::context::ContextBuilder;
use crate::error::ConfigResult;
use crate::kernels::{assign, concat};
use crate::value::{Complex32, Complex64};

pub(super) fn install(b: &mut ContextBuilder, t: &Builtins) -> ConfigResult<()> {
    for n in t.nulls() {
        for x in t.storable() {
            b.install_cat(x, n, concat::keep_left)?;
            b.install_cat(n, x, concat::keep_right)?;
        }
        for other in t.nulls() {
            b.install_cat(n, other, concat::keep_left)?;
        }

        assign_kernels!(b, t.m, n, { AsnEq => assign::delete_elements::<f64> });
        assign_kernels!(b, t.cm, n, { AsnEq => assign::delete_elements::<Complex64> });
        assign_kernels!(b, t.fm, n, { AsnEq => assign::delete_elements::<f32> });
        assign_kernels!(b, t.fcm, n, { AsnEq => assign::delete_elements::<Complex32> });
        assign_kernels!(b, t.int32, n, { AsnEq => assign::delete_elements::<i32> });
        assign_kernels!(b, t.logical, n, { AsnEq => assign::delete_elements::<bool> });
        assign_kernels!(b, t.string, n, { AsnEq => assign::delete_elements::<char> });
        assign_kernels!(b, t.sq_string, n, { AsnEq => assign::delete_elements::<char> });
        assign_kernels!(b, t.cell, n, { AsnEq => assign::assign_cell });
    }
    Ok(())
}
