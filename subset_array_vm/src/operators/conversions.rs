//! Widen, narrow, convert and assign-conversion edges between the
//! built-in representations.

use super::Builtins;
use crate::context::ContextBuilder;
use crate::error::ConfigResult;
use crate::kernels::convert;

pub(super) fn install(b: &mut ContextBuilder, t: &Builtins) -> ConfigResult<()> {
    // Default widen edges, at most one per type
    b.install_widen(t.m, t.cm, convert::to_complex_matrix)?;
    b.install_widen(t.fm, t.fcm, convert::to_float_complex_matrix)?;
    b.install_widen(t.sm, t.scm, convert::to_sparse_complex)?;
    b.install_widen(t.dm, t.m, convert::to_matrix)?;
    b.install_widen(t.pm, t.m, convert::to_matrix)?;
    b.install_widen(t.logical, t.m, convert::to_matrix)?;
    b.install_widen(t.string, t.m, convert::to_matrix)?;
    b.install_widen(t.sq_string, t.m, convert::to_matrix)?;
    b.install_widen(t.null_matrix, t.m, convert::to_matrix)?;
    b.install_widen(t.null_str, t.string, convert::null_to_storable)?;
    b.install_widen(t.null_sq_str, t.sq_string, convert::null_to_storable)?;

    // Narrow edges
    b.install_narrow(t.cm, convert::narrow_complex)?;
    b.install_narrow(t.fcm, convert::narrow_float_complex)?;
    b.install_narrow(t.scm, convert::narrow_sparse_complex)?;
    b.install_narrow(t.dm, convert::narrow_diag)?;

    // Explicit conversions
    b.install_conv(t.m, t.sm, convert::to_sparse)?;
    b.install_conv(t.sm, t.m, convert::to_matrix)?;
    b.install_conv(t.m, t.fm, convert::to_float_matrix)?;
    b.install_conv(t.fm, t.m, convert::to_matrix)?;
    b.install_conv(t.m, t.int32, convert::to_int32)?;
    b.install_conv(t.int32, t.m, convert::to_matrix)?;
    b.install_conv(t.m, t.logical, convert::to_bool)?;
    b.install_conv(t.m, t.string, convert::to_string)?;
    b.install_conv(t.string, t.sq_string, convert::to_sq_string)?;
    b.install_conv(t.cm, t.scm, convert::to_sparse_complex)?;
    b.install_conv(t.scm, t.cm, convert::to_complex_matrix)?;
    b.install_conv(t.cm, t.fcm, convert::to_float_complex_from_complex)?;
    b.install_conv(t.fcm, t.cm, convert::to_complex_matrix)?;
    b.install_conv(t.dm, t.sm, convert::to_sparse)?;
    b.install_conv(t.pm, t.sm, convert::to_sparse)?;

    // Assigning into a narrower target converts the target first
    b.install_assign_conv(t.m, t.cm, t.cm)?;
    b.install_assign_conv(t.m, t.fm, t.fm)?;
    b.install_assign_conv(t.fm, t.fcm, t.fcm)?;
    b.install_assign_conv(t.sm, t.scm, t.scm)?;
    b.install_assign_conv(t.m, t.scm, t.cm)?;
    b.install_assign_conv(t.logical, t.m, t.m)?;
    b.install_assign_conv(t.string, t.m, t.m)?;
    b.install_assign_conv(t.sq_string, t.m, t.m)?;
    b.install_assign_conv(t.dm, t.m, t.m)?;
    b.install_assign_conv(t.pm, t.m, t.m)?;

    Ok(())
}
