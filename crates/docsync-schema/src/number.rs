//! Numeric field encoding
//!
//! Whole numbers are written without a fractional part (`100`, not `100.0`)
//! so rendered content matches what generation and the editors emit.

use serde::Serializer;

/// Largest magnitude at which every integer is exact in an `f64`
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

#[allow(clippy::trivially_copy_pass_by_ref, clippy::cast_possible_truncation)]
pub(crate) fn serialize<S: Serializer>(n: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT {
        serializer.serialize_i64(*n as i64)
    } else {
        serializer.serialize_f64(*n)
    }
}
