//! Scalar type, crate-wide tolerance, and unit conversion constants.

// Our Real scalar type. Template geometry is always millimetres.
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Lazily-initialized tolerance used across the crate for coordinate
/// comparisons (seam detection, boundary chaining, simplicity checks).
/// Defaults to `1e-6`, but can be overridden:
///  1) **Build-time**: set env var `PIPEFLAT_TOLERANCE` (e.g. `PIPEFLAT_TOLERANCE=1e-9 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

/// Returns the current tolerance value.
/// If not set yet, it tries `PIPEFLAT_TOLERANCE` (parsed as `Real`) and
/// falls back to a sensible default.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        // Compile-time env if provided, inherited by dependencies
        if let Some(environment_variable) = option_env!("PIPEFLAT_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        1e-6
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `pipeflat::float_types::set_tolerance(1e-9);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;
/// π/2
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;
/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;

// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
// Unit conversion
// ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
pub const INCH: Real = 25.4;
pub const MM: Real = 1.0;
pub const CM: Real = 10.0;

/// PDF points per millimetre (1 pt = 1/72 inch). Page-space drawing is done
/// in points; the printed output is dimensionally exact only because every
/// mm→pt conversion goes through this one constant.
pub const POINTS_PER_MM: Real = 72.0 / 25.4;

/// Convert template-space millimetres to page-space points.
#[inline]
pub fn mm_to_pt(mm: Real) -> Real {
    mm * POINTS_PER_MM
}

/// Convert page-space points to template-space millimetres.
#[inline]
pub fn pt_to_mm(pt: Real) -> Real {
    pt / POINTS_PER_MM
}
