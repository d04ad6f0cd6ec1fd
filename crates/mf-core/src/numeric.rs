/// Floating point type used throughout the system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Clamp numerical noise to an exact zero.
///
/// Least-squares solvers routinely return values like 1e-17 for components that
/// are zero in exact arithmetic; callers use this to clean up result vectors.
pub fn snap_to_zero(v: Real, atol: Real) -> Real {
    if v.abs() <= atol { 0.0 } else { v }
}
