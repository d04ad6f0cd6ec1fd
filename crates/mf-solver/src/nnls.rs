//! Non-negative least squares (Lawson-Hanson active set).

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};

/// NNLS solver configuration.
pub struct NnlsConfig {
    /// Maximum outer iterations; 0 means `3 * columns`
    pub max_iterations: usize,
    /// Dual feasibility tolerance on the negative gradient
    pub tol: f64,
    /// Rank tolerance for the least-squares subproblems
    pub svd_eps: f64,
}

impl Default for NnlsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 0,
            tol: 1e-10,
            svd_eps: 1e-12,
        }
    }
}

/// Solve `min ||A x - b||` subject to `x >= 0`.
///
/// Active-set method: variables move from the zero (active) set to the passive
/// set one at a time, each step solving an unconstrained least squares over the
/// passive columns and backtracking along the segment to stay feasible.
/// Matrices here are small (species count x source count), so the repeated SVD
/// subproblems are not a concern.
pub fn nnls(a: &DMatrix<f64>, b: &DVector<f64>, config: &NnlsConfig) -> SolverResult<DVector<f64>> {
    let (m, n) = a.shape();
    if b.len() != m {
        return Err(SolverError::Numeric {
            what: format!("shape mismatch: A is {}x{}, b has {} rows", m, n, b.len()),
        });
    }

    let mut x = DVector::<f64>::zeros(n);
    if n == 0 || m == 0 {
        return Ok(x);
    }

    let max_outer = if config.max_iterations == 0 {
        3 * n
    } else {
        config.max_iterations
    };

    let mut passive = vec![false; n];

    for _ in 0..max_outer {
        // Negative gradient of the residual
        let w = a.transpose() * (b - a * &x);

        // Most violated zero-set variable
        let mut candidate: Option<usize> = None;
        let mut w_max = config.tol;
        for j in 0..n {
            if !passive[j] && w[j] > w_max {
                w_max = w[j];
                candidate = Some(j);
            }
        }
        let Some(t) = candidate else {
            return Ok(x);
        };
        passive[t] = true;

        // Inner loop: restore primal feasibility of the passive set
        let mut inner = 0;
        loop {
            inner += 1;
            if inner > max_outer * n.max(1) {
                return Err(SolverError::ConvergenceFailed {
                    what: "NNLS inner loop did not terminate".to_string(),
                });
            }

            let cols: Vec<usize> = (0..n).filter(|&j| passive[j]).collect();
            let sub = a.select_columns(&cols);
            let z = sub
                .svd(true, true)
                .solve(b, config.svd_eps)
                .map_err(|what| SolverError::Numeric {
                    what: what.to_string(),
                })?;

            if z.iter().all(|&v| v > 0.0) {
                x.fill(0.0);
                for (k, &j) in cols.iter().enumerate() {
                    x[j] = z[k];
                }
                break;
            }

            // Backtrack to the first variable that hits zero
            let mut alpha = f64::INFINITY;
            for (k, &j) in cols.iter().enumerate() {
                if z[k] <= 0.0 {
                    let step = x[j] / (x[j] - z[k]);
                    if step < alpha {
                        alpha = step;
                    }
                }
            }

            for (k, &j) in cols.iter().enumerate() {
                x[j] += alpha * (z[k] - x[j]);
            }
            for &j in &cols {
                if x[j] <= 1e-14 {
                    x[j] = 0.0;
                    passive[j] = false;
                }
            }
        }
    }

    Ok(x)
}
