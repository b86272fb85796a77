// src/solvers/root.rs
//! Bounded one-dimensional root finders
//!
//! Both solvers work on a bracket `[lo, hi]` over which the objective changes
//! sign, and both stop after `max_iterations` at the latest:
//!
//! - **Bisection**: halves the bracket every step. Linear convergence, always
//!   terminates, used for IRR.
//! - **Safeguarded Newton**: takes Newton steps while they stay inside the
//!   current bracket and falls back to bisection otherwise. Quadratic
//!   convergence near the root, used for implied volatility.
//!
//! Convergence is declared when `|f(x)| < tolerance` or the bracket is
//! narrower than `tolerance`.

use crate::error::{validation::*, QuantError, QuantResult};
use serde::{Deserialize, Serialize};

/// Stopping rules for the iterative solvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl SolverConfig {
    pub fn validate(&self) -> QuantResult<()> {
        validate_positive("tolerance", self.tolerance)?;
        if self.max_iterations == 0 {
            return Err(QuantError::InvalidConfiguration {
                field: "max_iterations".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.max_iterations > 10_000 {
            return Err(QuantError::InvalidConfiguration {
                field: "max_iterations".to_string(),
                reason: "exceeds maximum allowed (10,000)".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: 1e-10,
            max_iterations: 200,
        }
    }
}

/// Converged root together with the work it took
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Root {
    pub value: f64,
    pub iterations: usize,
}

fn no_sign_change(method: &str, lo: f64, hi: f64, f_lo: f64, f_hi: f64) -> QuantError {
    QuantError::NoConvergence {
        method: method.to_string(),
        iterations: 0,
        reason: format!(
            "no sign change on [{}, {}] (f(lo) = {:.6e}, f(hi) = {:.6e})",
            lo, hi, f_lo, f_hi
        ),
    }
}

/// First adjacent pair of grid points over which `f` changes sign
pub fn find_bracket<F>(f: F, grid: &[f64]) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let mut prev: Option<(f64, f64)> = None;
    for &x in grid {
        let fx = f(x);
        if !fx.is_finite() {
            prev = None;
            continue;
        }
        if fx == 0.0 {
            return Some((x, x));
        }
        if let Some((px, pfx)) = prev {
            if pfx.signum() != fx.signum() {
                return Some((px, x));
            }
        }
        prev = Some((x, fx));
    }
    None
}

/// Bisection on a sign-changing bracket
pub fn bisection<F>(f: F, lo: f64, hi: f64, cfg: &SolverConfig, method: &str) -> QuantResult<Root>
where
    F: Fn(f64) -> f64,
{
    cfg.validate()?;
    let (mut lo, mut hi) = (lo.min(hi), lo.max(hi));
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo == 0.0 {
        return Ok(Root { value: lo, iterations: 0 });
    }
    if f_hi == 0.0 {
        return Ok(Root { value: hi, iterations: 0 });
    }
    if !(f_lo.is_finite() && f_hi.is_finite()) || f_lo.signum() == f_hi.signum() {
        return Err(no_sign_change(method, lo, hi, f_lo, f_hi));
    }

    for iteration in 1..=cfg.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);

        if f_mid.abs() < cfg.tolerance || 0.5 * (hi - lo) < cfg.tolerance {
            tracing::debug!(method, root = mid, iterations = iteration, "bisection converged");
            return Ok(Root { value: mid, iterations: iteration });
        }

        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(QuantError::NoConvergence {
        method: method.to_string(),
        iterations: cfg.max_iterations,
        reason: format!("bracket still [{}, {}] at iteration cap", lo, hi),
    })
}

/// Newton-Raphson kept inside a sign-changing bracket
///
/// `df` is the analytic derivative of `f`. A step that leaves the bracket, or
/// a derivative that is zero or non-finite, is replaced by a bisection step.
pub fn newton_bisect<F, D>(
    f: F,
    df: D,
    x0: f64,
    lo: f64,
    hi: f64,
    cfg: &SolverConfig,
    method: &str,
) -> QuantResult<Root>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    cfg.validate()?;
    let (mut lo, mut hi) = (lo.min(hi), lo.max(hi));
    let f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo == 0.0 {
        return Ok(Root { value: lo, iterations: 0 });
    }
    if f_hi == 0.0 {
        return Ok(Root { value: hi, iterations: 0 });
    }
    if !(f_lo.is_finite() && f_hi.is_finite()) || f_lo.signum() == f_hi.signum() {
        return Err(no_sign_change(method, lo, hi, f_lo, f_hi));
    }
    let lo_sign = f_lo.signum();

    let mut x = if x0 > lo && x0 < hi { x0 } else { 0.5 * (lo + hi) };

    for iteration in 1..=cfg.max_iterations {
        let fx = f(x);
        if fx.abs() < cfg.tolerance {
            tracing::debug!(method, root = x, iterations = iteration, "newton converged");
            return Ok(Root { value: x, iterations: iteration });
        }

        if fx.signum() == lo_sign {
            lo = x;
        } else {
            hi = x;
        }
        if hi - lo < cfg.tolerance {
            return Ok(Root { value: 0.5 * (lo + hi), iterations: iteration });
        }

        let slope = df(x);
        let newton = x - fx / slope;
        x = if slope.is_finite() && slope != 0.0 && newton > lo && newton < hi {
            newton
        } else {
            tracing::trace!(method, x, slope, "newton step rejected, bisecting");
            0.5 * (lo + hi)
        };
    }

    Err(QuantError::NoConvergence {
        method: method.to_string(),
        iterations: cfg.max_iterations,
        reason: format!("last iterate {} with bracket [{}, {}]", x, lo, hi),
    })
}
