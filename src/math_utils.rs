// src/math_utils.rs
//! Normal distribution helpers and descriptive statistics shared by the calculators.

use crate::error::{validation::*, QuantResult};
use statrs::function::erf;
use statrs::statistics::Statistics;
use std::f64::consts::{PI, SQRT_2};

/// Standard normal cumulative distribution Φ(x)
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

/// Standard normal probability density
///
/// # Formula
/// ```text
/// φ(x) = (1/√(2π)) * exp(-x²/2)
/// ```
pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

/// Inverse standard normal CDF Φ⁻¹(p) for p in (0, 1)
///
/// Uses the identity Φ⁻¹(p) = -√2 · erfc⁻¹(2p).
pub fn norm_inv_cdf(p: f64) -> f64 {
    -SQRT_2 * erf::erfc_inv(2.0 * p)
}

/// Arithmetic mean. Empty input yields NaN.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

/// Population standard deviation (divides by n)
pub fn population_std(values: &[f64]) -> f64 {
    values.iter().population_std_dev()
}

/// Relative floor below which a standard deviation is rounding noise
pub const DISPERSION_TOLERANCE: f64 = 1e-12;

/// Zero a dispersion that is rounding noise at the scale of `level`.
///
/// A constant series such as `[0.1; 7]` has a computed standard deviation
/// around 1e-17 rather than exactly 0.
pub fn snap_dispersion(dispersion: f64, level: f64) -> f64 {
    if dispersion <= DISPERSION_TOLERANCE * level.abs().max(1.0) {
        0.0
    } else {
        dispersion
    }
}

/// Empirical quantile with linear interpolation between order statistics.
///
/// The position of quantile `p` in the sorted sample is `p * (n - 1)`.
/// Fails on an empty sample or `p` outside `[0, 1]`.
pub fn quantile_linear(values: &[f64], p: f64) -> QuantResult<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    quantile_sorted(&sorted, p)
}

/// Same as [`quantile_linear`] for an already ascending sample
pub fn quantile_sorted(sorted: &[f64], p: f64) -> QuantResult<f64> {
    validate_series("values", sorted, 1)?;
    validate_range("p", p, 0.0, 1.0)?;
    let n = sorted.len();
    if n == 1 {
        return Ok(sorted[0]);
    }
    let pos = p * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Evenly spaced grid of `n` points across `[start, end]`
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_cdf_symmetry() {
        assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
        for x in [0.3, 1.0, 1.96, 3.5] {
            assert!((norm_cdf(x) + norm_cdf(-x) - 1.0).abs() < 1e-14);
        }
        assert!((norm_cdf(1.959963984540054) - 0.975).abs() < 1e-12);
    }

    #[test]
    fn test_norm_inv_cdf_inverts_cdf() {
        for p in [0.001, 0.01, 0.05, 0.3, 0.5, 0.7, 0.95, 0.999] {
            let x = norm_inv_cdf(p);
            assert!((norm_cdf(x) - p).abs() < 1e-10, "p={p}, x={x}");
        }
        assert!((norm_inv_cdf(0.05) + 1.6448536269514722).abs() < 1e-9);
    }

    #[test]
    fn test_quantile_matches_linear_interpolation() {
        let sample = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(quantile_linear(&sample, 0.0).expect("valid"), 1.0);
        assert_eq!(quantile_linear(&sample, 1.0).expect("valid"), 5.0);
        assert!((quantile_linear(&sample, 0.5).expect("valid") - 3.0).abs() < 1e-12);
        // position 0.1 * 4 = 0.4 between 1.0 and 2.0
        assert!((quantile_linear(&sample, 0.1).expect("valid") - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_of_empty_sample_is_an_error() {
        assert!(matches!(
            quantile_linear(&[], 0.5),
            Err(crate::error::QuantError::InsufficientData { required: 1, actual: 0, .. })
        ));
        assert!(quantile_sorted(&[], 0.05).is_err());
        assert!(quantile_sorted(&[1.0, 2.0], 1.5).is_err());
        assert_eq!(quantile_sorted(&[3.0], 0.05).expect("single point"), 3.0);
    }

    #[test]
    fn test_population_std() {
        let sample = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((mean(&sample) - 5.0).abs() < 1e-12);
        assert!((population_std(&sample) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_has_zero_dispersion() {
        let flat = [0.1; 7];
        assert_eq!(snap_dispersion(population_std(&flat), mean(&flat)), 0.0);
        assert_eq!(snap_dispersion(0.02, 0.001), 0.02);
        assert_eq!(snap_dispersion(2e-9, 5_000.0), 0.0);
    }

    #[test]
    fn test_linspace_endpoints() {
        let grid = linspace(60.0, 140.0, 200);
        assert_eq!(grid.len(), 200);
        assert_eq!(grid[0], 60.0);
        assert!((grid[199] - 140.0).abs() < 1e-9);
    }
}
