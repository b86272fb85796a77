// src/risk/portfolio.rs
//! Multi-asset portfolio statistics
//!
//! Weights, mean returns and covariances share one periodicity (annual in the
//! usual case). Portfolio variance is `wᵀΣw`; the fully invested minimum
//! variance portfolio has the closed form
//! ```text
//! w* = Σ⁻¹1 / (1ᵀΣ⁻¹1)
//! ```
//! and may carry short weights.

use crate::error::{validation::*, QuantError, QuantResult};
use crate::math_utils::linspace;
use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use statrs::statistics::Statistics;

/// Smallest Cholesky pivot, relative to the largest, accepted as non-singular
const SINGULAR_PIVOT_RATIO: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub expected_return: f64,
    pub volatility: f64,
    /// (return - rf) / volatility, `None` for a riskless mix
    pub sharpe: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrontierPoint {
    /// Weight of the first asset; the second holds `1 - weight_a`
    pub weight_a: f64,
    pub stats: PortfolioStats,
}

fn check_square(cov: &DMatrix<f64>, n: usize) -> QuantResult<()> {
    if cov.nrows() != n || cov.ncols() != n {
        return Err(QuantError::InvalidConfiguration {
            field: "covariance".to_string(),
            reason: format!("expected {n}x{n}, got {}x{}", cov.nrows(), cov.ncols()),
        });
    }
    if cov.iter().any(|v| !v.is_finite()) {
        return Err(QuantError::InvalidConfiguration {
            field: "covariance".to_string(),
            reason: "entries must be finite".to_string(),
        });
    }
    Ok(())
}

/// Mean, volatility and Sharpe ratio of a weighted portfolio
pub fn portfolio_stats(
    weights: &[f64],
    mean_returns: &[f64],
    cov: &DMatrix<f64>,
    risk_free_rate: f64,
) -> QuantResult<PortfolioStats> {
    validate_series("weights", weights, 1)?;
    validate_series("mean_returns", mean_returns, weights.len())?;
    if mean_returns.len() != weights.len() {
        return Err(QuantError::InvalidConfiguration {
            field: "mean_returns".to_string(),
            reason: format!("{} means for {} weights", mean_returns.len(), weights.len()),
        });
    }
    check_square(cov, weights.len())?;
    validate_finite("risk_free_rate", risk_free_rate)?;

    let w = DVector::from_column_slice(weights);
    let mu = DVector::from_column_slice(mean_returns);
    let expected_return = w.dot(&mu);
    let variance = w.dot(&(cov * &w));
    if variance < -1e-12 {
        return Err(QuantError::InvalidConfiguration {
            field: "covariance".to_string(),
            reason: format!("negative portfolio variance {variance}"),
        });
    }
    let volatility = variance.max(0.0).sqrt();
    let sharpe = (volatility > 0.0).then(|| (expected_return - risk_free_rate) / volatility);

    Ok(PortfolioStats {
        expected_return,
        volatility,
        sharpe,
    })
}

/// Sample covariance (n - 1) of equal-length return series, one per asset
pub fn sample_covariance(asset_returns: &[Vec<f64>]) -> QuantResult<DMatrix<f64>> {
    let n_assets = asset_returns.len();
    if n_assets == 0 {
        return Err(QuantError::InsufficientData {
            series: "asset_returns".to_string(),
            required: 1,
            actual: 0,
        });
    }
    let len = asset_returns[0].len();
    for series in asset_returns {
        validate_series("asset_returns", series, 2)?;
        if series.len() != len {
            return Err(QuantError::InvalidConfiguration {
                field: "asset_returns".to_string(),
                reason: format!("series lengths differ: {} vs {len}", series.len()),
            });
        }
    }

    let means: Vec<f64> = asset_returns.iter().map(|s| s.iter().mean()).collect();
    Ok(DMatrix::from_fn(n_assets, n_assets, |i, j| {
        let cross: f64 = asset_returns[i]
            .iter()
            .zip(&asset_returns[j])
            .map(|(a, b)| (a - means[i]) * (b - means[j]))
            .sum();
        cross / (len - 1) as f64
    }))
}

/// Fully invested minimum-variance weights `Σ⁻¹1 / 1ᵀΣ⁻¹1`
pub fn min_variance_weights(cov: &DMatrix<f64>) -> QuantResult<Vec<f64>> {
    let n = cov.nrows();
    if n == 0 {
        return Err(QuantError::InsufficientData {
            series: "covariance".to_string(),
            required: 1,
            actual: 0,
        });
    }
    check_square(cov, n)?;

    let not_definite = || QuantError::InvalidConfiguration {
        field: "covariance".to_string(),
        reason: "matrix is not positive definite".to_string(),
    };
    let chol = cov.clone().cholesky().ok_or_else(not_definite)?;
    // Rounding can let a singular matrix factor with a vanishing pivot
    let pivots = chol.l().diagonal();
    let smallest = pivots.iter().copied().fold(f64::INFINITY, f64::min);
    let largest = pivots.iter().copied().fold(0.0, f64::max);
    if smallest <= SINGULAR_PIVOT_RATIO * largest {
        return Err(not_definite());
    }
    let raw = chol.solve(&DVector::from_element(n, 1.0));
    let total = raw.sum();
    if total.abs() < f64::EPSILON {
        return Err(QuantError::InvalidConfiguration {
            field: "covariance".to_string(),
            reason: "1ᵀΣ⁻¹1 vanishes".to_string(),
        });
    }
    tracing::debug!(assets = n, "minimum-variance weights solved");
    Ok((raw / total).iter().copied().collect())
}

/// Sweep the weight of asset A from 0 to 1 and report every mix
pub fn two_asset_frontier(
    means: (f64, f64),
    vols: (f64, f64),
    correlation: f64,
    risk_free_rate: f64,
    points: usize,
) -> QuantResult<Vec<FrontierPoint>> {
    validate_non_negative("vol_a", vols.0)?;
    validate_non_negative("vol_b", vols.1)?;
    validate_range("correlation", correlation, -1.0, 1.0)?;
    if points < 2 {
        return Err(QuantError::InvalidConfiguration {
            field: "points".to_string(),
            reason: "frontier needs at least 2 points".to_string(),
        });
    }

    let cov_ab = correlation * vols.0 * vols.1;
    let cov = DMatrix::from_row_slice(2, 2, &[vols.0 * vols.0, cov_ab, cov_ab, vols.1 * vols.1]);
    linspace(0.0, 1.0, points)
        .into_iter()
        .map(|weight_a| {
            let stats = portfolio_stats(&[weight_a, 1.0 - weight_a], &[means.0, means.1], &cov, risk_free_rate)?;
            Ok(FrontierPoint { weight_a, stats })
        })
        .collect()
}

/// Frontier point with the highest Sharpe ratio
pub fn max_sharpe_point(frontier: &[FrontierPoint]) -> Option<FrontierPoint> {
    frontier
        .iter()
        .filter(|p| p.stats.sharpe.is_some())
        .max_by(|a, b| {
            let sa = a.stats.sharpe.unwrap_or(f64::NEG_INFINITY);
            let sb = b.stats.sharpe.unwrap_or(f64::NEG_INFINITY);
            sa.total_cmp(&sb)
        })
        .copied()
}

/// Correlation matrix from a covariance matrix
pub fn correlation_matrix(cov: &DMatrix<f64>) -> QuantResult<DMatrix<f64>> {
    let n = cov.nrows();
    check_square(cov, n)?;
    let sd: Vec<f64> = (0..n).map(|i| cov[(i, i)].sqrt()).collect();
    if let Some(i) = sd.iter().position(|&s| s.is_nan() || s <= 0.0) {
        return Err(QuantError::InvalidInput {
            parameter: format!("variance[{i}]"),
            value: cov[(i, i)],
            constraint: "must be positive".to_string(),
        });
    }
    Ok(DMatrix::from_fn(n, n, |i, j| {
        if i == j {
            1.0
        } else {
            cov[(i, j)] / (sd[i] * sd[j])
        }
    }))
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let (ma, mb) = (a.iter().mean(), b.iter().mean());
    let (mut sab, mut saa, mut sbb) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        sab += (x - ma) * (y - mb);
        saa += (x - ma).powi(2);
        sbb += (y - mb).powi(2);
    }
    sab / (saa * sbb).sqrt()
}

/// Pearson correlation over each trailing window; NaN where a window is flat
pub fn rolling_correlation(a: &[f64], b: &[f64], window: usize) -> QuantResult<Vec<f64>> {
    if window < 2 {
        return Err(QuantError::InvalidConfiguration {
            field: "window".to_string(),
            reason: format!("window {window} must hold at least 2 observations"),
        });
    }
    validate_series("a", a, window)?;
    validate_series("b", b, window)?;
    if a.len() != b.len() {
        return Err(QuantError::InvalidConfiguration {
            field: "b".to_string(),
            reason: format!("series lengths differ: {} vs {}", a.len(), b.len()),
        });
    }
    Ok(a.windows(window)
        .zip(b.windows(window))
        .map(|(wa, wb)| pearson(wa, wb))
        .collect())
}

/// Weighted average of asset vols over portfolio vol; 1 means no diversification
pub fn diversification_ratio(weights: &[f64], cov: &DMatrix<f64>) -> QuantResult<f64> {
    validate_series("weights", weights, 1)?;
    check_square(cov, weights.len())?;
    let weighted_vol: f64 = weights
        .iter()
        .enumerate()
        .map(|(i, w)| w.abs() * cov[(i, i)].max(0.0).sqrt())
        .sum();
    let w = DVector::from_column_slice(weights);
    let port_vol = w.dot(&(cov * &w)).max(0.0).sqrt();
    if port_vol <= 0.0 {
        return Err(QuantError::InvalidInput {
            parameter: "portfolio_volatility".to_string(),
            value: port_vol,
            constraint: "must be positive".to_string(),
        });
    }
    Ok(weighted_vol / port_vol)
}
