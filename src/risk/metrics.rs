// src/risk/metrics.rs
//! Path and ratio statistics
//!
//! Conventions, fixed for every function here:
//! - drawdown at `t` is `(peak_t - x_t) / peak_t`, a positive fraction, with
//!   `peak_t` the running maximum scanned left to right;
//! - ratios annualize with `P` periods per year: mean × `P`, volatility × `√P`;
//! - the risk-free rate is annual;
//! - dispersion is the population standard deviation.

use super::returns::{PortfolioReturns, RiskConfig};
use crate::error::{validation::*, QuantError, QuantResult};
use crate::math_utils::{mean, snap_dispersion};
use crate::rng::price_path;
use statrs::statistics::Statistics;

/// Equity curve `[start, start(1+r₁), …]` compounded from simple returns
pub fn equity_curve(returns: &[f64], start: f64) -> QuantResult<Vec<f64>> {
    validate_positive("start", start)?;
    validate_series("returns", returns, 1)?;
    let mut curve = Vec::with_capacity(returns.len() + 1);
    curve.push(start);
    curve.extend(price_path(start, returns));
    Ok(curve)
}

/// Drawdown from the running peak at every point of a value series.
///
/// The first level must be positive, which keeps every running peak positive.
/// Later levels may fall to 0, a total loss with drawdown 1.
pub fn drawdown_series(values: &[f64]) -> QuantResult<Vec<f64>> {
    validate_series("values", values, 1)?;
    validate_positive("values[0]", values[0])?;
    let mut peak = values[0];
    values
        .iter()
        .map(|&x| {
            if x < 0.0 {
                return Err(QuantError::InvalidInput {
                    parameter: "values".to_string(),
                    value: x,
                    constraint: "series levels must be non-negative".to_string(),
                });
            }
            peak = peak.max(x);
            Ok((peak - x) / peak)
        })
        .collect()
}

/// Largest peak-to-trough decline, 0 for a never-falling series
pub fn max_drawdown(values: &[f64]) -> QuantResult<f64> {
    Ok(drawdown_series(values)?.into_iter().fold(0.0, f64::max))
}

/// Max drawdown of the equity curve grown from `returns`
pub fn max_drawdown_from_returns(returns: &[f64]) -> QuantResult<f64> {
    max_drawdown(&equity_curve(returns, 1.0)?)
}

/// `(mean·P - rf) / (std·√P)`
pub fn sharpe_ratio(returns: &PortfolioReturns, cfg: &RiskConfig) -> QuantResult<f64> {
    cfg.validate()?;
    returns.require(2)?;
    let std = returns.std();
    if std <= 0.0 {
        return Err(QuantError::InvalidInput {
            parameter: "returns".to_string(),
            value: std,
            constraint: "standard deviation must be positive for a Sharpe ratio".to_string(),
        });
    }
    let p = cfg.periods_per_year;
    Ok((returns.mean() * p - cfg.risk_free_rate) / (std * p.sqrt()))
}

/// `(mean·P - rf) / (downside deviation·√P)`.
///
/// Downside deviation is `sqrt(Σ min(r - target, 0)² / n)` over every
/// observation, with `target` a per-period return.
pub fn sortino_ratio(returns: &PortfolioReturns, target: f64, cfg: &RiskConfig) -> QuantResult<f64> {
    cfg.validate()?;
    validate_finite("target", target)?;
    returns.require(2)?;
    let r = returns.as_slice();
    let downside = (r.iter().map(|&x| (x - target).min(0.0).powi(2)).sum::<f64>() / r.len() as f64).sqrt();
    let downside = snap_dispersion(downside, returns.mean().abs().max(target.abs()));
    if downside <= 0.0 {
        return Err(QuantError::InvalidInput {
            parameter: "returns".to_string(),
            value: downside,
            constraint: "no observation below target, downside deviation is zero".to_string(),
        });
    }
    let p = cfg.periods_per_year;
    Ok((returns.mean() * p - cfg.risk_free_rate) / (downside * p.sqrt()))
}

/// Annualized mean return over the max drawdown of the compounded curve
pub fn calmar_ratio(returns: &PortfolioReturns, cfg: &RiskConfig) -> QuantResult<f64> {
    cfg.validate()?;
    let mdd = max_drawdown_from_returns(returns.as_slice())?;
    if mdd <= 0.0 {
        return Err(QuantError::InvalidInput {
            parameter: "max_drawdown".to_string(),
            value: mdd,
            constraint: "series never draws down, Calmar ratio is undefined".to_string(),
        });
    }
    Ok(returns.mean() * cfg.periods_per_year / mdd)
}

/// Rolling annualized volatility of log returns.
///
/// Each entry uses the sample standard deviation (n - 1) of the trailing
/// `window` log returns; the first entry ends at `prices[window]`.
pub fn historical_volatility(prices: &[f64], window: usize, periods_per_year: f64) -> QuantResult<Vec<f64>> {
    validate_positive("periods_per_year", periods_per_year)?;
    if window < 2 {
        return Err(QuantError::InvalidConfiguration {
            field: "window".to_string(),
            reason: format!("window {window} must hold at least 2 returns"),
        });
    }
    validate_series("prices", prices, window + 1)?;
    for &p in prices {
        validate_positive("prices", p)?;
    }

    let log_returns: Vec<f64> = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let scale = periods_per_year.sqrt();
    Ok(log_returns
        .windows(window)
        .map(|w| w.iter().std_dev() * scale)
        .collect())
}

/// Annualized mean of periodic returns
pub fn annualized_return(returns: &[f64], periods_per_year: f64) -> QuantResult<f64> {
    validate_series("returns", returns, 1)?;
    validate_positive("periods_per_year", periods_per_year)?;
    Ok(mean(returns) * periods_per_year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drawdown_tracks_running_peak() {
        let dd = drawdown_series(&[100.0, 120.0, 90.0, 130.0, 117.0]).expect("valid");
        assert_eq!(dd[0], 0.0);
        assert_eq!(dd[1], 0.0);
        assert!((dd[2] - 0.25).abs() < 1e-12);
        assert_eq!(dd[3], 0.0);
        assert!((dd[4] - 0.1).abs() < 1e-12);
        assert!((max_drawdown(&[100.0, 120.0, 90.0, 130.0, 117.0]).expect("valid") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_monotone_series_has_no_drawdown() {
        assert_eq!(max_drawdown(&[1.0, 2.0, 3.0]).expect("valid"), 0.0);
    }

    #[test]
    fn test_total_loss_is_full_drawdown() {
        assert_eq!(max_drawdown(&[1.0, 0.0]).expect("valid"), 1.0);
        assert_eq!(max_drawdown_from_returns(&[0.1, -1.0]).expect("valid"), 1.0);
        assert_eq!(max_drawdown_from_returns(&[0.1, -1.0, 0.5]).expect("valid"), 1.0);

        let wiped = [0.02, -1.0, 0.0];
        let returns = PortfolioReturns::new(&wiped).expect("valid");
        let calmar = calmar_ratio(&returns, &RiskConfig::default()).expect("defined");
        assert!((calmar - mean(&wiped) * 252.0).abs() < 1e-9);
    }

    #[test]
    fn test_drawdown_needs_positive_start_and_non_negative_levels() {
        assert!(max_drawdown(&[0.0, 1.0]).is_err());
        assert!(max_drawdown(&[1.0, -0.5]).is_err());
    }

    #[test]
    fn test_equity_curve() {
        let curve = equity_curve(&[0.1, -0.5], 100.0).expect("valid");
        assert_eq!(curve.len(), 3);
        assert!((curve[2] - 55.0).abs() < 1e-9);
        assert!((max_drawdown_from_returns(&[0.1, -0.5]).expect("valid") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sharpe_annualization() {
        let r = [0.01, -0.01, 0.02, 0.0];
        let returns = PortfolioReturns::new(&r).expect("valid");
        let cfg = RiskConfig::default();
        let m = 0.005;
        let s = (0.000_125f64).sqrt();
        let expected = (m * 252.0 - 0.02) / (s * 252f64.sqrt());
        let sharpe = sharpe_ratio(&returns, &cfg).expect("valid");
        assert!((sharpe - expected).abs() < 1e-9, "sharpe {sharpe}, expected {expected}");
    }

    #[test]
    fn test_flat_returns_rejected() {
        let r = [0.001, 0.001, 0.001];
        let returns = PortfolioReturns::new(&r).expect("valid");
        assert!(sharpe_ratio(&returns, &RiskConfig::default()).is_err());
        assert!(sortino_ratio(&returns, 0.0, &RiskConfig::default()).is_err());
    }

    #[test]
    fn test_constant_nonzero_returns_have_no_sharpe() {
        for r in [vec![0.1; 7], vec![0.02; 252], vec![-0.003; 40]] {
            let returns = PortfolioReturns::new(&r).expect("valid");
            assert_eq!(returns.std(), 0.0);
            let result = sharpe_ratio(&returns, &RiskConfig::default());
            assert!(
                matches!(result, Err(QuantError::InvalidInput { .. })),
                "constant {} gave {:?}",
                r[0],
                result
            );
        }
        let r = [0.05; 9];
        let returns = PortfolioReturns::new(&r).expect("valid");
        assert!(sortino_ratio(&returns, 0.05, &RiskConfig::default()).is_err());
    }

    #[test]
    fn test_historical_volatility_constant_growth_is_zero() {
        let prices: Vec<f64> = (0..10).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let vols = historical_volatility(&prices, 3, 252.0).expect("valid");
        assert_eq!(vols.len(), 7);
        assert!(vols.iter().all(|v| v.abs() < 1e-12));
        assert!(historical_volatility(&prices[..3], 3, 252.0).is_err());
    }
}
