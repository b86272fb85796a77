// src/risk/var.rs
//! Value-at-Risk and Conditional VaR
//!
//! All figures are currency losses for a portfolio of value `V`, positive when
//! the tail return is negative.
//!
//! - **Historical VaR**: `-(V · q)` with `q` the `(1-c)` empirical quantile of
//!   the returns, linearly interpolated at position `(1-c)(n-1)` of the sorted
//!   sample.
//! - **Parametric VaR**: normal returns with sample mean `μ` and population
//!   standard deviation `σ`; `z = Φ⁻¹(1-c)` is negative and
//!   `VaR = -V · (μ + zσ)`.
//! - **CVaR** (expected shortfall): `-(V · mean of returns ≤ q)`, the average
//!   of the whole tail rather than its boundary.

use super::returns::PortfolioReturns;
use crate::error::{validation::*, QuantResult};
use crate::math_utils::{norm_inv_cdf, quantile_sorted};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VarEstimates {
    pub confidence: f64,
    pub historical: f64,
    pub parametric: f64,
    pub conditional: f64,
}

/// VaR calculator bound to one return series and confidence level
#[derive(Debug, Clone)]
pub struct VarCalculator<'a> {
    returns: PortfolioReturns<'a>,
    sorted: Vec<f64>,
    confidence: f64,
}

impl<'a> VarCalculator<'a> {
    pub fn new(returns: PortfolioReturns<'a>, confidence: f64) -> QuantResult<Self> {
        validate_probability("confidence", confidence)?;
        let mut sorted = returns.as_slice().to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Ok(VarCalculator {
            returns,
            sorted,
            confidence,
        })
    }

    pub fn alpha(&self) -> f64 {
        1.0 - self.confidence
    }

    /// The (1 - c) return quantile
    pub fn tail_quantile(&self) -> QuantResult<f64> {
        quantile_sorted(&self.sorted, self.alpha())
    }

    pub fn historical_var(&self, portfolio_value: f64) -> QuantResult<f64> {
        validate_positive("portfolio_value", portfolio_value)?;
        Ok(-(portfolio_value * self.tail_quantile()?))
    }

    pub fn parametric_var(&self, portfolio_value: f64) -> QuantResult<f64> {
        validate_positive("portfolio_value", portfolio_value)?;
        self.returns.require(2)?;
        let z = norm_inv_cdf(self.alpha());
        Ok(-portfolio_value * (self.returns.mean() + z * self.returns.std()))
    }

    pub fn conditional_var(&self, portfolio_value: f64) -> QuantResult<f64> {
        validate_positive("portfolio_value", portfolio_value)?;
        let q = self.tail_quantile()?;
        // q never lies below the sample minimum, so the tail is non-empty
        let tail: Vec<f64> = self.sorted.iter().copied().take_while(|&r| r <= q).collect();
        let tail_mean = tail.iter().sum::<f64>() / tail.len() as f64;
        Ok(-(portfolio_value * tail_mean))
    }

    pub fn estimates(&self, portfolio_value: f64) -> QuantResult<VarEstimates> {
        Ok(VarEstimates {
            confidence: self.confidence,
            historical: self.historical_var(portfolio_value)?,
            parametric: self.parametric_var(portfolio_value)?,
            conditional: self.conditional_var(portfolio_value)?,
        })
    }
}

pub fn historical_var(returns: &[f64], portfolio_value: f64, confidence: f64) -> QuantResult<f64> {
    VarCalculator::new(PortfolioReturns::new(returns)?, confidence)?.historical_var(portfolio_value)
}

pub fn parametric_var(returns: &[f64], portfolio_value: f64, confidence: f64) -> QuantResult<f64> {
    VarCalculator::new(PortfolioReturns::new(returns)?, confidence)?.parametric_var(portfolio_value)
}

pub fn conditional_var(returns: &[f64], portfolio_value: f64, confidence: f64) -> QuantResult<f64> {
    VarCalculator::new(PortfolioReturns::new(returns)?, confidence)?.conditional_var(portfolio_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cvar_exceeds_var() {
        let returns = [-0.05, -0.03, -0.02, -0.01, 0.0, 0.01, 0.02, 0.015, 0.005, -0.004];
        let calc = VarCalculator::new(PortfolioReturns::new(&returns).expect("valid"), 0.9).expect("valid");
        let var = calc.historical_var(1_000.0).expect("valid");
        let cvar = calc.conditional_var(1_000.0).expect("valid");
        assert!(var > 0.0);
        assert!(cvar >= var, "cvar {cvar} < var {var}");
    }

    #[test]
    fn test_parametric_matches_closed_form() {
        let returns = [0.01, -0.01, 0.02, -0.02];
        let var = parametric_var(&returns, 1_000_000.0, 0.95).expect("valid");
        // μ = 0, σ = sqrt(0.00025)
        let expected = 1_000_000.0 * 1.6448536269514722 * 0.00025f64.sqrt();
        assert!((var - expected).abs() < 1e-3, "var {var}, expected {expected}");
    }

    #[test]
    fn test_invalid_confidence() {
        assert!(historical_var(&[0.01, -0.02], 1_000.0, 1.0).is_err());
        assert!(historical_var(&[0.01, -0.02], 0.0, 0.95).is_err());
        assert!(parametric_var(&[0.01], 1_000.0, 0.95).is_err());
    }
}
