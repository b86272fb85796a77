// src/risk/returns.rs
use crate::error::{validation::*, QuantResult};
use crate::math_utils::{mean, population_std, snap_dispersion};
use serde::{Deserialize, Serialize};

/// Trading days used to annualize daily statistics
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Shared assumptions for the risk page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// VaR confidence level c in (0, 1)
    pub confidence: f64,
    /// Return observations per year; 252 for daily data
    pub periods_per_year: f64,
    /// Annual risk-free rate
    pub risk_free_rate: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            confidence: 0.95,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            risk_free_rate: 0.02,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> QuantResult<()> {
        validate_probability("confidence", self.confidence)?;
        validate_positive("periods_per_year", self.periods_per_year)?;
        validate_finite("risk_free_rate", self.risk_free_rate)?;
        Ok(())
    }
}

/// Ordered periodic returns, validated once and then read-only
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioReturns<'a> {
    values: &'a [f64],
}

impl<'a> PortfolioReturns<'a> {
    /// Wrap a non-empty series of finite returns
    pub fn new(values: &'a [f64]) -> QuantResult<Self> {
        validate_series("returns", values, 1)?;
        Ok(PortfolioReturns { values })
    }

    pub fn as_slice(&self) -> &'a [f64] {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        mean(self.values)
    }

    /// Population standard deviation, exactly 0 for a constant series
    pub fn std(&self) -> f64 {
        snap_dispersion(population_std(self.values), self.mean())
    }

    /// Fail unless at least `required` observations are present
    pub fn require(&self, required: usize) -> QuantResult<()> {
        validate_series("returns", self.values, required)
    }
}
