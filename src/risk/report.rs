// src/risk/report.rs
//! One-call risk summary for a return series
//!
//! A [`RiskMetricSet`] selects the metrics to compute; unselected fields come
//! back as `None`.

use super::metrics::{calmar_ratio, max_drawdown_from_returns, sharpe_ratio, sortino_ratio};
use super::returns::{PortfolioReturns, RiskConfig};
use super::var::VarCalculator;
use crate::error::{validation::*, QuantResult};
use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RiskMetricSet: u32 {
        const HISTORICAL_VAR = 1 << 0;
        const PARAMETRIC_VAR = 1 << 1;
        const CONDITIONAL_VAR = 1 << 2;
        const MAX_DRAWDOWN = 1 << 3;
        const SHARPE = 1 << 4;
        const SORTINO = 1 << 5;
        const CALMAR = 1 << 6;
        const VOLATILITY = 1 << 7;

        const VAR = Self::HISTORICAL_VAR.bits() | Self::PARAMETRIC_VAR.bits() | Self::CONDITIONAL_VAR.bits();
        const RATIOS = Self::SHARPE.bits() | Self::SORTINO.bits() | Self::CALMAR.bits();
    }
}

impl Default for RiskMetricSet {
    fn default() -> Self {
        RiskMetricSet::VAR | RiskMetricSet::MAX_DRAWDOWN | RiskMetricSet::SHARPE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RiskReport {
    pub observations: usize,
    pub confidence: f64,
    pub historical_var: Option<f64>,
    pub parametric_var: Option<f64>,
    pub conditional_var: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub sharpe: Option<f64>,
    pub sortino: Option<f64>,
    pub calmar: Option<f64>,
    /// Annualized population volatility
    pub volatility: Option<f64>,
}

/// Compute the selected metrics; the first failing metric aborts the report
pub fn risk_report(
    returns: &PortfolioReturns,
    portfolio_value: f64,
    cfg: &RiskConfig,
    metrics: RiskMetricSet,
) -> QuantResult<RiskReport> {
    cfg.validate()?;
    validate_positive("portfolio_value", portfolio_value)?;

    let var = VarCalculator::new(*returns, cfg.confidence)?;
    let pick = |flag: RiskMetricSet| metrics.contains(flag);

    let report = RiskReport {
        observations: returns.len(),
        confidence: cfg.confidence,
        historical_var: pick(RiskMetricSet::HISTORICAL_VAR)
            .then(|| var.historical_var(portfolio_value))
            .transpose()?,
        parametric_var: pick(RiskMetricSet::PARAMETRIC_VAR)
            .then(|| var.parametric_var(portfolio_value))
            .transpose()?,
        conditional_var: pick(RiskMetricSet::CONDITIONAL_VAR)
            .then(|| var.conditional_var(portfolio_value))
            .transpose()?,
        max_drawdown: pick(RiskMetricSet::MAX_DRAWDOWN)
            .then(|| max_drawdown_from_returns(returns.as_slice()))
            .transpose()?,
        sharpe: pick(RiskMetricSet::SHARPE)
            .then(|| sharpe_ratio(returns, cfg))
            .transpose()?,
        sortino: pick(RiskMetricSet::SORTINO)
            .then(|| sortino_ratio(returns, 0.0, cfg))
            .transpose()?,
        calmar: pick(RiskMetricSet::CALMAR)
            .then(|| calmar_ratio(returns, cfg))
            .transpose()?,
        volatility: pick(RiskMetricSet::VOLATILITY).then(|| returns.std() * cfg.periods_per_year.sqrt()),
    };

    tracing::debug!(
        observations = report.observations,
        metrics = metrics.bits(),
        "risk report computed"
    );
    Ok(report)
}
