// src/analytics/payoffs.rs
//! Option P&L at expiry for payoff diagrams
//!
//! # Definitions
//!
//! For a premium `c` paid (long) or received (short):
//! - **Long call**: max(S_T - K, 0) - c
//! - **Short call**: c - max(S_T - K, 0)
//! - **Long put**: max(K - S_T, 0) - c
//! - **Short put**: c - max(K - S_T, 0)
//!
//! A single-leg diagram samples terminal prices evenly across
//! `K * (1 ± range_pct)`; a multi-leg strategy centres the same grid on the
//! mean strike of its legs.

use super::bs_analytic::OptionKind;
use crate::error::{validation::*, QuantError, QuantResult};
use crate::math_utils::linspace;
use crate::side::Side;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DIAGRAM_POINTS: usize = 200;
pub const DEFAULT_RANGE_PCT: f64 = 0.4;

/// One option leg held to expiry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionLeg {
    pub kind: OptionKind,
    pub side: Side,
    pub strike: f64,
    pub premium: f64,
}

impl OptionLeg {
    pub fn new(kind: OptionKind, side: Side, strike: f64, premium: f64) -> QuantResult<Self> {
        validate_positive("strike", strike)?;
        validate_non_negative("premium", premium)?;
        Ok(OptionLeg {
            kind,
            side,
            strike,
            premium,
        })
    }

    /// P&L at expiry for a terminal price
    pub fn pnl_at_expiry(&self, terminal: f64) -> f64 {
        self.side.sign() * (self.kind.payoff(terminal, self.strike) - self.premium)
    }

    /// Terminal price at which the P&L crosses zero
    pub fn break_even(&self) -> f64 {
        match self.kind {
            OptionKind::Call => self.strike + self.premium,
            OptionKind::Put => (self.strike - self.premium).max(0.0),
        }
    }
}

/// Sampled P&L curve ready for a line chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoffDiagram {
    pub prices: Vec<f64>,
    pub pnl: Vec<f64>,
    pub break_even: f64,
    /// Best and worst P&L over the sampled range
    pub max_profit: f64,
    pub max_loss: f64,
}

/// Payoff diagram with the default 200 points over K·(1 ± 40%)
pub fn payoff_diagram(leg: &OptionLeg) -> QuantResult<PayoffDiagram> {
    payoff_diagram_with(leg, DEFAULT_RANGE_PCT, DEFAULT_DIAGRAM_POINTS)
}

pub fn payoff_diagram_with(
    leg: &OptionLeg,
    range_pct: f64,
    points: usize,
) -> QuantResult<PayoffDiagram> {
    let prices = price_grid(leg.strike, range_pct, points)?;
    let pnl: Vec<f64> = prices.iter().map(|&s| leg.pnl_at_expiry(s)).collect();
    let (max_loss, max_profit) = extremes(&pnl);

    Ok(PayoffDiagram {
        prices,
        pnl,
        break_even: leg.break_even(),
        max_profit,
        max_loss,
    })
}

/// Combined P&L of several legs held to expiry on one price grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyPayoff {
    pub prices: Vec<f64>,
    /// One curve per leg, in input order
    pub legs: Vec<Vec<f64>>,
    pub total: Vec<f64>,
    pub max_profit: f64,
    pub max_loss: f64,
    /// Prices where the total P&L crosses zero, interpolated between grid points
    pub break_evens: Vec<f64>,
}

/// Multi-leg payoff (straddles, spreads, ...) over `mean strike × (1 ± range_pct)`
pub fn strategy_payoff(legs: &[OptionLeg], range_pct: f64, points: usize) -> QuantResult<StrategyPayoff> {
    if legs.is_empty() {
        return Err(QuantError::InvalidInput {
            parameter: "legs".to_string(),
            value: 0.0,
            constraint: "a strategy needs at least one leg".to_string(),
        });
    }
    let centre = legs.iter().map(|l| l.strike).sum::<f64>() / legs.len() as f64;
    let prices = price_grid(centre, range_pct, points)?;

    let curves: Vec<Vec<f64>> = legs
        .iter()
        .map(|leg| prices.iter().map(|&s| leg.pnl_at_expiry(s)).collect())
        .collect();
    let total: Vec<f64> = (0..prices.len())
        .map(|i| curves.iter().map(|c| c[i]).sum())
        .collect();
    let (max_loss, max_profit) = extremes(&total);
    let break_evens = zero_crossings(&prices, &total);

    Ok(StrategyPayoff {
        prices,
        legs: curves,
        total,
        max_profit,
        max_loss,
        break_evens,
    })
}

fn price_grid(centre: f64, range_pct: f64, points: usize) -> QuantResult<Vec<f64>> {
    validate_range("range_pct", range_pct, 0.0, 1.0)?;
    if points < 2 {
        return Err(QuantError::InvalidConfiguration {
            field: "points".to_string(),
            reason: "a diagram needs at least 2 points".to_string(),
        });
    }
    Ok(linspace(centre * (1.0 - range_pct), centre * (1.0 + range_pct), points))
}

/// (min, max) of a curve
fn extremes(curve: &[f64]) -> (f64, f64) {
    curve
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn zero_crossings(prices: &[f64], pnl: &[f64]) -> Vec<f64> {
    let mut crossings = Vec::new();
    for i in 0..pnl.len() {
        if pnl[i] == 0.0 {
            crossings.push(prices[i]);
        } else if let Some(&next) = pnl.get(i + 1) {
            if next != 0.0 && (pnl[i] < 0.0) != (next < 0.0) {
                let t = pnl[i] / (pnl[i] - next);
                crossings.push(prices[i] + t * (prices[i + 1] - prices[i]));
            }
        }
    }
    crossings
}
