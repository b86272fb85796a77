// src/analytics/greeks.rs
//! Black-Scholes-Merton Greeks
//!
//! Analytic partial derivatives of the price in [`super::bs_analytic`]:
//! ```text
//! Δ_call = e^(-qT) Φ(d₁)              Δ_put = e^(-qT) (Φ(d₁) - 1)
//! Γ      = e^(-qT) φ(d₁) / (S σ √T)
//! ν      = S e^(-qT) φ(d₁) √T
//! Θ_call = -S e^(-qT) φ(d₁) σ / (2√T) - r K e^(-rT) Φ(d₂) + q S e^(-qT) Φ(d₁)
//! Θ_put  = -S e^(-qT) φ(d₁) σ / (2√T) + r K e^(-rT) Φ(-d₂) - q S e^(-qT) Φ(-d₁)
//! ρ_call = K T e^(-rT) Φ(d₂)          ρ_put = -K T e^(-rT) Φ(-d₂)
//! ```
//!
//! Units are the raw derivatives: theta per year of calendar time, vega per
//! 1.00 of volatility, rho per 1.00 of rate. [`GreeksResult::display_units`]
//! converts to the per-day / per-percentage-point figures shown on screen.

use super::bs_analytic::{OptionKind, OptionParameters};
use crate::math_utils::{norm_cdf, norm_pdf};
use serde::Serialize;

/// The five first-order sensitivities at one parameter point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GreeksResult {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
    pub rho: f64,
}

impl GreeksResult {
    /// Theta per calendar day, vega and rho per 1 percentage point
    pub fn display_units(&self) -> GreeksResult {
        GreeksResult {
            delta: self.delta,
            gamma: self.gamma,
            theta: self.theta / 365.0,
            vega: self.vega / 100.0,
            rho: self.rho / 100.0,
        }
    }
}

/// Selects one Greek, e.g. for a heat map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Greek {
    Delta,
    Gamma,
    Theta,
    Vega,
    Rho,
}

impl Greek {
    pub fn pick(self, g: &GreeksResult) -> f64 {
        match self {
            Greek::Delta => g.delta,
            Greek::Gamma => g.gamma,
            Greek::Theta => g.theta,
            Greek::Vega => g.vega,
            Greek::Rho => g.rho,
        }
    }
}

/// All five Greeks for a call or put
pub fn greeks(kind: OptionKind, p: &OptionParameters) -> GreeksResult {
    let df_r = p.discount_factor();
    let df_q = p.dividend_discount();

    let Some((d1, d2)) = p.d1_d2() else {
        return intrinsic_greeks(kind, p);
    };

    let sqrt_t = p.maturity.sqrt();
    let pdf_d1 = norm_pdf(d1);
    let gamma = df_q * pdf_d1 / (p.spot * p.volatility * sqrt_t);
    let vega = p.spot * df_q * pdf_d1 * sqrt_t;
    let decay = -p.spot * df_q * pdf_d1 * p.volatility / (2.0 * sqrt_t);

    match kind {
        OptionKind::Call => GreeksResult {
            delta: df_q * norm_cdf(d1),
            gamma,
            theta: decay - p.rate * p.strike * df_r * norm_cdf(d2)
                + p.dividend_yield * p.spot * df_q * norm_cdf(d1),
            vega,
            rho: p.strike * p.maturity * df_r * norm_cdf(d2),
        },
        OptionKind::Put => GreeksResult {
            delta: df_q * (norm_cdf(d1) - 1.0),
            gamma,
            theta: decay + p.rate * p.strike * df_r * norm_cdf(-d2)
                - p.dividend_yield * p.spot * df_q * norm_cdf(-d1),
            vega,
            rho: -p.strike * p.maturity * df_r * norm_cdf(-d2),
        },
    }
}

// Sensitivities of max(±(S e^(-qT) - K e^(-rT)), 0): either the forward leg
// is fully in the money or the option is worthless.
fn intrinsic_greeks(kind: OptionKind, p: &OptionParameters) -> GreeksResult {
    let df_r = p.discount_factor();
    let df_q = p.dividend_discount();
    let pv_spot = p.spot * df_q;
    let pv_strike = p.strike * df_r;
    let in_the_money = kind.sign() * (pv_spot - pv_strike) > 0.0;

    if !in_the_money {
        return GreeksResult {
            delta: 0.0,
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
            rho: 0.0,
        };
    }

    let w = kind.sign();
    GreeksResult {
        delta: w * df_q,
        gamma: 0.0,
        theta: w * (p.dividend_yield * pv_spot - p.rate * pv_strike),
        vega: 0.0,
        rho: w * p.strike * p.maturity * df_r,
    }
}
