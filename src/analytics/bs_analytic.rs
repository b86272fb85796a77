// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes-Merton prices for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model with continuous dividend yield q, the
//! underlying follows:
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//!
//! European options then have the closed forms
//! ```text
//! C = S e^(-qT) Φ(d₁) - K e^(-rT) Φ(d₂)
//! P = K e^(-rT) Φ(-d₂) - S e^(-qT) Φ(-d₁)
//!
//! d₁ = [ln(S/K) + (r - q + σ²/2)T] / (σ√T)
//! d₂ = d₁ - σ√T
//! ```
//!
//! # Degenerate inputs
//!
//! When T = 0 or σ = 0 the terminal price is deterministic and d₁ is not
//! defined. Pricing then short-circuits to the discounted intrinsic value
//! `max(S e^(-qT) - K e^(-rT), 0)` for calls (mirror for puts), which is the
//! plain payoff `max(S - K, 0)` at T = 0. The shortcut is reported as
//! [`PricingRegime::IntrinsicValue`], it is never an error.

use crate::daycount;
use crate::error::{validation::*, QuantError, QuantResult};
use crate::math_utils::norm_cdf;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Call or put
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// +1 for calls, -1 for puts
    pub fn sign(self) -> f64 {
        match self {
            OptionKind::Call => 1.0,
            OptionKind::Put => -1.0,
        }
    }

    /// Exercise value at expiry for a terminal price
    pub fn payoff(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionKind::Call => (spot - strike).max(0.0),
            OptionKind::Put => (strike - spot).max(0.0),
        }
    }
}

/// Which formula produced a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PricingRegime {
    /// Closed form with finite d₁, d₂
    Analytic,
    /// T = 0 or σ = 0: discounted intrinsic value
    IntrinsicValue,
}

/// Inputs of a single Black-Scholes evaluation
///
/// Fields are public for struct-update bumps in sensitivity sweeps; values
/// built that way must pass [`OptionParameters::validate`] before pricing.
/// Deserialization always validates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OptionParametersInput")]
pub struct OptionParameters {
    /// Spot price S > 0
    pub spot: f64,
    /// Strike K > 0
    pub strike: f64,
    /// Time to maturity in years, T ≥ 0
    pub maturity: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Volatility σ ≥ 0
    pub volatility: f64,
    /// Continuous dividend yield q ≥ 0
    #[serde(default)]
    pub dividend_yield: f64,
}

#[derive(Deserialize)]
struct OptionParametersInput {
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    volatility: f64,
    #[serde(default)]
    dividend_yield: f64,
}

impl TryFrom<OptionParametersInput> for OptionParameters {
    type Error = QuantError;

    fn try_from(input: OptionParametersInput) -> QuantResult<Self> {
        OptionParameters::new(input.spot, input.strike, input.maturity, input.rate, input.volatility)?
            .with_dividend_yield(input.dividend_yield)
    }
}

impl OptionParameters {
    pub fn new(spot: f64, strike: f64, maturity: f64, rate: f64, volatility: f64) -> QuantResult<Self> {
        let params = OptionParameters {
            spot,
            strike,
            maturity,
            rate,
            volatility,
            dividend_yield: 0.0,
        };
        params.validate()?;
        Ok(params)
    }

    /// Maturity taken from a valuation date and an expiry date (ACT/365)
    pub fn from_dates(
        spot: f64,
        strike: f64,
        valuation_date: NaiveDate,
        expiry: NaiveDate,
        rate: f64,
        volatility: f64,
    ) -> QuantResult<Self> {
        let maturity = daycount::year_fraction(valuation_date, expiry)?;
        Self::new(spot, strike, maturity, rate, volatility)
    }

    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> QuantResult<Self> {
        validate_non_negative("dividend_yield", dividend_yield)?;
        self.dividend_yield = dividend_yield;
        Ok(self)
    }

    pub fn with_volatility(mut self, volatility: f64) -> QuantResult<Self> {
        validate_non_negative("volatility", volatility)?;
        self.volatility = volatility;
        Ok(self)
    }

    pub fn validate(&self) -> QuantResult<()> {
        validate_positive("spot", self.spot)?;
        validate_positive("strike", self.strike)?;
        validate_non_negative("maturity", self.maturity)?;
        validate_finite("rate", self.rate)?;
        validate_non_negative("volatility", self.volatility)?;
        validate_non_negative("dividend_yield", self.dividend_yield)?;
        Ok(())
    }

    pub fn regime(&self) -> PricingRegime {
        if self.maturity <= 0.0 || self.volatility <= 0.0 {
            PricingRegime::IntrinsicValue
        } else {
            PricingRegime::Analytic
        }
    }

    /// e^(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// e^(-qT)
    pub fn dividend_discount(&self) -> f64 {
        (-self.dividend_yield * self.maturity).exp()
    }

    /// Forward price S e^((r-q)T)
    pub fn forward(&self) -> f64 {
        self.spot * ((self.rate - self.dividend_yield) * self.maturity).exp()
    }

    /// (d₁, d₂), `None` in the intrinsic regime
    pub fn d1_d2(&self) -> Option<(f64, f64)> {
        if self.regime() == PricingRegime::IntrinsicValue {
            return None;
        }
        let vol_sqrt_t = self.volatility * self.maturity.sqrt();
        let d1 = ((self.spot / self.strike).ln()
            + (self.rate - self.dividend_yield + 0.5 * self.volatility * self.volatility)
                * self.maturity)
            / vol_sqrt_t;
        Some((d1, d1 - vol_sqrt_t))
    }

    /// Payoff if exercised now: max(S - K, 0) or max(K - S, 0)
    pub fn intrinsic_value(&self, kind: OptionKind) -> f64 {
        kind.payoff(self.spot, self.strike)
    }

    /// Intrinsic value of the discounted forward, the σ = 0 price
    pub fn discounted_intrinsic_value(&self, kind: OptionKind) -> f64 {
        let pv_spot = self.spot * self.dividend_discount();
        let pv_strike = self.strike * self.discount_factor();
        kind.payoff(pv_spot, pv_strike)
    }

    pub fn price(&self, kind: OptionKind) -> f64 {
        bs_price(kind, self)
    }

    /// Option price minus intrinsic value
    pub fn time_value(&self, kind: OptionKind) -> f64 {
        self.price(kind) - self.intrinsic_value(kind)
    }
}

/// Black-Scholes-Merton price of a European call or put
///
/// Falls back to the discounted intrinsic value when T ≤ 0 or σ ≤ 0.
pub fn bs_price(kind: OptionKind, p: &OptionParameters) -> f64 {
    let Some((d1, d2)) = p.d1_d2() else {
        return p.discounted_intrinsic_value(kind);
    };
    let pv_spot = p.spot * p.dividend_discount();
    let pv_strike = p.strike * p.discount_factor();
    match kind {
        OptionKind::Call => pv_spot * norm_cdf(d1) - pv_strike * norm_cdf(d2),
        OptionKind::Put => pv_strike * norm_cdf(-d2) - pv_spot * norm_cdf(-d1),
    }
}

/// Black-Scholes European call price, no dividends
///
/// # Parameters
/// - `s`: Current stock price
/// - `k`: Strike price
/// - `r`: Risk-free rate
/// - `sigma`: Volatility
/// - `t`: Time to expiration
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> QuantResult<f64> {
    Ok(OptionParameters::new(s, k, t, r, sigma)?.price(OptionKind::Call))
}

/// Black-Scholes European put price, no dividends
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> QuantResult<f64> {
    Ok(OptionParameters::new(s, k, t, r, sigma)?.price(OptionKind::Put))
}
