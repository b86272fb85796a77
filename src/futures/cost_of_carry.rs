// src/futures/cost_of_carry.rs
//! Cost-of-carry futures pricing
//!
//! # Fair value
//! ```text
//! F = S e^((r - q)T)
//! ```
//! with q the dividend yield (equity index) or convenience yield (commodity).
//!
//! # Basis convention
//!
//! `basis = market - F` measures the quoted futures against its carry fair
//! value. This crate classifies the sign the same way for every underlying:
//! - basis > 0: the futures trades rich to carry, reported as `Contango`
//! - basis < 0: the futures trades cheap to carry, reported as `Backwardation`
//! - basis = 0: `Flat`
//!
//! The textbook spot basis `market - S` is reported alongside.

use crate::daycount;
use crate::error::{validation::*, QuantError, QuantResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BasisKind {
    Contango,
    Backwardation,
    Flat,
}

/// Deserialization runs the same checks as [`FuturesQuote::new`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FuturesQuoteInput")]
pub struct FuturesQuote {
    pub spot: f64,
    pub rate: f64,
    /// Dividend or convenience yield
    #[serde(default)]
    pub carry_yield: f64,
    /// Years to delivery
    pub maturity: f64,
}

/// Cash-and-carry analysis of a quoted futures price
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArbitrageAnalysis {
    pub fair_value: f64,
    pub market_price: f64,
    /// market - fair value
    pub price_difference: f64,
    /// Buy spot, sell futures, net of cost
    pub cash_and_carry_profit: f64,
    /// Sell spot, buy futures, net of cost
    pub reverse_cash_and_carry_profit: f64,
    pub basis_kind: BasisKind,
    pub arbitrage_opportunity: bool,
}

#[derive(Deserialize)]
struct FuturesQuoteInput {
    spot: f64,
    rate: f64,
    #[serde(default)]
    carry_yield: f64,
    maturity: f64,
}

impl TryFrom<FuturesQuoteInput> for FuturesQuote {
    type Error = QuantError;

    fn try_from(input: FuturesQuoteInput) -> QuantResult<Self> {
        FuturesQuote::new(input.spot, input.rate, input.carry_yield, input.maturity)
    }
}

impl FuturesQuote {
    pub fn new(spot: f64, rate: f64, carry_yield: f64, maturity: f64) -> QuantResult<Self> {
        let quote = FuturesQuote {
            spot,
            rate,
            carry_yield,
            maturity,
        };
        quote.validate()?;
        Ok(quote)
    }

    pub fn validate(&self) -> QuantResult<()> {
        validate_positive("spot", self.spot)?;
        validate_finite("rate", self.rate)?;
        validate_finite("carry_yield", self.carry_yield)?;
        validate_positive("maturity", self.maturity)?;
        Ok(())
    }

    pub fn from_dates(
        spot: f64,
        rate: f64,
        carry_yield: f64,
        valuation_date: NaiveDate,
        delivery: NaiveDate,
    ) -> QuantResult<Self> {
        let maturity = daycount::year_fraction(valuation_date, delivery)?;
        Self::new(spot, rate, carry_yield, maturity)
    }

    /// F = S e^((r - q)T)
    pub fn fair_value(&self) -> f64 {
        self.spot * ((self.rate - self.carry_yield) * self.maturity).exp()
    }

    /// market - F
    pub fn basis(&self, market_price: f64) -> f64 {
        market_price - self.fair_value()
    }

    /// market - S
    pub fn spot_basis(&self, market_price: f64) -> f64 {
        market_price - self.spot
    }

    pub fn classify(&self, market_price: f64) -> BasisKind {
        let basis = self.basis(market_price);
        if basis > 0.0 {
            BasisKind::Contango
        } else if basis < 0.0 {
            BasisKind::Backwardation
        } else {
            BasisKind::Flat
        }
    }

    /// Arbitrage check with a round-trip cost expressed as a fraction of spot
    ///
    /// The flag is raised when `|market - F| > S * transaction_cost`.
    pub fn arbitrage(&self, market_price: f64, transaction_cost: f64) -> QuantResult<ArbitrageAnalysis> {
        validate_positive("market_price", market_price)?;
        validate_non_negative("transaction_cost", transaction_cost)?;

        let fair_value = self.fair_value();
        let diff = market_price - fair_value;
        let cost = self.spot * transaction_cost;

        Ok(ArbitrageAnalysis {
            fair_value,
            market_price,
            price_difference: diff,
            cash_and_carry_profit: diff - cost,
            reverse_cash_and_carry_profit: -diff - cost,
            basis_kind: self.classify(market_price),
            arbitrage_opportunity: diff.abs() > cost,
        })
    }
}

/// Number of futures contracts hedging a portfolio
///
/// `N = β · portfolio_value / (futures_price · multiplier)`
pub fn hedge_contracts(
    portfolio_value: f64,
    beta: f64,
    futures_price: f64,
    multiplier: f64,
) -> QuantResult<f64> {
    validate_finite("portfolio_value", portfolio_value)?;
    validate_finite("beta", beta)?;
    validate_positive("futures_price", futures_price)?;
    validate_positive("multiplier", multiplier)?;
    Ok(beta * portfolio_value / (futures_price * multiplier))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote() -> FuturesQuote {
        FuturesQuote::new(100.0, 0.05, 0.02, 90.0 / 365.0).expect("valid quote")
    }

    #[test]
    fn test_fair_value() {
        assert!((quote().fair_value() - 100.74246875910444).abs() < 1e-10);
    }

    #[test]
    fn test_basis_sign_classification() {
        let q = quote();
        assert_eq!(q.classify(101.5), BasisKind::Contango);
        assert_eq!(q.classify(100.2), BasisKind::Backwardation);
        assert!(q.basis(101.5) > 0.0);
        assert!((q.spot_basis(100.75) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_arbitrage_threshold() {
        let q = quote();
        // 0.1% of spot = 0.10
        let quiet = q.arbitrage(100.75, 0.001).expect("valid");
        assert!(!quiet.arbitrage_opportunity);

        let rich = q.arbitrage(101.5, 0.001).expect("valid");
        assert!(rich.arbitrage_opportunity);
        assert!(rich.cash_and_carry_profit > 0.0);
        assert!(rich.reverse_cash_and_carry_profit < 0.0);
    }

    #[test]
    fn test_invalid_quote() {
        assert!(FuturesQuote::new(0.0, 0.05, 0.0, 0.25).is_err());
        assert!(FuturesQuote::new(100.0, 0.05, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_hedge_contracts() {
        let n = hedge_contracts(5_000_000.0, 1.2, 4_000.0, 50.0).expect("valid");
        assert!((n - 30.0).abs() < 1e-12);
    }
}
