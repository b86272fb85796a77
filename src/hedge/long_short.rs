// src/hedge/long_short.rs
//! Long/short equity book
//!
//! A book holds long and short stock positions funded by initial capital and,
//! above 1× leverage, borrowed money. Valuation marks every position whose
//! symbol has a current price; symbols without a quote are skipped.
//!
//! ```text
//! long value   =  Σ q · p            over long positions
//! short value  = -Σ q · p            over short positions
//! short P&L    =  Σ (entry - p) · q
//! gross        =  long notional + short notional   (at entry)
//! net          =  long notional - short notional   (at entry)
//! ```

use crate::side::Side;
use crate::error::{validation::*, QuantError, QuantResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Book is treated as market neutral when |net| / gross is below this
pub const MARKET_NEUTRAL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: Side,
    pub entry_price: f64,
    pub quantity: f64,
}

impl Position {
    pub fn new(symbol: impl Into<String>, side: Side, entry_price: f64, quantity: f64) -> QuantResult<Self> {
        validate_positive("entry_price", entry_price)?;
        validate_positive("quantity", quantity)?;
        Ok(Position {
            symbol: symbol.into(),
            side,
            entry_price,
            quantity,
        })
    }

    /// quantity × (+1 long / -1 short)
    pub fn signed_quantity(&self) -> f64 {
        self.side.sign() * self.quantity
    }

    pub fn entry_notional(&self) -> f64 {
        self.entry_price * self.quantity
    }

    /// Profit of the position at a current price, positive when it made money
    pub fn pnl(&self, current_price: f64) -> f64 {
        self.signed_quantity() * (current_price - self.entry_price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BookValuation {
    pub long_value: f64,
    pub short_value: f64,
    pub net_value: f64,
    pub long_pnl: f64,
    pub short_pnl: f64,
    pub total_pnl: f64,
    /// total P&L over initial capital
    pub return_on_capital: f64,
    /// initial capital + total P&L
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Exposure {
    pub long_exposure: f64,
    pub short_exposure: f64,
    pub gross_exposure: f64,
    pub net_exposure: f64,
    /// |net| / gross, 0 for an empty book
    pub market_neutral_ratio: f64,
    pub is_market_neutral: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongShortBook {
    pub initial_capital: f64,
    pub leverage_ratio: f64,
    pub borrowing_rate: f64,
    positions: Vec<Position>,
}

impl LongShortBook {
    pub fn new(initial_capital: f64, leverage_ratio: f64, borrowing_rate: f64) -> QuantResult<Self> {
        validate_positive("initial_capital", initial_capital)?;
        validate_finite("leverage_ratio", leverage_ratio)?;
        if leverage_ratio < 1.0 {
            return Err(QuantError::InvalidInput {
                parameter: "leverage_ratio".to_string(),
                value: leverage_ratio,
                constraint: "must be at least 1.0".to_string(),
            });
        }
        validate_non_negative("borrowing_rate", borrowing_rate)?;
        Ok(LongShortBook {
            initial_capital,
            leverage_ratio,
            borrowing_rate,
            positions: Vec::new(),
        })
    }

    pub fn add(&mut self, position: Position) -> &mut Self {
        self.positions.push(position);
        self
    }

    pub fn add_long(&mut self, symbol: &str, price: f64, quantity: f64) -> QuantResult<&mut Self> {
        Ok(self.add(Position::new(symbol, Side::Long, price, quantity)?))
    }

    pub fn add_short(&mut self, symbol: &str, price: f64, quantity: f64) -> QuantResult<&mut Self> {
        Ok(self.add(Position::new(symbol, Side::Short, price, quantity)?))
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn borrowed_capital(&self) -> f64 {
        self.initial_capital * (self.leverage_ratio - 1.0)
    }

    pub fn total_capital(&self) -> f64 {
        self.initial_capital * self.leverage_ratio
    }

    /// Simple interest on the borrowed capital, ACT/365
    pub fn borrowing_cost(&self, holding_days: u32) -> f64 {
        self.borrowed_capital() * self.borrowing_rate / 365.0 * holding_days as f64
    }

    /// Mark the book at current prices keyed by symbol
    pub fn valuation(&self, prices: &HashMap<String, f64>) -> QuantResult<BookValuation> {
        let mut long_value = 0.0;
        let mut short_value = 0.0;
        let mut long_pnl = 0.0;
        let mut short_pnl = 0.0;

        for position in &self.positions {
            let Some(&price) = prices.get(&position.symbol) else {
                tracing::debug!(symbol = %position.symbol, "no current price, position skipped");
                continue;
            };
            validate_positive(&position.symbol, price)?;
            match position.side {
                Side::Long => {
                    long_value += price * position.quantity;
                    long_pnl += position.pnl(price);
                }
                Side::Short => {
                    short_value -= price * position.quantity;
                    short_pnl += position.pnl(price);
                }
            }
        }

        let total_pnl = long_pnl + short_pnl;
        Ok(BookValuation {
            long_value,
            short_value,
            net_value: long_value + short_value,
            long_pnl,
            short_pnl,
            total_pnl,
            return_on_capital: total_pnl / self.initial_capital,
            equity: self.initial_capital + total_pnl,
        })
    }

    /// Exposure at entry notional
    pub fn exposure(&self) -> Exposure {
        let (long, short) = self.positions.iter().fold((0.0, 0.0), |(l, s), p| match p.side {
            Side::Long => (l + p.entry_notional(), s),
            Side::Short => (l, s + p.entry_notional()),
        });
        let gross = long + short;
        let net = long - short;
        let ratio = if gross > 0.0 { net.abs() / gross } else { 0.0 };

        Exposure {
            long_exposure: long,
            short_exposure: short,
            gross_exposure: gross,
            net_exposure: net,
            market_neutral_ratio: ratio,
            is_market_neutral: ratio < MARKET_NEUTRAL_THRESHOLD,
        }
    }
}
