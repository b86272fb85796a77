// src/hedge/leverage.rs
//! Leverage arithmetic
//!
//! # Scenarios
//!
//! An investment `I` levered `L` times controls `I·L` of the asset, of which
//! `I·(L-1)` is borrowed at a simple annual rate. For a price move `Δ`:
//! ```text
//! levered P&L      = I · L · Δ
//! levered return   = L · Δ
//! borrowing cost   = I · (L - 1) · rate / 365 · days
//! net return       = (levered P&L - borrowing cost) / I
//! ```
//!
//! # Margin-call model
//!
//! The position is financed with equity `E` and debt `(L-1)E`. A price drop
//! `d` costs `L·d·E` of equity. The margin call fires once losses have consumed
//! the fraction `1 - m` of the posted equity, where `m` is the maintenance
//! margin expressed as a fraction of the initial equity:
//! ```text
//! drop fraction      = (1 - m) / L
//! margin-call price  = entry · (1 - (1 - m) / L)
//! ```
//! The default `m = 0` is the wipe-out point, so a 3× position is called after
//! a 33.3% drop. The same formula is used for every call.

use crate::error::{validation::*, QuantError, QuantResult};
use serde::{Deserialize, Serialize};

/// Maintenance margin used when the caller does not pick one
pub const DEFAULT_MAINTENANCE_MARGIN: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginConvention {
    /// Fraction of initial equity that must remain, in [0, 1)
    pub maintenance_margin: f64,
}

impl Default for MarginConvention {
    fn default() -> Self {
        MarginConvention {
            maintenance_margin: DEFAULT_MAINTENANCE_MARGIN,
        }
    }
}

impl MarginConvention {
    pub fn validate(&self) -> QuantResult<()> {
        validate_finite("maintenance_margin", self.maintenance_margin)?;
        if !(0.0..1.0).contains(&self.maintenance_margin) {
            return Err(QuantError::InvalidConfiguration {
                field: "maintenance_margin".to_string(),
                reason: format!("{} is outside [0, 1)", self.maintenance_margin),
            });
        }
        Ok(())
    }

    /// Fractional price drop that triggers the margin call
    pub fn drop_fraction(&self, leverage_ratio: f64) -> QuantResult<f64> {
        self.validate()?;
        validate_leverage(leverage_ratio)?;
        Ok((1.0 - self.maintenance_margin) / leverage_ratio)
    }

    /// Price at which the margin call fires
    pub fn margin_call_price(&self, entry_price: f64, leverage_ratio: f64) -> QuantResult<f64> {
        validate_positive("entry_price", entry_price)?;
        let drop = self.drop_fraction(leverage_ratio)?;
        Ok(entry_price * (1.0 - drop))
    }
}

fn validate_leverage(leverage_ratio: f64) -> QuantResult<()> {
    validate_finite("leverage_ratio", leverage_ratio)?;
    if leverage_ratio < 1.0 {
        return Err(QuantError::InvalidInput {
            parameter: "leverage_ratio".to_string(),
            value: leverage_ratio,
            constraint: "must be at least 1.0".to_string(),
        });
    }
    Ok(())
}

/// Margin-call price under the default convention
pub fn margin_call_price(entry_price: f64, leverage_ratio: f64) -> QuantResult<f64> {
    MarginConvention::default().margin_call_price(entry_price, leverage_ratio)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeverageScenario {
    pub leverage: f64,
    /// I · L · Δ
    pub levered_pnl: f64,
    /// L · Δ
    pub levered_return: f64,
    pub borrowing_cost: f64,
    pub net_profit: f64,
    pub net_return: f64,
}

/// Financing assumptions shared by every scenario row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Financing {
    pub borrowing_rate: f64,
    pub holding_days: u32,
}

impl Default for Financing {
    fn default() -> Self {
        Financing {
            borrowing_rate: 0.03,
            holding_days: 30,
        }
    }
}

/// One scenario row per leverage ratio
pub fn leverage_scenarios(
    initial_investment: f64,
    price_change: f64,
    leverage_ratios: &[f64],
    financing: &Financing,
) -> QuantResult<Vec<LeverageScenario>> {
    validate_positive("initial_investment", initial_investment)?;
    validate_finite("price_change", price_change)?;
    validate_non_negative("borrowing_rate", financing.borrowing_rate)?;

    leverage_ratios
        .iter()
        .map(|&leverage| {
            validate_leverage(leverage)?;
            let levered_pnl = initial_investment * leverage * price_change;
            let borrowing_cost = initial_investment * (leverage - 1.0) * financing.borrowing_rate
                / 365.0
                * financing.holding_days as f64;
            let net_profit = levered_pnl - borrowing_cost;
            Ok(LeverageScenario {
                leverage,
                levered_pnl,
                levered_return: leverage * price_change,
                borrowing_cost,
                net_profit,
                net_return: net_profit / initial_investment,
            })
        })
        .collect()
}

/// Levered return net of financing: `L·r - (L-1)·rate/365·days`
pub fn leveraged_return(
    unlevered_return: f64,
    leverage_ratio: f64,
    financing: &Financing,
) -> QuantResult<f64> {
    validate_finite("unlevered_return", unlevered_return)?;
    validate_leverage(leverage_ratio)?;
    let cost = (leverage_ratio - 1.0) * financing.borrowing_rate / 365.0 * financing.holding_days as f64;
    Ok(unlevered_return * leverage_ratio - cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_times_drop_is_a_third() {
        let drop = MarginConvention::default().drop_fraction(3.0).expect("valid");
        assert!((drop - 1.0 / 3.0).abs() < 1e-12);
        let price = margin_call_price(100.0, 3.0).expect("valid");
        assert!((price - 66.66666666666667).abs() < 1e-9);
    }

    #[test]
    fn test_maintenance_margin_shrinks_cushion() {
        let convention = MarginConvention {
            maintenance_margin: 0.30,
        };
        let drop = convention.drop_fraction(3.0).expect("valid");
        assert!((drop - 0.7 / 3.0).abs() < 1e-12);
        assert!(convention.margin_call_price(100.0, 3.0).expect("valid") > 66.7);
    }

    #[test]
    fn test_invalid_margin_inputs() {
        assert!(margin_call_price(100.0, 0.5).is_err());
        let bad = MarginConvention {
            maintenance_margin: 1.0,
        };
        assert!(bad.drop_fraction(2.0).is_err());
    }

    #[test]
    fn test_scenarios() {
        let rows = leverage_scenarios(1_000_000.0, 0.05, &[1.0, 2.0, 3.0, 5.0], &Financing::default())
            .expect("valid scenarios");
        assert_eq!(rows.len(), 4);

        assert_eq!(rows[0].borrowing_cost, 0.0);
        assert!((rows[0].levered_pnl - 50_000.0).abs() < 1e-9);

        let three = rows[2];
        assert!((three.levered_pnl - 150_000.0).abs() < 1e-6);
        assert!((three.levered_return - 0.15).abs() < 1e-12);
        let expected_cost = 2_000_000.0 * 0.03 / 365.0 * 30.0;
        assert!((three.borrowing_cost - expected_cost).abs() < 1e-6);
        assert!((three.net_return - (150_000.0 - expected_cost) / 1_000_000.0).abs() < 1e-12);
    }

    #[test]
    fn test_leveraged_return_matches_scenario() {
        let financing = Financing::default();
        let rows = leverage_scenarios(1.0, -0.02, &[4.0], &financing).expect("valid");
        let r = leveraged_return(-0.02, 4.0, &financing).expect("valid");
        assert!((rows[0].net_return - r).abs() < 1e-12);
    }
}
