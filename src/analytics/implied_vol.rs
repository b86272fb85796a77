// src/analytics/implied_vol.rs
//! Implied volatility by safeguarded Newton-Raphson
//!
//! Solves `bs_price(σ) = market_price` for σ in `[VOL_LOWER, VOL_UPPER]`.
//! Newton steps use the analytic vega; the bracket guarantees termination and
//! catches the deep in/out-of-the-money cases where vega underflows.
//!
//! A call price is monotone in σ between the bounds
//! ```text
//! max(S e^(-qT) - K e^(-rT), 0)  <  C  <  S e^(-qT)
//! ```
//! (puts: `max(K e^(-rT) - S e^(-qT), 0) < P < K e^(-rT)`), so a target price
//! outside them has no root and is reported as `NoConvergence`.

use super::bs_analytic::{bs_price, OptionKind, OptionParameters};
use super::greeks::greeks;
use crate::error::{validation::*, QuantError, QuantResult};
use crate::solvers::root::{newton_bisect, Root, SolverConfig};

pub const VOL_LOWER: f64 = 1e-4;
pub const VOL_UPPER: f64 = 5.0;
pub const DEFAULT_INITIAL_VOL: f64 = 0.20;

/// No-arbitrage price band (lower, upper) of a European option
pub fn price_bounds(kind: OptionKind, p: &OptionParameters) -> (f64, f64) {
    let pv_spot = p.spot * p.dividend_discount();
    let pv_strike = p.strike * p.discount_factor();
    match kind {
        OptionKind::Call => ((pv_spot - pv_strike).max(0.0), pv_spot),
        OptionKind::Put => ((pv_strike - pv_spot).max(0.0), pv_strike),
    }
}

/// Implied volatility with the default solver settings and a 20% first guess
pub fn implied_volatility(
    kind: OptionKind,
    market_price: f64,
    params: &OptionParameters,
) -> QuantResult<f64> {
    implied_volatility_with(kind, market_price, params, DEFAULT_INITIAL_VOL, &SolverConfig::default())
        .map(|root| root.value)
}

/// Implied volatility with an explicit first guess and stopping rules
///
/// The volatility stored in `params` is ignored.
pub fn implied_volatility_with(
    kind: OptionKind,
    market_price: f64,
    params: &OptionParameters,
    initial_vol: f64,
    cfg: &SolverConfig,
) -> QuantResult<Root> {
    params.validate()?;
    validate_positive("maturity", params.maturity)?;
    validate_positive("market_price", market_price)?;

    let (lower, upper) = price_bounds(kind, params);
    if market_price <= lower || market_price >= upper {
        return Err(QuantError::NoConvergence {
            method: "implied volatility".to_string(),
            iterations: 0,
            reason: format!(
                "target price {} outside no-arbitrage band ({}, {})",
                market_price, lower, upper
            ),
        });
    }

    let at = |sigma: f64| OptionParameters {
        volatility: sigma,
        ..*params
    };
    let objective = |sigma: f64| bs_price(kind, &at(sigma)) - market_price;
    let vega = |sigma: f64| greeks(kind, &at(sigma)).vega;

    let root = newton_bisect(
        objective,
        vega,
        initial_vol,
        VOL_LOWER,
        VOL_UPPER,
        cfg,
        "implied volatility",
    )
    .map_err(|e| {
        tracing::warn!(?kind, market_price, error = %e, "implied volatility failed");
        e
    })?;

    tracing::debug!(
        ?kind,
        market_price,
        sigma = root.value,
        iterations = root.iterations,
        "implied volatility solved"
    );
    Ok(root)
}
