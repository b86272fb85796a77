// src/mc/mc_engine.rs
//! Monte Carlo cross-check for the closed-form option prices
//!
//! Simulates the terminal price with the exact GBM solution
//! ```text
//! S_T = S₀ exp((r - q - σ²/2)T + σ√T Z),   Z ~ N(0,1)
//! ```
//! and averages the discounted payoff. The estimate converges to the
//! Black-Scholes-Merton price at rate 1/√paths, which makes it a teaching
//! device for "the formula is the expectation".
//!
//! Path `i` draws from its own generator seeded with `seed + i`, so results do
//! not depend on the rayon thread count.

use crate::analytics::bs_analytic::{OptionKind, OptionParameters};
use crate::error::{validation::*, QuantError, QuantResult};
use crate::rng::RngFactory;
use crate::rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McConfig {
    pub paths: usize,
    pub seed: u64,
    pub use_antithetic: bool,
}

impl McConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> QuantResult<()> {
        if self.paths < 2 {
            Err(QuantError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "must be at least 2".to_string(),
            })
        } else if self.paths > 100_000_000 {
            Err(QuantError::InvalidConfiguration {
                field: "paths".to_string(),
                reason: "exceeds maximum allowed (100 million)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for McConfig {
    fn default() -> Self {
        McConfig {
            paths: 200_000,
            seed: 12345,
            use_antithetic: true,
        }
    }
}

/// Price estimate with its standard error
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct McEstimate {
    pub price: f64,
    pub std_error: f64,
    pub paths: usize,
}

impl McEstimate {
    /// Whether `reference` lies within `k` standard errors of the estimate
    pub fn agrees_with(&self, reference: f64, k: f64) -> bool {
        (self.price - reference).abs() <= k * self.std_error
    }
}

fn terminal_price(p: &OptionParameters, z: f64) -> f64 {
    let drift = (p.rate - p.dividend_yield - 0.5 * p.volatility * p.volatility) * p.maturity;
    p.spot * (drift + p.volatility * p.maturity.sqrt() * z).exp()
}

fn validate_inputs(p: &OptionParameters, cfg: &McConfig) -> QuantResult<()> {
    cfg.validate()?;
    p.validate()?;
    validate_positive("maturity", p.maturity)?;
    Ok(())
}

/// Monte Carlo price of a European option under GBM
///
/// With antithetic variates each path averages the payoffs of `Z` and `-Z`.
pub fn mc_price_european(
    kind: OptionKind,
    p: &OptionParameters,
    cfg: &McConfig,
) -> QuantResult<McEstimate> {
    validate_inputs(p, cfg)?;
    let n = cfg.paths;
    let factory = RngFactory::new(cfg.seed);
    let discount = p.discount_factor();

    let (sum, sum_sq) = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut rng = factory.stream(i as u64);
            let z = rng::get_normal_draw(&mut rng);
            let mut payoff = kind.payoff(terminal_price(p, z), p.strike);
            if cfg.use_antithetic {
                payoff = 0.5 * (payoff + kind.payoff(terminal_price(p, -z), p.strike));
            }
            let discounted = discount * payoff;
            (discounted, discounted * discounted)
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));

    let mean = sum / n as f64;
    // Tiny negative values come from cancellation when every payoff is equal
    let sample_var = ((sum_sq - n as f64 * mean * mean) / (n as f64 - 1.0)).max(0.0);
    let std_error = (sample_var / n as f64).sqrt();

    if !mean.is_finite() || !std_error.is_finite() {
        return Err(QuantError::NoConvergence {
            method: "Monte Carlo".to_string(),
            iterations: n,
            reason: format!("non-finite estimate {} ± {}", mean, std_error),
        });
    }

    tracing::debug!(?kind, price = mean, std_error, paths = n, "monte carlo price");
    Ok(McEstimate {
        price: mean,
        std_error,
        paths: n,
    })
}

/// Monte Carlo delta via the pathwise derivative
///
/// # Mathematical Framework
///
/// ```text
/// ∂/∂S₀ max(S_T - K, 0) = 1_{S_T > K} · S_T/S₀
/// ∂/∂S₀ max(K - S_T, 0) = -1_{S_T < K} · S_T/S₀
/// ```
/// discounted at e^(-rT).
pub fn mc_delta_pathwise(kind: OptionKind, p: &OptionParameters, cfg: &McConfig) -> QuantResult<f64> {
    validate_inputs(p, cfg)?;
    let n = cfg.paths;
    let factory = RngFactory::new(cfg.seed);

    let path_delta = |st: f64| -> f64 {
        let in_the_money = match kind {
            OptionKind::Call => st > p.strike,
            OptionKind::Put => st < p.strike,
        };
        if in_the_money {
            kind.sign() * st / p.spot
        } else {
            0.0
        }
    };

    let sum: f64 = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut rng = factory.stream(i as u64);
            let z = rng::get_normal_draw(&mut rng);
            let mut d = path_delta(terminal_price(p, z));
            if cfg.use_antithetic {
                d = 0.5 * (d + path_delta(terminal_price(p, -z)));
            }
            d
        })
        .sum();

    Ok(p.discount_factor() * sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(McConfig::default().validate().is_ok());
    }

    #[test]
    fn test_single_path_rejected() {
        let p = OptionParameters::new(100.0, 100.0, 1.0, 0.05, 0.2).expect("valid");
        let cfg = McConfig {
            paths: 1,
            ..Default::default()
        };
        assert!(mc_price_european(OptionKind::Call, &p, &cfg).is_err());
    }

    #[test]
    fn test_seed_reproducibility() {
        let p = OptionParameters::new(100.0, 100.0, 1.0, 0.05, 0.2).expect("valid");
        let cfg = McConfig {
            paths: 10_000,
            ..Default::default()
        };
        let a = mc_price_european(OptionKind::Put, &p, &cfg).expect("valid");
        let b = mc_price_european(OptionKind::Put, &p, &cfg).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn test_expired_option_rejected() {
        let p = OptionParameters::new(100.0, 100.0, 0.0, 0.05, 0.2).expect("valid");
        assert!(mc_price_european(OptionKind::Call, &p, &McConfig::default()).is_err());
    }
}
