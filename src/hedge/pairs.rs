// src/hedge/pairs.rs
//! Pairs-trading spread signal
//!
//! `spread = p_long - p_short`, `z = (spread - μ) / σ` against the historical
//! spread mean and standard deviation. |z| > 2 flags a mean-reversion setup.

use crate::error::{validation::*, QuantResult};
use crate::math_utils::{mean, population_std, snap_dispersion};
use serde::Serialize;

pub const ZSCORE_ENTRY: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpreadSignal {
    pub current_spread: f64,
    pub historical_mean: f64,
    pub z_score: f64,
    pub is_overvalued: bool,
    pub is_undervalued: bool,
    pub mean_reversion_opportunity: bool,
}

pub fn spread_signal(
    long_price: f64,
    short_price: f64,
    historical_mean: f64,
    historical_std: f64,
) -> QuantResult<SpreadSignal> {
    validate_positive("long_price", long_price)?;
    validate_positive("short_price", short_price)?;
    validate_finite("historical_mean", historical_mean)?;
    validate_positive("historical_std", historical_std)?;

    let current_spread = long_price - short_price;
    let z_score = (current_spread - historical_mean) / historical_std;
    Ok(SpreadSignal {
        current_spread,
        historical_mean,
        z_score,
        is_overvalued: z_score > ZSCORE_ENTRY,
        is_undervalued: z_score < -ZSCORE_ENTRY,
        mean_reversion_opportunity: z_score.abs() > ZSCORE_ENTRY,
    })
}

/// Signal with mean and std estimated from a spread history
pub fn spread_signal_from_history(
    long_price: f64,
    short_price: f64,
    spread_history: &[f64],
) -> QuantResult<SpreadSignal> {
    validate_series("spread_history", spread_history, 2)?;
    let m = mean(spread_history);
    spread_signal(
        long_price,
        short_price,
        m,
        snap_dispersion(population_std(spread_history), m),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_spread_flags_overvalued() {
        let s = spread_signal(110.0, 95.0, 10.0, 2.0).expect("valid");
        assert_eq!(s.current_spread, 15.0);
        assert_eq!(s.z_score, 2.5);
        assert!(s.is_overvalued);
        assert!(s.mean_reversion_opportunity);
    }

    #[test]
    fn test_flat_history_rejected() {
        assert!(spread_signal_from_history(110.0, 95.0, &[5.0, 5.0, 5.0]).is_err());
        assert!(spread_signal_from_history(110.0, 95.0, &[0.1; 7]).is_err());
    }

    #[test]
    fn test_history_estimates() {
        let s = spread_signal_from_history(101.0, 100.0, &[0.0, 2.0]).expect("valid");
        assert_eq!(s.historical_mean, 1.0);
        assert_eq!(s.z_score, 0.0);
        assert!(!s.mean_reversion_opportunity);
    }
}
