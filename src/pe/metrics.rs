// src/pe/metrics.rs
//! Return multiples and internal rate of return
//!
//! Cash flows are annual and indexed from year 0; negative flows are capital
//! paid in, positive flows are distributions.
//!
//! IRR is the rate `r` with `NPV(r) = Σ cf_t / (1 + r)^t = 0`. The solver scans
//! `r ∈ (-0.99, 10]` for the first sign change of the NPV and bisects inside
//! it, so conventional series (one sign change in the flows) always resolve
//! and anything else fails with `NoConvergence` instead of looping.

use crate::error::{validation::*, QuantError, QuantResult};
use crate::math_utils::linspace;
use crate::solvers::root::{bisection, find_bracket, Root, SolverConfig};
use serde::Serialize;
use std::collections::BTreeMap;

/// Lowest rate tried by the IRR scan
pub const IRR_RATE_FLOOR: f64 = -0.99;
/// Highest rate tried by the IRR scan (1000%)
pub const IRR_RATE_CAP: f64 = 10.0;
const IRR_SCAN_POINTS: usize = 1_100;
/// Longest cash-flow horizon accepted by the year-indexed calculators
pub const MAX_HORIZON_YEARS: u32 = 200;

/// Fail when a year index lies beyond [`MAX_HORIZON_YEARS`]
pub fn validate_horizon(name: &str, years: u32) -> QuantResult<()> {
    if years > MAX_HORIZON_YEARS {
        return Err(QuantError::InvalidInput {
            parameter: name.to_string(),
            value: f64::from(years),
            constraint: format!("horizon must not exceed {MAX_HORIZON_YEARS} years"),
        });
    }
    Ok(())
}

/// Net present value at an annual rate
pub fn npv(rate: f64, cash_flows: &[f64]) -> QuantResult<f64> {
    validate_finite("rate", rate)?;
    if rate <= -1.0 {
        return Err(QuantError::InvalidInput {
            parameter: "rate".to_string(),
            value: rate,
            constraint: "must be greater than -1".to_string(),
        });
    }
    validate_series("cash_flows", cash_flows, 1)?;
    Ok(npv_unchecked(rate, cash_flows))
}

fn npv_unchecked(rate: f64, cash_flows: &[f64]) -> f64 {
    let growth = 1.0 + rate;
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / growth.powi(t as i32))
        .sum()
}

pub fn irr(cash_flows: &[f64]) -> QuantResult<f64> {
    Ok(irr_with(cash_flows, &SolverConfig::default())?.value)
}

pub fn irr_with(cash_flows: &[f64], cfg: &SolverConfig) -> QuantResult<Root> {
    validate_series("cash_flows", cash_flows, 2)?;
    let has_inflow = cash_flows.iter().any(|&cf| cf > 0.0);
    let has_outflow = cash_flows.iter().any(|&cf| cf < 0.0);
    if !(has_inflow && has_outflow) {
        return Err(QuantError::NoConvergence {
            method: "irr".to_string(),
            iterations: 0,
            reason: "cash flows never change sign".to_string(),
        });
    }

    let f = |r: f64| npv_unchecked(r, cash_flows);
    let grid = linspace(IRR_RATE_FLOOR, IRR_RATE_CAP, IRR_SCAN_POINTS);
    let (lo, hi) = find_bracket(f, &grid).ok_or_else(|| QuantError::NoConvergence {
        method: "irr".to_string(),
        iterations: 0,
        reason: format!("NPV keeps one sign over ({IRR_RATE_FLOOR}, {IRR_RATE_CAP}]"),
    })?;
    if lo == hi {
        return Ok(Root { value: lo, iterations: 0 });
    }
    bisection(f, lo, hi, cfg, "irr")
}

/// IRR of a year-indexed schedule; years with no entry carry a zero flow
pub fn irr_from_schedule(schedule: &BTreeMap<u32, f64>) -> QuantResult<f64> {
    let Some(&last_year) = schedule.keys().next_back() else {
        return Err(QuantError::InsufficientData {
            series: "schedule".to_string(),
            required: 2,
            actual: 0,
        });
    };
    validate_horizon("schedule year", last_year)?;
    let mut flows = vec![0.0; last_year as usize + 1];
    for (&year, &cf) in schedule {
        flows[year as usize] = cf;
    }
    irr(&flows)
}

/// Multiple on invested capital
pub fn moic(invested_capital: f64, proceeds: f64) -> QuantResult<f64> {
    validate_positive("invested_capital", invested_capital)?;
    validate_finite("proceeds", proceeds)?;
    Ok(proceeds / invested_capital)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FundMetrics {
    /// distributions / paid-in
    pub dpi: f64,
    /// residual value / paid-in
    pub rvpi: f64,
    /// dpi + rvpi
    pub tvpi: f64,
}

pub fn fund_metrics(paid_in: f64, distributions: f64, residual_value: f64) -> QuantResult<FundMetrics> {
    validate_positive("paid_in", paid_in)?;
    validate_non_negative("distributions", distributions)?;
    validate_finite("residual_value", residual_value)?;
    let dpi = distributions / paid_in;
    let rvpi = residual_value / paid_in;
    Ok(FundMetrics {
        dpi,
        rvpi,
        tvpi: dpi + rvpi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npv_at_zero_rate_is_sum() {
        assert_eq!(npv(0.0, &[-100.0, 30.0, 80.0]).expect("valid"), 10.0);
        assert!(npv(-1.0, &[-100.0, 110.0]).is_err());
    }

    #[test]
    fn test_irr_single_period() {
        let r = irr(&[-100.0, 110.0]).expect("converges");
        assert!((r - 0.10).abs() < 1e-8, "irr {r}");
    }

    #[test]
    fn test_irr_negative_rate() {
        let r = irr(&[-100.0, 0.0, 81.0]).expect("converges");
        assert!((r + 0.10).abs() < 1e-8, "irr {r}");
    }

    #[test]
    fn test_irr_without_sign_change() {
        assert!(matches!(irr(&[100.0, 50.0]), Err(QuantError::NoConvergence { .. })));
        assert!(irr(&[-100.0]).is_err());
    }

    #[test]
    fn test_schedule_fills_gaps() {
        let schedule = BTreeMap::from([(0, -100.0), (3, 100.0 * 1.2f64.powi(3))]);
        let r = irr_from_schedule(&schedule).expect("converges");
        assert!((r - 0.2).abs() < 1e-8);
        assert!(irr_from_schedule(&BTreeMap::new()).is_err());
    }

    #[test]
    fn test_schedule_beyond_horizon_rejected() {
        let stray = BTreeMap::from([(0, -100.0), (u32::MAX, 150.0)]);
        assert!(matches!(
            irr_from_schedule(&stray),
            Err(QuantError::InvalidInput { .. })
        ));
        let longest = BTreeMap::from([(0, -100.0), (MAX_HORIZON_YEARS, 1e6)]);
        assert!(irr_from_schedule(&longest).is_ok());
    }

    #[test]
    fn test_fund_metrics() {
        let m = fund_metrics(100.0, 60.0, 90.0).expect("valid");
        assert_eq!(m.dpi, 0.6);
        assert_eq!(m.rvpi, 0.9);
        assert!((m.tvpi - 1.5).abs() < 1e-12);
        assert!(fund_metrics(0.0, 60.0, 90.0).is_err());
        assert!(moic(0.0, 10.0).is_err());
        assert_eq!(moic(300.0, 900.0).expect("valid"), 3.0);
    }
}
