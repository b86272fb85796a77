// src/pe/dcf.rs
//! Discounted cash flow valuation
//!
//! ```text
//! EBITDA_t = EBITDA_0 · (1 + g)^t                         t = 1..N
//! FCF_t    = EBITDA_t · (1 - tax) - capex% · EBITDA_t - ΔNWC
//! EV       = Σ FCF_t / (1 + w)^t + TV / (1 + w)^N
//! ```
//! D&A is taken as zero, so EBIT equals EBITDA. The terminal value method is
//! always chosen by the caller.

use super::metrics::validate_horizon;
use crate::error::{validation::*, QuantError, QuantResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum TerminalValue {
    /// Gordon growth: `FCF_N (1 + g) / (w - g)`, requires `w > g`
    PerpetuityGrowth { growth: f64 },
    /// `EBITDA_N × multiple`
    ExitMultiple { multiple: f64 },
}

impl TerminalValue {
    pub fn value(&self, final_fcf: f64, final_ebitda: f64, wacc: f64) -> QuantResult<f64> {
        match *self {
            TerminalValue::PerpetuityGrowth { growth } => {
                validate_finite("growth", growth)?;
                if wacc <= growth {
                    return Err(QuantError::InvalidInput {
                        parameter: "growth".to_string(),
                        value: growth,
                        constraint: format!("must be below the discount rate {wacc}"),
                    });
                }
                Ok(final_fcf * (1.0 + growth) / (wacc - growth))
            }
            TerminalValue::ExitMultiple { multiple } => {
                validate_positive("multiple", multiple)?;
                Ok(final_ebitda * multiple)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DcfAssumptions {
    pub wacc: f64,
    pub tax_rate: f64,
    /// Capital expenditure as a fraction of EBITDA
    pub capex_pct: f64,
    /// Change in net working capital, per year
    pub nwc_change: f64,
}

impl Default for DcfAssumptions {
    fn default() -> Self {
        DcfAssumptions {
            wacc: 0.08,
            tax_rate: 0.25,
            capex_pct: 0.05,
            nwc_change: 0.0,
        }
    }
}

impl DcfAssumptions {
    pub fn validate(&self) -> QuantResult<()> {
        validate_positive("wacc", self.wacc)?;
        validate_range("tax_rate", self.tax_rate, 0.0, 1.0)?;
        validate_range("capex_pct", self.capex_pct, 0.0, 1.0)?;
        validate_finite("nwc_change", self.nwc_change)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcfValuation {
    pub ebitda: Vec<f64>,
    pub free_cash_flows: Vec<f64>,
    pub pv_cash_flows: f64,
    pub terminal_value: f64,
    pub pv_terminal_value: f64,
    pub enterprise_value: f64,
}

impl DcfValuation {
    /// Share of enterprise value coming from the terminal value
    pub fn terminal_share(&self) -> f64 {
        self.pv_terminal_value / self.enterprise_value
    }
}

/// EBITDA for years 1..=years grown from the base year
pub fn project_ebitda(initial_ebitda: f64, growth: f64, years: u32) -> QuantResult<Vec<f64>> {
    validate_positive("initial_ebitda", initial_ebitda)?;
    validate_finite("growth", growth)?;
    validate_horizon("years", years)?;
    Ok((1..=years)
        .map(|t| initial_ebitda * (1.0 + growth).powi(t as i32))
        .collect())
}

pub fn free_cash_flows(ebitda: &[f64], assumptions: &DcfAssumptions) -> QuantResult<Vec<f64>> {
    assumptions.validate()?;
    validate_series("ebitda", ebitda, 0)?;
    Ok(ebitda
        .iter()
        .map(|e| e * (1.0 - assumptions.tax_rate) - assumptions.capex_pct * e - assumptions.nwc_change)
        .collect())
}

/// Discount the cash flows and the terminal value at `wacc`
pub fn enterprise_value(
    ebitda: &[f64],
    fcf: &[f64],
    wacc: f64,
    method: TerminalValue,
) -> QuantResult<DcfValuation> {
    validate_positive("wacc", wacc)?;
    validate_series("fcf", fcf, 1)?;
    if ebitda.len() != fcf.len() {
        return Err(QuantError::InvalidConfiguration {
            field: "ebitda".to_string(),
            reason: format!("{} EBITDA years for {} cash flows", ebitda.len(), fcf.len()),
        });
    }

    let discount = |t: usize| (1.0 + wacc).powi(t as i32);
    let pv_cash_flows: f64 = fcf.iter().enumerate().map(|(i, cf)| cf / discount(i + 1)).sum();
    let n = fcf.len();
    let terminal_value = method.value(fcf[n - 1], ebitda[n - 1], wacc)?;
    let pv_terminal_value = terminal_value / discount(n);

    Ok(DcfValuation {
        ebitda: ebitda.to_vec(),
        free_cash_flows: fcf.to_vec(),
        pv_cash_flows,
        terminal_value,
        pv_terminal_value,
        enterprise_value: pv_cash_flows + pv_terminal_value,
    })
}

/// Project, derive cash flows and value in one call
pub fn dcf_valuation(
    initial_ebitda: f64,
    growth: f64,
    years: u32,
    assumptions: &DcfAssumptions,
    method: TerminalValue,
) -> QuantResult<DcfValuation> {
    let ebitda = project_ebitda(initial_ebitda, growth, years)?;
    let fcf = free_cash_flows(&ebitda, assumptions)?;
    enterprise_value(&ebitda, &fcf, assumptions.wacc, method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_and_fcf() {
        let e = project_ebitda(150.0, 0.10, 2).expect("valid");
        assert!((e[0] - 165.0).abs() < 1e-9);
        assert!((e[1] - 181.5).abs() < 1e-9);
        let fcf = free_cash_flows(&e, &DcfAssumptions::default()).expect("valid");
        assert!((fcf[0] - 165.0 * 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_projection_horizon_is_capped() {
        assert!(project_ebitda(100.0, 0.05, 201).is_err());
        assert_eq!(project_ebitda(100.0, 0.05, 200).expect("valid").len(), 200);
    }

    #[test]
    fn test_exit_multiple_single_year() {
        let v = enterprise_value(&[100.0], &[70.0], 0.10, TerminalValue::ExitMultiple { multiple: 7.0 })
            .expect("valid");
        assert_eq!(v.terminal_value, 700.0);
        assert!((v.enterprise_value - 770.0 / 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_perpetuity_requires_wacc_above_growth() {
        let err = enterprise_value(&[100.0], &[70.0], 0.05, TerminalValue::PerpetuityGrowth { growth: 0.05 });
        assert!(err.is_err());
        let v = enterprise_value(&[100.0], &[70.0], 0.08, TerminalValue::PerpetuityGrowth { growth: 0.03 })
            .expect("valid");
        assert!((v.terminal_value - 70.0 * 1.03 / 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_method_from_json() {
        let m: TerminalValue = serde_json::from_str(r#"{"method": "exit_multiple", "multiple": 8.5}"#)
            .expect("valid json");
        assert_eq!(m, TerminalValue::ExitMultiple { multiple: 8.5 });
    }
}
