// src/pe/lbo.rs
//! Leveraged buyout arithmetic
//!
//! A deal is funded by sponsor equity and acquisition debt that must together
//! pay the purchase price. Over the holding period the company services its
//! debt with a fixed annual amount: interest on the opening balance is paid
//! first and the rest retires principal. At exit the enterprise value is
//! `EBITDA_N × exit multiple`, and the sponsor receives what is left after the
//! remaining debt and transaction costs.
//!
//! ```text
//! interest_t   = opening_t · rate
//! principal_t  = min(service - interest_t, opening_t)   (floored at 0)
//! equity_exit  = EV_exit - debt_N - costs
//! MOIC         = equity_exit / equity_entry
//! IRR          : NPV(-equity_entry, 0, …, 0, +equity_exit) = 0
//! ```

use super::metrics::{irr, moic, validate_horizon};
use crate::error::{validation::*, QuantError, QuantResult};
use serde::{Deserialize, Serialize};

/// Largest gap allowed between equity + debt and the purchase price
pub const STRUCTURE_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LboStructure {
    purchase_price: f64,
    equity: f64,
    debt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapitalStructure {
    pub equity: f64,
    pub debt: f64,
    pub total: f64,
    pub equity_ratio: f64,
    pub debt_ratio: f64,
    pub debt_to_equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DebtScheduleRow {
    pub year: u32,
    pub beginning_debt: f64,
    pub interest_expense: f64,
    pub principal_repayment: f64,
    pub ending_debt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExitProceeds {
    pub exit_enterprise_value: f64,
    pub debt_repayment: f64,
    pub transaction_costs: f64,
    pub equity_proceeds: f64,
}

/// Operating and financing assumptions for a projected deal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LboAssumptions {
    pub entry_ebitda: f64,
    pub ebitda_growth: f64,
    pub exit_multiple: f64,
    pub holding_years: u32,
    pub interest_rate: f64,
    pub annual_debt_service: f64,
    #[serde(default)]
    pub transaction_costs: f64,
}

impl LboAssumptions {
    pub fn validate(&self) -> QuantResult<()> {
        validate_positive("entry_ebitda", self.entry_ebitda)?;
        validate_finite("ebitda_growth", self.ebitda_growth)?;
        if self.ebitda_growth <= -1.0 {
            return Err(QuantError::InvalidInput {
                parameter: "ebitda_growth".to_string(),
                value: self.ebitda_growth,
                constraint: "must be greater than -1".to_string(),
            });
        }
        validate_positive("exit_multiple", self.exit_multiple)?;
        validate_non_negative("interest_rate", self.interest_rate)?;
        validate_non_negative("annual_debt_service", self.annual_debt_service)?;
        validate_non_negative("transaction_costs", self.transaction_costs)?;
        if self.holding_years == 0 {
            return Err(QuantError::InvalidConfiguration {
                field: "holding_years".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        validate_horizon("holding_years", self.holding_years)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LboOutcome {
    pub schedule: Vec<DebtScheduleRow>,
    pub exit_ebitda: f64,
    pub proceeds: ExitProceeds,
    pub moic: f64,
    pub irr: f64,
}

impl LboStructure {
    /// Validate that equity and debt fund the purchase price
    pub fn new(purchase_price: f64, equity: f64, debt: f64) -> QuantResult<Self> {
        validate_positive("purchase_price", purchase_price)?;
        validate_positive("equity", equity)?;
        validate_non_negative("debt", debt)?;
        if ((equity + debt) - purchase_price).abs() > STRUCTURE_TOLERANCE {
            return Err(QuantError::InvalidStructure {
                equity,
                debt,
                purchase_price,
            });
        }
        Ok(LboStructure {
            purchase_price,
            equity,
            debt,
        })
    }

    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    pub fn equity(&self) -> f64 {
        self.equity
    }

    pub fn debt(&self) -> f64 {
        self.debt
    }

    pub fn capital_structure(&self) -> CapitalStructure {
        let total = self.equity + self.debt;
        CapitalStructure {
            equity: self.equity,
            debt: self.debt,
            total,
            equity_ratio: self.equity / total,
            debt_ratio: self.debt / total,
            debt_to_equity: self.debt / self.equity,
        }
    }

    /// Year-by-year paydown under a fixed annual debt service
    pub fn debt_schedule(
        &self,
        annual_service: f64,
        interest_rate: f64,
        years: u32,
    ) -> QuantResult<Vec<DebtScheduleRow>> {
        validate_non_negative("annual_service", annual_service)?;
        validate_non_negative("interest_rate", interest_rate)?;
        validate_horizon("years", years)?;

        let mut remaining = self.debt;
        let mut rows = Vec::with_capacity(years as usize);
        for year in 1..=years {
            let interest_expense = remaining * interest_rate;
            let mut principal = (annual_service - interest_expense).min(remaining);
            if principal < 0.0 {
                tracing::warn!(
                    year,
                    annual_service,
                    interest_expense,
                    "debt service does not cover interest, no principal repaid"
                );
                principal = 0.0;
            }
            let beginning_debt = remaining;
            remaining -= principal;
            rows.push(DebtScheduleRow {
                year,
                beginning_debt,
                interest_expense,
                principal_repayment: principal,
                ending_debt: remaining,
            });
        }
        Ok(rows)
    }

    /// Run the deal through the holding period to exit
    pub fn project(&self, assumptions: &LboAssumptions) -> QuantResult<LboOutcome> {
        assumptions.validate()?;
        let years = assumptions.holding_years;
        let schedule = self.debt_schedule(assumptions.annual_debt_service, assumptions.interest_rate, years)?;
        let remaining_debt = schedule.last().map_or(self.debt, |row| row.ending_debt);

        let exit_ebitda = assumptions.entry_ebitda * (1.0 + assumptions.ebitda_growth).powi(years as i32);
        let proceeds = exit_proceeds(
            exit_ebitda * assumptions.exit_multiple,
            remaining_debt,
            assumptions.transaction_costs,
        )?;

        let mut flows = vec![0.0; years as usize + 1];
        flows[0] = -self.equity;
        flows[years as usize] = proceeds.equity_proceeds;
        let irr = irr(&flows)?;
        let moic = moic(self.equity, proceeds.equity_proceeds)?;

        tracing::debug!(
            exit_ev = proceeds.exit_enterprise_value,
            equity_out = proceeds.equity_proceeds,
            moic,
            irr,
            "lbo projected"
        );
        Ok(LboOutcome {
            schedule,
            exit_ebitda,
            proceeds,
            moic,
            irr,
        })
    }
}

/// Equity left for the sponsor after debt and costs are paid at exit
pub fn exit_proceeds(
    exit_enterprise_value: f64,
    remaining_debt: f64,
    transaction_costs: f64,
) -> QuantResult<ExitProceeds> {
    validate_non_negative("exit_enterprise_value", exit_enterprise_value)?;
    validate_non_negative("remaining_debt", remaining_debt)?;
    validate_non_negative("transaction_costs", transaction_costs)?;
    Ok(ExitProceeds {
        exit_enterprise_value,
        debt_repayment: remaining_debt,
        transaction_costs,
        equity_proceeds: exit_enterprise_value - remaining_debt - transaction_costs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pe::metrics::MAX_HORIZON_YEARS;

    fn deal() -> LboStructure {
        LboStructure::new(1_000_000_000.0, 300_000_000.0, 700_000_000.0).expect("balanced deal")
    }

    #[test]
    fn test_horizon_is_capped() {
        let mut assumptions = LboAssumptions {
            entry_ebitda: 150.0,
            ebitda_growth: 0.05,
            exit_multiple: 7.0,
            holding_years: MAX_HORIZON_YEARS + 1,
            interest_rate: 0.06,
            annual_debt_service: 100.0,
            transaction_costs: 0.0,
        };
        assert!(matches!(
            assumptions.validate(),
            Err(QuantError::InvalidInput { .. })
        ));
        assert!(deal().debt_schedule(100.0, 0.06, u32::MAX).is_err());
        assumptions.holding_years = 10;
        assert!(assumptions.validate().is_ok());
    }

    #[test]
    fn test_mismatch_is_invalid_structure() {
        let err = LboStructure::new(1_000.0, 300.0, 650.0).unwrap_err();
        assert!(matches!(err, QuantError::InvalidStructure { .. }));
        // Within one currency unit is accepted
        assert!(LboStructure::new(1_000.0, 300.0, 699.5).is_ok());
    }

    #[test]
    fn test_capital_structure() {
        let cs = deal().capital_structure();
        assert!((cs.equity_ratio - 0.3).abs() < 1e-12);
        assert!((cs.debt_ratio - 0.7).abs() < 1e-12);
        assert!((cs.debt_to_equity - 7.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_debt_schedule_interest_first() {
        let rows = deal().debt_schedule(100_000_000.0, 0.06, 5).expect("valid");
        assert_eq!(rows.len(), 5);
        assert!((rows[0].interest_expense - 42_000_000.0).abs() < 1e-3);
        assert!((rows[0].principal_repayment - 58_000_000.0).abs() < 1e-3);
        assert!((rows[0].ending_debt - 642_000_000.0).abs() < 1e-3);
        for pair in rows.windows(2) {
            assert_eq!(pair[0].ending_debt, pair[1].beginning_debt);
        }
    }

    #[test]
    fn test_service_below_interest_repays_nothing() {
        let rows = deal().debt_schedule(10_000_000.0, 0.06, 2).expect("valid");
        assert!(rows.iter().all(|r| r.principal_repayment == 0.0));
        assert_eq!(rows[1].ending_debt, 700_000_000.0);
    }

    #[test]
    fn test_principal_capped_at_balance() {
        let small = LboStructure::new(100.0, 90.0, 10.0).expect("valid");
        let rows = small.debt_schedule(50.0, 0.05, 3).expect("valid");
        assert_eq!(rows[0].principal_repayment, 10.0);
        assert_eq!(rows[0].ending_debt, 0.0);
        assert_eq!(rows[2].interest_expense, 0.0);
    }

    #[test]
    fn test_exit_proceeds() {
        let p = exit_proceeds(1_500_000_000.0, 350_000_000.0, 0.0).expect("valid");
        assert_eq!(p.equity_proceeds, 1_150_000_000.0);
    }
}
