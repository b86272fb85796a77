// tests/config_test.rs
use quant_primer::analytics::bs_analytic::{OptionKind, OptionParameters};
use quant_primer::futures::cost_of_carry::FuturesQuote;
use quant_primer::hedge::leverage::{Financing, MarginConvention};
use quant_primer::mc::mc_engine::McConfig;
use quant_primer::pe::dcf::DcfAssumptions;
use quant_primer::pe::lbo::LboAssumptions;
use quant_primer::{QuantError, RiskConfig, SolverConfig};

#[test]
fn test_empty_objects_give_defaults() {
    let risk: RiskConfig = serde_json::from_str("{}").expect("Valid json");
    assert_eq!(risk, RiskConfig::default());

    let solver: SolverConfig = serde_json::from_str("{}").expect("Valid json");
    assert_eq!(solver, SolverConfig::default());

    let mc: McConfig = serde_json::from_str(r#"{"paths": 5000}"#).expect("Valid json");
    assert_eq!(mc.paths, 5_000);
    assert!(mc.use_antithetic);

    let margin: MarginConvention = serde_json::from_str("{}").expect("Valid json");
    assert_eq!(margin.maintenance_margin, 0.0);

    let financing: Financing = serde_json::from_str(r#"{"holding_days": 90}"#).expect("Valid json");
    assert_eq!(financing.borrowing_rate, 0.03);

    let dcf: DcfAssumptions = serde_json::from_str(r#"{"wacc": 0.09}"#).expect("Valid json");
    assert_eq!(dcf.tax_rate, 0.25);
}

#[test]
fn test_deserialized_configs_still_validate() {
    let risk: RiskConfig = serde_json::from_str(r#"{"confidence": 1.5}"#).expect("Valid json");
    assert!(risk.validate().is_err());

    let solver: SolverConfig = serde_json::from_str(r#"{"max_iterations": 0}"#).expect("Valid json");
    assert!(matches!(solver.validate(), Err(QuantError::InvalidConfiguration { .. })));

    let margin: MarginConvention = serde_json::from_str(r#"{"maintenance_margin": 1.2}"#).expect("Valid json");
    assert!(margin.validate().is_err());
}

#[test]
fn test_option_and_deal_inputs_from_json() {
    let p: OptionParameters = serde_json::from_str(
        r#"{"spot": 100.0, "strike": 105.0, "maturity": 0.25, "rate": 0.05, "volatility": 0.2}"#,
    )
    .expect("Valid json");
    assert_eq!(p.dividend_yield, 0.0);
    assert!(p.validate().is_ok());

    let deal: LboAssumptions = serde_json::from_str(
        r#"{"entry_ebitda": 1.5e8, "ebitda_growth": 0.1, "exit_multiple": 7.0,
            "holding_years": 5, "interest_rate": 0.06, "annual_debt_service": 1e8}"#,
    )
    .expect("Valid json");
    assert_eq!(deal.transaction_costs, 0.0);
    assert!(deal.validate().is_ok());
}

#[test]
fn test_invalid_market_inputs_fail_to_deserialize() {
    let negative_spot = serde_json::from_str::<OptionParameters>(
        r#"{"spot": -100.0, "strike": 105.0, "maturity": 0.25, "rate": 0.05, "volatility": 0.2}"#,
    );
    let err = negative_spot.expect_err("negative spot must not deserialize");
    println!("\nRejected option inputs: {}", err);
    assert!(err.to_string().contains("spot"));

    assert!(serde_json::from_str::<OptionParameters>(
        r#"{"spot": 100.0, "strike": 105.0, "maturity": 0.25, "rate": 0.05, "volatility": 0.2, "dividend_yield": -0.01}"#,
    )
    .is_err());

    assert!(serde_json::from_str::<FuturesQuote>(r#"{"spot": 4500.0, "rate": 0.05, "maturity": 0.0}"#).is_err());

    let quote: FuturesQuote =
        serde_json::from_str(r#"{"spot": 4500.0, "rate": 0.05, "maturity": 0.25}"#).expect("Valid json");
    assert_eq!(quote.carry_yield, 0.0);
    assert!(quote.fair_value() > quote.spot);

    let p: OptionParameters = serde_json::from_str(
        r#"{"spot": 100.0, "strike": 105.0, "maturity": 0.25, "rate": 0.05, "volatility": 0.2, "dividend_yield": 0.01}"#,
    )
    .expect("Valid json");
    assert!(p.price(OptionKind::Call).is_finite());
}
