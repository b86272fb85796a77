// demos/error_handling_demo.rs
use quant_primer::analytics::bs_analytic::{OptionKind, OptionParameters, PricingRegime};
use quant_primer::analytics::implied_vol::implied_volatility;
use quant_primer::hedge::leverage::MarginConvention;
use quant_primer::mc::mc_engine::{mc_price_european, McConfig};
use quant_primer::pe::lbo::{LboAssumptions, LboStructure};
use quant_primer::pe::metrics::{fund_metrics, irr};
use quant_primer::risk::var::historical_var;
use quant_primer::QuantError;

fn report<T: std::fmt::Debug>(label: &str, result: Result<T, QuantError>) {
    match result {
        Ok(value) => println!("   Unexpected success for {}: {:?}", label, value),
        Err(e) => println!("   ✓ {}: {}", label, e),
    }
}

fn main() {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    println!("Error Handling Demo for quant-primer");
    println!("====================================\n");

    println!("1. Invalid option inputs...");
    report("negative spot", OptionParameters::new(-100.0, 100.0, 1.0, 0.05, 0.2));
    report("zero strike", OptionParameters::new(100.0, 0.0, 1.0, 0.05, 0.2));

    println!("\n2. Expired and riskless options are priced, not rejected...");
    match OptionParameters::new(100.0, 90.0, 0.0, 0.05, 0.2) {
        Ok(p) => {
            assert_eq!(p.regime(), PricingRegime::IntrinsicValue);
            println!("   ✓ T = 0 call worth {:.2} ({:?})", p.price(OptionKind::Call), p.regime());
        }
        Err(e) => println!("   Unexpected error: {}", e),
    }

    println!("\n3. Implied volatility outside the no-arbitrage band...");
    if let Ok(p) = OptionParameters::new(100.0, 100.0, 1.0, 0.05, 0.2) {
        report("call above spot", implied_volatility(OptionKind::Call, 120.0, &p));
        report("expired option", implied_volatility(OptionKind::Call, 5.0, &OptionParameters { maturity: 0.0, ..p }));

        println!("\n4. Invalid Monte Carlo configuration...");
        let cfg = McConfig {
            paths: 1,
            ..Default::default()
        };
        report("one path", mc_price_european(OptionKind::Call, &p, &cfg));
    }

    println!("\n5. Margin and risk inputs...");
    report(
        "maintenance margin 120%",
        MarginConvention {
            maintenance_margin: 1.2,
        }
        .drop_fraction(3.0),
    );
    report("confidence 100%", historical_var(&[0.01, -0.02, 0.005], 1_000_000.0, 1.0));
    report("empty returns", historical_var(&[], 1_000_000.0, 0.95));

    println!("\n6. Private equity...");
    match LboStructure::new(1_000_000_000.0, 300_000_000.0, 650_000_000.0) {
        Err(QuantError::InvalidStructure {
            equity,
            debt,
            purchase_price,
        }) => println!(
            "   ✓ Caught InvalidStructure: {:.0} + {:.0} does not fund {:.0}",
            equity, debt, purchase_price
        ),
        other => println!("   Unexpected result: {:?}", other),
    }
    report("IRR of all-positive flows", irr(&[100.0, 50.0, 25.0]));
    report("zero paid-in capital", fund_metrics(0.0, 10.0, 10.0));

    println!("\n7. Debt service below interest logs a warning but still schedules...");
    if let Ok(deal) = LboStructure::new(1_000.0, 400.0, 600.0) {
        let assumptions = LboAssumptions {
            entry_ebitda: 100.0,
            ebitda_growth: 0.05,
            exit_multiple: 8.0,
            holding_years: 2,
            interest_rate: 0.10,
            annual_debt_service: 30.0,
            transaction_costs: 0.0,
        };
        match deal.project(&assumptions) {
            Ok(outcome) => println!(
                "   ✓ Debt still {:.0} at exit, MOIC {:.2}x",
                outcome.proceeds.debt_repayment, outcome.moic
            ),
            Err(e) => println!("   Unexpected error: {}", e),
        }
    }

    println!("\n✓ Error handling demo complete!");
}
