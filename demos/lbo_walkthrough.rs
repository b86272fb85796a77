// demos/lbo_walkthrough.rs
use quant_primer::pe::dcf::{dcf_valuation, DcfAssumptions, TerminalValue};
use quant_primer::pe::lbo::{LboAssumptions, LboStructure};
use quant_primer::pe::metrics::fund_metrics;
use quant_primer::QuantResult;
use tracing_subscriber::EnvFilter;

fn main() -> QuantResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Leveraged Buyout Walkthrough");
    println!("============================\n");

    // $1B purchase, 30% equity / 70% debt
    let deal = LboStructure::new(1_000_000_000.0, 300_000_000.0, 700_000_000.0)?;
    let cs = deal.capital_structure();
    println!("1. Capital structure");
    println!("   Equity: ${:>15.0} ({:.1}%)", cs.equity, cs.equity_ratio * 100.0);
    println!("   Debt:   ${:>15.0} ({:.1}%)", cs.debt, cs.debt_ratio * 100.0);
    println!("   Debt/Equity: {:.2}x\n", cs.debt_to_equity);

    let assumptions = LboAssumptions {
        entry_ebitda: 150_000_000.0,
        ebitda_growth: 0.10,
        exit_multiple: 7.0,
        holding_years: 5,
        interest_rate: 0.06,
        annual_debt_service: 100_000_000.0,
        transaction_costs: 20_000_000.0,
    };
    let outcome = deal.project(&assumptions)?;

    println!("2. Debt schedule");
    println!("   {:>4} {:>16} {:>14} {:>14} {:>16}", "Year", "Opening", "Interest", "Principal", "Closing");
    for row in &outcome.schedule {
        println!(
            "   {:>4} {:>16.0} {:>14.0} {:>14.0} {:>16.0}",
            row.year, row.beginning_debt, row.interest_expense, row.principal_repayment, row.ending_debt
        );
    }

    println!("\n3. Exit");
    println!("   Exit EBITDA:       ${:>15.0}", outcome.exit_ebitda);
    println!("   Enterprise value:  ${:>15.0}", outcome.proceeds.exit_enterprise_value);
    println!("   Debt repaid:       ${:>15.0}", outcome.proceeds.debt_repayment);
    println!("   Equity proceeds:   ${:>15.0}", outcome.proceeds.equity_proceeds);
    println!("   MOIC: {:.2}x   IRR: {:.2}%\n", outcome.moic, outcome.irr * 100.0);

    println!("4. DCF cross-check");
    let dcf = DcfAssumptions::default();
    for method in [
        TerminalValue::ExitMultiple { multiple: 7.0 },
        TerminalValue::PerpetuityGrowth { growth: 0.025 },
    ] {
        let v = dcf_valuation(assumptions.entry_ebitda, assumptions.ebitda_growth, 5, &dcf, method)?;
        println!(
            "   {:?}: EV ${:.0} (terminal value {:.1}% of EV)",
            method,
            v.enterprise_value,
            v.terminal_share() * 100.0
        );
    }

    println!("\n5. Fund view halfway through the life");
    let m = fund_metrics(300_000_000.0, 120_000_000.0, 380_000_000.0)?;
    println!("   DPI {:.2}x  RVPI {:.2}x  TVPI {:.2}x", m.dpi, m.rvpi, m.tvpi);
    Ok(())
}
