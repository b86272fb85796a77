// demos/demo.rs
use quant_primer::analytics::bs_analytic::{OptionKind, OptionParameters};
use quant_primer::analytics::greeks::{greeks, Greek};
use quant_primer::analytics::heatmap::greek_heatmap;
use quant_primer::analytics::implied_vol::implied_volatility;
use quant_primer::analytics::payoffs::{payoff_diagram, strategy_payoff, OptionLeg};
use quant_primer::futures::cost_of_carry::FuturesQuote;
use quant_primer::hedge::leverage::{leverage_scenarios, Financing, MarginConvention};
use quant_primer::hedge::long_short::LongShortBook;
use quant_primer::math_utils::linspace;
use quant_primer::mc::mc_engine::{mc_price_european, McConfig};
use quant_primer::risk::metrics::equity_curve;
use quant_primer::risk::report::{risk_report, RiskMetricSet};
use quant_primer::rng::normal_returns;
use quant_primer::{PortfolioReturns, QuantResult, RiskConfig, Side};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

fn main() -> QuantResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("quant-primer walkthrough\n");
    options_page()?;
    futures_page()?;
    hedge_fund_page()?;
    risk_page()?;
    Ok(())
}

fn options_page() -> QuantResult<()> {
    println!("== Options ==");
    let p = OptionParameters::new(100.0, 105.0, 30.0 / 365.0, 0.05, 0.20)?;

    for kind in [OptionKind::Call, OptionKind::Put] {
        let g = greeks(kind, &p).display_units();
        println!(
            "{:?}: price {:.4}  delta {:.4}  gamma {:.4}  theta/day {:.4}  vega/1% {:.4}  rho/1% {:.4}",
            kind,
            p.price(kind),
            g.delta,
            g.gamma,
            g.theta,
            g.vega,
            g.rho
        );
    }

    let quoted = 1.10;
    let iv = implied_volatility(OptionKind::Call, quoted, &p)?;
    println!("Call quoted at {:.2} implies {:.2}% volatility", quoted, iv * 100.0);

    let mc = mc_price_european(OptionKind::Call, &p, &McConfig::default())?;
    println!(
        "Monte Carlo check: {:.4} ± {:.4} ({} paths)",
        mc.price, mc.std_error, mc.paths
    );

    let leg = OptionLeg::new(OptionKind::Call, Side::Long, 105.0, p.price(OptionKind::Call))?;
    let diagram = payoff_diagram(&leg)?;
    println!(
        "Long call payoff: break-even {:.2}, worst {:.2}, best {:.2} over [{:.0}, {:.0}]",
        diagram.break_even,
        diagram.max_loss,
        diagram.max_profit,
        diagram.prices[0],
        diagram.prices[diagram.prices.len() - 1]
    );

    let straddle = strategy_payoff(
        &[
            OptionLeg::new(OptionKind::Call, Side::Long, 105.0, p.price(OptionKind::Call))?,
            OptionLeg::new(OptionKind::Put, Side::Long, 105.0, p.price(OptionKind::Put))?,
        ],
        0.2,
        200,
    )?;
    let break_evens: Vec<String> = straddle.break_evens.iter().map(|b| format!("{:.2}", b)).collect();
    println!(
        "Long straddle: worst {:.2}, break-evens [{}]",
        straddle.max_loss,
        break_evens.join(", ")
    );

    let spots = linspace(80.0, 120.0, 9);
    let vols = linspace(0.1, 0.5, 5);
    let surface = greek_heatmap(OptionKind::Call, &p, Greek::Delta, &spots, &vols)?;
    println!("Delta surface {:?} (vol rows × spot columns)", surface.dim());
    for (vol, row) in vols.iter().zip(surface.rows()) {
        let cells: Vec<String> = row.iter().map(|d| format!("{:.2}", d)).collect();
        println!("  σ={:.2}: {}", vol, cells.join(" "));
    }
    println!();
    Ok(())
}

fn futures_page() -> QuantResult<()> {
    println!("== Futures ==");
    let quote = FuturesQuote::new(4_500.0, 0.05, 0.015, 90.0 / 365.0)?;
    let market = 4_560.0;
    let analysis = quote.arbitrage(market, 0.001)?;
    println!(
        "Fair value {:.2}, market {:.2}, basis {:+.2} ({:?}), arbitrage: {}",
        analysis.fair_value,
        market,
        analysis.price_difference,
        analysis.basis_kind,
        analysis.arbitrage_opportunity
    );
    println!();
    Ok(())
}

fn hedge_fund_page() -> QuantResult<()> {
    println!("== Hedge fund ==");
    let mut book = LongShortBook::new(1_000_000.0, 2.0, 0.03)?;
    book.add_long("AAPL", 150.0, 1_000.0)?;
    book.add_short("MSFT", 300.0, 500.0)?;

    let prices = HashMap::from([("AAPL".to_string(), 155.0), ("MSFT".to_string(), 295.0)]);
    let valuation = book.valuation(&prices)?;
    let exposure = book.exposure();
    println!(
        "Book P&L {:+.0} (long {:+.0}, short {:+.0}), gross {:.0}, net {:.0}, market neutral: {}",
        valuation.total_pnl,
        valuation.long_pnl,
        valuation.short_pnl,
        exposure.gross_exposure,
        exposure.net_exposure,
        exposure.is_market_neutral
    );
    println!("Borrowing cost over 30 days: {:.2}", book.borrowing_cost(30));

    let margin = MarginConvention::default();
    for row in leverage_scenarios(1_000_000.0, 0.05, &[1.0, 2.0, 3.0, 5.0], &Financing::default())? {
        println!(
            "  {:.0}x: net return {:+.2}%, margin call after a {:.1}% drop",
            row.leverage,
            row.net_return * 100.0,
            margin.drop_fraction(row.leverage)? * 100.0
        );
    }
    println!();
    Ok(())
}

fn risk_page() -> QuantResult<()> {
    println!("== Risk ==");
    let raw = normal_returns(42, 252, 0.0005, 0.02)?;
    let returns = PortfolioReturns::new(&raw)?;
    let report = risk_report(&returns, 1_000_000.0, &RiskConfig::default(), RiskMetricSet::all())?;

    let show = |label: &str, value: Option<f64>| {
        if let Some(v) = value {
            println!("  {:<16} {:>14.4}", label, v);
        }
    };
    show("Historical VaR", report.historical_var);
    show("Parametric VaR", report.parametric_var);
    show("CVaR", report.conditional_var);
    show("Max drawdown", report.max_drawdown);
    show("Sharpe", report.sharpe);
    show("Sortino", report.sortino);
    show("Calmar", report.calmar);
    show("Volatility", report.volatility);

    let curve = equity_curve(&raw, 1_000_000.0)?;
    println!("Equity after one year: {:.0}", curve[curve.len() - 1]);
    Ok(())
}
