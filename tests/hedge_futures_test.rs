// tests/hedge_futures_test.rs
use quant_primer::futures::cost_of_carry::{hedge_contracts, BasisKind, FuturesQuote};
use quant_primer::hedge::leverage::{leverage_scenarios, margin_call_price, Financing, MarginConvention};
use quant_primer::hedge::long_short::LongShortBook;
use quant_primer::hedge::pairs::spread_signal;
use std::collections::HashMap;

#[test]
fn test_three_times_leverage_margin_call() {
    let drop = MarginConvention::default().drop_fraction(3.0).expect("Valid leverage");
    println!("\nMargin-call drop at 3x: {:.4}", drop);
    assert!((drop - 0.3333).abs() < 1e-4);

    let price = margin_call_price(50.0, 3.0).expect("Valid inputs");
    assert!((price - 50.0 * (2.0 / 3.0)).abs() < 1e-12);
}

#[test]
fn test_margin_call_drop_shrinks_with_leverage() {
    let convention = MarginConvention::default();
    let drops: Vec<f64> = [1.0, 2.0, 3.0, 5.0, 10.0]
        .iter()
        .map(|&l| convention.drop_fraction(l).expect("Valid leverage"))
        .collect();
    assert_eq!(drops[0], 1.0);
    assert!(drops.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn test_leverage_amplifies_losses() {
    let rows = leverage_scenarios(100_000.0, -0.10, &[1.0, 2.0, 3.0], &Financing::default())
        .expect("Valid scenarios");
    assert!(rows.windows(2).all(|w| w[1].net_return < w[0].net_return));
    assert!((rows[2].levered_return + 0.30).abs() < 1e-12);
}

#[test]
fn test_futures_fair_value_and_basis() {
    let quote = FuturesQuote::new(100.0, 0.03, 0.0, 90.0 / 365.0).expect("Valid quote");
    let fair = quote.fair_value();
    assert!((fair - 100.74246875910444).abs() < 1e-10);

    assert_eq!(quote.classify(fair + 0.5), BasisKind::Contango);
    assert_eq!(quote.classify(fair - 0.5), BasisKind::Backwardation);
    assert_eq!(quote.classify(fair), BasisKind::Flat);
}

#[test]
fn test_arbitrage_flag_respects_cost() {
    let quote = FuturesQuote::new(100.0, 0.03, 0.0, 90.0 / 365.0).expect("Valid quote");
    let fair = quote.fair_value();

    let rich = quote.arbitrage(fair + 1.0, 0.001).expect("Valid inputs");
    assert!(rich.arbitrage_opportunity);
    assert!((rich.cash_and_carry_profit - 0.9).abs() < 1e-9);
    assert!(rich.reverse_cash_and_carry_profit < 0.0);

    let inside = quote.arbitrage(fair + 0.05, 0.001).expect("Valid inputs");
    assert!(!inside.arbitrage_opportunity);
}

#[test]
fn test_hedge_contract_count() {
    let n = hedge_contracts(10_000_000.0, 1.2, 4_000.0, 50.0).expect("Valid inputs");
    assert!((n - 60.0).abs() < 1e-9);
}

#[test]
fn test_long_short_book_end_to_end() {
    let mut book = LongShortBook::new(1_000_000.0, 2.0, 0.03).expect("Valid book");
    book.add_long("AAPL", 150.0, 1_000.0)
        .and_then(|b| b.add_short("MSFT", 300.0, 500.0))
        .expect("Valid positions");

    let prices = HashMap::from([("AAPL".to_string(), 140.0), ("MSFT".to_string(), 280.0)]);
    let valuation = book.valuation(&prices).expect("Valid prices");

    println!("\nValuation: {:?}", valuation);
    // Both legs fall: long loses 10k, short gains 10k
    assert_eq!(valuation.long_pnl, -10_000.0);
    assert_eq!(valuation.short_pnl, 10_000.0);
    assert_eq!(valuation.total_pnl, 0.0);
    assert!(book.exposure().is_market_neutral);
}

#[test]
fn test_pairs_signal() {
    let signal = spread_signal(52.0, 50.0, 5.0, 1.0).expect("Valid inputs");
    assert_eq!(signal.z_score, -3.0);
    assert!(signal.is_undervalued);
    assert!(signal.mean_reversion_opportunity);
}
