//! # quant-primer: Closed-Form Formulas for Derivatives, Risk and Private Equity
//!
//! A library of textbook quantitative-finance calculators meant to sit behind an
//! interactive dashboard: every call takes plain scalars or series and returns a
//! number, a small record, or an array ready for a chart.
//!
//! ## Key Features
//!
//! - **Option Analytics**: Black-Scholes-Merton prices, Greeks, implied volatility,
//!   single- and multi-leg payoff diagrams and Greek heat maps
//! - **Monte Carlo Check**: parallel antithetic pricer to cross-validate the closed form
//! - **Futures**: cost-of-carry fair value, basis and cash-and-carry arbitrage
//! - **Hedge-Fund Arithmetic**: long/short books, leverage scenarios, margin calls
//! - **Risk**: historical/parametric VaR, CVaR, drawdown, Sharpe/Sortino/Calmar,
//!   minimum-variance portfolios
//! - **Private Equity**: LBO debt schedules, IRR/MOIC, DPI/RVPI/TVPI, DCF
//!
//! ## Quick Start
//!
//! ```rust
//! use quant_primer::analytics::bs_analytic::{OptionKind, OptionParameters};
//! use quant_primer::analytics::greeks::greeks;
//!
//! // 30-day call, 5% out of the money
//! let params = OptionParameters::new(100.0, 105.0, 30.0 / 365.0, 0.05, 0.20)
//!     .expect("valid parameters");
//!
//! let price = params.price(OptionKind::Call);
//! let g = greeks(OptionKind::Call, &params);
//! assert!((price - 0.7308).abs() < 1e-4);
//! assert!((g.delta - 0.2265).abs() < 1e-4);
//! ```
//!
//! ## Conventions
//!
//! Rates, volatilities and yields are annual decimals; maturities are year
//! fractions (ACT/365). Greeks are returned in raw units (theta per year, vega
//! and rho per 1.00 change); `GreeksResult::display_units` converts to per-day
//! and per-1% figures. Risk figures are positive currency losses.

// Module declarations
pub mod error;
pub mod rng;
pub mod math_utils;
pub mod daycount;
pub mod side;
pub mod solvers;
pub mod analytics;
pub mod mc;
pub mod futures;
pub mod hedge;
pub mod risk;
pub mod pe;

// Re-export commonly used types for convenience
pub use analytics::bs_analytic::{OptionKind, OptionParameters, PricingRegime};
pub use analytics::greeks::GreeksResult;
pub use side::Side;
pub use error::{QuantError, QuantResult};
pub use risk::returns::{PortfolioReturns, RiskConfig};
pub use solvers::root::SolverConfig;
