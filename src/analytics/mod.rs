//! Option analytics: Black-Scholes-Merton prices, Greeks, implied volatility,
//! payoff diagrams and Greek heat maps.

pub mod bs_analytic;
pub mod greeks;
pub mod heatmap;
pub mod implied_vol;
pub mod payoffs;
