// src/risk/mod.rs
//! Risk calculators: VaR, drawdown, risk-adjusted ratios and portfolio tools

pub mod metrics;
pub mod portfolio;
pub mod report;
pub mod returns;
pub mod var;
