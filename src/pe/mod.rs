// src/pe/mod.rs
//! Private-equity calculators: LBO, DCF and fund return metrics

pub mod dcf;
pub mod lbo;
pub mod metrics;
