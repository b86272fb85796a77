//! Hedge-fund strategy calculators: long/short books, leverage scenarios,
//! margin calls and pairs spreads.

pub mod leverage;
pub mod long_short;
pub mod pairs;
