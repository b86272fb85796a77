//! Futures fair value, basis and cash-and-carry arbitrage.

pub mod cost_of_carry;
