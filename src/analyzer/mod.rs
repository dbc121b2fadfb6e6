// Analyzer module: day-over-day price change.

pub mod price_change;

pub use price_change::{ChangeCalculator, ChangeCalculatorImpl};
