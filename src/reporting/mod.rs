//! Consumers of a finished snapshot: financial ratios and spreadsheet exports

pub mod export;
pub mod ratios;

pub use export::*;
pub use ratios::*;
