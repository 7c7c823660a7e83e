//! Tax-related row recognition

pub mod vat;

pub use vat::*;
