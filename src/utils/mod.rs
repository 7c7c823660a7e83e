//! Utility modules

pub mod session;
pub mod validation;

pub use session::*;
pub use validation::*;
