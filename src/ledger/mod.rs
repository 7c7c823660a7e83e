//! Ledger module containing account identity, transaction construction,
//! statement aggregation and the pipeline orchestrator

pub mod account;
pub mod core;
pub mod statements;
pub mod transaction;

pub use account::*;
pub use self::core::*;
pub use statements::*;
pub use transaction::*;
