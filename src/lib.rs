//! # Swiss Ledger Core
//!
//! Ingestion of Swiss SME general-ledger workbooks (one sheet per account)
//! into a normalized transaction list, with balance sheet and income
//! statement aggregation.
//!
//! ## Features
//!
//! - **Workbook ingestion**: xlsx/xls uploads read through calamine, account sheets recognized by name
//! - **VAT folding**: undated VAT rows merged into the posting above them, FX rounding rows dropped
//! - **Swiss number formats**: `1'234,56` style amounts and `dd.mm.yyyy` dates
//! - **Financial statements**: balance sheet and income statement with the period-result closing entry
//! - **Reporting**: liquidity, profitability and structure ratios; xlsx exports
//! - **Sessions**: immutable snapshots replaced wholesale on each upload
//!
//! ## Quick Start
//!
//! ```rust
//! use swiss_ledger_core::{parse_amount, parse_sheet_identifier, CellValue};
//! use bigdecimal::BigDecimal;
//! use std::str::FromStr;
//!
//! let account = parse_sheet_identifier("_1020_Banque_Cantonale").unwrap();
//! assert_eq!(account.number, "1020");
//! assert_eq!(account.label, "Banque Cantonale");
//!
//! let amount = parse_amount(Some(&CellValue::from("1'234.56")));
//! assert_eq!(amount, BigDecimal::from_str("1234.56").unwrap());
//!
//! // With a workbook on disk:
//! // let bytes = std::fs::read("GL.xlsx")?;
//! // let snapshot = swiss_ledger_core::process_workbook("GL.xlsx", &bytes, &Default::default())?;
//! ```

pub mod config;
pub mod ingest;
pub mod ledger;
pub mod reporting;
pub mod tax;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::IngestConfig;
pub use ingest::row::{parse_amount, parse_ledger_date, CellValue, SheetRow};
pub use ingest::scanner::{scan_opening_balance, scan_sheet, SheetLedger};
pub use ingest::workbook::LedgerWorkbook;
pub use ledger::account::*;
pub use ledger::core::{process_workbook, Ledger, LedgerSnapshot};
pub use ledger::statements::*;
pub use ledger::transaction::*;
pub use reporting::export::*;
pub use reporting::ratios::*;
pub use tax::vat::*;
pub use traits::*;
pub use types::*;
pub use utils::session::LedgerSession;
pub use utils::validation::validate_upload_name;
