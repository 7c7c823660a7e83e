//! Core types and data structures produced by the ingestion pipeline

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A ledger account, one per recognized workbook sheet
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Identifier, equal to the account number
    pub id: String,
    /// Account code as found in the sheet name (e.g. "1020")
    pub number: String,
    /// Human-readable label taken from the sheet name
    pub name: String,
    /// Coarse dashboard bucket ("10xx", "4-6xxx", ...), used for grouping only
    pub category: String,
}

impl Account {
    /// Create an account from its number and label; the category is derived from the number
    pub fn new(number: String, name: String) -> Self {
        let category = crate::ledger::account::dashboard_category(&number).to_string();
        Self {
            id: number.clone(),
            number,
            name,
            category,
        }
    }

    /// First character of the account number, which drives statement classification
    pub fn class_digit(&self) -> Option<char> {
        self.number.chars().next()
    }
}

/// One posting of an account, after VAT folding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier derived from the account and the row position
    pub id: String,
    /// Posting date
    pub date: NaiveDate,
    /// Owning account
    pub account_id: String,
    /// Free-text label from the source row
    pub description: String,
    /// Debit amount (never negative for dated rows)
    pub debit: BigDecimal,
    /// Credit amount (never negative for dated rows)
    pub credit: BigDecimal,
    /// Running balance as stated by the source sheet
    pub balance: BigDecimal,
}

impl Transaction {
    /// Net movement of this posting under the debit-minus-credit convention
    pub fn net_movement(&self) -> BigDecimal {
        &self.debit - &self.credit
    }
}

/// A single balance sheet or income statement line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStatementItem {
    pub account_number: String,
    pub account_name: String,
    /// Signed net movement, debit minus credit
    pub amount: BigDecimal,
}

/// Cleaned ledger line kept for the spreadsheet export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CleanLedgerRecord {
    /// Date as written in the source (`dd.mm.yyyy`)
    pub date: String,
    pub text: String,
    pub account: String,
    pub counter_entry: String,
    pub code: String,
    /// Human-readable label of `code`
    pub origin: String,
    pub document: String,
    /// Left blank when zero
    pub debit: Option<BigDecimal>,
    /// Left blank when zero
    pub credit: Option<BigDecimal>,
    pub balance: BigDecimal,
}

/// Chart of accounts line for the spreadsheet export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChartOfAccountsRecord {
    pub account_number: String,
    pub account_name: String,
    /// Accounting nature derived from the leading digit ("Actif", "Passif", ...)
    pub nature: String,
}

/// Both statements of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStatements {
    pub balance_sheet: Vec<FinancialStatementItem>,
    pub income_statement: Vec<FinancialStatementItem>,
}

/// Everything the export routines need, serialized as-is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExport {
    pub clean_ledger: Vec<CleanLedgerRecord>,
    pub chart_of_accounts: Vec<ChartOfAccountsRecord>,
    pub financial_statements: FinancialStatements,
}

/// Errors that can occur while importing or exporting a ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("Could not read file, check the format: {0}")]
    Unreadable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Export error: {0}")]
    Export(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<calamine::Error> for LedgerError {
    fn from(err: calamine::Error) -> Self {
        LedgerError::Unreadable(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for LedgerError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        LedgerError::Export(err.to_string())
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_new_derives_id_and_category() {
        let account = Account::new("1020".to_string(), "Banque Cantonale".to_string());
        assert_eq!(account.id, "1020");
        assert_eq!(account.category, "102x");
        assert_eq!(account.class_digit(), Some('1'));
    }

    #[test]
    fn test_net_movement() {
        let txn = Transaction {
            id: "4000-3".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 3, 15).unwrap(),
            account_id: "4000".to_string(),
            description: "Achat".to_string(),
            debit: BigDecimal::from(250),
            credit: BigDecimal::from(40),
            balance: BigDecimal::from(210),
        };
        assert_eq!(txn.net_movement(), BigDecimal::from(210));
    }

    #[test]
    fn test_unreadable_message_is_generic() {
        let err = LedgerError::Unreadable("zip header".to_string());
        assert!(err.to_string().starts_with("Could not read file, check the format"));
    }
}
