//! Main pipeline orchestrator: workbook in, immutable ledger snapshot out

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::IngestConfig;
use crate::ingest::row::SheetRow;
use crate::ingest::scanner::scan_sheet;
use crate::ingest::workbook::LedgerWorkbook;
use crate::ledger::account::{chart_record, parse_sheet_identifier};
use crate::ledger::statements::aggregate_statements;
use crate::types::*;

/// Result of one complete ingestion run.
///
/// A snapshot is never modified after it is built; a new upload produces a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    /// Identifier of the run that produced this snapshot
    pub run_id: Uuid,
    /// Name of the uploaded file
    pub source_name: String,
    pub accounts: Vec<Account>,
    /// Per account in sheet order, opening balance first
    pub transactions: Vec<Transaction>,
    pub balance_sheet: Vec<FinancialStatementItem>,
    pub income_statement: Vec<FinancialStatementItem>,
    pub raw_export: RawExport,
}

impl LedgerSnapshot {
    /// Look up an account by id
    pub fn account(&self, account_id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == account_id)
    }

    /// Transactions of one account, in row order
    pub fn account_transactions<'a>(
        &'a self,
        account_id: &'a str,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |t| t.account_id == account_id)
    }

    /// Both statements as one value
    pub fn statements(&self) -> FinancialStatements {
        FinancialStatements {
            balance_sheet: self.balance_sheet.clone(),
            income_statement: self.income_statement.clone(),
        }
    }
}

/// Collects account sheets in workbook order and closes them into a snapshot
pub struct Ledger {
    config: IngestConfig,
    accounts: Vec<Account>,
    transactions: Vec<Transaction>,
    clean_ledger: Vec<CleanLedgerRecord>,
    skipped_sheets: usize,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            accounts: Vec::new(),
            transactions: Vec::new(),
            clean_ledger: Vec::new(),
            skipped_sheets: 0,
        }
    }

    /// Whether a sheet name denotes an account sheet
    pub fn is_account_sheet(sheet_name: &str) -> bool {
        parse_sheet_identifier(sheet_name).is_some()
    }

    /// Add one sheet. Returns `false` (and records nothing) when the name is
    /// not an account sheet name.
    pub fn add_sheet(&mut self, sheet_name: &str, rows: &[SheetRow]) -> bool {
        let Some(identifier) = parse_sheet_identifier(sheet_name) else {
            debug!(sheet = sheet_name, "Skipping sheet that is not an account");
            self.skipped_sheets += 1;
            return false;
        };

        let account = identifier.into_account();
        let sheet = scan_sheet(&account, rows, self.config.fallback_opening_date);
        debug!(
            sheet = sheet_name,
            account = %account.number,
            transactions = sheet.transactions.len(),
            "Scanned account sheet"
        );

        self.transactions.extend(sheet.transactions);
        self.clean_ledger.extend(sheet.records);
        self.accounts.push(account);
        true
    }

    /// Aggregate statements and freeze everything into a snapshot
    pub fn into_snapshot(self, source_name: &str) -> LedgerSnapshot {
        let statements = aggregate_statements(&self.accounts, &self.transactions, &self.config);
        let chart_of_accounts = self.accounts.iter().map(chart_record).collect();

        info!(
            source = source_name,
            accounts = self.accounts.len(),
            transactions = self.transactions.len(),
            skipped_sheets = self.skipped_sheets,
            "Ledger ingestion complete"
        );

        LedgerSnapshot {
            run_id: Uuid::new_v4(),
            source_name: source_name.to_string(),
            accounts: self.accounts,
            transactions: self.transactions,
            balance_sheet: statements.balance_sheet.clone(),
            income_statement: statements.income_statement.clone(),
            raw_export: RawExport {
                clean_ledger: self.clean_ledger,
                chart_of_accounts,
                financial_statements: statements,
            },
        }
    }
}

/// Run the whole pipeline on the bytes of an uploaded workbook.
///
/// # Errors
///
/// Returns [`LedgerError::Unreadable`] when the bytes cannot be read as a
/// workbook or a sheet cannot be decoded. Row-level problems never fail a run.
pub fn process_workbook(
    source_name: &str,
    bytes: &[u8],
    config: &IngestConfig,
) -> LedgerResult<LedgerSnapshot> {
    let mut workbook = LedgerWorkbook::open(bytes).inspect_err(|e| {
        warn!(source = source_name, error = %e, "Workbook could not be opened");
    })?;

    let mut ledger = Ledger::new(config.clone());
    for sheet_name in workbook.sheet_names() {
        // Only account sheets are decoded.
        let rows = if Ledger::is_account_sheet(&sheet_name) {
            workbook.rows(&sheet_name).inspect_err(|e| {
                warn!(source = source_name, sheet = %sheet_name, error = %e, "Sheet could not be read");
            })?
        } else {
            Vec::new()
        };
        ledger.add_sheet(&sheet_name, &rows);
    }

    Ok(ledger.into_snapshot(source_name))
}
