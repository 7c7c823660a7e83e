//! Spreadsheet exports built from a snapshot's raw export data

use bigdecimal::{BigDecimal, ToPrimitive};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::*;

pub const CLEAN_LEDGER_FILE: &str = "Grand_Livre_Nettoye.xlsx";
pub const CHART_OF_ACCOUNTS_FILE: &str = "Plan_Comptable.xlsx";
pub const FINANCIAL_STATEMENTS_FILE: &str = "Etats_Financiers.xlsx";

pub const CLEAN_LEDGER_SHEET: &str = "Grand livre";
pub const CHART_OF_ACCOUNTS_SHEET: &str = "Plan Comptable";
pub const BALANCE_SHEET_SHEET: &str = "Bilan";
pub const INCOME_STATEMENT_SHEET: &str = "Compte de résultat";

const CLEAN_LEDGER_HEADERS: [&str; 10] = [
    "Date",
    "Texte",
    "Compte",
    "Contre écr",
    "Code",
    "Origine",
    "Document",
    "Débit",
    "Crédit",
    "Solde",
];
const CHART_OF_ACCOUNTS_HEADERS: [&str; 3] = ["Numéro de compte", "Nom de compte", "Nature"];
const STATEMENT_HEADERS: [&str; 3] = ["Numéro de compte", "Nom de compte", "Montant"];

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> LedgerResult<()> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    Ok(())
}

/// Amounts go out as numbers; a value outside f64 range falls back to text
fn write_amount(sheet: &mut Worksheet, row: u32, col: u16, amount: &BigDecimal) -> LedgerResult<()> {
    match amount.to_f64() {
        Some(n) => sheet.write_number(row, col, n)?,
        None => sheet.write_string(row, col, amount.to_string())?,
    };
    Ok(())
}

/// The cleaned ledger as a single-sheet workbook
pub fn clean_ledger_workbook(records: &[CleanLedgerRecord]) -> LedgerResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(CLEAN_LEDGER_SHEET)?;
    write_headers(sheet, &CLEAN_LEDGER_HEADERS)?;

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        let texts = [
            &record.date,
            &record.text,
            &record.account,
            &record.counter_entry,
            &record.code,
            &record.origin,
            &record.document,
        ];
        for (col, text) in texts.iter().enumerate() {
            if !text.is_empty() {
                sheet.write_string(row, col as u16, text.as_str())?;
            }
        }
        if let Some(debit) = &record.debit {
            write_amount(sheet, row, 7, debit)?;
        }
        if let Some(credit) = &record.credit {
            write_amount(sheet, row, 8, credit)?;
        }
        write_amount(sheet, row, 9, &record.balance)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// The chart of accounts as a single-sheet workbook
pub fn chart_of_accounts_workbook(records: &[ChartOfAccountsRecord]) -> LedgerResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(CHART_OF_ACCOUNTS_SHEET)?;
    write_headers(sheet, &CHART_OF_ACCOUNTS_HEADERS)?;

    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &record.account_number)?;
        sheet.write_string(row, 1, &record.account_name)?;
        sheet.write_string(row, 2, &record.nature)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_statement(
    workbook: &mut Workbook,
    name: &str,
    items: &[FinancialStatementItem],
) -> LedgerResult<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;
    write_headers(sheet, &STATEMENT_HEADERS)?;

    for (i, item) in items.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &item.account_number)?;
        sheet.write_string(row, 1, &item.account_name)?;
        write_amount(sheet, row, 2, &item.amount)?;
    }
    Ok(())
}

/// Balance sheet and income statement as two sheets of one workbook
pub fn financial_statements_workbook(statements: &FinancialStatements) -> LedgerResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    write_statement(&mut workbook, BALANCE_SHEET_SHEET, &statements.balance_sheet)?;
    write_statement(&mut workbook, INCOME_STATEMENT_SHEET, &statements.income_statement)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write all three exports into `dir` and return their paths
pub fn save_exports(export: &RawExport, dir: impl AsRef<Path>) -> LedgerResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let files = [
        (CLEAN_LEDGER_FILE, clean_ledger_workbook(&export.clean_ledger)?),
        (
            CHART_OF_ACCOUNTS_FILE,
            chart_of_accounts_workbook(&export.chart_of_accounts)?,
        ),
        (
            FINANCIAL_STATEMENTS_FILE,
            financial_statements_workbook(&export.financial_statements)?,
        ),
    ];

    let mut paths = Vec::with_capacity(files.len());
    for (name, bytes) in files {
        let path = dir.join(name);
        std::fs::write(&path, bytes)?;
        paths.push(path);
    }

    info!(dir = %dir.display(), files = paths.len(), "Exports written");
    Ok(paths)
}
