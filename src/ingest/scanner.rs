//! Row scanner: turns one account sheet into its transactions
//!
//! The scan runs in two passes. A pre-scan reads the opening balance
//! metadata from anywhere in the sheet, then the main pass walks the rows in
//! document order. A dated row opens a posting and a lookahead folds the
//! undated VAT rows below it into that posting, discarding FX rounding rows
//! on the way. An undated VAT row reached by the main pass is posted on its
//! own, dated with the last seen posting date.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use tracing::debug;

use crate::ingest::row::{find_ledger_date, format_ledger_date, parse_amount, SheetRow};
use crate::ledger::transaction::{
    opening_transaction, OpeningBalance, Posting, PostingKind, OPENING_DESCRIPTION,
};
use crate::tax::vat::{is_change_row, is_url_row, is_vat_row};
use crate::types::*;

/// Output of scanning one account sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetLedger {
    /// Opening transaction first, then postings in row order
    pub transactions: Vec<Transaction>,
    /// Export lines, one per emitted posting (none for the opening balance)
    pub records: Vec<CleanLedgerRecord>,
}

/// Find the opening date and balance of a sheet.
///
/// The date comes from a column-A cell containing "Solde" and a dash
/// (e.g. `Solde 01.01.2023 - 31.12.2023`), the amount from column I of the
/// row whose column A is exactly "Report de solde". Missing markers fall
/// back to `fallback_date` and zero. The last marker in the sheet wins.
pub fn scan_opening_balance(rows: &[SheetRow], fallback_date: NaiveDate) -> OpeningBalance {
    let mut opening = OpeningBalance {
        date: fallback_date,
        amount: BigDecimal::from(0),
    };

    for row in rows {
        let marker = row.date_text();
        if marker.contains("Solde") && marker.contains('-') {
            if let Some(date) = find_ledger_date(marker) {
                opening.date = date;
            }
        }
        if marker == OPENING_DESCRIPTION {
            opening.amount = parse_amount(row.balance.as_ref());
        }
    }

    opening
}

/// Scan an account sheet into its transactions and export records
pub fn scan_sheet(account: &Account, rows: &[SheetRow], fallback_date: NaiveDate) -> SheetLedger {
    let opening = scan_opening_balance(rows, fallback_date);
    SheetScanner::new(account, rows, &opening).run()
}

struct SheetScanner<'a> {
    account: &'a Account,
    rows: &'a [SheetRow],
    last_date: Option<NaiveDate>,
    output: SheetLedger,
}

impl<'a> SheetScanner<'a> {
    fn new(account: &'a Account, rows: &'a [SheetRow], opening: &OpeningBalance) -> Self {
        let output = SheetLedger {
            transactions: vec![opening_transaction(&account.id, opening)],
            records: Vec::new(),
        };
        Self {
            account,
            rows,
            last_date: Some(opening.date),
            output,
        }
    }

    fn run(mut self) -> SheetLedger {
        let rows = self.rows;
        let mut cursor = 0;

        while let Some(row) = rows.get(cursor) {
            if is_url_row(row) || is_change_row(row) {
                cursor += 1;
                continue;
            }

            if let Some(date) = row.leading_date() {
                self.last_date = Some(date);
                cursor = self.fold_dated_row(cursor, date);
                continue;
            }

            if is_vat_row(row, self.last_date) {
                if let Some(date) = self.last_date {
                    self.post_orphan_vat_row(cursor, date);
                }
            }
            cursor += 1;
        }

        self.output
    }

    /// Build the posting opened by the dated row at `start`, fold the VAT rows
    /// below it, and return the cursor of the first row not consumed.
    fn fold_dated_row(&mut self, start: usize, date: NaiveDate) -> usize {
        let rows = self.rows;
        let row = &rows[start];
        let mut posting = Posting {
            kind: PostingKind::Dated,
            row_index: start,
            date,
            date_text: row.date_text().to_string(),
            description: row.text().to_string(),
            counter_entry: row.counter_entry().to_string(),
            code: row.code().to_string(),
            document: row.document().to_string(),
            debit: parse_amount(row.debit.as_ref()),
            credit: parse_amount(row.credit.as_ref()),
            balance: parse_amount(row.balance.as_ref()),
        };

        let mut next = start + 1;
        while let Some(candidate) = rows.get(next) {
            if is_change_row(candidate) {
                next += 1;
                continue;
            }
            if !is_vat_row(candidate, self.last_date) {
                break;
            }

            posting.debit += parse_amount(candidate.debit.as_ref());
            posting.credit += parse_amount(candidate.credit.as_ref());
            if candidate.balance.is_some() {
                posting.balance = parse_amount(candidate.balance.as_ref());
            }
            next += 1;
        }

        if posting.has_movement() {
            self.emit(&posting);
        }

        next
    }

    fn post_orphan_vat_row(&mut self, index: usize, date: NaiveDate) {
        let row = &self.rows[index];
        debug!(
            account = %self.account.number,
            row = index,
            "VAT row without a dated posting above it"
        );

        let posting = Posting {
            kind: PostingKind::OrphanVat,
            row_index: index,
            date,
            date_text: format_ledger_date(date),
            description: row.text().to_string(),
            counter_entry: row.counter_entry().to_string(),
            code: row.code().to_string(),
            document: row.document().to_string(),
            debit: parse_amount(row.debit.as_ref()),
            credit: parse_amount(row.credit.as_ref()),
            balance: parse_amount(row.balance.as_ref()),
        };
        self.emit(&posting);
    }

    fn emit(&mut self, posting: &Posting) {
        self.output
            .transactions
            .push(posting.to_transaction(&self.account.id));
        self.output
            .records
            .push(posting.to_export_record(&self.account.number));
    }
}
