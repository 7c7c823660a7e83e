//! VAT adjustment and noise row recognition for Swiss ledger exports
//!
//! A general-ledger export writes the VAT part of a posting on one or more
//! undated rows directly below it. Those rows are recognized either by the
//! counter-entry account (input tax 117x, output tax 2200) or by their text.
//! FX rounding lines ("Compensation de change") are noise and always dropped.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::ingest::row::SheetRow;

/// Counter-entry prefixes of the VAT accounts (input tax, output tax)
pub const VAT_ACCOUNT_PREFIXES: [&str; 2] = ["117", "2200"];

const CHANGE_ROW_PREFIX: &str = "compensation de change";

fn vat_text_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)TVA|VAT").expect("vat text regex"))
}

/// Hyperlink line exported under a posting: no date, text starting with "http"
pub fn is_url_row(row: &SheetRow) -> bool {
    row.date.is_none() && row.text().starts_with("http")
}

/// FX rounding line, matched on the lowercased text
pub fn is_change_row(row: &SheetRow) -> bool {
    row.text().to_lowercase().starts_with(CHANGE_ROW_PREFIX)
}

/// Whether the counter-entry or the text marks the row as VAT
pub fn mentions_vat(row: &SheetRow) -> bool {
    let counter_entry = row.counter_entry();
    VAT_ACCOUNT_PREFIXES
        .iter()
        .any(|prefix| counter_entry.starts_with(prefix))
        || vat_text_re().is_match(row.text())
}

/// An undated row carrying a VAT amount.
///
/// All of the following must hold: column A is not a valid leading date,
/// at least one amount cell is filled, the row mentions VAT, and a posting
/// date is already known.
pub fn is_vat_row(row: &SheetRow, last_date: Option<NaiveDate>) -> bool {
    row.leading_date().is_none() && row.has_amount() && mentions_vat(row) && last_date.is_some()
}
