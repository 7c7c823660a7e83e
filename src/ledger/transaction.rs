//! Transaction construction: opening balances, folded postings and export records

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::types::*;

/// Description of the synthetic opening-balance transaction
pub const OPENING_DESCRIPTION: &str = "Report de solde";

/// Origin label for blank or unknown codes
pub const UNKNOWN_ORIGIN: &str = "Écriture manuelle ou inconnue";

/// Human-readable origin of an entry from its short code (column E)
pub fn origin_label(code: &str) -> &'static str {
    match code {
        "F" => "Comptabilité financière",
        "CF" | "SF" => "Comptabilité financière ecriture multiple",
        "S" => "TVA",
        "K" => "Saisie facture d’achat",
        "k" => "Paiement facture d’achat",
        "D" => "Saisie facture de vente",
        "d" => "Paiement facture de vente",
        "Y" => "EBICS (Electronic Banking)",
        "L" => "Salaire (Lohn)",
        _ => UNKNOWN_ORIGIN,
    }
}

/// Opening balance declared by a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningBalance {
    pub date: NaiveDate,
    pub amount: BigDecimal,
}

/// Synthetic first transaction of an account carrying its opening balance.
///
/// A positive or zero balance is posted as a debit, a negative one as a credit.
pub fn opening_transaction(account_id: &str, opening: &OpeningBalance) -> Transaction {
    let zero = BigDecimal::from(0);
    let (debit, credit) = if opening.amount >= zero {
        (opening.amount.clone(), zero)
    } else {
        (zero, opening.amount.abs())
    };

    Transaction {
        id: format!("{}-init", account_id),
        date: opening.date,
        account_id: account_id.to_string(),
        description: OPENING_DESCRIPTION.to_string(),
        debit,
        credit,
        balance: opening.amount.clone(),
    }
}

/// How a posting entered the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingKind {
    /// A dated row, possibly with VAT rows folded into it
    Dated,
    /// An undated VAT row with no dated row above it
    OrphanVat,
}

/// A posting collected from one or more sheet rows, before it becomes a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub kind: PostingKind,
    /// Index of the posting's first row among the sheet's non-blank rows
    pub row_index: usize,
    pub date: NaiveDate,
    /// Date as written for the export (`dd.mm.yyyy`)
    pub date_text: String,
    pub description: String,
    pub counter_entry: String,
    pub code: String,
    pub document: String,
    pub debit: BigDecimal,
    pub credit: BigDecimal,
    pub balance: BigDecimal,
}

impl Posting {
    /// Whether the posting moves money at all
    pub fn has_movement(&self) -> bool {
        let zero = BigDecimal::from(0);
        self.debit != zero || self.credit != zero
    }

    pub fn transaction_id(&self, account_id: &str) -> String {
        match self.kind {
            PostingKind::Dated => format!("{}-{}", account_id, self.row_index),
            PostingKind::OrphanVat => format!("{}-{}-orphan-tva", account_id, self.row_index),
        }
    }

    pub fn to_transaction(&self, account_id: &str) -> Transaction {
        Transaction {
            id: self.transaction_id(account_id),
            date: self.date,
            account_id: account_id.to_string(),
            description: self.description.clone(),
            debit: self.debit.clone(),
            credit: self.credit.clone(),
            balance: self.balance.clone(),
        }
    }

    /// Clean ledger line for the export; zero debit or credit is left blank
    pub fn to_export_record(&self, account_number: &str) -> CleanLedgerRecord {
        let non_zero = |amount: &BigDecimal| {
            if *amount == BigDecimal::from(0) {
                None
            } else {
                Some(amount.clone())
            }
        };

        CleanLedgerRecord {
            date: self.date_text.clone(),
            text: self.description.clone(),
            account: account_number.to_string(),
            counter_entry: self.counter_entry.clone(),
            code: self.code.clone(),
            origin: origin_label(&self.code).to_string(),
            document: self.document.clone(),
            debit: non_zero(&self.debit),
            credit: non_zero(&self.credit),
            balance: self.balance.clone(),
        }
    }
}
