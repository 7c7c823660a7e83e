//! Account identity: sheet name recognition and account classification

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::types::*;

/// Account number and label recovered from a sheet name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetIdentifier {
    pub number: String,
    pub label: String,
}

impl SheetIdentifier {
    /// Build the account this sheet stands for
    pub fn into_account(self) -> Account {
        Account::new(self.number, self.label)
    }
}

fn underscore_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_([0-9]+)_(.+)").expect("underscore sheet name regex"))
}

fn spaced_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+)\s+(.+)").expect("spaced sheet name regex"))
}

/// Recognize an account sheet name.
///
/// Accepts `_<digits>_<label>` (anywhere in the name) or `<digits> <label>`.
/// Underscores in the label become spaces. Any other name is not an account
/// sheet and yields `None`.
pub fn parse_sheet_identifier(sheet_name: &str) -> Option<SheetIdentifier> {
    let captures = underscore_name_re()
        .captures(sheet_name)
        .or_else(|| spaced_name_re().captures(sheet_name))?;

    let number = captures.get(1)?.as_str().to_string();
    let label = captures
        .get(2)?
        .as_str()
        .replace("___", " ")
        .replace('_', " ");

    Some(SheetIdentifier { number, label })
}

/// Dashboard grouping bucket for an account number; later rules take precedence
pub fn dashboard_category(number: &str) -> &'static str {
    let mut category = match number.chars().next() {
        Some('1') => "1xxx",
        Some('2') => "2xxx",
        Some('3') => "3xxx",
        Some('4') => "4xxx",
        Some('5') => "5xxx",
        Some('6') => "6xxx",
        Some('9') => "9xxx",
        _ => "Other",
    };

    if number.starts_with("10") {
        category = "10xx";
    }
    if number.starts_with("102") {
        category = "102x";
    }
    if number.starts_with("11") {
        category = "11xx";
    }
    if number.starts_with("20") {
        category = "20xx";
    }
    if number.starts_with(['4', '5', '6']) {
        category = "4-6xxx";
    }

    category
}

/// Accounting nature of an account, by the Swiss SME chart's leading digit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountNature {
    Asset,
    Liability,
    Revenue,
    DirectCost,
    PersonnelCost,
    OtherOperatingCost,
    Ancillary,
    Extraordinary,
    Closing,
    Unknown,
}

impl AccountNature {
    pub fn from_number(number: &str) -> Self {
        match number.chars().next() {
            Some('1') => AccountNature::Asset,
            Some('2') => AccountNature::Liability,
            Some('3') => AccountNature::Revenue,
            Some('4') => AccountNature::DirectCost,
            Some('5') => AccountNature::PersonnelCost,
            Some('6') => AccountNature::OtherOperatingCost,
            Some('7') => AccountNature::Ancillary,
            Some('8') => AccountNature::Extraordinary,
            Some('9') => AccountNature::Closing,
            _ => AccountNature::Unknown,
        }
    }

    /// Label used in the chart of accounts export
    pub fn label(&self) -> &'static str {
        match self {
            AccountNature::Asset => "Actif",
            AccountNature::Liability => "Passif",
            AccountNature::Revenue => "Produit",
            AccountNature::DirectCost => "Charge directe",
            AccountNature::PersonnelCost => "Charges de personnel",
            AccountNature::OtherOperatingCost => "Autres charges d’exploitation",
            AccountNature::Ancillary => "Charges/produits annexes",
            AccountNature::Extraordinary => "Charges/produits extraordinaires",
            AccountNature::Closing => "Comptes auxiliaires/clôtures",
            AccountNature::Unknown => "Inconnue",
        }
    }
}

/// Chart of accounts export line for an account
pub fn chart_record(account: &Account) -> ChartOfAccountsRecord {
    ChartOfAccountsRecord {
        account_number: account.number.clone(),
        account_name: account.name.clone(),
        nature: AccountNature::from_number(&account.number).label().to_string(),
    }
}
