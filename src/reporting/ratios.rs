//! Financial ratios computed from a ledger snapshot

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ledger::core::LedgerSnapshot;
use crate::types::*;

/// Decimal places kept on a ratio value
const RATIO_SCALE: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioUnit {
    #[serde(rename = "x")]
    Multiple,
    #[serde(rename = "%")]
    Percent,
}

impl RatioUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            RatioUnit::Multiple => "x",
            RatioUnit::Percent => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioStatus {
    Good,
    Warning,
    Bad,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioCategory {
    Liquidity,
    Profitability,
    Structure,
}

/// One computed ratio with its reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratio {
    pub name: String,
    pub value: BigDecimal,
    pub unit: RatioUnit,
    pub interpretation: String,
    pub status: RatioStatus,
    pub category: RatioCategory,
}

/// Balance lookups by account-number prefix
struct BalanceLookup<'a> {
    accounts: &'a [Account],
    transactions: &'a [Transaction],
    balance_sheet: &'a [FinancialStatementItem],
    income_statement: &'a [FinancialStatementItem],
}

fn matches_any(number: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| number.starts_with(p))
}

fn zero() -> BigDecimal {
    BigDecimal::from(0)
}

/// `units * 10^-scale`
fn dec(units: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(units.into(), scale)
}

impl BalanceLookup<'_> {
    /// Statement items first; summed transaction movement when they total zero
    fn balance(&self, prefixes: &[&str]) -> BigDecimal {
        let from_items: BigDecimal = self
            .balance_sheet
            .iter()
            .chain(self.income_statement.iter())
            .filter(|i| matches_any(&i.account_number, prefixes))
            .map(|i| &i.amount)
            .sum();
        if from_items != zero() {
            return from_items;
        }

        let ids: HashSet<&str> = self
            .accounts
            .iter()
            .filter(|a| matches_any(&a.number, prefixes))
            .map(|a| a.id.as_str())
            .collect();
        self.transactions
            .iter()
            .filter(|t| ids.contains(t.account_id.as_str()))
            .map(Transaction::net_movement)
            .sum()
    }
}

/// Classify a value: `good` above/at the good threshold, `bad` below the bad one
fn grade(good: bool, bad: bool) -> RatioStatus {
    if good {
        RatioStatus::Good
    } else if bad {
        RatioStatus::Bad
    } else {
        RatioStatus::Neutral
    }
}

fn ratio(
    name: &str,
    value: BigDecimal,
    unit: RatioUnit,
    status: RatioStatus,
    category: RatioCategory,
    interpretation: &str,
) -> Ratio {
    Ratio {
        name: name.to_string(),
        value: value.round(RATIO_SCALE),
        unit,
        interpretation: interpretation.to_string(),
        status,
        category,
    }
}

/// Compute every ratio whose denominator is non-zero, for the given snapshot
pub fn calculate_ratios(snapshot: &LedgerSnapshot) -> Vec<Ratio> {
    ratios_from_parts(
        &snapshot.accounts,
        &snapshot.transactions,
        &snapshot.balance_sheet,
        &snapshot.income_statement,
    )
}

/// Compute ratios from the individual ledger parts.
///
/// Amounts follow the debit-minus-credit convention: liabilities, equity and
/// revenue are negative, which is why several ratios take absolute values.
pub fn ratios_from_parts(
    accounts: &[Account],
    transactions: &[Transaction],
    balance_sheet: &[FinancialStatementItem],
    income_statement: &[FinancialStatementItem],
) -> Vec<Ratio> {
    let lookup = BalanceLookup {
        accounts,
        transactions,
        balance_sheet,
        income_statement,
    };
    let hundred = BigDecimal::from(100);

    let cash = lookup.balance(&["10"]);
    let receivables = lookup.balance(&["11"]);
    let inventory = lookup.balance(&["12"]);
    let other_current = lookup.balance(&["13"]);
    let current_assets = &cash + &receivables + &inventory + &other_current;
    let current_liabilities = lookup.balance(&["20", "21", "22", "23"]);
    let equity = lookup.balance(&["28", "29"]);
    let total_assets = lookup.balance(&["1"]);

    let revenue = lookup.balance(&["3"]).abs();
    let income_result: BigDecimal = income_statement.iter().map(|i| &i.amount).sum();
    let net_profit = -income_result;
    let ebitda = &revenue
        - lookup.balance(&["4"])
        - lookup.balance(&["5"])
        - lookup.balance(&["6", "7"]);

    let mut ratios = Vec::new();

    if current_liabilities != zero() {
        let value = (&current_assets / &current_liabilities).abs();
        ratios.push(ratio(
            "Liquidité courante",
            value.clone(),
            RatioUnit::Multiple,
            grade(value > dec(15, 1), value < BigDecimal::from(1)),
            RatioCategory::Liquidity,
            "Capacité à couvrir les dettes CT (> 1.5)",
        ));

        let value = ((&current_assets - &inventory) / &current_liabilities).abs();
        ratios.push(ratio(
            "Liquidité immédiate",
            value.clone(),
            RatioUnit::Multiple,
            grade(value >= BigDecimal::from(1), value < dec(8, 1)),
            RatioCategory::Liquidity,
            "Liquidité sans les stocks (≥ 1)",
        ));

        let value = (&cash / &current_liabilities).abs();
        ratios.push(ratio(
            "Ratio de trésorerie",
            value.clone(),
            RatioUnit::Multiple,
            grade(value > dec(2, 1), value < dec(1, 1)),
            RatioCategory::Liquidity,
            "Cash disponible vs dettes CT (> 0.2)",
        ));
    }

    if revenue != zero() {
        let value = &net_profit / &revenue * &hundred;
        ratios.push(ratio(
            "Marge nette",
            value.clone(),
            RatioUnit::Percent,
            grade(value > BigDecimal::from(10), value < BigDecimal::from(5)),
            RatioCategory::Profitability,
            "% de CA converti en profit (> 10%)",
        ));
    }

    if total_assets != zero() {
        let value = &net_profit / &total_assets * &hundred;
        ratios.push(ratio(
            "ROA",
            value.clone(),
            RatioUnit::Percent,
            grade(value > BigDecimal::from(5), value < BigDecimal::from(2)),
            RatioCategory::Profitability,
            "Rentabilité des actifs (> 5%)",
        ));
    }

    if equity != zero() {
        let value = &net_profit / equity.abs() * &hundred;
        ratios.push(ratio(
            "ROE",
            value.clone(),
            RatioUnit::Percent,
            grade(value > BigDecimal::from(10), value < BigDecimal::from(5)),
            RatioCategory::Profitability,
            "Rentabilité des capitaux propres (> 10%)",
        ));
    }

    if revenue != zero() {
        let value = &ebitda / &revenue * &hundred;
        ratios.push(ratio(
            "Marge EBITDA",
            value.clone(),
            RatioUnit::Percent,
            grade(value > BigDecimal::from(15), value < BigDecimal::from(10)),
            RatioCategory::Profitability,
            "Rentabilité opérationnelle (> 15%)",
        ));
    }

    if total_assets != zero() {
        // Stored as a 0-1 fraction, displayed as a percentage.
        let value = (&equity / &total_assets).abs();
        let in_band = value >= dec(3, 1) && value <= dec(6, 1);
        ratios.push(ratio(
            "Ratio fonds propres",
            value,
            RatioUnit::Percent,
            if in_band { RatioStatus::Good } else { RatioStatus::Bad },
            RatioCategory::Structure,
            "Indépendance financière (30-60%)",
        ));
    }

    ratios
}
