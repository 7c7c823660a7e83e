//! Statement aggregation: net movement per account, balance sheet and income statement

use bigdecimal::BigDecimal;
use std::collections::HashMap;

use crate::config::IngestConfig;
use crate::types::*;

/// Which statement an account reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementSection {
    BalanceSheet,
    IncomeStatement,
}

impl StatementSection {
    /// Classify by leading digit: 1-2 balance sheet, 3-8 income statement, anything else neither
    pub fn of_account(number: &str) -> Option<Self> {
        match number.chars().next() {
            Some('1' | '2') => Some(StatementSection::BalanceSheet),
            Some('3'..='8') => Some(StatementSection::IncomeStatement),
            _ => None,
        }
    }
}

/// Sum of debit minus credit per account id.
///
/// Every listed account gets an entry, zero when it has no transactions.
/// Transactions of unlisted accounts are ignored.
pub fn net_movements<'a>(
    accounts: &'a [Account],
    transactions: &[Transaction],
) -> HashMap<&'a str, BigDecimal> {
    let mut totals: HashMap<&str, BigDecimal> = accounts
        .iter()
        .map(|a| (a.id.as_str(), BigDecimal::from(0)))
        .collect();

    for transaction in transactions {
        if let Some(total) = totals.get_mut(transaction.account_id.as_str()) {
            *total += transaction.net_movement();
        }
    }

    totals
}

/// Build both statements for a ledger.
///
/// Items follow account order. The balance sheet ends with the closing
/// entry, whose amount is minus the income statement total, so the period
/// result is absorbed on the balance sheet.
pub fn aggregate_statements(
    accounts: &[Account],
    transactions: &[Transaction],
    config: &IngestConfig,
) -> FinancialStatements {
    let totals = net_movements(accounts, transactions);
    let mut statements = FinancialStatements::default();

    for account in accounts {
        let Some(section) = StatementSection::of_account(&account.number) else {
            continue;
        };
        let item = FinancialStatementItem {
            account_number: account.number.clone(),
            account_name: account.name.clone(),
            amount: totals
                .get(account.id.as_str())
                .cloned()
                .unwrap_or_else(|| BigDecimal::from(0)),
        };
        match section {
            StatementSection::BalanceSheet => statements.balance_sheet.push(item),
            StatementSection::IncomeStatement => statements.income_statement.push(item),
        }
    }

    let income_sum = statements.income_result();
    statements.balance_sheet.push(FinancialStatementItem {
        account_number: config.closing_account_number.clone(),
        account_name: config.closing_account_name.clone(),
        amount: -income_sum,
    });

    statements
}

impl FinancialStatements {
    /// Sum of all income statement amounts (debit minus credit, so a profit is negative)
    pub fn income_result(&self) -> BigDecimal {
        self.income_statement.iter().map(|i| &i.amount).sum()
    }

    /// The closing entry appended by [`aggregate_statements`]
    pub fn closing_entry(&self) -> Option<&FinancialStatementItem> {
        self.balance_sheet.last()
    }

    /// Balance sheet items without the closing entry
    pub fn balance_sheet_accounts(&self) -> &[FinancialStatementItem] {
        match self.balance_sheet.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }
}
