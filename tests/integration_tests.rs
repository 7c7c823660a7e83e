//! Integration tests for swiss-ledger-core

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;
use std::str::FromStr;
use swiss_ledger_core::{
    calculate_ratios, clean_ledger_workbook, financial_statements_workbook, process_workbook,
    IngestConfig, InMemoryUpload, LedgerError, LedgerSession, LedgerSnapshot, OPENING_DESCRIPTION,
};

/// One cell of a test sheet, columns A..I in order
#[derive(Clone, Copy)]
enum Cell {
    Empty,
    Text(&'static str),
    Num(f64),
}

use Cell::{Empty, Num, Text};

fn build_workbook(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    Empty => {}
                    Text(text) => {
                        sheet.write_string(r as u32, c as u16, *text).unwrap();
                    }
                    Num(n) => {
                        sheet.write_number(r as u32, c as u16, *n).unwrap();
                    }
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

fn ingest(sheets: &[(&str, Vec<Vec<Cell>>)]) -> LedgerSnapshot {
    process_workbook("GL.xlsx", &build_workbook(sheets), &IngestConfig::default()).unwrap()
}

fn header() -> Vec<Vec<Cell>> {
    vec![
        vec![Text("Solde 01.01.2023 - 31.12.2023")],
        vec![Text("Report de solde"), Empty, Empty, Empty, Empty, Empty, Empty, Empty, Num(5000.0)],
    ]
}

/// Row with date, text, counter-entry, code and the three amounts
fn posting(
    date: Cell,
    text: &'static str,
    counter_entry: Cell,
    debit: f64,
    credit: f64,
    balance: Cell,
) -> Vec<Cell> {
    vec![
        date,
        Text(text),
        Empty,
        counter_entry,
        Empty,
        Empty,
        Num(debit),
        Num(credit),
        balance,
    ]
}

fn dec(text: &str) -> BigDecimal {
    BigDecimal::from_str(text).unwrap()
}

#[test]
fn test_bank_sheet_with_vat_fold() {
    let mut rows = header();
    rows.push(posting(
        Text("15.03.2023"),
        "Paiement fournisseur",
        Empty,
        0.0,
        1200.0,
        Num(3800.0),
    ));
    rows.push(posting(Empty, "TVA sur achat", Text("1170"), 0.0, 100.0, Num(3700.0)));

    let snapshot = ingest(&[("_1020_Banque_Cantonale", rows)]);

    assert_eq!(snapshot.accounts.len(), 1);
    let account = &snapshot.accounts[0];
    assert_eq!(account.number, "1020");
    assert_eq!(account.name, "Banque Cantonale");

    assert_eq!(snapshot.transactions.len(), 2);
    let opening = &snapshot.transactions[0];
    assert_eq!(opening.description, OPENING_DESCRIPTION);
    assert_eq!(opening.date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
    assert_eq!(opening.debit, BigDecimal::from(5000));
    assert_eq!(opening.credit, BigDecimal::from(0));
    assert_eq!(opening.balance, BigDecimal::from(5000));

    let folded = &snapshot.transactions[1];
    assert_eq!(folded.date, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
    assert_eq!(folded.debit, BigDecimal::from(0));
    assert_eq!(folded.credit, BigDecimal::from(1300));
    assert_eq!(folded.balance, BigDecimal::from(3700));

    let record = &snapshot.raw_export.clean_ledger[0];
    assert_eq!(record.date, "15.03.2023");
    assert_eq!(record.account, "1020");
    assert_eq!(record.debit, None);
    assert_eq!(record.credit, Some(BigDecimal::from(1300)));
}

#[test]
fn test_change_row_between_posting_and_vat() {
    let mut rows = header();
    rows.push(posting(
        Text("15.03.2023"),
        "Paiement fournisseur",
        Empty,
        0.0,
        1200.0,
        Num(3800.0),
    ));
    rows.push(posting(Empty, "Compensation de change", Empty, 5.0, 0.0, Empty));
    rows.push(posting(Empty, "TVA sur achat", Text("1170"), 0.0, 100.0, Num(3700.0)));

    let snapshot = ingest(&[("_1020_Banque_Cantonale", rows)]);

    assert_eq!(snapshot.transactions.len(), 2);
    let folded = &snapshot.transactions[1];
    assert_eq!(folded.debit, BigDecimal::from(0));
    assert_eq!(folded.credit, BigDecimal::from(1300));
    assert!(snapshot
        .transactions
        .iter()
        .all(|t| !t.description.contains("Compensation de change")));
}

#[test]
fn test_swiss_text_amounts() {
    let rows = vec![
        vec![Text("Report de solde"), Empty, Empty, Empty, Empty, Empty, Empty, Empty, Text("1'234.56")],
        vec![
            Text("31.01.2023"),
            Text("Encaissement client"),
            Empty,
            Text("1100"),
            Text("D"),
            Empty,
            Text("2'000,50"),
            Empty,
            Text("3'235.06"),
        ],
    ];

    let snapshot = ingest(&[("1000 Caisse", rows)]);

    assert_eq!(snapshot.transactions[0].debit, dec("1234.56"));
    let posting = &snapshot.transactions[1];
    assert_eq!(posting.debit, dec("2000.50"));
    assert_eq!(posting.balance, dec("3235.06"));
    assert_eq!(snapshot.raw_export.clean_ledger[0].origin, "Saisie facture de vente");
}

#[test]
fn test_single_expense_account_closing_entry() {
    let rows = vec![
        posting(Text("10.02.2023"), "Achat marchandises", Text("2000"), 6000.0, 0.0, Num(6000.0)),
        posting(Text("20.02.2023"), "Achat marchandises", Text("2000"), 4000.0, 0.0, Num(10000.0)),
    ];

    let snapshot = ingest(&[("4000 Achats", rows)]);

    assert_eq!(snapshot.income_statement.len(), 1);
    assert_eq!(snapshot.income_statement[0].account_number, "4000");
    assert_eq!(snapshot.income_statement[0].amount, BigDecimal::from(10000));

    assert_eq!(snapshot.balance_sheet.len(), 1);
    let closing = &snapshot.balance_sheet[0];
    assert_eq!(closing.account_number, "2979");
    assert_eq!(closing.account_name, "Résultat de l’exercice");
    assert_eq!(closing.amount, BigDecimal::from(-10000));
}

#[test]
fn test_non_account_sheets_are_ignored() {
    let snapshot = ingest(&[
        ("Instructions", vec![vec![Text("15.03.2023"), Text("Lire ceci"), Empty, Empty, Empty, Empty, Num(1.0)]]),
        ("Cover", vec![vec![Text("Grand livre 2023")]]),
        ("_1000_Caisse", header()),
    ]);

    assert_eq!(snapshot.accounts.len(), 1);
    assert_eq!(snapshot.transactions.len(), 1);
    assert!(snapshot.transactions.iter().all(|t| t.account_id == "1000"));
}

#[test]
fn test_every_account_starts_with_opening_balance() {
    let snapshot = ingest(&[
        ("_1020_Banque", header()),
        (
            "2000 Fournisseurs",
            vec![posting(Text("01.03.2023"), "Facture", Empty, 0.0, 700.0, Num(-700.0))],
        ),
        ("3000 Ventes", vec![]),
    ]);

    assert_eq!(snapshot.accounts.len(), 3);
    for account in &snapshot.accounts {
        let first = snapshot.account_transactions(&account.id).next().unwrap();
        assert_eq!(first.description, OPENING_DESCRIPTION);
        assert_eq!(first.id, format!("{}-init", account.id));
    }

    let bank_opening = snapshot.account_transactions("1020").next().unwrap();
    assert_eq!(bank_opening.net_movement(), BigDecimal::from(5000));
    let supplier_opening = snapshot.account_transactions("2000").next().unwrap();
    assert_eq!(supplier_opening.net_movement(), BigDecimal::from(0));
    assert_eq!(supplier_opening.date, IngestConfig::default().fallback_opening_date);
}

#[test]
fn test_statement_closure() {
    let mut bank = header();
    bank.push(posting(Text("05.01.2023"), "Vente comptant", Text("3000"), 15000.0, 0.0, Num(20000.0)));
    bank.push(posting(Text("06.01.2023"), "Loyer", Text("6000"), 0.0, 2000.0, Num(18000.0)));

    let snapshot = ingest(&[
        ("_1020_Banque", bank),
        (
            "3000 Ventes",
            vec![posting(Text("05.01.2023"), "Vente comptant", Text("1020"), 0.0, 15000.0, Num(-15000.0))],
        ),
        (
            "6000 Loyer",
            vec![posting(Text("06.01.2023"), "Loyer", Text("1020"), 2000.0, 0.0, Num(2000.0))],
        ),
        (
            "9000 Clôture",
            vec![posting(Text("31.12.2023"), "Clôture", Empty, 1.0, 0.0, Num(1.0))],
        ),
    ]);

    let statements = snapshot.statements();
    let closing = statements.closing_entry().unwrap();
    assert_eq!(closing.amount, -statements.income_result());
    assert_eq!(closing.amount, BigDecimal::from(13000));
    assert!(statements
        .balance_sheet
        .iter()
        .chain(statements.income_statement.iter())
        .all(|i| i.account_number != "9000"));
    assert_eq!(statements, snapshot.raw_export.financial_statements);
}

#[test]
fn test_chart_of_accounts_follows_sheet_order() {
    let snapshot = ingest(&[
        ("_2000_Fournisseurs", vec![]),
        ("_1020_Banque_Cantonale", vec![]),
        ("5000 Salaires", vec![]),
    ]);

    let chart: Vec<(&str, &str)> = snapshot
        .raw_export
        .chart_of_accounts
        .iter()
        .map(|r| (r.account_number.as_str(), r.nature.as_str()))
        .collect();
    assert_eq!(
        chart,
        vec![("2000", "Passif"), ("1020", "Actif"), ("5000", "Charges de personnel")]
    );
}

#[test]
fn test_snapshot_json_contract() {
    let mut rows = header();
    rows.push(posting(Text("15.03.2023"), "Paiement", Empty, 0.0, 100.0, Num(4900.0)));
    let snapshot = ingest(&[("_1020_Banque_Cantonale", rows)]);

    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json.get("runId").is_some());
    assert_eq!(json["accounts"][0]["number"], "1020");
    assert_eq!(json["transactions"][1]["accountId"], "1020");
    assert_eq!(json["transactions"][1]["date"], "2023-03-15");
    assert_eq!(json["balanceSheet"][0]["accountNumber"], "1020");
    assert!(json["incomeStatement"].as_array().unwrap().is_empty());
    assert_eq!(json["rawExport"]["cleanLedger"][0]["Date"], "15.03.2023");
    assert!(json["rawExport"]["cleanLedger"][0].get("CounterEntry").is_some());
    assert_eq!(json["rawExport"]["chartOfAccounts"][0]["Nature"], "Actif");
}

#[test]
fn test_corrupt_workbook_is_unreadable() {
    let result = process_workbook("GL.xlsx", b"definitely not a spreadsheet", &IngestConfig::default());
    match result {
        Err(err @ LedgerError::Unreadable(_)) => {
            assert!(err.to_string().starts_with("Could not read file, check the format"));
        }
        other => panic!("expected Unreadable, got {:?}", other.map(|s| s.run_id)),
    }
}

#[tokio::test]
async fn test_session_upload_and_replace() {
    let mut session = LedgerSession::new(IngestConfig::default());

    let first = session
        .upload(&InMemoryUpload::new(
            "GL_2022.xlsx",
            build_workbook(&[("_1000_Caisse", header())]),
        ))
        .await
        .unwrap();
    assert_eq!(first.source_name, "GL_2022.xlsx");

    let rejected = session
        .upload(&InMemoryUpload::new("GL_2023.pdf", Vec::new()))
        .await;
    assert!(matches!(rejected, Err(LedgerError::UnsupportedFormat(_))));
    assert_eq!(session.current().unwrap().run_id, first.run_id);

    let second = session
        .upload(&InMemoryUpload::new(
            "GL_2023.xlsx",
            build_workbook(&[("_1020_Banque", header())]),
        ))
        .await
        .unwrap();
    assert_eq!(session.current().unwrap().run_id, second.run_id);
    assert_eq!(second.accounts[0].number, "1020");
}

#[test]
fn test_exports_read_back_through_pipeline_reader() {
    let mut rows = header();
    rows.push(posting(Text("15.03.2023"), "Paiement", Empty, 0.0, 100.0, Num(4900.0)));
    let snapshot = ingest(&[("_1020_Banque_Cantonale", rows), ("4000 Achats", vec![])]);

    let ledger_bytes = clean_ledger_workbook(&snapshot.raw_export.clean_ledger).unwrap();
    let statements_bytes =
        financial_statements_workbook(&snapshot.raw_export.financial_statements).unwrap();

    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use std::io::Cursor;

    let mut ledger = open_workbook_auto_from_rs(Cursor::new(ledger_bytes)).unwrap();
    let range = ledger.worksheet_range("Grand livre").unwrap();
    assert_eq!(range.height(), 2);
    assert_eq!(range.get_value((1, 8)), Some(&Data::Float(100.0)));

    let statements = open_workbook_auto_from_rs(Cursor::new(statements_bytes)).unwrap();
    assert_eq!(statements.sheet_names().len(), 2);
}

#[test]
fn test_ratios_from_ingested_ledger() {
    let mut bank = header();
    bank.push(posting(Text("05.01.2023"), "Vente", Text("3000"), 10000.0, 0.0, Num(15000.0)));

    let snapshot = ingest(&[
        ("_1020_Banque", bank),
        ("2000 Fournisseurs", vec![vec![Text("Report de solde"), Empty, Empty, Empty, Empty, Empty, Empty, Empty, Num(-5000.0)]]),
        (
            "3000 Ventes",
            vec![posting(Text("05.01.2023"), "Vente", Text("1020"), 0.0, 10000.0, Num(-10000.0))],
        ),
    ]);

    let ratios = calculate_ratios(&snapshot);
    let current = ratios.iter().find(|r| r.name == "Liquidité courante").unwrap();
    assert_eq!(current.value, BigDecimal::from(3));
    let margin = ratios.iter().find(|r| r.name == "Marge nette").unwrap();
    assert_eq!(margin.value, BigDecimal::from(100));
}
