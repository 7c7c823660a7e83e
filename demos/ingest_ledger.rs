//! Ingest a general-ledger workbook and print its statements and ratios
//!
//! Usage: `cargo run --example ingest_ledger -- GL.xlsx [export-dir]`

use swiss_ledger_core::{calculate_ratios, save_exports, FileUpload, IngestConfig, LedgerSession};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: ingest_ledger <GL.xlsx> [export-dir]");
        std::process::exit(2);
    };
    let export_dir = args.next();

    println!("📒 Swiss Ledger Core - Workbook Ingestion\n");

    let mut session = LedgerSession::new(IngestConfig::default());
    let snapshot = session.upload(&FileUpload::new(&path)).await?;

    // 1. Accounts
    println!("📊 {} accounts, {} transactions", snapshot.accounts.len(), snapshot.transactions.len());
    for account in &snapshot.accounts {
        let count = snapshot.account_transactions(&account.id).count();
        println!(
            "  ✓ {} - {} [{}] ({} transactions)",
            account.number, account.name, account.category, count
        );
    }
    println!();

    // 2. Statements
    println!("🏦 Bilan");
    for item in &snapshot.balance_sheet {
        println!("  {:<8} {:<40} {:>15}", item.account_number, item.account_name, item.amount);
    }
    println!();

    println!("📈 Compte de résultat");
    for item in &snapshot.income_statement {
        println!("  {:<8} {:<40} {:>15}", item.account_number, item.account_name, item.amount);
    }
    println!();

    // 3. Ratios
    println!("🔍 Ratios");
    for ratio in calculate_ratios(&snapshot) {
        println!(
            "  {:<22} {:>10} {} {:?} ({})",
            ratio.name,
            ratio.value,
            ratio.unit.symbol(),
            ratio.status,
            ratio.interpretation
        );
    }

    // 4. Exports
    if let Some(dir) = export_dir {
        println!();
        for written in save_exports(&snapshot.raw_export, &dir)? {
            println!("💾 {}", written.display());
        }
    }

    Ok(())
}
