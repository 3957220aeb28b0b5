use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use ledgerai_assist::{Advisor, GeminiClient, IntakePipeline};
use ledgerai_reconcile::{CompletionJudge, Reconciler};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::Ledger;
use config::{AppConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "ledgerai")]
#[command(about = "Invoice intake and bank reconciliation for small-business books")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ledgerai.toml in the user config directory)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Database file, overrides [database].path
    #[arg(long, global = true, env = "LEDGERAI_DB")]
    db: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and default company
    Init {
        /// Also load four demo bank lines
        #[arg(long)]
        demo: bool,
    },
    /// Import a bank statement CSV
    Import { file: PathBuf },
    /// Extract an invoice document and reconcile it against the bank lines
    Ingest { file: PathBuf },
    /// List stored bank transactions
    Transactions,
    /// List stored invoices and their status
    Invoices,
    /// List the chart of accounts
    Accounts,
    /// Show income, spend and net cash flow
    Summary,
    /// Write the invoice report as CSV
    Export { output: PathBuf },
    /// Ask the advisor a question about the books
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let dirs = ProjectDirs::from("com", "ledgerai", "LedgerAI")
        .context("Could not determine a home directory")?;
    let default_config = dirs.config_dir().join(CONFIG_FILE);
    let config = AppConfig::load(cli.config.as_deref(), Some(&default_config))?;

    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| config.database_path(dirs.data_dir()));
    let ledger = Ledger::open(&db_path).await?;
    tracing::debug!(db = %db_path.display(), company = %ledger.company, "Ledger open");

    let api_key = cli.api_key.clone().unwrap_or_default();

    match cli.command {
        Command::Init { demo } => {
            let seeded = ledger.init(demo).await?;
            println!("Initialized {} (company {})", db_path.display(), ledger.company);
            if seeded > 0 {
                println!("Loaded {seeded} demo transactions");
            }
        }
        Command::Import { file } => {
            let count = ledger.import(&file, &config.statement).await?;
            println!("Imported {count} transactions from {}", file.display());
        }
        Command::Ingest { file } => {
            if api_key.is_empty() {
                tracing::warn!("GEMINI_API_KEY is not set; extraction will fail");
            }
            let completion = Arc::new(GeminiClient::new(config.gemini_config(&api_key))?);
            let pipeline = IntakePipeline::new(completion.clone());
            let reconciler = Reconciler::new(CompletionJudge::new(completion))
                .with_policy(config.matching.clone());

            let outcome = ledger.ingest(&pipeline, &reconciler, &file).await?;
            let inv = &outcome.invoice;
            println!(
                "Invoice {} | {} | #{} | {} | due {}",
                outcome.invoice_id, inv.vendor_name, inv.invoice_number, inv.total_amount, inv.due_date
            );
            let decision = &outcome.decision;
            println!("Status: {} ({})", decision.status, decision.confidence);
            if let Some(txn) = &decision.matched_data {
                println!("Matched: {} | {} | {} | {}", txn.id, txn.date, txn.description, txn.amount);
            }
            println!("Reason: {}", decision.reason);
        }
        Command::Transactions => {
            let txns = ledgerai_storage::list_transactions(&ledger.db, ledger.company).await?;
            if txns.is_empty() {
                println!("No transactions. Run `ledgerai import <csv>` or `ledgerai init --demo`.");
            }
            for t in txns {
                println!(
                    "{:>4} | {} | {:<32} | {:>12} | {:<6} | {}",
                    t.id,
                    t.date,
                    t.description,
                    t.amount.to_string(),
                    t.kind.to_string(),
                    t.status
                );
            }
        }
        Command::Invoices => {
            let invoices = ledgerai_storage::list_invoices(&ledger.db, ledger.company).await?;
            for r in invoices {
                let inv = &r.invoice;
                println!(
                    "{:>4} | {:<24} | {:<12} | {:>12} | {} | {}",
                    r.id,
                    inv.vendor_name,
                    inv.invoice_number,
                    inv.total_amount.to_string(),
                    inv.due_date,
                    r.status
                );
            }
        }
        Command::Accounts => {
            for a in ledger.accounts().await? {
                let id = a.id.map(|id| id.to_string()).unwrap_or_default();
                println!("{:>4} | {:<28} | {}", id, a.name, a.account_type);
            }
        }
        Command::Summary => {
            let summary = ledger.summary().await?;
            println!("Total income:  {}", summary.total_income);
            println!("Total spent:   {}", summary.total_spent);
            println!("Net cash flow: {}", summary.net_cash_flow);
        }
        Command::Export { output } => {
            let count = ledger.export(&output).await?;
            println!("Wrote {count} invoices to {}", output.display());
        }
        Command::Ask { question } => {
            let completion = GeminiClient::new(config.gemini_config(&api_key))?;
            let advisor = Advisor::new(completion);
            let answer = ledger.ask(&advisor, &question.join(" ")).await?;
            println!("{answer}");
        }
    }

    Ok(())
}
