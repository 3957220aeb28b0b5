use anyhow::{Context, Result};
use ledgerai_assist::{financial_context, Advisor, ChatMessage, IntakePipeline, TextCompletion};
use ledgerai_core::{Account, CashFlowSummary, CompanyId, Invoice, InvoiceId, MatchDecision};
use ledgerai_reconcile::{import_statement, write_invoice_report, Judge, Reconciler, StatementProfile};
use ledgerai_storage::DbPool;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Open database plus the company every command acts on.
pub struct Ledger {
    pub db: DbPool,
    pub company: CompanyId,
}

impl Ledger {
    /// Opens (creating if needed) and initializes the database.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let db = ledgerai_storage::create_db(path)
            .await
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Self::from_pool(db).await
    }

    pub async fn from_pool(db: DbPool) -> Result<Self> {
        let company = ledgerai_storage::initialize(&db)
            .await
            .context("Failed to initialize database")?;
        Ok(Self { db, company })
    }

    /// Seeds the demo statement lines when asked. Returns how many were added.
    pub async fn init(&self, demo: bool) -> Result<usize> {
        if !demo {
            return Ok(0);
        }
        Ok(ledgerai_storage::seed_demo_transactions(&self.db, self.company).await?)
    }

    pub async fn import(&self, path: &Path, profile: &StatementProfile) -> Result<usize> {
        let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
        let lines = import_statement(BufReader::new(file), profile)
            .with_context(|| format!("Failed to parse statement {}", path.display()))?;
        let stored = ledgerai_storage::insert_transactions(&self.db, self.company, &lines).await?;
        tracing::info!(count = stored, file = %path.display(), "Imported bank statement");
        Ok(stored)
    }

    /// Extracts, stores and reconciles one invoice document. The match is
    /// persisted only when the decision links a transaction.
    pub async fn ingest<C, J>(
        &self,
        pipeline: &IntakePipeline<C>,
        reconciler: &Reconciler<J>,
        path: &Path,
    ) -> Result<IntakeOutcome>
    where
        C: TextCompletion,
        J: Judge,
    {
        let invoice = pipeline.process_file(path).await?;
        if invoice.is_extraction_failure() {
            tracing::warn!(file = %path.display(), "Stored invoice with extraction failure placeholder");
        }
        let invoice_id = ledgerai_storage::save_invoice(&self.db, self.company, &invoice).await?;

        let transactions = ledgerai_storage::list_transactions(&self.db, self.company).await?;
        let decision = reconciler.reconcile(&invoice, &transactions).await;

        if let Some(txn_id) = decision.transaction_id {
            ledgerai_storage::mark_reconciled(&self.db, invoice_id, txn_id).await?;
        }
        tracing::info!(
            invoice = %invoice_id,
            status = %decision.status,
            "Invoice processed"
        );

        Ok(IntakeOutcome { invoice_id, invoice, decision })
    }

    pub async fn accounts(&self) -> Result<Vec<Account>> {
        Ok(ledgerai_storage::get_accounts(&self.db, self.company).await?)
    }

    pub async fn summary(&self) -> Result<CashFlowSummary> {
        let transactions = ledgerai_storage::list_transactions(&self.db, self.company).await?;
        Ok(CashFlowSummary::from_transactions(&transactions))
    }

    pub async fn export(&self, path: &Path) -> Result<usize> {
        let invoices = ledgerai_storage::list_invoices(&self.db, self.company).await?;
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_invoice_report(BufWriter::new(file), &invoices)?;
        Ok(invoices.len())
    }

    pub async fn ask<C: TextCompletion>(&self, advisor: &Advisor<C>, question: &str) -> Result<String> {
        let transactions = ledgerai_storage::list_transactions(&self.db, self.company).await?;
        let context = financial_context(&transactions);
        Ok(advisor.respond(&[ChatMessage::user(question)], &context).await)
    }
}

#[derive(Debug)]
pub struct IntakeOutcome {
    pub invoice_id: InvoiceId,
    pub invoice: Invoice,
    pub decision: MatchDecision,
}
