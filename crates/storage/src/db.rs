use chrono::NaiveDate;
use ledgerai_core::{
    Account, AccountId, AccountType, CompanyId, Invoice, InvoiceId, InvoiceRecord, InvoiceStatus,
    Money, NewTransaction, Transaction, TransactionId, TransactionStatus, TransactionType,
    DEFAULT_ACCOUNTS, DEFAULT_COMPANY_NAME,
};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub type DbPool = Pool<Sqlite>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Not found: {0}")]
    NotFound(String),
}

pub async fn create_db(path: &Path) -> Result<DbPool, StorageError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5))
        .pragma("cache_size", "-32000");

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Private in-memory database. The single connection is never recycled, so
/// the data lives as long as the pool.
pub async fn create_in_memory() -> Result<DbPool, StorageError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Creates the schema and seeds the default company with its chart of
/// accounts. Every step is a no-op when already applied, so this can run on
/// every start-up.
pub async fn initialize(pool: &DbPool) -> Result<CompanyId, StorageError> {
    run_migrations(pool).await?;
    seed_default_company(pool).await
}

async fn run_migrations(pool: &DbPool) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            company_id INTEGER PRIMARY KEY AUTOINCREMENT,
            company_name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            account_id INTEGER PRIMARY KEY AUTOINCREMENT,
            company_id INTEGER NOT NULL,
            account_name TEXT NOT NULL,
            account_type TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (company_id) REFERENCES companies(company_id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company_id INTEGER NOT NULL DEFAULT 1,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            type TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'Unreconciled',
            FOREIGN KEY (company_id) REFERENCES companies(company_id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS invoices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            company_id INTEGER NOT NULL DEFAULT 1,
            vendor_name TEXT NOT NULL,
            invoice_number TEXT NOT NULL,
            total_amount_cents INTEGER NOT NULL,
            due_date TEXT,
            reconciliation_status TEXT NOT NULL DEFAULT 'Pending',
            FOREIGN KEY (company_id) REFERENCES companies(company_id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns the first company, creating it and its default accounts if the
/// table is empty.
pub async fn seed_default_company(pool: &DbPool) -> Result<CompanyId, StorageError> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT company_id FROM companies ORDER BY company_id LIMIT 1",
    )
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(id) = existing {
        tx.commit().await?;
        return Ok(CompanyId(id));
    }

    let company_id = sqlx::query("INSERT INTO companies (company_name) VALUES (?)")
        .bind(DEFAULT_COMPANY_NAME)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    for (name, account_type) in DEFAULT_ACCOUNTS {
        sqlx::query("INSERT INTO accounts (company_id, account_name, account_type) VALUES (?, ?, ?)")
            .bind(company_id)
            .bind(*name)
            .bind(account_type.to_string())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!(company_id, "Seeded default company and chart of accounts");
    Ok(CompanyId(company_id))
}

/// Demo bank lines, inserted only when the company has no transactions yet.
pub async fn seed_demo_transactions(pool: &DbPool, company: CompanyId) -> Result<usize, StorageError> {
    if count_transactions(pool, company).await? > 0 {
        return Ok(0);
    }

    let lines = [
        ((2026, 3, 10), "Amazon Web Services", 15_000, TransactionType::Debit),
        ((2026, 3, 12), "Stripe Payout", 250_000, TransactionType::Credit),
        ((2026, 3, 15), "GitHub Copilot", 1_000, TransactionType::Debit),
        ((2026, 3, 18), "GCP Cloud Compute", 34_250, TransactionType::Debit),
    ];
    let demo: Vec<NewTransaction> = lines
        .iter()
        .filter_map(|&((y, m, d), desc, cents, kind)| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            Some(NewTransaction::new(date, desc, Money::from_cents(cents), kind))
        })
        .collect();

    let inserted = insert_transactions(pool, company, &demo).await?;
    tracing::info!(inserted, %company, "Seeded demo transactions");
    Ok(inserted)
}

pub async fn count_transactions(pool: &DbPool, company: CompanyId) -> Result<i64, StorageError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions WHERE company_id = ?")
        .bind(company.0)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

pub async fn insert_transaction(
    pool: &DbPool,
    company: CompanyId,
    txn: &NewTransaction,
) -> Result<TransactionId, StorageError> {
    let id = sqlx::query(
        "INSERT INTO transactions (company_id, date, description, amount_cents, type, status) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(company.0)
    .bind(txn.date.to_string())
    .bind(&txn.description)
    .bind(txn.amount.to_cents())
    .bind(txn.kind.to_string())
    .bind(TransactionStatus::Unreconciled.to_string())
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(TransactionId(id))
}

/// Inserts all lines atomically; either every line is stored or none is.
pub async fn insert_transactions(
    pool: &DbPool,
    company: CompanyId,
    txns: &[NewTransaction],
) -> Result<usize, StorageError> {
    let mut tx = pool.begin().await?;
    for txn in txns {
        sqlx::query(
            "INSERT INTO transactions (company_id, date, description, amount_cents, type, status) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(company.0)
        .bind(txn.date.to_string())
        .bind(&txn.description)
        .bind(txn.amount.to_cents())
        .bind(txn.kind.to_string())
        .bind(TransactionStatus::Unreconciled.to_string())
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(txns.len())
}

type TransactionRow = (i64, String, String, i64, String, String);

fn transaction_from_row(row: TransactionRow) -> Option<Transaction> {
    let (id, date, description, amount_cents, kind, status) = row;

    let date = match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(id, %date, error = %e, "Skipping transaction with malformed date");
            return None;
        }
    };
    let kind = match kind.parse::<TransactionType>() {
        Ok(k) => k,
        Err(e) => {
            tracing::warn!(id, error = %e, "Skipping transaction with malformed type");
            return None;
        }
    };
    let status = match status.parse::<TransactionStatus>() {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(id, error = %e, "Skipping transaction with malformed status");
            return None;
        }
    };

    Some(Transaction {
        id: TransactionId(id),
        date,
        description,
        amount: Money::from_cents(amount_cents),
        kind,
        status,
    })
}

/// All statement lines of a company in insertion order.
///
/// Rows whose type, status or date cannot be interpreted are logged and
/// skipped. A NULL in a required column is a schema breach and fails the
/// whole call.
pub async fn list_transactions(pool: &DbPool, company: CompanyId) -> Result<Vec<Transaction>, StorageError> {
    let rows = sqlx::query_as::<_, TransactionRow>(
        "SELECT id, date, description, amount_cents, type, status FROM transactions WHERE company_id = ? ORDER BY id",
    )
    .bind(company.0)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(transaction_from_row).collect())
}

pub async fn get_transaction(pool: &DbPool, id: TransactionId) -> Result<Option<Transaction>, StorageError> {
    let row = sqlx::query_as::<_, TransactionRow>(
        "SELECT id, date, description, amount_cents, type, status FROM transactions WHERE id = ?",
    )
    .bind(id.0)
    .fetch_optional(pool)
    .await?;

    Ok(row.and_then(transaction_from_row))
}

pub async fn save_invoice(pool: &DbPool, company: CompanyId, invoice: &Invoice) -> Result<InvoiceId, StorageError> {
    let id = sqlx::query(
        "INSERT INTO invoices (company_id, vendor_name, invoice_number, total_amount_cents, due_date, reconciliation_status) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(company.0)
    .bind(&invoice.vendor_name)
    .bind(&invoice.invoice_number)
    .bind(invoice.total_amount.to_cents())
    .bind(&invoice.due_date)
    .bind(InvoiceStatus::Pending.to_string())
    .execute(pool)
    .await?
    .last_insert_rowid();

    tracing::info!(invoice_id = id, invoice_number = %invoice.invoice_number, "Invoice saved");
    Ok(InvoiceId(id))
}

/// Marks both sides of a match as reconciled in one database transaction.
pub async fn mark_reconciled(
    pool: &DbPool,
    invoice_id: InvoiceId,
    transaction_id: TransactionId,
) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;

    let invoices = sqlx::query("UPDATE invoices SET reconciliation_status = ? WHERE id = ?")
        .bind(InvoiceStatus::Reconciled.to_string())
        .bind(invoice_id.0)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if invoices == 0 {
        return Err(StorageError::NotFound(format!("invoice {invoice_id}")));
    }

    let transactions = sqlx::query("UPDATE transactions SET status = ? WHERE id = ?")
        .bind(TransactionStatus::Reconciled.to_string())
        .bind(transaction_id.0)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if transactions == 0 {
        return Err(StorageError::NotFound(format!("transaction {transaction_id}")));
    }

    tx.commit().await?;
    tracing::info!(%invoice_id, %transaction_id, "Invoice linked to transaction");
    Ok(())
}

pub async fn list_invoices(pool: &DbPool, company: CompanyId) -> Result<Vec<InvoiceRecord>, StorageError> {
    let rows = sqlx::query_as::<_, (i64, String, String, i64, Option<String>, String)>(
        "SELECT id, vendor_name, invoice_number, total_amount_cents, due_date, reconciliation_status FROM invoices WHERE company_id = ? ORDER BY id",
    )
    .bind(company.0)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| InvoiceRecord {
            id: InvoiceId(r.0),
            invoice: Invoice {
                vendor_name: r.1,
                invoice_number: r.2,
                total_amount: Money::from_cents(r.3),
                due_date: r.4.unwrap_or_default(),
            },
            status: r.5.parse().unwrap_or_else(|e: String| {
                tracing::warn!(invoice_id = r.0, error = %e, "Treating unknown invoice status as pending");
                InvoiceStatus::Pending
            }),
        })
        .collect())
}

pub async fn get_accounts(pool: &DbPool, company: CompanyId) -> Result<Vec<Account>, StorageError> {
    let rows = sqlx::query_as::<_, (i64, i64, String, String)>(
        "SELECT account_id, company_id, account_name, account_type FROM accounts WHERE company_id = ? ORDER BY account_id",
    )
    .bind(company.0)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|r| {
            let account_type = r.3.parse::<AccountType>().ok()?;
            Some(Account {
                id: Some(AccountId(r.0)),
                company_id: CompanyId(r.1),
                name: r.2,
                account_type,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fresh() -> (DbPool, CompanyId) {
        let pool = create_in_memory().await.unwrap();
        let company = initialize(&pool).await.unwrap();
        (pool, company)
    }

    fn new_tx(desc: &str, cents: i64, kind: TransactionType) -> NewTransaction {
        NewTransaction::new(
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            desc,
            Money::from_cents(cents),
            kind,
        )
    }

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let pool = create_in_memory().await.unwrap();
        let first = initialize(&pool).await.unwrap();
        let second = initialize(&pool).await.unwrap();
        assert_eq!(first, second);

        let companies = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM companies")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(companies, 1);
        assert_eq!(get_accounts(&pool, first).await.unwrap().len(), DEFAULT_ACCOUNTS.len());
    }

    #[tokio::test]
    async fn create_db_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");
        let pool = create_db(&path).await.unwrap();
        let company = initialize(&pool).await.unwrap();
        assert_eq!(company, CompanyId(1));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn demo_seed_only_once() {
        let (pool, company) = fresh().await;
        assert_eq!(seed_demo_transactions(&pool, company).await.unwrap(), 4);
        assert_eq!(seed_demo_transactions(&pool, company).await.unwrap(), 0);

        let txs = list_transactions(&pool, company).await.unwrap();
        assert_eq!(txs.len(), 4);
        assert_eq!(txs[0].description, "Amazon Web Services");
        assert_eq!(txs[1].kind, TransactionType::Credit);
        assert_eq!(txs[3].amount, Money::from_cents(34_250));
    }

    #[tokio::test]
    async fn list_preserves_insertion_order() {
        let (pool, company) = fresh().await;
        let a = insert_transaction(&pool, company, &new_tx("FIRST", 100, TransactionType::Debit))
            .await
            .unwrap();
        let b = insert_transaction(&pool, company, &new_tx("SECOND", 200, TransactionType::Debit))
            .await
            .unwrap();
        let ids: Vec<_> = list_transactions(&pool, company)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[tokio::test]
    async fn malformed_rows_are_skipped() {
        let (pool, company) = fresh().await;
        insert_transaction(&pool, company, &new_tx("GOOD", 100, TransactionType::Debit))
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO transactions (company_id, date, description, amount_cents, type) VALUES (1, '2026-04-02', 'ODD', 100, 'Transfer')",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO transactions (company_id, date, description, amount_cents, type) VALUES (1, 'yesterday', 'ODD', 100, 'debit')",
        )
        .execute(&pool)
        .await
        .unwrap();

        let txs = list_transactions(&pool, company).await.unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].description, "GOOD");
    }

    #[tokio::test]
    async fn lowercase_type_is_accepted() {
        let (pool, company) = fresh().await;
        sqlx::query(
            "INSERT INTO transactions (company_id, date, description, amount_cents, type) VALUES (1, '2026-04-02', 'lower', 500, 'debit')",
        )
        .execute(&pool)
        .await
        .unwrap();
        let txs = list_transactions(&pool, company).await.unwrap();
        assert_eq!(txs[0].kind, TransactionType::Debit);
        assert_eq!(txs[0].status, TransactionStatus::Unreconciled);
    }

    #[tokio::test]
    async fn save_and_mark_reconciled() {
        let (pool, company) = fresh().await;
        let txn_id = insert_transaction(&pool, company, &new_tx("ACME CORP", 100_000, TransactionType::Debit))
            .await
            .unwrap();
        let invoice = Invoice::new("Acme Corp", "INV-1042", Money::from_cents(100_000), "2026-04-30");
        let invoice_id = save_invoice(&pool, company, &invoice).await.unwrap();

        let before = list_invoices(&pool, company).await.unwrap();
        assert_eq!(before[0].status, InvoiceStatus::Pending);
        assert_eq!(before[0].invoice, invoice);

        mark_reconciled(&pool, invoice_id, txn_id).await.unwrap();

        let after = list_invoices(&pool, company).await.unwrap();
        assert_eq!(after[0].status, InvoiceStatus::Reconciled);
        let txn = get_transaction(&pool, txn_id).await.unwrap().unwrap();
        assert_eq!(txn.status, TransactionStatus::Reconciled);
    }

    #[tokio::test]
    async fn mark_reconciled_unknown_ids() {
        let (pool, company) = fresh().await;
        let invoice_id = save_invoice(&pool, company, &Invoice::extraction_failed()).await.unwrap();

        let err = mark_reconciled(&pool, invoice_id, TransactionId(999)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
        // The invoice update was rolled back with the failed transaction.
        let invoices = list_invoices(&pool, company).await.unwrap();
        assert_eq!(invoices[0].status, InvoiceStatus::Pending);

        let err = mark_reconciled(&pool, InvoiceId(999), TransactionId(1)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
