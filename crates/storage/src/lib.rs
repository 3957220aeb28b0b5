pub mod db;

pub use db::{
    count_transactions, create_db, create_in_memory, get_accounts, get_transaction, initialize,
    insert_transaction, insert_transactions, list_invoices, list_transactions, mark_reconciled,
    save_invoice, seed_default_company, seed_demo_transactions, DbPool, StorageError,
};
