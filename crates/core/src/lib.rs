pub mod account;
pub mod decision;
pub mod invoice;
pub mod money;
pub mod summary;
pub mod transaction;

pub use account::{Account, AccountId, AccountType, CompanyId, DEFAULT_ACCOUNTS, DEFAULT_COMPANY_NAME};
pub use decision::{Confidence, MatchDecision, MatchStatus};
pub use invoice::{Invoice, InvoiceId, InvoiceRecord, InvoiceStatus};
pub use money::{AmountError, Money};
pub use summary::CashFlowSummary;
pub use transaction::{NewTransaction, Transaction, TransactionId, TransactionStatus, TransactionType};
