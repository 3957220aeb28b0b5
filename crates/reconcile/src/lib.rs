pub mod matcher;
pub mod policy;
pub mod report;
pub mod resolver;
pub mod similarity;
pub mod statement;
pub mod tolerance;
pub mod util;

pub use matcher::{Reconciler, NO_MATCH_REASON, NO_TRANSACTIONS_REASON};
pub use policy::{MatchPolicy, PolicyError};
pub use report::write_invoice_report;
pub use resolver::{resolve, AmbiguousCase, CompletionJudge, Judge, Verdict};
pub use similarity::{partial_ratio, PartialRatio, TextScorer};
pub use statement::{import_statement, StatementColumns, StatementError, StatementProfile};
pub use tolerance::{default_fee_ratio, within_fee_tolerance};
