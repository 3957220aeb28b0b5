use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::{Transaction, TransactionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    ExactMatch,
    #[serde(rename = "AIReconciled")]
    AiReconciled,
    Pending,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::ExactMatch => write!(f, "Exact Match"),
            MatchStatus::AiReconciled => write!(f, "AI Reconciled (With Fees)"),
            MatchStatus::Pending => write!(f, "Pending"),
        }
    }
}

/// Ordinal confidence attached to a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    None,
    High,
    Certain,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::None => write!(f, "0%"),
            Confidence::High => write!(f, "90%"),
            Confidence::Certain => write!(f, "100%"),
        }
    }
}

/// Outcome of matching one invoice against a transaction set.
///
/// Built only through the constructors below, which keep `transaction_id`
/// and `matched_data` present exactly when the status is a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub status: MatchStatus,
    pub transaction_id: Option<TransactionId>,
    pub confidence: Confidence,
    pub reason: String,
    pub matched_data: Option<Transaction>,
}

impl MatchDecision {
    pub fn exact(txn: &Transaction) -> Self {
        MatchDecision {
            status: MatchStatus::ExactMatch,
            transaction_id: Some(txn.id),
            confidence: Confidence::Certain,
            reason: "Exact amount and strong text match found.".to_string(),
            matched_data: Some(txn.clone()),
        }
    }

    pub fn ai_reconciled(txn: &Transaction, explanation: &str) -> Self {
        MatchDecision {
            status: MatchStatus::AiReconciled,
            transaction_id: Some(txn.id),
            confidence: Confidence::High,
            reason: explanation.to_string(),
            matched_data: Some(txn.clone()),
        }
    }

    pub fn pending(reason: &str) -> Self {
        MatchDecision {
            status: MatchStatus::Pending,
            transaction_id: None,
            confidence: Confidence::None,
            reason: reason.to_string(),
            matched_data: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self.status, MatchStatus::ExactMatch | MatchStatus::AiReconciled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::transaction::{TransactionStatus, TransactionType};
    use chrono::NaiveDate;

    fn txn() -> Transaction {
        Transaction {
            id: TransactionId(3),
            date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            description: "GitHub Copilot".to_string(),
            amount: Money::from_cents(1_000),
            kind: TransactionType::Debit,
            status: TransactionStatus::Unreconciled,
        }
    }

    #[test]
    fn matched_decisions_carry_transaction() {
        let exact = MatchDecision::exact(&txn());
        assert!(exact.is_matched());
        assert_eq!(exact.transaction_id, Some(TransactionId(3)));
        assert_eq!(exact.confidence.to_string(), "100%");

        let ai = MatchDecision::ai_reconciled(&txn(), "YES, a card fee.");
        assert!(ai.is_matched());
        assert_eq!(ai.confidence.to_string(), "90%");
        assert_eq!(ai.reason, "YES, a card fee.");
        assert_eq!(ai.matched_data.as_ref().map(|t| t.id), Some(TransactionId(3)));
    }

    #[test]
    fn pending_has_no_transaction() {
        let p = MatchDecision::pending("nothing");
        assert!(!p.is_matched());
        assert!(p.transaction_id.is_none());
        assert!(p.matched_data.is_none());
    }

    #[test]
    fn confidence_is_ordered() {
        assert!(Confidence::Certain > Confidence::High);
        assert!(Confidence::High > Confidence::None);
    }
}
