use serde::{Deserialize, Serialize};

use super::money::Money;
use super::transaction::{Transaction, TransactionType};

/// Top-level cash-flow figures for a set of statement lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub total_income: Money,
    pub total_spent: Money,
    pub net_cash_flow: Money,
}

impl CashFlowSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_of = |kind: TransactionType| -> Money {
            transactions
                .iter()
                .filter(|t| t.kind == kind)
                .map(|t| t.amount)
                .sum()
        };
        let total_income = total_of(TransactionType::Credit);
        let total_spent = total_of(TransactionType::Debit);

        CashFlowSummary {
            total_income,
            total_spent,
            net_cash_flow: total_income - total_spent,
        }
    }
}
