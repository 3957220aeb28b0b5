use ledgerai_core::{CashFlowSummary, Transaction};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::completion::TextCompletion;

/// How many of the latest statement lines are shown to the model.
pub const RECENT_TRANSACTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// Renders the cash position and the most recent lines as plain text for
/// inclusion in a prompt.
pub fn financial_context(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "System Warning: Database is empty. No financial context available.".to_string();
    }

    let summary = CashFlowSummary::from_transactions(transactions);
    let mut out = format!(
        "Total Income: {}\nTotal Spend: {}\nNet Cash Flow: {}\nRecent Transactions:\n",
        summary.total_income, summary.total_spent, summary.net_cash_flow
    );
    let skip = transactions.len().saturating_sub(RECENT_TRANSACTIONS);
    for t in &transactions[skip..] {
        let _ = writeln!(
            out,
            "{} | {} | {} | {} | {}",
            t.date, t.description, t.amount, t.kind, t.status
        );
    }
    out
}

/// Conversational CFO-style assistant answering questions about the books.
pub struct Advisor<C> {
    completion: C,
}

impl<C: TextCompletion> Advisor<C> {
    pub fn new(completion: C) -> Self {
        Self { completion }
    }

    pub fn prompt(history: &[ChatMessage], context: &str) -> String {
        let mut conversation = String::new();
        for msg in history {
            let speaker = match msg.role {
                ChatRole::User => "User",
                ChatRole::Assistant => "AI CFO",
            };
            let _ = writeln!(conversation, "{speaker}: {}", msg.content);
        }

        format!(
            r#"You are 'Bea', a sharp, highly analytical fractional AI CFO for a startup.
Your job is to answer the user's financial questions concisely and professionally.

Here is the company's current financial context (bank data and balances):
{context}

Here is the conversation history so far:
{conversation}
Respond directly to the user's latest message as Bea the CFO. Keep it actionable and under 3 paragraphs.
"#
        )
    }

    /// Returns the model's answer, or a readable error line when the service
    /// is unavailable.
    pub async fn respond(&self, history: &[ChatMessage], context: &str) -> String {
        match self.completion.complete(&Self::prompt(history, context)).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Advisor request failed");
                format!("System Error: Unable to connect to the CFO module. {e}")
            }
        }
    }
}
