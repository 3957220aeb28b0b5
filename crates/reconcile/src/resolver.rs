use async_trait::async_trait;
use ledgerai_assist::TextCompletion;
use ledgerai_core::Money;
use std::time::Duration;

/// A near-amount, strong-text candidate the rule layer could not settle.
#[derive(Debug, Clone, Copy)]
pub struct AmbiguousCase<'a> {
    pub vendor: &'a str,
    pub invoice_number: &'a str,
    pub invoice_amount: Money,
    pub description: &'a str,
    pub txn_amount: Money,
}

impl AmbiguousCase<'_> {
    pub fn discrepancy(&self) -> Money {
        (self.invoice_amount - self.txn_amount).abs()
    }

    pub fn prompt(&self) -> String {
        format!(
            r#"You are an expert AI CFO.
We have a vendor invoice for '{vendor}' (Invoice #{number}) for {invoice}.
We have a bank transaction described as '{description}' for {txn}.

Is it highly likely that this bank transaction is the payment for this invoice,
with the difference ({diff}) being a bank processing fee or minor deduction?

Answer strictly with 'YES' or 'NO', followed by a 1-sentence explanation.
"#,
            vendor = self.vendor,
            number = self.invoice_number,
            invoice = self.invoice_amount,
            description = self.description,
            txn = self.txn_amount,
            diff = self.discrepancy(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub accepted: bool,
    pub explanation: String,
}

impl Verdict {
    /// Accepts iff the trimmed, uppercased reply begins with `YES`.
    pub fn parse(reply: &str) -> Self {
        let explanation = reply.trim().to_string();
        let accepted = explanation.to_uppercase().starts_with("YES");
        Self { accepted, explanation }
    }

    pub fn rejected(explanation: impl Into<String>) -> Self {
        Self {
            accepted: false,
            explanation: explanation.into(),
        }
    }
}

/// Decides whether an ambiguous bank line pays an invoice.
///
/// Implementations never fail: anything that goes wrong is a rejection.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn classify(&self, prompt: &str) -> Verdict;
}

#[async_trait]
impl<J: Judge + ?Sized> Judge for std::sync::Arc<J> {
    async fn classify(&self, prompt: &str) -> Verdict {
        (**self).classify(prompt).await
    }
}

/// Judge backed by a hosted completion model.
pub struct CompletionJudge<C> {
    completion: C,
}

impl<C: TextCompletion> CompletionJudge<C> {
    pub fn new(completion: C) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl<C: TextCompletion> Judge for CompletionJudge<C> {
    async fn classify(&self, prompt: &str) -> Verdict {
        match self.completion.complete(prompt).await {
            Ok(reply) => Verdict::parse(&reply),
            Err(e) => {
                tracing::warn!(error = %e, "Judge request failed, treating as NO");
                Verdict::rejected(format!("Judge unavailable: {e}"))
            }
        }
    }
}

/// Builds the judge prompt for `case` and waits at most `limit` for an
/// answer. A timeout is a rejection.
pub async fn resolve<J: Judge + ?Sized>(
    judge: &J,
    case: &AmbiguousCase<'_>,
    limit: Duration,
) -> Verdict {
    let prompt = case.prompt();
    match tokio::time::timeout(limit, judge.classify(&prompt)).await {
        Ok(verdict) => verdict,
        Err(_) => {
            tracing::warn!(
                vendor = case.vendor,
                timeout_secs = limit.as_secs_f64(),
                "Judge timed out, treating as NO"
            );
            Verdict::rejected("Judge timed out")
        }
    }
}
