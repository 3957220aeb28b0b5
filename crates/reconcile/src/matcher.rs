use ledgerai_core::{Invoice, MatchDecision, Transaction};

use crate::policy::MatchPolicy;
use crate::resolver::{resolve, AmbiguousCase, Judge};
use crate::similarity::{PartialRatio, TextScorer};
use crate::tolerance::within_fee_tolerance;

pub const NO_TRANSACTIONS_REASON: &str = "No bank transactions available to match.";
pub const NO_MATCH_REASON: &str = "No matching payment found in bank transactions.";

/// Two-tier invoice matcher: a deterministic exact rule, then a judged
/// near-amount rule. Candidates are scanned in input order and the first
/// qualifying one wins.
pub struct Reconciler<J, S = PartialRatio> {
    policy: MatchPolicy,
    scorer: S,
    judge: J,
}

impl<J: Judge> Reconciler<J, PartialRatio> {
    pub fn new(judge: J) -> Self {
        Self {
            policy: MatchPolicy::default(),
            scorer: PartialRatio,
            judge,
        }
    }
}

impl<J: Judge, S: TextScorer> Reconciler<J, S> {
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_scorer<S2: TextScorer>(self, scorer: S2) -> Reconciler<J, S2> {
        Reconciler {
            policy: self.policy,
            scorer,
            judge: self.judge,
        }
    }

    pub fn policy(&self) -> &MatchPolicy {
        &self.policy
    }

    /// Best of vendor-vs-description and number-vs-description.
    fn text_score(&self, vendor: &str, number: &str, description: &str) -> u8 {
        let by_vendor = self.scorer.score(vendor, description);
        let by_number = self.scorer.score(number, description);
        by_vendor.max(by_number)
    }

    pub async fn reconcile(&self, invoice: &Invoice, transactions: &[Transaction]) -> MatchDecision {
        if transactions.is_empty() {
            return MatchDecision::pending(NO_TRANSACTIONS_REASON);
        }

        let vendor = invoice.vendor_name.to_lowercase();
        let number = invoice.invoice_number.to_lowercase();
        let invoice_amount = invoice.total_amount;

        for txn in transactions {
            if !txn.is_debit() {
                tracing::debug!(transaction = %txn.id, kind = %txn.kind, "Skipping non-debit line");
                continue;
            }
            let description = txn.description.to_lowercase();
            let score = self.text_score(&vendor, &number, &description);

            if txn.amount == invoice_amount && score > self.policy.exact_text_threshold {
                tracing::info!(
                    invoice = %invoice.invoice_number,
                    transaction = %txn.id,
                    score,
                    "Exact match"
                );
                return MatchDecision::exact(txn);
            }

            if score > self.policy.fee_text_threshold
                && within_fee_tolerance(invoice_amount, txn.amount, self.policy.fee_tolerance)
            {
                let case = AmbiguousCase {
                    vendor: &vendor,
                    invoice_number: &number,
                    invoice_amount,
                    description: &description,
                    txn_amount: txn.amount,
                };
                tracing::debug!(
                    invoice = %invoice.invoice_number,
                    transaction = %txn.id,
                    score,
                    gap = %case.discrepancy(),
                    "Asking judge about near-amount candidate"
                );

                let verdict = resolve(&self.judge, &case, self.policy.judge_timeout()).await;
                if verdict.accepted {
                    tracing::info!(
                        invoice = %invoice.invoice_number,
                        transaction = %txn.id,
                        "Judge accepted fee-adjusted match"
                    );
                    return MatchDecision::ai_reconciled(txn, &verdict.explanation);
                }
                tracing::debug!(transaction = %txn.id, "Judge rejected candidate");
                continue;
            }

            tracing::debug!(
                transaction = %txn.id,
                score,
                amount = %txn.amount,
                "Candidate matched no rule"
            );
        }

        MatchDecision::pending(NO_MATCH_REASON)
    }
}
