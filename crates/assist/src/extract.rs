use std::sync::OnceLock;

use ledgerai_core::invoice::NOT_AVAILABLE;
use ledgerai_core::{Invoice, Money};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::completion::{CompletionError, TextCompletion};
use crate::document::DocumentError;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
    #[error("Completion failed: {0}")]
    Completion(#[from] CompletionError),
    #[error("Model returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Model returned JSON that is not an object")]
    NotAnObject,
}

fn re_code_fence() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("invalid regex"))
}

const UNKNOWN: &str = "Unknown";

/// Turns invoice document text into an [`Invoice`] by asking the completion
/// service for a strict JSON object.
pub struct InvoiceExtractor<C> {
    completion: C,
}

impl<C: TextCompletion> InvoiceExtractor<C> {
    pub fn new(completion: C) -> Self {
        Self { completion }
    }

    pub fn prompt(document_text: &str) -> String {
        format!(
            r#"You are a highly accurate data extraction assistant.
Read the following invoice text and extract the key details.

Return ONLY a raw, valid JSON object with the following exact keys:
- "vendor_name": (string) The name of the company billing us.
- "invoice_number": (string) The invoice ID or number.
- "total_amount": (number) The final total amount due (numbers only, no currency symbols).
- "due_date": (string) The due date, preferably in YYYY-MM-DD format.

Invoice Text:
{document_text}
"#
        )
    }

    /// Never fails: any problem yields [`Invoice::extraction_failed`].
    pub async fn extract(&self, document_text: &str) -> Invoice {
        match self.try_extract(document_text).await {
            Ok(invoice) => invoice,
            Err(e) => {
                tracing::warn!(error = %e, "Invoice extraction failed");
                Invoice::extraction_failed()
            }
        }
    }

    pub async fn try_extract(&self, document_text: &str) -> Result<Invoice, ExtractError> {
        if document_text.trim().is_empty() {
            return Err(DocumentError::NoText.into());
        }
        let raw = self
            .completion
            .complete_json(&Self::prompt(document_text))
            .await?;
        parse_invoice_json(&raw)
    }
}

/// Parses the model's JSON answer, tolerating code fences, string amounts
/// with currency decoration, and missing keys.
pub fn parse_invoice_json(raw: &str) -> Result<Invoice, ExtractError> {
    let body = re_code_fence()
        .captures(raw)
        .and_then(|c| c.get(1))
        .map_or(raw, |m| m.as_str());

    let value: Value = serde_json::from_str(body)?;
    let fields = value.as_object().ok_or(ExtractError::NotAnObject)?;

    Ok(Invoice {
        vendor_name: string_field(fields, "vendor_name", UNKNOWN),
        invoice_number: string_field(fields, "invoice_number", NOT_AVAILABLE),
        total_amount: amount_field(fields, "total_amount"),
        due_date: string_field(fields, "due_date", UNKNOWN),
    })
}

fn string_field(fields: &Map<String, Value>, key: &str, default: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

fn amount_field(fields: &Map<String, Value>, key: &str) -> Money {
    let amount = match fields.get(key) {
        Some(Value::Number(n)) => Money::parse_lenient(&n.to_string()),
        Some(Value::String(s)) => Money::parse_lenient(s),
        _ => Money::zero(),
    };
    if amount.is_negative() {
        Money::zero()
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::MockCompletion;

    #[test]
    fn parses_clean_json() {
        let inv = parse_invoice_json(
            r#"{"vendor_name":"Acme Corp","invoice_number":"INV-1042","total_amount":1000.0,"due_date":"2026-04-30"}"#,
        )
        .unwrap();
        assert_eq!(inv.vendor_name, "Acme Corp");
        assert_eq!(inv.invoice_number, "INV-1042");
        assert_eq!(inv.total_amount, Money::from_cents(100_000));
        assert_eq!(inv.due_date, "2026-04-30");
    }

    #[test]
    fn strips_code_fence() {
        let inv = parse_invoice_json(
            "```json\n{\"vendor_name\":\"GitHub\",\"invoice_number\":\"GH-7\",\"total_amount\":10,\"due_date\":\"2026-03-15\"}\n```",
        )
        .unwrap();
        assert_eq!(inv.vendor_name, "GitHub");
        assert_eq!(inv.total_amount, Money::from_cents(1_000));
    }

    #[test]
    fn coerces_string_amounts() {
        let inv = parse_invoice_json(r#"{"vendor_name":"AWS","total_amount":"$1,234.50"}"#).unwrap();
        assert_eq!(inv.total_amount, Money::from_cents(123_450));
        assert_eq!(inv.invoice_number, "N/A");
        assert_eq!(inv.due_date, "Unknown");
    }

    #[test]
    fn garbage_amount_becomes_zero() {
        let inv = parse_invoice_json(r#"{"vendor_name":"AWS","total_amount":"N/A"}"#).unwrap();
        assert!(inv.total_amount.is_zero());
        let inv = parse_invoice_json(r#"{"vendor_name":"AWS","total_amount":null}"#).unwrap();
        assert!(inv.total_amount.is_zero());
        let inv = parse_invoice_json(r#"{"vendor_name":"AWS","total_amount":-5}"#).unwrap();
        assert!(inv.total_amount.is_zero());
    }

    #[test]
    fn numeric_invoice_number_is_kept() {
        let inv = parse_invoice_json(r#"{"invoice_number":1042}"#).unwrap();
        assert_eq!(inv.invoice_number, "1042");
        assert_eq!(inv.vendor_name, "Unknown");
    }

    #[test]
    fn rejects_non_object() {
        assert!(matches!(parse_invoice_json("[1,2]"), Err(ExtractError::NotAnObject)));
        assert!(matches!(parse_invoice_json("not json"), Err(ExtractError::Json(_))));
    }

    #[tokio::test]
    async fn extract_sends_document_text() {
        let mock = MockCompletion::reply(
            r#"{"vendor_name":"Acme Corp","invoice_number":"INV-1","total_amount":975,"due_date":"2026-05-01"}"#,
        );
        let extractor = InvoiceExtractor::new(mock);
        let inv = extractor.extract("ACME CORP\nInvoice INV-1\nTotal due $975.00").await;
        assert_eq!(inv.total_amount, Money::from_cents(97_500));
        assert_eq!(extractor.completion.calls(), 1);
        assert!(extractor.completion.prompts()[0].contains("Total due $975.00"));
    }

    #[tokio::test]
    async fn service_failure_yields_sentinel() {
        let extractor = InvoiceExtractor::new(MockCompletion::failing("timeout"));
        let inv = extractor.extract("ACME CORP").await;
        assert!(inv.is_extraction_failure());
        assert!(inv.total_amount.is_zero());
    }

    #[tokio::test]
    async fn malformed_reply_yields_sentinel() {
        let extractor = InvoiceExtractor::new(MockCompletion::reply("Sorry, I can't read that."));
        assert!(extractor.extract("ACME CORP").await.is_extraction_failure());
    }

    #[tokio::test]
    async fn blank_document_skips_the_service() {
        let extractor = InvoiceExtractor::new(MockCompletion::reply("{}"));
        assert!(extractor.extract("   ").await.is_extraction_failure());
        assert_eq!(extractor.completion.calls(), 0);
    }
}
