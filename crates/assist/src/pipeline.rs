use ledgerai_core::Invoice;
use std::path::Path;
use thiserror::Error;

use crate::completion::TextCompletion;
use crate::document::reader_for_extension;
use crate::extract::InvoiceExtractor;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Orchestrates: read → document text → model extraction → coerced invoice.
///
/// Only failing to read the file is an error. Every later failure maps to
/// the extraction-failed placeholder so callers always get an invoice.
pub struct IntakePipeline<C> {
    extractor: InvoiceExtractor<C>,
}

impl<C: TextCompletion> IntakePipeline<C> {
    pub fn new(completion: C) -> Self {
        Self {
            extractor: InvoiceExtractor::new(completion),
        }
    }

    pub async fn process_file(&self, path: &Path) -> Result<Invoice, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("txt")
            .to_lowercase();
        tracing::info!(path = %path.display(), "Processing invoice document");
        Ok(self.process_bytes(&bytes, &ext).await)
    }

    pub async fn process_bytes(&self, data: &[u8], ext: &str) -> Invoice {
        let text = match reader_for_extension(ext).extract_text(data) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, ext, "Could not read document text");
                return Invoice::extraction_failed();
            }
        };
        self.extractor.extract(&text).await
    }
}
