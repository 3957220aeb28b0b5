use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document contains no extractable text (image-only PDF?)")]
    NoText,
    #[error("PDF parse error: {0}")]
    Pdf(String),
    #[error("PDF support not available, build with the `pdf` feature")]
    PdfNotAvailable,
}

/// Abstraction over a document-to-text reader.
/// Implementations accept raw document bytes and return the text layer.
pub trait DocumentText: Send + Sync {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError>;
}

/// Treats the bytes as UTF-8 text. Used for `.txt` invoices and in tests.
pub struct PlainText;

impl DocumentText for PlainText {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        non_empty(String::from_utf8_lossy(bytes).into_owned())
    }
}

fn non_empty(text: String) -> Result<String, DocumentError> {
    if text.trim().is_empty() {
        Err(DocumentError::NoText)
    } else {
        Ok(text)
    }
}

/// Picks a reader from a file extension: PDFs go through the PDF backend
/// when compiled in, everything else is read as plain text.
pub fn reader_for_extension(ext: &str) -> Box<dyn DocumentText> {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => pdf_reader(),
        _ => Box::new(PlainText),
    }
}

#[cfg(feature = "pdf")]
fn pdf_reader() -> Box<dyn DocumentText> {
    Box::new(pdf_backend::PdfText)
}

#[cfg(not(feature = "pdf"))]
fn pdf_reader() -> Box<dyn DocumentText> {
    Box::new(NoPdf)
}

#[cfg(not(feature = "pdf"))]
struct NoPdf;

#[cfg(not(feature = "pdf"))]
impl DocumentText for NoPdf {
    fn extract_text(&self, _bytes: &[u8]) -> Result<String, DocumentError> {
        Err(DocumentError::PdfNotAvailable)
    }
}

// ── PDF backend (optional, gated behind `pdf` feature) ─────────────────────────

#[cfg(feature = "pdf")]
pub mod pdf_backend {
    use super::{non_empty, DocumentError, DocumentText};

    pub struct PdfText;

    impl DocumentText for PdfText {
        fn extract_text(&self, bytes: &[u8]) -> Result<String, DocumentError> {
            let text = pdf_extract::extract_text_from_mem(bytes)
                .map_err(|e| DocumentError::Pdf(e.to_string()))?;
            non_empty(text)
        }
    }
}
