pub mod advisor;
pub mod completion;
pub mod document;
pub mod extract;
pub mod gemini;
pub mod pipeline;

pub use advisor::{financial_context, Advisor, ChatMessage, ChatRole};
pub use completion::{CompletionError, MockCompletion, TextCompletion};
pub use document::{reader_for_extension, DocumentError, DocumentText, PlainText};
pub use extract::{parse_invoice_json, ExtractError, InvoiceExtractor};
pub use gemini::{GeminiClient, GeminiConfig};
pub use pipeline::{IntakePipeline, PipelineError};
