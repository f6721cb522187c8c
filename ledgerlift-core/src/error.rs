use thiserror::Error;

/// Failures that void a whole statement request. Everything below this level
/// (bad cells, failed strategies, empty pages) is absorbed by the parser.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Empty file")]
    EmptyPayload,

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Extraction service error {status}: {message}")]
    Service { status: u16, message: String },
}
