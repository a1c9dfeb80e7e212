//! Failure kinds of the résumé parsing pipeline.
//!
//! Every kind is terminal for one invocation; nothing here is retried.

use thiserror::Error;

use crate::llm_client::AiError;
use crate::parsing::extractor::SUPPORTED_EXTENSIONS;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(
        "Unsupported file format '{extension}'. Please upload one of: {}",
        SUPPORTED_EXTENSIONS.join(", ")
    )]
    UnsupportedFormat { extension: String },

    #[error("Failed to extract text from document: {0}")]
    ExtractionFailed(String),

    #[error("No text could be extracted from the document")]
    EmptyDocument,

    #[error("AI service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("AI service returned a malformed response")]
    UpstreamMalformedResponse { body: String },

    #[error("AI output is not valid JSON: {reason}")]
    MalformedModelOutput { raw: String, reason: String },
}

impl ParseError {
    /// True when the caller's input is at fault rather than the service or upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ParseError::UnsupportedFormat { .. } | ParseError::EmptyDocument
        )
    }
}

impl From<AiError> for ParseError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Unavailable(msg) => ParseError::UpstreamUnavailable(msg),
            AiError::MalformedResponse { body } => ParseError::UpstreamMalformedResponse { body },
        }
    }
}
